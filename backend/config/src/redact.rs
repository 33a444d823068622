//! Config redaction: produce safe-to-log config snapshots by masking credentials.

use serde_json::Value;

use crate::schema::Config;

/// Keys whose values are secrets.
static SENSITIVE_KEYS: &[&str] = &["password", "secret", "token", "api_key"];

/// Serialize the config with every sensitive field replaced by `"***"`.
pub fn redact(config: &Config) -> Value {
    match serde_json::to_value(config) {
        Ok(value) => redact_recursive(&value, ""),
        Err(_) => Value::Null,
    }
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => {
            Value::String("***".to_string())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnvMap;

    #[test]
    fn masks_passwords_keeps_the_rest() {
        let vars: EnvMap = [
            ("DATABASE_NAME", "rsvp"),
            ("DATABASE_USERNAME", "app"),
            ("DATABASE_PASSWORD", "db-secret"),
            ("REDIS_HOST", "redis:6379"),
            ("FWS_RSVP_USERNAME", "admin"),
            ("FWS_RSVP_PASSWORD", "admin-secret"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let config = Config::from_vars(&vars).unwrap();

        let redacted = redact(&config);
        assert_eq!(redacted["database"]["password"], "***");
        assert_eq!(redacted["admin"]["password"], "***");
        assert_eq!(redacted["admin"]["username"], "admin");
        assert_eq!(redacted["redis"]["address"], "redis:6379");
        assert!(!redacted.to_string().contains("secret"));
    }
}
