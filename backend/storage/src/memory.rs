use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use rsvp_core::{NewRsvp, Parameter, Rsvp, RsvpError, RsvpRepository, RsvpResult, SortField};

/// Process-local submission store for the test environment and test suites.
#[derive(Default)]
pub struct InMemoryRsvpStore {
    rows: RwLock<Vec<Rsvp>>,
}

impl InMemoryRsvpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored submissions.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn compare(sort: SortField, a: &Rsvp, b: &Rsvp) -> Ordering {
        let ordering = match sort.field() {
            "name" => a.name.cmp(&b.name),
            _ => a.created_at.cmp(&b.created_at),
        };
        if sort.is_descending() {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

#[async_trait]
impl RsvpRepository for InMemoryRsvpStore {
    async fn create_rsvp(&self, new: NewRsvp) -> Result<Rsvp, RsvpError> {
        let rsvp = new.into_rsvp(Uuid::new_v4().to_string(), Utc::now());
        self.rows.write().await.push(rsvp.clone());
        debug!(id = %rsvp.id, "Stored RSVP in memory");
        Ok(rsvp)
    }

    async fn get_rsvps(&self, param: &Parameter) -> Result<RsvpResult, RsvpError> {
        let mut rows = self.rows.read().await.clone();
        let total = rows.len() as u64;

        let sort = param.sort_field();
        rows.sort_by(|a, b| Self::compare(sort, a, b));

        let data = match param.page() {
            Some((skip, limit)) => rows
                .into_iter()
                .skip(skip as usize)
                .take(limit as usize)
                .collect(),
            None => rows,
        };

        Ok(RsvpResult { data, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsvp_core::{Attendance, NO_LIMIT};

    fn submission(name: &str) -> NewRsvp {
        NewRsvp {
            name: name.to_string(),
            address: format!("{name} street 1"),
            attend: Attendance::Yes,
            message: String::new(),
        }
    }

    async fn seeded(names: &[&str]) -> InMemoryRsvpStore {
        let store = InMemoryRsvpStore::new();
        for name in names {
            store.create_rsvp(submission(name)).await.unwrap();
            // Distinct creation timestamps keep created_at ordering deterministic.
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        store
    }

    #[tokio::test]
    async fn create_assigns_identity() {
        let store = InMemoryRsvpStore::new();
        let before = Utc::now();
        let a = store.create_rsvp(submission("Ana")).await.unwrap();
        let b = store.create_rsvp(submission("Ben")).await.unwrap();
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
        assert!(a.created_at >= before);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn sorts_and_pages_with_full_total() {
        let store = seeded(&["Cleo", "Ana", "Ben"]).await;

        let by_name = store.get_rsvps(&Parameter::new("name", 2, 0)).await.unwrap();
        let names: Vec<_> = by_name.data.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Ben"]);
        assert_eq!(by_name.total, 3);

        let newest = store.get_rsvps(&Parameter::new("-created_at", 1, 1)).await.unwrap();
        assert_eq!(newest.data[0].name, "Ana");

        let oldest = store.get_rsvps(&Parameter::new("created_at", NO_LIMIT, 2)).await.unwrap();
        assert_eq!(oldest.data.len(), 3, "no-limit ignores the offset");
        assert_eq!(oldest.data[0].name, "Cleo");
    }

    #[tokio::test]
    async fn offset_past_end_is_empty() {
        let store = seeded(&["Ana"]).await;
        let page = store.get_rsvps(&Parameter::new("", 10, 5)).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 1);
    }
}
