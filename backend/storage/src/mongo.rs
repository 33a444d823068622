//! MongoDB-backed submission repository.
//!
//! Documents live in the `rsvps` collection:
//! `{_id: ObjectId, name, address, attend: int, message, created_at: date}`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::options::{ClientOptions, Credential, ServerAddress};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use rsvp_core::{Attendance, NewRsvp, Parameter, Rsvp, RsvpError, RsvpRepository, RsvpResult};

const COLLECTION: &str = "rsvps";
const APP_NAME: &str = "rsvp";

/// Connection settings for [`MongoRsvpStore::connect`].
#[derive(Debug, Clone)]
pub struct MongoSettings {
    /// `host` or `host:port`.
    pub host: String,
    pub database: String,
    pub username: String,
    pub password: String,
    pub pool_size: u32,
    /// Bounds both the TCP dial and server selection.
    pub connect_timeout: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
struct RsvpDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    address: String,
    attend: i32,
    message: String,
    created_at: BsonDateTime,
}

impl RsvpDocument {
    fn from_rsvp(new: &NewRsvp, id: ObjectId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name.clone(),
            address: new.address.clone(),
            attend: i32::from(i16::from(new.attend)),
            message: new.message.clone(),
            created_at: BsonDateTime::from_millis(created_at.timestamp_millis()),
        }
    }

    fn into_rsvp(self) -> Result<Rsvp, RsvpError> {
        let attend = Attendance::try_from(i64::from(self.attend)).map_err(RsvpError::Storage)?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(self.created_at.timestamp_millis())
            .ok_or_else(|| RsvpError::Storage(format!("created_at out of range on {}", self.id)))?;
        Ok(Rsvp {
            id: self.id.to_hex(),
            name: self.name,
            address: self.address,
            attend,
            message: self.message,
            created_at,
        })
    }
}

fn storage_error(err: mongodb::error::Error) -> RsvpError {
    RsvpError::Storage(err.to_string())
}

/// Submission repository backed by a MongoDB collection.
pub struct MongoRsvpStore {
    collection: Collection<RsvpDocument>,
}

impl MongoRsvpStore {
    /// Wrap an already-connected database handle.
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION),
        }
    }

    /// Dial the server, authenticate against the target database, and ping it.
    pub async fn connect(settings: &MongoSettings) -> Result<Self, RsvpError> {
        info!(
            host = %settings.host,
            database = %settings.database,
            pool_size = settings.pool_size,
            "Connecting to MongoDB"
        );

        let address = ServerAddress::parse(&settings.host).map_err(storage_error)?;

        let mut credential = Credential::default();
        credential.username = Some(settings.username.clone());
        credential.password = Some(settings.password.clone());
        credential.source = Some(settings.database.clone());

        let mut options = ClientOptions::default();
        options.hosts = vec![address];
        options.credential = Some(credential);
        options.max_pool_size = Some(settings.pool_size);
        options.connect_timeout = Some(settings.connect_timeout);
        options.server_selection_timeout = Some(settings.connect_timeout);
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options).map_err(storage_error)?;
        let db = client.database(&settings.database);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(storage_error)?;

        info!(database = %settings.database, "MongoDB connection established");
        Ok(Self::new(&db))
    }

    fn sort_document(param: &Parameter) -> Document {
        let sort = param.sort_field();
        let direction = if sort.is_descending() { -1 } else { 1 };
        let mut document = Document::new();
        document.insert(sort.field(), direction);
        document
    }
}

#[async_trait]
impl RsvpRepository for MongoRsvpStore {
    async fn create_rsvp(&self, new: NewRsvp) -> Result<Rsvp, RsvpError> {
        let id = ObjectId::new();
        // Stored precision is milliseconds; return exactly what a later read yields.
        let created_at = DateTime::<Utc>::from_timestamp_millis(Utc::now().timestamp_millis())
            .unwrap_or_else(Utc::now);

        let document = RsvpDocument::from_rsvp(&new, id, created_at);
        self.collection
            .insert_one(&document)
            .await
            .map_err(storage_error)?;

        debug!(id = %id, "Inserted RSVP");
        document.into_rsvp()
    }

    async fn get_rsvps(&self, param: &Parameter) -> Result<RsvpResult, RsvpError> {
        let mut find = self
            .collection
            .find(doc! {})
            .sort(Self::sort_document(param));
        if let Some((skip, limit)) = param.page() {
            find = find.skip(skip).limit(limit as i64);
        }

        let documents: Vec<RsvpDocument> = find
            .await
            .map_err(storage_error)?
            .try_collect()
            .await
            .map_err(storage_error)?;

        let total = self
            .collection
            .count_documents(doc! {})
            .await
            .map_err(storage_error)?;

        let data = documents
            .into_iter()
            .map(RsvpDocument::into_rsvp)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RsvpResult { data, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_document_follows_whitelist() {
        let doc = MongoRsvpStore::sort_document(&Parameter::new("name", 10, 0));
        assert_eq!(doc.get_i32("name").unwrap(), 1);

        let doc = MongoRsvpStore::sort_document(&Parameter::new("banana", 10, 0));
        assert_eq!(doc.get_i32("created_at").unwrap(), -1);
    }

    #[test]
    fn document_round_trip_preserves_fields() {
        let new = NewRsvp {
            name: "Ana".into(),
            address: "Jl. Melati 3".into(),
            attend: Attendance::Maybe,
            message: "see you".into(),
        };
        let id = ObjectId::new();
        let created_at = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap();

        let rsvp = RsvpDocument::from_rsvp(&new, id, created_at).into_rsvp().unwrap();
        assert_eq!(rsvp.id, id.to_hex());
        assert_eq!(rsvp.attend, Attendance::Maybe);
        assert_eq!(rsvp.created_at, created_at);
    }

    #[test]
    fn unknown_attendance_in_store_is_an_error() {
        let document = RsvpDocument {
            id: ObjectId::new(),
            name: "Ana".into(),
            address: "x".into(),
            attend: 7,
            message: String::new(),
            created_at: BsonDateTime::now(),
        };
        assert!(matches!(document.into_rsvp(), Err(RsvpError::Storage(_))));
    }
}
