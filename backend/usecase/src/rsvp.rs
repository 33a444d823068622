use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use rsvp_core::{
    File, NewRsvp, Parameter, Rsvp, RsvpError, RsvpRepository, RsvpResult, SortField,
};

use crate::export::{export_filename, write_csv};

/// Submission use-cases. Holds the repository it delegates persistence to.
pub struct RsvpUsecase {
    repo: Arc<dyn RsvpRepository>,
}

impl RsvpUsecase {
    pub fn new(repo: Arc<dyn RsvpRepository>) -> Self {
        Self { repo }
    }

    /// Persist a validated submission; the repository assigns id and timestamp.
    pub async fn create_rsvp(&self, new: NewRsvp) -> Result<Rsvp, RsvpError> {
        let created = self.repo.create_rsvp(new).await?;
        info!(id = %created.id, attend = %created.attend, "RSVP created");
        Ok(created)
    }

    /// List submissions. `param.sort` is rewritten to its canonical whitelisted form
    /// (newest-first when invalid) before the repository sees it.
    pub async fn get_rsvps(&self, param: &mut Parameter) -> Result<RsvpResult, RsvpError> {
        param.sort = valid_sort_field(&param.sort).to_string();
        let result = self.repo.get_rsvps(param).await?;
        debug!(
            sort = %param.sort,
            limit = param.limit,
            offset = param.offset,
            returned = result.data.len(),
            total = result.total,
            "Listed RSVPs"
        );
        Ok(result)
    }

    /// Export the selected page as a CSV file.
    pub async fn write_rsvps_csv(&self, param: &mut Parameter) -> Result<File, RsvpError> {
        let result = self.get_rsvps(param).await?;
        let content = write_csv(&result.data)?;
        let name = export_filename(Utc::now());
        info!(file = %name, rows = result.data.len(), "RSVP export generated");
        Ok(File { content, name })
    }
}

/// Canonical sort expression for `raw`, falling back to `-created_at`.
pub fn valid_sort_field(raw: &str) -> &'static str {
    SortField::parse(raw).unwrap_or_default().as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rsvp_core::Attendance;
    use rsvp_storage::InMemoryRsvpStore;
    use std::sync::Mutex;

    /// Records the parameters it was queried with.
    #[derive(Default)]
    struct RecordingRepo {
        seen: Mutex<Vec<Parameter>>,
    }

    #[async_trait]
    impl RsvpRepository for RecordingRepo {
        async fn create_rsvp(&self, _new: NewRsvp) -> Result<Rsvp, RsvpError> {
            Err(RsvpError::Storage("read-only".into()))
        }

        async fn get_rsvps(&self, param: &Parameter) -> Result<RsvpResult, RsvpError> {
            self.seen.lock().unwrap().push(param.clone());
            Ok(RsvpResult::default())
        }
    }

    fn submission(name: &str, attend: Attendance) -> NewRsvp {
        NewRsvp {
            name: name.to_string(),
            address: "Jl. Mawar 1".to_string(),
            attend,
            message: String::new(),
        }
    }

    #[test]
    fn sort_whitelist() {
        assert_eq!(valid_sort_field("name"), "name");
        assert_eq!(valid_sort_field("-Created_At"), "-created_at");
        assert_eq!(valid_sort_field("banana"), "-created_at");
        assert_eq!(valid_sort_field(""), "-created_at");
    }

    #[tokio::test]
    async fn normalizes_sort_before_querying() {
        let repo = Arc::new(RecordingRepo::default());
        let usecase = RsvpUsecase::new(repo.clone());

        let mut param = Parameter::new("banana", 10, 0);
        usecase.get_rsvps(&mut param).await.unwrap();

        assert_eq!(param.sort, "-created_at");
        assert_eq!(repo.seen.lock().unwrap()[0].sort, "-created_at");
    }

    #[tokio::test]
    async fn propagates_repository_errors() {
        let usecase = RsvpUsecase::new(Arc::new(RecordingRepo::default()));
        let err = usecase
            .create_rsvp(submission("Ana", Attendance::Yes))
            .await
            .unwrap_err();
        assert!(matches!(err, RsvpError::Storage(_)));
    }

    #[tokio::test]
    async fn exports_page_in_order() {
        let usecase = RsvpUsecase::new(Arc::new(InMemoryRsvpStore::new()));
        usecase.create_rsvp(submission("Cleo", Attendance::Maybe)).await.unwrap();
        usecase.create_rsvp(submission("Ana", Attendance::Yes)).await.unwrap();
        usecase.create_rsvp(submission("Ben", Attendance::No)).await.unwrap();

        let mut param = Parameter::new("name", 10, 0);
        let file = usecase.write_rsvps_csv(&mut param).await.unwrap();

        assert!(file.name.starts_with("rsvp-") && file.name.ends_with(".csv"));
        let text = String::from_utf8(file.content).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("1,Ana,"));
        assert!(lines[2].starts_with("2,Ben,"));
        assert!(lines[3].starts_with("3,Cleo,"));
        assert!(lines[3].contains(",Maybe,"));
    }

    #[tokio::test]
    async fn empty_export_is_header_only() {
        let usecase = RsvpUsecase::new(Arc::new(InMemoryRsvpStore::new()));
        let file = usecase.write_rsvps_csv(&mut Parameter::default()).await.unwrap();
        let text = String::from_utf8(file.content).unwrap();
        assert_eq!(text.trim_end(), "Number,Name,Address,Attend,Message,Created Date");
    }
}
