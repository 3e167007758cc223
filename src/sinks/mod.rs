use crate::annotate::annotate;
use crate::error::SubmissionError;
use crate::model::{AnnotatedProject, BucketMetadata, BulkPayload, ProjectDraft};
use tracing::{info, warn};

pub use self::database::DatabaseSink;
pub use self::http::HttpSink;

mod database;
mod http;

/// Persistence collaborator receiving a whole bucket at once.
#[allow(async_fn_in_trait)]
pub trait Sink {
    /// Persist every project of the payload, or none of them. Returns the
    /// number of created projects.
    async fn submit(&mut self, payload: &BulkPayload) -> Result<usize, SubmissionError>;
}

/// Working set of one bulk upload: the annotated batch and its metadata.
#[derive(Debug, Default)]
pub struct UploadSession {
    metadata: BucketMetadata,
    batch: Vec<AnnotatedProject>,
}

impl UploadSession {
    pub fn new(metadata: BucketMetadata) -> Self {
        Self {
            metadata,
            batch: Vec::new(),
        }
    }

    /// Annotate validated drafts with the session metadata and add them to
    /// the batch.
    pub fn stage(&mut self, drafts: Vec<ProjectDraft>) {
        self.batch.extend(annotate(drafts, &self.metadata));
    }

    pub fn batch(&self) -> &[AnnotatedProject] {
        &self.batch
    }

    pub fn metadata(&self) -> &BucketMetadata {
        &self.metadata
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    /// Build the request body, refusing empty batches and incomplete
    /// metadata.
    pub fn payload(&self) -> Result<BulkPayload, SubmissionError> {
        if self.is_empty() {
            return Err(SubmissionError::EmptyBatch);
        }
        self.metadata.validate()?;
        Ok(BulkPayload {
            projects: self.batch.clone(),
            version_info: self.metadata.version_info(),
            common_bucket_data: self.metadata.common_data(),
        })
    }

    /// Send the batch. The session is cleared on success and kept intact on
    /// failure so that it can be submitted again.
    pub async fn submit<S: Sink>(&mut self, sink: &mut S) -> Result<usize, SubmissionError> {
        let payload = self.payload()?;
        match sink.submit(&payload).await {
            Ok(created) => {
                info!(
                    created,
                    version = %self.metadata.version_name,
                    "bucket submitted"
                );
                self.batch.clear();
                self.metadata = BucketMetadata::default();
                Ok(created)
            }
            Err(e) => {
                warn!(error = %e, projects = self.batch.len(), "submission failed, batch kept");
                Err(e)
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;

    struct FakeSink {
        fail: bool,
        received: Vec<BulkPayload>,
    }

    impl Sink for FakeSink {
        async fn submit(&mut self, payload: &BulkPayload) -> Result<usize, SubmissionError> {
            self.received.push(payload.clone());
            if self.fail {
                Err(SubmissionError::Server {
                    status: 500,
                    message: "database unavailable".into(),
                })
            } else {
                Ok(payload.projects.len())
            }
        }
    }

    fn sink(fail: bool) -> FakeSink {
        FakeSink {
            fail,
            received: Vec::new(),
        }
    }

    #[tokio::test]
    async fn empty_batch_is_refused_without_calling_the_sink() {
        let mut session = UploadSession::new(fixtures::metadata());
        let mut sink = sink(false);
        assert!(matches!(
            session.submit(&mut sink).await,
            Err(SubmissionError::EmptyBatch)
        ));
        assert!(sink.received.is_empty());
    }

    #[tokio::test]
    async fn blank_semester_is_refused_without_calling_the_sink() {
        let mut session = UploadSession::new(BucketMetadata {
            semester: " ".into(),
            ..fixtures::metadata()
        });
        session.stage(fixtures::drafts(2));
        let mut sink = sink(false);
        assert!(matches!(
            session.submit(&mut sink).await,
            Err(SubmissionError::Metadata(MetadataError::BlankSemester))
        ));
        assert!(sink.received.is_empty());
        assert_eq!(session.batch().len(), 2);
    }

    #[tokio::test]
    async fn success_clears_the_session() {
        let mut session = UploadSession::new(fixtures::metadata());
        session.stage(fixtures::drafts(3));
        let mut sink = sink(false);
        assert_eq!(session.submit(&mut sink).await.unwrap(), 3);
        assert!(session.is_empty());
        assert_eq!(session.metadata(), &BucketMetadata::default());
        let payload = &sink.received[0];
        assert_eq!(payload.projects.len(), 3);
        assert_eq!(payload.version_info.name, "Capstone 2024");
        assert_eq!(payload.common_bucket_data.max_team_size, Some(4));
    }

    #[tokio::test]
    async fn failure_keeps_the_session_for_a_retry() {
        let mut session = UploadSession::new(fixtures::metadata());
        session.stage(fixtures::drafts(2));
        let mut failing = sink(true);
        let err = session.submit(&mut failing).await.unwrap_err();
        assert_eq!(err.to_string(), "server answered 500: database unavailable");
        assert_eq!(session.batch().len(), 2);
        assert_eq!(session.metadata(), &fixtures::metadata());
        let mut working = sink(false);
        assert_eq!(session.submit(&mut working).await.unwrap(), 2);
        assert_eq!(failing.received, working.received);
    }
}
