use super::Sink;
use crate::error::{GENERIC_SUBMISSION_FAILURE, SubmissionError};
use crate::model::BulkPayload;
use serde::Deserialize;
use tracing::{debug, info};

/// Posts the bucket to the bulk-create endpoint of the project service.
pub struct HttpSink {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Reply {
    message: Option<String>,
    error: Option<String>,
    count: Option<usize>,
}

impl HttpSink {
    pub fn new(url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            token,
        }
    }
}

impl Sink for HttpSink {
    async fn submit(&mut self, payload: &BulkPayload) -> Result<usize, SubmissionError> {
        debug!(url = %self.url, projects = payload.projects.len(), "posting bucket");
        let mut request = self.client.post(&self.url).json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        let reply = serde_json::from_str::<Reply>(&body).unwrap_or_default();
        if status.is_success() {
            let created = reply.count.unwrap_or(payload.projects.len());
            info!(%status, created, message = ?reply.message, "bucket accepted");
            Ok(created)
        } else {
            Err(SubmissionError::Server {
                status: status.as_u16(),
                message: reply
                    .message
                    .or(reply.error)
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_SUBMISSION_FAILURE.to_owned()),
            })
        }
    }
}
