#![allow(clippy::cast_possible_wrap)]

use super::Sink;
use crate::error::SubmissionError;
use crate::model::{AnnotatedProject, BulkPayload};
use chrono::NaiveDate;
use sqlx::any::AnyConnectOptions;
use sqlx::{AnyConnection, Connection};
use std::str::FromStr;
use tracing::{debug, info};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS projects (
    title VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    category TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    technologies TEXT NOT NULL,
    max_teams INTEGER NOT NULL,
    supervisor_email TEXT NOT NULL,
    co_supervisor_email TEXT NOT NULL,
    department TEXT NOT NULL,
    budget BIGINT NOT NULL,
    prerequisites TEXT NOT NULL,
    version VARCHAR(255) NOT NULL,
    version_semester TEXT NOT NULL,
    version_department TEXT NOT NULL,
    version_tags TEXT NOT NULL,
    min_team_size INTEGER,
    max_team_size INTEGER,
    application_deadline TEXT,
    project_start_date TEXT,
    project_end_date TEXT,
    UNIQUE (version, title)
)";

const INSERT_PROJECT: &str = "INSERT INTO projects (
    title, description, category, difficulty, technologies, max_teams,
    supervisor_email, co_supervisor_email, department, budget, prerequisites,
    version, version_semester, version_department, version_tags,
    min_team_size, max_team_size, application_deadline, project_start_date, project_end_date
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// Writes the bucket straight into a `projects` table, in one transaction.
pub struct DatabaseSink {
    conn: AnyConnection,
}

fn date(d: Option<NaiveDate>) -> Option<String> {
    d.map(|d| d.to_string())
}

impl DatabaseSink {
    pub async fn new(url: &str) -> Result<Self, SubmissionError> {
        sqlx::any::install_default_drivers();
        Ok(Self {
            conn: AnyConnection::connect_with(&AnyConnectOptions::from_str(url)?).await?,
        })
    }

    pub async fn ensure_schema(&mut self) -> Result<(), SubmissionError> {
        sqlx::query(CREATE_TABLE).execute(&mut self.conn).await?;
        Ok(())
    }

    async fn insert(
        conn: &mut AnyConnection,
        project: &AnnotatedProject,
    ) -> Result<(), SubmissionError> {
        let draft = &project.draft;
        sqlx::query(INSERT_PROJECT)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(&draft.category)
            .bind(&draft.difficulty)
            .bind(serde_json::to_string(&draft.technologies)?)
            .bind(i64::from(draft.max_teams))
            .bind(&draft.supervisor_email)
            .bind(&draft.co_supervisor_email)
            .bind(&draft.department)
            .bind(draft.budget as i64)
            .bind(&draft.prerequisites)
            .bind(&project.version)
            .bind(&project.version_semester)
            .bind(&project.version_department)
            .bind(serde_json::to_string(&project.version_tags)?)
            .bind(project.common.min_team_size.map(i64::from))
            .bind(project.common.max_team_size.map(i64::from))
            .bind(date(project.common.application_deadline))
            .bind(date(project.common.project_start_date))
            .bind(date(project.common.project_end_date))
            .execute(conn)
            .await?;
        Ok(())
    }
}

impl Sink for DatabaseSink {
    async fn submit(&mut self, payload: &BulkPayload) -> Result<usize, SubmissionError> {
        let mut trans = self.conn.begin().await?;
        for project in &payload.projects {
            debug!(draft = %project.draft, "inserting project");
            Self::insert(&mut trans, project).await?;
        }
        trans.commit().await?;
        info!(
            created = payload.projects.len(),
            version = %payload.version_info.name,
            "bucket stored"
        );
        Ok(payload.projects.len())
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::sinks::{UploadSession, fixtures};

    async fn sink() -> DatabaseSink {
        let mut sink = DatabaseSink::new("sqlite::memory:").await.unwrap();
        sink.ensure_schema().await.unwrap();
        sink
    }

    async fn count(sink: &mut DatabaseSink) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects")
            .fetch_one(&mut sink.conn)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn bucket_is_stored() {
        let mut sink = sink().await;
        let mut session = UploadSession::new(fixtures::metadata());
        session.stage(fixtures::drafts(4));
        assert_eq!(session.submit(&mut sink).await.unwrap(), 4);
        assert_eq!(count(&mut sink).await, 4);
        let semester: String =
            sqlx::query_scalar("SELECT version_semester FROM projects WHERE title = 'Project 2'")
                .fetch_one(&mut sink.conn)
                .await
                .unwrap();
        assert_eq!(semester, "Fall 2024");
    }

    #[tokio::test]
    async fn failing_insert_rolls_back_the_whole_bucket() {
        let mut sink = sink().await;
        let mut drafts = fixtures::drafts(3);
        drafts.push(drafts[0].clone());
        let mut session = UploadSession::new(fixtures::metadata());
        session.stage(drafts);
        assert!(matches!(
            session.submit(&mut sink).await,
            Err(SubmissionError::Database(_))
        ));
        assert_eq!(count(&mut sink).await, 0);
        assert_eq!(session.batch().len(), 4);
    }
}
