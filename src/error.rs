use chrono::NaiveDate;
use thiserror::Error;

/// The input could not be turned into rows at all.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unsupported file format: {0}")]
    Unsupported(String),
    #[error("file is {size} bytes, over the {limit} bytes upload limit")]
    TooLarge { size: u64, limit: u64 },
    #[error("cannot read input")]
    Io(#[from] std::io::Error),
    #[error("cannot decode delimited text")]
    Csv(#[from] csv::Error),
    #[error("cannot decode workbook")]
    Workbook(#[from] calamine::Error),
    #[error("workbook does not contain any sheet")]
    NoSheet,
    #[error("no data rows found")]
    NoDataRows,
}

/// Accepted drafts failed the final check before submission.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error("{invalid} of {total} projects are missing a title, description or supervisor email")]
    Invalid { invalid: usize, total: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("version name is required")]
    BlankVersionName,
    #[error("semester is required")]
    BlankSemester,
    #[error("team sizes must be at least 1")]
    ZeroTeamSize,
    #[error("minimum team size {min} is larger than maximum team size {max}")]
    TeamSizeInverted { min: u32, max: u32 },
    #[error("project start date {start} is after end date {end}")]
    DatesInverted { start: NaiveDate, end: NaiveDate },
    #[error("application deadline {deadline} is after project start date {start}")]
    DeadlineAfterStart { deadline: NaiveDate, start: NaiveDate },
}

pub const GENERIC_SUBMISSION_FAILURE: &str = "failed to create projects";

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("no projects to submit")]
    EmptyBatch,
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error("server answered {status}: {message}")]
    Server { status: u16, message: String },
    #[error("failed to create projects: network error")]
    Network(#[from] reqwest::Error),
    #[error("failed to create projects: database error")]
    Database(#[from] sqlx::Error),
    #[error("cannot encode project")]
    Encode(#[from] serde_json::Error),
}
