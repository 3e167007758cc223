#![allow(clippy::cast_possible_truncation)]

use crate::loaders::LoadedRows;
use crate::model::{
    Column, DEFAULT_BUDGET, DEFAULT_DIFFICULTY, DEFAULT_MAX_TEAMS, ProjectDraft, RawRow,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ParserOptions {
    /// Reject rows without a co-supervisor email.
    pub require_co_supervisor: bool,
    pub max_upload_bytes: u64,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            require_co_supervisor: true,
            max_upload_bytes: crate::loaders::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Result of parsing a whole upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParseReport {
    pub drafts: Vec<ProjectDraft>,
    /// Rows dropped because a required field was blank.
    pub skipped: usize,
    /// Lines dropped by the adapter because of a column count mismatch.
    pub mismatched: usize,
    pub unknown_columns: Vec<String>,
    pub missing_columns: Vec<Column>,
    /// Drafts whose difficulty is kept verbatim but is not a known level.
    pub unrecognized_difficulty: usize,
}

impl ParseReport {
    pub fn dropped(&self) -> usize {
        self.skipped + self.mismatched
    }
}

const REQUIRED: [Column; 4] = [
    Column::Title,
    Column::Description,
    Column::SupervisorEmail,
    Column::CoSupervisorEmail,
];

fn text(row: &RawRow, column: Column) -> String {
    row.get(column).map(str::trim).unwrap_or_default().to_owned()
}

fn integer(row: &RawRow, column: Column) -> Option<i64> {
    let s = row.get(column)?.trim();
    s.parse::<i64>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
            .map(|f| f.trunc() as i64)
    })
}

fn technologies(row: &RawRow) -> Vec<String> {
    row.get(Column::Technologies)
        .map(|s| {
            s.split(';')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Build a draft from one row, or `None` when a required field is blank.
pub fn parse_row(row: &RawRow, options: &ParserOptions) -> Option<ProjectDraft> {
    let difficulty = text(row, Column::Difficulty);
    let draft = ProjectDraft {
        title: text(row, Column::Title),
        description: text(row, Column::Description),
        category: text(row, Column::Category),
        difficulty: if difficulty.is_empty() {
            DEFAULT_DIFFICULTY.to_owned()
        } else {
            difficulty
        },
        technologies: technologies(row),
        max_teams: integer(row, Column::MaxTeams)
            .filter(|&n| n >= 1)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_MAX_TEAMS),
        supervisor_email: text(row, Column::SupervisorEmail),
        co_supervisor_email: text(row, Column::CoSupervisorEmail),
        department: text(row, Column::Department),
        budget: integer(row, Column::Budget)
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(DEFAULT_BUDGET),
        prerequisites: text(row, Column::Prerequisites),
    };
    if !draft.has_required_fields()
        || (options.require_co_supervisor && draft.co_supervisor_email.is_empty())
    {
        return None;
    }
    Some(draft)
}

/// Parse every row in input order, counting the rows that had to be dropped.
pub fn parse_rows(loaded: &LoadedRows, options: &ParserOptions) -> ParseReport {
    let mut report = ParseReport {
        mismatched: loaded.mismatched,
        unknown_columns: loaded
            .headers
            .iter()
            .filter(|h| !h.is_empty() && Column::from_header(h).is_none())
            .cloned()
            .collect(),
        missing_columns: Column::ALL
            .into_iter()
            .filter(|c| !loaded.headers.iter().any(|h| h.trim() == c.header()))
            .collect(),
        ..ParseReport::default()
    };
    if !loaded.headers.is_empty() {
        for column in &report.missing_columns {
            warn!(%column, "column missing from upload, using empty values");
        }
        if !report.unknown_columns.is_empty() {
            debug!(columns = ?report.unknown_columns, "ignoring unknown columns");
        }
    }
    for (index, row) in loaded.rows.iter().enumerate() {
        match parse_row(row, options) {
            Some(draft) => {
                if draft.known_difficulty().is_none() {
                    warn!(
                        row = index + 1,
                        difficulty = %draft.difficulty,
                        "unrecognized difficulty kept as is"
                    );
                    report.unrecognized_difficulty += 1;
                }
                report.drafts.push(draft);
            }
            None => {
                warn!(
                    row = index + 1,
                    absent = ?REQUIRED
                        .into_iter()
                        .filter(|&c| !row.contains(c))
                        .map(Column::header)
                        .collect::<Vec<_>>(),
                    "skipping row with missing required fields"
                );
                report.skipped += 1;
            }
        }
    }
    info!(
        parsed = report.drafts.len(),
        skipped = report.skipped,
        mismatched = report.mismatched,
        "parsed upload"
    );
    report
}
