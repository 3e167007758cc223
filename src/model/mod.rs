pub use self::bucket::{AnnotatedProject, BucketMetadata, BulkPayload};
pub use self::draft::{DEFAULT_BUDGET, DEFAULT_DIFFICULTY, DEFAULT_MAX_TEAMS, ProjectDraft};
pub use self::row::{Column, RawRow};

mod bucket;
mod draft;
mod row;
