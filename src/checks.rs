use crate::error::BatchError;
use crate::model::ProjectDraft;
use tracing::warn;

/// Refuse the whole batch if any draft lacks a title, description or
/// supervisor email. Nothing is forwarded unless every draft passes.
pub fn ensure_complete(drafts: Vec<ProjectDraft>) -> Result<Vec<ProjectDraft>, BatchError> {
    let invalid = drafts
        .iter()
        .enumerate()
        .filter(|(_, d)| !d.has_required_fields())
        .inspect(|(index, d)| warn!(index, draft = %d, "incomplete project in batch"))
        .count();
    if invalid > 0 {
        return Err(BatchError::Invalid {
            invalid,
            total: drafts.len(),
        });
    }
    Ok(drafts)
}
