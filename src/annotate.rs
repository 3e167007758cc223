use crate::model::{AnnotatedProject, BucketMetadata, ProjectDraft};
use tracing::debug;

/// Attach the bucket metadata and scheduling defaults to every draft.
pub fn annotate(drafts: Vec<ProjectDraft>, metadata: &BucketMetadata) -> Vec<AnnotatedProject> {
    let tags = metadata.tags.iter().cloned().collect::<Vec<_>>();
    let common = metadata.common_data();
    debug!(
        projects = drafts.len(),
        version = %metadata.version_name,
        semester = %metadata.semester,
        "annotating batch"
    );
    drafts
        .into_iter()
        .map(|draft| AnnotatedProject {
            draft,
            version: metadata.version_name.clone(),
            version_semester: metadata.semester.clone(),
            version_department: metadata.department.clone(),
            version_tags: tags.clone(),
            common: common.clone(),
        })
        .collect()
}
