use super::ProjectDraft;
use crate::error::MetadataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Batch-wide attributes shared by every project of one bulk upload.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BucketMetadata {
    pub version_name: String,
    pub description: String,
    pub semester: String,
    pub department: String,
    pub tags: BTreeSet<String>,
    pub min_team_size: Option<u32>,
    pub max_team_size: Option<u32>,
    pub application_deadline: Option<NaiveDate>,
    pub project_start_date: Option<NaiveDate>,
    pub project_end_date: Option<NaiveDate>,
}

impl BucketMetadata {
    /// Check the metadata before anything is sent to the persistence layer.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.version_name.trim().is_empty() {
            return Err(MetadataError::BlankVersionName);
        }
        if self.semester.trim().is_empty() {
            return Err(MetadataError::BlankSemester);
        }
        if self.min_team_size == Some(0) || self.max_team_size == Some(0) {
            return Err(MetadataError::ZeroTeamSize);
        }
        if let (Some(min), Some(max)) = (self.min_team_size, self.max_team_size) {
            if min > max {
                return Err(MetadataError::TeamSizeInverted { min, max });
            }
        }
        if let (Some(start), Some(end)) = (self.project_start_date, self.project_end_date) {
            if start > end {
                return Err(MetadataError::DatesInverted { start, end });
            }
        }
        if let (Some(deadline), Some(start)) = (self.application_deadline, self.project_start_date)
        {
            if deadline > start {
                return Err(MetadataError::DeadlineAfterStart { deadline, start });
            }
        }
        Ok(())
    }

    pub fn version_info(&self) -> VersionInfo {
        VersionInfo {
            name: self.version_name.clone(),
            description: self.description.clone(),
            semester: self.semester.clone(),
            department: self.department.clone(),
            tags: self.tags.iter().cloned().collect(),
        }
    }

    pub fn common_data(&self) -> CommonBucketData {
        CommonBucketData {
            min_team_size: self.min_team_size,
            max_team_size: self.max_team_size,
            application_deadline: self.application_deadline,
            project_start_date: self.project_start_date,
            project_end_date: self.project_end_date,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub name: String,
    pub description: String,
    pub semester: String,
    pub department: String,
    pub tags: Vec<String>,
}

/// Scheduling defaults shared by the bucket.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonBucketData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_team_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_team_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_deadline: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_end_date: Option<NaiveDate>,
}

/// A draft carrying the bucket metadata, ready to be persisted.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AnnotatedProject {
    #[serde(flatten)]
    pub draft: ProjectDraft,
    pub version: String,
    #[serde(rename = "versionsemester")]
    pub version_semester: String,
    #[serde(rename = "versiondepartment")]
    pub version_department: String,
    #[serde(rename = "versiontags")]
    pub version_tags: Vec<String>,
    #[serde(flatten)]
    pub common: CommonBucketData,
}

/// Body of the bulk-create request.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPayload {
    pub projects: Vec<AnnotatedProject>,
    pub version_info: VersionInfo,
    pub common_bucket_data: CommonBucketData,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> BucketMetadata {
        BucketMetadata {
            version_name: "Capstone 2024".into(),
            semester: "Fall 2024".into(),
            ..BucketMetadata::default()
        }
    }

    fn date(s: &str) -> Option<NaiveDate> {
        Some(s.parse().unwrap())
    }

    #[test]
    fn blank_name_or_semester_is_rejected() {
        assert!(metadata().validate().is_ok());
        let m = BucketMetadata {
            version_name: "  ".into(),
            ..metadata()
        };
        assert!(matches!(m.validate(), Err(MetadataError::BlankVersionName)));
        let m = BucketMetadata {
            semester: String::new(),
            ..metadata()
        };
        assert!(matches!(m.validate(), Err(MetadataError::BlankSemester)));
    }

    #[test]
    fn team_sizes_and_dates_are_ordered() {
        let m = BucketMetadata {
            min_team_size: Some(5),
            max_team_size: Some(3),
            ..metadata()
        };
        assert!(matches!(
            m.validate(),
            Err(MetadataError::TeamSizeInverted { min: 5, max: 3 })
        ));
        let m = BucketMetadata {
            max_team_size: Some(0),
            ..metadata()
        };
        assert!(matches!(m.validate(), Err(MetadataError::ZeroTeamSize)));
        let m = BucketMetadata {
            project_start_date: date("2024-10-01"),
            project_end_date: date("2024-09-01"),
            ..metadata()
        };
        assert!(matches!(m.validate(), Err(MetadataError::DatesInverted { .. })));
        let m = BucketMetadata {
            application_deadline: date("2024-10-02"),
            project_start_date: date("2024-10-01"),
            ..metadata()
        };
        assert!(matches!(
            m.validate(),
            Err(MetadataError::DeadlineAfterStart { .. })
        ));
    }

    #[test]
    fn common_data_skips_unset_fields() {
        let m = BucketMetadata {
            min_team_size: Some(2),
            application_deadline: date("2024-09-01"),
            ..metadata()
        };
        let value = serde_json::to_value(m.common_data()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"minTeamSize": 2, "applicationDeadline": "2024-09-01"})
        );
    }
}
