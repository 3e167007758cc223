use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_DIFFICULTY: &str = "Beginner";
pub const DEFAULT_MAX_TEAMS: u32 = 1;
pub const DEFAULT_BUDGET: u64 = 0;

/// Normalized project record, not persisted yet.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: String,
    pub technologies: Vec<String>,
    pub max_teams: u32,
    pub supervisor_email: String,
    pub co_supervisor_email: String,
    pub department: String,
    pub budget: u64,
    pub prerequisites: String,
}

impl ProjectDraft {
    /// Fields that must never be blank on an accepted draft.
    pub fn has_required_fields(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.supervisor_email.trim().is_empty()
    }

    pub fn known_difficulty(&self) -> Option<Difficulty> {
        Difficulty::parse(&self.difficulty)
    }
}

impl fmt::Display for ProjectDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.title, self.supervisor_email)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn parse(s: &str) -> Option<Difficulty> {
        match s {
            "Beginner" => Some(Difficulty::Beginner),
            "Intermediate" => Some(Difficulty::Intermediate),
            "Advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

#[test]
fn test_required_fields() {
    let draft = ProjectDraft {
        title: "AI Bot".into(),
        description: "Build a bot".into(),
        supervisor_email: "a@x.edu".into(),
        ..ProjectDraft::default()
    };
    assert!(draft.has_required_fields());
    let draft = ProjectDraft {
        description: "   ".into(),
        ..draft
    };
    assert!(!draft.has_required_fields());
}

#[test]
fn test_serialized_field_names() {
    let draft = ProjectDraft {
        max_teams: 2,
        co_supervisor_email: "b@x.edu".into(),
        ..ProjectDraft::default()
    };
    let value = serde_json::to_value(&draft).unwrap();
    assert_eq!(value["maxTeams"], 2);
    assert_eq!(value["coSupervisorEmail"], "b@x.edu");
    assert!(value.get("supervisorEmail").is_some());
}
