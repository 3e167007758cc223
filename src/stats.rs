use crate::model::ProjectDraft;
use std::collections::BTreeMap;

/// Number of drafts per value of `key`, sorted by value. Blank values are
/// counted under `"-"`.
pub fn count_by<F>(drafts: &[ProjectDraft], key: F) -> Vec<(String, usize)>
where
    F: Fn(&ProjectDraft) -> &str,
{
    let mut counts = BTreeMap::new();
    for draft in drafts {
        let value = match key(draft) {
            "" => "-",
            value => value,
        };
        *counts.entry(value.to_owned()).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Sum of the per-project budgets.
pub fn total_budget(drafts: &[ProjectDraft]) -> u64 {
    drafts.iter().map(|d| d.budget).sum()
}

/// Total number of teams the batch can host.
pub fn total_teams(drafts: &[ProjectDraft]) -> u64 {
    drafts.iter().map(|d| u64::from(d.max_teams)).sum()
}

#[test]
fn test_count_by() {
    let drafts = [("Advanced", "CS"), ("Beginner", ""), ("Advanced", "EE")]
        .into_iter()
        .map(|(difficulty, department)| ProjectDraft {
            difficulty: difficulty.into(),
            department: department.into(),
            max_teams: 2,
            budget: 100,
            ..ProjectDraft::default()
        })
        .collect::<Vec<_>>();
    assert_eq!(
        count_by(&drafts, |d| d.difficulty.as_str()),
        vec![("Advanced".to_owned(), 2), ("Beginner".to_owned(), 1)]
    );
    assert_eq!(
        count_by(&drafts, |d| d.department.as_str()),
        vec![("-".to_owned(), 1), ("CS".to_owned(), 1), ("EE".to_owned(), 1)]
    );
    assert_eq!(total_budget(&drafts), 300);
    assert_eq!(total_teams(&drafts), 6);
}
