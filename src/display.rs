use crate::model::{BucketMetadata, ProjectDraft};
use crate::parser::ParseReport;
use crate::stats;
use std::ops::Range;

pub fn display_report(report: &ParseReport) {
    println!(
        "Projects parsed/dropped: {}/{}",
        report.drafts.len(),
        report.dropped()
    );
    if report.skipped > 0 {
        println!("  - {} rows missing required fields", report.skipped);
    }
    if report.mismatched > 0 {
        println!("  - {} rows with a wrong number of columns", report.mismatched);
    }
    if report.unrecognized_difficulty > 0 {
        println!(
            "Projects with an unrecognized difficulty: {}",
            report.unrecognized_difficulty
        );
    }
    if !report.missing_columns.is_empty() {
        println!("Missing columns:");
        for column in &report.missing_columns {
            println!("  - {column}");
        }
    }
    if !report.unknown_columns.is_empty() {
        println!("Ignored columns:");
        for column in &report.unknown_columns {
            println!("  - {column}");
        }
    }
}

pub fn display_stats(drafts: &[ProjectDraft]) {
    println!("By difficulty:");
    for (difficulty, n) in stats::count_by(drafts, |d| d.difficulty.as_str()) {
        println!("  - {difficulty}: {n}");
    }
    println!("By department:");
    for (department, n) in stats::count_by(drafts, |d| d.department.as_str()) {
        println!("  - {department}: {n}");
    }
    println!(
        "Teams available: {}, total budget: {}",
        stats::total_teams(drafts),
        stats::total_budget(drafts)
    );
}

/// Index range of page `page` (starting at 1), if that page exists.
pub fn page_bounds(len: usize, page: usize, page_size: usize) -> Option<Range<usize>> {
    if page == 0 || page_size == 0 {
        return None;
    }
    let start = (page - 1).checked_mul(page_size)?;
    if start >= len {
        return None;
    }
    Some(start..len.min(start + page_size))
}

pub fn display_page(drafts: &[ProjectDraft], page: usize, page_size: usize) {
    let pages = drafts.len().div_ceil(page_size.max(1));
    let Some(bounds) = page_bounds(drafts.len(), page, page_size) else {
        println!("Page {page} is empty ({pages} pages)");
        return;
    };
    println!("Page {page}/{pages}:");
    for (n, d) in drafts[bounds.clone()].iter().enumerate() {
        println!("{}. {} [{}]", bounds.start + n + 1, d.title, d.difficulty);
        println!("   supervisor: {}", d.supervisor_email);
        if !d.co_supervisor_email.is_empty() {
            println!("   co-supervisor: {}", d.co_supervisor_email);
        }
        if !d.technologies.is_empty() {
            println!("   technologies: {}", d.technologies.join(", "));
        }
        println!("   teams: {}, budget: {}", d.max_teams, d.budget);
    }
}

pub fn display_bucket(metadata: &BucketMetadata) {
    println!(
        "Bucket {} ({}{})",
        metadata.version_name,
        metadata.semester,
        if metadata.department.is_empty() {
            String::new()
        } else {
            format!(", {}", metadata.department)
        }
    );
    if !metadata.tags.is_empty() {
        println!(
            "  tags: {}",
            metadata.tags.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }
    if let (Some(min), Some(max)) = (metadata.min_team_size, metadata.max_team_size) {
        println!("  team size: {min}-{max}");
    }
}

#[test]
fn test_page_bounds() {
    assert_eq!(page_bounds(25, 1, 10), Some(0..10));
    assert_eq!(page_bounds(25, 3, 10), Some(20..25));
    assert_eq!(page_bounds(25, 4, 10), None);
    assert_eq!(page_bounds(25, 0, 10), None);
    assert_eq!(page_bounds(0, 1, 10), None);
    assert_eq!(page_bounds(5, 1, 0), None);
}
