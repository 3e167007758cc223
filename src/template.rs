use crate::model::Column;
use std::io::Write;

const SAMPLE: [&str; 12] = [
    "AI Chatbot",
    "Build a course assistant chatbot",
    "ai",
    "Collect FAQs; Train intent model",
    "Intermediate",
    "Python; Flask",
    "2",
    "supervisor@university.edu",
    "cosupervisor@university.edu",
    "CS",
    "500",
    "Python basics",
];

/// Write a CSV template: the recognised header row and one sample row.
pub fn write_template<W: Write>(writer: W) -> Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);
    writer.write_record(Column::ALL.iter().map(|c| c.header()))?;
    writer.write_record(SAMPLE)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::read_delimited;
    use crate::parser::{ParserOptions, parse_rows};

    #[test]
    fn template_parses_to_one_complete_draft() {
        let mut buffer = Vec::new();
        write_template(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let report = parse_rows(&read_delimited(&text).unwrap(), &ParserOptions::default());
        assert!(report.missing_columns.is_empty());
        assert_eq!(report.drafts.len(), 1);
        let draft = &report.drafts[0];
        assert_eq!(draft.title, "AI Chatbot");
        assert_eq!(draft.technologies, vec!["Python", "Flask"]);
        assert_eq!((draft.max_teams, draft.budget), (2, 500));
    }
}
