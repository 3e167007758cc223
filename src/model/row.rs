use std::collections::BTreeMap;
use std::fmt;

/// Columns recognised in bulk upload files. Any other header is ignored.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Column {
    Title,
    Description,
    Category,
    Objectives,
    Difficulty,
    Technologies,
    MaxTeams,
    SupervisorEmail,
    CoSupervisorEmail,
    Department,
    Budget,
    Prerequisites,
}

impl Column {
    /// All recognised columns, in template order.
    pub const ALL: [Column; 12] = [
        Column::Title,
        Column::Description,
        Column::Category,
        Column::Objectives,
        Column::Difficulty,
        Column::Technologies,
        Column::MaxTeams,
        Column::SupervisorEmail,
        Column::CoSupervisorEmail,
        Column::Department,
        Column::Budget,
        Column::Prerequisites,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Title => "Project Title",
            Column::Description => "Description",
            Column::Category => "Category",
            Column::Objectives => "Objectives",
            Column::Difficulty => "Difficulty",
            Column::Technologies => "Technologies",
            Column::MaxTeams => "Max Teams",
            Column::SupervisorEmail => "Supervisor Email",
            Column::CoSupervisorEmail => "Co Supervisor Email",
            Column::Department => "Department",
            Column::Budget => "Budget",
            Column::Prerequisites => "Prerequisites",
        }
    }

    /// Match a header cell exactly (after trimming).
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        Column::ALL.into_iter().find(|c| c.header() == header)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One input row keyed by recognised column.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawRow {
    cells: BTreeMap<Column, String>,
}

impl RawRow {
    /// Build a row from header/value pairs, silently dropping unknown headers.
    pub fn from_pairs<'a, I>(pairs: I) -> RawRow
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        RawRow {
            cells: pairs
                .into_iter()
                .filter_map(|(h, v)| Column::from_header(h).map(|c| (c, v)))
                .collect(),
        }
    }

    pub fn get(&self, column: Column) -> Option<&str> {
        self.cells.get(&column).map(String::as_str)
    }

    pub fn contains(&self, column: Column) -> bool {
        self.cells.contains_key(&column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_matched_exactly() {
        assert_eq!(Column::from_header("Project Title"), Some(Column::Title));
        assert_eq!(Column::from_header("  Max Teams "), Some(Column::MaxTeams));
        assert_eq!(Column::from_header("project title"), None);
        assert_eq!(Column::from_header("Notes"), None);
    }

    #[test]
    fn unknown_headers_are_dropped() {
        let row = RawRow::from_pairs([
            ("Project Title", "Bot".to_owned()),
            ("Notes", "ignored".to_owned()),
        ]);
        assert_eq!(row.get(Column::Title), Some("Bot"));
        assert!(!row.contains(Column::Description));
        assert_eq!(row, RawRow::from_pairs([("Project Title", "Bot".to_owned())]));
    }
}
