use super::LoadedRows;
use crate::error::FormatError;
use crate::model::RawRow;
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::info;

/// Read the first sheet of a workbook, using its first row as headers.
pub fn read_rows(bytes: &[u8]) -> Result<LoadedRows, FormatError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let sheets = workbook.sheet_names();
    if sheets.len() > 1 {
        info!(
            used = %sheets[0],
            ignored = sheets.len() - 1,
            "only the first sheet of the workbook is read"
        );
    }
    let range = workbook.worksheet_range_at(0).ok_or(FormatError::NoSheet)??;
    Ok(rows_from_range(&range))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert a sheet range to rows. Blank rows are skipped and blank cells are
/// left out of their row, as if the column were absent.
pub fn rows_from_range(range: &Range<Data>) -> LoadedRows {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return LoadedRows::default();
    };
    let headers = header
        .iter()
        .map(|c| cell_text(c).trim().to_owned())
        .collect::<Vec<_>>();
    let rows = rows
        .filter_map(|cells| {
            let pairs = headers
                .iter()
                .zip(cells)
                .filter(|(h, _)| !h.is_empty())
                .map(|(h, c)| (h.as_str(), cell_text(c)))
                .filter(|(_, v)| !v.is_empty())
                .collect::<Vec<_>>();
            if pairs.is_empty() {
                None
            } else {
                Some(RawRow::from_pairs(pairs))
            }
        })
        .collect::<Vec<_>>();
    LoadedRows {
        headers,
        rows,
        mismatched: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn range(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_owned())
    }

    #[test]
    fn header_row_becomes_keys() {
        let loaded = rows_from_range(&range(&[
            &[s("Project Title"), s("Max Teams"), s("Budget"), s("Notes")],
            &[s("Bot"), Data::Float(2.0), Data::Int(500), s("x")],
            &[Data::Empty, Data::Empty, Data::Empty, Data::Empty],
            &[s("Site"), Data::Empty, Data::Float(12.5), Data::Empty],
        ]));
        assert_eq!(loaded.rows.len(), 2);
        let first = &loaded.rows[0];
        assert_eq!(first.get(Column::Title), Some("Bot"));
        assert_eq!(first.get(Column::MaxTeams), Some("2"));
        assert_eq!(first.get(Column::Budget), Some("500"));
        let second = &loaded.rows[1];
        assert!(!second.contains(Column::MaxTeams));
        assert_eq!(second.get(Column::Budget), Some("12.5"));
    }

    #[test]
    fn empty_sheet_has_no_rows() {
        let loaded = rows_from_range(&Range::<Data>::empty());
        assert_eq!(loaded, LoadedRows::default());
    }

    #[test]
    fn only_the_first_sheet_is_read() {
        let loaded = read_rows(include_bytes!("testdata/two_sheets.xlsx")).unwrap();
        assert_eq!(loaded.headers.last().map(String::as_str), Some("Notes"));
        let titles = loaded
            .rows
            .iter()
            .map(|r| r.get(Column::Title))
            .collect::<Vec<_>>();
        assert_eq!(titles, [Some("AI Bot"), Some("Web Site")]);
        assert_eq!(loaded.rows[0].get(Column::MaxTeams), Some("2"));
        assert!(!loaded.rows[1].contains(Column::MaxTeams));
        assert_eq!(loaded.mismatched, 0);
    }

    #[test]
    fn workbook_without_sheets_is_refused() {
        assert!(matches!(
            read_rows(include_bytes!("testdata/no_sheets.xlsx")),
            Err(FormatError::NoSheet)
        ));
    }

    #[test]
    fn garbage_bytes_are_a_format_error() {
        assert!(matches!(
            read_rows(b"definitely not a workbook"),
            Err(FormatError::Workbook(_))
        ));
    }
}
