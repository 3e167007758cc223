use super::LoadedRows;
use crate::error::FormatError;
use crate::model::RawRow;
use csv::{ReaderBuilder, StringRecord};
use tracing::{trace, warn};

fn clean_field(field: &str) -> String {
    let field = field.trim();
    let field = field.strip_prefix('"').unwrap_or(field);
    let field = field.strip_suffix('"').unwrap_or(field);
    field.trim().to_owned()
}

fn split_line(line: &str) -> Result<Vec<String>, FormatError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record.iter().map(clean_field).collect())
}

/// Read comma-separated text whose first non-blank line is the header.
///
/// Each line is split on its own, so a malformed line only costs its own row.
/// Blank lines are ignored, and lines whose field count differs from the
/// header are skipped. Text without any data line yields no rows.
pub fn read_rows(text: &str) -> Result<LoadedRows, FormatError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line));
    let Some((_, header)) = lines.next() else {
        return Ok(LoadedRows::default());
    };
    let headers = split_line(header)?;
    let mut loaded = LoadedRows::default();
    for (line, content) in lines {
        let fields = split_line(content)?;
        if fields.len() != headers.len() {
            warn!(
                line,
                fields = fields.len(),
                expected = headers.len(),
                "skipping row with mismatched column count"
            );
            loaded.mismatched += 1;
            continue;
        }
        trace!(line, "read row");
        loaded.rows.push(RawRow::from_pairs(
            headers.iter().map(String::as_str).zip(fields),
        ));
    }
    if loaded.rows.is_empty() && loaded.mismatched == 0 {
        return Ok(LoadedRows::default());
    }
    loaded.headers = headers;
    Ok(loaded)
}
