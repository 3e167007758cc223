use crate::error::FormatError;
use crate::model::RawRow;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub use self::delimited::read_rows as read_delimited;
pub use self::spreadsheet::read_rows as read_spreadsheet;

mod delimited;
mod spreadsheet;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum Format {
    /// Comma-separated text, double-quoted fields
    Csv,
    /// Workbook, first sheet only
    Xlsx,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Format, FormatError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" => Ok(Format::Csv),
            "xlsx" => Ok(Format::Xlsx),
            _ => Err(FormatError::Unsupported(path.display().to_string())),
        }
    }
}

/// Rows produced by an adapter, in input order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadedRows {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    /// Lines dropped because their field count differs from the header.
    pub mismatched: usize,
}

/// Load rows from a file, choosing the adapter from the extension unless
/// `format` is given.
pub fn load_file(
    path: &Path,
    format: Option<Format>,
    max_bytes: u64,
) -> Result<LoadedRows, FormatError> {
    let format = match format {
        Some(format) => format,
        None => Format::from_path(path)?,
    };
    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(FormatError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    info!(path = %path.display(), ?format, size, "loading upload");
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    load_bytes(&bytes, format)
}

/// Load pasted delimited text from a reader, enforcing the same size limit
/// as files.
pub fn load_pasted<R: Read>(reader: R, max_bytes: u64) -> Result<LoadedRows, FormatError> {
    let mut text = String::new();
    reader.take(max_bytes + 1).read_to_string(&mut text)?;
    let size = text.len() as u64;
    if size > max_bytes {
        return Err(FormatError::TooLarge {
            size,
            limit: max_bytes,
        });
    }
    debug!(size, "loading pasted text");
    read_delimited(&text)
}

pub fn load_bytes(bytes: &[u8], format: Format) -> Result<LoadedRows, FormatError> {
    match format {
        Format::Csv => {
            let text = std::str::from_utf8(bytes).map_err(|e| {
                FormatError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            })?;
            read_delimited(text)
        }
        Format::Xlsx => read_spreadsheet(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_is_chosen_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.csv")).unwrap(), Format::Csv);
        assert_eq!(Format::from_path(Path::new("A.XLSX")).unwrap(), Format::Xlsx);
        assert!(matches!(
            Format::from_path(Path::new("a.pdf")),
            Err(FormatError::Unsupported(_))
        ));
        assert!(Format::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn pasted_text_above_limit_is_rejected() {
        let text = "Project Title,Description\nA,B\n";
        assert!(matches!(
            load_pasted(text.as_bytes(), 10),
            Err(FormatError::TooLarge { limit: 10, .. })
        ));
        let rows = load_pasted(text.as_bytes(), 1024).unwrap();
        assert_eq!(rows.rows.len(), 1);
    }

    #[test]
    fn oversized_file_is_rejected_before_reading() {
        let path = std::env::temp_dir().join(format!("projingest-{}.csv", std::process::id()));
        std::fs::write(&path, "Project Title\nA very long title\n").unwrap();
        let result = load_file(&path, None, 8);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(FormatError::TooLarge { .. })));
    }

    #[test]
    fn invalid_utf8_is_a_format_error() {
        assert!(matches!(
            load_bytes(&[0xff, 0xfe, 0x00], Format::Csv),
            Err(FormatError::Io(_))
        ));
    }
}
