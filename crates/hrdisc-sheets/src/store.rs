//! The worksheet store abstraction

use crate::error::SheetsResult;

/// A spreadsheet document made of named worksheets.
///
/// Row 1 of every worksheet is the header; data rows follow. Row numbers
/// passed to [`SheetStore::update_row`] are 1-based sheet rows, so data row
/// `i` (0-based) lives at sheet row `i + 2`.
pub trait SheetStore {
    /// Titles of all worksheets, in tab order
    fn worksheet_titles(&mut self) -> SheetsResult<Vec<String>>;

    /// Every cell of a worksheet, row by row (header included)
    fn read_values(&mut self, title: &str) -> SheetsResult<Vec<Vec<String>>>;

    /// Append one row after the last non-empty row
    fn append_row(&mut self, title: &str, row: &[String]) -> SheetsResult<()>;

    /// Overwrite the cells of one sheet row, starting at column A
    fn update_row(&mut self, title: &str, row_number: usize, row: &[String]) -> SheetsResult<()>;

    /// Create an empty worksheet
    fn add_worksheet(&mut self, title: &str) -> SheetsResult<()>;

    /// Delete a worksheet and everything in it.
    ///
    /// A document always keeps at least one worksheet; deleting the last one
    /// fails.
    fn delete_worksheet(&mut self, title: &str) -> SheetsResult<()>;

    /// Give a worksheet a new title
    fn rename_worksheet(&mut self, from: &str, to: &str) -> SheetsResult<()>;

    /// Write rows starting at A1
    fn write_values(&mut self, title: &str, rows: &[Vec<String>]) -> SheetsResult<()>;

    /// Browser link to the document, when there is one
    fn document_url(&self) -> Option<String> {
        None
    }
}

impl<S: SheetStore + ?Sized> SheetStore for Box<S> {
    fn worksheet_titles(&mut self) -> SheetsResult<Vec<String>> {
        (**self).worksheet_titles()
    }

    fn read_values(&mut self, title: &str) -> SheetsResult<Vec<Vec<String>>> {
        (**self).read_values(title)
    }

    fn append_row(&mut self, title: &str, row: &[String]) -> SheetsResult<()> {
        (**self).append_row(title, row)
    }

    fn update_row(&mut self, title: &str, row_number: usize, row: &[String]) -> SheetsResult<()> {
        (**self).update_row(title, row_number, row)
    }

    fn add_worksheet(&mut self, title: &str) -> SheetsResult<()> {
        (**self).add_worksheet(title)
    }

    fn delete_worksheet(&mut self, title: &str) -> SheetsResult<()> {
        (**self).delete_worksheet(title)
    }

    fn rename_worksheet(&mut self, from: &str, to: &str) -> SheetsResult<()> {
        (**self).rename_worksheet(from, to)
    }

    fn write_values(&mut self, title: &str, rows: &[Vec<String>]) -> SheetsResult<()> {
        (**self).write_values(title, rows)
    }

    fn document_url(&self) -> Option<String> {
        (**self).document_url()
    }
}

/// Column letters for a 1-based column number (1 -> "A", 27 -> "AA")
pub fn column_letters(mut col: usize) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// A1 range covering `width` cells of one sheet row
pub fn row_range(row_number: usize, width: usize) -> String {
    let last = column_letters(width.max(1));
    format!("A{row_number}:{last}{row_number}")
}

/// Quote a worksheet title for use in an A1 range
pub fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}
