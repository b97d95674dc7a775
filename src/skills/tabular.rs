//! Delimited-text reader for catalog files.
//!
//! Handles the subset of CSV the catalog export produces: comma separators,
//! `"` quoting with `""` escapes, and LF/CRLF/CR line endings.

/// One data row with its source line number (header is line 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub line: usize,
    pub cells: Vec<String>,
}

/// A header row plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Build a table from already split cells. Used by tests and callers that
    /// obtain rows from somewhere other than a CSV file.
    pub fn from_rows<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let headers = headers.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(idx, cells)| TableRow {
                line: idx + 2,
                cells: cells.into_iter().map(Into::into).collect(),
            })
            .collect();
        Self { headers, rows }
    }

    /// Position of the first header matching any of `names`.
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
    }
}

/// Parse CSV text into a [`Table`].
///
/// Returns `None` when the text has no non-blank line to use as a header.
pub fn parse_table(text: &str) -> Option<Table> {
    let mut records = split_records(text)
        .into_iter()
        .filter(|(_, cells)| !is_blank(cells));

    let (_, headers) = records.next()?;
    let rows = records
        .map(|(line, cells)| TableRow { line, cells })
        .collect();

    Some(Table { headers, rows })
}

fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|c| c.is_empty())
}

/// Split text into records of trimmed cells, each tagged with its 1-based
/// starting line.
fn split_records(text: &str) -> Vec<(usize, Vec<String>)> {
    let mut records = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut row_line = 1;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => row.push(finish_cell(&mut cell)),
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(finish_cell(&mut cell));
                records.push((row_line, std::mem::take(&mut row)));
                line += 1;
                row_line = line;
            }
            _ => {
                if ch == '\n' {
                    line += 1;
                }
                cell.push(ch);
            }
        }
    }

    if !cell.is_empty() || !row.is_empty() {
        row.push(finish_cell(&mut cell));
        records.push((row_line, row));
    }

    records
}

fn finish_cell(cell: &mut String) -> String {
    let value = std::mem::take(cell);
    value.trim().to_string()
}
