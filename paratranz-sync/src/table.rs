//! Comma-separated game tables: named columns, ordered rows.
//!
//! A [`Table`] keeps the named header columns in file order and every [`Row`]
//! as a vector of cells aligned with them, so `row.cells[i]` always belongs to
//! `table.columns[i]` and iterating a row walks the columns in file order.
//! Header cells without a name are left out of `columns`; [`RawLayout`] puts
//! them back when the table is written.
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    encoding::repair_misdecoded,
    error::Error,
    newline,
    report::{Event, Reporter},
};

const BOM: &str = "\u{feff}";

/// One data row. `cells.len()` equals the owning table's column count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    /// Value of the first column, which decides whether the row is a comment.
    pub fn first(&self) -> &str {
        self.cells.first().map(String::as_str).unwrap_or_default()
    }

    /// Empty rows and `#` comment rows carry no translatable data.
    pub fn is_blank_or_comment(&self) -> bool {
        let first = self.first();
        first.is_empty() || first.starts_with('#')
    }
}

/// A parsed table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    /// Named header columns, in file order, without duplicates.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Reads and parses the table at `path`.
    pub fn read_from<P: AsRef<Path>>(path: P, reporter: &dyn Reporter) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Self::parse(&path.display().to_string(), &bytes, reporter)
    }

    /// Parses raw file bytes. `file` only labels warnings and errors.
    ///
    /// - stray Windows-1252 punctuation is repaired, a BOM is dropped;
    /// - escaped newlines become [`newline::MARKER`], CR LF inside fields becomes LF;
    /// - short rows are padded with empty cells, long rows truncated, each
    ///   reported once as [`Event::RaggedRow`].
    pub fn parse(file: &str, bytes: &[u8], reporter: &dyn Reporter) -> Result<Self, Error> {
        let repaired = repair_misdecoded(bytes);
        if repaired.unknown > 0 {
            reporter.report(Event::UndecodableBytes {
                file: file.to_string(),
                count: repaired.unknown,
            });
        }
        let text = repaired.text.strip_prefix(BOM).unwrap_or(&repaired.text);
        let text = newline::to_marker(text);

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let mut records = rdr.records();

        let header = match records.next() {
            Some(header) => header.map_err(Error::CsvParse)?,
            None => return Err(Error::MissingHeader(file.to_string())),
        };

        let mut columns: Vec<String> = Vec::new();
        let mut positions = Vec::new();
        for (position, name) in header.iter().enumerate() {
            if !name.is_empty() && !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
                positions.push(position);
            }
        }

        let mut rows = Vec::new();
        for (i, record) in records.enumerate() {
            let record = record.map_err(Error::CsvParse)?;
            if record.len() != header.len() {
                reporter.report(Event::RaggedRow {
                    file: file.to_string(),
                    row: i + 1,
                    id: record.get(0).unwrap_or_default().to_string(),
                    expected: header.len(),
                    found: record.len(),
                });
            }

            let cells = positions
                .iter()
                .map(|&p| {
                    record
                        .get(p)
                        .map(newline::normalize_line_breaks)
                        .unwrap_or_default()
                })
                .collect();
            rows.push(Row { cells });
        }

        Ok(Table { columns, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell of `row` in column `name`.
    pub fn value(&self, row: usize, name: &str) -> Option<&str> {
        let column = self.column_index(name)?;
        self.rows.get(row)?.cells.get(column).map(String::as_str)
    }

    /// `(column, cell)` pairs of `row`, in column order.
    pub fn pairs(&self, row: usize) -> Vec<(&str, &str)> {
        self.rows
            .get(row)
            .map(|r| {
                self.columns
                    .iter()
                    .map(String::as_str)
                    .zip(r.cells.iter().map(String::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Writes the table against an on-disk layout.
    ///
    /// Each named column goes to its first position in `layout.header`; the
    /// remaining positions are left empty. Cells pass through
    /// [`newline::to_file`].
    pub fn to_writer<W: Write>(&self, mut writer: W, layout: &RawLayout) -> Result<(), Error> {
        let mut positions = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let position = layout
                .header
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| Error::MissingColumn {
                    file: layout.file.clone(),
                    column: column.clone(),
                    available: format!("{:?}", layout.header),
                })?;
            positions.push(position);
        }

        if layout.bom {
            writer.write_all(BOM.as_bytes())?;
        }

        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(layout.line_ending.terminator())
            .from_writer(writer);

        wtr.write_record(&layout.header).map_err(Error::CsvParse)?;
        for row in &self.rows {
            let mut record = vec![String::new(); layout.header.len()];
            for (cell, &position) in row.cells.iter().zip(&positions) {
                record[position] = newline::to_file(cell);
            }
            wtr.write_record(&record).map_err(Error::CsvParse)?;
        }

        wtr.flush().map_err(Error::Io)?;
        Ok(())
    }

    /// Writes the table to `path` using [`Table::to_writer`].
    pub fn write_to<P: AsRef<Path>>(&self, path: P, layout: &RawLayout) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer, layout)?;
        writer.flush()?;
        Ok(())
    }
}

/// Record terminator found in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    CrLf,
    Lf,
}

impl LineEnding {
    fn detect(bytes: &[u8]) -> Self {
        match bytes.iter().position(|&b| b == b'\n') {
            Some(i) if i > 0 && bytes[i - 1] == b'\r' => LineEnding::CrLf,
            Some(_) => LineEnding::Lf,
            None => LineEnding::CrLf,
        }
    }

    fn terminator(self) -> csv::Terminator {
        match self {
            LineEnding::CrLf => csv::Terminator::CRLF,
            LineEnding::Lf => csv::Terminator::Any(b'\n'),
        }
    }
}

/// The header of a file exactly as stored on disk, unnamed columns included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLayout {
    /// Label used in errors.
    pub file: String,
    pub header: Vec<String>,
    pub bom: bool,
    pub line_ending: LineEnding,
}

impl RawLayout {
    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&path.display().to_string(), &bytes)
    }

    pub fn from_bytes(file: &str, bytes: &[u8]) -> Result<Self, Error> {
        let repaired = repair_misdecoded(bytes);
        let bom = repaired.text.starts_with(BOM);
        let text = repaired.text.strip_prefix(BOM).unwrap_or(&repaired.text);

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());
        let header = match rdr.records().next() {
            Some(header) => header.map_err(Error::CsvParse)?,
            None => return Err(Error::MissingHeader(file.to_string())),
        };

        Ok(RawLayout {
            file: file.to_string(),
            header: header.iter().map(str::to_string).collect(),
            bom,
            line_ending: LineEnding::detect(bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingReporter;
    use indoc::indoc;

    fn parse(text: &str) -> (Table, CollectingReporter) {
        let reporter = CollectingReporter::new();
        let table = Table::parse("test.csv", text.as_bytes(), &reporter).unwrap();
        (table, reporter)
    }

    fn write(table: &Table, source: &str) -> String {
        let layout = RawLayout::from_bytes("test.csv", source.as_bytes()).unwrap();
        let mut out = Vec::new();
        table.to_writer(&mut out, &layout).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_simple_table() {
        let (table, reporter) = parse(indoc! {"
            id,name,text
            a,Alpha,Hello
            b,Beta,Bye
        "});
        assert_eq!(table.columns, vec!["id", "name", "text"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.value(1, "text"), Some("Bye"));
        assert!(reporter.events().is_empty());
    }

    #[test]
    fn test_pairs_follow_column_order() {
        let (table, _) = parse("z,a,m\n1,2,3\n");
        assert_eq!(table.pairs(0), vec![("z", "1"), ("a", "2"), ("m", "3")]);
    }

    #[test]
    fn test_escaped_newline_becomes_marker() {
        let (table, _) = parse("id,text\na,One\\nTwo\n");
        assert_eq!(table.value(0, "text"), Some("One^nTwo"));
    }

    #[test]
    fn test_quoted_multiline_field() {
        let (table, _) = parse("id,text\r\na,\"One\r\nTwo\"\r\n");
        assert_eq!(table.value(0, "text"), Some("One\nTwo"));
    }

    #[test]
    fn test_ragged_row_is_padded() {
        let (table, reporter) = parse("id,name,text\na,Alpha\nb,Beta,Bye\n");
        assert_eq!(table.rows[0].cells, vec!["a", "Alpha", ""]);
        assert_eq!(table.rows.len(), 2);

        let ragged = reporter.of_kind("ragged_row");
        assert_eq!(ragged.len(), 1);
        assert_eq!(
            ragged[0],
            Event::RaggedRow {
                file: "test.csv".to_string(),
                row: 1,
                id: "a".to_string(),
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn test_unnamed_columns_are_dropped() {
        let (table, _) = parse("id,,text,\na,x,Hello,y\n");
        assert_eq!(table.columns, vec!["id", "text"]);
        assert_eq!(table.rows[0].cells, vec!["a", "Hello"]);
    }

    #[test]
    fn test_comment_and_blank_rows() {
        let (table, _) = parse("id,text\n#a,commented\n,empty id\nb,kept\n");
        assert!(table.rows[0].is_blank_or_comment());
        assert!(table.rows[1].is_blank_or_comment());
        assert!(!table.rows[2].is_blank_or_comment());
    }

    #[test]
    fn test_misdecoded_quotes_inside_quoted_field() {
        let reporter = CollectingReporter::new();
        let table = Table::parse(
            "test.csv",
            b"id,text\na,\"He said \x93hi\x94\"\n",
            &reporter,
        )
        .unwrap();
        assert_eq!(table.value(0, "text"), Some("He said \"hi\""));
        assert!(reporter.events().is_empty());
    }

    #[test]
    fn test_undecodable_byte_is_reported() {
        let reporter = CollectingReporter::new();
        let table = Table::parse("test.csv", b"id,text\na,x\xffy\n", &reporter).unwrap();
        assert_eq!(table.value(0, "text"), Some("x\u{FFFD}y"));
        assert_eq!(
            reporter.of_kind("undecodable_bytes"),
            vec![Event::UndecodableBytes {
                file: "test.csv".to_string(),
                count: 1,
            }]
        );
        assert_eq!(reporter.events().len(), 1);
    }

    #[test]
    fn test_bom_is_stripped() {
        let (table, _) = parse("\u{feff}id,text\na,b\n");
        assert_eq!(table.columns[0], "id");
    }

    #[test]
    fn test_empty_file_has_no_header() {
        let reporter = CollectingReporter::new();
        let result = Table::parse("empty.csv", b"", &reporter);
        assert!(matches!(result, Err(Error::MissingHeader(_))));
    }

    #[test]
    fn test_write_restores_unnamed_columns() {
        let source = "id,,text,\r\na,,Hello,\r\n";
        let (table, _) = parse(source);
        assert_eq!(write(&table, source), source);
    }

    #[test]
    fn test_write_restores_newline_encodings() {
        let source = "id,text\na,\"One\\nTwo\"\n";
        let (mut table, _) = parse(source);
        table.rows[0].cells[1] = "One^nTwo\nThree".to_string();
        assert_eq!(write(&table, source), "id,text\na,\"One\\nTwo\r\nThree\"\n");
    }

    #[test]
    fn test_write_keeps_bom_and_line_ending() {
        let source = "\u{feff}id,text\na,b\n";
        let (table, _) = parse(source);
        assert_eq!(write(&table, source), source);
    }

    #[test]
    fn test_raw_layout_detects_crlf() {
        let layout = RawLayout::from_bytes("t.csv", b"id,text\r\na,b\r\n").unwrap();
        assert_eq!(layout.line_ending, LineEnding::CrLf);
        assert_eq!(layout.header, vec!["id", "text"]);
        assert!(!layout.bom);
    }
}
