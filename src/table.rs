// src/table.rs

use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::io::{Read, Write};

use crate::error::TableError;

/// An ordered, string-typed table: one header row plus data rows that all
/// share the header's width. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RecordTable {
    pub fn new(header: Vec<String>) -> Self {
        Self {
            header,
            rows: Vec::new(),
        }
    }

    /// Build a table, rejecting any row whose width differs from the header.
    pub fn from_rows(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let mut table = Self::new(header);
        table.rows.reserve(rows.len());
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), TableError> {
        if row.len() != self.header.len() {
            return Err(TableError::RowWidth {
                row: self.rows.len(),
                expected: self.header.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append all rows of `other` in order.
    ///
    /// A header-less table is compatible with anything; the first non-empty
    /// header wins when `self` has none yet.
    pub fn append(&mut self, other: RecordTable) -> Result<(), TableError> {
        if other.header.is_empty() {
            return Ok(());
        }
        if self.header.is_empty() {
            self.header = other.header;
            self.rows = other.rows;
            return Ok(());
        }
        if self.header != other.header {
            return Err(TableError::HeaderMismatch {
                expected: self.header.clone(),
                found: other.header,
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.header, self.rows)
    }

    /// Parse tab-separated text with a header row. An empty input yields an
    /// empty, header-less table.
    pub fn read_tsv<R: Read>(reader: R) -> csv::Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);

        let header: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if header.iter().all(|h| h.is_empty()) {
            return Ok(Self::default());
        }

        let mut rows = Vec::new();
        let mut record = StringRecord::new();
        while rdr.read_record(&mut record)? {
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { header, rows })
    }

    /// Write as tab-separated text: header row, one line per row, no index.
    pub fn write_tsv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = WriterBuilder::new().delimiter(b'\t').from_writer(writer);
        wtr.write_record(&self.header)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
