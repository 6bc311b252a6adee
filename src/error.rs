// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

use crate::table::RecordTable;

/// Failure of a single page request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected http status: {status}, body: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A retrieval that stopped before the result set was exhausted.
///
/// `partial` holds every row received before the failing page. It is
/// incomplete and must not be treated as the result set.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("{query} retrieval aborted at offset {offset} after {pages} page(s): {source}")]
    Partial {
        query: String,
        offset: usize,
        pages: usize,
        partial: RecordTable,
        #[source]
        source: FetchError,
    },
}

impl RetrievalError {
    pub fn partial(&self) -> &RecordTable {
        match self {
            RetrievalError::Partial { partial, .. } => partial,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("tsv error on {path}: {source}")]
    Tsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("metadata error on {path}: {source}")]
    Meta {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregateError {
    #[error("column `{0}` not present in table")]
    MissingColumn(String),
    #[error("row {row}: submissions `{value}` is not a count")]
    InvalidCount { row: usize, value: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("header mismatch: expected {expected:?}, found {found:?}")]
    HeaderMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("row {row} has {found} cells, header has {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}
