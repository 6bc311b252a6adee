// src/store.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{error::StoreError, fetch::Retrieval, table::RecordTable};

/// Subdirectory of the working directory holding all tables.
pub const DATA_DIR: &str = "input_data";

/// Sidecar written next to every saved table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableMeta {
    pub name: String,
    pub rows: usize,
    pub columns: Vec<String>,
    /// Number of portal requests, for tables that came straight from a fetch.
    pub pages: Option<usize>,
    pub saved_at: DateTime<Utc>,
}

/// Named TSV tables under `<workdir>/input_data`.
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    /// Open the store under `workdir`, creating the data directory if needed.
    pub fn new(workdir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = workdir.as_ref().join(DATA_DIR);
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.tsv", name))
    }

    fn meta_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.meta.json", name))
    }

    pub fn save(&self, table: &RecordTable, name: &str) -> Result<PathBuf, StoreError> {
        self.save_inner(table, name, None)
    }

    /// Save a fetched result set, recording how many pages it took.
    pub fn save_retrieval(&self, retrieval: &Retrieval, name: &str) -> Result<PathBuf, StoreError> {
        self.save_inner(&retrieval.table, name, Some(retrieval.pages))
    }

    fn save_inner(
        &self,
        table: &RecordTable,
        name: &str,
        pages: Option<usize>,
    ) -> Result<PathBuf, StoreError> {
        let path = self.table_path(name);
        self.write_atomic(&path, |w| {
            table.write_tsv(w).map_err(|source| StoreError::Tsv {
                path: path.clone(),
                source,
            })
        })?;

        let meta = TableMeta {
            name: name.to_string(),
            rows: table.len(),
            columns: table.header().to_vec(),
            pages,
            saved_at: Utc::now(),
        };
        let meta_path = self.meta_path(name);
        self.write_atomic(&meta_path, |w| {
            serde_json::to_writer_pretty(w, &meta).map_err(|source| StoreError::Meta {
                path: meta_path.clone(),
                source,
            })
        })?;

        info!(name, rows = table.len(), path = %path.display(), "saved table");
        Ok(path)
    }

    /// Write to a temp file in the same directory, then rename over `path`,
    /// so a failed write never clobbers the previous file.
    fn write_atomic<F>(&self, path: &Path, write: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BufWriter<&mut File>) -> Result<(), StoreError>,
    {
        let io_err = |source: std::io::Error| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            write(&mut writer)?;
            writer.flush().map_err(io_err)?;
        }
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        debug!(path = %path.display(), "persisted");
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<RecordTable, StoreError> {
        let path = self.table_path(name);
        let file = File::open(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let table = RecordTable::read_tsv(BufReader::new(file)).map_err(|source| {
            StoreError::Tsv {
                path: path.clone(),
                source,
            }
        })?;
        info!(name, rows = table.len(), "loaded table");
        Ok(table)
    }

    pub fn load_meta(&self, name: &str) -> Result<TableMeta, StoreError> {
        let path = self.meta_path(name);
        let file = File::open(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file))
            .map_err(|source| StoreError::Meta { path, source })
    }
}
