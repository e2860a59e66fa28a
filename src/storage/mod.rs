use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::error::HistoryError;
use crate::resolver::Resolver;

use self::config::HistoryConfig;
use self::data::HistoryDocumentRef;
use self::data::ProfileType;
use self::data::RenameRecord;
use self::data::now_timestamp;
use self::data::document_entries;
use self::data::record_from_value;

pub mod config;
pub mod data;


/// Outcome of reading the history file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub file_present: bool,
    pub loaded: usize,
    pub skipped: usize,
}


/// Append-only log of preset renames mirrored to a JSON file.
///
/// One instance per running application, built once and handed to whoever
/// records or resolves renames. Not synchronized: callers share it from a
/// single thread.
#[derive(Debug)]
pub struct RenameHistoryStore {
    path: Option<PathBuf>,
    entries: Vec<RenameRecord>,
    resolver: Resolver,
}


impl RenameHistoryStore {

    /// Open the history at `config.path`. A missing, unreadable or corrupt
    /// file gives an empty history.
    pub fn open(config: &HistoryConfig) -> Self {
        let mut store = Self {
            path: Some(config.path.clone()),
            entries: Vec::new(),
            resolver: Resolver::new(config.max_resolve_depth),
        };
        match store.load() {
            Ok(report) => {
                tracing::debug!("rename history loaded @{:?}: {:?}", config.path, report);
            }
            Err(e) => {
                tracing::warn!("rename history ignored: {}", e);
            }
        }
        store
    }

    /// History with no backing file; nothing is ever written.
    pub fn in_memory(max_resolve_depth: usize) -> Self {
        Self {
            path: None,
            entries: Vec::new(),
            resolver: Resolver::new(max_resolve_depth),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Re-read the backing file, replacing the in-memory history.
    pub fn reload(&mut self) -> Result<LoadReport, HistoryError> {
        self.load()
    }

    fn load(&mut self) -> Result<LoadReport, HistoryError> {
        self.entries.clear();
        let mut report = LoadReport::default();
        let Some(path) = self.path.as_deref() else {
            return Ok(report);
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| HistoryError::io(dir, e))?;
        }
        let ifile = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(report),
            Err(e) => return Err(HistoryError::io(path, e)),
        };
        report.file_present = true;
        let document: serde_json::Value = serde_json::from_reader(BufReader::new(ifile))
            .map_err(|e| HistoryError::json(path, e))?;
        for value in document_entries(document) {
            match record_from_value(value) {
                Some(record) => self.entries.push(record),
                None => report.skipped += 1,
            }
        }
        report.loaded = self.entries.len();
        if report.skipped > 0 {
            tracing::warn!("skipped {} malformed rename records @{:?}", report.skipped, path);
        }
        Ok(report)
    }

    /// Rewrite the whole backing file from memory.
    pub fn save(&self) -> Result<(), HistoryError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| HistoryError::io(dir, e))?;
        }
        let ofile = File::create(path).map_err(|e| HistoryError::io(path, e))?;
        let mut writer = BufWriter::new(ofile);
        let document = HistoryDocumentRef { entries: self.entries.as_slice() };
        serde_json::to_writer_pretty(&mut writer, &document).map_err(|e| HistoryError::json(path, e))?;
        writer.flush().map_err(|e| HistoryError::io(path, e))?;
        tracing::debug!("rename history saved @{:?} ({} records)", path, self.entries.len());
        Ok(())
    }

    /// Record that a `profile_type` preset went from `old_name` to `new_name`
    /// and persist the history right away.
    ///
    /// Invalid requests (sentinel type, empty or identical names) are ignored.
    /// A failed write is logged; the record stays in memory.
    pub fn add_entry(&mut self, profile_type: ProfileType, old_name: &str, new_name: &str) {
        let Some(record) = RenameRecord::new(profile_type, old_name, new_name, now_timestamp()) else {
            return;
        };
        tracing::debug!("rename {} {:?} -> {:?}", profile_type, old_name, new_name);
        self.entries.push(record);
        if let Err(e) = self.save() {
            tracing::warn!("rename history not persisted: {}", e);
        }
    }

    /// Every recorded rename, oldest first.
    pub fn entries(&self) -> &[RenameRecord] {
        self.entries.as_slice()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current name of a preset known as `name`, if it has moved.
    pub fn resolve(&self, profile_type: ProfileType, name: &str) -> Option<String> {
        self.resolver.resolve(self.entries.as_slice(), profile_type, name)
    }
}
