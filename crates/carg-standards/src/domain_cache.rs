//! Run-scoped cache of domain tables.
//!
//! Each table is read at most once per run. Population happens under the
//! write lock after a second lookup, so concurrent first use of one name
//! still performs a single read; later lookups only take the read lock.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use carg_model::{DomainTable, FieldValue};
use tracing::{debug, warn};

use crate::error::StandardsError;

/// Result of asking a source for one table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableLoad {
    Loaded {
        table: DomainTable,
        /// Cells whose bytes were not valid UTF-8 and were repaired.
        encoding_repairs: usize,
    },
    Missing,
}

/// Where domain tables come from.
pub trait DomainTableSource: Send + Sync {
    /// Whether the table collection exists at all.
    fn is_available(&self) -> bool;

    fn load_table(&self, name: &str) -> Result<TableLoad, StandardsError>;

    /// Human readable location for logs and summaries.
    fn describe(&self) -> String;
}

/// Value used when a code cannot be translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fallback {
    #[default]
    Empty,
    RawCode,
}

/// Counters surfaced in the run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub loads: usize,
    pub tables_loaded: usize,
    pub missing_tables: Vec<String>,
    pub unmapped_codes: usize,
    pub encoding_repairs: usize,
}

type Slot = Option<Arc<DomainTable>>;

pub struct DomainTableCache {
    source: Box<dyn DomainTableSource>,
    tables: RwLock<BTreeMap<String, Slot>>,
    loads: AtomicUsize,
    unmapped_codes: AtomicUsize,
    encoding_repairs: AtomicUsize,
}

impl DomainTableCache {
    pub fn new(source: impl DomainTableSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            tables: RwLock::new(BTreeMap::new()),
            loads: AtomicUsize::new(0),
            unmapped_codes: AtomicUsize::new(0),
            encoding_repairs: AtomicUsize::new(0),
        }
    }

    pub fn is_available(&self) -> bool {
        self.source.is_available()
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }

    /// Returns the named table, reading it on first use.
    ///
    /// `None` means the table is missing; that outcome is cached too.
    pub fn load(&self, name: &str) -> Option<Arc<DomainTable>> {
        let key = table_key(name);
        if let Some(slot) = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
        {
            return slot.clone();
        }

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = tables.get(key) {
            return slot.clone();
        }
        let slot = self.read_table(key);
        tables.insert(key.to_string(), slot.clone());
        slot
    }

    /// Translates `code`, returning empty text when it cannot.
    pub fn resolve(&self, table: &str, code: &FieldValue) -> String {
        self.resolve_with(table, code, Fallback::Empty)
    }

    pub fn resolve_with(&self, table: &str, code: &FieldValue, fallback: Fallback) -> String {
        let fallback_text = || match fallback {
            Fallback::Empty => String::new(),
            Fallback::RawCode => code.as_text().trim().to_string(),
        };
        let Some(domain) = self.load(table) else {
            return fallback_text();
        };
        match domain.lookup(code) {
            Some(text) => text.to_string(),
            None => {
                if !code.is_blank() {
                    self.unmapped_codes.fetch_add(1, Ordering::Relaxed);
                    debug!(table = %table_key(table), code = %code, "unmapped domain code");
                }
                fallback_text()
            }
        }
    }

    /// Names of tables found missing so far, sorted.
    pub fn missing_tables(&self) -> Vec<String> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(_, slot)| slot.is_none())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Number of reads issued to the underlying source.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn stats(&self) -> CacheStats {
        let missing_tables = self.missing_tables();
        let tables_loaded = self
            .tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.is_some())
            .count();
        CacheStats {
            loads: self.load_count(),
            tables_loaded,
            missing_tables,
            unmapped_codes: self.unmapped_codes.load(Ordering::Relaxed),
            encoding_repairs: self.encoding_repairs.load(Ordering::Relaxed),
        }
    }

    fn read_table(&self, name: &str) -> Slot {
        self.loads.fetch_add(1, Ordering::Relaxed);
        match self.source.load_table(name) {
            Ok(TableLoad::Loaded {
                table,
                encoding_repairs,
            }) => {
                if encoding_repairs > 0 {
                    self.encoding_repairs
                        .fetch_add(encoding_repairs, Ordering::Relaxed);
                    warn!(table = %name, encoding_repairs, "repaired invalid characters in domain table");
                }
                debug!(table = %name, entries = table.len(), "domain table loaded");
                Some(Arc::new(table))
            }
            Ok(TableLoad::Missing) => {
                warn!(table = %name, "domain table missing; dependent fields use the fallback value");
                None
            }
            Err(error) => {
                warn!(table = %name, %error, "domain table unreadable; treating as missing");
                None
            }
        }
    }
}

impl std::fmt::Debug for DomainTableCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainTableCache")
            .field("source", &self.source.describe())
            .field("loads", &self.load_count())
            .finish_non_exhaustive()
    }
}

/// Table names are accepted with or without the `.dbf` / `.csv` suffix.
pub(crate) fn table_key(name: &str) -> &str {
    let name = name.trim();
    [".dbf", ".DBF", ".csv", ".CSV"]
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_key_strips_suffix() {
        assert_eq!(table_key("d_stato.dbf"), "d_stato");
        assert_eq!(table_key("d_stato"), "d_stato");
        assert_eq!(table_key(" d_fase.csv "), "d_fase");
    }
}
