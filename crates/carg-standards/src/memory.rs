//! Domain tables held in memory, for embedding and tests.

use std::collections::BTreeMap;

use carg_model::DomainTable;

use crate::domain_cache::{DomainTableSource, TableLoad, table_key};
use crate::error::StandardsError;

#[derive(Debug, Clone, Default)]
pub struct InMemoryDomainTables {
    tables: BTreeMap<String, DomainTable>,
}

impl InMemoryDomainTables {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_table(mut self, name: &str, pairs: &[(&str, &str)]) -> Self {
        let key = table_key(name).to_string();
        let table = DomainTable::from_pairs(key.clone(), pairs.iter().copied());
        self.tables.insert(key, table);
        self
    }
}

impl DomainTableSource for InMemoryDomainTables {
    fn is_available(&self) -> bool {
        true
    }

    fn load_table(&self, name: &str) -> Result<TableLoad, StandardsError> {
        Ok(self
            .tables
            .get(table_key(name))
            .map_or(TableLoad::Missing, |table| TableLoad::Loaded {
                table: table.clone(),
                encoding_repairs: 0,
            }))
    }

    fn describe(&self) -> String {
        format!("in-memory ({} tables)", self.tables.len())
    }
}
