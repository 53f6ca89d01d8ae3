//! Milestone item bank: CSV import and (domain, bracket) lookup for the
//! item browsing path. Scoring never consults the catalog; its divisors
//! come from the configured item-count table.

mod parser;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::workflows::assessment::domain::{DevelopmentalDomain, MilestoneItem};
use crate::workflows::assessment::evaluation::ItemCountTable;
use crate::workflows::assessment::schedule::BracketSchedule;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read item bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid item bank data: {0}")]
    Csv(#[from] csv::Error),
    #[error("item {item_id}: unknown domain sort code {sort}")]
    UnknownDomain { item_id: u32, sort: u32 },
}

/// Read-only milestone item bank keyed by (domain, bracket).
#[derive(Debug, Default, Clone)]
pub struct ItemCatalog {
    items: BTreeMap<(DevelopmentalDomain, u32), Vec<MilestoneItem>>,
}

impl ItemCatalog {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for item in parser::parse_items(reader)? {
            catalog
                .items
                .entry((item.domain, item.month_age))
                .or_default()
                .push(item);
        }
        for cell in catalog.items.values_mut() {
            cell.sort_by_key(|item| item.item_id);
        }
        Ok(catalog)
    }

    /// Items for one (domain, bracket) cell, in item-id order. Unknown
    /// cells are empty, not errors; the browsing path treats them as "no
    /// items published here".
    pub fn items(&self, domain: DevelopmentalDomain, bracket: u32) -> &[MilestoneItem] {
        self.items
            .get(&(domain, bracket))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.items.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Divisor table derived from the loaded bank, aligned to `schedule`.
    pub fn item_counts(&self, schedule: &BracketSchedule) -> ItemCountTable {
        let counts = DevelopmentalDomain::ALL.map(|domain| {
            schedule
                .months()
                .iter()
                .map(|&month| self.items(domain, month).len() as u32)
                .collect()
        });
        ItemCountTable::new(counts)
    }
}
