use std::io::Read;

use serde::Deserialize;

use super::CatalogError;
use crate::workflows::assessment::domain::{DevelopmentalDomain, MilestoneItem};

/// Raw row of the item bank export.
#[derive(Debug, Deserialize)]
struct ItemRow {
    item_id: u32,
    name: String,
    method: String,
    pass_criterion: String,
    sort: u32,
    month_age: u32,
}

pub(super) fn parse_items<R: Read>(reader: R) -> Result<Vec<MilestoneItem>, CatalogError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut items = Vec::new();

    for row in csv_reader.deserialize::<ItemRow>() {
        let row = row?;
        let domain = DevelopmentalDomain::from_sort_code(row.sort).ok_or(
            CatalogError::UnknownDomain {
                item_id: row.item_id,
                sort: row.sort,
            },
        )?;
        items.push(MilestoneItem {
            item_id: row.item_id,
            domain,
            month_age: row.month_age,
            name: row.name,
            method: row.method,
            pass_criterion: row.pass_criterion,
        });
    }

    Ok(items)
}
