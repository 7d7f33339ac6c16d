use crate::domain::model::{ResolvedTable, Selection};
use std::collections::BTreeSet;

/// Countries present in the table, sorted, without the absent marker.
/// This is the candidate list a user picks a [`Selection`] from.
pub fn distinct_countries(table: &ResolvedTable) -> Vec<String> {
    table
        .records
        .iter()
        .filter_map(|record| record.country.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Rows whose country is in `selection`, in their original order.
///
/// An empty selection applies no filter and returns every row. Rows without
/// a country only survive that case.
pub fn apply_selection(table: &ResolvedTable, selection: &Selection) -> ResolvedTable {
    if selection.is_empty() {
        return table.clone();
    }

    let records = table
        .records
        .iter()
        .filter(|record| {
            record
                .country
                .as_deref()
                .is_some_and(|country| selection.contains(country))
        })
        .cloned()
        .collect();

    ResolvedTable {
        headers: table.headers.clone(),
        records,
    }
}
