use super::domain::VillageRecord;

pub const SEARCH_LIMIT: usize = 10;

/// Villages whose name contains `query`, ignoring case, in snapshot order.
pub fn search<'a>(records: &'a [VillageRecord], query: &str) -> Vec<&'a VillageRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| record.name.to_lowercase().contains(&needle))
        .take(SEARCH_LIMIT)
        .collect()
}
