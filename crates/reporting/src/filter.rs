use crate::record::NormalizedRecord;

/// Keeps the records whose name or email contains `query`, ignoring case.
///
/// An empty query keeps everything. Order is preserved, and filtering an
/// already filtered list with the same query changes nothing.
pub fn filter(records: &[NormalizedRecord], query: &str) -> Vec<NormalizedRecord> {
    if query.is_empty() {
        return records.to_vec();
    }

    let query = query.to_lowercase();
    records
        .iter()
        .filter(|record| matches(record, &query))
        .cloned()
        .collect()
}

/// Checks a single record against an already lowercased query.
fn matches(record: &NormalizedRecord, lowercase_query: &str) -> bool {
    record.name.to_lowercase().contains(lowercase_query)
        || record.email.to_lowercase().contains(lowercase_query)
}
