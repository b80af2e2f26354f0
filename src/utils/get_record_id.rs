use surrealdb::RecordId;

use crate::errors::{Error, Result};

/// Parses the `table:key` text form handed out to clients. Keys the provider
/// escaped with angle brackets are unwrapped first.
pub fn get_record_id_from_string(val: &str) -> Result<RecordId> {
    let mut id_part = val.trim().splitn(2, ':');
    let table = id_part
        .next()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::InvalidRecordId(val.to_string()))?;
    let key = id_part
        .next()
        .map(|k| k.trim_start_matches('⟨').trim_end_matches('⟩'))
        .filter(|k| !k.is_empty())
        .ok_or_else(|| Error::InvalidRecordId(val.to_string()))?;
    Ok(RecordId::from_table_key(table, key))
}

/// Like [`get_record_id_from_string`] but also insists on the table.
pub fn get_record_id_in_table(val: &str, table: &str) -> Result<RecordId> {
    let id = get_record_id_from_string(val)?;
    if id.table() != table {
        return Err(Error::InvalidRecordId(val.to_string()));
    }
    Ok(id)
}

/// Compares two `table:key` strings as record ids, so `t:⟨k⟩` and `t:k`
/// are the same record. Unparsable input falls back to plain equality.
pub fn same_record_id(a: &str, b: &str) -> bool {
    match (get_record_id_from_string(a), get_record_id_from_string(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaped_and_plain_keys_are_the_same_record() {
        assert!(same_record_id("notifications:⟨n-1⟩", "notifications:n-1"));
        assert!(!same_record_id("notifications:n-1", "notifications:n-2"));
        assert!(!same_record_id("tasks:n-1", "notifications:n-1"));
    }

    #[test]
    fn parses_table_and_key() {
        let id = get_record_id_from_string("schools:abc123").expect("record id");
        assert_eq!(id.table(), "schools");
    }

    #[test]
    fn rejects_missing_key_or_table() {
        assert!(get_record_id_from_string("schools").is_err());
        assert!(get_record_id_from_string("schools:").is_err());
        assert!(get_record_id_from_string(":abc").is_err());
    }

    #[test]
    fn enforces_expected_table() {
        assert!(get_record_id_in_table("tasks:1x", "tasks").is_ok());
        assert!(get_record_id_in_table("tasks:1x", "schools").is_err());
    }
}
