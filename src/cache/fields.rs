//! Field extraction over metadata entries

use std::path::Path;

use crate::cache::entry::MetadataEntry;
use crate::core::error::{MetadataError, Result};

/// Values of one attribute across `entries`, in order.
///
/// Fails with [`MetadataError::UnknownField`] for a name outside
/// [`MetadataEntry::COLUMNS`], even when `entries` is empty.
pub fn extract_field_from_cache_metadata_entries(
    entries: &[MetadataEntry],
    field: &str,
) -> Result<Vec<serde_json::Value>> {
    if !MetadataEntry::COLUMNS.iter().any(|column| *column == field) {
        return Err(MetadataError::UnknownField {
            field: field.to_string(),
        });
    }

    entries
        .iter()
        .map(|entry| {
            let value = serde_json::to_value(entry).map_err(|e| MetadataError::Encode {
                message: e.to_string(),
            })?;
            value
                .get(field)
                .cloned()
                .ok_or_else(|| MetadataError::UnknownField {
                    field: field.to_string(),
                })
        })
        .collect()
}

/// Storage locations of `entries`, in order
pub fn locations(entries: &[MetadataEntry]) -> Vec<&Path> {
    entries.iter().map(MetadataEntry::location).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_location() {
        let entries = vec![
            MetadataEntry::new("cache/a.gz"),
            MetadataEntry::new("cache/b.gz"),
            MetadataEntry::new("cache/c.gz"),
        ];
        let values = extract_field_from_cache_metadata_entries(&entries, "location").unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values, vec![json!("cache/a.gz"), json!("cache/b.gz"), json!("cache/c.gz")]);
    }

    #[test]
    fn test_extract_empty() {
        let values = extract_field_from_cache_metadata_entries(&[], "location").unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_extract_unknown_field() {
        let entries = vec![MetadataEntry::new("cache/a.gz")];
        assert!(matches!(
            extract_field_from_cache_metadata_entries(&entries, "size"),
            Err(MetadataError::UnknownField { .. })
        ));
        assert!(extract_field_from_cache_metadata_entries(&[], "size").is_err());
    }

    #[test]
    fn test_locations() {
        let entries = vec![MetadataEntry::new("a.gz"), MetadataEntry::new("b.gz")];
        assert_eq!(locations(&entries), vec![Path::new("a.gz"), Path::new("b.gz")]);
    }
}
