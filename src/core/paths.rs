//! Object store path utilities
//!
//! Every root location handed to the registry goes through [`sanitise_s3_path`]
//! so that stores and logs only ever see the canonical `s3://bucket/key` form.

use std::path::Path;

use crate::core::error::{MetadataError, Result};

/// Canonical object store scheme prefix
pub const S3_SCHEME: &str = "s3://";

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Strip every leading `s3:` and `/` from a location.
///
/// Only whole `s3:` prefixes are removed, so `s3-backup/...` survives intact.
fn strip_scheme(location: &str) -> &str {
    let mut rest = location;
    loop {
        if let Some(stripped) = rest.strip_prefix("s3:") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            return rest;
        }
    }
}

/// Convert a root location into canonical `s3://...` form.
///
/// Accepts locations with or without a scheme, with repeated schemes and with
/// the collapsed `s3:/` form a filesystem path produces.
pub fn sanitise_s3_path(path: &Path) -> String {
    let normalized = normalize_path(path);
    let rest = strip_scheme(&normalized).trim_end_matches('/');
    format!("{}{}", S3_SCHEME, rest)
}

/// Final non-empty segment of a root location (the cache's name)
pub fn cache_name(path: &Path) -> String {
    let normalized = normalize_path(path);
    strip_scheme(&normalized)
        .split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Join a key onto a root URI with exactly one separator
pub fn join_uri(root: &str, key: &str) -> String {
    format!(
        "{}/{}",
        root.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}

/// A canonical object store URI split into bucket and key prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Uri {
    pub bucket: String,
    /// Key prefix without leading or trailing '/', may be empty
    pub prefix: String,
}

impl S3Uri {
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix(S3_SCHEME)
            .ok_or_else(|| MetadataError::InvalidUri {
                uri: uri.to_string(),
                reason: format!("missing {} scheme", S3_SCHEME),
            })?;

        let rest = rest.trim_matches('/');
        let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(MetadataError::InvalidUri {
                uri: uri.to_string(),
                reason: "empty bucket".to_string(),
            });
        }

        Ok(Self {
            bucket: bucket.to_string(),
            prefix: prefix.trim_matches('/').to_string(),
        })
    }

    /// Key path relative to the bucket for a key under this prefix
    pub fn object_path(&self, key: &str) -> String {
        let key = key.trim_start_matches('/');
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.prefix, key)
        }
    }
}

impl std::fmt::Display for S3Uri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.prefix.is_empty() {
            write!(f, "{}{}", S3_SCHEME, self.bucket)
        } else {
            write!(f, "{}{}/{}", S3_SCHEME, self.bucket, self.prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitise_canonical_is_unchanged() {
        assert_eq!(
            sanitise_s3_path(Path::new("s3://bucket/key")),
            "s3://bucket/key"
        );
    }

    #[test]
    fn test_sanitise_adds_scheme() {
        assert_eq!(sanitise_s3_path(Path::new("bucket/key")), "s3://bucket/key");
    }

    #[test]
    fn test_sanitise_collapsed_scheme() {
        // PathBuf round trips can leave a single slash after the scheme
        assert_eq!(
            sanitise_s3_path(Path::new("s3:/bucket/key")),
            "s3://bucket/key"
        );
        assert_eq!(
            sanitise_s3_path(Path::new("/bucket/key/")),
            "s3://bucket/key"
        );
    }

    #[test]
    fn test_sanitise_repeated_scheme() {
        assert_eq!(
            sanitise_s3_path(Path::new("s3://s3://bucket/key")),
            "s3://bucket/key"
        );
    }

    #[test]
    fn test_sanitise_keeps_lookalike_prefixes() {
        assert_eq!(
            sanitise_s3_path(Path::new("s3-backup/key")),
            "s3://s3-backup/key"
        );
        assert_eq!(
            sanitise_s3_path(Path::new("s3://shards/cache")),
            "s3://shards/cache"
        );
    }

    #[test]
    fn test_cache_name() {
        assert_eq!(cache_name(Path::new("s3://bucket/caches/run_1")), "run_1");
        assert_eq!(cache_name(Path::new("s3://bucket/caches/run_1/")), "run_1");
        assert_eq!(cache_name(Path::new("bucket")), "bucket");
    }

    #[test]
    fn test_join_uri() {
        assert_eq!(
            join_uri("s3://bucket/cache/", "/metadata/a.csv"),
            "s3://bucket/cache/metadata/a.csv"
        );
    }

    #[test]
    fn test_parse_uri() {
        let uri = S3Uri::parse("s3://bucket/a/b").unwrap();
        assert_eq!(uri.bucket, "bucket");
        assert_eq!(uri.prefix, "a/b");
        assert_eq!(uri.object_path("metadata/x.csv"), "a/b/metadata/x.csv");
        assert_eq!(uri.to_string(), "s3://bucket/a/b");
    }

    #[test]
    fn test_parse_uri_bucket_only() {
        let uri = S3Uri::parse("s3://bucket").unwrap();
        assert_eq!(uri.prefix, "");
        assert_eq!(uri.object_path("x.csv"), "x.csv");
        assert_eq!(uri.to_string(), "s3://bucket");
    }

    #[test]
    fn test_parse_uri_rejects_missing_scheme() {
        assert!(matches!(
            S3Uri::parse("bucket/key"),
            Err(MetadataError::InvalidUri { .. })
        ));
        assert!(S3Uri::parse("s3://").is_err());
    }
}
