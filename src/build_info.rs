//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Version line shown by `--version`.
pub fn version_string() -> String {
    format!(
        "drx-miner {} ({} {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE,
        BUILD_COMMIT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_not_empty() {
        assert!(!BUILD_COMMIT.is_empty());
        assert!(!BUILD_DATE.is_empty());
    }

    #[test]
    fn test_commit_is_hash_or_unknown() {
        assert!(
            BUILD_COMMIT == "unknown" || BUILD_COMMIT.chars().all(|c| c.is_ascii_hexdigit()),
            "unexpected commit {:?}",
            BUILD_COMMIT
        );
    }

    #[test]
    fn test_version_string_mentions_commit() {
        let version = version_string();
        assert!(version.starts_with("drx-miner "));
        assert!(version.contains(BUILD_COMMIT));
    }
}
