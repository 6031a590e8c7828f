//! Version information

/// Get the crate version
pub fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_semver_like() {
        let version = get_version();
        assert!(!version.is_empty());
        assert_eq!(version.split('.').count(), 3);
    }
}
