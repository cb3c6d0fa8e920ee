//! Startup flags read from the page query string.
//!
//! # Invariants
//! - Parsed once; later changes to the query are not observed.
//! - Only the first occurrence of a key is handled; values are ignored.
//! - Unrecognized keys are ignored.

use std::collections::BTreeSet;

/// Recognized startup flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchParams {
    /// Load the built-in demo document instead of persisted state.
    pub demo: bool,
    /// Drop the persisted document before loading.
    pub clear: bool,
}

impl LaunchParams {
    /// Parses a URL query string such as `?demo&clear=1`.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut handled = BTreeSet::new();
        let mut params = Self::default();

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let key = pair.split_once('=').map_or(pair, |(key, _)| key);
            if !handled.insert(key) {
                continue;
            }

            match key {
                "demo" => params.demo = true,
                "clear" => params.clear = true,
                _ => {}
            }
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::LaunchParams;

    #[test]
    fn empty_query_sets_nothing() {
        assert_eq!(LaunchParams::parse(""), LaunchParams::default());
        assert_eq!(LaunchParams::parse("?"), LaunchParams::default());
    }

    #[test]
    fn recognizes_flags_with_or_without_values() {
        let params = LaunchParams::parse("?demo&clear=false");
        assert!(params.demo);
        assert!(params.clear);
    }

    #[test]
    fn ignores_unknown_and_repeated_keys() {
        let params = LaunchParams::parse("theme=dark&demo=1&demo=0&&x");
        assert!(params.demo);
        assert!(!params.clear);
    }
}
