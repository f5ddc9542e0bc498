//! Property-based tests for path construction.

use super::normalize::{normalize, resolve_components};
use super::PavedPath;
use proptest::prelude::*;
use std::path::PathBuf;

fn component_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,20}"
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Folding segments with from_segments matches chained joins.
    #[test]
    fn from_segments_matches_join(parts in prop::collection::vec(component_strategy(), 1..8)) {
        let folded = PavedPath::from_segments(parts.iter());
        let chained = parts
            .iter()
            .fold(PavedPath::new(PathBuf::new()), |acc, part| acc.join(part));
        prop_assert_eq!(folded, chained);
    }

    // Integer segments render exactly like their decimal form.
    #[test]
    fn integer_segment_is_decimal(n in any::<i64>()) {
        prop_assert_eq!(PavedPath::new(n).as_path(), PathBuf::from(n.to_string()).as_path());
    }

    // A `name/..` pair cancels out.
    #[test]
    fn parent_cancels_child(
        base in prop::collection::vec(component_strategy(), 1..5),
        child in component_strategy(),
    ) {
        let mut root = PathBuf::from("/");
        for part in &base {
            root.push(part);
        }
        let detour = root.join(&child).join("..");
        prop_assert_eq!(resolve_components(&detour).unwrap(), root.clone());
        prop_assert_eq!(normalize(&detour).unwrap(), root);
    }
}
