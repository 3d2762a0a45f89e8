//! Property tests for dependency depth filtering.

use proptest::prelude::*;

use hotrun::domain::services::should_watch;
use hotrun::{dependency_level, DepthLimit, IgnoreRuleSpec, IgnoreRules};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9_-]{1,8}").unwrap()
}

/// An absolute path with `levels` package directories, each followed by a package name
fn path_with_levels(levels: usize) -> impl Strategy<Value = String> {
    (
        proptest::collection::vec(segment(), 1..=3),
        proptest::collection::vec(segment(), levels),
        segment(),
    )
        .prop_map(|(project, packages, file)| {
            let mut parts = project;
            for package in packages {
                parts.push("node_modules".to_string());
                parts.push(package);
            }
            parts.push(format!("{file}.js"));
            format!("/{}", parts.join("/"))
        })
}

fn levelled_path() -> impl Strategy<Value = (usize, String)> {
    (0usize..5).prop_flat_map(|levels| (Just(levels), path_with_levels(levels)))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the level is the number of nested package directories.
    #[test]
    fn property_level_counts_package_directories((levels, path) in levelled_path()) {
        prop_assert_eq!(dependency_level(&path, "node_modules"), levels);
    }

    /// PROPERTY: `Max(n)` admits exactly the paths at level <= n.
    #[test]
    fn property_max_depth_admits_up_to_limit(
        (levels, path) in levelled_path(),
        max in 0usize..5,
    ) {
        let watched = should_watch(&path, &IgnoreRules::empty(), DepthLimit::Max(max), "node_modules");
        prop_assert_eq!(watched, levels <= max);
    }

    /// PROPERTY: an ignored path is never watched, whatever its depth.
    #[test]
    fn property_ignored_prefix_is_never_watched((_, path) in levelled_path()) {
        let prefix: String = path.chars().take(path.len() / 2 + 1).collect();
        let rules = IgnoreRules::compile(&[IgnoreRuleSpec::prefix(prefix)]).unwrap();

        prop_assert!(!should_watch(&path, &rules, DepthLimit::Unlimited, "node_modules"));
    }

    /// PROPERTY: level computation never panics on arbitrary input.
    #[test]
    fn property_level_never_panics(path in ".{0,64}", boundary in ".{0,12}") {
        let _ = dependency_level(&path, &boundary);
    }
}
