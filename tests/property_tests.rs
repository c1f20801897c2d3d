//! Property-based tests for rust_logger_hierarchy using proptest

use proptest::prelude::*;
use rust_logger_hierarchy::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    #[test]
    fn test_log_level_setting_case_insensitive(level in any_level(), use_lower in any::<bool>()) {
        let token = if use_lower {
            level.to_str().to_lowercase()
        } else {
            level.to_str().to_string()
        };
        prop_assert_eq!(LogLevel::parse_setting(&token).unwrap(), Some(level));
    }

    #[test]
    fn test_log_level_invalid_parse(invalid_str in "[gjkmpqsvxyz0-9]+") {
        prop_assert!(LogLevel::parse_setting(&invalid_str).is_err());
    }
}

// ============================================================================
// LogEntry Tests
// ============================================================================

proptest! {
    #[test]
    fn test_message_is_single_line(message in ".*") {
        let entry = LogEntry::new(LogLevel::Info, "prop", &message);
        prop_assert!(!entry.message.contains('\n'));
        prop_assert!(!entry.message.contains('\r'));
        prop_assert!(!entry.to_text(&TimestampFormat::default()).contains('\n'));
    }
}

// ============================================================================
// Resolution Tests
// ============================================================================

const NAMES: [&str; 7] = ["a", "b", "a.b", "a.c", "a.b.c", "a.b.c.d", "b.x"];

type Declarations = Vec<Option<(LogLevel, bool)>>;

fn declarations() -> impl Strategy<Value = (LogLevel, Declarations)> {
    (
        any_level(),
        proptest::collection::vec(proptest::option::of((any_level(), any::<bool>())), NAMES.len()),
    )
}

fn config_for(root: LogLevel, decls: &Declarations) -> Vec<LoggerConfig> {
    let mut records = vec![LoggerConfig::root(root.to_str())];
    for (name, decl) in NAMES.iter().zip(decls) {
        if let Some((level, local)) = decl {
            records.push(LoggerConfig::new(*name, level.to_str()).local(*local));
        }
    }
    records
}

/// Walk up from `name`: the first explicit level found wins, except that a
/// local logger's level only counts for the logger itself.
fn expected_level(name: &str, root: LogLevel, explicit: &HashMap<&str, (LogLevel, bool)>) -> LogLevel {
    if let Some((level, _)) = explicit.get(name) {
        return *level;
    }
    let mut current = name;
    while let Some((parent, _)) = current.rsplit_once('.') {
        if let Some((level, local)) = explicit.get(parent) {
            if !local {
                return *level;
            }
        }
        current = parent;
    }
    root
}

fn quiet_hierarchy() -> Hierarchy {
    Hierarchy::builder()
        .output(OutputHandle::new(MemoryAppender::new()))
        .registry(Arc::new(OutputRegistry::new()))
        .build()
}

proptest! {
    #[test]
    fn test_resolution_matches_ancestor_walk((root, decls) in declarations()) {
        let hierarchy = quiet_hierarchy();
        hierarchy.apply_config(&HierarchyConfig::new(config_for(root, &decls))).unwrap();

        let explicit: HashMap<&str, (LogLevel, bool)> = NAMES
            .iter()
            .zip(&decls)
            .filter_map(|(name, decl)| decl.map(|d| (*name, d)))
            .collect();

        for name in NAMES.iter().chain(&["a.b.c.d.e", "c"]) {
            prop_assert_eq!(
                hierarchy.get_logger(name).effective_level(),
                expected_level(name, root, &explicit),
                "logger {}", name
            );
        }
    }

    #[test]
    fn test_creation_order_independent((root, decls) in declarations(), create_first in any::<bool>()) {
        let config = HierarchyConfig::new(config_for(root, &decls));

        let reference = quiet_hierarchy();
        reference.apply_config(&config).unwrap();

        let other = quiet_hierarchy();
        if create_first {
            for name in NAMES.iter().rev() {
                other.get_logger(name);
            }
        }
        other.apply_config(&config).unwrap();

        for name in NAMES {
            prop_assert_eq!(
                reference.get_logger(name).effective_level(),
                other.get_logger(name).effective_level()
            );
        }
    }

    #[test]
    fn test_record_order_independent((root, decls) in declarations()) {
        let records = config_for(root, &decls);
        let mut reversed = records.clone();
        reversed.reverse();

        let forward = quiet_hierarchy();
        forward.apply_config(&HierarchyConfig::new(records)).unwrap();
        let backward = quiet_hierarchy();
        backward.apply_config(&HierarchyConfig::new(reversed)).unwrap();

        prop_assert_eq!(forward.report(), backward.report());
    }

    #[test]
    fn test_reapply_is_idempotent((root, decls) in declarations()) {
        let hierarchy = quiet_hierarchy();
        let config = HierarchyConfig::new(config_for(root, &decls));
        hierarchy.apply_config(&config).unwrap();

        let before = hierarchy.report();
        let changes = (hierarchy.metrics().level_changes(), hierarchy.metrics().output_changes());
        hierarchy.apply_config(&config).unwrap();

        prop_assert_eq!(hierarchy.report(), before);
        prop_assert_eq!(
            (hierarchy.metrics().level_changes(), hierarchy.metrics().output_changes()),
            changes
        );
    }
}
