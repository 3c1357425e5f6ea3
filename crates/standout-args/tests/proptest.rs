//! Property-based tests for parsing and rendering using proptest.

use chrono::Duration;
use proptest::prelude::*;
use standout_args::{format_duration, parse_duration, ArgError, ArgSet, Arity, OptionSet, Value};

// ============================================================================
// Test helpers
// ============================================================================

/// Sets a fresh value from `raw`.
fn reparse<T: Value + Default>(raw: &str) -> Option<T> {
    let mut value = T::default();
    value.set(raw).ok()?;
    Some(value)
}

fn option_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,8}"
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Rendering an integer and setting it again yields the same integer.
    #[test]
    fn int_render_round_trips(n in any::<i64>()) {
        prop_assert_eq!(reparse::<i64>(&n.render()), Some(n));
    }

    #[test]
    fn bool_render_round_trips(b in any::<bool>()) {
        prop_assert_eq!(reparse::<bool>(&b.render()), Some(b));
    }

    #[test]
    fn string_render_round_trips(s in ".*") {
        prop_assert_eq!(reparse::<String>(&s.render()), Some(s));
    }

    /// Durations survive formatting and parsing at nanosecond precision.
    #[test]
    fn duration_format_round_trips(nanos in any::<i64>()) {
        let d = Duration::nanoseconds(nanos);
        prop_assert_eq!(parse_duration(&format_duration(&d)).unwrap(), d);
    }

    /// An option value given inline is stored verbatim, whatever it contains.
    #[test]
    fn inline_string_values_are_verbatim(name in option_name_strategy(), value in ".*") {
        let mut dest = String::new();
        {
            let mut options = OptionSet::new();
            options.string(&name, &mut dest, "", "");
            let tokens = [format!("-{name}={value}")];
            let rest = options.parse(&tokens).unwrap();
            prop_assert!(rest.is_empty());
        }
        prop_assert_eq!(dest, value);
    }

    /// `--` ends option parsing and everything after it is left untouched.
    #[test]
    fn terminator_is_never_a_value(tail in prop::collection::vec("[-a-z]{0,4}", 0..6)) {
        let mut flag = false;
        let mut options = OptionSet::new();
        options.bool("x", &mut flag, false, "");
        let mut tokens = vec!["-x".to_string(), "--".to_string()];
        tokens.extend(tail.iter().cloned());

        let rest = options.parse(&tokens).unwrap();
        prop_assert_eq!(rest, &tail[..]);
    }

    /// An option that needs a value never takes `--` as that value.
    #[test]
    fn terminator_is_never_a_string_value(tail in prop::collection::vec("[-a-z]{0,4}", 0..6)) {
        let mut s = String::new();
        {
            let mut options = OptionSet::new();
            options.string("s", &mut s, "", "");
            let mut tokens = vec!["-s".to_string(), "--".to_string()];
            tokens.extend(tail.iter().cloned());

            let err = options.parse(&tokens).unwrap_err();
            prop_assert_eq!(err, ArgError::MissingValue("s".into()));
        }
        prop_assert_eq!(s, "");
    }

    /// A remaining collector with no bounds takes every token, in order.
    #[test]
    fn unbounded_remaining_takes_everything(tokens in prop::collection::vec("[a-z0-9]{1,6}", 0..10)) {
        let mut collected: Vec<String> = Vec::new();
        {
            let mut args = ArgSet::new();
            args.remaining("rest", &mut collected, Arity::any(), "");
            args.parse(&tokens).unwrap();
        }
        prop_assert_eq!(collected, tokens);
    }

    /// A bounded collector either accepts the tokens or rejects them by count.
    #[test]
    fn bounded_remaining_respects_arity(
        tokens in prop::collection::vec("[a-z]{1,3}", 0..8),
        min in 0usize..4,
        extra in 0usize..4,
    ) {
        let max = min + extra;
        let mut collected: Vec<String> = Vec::new();
        let mut args = ArgSet::new();
        args.remaining("rest", &mut collected, Arity::between(min, max), "");
        let ok = args.parse(&tokens).is_ok();
        prop_assert_eq!(ok, (min..=max).contains(&tokens.len()));
    }

    /// Usage rendering is a pure function of the declarations.
    #[test]
    fn usage_is_stable(names in prop::collection::btree_set(option_name_strategy(), 1..6)) {
        let mut dests: Vec<i64> = vec![0; names.len()];
        let mut options = OptionSet::new();
        for (name, dest) in names.iter().zip(dests.iter_mut()) {
            options.int(name, dest, 1, "Some text");
        }
        let first = options.usage();
        prop_assert_eq!(&first, &options.usage());
        for name in &names {
            let signature = format!("  -{name}=<int>\n");
            prop_assert!(first.contains(&signature));
        }
    }
}
