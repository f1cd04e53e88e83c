//! Property-based tests for business_errors
//!
//! These tests use proptest to generate random inputs and verify invariants hold.

use business_errors::{Config, Error, ErrorDef, ErrorValue, Group, Holder, Payload};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

static HOLDER_SEQ: AtomicUsize = AtomicUsize::new(0);

/// Every case declares into the shared catalog, so holder names must not repeat.
fn holder_name(prefix: &str) -> String {
    format!("{prefix}{}", HOLDER_SEQ.fetch_add(1, Ordering::Relaxed))
}

fn signaled(result: business_errors::Result<()>) -> ErrorValue {
    match result {
        Err(Error::Business(value)) => *value,
        other => panic!("expected a business signal, got {other:?}"),
    }
}

// ============================================================================
// CODE ALLOCATION PROPERTIES
// ============================================================================

proptest! {
    /// A non-negative seed hands out seed, seed + 1, ...
    #[test]
    fn ascending_codes_are_consecutive(seed in 0i64..1_000_000, count in 1usize..20) {
        let holder = Holder::define(holder_name("Asc"), |d| {
            d.code_start_at(seed);
            for i in 0..count {
                d.define(format!("e{i}"))?;
            }
            Ok(())
        }).unwrap();

        let codes: Vec<i64> = holder.specs().map(|spec| spec.code()).collect();
        let expected: Vec<i64> = (0..count as i64).map(|k| seed + k).collect();
        prop_assert_eq!(codes, expected);
    }

    /// A negative seed hands out seed, seed - 1, ...
    #[test]
    fn descending_codes_are_consecutive(seed in -1_000_000i64..0, count in 1usize..20) {
        let holder = Holder::define(holder_name("Desc"), |d| {
            d.code_start_at(seed);
            for i in 0..count {
                d.define(format!("e{i}"))?;
            }
            Ok(())
        }).unwrap();

        let codes: Vec<i64> = holder.specs().map(|spec| spec.code()).collect();
        let expected: Vec<i64> = (0..count as i64).map(|k| seed - k).collect();
        prop_assert_eq!(codes, expected);
    }

    /// Explicit codes never move the cursor.
    #[test]
    fn explicit_codes_are_transparent(seed in -1000i64..1000, pinned in any::<i64>(), before in 0usize..5) {
        let holder = Holder::define(holder_name("Pinned"), |d| {
            d.code_start_at(seed);
            for i in 0..before {
                d.define(format!("e{i}"))?;
            }
            d.define(ErrorDef::new("pinned").code(pinned))?;
            d.define("after")?;
            Ok(())
        }).unwrap();

        let step = if seed >= 0 { 1 } else { -1 };
        prop_assert_eq!(holder.spec("pinned").unwrap().code(), pinned);
        prop_assert_eq!(holder.spec("after").unwrap().code(), seed + step * before as i64);
    }
}

// ============================================================================
// SCOPE PROPERTIES
// ============================================================================

proptest! {
    /// Whatever a nested group does, the enclosing scope resumes unchanged.
    #[test]
    fn group_exit_restores_enclosing_scope(
        seed in 0i64..10_000,
        outer_http in 400u16..500,
        inner_seed in proptest::option::of(-10_000i64..10_000),
        inner_http in proptest::option::of(500u16..600),
        inner_count in 0usize..10,
    ) {
        let holder = Holder::define(holder_name("Scope"), |d| {
            d.code_start_at(seed).http(outer_http);
            d.define("before")?;
            let mut group = Group::new("inner");
            if let Some(code) = inner_seed {
                group = group.code_start_at(code);
            }
            if let Some(status) = inner_http {
                group = group.http(status);
            }
            d.group(group, |g| {
                for i in 0..inner_count {
                    g.define(format!("inner_{i}"))?;
                }
                Ok(())
            })?;
            d.define("after")?;
            Ok(())
        }).unwrap();

        let after = holder.spec("after").unwrap();
        prop_assert_eq!(after.code(), seed + 1);
        prop_assert_eq!(after.http_status(), outer_http);
        prop_assert_eq!(after.group(), "public");

        if inner_count > 0 {
            let first = holder.spec("inner_0").unwrap();
            prop_assert_eq!(first.code(), inner_seed.unwrap_or(seed + 1));
            prop_assert_eq!(first.http_status(), inner_http.unwrap_or(outer_http));
            prop_assert_eq!(first.group(), "inner");
        }
    }
}

// ============================================================================
// RENDER PROPERTIES
// ============================================================================

proptest! {
    /// Rendering keeps exactly the positional prefix the template can cover.
    #[test]
    fn projection_is_positional_prefix(
        keys in proptest::collection::btree_set("[a-z]{1,8}", 0..8),
        code in any::<i64>(),
        http in 100u16..600,
    ) {
        let keys: Vec<String> = keys.into_iter().collect();
        let config = Config::default().with_format("t", keys.clone());
        let value = ErrorValue::new("prop", "Prop", code, http, None);
        let info: Vec<serde_json::Value> = value.info().values().cloned().collect();

        let rendered = signaled(value.render_with(&config, "t", Payload::new()));
        let only = rendered.info().get("only").and_then(|only| only.as_object()).cloned().unwrap();

        let kept = keys.len().min(info.len());
        prop_assert_eq!(only.len(), kept);
        for (key, expected) in keys.iter().zip(&info) {
            prop_assert_eq!(only.get(key), Some(expected));
        }
    }

    /// Attaching data to one invocation never leaks into another.
    #[test]
    fn invocations_are_independent(extra_key in "[a-z]{1,10}", extra_value in any::<i32>()) {
        let holder = Holder::define(holder_name("Indep"), |d| {
            d.code_start_at(1).http(400);
            d.define("bad")?;
            Ok(())
        }).unwrap();

        let attached = signaled(
            holder.get_in("bad", "en").unwrap().with(Payload::new().with(extra_key.clone(), extra_value)),
        );
        let fresh = holder.get_in("bad", "en").unwrap();

        prop_assert_eq!(
            attached.info().get("data").and_then(|data| data.get(&extra_key)),
            Some(&serde_json::json!(extra_value))
        );
        prop_assert!(fresh.info().get("data").is_none());
        prop_assert!(!fresh.is_signaled());
    }
}

// ============================================================================
// LOGGING PROPERTIES
// ============================================================================

proptest! {
    /// Log lines stay valid UTF-8 and bounded whatever the message.
    #[test]
    fn signal_log_is_bounded(message in "\\PC{0,5000}") {
        let value = ErrorValue::new("flood", message, 1, 400, None);
        let mut line = String::new();
        value.signal_log().write_to(&mut line).unwrap();

        prop_assert!(std::str::from_utf8(line.as_bytes()).is_ok());
        prop_assert!(line.len() < 2 * 1024 + 128);
    }

    /// Usage errors display without panicking for arbitrary names.
    #[test]
    fn usage_error_display_never_panics(holder in "\\PC{0,100}", name in "\\PC{0,100}") {
        let err = Error::Undeclared { holder: holder.into(), name: name.into() };
        let displayed = err.to_string();
        prop_assert!(!displayed.is_empty());
        prop_assert_eq!(err.http_status(), 500);
    }
}
