//! Tests for pool results and memory specs

use request_pool_resolver::core::{default_mem_limit, parse_mem_spec, PoolConfig, ResolverError, UNLIMITED};

const PHYS: u64 = 32 * 1024 * 1024 * 1024;

#[test]
fn test_documented_specs_are_positive() {
    for spec in ["100M", "2G", "500", "50%"] {
        let bytes = default_mem_limit(spec, PHYS).unwrap();
        assert!(bytes > 0, "{spec} parsed to {bytes}");
    }
}

#[test]
fn test_not_set_normalizes_to_unlimited() {
    assert_eq!(default_mem_limit("", PHYS), Ok(UNLIMITED));
    assert_eq!(default_mem_limit("0", PHYS), Ok(UNLIMITED));
    assert_eq!(default_mem_limit("0%", PHYS), Ok(UNLIMITED));
    assert_eq!(parse_mem_spec("", PHYS).unwrap().bytes, 0);
}

#[test]
fn test_malformed_spec() {
    assert_eq!(
        default_mem_limit("1T", PHYS),
        Err(ResolverError::InvalidMemSpec("1T".into()))
    );
}

#[test]
fn test_pool_config_helpers() {
    let limited = PoolConfig {
        max_requests: 0,
        max_queued: 1,
        mem_limit: 4096,
    };
    assert!(limited.limits_requests());
    assert!(limited.allows_queueing());
    assert_eq!(limited.mem_limit_bytes(), Some(4096));

    let open = PoolConfig {
        max_requests: -1,
        max_queued: -3,
        mem_limit: UNLIMITED,
    };
    assert!(!open.limits_requests());
    assert!(!open.allows_queueing());
    assert_eq!(open.mem_limit_bytes(), None);
}

#[test]
fn test_pool_config_serializes_with_field_names() {
    let cfg = PoolConfig {
        max_requests: 10,
        max_queued: 5,
        mem_limit: 1_073_741_824,
    };
    let json = serde_json::to_value(cfg).unwrap();
    assert_eq!(json["max_requests"], 10);
    assert_eq!(json["max_queued"], 5);
    assert_eq!(json["mem_limit"], 1_073_741_824_i64);
}
