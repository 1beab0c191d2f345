//! Tests for resolver configuration

use std::collections::HashMap;

use request_pool_resolver::config::resolver::{
    ENV_ALLOCATION_PATH, ENV_ENGINE_COMMAND, ENV_MAX_QUEUED, ENV_MAX_REQUESTS, ENV_MEM_LIMIT, ENV_SITE_PATH,
};
use request_pool_resolver::config::ResolverConfig;
use request_pool_resolver::core::{ResolverError, ResolverMode};

fn from_vars(vars: &[(&str, &str)]) -> Result<ResolverConfig, ResolverError> {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    ResolverConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let cfg = ResolverConfig::default();
    assert_eq!(cfg.mode(), ResolverMode::DefaultOnly);
    assert_eq!(cfg.default_pool_max_requests, -1);
    assert_eq!(cfg.default_pool_max_queued, 0);
    assert!(cfg.default_pool_mem_limit.is_empty());
    assert!(cfg.engine_command.is_none());
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_mode_follows_paths() {
    let both = ResolverConfig {
        fair_scheduler_allocation_path: "fair-scheduler.xml".into(),
        llama_site_path: "llama-site.xml".into(),
        ..ResolverConfig::default()
    };
    assert_eq!(both.mode(), ResolverMode::Delegated);

    let allocation_only = ResolverConfig {
        fair_scheduler_allocation_path: "fair-scheduler.xml".into(),
        ..ResolverConfig::default()
    };
    assert_eq!(allocation_only.mode(), ResolverMode::Delegated);
}

#[test]
fn test_site_path_requires_allocation_path() {
    let cfg = ResolverConfig {
        llama_site_path: "llama-site.xml".into(),
        ..ResolverConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(ResolverError::Config(_))));
}

#[test]
fn test_from_lookup_reads_every_variable() {
    let cfg = from_vars(&[
        (ENV_ALLOCATION_PATH, "/etc/fair-scheduler.xml"),
        (ENV_SITE_PATH, "/etc/llama-site.xml"),
        (ENV_MAX_REQUESTS, "20"),
        (ENV_MAX_QUEUED, " 40 "),
        (ENV_MEM_LIMIT, "8G"),
        (ENV_ENGINE_COMMAND, "policy-engine --stdio"),
    ])
    .unwrap();
    assert_eq!(cfg.mode(), ResolverMode::Delegated);
    assert_eq!(cfg.allocation_path().to_str(), Some("/etc/fair-scheduler.xml"));
    assert_eq!(cfg.site_path().to_str(), Some("/etc/llama-site.xml"));
    assert_eq!(cfg.default_pool_max_requests, 20);
    assert_eq!(cfg.default_pool_max_queued, 40);
    assert_eq!(cfg.default_pool_mem_limit, "8G");
    assert_eq!(cfg.engine_command.as_deref(), Some("policy-engine --stdio"));
}

#[test]
fn test_from_lookup_with_nothing_set_is_default() {
    assert_eq!(from_vars(&[]).unwrap(), ResolverConfig::default());
    assert_eq!(from_vars(&[(ENV_ENGINE_COMMAND, "")]).unwrap().engine_command, None);
}

#[test]
fn test_from_lookup_rejects_non_integer_limits() {
    let err = from_vars(&[(ENV_MAX_REQUESTS, "ten")]).unwrap_err();
    assert!(matches!(err, ResolverError::Config(ref msg) if msg.contains(ENV_MAX_REQUESTS)));
}

#[test]
fn test_from_json() {
    let json = r#"{
        "default_pool_max_requests": 10,
        "default_pool_max_queued": 5,
        "default_pool_mem_limit": "1G"
    }"#;
    let cfg = ResolverConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.mode(), ResolverMode::DefaultOnly);
    assert_eq!(cfg.default_pool_max_requests, 10);
    assert_eq!(cfg.default_pool_max_queued, 5);
    assert_eq!(cfg.default_pool_mem_limit, "1G");
    assert!(cfg.fair_scheduler_allocation_path.is_empty());
}

#[test]
fn test_from_json_rejects_inconsistent_paths() {
    let json = r#"{ "llama_site_path": "llama-site.xml" }"#;
    assert!(ResolverConfig::from_json_str(json).is_err());
    assert!(ResolverConfig::from_json_str("{ not json").is_err());
}
