//! Layered Configuration Tests
//!
//! End-to-end layering: defaults, files on disk, directories and inline
//! overrides merged into one configuration.

use defmerge::{impl_deep_merge, DeepMerge, LayerOrigin, Layers, Nullable, Value};
use serde::Deserialize;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn builtin() -> Value {
    Value::from(json!({
        "overall_seconds": 1800,
        "idle_log_seconds": 300,
        "bundle": {"mode": "worktree", "exclude": [".git"]},
        "cache": {"derived_data": "off", "spm": "off"}
    }))
}

#[test]
fn test_host_repo_cli_precedence() {
    let dir = TempDir::new().unwrap();
    let host = dir.path().join("host.toml");
    let repo = dir.path().join("repo.json");
    fs::write(&host, "overall_seconds = 900\n[cache]\nspm = \"on\"\n").unwrap();
    fs::write(
        &repo,
        r#"{"overall_seconds": 1200, "bundle": {"exclude": ["build"]}}"#,
    )
    .unwrap();

    let config = Layers::new(builtin())
        .file(&host)
        .unwrap()
        .file(&repo)
        .unwrap()
        .inline("cli", json!({"idle_log_seconds": 60}))
        .build();

    assert_eq!(config.get_u64("overall_seconds"), Some(1200));
    assert_eq!(config.get_u64("idle_log_seconds"), Some(60));
    assert_eq!(config.get_str("cache.spm"), Some("on"));
    assert_eq!(config.get_str("cache.derived_data"), Some("off"));
    assert_eq!(
        config.get("bundle.exclude"),
        Some(&Value::from(json!([".git", "build"])))
    );

    let origins: Vec<_> = config.sources.iter().map(|s| s.origin).collect();
    assert_eq!(
        origins,
        vec![
            LayerOrigin::Defaults,
            LayerOrigin::File,
            LayerOrigin::File,
            LayerOrigin::Inline
        ]
    );
}

#[test]
fn test_optional_layers_and_directory() {
    let dir = TempDir::new().unwrap();
    let conf_d = dir.path().join("conf.d");
    fs::create_dir(&conf_d).unwrap();
    fs::write(conf_d.join("00-base.toml"), "[bundle]\nmode = \"snapshot\"\n").unwrap();
    fs::write(conf_d.join("50-local.json"), r#"{"bundle": {"mode": null}}"#).unwrap();

    let config = Layers::new(builtin())
        .file_if_exists(dir.path().join("missing.toml"))
        .unwrap()
        .directory(&conf_d)
        .unwrap()
        .build();

    assert_eq!(config.sources.len(), 3);
    assert!(config.get("bundle.mode").unwrap().is_null());
    assert_eq!(
        config.get("bundle.exclude"),
        Some(&Value::from(json!([".git"])))
    );
}

#[test]
fn test_missing_directory_is_error() {
    let dir = TempDir::new().unwrap();
    let result = Layers::new(builtin()).directory(dir.path().join("nope"));
    assert!(result.is_err());
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct Timeouts {
    overall_seconds: Option<u64>,
    idle_log_seconds: Option<u64>,
}

impl_deep_merge!(Timeouts {
    overall_seconds,
    idle_log_seconds
});

#[test]
fn test_typed_and_dynamic_merge_agree() {
    let overrides = json!({"overall_seconds": 60});

    let dynamic: Timeouts = Layers::new(builtin())
        .inline("cli", overrides.clone())
        .build()
        .resolve()
        .unwrap();

    let typed = Timeouts {
        overall_seconds: Some(60),
        idle_log_seconds: None,
    }
    .deep_merge(Timeouts {
        overall_seconds: Some(1800),
        idle_log_seconds: Some(300),
    });

    assert_eq!(dynamic, typed);
}

#[test]
fn test_typed_nullable_field() {
    let merged = Some(Nullable::<u64>::Null).deep_merge(Some(Nullable::Set(300)));
    assert_eq!(merged, Some(Nullable::Null));
}

#[test]
fn test_snapshot_round_trip() {
    let config = Layers::new(builtin())
        .inline("cli", json!({"overall_seconds": 42}))
        .build();

    let json = config.to_json().unwrap();
    let restored: defmerge::LayeredConfig = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.config, config.config);
    assert_eq!(restored.sources, config.sources);
    assert_eq!(restored.fingerprint().unwrap(), config.fingerprint().unwrap());
}
