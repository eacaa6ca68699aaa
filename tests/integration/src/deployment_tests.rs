//! End-to-end deployment scenarios
//!
//! Exercises the complete flow: manifest parsing -> locator resolution ->
//! filtered copy with modes -> convergence checking.

use std::fs;
use std::path::Path;

use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

use deploy_core::{
    ApplyOptions, CheckStatus, DeployEngine, Error, LocalRepository, Manifest,
};

/// Build a manifest string for a single rule over the parseusn store.
fn manifest_toml(target: &Path, mode: &str, include: &str) -> String {
    format!(
        r#"
[rules.parseusn]
target  = "{}"
source  = "repo://parseusn/files"
mode    = "{}"
include = "{}"
"#,
        target.display().to_string().replace('\\', "/"),
        mode,
        include
    )
}

/// Seed the local file repository with the canonical two-file source.
fn seed_store(root: &Path) {
    let files = root.join("parseusn/files");
    fs::create_dir_all(&files).unwrap();
    fs::write(files.join("parseusn.py"), "#!/usr/bin/env python\n").unwrap();
    fs::write(files.join("readme.md"), "# parseusn\n").unwrap();
}

#[test]
fn scenario_include_pattern_filters_deployment() {
    let store = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();
    seed_store(store.path());
    let target = deploy.path().join("usr/local/bin");

    let manifest = Manifest::parse(&manifest_toml(&target, "755", "*.py")).unwrap();
    let engine = DeployEngine::new(LocalRepository::new(store.path().to_path_buf()));

    let report = engine.apply(&manifest, &ApplyOptions::default()).unwrap();
    assert!(report.success);

    deploy
        .child("usr/local/bin/parseusn.py")
        .assert(predicate::path::is_file());
    deploy
        .child("usr/local/bin/readme.md")
        .assert(predicate::path::missing());
}

#[cfg(unix)]
#[test]
fn scenario_deployed_file_has_exact_mode_bits() {
    use std::os::unix::fs::PermissionsExt;

    let store = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();
    seed_store(store.path());
    let target = deploy.path().join("usr/local/bin");

    let manifest = Manifest::parse(&manifest_toml(&target, "755", "*.py")).unwrap();
    let engine = DeployEngine::new(LocalRepository::new(store.path().to_path_buf()));
    engine.apply(&manifest, &ApplyOptions::default()).unwrap();

    let metadata = fs::metadata(target.join("parseusn.py")).unwrap();
    assert_eq!(metadata.permissions().mode() & 0o777, 0o755);
}

#[test]
fn scenario_repeated_apply_produces_no_delta() {
    let store = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();
    seed_store(store.path());
    let target = deploy.path().join("usr/local/bin");

    let manifest = Manifest::parse(&manifest_toml(&target, "755", "*.py")).unwrap();
    let engine = DeployEngine::new(LocalRepository::new(store.path().to_path_buf()));

    let first = engine.apply(&manifest, &ApplyOptions::default()).unwrap();
    assert!(!first.is_no_op());

    let mtime_after_first = fs::metadata(target.join("parseusn.py"))
        .unwrap()
        .modified()
        .unwrap();

    let second = engine.apply(&manifest, &ApplyOptions::default()).unwrap();
    assert!(second.success);
    assert!(second.is_no_op(), "second run changed state: {:?}", second.actions);

    let mtime_after_second = fs::metadata(target.join("parseusn.py"))
        .unwrap()
        .modified()
        .unwrap();
    assert_eq!(mtime_after_first, mtime_after_second);
}

#[test]
fn scenario_empty_source_deploys_nothing_without_error() {
    let store = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();
    fs::create_dir_all(store.path().join("parseusn/files")).unwrap();
    let target = deploy.path().join("usr/local/bin");

    let manifest = Manifest::parse(&manifest_toml(&target, "755", "*.py")).unwrap();
    let engine = DeployEngine::new(LocalRepository::new(store.path().to_path_buf()));

    let report = engine.apply(&manifest, &ApplyOptions::default()).unwrap();
    assert!(report.success);
    // Nothing to deploy: the target is not even created.
    assert!(!target.exists());
}

#[test]
fn scenario_unreachable_locator_leaves_target_unchanged() {
    let store = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();
    let target = deploy.path().join("usr/local/bin");

    // Pre-existing unrelated file in the target's parent tree.
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("existing.sh"), "keep me").unwrap();

    let manifest = Manifest::parse(&manifest_toml(&target, "755", "*.py")).unwrap();
    let engine = DeployEngine::new(LocalRepository::new(store.path().to_path_buf()));

    let rule = manifest.rule("parseusn").unwrap();
    let result = engine.apply_rule(rule, &ApplyOptions::default());
    assert!(matches!(result, Err(Error::Retrieval { .. })));

    // Prior state intact.
    assert_eq!(fs::read_to_string(target.join("existing.sh")).unwrap(), "keep me");
    assert_eq!(fs::read_dir(&target).unwrap().count(), 1);
}

#[test]
fn scenario_check_detects_and_apply_repairs_drift() {
    let store = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();
    seed_store(store.path());
    let target = deploy.path().join("usr/local/bin");

    let manifest = Manifest::parse(&manifest_toml(&target, "755", "*.py")).unwrap();
    let engine = DeployEngine::new(LocalRepository::new(store.path().to_path_buf()));
    engine.apply(&manifest, &ApplyOptions::default()).unwrap();

    assert_eq!(
        engine.check(&manifest).unwrap().status,
        CheckStatus::Converged
    );

    // Tamper with the deployed file.
    fs::write(target.join("parseusn.py"), "tampered").unwrap();
    assert_eq!(
        engine.check(&manifest).unwrap().status,
        CheckStatus::Drifted
    );

    // Delete it entirely.
    fs::remove_file(target.join("parseusn.py")).unwrap();
    assert_eq!(
        engine.check(&manifest).unwrap().status,
        CheckStatus::Missing
    );

    // Re-apply converges again.
    engine.apply(&manifest, &ApplyOptions::default()).unwrap();
    assert_eq!(
        engine.check(&manifest).unwrap().status,
        CheckStatus::Converged
    );
    assert_eq!(
        fs::read_to_string(target.join("parseusn.py")).unwrap(),
        "#!/usr/bin/env python\n"
    );
}

#[test]
fn scenario_source_updates_flow_through_on_next_apply() {
    let store = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();
    seed_store(store.path());
    let target = deploy.path().join("usr/local/bin");

    let manifest = Manifest::parse(&manifest_toml(&target, "755", "*.py")).unwrap();
    let engine = DeployEngine::new(LocalRepository::new(store.path().to_path_buf()));
    engine.apply(&manifest, &ApplyOptions::default()).unwrap();

    // New version lands in the file repository.
    fs::write(
        store.path().join("parseusn/files/parseusn.py"),
        "#!/usr/bin/env python\n# v2\n",
    )
    .unwrap();

    let report = engine.apply(&manifest, &ApplyOptions::default()).unwrap();
    assert!(!report.is_no_op());
    assert_eq!(
        fs::read_to_string(target.join("parseusn.py")).unwrap(),
        "#!/usr/bin/env python\n# v2\n"
    );
}

#[test]
fn scenario_multiple_rules_share_a_target() {
    let store = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();
    seed_store(store.path());
    let docs = store.path().join("docs/files");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("manual.md"), "manual").unwrap();
    let target = deploy.path().join("usr/local/bin");

    let manifest = Manifest::parse(&format!(
        r#"
[rules.scripts]
target  = "{target}"
source  = "repo://parseusn/files"
mode    = "755"
include = "*.py"

[rules.docs]
target  = "{target}"
source  = "repo://docs/files"
mode    = "644"
include = "*.md"
"#,
        target = target.display().to_string().replace('\\', "/")
    ))
    .unwrap();

    let engine = DeployEngine::new(LocalRepository::new(store.path().to_path_buf()));
    let report = engine.apply(&manifest, &ApplyOptions::default()).unwrap();
    assert!(report.success);

    // Each rule deployed only its own matches; the scripts rule did not
    // remove the docs rule's file and vice versa.
    assert!(target.join("parseusn.py").is_file());
    assert!(target.join("manual.md").is_file());
    assert!(!target.join("readme.md").exists());

    assert_eq!(
        engine.check(&manifest).unwrap().status,
        CheckStatus::Converged
    );
}

#[test]
fn scenario_json_report_round_trips() {
    let store = TempDir::new().unwrap();
    let deploy = TempDir::new().unwrap();
    seed_store(store.path());
    let target = deploy.path().join("usr/local/bin");

    let manifest = Manifest::parse(&manifest_toml(&target, "755", "*.py")).unwrap();
    let engine = DeployEngine::new(LocalRepository::new(store.path().to_path_buf()));

    let report = engine.apply(&manifest, &ApplyOptions::default()).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let back: deploy_core::ApplyReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.success, report.success);
    assert_eq!(back.actions, report.actions);
}
