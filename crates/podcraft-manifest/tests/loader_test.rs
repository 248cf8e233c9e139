//! Loading manifests from disk.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use podcraft_common::error::PodcraftError;
use podcraft_manifest::{load_aci_manifest, load_pod_manifest, to_aci_manifest};

const WEB_POD: &str = r"
name: example.com/web:1.0.0
pod:
  apps:
    - name: api
      dependencies: [example.com/base:1]
      app:
        exec: [/bin/api]
    - name: worker
      app:
        exec: [/bin/worker, --queue, jobs]
";

#[test]
fn load_pod_manifest_reads_apps_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("pod-manifest.yml"), WEB_POD).expect("write");

    let manifest = load_pod_manifest(dir.path()).expect("load");
    assert_eq!(manifest.name.to_string(), "example.com/web:1.0.0");
    let names: Vec<&str> = manifest.apps().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["api", "worker"]);
}

#[test]
fn load_pod_manifest_missing_file_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_pod_manifest(dir.path()).expect_err("missing");
    assert!(matches!(err, PodcraftError::NotFound { kind: "pod manifest", .. }));
}

#[test]
fn load_pod_manifest_invalid_yaml_names_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("pod-manifest.yml"), "name: [unclosed").expect("write");
    let err = load_pod_manifest(dir.path()).expect_err("invalid yaml");
    assert!(matches!(err, PodcraftError::Manifest { .. }));
    assert!(err.to_string().contains("pod-manifest.yml"));
}

#[test]
fn load_pod_manifest_rejects_traversal_app_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let yaml = "name: web\npod:\n  apps:\n    - name: ../escape\n";
    std::fs::write(dir.path().join("pod-manifest.yml"), yaml).expect("write");
    let err = load_pod_manifest(dir.path()).expect_err("traversal");
    assert!(matches!(err, PodcraftError::Config { .. }));
}

#[test]
fn load_pod_manifest_rejects_app_names_with_spaces() {
    let dir = tempfile::tempdir().expect("tempdir");
    let yaml = "name: web\npod:\n  apps:\n    - name: my api\n    - name: my worker\n";
    std::fs::write(dir.path().join("pod-manifest.yml"), yaml).expect("write");
    let err = load_pod_manifest(dir.path()).expect_err("spaced name");
    assert!(err.to_string().contains("cannot be part of an image name"));
}

#[test]
fn load_aci_manifest_reads_name_and_app() {
    let dir = tempfile::tempdir().expect("tempdir");
    let yaml = "name: example.com/api:3\naci:\n  app:\n    exec: [/bin/api]\n";
    std::fs::write(dir.path().join("aci-manifest.yml"), yaml).expect("write");

    let manifest = load_aci_manifest(dir.path()).expect("load");
    assert_eq!(manifest.name.version(), Some("3"));
    assert_eq!(manifest.aci.app.expect("app").exec, vec!["/bin/api"]);
}

#[test]
fn translated_manifest_serializes_to_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("pod-manifest.yml"), WEB_POD).expect("write");
    let manifest = load_pod_manifest(dir.path()).expect("load");

    let aci = to_aci_manifest(&manifest.name, &manifest.apps()[0]).expect("translate");
    let json = serde_json::to_value(&aci).expect("serialize");
    assert_eq!(json["name"], "example.com/web_api:1.0.0");
    assert_eq!(json["aci"]["dependencies"][0], "example.com/base:1");
    assert_eq!(json["aci"]["app"]["exec"][0], "/bin/api");
}
