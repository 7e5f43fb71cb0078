use super::*;

#[test]
fn test_parse_extension_toml() {
    let content = r#"
id = "my-extension"
name = "My Extension"
version = "0.2.0"
schema_version = 1
authors = ["Me <me@example.com>"]
description = "This extension is very cool"
repository = "https://github.com/example/my-extension"
"#;
    let manifest = ExtensionManifest::parse(content, Path::new("extension.toml")).unwrap();
    assert_eq!(manifest.id, "my-extension");
    assert_eq!(manifest.display_name(), "My Extension");
    assert_eq!(manifest.schema_version(), Some(1));
    assert_eq!(manifest.authors.len(), 1);
}

#[test]
fn test_parse_extension_toml_minimal() {
    let content = "id = \"a\"\nname = \"A\"\nversion = \"1.0.0\"\n";
    let manifest = ExtensionManifest::parse(content, Path::new("extension.toml")).unwrap();
    assert!(manifest.schema_version.is_none());
    assert!(manifest.authors.is_empty());
    assert!(manifest.description.is_none());
}

#[test]
fn test_parse_extension_toml_missing_id() {
    let content = "name = \"A\"\nversion = \"1.0.0\"\n";
    let err = ExtensionManifest::parse(content, Path::new("extension.toml")).unwrap_err();
    assert!(matches!(err, PublishError::Parse { .. }));
}

#[test]
fn test_parse_package_manifest() {
    let json = r#"{
        "name": "My Extension",
        "version": "0.2.0",
        "authors": ["Me <me@example.com>"],
        "description": "Cool",
        "repository": "https://github.com/example/my-extension",
        "schema_version": 1
    }"#;
    let manifest = PackageManifest::parse(json, Path::new("manifest.json")).unwrap();
    assert_eq!(manifest.name, "My Extension");
    assert_eq!(manifest.version, "0.2.0");
    assert_eq!(manifest.schema_version(), Some(1));
}

// === 境界値テスト: 必須フィールド ===

#[test]
fn test_parse_package_manifest_missing_version() {
    let json = r#"{"name": "test"}"#;
    assert!(PackageManifest::parse(json, Path::new("manifest.json")).is_err());
}

#[test]
fn test_parse_package_manifest_name_wrong_type() {
    let json = r#"{"name": 123, "version": "1.0.0"}"#;
    assert!(PackageManifest::parse(json, Path::new("manifest.json")).is_err());
}

#[test]
fn test_load_package_manifest_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(PACKAGE_MANIFEST),
        r#"{"name": "X", "version": "1.0.0"}"#,
    )
    .unwrap();

    let manifest = PackageManifest::load_from_dir(dir.path()).unwrap();
    assert_eq!(manifest.version, "1.0.0");
    assert!(manifest.authors.is_empty());
}

#[test]
fn test_load_package_manifest_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = PackageManifest::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, PublishError::Io(_)));
}
