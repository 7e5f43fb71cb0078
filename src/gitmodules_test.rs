use super::*;

const SAMPLE: &str = r#"[submodule "extensions/zig"]
	path = extensions/zig
	url = https://github.com/example/zed-zig.git
[submodule "extensions/astro"]
	path = extensions/astro
	url = https://github.com/example/zed-astro.git
	branch = main
"#;

fn gitmodules_path() -> &'static Path {
    Path::new(".gitmodules")
}

#[test]
fn test_parse_entries() {
    let map = SubmoduleMap::parse(SAMPLE, gitmodules_path()).unwrap();
    assert_eq!(map.len(), 2);

    let astro = map.get("extensions/astro").unwrap();
    assert_eq!(astro.path(), Some("extensions/astro"));
    assert_eq!(astro.url(), Some("https://github.com/example/zed-astro.git"));
    assert_eq!(astro.get("branch"), Some("main"));
}

#[test]
fn test_parse_keeps_file_order() {
    let map = SubmoduleMap::parse(SAMPLE, gitmodules_path()).unwrap();
    let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["extensions/zig", "extensions/astro"]);
}

#[test]
fn test_parse_comments_quotes_and_blank_lines() {
    let content = "# comment\n\n[submodule \"extensions/a\"]\n  ; another\n  path = \"extensions/a\"\n  url=https://example.com/a.git\n";
    let map = SubmoduleMap::parse(content, gitmodules_path()).unwrap();
    let a = map.get("extensions/a").unwrap();
    assert_eq!(a.path(), Some("extensions/a"));
    assert_eq!(a.url(), Some("https://example.com/a.git"));
}

#[test]
fn test_parse_empty_url_is_missing() {
    let content = "[submodule \"extensions/a\"]\n\tpath = extensions/a\n\turl =\n";
    let map = SubmoduleMap::parse(content, gitmodules_path()).unwrap();
    assert_eq!(map.get("extensions/a").unwrap().url(), None);
}

#[test]
fn test_parse_keys_are_case_insensitive() {
    let content = "[submodule \"extensions/a\"]\n\tPath = extensions/a\n\tURL = https://github.com/x/a.git\n";
    let map = SubmoduleMap::parse(content, gitmodules_path()).unwrap();
    let a = map.get("extensions/a").unwrap();
    assert_eq!(a.path(), Some("extensions/a"));
    assert_eq!(a.url(), Some("https://github.com/x/a.git"));
}

#[test]
fn test_parse_strips_trailing_comments() {
    let content = "[submodule \"extensions/a\"]\n\tpath = extensions/a ; checkout dir\n\turl = https://github.com/x/a.git # mirror\n";
    let map = SubmoduleMap::parse(content, gitmodules_path()).unwrap();
    let a = map.get("extensions/a").unwrap();
    assert_eq!(a.path(), Some("extensions/a"));
    assert_eq!(a.url(), Some("https://github.com/x/a.git"));
}

#[test]
fn test_parse_comment_chars_inside_quotes_are_kept() {
    let content = "[submodule \"extensions/a\"]\n\tbranch = \"release#1 \" # note\n";
    let map = SubmoduleMap::parse(content, gitmodules_path()).unwrap();
    assert_eq!(map.get("extensions/a").unwrap().get("branch"), Some("release#1 "));
}

#[test]
fn test_normalize_quotes_values_that_need_it() {
    let content = "[submodule \"extensions/a\"]\n\tBranch = \"release#1\"\n";
    let once = normalize_gitmodules_str(content, gitmodules_path()).unwrap();
    assert_eq!(once, "[submodule \"extensions/a\"]\n\tbranch = \"release#1\"\n");

    let twice = normalize_gitmodules_str(&once, gitmodules_path()).unwrap();
    assert_eq!(once, twice);
}

// === 境界値テスト ===

#[test]
fn test_parse_key_outside_section() {
    let err = SubmoduleMap::parse("url = https://x\n", gitmodules_path()).unwrap_err();
    assert!(err.to_string().contains("outside of a section"), "{err}");
}

#[test]
fn test_parse_bad_header() {
    let err = SubmoduleMap::parse("[remote \"origin\"]\n", gitmodules_path()).unwrap_err();
    assert!(matches!(err, PublishError::Parse { .. }));
}

#[test]
fn test_parse_line_without_equals() {
    let content = "[submodule \"a\"]\n\tpath\n";
    let err = SubmoduleMap::parse(content, gitmodules_path()).unwrap_err();
    assert!(err.to_string().contains("line 2"), "{err}");
}

#[test]
fn test_insert_replaces_existing() {
    let mut map = SubmoduleMap::default();
    map.insert("extensions/a", Submodule::new("extensions/a", "https://old"));
    map.insert("extensions/a", Submodule::new("extensions/a", "https://new"));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("extensions/a").unwrap().url(), Some("https://new"));
}

// === 正規化 ===

#[test]
fn test_normalize_sorts_and_keeps_extra_keys() {
    let normalized = normalize_gitmodules_str(SAMPLE, gitmodules_path()).unwrap();
    let expected = "[submodule \"extensions/astro\"]\n\tpath = extensions/astro\n\turl = https://github.com/example/zed-astro.git\n\tbranch = main\n[submodule \"extensions/zig\"]\n\tpath = extensions/zig\n\turl = https://github.com/example/zed-zig.git\n";
    assert_eq!(normalized, expected);
}

#[test]
fn test_normalize_is_idempotent() {
    let once = normalize_gitmodules_str(SAMPLE, gitmodules_path()).unwrap();
    let twice = normalize_gitmodules_str(&once, gitmodules_path()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_normalize_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".gitmodules");
    std::fs::write(&path, SAMPLE).unwrap();

    assert!(normalize_gitmodules(&path).unwrap());
    assert!(!normalize_gitmodules(&path).unwrap());
}
