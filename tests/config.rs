use sharp_clippy::LintEngine;
use sharp_clippy::config::{self, DEFAULT_CONFIG_FILE_NAME};
use sharp_clippy::level::Severity;
use sharp_clippy::lint::LintRegistry;
use std::fs;

const HIDING: &str = "class B { public virtual void M() { } }\nclass D : B { public void M() { } }\n";

fn engine_from(cfg: &config::ClippyConfig) -> LintEngine {
    LintEngine::new_with_settings(LintRegistry::default_rules(), cfg.to_settings())
}

#[test]
fn config_is_found_in_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("src").join("Models");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        dir.path().join(DEFAULT_CONFIG_FILE_NAME),
        "[lints]\nhides_inherited_member = \"error\"\n",
    )
    .unwrap();

    let (path, cfg) = config::load_config(None, &nested)
        .expect("config should load")
        .expect("config should be found");
    assert_eq!(path, dir.path().join(DEFAULT_CONFIG_FILE_NAME));

    let diags = engine_from(&cfg).lint_source(HIDING).unwrap();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity, Severity::Error);
}

#[test]
fn no_config_found_yields_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(config::load_config(None, dir.path()).unwrap().is_none());
}

#[test]
fn explicit_missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let explicit = dir.path().join("absent.toml");
    let err = config::load_config(Some(&explicit), dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("failed to read config file"));
}

#[test]
fn config_can_disable_lint_and_category() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_CONFIG_FILE_NAME);
    fs::write(
        &path,
        r#"
[lints]
disabled = ["hides_inherited_member"]
readability = "none"
"#,
    )
    .unwrap();
    let cfg = config::load_config_file(&path).unwrap();

    let src = "class B { public virtual void M() { } }\nclass D : B { public void M() { } int F(bool a) => a ? 1 : (a ? 2 : 3); }\n";
    assert!(engine_from(&cfg).lint_source(src).unwrap().is_empty());
}

#[test]
fn config_enables_preview_rules() {
    let cfg = config::ClippyConfig::from_toml("[lints]\npreview = true\n").unwrap();
    let diags = engine_from(&cfg)
        .lint_source("class A { static public void M() { } }")
        .unwrap();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].id(), "modifiers_order");
}

#[test]
fn parse_errors_name_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DEFAULT_CONFIG_FILE_NAME);
    fs::write(&path, "[lints\n").unwrap();

    let err = config::load_config_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse config file"));
}
