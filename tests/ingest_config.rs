// tests/ingest_config.rs
use scholarstream::ingest::config::{load_sources_default, load_sources_from, ENV_SOURCES_PATH};
use std::{env, fs};

#[test]
fn file_names_are_checked_against_known_providers() {
    let known = scholarstream::known_sources();
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("sources.toml");
    fs::write(&p_toml, r#"sources = [" KAGGLE ", "", "unknown-board"]"#).unwrap();
    assert_eq!(load_sources_from(&p_toml, &known).unwrap(), vec!["kaggle"]);

    let p_json = dir.path().join("sources.json");
    fs::write(&p_json, r#"{"sources": ["unknown-board"]}"#).unwrap();
    let err = load_sources_from(&p_json, &known).unwrap_err();
    assert!(format!("{err:#}").contains("unknown-board"), "{err:#}");
}

#[test]
fn extension_decides_the_parser() {
    let known = scholarstream::known_sources();
    let dir = tempfile::tempdir().unwrap();

    // JSON content behind a .toml name is a parse error, not a silent fallback.
    let mislabeled = dir.path().join("sources.toml");
    fs::write(&mislabeled, r#"["kaggle"]"#).unwrap();
    assert!(load_sources_from(&mislabeled, &known).is_err());

    let no_ext = dir.path().join("sources");
    fs::write(&no_ext, r#"["kaggle"]"#).unwrap();
    assert!(load_sources_from(&no_ext, &known).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    let known = scholarstream::known_sources();
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    env::remove_var(ENV_SOURCES_PATH);

    // No config at all enables every source.
    assert!(load_sources_default(&known).unwrap().is_empty());

    // JSON fallback is used when no TOML exists.
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("ingest_sources.json"), r#"["Kaggle"]"#).unwrap();
    assert_eq!(load_sources_default(&known).unwrap(), vec!["kaggle"]);

    // TOML fallback wins over JSON.
    fs::write(cfg_dir.join("ingest_sources.toml"), "sources = []").unwrap();
    assert!(load_sources_default(&known).unwrap().is_empty());

    // The env path wins over both and must exist.
    let p_env = tmp.path().join("override.json");
    fs::write(&p_env, r#"["kaggle"]"#).unwrap();
    env::set_var(ENV_SOURCES_PATH, p_env.display().to_string());
    assert_eq!(load_sources_default(&known).unwrap(), vec!["kaggle"]);

    env::set_var(ENV_SOURCES_PATH, tmp.path().join("gone.json").display().to_string());
    assert!(load_sources_default(&known).is_err());

    env::remove_var(ENV_SOURCES_PATH);
    env::set_current_dir(&old).unwrap();
}
