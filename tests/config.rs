//! Configuration parsing tests.

use ntclean::config::expand_path;
use ntclean::{AccountSource, Config, Level, Platform};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn empty_config_uses_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.general.level, "info");
    assert_eq!(config.general.app_name, "ntclean");
    assert!(config.terminal.enabled);
    assert!(!config.file.enabled);
    assert_eq!(config.paths.platform, "auto");
    assert!(config.host.self_uin.is_none());
    assert!(config.host.accounts.is_empty());
}

#[test]
fn parses_every_section() {
    let config = Config::parse(
        r#"
[general]
level = "debug"
app_name = "cleaner"

[terminal]
colors = false

[file]
enabled = true
base_dir = "/var/log/ntclean"

[paths]
data_dir = "/srv/qq"
store = "/srv/ntclean/tasks.json"
platform = "linux"

[host]
self_uin = "10001"

[[host.accounts]]
uin = "10001"
uid = "u_alice"
nick_name = "alice"

[[host.accounts]]
uin = "10002"
uid = "u_bob"
"#,
    )
    .unwrap();

    assert_eq!(config.parse_level(), Level::Debug);
    assert!(!config.terminal.colors);
    assert!(config.terminal.enabled);
    assert_eq!(config.log_dir(), PathBuf::from("/var/log/ntclean"));
    assert_eq!(config.data_dir(), PathBuf::from("/srv/qq"));
    assert_eq!(config.store_path(), PathBuf::from("/srv/ntclean/tasks.json"));
    assert_eq!(config.parse_platform(), Platform::Linux);
    assert_eq!(config.host.accounts[0].nick_name.as_deref(), Some("alice"));
}

#[test]
fn account_source_resolves_the_current_account() {
    let config = Config::parse(
        r#"
[host]
self_uin = "10002"
accounts = [
  { uin = "10001", uid = "u_alice" },
  { uin = "10002", uid = "u_bob" },
  { uin = "10003", uid = "" },
]
"#,
    )
    .unwrap();

    let source = config.account_source();
    let list = source.login_list().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(source.current_account().unwrap().uid, "u_bob");
}

#[test]
fn unknown_self_uin_has_no_current_identity() {
    let config = Config::parse("[host]\nself_uin = \"99999\"\n").unwrap();
    assert!(config.account_source().current_account().is_none());
}

#[test]
fn unknown_level_falls_back_to_info() {
    let config = Config::parse("[general]\nlevel = \"chatty\"\n").unwrap();
    assert_eq!(config.parse_level(), Level::Info);
}

#[test]
fn platform_names() {
    for (name, expected) in [
        ("windows", Platform::Windows),
        ("Win", Platform::Windows),
        ("linux", Platform::Linux),
        (" UNIX ", Platform::Linux),
        ("auto", Platform::detect()),
        ("amiga", Platform::detect()),
    ] {
        let config = Config::parse(&format!("[paths]\nplatform = \"{name}\"\n")).unwrap();
        assert_eq!(config.parse_platform(), expected, "{name}");
    }
}

#[test]
fn missing_file_is_default_and_bad_toml_errors() {
    let dir = tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.general.level, "info");

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[general\nlevel = 1").unwrap();
    assert!(matches!(
        Config::load_from(&bad),
        Err(ntclean::Error::ConfigParse(_))
    ));
}

#[test]
fn expands_home_and_variables() {
    let home = std::env::var("HOME").unwrap_or_default();
    if !home.is_empty() {
        assert_eq!(expand_path("~/qq"), PathBuf::from(format!("{home}/qq")));
    }
    assert_eq!(
        expand_path("$NTCLEAN_SURELY_UNSET_VAR/x"),
        PathBuf::from("$NTCLEAN_SURELY_UNSET_VAR/x")
    );
    assert_eq!(expand_path("/plain/path"), PathBuf::from("/plain/path"));
}
