//! YAML Storage Integration Tests

#![cfg(feature = "yaml")]

mod common;

use common::guild_document;
use pathstore::{Error, PathStore, PropertyBinding, StorageBackend, StoreConfig, YamlStore};
use serde_json::{Value, json};
use tempfile::TempDir;

fn yaml_store(temp_dir: &TempDir, document: Value) -> YamlStore {
    common::init_logging();
    let config = StoreConfig::yaml(temp_dir.path().join("db.yml"))
        .default_document(document)
        .build();
    PathStore::open(config).unwrap()
}

#[test]
fn test_yaml_file_is_written_as_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let store = yaml_store(&temp_dir, json!({}));

    store.set("settings.prefix", "!").unwrap();

    let content = std::fs::read_to_string(temp_dir.path().join("db.yml")).unwrap();
    assert!(content.contains("settings:"));
    assert!(content.contains("prefix: '!'") || content.contains("prefix: \"!\""));
    assert!(serde_json::from_str::<Value>(&content).is_err());
    assert_eq!(store.storage().extension(), "yml");
}

#[test]
fn test_yaml_document_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    drop(yaml_store(&temp_dir, guild_document()));

    let reopened = PathStore::yaml(temp_dir.path().join("db.yml")).unwrap();
    assert_eq!(reopened.document().unwrap(), guild_document());
}

#[test]
fn test_yaml_path_operations() {
    let temp_dir = TempDir::new().unwrap();
    let store = yaml_store(&temp_dir, guild_document());

    assert_eq!(store.get("guild.123.disabled_cogs.0").unwrap(), Some(json!("music")));
    assert_eq!(store.get("guild.123.disabled_cogs.x").unwrap(), None);

    store.set("guild.123.settings.language", "TR").unwrap();
    assert_eq!(store.get("guild.123.settings.language").unwrap(), Some(json!("TR")));

    assert!(store.remove("owners.1").unwrap());
    assert_eq!(store.get("owners").unwrap(), Some(json!([111])));
}

#[test]
fn test_hand_written_yaml_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hand.yml");
    std::fs::write(
        &path,
        "commands:\n  ping:\n    aliases: [p, pong]\n    cooldown: 2.5\n    enabled: yes\n",
    )
    .unwrap();

    let config = StoreConfig::yaml(&path).create_if_missing(false).build();
    let store = PathStore::open(config).unwrap();

    assert_eq!(store.get("commands.ping.aliases.1").unwrap(), Some(json!("pong")));
    assert_eq!(store.get("commands.ping.cooldown").unwrap(), Some(json!(2.5)));
}

#[test]
fn test_empty_yaml_file_reads_as_empty_mapping() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.yml");
    std::fs::write(&path, "").unwrap();

    let store = PathStore::yaml(&path).unwrap();
    assert_eq!(store.document().unwrap(), json!({}));

    store.set("a", 1).unwrap();
    assert_eq!(store.get("a").unwrap(), Some(json!(1)));
}

#[test]
fn test_yaml_property_validation() {
    let temp_dir = TempDir::new().unwrap();
    let store = yaml_store(&temp_dir, json!({"lang": "EN"}));

    store
        .bind_property(PropertyBinding::new("lang").validator(|v| {
            v.as_str().is_some_and(|s| s.len() == 2 && s.chars().all(char::is_uppercase))
        }))
        .unwrap();

    store.set_property("lang", "DE").unwrap();
    assert!(matches!(
        store.set_property("lang", "german").unwrap_err(),
        Error::Validation { .. }
    ));
    assert_eq!(store.get_property("lang").unwrap(), Some(json!("DE")));
}

#[test]
fn test_non_string_keys_are_written_back_as_strings() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("keys.yml");
    std::fs::write(&path, "guild:\n  123:\n    prefix: '!'\n").unwrap();

    let store = PathStore::yaml(&path).unwrap();
    assert_eq!(store.get("guild.123.prefix").unwrap(), Some(json!("!")));

    store.set("guild.456.prefix", "?").unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("'123':"));
    assert_eq!(store.get("guild.123.prefix").unwrap(), Some(json!("!")));
}

#[test]
fn test_corrupt_yaml_is_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.yml");
    std::fs::write(&path, "guild: [1, 2\n").unwrap();

    let store = PathStore::yaml(&path).unwrap();
    let err = store.get("guild").unwrap_err();
    assert!(matches!(err, Error::Parse { format: "YAML", .. }));
}
