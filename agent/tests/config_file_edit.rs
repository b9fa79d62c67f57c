//! Integration test: editing a config file while `PACKETLOG_*` overrides are set
//!
//! Lives in its own test binary because it changes the process environment.

use anyhow::Result;
use packetlog_agent::AgentConfig;
use packetlog_shared::types::filter::ExclusionSet;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_edit_keeps_file_values_under_env_overrides() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("packetlog.toml");
    fs::write(
        &path,
        "log_dir = \"captures\"\nexclusions = [\"0x001\"]\n",
    )?;

    std::env::set_var("PACKETLOG_LOG_DIR", "/tmp/ephemeral_override");
    std::env::set_var("PACKETLOG_EXCLUSIONS", "0x002");

    // the merged view sees the overrides
    let merged = AgentConfig::load(Some(&path))?;
    assert_eq!(merged.log_dir, PathBuf::from("/tmp/ephemeral_override"));
    assert_eq!(merged.exclusions, vec!["0x002"]);

    let add = ExclusionSet::parse_all(["0x00A"])?;
    let (changed, set) = AgentConfig::edit_exclusions(&path, &add, true)?;

    std::env::remove_var("PACKETLOG_LOG_DIR");
    std::env::remove_var("PACKETLOG_EXCLUSIONS");

    assert_eq!(changed, 1);
    assert_eq!(set.to_identifiers(), vec!["0x001", "0x00A"]);

    let saved = fs::read_to_string(&path)?;
    assert!(!saved.contains("ephemeral_override"), "{}", saved);
    assert!(!saved.contains("0x002"), "{}", saved);

    let reloaded = AgentConfig::load_file(&path)?;
    assert_eq!(reloaded.log_dir, PathBuf::from("captures"));
    assert_eq!(reloaded.exclusions, vec!["0x001", "0x00A"]);
    Ok(())
}
