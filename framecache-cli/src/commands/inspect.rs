//! Dump the index and shard files for one fingerprint.
//!
//! Reads the on-disk JSON directly rather than through the cache layers,
//! so the tool shows exactly what is on disk, including files a running
//! cache would demote to empty.

use crate::error::CliError;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Run the `inspect` subcommand.
pub fn run(
    cache_dir: &Path,
    fingerprint: &str,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), CliError> {
    let index_path = cache_dir.join(format!("{}_index.json", fingerprint));
    if !index_path.exists() {
        return Err(CliError::NoSuchFingerprint {
            fingerprint: fingerprint.to_string(),
            dir: cache_dir.to_path_buf(),
        });
    }

    let index = read_value(&index_path)?;
    println!("Index: {}", index_path.display());
    println!("{}", render(&index, compact));

    let mut shards = Map::new();
    for path in shard_files(cache_dir, fingerprint) {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        println!();
        println!("Shard: {}", path.display());
        match read_value(&path) {
            Ok(value) => {
                println!("{}", render(&value, compact));
                shards.insert(name, value);
            }
            Err(e) => {
                // Keep going: a corrupt shard is exactly what someone
                // inspecting a misbehaving cache wants to see listed.
                println!("  (unreadable: {})", e);
                shards.insert(name, Value::Null);
            }
        }
    }

    if let Some(output_path) = output {
        let mut dump = Map::new();
        dump.insert("fingerprint".to_string(), Value::String(fingerprint.into()));
        dump.insert("index".to_string(), index);
        dump.insert("shards".to_string(), Value::Object(shards));
        let text = render(&Value::Object(dump), compact);
        fs::write(output_path, text).map_err(|error| CliError::OutputWrite {
            path: output_path.to_path_buf(),
            error,
        })?;
        println!();
        println!("Dump saved to {}", output_path.display());
    }

    Ok(())
}

/// Shard files for `fingerprint`, sorted by shard id.
fn shard_files(cache_dir: &Path, fingerprint: &str) -> Vec<PathBuf> {
    let prefix = format!("{}_data_", fingerprint);
    let mut found: Vec<(u32, PathBuf)> = Vec::new();

    if let Ok(entries) = fs::read_dir(cache_dir) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(id_part) = name
                .strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(".json"))
            else {
                continue;
            };
            if let Ok(id) = id_part.parse::<u32>() {
                found.push((id, entry.path()));
            }
        }
    }

    found.sort_by_key(|(id, _)| *id);
    found.into_iter().map(|(_, path)| path).collect()
}

fn read_value(path: &Path) -> Result<Value, CliError> {
    let bytes = fs::read(path).map_err(|e| CliError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| CliError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn render(value: &Value, compact: bool) -> String {
    if compact {
        value.to_string()
    } else {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_files_sorted_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for id in [10, 2, 1] {
            fs::write(dir.path().join(format!("fp_data_{id}.json")), b"{}").unwrap();
        }
        fs::write(dir.path().join("fp_index.json"), b"{}").unwrap();
        fs::write(dir.path().join("other_data_1.json"), b"{}").unwrap();

        let files: Vec<String> = shard_files(dir.path(), "fp")
            .into_iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(
            files,
            vec!["fp_data_1.json", "fp_data_2.json", "fp_data_10.json"]
        );
    }

    #[test]
    fn test_missing_fingerprint_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path(), "nope", None, false);
        assert!(matches!(
            result,
            Err(CliError::NoSuchFingerprint { .. })
        ));
    }

    #[test]
    fn test_dump_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("fp_index.json"),
            b"{\"version\":1,\"entries\":{\"k\":1}}",
        )
        .unwrap();
        fs::write(
            dir.path().join("fp_data_1.json"),
            b"{\"version\":1,\"entries\":{\"k\":42}}",
        )
        .unwrap();

        let out = dir.path().join("dump.json");
        run(dir.path(), "fp", Some(&out), true).unwrap();

        let dump: Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(dump["fingerprint"], "fp");
        assert_eq!(dump["index"]["entries"]["k"], 1);
        assert_eq!(dump["shards"]["fp_data_1.json"]["entries"]["k"], 42);
    }
}
