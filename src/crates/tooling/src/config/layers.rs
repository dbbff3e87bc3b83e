//! Layered TOML configuration files
//!
//! Each layer is a partial document. Layers are deep-merged in order, so a
//! later file only needs to mention the keys it overrides.

use crate::{Result, ToolingError};
use std::path::Path;
use toml::{Table, Value};
use tracing::debug;

/// Recursively merge `overlay` into `base`; overlay values win
///
/// Tables merge key by key; any other value (arrays included) replaces the
/// base value wholesale.
pub fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        if let Value::Table(incoming) = value {
            if let Some(Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

/// Read one TOML layer; a missing file is not an error
pub fn read_layer(path: &Path) -> Result<Option<Table>> {
    if !path.exists() {
        debug!(path = %path.display(), "Config layer not found");
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let table = content.parse::<Table>().map_err(|e| ToolingError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!(path = %path.display(), keys = table.len(), "Loaded config layer");
    Ok(Some(table))
}

/// Read and merge every existing layer, in order
pub fn read_layers<P: AsRef<Path>>(paths: &[P]) -> Result<Table> {
    let mut merged = Table::new();
    for path in paths {
        if let Some(layer) = read_layer(path.as_ref())? {
            merge_tables(&mut merged, layer);
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table(s: &str) -> Table {
        s.parse().unwrap()
    }

    #[test]
    fn test_merge_tables_is_deep() {
        let mut base = table("[backend]\nmodel = \"a\"\nseed = 42\n[gate]\nenabled = true");
        merge_tables(&mut base, table("[backend]\nmodel = \"b\""));

        assert_eq!(base["backend"]["model"].as_str(), Some("b"));
        assert_eq!(base["backend"]["seed"].as_integer(), Some(42));
        assert_eq!(base["gate"]["enabled"].as_bool(), Some(true));
    }

    #[test]
    fn test_merge_tables_replaces_arrays() {
        let mut base = table("keywords = [\"a\", \"b\"]");
        merge_tables(&mut base, table("keywords = [\"c\"]"));
        assert_eq!(base["keywords"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_read_layers_skips_missing_files() {
        let dir = TempDir::new().unwrap();
        let user = dir.path().join("user.toml");
        let project = dir.path().join("project.toml");
        std::fs::write(&user, "[backend]\nmodel = \"user\"\nbase_url = \"http://u\"").unwrap();
        std::fs::write(&project, "[backend]\nmodel = \"project\"").unwrap();

        let merged =
            read_layers(&[dir.path().join("missing.toml"), user, project]).unwrap();
        assert_eq!(merged["backend"]["model"].as_str(), Some("project"));
        assert_eq!(merged["backend"]["base_url"].as_str(), Some("http://u"));
    }

    #[test]
    fn test_read_layer_reports_path_on_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[backend\nmodel = ").unwrap();

        match read_layer(&path) {
            Err(ToolingError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
