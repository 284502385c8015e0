//! CSV output of the anonymized table.

use crate::error::{Result, ResultExt};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

/// Write `df` as CSV with a header row and no index column.
///
/// Missing parent directories are created; an existing file is overwritten.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .context(format!("Failed to write {}", path.display()))?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_table;

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out").join("anon.csv");
        let mut df = df![
            "first" => ["XXXXXX", "XXXXXX"],
            "amt" => ["0-9", "10-19"],
        ]
        .unwrap();

        write_table(&mut df, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().next(), Some("first,amt"));
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anon.csv");
        fs::write(&path, "stale,content\n1,2\n3,4\n5,6\n").unwrap();

        let mut df = df!["lat" => [40.1]].unwrap();
        write_table(&mut df, &path).unwrap();

        let reloaded = load_table(&path).unwrap();
        assert_eq!(reloaded.shape(), (1, 1));
        assert_eq!(reloaded.get_column_names()[0].as_str(), "lat");
    }

    #[test]
    fn test_write_quotes_fields_with_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anon.csv");
        let mut df = df!["merchant" => ["fraud_Rippin, Kub and Mann"]].unwrap();

        write_table(&mut df, &path).unwrap();

        let reloaded = load_table(&path).unwrap();
        let value = reloaded.column("merchant").unwrap().get(0).unwrap();
        assert_eq!(value.get_str(), Some("fraud_Rippin, Kub and Mann"));
    }
}
