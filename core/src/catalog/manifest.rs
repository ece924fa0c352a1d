use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::prelude::{IngestError, IngestResult};

/// File name of the directory listing read by the display client.
pub const MANIFEST_NAME: &str = "dir.list";

/// Weight token written in front of every listed product.
pub const ENTRY_WEIGHT: &str = "1";

/// Renders one `<weight> <name>` line per entry, in the given order.
pub fn render(entries: &[String]) -> String {
    entries
        .iter()
        .map(|name| format!("{} {}\n", ENTRY_WEIGHT, name))
        .collect()
}

/// Replaces the manifest in `dir` with a listing of `entries`.
pub fn publish(dir: &Path, entries: &[String]) -> IngestResult<()> {
    let path = dir.join(MANIFEST_NAME);
    match fs::remove_file(&path) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => return Err(IngestError::io(&path)(err)),
    }
    fs::write(&path, render(entries)).map_err(IngestError::io(&path))
}

/// Parses a manifest back into product names.
pub fn parse(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter_map(|line| line.split_once(' ').map(|(_, name)| name.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_prefixes_each_entry_with_weight() {
        let entries = vec![
            "TAMU_20220401_1200".to_string(),
            "TAMU_20220401_1205".to_string(),
        ];
        assert_eq!(
            render(&entries),
            "1 TAMU_20220401_1200\n1 TAMU_20220401_1205\n"
        );
    }

    #[test]
    fn empty_catalog_renders_empty_manifest() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn parse_reads_rendered_names() {
        let entries = vec!["TAMU_20220401_1200".to_string()];
        assert_eq!(parse(&render(&entries)), entries);
    }
}
