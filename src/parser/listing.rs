// Listing parser: reads the permission list a game server prints, e.g.
//
//   Permissions:
//   kits.use, kits.admin, teleport.home,
//   logout
//
// Names are comma-separated and may wrap across lines. Blank lines and the
// `Permissions:` header are skipped; repeated names keep their first position.

use crate::error::SeedError;
use crate::logger;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const LISTING_HEADER: &str = "Permissions:";

pub struct ListingParser;

impl ListingParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file(&self, path: &Path) -> Result<Vec<String>, SeedError> {
        logger::debug(&format!("ParseListing: Opening file {}", path.display()));
        let raw = fs::read_to_string(path).map_err(|e| SeedError::read(path, e))?;
        let names = self.parse_str(&raw);
        logger::debug(&format!("ParseListing: {} permission names", names.len()));
        Ok(names)
    }

    pub fn parse_str(&self, raw: &str) -> Vec<String> {
        let mut seen = BTreeSet::new();
        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && *line != LISTING_HEADER)
            .flat_map(|line| line.split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != LISTING_HEADER)
            .filter(|name| seen.insert(*name))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_span_lines_and_commas() {
        let raw = "Permissions:\r\n  kits.use, kits.admin ,\n\nteleport.home,logout\n";
        assert_eq!(
            ListingParser::new().parse_str(raw),
            vec!["kits.use", "kits.admin", "teleport.home", "logout"]
        );
    }

    #[test]
    fn header_and_repeats_are_dropped() {
        let raw = "Permissions:\na, b\nb, Permissions:, ,c\n";
        assert_eq!(ListingParser::new().parse_str(raw), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_listing() {
        assert!(ListingParser::new().parse_str("Permissions:\n\n").is_empty());
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ListingParser::new()
            .parse_file(&dir.path().join("perms.txt"))
            .unwrap_err();
        assert!(matches!(err, SeedError::Read { .. }), "{err:?}");
    }
}
