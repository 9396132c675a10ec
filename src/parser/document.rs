// Document parser: loads the permission JSON and reports data problems the
// database would only surface later as foreign-key or conflict noise.

use crate::error::SeedError;
use crate::logger;
use crate::parser::PermissionDocument;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    // Read and deserialize the whole file. Nothing is emitted on failure.
    pub fn parse_file(&self, path: &Path) -> Result<PermissionDocument, SeedError> {
        logger::debug(&format!("ParseDocument: Opening file {}", path.display()));
        let raw = fs::read_to_string(path).map_err(|e| SeedError::read(path, e))?;
        let doc = self.parse_str(&raw, path)?;
        logger::debug(&format!(
            "ParseDocument: {} groups, {} permission records",
            doc.groups.len(),
            doc.permissions.len()
        ));
        Ok(doc)
    }

    pub fn parse_str(&self, raw: &str, origin: &Path) -> Result<PermissionDocument, SeedError> {
        serde_json::from_str(raw).map_err(|e| SeedError::from_json(origin, e))
    }

    // Collect one message per repeated group inside a permission's list and per
    // group that is granted a permission without being declared in `groups`.
    pub fn check(&self, doc: &PermissionDocument) -> Vec<String> {
        let declared: BTreeSet<&str> = doc.groups.iter().map(String::as_str).collect();
        let mut problems = Vec::new();

        for perm in &doc.permissions {
            let mut seen = BTreeSet::new();
            for group in &perm.groups {
                if !seen.insert(group.as_str()) {
                    problems.push(format!(
                        "permission {} lists group {} more than once",
                        perm.name, group
                    ));
                } else if !declared.contains(group.as_str()) {
                    problems.push(format!(
                        "permission {} references undeclared group {}",
                        perm.name, group
                    ));
                }
            }
        }

        for problem in &problems {
            logger::warn(&format!("CheckDocument: {}", problem));
        }
        problems
    }
}
