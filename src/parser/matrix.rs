// Matrix parser: turns the permission spreadsheet export into a PermissionDocument.
//
// Layout:
//   header:  <anything>,groupA,groupB,...
//   rows:    perm.name,X,,x
// A cell marks a grant when it trims to "X" (any case). Cells are split on plain
// commas; quoted CSV fields are not supported.

use crate::error::SeedError;
use crate::logger;
use crate::parser::{PermissionDocument, PermissionRecord};
use regex::Regex;
use std::fs;
use std::path::Path;

pub struct MatrixParser {
    line_re: Regex,
}

impl MatrixParser {
    pub fn new() -> Self {
        let line_re = Regex::new(r"\r?\n").expect("valid line break regex");
        Self { line_re }
    }

    pub fn parse_file(&self, path: &Path) -> Result<PermissionDocument, SeedError> {
        logger::debug(&format!("ParseMatrix: Opening file {}", path.display()));
        let raw = fs::read_to_string(path).map_err(|e| SeedError::read(path, e))?;
        self.parse_str(&raw)
            .ok_or_else(|| SeedError::EmptyMatrix { path: path.to_path_buf() })
    }

    // Returns None when there is no header line.
    pub fn parse_str(&self, raw: &str) -> Option<PermissionDocument> {
        let mut lines = self.line_re.split(raw).filter(|l| !l.is_empty());
        let header = lines.next()?;

        // Keep each group's column index so blank header cells don't shift the rest.
        let columns: Vec<(usize, String)> = header
            .split(',')
            .enumerate()
            .skip(1)
            .map(|(i, h)| (i, h.trim().to_string()))
            .filter(|(_, h)| !h.is_empty())
            .collect();

        // Rows with a blank name (whitespace-only lines included) are dropped.
        let permissions: Vec<PermissionRecord> = lines
            .filter_map(|line| {
                let cells: Vec<&str> = line.split(',').collect();
                let name = cells[0].trim();
                if name.is_empty() {
                    logger::debug(&format!("ParseMatrix: Skipping row without a name: {:?}", line));
                    return None;
                }
                let groups = columns
                    .iter()
                    .filter(|(i, _)| {
                        cells
                            .get(*i)
                            .is_some_and(|c| c.trim().eq_ignore_ascii_case("X"))
                    })
                    .map(|(_, g)| g.clone())
                    .collect();
                Some(PermissionRecord::new(name, groups))
            })
            .collect();

        logger::debug(&format!(
            "ParseMatrix: {} groups, {} permissions",
            columns.len(),
            permissions.len()
        ));

        Some(PermissionDocument {
            permissions,
            groups: columns.into_iter().map(|(_, g)| g).collect(),
        })
    }
}
