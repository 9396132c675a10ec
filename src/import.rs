// Import: replace a document's permission list with the names a server reports,
// keeping the group grants (and descriptions) of permissions that survive.

use crate::logger;
use crate::parser::{PermissionDocument, PermissionRecord};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportDiff {
    // In the listing, not in the document.
    pub to_add: Vec<String>,
    // In the document, not in the listing.
    pub to_remove: Vec<String>,
    pub unchanged: Vec<String>,
}

impl ImportDiff {
    pub fn between(doc: &PermissionDocument, listed: &[String]) -> Self {
        let current: BTreeSet<&str> = doc.permissions.iter().map(|p| p.name.trim()).collect();
        let listed_set: BTreeSet<&str> = listed.iter().map(|n| n.trim()).collect();

        let to_add = listed
            .iter()
            .filter(|n| !current.contains(n.trim()))
            .cloned()
            .collect();
        let (unchanged, to_remove): (Vec<String>, Vec<String>) = doc
            .permissions
            .iter()
            .map(|p| p.name.clone())
            .partition(|n| listed_set.contains(n.trim()));

        Self {
            to_add,
            to_remove,
            unchanged,
        }
    }
}

/// Build the merged document: one record per listed name, sorted by name, with
/// the grants of the matching existing record (none for new names). The declared
/// `groups` list is kept as is so groups without grants still get seeded.
pub fn merge_listing(doc: &PermissionDocument, listed: &[String]) -> (PermissionDocument, ImportDiff) {
    let diff = ImportDiff::between(doc, listed);
    logger::info(&format!(
        "ImportListing: {} to add, {} to remove, {} unchanged",
        diff.to_add.len(),
        diff.to_remove.len(),
        diff.unchanged.len()
    ));
    for name in &diff.to_add {
        logger::debug(&format!("ImportListing: + {}", name));
    }
    for name in &diff.to_remove {
        logger::debug(&format!("ImportListing: - {}", name));
    }

    let existing: HashMap<&str, &PermissionRecord> = doc
        .permissions
        .iter()
        .map(|p| (p.name.trim(), p))
        .collect();

    let mut permissions: Vec<PermissionRecord> = listed
        .iter()
        .map(|name| match existing.get(name.trim()) {
            Some(prev) => PermissionRecord {
                name: name.clone(),
                description: prev.description.clone(),
                groups: prev.groups.clone(),
            },
            None => PermissionRecord::new(name.clone(), Vec::new()),
        })
        .collect();
    permissions.sort_by(|a, b| a.name.cmp(&b.name));

    let merged = PermissionDocument {
        permissions,
        groups: doc.groups.clone(),
    };
    (merged, diff)
}
