// Parser module: the permission JSON document, the CSV matrix it is built from,
// and the permission listing a server prints.

pub mod document;
pub mod listing;
pub mod matrix;

use serde::{Deserialize, Serialize};

// Groups whose names carry this prefix are built-in (is_system = true).
pub const SYSTEM_GROUP_PREFIX: &str = "brit";

// Plugin that owns permission names without a dot.
pub const UNKNOWN_PLUGIN: &str = "unknown";

// PermissionDocument matches the JSON exchanged with the matrix converter:
// { "permissions": [...], "groups": [...] }.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDocument {
    pub permissions: Vec<PermissionRecord>,
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub groups: Vec<String>,
}

impl PermissionRecord {
    pub fn new(name: impl Into<String>, groups: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            groups,
        }
    }

    pub fn plugin_action(&self) -> (&str, &str) {
        split_permission_name(&self.name)
    }
}

/// Split a permission name into `(plugin, action)` on the first `.`.
///
/// Names without a dot belong to [`UNKNOWN_PLUGIN`] and keep the whole name as
/// the action. Only the first dot splits: `"a.b.c"` is plugin `a`, action `b.c`.
pub fn split_permission_name(name: &str) -> (&str, &str) {
    match name.split_once('.') {
        Some((plugin, action)) => (plugin, action),
        None => (UNKNOWN_PLUGIN, name),
    }
}

pub fn is_system_group(name: &str) -> bool {
    name.starts_with(SYSTEM_GROUP_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_name_splits_on_first_dot() {
        assert_eq!(split_permission_name("wiki.edit"), ("wiki", "edit"));
        assert_eq!(split_permission_name("kits.use.vip"), ("kits", "use.vip"));
    }

    #[test]
    fn bare_name_goes_to_unknown_plugin() {
        assert_eq!(split_permission_name("logout"), ("unknown", "logout"));
    }

    #[test]
    fn edge_dots_produce_empty_parts() {
        assert_eq!(split_permission_name(".edit"), ("", "edit"));
        assert_eq!(split_permission_name("wiki."), ("wiki", ""));
    }

    #[test]
    fn system_prefix_is_case_sensitive() {
        assert!(is_system_group("britAdmin"));
        assert!(is_system_group("brit"));
        assert!(!is_system_group("BritAdmin"));
        assert!(!is_system_group("editors"));
    }

    #[test]
    fn description_is_optional() {
        let doc: PermissionDocument = serde_json::from_str(
            r#"{"groups": ["a"], "permissions": [
                {"name": "x.y", "groups": ["a"]},
                {"name": "z", "description": "zed", "groups": []}
            ]}"#,
        )
        .unwrap();
        assert_eq!(doc.permissions[0].description, None);
        assert_eq!(doc.permissions[1].description.as_deref(), Some("zed"));
    }

    #[test]
    fn record_without_groups_is_rejected() {
        let res = serde_json::from_str::<PermissionDocument>(
            r#"{"groups": [], "permissions": [{"name": "x.y"}]}"#,
        );
        assert!(res.is_err());
    }
}
