// Seed generator: derive groups/plugins/actions from a PermissionDocument and
// render the idempotent INSERT script.
//
// Block order is fixed (groups, plugins, permissions, group_permissions) so every
// subquery in a later block resolves against rows inserted by an earlier one.

use crate::logger;
use crate::parser::{is_system_group, PermissionDocument, PermissionRecord};
use std::collections::{BTreeMap, BTreeSet};

pub type PluginActions<'a> = BTreeMap<&'a str, BTreeSet<&'a str>>;

/// Which blocks to emit and whether to wrap them in `BEGIN;`/`COMMIT;`.
///
/// Groups and plugins are always emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
    pub include_permissions: bool,
    pub include_mappings: bool,
    pub wrap_in_transaction: bool,
}

impl SeedOptions {
    // Groups + plugins only, no transaction.
    pub fn basic() -> Self {
        Self {
            include_permissions: false,
            include_mappings: false,
            wrap_in_transaction: false,
        }
    }

    // All four blocks inside one transaction.
    pub fn complete() -> Self {
        Self {
            include_permissions: true,
            include_mappings: true,
            wrap_in_transaction: true,
        }
    }
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self::complete()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub groups: usize,
    pub plugins: usize,
    pub permission_records: usize,
    pub permission_rows: usize,
    pub mapping_rows: usize,
}

pub struct SeedGenerator {
    options: SeedOptions,
    // Named in the groups block comment (the input file name).
    source_label: String,
}

impl SeedGenerator {
    pub fn new(options: SeedOptions, source_label: impl Into<String>) -> Self {
        Self {
            options,
            source_label: source_label.into(),
        }
    }

    // Render the complete script in memory. Callers write it only after this
    // returns, so a failed run never leaves a truncated statement behind.
    pub fn generate(&self, doc: &PermissionDocument) -> (String, SeedSummary) {
        logger::debug("GenerateSeed: Deriving groups and plugin actions");
        let groups = derive_groups(doc);
        let plugin_actions = derive_plugin_actions(&doc.permissions);

        let mut summary = SeedSummary {
            groups: groups.len(),
            plugins: plugin_actions.len(),
            permission_records: doc.permissions.len(),
            ..SeedSummary::default()
        };

        let mut blocks: Vec<(String, String)> = vec![
            (
                format!("-- Insert all groups from {}", self.source_label),
                emit_groups_sql(&groups),
            ),
            (
                "-- Insert all plugins from permission prefixes".to_string(),
                emit_plugins_sql(&plugin_actions),
            ),
        ];
        if self.options.include_permissions {
            summary.permission_rows = plugin_actions.values().map(BTreeSet::len).sum();
            blocks.push((
                "-- Insert all permissions (plugin_id + action)".to_string(),
                emit_permissions_sql(&plugin_actions),
            ));
        }
        if self.options.include_mappings {
            summary.mapping_rows = doc.permissions.iter().map(|p| p.groups.len()).sum();
            blocks.push((
                "-- Insert all group permission mappings".to_string(),
                emit_group_permissions_sql(&doc.permissions),
            ));
        }

        let mut out = String::new();
        if self.options.wrap_in_transaction {
            out.push_str("BEGIN;\n\n");
        }
        for (comment, statement) in blocks {
            if statement.is_empty() {
                logger::debug(&format!("GenerateSeed: Skipping empty block ({})", comment));
                continue;
            }
            out.push_str(&comment);
            out.push('\n');
            out.push_str(&statement);
            out.push_str("\n\n");
        }
        if self.options.wrap_in_transaction {
            out.push_str("COMMIT;\n");
        }

        logger::debug(&format!(
            "GenerateSeed: {} groups, {} plugins, {} permissions, {} mappings",
            summary.groups, summary.plugins, summary.permission_rows, summary.mapping_rows
        ));
        (out, summary)
    }
}

pub fn derive_groups(doc: &PermissionDocument) -> BTreeSet<&str> {
    doc.groups.iter().map(String::as_str).collect()
}

pub fn derive_plugin_actions(permissions: &[PermissionRecord]) -> PluginActions<'_> {
    permissions
        .iter()
        .map(PermissionRecord::plugin_action)
        .fold(BTreeMap::new(), |mut acc, (plugin, action)| {
            acc.entry(plugin).or_insert_with(BTreeSet::new).insert(action);
            acc
        })
}

pub fn emit_groups_sql(groups: &BTreeSet<&str>) -> String {
    let rows = groups
        .iter()
        .map(|g| format!("({}, {})", sql_literal(g), is_system_group(g)))
        .collect();
    insert_statement("groups (name, is_system)", rows, "name")
}

pub fn emit_plugins_sql(plugin_actions: &PluginActions<'_>) -> String {
    let rows = plugin_actions
        .keys()
        .map(|p| format!("({})", sql_literal(p)))
        .collect();
    insert_statement("plugins (name)", rows, "name")
}

pub fn emit_permissions_sql(plugin_actions: &PluginActions<'_>) -> String {
    let rows = plugin_actions
        .iter()
        .flat_map(|(plugin, actions)| {
            actions
                .iter()
                .map(move |action| format!("({}, {})", plugin_ref(plugin), sql_literal(action)))
        })
        .collect();
    insert_statement("permissions (plugin_id, action)", rows, "plugin_id, action")
}

// Input order is kept and repeated groups repeat rows; ON CONFLICT absorbs them.
pub fn emit_group_permissions_sql(permissions: &[PermissionRecord]) -> String {
    let rows = permissions
        .iter()
        .flat_map(|perm| {
            let (plugin, action) = perm.plugin_action();
            perm.groups.iter().map(move |group| {
                format!(
                    "((SELECT id FROM groups WHERE name = {}), (SELECT id FROM permissions WHERE plugin_id = {} AND action = {}), true)",
                    sql_literal(group),
                    plugin_ref(plugin),
                    sql_literal(action)
                )
            })
        })
        .collect();
    insert_statement(
        "group_permissions (group_id, permission_id, allowed)",
        rows,
        "group_id, permission_id",
    )
}

// Empty string when there are no rows: "VALUES" with nothing after it is not SQL.
fn insert_statement(target: &str, rows: Vec<String>, conflict_key: &str) -> String {
    if rows.is_empty() {
        return String::new();
    }
    format!(
        "INSERT INTO {} VALUES\n{}\nON CONFLICT ({}) DO NOTHING;",
        target,
        rows.join(",\n"),
        conflict_key
    )
}

fn plugin_ref(plugin: &str) -> String {
    format!("(SELECT id FROM plugins WHERE name = {})", sql_literal(plugin))
}

fn sql_literal(val: &str) -> String {
    format!("'{}'", val.replace('\'', "''"))
}
