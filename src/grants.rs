// Grant command renderer: the same permission document as console commands for
// a game server's permission system.
//
// User mode:  one `<prefix>grant user <group> <perm>` line per grant, in permission order.
// Group mode: `<prefix>group grant <group> <perm>` lines batched per group (first
// appearance order), optionally preceded by `group add` for every declared group
// and a `group revoke` before each grant.

use crate::parser::PermissionDocument;
use clap::ValueEnum;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServerKind {
    Oxide,
    Carbon,
}

impl ServerKind {
    pub fn command_prefix(self) -> &'static str {
        match self {
            ServerKind::Oxide => "oxide.",
            ServerKind::Carbon => "c.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GrantMode {
    /// `grant user <group> <perm>`, one line per permission grant.
    User,
    /// `group grant <group> <perm>`, batched per group.
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantOptions {
    pub mode: GrantMode,
    pub create_groups: bool,
    pub revoke_before_grant: bool,
}

impl Default for GrantOptions {
    fn default() -> Self {
        Self {
            mode: GrantMode::User,
            create_groups: false,
            revoke_before_grant: false,
        }
    }
}

pub fn render_commands(doc: &PermissionDocument, prefix: &str, options: GrantOptions) -> String {
    match options.mode {
        GrantMode::User => render_grant_commands(doc, prefix),
        GrantMode::Group => render_group_commands(doc, prefix, options),
    }
}

// Groups repeated inside one permission produce a single command.
pub fn render_grant_commands(doc: &PermissionDocument, prefix: &str) -> String {
    let mut lines = Vec::new();
    for perm in &doc.permissions {
        let mut seen = BTreeSet::new();
        for group in perm.groups.iter().filter(|g| seen.insert(g.as_str())) {
            lines.push(format!("{}grant user {} {}", prefix, group, perm.name));
        }
    }
    lines.join("\n")
}

pub fn render_group_commands(doc: &PermissionDocument, prefix: &str, options: GrantOptions) -> String {
    let mut lines = Vec::new();

    if options.create_groups {
        let mut declared = BTreeSet::new();
        for group in doc.groups.iter().filter(|g| declared.insert(g.as_str())) {
            lines.push(format!("{}group add {}", prefix, group));
        }
    }

    for (group, perms) in grants_by_group(doc) {
        if options.revoke_before_grant {
            for perm in &perms {
                lines.push(format!("{}group revoke {} {}", prefix, group, perm));
            }
        }
        for perm in &perms {
            lines.push(format!("{}group grant {} {}", prefix, group, perm));
        }
    }
    lines.join("\n")
}

// Group -> permission names, both in first-appearance order, each pair once.
fn grants_by_group(doc: &PermissionDocument) -> Vec<(&str, Vec<&str>)> {
    let mut by_group: Vec<(&str, Vec<&str>)> = Vec::new();
    let mut seen = BTreeSet::new();
    for perm in &doc.permissions {
        for group in &perm.groups {
            if !seen.insert((group.as_str(), perm.name.as_str())) {
                continue;
            }
            match by_group.iter().position(|(g, _)| *g == group.as_str()) {
                Some(i) => by_group[i].1.push(perm.name.as_str()),
                None => by_group.push((group.as_str(), vec![perm.name.as_str()])),
            }
        }
    }
    by_group
}
