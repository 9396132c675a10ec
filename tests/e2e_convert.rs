//! E2E tests for the helper subcommands: `convert` (CSV matrix -> JSON), `import` and `grants`.

mod common;

use common::{fixture, permseed_cmd, WIKI_DOC};
use predicates::str::contains;

const MATRIX: &str = "Permission,britAdmin,editors\r\nwiki.edit,X,x\r\nlogout,,X\r\n";

#[test]
fn convert_prints_pretty_json() {
    let (matrix, _guard) = fixture("permissions.csv", MATRIX);
    let out = permseed_cmd()
        .arg("convert")
        .arg(&matrix)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "permissions": [
                {"name": "wiki.edit", "groups": ["britAdmin", "editors"]},
                {"name": "logout", "groups": ["editors"]}
            ],
            "groups": ["britAdmin", "editors"]
        })
    );
    assert!(String::from_utf8(out).unwrap().starts_with("{\n  \"permissions\": ["));
}

#[test]
fn converted_document_feeds_generate() {
    let (matrix, guard) = fixture("permissions.csv", MATRIX);
    let json = guard.path().join("rust-permissions.json");
    permseed_cmd()
        .arg("convert")
        .arg(&matrix)
        .arg("--output")
        .arg(&json)
        .assert()
        .success()
        .stderr(contains("2 permissions, 2 groups"));

    permseed_cmd()
        .arg("generate")
        .arg(&json)
        .assert()
        .success()
        .stdout(contains("('unknown'),\n('wiki')"))
        .stdout(contains("((SELECT id FROM plugins WHERE name = 'unknown'), 'logout')"));
}

#[test]
fn convert_empty_matrix_fails() {
    let (matrix, _guard) = fixture("permissions.csv", "");
    permseed_cmd()
        .arg("convert")
        .arg(&matrix)
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("no header row"));
}

#[test]
fn grants_default_to_oxide_prefix() {
    let (input, _guard) = fixture("perms.json", WIKI_DOC);
    permseed_cmd()
        .arg("grants")
        .arg(&input)
        .assert()
        .success()
        .stdout("oxide.grant user editors wiki.edit\n");
}

#[test]
fn grants_custom_prefix() {
    let (input, _guard) = fixture("perms.json", WIKI_DOC);
    permseed_cmd()
        .args(["grants", "--server", "carbon"])
        .arg(&input)
        .assert()
        .success()
        .stdout("c.grant user editors wiki.edit\n");

    permseed_cmd()
        .args(["grants", "--prefix", ""])
        .arg(&input)
        .assert()
        .success()
        .stdout("grant user editors wiki.edit\n");
}

#[test]
fn convert_skips_rows_without_a_name() {
    let (matrix, _guard) = fixture("permissions.csv", "Permission,vip\n   \n,X\nkits.use,X\n");
    let out = permseed_cmd()
        .arg("convert")
        .arg(&matrix)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        value["permissions"],
        serde_json::json!([{"name": "kits.use", "groups": ["vip"]}])
    );
}

#[test]
fn grants_group_mode_with_create_and_revoke() {
    let (input, _guard) = fixture(
        "perms.json",
        r#"{"groups": ["admin", "vip"], "permissions": [
            {"name": "kits.use", "groups": ["vip", "admin"]},
            {"name": "tp.home", "groups": ["vip"]}
        ]}"#,
    );
    permseed_cmd()
        .args(["grants", "--mode", "group", "--create-groups", "--revoke-before-grant"])
        .arg(&input)
        .assert()
        .success()
        .stdout(
            "oxide.group add admin\n\
             oxide.group add vip\n\
             oxide.group revoke vip kits.use\n\
             oxide.group revoke vip tp.home\n\
             oxide.group grant vip kits.use\n\
             oxide.group grant vip tp.home\n\
             oxide.group revoke admin kits.use\n\
             oxide.group grant admin kits.use\n",
        );
}

#[test]
fn grants_flags_rejected_in_user_mode() {
    let (input, _guard) = fixture("perms.json", WIKI_DOC);
    permseed_cmd()
        .args(["grants", "--create-groups"])
        .arg(&input)
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("need --mode group"));
}

// ─── import ────────────────────────────────────────────────────────

#[test]
fn import_merges_server_listing() {
    let (doc, guard) = fixture(
        "rust-permissions.json",
        r#"{"groups": ["britAdmin", "vip"], "permissions": [
            {"name": "kits.use", "groups": ["vip"]},
            {"name": "old.thing", "groups": ["britAdmin"]}
        ]}"#,
    );
    let listing = guard.path().join("perms.txt");
    std::fs::write(&listing, "Permissions:\nzones.edit, kits.use,\n\n").unwrap();
    let merged = guard.path().join("merged.json");

    permseed_cmd()
        .arg("import")
        .arg(&doc)
        .arg(&listing)
        .arg("-o")
        .arg(&merged)
        .assert()
        .success()
        .stdout("")
        .stderr(contains("ImportListing: 1 to add, 1 to remove, 1 unchanged"));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&merged).unwrap()).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "permissions": [
                {"name": "kits.use", "groups": ["vip"]},
                {"name": "zones.edit", "groups": []}
            ],
            "groups": ["britAdmin", "vip"]
        })
    );
}

#[test]
fn import_missing_listing_fails() {
    let (doc, guard) = fixture("perms.json", WIKI_DOC);
    permseed_cmd()
        .arg("import")
        .arg(&doc)
        .arg(guard.path().join("absent.txt"))
        .assert()
        .failure()
        .stdout("")
        .stderr(contains("cannot read"));
}
