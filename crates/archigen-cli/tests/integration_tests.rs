//! Integration tests for the archigen binary.

use std::fs;
use std::path::Path;

use assert_cmd::{Command, cargo};
use predicates::prelude::*;
use tempfile::TempDir;

const LAYERS: [&str; 5] = [
    "Shop.Application",
    "Shop.Domain",
    "Shop.Infrastructure",
    "Shop.Persistence",
    "Shop.WebAPI",
];

/// A solution with empty layer projects.
fn solution() -> TempDir {
    let temp = TempDir::new().unwrap();
    for layer in LAYERS {
        fs::create_dir_all(temp.path().join("project").join(layer)).unwrap();
    }
    temp
}

/// The binary run from `root`, with a config file of its own.
fn archigen(root: &Path) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("archigen");
    cmd.current_dir(root)
        .env_remove("ARCHIGEN_SOLUTION")
        .env_remove("ARCHIGEN_TEMPLATE_DIR")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .args(["--config"])
        .arg(root.join("archigen.toml"));
    cmd
}

#[test]
fn test_help_flag() {
    let mut cmd = cargo::cargo_bin_cmd!("archigen");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("crud"))
        .stdout(predicate::str::contains("add-property"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_version_flag() {
    let mut cmd = cargo::cargo_bin_cmd!("archigen");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_crud_generates_entity() {
    let temp = solution();

    archigen(temp.path())
        .args(["crud", "Shop", "Product", "--props", "Name:string,Price:decimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"))
        .stdout(predicate::str::contains("Product.cs"));

    let entity = temp
        .path()
        .join("project/Shop.Domain/Entities/Product.cs");
    let text = fs::read_to_string(entity).unwrap();
    assert!(text.contains("public decimal Price { get; set; }"));
}

#[test]
fn test_crud_twice_writes_nothing_new() {
    let temp = solution();
    let run = || {
        archigen(temp.path())
            .args(["crud", "Shop", "Product", "--props", "Name:string"])
            .assert()
            .success()
    };
    run();
    run().stdout(predicate::str::contains("(0 files written)"));
}

#[test]
fn test_crud_json_report() {
    let temp = solution();

    let output = archigen(temp.path())
        .args(["--output-format", "json"])
        .args(["crud", "Shop", "Product", "--props", "Name:string"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["entity"], "Product");
    let entries = report["entries"].as_array().unwrap();
    assert!(entries
        .iter()
        .any(|e| e["artifact"] == "entity" && e["status"] == "created"));
}

#[test]
fn test_solution_flag_from_elsewhere() {
    let temp = solution();
    let elsewhere = TempDir::new().unwrap();

    archigen(elsewhere.path())
        .arg("--solution")
        .arg(temp.path())
        .args(["crud", "Shop", "Tag", "--props", "Label"])
        .assert()
        .success();

    assert!(temp
        .path()
        .join("project/Shop.Domain/Entities/Tag.cs")
        .is_file());
}

#[test]
fn test_add_property_after_crud() {
    let temp = solution();
    archigen(temp.path())
        .args(["crud", "Shop", "Product", "--props", "Name:string"])
        .assert()
        .success();

    archigen(temp.path())
        .args(["add-property", "Shop", "Product", "Description", "string?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Description added to Product"));

    let entity =
        fs::read_to_string(temp.path().join("project/Shop.Domain/Entities/Product.cs")).unwrap();
    assert!(entity.contains("public string? Description { get; set; }"));
}

#[test]
fn test_parse_entity_json() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("Order.cs");
    fs::write(
        &file,
        "public class Order : Entity<Guid>\n{\n    public decimal Total { get; set; }\n}\n",
    )
    .unwrap();

    let output = archigen(temp.path())
        .args(["--output-format", "json", "parse-entity"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let entity: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entity["name"], "Order");
    assert_eq!(entity["id_type"], "Guid");
    assert_eq!(entity["properties"][0]["name"], "Total");
    assert_eq!(entity["properties"][0]["declared_type"], "decimal");
}

#[test]
fn test_layout_lists_layers() {
    let temp = solution();
    fs::remove_dir_all(temp.path().join("project/Shop.Infrastructure")).unwrap();

    archigen(temp.path())
        .arg("layout")
        .arg(temp.path())
        .arg("Shop")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shop.Persistence"))
        .stdout(predicate::str::contains("(missing)"));
}

#[test]
fn test_config_set_then_get() {
    let temp = TempDir::new().unwrap();

    archigen(temp.path())
        .args(["config", "set", "generation.id_type", "Guid"])
        .assert()
        .success();

    archigen(temp.path())
        .args(["config", "get", "generation.id_type"])
        .assert()
        .success()
        .stdout(predicate::str::diff("Guid\n"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = cargo::cargo_bin_cmd!("archigen");
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("archigen"));
}
