use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PRICE_LIST: &str = "\
LISTA DE PRECIOS POR RUBRO
CODIGO
CUBIERTOS
1001 TENEDOR MESA 10.00 100.00 12.10 121.00
1002 CUCHILLO ASADO* 20,50 200 24,81 242
1003 CUCHARA (CAJA X 12) 5 50 6.05 60.5
1004 CUCHARITA 1 2 3
pagina 1
VAJILLA
2001 PLATO HONDO ªª 8 80 9.68 96.8
";

/// A command whose per-user config directory is the given temp dir.
fn pricelist(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pricelist").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path());
    cmd
}

fn write_price_list(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, PRICE_LIST).unwrap();
    path
}

#[test]
fn extract_csv_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_price_list(dir.path(), "lista.txt");

    pricelist(&dir)
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "code,description,category,unit_price_incl_tax,bulk_price_incl_tax,\
             unit_price_excl_tax,bulk_price_excl_tax,image_reference,is_active,is_low_stock\n",
        ))
        .stdout(predicate::str::contains(
            "1001,TENEDOR MESA,CUBIERTOS,12.10,121.00,10.00,100.00,1001.jpg,TRUE,FALSE\n",
        ))
        .stdout(predicate::str::contains(
            "1002,CUCHILLO ASADO,CUBIERTOS,24.81,242,20.50,200,1002.jpg,TRUE,TRUE\n",
        ))
        .stdout(predicate::str::contains("1003,CUCHARA,CUBIERTOS,"))
        .stdout(predicate::str::contains("2001,PLATO HONDO,VAJILLA,9.68,96.8,8,80,2001.jpg,TRUE,TRUE\n"))
        .stdout(predicate::str::contains("1004").not())
        .stderr(predicate::str::contains("did not match"));
}

#[test]
fn extract_compact_to_file() {
    let dir = TempDir::new().unwrap();
    let input = write_price_list(dir.path(), "lista.txt");
    let output = dir.path().join("out.csv");

    pricelist(&dir)
        .args(["extract", "--compact", "-o"])
        .arg(&output)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 products written"));

    let content = fs::read_to_string(&output).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("code,description,category,unit_price_incl_tax,bulk_price_incl_tax,image_reference,is_active,is_low_stock")
    );
    assert_eq!(
        lines.next(),
        Some("1001,TENEDOR MESA,CUBIERTOS,12.10,121.00,1001.jpg,TRUE,FALSE")
    );
    assert_eq!(content.lines().count(), 5);
}

#[test]
fn extract_json_report() {
    let dir = TempDir::new().unwrap();
    let input = write_price_list(dir.path(), "lista.txt");

    let output = pricelist(&dir)
        .args(["extract", "--format", "json"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["products"].as_array().unwrap().len(), 4);
    assert_eq!(report["categories"], serde_json::json!(["CUBIERTOS", "VAJILLA"]));
    assert_eq!(report["stats"]["rejected"], 1);
    assert_eq!(report["products"][1]["is_low_stock"], true);
}

#[test]
fn extract_regex_strategy_matches_token_strategy() {
    let dir = TempDir::new().unwrap();
    let input = write_price_list(dir.path(), "lista.txt");

    let token = pricelist(&dir).arg("extract").arg(&input).output().unwrap();
    let regex = pricelist(&dir)
        .args(["extract", "--strategy", "regex"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(token.status.success());
    assert!(regex.status.success());
    assert_eq!(token.stdout, regex.stdout);
}

#[test]
fn extract_summary_goes_to_stderr() {
    let dir = TempDir::new().unwrap();
    let input = write_price_list(dir.path(), "lista.txt");

    pricelist(&dir)
        .args(["extract", "--summary", "--format", "text"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("[1002] CUCHILLO ASADO [low stock]"))
        .stderr(predicate::str::contains("Products:  4"))
        .stderr(predicate::str::contains("Low stock: 2"));
}

#[test]
fn extract_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    pricelist(&dir)
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn extract_document_without_products_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.txt");
    fs::write(&input, "SOLO UN TITULO\nnada mas\n").unwrap();

    pricelist(&dir)
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No products found"));
}

#[test]
fn extract_uses_explicit_config() {
    let dir = TempDir::new().unwrap();
    let input = write_price_list(dir.path(), "lista.txt");
    let config = dir.path().join("config.json");
    fs::write(
        &config,
        r#"{ "parser": { "image_extension": "png" }, "export": { "delimiter": ";" } }"#,
    )
    .unwrap();

    pricelist(&dir)
        .arg("--config")
        .arg(&config)
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("1001;TENEDOR MESA;CUBIERTOS;12.10;121.00;10.00;100.00;1001.png;TRUE;FALSE"));
}

#[test]
fn extract_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let input = write_price_list(dir.path(), "lista.txt");
    let config = dir.path().join("config.json");
    fs::write(
        &config,
        r#"{ "parser": { "price_columns": ["unit_excl_tax", "unit_excl_tax", "unit_incl_tax", "bulk_incl_tax"] } }"#,
    )
    .unwrap();

    pricelist(&dir)
        .arg("--config")
        .arg(&config)
        .arg("extract")
        .arg(&input)
        .assert()
        .failure();
}

#[test]
fn clean_strips_trailing_numbers() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("productos.csv");
    fs::write(
        &input,
        "code,description,category,is_low_stock\n\
         1,CUCHILLO 1339.0,CUBIERTOS,TRUE\n\
         2,OLLA 24,OLLAS,FALSE\n",
    )
    .unwrap();

    pricelist(&dir)
        .arg("clean")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned 1 of 2 descriptions"))
        .stdout(predicate::str::contains("Categories: 2"))
        .stdout(predicate::str::contains("Low stock:  1"));

    let cleaned = fs::read_to_string(dir.path().join("productos_clean.csv")).unwrap();
    assert_eq!(
        cleaned,
        "code,description,category,is_low_stock\n1,CUCHILLO,CUBIERTOS,TRUE\n2,OLLA 24,OLLAS,FALSE\n"
    );
}

#[test]
fn clean_requires_description_column() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("otro.csv");
    fs::write(&input, "code,name\n1,X\n").unwrap();

    pricelist(&dir)
        .arg("clean")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing column: description"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    write_price_list(dir.path(), "a.txt");
    write_price_list(dir.path(), "b.txt");
    fs::write(dir.path().join("c.txt"), "nada\n").unwrap();
    let out = dir.path().join("out");

    let pattern = dir.path().join("*.txt");
    pricelist(&dir)
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .arg("--output-dir")
        .arg(&out)
        .args(["--summary", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 files"))
        .stdout(predicate::str::contains("Failed files:"));

    assert!(out.join("a.csv").exists());
    assert!(out.join("b.csv").exists());
    assert!(!out.join("c.csv").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let mut lines = summary.lines();
    assert_eq!(
        lines.next(),
        Some("filename,status,products,categories,low_stock,rejected_lines,processing_time_ms,error")
    );
    assert!(summary.contains("a.txt,success,4,2,2,1,"));
    assert!(summary.contains("c.txt,error,"));
}

#[test]
fn batch_stops_on_first_error_by_default() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("solo.txt"), "nada\n").unwrap();

    let pattern = dir.path().join("*.txt");
    pricelist(&dir)
        .arg("batch")
        .arg(pattern.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn config_init_set_get() {
    let dir = TempDir::new().unwrap();

    pricelist(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));

    pricelist(&dir)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(dir.path().join("pricelist").join("config.json").exists());

    pricelist(&dir)
        .args(["config", "set", "parser.strategy", "regex"])
        .assert()
        .success();

    pricelist(&dir)
        .args(["config", "get", "parser.strategy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"regex\""));

    pricelist(&dir)
        .args(["config", "set", "parser.min_tokens", "2"])
        .assert()
        .failure();

    pricelist(&dir)
        .args(["config", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn config_show_defaults() {
    let dir = TempDir::new().unwrap();

    pricelist(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"price_columns\""))
        .stdout(predicate::str::contains("LISTA DE PRECIOS POR RUBRO"));
}
