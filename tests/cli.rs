use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIG: &str = r#"
report_name: monthly
report_format: both
sort_by: name
profiles: [prod, dev]
services: [EC2, S3]
start_date: "2024-01-01"
end_date: "2024-03-01"
period: monthly
exclude_taxes: true
exclude_support: true
"#;

fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("report.yaml");
    fs::write(&path, contents).unwrap();
    path
}

fn write_data(dir: &Path) -> std::path::PathBuf {
    let data = dir.join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("prod.csv"),
        "category,period,amount\n\
         EC2,2024-01-05,10\n\
         EC2,2024-01-20,5\n\
         Lambda,2024-02-01,2.5\n\
         Tax,2024-02-01,1\n\
         AWS Support (Business),2024-02-01,100\n\
         EC2,2024-02-01,not-a-number\n",
    )
    .unwrap();
    // dev.csv is missing on purpose: that account contributes nothing
    data
}

fn finops() -> Command {
    Command::cargo_bin("finops-report").unwrap()
}

#[test]
fn generate_writes_both_documents() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), CONFIG);
    let data = write_data(temp_dir.path());
    let out = temp_dir.path().join("out");

    finops()
        .arg("generate")
        .arg(&config)
        .arg("--data-dir")
        .arg(&data)
        .arg("--output-dir")
        .arg(&out)
        .arg("--csv")
        .assert()
        .success()
        .stdout(predicate::str::contains("markdown report written to"))
        .stdout(predicate::str::contains("html report written to"))
        .stdout(predicate::str::contains("1 of 2 fetched"))
        .stderr(predicate::str::contains("dev"));

    let markdown = fs::read_to_string(out.join("monthly.md")).unwrap();
    assert!(markdown.starts_with("# monthly\n"));
    assert!(markdown.contains("## Cost per service for account - prod"));
    assert!(markdown.contains("## Cost total per account"));
    assert!(markdown.contains("## Cost total per service"));
    assert!(markdown.contains("$ 17.50"));
    assert!(!markdown.contains("Support"));

    let html = fs::read_to_string(out.join("monthly.html")).unwrap();
    assert!(html.contains("<table id=\"table_1\""));
    assert!(html.contains("$ 17.50"));
    assert!(html.contains("prodServiceBarChart"));

    let csv = fs::read_to_string(out.join("monthly.csv")).unwrap();
    assert!(csv.starts_with("table,row,period,value\n"));
    assert!(csv.contains("account:prod,Other,2024-02,2.50"));
}

#[test]
fn invalid_config_fails_before_fetching() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        temp_dir.path(),
        &CONFIG.replace("period: monthly", "period: weekly"),
    );

    finops()
        .arg("generate")
        .arg(&config)
        .arg("--data-dir")
        .arg(temp_dir.path().join("does-not-exist"))
        .arg("--output-dir")
        .arg(temp_dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));

    assert!(!temp_dir.path().join("out").exists());
}

#[test]
fn missing_config_file_fails() {
    finops()
        .arg("validate")
        .arg("/nonexistent/report.yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read configuration file"));
}

#[test]
fn validate_prints_summary() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), CONFIG);

    finops()
        .arg("validate")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration OK"))
        .stdout(predicate::str::contains("prod, dev"))
        .stdout(predicate::str::contains("2 monthly periods"))
        .stdout(predicate::str::contains("tax, support"));
}

#[test]
fn periods_lists_canonical_and_display_forms() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        temp_dir.path(),
        &CONFIG
            .replace("period: monthly", "period: daily")
            .replace("end_date: \"2024-03-01\"", "end_date: \"2024-01-03\""),
    );

    finops()
        .arg("periods")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-01"))
        .stdout(predicate::str::contains("02/01"))
        .stdout(predicate::str::contains("2024-01-03").not());
}

#[test]
fn empty_window_is_not_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        temp_dir.path(),
        &CONFIG.replace("end_date: \"2024-03-01\"", "end_date: \"2024-01-01\""),
    );

    finops()
        .arg("periods")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No periods"));
}
