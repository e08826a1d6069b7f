use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::prelude::*;
use std::path::Path;

fn farmchainx(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("farmchainx").unwrap();
    cmd.env("FARMCHAINX_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn farmer_list_shows_seed_batches() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["farmer", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("C101"))
        .stdout(predicate::str::contains("Sweet Corn"))
        .stdout(predicate::str::contains("C103"));
}

#[test]
fn added_crop_is_listed_and_persisted() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["farmer", "add", "Okra", "--quantity", "40", "--type", "Vegetable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered C1004 Okra (40 kg)"));

    farmchainx(home.path())
        .args(["farmer", "list", "--search", "okra"])
        .assert()
        .success()
        .stdout(predicate::str::contains("C1004"))
        .stdout(predicate::str::contains("Sweet Corn").not());

    assert!(home.path().join("farmchainx_farmer_records_v1.json").exists());
}

#[test]
fn add_without_quantity_fails() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["farmer", "add", "Okra"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing or invalid field: quantity"));
}

#[test]
fn delete_with_yes_skips_prompt() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["farmer", "delete", "C102", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted C102"));

    farmchainx(home.path())
        .args(["farmer", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groundnut").not());
}

#[test]
fn declined_delete_keeps_record() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["farmer", "delete", "C102"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted."));

    farmchainx(home.path())
        .args(["farmer", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groundnut"));
}

#[test]
fn unknown_id_is_an_error() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["farmer", "status", "C999", "approved"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Record not found: C999"));
}

#[test]
fn export_writes_csv_file() {
    let home = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["farmer", "export", "--out"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 rows"));

    let files: Vec<_> = std::fs::read_dir(out.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("crops-"), "{}", name);

    let csv = std::fs::read_to_string(&files[0]).unwrap();
    assert!(csv.contains("\"Sweet Corn\""));
}

#[test]
fn qr_payload_verifies_once() {
    let home = tempfile::tempdir().unwrap();

    let output = farmchainx(home.path())
        .args(["farmer", "qr", "C101"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let payload = String::from_utf8(output.stdout).unwrap();
    assert!(payload.contains("\"batchId\":\"C101\""));

    farmchainx(home.path())
        .args(["consumer", "verify", "-"])
        .write_stdin(payload.clone())
        .assert()
        .success()
        .stdout(predicate::str::contains("Verified Sweet Corn (C101) as V1001"));

    farmchainx(home.path())
        .args(["consumer", "verify", payload.trim()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Batch C101 is already verified"));
}

#[test]
fn corrupt_payload_is_rejected() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["consumer", "verify", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid or corrupted QR payload"));

    farmchainx(home.path())
        .args(["consumer", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No records yet."));
}

#[test]
fn feedback_on_verified_product() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["consumer", "verify", r#"{"batchId":"C103","name":"Onions"}"#])
        .assert()
        .success();

    farmchainx(home.path())
        .args(["consumer", "feedback", "V1001", "-r", "4", "-c", "Crisp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Feedback F1001 submitted for Onions: 4/5"));

    farmchainx(home.path())
        .args(["consumer", "feedback-list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Crisp"))
        .stdout(predicate::str::contains("Average rating"))
        .stdout(predicate::str::contains("4.0"));
}

#[test]
fn feedback_needs_known_product() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["consumer", "feedback", "V1001", "-r", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Record not found: V1001"));
}

#[test]
fn retailer_add_requires_price() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["retailer", "add", "Mangoes", "--quantity", "30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing or invalid field: price"));
}

#[test]
fn low_stock_threshold_comes_from_config() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["retailer", "add", "Mangoes", "-q", "60", "-p", "80"])
        .assert()
        .success();

    farmchainx(home.path())
        .args(["retailer", "alerts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mangoes is low on stock (60 kg)"));

    farmchainx(home.path())
        .args(["config", "low-stock-threshold", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("low-stock-threshold set to 50"));

    farmchainx(home.path())
        .args(["retailer", "alerts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mangoes").not());
}

#[test]
fn config_shows_all_keys() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("low-stock-threshold = 100"))
        .stdout(predicate::str::contains("expiry-window-days = 3"));
}

#[test]
fn admin_approval_updates_stats_and_log() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["admin", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Pending approvals\s+1").unwrap());

    farmchainx(home.path())
        .args(["admin", "approve", "U1003"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Approved U1003 ravi@example.com"));

    farmchainx(home.path())
        .args(["admin", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Pending approvals\s+0").unwrap());

    farmchainx(home.path())
        .args(["admin", "log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("User ravi@example.com approved"));
}

#[test]
fn distributor_deliver_changes_status() {
    let home = tempfile::tempdir().unwrap();

    farmchainx(home.path())
        .args(["distributor", "deliver", "S1001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shipment S1001 delivered to Retailer Suresh"));

    farmchainx(home.path())
        .args(["distributor", "alerts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No delayed shipments."));
}
