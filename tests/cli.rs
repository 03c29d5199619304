use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn splitit(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("splitit").unwrap();
    cmd.env("SPLITIT_DATA_DIR", data_dir.path())
        .env_remove("SPLITIT_LOG");
    cmd
}

fn setup_group(data_dir: &TempDir) {
    splitit(data_dir)
        .args(["group", "create", "Flat", "--members", "A,B,C"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created group: Flat"));

    splitit(data_dir)
        .args([
            "expense", "add", "--group", "Flat", "Groceries", "100", "--paid-by", "A", "--date",
            "2025-01-15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Period:  2025-01"));
}

#[test]
fn init_creates_data_files() {
    let data_dir = TempDir::new().unwrap();

    splitit(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(data_dir.path().join("config.json").exists());
    assert!(data_dir.path().join("data").join("expenses.json").exists());

    splitit(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized."));
}

#[test]
fn balances_and_settlement_flow() {
    let data_dir = TempDir::new().unwrap();
    setup_group(&data_dir);

    splitit(&data_dir)
        .args(["balance", "show", "Flat", "--period", "2025-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$66.67"))
        .stdout(predicate::str::contains("-$33.34"))
        .stdout(predicate::str::contains("To Pay"));

    splitit(&data_dir)
        .args(["settle", "record", "Flat", "--all", "--period", "2025-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded 2 payment(s):"))
        .stdout(predicate::str::contains("C pays A $33.34"));

    splitit(&data_dir)
        .args(["settle", "plan", "Flat", "--period", "2025-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Everyone is settled up."));

    splitit(&data_dir)
        .args(["settle", "list", "Flat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-01"));
}

#[test]
fn custom_split_must_match_total() {
    let data_dir = TempDir::new().unwrap();
    setup_group(&data_dir);

    splitit(&data_dir)
        .args([
            "expense", "add", "--group", "Flat", "Taxi", "10", "--paid-by", "B", "--share",
            "A=5", "--share", "B=4", "--date", "2025-01-16",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Shares sum to $9.00"));

    splitit(&data_dir)
        .args(["expense", "list", "--group", "Flat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Taxi").not());
}

#[test]
fn fill_rest_spreads_unallocated_amount() {
    let data_dir = TempDir::new().unwrap();
    setup_group(&data_dir);

    splitit(&data_dir)
        .args([
            "expense", "add", "--group", "Flat", "Hotel", "100", "--paid-by", "A", "--share",
            "A=70", "--fill-rest", "--date", "2025-01-17",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"A\s+\$70\.00").unwrap())
        .stdout(predicate::str::is_match(r"B\s+\$15\.00").unwrap())
        .stdout(predicate::str::is_match(r"C\s+\$15\.00").unwrap());
}

#[test]
fn monthly_report_csv() {
    let data_dir = TempDir::new().unwrap();
    setup_group(&data_dir);

    splitit(&data_dir)
        .args([
            "report", "monthly", "Flat", "--period", "2025-01", "--format", "csv", "--stdout",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Period,Group,Member,Paid,Share,Sent,Received,Balance,Status",
        ))
        .stdout(predicate::str::contains("2025-01,Flat,A,100.00,33.33,0.00,0.00,66.67,To Receive"));

    splitit(&data_dir)
        .args(["report", "monthly", "Flat", "--period", "2025-01", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Report exported to:"));

    assert!(data_dir
        .path()
        .join("exports")
        .join("flat-2025-01.json")
        .exists());
}

#[test]
fn period_helpers() {
    let data_dir = TempDir::new().unwrap();

    splitit(&data_dir)
        .args(["period", "key", "2024-02-29"])
        .assert()
        .success()
        .stdout("2024-02\n");

    splitit(&data_dir)
        .args(["period", "bounds", "2024-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("February 2024"))
        .stdout(predicate::str::contains("2024-02-29T23:59:59.999+00:00"));

    splitit(&data_dir)
        .args(["period", "key", "not a date"])
        .assert()
        .success()
        .stdout(predicate::str::contains("using today's period"));
}

#[test]
fn unknown_group_fails() {
    let data_dir = TempDir::new().unwrap();

    splitit(&data_dir)
        .args(["balance", "show", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Group not found: Nowhere"));
}
