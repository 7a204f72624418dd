// End-to-end: ledger file on disk -> index -> query

use chrono::{DateTime, TimeZone, Utc};
use ledger_datasource::{query, AccountIndex, Ledger};
use std::fs;
use tempfile::TempDir;

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn load_sample() -> (TempDir, Ledger) {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("fees.ledger"),
        "2023-01-10 Bank fee\n    Assets:Bank:Checking  $-20.00\n    Expenses:Fees\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("main.ledger"),
        "2023-01-05 Groceries\n    Assets:Bank:Checking  $-50.00\n    Expenses:Food  $50.00\n\ninclude fees.ledger\n",
    )
    .unwrap();

    let ledger = Ledger::load(&dir.path().join("main.ledger")).unwrap();
    (dir, ledger)
}

#[test]
fn test_search_covers_every_prefix() {
    let (_dir, ledger) = load_sample();

    let index = AccountIndex::build(ledger.transactions());

    for name in ["Assets:", "Assets:Bank:", "Assets:Bank:Checking", "Expenses:", "Expenses:Food"] {
        assert!(index.contains(name), "missing {}", name);
    }
    assert!(index.contains("Expenses:Fees"));
    assert_eq!(index.len(), 6);
}

#[test]
fn test_query_worked_example() {
    let (_dir, ledger) = load_sample();

    let series = query(
        ledger.transactions(),
        &["Assets:Bank:Checking"],
        at(2023, 1, 1),
        at(2023, 1, 31),
    );

    assert_eq!(series.len(), 1);
    let json = serde_json::to_string(&series[0].datapoints).unwrap();
    assert_eq!(json, "[[-50.0,1672876800000],[-20.0,1673308800000]]");

    let empty = query(
        ledger.transactions(),
        &["Assets:Bank:Checking"],
        at(2023, 1, 5),
        at(2023, 1, 10),
    );
    assert!(empty[0].datapoints.is_empty());
}

#[test]
fn test_elided_amount_is_queryable() {
    let (_dir, ledger) = load_sample();

    let series = query(ledger.transactions(), &["Expenses:Fees"], at(2023, 1, 1), at(2023, 1, 31));

    assert_eq!(series[0].datapoints.len(), 1);
    assert_eq!(series[0].datapoints[0].value, 20.0);
}
