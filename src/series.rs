// 📈 Time-Series Aggregator - Balances per transaction for an account prefix
//
// Matching is a literal `starts_with` on the account name, so `Ass` matches
// `Assets:Bank`. The date range is open: transactions dated exactly `from` or
// exactly `to` are left out.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

use crate::ledger::Transaction;

// ============================================================================
// DATA POINT
// ============================================================================

/// Aggregated amount of one transaction for one target.
///
/// Serializes as `[value, epoch_millis]`, value first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl DataPoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        DataPoint { timestamp, value }
    }

    pub fn millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

impl Serialize for DataPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut pair = serializer.serialize_tuple(2)?;
        pair.serialize_element(&self.value)?;
        pair.serialize_element(&self.millis())?;
        pair.end()
    }
}

/// One target's series, in the shape the dashboard expects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub target: String,
    pub datapoints: Vec<DataPoint>,
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Sum of the postings in `tx` whose account starts with `target`,
/// or `None` when no posting matched.
pub fn fold_transaction(tx: &Transaction, target: &str) -> Option<Decimal> {
    let (sum, matched) = tx
        .postings
        .iter()
        .filter(|p| p.account.starts_with(target))
        .fold((Decimal::ZERO, false), |(sum, _), p| (sum + p.amount, true));

    matched.then_some(sum)
}

/// True when `date` lies strictly between `from` and `to`
pub fn in_open_range(date: DateTime<Utc>, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
    date > from && date < to
}

/// One data point per matching transaction, in ledger order.
///
/// Transactions sharing a date are not merged. The decimal sum is converted
/// to `f64` only at the end, so precision is lost once per point.
pub fn aggregate(
    transactions: &[Transaction],
    target: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<DataPoint> {
    transactions
        .iter()
        .filter(|tx| in_open_range(tx.date, from, to))
        .filter_map(|tx| {
            fold_transaction(tx, target)
                .map(|sum| DataPoint::new(tx.date, sum.to_f64().unwrap_or_default()))
        })
        .collect()
}

/// Run one independent aggregation per target, keeping request order
pub fn query<S: AsRef<str>>(
    transactions: &[Transaction],
    targets: &[S],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<TimeSeries> {
    targets
        .iter()
        .map(|target| TimeSeries {
            target: target.as_ref().to_string(),
            datapoints: aggregate(transactions, target.as_ref(), from, to),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
