// 📒 Ledger Model - Immutable transactions loaded once at startup
// The text grammar belongs to `ledger-parser`; this module only converts its
// output into the shape the query engine reads.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use ledger_parser::{Balance, PostingAmount, Price, Reality};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::source;

/// Separator between account name segments (`Assets:Bank:Checking`)
pub const ACCOUNT_SEPARATOR: char = ':';

// ============================================================================
// ERRORS
// ============================================================================

/// Everything that can go wrong while loading the source document.
/// None of these can happen after startup: queries never fail.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Cannot read ledger file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Include cycle detected at {0}")]
    IncludeCycle(PathBuf),

    #[error("Cannot parse ledger: {0}")]
    Parse(String),

    #[error("Transaction '{description}' on {date} has {count} postings without an amount (at most one allowed)")]
    AmbiguousElision {
        date: NaiveDate,
        description: String,
        count: usize,
    },

    #[error("Transaction '{description}' on {date} mixes commodities ({commodities}); cannot infer the elided amount")]
    MixedCommodities {
        date: NaiveDate,
        description: String,
        commodities: String,
    },
}

// ============================================================================
// CORE TYPES
// ============================================================================

/// One signed amount against one named account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub account: String,
    pub amount: Decimal,
}

impl Posting {
    pub fn new(account: impl Into<String>, amount: Decimal) -> Self {
        Posting {
            account: account.into(),
            amount,
        }
    }
}

/// A dated group of postings.
/// `date` is midnight UTC of the ledger date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: DateTime<Utc>,
    pub description: String,
    pub postings: Vec<Posting>,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, postings: Vec<Posting>) -> Self {
        Transaction {
            date: date.and_time(NaiveTime::MIN).and_utc(),
            description: description.into(),
            postings,
        }
    }
}

// ============================================================================
// LEDGER
// ============================================================================

/// Transactions in file order. Built once, never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Ledger { transactions }
    }

    /// Read `path` (following `include` directives) and parse it
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let text = source::read_with_includes(path)?;
        Self::parse(&text)
    }

    /// Parse ledger text that has already been assembled in memory
    pub fn parse(text: &str) -> Result<Self, LedgerError> {
        let parsed =
            ledger_parser::parse(text).map_err(|e| LedgerError::Parse(format!("{:?}", e)))?;

        // Running balance per account, in file order, for `= amount` assignments
        let mut balances: HashMap<String, Decimal> = HashMap::new();

        let transactions = parsed
            .items
            .into_iter()
            .filter_map(|item| match item {
                ledger_parser::LedgerItem::Transaction(tx) => Some(tx),
                _ => None,
            })
            .map(|tx| convert_transaction(tx, &mut balances))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Ledger { transactions })
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// What a written amount weighs when balancing, and in which commodity.
/// A price (`@`, `@@`) or lot price (`{}`) turns the quantity into its cost.
fn cost(pa: &PostingAmount) -> (Decimal, &str) {
    let quantity = pa.amount.quantity;
    match pa.price.as_ref().or(pa.lot_price.as_ref()) {
        Some(Price::Unit(unit)) => (quantity * unit.quantity, unit.commodity.name.as_str()),
        Some(Price::Total(total)) => {
            let magnitude = total.quantity.abs();
            let signed = if quantity.is_sign_negative() { -magnitude } else { magnitude };
            (signed, total.commodity.name.as_str())
        }
        None => (quantity, pa.amount.commodity.name.as_str()),
    }
}

/// Convert one parsed transaction, resolving balance assignments and the
/// elided amount if any.
///
/// Stored amounts are plain quantities; commodities only matter while
/// inferring the elided amount.
fn convert_transaction(
    tx: ledger_parser::Transaction,
    balances: &mut HashMap<String, Decimal>,
) -> Result<Transaction, LedgerError> {
    let elided = tx
        .postings
        .iter()
        .filter(|p| p.amount.is_none() && p.balance.is_none())
        .count();
    if elided > 1 {
        return Err(LedgerError::AmbiguousElision {
            date: tx.date,
            description: tx.description,
            count: elided,
        });
    }

    let mut amounts: Vec<Option<Decimal>> = Vec::with_capacity(tx.postings.len());
    let mut residual = Decimal::ZERO;
    let mut commodities: BTreeSet<&str> = BTreeSet::new();

    for p in &tx.postings {
        let current = balances.get(&p.account).copied().unwrap_or_default();
        let (amount, weight) = match (&p.amount, &p.balance) {
            (Some(pa), _) => {
                let (weight, commodity) = cost(pa);
                commodities.insert(commodity);
                (Some(pa.amount.quantity), weight)
            }
            // `= target` with no amount posts whatever reaches the target
            (None, Some(Balance::Amount(target))) => {
                commodities.insert(target.commodity.name.as_str());
                let amount = target.quantity - current;
                (Some(amount), amount)
            }
            (None, Some(Balance::Zero)) => (Some(-current), -current),
            (None, None) => (None, Decimal::ZERO),
        };

        if let Some(amount) = amount {
            *balances.entry(p.account.clone()).or_default() += amount;
        }
        // Unbalanced virtual postings `(Account)` don't take part in balancing
        if !matches!(p.reality, Reality::UnbalancedVirtual) {
            residual += weight;
        }
        amounts.push(amount);
    }

    if elided == 1 && commodities.len() > 1 {
        return Err(LedgerError::MixedCommodities {
            date: tx.date,
            description: tx.description.clone(),
            commodities: commodities.into_iter().collect::<Vec<_>>().join(", "),
        });
    }

    // Two unpriced commodities are an implicit exchange and can't be checked
    if elided == 0 && commodities.len() <= 1 && !residual.is_zero() {
        warn!(
            date = %tx.date,
            description = %tx.description,
            residual = %residual,
            "transaction does not balance"
        );
    }

    let postings: Vec<Posting> = tx
        .postings
        .iter()
        .zip(amounts)
        .map(|(p, amount)| Posting::new(p.account.clone(), amount.unwrap_or(-residual)))
        .collect();

    if elided == 1 {
        if let Some(p) = tx.postings.iter().find(|p| p.amount.is_none() && p.balance.is_none()) {
            *balances.entry(p.account.clone()).or_default() -= residual;
        }
    }

    Ok(Transaction::new(tx.date, tx.description, postings))
}

// ============================================================================
// TESTS
// ============================================================================
