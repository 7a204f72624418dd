// 🗂️ Account Index - Every searchable account name, built once at startup
//
// `Assets:Bank:Checking` contributes three entries:
//   Assets:                (partial prefix, trailing separator)
//   Assets:Bank:           (partial prefix, trailing separator)
//   Assets:Bank:Checking   (full name, no trailing separator)

use std::collections::HashSet;

use crate::ledger::{Transaction, ACCOUNT_SEPARATOR};

// ============================================================================
// INDEX BUILDER
// ============================================================================

/// Collect every full account name and every proper prefix of it.
///
/// Pure and idempotent. A name without a separator contributes only itself,
/// and an empty name degenerates to the single entry `""`.
pub fn build_index(transactions: &[Transaction]) -> HashSet<String> {
    let mut names = HashSet::new();

    for tx in transactions {
        for posting in &tx.postings {
            insert_account(&mut names, &posting.account);
        }
    }

    names
}

fn insert_account(names: &mut HashSet<String>, account: &str) {
    // Every separator position closes a partial prefix, kept with its separator
    for (pos, _) in account.match_indices(ACCOUNT_SEPARATOR) {
        let prefix = &account[..pos + ACCOUNT_SEPARATOR.len_utf8()];
        if !names.contains(prefix) {
            names.insert(prefix.to_string());
        }
    }

    if !names.contains(account) {
        names.insert(account.to_string());
    }
}

// ============================================================================
// ACCOUNT INDEX
// ============================================================================

/// Immutable set of searchable names, shared by every request
#[derive(Debug, Clone, Default)]
pub struct AccountIndex {
    names: HashSet<String>,
}

impl AccountIndex {
    pub fn build(transactions: &[Transaction]) -> Self {
        AccountIndex {
            names: build_index(transactions),
        }
    }

    /// All names, sorted so responses are stable
    pub fn search(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.iter().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
