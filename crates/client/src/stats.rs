use api_types::transaction::{Transaction, TransactionKind};

/// One-pass totals over a transaction collection, in minor units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_income_minor: i64,
    pub total_expenses_minor: i64,
    pub balance_minor: i64,
    pub count: usize,
}

/// Folds the collection into income/expense totals, balance and count.
/// Order-independent and all-zero on empty input. Keeps no cache of its
/// own; callers recompute whenever the underlying collection changes.
pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut summary = Summary::default();
    for tx in transactions {
        match tx.kind {
            TransactionKind::Income => summary.total_income_minor += tx.amount_minor,
            TransactionKind::Expense => summary.total_expenses_minor += tx.amount_minor,
        }
        summary.count += 1;
    }
    summary.balance_minor = summary.total_income_minor - summary.total_expenses_minor;
    summary
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn tx(id: i64, kind: TransactionKind, amount_minor: i64) -> Transaction {
        let now = Utc::now();
        Transaction {
            id,
            kind,
            amount_minor,
            date: now,
            category: "Еда".to_string(),
            subcategory: None,
            description: None,
            created_at: now,
            updated_at: now,
            owner_id: 1,
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(summarize([]), Summary::default());
    }

    #[test]
    fn balance_is_income_minus_expenses() {
        let txs = vec![
            tx(1, TransactionKind::Income, 100_000_00),
            tx(2, TransactionKind::Expense, 5_000_00),
            tx(3, TransactionKind::Expense, 1_250_50),
        ];
        let summary = summarize(&txs);
        assert_eq!(summary.total_income_minor, 100_000_00);
        assert_eq!(summary.total_expenses_minor, 6_250_50);
        assert_eq!(
            summary.balance_minor,
            summary.total_income_minor - summary.total_expenses_minor
        );
        assert_eq!(summary.count, 3);
    }

    #[test]
    fn result_is_permutation_independent() {
        let mut txs = vec![
            tx(1, TransactionKind::Income, 10),
            tx(2, TransactionKind::Expense, 20),
            tx(3, TransactionKind::Income, 30),
        ];
        let forward = summarize(&txs);
        txs.reverse();
        assert_eq!(summarize(&txs), forward);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let txs = vec![
            tx(1, TransactionKind::Income, 42),
            tx(2, TransactionKind::Expense, 7),
        ];
        assert_eq!(summarize(&txs), summarize(&txs));
    }
}
