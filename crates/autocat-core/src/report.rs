//! Report aggregation
//!
//! Groups already-fetched transactions into (period, category) buckets and
//! computes window-level income/expense totals. Both functions are pure and
//! recomputed from scratch every run; nothing is cached across runs.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{Period, ReportBucket, ReportSummary, Transaction, UNCATEGORIZED};

/// Bucket key for a transaction date
///
/// Week uses the ISO week-numbering year, so early-January days can land
/// in the previous year's final week (e.g. 2027-01-01 is 2026-W53).
pub fn period_key(date: NaiveDate, period: Period) -> String {
    match period {
        Period::Week => {
            let iso = date.iso_week();
            format!("{:04}-W{:02}", iso.year(), iso.week())
        }
        Period::Month => format!("{:04}-{:02}", date.year(), date.month()),
    }
}

/// Group transactions into per-period, per-category totals
///
/// Deleted transactions and internal transfers are skipped; uncategorized
/// transactions bucket under [`UNCATEGORIZED`] rather than being dropped.
/// Amount signs are preserved. Output order: period ascending, then total
/// descending within a period, then category name as the tie-break, so
/// identical input always produces the identical sequence.
pub fn aggregate(transactions: &[Transaction], period: Period) -> Vec<ReportBucket> {
    let mut buckets: BTreeMap<(String, String), (i64, usize)> = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| t.is_reportable()) {
        let key = (
            period_key(transaction.date, period),
            transaction
                .category_name
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        );
        let entry = buckets.entry(key).or_insert((0, 0));
        entry.0 += transaction.amount;
        entry.1 += 1;
    }

    let mut out: Vec<ReportBucket> = buckets
        .into_iter()
        .map(|((period_key, category), (total, transaction_count))| ReportBucket {
            period_key,
            category,
            total,
            transaction_count,
        })
        .collect();

    out.sort_by(|a, b| {
        a.period_key
            .cmp(&b.period_key)
            .then(b.total.cmp(&a.total))
            .then(a.category.cmp(&b.category))
    });
    out
}

/// Window-level totals: income and expenses split by sign, per-category
/// breakdowns sorted by magnitude descending
pub fn summarize(
    transactions: &[Transaction],
    since: NaiveDate,
    until: NaiveDate,
) -> ReportSummary {
    let mut expenses: BTreeMap<String, i64> = BTreeMap::new();
    let mut income: BTreeMap<String, i64> = BTreeMap::new();
    let mut total_expenses = 0i64;
    let mut total_income = 0i64;
    let mut count = 0usize;

    for transaction in transactions.iter().filter(|t| t.is_reportable()) {
        let category = transaction
            .category_name
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        count += 1;

        if transaction.amount < 0 {
            let magnitude = -transaction.amount;
            *expenses.entry(category).or_insert(0) += magnitude;
            total_expenses += magnitude;
        } else {
            *income.entry(category).or_insert(0) += transaction.amount;
            total_income += transaction.amount;
        }
    }

    // Magnitude descending, category name breaking ties for stable output
    fn sorted_desc(map: BTreeMap<String, i64>) -> Vec<(String, i64)> {
        let mut v: Vec<(String, i64)> = map.into_iter().collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        v
    }

    ReportSummary {
        since,
        until,
        total_income,
        total_expenses,
        net: total_income - total_expenses,
        transaction_count: count,
        expenses_by_category: sorted_desc(expenses),
        income_by_category: sorted_desc(income),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(id: &str, date: (i32, u32, u32), category: Option<&str>, amount: i64) -> Transaction {
        Transaction {
            id: id.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            payee: Some(format!("payee-{}", id)),
            amount,
            category_id: category.map(|_| "cat-id".to_string()),
            category_name: category.map(|c| c.to_string()),
            transfer_account_id: None,
            deleted: false,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn("t1", (2024, 2, 5), Some("Supermercado"), -20_000),
            txn("t2", (2024, 2, 6), Some("Supermercado"), -15_000),
            txn("t3", (2024, 2, 7), Some("Gasolina"), -60_000),
            txn("t4", (2024, 2, 20), Some("Supermercado"), -10_000),
            txn("t5", (2024, 2, 25), None, -4_000),
            txn("t6", (2024, 2, 28), Some("Nómina"), 1_500_000),
            txn("t7", (2024, 3, 1), Some("Gasolina"), -55_000),
        ]
    }

    #[test]
    fn test_month_keys_and_grouping() {
        let buckets = aggregate(&sample(), Period::Month);

        let feb: Vec<&ReportBucket> = buckets
            .iter()
            .filter(|b| b.period_key == "2024-02")
            .collect();
        assert_eq!(feb.len(), 4);

        let supermercado = feb.iter().find(|b| b.category == "Supermercado").unwrap();
        assert_eq!(supermercado.total, -45_000);
        assert_eq!(supermercado.transaction_count, 3);

        let march: Vec<&ReportBucket> = buckets
            .iter()
            .filter(|b| b.period_key == "2024-03")
            .collect();
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].category, "Gasolina");
    }

    #[test]
    fn test_ordering_period_asc_then_total_desc() {
        let buckets = aggregate(&sample(), Period::Month);

        let periods: Vec<&str> = buckets.iter().map(|b| b.period_key.as_str()).collect();
        let mut sorted = periods.clone();
        sorted.sort();
        assert_eq!(periods, sorted);

        let feb_totals: Vec<i64> = buckets
            .iter()
            .filter(|b| b.period_key == "2024-02")
            .map(|b| b.total)
            .collect();
        let mut desc = feb_totals.clone();
        desc.sort_by(|a, b| b.cmp(a));
        assert_eq!(feb_totals, desc);
        // The income bucket has the largest signed total, so it sorts first
        assert_eq!(
            buckets[0].category, "Nómina",
            "largest total first within the period"
        );
    }

    #[test]
    fn test_uncategorized_goes_to_sentinel_bucket() {
        let buckets = aggregate(&sample(), Period::Month);
        let sentinel = buckets.iter().find(|b| b.category == UNCATEGORIZED).unwrap();
        assert_eq!(sentinel.total, -4_000);
        assert_eq!(sentinel.transaction_count, 1);
    }

    #[test]
    fn test_aggregation_completeness() {
        let transactions = sample();
        let input_sum: i64 = transactions.iter().map(|t| t.amount).sum();
        for period in [Period::Week, Period::Month] {
            let bucket_sum: i64 = aggregate(&transactions, period).iter().map(|b| b.total).sum();
            assert_eq!(bucket_sum, input_sum);
        }
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let transactions = sample();
        let first = aggregate(&transactions, Period::Month);
        let second = aggregate(&transactions, Period::Month);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_amount_transactions_are_kept() {
        let transactions = vec![txn("t1", (2024, 2, 5), Some("Supermercado"), 0)];
        let buckets = aggregate(&transactions, Period::Month);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total, 0);
        assert_eq!(buckets[0].transaction_count, 1);
    }

    #[test]
    fn test_deleted_and_transfers_are_excluded() {
        let mut deleted = txn("t1", (2024, 2, 5), Some("Supermercado"), -1_000);
        deleted.deleted = true;
        let mut transfer = txn("t2", (2024, 2, 5), Some("Supermercado"), -2_000);
        transfer.transfer_account_id = Some("acc".into());

        assert!(aggregate(&[deleted, transfer], Period::Month).is_empty());
    }

    #[test]
    fn test_iso_week_keys() {
        // 2024-01-01 is a Monday, ISO week 2024-W01
        assert_eq!(
            period_key(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Period::Week),
            "2024-W01"
        );
        // 2023-01-01 is a Sunday and belongs to 2022-W52
        assert_eq!(
            period_key(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), Period::Week),
            "2022-W52"
        );
        assert_eq!(
            period_key(NaiveDate::from_ymd_opt(2024, 2, 7).unwrap(), Period::Month),
            "2024-02"
        );
    }

    #[test]
    fn test_summarize_splits_by_sign() {
        let transactions = sample();
        let since = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let until = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let summary = summarize(&transactions, since, until);

        assert_eq!(summary.total_income, 1_500_000);
        assert_eq!(summary.total_expenses, 164_000);
        assert_eq!(summary.net, 1_336_000);
        assert_eq!(summary.transaction_count, 7);

        // Expenses sorted by magnitude descending
        assert_eq!(summary.expenses_by_category[0].0, "Gasolina");
        assert_eq!(summary.expenses_by_category[0].1, 115_000);
        assert_eq!(summary.income_by_category[0].0, "Nómina");
    }

    #[test]
    fn test_summarize_empty_window() {
        let since = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let until = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let summary = summarize(&[], since, until);
        assert_eq!(summary.transaction_count, 0);
        assert_eq!(summary.net, 0);
        assert!(summary.expenses_by_category.is_empty());
    }
}
