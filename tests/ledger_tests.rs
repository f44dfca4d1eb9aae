// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use dealbook::ledger::{LedgerFilter, build_view, settlement_summary};
use dealbook::models::{LedgerRecord, PayStatus, RecordKind};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn rec(
    id: i64,
    desc: &str,
    kind: RecordKind,
    amount: &str,
    economic_date: &str,
    status: PayStatus,
    category: Option<&str>,
) -> LedgerRecord {
    LedgerRecord {
        id,
        description: desc.to_string(),
        kind,
        amount: dec(amount),
        economic_date: date(economic_date),
        due_date: None,
        status,
        category: category.map(|c| c.to_string()),
        agent_id: None,
        bank_account: None,
        payment_method: None,
    }
}

fn sample_ledger() -> Vec<LedgerRecord> {
    // inserted deliberately out of chronological order
    vec![
        rec(1, "Commission on sale of Unit 1203", RecordKind::Income, "23500", "2025-02-10", PayStatus::Paid, Some("Commission income")),
        rec(2, "Office rent", RecordKind::Expense, "4200", "2025-01-05", PayStatus::Paid, Some("Office")),
        rec(3, "Agent payout for Unit 1203", RecordKind::Expense, "9400", "2025-02-28", PayStatus::Pending, Some("Commission payout")),
        rec(4, "Listing portal subscription", RecordKind::Expense, "350", "2025-01-20", PayStatus::Paid, Some("Marketing")),
        rec(5, "Rental management fee", RecordKind::Income, "1800", "2025-02-10", PayStatus::Pending, Some("Fees")),
    ]
}

#[test]
fn balances_match_independent_reconstruction() {
    let records = sample_ledger();
    let view = build_view(&records, &LedgerFilter::default());
    assert_eq!(view.rows.len(), records.len());

    // reconstruct the cumulative sum from scratch over the sorted rows
    let mut expected = Decimal::ZERO;
    for row in &view.rows {
        match row.record.kind {
            RecordKind::Income => expected += row.record.amount,
            RecordKind::Expense => expected -= row.record.amount,
        }
        assert_eq!(row.balance, expected, "row {}", row.record.id);
    }
}

#[test]
fn chronological_sort_with_insertion_order_ties() {
    let view = build_view(&sample_ledger(), &LedgerFilter::default());
    let ids: Vec<i64> = view.rows.iter().map(|r| r.record.id).collect();
    // 2025-01-05, 2025-01-20, then the two 2025-02-10 rows in insertion
    // order (1 before 5), then 2025-02-28
    assert_eq!(ids, vec![2, 4, 1, 5, 3]);
}

#[test]
fn out_of_order_insertion_scenario() {
    let records = vec![
        rec(1, "a", RecordKind::Income, "1000", "2025-06-01", PayStatus::Paid, None),
        rec(2, "b", RecordKind::Expense, "400", "2025-06-03", PayStatus::Paid, None),
        rec(3, "c", RecordKind::Income, "200", "2025-06-02", PayStatus::Paid, None),
    ];
    let view = build_view(&records, &LedgerFilter::default());
    let balances: Vec<Decimal> = view.rows.iter().map(|r| r.balance).collect();
    assert_eq!(balances, vec![dec("1000"), dec("1200"), dec("800")]);
}

#[test]
fn filters_select_rows_without_touching_balances() {
    let records = sample_ledger();
    let unfiltered = build_view(&records, &LedgerFilter::default());

    let filters = vec![
        LedgerFilter {
            search: Some("unit 1203".into()),
            ..Default::default()
        },
        LedgerFilter {
            from: Some(date("2025-02-01")),
            ..Default::default()
        },
        LedgerFilter {
            to: Some(date("2025-01-31")),
            ..Default::default()
        },
        LedgerFilter {
            category: Some("Marketing".into()),
            ..Default::default()
        },
        LedgerFilter {
            search: Some("payout".into()),
            from: Some(date("2025-01-01")),
            to: Some(date("2025-12-31")),
            category: Some("Commission payout".into()),
        },
    ];
    for filter in filters {
        let view = build_view(&records, &filter);
        for row in &view.rows {
            let full = unfiltered
                .rows
                .iter()
                .find(|r| r.record.id == row.record.id)
                .unwrap();
            assert_eq!(row.balance, full.balance, "filter changed a balance");
        }
    }
}

#[test]
fn period_delta_and_ending_balance_diverge_mid_ledger() {
    let records = sample_ledger();
    // February only: income 23500 + 1800, expense 9400 -> delta 15900.
    // Ending balance also carries January's -4550.
    let view = build_view(
        &records,
        &LedgerFilter {
            from: Some(date("2025-02-01")),
            to: Some(date("2025-02-28")),
            ..Default::default()
        },
    );
    assert_eq!(view.period_income, dec("25300"));
    assert_eq!(view.period_expense, dec("9400"));
    assert_eq!(view.period_delta(), dec("15900"));
    assert_eq!(view.period_ending_balance, dec("11350"));
    assert_ne!(view.period_delta(), view.period_ending_balance);
}

#[test]
fn empty_filtered_view_has_zero_summaries() {
    let view = build_view(
        &sample_ledger(),
        &LedgerFilter {
            search: Some("no such description".into()),
            ..Default::default()
        },
    );
    assert!(view.rows.is_empty());
    assert_eq!(view.period_income, Decimal::ZERO);
    assert_eq!(view.period_expense, Decimal::ZERO);
    assert_eq!(view.period_ending_balance, Decimal::ZERO);
}

#[test]
fn toggling_status_never_moves_a_balance() {
    let mut records = sample_ledger();
    let before = build_view(&records, &LedgerFilter::default());
    for rec in &mut records {
        rec.status = rec.status.toggled();
    }
    let after = build_view(&records, &LedgerFilter::default());
    for (b, a) in before.rows.iter().zip(after.rows.iter()) {
        assert_eq!(b.balance, a.balance);
    }
}

#[test]
fn settlement_summary_is_status_scoped() {
    let records = sample_ledger();
    let s = settlement_summary(&records);
    assert_eq!(s.received, dec("23500"));
    assert_eq!(s.to_receive, dec("1800"));
    assert_eq!(s.paid_out, dec("4550"));
    assert_eq!(s.to_pay, dec("9400"));

    // the balance path is blind to status: flipping everything to paid
    // changes the settlement view but not one balance
    let mut flipped = records.clone();
    for rec in &mut flipped {
        rec.status = PayStatus::Paid;
    }
    let s2 = settlement_summary(&flipped);
    assert_eq!(s2.to_receive, Decimal::ZERO);
    assert_eq!(s2.to_pay, Decimal::ZERO);
    assert_eq!(
        build_view(&records, &LedgerFilter::default()).period_ending_balance,
        build_view(&flipped, &LedgerFilter::default()).period_ending_balance,
    );
}
