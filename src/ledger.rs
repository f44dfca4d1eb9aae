// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{LedgerRecord, PayStatus, RecordKind, Sale};

/// Display-side predicates. Filters select which annotated rows appear
/// in the output; they never participate in balance computation.
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    /// Case-insensitive substring match against the description.
    pub search: Option<String>,
    /// Inclusive lower bound on the economic date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the economic date.
    pub to: Option<NaiveDate>,
    /// Exact category name.
    pub category: Option<String>,
}

impl LedgerFilter {
    pub fn matches(&self, rec: &LedgerRecord) -> bool {
        if let Some(ref needle) = self.search {
            if !rec
                .description
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(from) = self.from {
            if rec.economic_date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if rec.economic_date > to {
                return false;
            }
        }
        if let Some(ref cat) = self.category {
            if rec.category.as_deref() != Some(cat.as_str()) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceRow {
    #[serde(flatten)]
    pub record: LedgerRecord,
    /// Cumulative signed sum over the full chronological ledger up to
    /// and including this record.
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerView {
    pub rows: Vec<BalanceRow>,
    pub period_income: Decimal,
    pub period_expense: Decimal,
    /// Balance of the last displayed row: the cumulative position at
    /// period end. Not the same thing as `period_delta`.
    pub period_ending_balance: Decimal,
}

impl LedgerView {
    /// Income minus expense over the displayed rows only.
    pub fn period_delta(&self) -> Decimal {
        self.period_income - self.period_expense
    }
}

fn signed(rec: &LedgerRecord) -> Decimal {
    match rec.kind {
        RecordKind::Income => rec.amount,
        RecordKind::Expense => -rec.amount,
    }
}

/// Builds the running-balance ledger view.
///
/// The whole record set is sorted ascending by economic date (stable:
/// records sharing a date keep their input order, which the store
/// supplies as insertion order) and annotated with a running balance in
/// a single pass. Only then is `filter` applied, to the annotated rows,
/// so a displayed row always carries the balance of the complete
/// ledger at that point. Payment status never enters the balance; see
/// [`settlement_summary`] for the status-scoped totals.
pub fn build_view(records: &[LedgerRecord], filter: &LedgerFilter) -> LedgerView {
    let mut ordered: Vec<&LedgerRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.economic_date);

    let mut balance = Decimal::ZERO;
    let mut annotated = Vec::with_capacity(ordered.len());
    for rec in ordered {
        balance += signed(rec);
        annotated.push(BalanceRow {
            record: rec.clone(),
            balance,
        });
    }

    let rows: Vec<BalanceRow> = annotated
        .into_iter()
        .filter(|row| filter.matches(&row.record))
        .collect();

    let mut period_income = Decimal::ZERO;
    let mut period_expense = Decimal::ZERO;
    for row in &rows {
        match row.record.kind {
            RecordKind::Income => period_income += row.record.amount,
            RecordKind::Expense => period_expense += row.record.amount,
        }
    }
    let period_ending_balance = rows.last().map(|r| r.balance).unwrap_or(Decimal::ZERO);

    LedgerView {
        rows,
        period_income,
        period_expense,
        period_ending_balance,
    }
}

/// Received / outstanding totals keyed on payment status.
///
/// This is a separate aggregation path from [`build_view`]: status is an
/// inclusion filter here and only here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SettlementSummary {
    pub received: Decimal,
    pub to_receive: Decimal,
    pub paid_out: Decimal,
    pub to_pay: Decimal,
}

pub fn settlement_summary(records: &[LedgerRecord]) -> SettlementSummary {
    let mut s = SettlementSummary::default();
    for rec in records {
        match (rec.kind, rec.status) {
            (RecordKind::Income, PayStatus::Paid) => s.received += rec.amount,
            (RecordKind::Income, PayStatus::Pending) => s.to_receive += rec.amount,
            (RecordKind::Expense, PayStatus::Paid) => s.paid_out += rec.amount,
            (RecordKind::Expense, PayStatus::Pending) => s.to_pay += rec.amount,
        }
    }
    s
}

/// A ledger record not yet persisted; what a sale approval emits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryDraft {
    pub description: String,
    pub kind: RecordKind,
    pub amount: Decimal,
    pub economic_date: NaiveDate,
    pub status: PayStatus,
    pub category: String,
    pub agent_id: Option<i64>,
}

/// The pair of ledger entries a sale produces when it becomes approved:
/// the agency's retained commission (gross minus tax) as paid income,
/// and the agent's share as a pending payable linked to the agent.
///
/// Callers gate emission on the status transition itself; calling this
/// for an already-approved sale would duplicate the pair.
pub fn commission_entries(
    sale: &Sale,
    income_category: &str,
    expense_category: &str,
) -> [EntryDraft; 2] {
    let income = EntryDraft {
        description: format!("Commission on sale of {}", sale.unit),
        kind: RecordKind::Income,
        amount: sale.gross_commission - sale.tax_value,
        economic_date: sale.date,
        status: PayStatus::Paid,
        category: income_category.to_string(),
        agent_id: None,
    };
    let expense = EntryDraft {
        description: format!("Agent payout for {}", sale.unit),
        kind: RecordKind::Expense,
        amount: sale.agent_commission,
        economic_date: sale.date,
        status: PayStatus::Pending,
        category: expense_category.to_string(),
        agent_id: Some(sale.agent_id),
    };
    [income, expense]
}
