// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
#[error("invalid {field} '{value}', expected one of: {expected}")]
pub struct ParseEnumError {
    pub field: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Approved,
    Cancelled,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Approved => "approved",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaleStatus {
    type Err = ParseEnumError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SaleStatus::Pending),
            "approved" => Ok(SaleStatus::Approved),
            "cancelled" => Ok(SaleStatus::Cancelled),
            _ => Err(ParseEnumError {
                field: "sale status",
                value: s.to_string(),
                expected: "pending|approved|cancelled",
            }),
        }
    }
}

/// Whether a ledger record adds to or subtracts from the balance.
/// Amounts are always positive; the sign lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ParseEnumError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(RecordKind::Income),
            "expense" => Ok(RecordKind::Expense),
            _ => Err(ParseEnumError {
                field: "record type",
                value: s.to_string(),
                expected: "income|expense",
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayStatus {
    Pending,
    Paid,
}

impl PayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayStatus::Pending => "pending",
            PayStatus::Paid => "paid",
        }
    }

    pub fn toggled(&self) -> PayStatus {
        match self {
            PayStatus::Pending => PayStatus::Paid,
            PayStatus::Paid => PayStatus::Pending,
        }
    }
}

impl fmt::Display for PayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayStatus {
    type Err = ParseEnumError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PayStatus::Pending),
            "paid" => Ok(PayStatus::Paid),
            _ => Err(ParseEnumError {
                field: "payment status",
                value: s.to_string(),
                expected: "pending|paid",
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: RecordKind,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub date: NaiveDate,
    pub unit: String,
    pub agent_id: i64,
    pub unit_value: Decimal,
    pub commission_percent: Decimal,
    pub tax_percent: Decimal,
    pub misc_expenses: Option<String>,
    pub misc_expenses_value: Decimal,
    pub agent_split_percent: Decimal,
    // derived on every input edit, persisted as charged
    pub gross_commission: Decimal,
    pub tax_value: Decimal,
    pub agent_commission: Decimal,
    pub agency_commission: Decimal,
    pub status: SaleStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub id: i64,
    pub description: String,
    pub kind: RecordKind,
    pub amount: Decimal,
    /// Date the record belongs to economically; orders the ledger.
    pub economic_date: NaiveDate,
    /// Payable/receivable due date, independent of `economic_date`.
    pub due_date: Option<NaiveDate>,
    pub status: PayStatus,
    pub category: Option<String>,
    pub agent_id: Option<i64>,
    pub bank_account: Option<String>,
    pub payment_method: Option<String>,
}
