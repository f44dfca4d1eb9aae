// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Operator-editable numeric fields of a sale. Percentages are expressed
/// as 0-100, `misc_expenses_value` is a flat amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommissionInputs {
    pub unit_value: Decimal,
    pub commission_percent: Decimal,
    pub tax_percent: Decimal,
    pub misc_expenses_value: Decimal,
    pub agent_split_percent: Decimal,
}

/// The four derived fields of a sale. Persisted alongside the inputs so
/// that historical records keep the figures that were actually charged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommissionBreakdown {
    pub gross_commission: Decimal,
    pub tax_value: Decimal,
    pub agent_commission: Decimal,
    pub agency_commission: Decimal,
}

impl CommissionBreakdown {
    /// The amount actually split between agency and agent:
    /// gross minus tax minus miscellaneous deductions.
    pub fn net_base(&self) -> Decimal {
        self.agent_commission + self.agency_commission
    }

    /// What the agency retains before paying the agent out
    /// (gross minus tax). This is the income side of an approval.
    pub fn agency_retained(&self) -> Decimal {
        self.gross_commission - self.tax_value
    }
}

/// Derives the commission breakdown from a sale's inputs.
///
/// Pure and idempotent: same inputs, same outputs, no hidden state.
/// Inputs are taken as given — no clamping and no range validation
/// happens here. Out-of-range values (a misc deduction larger than the
/// taxed gross, percentages beyond 100) produce mathematically
/// consistent results, negative shares included; callers that want
/// bounds enforce them before calling (the CLI does, at parse time).
///
/// Monetary fields are rounded to currency precision (2 dp, banker's
/// rounding). The agency share is the exact remainder `net_base - agent`
/// rather than an independent percentage product, so
/// `agent_commission + agency_commission == net_base` holds exactly.
pub fn recompute(inputs: &CommissionInputs) -> CommissionBreakdown {
    let gross = (inputs.unit_value * inputs.commission_percent / Decimal::ONE_HUNDRED).round_dp(2);
    let tax = (gross * inputs.tax_percent / Decimal::ONE_HUNDRED).round_dp(2);
    let net_base = gross - tax - inputs.misc_expenses_value;
    let agent = (net_base * inputs.agent_split_percent / Decimal::ONE_HUNDRED).round_dp(2);
    let agency = net_base - agent;
    CommissionBreakdown {
        gross_commission: gross,
        tax_value: tax,
        agent_commission: agent,
        agency_commission: agency,
    }
}
