// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use dealbook::commission::{CommissionInputs, recompute};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn inputs(value: &str, commission: &str, tax: &str, misc: &str, split: &str) -> CommissionInputs {
    CommissionInputs {
        unit_value: dec(value),
        commission_percent: dec(commission),
        tax_percent: dec(tax),
        misc_expenses_value: dec(misc),
        agent_split_percent: dec(split),
    }
}

#[test]
fn worked_example() {
    let b = recompute(&inputs("500000", "5", "6", "150", "40"));
    assert_eq!(b.gross_commission, dec("25000"));
    assert_eq!(b.tax_value, dec("1500"));
    assert_eq!(b.net_base(), dec("23350"));
    assert_eq!(b.agent_commission, dec("9340"));
    assert_eq!(b.agency_commission, dec("14010"));
}

#[test]
fn split_completeness_holds_exactly() {
    let cases = [
        inputs("500000", "5", "6", "150", "40"),
        inputs("123456.78", "3.5", "11.25", "19.99", "37.5"),
        inputs("999999.99", "7", "0", "0.01", "99.99"),
        inputs("0.01", "100", "100", "0", "50"),
        inputs("350000", "6", "6", "500", "33.33"),
    ];
    for inp in cases {
        let b = recompute(&inp);
        let net_base = b.gross_commission - b.tax_value - inp.misc_expenses_value;
        assert_eq!(
            b.agent_commission + b.agency_commission,
            net_base,
            "split must recompose the net base for {:?}",
            inp
        );
    }
}

#[test]
fn recompute_is_idempotent() {
    let inp = inputs("123456.78", "3.5", "11.25", "19.99", "37.5");
    assert_eq!(recompute(&inp), recompute(&inp));
}

#[test]
fn zero_unit_value_zeroes_everything() {
    let b = recompute(&inputs("0", "5", "6", "0", "40"));
    assert_eq!(b.gross_commission, Decimal::ZERO);
    assert_eq!(b.tax_value, Decimal::ZERO);
    assert_eq!(b.agent_commission, Decimal::ZERO);
    assert_eq!(b.agency_commission, Decimal::ZERO);
}

#[test]
fn split_boundaries() {
    let all_agency = recompute(&inputs("200000", "5", "0", "0", "0"));
    assert_eq!(all_agency.agent_commission, Decimal::ZERO);
    assert_eq!(all_agency.agency_commission, all_agency.net_base());

    let all_agent = recompute(&inputs("200000", "5", "0", "0", "100"));
    assert_eq!(all_agent.agency_commission, Decimal::ZERO);
    assert_eq!(all_agent.agent_commission, all_agent.net_base());
}

#[test]
fn misc_exceeding_taxed_gross_goes_negative_not_floored() {
    // gross 1000, tax 100, misc 2000 -> net base -1100
    let b = recompute(&inputs("20000", "5", "10", "2000", "40"));
    assert_eq!(b.net_base(), dec("-1100"));
    assert_eq!(b.agent_commission, dec("-440"));
    assert_eq!(b.agency_commission, dec("-660"));
}

#[test]
fn monetary_fields_carry_currency_precision() {
    // 33333 * 4.5% = 1499.985 -> 1499.98 (banker's), tax 7% of that
    let b = recompute(&inputs("33333", "4.5", "7", "0", "50"));
    assert_eq!(b.gross_commission, dec("1499.98"));
    assert_eq!(b.tax_value, dec("105.00"));
    assert_eq!(b.agent_commission + b.agency_commission, dec("1394.98"));
    assert_eq!(b.agent_commission, dec("697.49"));
}
