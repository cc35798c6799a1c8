use std::collections::BTreeMap;

use super::rounding::round_to;
use super::types::{CashFlowEntry, CashFlowKind, FireInputs, FireTargets, NetWorth};

/// Asset category counted as liquid. Matched exactly, case-sensitive.
pub const LIQUID_CATEGORY: &str = "liquid";

pub const LEAN_FIRE_MULTIPLE: f64 = 15.0;
pub const FIRE_MULTIPLE: f64 = 25.0;
pub const FAT_FIRE_MULTIPLE: f64 = 50.0;
/// Nominal growth assumed between early retirement and regular retirement.
pub const EARLY_RETIREMENT_DISCOUNT_RATE: f64 = 0.10;

pub fn net_worth(asset_sums_by_category: &BTreeMap<String, f64>, total_liabilities: f64) -> NetWorth {
    let total_asset: f64 = asset_sums_by_category.values().sum();
    let liquid_asset = asset_sums_by_category
        .get(LIQUID_CATEGORY)
        .copied()
        .unwrap_or(0.0);

    NetWorth {
        total_asset,
        liquid_asset,
        net_worth: total_asset - total_liabilities,
    }
}

pub fn investing_surplus(entries: &[CashFlowEntry]) -> f64 {
    entries
        .iter()
        .map(|entry| match entry.kind {
            CashFlowKind::Inflow => entry.amount,
            CashFlowKind::Outflow => -entry.amount,
        })
        .sum()
}

/// Sizes lean, regular and fat FIRE corpora from today's monthly expense.
///
/// Ages are not checked for ordering. An early retirement age above the
/// retirement age gives a negative discount exponent, so the early amount
/// comes out larger than `fire`.
pub fn fire_targets(inputs: &FireInputs) -> FireTargets {
    let yearly_expense = inputs.monthly_expense * 12.0;
    let years_to_retirement = f64::from(inputs.retirement_age) - f64::from(inputs.current_age);
    let retirement_yearly_expense =
        yearly_expense * (1.0 + inputs.inflation_percentage / 100.0).powf(years_to_retirement);

    let fire = retirement_yearly_expense * FIRE_MULTIPLE;
    let years_early = f64::from(inputs.retirement_age) - f64::from(inputs.early_retirement_age);
    let early_retirement_amount = fire / (1.0 + EARLY_RETIREMENT_DISCOUNT_RATE).powf(years_early);

    FireTargets {
        yearly_expense: round_to(yearly_expense, 1),
        retirement_yearly_expense: round_to(retirement_yearly_expense, 1),
        lean_fire: round_to(retirement_yearly_expense * LEAN_FIRE_MULTIPLE, 1),
        fire: round_to(fire, 1),
        fat_fire: round_to(retirement_yearly_expense * FAT_FIRE_MULTIPLE, 1),
        early_retirement_amount: round_to(early_retirement_amount, 1),
    }
}
