use std::collections::BTreeMap;

use super::error::Result;
use super::planner::weights_for;
use super::rounding::round_to;
use super::types::{
    AllocationFigure, AllocationLookup, CurrentInvestableAllocation, Goal,
    InvestableAllocationComparison, RequiredInvestableAllocation,
};

/// Spreads every goal's allocated amount across asset classes using the
/// weights of the allocation type covering its horizon.
pub fn required_allocation<L: AllocationLookup + ?Sized>(
    goals: &[Goal],
    lookup: &L,
) -> Result<Vec<RequiredInvestableAllocation>> {
    let mut required: BTreeMap<i64, RequiredInvestableAllocation> = BTreeMap::new();
    let mut total_allocated = 0.0;

    for goal in goals {
        total_allocated += goal.allocated_amount;
        for weight in weights_for(goal, lookup)? {
            let entry = required
                .entry(weight.asset_class_id)
                .or_insert_with(|| RequiredInvestableAllocation {
                    asset_class_id: weight.asset_class_id,
                    asset_class_name: weight.asset_class_name.clone(),
                    value: 0.0,
                    contribution_percentage: 0.0,
                });
            entry.value += goal.allocated_amount * weight.allocation_in_percentage / 100.0;
        }
    }

    if total_allocated != 0.0 {
        for entry in required.values_mut() {
            entry.contribution_percentage = entry.value * 100.0 / total_allocated;
        }
    }
    Ok(required.into_values().collect())
}

/// Pairs each currently held asset class with its required counterpart.
///
/// The current list drives the output: an asset class held today but not
/// required shows a zero requirement, and required-only asset classes are
/// left out.
pub fn reconcile<L: AllocationLookup + ?Sized>(
    goals: &[Goal],
    current: &[CurrentInvestableAllocation],
    lookup: &L,
) -> Result<Vec<InvestableAllocationComparison>> {
    let required: BTreeMap<i64, RequiredInvestableAllocation> = required_allocation(goals, lookup)?
        .into_iter()
        .map(|entry| (entry.asset_class_id, entry))
        .collect();

    Ok(current
        .iter()
        .map(|held| {
            let required = required
                .get(&held.asset_class_id)
                .map(|entry| AllocationFigure {
                    value: round_to(entry.value, 2),
                    percentage: round_to(entry.contribution_percentage, 2),
                })
                .unwrap_or_default();
            InvestableAllocationComparison {
                asset_class_id: held.asset_class_id,
                asset_class_name: held.asset_class_name.clone(),
                current: AllocationFigure {
                    value: round_to(held.value, 2),
                    percentage: round_to(held.contribution_percentage, 2),
                },
                required,
            }
        })
        .collect())
}
