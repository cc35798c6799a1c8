use std::collections::BTreeMap;

use tracing::debug;

use super::error::{PlannerError, Result};
use super::inflation::project;
use super::rounding::round_to;
use super::solver::{MAX_HORIZON_YEARS, required_monthly_contribution};
use super::types::{
    AllocationCategory, AllocationLookup, AllocationType, AssetWeight, ContributionPlan, Goal,
    GoalContribution,
};

/// Monthly SIP required per asset class, summed over every underfunded goal.
pub fn plan_contributions<L: AllocationLookup + ?Sized>(
    goals: &[Goal],
    category_returns: &BTreeMap<String, f64>,
    lookup: &L,
) -> Result<BTreeMap<String, f64>> {
    plan_goals(goals, category_returns, lookup).map(|plan| plan.by_asset_class)
}

/// Plans every goal and fans the solved SIPs out across asset classes.
///
/// Goals already funded by their allocated amount are skipped. Goals further
/// out than [`MAX_HORIZON_YEARS`] are rejected before projection. The first
/// failing goal aborts the whole plan.
pub fn plan_goals<L: AllocationLookup + ?Sized>(
    goals: &[Goal],
    category_returns: &BTreeMap<String, f64>,
    lookup: &L,
) -> Result<ContributionPlan> {
    let mut plan = ContributionPlan::default();

    for goal in goals {
        if goal.years_left > MAX_HORIZON_YEARS {
            return Err(PlannerError::HorizonTooLong {
                goal: goal.name.clone(),
                years: goal.years_left,
                max: MAX_HORIZON_YEARS,
            });
        }

        let inflated_target = project(goal.today_amount, goal.years_left, goal.inflation_percentage);
        let shortfall = inflated_target - goal.allocated_amount;
        if shortfall <= 0.0 {
            debug!(goal = %goal.name, inflated_target, "goal already funded");
            continue;
        }

        let category = AllocationCategory::from_name(&goal.name).ok_or_else(|| {
            PlannerError::UnknownGoalCategory {
                goal: goal.name.clone(),
            }
        })?;
        let growth_rate = category_returns
            .get(category.as_str())
            .copied()
            .unwrap_or(0.0);

        if goal.years_left == 0 {
            return Err(PlannerError::ZeroHorizonShortfall {
                goal: goal.name.clone(),
                shortfall,
            });
        }
        let monthly_sip = required_monthly_contribution(
            shortfall,
            goal.years_left,
            growth_rate,
            goal.sip_step_up_percentage,
        )?;

        let allocation_type = allocation_type_for(goal, lookup)?;
        for weight in lookup.allocation_weights(allocation_type.id)? {
            *plan
                .by_asset_class
                .entry(weight.asset_class_name)
                .or_default() += monthly_sip * weight.allocation_in_percentage / 100.0;
        }

        debug!(
            goal = %goal.name,
            shortfall,
            growth_rate,
            monthly_sip,
            allocation_type = %allocation_type.name,
            "planned goal"
        );
        plan.goals.push(GoalContribution {
            goal_id: goal.id,
            goal_name: goal.name.clone(),
            inflated_target,
            shortfall: round_to(shortfall, 2),
            growth_rate,
            monthly_sip,
            allocation_type: allocation_type.name,
        });
    }

    for amount in plan.by_asset_class.values_mut() {
        *amount = round_to(*amount, 2);
    }
    Ok(plan)
}

/// First allocation type the provider offers for the goal's horizon.
pub(crate) fn allocation_type_for<L: AllocationLookup + ?Sized>(
    goal: &Goal,
    lookup: &L,
) -> Result<AllocationType> {
    lookup
        .allocation_types_for_horizon(goal.years_left)?
        .into_iter()
        .next()
        .ok_or_else(|| PlannerError::NoAllocationTypeForHorizon {
            goal: goal.name.clone(),
            years: goal.years_left,
        })
}

/// Outer-joined weights for the allocation type covering `goal`.
pub(crate) fn weights_for<L: AllocationLookup + ?Sized>(
    goal: &Goal,
    lookup: &L,
) -> Result<Vec<AssetWeight>> {
    let allocation_type = allocation_type_for(goal, lookup)?;
    Ok(lookup.allocation_weights(allocation_type.id)?)
}
