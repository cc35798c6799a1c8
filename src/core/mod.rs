mod error;
mod inflation;
mod metrics;
mod planner;
mod reconcile;
mod returns;
mod rounding;
mod solver;
mod types;

pub use error::{PlannerError, ProviderError, Result};
pub use inflation::project;
pub use metrics::{
    EARLY_RETIREMENT_DISCOUNT_RATE, FAT_FIRE_MULTIPLE, FIRE_MULTIPLE, LEAN_FIRE_MULTIPLE,
    LIQUID_CATEGORY, fire_targets, investing_surplus, net_worth,
};
pub use planner::{plan_contributions, plan_goals};
pub use reconcile::{reconcile, required_allocation};
pub use returns::{MEDIUM_TERM_BLEND_WEIGHT, SHORT_TERM_BLEND_WEIGHT, aggregate_returns};
pub use rounding::round_to;
pub use solver::{MAX_HORIZON_YEARS, required_monthly_contribution};
pub use types::{
    AllocationCategory, AllocationFigure, AllocationLookup, AllocationType, AllocationTypeConfig,
    AssetClass, AssetWeight, CashFlowEntry, CashFlowKind, ContributionPlan,
    CurrentInvestableAllocation, FireInputs, FireTargets, Goal, GoalContribution,
    InvestableAllocationComparison, NetWorth, RequiredInvestableAllocation,
};
