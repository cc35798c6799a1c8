use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ProviderError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClass {
    pub id: i64,
    pub name: String,
    pub expected_return_in_percentage: f64,
}

/// A horizon bucket applicable to goals whose years left fall in `[min_age, max_age]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationType {
    pub id: i64,
    pub name: String,
    pub min_age: u32,
    #[serde(default)]
    pub max_age: Option<u32>,
}

impl AllocationType {
    pub fn covers(&self, years: u32) -> bool {
        years >= self.min_age && self.max_age.is_none_or(|max| years <= max)
    }
}

/// One allocation-type weight for one asset class, joined with the names and
/// the asset class return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationTypeConfig {
    pub id: i64,
    pub allocation_type_id: i64,
    pub allocation_type_name: String,
    pub asset_class_id: i64,
    pub expected_return_in_percentage: f64,
    pub allocation_in_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetWeight {
    pub asset_class_id: i64,
    pub asset_class_name: String,
    pub allocation_in_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub today_amount: f64,
    pub years_left: u32,
    pub inflation_percentage: f64,
    #[serde(default)]
    pub allocated_amount: f64,
    #[serde(default)]
    pub sip_step_up_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentInvestableAllocation {
    pub asset_class_id: i64,
    pub asset_class_name: String,
    pub value: f64,
    pub contribution_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequiredInvestableAllocation {
    pub asset_class_id: i64,
    pub asset_class_name: String,
    pub value: f64,
    pub contribution_percentage: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AllocationFigure {
    pub value: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestableAllocationComparison {
    pub asset_class_id: i64,
    pub asset_class_name: String,
    pub current: AllocationFigure,
    pub required: AllocationFigure,
}

/// Allocation categories a goal can be planned against.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationCategory {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl AllocationCategory {
    pub const ALL: [AllocationCategory; 3] = [
        AllocationCategory::ShortTerm,
        AllocationCategory::MediumTerm,
        AllocationCategory::LongTerm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AllocationCategory::ShortTerm => "short-term",
            AllocationCategory::MediumTerm => "medium-term",
            AllocationCategory::LongTerm => "long-term",
        }
    }

    /// Maps a goal or allocation-type name onto a category. Case, surrounding
    /// whitespace and `_`/space separators are ignored, so `"Short Term"` and
    /// `"short_term"` both resolve to `ShortTerm`.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashFlowKind {
    Inflow,
    Outflow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowEntry {
    pub kind: CashFlowKind,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetWorth {
    pub total_asset: f64,
    pub liquid_asset: f64,
    pub net_worth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FireInputs {
    pub current_age: u32,
    pub retirement_age: u32,
    pub early_retirement_age: u32,
    pub monthly_expense: f64,
    pub inflation_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FireTargets {
    pub yearly_expense: f64,
    pub retirement_yearly_expense: f64,
    pub lean_fire: f64,
    pub fire: f64,
    pub fat_fire: f64,
    pub early_retirement_amount: f64,
}

/// Per-goal detail of a contribution plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalContribution {
    pub goal_id: i64,
    pub goal_name: String,
    pub inflated_target: f64,
    pub shortfall: f64,
    pub growth_rate: f64,
    pub monthly_sip: f64,
    pub allocation_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContributionPlan {
    pub goals: Vec<GoalContribution>,
    pub by_asset_class: BTreeMap<String, f64>,
}

/// Horizon-based allocation lookups the planner and reconciler need from the
/// data layer.
pub trait AllocationLookup {
    /// Allocation types whose range covers `years`, in provider order.
    fn allocation_types_for_horizon(&self, years: u32)
    -> Result<Vec<AllocationType>, ProviderError>;

    /// Weights for one allocation type, with a zero-weight entry for every asset
    /// class that has no explicit row.
    fn allocation_weights(&self, allocation_type_id: i64)
    -> Result<Vec<AssetWeight>, ProviderError>;
}
