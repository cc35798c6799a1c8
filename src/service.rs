//! Glue between a [`DataProvider`] and the calculation engine. Every function
//! reads one snapshot from the provider and runs the engine over it.

use std::collections::BTreeMap;

use crate::core::{
    ContributionPlan, InvestableAllocationComparison, NetWorth, Result, aggregate_returns,
    net_worth, plan_goals, reconcile,
};
use crate::data::DataProvider;

pub fn effective_returns(provider: &dyn DataProvider) -> Result<BTreeMap<String, f64>> {
    Ok(aggregate_returns(&provider.allocation_type_configs()?))
}

pub fn sip_allocation(provider: &dyn DataProvider) -> Result<ContributionPlan> {
    let returns = effective_returns(provider)?;
    let goals = provider.goals()?;
    plan_goals(&goals, &returns, provider)
}

pub fn investable_allocation(
    provider: &dyn DataProvider,
) -> Result<Vec<InvestableAllocationComparison>> {
    let goals = provider.goals()?;
    let current = provider.current_investable_allocation()?;
    reconcile(&goals, &current, provider)
}

pub fn portfolio_net_worth(provider: &dyn DataProvider) -> Result<NetWorth> {
    let sums = provider.asset_sums_by_category()?;
    let liabilities = provider.total_liabilities()?;
    Ok(net_worth(&sums, liabilities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlannerError;
    use crate::data::{Snapshot, SnapshotProvider};

    fn provider() -> SnapshotProvider {
        SnapshotProvider::from_json(include_str!("../demos/snapshot.json")).expect("demo snapshot")
    }

    #[test]
    fn effective_returns_blend_medium_term() {
        let returns = effective_returns(&provider()).expect("returns");
        // short: 0.4*7 + 0.6*6 = 6.4; medium before blending: 0.4*12 + 0.45*7 + 0.15*8 = 9.15
        assert!((returns["short-term"] - 6.4).abs() < 1e-9);
        assert!((returns["medium-term"] - 7.5).abs() < 1e-9);
        assert!((returns["long-term"] - 11.7).abs() < 1e-9);
    }

    #[test]
    fn sip_allocation_covers_every_asset_class() {
        let plan = sip_allocation(&provider()).expect("plan");
        assert_eq!(plan.goals.len(), 3);
        assert_eq!(plan.by_asset_class.len(), 5);
        assert!(plan.by_asset_class["Mid Cap Equity"] > 0.0);
    }

    #[test]
    fn net_worth_reads_aggregates() {
        let worth = portfolio_net_worth(&provider()).expect("net worth");
        assert!((worth.total_asset - 9_000_000.0).abs() < 1e-9);
        assert!((worth.liquid_asset - 1_700_000.0).abs() < 1e-9);
        assert!((worth.net_worth - 5_450_000.0).abs() < 1e-9);
    }

    #[test]
    fn investable_allocation_lists_holdings() {
        let rows = investable_allocation(&provider()).expect("rows");
        let names: Vec<&str> = rows.iter().map(|row| row.asset_class_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Large Cap Equity", "Mid Cap Equity", "Debt Funds", "Liquid Funds"]
        );
    }

    #[test]
    fn empty_snapshot_without_allocation_types_fails_for_goals() {
        let mut snapshot = provider().snapshot().clone();
        snapshot.allocation_types.clear();
        snapshot.allocation_type_configs.clear();
        let provider = SnapshotProvider::new(snapshot).expect("consistent");

        let err = sip_allocation(&provider).expect_err("no buckets");
        assert!(matches!(err, PlannerError::NoAllocationTypeForHorizon { .. }));
        let err = investable_allocation(&provider).expect_err("no buckets");
        assert!(matches!(err, PlannerError::NoAllocationTypeForHorizon { .. }));
    }

    #[test]
    fn empty_snapshot_yields_empty_results() {
        let provider = SnapshotProvider::new(Snapshot::default()).expect("empty");
        let plan = sip_allocation(&provider).expect("plan");
        assert!(plan.by_asset_class.is_empty());
        assert!(investable_allocation(&provider).expect("rows").is_empty());
    }
}
