use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::DataProvider;
use crate::core::{
    AllocationLookup, AllocationType, AllocationTypeConfig, AssetClass, AssetWeight,
    CashFlowEntry, CurrentInvestableAllocation, Goal, ProviderError, investing_surplus,
};

/// Raw allocation-type config row as stored, before joining names and returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRow {
    pub id: i64,
    pub allocation_type_id: i64,
    pub asset_class_id: i64,
    pub allocation_in_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub asset_class_id: i64,
    pub value: f64,
}

/// A ledger asset, bucketed by category (`liquid`, `illiquid`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub name: String,
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liability {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub asset_classes: Vec<AssetClass>,
    pub allocation_types: Vec<AllocationType>,
    pub allocation_type_configs: Vec<ConfigRow>,
    pub goals: Vec<Goal>,
    pub holdings: Vec<Holding>,
    pub assets: Vec<AssetEntry>,
    pub liabilities: Vec<Liability>,
    pub cash_flows: Vec<CashFlowEntry>,
}

/// Serves a fixed, in-memory snapshot of the ledger.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    snapshot: Snapshot,
}

impl SnapshotProvider {
    /// Wraps `snapshot`, rejecting rows that reference undefined asset classes
    /// or allocation types.
    pub fn new(snapshot: Snapshot) -> Result<Self, ProviderError> {
        let provider = Self { snapshot };
        for row in &provider.snapshot.allocation_type_configs {
            provider.allocation_type(row.allocation_type_id)?;
            provider.asset_class(row.asset_class_id)?;
        }
        for holding in &provider.snapshot.holdings {
            provider.asset_class(holding.asset_class_id)?;
        }
        Ok(provider)
    }

    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn asset_class(&self, id: i64) -> Result<&AssetClass, ProviderError> {
        self.snapshot
            .asset_classes
            .iter()
            .find(|asset_class| asset_class.id == id)
            .ok_or(ProviderError::UnknownReference {
                kind: "asset class",
                id,
            })
    }

    fn allocation_type(&self, id: i64) -> Result<&AllocationType, ProviderError> {
        self.snapshot
            .allocation_types
            .iter()
            .find(|allocation_type| allocation_type.id == id)
            .ok_or(ProviderError::UnknownReference {
                kind: "allocation type",
                id,
            })
    }
}

impl AllocationLookup for SnapshotProvider {
    fn allocation_types_for_horizon(
        &self,
        years: u32,
    ) -> Result<Vec<AllocationType>, ProviderError> {
        Ok(self
            .snapshot
            .allocation_types
            .iter()
            .filter(|allocation_type| allocation_type.covers(years))
            .cloned()
            .collect())
    }

    fn allocation_weights(
        &self,
        allocation_type_id: i64,
    ) -> Result<Vec<AssetWeight>, ProviderError> {
        self.allocation_type(allocation_type_id)?;
        let configs = &self.snapshot.allocation_type_configs;

        Ok(self
            .snapshot
            .asset_classes
            .iter()
            .map(|asset_class| {
                let allocation_in_percentage = configs
                    .iter()
                    .find(|row| {
                        row.allocation_type_id == allocation_type_id
                            && row.asset_class_id == asset_class.id
                    })
                    .map_or(0.0, |row| row.allocation_in_percentage);
                AssetWeight {
                    asset_class_id: asset_class.id,
                    asset_class_name: asset_class.name.clone(),
                    allocation_in_percentage,
                }
            })
            .collect())
    }
}

impl DataProvider for SnapshotProvider {
    fn asset_classes(&self) -> Result<Vec<AssetClass>, ProviderError> {
        Ok(self.snapshot.asset_classes.clone())
    }

    fn allocation_type_configs(&self) -> Result<Vec<AllocationTypeConfig>, ProviderError> {
        self.snapshot
            .allocation_type_configs
            .iter()
            .map(|row| {
                let allocation_type = self.allocation_type(row.allocation_type_id)?;
                let asset_class = self.asset_class(row.asset_class_id)?;
                Ok(AllocationTypeConfig {
                    id: row.id,
                    allocation_type_id: row.allocation_type_id,
                    allocation_type_name: allocation_type.name.clone(),
                    asset_class_id: row.asset_class_id,
                    expected_return_in_percentage: asset_class.expected_return_in_percentage,
                    allocation_in_percentage: row.allocation_in_percentage,
                })
            })
            .collect()
    }

    fn goals(&self) -> Result<Vec<Goal>, ProviderError> {
        Ok(self.snapshot.goals.clone())
    }

    fn current_investable_allocation(
        &self,
    ) -> Result<Vec<CurrentInvestableAllocation>, ProviderError> {
        let mut allocation: Vec<CurrentInvestableAllocation> = Vec::new();
        for holding in &self.snapshot.holdings {
            match allocation
                .iter()
                .position(|entry| entry.asset_class_id == holding.asset_class_id)
            {
                Some(index) => allocation[index].value += holding.value,
                None => allocation.push(CurrentInvestableAllocation {
                    asset_class_id: holding.asset_class_id,
                    asset_class_name: self.asset_class(holding.asset_class_id)?.name.clone(),
                    value: holding.value,
                    contribution_percentage: 0.0,
                }),
            }
        }

        let total: f64 = allocation.iter().map(|entry| entry.value).sum();
        if total != 0.0 {
            for entry in &mut allocation {
                entry.contribution_percentage = entry.value * 100.0 / total;
            }
        }
        Ok(allocation)
    }

    fn asset_sums_by_category(&self) -> Result<BTreeMap<String, f64>, ProviderError> {
        let mut sums: BTreeMap<String, f64> = BTreeMap::new();
        for asset in &self.snapshot.assets {
            *sums.entry(asset.category.clone()).or_default() += asset.value;
        }
        Ok(sums)
    }

    fn total_liabilities(&self) -> Result<f64, ProviderError> {
        Ok(self
            .snapshot
            .liabilities
            .iter()
            .map(|liability| liability.amount)
            .sum())
    }

    fn investing_surplus(&self) -> Result<f64, ProviderError> {
        Ok(investing_surplus(&self.snapshot.cash_flows))
    }
}
