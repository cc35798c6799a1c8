mod snapshot;

use std::collections::BTreeMap;

use crate::core::{
    AllocationLookup, AllocationTypeConfig, AssetClass, CurrentInvestableAllocation, Goal,
    ProviderError,
};

pub use snapshot::{AssetEntry, ConfigRow, Holding, Liability, Snapshot, SnapshotProvider};

/// Everything the engine reads from the data layer. Each call returns a value
/// snapshot; implementations must be safe to share across request handlers.
pub trait DataProvider: AllocationLookup + Send + Sync {
    fn asset_classes(&self) -> Result<Vec<AssetClass>, ProviderError>;

    /// Config rows joined with allocation-type name and asset-class return.
    fn allocation_type_configs(&self) -> Result<Vec<AllocationTypeConfig>, ProviderError>;

    fn goals(&self) -> Result<Vec<Goal>, ProviderError>;

    /// Current holdings per asset class with their share of the total.
    fn current_investable_allocation(
        &self,
    ) -> Result<Vec<CurrentInvestableAllocation>, ProviderError>;

    fn asset_sums_by_category(&self) -> Result<BTreeMap<String, f64>, ProviderError>;

    fn total_liabilities(&self) -> Result<f64, ProviderError>;

    fn investing_surplus(&self) -> Result<f64, ProviderError>;
}
