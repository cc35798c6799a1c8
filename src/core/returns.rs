use std::collections::BTreeMap;

use super::rounding::round_to;
use super::types::{AllocationCategory, AllocationTypeConfig};

/// Share of the short-term return folded into the medium-term bucket.
pub const SHORT_TERM_BLEND_WEIGHT: f64 = 0.6;
/// Share of the medium-term bucket's own return that it keeps.
pub const MEDIUM_TERM_BLEND_WEIGHT: f64 = 0.4;

/// Weighted expected return per allocation type.
///
/// Names that resolve to an [`AllocationCategory`] are keyed by the
/// category's canonical name, so `"Long Term"` and `"long_term"` rows land
/// under `"long-term"`. Other names pass through unchanged. The medium-term entry is always present and is replaced by a blend of the
/// short- and medium-term sums; a missing side counts as zero. Values are
/// rounded to one decimal place.
pub fn aggregate_returns(configs: &[AllocationTypeConfig]) -> BTreeMap<String, f64> {
    let mut returns: BTreeMap<String, f64> = BTreeMap::new();
    for row in configs {
        let weighted = row.expected_return_in_percentage * row.allocation_in_percentage / 100.0;
        let key = match AllocationCategory::from_name(&row.allocation_type_name) {
            Some(category) => category.as_str().to_string(),
            None => row.allocation_type_name.clone(),
        };
        *returns.entry(key).or_default() += weighted;
    }

    let short_term = AllocationCategory::ShortTerm.as_str();
    let medium_term = AllocationCategory::MediumTerm.as_str();
    let short = returns.get(short_term).copied().unwrap_or(0.0);
    let medium = returns.get(medium_term).copied().unwrap_or(0.0);
    returns.insert(
        medium_term.to_string(),
        SHORT_TERM_BLEND_WEIGHT * short + MEDIUM_TERM_BLEND_WEIGHT * medium,
    );

    for value in returns.values_mut() {
        *value = round_to(*value, 1);
    }
    returns
}
