use super::error::{PlannerError, Result};
use super::rounding::round_to;

const MONTHS_PER_YEAR: u32 = 12;

/// Longest horizon, in years, the planner will solve for.
pub const MAX_HORIZON_YEARS: u32 = 100;

/// Solves for the first-year monthly contribution that grows to
/// `target_future_value` after `years`.
///
/// Contributions are made at the start of every month, compound monthly at
/// `annual_growth_rate_percent / 12`, and are stepped up by
/// `annual_step_up_percent` once per completed year. The series is summed
/// directly, so a zero step-up needs no separate closed form.
///
/// `years` must lie in `1..=MAX_HORIZON_YEARS`.
pub fn required_monthly_contribution(
    target_future_value: f64,
    years: u32,
    annual_growth_rate_percent: f64,
    annual_step_up_percent: f64,
) -> Result<f64> {
    let degenerate = || PlannerError::DegenerateContributionSeries {
        years,
        growth_rate: annual_growth_rate_percent,
        step_up: annual_step_up_percent,
    };
    if years == 0 || years > MAX_HORIZON_YEARS {
        return Err(degenerate());
    }

    let denominator =
        growing_annuity_factor(years, annual_growth_rate_percent, annual_step_up_percent);
    if !denominator.is_finite() || denominator <= 0.0 {
        return Err(degenerate());
    }

    Ok(round_to(target_future_value / denominator, 2))
}

/// Future value at the horizon of a unit first-year monthly contribution.
fn growing_annuity_factor(
    years: u32,
    annual_growth_rate_percent: f64,
    annual_step_up_percent: f64,
) -> f64 {
    let total_months = years * MONTHS_PER_YEAR;
    let monthly_growth = 1.0 + annual_growth_rate_percent / (100.0 * f64::from(MONTHS_PER_YEAR));
    let yearly_step_up = 1.0 + annual_step_up_percent / 100.0;

    (0..total_months)
        .map(|month| {
            let step_up = yearly_step_up.powf(f64::from(month / MONTHS_PER_YEAR));
            let growth = monthly_growth.powf(f64::from(total_months - month));
            step_up * growth
        })
        .sum()
}
