use super::rounding::round_to;

/// Compounds `present` forward by `years` at `annual_rate_percent`, rounded to cents.
///
/// Negative rates are accepted and model deflation.
pub fn project(present: f64, years: u32, annual_rate_percent: f64) -> f64 {
    let growth = (1.0 + annual_rate_percent / 100.0).powf(f64::from(years));
    round_to(present * growth, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn compounds_annually() {
        assert_approx(project(100_000.0, 1, 6.0), 106_000.0);
        assert_approx(project(100_000.0, 2, 10.0), 121_000.0);
        assert_approx(project(1_000_000.0, 10, 6.0), 1_790_847.70);
    }

    #[test]
    fn negative_rate_deflates() {
        assert_approx(project(1_000.0, 2, -10.0), 810.0);
    }

    #[test]
    fn long_horizons_do_not_wrap() {
        assert!(project(100_000.0, 3_000_000_000, 6.0).is_infinite());
        assert!(project(100_000.0, u32::MAX, 6.0) > 100_000.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(128))]

        #[test]
        fn prop_zero_horizon_is_identity(
            amount_cents in 0i64..10_000_000_000,
            extra in 0u32..1000,
            rate_bp in -5_000i32..5_000
        ) {
            let amount = amount_cents as f64 / 100.0 + extra as f64 / 100_000.0;
            let rate = rate_bp as f64 / 100.0;
            prop_assert_eq!(project(amount, 0, rate), round_to(amount, 2));
        }
    }
}
