//! Property-based tests for the PV solver using proptest.
//!
//! Covers: irradiance monotonicity, series/parallel scaling, MPP consistency,
//! input rejection.

use proptest::prelude::*;

use pv_rs::{PvError, PvSolver};

/// Coarse sweep keeps each case cheap
fn solver(series: u32, parallel: u32) -> PvSolver {
    PvSolver::new(series, parallel)
        .unwrap()
        .with_samples(200)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// More light at the same temperature never lowers the MPP power.
    #[test]
    fn power_increases_with_irradiance(
        g in 50.0f64..1400.0,
        dg in 1.0f64..200.0,
        t in -10.0f64..60.0,
    ) {
        let s = solver(1, 1);
        let low = s.solve(g, t).unwrap();
        let high = s.solve(g + dg, t).unwrap();
        prop_assert!(high.power > low.power,
            "P({}) = {} vs P({}) = {}", g + dg, high.power, g, low.power);
    }

    /// Pmax = Vmp · Imp and the triple is finite.
    #[test]
    fn mpp_is_consistent(g in 50.0f64..1400.0, t in -10.0f64..60.0) {
        let mpp = solver(1, 1).solve(g, t).unwrap();
        prop_assert!(mpp.voltage.is_finite() && mpp.current.is_finite());
        prop_assert!(mpp.power > 0.0);
        prop_assert!((mpp.power - mpp.voltage * mpp.current).abs() <= 1e-12 * mpp.power);
    }

    /// p strings in parallel multiply Imp and Pmax by p, Vmp unchanged.
    #[test]
    fn parallel_scaling(p in 2u32..6, g in 100.0f64..1200.0, t in 0.0f64..50.0) {
        let one = solver(1, 1).solve(g, t).unwrap();
        let many = solver(1, p).solve(g, t).unwrap();
        let p = f64::from(p);

        prop_assert!((many.voltage - one.voltage).abs() <= 1e-9 * one.voltage);
        prop_assert!((many.power / (p * one.power) - 1.0).abs() < 1e-6);
        prop_assert!((many.current / (p * one.current) - 1.0).abs() < 1e-6);
    }

    /// s panels in series multiply Vmp and Pmax by s, Imp unchanged.
    #[test]
    fn series_scaling(s in 2u32..6, g in 100.0f64..1200.0, t in 0.0f64..50.0) {
        let one = solver(1, 1).solve(g, t).unwrap();
        let many = solver(s, 1).solve(g, t).unwrap();
        let s = f64::from(s);

        prop_assert!((many.voltage / (s * one.voltage) - 1.0).abs() < 1e-9);
        prop_assert!((many.power / (s * one.power) - 1.0).abs() < 1e-6);
        prop_assert!((many.current / one.current - 1.0).abs() < 1e-6);
    }

    /// Non-positive irradiance is rejected before any computation.
    #[test]
    fn non_positive_irradiance_rejected(g in -1e6f64..=0.0, t in -50.0f64..100.0) {
        let result = solver(1, 1).solve(g, t);
        prop_assert!(matches!(result, Err(PvError::InvalidInput(_))));
    }
}
