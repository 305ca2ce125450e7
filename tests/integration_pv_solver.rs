//! Integration tests: physics + root-finding + MPP reduction
//!
//! Checks the end-to-end behaviour of `PvSolver` on the reference panel.

use approx::assert_relative_eq;

use pv_rs::config::SimulationConfig;
use pv_rs::physics::{ArrayLayout, OperatingCondition, PanelSpec};
use pv_rs::solver::{SolverConfiguration, SolverMethod};
use pv_rs::{PvError, PvSolver};

mod common;
use common::{reference_mpp, relative_error};

// =================================================================================================
// Reference scenario
// =================================================================================================

#[test]
fn test_reference_scenario_stc() {
    let mpp = reference_mpp(1, 1, 1000.0, 25.0);

    assert!(mpp.power > 300.0 && mpp.power < 400.0, "Pmax = {}", mpp.power);
    assert_relative_eq!(mpp.power, 338.1752, epsilon = 1e-3);
    assert_relative_eq!(mpp.voltage, 38.38498, epsilon = 1e-4);
    assert_relative_eq!(mpp.power, mpp.voltage * mpp.current, epsilon = 1e-12);
}

#[test]
fn test_result_is_finite_and_positive() {
    let mpp = reference_mpp(1, 1, 1000.0, 25.0);
    let (v, i, p) = mpp.as_tuple();
    for value in [v, i, p] {
        assert!(value.is_finite() && value > 0.0);
    }
}

#[test]
fn test_determinism() {
    let solver = PvSolver::default();
    let first = solver.solve(734.5, 31.2).unwrap();
    let second = solver.solve(734.5, 31.2).unwrap();
    assert_eq!(first, second);
}

// =================================================================================================
// Boundary behaviour of the I–V curve
// =================================================================================================

#[test]
fn test_short_circuit_current() {
    let solver = PvSolver::default();
    let curve = solver.iv_curve(1000.0, 25.0).unwrap();
    let model = solver.model_for(&OperatingCondition::stc()).unwrap();

    let params = solver.parameters();
    let expected =
        model.photocurrent() / (1.0 + params.series_resistance() / params.shunt_resistance());

    let first = curve.samples()[0];
    assert_eq!(first.voltage, 0.0);
    assert!(
        relative_error(first.current, expected) < 1e-6,
        "I(0) = {}, expected ≈ {}",
        first.current,
        expected
    );
}

#[test]
fn test_open_circuit_current_near_zero() {
    let solver = PvSolver::default();
    let curve = solver.iv_curve(1000.0, 25.0).unwrap();

    let last = curve.samples()[curve.len() - 1];
    assert_eq!(last.voltage, 47.4);
    assert!(last.current.abs() < 0.2, "I(V_oc) = {}", last.current);
}

#[test]
fn test_curve_current_decreases_with_voltage() {
    let curve = PvSolver::default().iv_curve(800.0, 40.0).unwrap();
    let currents = curve.currents();
    assert!(currents.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn test_mpp_matches_curve_maximum() {
    let solver = PvSolver::default();
    let curve = solver.iv_curve(600.0, 10.0).unwrap();
    let mpp = solver.solve(600.0, 10.0).unwrap();

    let max_power = curve.powers().into_iter().fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(mpp.power, max_power);
    assert_eq!(curve.samples()[mpp.index].power, mpp.power);
}

// =================================================================================================
// Monotonicity in irradiance
// =================================================================================================

#[test]
fn test_power_increases_with_irradiance() {
    let solver = PvSolver::default();
    let powers: Vec<f64> = [100.0, 200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0]
        .iter()
        .map(|&g| solver.solve(g, 25.0).unwrap().power)
        .collect();

    assert!(powers.windows(2).all(|w| w[1] > w[0]), "{:?}", powers);
}

// =================================================================================================
// Series / parallel scaling
// =================================================================================================

#[test]
fn test_parallel_doubling() {
    let single = reference_mpp(1, 1, 1000.0, 25.0);
    let double = reference_mpp(1, 2, 1000.0, 25.0);

    assert_relative_eq!(double.voltage, single.voltage, max_relative = 1e-9);
    assert_relative_eq!(double.current, 2.0 * single.current, max_relative = 1e-6);
    assert_relative_eq!(double.power, 2.0 * single.power, max_relative = 1e-6);
}

#[test]
fn test_series_doubling() {
    let single = reference_mpp(1, 1, 1000.0, 25.0);
    let double = reference_mpp(2, 1, 1000.0, 25.0);

    assert_relative_eq!(double.voltage, 2.0 * single.voltage, max_relative = 1e-9);
    assert_relative_eq!(double.current, single.current, max_relative = 1e-6);
    assert_relative_eq!(double.power, 2.0 * single.power, max_relative = 1e-6);
}

#[test]
fn test_array_layout_recorded() {
    let solver = PvSolver::new(3, 2).unwrap();
    assert_eq!(solver.layout(), ArrayLayout { series: 3, parallel: 2 });
    assert_relative_eq!(solver.parameters().open_circuit_voltage(), 142.2, epsilon = 1e-9);
}

// =================================================================================================
// Methods agree
// =================================================================================================

#[test]
fn test_newton_and_secant_agree() {
    let newton = PvSolver::default();
    let secant = PvSolver::default().with_method(SolverMethod::Secant);

    for (g, t) in [(1000.0, 25.0), (200.0, 25.0), (1200.0, 75.0), (50.0, 0.0)] {
        let a = newton.solve(g, t).unwrap();
        let b = secant.solve(g, t).unwrap();
        assert_eq!(a.index, b.index, "G = {}, T = {}", g, t);
        assert_relative_eq!(a.power, b.power, max_relative = 1e-8);
    }
}

#[test]
fn test_methods_agree_under_concentrated_light() {
    let newton = PvSolver::default();
    let secant = PvSolver::default().with_method(SolverMethod::Secant);

    for (g, t) in [
        (10000.0, 25.0),
        (7000.0, 85.0),
        (10000.0, 0.0),
        (20000.0, -40.0),
        (20000.0, 150.0),
    ] {
        let a = newton.solve(g, t).unwrap();
        let b = secant.solve(g, t).unwrap();
        assert_eq!(a.index, b.index, "G = {}, T = {}", g, t);
        assert_relative_eq!(a.power, b.power, max_relative = 1e-8);
    }

    let mpp = newton.solve(10000.0, 25.0).unwrap();
    assert_relative_eq!(mpp.voltage, 26.48, epsilon = 0.01);
    assert_relative_eq!(mpp.power, 1579.05, epsilon = 0.01);
}

#[test]
fn test_extreme_irradiance_converges() {
    for t in [-40.0, 25.0, 150.0] {
        for method in [SolverMethod::Newton, SolverMethod::Secant] {
            let mpp = PvSolver::default().with_method(method).solve(1e5, t).unwrap();
            assert!(mpp.power.is_finite() && mpp.power > 0.0, "T = {}, {}", t, method);
            assert_relative_eq!(mpp.power, mpp.voltage * mpp.current, max_relative = 1e-12);
        }
    }
}

#[test]
fn test_large_terms_converge_at_rounding_limit() {
    // I_o·exp reaches ~1e14 A at 1000 °C
    let hot = PvSolver::default().solve(1000.0, 1000.0).unwrap();
    assert!(hot.power.is_finite());

    let array = PvSolver::new(1000, 1000).unwrap().solve(1e5, -100.0).unwrap();
    assert!(array.power.is_finite() && array.power > 0.0);
}

#[test]
fn test_sweep_resolution_converges() {
    let coarse = PvSolver::default().with_samples(100).unwrap();
    let fine = PvSolver::default();

    let p_coarse = coarse.solve(1000.0, 25.0).unwrap().power;
    let p_fine = fine.solve(1000.0, 25.0).unwrap().power;

    assert!(relative_error(p_coarse, p_fine) < 1e-3);
}

// =================================================================================================
// Errors
// =================================================================================================

#[test]
fn test_invalid_irradiance() {
    let solver = PvSolver::default();
    for g in [-100.0, 0.0, f64::NAN, f64::INFINITY] {
        assert!(
            matches!(solver.solve(g, 25.0), Err(PvError::InvalidInput(_))),
            "G = {}",
            g
        );
    }
}

#[test]
fn test_invalid_temperature() {
    let solver = PvSolver::default();
    for t in [f64::NAN, f64::NEG_INFINITY, -273.15, -500.0] {
        assert!(
            matches!(solver.solve(1000.0, t), Err(PvError::InvalidInput(_))),
            "T = {}",
            t
        );
    }
}

#[test]
fn test_negative_celsius_is_valid() {
    let mpp = PvSolver::default().solve(1000.0, -10.0).unwrap();
    assert!(mpp.power > 0.0);
}

#[test]
fn test_overflow_near_absolute_zero() {
    let result = PvSolver::default().solve(1000.0, -270.0);
    assert!(
        matches!(result, Err(PvError::NumericOverflow { .. })),
        "{:?}",
        result
    );
}

#[test]
fn test_overflow_absurd_inputs() {
    let solver = PvSolver::default();
    assert!(matches!(
        solver.solve(1e300, 25.0),
        Err(PvError::NumericOverflow { .. })
    ));
    assert!(matches!(
        solver.solve(1000.0, 1e300),
        Err(PvError::NumericOverflow { .. })
    ));
}

#[test]
fn test_tight_budget_does_not_converge() {
    let solver = PvSolver::default()
        .with_solver_config(SolverConfiguration::new(1e-12, 1))
        .unwrap();

    match solver.solve(1000.0, 25.0) {
        Err(PvError::SolverDidNotConverge { solver, .. }) => assert_eq!(solver, "Newton-Raphson"),
        other => panic!("expected SolverDidNotConverge, got {:?}", other),
    }
}

#[test]
fn test_zero_panel_counts() {
    assert!(matches!(
        PvSolver::new(0, 1),
        Err(PvError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        PvSolver::with_panel(&PanelSpec::default(), ArrayLayout { series: 1, parallel: 0 }),
        Err(PvError::InvalidConfiguration(_))
    ));
}

// =================================================================================================
// Configuration
// =================================================================================================

#[test]
fn test_from_config_matches_builder() {
    let config = SimulationConfig::from_json(
        r#"{ "layout": { "series": 2, "parallel": 3 }, "solver": { "method": "secant" } }"#,
    )
    .unwrap();
    let from_config = PvSolver::from_config(&config).unwrap();
    let built = PvSolver::new(2, 3).unwrap().with_method(SolverMethod::Secant);

    assert_eq!(from_config, built);
    assert_eq!(
        from_config.solve(900.0, 35.0).unwrap(),
        built.solve(900.0, 35.0).unwrap()
    );
}

#[test]
fn test_custom_panel() {
    let panel = PanelSpec {
        short_circuit_current: 5.0,
        open_circuit_voltage: 22.0,
        cells_in_series: 36,
        ..Default::default()
    };
    let mpp = PvSolver::with_panel(&panel, ArrayLayout::default())
        .unwrap()
        .solve(1000.0, 25.0)
        .unwrap();

    assert!(mpp.voltage < 22.0);
    assert!(mpp.current < 5.1);
    assert!(mpp.power > 0.0);
}

// =================================================================================================
// Concurrency
// =================================================================================================

#[test]
fn test_concurrent_solves() {
    let solver = PvSolver::default();
    let expected = solver.solve(1000.0, 25.0).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| solver.solve(1000.0, 25.0).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
