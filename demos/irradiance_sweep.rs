//! Example: MPP of a 2 x 3 array over irradiance and temperature
//!
//! Solves the reference panel wired two in series, three strings in parallel, on a
//! grid of operating conditions, compares Newton and secant, and writes the MPP table
//! to CSV.
//!
//! **Panel** (single module, STC):
//! - I_sc = 9.35 A, V_oc = 47.4 V, N_s = 72
//! - R_s = 0.39 Ω, R_sh = 545.82 Ω
//!
//! Run with `cargo run --example irradiance_sweep`, add `RUST_LOG=debug` for solver
//! diagnostics.

use pv_rs::output::export::{CsvExporter, Exporter};
use pv_rs::physics::OperatingCondition;
use pv_rs::solver::SolverMethod;
use pv_rs::PvSolver;

use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("═══════════════════════════════════════════════════════");
    println!("  PV Array - Irradiance / Temperature Sweep");
    println!("═══════════════════════════════════════════════════════\n");

    let newton = PvSolver::new(2, 3)?;
    let secant = newton.clone().with_method(SolverMethod::Secant);

    let params = newton.parameters();
    println!("Array (2 series x 3 parallel):");
    println!("  I_sc : {:.2} A", params.short_circuit_current());
    println!("  V_oc : {:.2} V", params.open_circuit_voltage());
    println!("  N_s  : {}\n", params.cells_in_series());

    // ====== Grid ======

    let irradiances = [200.0, 400.0, 600.0, 800.0, 1000.0];
    let temperatures = [0.0, 25.0, 50.0];

    println!(
        "{:>8} {:>6} │ {:>8} {:>8} {:>9} │ {:>10}",
        "G", "T", "Vmp", "Imp", "Pmax", "|ΔP| sec"
    );

    let mut rows = Vec::new();
    let start = Instant::now();

    for &t in &temperatures {
        for &g in &irradiances {
            let mpp = newton.solve(g, t)?;
            let check = secant.solve(g, t)?;

            println!(
                "{:>8.0} {:>6.1} │ {:>8.2} {:>8.3} {:>9.2} │ {:>10.2e}",
                g,
                t,
                mpp.voltage,
                mpp.current,
                mpp.power,
                (mpp.power - check.power).abs()
            );
            rows.push((OperatingCondition::new(g, t)?, mpp));
        }
    }

    println!("\n{} conditions solved twice in {:.2?}", rows.len(), start.elapsed());

    // ====== Export ======

    let path = std::env::temp_dir().join("pv_irradiance_sweep.csv");
    CsvExporter::default().export_mpp_table(&rows, &path)?;
    println!("MPP table written to {}", path.display());

    Ok(())
}
