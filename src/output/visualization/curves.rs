//! I–V and P–V curve plots
//!
//! The output format follows the file extension: `.svg` writes SVG, anything else a
//! bitmap (PNG by default).

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::curve::IvCurve;
use crate::output::visualization::config::{PlotConfig, NO_TITLE};

/// Which quantity goes on the y axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quantity {
    Current,
    Power,
}

impl Quantity {
    fn points(self, curve: &IvCurve) -> Vec<(f64, f64)> {
        curve
            .samples()
            .iter()
            .map(|s| match self {
                Quantity::Current => (s.voltage, s.current),
                Quantity::Power => (s.voltage, s.power),
            })
            .collect()
    }
}

/// Plot current against voltage
///
/// # Errors
///
/// Returns `Err` for an empty curve or if the backend cannot write to `output_path`.
///
/// # Example
///
/// ```rust,no_run
/// use pv_rs::output::visualization::plot_iv_curve;
/// use pv_rs::PvSolver;
///
/// let curve = PvSolver::default().iv_curve(1000.0, 25.0).unwrap();
/// plot_iv_curve(&curve, "iv.png", None).unwrap();
/// ```
pub fn plot_iv_curve(
    curve: &IvCurve,
    output_path: &str,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    let default_config = PlotConfig::iv_curve(NO_TITLE);
    let config = config.unwrap_or(&default_config);
    plot_family(&[curve], &[], Quantity::Current, output_path, config)
}

/// Plot power against voltage
pub fn plot_pv_curve(
    curve: &IvCurve,
    output_path: &str,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    let default_config = PlotConfig::pv_curve(NO_TITLE);
    let config = config.unwrap_or(&default_config);
    plot_family(&[curve], &[], Quantity::Power, output_path, config)
}

/// Several I–V curves on one chart, e.g. an irradiance sweep
///
/// `labels` must hold one legend entry per curve.
pub fn plot_iv_family(
    curves: &[IvCurve],
    labels: &[&str],
    output_path: &str,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    if curves.len() != labels.len() {
        return Err(format!(
            "Label count mismatch: {} curves versus {} labels",
            curves.len(),
            labels.len()
        )
        .into());
    }

    let default_config = PlotConfig::iv_curve(NO_TITLE);
    let config = config.unwrap_or(&default_config);
    let refs: Vec<&IvCurve> = curves.iter().collect();
    plot_family(&refs, labels, Quantity::Current, output_path, config)
}

fn plot_family(
    curves: &[&IvCurve],
    labels: &[&str],
    quantity: Quantity,
    output_path: &str,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>> {
    if curves.is_empty() || curves.iter().any(|c| c.is_empty()) {
        return Err("Empty data: nothing to plot".into());
    }

    let series: Vec<Vec<(f64, f64)>> = curves.iter().map(|c| quantity.points(c)).collect();

    let max_v = series
        .iter()
        .flatten()
        .map(|p| p.0)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1e-10);
    let max_y = series
        .iter()
        .flatten()
        .map(|p| p.1)
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1e-10);

    let ext = Path::new(output_path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("png");

    match ext {
        "svg" => {
            let backend = SVGBackend::new(output_path, (config.width, config.height));
            plot_impl(backend, curves, &series, labels, config, max_v, max_y)
        }
        _ => {
            let backend = BitMapBackend::new(output_path, (config.width, config.height));
            plot_impl(backend, curves, &series, labels, config, max_v, max_y)
        }
    }
}

// =================================================================================================
// Private Plot Implementation
// =================================================================================================

fn plot_impl<DB: DrawingBackend>(
    backend: DB,
    curves: &[&IvCurve],
    series: &[Vec<(f64, f64)>],
    labels: &[&str],
    config: &PlotConfig,
    max_v: f64,
    max_y: f64,
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let root = backend.into_drawing_area();
    root.fill(&config.background)?;

    // The small negative tail past V_oc is clipped
    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, ("sans-serif", 40).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..(max_v * 1.02), 0.0..(max_y * 1.1))?;

    if config.show_grid {
        chart
            .configure_mesh()
            .x_desc(&config.xlabel)
            .y_desc(&config.ylabel)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .y_label_formatter(&|y| format!("{:.1}", y))
            .draw()?;
    }

    for (k, points) in series.iter().enumerate() {
        let color = if series.len() == 1 {
            config.line_color
        } else {
            config.series_color(k)
        };

        let drawn = chart.draw_series(LineSeries::new(
            points.iter().copied(),
            ShapeStyle::from(&color).stroke_width(config.line_width),
        ))?;
        if let Some(label) = labels.get(k) {
            drawn
                .label(*label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }

        if config.mark_mpp {
            if let Some(mpp) = curves[k].maximum_power_point() {
                let y = points[mpp.index].1;
                chart.draw_series(std::iter::once(Circle::new(
                    (mpp.voltage, y),
                    5,
                    ShapeStyle::from(&BLACK).filled(),
                )))?;
            }
        }
    }

    if !labels.is_empty() {
        chart
            .configure_series_labels()
            .background_style(&config.background.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
