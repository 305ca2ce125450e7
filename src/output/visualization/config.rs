//! Plot configuration shared by the curve plots

use plotters::prelude::*;

/// Configuration for customizing plots
///
/// # Example
///
/// ```rust
/// use pv_rs::output::visualization::PlotConfig;
/// use plotters::prelude::*;
///
/// let mut config = PlotConfig::iv_curve("Reference panel, STC");
/// config.line_color = BLUE;
/// config.width = 1920;
/// config.height = 1080;
/// ```
#[derive(Clone)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Plot title (default: "Plot")
    pub title: String,

    /// X-axis label (default: "Voltage (V)")
    pub xlabel: String,

    /// Y-axis label (default: auto-set by plot type)
    pub ylabel: String,

    /// Line color for single-curve plots (default: RED)
    pub line_color: RGBColor,

    /// Optional colors for multi-curve plots, one per curve
    ///
    /// Falls back to the default palette when `None` or too short.
    pub series_colors: Option<Vec<RGBColor>>,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    /// Show grid lines (default: true)
    pub show_grid: bool,

    /// Mark the maximum-power point (default: true)
    pub mark_mpp: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Plot".to_string(),
            xlabel: "Voltage (V)".to_string(),
            ylabel: String::new(),
            line_color: RED,
            series_colors: None,
            background: WHITE,
            line_width: 2,
            show_grid: true,
            mark_mpp: true,
        }
    }
}

/// Helper trait to accept both `String` and `None` for optional titles
pub trait IntoOptionalTitle {
    fn into_optional_title(self) -> Option<String>;
}

impl IntoOptionalTitle for &str {
    fn into_optional_title(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoOptionalTitle for String {
    fn into_optional_title(self) -> Option<String> {
        Some(self)
    }
}

impl<T: IntoOptionalTitle> IntoOptionalTitle for Option<T> {
    fn into_optional_title(self) -> Option<String> {
        self.and_then(|t| t.into_optional_title())
    }
}

/// No custom title, the plot type picks its own
pub const NO_TITLE: Option<&str> = None;

impl PlotConfig {
    /// Current against voltage
    ///
    /// ```rust
    /// use pv_rs::output::visualization::{PlotConfig, NO_TITLE};
    ///
    /// assert_eq!(PlotConfig::iv_curve(NO_TITLE).title, "I-V Curve");
    /// assert_eq!(PlotConfig::iv_curve(format!("G = {}", 800)).title, "G = 800");
    /// ```
    pub fn iv_curve(title: impl IntoOptionalTitle) -> Self {
        Self {
            ylabel: "Current (A)".to_string(),
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "I-V Curve".to_string()),
            ..Self::default()
        }
    }

    /// Power against voltage
    pub fn pv_curve(title: impl IntoOptionalTitle) -> Self {
        Self {
            ylabel: "Power (W)".to_string(),
            title: title
                .into_optional_title()
                .unwrap_or_else(|| "P-V Curve".to_string()),
            line_color: BLUE,
            ..Self::default()
        }
    }

    /// Color of curve `index` in a multi-curve plot
    pub(crate) fn series_color(&self, index: usize) -> RGBColor {
        if let Some(ref colors) = self.series_colors {
            if index < colors.len() {
                return colors[index];
            }
        }

        const PALETTE: [RGBColor; 8] = [
            RED,
            BLUE,
            GREEN,
            MAGENTA,
            CYAN,
            BLACK,
            RGBColor(255, 165, 0), // Orange
            RGBColor(128, 0, 128), // Purple
        ];
        PALETTE[index % PALETTE.len()]
    }
}

// =================================================================================================
// Tests
// =================================================================================================
