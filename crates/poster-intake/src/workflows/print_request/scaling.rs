//! Print scaling: every poster is printed with one side fixed at 36 inches
//! and the other side scaled proportionally.

use serde::{Deserialize, Serialize};

/// The plotter's fixed media edge, in inches.
pub const FIXED_EDGE_INCHES: f64 = 36.0;

/// On-screen span the larger of the two previews must fit inside.
pub const PREVIEW_SPAN_UNITS: f64 = 350.0;

/// The two scaling choices offered for every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrintOption {
    /// Option A: width pinned at 36", height follows the aspect ratio.
    FitWidth,
    /// Option B: height pinned at 36", width follows the aspect ratio.
    FitLength,
}

/// A concrete physical print size for one option.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalingOption {
    pub option: PrintOption,
    pub width_inches: f64,
    pub height_inches: f64,
}

impl ScalingOption {
    /// Human-readable label, also the `chosenOption` value sent to the
    /// workflow webhook. Computed dimensions print with one decimal.
    pub fn label(&self) -> String {
        match self.option {
            PrintOption::FitWidth => format!("Option A (36x{:.1})", self.height_inches),
            PrintOption::FitLength => format!("Option B ({:.1}x36)", self.width_inches),
        }
    }
}

/// Both options for one page, always produced together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalingOptions {
    pub fit_width: ScalingOption,
    pub fit_length: ScalingOption,
}

impl ScalingOptions {
    pub fn get(&self, option: PrintOption) -> &ScalingOption {
        match option {
            PrintOption::FitWidth => &self.fit_width,
            PrintOption::FitLength => &self.fit_length,
        }
    }

    /// Single display scale shared by both previews so their on-screen sizes
    /// stay proportional to the physical prints.
    pub fn display_scale(&self) -> f64 {
        let largest_span = FIXED_EDGE_INCHES
            .max(self.fit_width.height_inches)
            .max(self.fit_length.width_inches);
        PREVIEW_SPAN_UNITS / largest_span
    }
}

/// Raised when page dimensions cannot drive the scaling math.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("page dimensions must be positive and finite, got {width_inches}\" x {height_inches}\"")]
pub struct InvalidGeometry {
    pub width_inches: f64,
    pub height_inches: f64,
}

/// Compute both scaling options for a page of the given physical size.
///
/// Pure and deterministic. Aspect ratio is preserved exactly in both
/// directions.
pub fn compute_scaling_options(
    width_inches: f64,
    height_inches: f64,
) -> Result<ScalingOptions, InvalidGeometry> {
    let positive =
        |value: f64| value.is_finite() && value > 0.0;
    if !positive(width_inches) || !positive(height_inches) {
        return Err(InvalidGeometry {
            width_inches,
            height_inches,
        });
    }

    let fit_width = ScalingOption {
        option: PrintOption::FitWidth,
        width_inches: FIXED_EDGE_INCHES,
        height_inches: height_inches * (FIXED_EDGE_INCHES / width_inches),
    };
    let fit_length = ScalingOption {
        option: PrintOption::FitLength,
        width_inches: width_inches * (FIXED_EDGE_INCHES / height_inches),
        height_inches: FIXED_EDGE_INCHES,
    };

    Ok(ScalingOptions {
        fit_width,
        fit_length,
    })
}
