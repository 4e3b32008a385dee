use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Grade;

// ---------------------------------------------------------------------------
// Map symbology: grade → fill colour, plus the filter dimming effect
// ---------------------------------------------------------------------------

/// Green→red hue ramp, one stop per grade.
fn grade_ramp() -> [Color32; Grade::ALL.len()] {
    let n = Grade::ALL.len();
    let mut fills = [Color32::GRAY; Grade::ALL.len()];
    for (i, slot) in fills.iter_mut().enumerate() {
        // 130° (green) down to 0° (red)
        let hue = 130.0 * (1.0 - i as f32 / (n - 1) as f32);
        let hsl = Hsl::new(hue, 0.70, 0.50);
        let rgb: Srgb = hsl.into_color();
        *slot = Color32::from_rgb(
            (rgb.red * 255.0) as u8,
            (rgb.green * 255.0) as u8,
            (rgb.blue * 255.0) as u8,
        );
    }
    fills
}

/// Layer symbology: class colours per grade, the outline stroke, and the
/// washed-out variant applied to counties outside the active filter.
#[derive(Debug, Clone)]
pub struct GradeSymbology {
    fills: [Color32; Grade::ALL.len()],
    pub outline: Color32,
}

impl Default for GradeSymbology {
    fn default() -> Self {
        GradeSymbology {
            fills: grade_ramp(),
            outline: Color32::from_gray(60),
        }
    }
}

impl GradeSymbology {
    pub fn fill_for(&self, grade: Grade) -> Color32 {
        self.fills[grade.index()]
    }

    /// Dimmed fill for counties excluded by the filter.
    pub fn dimmed(&self, grade: Grade) -> Color32 {
        self.fill_for(grade).gamma_multiply(0.15)
    }

    /// (label, colour) pairs for the legend, A first.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        Grade::ALL
            .iter()
            .map(|&g| (g.to_string(), self.fill_for(g)))
            .collect()
    }
}
