use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Plot};

use crate::data::model::Grade;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Grade distribution chart (bottom panel)
// ---------------------------------------------------------------------------

/// Render the distribution of grades under the active filter, one bar per
/// category, always in A through F order.
pub fn distribution_chart(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.weak("Grade distribution appears here once a dataset is loaded.");
        });
        return;
    }

    let bars: Vec<Bar> = state
        .distribution
        .entries()
        .enumerate()
        .map(|(i, (grade, count))| {
            Bar::new(i as f64, count as f64)
                .width(0.6)
                .fill(state.symbology.fill_for(grade))
                .name(grade.as_str())
        })
        .collect();

    Plot::new("grade_distribution")
        .y_axis_label("Counties")
        .x_axis_formatter(|mark, _range| {
            let rounded = mark.value.round();
            if rounded < 0.0 || (mark.value - rounded).abs() > 1e-6 {
                return String::new();
            }
            Grade::ALL
                .get(rounded as usize)
                .map(|g| g.as_str().to_string())
                .unwrap_or_default()
        })
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_x(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}
