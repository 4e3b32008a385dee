use eframe::egui::{self, Stroke, Ui};
use egui_plot::{Plot, PlotPoints, Polygon};

use crate::color::GradeSymbology;
use crate::data::model::County;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// County choropleth (central panel)
// ---------------------------------------------------------------------------

/// Render the county map in the central panel.
pub fn county_map(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a dataset to view the map  (File → Open…)");
            });
            return;
        }
    };

    let symbology = &state.symbology;
    let focused = state.search_match();
    let mut hovered: Option<usize> = None;

    let mut plot = Plot::new("county_map")
        .data_aspect(1.0)
        .show_axes(false)
        .show_x(false)
        .show_y(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if let Some(b) = dataset.bounds {
        plot = plot
            .include_x(b.min_lon)
            .include_x(b.max_lon)
            .include_y(b.min_lat)
            .include_y(b.max_lat);
    }

    let response = plot.show(ui, |plot_ui| {
        let mut draw_county = |idx: usize, dim: bool| {
            let county: &County = &dataset.counties[idx];
            let fill = if dim {
                symbology.dimmed(county.grade)
            } else {
                symbology.fill_for(county.grade)
            };
            let stroke = if focused == Some(idx) {
                Stroke::new(2.5, egui::Color32::WHITE)
            } else if dim {
                Stroke::new(0.5, symbology.outline.gamma_multiply(0.3))
            } else {
                Stroke::new(1.0, symbology.outline)
            };
            for ring in &county.rings {
                let points: PlotPoints = ring.iter().map(|&[lon, lat]| [lon, lat]).collect();
                plot_ui.polygon(
                    Polygon::new(points)
                        .fill_color(fill)
                        .stroke(stroke)
                        .name(&county.name),
                );
            }
        };

        // Dimmed counties first so in-range ones draw on top of shared edges.
        for &idx in &state.excluded {
            draw_county(idx, true);
        }
        for &idx in &state.included {
            draw_county(idx, false);
        }

        if let Some(pointer) = plot_ui.pointer_coordinate() {
            hovered = dataset
                .counties
                .iter()
                .position(|county| county.contains(pointer.x, pointer.y));
        }
    });

    // The hover panel only shows while the pointer is over the map itself,
    // never while it is over the side panels.
    if response.response.hovered() {
        if let Some(idx) = hovered {
            hover_panel(ui, &dataset.counties[idx], symbology);
        }
    }
}

// ---------------------------------------------------------------------------
// Hover panel – county details
// ---------------------------------------------------------------------------

/// Floating detail panel for the county under the pointer.
fn hover_panel(ui: &Ui, county: &County, symbology: &GradeSymbology) {
    egui::Window::new("county_details")
        .title_bar(false)
        .resizable(false)
        .interactable(false)
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 12.0])
        .show(ui.ctx(), |ui: &mut Ui| {
            ui.strong(&county.name);
            ui.colored_label(
                symbology.fill_for(county.grade),
                format!("Grade {}", county.grade),
            );
            ui.separator();

            egui_extras::TableBuilder::new(ui)
                .column(egui_extras::Column::auto().at_least(100.0))
                .column(egui_extras::Column::remainder())
                .body(|mut body| {
                    for (name, value) in &county.attributes {
                        body.row(16.0, |mut row| {
                            row.col(|ui: &mut Ui| {
                                ui.label(name);
                            });
                            row.col(|ui: &mut Ui| {
                                ui.label(value.to_string());
                            });
                        });
                    }
                });
        });
}
