use eframe::egui::{self, Color32, RichText, Ui};

use crate::config;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    ui.strong("Find county");
    ui.text_edit_singleline(&mut state.search_query);
    if !state.search_query.trim().is_empty() {
        let found = match (&state.dataset, state.search_match()) {
            (Some(ds), Some(idx)) => Some(ds.counties[idx].name.clone()),
            _ => None,
        };
        match found {
            Some(name) => ui.weak(format!("↳ {name}")),
            None => ui.weak("no match"),
        };
    }
    ui.separator();

    // Copy the widget-backed values so the setters below see a clean diff.
    let mut range = state.range;
    let mut enabled = state.filter_enabled;

    ui.strong(config::FILTER_FIELD);
    ui.add_enabled_ui(enabled, |ui: &mut Ui| {
        ui.add(
            egui::Slider::new(&mut range.min, config::DEFAULT_MIN..=config::DEFAULT_MAX)
                .text("min"),
        );
        ui.add(
            egui::Slider::new(&mut range.max, config::DEFAULT_MIN..=config::DEFAULT_MAX)
                .text("max"),
        );
    });

    // Keep the pair ordered: dragging one thumb past the other drags both.
    if range.min > range.max {
        if range.min != state.range.min {
            range.max = range.min;
        } else {
            range.min = range.max;
        }
    }

    ui.checkbox(&mut enabled, "Apply range filter");

    if enabled != state.filter_enabled {
        state.set_filter_enabled(enabled);
    } else {
        state.set_range(range);
    }

    ui.separator();
    ui.label(
        RichText::new(state.clause().to_string())
            .monospace()
            .weak(),
    );

    ui.separator();
    ui.strong("Grades");
    let symbology = state.symbology.clone();
    let distribution = state.distribution;
    for (grade, count) in distribution.entries() {
        ui.horizontal(|ui: &mut Ui| {
            ui.colored_label(
                symbology.fill_for(grade),
                RichText::new(grade.as_str()).strong(),
            );
            ui.label(format!("{count}"));
        });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} counties loaded, {} in range",
                ds.len(),
                state.included.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open county data")
        .add_filter("Supported files", &["parquet", "pq", "json", "geojson", "csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("GeoJSON", &["json", "geojson"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} counties with attributes {:?}",
                    dataset.len(),
                    dataset.attribute_names
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
