use eframe::egui;

use crate::state::AppState;
use crate::ui::{chart, map, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GradeAtlasApp {
    pub state: AppState,
}

impl Default for GradeAtlasApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for GradeAtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: grade distribution ----
        egui::TopBottomPanel::bottom("distribution_panel")
            .default_height(160.0)
            .resizable(true)
            .show(ctx, |ui| {
                chart::distribution_chart(ui, &self.state);
            });

        // ---- Central panel: county map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            map::county_map(ui, &self.state);
        });
    }
}
