use crate::app::PlannerApp;
use crate::config::{clamp_zoom, PADDING_DAYS_MAX, ROW_HEIGHT_MAX, ROW_HEIGHT_MIN, ZOOM_MAX, ZOOM_MIN};
use crate::io::ExportFormat;
use crate::model::ViewMode;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

const ZOOM_STEP: f32 = 1.25;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut PlannerApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  Plan  ").font(theme::font_menu()), |ui| {
            if ui.button("  Add Task").clicked() {
                app.open_add_task();
                ui.close_menu();
            }
            if ui.button("  Add Milestone").clicked() {
                app.open_add_milestone();
                ui.close_menu();
            }
            if ui.button("  Add Section").clicked() {
                app.open_add_section();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Calendar and Markers...").clicked() {
                app.show_calendar = true;
                ui.close_menu();
            }
            if ui.button("  Plan Details...").clicked() {
                app.show_plan_details = true;
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.config.zoom = clamp_zoom(app.config.zoom * ZOOM_STEP);
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.config.zoom = clamp_zoom(app.config.zoom / ZOOM_STEP);
                ui.close_menu();
            }
            if ui.button("  Reset Zoom").clicked() {
                app.config.zoom = 1.0;
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Timeline Scale").small().weak());
            for mode in ViewMode::ALL {
                if ui.radio_value(&mut app.config.view_mode, mode, mode.label()).clicked() {
                    ui.close_menu();
                }
            }
        });

        ui.menu_button(RichText::new("  Export  ").font(theme::font_menu()), |ui| {
            for format in ExportFormat::ALL {
                if ui.button(format!("  {}", format.label())).clicked() {
                    app.export(format);
                    ui.close_menu();
                }
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();

        // Quick view controls
        for mode in ViewMode::ALL {
            ui.selectable_value(&mut app.config.view_mode, mode, RichText::new(mode.label()).size(11.0));
        }
        ui.separator();
        ui.label(RichText::new("Zoom").size(11.0).color(theme::TEXT_DIM));
        ui.add(
            egui::DragValue::new(&mut app.config.zoom)
                .range(ZOOM_MIN..=ZOOM_MAX)
                .speed(0.01)
                .custom_formatter(|v, _| format!("{:.0}%", v * 100.0))
                .custom_parser(|s| s.trim().trim_end_matches('%').parse::<f64>().ok().map(|v| v / 100.0)),
        );
        ui.label(RichText::new("Padding").size(11.0).color(theme::TEXT_DIM));
        ui.add(egui::DragValue::new(&mut app.config.padding_days).range(0..=PADDING_DAYS_MAX).suffix(" d"));
        ui.label(RichText::new("Rows").size(11.0).color(theme::TEXT_DIM));
        ui.add(
            egui::DragValue::new(&mut app.config.row_height)
                .range(ROW_HEIGHT_MIN..=ROW_HEIGHT_MAX)
                .suffix(" px"),
        );

        // Right-aligned export shortcut and plan title
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = format!("{}  Export", egui_phosphor::regular::EXPORT);
            if ui.button(RichText::new(label).size(11.0)).clicked() {
                app.export(app.export_format);
            }
            egui::ComboBox::from_id_salt("export_format")
                .selected_text(RichText::new(app.export_format.label()).size(11.0))
                .width(96.0)
                .show_ui(ui, |ui| {
                    for format in ExportFormat::ALL {
                        ui.selectable_value(&mut app.export_format, format, format.label());
                    }
                });
            ui.label(RichText::new(&app.plan.title).size(11.0).weak());
        });
    });
}
