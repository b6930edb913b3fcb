use chrono::Weekday;
use egui::{Color32, Context, RichText, Window};

use crate::app::PlannerApp;
use crate::model::calendar::format_date;
use crate::model::{MilestoneSymbol, PALETTE};
use crate::ui::theme;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn dialog(title: &str) -> Window<'static> {
    Window::new(RichText::new(title).strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([theme::DIALOG_WIDTH, 0.0])
}

fn field_visuals(ui: &mut egui::Ui) {
    ui.visuals_mut().extreme_bg_color = theme::BG_FIELD;
    ui.visuals_mut().faint_bg_color = Color32::TRANSPARENT;
    ui.visuals_mut().striped = false;
}

/// Create / Cancel row. Returns `(create, cancel)`.
fn create_cancel(ui: &mut egui::Ui, create_label: &str) -> (bool, bool) {
    ui.add_space(6.0);
    ui.separator();
    ui.add_space(4.0);
    let mut create = false;
    let mut cancel = false;
    ui.horizontal(|ui| {
        let create_btn = egui::Button::new(RichText::new(create_label).color(Color32::WHITE))
            .fill(theme::ACCENT)
            .rounding(egui::Rounding::same(4.0));
        create = ui.add_sized([80.0, 28.0], create_btn).clicked();
        cancel = ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked();
    });
    ui.add_space(2.0);
    (create, cancel)
}

fn escape_pressed(ctx: &Context) -> bool {
    ctx.input(|i| i.key_pressed(egui::Key::Escape))
}

fn section_picker(ui: &mut egui::Ui, salt: &str, app_sections: &[(uuid::Uuid, String)], value: &mut Option<uuid::Uuid>) {
    let selected = value
        .and_then(|id| app_sections.iter().find(|(sid, _)| *sid == id))
        .map(|(_, name)| name.as_str())
        .unwrap_or("First section");
    egui::ComboBox::from_id_salt(salt)
        .selected_text(selected)
        .width(220.0)
        .show_ui(ui, |ui| {
            for (id, name) in app_sections {
                ui.selectable_value(value, Some(*id), name.as_str());
            }
        });
}

/// Render the "Add Task" dialog.
pub fn show_add_task_dialog(app: &mut PlannerApp, ctx: &Context) {
    let mut create = false;
    let mut cancel = false;
    let sections: Vec<_> = app.plan.sections.iter().map(|s| (s.id, s.name.clone())).collect();
    dialog("Add Task").show(ctx, |ui| {
        field_visuals(ui);
        ui.add_space(4.0);
        let form = &mut app.task_form;
        egui::Grid::new("add_task_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                ui.add_sized(
                    [220.0, 24.0],
                    egui::TextEdit::singleline(&mut form.name)
                        .hint_text("Task name...")
                        .text_color(theme::TEXT_PRIMARY),
                );
                ui.end_row();

                ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                ui.add(egui_extras::DatePickerButton::new(&mut form.start).id_salt("dlg_dp_start"));
                ui.end_row();

                ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                ui.add(egui_extras::DatePickerButton::new(&mut form.end).id_salt("dlg_dp_end"));
                ui.end_row();

                if !sections.is_empty() {
                    ui.label(RichText::new("Section").color(theme::TEXT_SECONDARY));
                    section_picker(ui, "dlg_task_section", &sections, &mut form.section_id);
                    ui.end_row();
                }

                ui.label(RichText::new("Notes").color(theme::TEXT_SECONDARY));
                ui.add_sized([220.0, 48.0], egui::TextEdit::multiline(&mut form.description));
                ui.end_row();
            });
        (create, cancel) = create_cancel(ui, "Create");
    });

    if create {
        app.create_task_from_dialog();
    }
    if create || cancel || escape_pressed(ctx) {
        app.show_add_task = false;
    }
}

/// Render the "Add Milestone" dialog.
pub fn show_add_milestone_dialog(app: &mut PlannerApp, ctx: &Context) {
    let mut create = false;
    let mut cancel = false;
    let sections: Vec<_> = app.plan.sections.iter().map(|s| (s.id, s.name.clone())).collect();
    dialog("Add Milestone").show(ctx, |ui| {
        field_visuals(ui);
        ui.add_space(4.0);
        let form = &mut app.milestone_form;
        egui::Grid::new("add_milestone_grid")
            .num_columns(2)
            .spacing([12.0, 8.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                ui.add_sized(
                    [220.0, 24.0],
                    egui::TextEdit::singleline(&mut form.name).hint_text("Milestone name..."),
                );
                ui.end_row();

                ui.label(RichText::new("Date").color(theme::TEXT_SECONDARY));
                ui.add(egui_extras::DatePickerButton::new(&mut form.date).id_salt("dlg_dp_milestone"));
                ui.end_row();

                if !sections.is_empty() {
                    ui.label(RichText::new("Section").color(theme::TEXT_SECONDARY));
                    section_picker(ui, "dlg_milestone_section", &sections, &mut form.section_id);
                    ui.end_row();
                }

                ui.label(RichText::new("Symbol").color(theme::TEXT_SECONDARY));
                egui::ComboBox::from_id_salt("dlg_milestone_symbol")
                    .selected_text(form.symbol.label())
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for symbol in MilestoneSymbol::ALL {
                            ui.selectable_value(&mut form.symbol, symbol, symbol.label());
                        }
                    });
                ui.end_row();
            });
        (create, cancel) = create_cancel(ui, "Create");
    });

    if create {
        app.create_milestone_from_dialog();
    }
    if create || cancel || escape_pressed(ctx) {
        app.show_add_milestone = false;
    }
}

/// Render the "Add Section" dialog.
pub fn show_add_section_dialog(app: &mut PlannerApp, ctx: &Context) {
    let mut create = false;
    let mut cancel = false;
    dialog("Add Section").show(ctx, |ui| {
        field_visuals(ui);
        ui.add_space(4.0);
        ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
        let edit = ui.add_sized(
            [ui.available_width(), 24.0],
            egui::TextEdit::singleline(&mut app.section_form.name).hint_text("Section name..."),
        );
        if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            create = true;
        }
        ui.add_space(4.0);
        ui.label(RichText::new("Color").color(theme::TEXT_SECONDARY));
        swatch_row(ui, &mut app.section_form.color);
        let (clicked, cancelled) = create_cancel(ui, "Create");
        create |= clicked;
        cancel = cancelled;
    });

    if create {
        app.create_section_from_dialog();
    }
    if create || cancel || escape_pressed(ctx) {
        app.show_add_section = false;
    }
}

fn swatch_row(ui: &mut egui::Ui, value: &mut crate::model::HexColor) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 4.0;
        for color in PALETTE {
            let size = if *value == color { 20.0 } else { 16.0 };
            let (rect, resp) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::click());
            ui.painter().rect_filled(rect, egui::Rounding::same(3.0), theme::color32(color));
            if *value == color {
                ui.painter().rect_stroke(
                    rect.expand(1.0),
                    egui::Rounding::same(4.0),
                    egui::Stroke::new(2.0, Color32::WHITE),
                );
            }
            if resp.clicked() {
                *value = color;
            }
        }
    });
}

/// Off days and markers.
pub fn show_calendar_dialog(app: &mut PlannerApp, ctx: &Context) {
    let mut close = false;
    Window::new(RichText::new("Calendar").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([380.0, 460.0])
        .show(ctx, |ui| {
            field_visuals(ui);
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.label(RichText::new("Recurring off days").strong());
                ui.horizontal_wrapped(|ui| {
                    for weekday in WEEKDAYS {
                        let mut off = app.plan.off_weekdays.contains(&weekday);
                        if ui.checkbox(&mut off, weekday.to_string()).changed() {
                            app.plan.toggle_off_weekday(weekday);
                        }
                    }
                });
                ui.add_space(8.0);

                ui.label(RichText::new("Specific off days").strong());
                let mut remove = None;
                for day in &app.plan.off_days {
                    ui.horizontal(|ui| {
                        ui.label(format_date(*day));
                        if ui
                            .small_button(egui_phosphor::regular::X)
                            .on_hover_text("Remove off day")
                            .clicked()
                        {
                            remove = Some(*day);
                        }
                    });
                }
                if let Some(day) = remove {
                    app.plan.remove_off_day(day);
                }
                ui.horizontal(|ui| {
                    ui.add(egui_extras::DatePickerButton::new(&mut app.off_day_form).id_salt("dlg_dp_off_day"));
                    if ui.button("Add off day").clicked() {
                        app.add_off_day_from_dialog();
                    }
                });
                ui.add_space(8.0);
                ui.separator();

                ui.label(RichText::new("Markers").strong());
                let mut delete = None;
                for marker in &app.plan.markers {
                    ui.horizontal(|ui| {
                        let (dot, _) = ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
                        ui.painter().circle_filled(dot.center(), 4.0, theme::color32(marker.color));
                        ui.label(&marker.label);
                        ui.label(RichText::new(&marker.date).color(theme::TEXT_SECONDARY));
                        if ui
                            .small_button(egui_phosphor::regular::X)
                            .on_hover_text("Delete marker")
                            .clicked()
                        {
                            delete = Some(marker.id);
                        }
                    });
                }
                if let Some(id) = delete {
                    app.plan.delete_marker(id);
                }
                ui.add_space(4.0);
                egui::Grid::new("add_marker_grid")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Label").color(theme::TEXT_SECONDARY));
                        ui.add_sized(
                            [200.0, 22.0],
                            egui::TextEdit::singleline(&mut app.marker_form.label).hint_text("Review, launch..."),
                        );
                        ui.end_row();
                        ui.label(RichText::new("Date").color(theme::TEXT_SECONDARY));
                        ui.add(egui_extras::DatePickerButton::new(&mut app.marker_form.date).id_salt("dlg_dp_marker"));
                        ui.end_row();
                        ui.label(RichText::new("Color").color(theme::TEXT_SECONDARY));
                        swatch_row(ui, &mut app.marker_form.color);
                        ui.end_row();
                    });
                if ui.button(format!("{}  Add marker", egui_phosphor::regular::PLUS)).clicked() {
                    app.add_marker_from_dialog();
                }
            });
            ui.separator();
            if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                close = true;
            }
        });
    if close || escape_pressed(ctx) {
        app.show_calendar = false;
    }
}

/// Plan title and subtitle.
pub fn show_plan_details_dialog(app: &mut PlannerApp, ctx: &Context) {
    let mut close = false;
    dialog("Plan Details").show(ctx, |ui| {
        field_visuals(ui);
        ui.label(RichText::new("Title").color(theme::TEXT_SECONDARY));
        ui.add_sized([ui.available_width(), 24.0], egui::TextEdit::singleline(&mut app.plan.title));
        ui.label(RichText::new("Subtitle").color(theme::TEXT_SECONDARY));
        ui.add_sized([ui.available_width(), 24.0], egui::TextEdit::singleline(&mut app.plan.subtitle));
        ui.add_space(6.0);
        if ui.add_sized([80.0, 28.0], egui::Button::new("Done")).clicked() {
            close = true;
        }
    });
    if close || escape_pressed(ctx) {
        app.show_plan_details = false;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut PlannerApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([280.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("PlanIt").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION"))).color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Plan sections, tasks and milestones");
                ui.label("on a timeline, then export them.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || escape_pressed(ctx) {
        app.show_about = false;
    }
}
