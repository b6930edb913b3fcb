use crate::app::Selection;
use crate::model::{Milestone, Plan, Task};
use crate::ui::theme;
use egui::{Color32, RichText, Ui};
use uuid::Uuid;

/// Actions that the outline panel can request.
pub enum TaskTableAction {
    None,
    Select(Selection),
    Delete(Selection),
    DeleteSection(Uuid),
    AddTask,
    AddMilestone,
    AddSection,
}

/// Render the left-side outline: sections with their tasks and milestones.
pub fn show_task_table(plan: &Plan, selection: Option<Selection>, ui: &mut Ui) -> TaskTableAction {
    let mut action = TaskTableAction::None;

    // Header area
    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new("Plan").strong().size(15.0).color(theme::TEXT_PRIMARY));
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({} tasks)", plan.tasks.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);

    let btn = egui::Button::new(
        RichText::new(format!("{}  Add Task", egui_phosphor::regular::PLUS))
            .color(Color32::WHITE)
            .size(12.0),
    )
    .fill(theme::ACCENT)
    .rounding(egui::Rounding::same(5.0));
    if ui.add_sized([ui.available_width(), 30.0], btn).clicked() {
        action = TaskTableAction::AddTask;
    }
    ui.horizontal(|ui| {
        let half = (ui.available_width() - ui.spacing().item_spacing.x) / 2.0;
        if ui
            .add_sized([half, 24.0], egui::Button::new(format!("{}  Milestone", egui_phosphor::regular::DIAMOND)))
            .clicked()
        {
            action = TaskTableAction::AddMilestone;
        }
        if ui
            .add_sized([half, 24.0], egui::Button::new(format!("{}  Section", egui_phosphor::regular::ROWS)))
            .clicked()
        {
            action = TaskTableAction::AddSection;
        }
    });

    ui.add_space(6.0);
    ui.separator();
    ui.add_space(2.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let groups = plan.sections_with_items();
            if groups.is_empty() {
                ui.label(RichText::new("Nothing planned yet").size(11.0).color(theme::TEXT_DIM));
            }
            for group in groups {
                // Section header
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    let (dot_rect, _) = ui.allocate_exact_size(egui::vec2(8.0, 8.0), egui::Sense::hover());
                    let dot = group.color.map(theme::color32).unwrap_or(theme::TEXT_DIM);
                    ui.painter().circle_filled(dot_rect.center(), 4.0, dot);
                    ui.label(
                        RichText::new(group.name.to_uppercase())
                            .size(10.5)
                            .strong()
                            .color(theme::TEXT_SECONDARY),
                    );
                    ui.label(
                        RichText::new(format!("{}", group.tasks.len() + group.milestones.len()))
                            .size(10.0)
                            .color(theme::TEXT_DIM),
                    );
                    if let Some(section_id) = group.id {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let del = ui.add(
                                egui::Button::new(
                                    RichText::new(egui_phosphor::regular::TRASH)
                                        .size(10.0)
                                        .color(theme::TEXT_DIM),
                                )
                                .frame(false),
                            );
                            if del.on_hover_text("Delete section (items become unassigned)").clicked() {
                                action = TaskTableAction::DeleteSection(section_id);
                            }
                        });
                    }
                });
                ui.add_space(2.0);

                for (i, task) in group.tasks.iter().enumerate() {
                    let is_selected = selection == Some(Selection::Task(task.id));
                    if let Some(row_action) = task_row(ui, task, i, is_selected) {
                        action = row_action;
                    }
                }
                for (i, milestone) in group.milestones.iter().enumerate() {
                    let is_selected = selection == Some(Selection::Milestone(milestone.id));
                    if let Some(row_action) = milestone_row(ui, milestone, group.tasks.len() + i, is_selected) {
                        action = row_action;
                    }
                }
            }
        });

    action
}

fn row_frame(index: usize, is_selected: bool) -> egui::Frame {
    let fill = if is_selected {
        theme::BG_SELECTED
    } else if index % 2 == 0 {
        theme::BG_PANEL
    } else {
        theme::BG_DARK
    };
    egui::Frame {
        fill,
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::symmetric(6.0, 4.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::NONE,
        shadow: egui::epaint::Shadow::NONE,
    }
}

fn delete_button(ui: &mut Ui, hover: &str) -> bool {
    ui.add(
        egui::Button::new(RichText::new(egui_phosphor::regular::X).size(10.0).color(theme::TEXT_DIM)).frame(false),
    )
    .on_hover_text(hover)
    .clicked()
}

fn name_text(name: &str, is_selected: bool) -> RichText {
    RichText::new(name).size(12.0).color(if is_selected {
        Color32::WHITE
    } else {
        theme::TEXT_PRIMARY
    })
}

fn task_row(ui: &mut Ui, task: &Task, index: usize, is_selected: bool) -> Option<TaskTableAction> {
    let mut action = None;
    let frame_resp = row_frame(index, is_selected).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 6.0;

            let (dot_rect, _) = ui.allocate_exact_size(egui::vec2(6.0, 6.0), egui::Sense::hover());
            ui.painter().circle_filled(dot_rect.center(), 3.0, theme::color32(task.color));

            ui.add(egui::Label::new(name_text(&task.name, is_selected)).truncate());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.spacing_mut().item_spacing.x = 4.0;
                if delete_button(ui, "Delete task") {
                    action = Some(TaskTableAction::Delete(Selection::Task(task.id)));
                }
                if task.progress.is_some() {
                    let pbar = egui::ProgressBar::new(task.progress_fraction())
                        .desired_width(40.0)
                        .fill(theme::color32(task.color))
                        .rounding(egui::Rounding::same(3.0));
                    ui.add(pbar);
                }
                let dates = match task.duration_days() {
                    Some(days) => format!("{}  {days}d", short_date(&task.start)),
                    None => "invalid dates".to_string(),
                };
                ui.label(RichText::new(dates).size(10.0).color(theme::TEXT_SECONDARY));
            });
        });
    });

    // Make entire row clickable
    let row_click = ui.interact(
        frame_resp.response.rect,
        egui::Id::new(("task-row", task.id)),
        egui::Sense::click(),
    );
    if row_click.clicked() && action.is_none() {
        action = Some(TaskTableAction::Select(Selection::Task(task.id)));
    }
    ui.add_space(1.0);
    action
}

fn milestone_row(ui: &mut Ui, milestone: &Milestone, index: usize, is_selected: bool) -> Option<TaskTableAction> {
    let mut action = None;
    let frame_resp = row_frame(index, is_selected).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 6.0;
            ui.label(
                RichText::new(egui_phosphor::regular::DIAMOND)
                    .size(11.0)
                    .color(theme::color32(milestone.color)),
            );
            ui.add(egui::Label::new(name_text(&milestone.name, is_selected)).truncate());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.spacing_mut().item_spacing.x = 4.0;
                if delete_button(ui, "Delete milestone") {
                    action = Some(TaskTableAction::Delete(Selection::Milestone(milestone.id)));
                }
                ui.label(
                    RichText::new(short_date(&milestone.date))
                        .size(10.0)
                        .color(theme::TEXT_SECONDARY),
                );
            });
        });
    });

    let row_click = ui.interact(
        frame_resp.response.rect,
        egui::Id::new(("milestone-row", milestone.id)),
        egui::Sense::click(),
    );
    if row_click.clicked() && action.is_none() {
        action = Some(TaskTableAction::Select(Selection::Milestone(milestone.id)));
    }
    ui.add_space(1.0);
    action
}

/// `MM-DD` from a `YYYY-MM-DD` date; anything else is shown as is.
fn short_date(date: &str) -> &str {
    date.get(5..).filter(|_| date.len() == 10).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_dates_drop_the_year() {
        assert_eq!(short_date("2026-02-05"), "02-05");
        assert_eq!(short_date("soon"), "soon");
    }
}
