use std::time::Instant;

use chrono::NaiveDate;
use egui::{Align2, Color32, Pos2, Rect, Response, Rounding, Sense, Stroke, Ui, Vec2};
use uuid::Uuid;

use crate::app::Selection;
use crate::config::{clamp_zoom, AppConfig};
use crate::model::calendar::format_date;
use crate::model::{
    DragController, DragMode, DragUpdate, HexColor, IndexSpan, LabelThinning, LayoutRow, Milestone,
    MilestoneSymbol, Placement, Plan, Segment, Task, TimelineLayout, ViewMode,
};
use crate::ui::theme;

const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;
/// egui reports one mouse pointer; touch input arrives as that pointer too.
const MOUSE_POINTER: u64 = 0;
const ZOOM_STEP: f32 = 1.1;
const MIN_BAR_WIDTH: f32 = 6.0;

/// Result details from interactions in the Gantt chart.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// Some task's dates changed this frame.
    pub changed: bool,
    /// A drag on this task ended after moving it.
    pub committed: Option<Uuid>,
}

/// Maps layout fractions onto the painted timeline.
#[derive(Debug, Clone, Copy)]
struct Track {
    left: f32,
    width: f32,
}

impl Track {
    fn x(&self, fraction: f64) -> f32 {
        self.left + fraction as f32 * self.width
    }

    fn band(&self, placement: Placement, top: f32, bottom: f32) -> Rect {
        Rect::from_min_max(
            Pos2::new(self.x(placement.left), top),
            Pos2::new(self.x(placement.right()), bottom),
        )
    }
}

/// Pixel width of the timeline: `zoom` scales the base day width, and the
/// chart never gets narrower than the space it is shown in.
pub fn timeline_width(day_count: usize, zoom: f32, available: f32) -> f32 {
    (day_count as f32 * theme::BASE_DAY_WIDTH * zoom).max(available)
}

pub fn row_height(row: &LayoutRow<'_>, item_height: f32) -> f32 {
    if row.is_section() {
        theme::SECTION_ROW_HEIGHT
    } else {
        item_height
    }
}

/// Render the timeline (central panel).
pub fn show_gantt_chart(
    plan: &mut Plan,
    drag: &mut DragController,
    config: &mut AppConfig,
    selection: &mut Option<Selection>,
    today: NaiveDate,
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();

    // Ctrl + scroll wheel zooms
    if ui.rect_contains_pointer(ui.max_rect()) && ui.input(|i| i.modifiers.ctrl) {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll > 0.0 {
            config.zoom = clamp_zoom(config.zoom * ZOOM_STEP);
        } else if scroll < 0.0 {
            config.zoom = clamp_zoom(config.zoom / ZOOM_STEP);
        }
    }

    let layout = TimelineLayout::build(plan, today, config.view_mode);
    let mapper = layout.mapper;
    let day_count = layout.day_count();
    let available = ui.available_size();
    let width = timeline_width(day_count, config.zoom, available.x);
    let rows_height: f32 = layout
        .rows
        .iter()
        .map(|row| row_height(row, config.row_height))
        .sum();
    let height = (theme::HEADER_HEIGHT + rows_height + 40.0).max(available.y);
    let thinning = LabelThinning::for_day_width(width / day_count.max(1) as f32);
    let mut updates: Vec<DragUpdate> = Vec::new();

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(Vec2::new(width, height), Sense::click());
            let origin = response.rect.min;
            let track = Track {
                left: origin.x,
                width,
            };
            let body_top = origin.y + theme::HEADER_HEIGHT;
            let bottom = origin.y + height;
            let visible_left = ui.clip_rect().left().max(origin.x);
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            draw_backdrop(&painter, &layout, track, body_top, bottom);
            draw_timeline_header(&painter, &layout, track, origin.y, thinning);
            draw_today_line(&painter, &layout, track, today, body_top, bottom);

            for marker in &layout.markers {
                let x = track.x(layout.point_fraction(marker.day_index));
                let dot = Pos2::new(x, body_top - 4.0);
                painter.circle_filled(dot, 4.0, theme::color32(marker.color));
                let dot_response = ui.interact(
                    Rect::from_center_size(dot, Vec2::splat(12.0)),
                    ui.make_persistent_id(("marker", marker.id)),
                    Sense::hover(),
                );
                if dot_response.hovered() {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new(("marker-tip", marker.id)),
                        |ui| {
                            ui.strong(&marker.label);
                            ui.label(format_date(mapper.date_at(marker.day_index)));
                        },
                    );
                }
            }

            let mut y = body_top;
            for row in &layout.rows {
                let h = row_height(row, config.row_height);
                let row_rect = Rect::from_min_size(Pos2::new(origin.x, y), Vec2::new(width, h));
                match row {
                    LayoutRow::Section { name, color, .. } => {
                        draw_section_row(&painter, row_rect, name, *color, visible_left);
                    }
                    LayoutRow::Task {
                        task,
                        placement: Some(placement),
                    } => {
                        let inset = theme::BAR_INSET.min(h / 4.0);
                        let mut bar_rect = track.band(*placement, y + inset, y + h - inset);
                        if bar_rect.width() < MIN_BAR_WIDTH {
                            bar_rect.set_width(MIN_BAR_WIDTH);
                        }
                        let is_selected = *selection == Some(Selection::Task(task.id));
                        draw_task_bar(&painter, task, bar_rect, is_selected);

                        let bar = BarResponses::interact(ui, task.id, bar_rect);
                        let now = Instant::now();

                        if bar.body.clicked() {
                            consumed_click = true;
                            if !drag.suppresses_click(task.id, now) {
                                *selection = Some(Selection::Task(task.id));
                            }
                        }

                        for (response, mode) in bar.by_mode() {
                            if !response.drag_started() {
                                continue;
                            }
                            let span = mapper.task_span(task);
                            if let (Some(span), Some(pos)) = (span, response.interact_pointer_pos()) {
                                drag.pointer_down(task.id, mode, span, mapper, MOUSE_POINTER, pos.x);
                                *selection = Some(Selection::Task(task.id));
                                consumed_click = true;
                            }
                        }

                        if drag.active_task() == Some(task.id) {
                            if let Some(response) = bar.by_mode().into_iter().map(|(r, _)| r).find(|r| r.dragged()) {
                                let icon = match drag.active_mode() {
                                    Some(DragMode::Move) => egui::CursorIcon::Grabbing,
                                    _ => egui::CursorIcon::ResizeHorizontal,
                                };
                                ui.ctx().set_cursor_icon(icon);
                                if let Some(pos) = response.interact_pointer_pos() {
                                    if let Some(update) = drag.pointer_move(MOUSE_POINTER, pos.x, width, day_count) {
                                        updates.push(update);
                                    }
                                }
                            }
                            if bar.by_mode().iter().any(|(r, _)| r.drag_stopped()) {
                                interaction.committed = drag.pointer_up(MOUSE_POINTER, now);
                            }
                        }

                        let edge_hovered = bar.left.hovered() || bar.right.hovered();
                        if edge_hovered {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
                        } else if bar.body.hovered() && !drag.is_dragging() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        }
                        if is_selected || edge_hovered {
                            draw_handles(&painter, bar_rect);
                        }

                        if bar.any_hovered() && !drag.is_dragging() {
                            egui::show_tooltip_at_pointer(
                                ui.ctx(),
                                ui.layer_id(),
                                egui::Id::new(("task-tip", task.id)),
                                |ui| task_tooltip(ui, task),
                            );
                        }
                    }
                    LayoutRow::Milestone {
                        milestone,
                        center: Some(center),
                    } => {
                        let center = Pos2::new(track.x(*center), row_rect.center().y);
                        let is_selected = *selection == Some(Selection::Milestone(milestone.id));
                        let hit = draw_milestone(&painter, milestone, center, is_selected);
                        let response = ui.interact(
                            hit.expand(4.0),
                            ui.make_persistent_id(("milestone", milestone.id)),
                            Sense::click(),
                        );
                        if response.clicked() {
                            *selection = Some(Selection::Milestone(milestone.id));
                            consumed_click = true;
                        }
                        if response.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            egui::show_tooltip_at_pointer(
                                ui.ctx(),
                                ui.layer_id(),
                                egui::Id::new(("milestone-tip", milestone.id)),
                                |ui| {
                                    ui.strong(&milestone.name);
                                    ui.label(&milestone.date);
                                    ui.label(milestone.symbol.label());
                                },
                            );
                        }
                    }
                    // unparseable dates: the row stays, nothing to draw
                    LayoutRow::Task { placement: None, .. } | LayoutRow::Milestone { center: None, .. } => {}
                }

                painter.line_segment(
                    [Pos2::new(origin.x, y + h), Pos2::new(origin.x + width, y + h)],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );
                y += h;
            }

            if layout.rows.is_empty() {
                painter.text(
                    Pos2::new(visible_left + 24.0, body_top + 32.0),
                    Align2::LEFT_CENTER,
                    "No tasks yet. Use \"Add Task\" to start the plan.",
                    theme::font_bar(),
                    theme::TEXT_DIM,
                );
            }

            // Empty click on background clears selection
            if response.clicked() && !consumed_click {
                *selection = None;
            }
        });

    // A gesture whose bar vanished mid-drag still has to end.
    if drag.is_dragging() && !ui.input(|i| i.pointer.any_down()) {
        interaction.committed = drag.pointer_up(MOUSE_POINTER, Instant::now()).or(interaction.committed);
    }

    for update in updates {
        if plan.apply_drag(update) {
            interaction.changed = true;
        }
    }
    interaction
}

/// Hit areas of one task bar. The edge handles are registered after the
/// body so they win where they overlap it.
struct BarResponses {
    body: Response,
    left: Response,
    right: Response,
}

impl BarResponses {
    fn interact(ui: &Ui, task_id: Uuid, bar_rect: Rect) -> Self {
        let edge = |x: f32| {
            Rect::from_center_size(Pos2::new(x, bar_rect.center().y), Vec2::new(HANDLE_WIDTH, bar_rect.height()))
                .expand(4.0)
        };
        let body = ui.interact(
            bar_rect,
            ui.make_persistent_id(("task-bar", task_id)),
            Sense::click_and_drag(),
        );
        let left = ui.interact(
            edge(bar_rect.left()),
            ui.make_persistent_id(("task-resize-left", task_id)),
            Sense::drag(),
        );
        let right = ui.interact(
            edge(bar_rect.right()),
            ui.make_persistent_id(("task-resize-right", task_id)),
            Sense::drag(),
        );
        Self { body, left, right }
    }

    fn by_mode(&self) -> [(&Response, DragMode); 3] {
        [
            (&self.left, DragMode::ResizeLeft),
            (&self.right, DragMode::ResizeRight),
            (&self.body, DragMode::Move),
        ]
    }

    fn any_hovered(&self) -> bool {
        self.body.hovered() || self.left.hovered() || self.right.hovered()
    }
}

fn task_tooltip(ui: &mut Ui, task: &Task) {
    ui.strong(&task.name);
    ui.label(format!("{} → {}", task.start, task.end));
    if let Some(days) = task.duration_days() {
        ui.label(format!("{days} day{}", if days == 1 { "" } else { "s" }));
    }
    if task.progress.is_some() {
        ui.label(format!("Progress: {:.0}%", task.progress_fraction() * 100.0));
    }
    if !task.description.is_empty() {
        ui.label(egui::RichText::new(&task.description).color(theme::TEXT_SECONDARY));
    }
}

/// Column grid, off days and marker bands behind the rows.
fn draw_backdrop(painter: &egui::Painter, layout: &TimelineLayout<'_>, track: Track, top: f32, bottom: f32) {
    // Off days and marker bands are a day wide, which only exists in day view.
    if layout.view_mode == ViewMode::Day {
        for &index in &layout.off_days {
            painter.rect_filled(track.band(layout.day_band(index), top, bottom), 0.0, theme::OFF_DAY);
        }
        for marker in &layout.markers {
            painter.rect_filled(
                track.band(layout.day_band(marker.day_index), top, bottom),
                0.0,
                theme::tint(marker.color, theme::MARKER_BAND_ALPHA),
            );
        }
    } else {
        for marker in &layout.markers {
            let x = track.x(layout.point_fraction(marker.day_index));
            painter.line_segment(
                [Pos2::new(x, top), Pos2::new(x, bottom)],
                Stroke::new(1.0, theme::tint(marker.color, 120)),
            );
        }
    }

    for index in 0..layout.segments.len() {
        let x = track.x(layout.segment_placement(index).left);
        painter.line_segment([Pos2::new(x, top), Pos2::new(x, bottom)], Stroke::new(0.5, theme::GRID_LINE));
    }
}

fn draw_timeline_header(
    painter: &egui::Painter,
    layout: &TimelineLayout<'_>,
    track: Track,
    top: f32,
    thinning: LabelThinning,
) {
    let header = Rect::from_min_size(Pos2::new(track.left, top), Vec2::new(track.width, theme::HEADER_HEIGHT));
    painter.rect_filled(header, 0.0, theme::BG_HEADER);
    painter.line_segment(
        [header.left_bottom(), header.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    match layout.view_mode {
        ViewMode::Day => {
            let month_bottom = top + theme::MONTH_TRACK_HEIGHT;
            let week_bottom = month_bottom + theme::WEEK_TRACK_HEIGHT;
            let day_span = |segment: &Segment| {
                layout.mapper.span_placement(IndexSpan {
                    start: segment.start,
                    end: segment.start + segment.span.saturating_sub(1),
                })
            };

            for month in &layout.headers.months {
                let cell = track.band(day_span(month), top, month_bottom);
                header_cell(painter, cell, &month.label, theme::font_header(), theme::TEXT_PRIMARY, false);
            }
            for (ordinal, week) in layout.headers.weeks.iter().enumerate() {
                let cell = track.band(day_span(week), month_bottom, week_bottom);
                let label = thinning.week_label(ordinal + 1);
                header_cell(painter, cell, &label, theme::font_small(), theme::TEXT_SECONDARY, false);
            }
            for (index, day) in layout.headers.days.iter().enumerate() {
                if !thinning.shows_day_label(index) {
                    continue;
                }
                let cell = track.band(day_span(day), week_bottom, top + theme::HEADER_HEIGHT);
                let color = if day.major { theme::TEXT_PRIMARY } else { theme::TEXT_SECONDARY };
                header_cell(painter, cell, &day.label, theme::font_sub(), color, true);
            }
        }
        ViewMode::Week | ViewMode::Month => {
            for (index, segment) in layout.segments.iter().enumerate() {
                let cell = track.band(layout.segment_placement(index), top, top + theme::HEADER_HEIGHT);
                let color = if segment.major { theme::TEXT_PRIMARY } else { theme::TEXT_SECONDARY };
                header_cell(painter, cell, &segment.label, theme::font_header(), color, true);
            }
        }
    }
}

/// One header label with a leading divider. Labels that do not fit are
/// left out rather than overlapping their neighbours.
fn header_cell(
    painter: &egui::Painter,
    cell: Rect,
    label: &str,
    font: egui::FontId,
    color: Color32,
    centered: bool,
) {
    painter.line_segment([cell.left_top(), cell.left_bottom()], Stroke::new(0.5, theme::GRID_LINE));
    let galley = painter.layout_no_wrap(label.to_string(), font, color);
    if galley.size().x > cell.width() - 2.0 {
        return;
    }
    let y = cell.center().y - galley.size().y / 2.0;
    let x = if centered {
        cell.center().x - galley.size().x / 2.0
    } else {
        cell.left() + 4.0
    };
    painter.with_clip_rect(cell).galley(Pos2::new(x, y), galley, Color32::TRANSPARENT);
}

fn draw_today_line(
    painter: &egui::Painter,
    layout: &TimelineLayout<'_>,
    track: Track,
    today: NaiveDate,
    top: f32,
    bottom: f32,
) {
    let Some(index) = layout.mapper.visible_index(today) else {
        return;
    };
    let x = track.x(layout.point_fraction(index));

    painter.line_segment([Pos2::new(x, top), Pos2::new(x, bottom)], Stroke::new(1.5, theme::TODAY_LINE));

    // Top badge
    let badge_w = 42.0;
    let badge_rect = Rect::from_min_size(Pos2::new(x - badge_w / 2.0, top - 1.0), Vec2::new(badge_w, 14.0));
    painter.rect_filled(badge_rect, Rounding::same(3.0), theme::TODAY_LINE);
    painter.text(
        badge_rect.center(),
        Align2::CENTER_CENTER,
        "Today",
        theme::font_small(),
        Color32::WHITE,
    );
}

fn draw_section_row(painter: &egui::Painter, row: Rect, name: &str, color: Option<HexColor>, visible_left: f32) {
    painter.rect_filled(row, 0.0, theme::BG_SECTION);
    let mut x = visible_left + 10.0;
    if let Some(color) = color {
        painter.circle_filled(Pos2::new(x + 4.0, row.center().y), 4.0, theme::color32(color));
        x += 14.0;
    }
    painter.text(
        Pos2::new(x, row.center().y),
        Align2::LEFT_CENTER,
        name.to_uppercase(),
        theme::font_sub(),
        theme::TEXT_SECONDARY,
    );
}

fn draw_task_bar(painter: &egui::Painter, task: &Task, bar_rect: Rect, is_selected: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let bar_width = bar_rect.width();

    // Soft shadow
    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));

    painter.rect_filled(bar_rect, rounding, theme::color32(task.color));
    // Lighter top highlight
    let highlight_rect = Rect::from_min_size(bar_rect.min, Vec2::new(bar_width, (bar_rect.height() * 0.45).max(4.0)));
    painter.rect_filled(
        highlight_rect,
        Rounding {
            nw: theme::BAR_ROUNDING,
            ne: theme::BAR_ROUNDING,
            sw: 0.0,
            se: 0.0,
        },
        Color32::from_white_alpha(25),
    );

    let progress = task.progress_fraction();
    if progress > 0.0 {
        let progress_width = bar_width * progress;
        let progress_rect = Rect::from_min_size(bar_rect.min, Vec2::new(progress_width, bar_rect.height()));
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);

        if progress < 0.98 {
            let tick_x = bar_rect.left() + progress_width;
            painter.line_segment(
                [
                    Pos2::new(tick_x, bar_rect.top() + 2.0),
                    Pos2::new(tick_x, bar_rect.bottom() - 2.0),
                ],
                Stroke::new(1.0, Color32::from_white_alpha(60)),
            );
        }
    }

    if is_selected {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    // Name on the bar, clipped to it
    if bar_width > 30.0 {
        let galley = painter.layout_no_wrap(task.name.clone(), theme::font_bar(), theme::TEXT_ON_BAR);
        let text_y = bar_rect.center().y - galley.size().y / 2.0;
        painter
            .with_clip_rect(bar_rect.shrink(2.0))
            .galley(Pos2::new(bar_rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }
}

/// Rounded pill handles on both bar edges.
fn draw_handles(painter: &egui::Painter, bar_rect: Rect) {
    let handle_h = bar_rect.height() * 0.55;
    let handle_y = bar_rect.center().y - handle_h / 2.0;
    for x in [bar_rect.left() - 1.5, bar_rect.right() - 2.5] {
        let handle = Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h));
        painter.rect_filled(handle, Rounding::same(2.0), theme::HANDLE_COLOR);
    }
}

fn draw_milestone(painter: &egui::Painter, milestone: &Milestone, center: Pos2, is_selected: bool) -> Rect {
    let r = theme::MILESTONE_RADIUS;
    let fill = theme::color32(milestone.color);
    let shadow = Vec2::new(1.0, 1.5);

    if milestone.symbol == MilestoneSymbol::Circle {
        painter.circle_filled(center + shadow, r, Color32::from_black_alpha(40));
        painter.circle_filled(center, r, fill);
        if is_selected {
            painter.circle_stroke(center, r + 1.5, Stroke::new(2.0, theme::BORDER_ACCENT));
        }
    } else {
        let outline: Vec<Vec2> = milestone
            .symbol
            .outline(r)
            .into_iter()
            .map(|(dx, dy)| Vec2::new(dx, dy))
            .collect();
        fill_outline(painter, center + shadow, &outline, Color32::from_black_alpha(40));
        fill_outline(painter, center, &outline, fill);
        if is_selected {
            let points = outline.iter().map(|offset| center + *offset).collect();
            painter.add(egui::Shape::closed_line(points, Stroke::new(2.0, theme::BORDER_ACCENT)));
        }
    }

    painter.text(
        Pos2::new(center.x + r + 8.0, center.y),
        Align2::LEFT_CENTER,
        &milestone.name,
        theme::font_bar(),
        theme::TEXT_SECONDARY,
    );

    Rect::from_center_size(center, Vec2::splat(r * 2.0 + 2.0))
}

/// Fill a symbol outline as a triangle fan around its centre. Every outline
/// is star-shaped around the centre, so concave ones (star, flag) fill too.
fn fill_outline(painter: &egui::Painter, center: Pos2, outline: &[Vec2], fill: Color32) {
    if outline.len() < 3 {
        return;
    }
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(center, fill);
    for offset in outline {
        mesh.colored_vertex(center + *offset, fill);
    }
    let n = outline.len() as u32;
    for i in 0..n {
        mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
    }
    painter.add(egui::Shape::mesh(mesh));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::parse_date;

    #[test]
    fn width_scales_with_zoom_but_fills_the_panel() {
        assert_eq!(timeline_width(20, 1.0, 100.0), 20.0 * theme::BASE_DAY_WIDTH);
        assert_eq!(timeline_width(20, 0.5, 100.0), 10.0 * theme::BASE_DAY_WIDTH);
        assert_eq!(timeline_width(2, 1.0, 900.0), 900.0);
    }

    #[test]
    fn track_maps_placements_to_pixels() {
        let track = Track {
            left: 100.0,
            width: 400.0,
        };
        let rect = track.band(
            Placement {
                left: 0.25,
                width: 0.5,
            },
            0.0,
            10.0,
        );
        assert_eq!(rect.left(), 200.0);
        assert_eq!(rect.right(), 400.0);
    }

    #[test]
    fn section_rows_have_a_fixed_height() {
        let plan = Plan::sample();
        let layout = TimelineLayout::build(&plan, parse_date("2026-02-01").unwrap(), ViewMode::Day);
        let heights: Vec<f32> = layout.rows.iter().map(|row| row_height(row, 56.0)).collect();
        assert_eq!(heights[0], theme::SECTION_ROW_HEIGHT);
        assert_eq!(heights[1], 56.0);
    }
}
