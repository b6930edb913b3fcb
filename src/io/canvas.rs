//! Fixed-size drawing of a plan shared by the SVG and PNG exports.
//!
//! The scene is computed analytically from the day count and a nominal
//! timeline width, then either serialized as SVG or rasterized.

use crate::model::geometry::day_width;
use crate::model::{HexColor, LayoutRow, MilestoneSymbol, Plan, TimelineLayout, ViewMode};

use super::ExportContext;

pub const LEFT_WIDTH: f32 = 260.0;
pub const RIGHT_MARGIN: f32 = 40.0;
pub const MONTH_HEIGHT: f32 = 26.0;
pub const WEEK_HEIGHT: f32 = 28.0;
pub const DAY_HEIGHT: f32 = 48.0;
pub const HEADER_HEIGHT: f32 = MONTH_HEIGHT + WEEK_HEIGHT + DAY_HEIGHT;
pub const ROW_HEIGHT: f32 = 56.0;
pub const SECTION_HEIGHT: f32 = 28.0;
/// Added below the rows; the last `BOTTOM_MARGIN` of it stays blank.
pub const FOOTER_HEIGHT: f32 = 90.0;
pub const BOTTOM_MARGIN: f32 = 40.0;
/// Per-day width when there are no days to divide by.
pub const FALLBACK_DAY_WIDTH: f32 = 24.0;
pub const MILESTONE_SIZE: f32 = 10.0;
pub const BAR_RADIUS: f32 = 11.0;

pub const BACKGROUND: HexColor = HexColor::rgb(0xff, 0xfd, 0xf9);
const OFF_DAY: Paint = Paint::new(HexColor::rgb(255, 183, 77), 0.18);
const SECTION_BAND: Paint = Paint::new(HexColor::rgb(255, 227, 198), 0.6);
const GRID: Paint = Paint::new(HexColor::rgb(0, 0, 0), 0.08);
const MARKER_BAND_OPACITY: f32 = 0.12;
const INK: HexColor = HexColor::rgb(0x1c, 0x1a, 0x17);
const INK_SOFT: HexColor = HexColor::rgb(0x5f, 0x5a, 0x55);
const INK_MUTED: HexColor = HexColor::rgb(0x7a, 0x73, 0x6b);

/// A fill or stroke color with opacity in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: HexColor,
    pub opacity: f32,
}

impl Paint {
    pub const fn new(color: HexColor, opacity: f32) -> Self {
        Self { color, opacity }
    }

    pub const fn solid(color: HexColor) -> Self {
        Self::new(color, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
}

/// CSS class of a text element; the SVG stylesheet defines each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Subtitle,
    Range,
    Month,
    Week,
    Day,
    Section,
    TaskName,
    TaskDate,
}

impl TextStyle {
    pub fn class(self) -> &'static str {
        match self {
            TextStyle::Title => "title",
            TextStyle::Subtitle => "subtitle",
            TextStyle::Range => "range",
            TextStyle::Month => "month",
            TextStyle::Week => "week",
            TextStyle::Day => "day",
            TextStyle::Section => "section",
            TextStyle::TaskName => "task-name",
            TextStyle::TaskDate => "task-date",
        }
    }

    /// Pixel size, matching the SVG stylesheet.
    pub fn font_size(self) -> f32 {
        match self {
            TextStyle::Title => 20.0,
            TextStyle::Subtitle | TextStyle::Week | TextStyle::Section | TextStyle::TaskDate => 12.0,
            TextStyle::Range => 10.0,
            TextStyle::Month | TextStyle::Day => 11.0,
            TextStyle::TaskName => 16.0,
        }
    }

    pub fn color(self) -> HexColor {
        match self {
            TextStyle::Title | TextStyle::TaskName => INK,
            TextStyle::Subtitle | TextStyle::Month | TextStyle::Week | TextStyle::Section => INK_SOFT,
            TextStyle::Range | TextStyle::Day | TextStyle::TaskDate => INK_MUTED,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        fill: Paint,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: Paint,
    },
    Polygon {
        points: Vec<(f32, f32)>,
        fill: Paint,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Paint,
    },
    Text {
        x: f32,
        y: f32,
        style: TextStyle,
        anchor: TextAnchor,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub background: HexColor,
    pub shapes: Vec<Shape>,
}

/// Pixel metrics for one export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    pub timeline_width: f32,
    pub day_width: f32,
    pub rows_height: f32,
}

impl Canvas {
    pub fn new(layout: &TimelineLayout<'_>, timeline_width: f32) -> Self {
        let timeline_width = if timeline_width.is_finite() && timeline_width > 0.0 {
            timeline_width
        } else {
            crate::config::EXPORT_TIMELINE_WIDTH
        };
        let rows_height = layout.rows.iter().map(row_height).sum();
        Self {
            timeline_width,
            day_width: day_width(timeline_width, layout.day_count()).unwrap_or(FALLBACK_DAY_WIDTH),
            rows_height,
        }
    }

    pub fn width(&self) -> f32 {
        LEFT_WIDTH + self.timeline_width + RIGHT_MARGIN
    }

    pub fn height(&self) -> f32 {
        HEADER_HEIGHT + self.rows_height + FOOTER_HEIGHT
    }

    /// Canvas x of a timeline fraction.
    pub fn x(&self, fraction: f64) -> f32 {
        LEFT_WIDTH + fraction as f32 * self.timeline_width
    }

    /// Height of the full-height bands (off days, markers, grid).
    fn band_height(&self) -> f32 {
        self.height() - HEADER_HEIGHT - BOTTOM_MARGIN
    }
}

pub fn row_height(row: &LayoutRow<'_>) -> f32 {
    if row.is_section() {
        SECTION_HEIGHT
    } else {
        ROW_HEIGHT
    }
}

/// Build the export scene for `plan`. Exports always use day columns.
pub fn build_scene(plan: &Plan, ctx: &ExportContext) -> Scene {
    let layout = TimelineLayout::build(plan, ctx.today, ViewMode::Day);
    let canvas = Canvas::new(&layout, ctx.timeline_width);
    let mut shapes = Vec::new();

    title_block(plan, &layout, &mut shapes);
    bands(&layout, &canvas, &mut shapes);
    header_labels(&layout, &canvas, &mut shapes);
    for marker in &layout.markers {
        shapes.push(Shape::Circle {
            cx: canvas.x(layout.point_fraction(marker.day_index)),
            cy: HEADER_HEIGHT - 4.0,
            r: 3.0,
            fill: Paint::solid(marker.color),
        });
    }
    rows(&layout, &canvas, &mut shapes);

    Scene {
        width: canvas.width(),
        height: canvas.height(),
        background: BACKGROUND,
        shapes,
    }
}

fn text(x: f32, y: f32, style: TextStyle, anchor: TextAnchor, text: impl Into<String>) -> Shape {
    Shape::Text {
        x,
        y,
        style,
        anchor,
        text: text.into(),
    }
}

fn title_block(plan: &Plan, layout: &TimelineLayout<'_>, shapes: &mut Vec<Shape>) {
    shapes.push(text(24.0, 28.0, TextStyle::Title, TextAnchor::Start, plan.title.as_str()));
    if !plan.subtitle.trim().is_empty() {
        shapes.push(text(24.0, 50.0, TextStyle::Subtitle, TextAnchor::Start, plan.subtitle.trim()));
    }
    shapes.push(text(24.0, 66.0, TextStyle::Range, TextAnchor::Start, layout.range.label()));
}

fn bands(layout: &TimelineLayout<'_>, canvas: &Canvas, shapes: &mut Vec<Shape>) {
    let height = canvas.band_height();
    for &index in &layout.off_days {
        let cell = layout.day_band(index);
        shapes.push(Shape::Rect {
            x: canvas.x(cell.left),
            y: HEADER_HEIGHT,
            width: canvas.day_width,
            height,
            radius: 0.0,
            fill: OFF_DAY,
        });
    }
    for marker in &layout.markers {
        let cell = layout.day_band(marker.day_index);
        shapes.push(Shape::Rect {
            x: canvas.x(cell.left),
            y: HEADER_HEIGHT,
            width: canvas.day_width,
            height,
            radius: 0.0,
            fill: Paint::new(marker.color, MARKER_BAND_OPACITY),
        });
    }
    for index in 0..layout.day_count() {
        let x = canvas.x(layout.day_band(index).left);
        shapes.push(Shape::Line {
            from: (x, HEADER_HEIGHT),
            to: (x, HEADER_HEIGHT + height),
            stroke: GRID,
        });
    }
}

fn header_labels(layout: &TimelineLayout<'_>, canvas: &Canvas, shapes: &mut Vec<Shape>) {
    let center = |start: usize, span: usize| canvas.x(0.0) + (start as f32 + span as f32 / 2.0) * canvas.day_width;

    for month in &layout.headers.months {
        shapes.push(text(
            center(month.start, month.span),
            MONTH_HEIGHT - 8.0,
            TextStyle::Month,
            TextAnchor::Middle,
            month.label.as_str(),
        ));
    }
    for week in &layout.headers.weeks {
        shapes.push(text(
            center(week.start, week.span),
            MONTH_HEIGHT + WEEK_HEIGHT - 8.0,
            TextStyle::Week,
            TextAnchor::Middle,
            week.label.to_uppercase(),
        ));
    }
    for day in &layout.headers.days {
        shapes.push(text(
            center(day.start, 1),
            HEADER_HEIGHT - 10.0,
            TextStyle::Day,
            TextAnchor::Middle,
            day.label.as_str(),
        ));
    }
}

fn rows(layout: &TimelineLayout<'_>, canvas: &Canvas, shapes: &mut Vec<Shape>) {
    let mut y = HEADER_HEIGHT;
    for row in &layout.rows {
        match row {
            LayoutRow::Section { name, .. } => {
                shapes.push(Shape::Rect {
                    x: 0.0,
                    y,
                    width: canvas.width(),
                    height: SECTION_HEIGHT,
                    radius: 0.0,
                    fill: SECTION_BAND,
                });
                shapes.push(text(24.0, y + 18.0, TextStyle::Section, TextAnchor::Start, name.to_uppercase()));
            }
            LayoutRow::Task { task, placement } => {
                if let Some(placement) = placement {
                    shapes.push(text(24.0, y + 22.0, TextStyle::TaskName, TextAnchor::Start, task.name.as_str()));
                    shapes.push(text(
                        24.0,
                        y + 40.0,
                        TextStyle::TaskDate,
                        TextAnchor::Start,
                        format!("{} → {}", task.start, task.end),
                    ));
                    shapes.push(Shape::Rect {
                        x: canvas.x(placement.left),
                        y: y + 12.0,
                        width: placement.width as f32 * canvas.timeline_width,
                        height: ROW_HEIGHT - 24.0,
                        radius: BAR_RADIUS,
                        fill: Paint::solid(task.color),
                    });
                }
            }
            LayoutRow::Milestone { milestone, center } => {
                if let Some(center) = center {
                    shapes.push(text(24.0, y + 24.0, TextStyle::TaskName, TextAnchor::Start, milestone.name.as_str()));
                    shapes.push(milestone_shape(
                        milestone.symbol,
                        canvas.x(*center),
                        y + ROW_HEIGHT / 2.0,
                        Paint::solid(milestone.color),
                    ));
                }
            }
        }
        y += row_height(row);
    }
}

/// Symbol centred on `(cx, cy)`.
pub fn milestone_shape(symbol: MilestoneSymbol, cx: f32, cy: f32, fill: Paint) -> Shape {
    let r = MILESTONE_SIZE / 2.0;
    match symbol {
        MilestoneSymbol::Circle => Shape::Circle { cx, cy, r, fill },
        MilestoneSymbol::Square => Shape::Rect {
            x: cx - r,
            y: cy - r,
            width: MILESTONE_SIZE,
            height: MILESTONE_SIZE,
            radius: 0.0,
            fill,
        },
        MilestoneSymbol::Diamond
        | MilestoneSymbol::Triangle
        | MilestoneSymbol::Star
        | MilestoneSymbol::Hex
        | MilestoneSymbol::Flag => Shape::Polygon {
            points: symbol
                .outline(r)
                .into_iter()
                .map(|(dx, dy)| (cx + dx, cy + dy))
                .collect(),
            fill,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::parse_date;

    fn ctx() -> ExportContext {
        ExportContext {
            today: parse_date("2026-02-01").unwrap(),
            exported_at: chrono::Utc::now(),
            timeline_width: 1100.0,
        }
    }

    #[test]
    fn canvas_size_follows_rows() {
        let plan = Plan::sample();
        let scene = build_scene(&plan, &ctx());
        assert_eq!(scene.width, 1400.0);
        // 3 sections, 4 tasks, 1 milestone
        assert_eq!(scene.height, HEADER_HEIGHT + 3.0 * 28.0 + 5.0 * 56.0 + 90.0);
    }

    #[test]
    fn bars_use_the_shared_fractions() {
        let plan = Plan::sample();
        let scene = build_scene(&plan, &ctx());
        let layout = TimelineLayout::build(&plan, ctx().today, ViewMode::Day);
        let first = layout.mapper.bar_placement(&plan.tasks[0]).unwrap();
        let expected_x = LEFT_WIDTH + first.left as f32 * 1100.0;
        assert!(scene.shapes.iter().any(|shape| matches!(
            shape,
            Shape::Rect { x, radius, .. } if *radius == BAR_RADIUS && (*x - expected_x).abs() < 1e-3
        )));
    }

    #[test]
    fn week_labels_are_upper_case() {
        let scene = build_scene(&Plan::sample(), &ctx());
        assert!(scene.shapes.iter().any(|shape| matches!(
            shape,
            Shape::Text { style: TextStyle::Week, text, .. } if text == "WEEK 1"
        )));
    }
}
