use egui::style::WidgetVisuals;
use egui::{Color32, FontId, Rounding, Stroke, Visuals};

use crate::model::HexColor;

// ── Palette ──────────────────────────────────────────────────────────────────
// Warm charcoal tones so the plan's pastel section colors stay readable.

pub const BG_DARK: Color32 = Color32::from_rgb(27, 25, 23);
pub const BG_PANEL: Color32 = Color32::from_rgb(35, 32, 29);
pub const BG_HEADER: Color32 = Color32::from_rgb(43, 39, 35);
pub const BG_FIELD: Color32 = Color32::from_rgb(22, 20, 18);
pub const BG_SELECTED: Color32 = Color32::from_rgba_premultiplied(36, 74, 73, 60);
pub const BG_SECTION: Color32 = Color32::from_rgb(49, 42, 34);

pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(61, 56, 50);
pub const BORDER_ACCENT: Color32 = Color32::from_rgb(97, 192, 191);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 233, 224);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(176, 166, 154);
pub const TEXT_DIM: Color32 = Color32::from_rgb(122, 115, 107);
pub const TEXT_ON_BAR: Color32 = Color32::from_rgb(28, 26, 23);

pub const ACCENT: Color32 = Color32::from_rgb(61, 150, 149);
pub const DANGER: Color32 = Color32::from_rgb(247, 136, 131);
pub const TODAY_LINE: Color32 = Color32::from_rgb(244, 183, 64);
pub const GRID_LINE: Color32 = Color32::from_rgb(50, 46, 41);
pub const HANDLE_COLOR: Color32 = Color32::from_rgb(255, 253, 249);

pub const PROGRESS_OVERLAY: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 46);
/// Amber wash over off days.
pub const OFF_DAY: Color32 = Color32::from_rgba_premultiplied(46, 33, 14, 46);
pub const MARKER_BAND_ALPHA: u8 = 30;

// ── Sizes ────────────────────────────────────────────────────────────────────

pub const MONTH_TRACK_HEIGHT: f32 = 18.0;
pub const WEEK_TRACK_HEIGHT: f32 = 16.0;
pub const DAY_TRACK_HEIGHT: f32 = 20.0;
pub const HEADER_HEIGHT: f32 = MONTH_TRACK_HEIGHT + WEEK_TRACK_HEIGHT + DAY_TRACK_HEIGHT;
pub const SECTION_ROW_HEIGHT: f32 = 28.0;
/// Pixels per day at 100 % zoom.
pub const BASE_DAY_WIDTH: f32 = 28.0;
pub const HANDLE_WIDTH: f32 = 7.0;
pub const BAR_ROUNDING: f32 = 5.0;
pub const BAR_INSET: f32 = 12.0; // vertical inset so bars don't touch row edges
pub const MILESTONE_RADIUS: f32 = 8.0;

pub const SIDE_PANEL_WIDTH: f32 = 330.0;
pub const STATUS_BAR_HEIGHT: f32 = 24.0;
pub const DIALOG_WIDTH: f32 = 320.0;

// ── Fonts ────────────────────────────────────────────────────────────────────

pub fn font_menu() -> FontId {
    FontId::proportional(13.0)
}

/// Month labels and section names on the chart.
pub fn font_header() -> FontId {
    FontId::proportional(11.5)
}

pub fn font_sub() -> FontId {
    FontId::proportional(10.0)
}

pub fn font_bar() -> FontId {
    FontId::proportional(12.0)
}

pub fn font_small() -> FontId {
    FontId::proportional(9.0)
}

// ── Plan colors ──────────────────────────────────────────────────────────────

pub fn color32(color: HexColor) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

/// `color` at the given alpha, for translucent bands.
pub fn tint(color: HexColor, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, alpha)
}

fn widget(state: &mut WidgetVisuals, fill: Color32, border: Color32, text: Stroke) {
    state.bg_fill = fill;
    state.weak_bg_fill = fill;
    state.bg_stroke = Stroke::new(1.0, border);
    state.fg_stroke = text;
    state.rounding = Rounding::same(5.0);
}

pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = Visuals::dark();
    visuals.override_text_color = Some(TEXT_PRIMARY);
    visuals.panel_fill = BG_PANEL;
    visuals.window_fill = BG_HEADER;
    visuals.faint_bg_color = BG_PANEL;
    visuals.extreme_bg_color = BG_FIELD;
    visuals.window_rounding = Rounding::same(10.0);
    visuals.window_stroke = Stroke::new(1.0, BORDER_SUBTLE);
    visuals.selection.bg_fill = BG_SELECTED;
    visuals.selection.stroke = Stroke::new(1.0, BORDER_ACCENT);

    let widgets = &mut visuals.widgets;
    widget(&mut widgets.noninteractive, BG_PANEL, BORDER_SUBTLE, Stroke::new(1.0, TEXT_SECONDARY));
    widget(&mut widgets.inactive, BG_SECTION, BORDER_SUBTLE, Stroke::new(1.0, TEXT_PRIMARY));
    widget(&mut widgets.hovered, Color32::from_rgb(60, 53, 45), BORDER_ACCENT, Stroke::new(1.0, TEXT_PRIMARY));
    widget(&mut widgets.active, ACCENT, BORDER_ACCENT, Stroke::new(1.5, HANDLE_COLOR));
    widget(&mut widgets.open, BG_HEADER, BORDER_ACCENT, Stroke::new(1.0, TEXT_PRIMARY));
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(6.0, 5.0);
        style.spacing.button_padding = egui::vec2(9.0, 3.0);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_colors_convert() {
        let color = HexColor::rgb(0x61, 0xc0, 0xbf);
        assert_eq!(color32(color), Color32::from_rgb(0x61, 0xc0, 0xbf));
        assert_eq!(tint(color, 255), color32(color));
    }
}
