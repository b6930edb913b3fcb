//! Print-ready HTML. Every position is a percentage of the track width,
//! so the browser can scale the page to any paper size.

use std::fmt::Write;

use chrono::NaiveDate;

use super::escape_markup;
use crate::model::{LayoutRow, Placement, Plan, TimelineLayout, ViewMode};

const STYLE: &str = r#"* { box-sizing: border-box; }
body { margin: 32px; font-family: "Space Grotesk", Arial, sans-serif; color: #1c1a17; }
h1 { font-family: "Fraunces", Georgia, serif; margin: 0 0 16px; }
.subtitle { margin: -8px 0 12px; color: #5f5a55; font-size: 14px; }
.range { color: #7a736b; font-size: 12px; margin-bottom: 12px; }
.grid { border: 1px solid #e4dcd2; border-radius: 14px; overflow: hidden; width: 100%; }
.header { display: grid; grid-template-columns: 260px 1fr; background: #fff7ee; border-bottom: 1px solid #e4dcd2; }
.head-left { padding: 12px 16px; font-size: 12px; text-transform: uppercase; letter-spacing: 0.2em; color: #5f5a55; font-weight: 600; border-right: 1px solid #e4dcd2; }
.head-days, .head-weeks { display: grid; grid-template-columns: repeat(var(--days), minmax(0, 1fr)); }
.head-weeks { border-top: 1px solid #f0e7db; border-bottom: 1px solid #f0e7db; }
.day, .week { display: flex; align-items: center; justify-content: center; border-right: 1px solid #f0e7db; }
.day { font-size: 11px; color: #7a736b; }
.week { font-size: 12px; color: #5f5a55; text-transform: uppercase; letter-spacing: 0.18em; }
.day.major { color: #1c1a17; font-weight: 600; }
.row { display: grid; grid-template-columns: 260px 1fr; border-bottom: 1px solid #f0e7db; min-height: 56px; }
.row.section { min-height: 28px; background: rgba(255, 227, 198, 0.6); font-weight: 600; text-transform: uppercase; letter-spacing: 0.16em; font-size: 12px; color: #5f5a55; }
.label { display: flex; align-items: center; gap: 10px; padding: 10px 16px; border-right: 1px solid #f0e7db; background: #fffdf9; font-size: 16px; }
.label.section { padding: 6px 16px; background: transparent; }
.name { font-weight: 600; font-size: 16px; }
.dates { font-size: 12px; color: #7a736b; }
.dot { width: 10px; height: 10px; border-radius: 999px; }
.track { position: relative; background-image: linear-gradient(to right, rgba(0,0,0,0.06) 1px, transparent 1px); background-size: calc(100% / var(--days)) 100%; }
.off { position: absolute; top: 0; bottom: 0; background: rgba(255, 183, 77, 0.18); }
.marker { position: absolute; top: 0; bottom: 0; opacity: 0.12; }
.bar { position: absolute; top: 12px; height: 32px; border-radius: 11px; display: flex; align-items: center; padding: 0 12px; color: #fff; font-size: 13px; font-weight: 600; overflow: hidden; white-space: nowrap; }
.progress { position: absolute; left: 0; top: 0; bottom: 0; background: rgba(0, 0, 0, 0.18); }
.bar span { position: relative; }
.milestone-shape { width: 10px; height: 10px; display: inline-block; border-radius: 2px; }
.milestone { position: absolute; top: 50%; width: 16px; height: 16px; transform: translate(-50%, -50%) rotate(45deg); border-radius: 3px; }
.milestone-shape.diamond { transform: rotate(45deg); }
.milestone-shape.circle, .milestone.circle { border-radius: 50%; }
.milestone.circle, .milestone.square, .milestone.triangle, .milestone.star, .milestone.hex, .milestone.flag { transform: translate(-50%, -50%); }
.triangle { clip-path: polygon(50% 0%, 0% 100%, 100% 100%); border-radius: 0; }
.star { clip-path: polygon(50% 0%, 61% 35%, 98% 35%, 68% 57%, 79% 91%, 50% 70%, 21% 91%, 32% 57%, 2% 35%, 39% 35%); border-radius: 0; }
.hex { clip-path: polygon(25% 5%, 75% 5%, 100% 50%, 75% 95%, 25% 95%, 0% 50%); border-radius: 0; }
.flag { clip-path: polygon(0 0, 100% 0, 70% 50%, 100% 100%, 0 100%); border-radius: 0; }
@media print { body { margin: 12mm; } }
@page { size: landscape; }
"#;

fn percent(fraction: f64) -> String {
    format!("{}%", fraction * 100.0)
}

fn band_style(placement: Placement) -> String {
    format!("left:{};width:{}", percent(placement.left), percent(placement.width))
}

/// HTML document for printing the plan, in day columns.
pub fn build_print_html(plan: &Plan, today: NaiveDate) -> String {
    let layout = TimelineLayout::build(plan, today, ViewMode::Day);
    let title = escape_markup(&plan.title);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = write!(
        out,
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\" />\n<title>{title} · Gantt export</title>\n<style>\n{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n"
    );
    if !plan.subtitle.trim().is_empty() {
        let _ = writeln!(out, "<div class=\"subtitle\">{}</div>", escape_markup(plan.subtitle.trim()));
    }
    let _ = writeln!(out, "<div class=\"range\">{}</div>", escape_markup(&layout.range.label()));
    let _ = writeln!(out, "<div class=\"grid\" style=\"--days:{}\">", layout.day_count());

    write_header(&mut out, &layout);

    let backdrop = track_backdrop(&layout);
    for row in &layout.rows {
        write_row(&mut out, row, &backdrop);
    }

    out.push_str("</div>\n</body>\n</html>\n");
    out
}

fn write_header(out: &mut String, layout: &TimelineLayout<'_>) {
    out.push_str("<div class=\"header\">\n<div class=\"head-left\">Tasks</div>\n<div>\n<div class=\"head-days\">");
    for month in &layout.headers.months {
        let _ = write!(
            out,
            "<div class=\"day major\" style=\"grid-column: span {}\">{}</div>",
            month.span,
            escape_markup(&month.label)
        );
    }
    out.push_str("</div>\n<div class=\"head-weeks\">");
    for week in &layout.headers.weeks {
        let _ = write!(
            out,
            "<div class=\"week\" style=\"grid-column: span {}\">{}</div>",
            week.span,
            escape_markup(&week.label)
        );
    }
    out.push_str("</div>\n<div class=\"head-days\">");
    for day in &layout.headers.days {
        let class = if day.major { "day major" } else { "day" };
        let _ = write!(out, "<div class=\"{class}\"><span>{}</span></div>", day.label);
    }
    out.push_str("</div>\n</div>\n</div>\n");
}

/// Off-day and marker bands repeated in every track.
fn track_backdrop(layout: &TimelineLayout<'_>) -> String {
    let mut out = String::new();
    for &index in &layout.off_days {
        let _ = write!(out, "<div class=\"off\" style=\"{}\"></div>", band_style(layout.day_band(index)));
    }
    for marker in &layout.markers {
        let _ = write!(
            out,
            "<div class=\"marker\" style=\"{};background:{}\" title=\"{}\"></div>",
            band_style(layout.day_band(marker.day_index)),
            marker.color,
            escape_markup(&marker.label)
        );
    }
    out
}

fn write_row(out: &mut String, row: &LayoutRow<'_>, backdrop: &str) {
    match row {
        LayoutRow::Section { name, .. } => {
            let _ = writeln!(
                out,
                "<div class=\"row section\"><div class=\"label section\">{}</div><div class=\"track\">{backdrop}</div></div>",
                escape_markup(name)
            );
        }
        LayoutRow::Task { task, placement } => {
            let Some(placement) = placement else {
                return;
            };
            let name = escape_markup(&task.name);
            let progress = task.progress_fraction();
            let progress_fill = if progress > 0.0 {
                format!("<div class=\"progress\" style=\"width:{}\"></div>", percent(f64::from(progress)))
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "<div class=\"row\"><div class=\"label\"><span class=\"dot\" style=\"background:{color}\"></span><div><div class=\"name\">{name}</div><div class=\"dates\">{} → {}</div></div></div><div class=\"track\">{backdrop}<div class=\"bar\" style=\"{};background:{color}\">{progress_fill}<span>{name}</span></div></div></div>",
                escape_markup(&task.start),
                escape_markup(&task.end),
                band_style(*placement),
                color = task.color,
            );
        }
        LayoutRow::Milestone { milestone, center } => {
            let Some(center) = center else {
                return;
            };
            let class = milestone.symbol.css_class();
            let _ = writeln!(
                out,
                "<div class=\"row\"><div class=\"label\"><span class=\"milestone-shape {class}\" style=\"background:{color}\"></span><div class=\"name\">{}</div></div><div class=\"track\">{backdrop}<div class=\"milestone {class}\" style=\"left:{};background:{color}\"></div></div></div>",
                escape_markup(&milestone.name),
                percent(*center),
                color = milestone.color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::parse_date;
    use crate::model::geometry::GeometryMapper;

    #[test]
    fn bars_are_placed_by_percentage() {
        let plan = Plan::sample();
        let today = parse_date("2026-02-01").unwrap();
        let html = build_print_html(&plan, today);
        let range = plan.timeline(today);
        let mapper = GeometryMapper::from_range(&range);
        let placement = mapper.bar_placement(&plan.tasks[0]).unwrap();
        let expected = band_style(placement);
        assert!(html.contains(&expected), "missing {expected}");
        assert!(html.contains(&format!("--days:{}", range.len())));
    }

    #[test]
    fn headers_and_escaping() {
        let mut plan = Plan::sample();
        plan.tasks[0].name = "<b>bold</b>".to_string();
        let html = build_print_html(&plan, parse_date("2026-02-01").unwrap());
        assert!(html.contains(">Week 1</div>"));
        assert!(html.contains(">Feb 2026</div>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains("<b>bold"));
    }
}
