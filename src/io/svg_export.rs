use std::fmt::Write;

use super::canvas::{build_scene, Paint, Scene, Shape, TextAnchor};
use super::{escape_markup, ExportContext};
use crate::model::Plan;

const STYLE: &str = r#"  <style>
    text { font-family: "Space Grotesk", Arial, sans-serif; }
    .title { font-family: "Fraunces", Georgia, serif; font-size: 20px; fill: #1c1a17; }
    .subtitle { font-size: 12px; fill: #5f5a55; }
    .range { font-size: 10px; fill: #7a736b; }
    .month { font-size: 11px; fill: #5f5a55; }
    .week { font-size: 12px; fill: #5f5a55; letter-spacing: 1.6px; }
    .day { font-size: 11px; fill: #7a736b; }
    .section { font-size: 12px; fill: #5f5a55; letter-spacing: 1.6px; }
    .task-name { font-size: 16px; fill: #1c1a17; font-weight: 600; }
    .task-date { font-size: 12px; fill: #7a736b; }
  </style>
"#;

/// Self-contained SVG document of the plan.
pub fn build_svg(plan: &Plan, ctx: &ExportContext) -> String {
    render_svg(&build_scene(plan, ctx))
}

pub fn render_svg(scene: &Scene) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        scene.width, scene.height, scene.width, scene.height
    );
    out.push_str(STYLE);
    let _ = writeln!(
        out,
        r#"  <rect width="100%" height="100%" fill="{}" />"#,
        scene.background
    );
    for shape in &scene.shapes {
        write_shape(&mut out, shape);
    }
    out.push_str("</svg>\n");
    out
}

fn fill_attrs(paint: &Paint, attr: &str) -> String {
    if paint.opacity < 1.0 {
        format!(r#"{attr}="{}" {attr}-opacity="{}""#, paint.color, paint.opacity)
    } else {
        format!(r#"{attr}="{}""#, paint.color)
    }
}

// Writing into a String cannot fail.
fn write_shape(out: &mut String, shape: &Shape) {
    let _ = match shape {
        Shape::Rect {
            x,
            y,
            width,
            height,
            radius,
            fill,
        } => {
            let rx = if *radius > 0.0 {
                format!(r#" rx="{radius}""#)
            } else {
                String::new()
            };
            writeln!(
                out,
                r#"  <rect x="{x}" y="{y}" width="{width}" height="{height}"{rx} {} />"#,
                fill_attrs(fill, "fill")
            )
        }
        Shape::Circle { cx, cy, r, fill } => writeln!(
            out,
            r#"  <circle cx="{cx}" cy="{cy}" r="{r}" {} />"#,
            fill_attrs(fill, "fill")
        ),
        Shape::Polygon { points, fill } => {
            let points: Vec<String> = points.iter().map(|(x, y)| format!("{x},{y}")).collect();
            writeln!(
                out,
                r#"  <polygon points="{}" {} />"#,
                points.join(" "),
                fill_attrs(fill, "fill")
            )
        }
        Shape::Line { from, to, stroke } => writeln!(
            out,
            r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" {} />"#,
            from.0,
            from.1,
            to.0,
            to.1,
            fill_attrs(stroke, "stroke")
        ),
        Shape::Text {
            x,
            y,
            style,
            anchor,
            text,
        } => {
            let anchor = match anchor {
                TextAnchor::Start => "",
                TextAnchor::Middle => r#" text-anchor="middle""#,
            };
            writeln!(
                out,
                r#"  <text x="{x}" y="{y}" class="{}"{anchor}>{}</text>"#,
                style.class(),
                escape_markup(text)
            )
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::parse_date;
    use crate::model::{MilestoneSymbol, NewMilestone};

    fn ctx() -> ExportContext {
        ExportContext {
            today: parse_date("2026-02-01").unwrap(),
            exported_at: chrono::Utc::now(),
            timeline_width: 1100.0,
        }
    }

    #[test]
    fn document_has_size_and_background() {
        let svg = build_svg(&Plan::sample(), &ctx());
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="1400""#));
        assert!(svg.contains(r##"fill="#fffdf9""##));
        assert!(svg.contains(">WEEK 1</text>"));
        assert!(svg.contains(">RESEARCH</text>"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn text_is_escaped() {
        let mut plan = Plan::sample();
        plan.title = "R&D <plan>".to_string();
        let svg = build_svg(&plan, &ctx());
        assert!(svg.contains("R&amp;D &lt;plan&gt;"));
        assert!(!svg.contains("<plan>"));
    }

    #[test]
    fn milestone_symbols_pick_elements() {
        let mut plan = Plan::sample();
        plan.add_milestone(NewMilestone {
            name: "Defense".into(),
            date: parse_date("2026-02-20").unwrap(),
            section_id: None,
            symbol: MilestoneSymbol::Circle,
        });
        let svg = build_svg(&plan, &ctx());
        assert!(svg.contains(r#"r="5""#));
        assert!(svg.contains("<polygon points="));
    }
}
