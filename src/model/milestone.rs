use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::calendar::{format_date, parse_date};
use super::color::{HexColor, PALETTE};
use super::task::clean_name;

pub const UNTITLED_MILESTONE: &str = "Untitled milestone";

/// Shape drawn for a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneSymbol {
    #[default]
    Diamond,
    Circle,
    Square,
    Triangle,
    Star,
    Hex,
    Flag,
}

impl MilestoneSymbol {
    pub const ALL: [MilestoneSymbol; 7] = [
        MilestoneSymbol::Diamond,
        MilestoneSymbol::Circle,
        MilestoneSymbol::Square,
        MilestoneSymbol::Triangle,
        MilestoneSymbol::Star,
        MilestoneSymbol::Hex,
        MilestoneSymbol::Flag,
    ];

    /// CSS class used by the print export.
    pub fn css_class(self) -> &'static str {
        match self {
            MilestoneSymbol::Diamond => "diamond",
            MilestoneSymbol::Circle => "circle",
            MilestoneSymbol::Square => "square",
            MilestoneSymbol::Triangle => "triangle",
            MilestoneSymbol::Star => "star",
            MilestoneSymbol::Hex => "hex",
            MilestoneSymbol::Flag => "flag",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MilestoneSymbol::Diamond => "Diamond",
            MilestoneSymbol::Circle => "Circle",
            MilestoneSymbol::Square => "Square",
            MilestoneSymbol::Triangle => "Triangle",
            MilestoneSymbol::Star => "Star",
            MilestoneSymbol::Hex => "Hexagon",
            MilestoneSymbol::Flag => "Flag",
        }
    }

    /// Outline as offsets from the centre for a symbol of half-size `r`.
    /// Circles are approximated; renderers that can draw a true circle
    /// should do so instead.
    pub fn outline(self, r: f32) -> Vec<(f32, f32)> {
        match self {
            MilestoneSymbol::Diamond => {
                // a square of side 2r turned 45 degrees
                let h = r * std::f32::consts::SQRT_2;
                vec![(0.0, -h), (h, 0.0), (0.0, h), (-h, 0.0)]
            }
            MilestoneSymbol::Square => vec![(-r, -r), (r, -r), (r, r), (-r, r)],
            MilestoneSymbol::Triangle => vec![(0.0, -r), (r, r), (-r, r)],
            MilestoneSymbol::Star => vec![
                (0.0, -r),
                (0.22 * r, -0.22 * r),
                (r, -0.2 * r),
                (0.35 * r, 0.12 * r),
                (0.6 * r, r),
                (0.0, 0.5 * r),
                (-0.6 * r, r),
                (-0.35 * r, 0.12 * r),
                (-r, -0.2 * r),
                (-0.22 * r, -0.22 * r),
            ],
            MilestoneSymbol::Hex => vec![
                (0.5 * r, -r),
                (r, 0.0),
                (0.5 * r, r),
                (-0.5 * r, r),
                (-r, 0.0),
                (-0.5 * r, -r),
            ],
            MilestoneSymbol::Flag => vec![(-r, -r), (r, -r), (0.4 * r, 0.0), (r, r), (-r, r)],
            MilestoneSymbol::Circle => (0..16)
                .map(|i| {
                    let a = i as f32 / 16.0 * std::f32::consts::TAU;
                    (r * a.cos(), r * a.sin())
                })
                .collect(),
        }
    }
}

/// A single-day checkpoint drawn in its section's rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: Uuid,
    pub name: String,
    pub date: String,
    pub color: HexColor,
    #[serde(default)]
    pub section_id: Option<Uuid>,
    #[serde(default)]
    pub symbol: MilestoneSymbol,
}

impl Milestone {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: clean_name(name.into(), UNTITLED_MILESTONE),
            date: format_date(date),
            color: PALETTE[0],
            section_id: None,
            symbol: MilestoneSymbol::Diamond,
        }
    }

    pub fn day(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn normalize(&mut self) {
        self.name = clean_name(std::mem::take(&mut self.name), UNTITLED_MILESTONE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_names_get_a_placeholder() {
        let day = parse_date("2026-02-14").unwrap();
        let mut milestone = Milestone::new("   ", day);
        assert_eq!(milestone.name, UNTITLED_MILESTONE);
        milestone.name = " Defense ".to_string();
        milestone.normalize();
        assert_eq!(milestone.name, "Defense");
    }

    #[test]
    fn unparseable_dates_have_no_day() {
        let mut milestone = Milestone::new("Review", parse_date("2026-02-14").unwrap());
        milestone.date = "soon".to_string();
        assert_eq!(milestone.day(), None);
    }

    #[test]
    fn star_has_ten_points() {
        assert_eq!(MilestoneSymbol::Star.outline(8.0).len(), 10);
        assert_eq!(MilestoneSymbol::Flag.outline(8.0).len(), 5);
    }
}
