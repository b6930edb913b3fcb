use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::model::{Marker, Milestone, Plan, Task};

use super::ExportError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot<'a> {
    project: &'a str,
    exported_at: String,
    tasks: &'a [Task],
    milestones: &'a [Milestone],
    markers: &'a [Marker],
}

/// Pretty-printed snapshot of the plan's dated records.
pub fn build_json(plan: &Plan, exported_at: DateTime<Utc>) -> Result<String, ExportError> {
    let snapshot = Snapshot {
        project: &plan.title,
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        tasks: &plan.tasks,
        milestones: &plan.milestones,
        markers: &plan.markers,
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn snapshot_fields() {
        let plan = Plan::sample();
        let at = Utc.with_ymd_and_hms(2026, 2, 1, 9, 30, 0).unwrap();
        let json = build_json(&plan, at).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["project"], "PlanIt");
        assert_eq!(value["exportedAt"], "2026-02-01T09:30:00.000Z");
        assert_eq!(value["tasks"].as_array().unwrap().len(), 4);
        assert_eq!(value["tasks"][0]["start"], "2026-02-05");
        assert_eq!(value["milestones"][0]["symbol"], "diamond");
        assert!(value["markers"].as_array().unwrap().is_empty());
    }
}
