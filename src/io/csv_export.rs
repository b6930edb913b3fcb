use crate::model::Plan;

use super::ExportError;

const CSV_HEADER: [&str; 7] = ["Type", "Section", "Name", "Start", "End", "Duration (days)", "Color"];
const TSV_HEADER: [&str; 4] = ["Task", "Start", "End", "Color"];

/// Comma-separated table of every section, task and milestone.
///
/// Each section contributes a `Section` row followed by its tasks and then
/// its milestones; items without a valid section come last under
/// `Unassigned`. Fields holding a comma, quote or line break are quoted
/// with inner quotes doubled. Rows are joined by `\n` with no terminator
/// after the last one.
pub fn build_csv(plan: &Plan) -> Result<String, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADER)?;

    for group in plan.sections_with_items() {
        let color = group.color.map(|c| c.to_string()).unwrap_or_default();
        wtr.write_record(["Section", group.name.as_str(), group.name.as_str(), "", "", "", color.as_str()])?;

        for task in &group.tasks {
            let duration = task
                .duration_days()
                .map(|days| days.to_string())
                .unwrap_or_default();
            wtr.write_record([
                "Task",
                group.name.as_str(),
                task.name.as_str(),
                task.start.as_str(),
                task.end.as_str(),
                duration.as_str(),
                task.color.to_string().as_str(),
            ])?;
        }

        for milestone in &group.milestones {
            wtr.write_record([
                "Milestone",
                group.name.as_str(),
                milestone.name.as_str(),
                milestone.date.as_str(),
                milestone.date.as_str(),
                "1",
                milestone.color.to_string().as_str(),
            ])?;
        }
    }

    let mut bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(String::from_utf8(bytes)?)
}

/// Tab-separated task list. Values are not quoted; tabs and line breaks
/// inside them are flattened to spaces.
pub fn build_tsv(plan: &Plan) -> String {
    let flatten = |text: &str| text.replace(['\t', '\r', '\n'], " ");
    let mut lines = vec![TSV_HEADER.join("\t")];
    for task in &plan.tasks {
        lines.push(
            [
                flatten(&task.name),
                flatten(&task.start),
                flatten(&task.end),
                task.color.to_string(),
            ]
            .join("\t"),
        );
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::calendar::parse_date;
    use crate::model::{NewTask, PALETTE};
    use pretty_assertions::assert_eq;

    fn plan_with(name: &str) -> Plan {
        let mut plan = Plan::new("p");
        plan.add_section("Build", PALETTE[1]);
        plan.add_task(NewTask {
            name: name.to_string(),
            start: parse_date("2026-02-05").unwrap(),
            end: parse_date("2026-02-08").unwrap(),
            description: String::new(),
            section_id: None,
        });
        plan
    }

    #[test]
    fn csv_rows_per_section() {
        let csv = build_csv(&plan_with("Core Build")).unwrap();
        assert_eq!(
            csv,
            "Type,Section,Name,Start,End,Duration (days),Color\n\
             Section,Build,Build,,,,#61c0bf\n\
             Task,Build,Core Build,2026-02-05,2026-02-08,4,#61c0bf"
        );
    }

    #[test]
    fn csv_quotes_commas_and_quotes() {
        let csv = build_csv(&plan_with(r#"Design, "final""#)).unwrap();
        assert!(csv.contains(r#","Design, ""final""","#), "{csv}");
    }

    #[test]
    fn csv_keeps_line_breaks_inside_the_last_field() {
        let csv = build_csv(&plan_with("two\nlines")).unwrap();
        assert!(csv.ends_with("#61c0bf"), "{csv:?}");
        assert!(csv.contains("\"two\nlines\""), "{csv:?}");
    }

    #[test]
    fn csv_lists_unassigned_last() {
        let mut plan = plan_with("a");
        let id = plan.tasks[0].id;
        plan.update_task(id, |t| t.section_id = None);
        let csv = build_csv(&plan).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[2], "Section,Unassigned,Unassigned,,,,");
        assert!(lines[3].starts_with("Task,Unassigned,a,"));
    }

    #[test]
    fn tsv_is_flat() {
        let tsv = build_tsv(&plan_with("with\ttab"));
        assert_eq!(
            tsv,
            "Task\tStart\tEnd\tColor\nwith tab\t2026-02-05\t2026-02-08\t#61c0bf"
        );
    }
}
