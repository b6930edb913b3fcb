use std::time::{Duration, Instant};

use chrono::{NaiveDate, Weekday};
use planit::io::{self, csv_export, html_export, ExportContext, ExportFormat};
use planit::model::calendar::{add_days, parse_date};
use planit::model::{
    DragController, DragMode, LabelThinning, LayoutRow, NewMilestone, NewTask, MilestoneSymbol, Plan, TimelineLayout,
    ViewMode, PALETTE,
};
use pretty_assertions::assert_eq;

fn d(text: &str) -> NaiveDate {
    parse_date(text).unwrap()
}

fn sample(padding_days: i64) -> Plan {
    let mut plan = Plan::sample();
    plan.padding_days = padding_days;
    plan
}

fn context(today: NaiveDate) -> ExportContext {
    ExportContext {
        today,
        ..ExportContext::now(1200.0)
    }
}

#[test]
fn range_covers_every_item_plus_padding() {
    let plan = sample(3);
    let range = plan.timeline(d("2026-01-01"));
    assert_eq!(range.start, d("2026-02-02"));
    assert_eq!(range.end, d("2026-02-27"));
    assert_eq!(range.len(), 26);
    assert_eq!(range.days.first(), Some(&range.start));
}

#[test]
fn empty_plan_shows_two_weeks_from_today() {
    let mut plan = Plan::new("Empty");
    plan.padding_days = 2;
    let today = d("2026-03-10");
    let range = plan.timeline(today);
    assert_eq!(range.start, d("2026-03-08"));
    assert_eq!(range.end, add_days(today, 13 + 2));
}

#[test]
fn milestones_widen_the_range() {
    let mut plan = sample(0);
    plan.add_milestone(NewMilestone {
        name: "Defense".into(),
        date: d("2026-03-02"),
        section_id: None,
        symbol: MilestoneSymbol::Star,
    });
    assert_eq!(plan.timeline(d("2026-01-01")).end, d("2026-03-02"));
}

#[test]
fn print_html_uses_the_layout_geometry() {
    let plan = sample(2);
    let today = d("2026-02-01");
    let html = html_export::build_print_html(&plan, today);
    let layout = TimelineLayout::build(&plan, today, ViewMode::Day);

    let mut bars = 0;
    for row in &layout.rows {
        if let LayoutRow::Task { task, placement } = row {
            let placement = placement.expect("sample tasks are dated");
            assert_eq!(Some(placement), layout.mapper.bar_placement(task));
            let style = format!("left:{}%;width:{}%", placement.left * 100.0, placement.width * 100.0);
            assert!(html.contains(&style), "missing bar style {style}");
            bars += 1;
        }
    }
    assert_eq!(bars, plan.tasks.len());
}

#[test]
fn dragging_a_bar_moves_both_dates() {
    let mut plan = sample(0);
    let today = d("2026-02-01");
    let id = plan.tasks[0].id;
    let (mapper, span, day_count) = {
        let layout = TimelineLayout::build(&plan, today, ViewMode::Day);
        let span = layout.mapper.task_span(plan.task(id).unwrap()).unwrap();
        (layout.mapper, span, layout.day_count())
    };
    let width = day_count as f32 * 10.0;

    let mut drag = DragController::new();
    drag.pointer_down(id, DragMode::Move, span, mapper, 0, 100.0);
    // a different pointer is ignored
    assert_eq!(drag.pointer_move(1, 160.0, width, day_count), None);
    let update = drag.pointer_move(0, 121.0, width, day_count).expect("two days right");
    assert!(plan.apply_drag(update));

    let task = plan.task(id).unwrap();
    assert_eq!((task.start.as_str(), task.end.as_str()), ("2026-02-07", "2026-02-10"));

    let released = Instant::now();
    assert_eq!(drag.pointer_up(0, released), Some(id));
    assert!(!drag.is_dragging());
    assert!(drag.suppresses_click(id, released + Duration::from_millis(50)));
    assert!(!drag.suppresses_click(id, released + Duration::from_secs(1)));
}

#[test]
fn dragging_the_earliest_task_left_follows_the_pointer() {
    let mut plan = sample(3);
    let today = d("2026-02-01");
    let id = plan.tasks[0].id;
    let mut drag = DragController::new();
    let per_day = 28.0;

    let (mapper, span) = {
        let layout = TimelineLayout::build(&plan, today, ViewMode::Day);
        (layout.mapper, layout.mapper.task_span(plan.task(id).unwrap()).unwrap())
    };
    drag.pointer_down(id, DragMode::Move, span, mapper, 0, 500.0);

    let expected = ["2026-02-04", "2026-02-03", "2026-02-02", "2026-02-02"];
    for (days, expected_start) in (1..=4).zip(expected) {
        // every frame lays the plan out again, so the live range follows the task
        let layout = TimelineLayout::build(&plan, today, ViewMode::Day);
        let day_count = layout.day_count();
        drop(layout);
        let x = 500.0 - days as f32 * per_day;
        let update = drag
            .pointer_move(0, x, day_count as f32 * per_day, day_count)
            .expect("pointer crossed a day");
        plan.apply_drag(update);
        let task = plan.task(id).unwrap();
        assert_eq!(task.start, expected_start, "after {days} days");
        assert_eq!(task.duration_days(), Some(4));
    }
}

#[test]
fn resizing_never_inverts_a_task() {
    let mut plan = sample(0);
    let id = plan.tasks[0].id;
    let layout = TimelineLayout::build(&plan, d("2026-02-01"), ViewMode::Day);
    let mapper = layout.mapper;
    let span = mapper.task_span(plan.task(id).unwrap()).unwrap();
    let day_count = layout.day_count();
    drop(layout);

    let mut drag = DragController::new();
    drag.pointer_down(id, DragMode::ResizeLeft, span, mapper, 0, 0.0);
    let update = drag
        .pointer_move(0, 400.0, day_count as f32 * 10.0, day_count)
        .expect("pointer moved");
    plan.apply_drag(update);
    let task = plan.task(id).unwrap();
    assert_eq!(task.start, task.end);
    assert_eq!(task.end, "2026-02-08");
}

#[test]
fn a_click_without_movement_is_not_suppressed() {
    let plan = sample(0);
    let id = plan.tasks[1].id;
    let layout = TimelineLayout::build(&plan, d("2026-02-01"), ViewMode::Day);
    let span = layout.mapper.task_span(plan.task(id).unwrap()).unwrap();

    let mut drag = DragController::new();
    drag.pointer_down(id, DragMode::Move, span, layout.mapper, 0, 50.0);
    assert_eq!(drag.pointer_move(0, 52.0, 200.0, layout.day_count()), None);
    let released = Instant::now();
    assert_eq!(drag.pointer_up(0, released), None);
    assert!(!drag.suppresses_click(id, released));
}

#[test]
fn csv_quotes_fields_with_separators() {
    let mut plan = Plan::new("Quotes");
    plan.add_section("Phase 1, early", PALETTE[2]);
    plan.add_task(NewTask {
        name: "Draft \"v2\"".into(),
        start: d("2026-04-01"),
        end: d("2026-04-03"),
        description: String::new(),
        section_id: None,
    });
    let csv = csv_export::build_csv(&plan).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Type,Section,Name,Start,End,Duration (days),Color");
    assert_eq!(
        lines[1],
        format!("Section,\"Phase 1, early\",\"Phase 1, early\",,,,{}", PALETTE[2])
    );
    assert_eq!(
        lines[2],
        format!(
            "Task,\"Phase 1, early\",\"Draft \"\"v2\"\"\",2026-04-01,2026-04-03,3,{}",
            PALETTE[2]
        )
    );
}

#[test]
fn plans_without_tasks_export_nothing() {
    let mut plan = Plan::new("Only milestones");
    plan.add_milestone(NewMilestone {
        name: "Kickoff".into(),
        date: d("2026-05-01"),
        section_id: None,
        symbol: MilestoneSymbol::Flag,
    });
    let ctx = context(d("2026-05-01"));
    for format in ExportFormat::ALL {
        assert!(io::export(&plan, format, &ctx).unwrap().is_none(), "{format:?}");
    }
}

#[test]
fn every_format_names_its_file_after_the_title() {
    let plan = sample(1);
    let ctx = context(d("2026-02-01"));
    for format in ExportFormat::ALL {
        let artifact = io::export(&plan, format, &ctx).unwrap().unwrap();
        assert_eq!(artifact.file_name, format!("planit.{}", format.extension()));
        assert!(!artifact.bytes.is_empty());
    }
}

#[test]
fn header_labels_thin_out_when_days_get_narrow() {
    let wide = LabelThinning::for_day_width(28.0);
    assert_eq!(wide.day_step, 1);
    assert_eq!(wide.week_label(2), "Week 2");

    let narrow = LabelThinning::for_day_width(8.0);
    assert_eq!(narrow.day_step, 4);
    assert!(narrow.shows_day_label(8));
    assert!(!narrow.shows_day_label(9));
    assert_eq!(narrow.week_label(2), "2");
}

#[test]
fn off_weekdays_and_markers_land_on_their_days() {
    let mut plan = sample(0);
    plan.off_days.clear();
    plan.toggle_off_weekday(Weekday::Sat);
    plan.add_marker("Submission", "2026-02-20", PALETTE[3]).unwrap();
    plan.add_marker("Too late", "2026-06-01", PALETTE[3]).unwrap();

    let layout = TimelineLayout::build(&plan, d("2026-02-01"), ViewMode::Day);
    // range starts Thu 2026-02-05
    assert_eq!(layout.off_days, vec![2, 9, 16]);
    assert_eq!(layout.markers.len(), 1);
    assert_eq!(layout.markers[0].label, "Submission");
    assert_eq!(layout.markers[0].day_index, 15);
}

#[test]
fn month_view_centres_milestones_in_their_column() {
    let mut plan = Plan::new("Months");
    plan.padding_days = 0;
    plan.add_task(NewTask {
        name: "Long haul".into(),
        start: d("2026-01-20"),
        end: d("2026-03-10"),
        description: String::new(),
        section_id: None,
    });
    let id = plan.add_milestone(NewMilestone {
        name: "Checkpoint".into(),
        date: d("2026-02-03"),
        section_id: None,
        symbol: MilestoneSymbol::Diamond,
    });
    let layout = TimelineLayout::build(&plan, d("2026-01-01"), ViewMode::Month);
    assert_eq!(layout.segments.len(), 3);
    assert_eq!(layout.milestone_center(plan.milestone(id).unwrap()), Some(1.5 / 3.0));
}
