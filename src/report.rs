use std::fmt::Write;

use comfy_table::{presets, Table};

use crate::charts::{RadarChart, RadarVariable, ViolinChart, ViolinVariable};
use crate::dataset::Record;
use crate::metrics::{MetricOutcome, Satisfaction};
use crate::session::DashboardSession;

pub fn percent_text(outcome: &MetricOutcome<f64>) -> String {
    match outcome {
        MetricOutcome::Ready(percent) => format!("{percent:.2}%"),
        MetricOutcome::NoData => "N/A".to_string(),
        MetricOutcome::FieldMissing(column) => missing_field_text(column),
    }
}

pub fn satisfaction_text(outcome: &MetricOutcome<Satisfaction>) -> String {
    match outcome {
        MetricOutcome::Ready(satisfaction) => format!(
            "{} (Average: {:.2})",
            satisfaction.label, satisfaction.mean
        ),
        MetricOutcome::NoData => "No data available".to_string(),
        MetricOutcome::FieldMissing(column) => missing_field_text(column),
    }
}

fn missing_field_text(column: &str) -> String {
    format!("Field '{column}' not found in the dataset")
}

pub fn render_summary(session: &mut DashboardSession) -> String {
    let count = session.depressed_count();
    let percent = session.depressed_percent();
    let satisfaction = session.avg_satisfaction();

    let mut output = String::new();
    let _ = writeln!(output, "Count of Individuals with Depression: {count}");
    let _ = writeln!(
        output,
        "Percent of Depressed Individuals: {}",
        percent_text(&percent)
    );
    let _ = writeln!(
        output,
        "Average Job Satisfaction: {}",
        satisfaction_text(&satisfaction)
    );
    output
}

pub fn render_table(session: &mut DashboardSession) -> String {
    let has_satisfaction = session.dataset().has_job_satisfaction();
    let rows = session.filtered_rows();
    table_for(&rows, has_satisfaction, presets::UTF8_FULL).to_string()
}

fn table_for(rows: &[&Record], has_satisfaction: bool, preset: &str) -> Table {
    let mut table = Table::new();
    table.load_preset(preset);
    table.set_header(vec![
        "Age",
        "Gender",
        "Depression",
        "Family History of Mental Illness",
        "Have you ever had suicidal thoughts ?",
        "Job Satisfaction",
        "Work Pressure",
        "Financial Stress",
        "Dietary Habits",
        "Sleep Duration",
        "Work Hours",
    ]);

    for record in rows {
        let age = record
            .age
            .map_or_else(|| "-".to_string(), |age| age.to_string());
        let satisfaction = if has_satisfaction {
            record
                .job_satisfaction
                .map_or_else(|| "-".to_string(), |value| value.to_string())
        } else {
            "-".to_string()
        };
        table.add_row(vec![
            age,
            record.gender.to_string(),
            record.depression.to_string(),
            record.family_history.to_string(),
            record.suicidal_thoughts.to_string(),
            satisfaction,
            format!("{:.1}", record.work_pressure),
            format!("{:.1}", record.financial_stress),
            record.dietary_habits.to_string(),
            format!("{:.1}", record.sleep_duration),
            format!("{:.1}", record.work_hours),
        ]);
    }
    table
}

pub fn render_radar(chart: &RadarChart) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Radar over '{}' (radial scale 0 to {:.2})",
        chart.variable, chart.radial_max
    );
    for (name, series) in [("Yes", &chart.yes), ("No", &chart.no)] {
        if series.is_empty() {
            let _ = writeln!(
                output,
                "- {}: {}: no rows in this group",
                chart.variable, name
            );
            continue;
        }
        let axes = series
            .iter()
            .map(|point| format!("{} {:.2}", point.axis, point.value))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(output, "- {}: {}: {}", chart.variable, name, axes);
    }
    output
}

pub fn render_violin(chart: &ViolinChart) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Distribution of '{}' by Depression", chart.variable);
    for group in &chart.groups {
        if group.points.is_empty() {
            let _ = writeln!(
                output,
                "- Depression {}: no rows in this group",
                group.depression
            );
            continue;
        }

        let counts = group.dietary_counts();
        if counts.is_empty() {
            if let Some(summary) = group.numeric_summary() {
                let _ = writeln!(
                    output,
                    "- Depression {}: {} rows, min {:.1}, median {:.1}, max {:.1}",
                    group.depression,
                    group.points.len(),
                    summary.min,
                    summary.median,
                    summary.max
                );
            }
        } else {
            let breakdown = counts
                .iter()
                .map(|(habit, count)| format!("{habit} {count}"))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                output,
                "- Depression {}: {} rows ({breakdown})",
                group.depression,
                group.points.len()
            );
        }

        let points = group
            .points
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(output, "  points: {points}");
    }
    output
}

pub fn render_dashboard(
    session: &mut DashboardSession,
    radar_variable: RadarVariable,
    violin_variable: ViolinVariable,
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", render_filters(session));
    let _ = writeln!(output, "{}", render_summary(session));
    let _ = writeln!(output, "{}", render_table(session));
    let _ = writeln!(output);
    let radar = session.radar(radar_variable);
    let _ = write!(output, "{}", render_radar(&radar));
    let _ = writeln!(output);
    let violin = session.violin(violin_variable);
    let _ = write!(output, "{}", render_violin(&violin));
    output
}

fn render_filters(session: &DashboardSession) -> String {
    let (age_min, age_max) = session.filter().age_range();
    let genders = session
        .filter()
        .genders()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Filters: age {age_min} to {age_max}, genders {{{genders}}}")
}

/// Markdown report over the current filtered view.
pub fn build_report(
    session: &mut DashboardSession,
    radar_variable: RadarVariable,
    violin_variable: ViolinVariable,
) -> String {
    let mut output = String::new();
    let today = chrono::Utc::now().date_naive();

    let _ = writeln!(output, "# Workplace Depression Dashboard");
    let _ = writeln!(output, "Generated on {today}");
    let _ = writeln!(output);
    let _ = writeln!(output, "## Filters");
    let _ = writeln!(output, "{}", render_filters(session));
    let _ = writeln!(output);

    let _ = writeln!(output, "## Summary");
    let count = session.depressed_count();
    let percent = session.depressed_percent();
    let satisfaction = session.avg_satisfaction();
    let _ = writeln!(output, "- Count of Individuals with Depression: {count}");
    let _ = writeln!(
        output,
        "- Percent of Depressed Individuals: {}",
        percent_text(&percent)
    );
    let _ = writeln!(
        output,
        "- Average Job Satisfaction: {}",
        satisfaction_text(&satisfaction)
    );
    let _ = writeln!(output);

    let _ = writeln!(output, "## Filtered Rows");
    let has_satisfaction = session.dataset().has_job_satisfaction();
    let rows = session.filtered_rows();
    if rows.is_empty() {
        let _ = writeln!(output, "No rows match the current filters.");
    } else {
        let table = table_for(&rows, has_satisfaction, presets::ASCII_MARKDOWN);
        let _ = writeln!(output, "{table}");
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Radar");
    let radar = session.radar(radar_variable);
    let _ = write!(output, "{}", render_radar(&radar));
    let _ = writeln!(output);

    let _ = writeln!(output, "## Violin");
    let violin = session.violin(violin_variable);
    let _ = write!(output, "{}", render_violin(&violin));

    output
}
