use crate::dataset::{Record, YesNo, JOB_SATISFACTION_COLUMN};

/// Result of a derived metric. Recoverable display states are values here,
/// never errors: the presentation layer matches on the variant instead of the
/// computation bailing out partway through a render.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricOutcome<T> {
    Ready(T),
    NoData,
    FieldMissing(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Satisfaction {
    pub mean: f64,
    pub label: &'static str,
}

pub fn depressed_count(rows: &[&Record]) -> usize {
    rows.iter()
        .filter(|record| record.depression == YesNo::Yes)
        .count()
}

pub fn depressed_percent(rows: &[&Record]) -> MetricOutcome<f64> {
    if rows.is_empty() {
        return MetricOutcome::NoData;
    }
    let depressed = depressed_count(rows);
    MetricOutcome::Ready(100.0 * depressed as f64 / rows.len() as f64)
}

/// Mean job satisfaction mapped to its label. Rounds half away from zero
/// (`f64::round`), so a mean of exactly 3.5 maps to 4.
pub fn avg_satisfaction(rows: &[&Record], column_present: bool) -> MetricOutcome<Satisfaction> {
    if !column_present {
        return MetricOutcome::FieldMissing(JOB_SATISFACTION_COLUMN);
    }
    if rows.is_empty() {
        return MetricOutcome::NoData;
    }

    let values: Vec<f64> = rows
        .iter()
        .filter_map(|record| record.job_satisfaction)
        .map(f64::from)
        .collect();
    if values.is_empty() {
        return MetricOutcome::NoData;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    MetricOutcome::Ready(Satisfaction {
        mean,
        label: satisfaction_label(mean.round() as i64),
    })
}

pub fn satisfaction_label(level: i64) -> &'static str {
    match level {
        1 => "Very Dissatisfied",
        2 => "Dissatisfied",
        3 => "Neutral",
        4 => "Satisfied",
        5 => "Very Satisfied",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DietaryHabits, Gender};

    fn record(depression: YesNo, job_satisfaction: Option<u8>) -> Record {
        Record {
            age: Some(30),
            gender: Gender::Male,
            depression,
            family_history: YesNo::No,
            suicidal_thoughts: YesNo::No,
            job_satisfaction,
            work_pressure: 3.0,
            financial_stress: 2.0,
            dietary_habits: DietaryHabits::Moderate,
            sleep_duration: 7.0,
            work_hours: 8.0,
        }
    }

    #[test]
    fn count_matches_yes_rows() {
        let rows = vec![
            record(YesNo::Yes, Some(2)),
            record(YesNo::No, Some(4)),
            record(YesNo::Yes, Some(1)),
        ];
        let refs: Vec<&Record> = rows.iter().collect();

        assert_eq!(depressed_count(&refs), 2);
        assert!(depressed_count(&refs) <= refs.len());
    }

    #[test]
    fn percent_is_bounded() {
        let rows = vec![record(YesNo::Yes, Some(2)), record(YesNo::No, Some(4))];
        let refs: Vec<&Record> = rows.iter().collect();

        match depressed_percent(&refs) {
            MetricOutcome::Ready(percent) => {
                assert!((percent - 50.0).abs() < 1e-9);
                assert!((0.0..=100.0).contains(&percent));
            }
            other => panic!("expected a percentage, got {other:?}"),
        }
    }

    #[test]
    fn percent_of_empty_view_is_no_data() {
        assert_eq!(depressed_percent(&[]), MetricOutcome::NoData);
    }

    #[test]
    fn satisfaction_mean_and_label() {
        let rows = vec![
            record(YesNo::No, Some(4)),
            record(YesNo::No, Some(4)),
            record(YesNo::No, Some(5)),
        ];
        let refs: Vec<&Record> = rows.iter().collect();

        match avg_satisfaction(&refs, true) {
            MetricOutcome::Ready(satisfaction) => {
                assert!((satisfaction.mean - 13.0 / 3.0).abs() < 1e-9);
                assert_eq!(satisfaction.label, "Satisfied");
            }
            other => panic!("expected a satisfaction value, got {other:?}"),
        }
    }

    #[test]
    fn satisfaction_rounds_half_up() {
        let rows = vec![record(YesNo::No, Some(3)), record(YesNo::No, Some(4))];
        let refs: Vec<&Record> = rows.iter().collect();

        match avg_satisfaction(&refs, true) {
            MetricOutcome::Ready(satisfaction) => {
                assert!((satisfaction.mean - 3.5).abs() < 1e-9);
                assert_eq!(satisfaction.label, "Satisfied");
            }
            other => panic!("expected a satisfaction value, got {other:?}"),
        }
    }

    #[test]
    fn satisfaction_reports_missing_column() {
        let rows = vec![record(YesNo::No, None)];
        let refs: Vec<&Record> = rows.iter().collect();

        assert_eq!(
            avg_satisfaction(&refs, false),
            MetricOutcome::FieldMissing(JOB_SATISFACTION_COLUMN)
        );
    }

    #[test]
    fn satisfaction_of_empty_view_is_no_data() {
        assert_eq!(avg_satisfaction(&[], true), MetricOutcome::NoData);
    }

    #[test]
    fn satisfaction_with_only_blank_cells_is_no_data() {
        let rows = vec![record(YesNo::No, None), record(YesNo::Yes, None)];
        let refs: Vec<&Record> = rows.iter().collect();

        assert_eq!(avg_satisfaction(&refs, true), MetricOutcome::NoData);
    }

    #[test]
    fn labels_cover_the_scale() {
        assert_eq!(satisfaction_label(1), "Very Dissatisfied");
        assert_eq!(satisfaction_label(3), "Neutral");
        assert_eq!(satisfaction_label(5), "Very Satisfied");
        assert_eq!(satisfaction_label(0), "Unknown");
        assert_eq!(satisfaction_label(6), "Unknown");
    }
}
