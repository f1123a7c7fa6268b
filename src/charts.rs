use serde::Serialize;

use crate::dataset::{DietaryHabits, Record, YesNo, JOB_SATISFACTION_COLUMN};

const WORK_PRESSURE_AXIS: &str = "Work Pressure";
const FINANCIAL_STRESS_AXIS: &str = "Financial Stress";

/// Categorical variable the radar chart groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum RadarVariable {
    Depression,
    FamilyHistory,
    SuicidalThoughts,
}

impl RadarVariable {
    pub fn column_name(self) -> &'static str {
        match self {
            RadarVariable::Depression => "Depression",
            RadarVariable::FamilyHistory => "Family History of Mental Illness",
            RadarVariable::SuicidalThoughts => "Have you ever had suicidal thoughts ?",
        }
    }

    fn value_of(self, record: &Record) -> YesNo {
        match self {
            RadarVariable::Depression => record.depression,
            RadarVariable::FamilyHistory => record.family_history,
            RadarVariable::SuicidalThoughts => record.suicidal_thoughts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPoint {
    pub axis: &'static str,
    pub value: f64,
}

/// Chart-ready radar aggregation: per-group axis means for the two series
/// plus the shared radial scale. A group with no rows in the filtered view
/// yields an empty series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    pub variable: &'static str,
    pub yes: Vec<RadarPoint>,
    pub no: Vec<RadarPoint>,
    pub radial_max: f64,
}

pub fn radar(
    rows: &[&Record],
    variable: RadarVariable,
    satisfaction_present: bool,
) -> RadarChart {
    let yes = radar_series(rows, variable, YesNo::Yes, satisfaction_present);
    let no = radar_series(rows, variable, YesNo::No, satisfaction_present);
    let radial_max = yes
        .iter()
        .chain(no.iter())
        .map(|point| point.value)
        .fold(0.0, f64::max);

    RadarChart {
        variable: variable.column_name(),
        yes,
        no,
        radial_max,
    }
}

fn radar_series(
    rows: &[&Record],
    variable: RadarVariable,
    group: YesNo,
    satisfaction_present: bool,
) -> Vec<RadarPoint> {
    let members: Vec<&Record> = rows
        .iter()
        .filter(|record| variable.value_of(record) == group)
        .copied()
        .collect();
    if members.is_empty() {
        return Vec::new();
    }

    let count = members.len() as f64;
    let mut points = vec![RadarPoint {
        axis: WORK_PRESSURE_AXIS,
        value: members.iter().map(|record| record.work_pressure).sum::<f64>() / count,
    }];

    // The satisfaction axis drops out when the column is absent; the other
    // axes keep rendering.
    if satisfaction_present {
        let values: Vec<f64> = members
            .iter()
            .filter_map(|record| record.job_satisfaction)
            .map(f64::from)
            .collect();
        if !values.is_empty() {
            points.push(RadarPoint {
                axis: JOB_SATISFACTION_COLUMN,
                value: values.iter().sum::<f64>() / values.len() as f64,
            });
        }
    }

    points.push(RadarPoint {
        axis: FINANCIAL_STRESS_AXIS,
        value: members
            .iter()
            .map(|record| record.financial_stress)
            .sum::<f64>()
            / count,
    });
    points
}

/// Variable plotted by the violin view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ViolinVariable {
    DietaryHabits,
    SleepDuration,
    WorkHours,
}

impl ViolinVariable {
    pub fn column_name(self) -> &'static str {
        match self {
            ViolinVariable::DietaryHabits => "Dietary Habits",
            ViolinVariable::SleepDuration => "Sleep Duration",
            ViolinVariable::WorkHours => "Work Hours",
        }
    }

    fn value_of(self, record: &Record) -> ViolinValue {
        match self {
            ViolinVariable::DietaryHabits => ViolinValue::Ordinal(record.dietary_habits),
            ViolinVariable::SleepDuration => ViolinValue::Numeric(record.sleep_duration),
            ViolinVariable::WorkHours => ViolinValue::Numeric(record.work_hours),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViolinValue {
    Numeric(f64),
    Ordinal(DietaryHabits),
}

impl ViolinValue {
    /// Position on the plot axis. Ordinal values follow the fixed dietary
    /// ordering Healthy < Moderate < Unhealthy.
    pub fn rank(self) -> f64 {
        match self {
            ViolinValue::Numeric(value) => value,
            ViolinValue::Ordinal(habit) => habit as u8 as f64,
        }
    }
}

impl std::fmt::Display for ViolinValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolinValue::Numeric(value) => write!(f, "{value}"),
            ViolinValue::Ordinal(habit) => write!(f, "{habit}"),
        }
    }
}

/// One distribution per `Depression` value. Points are the raw per-row values
/// in original row order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinGroup {
    pub depression: YesNo,
    pub points: Vec<ViolinValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

impl ViolinGroup {
    /// Min/median/max over numeric points; `None` for an empty or ordinal
    /// distribution.
    pub fn numeric_summary(&self) -> Option<NumericSummary> {
        let mut values: Vec<f64> = self
            .points
            .iter()
            .filter_map(|point| match point {
                ViolinValue::Numeric(value) => Some(*value),
                ViolinValue::Ordinal(_) => None,
            })
            .collect();
        if values.is_empty() {
            return None;
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mid = values.len() / 2;
        let median = if values.len() % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        };
        Some(NumericSummary {
            min: values[0],
            median,
            max: values[values.len() - 1],
        })
    }

    /// Counts of the dietary categories present, in the fixed ordinal order.
    /// Categories absent from the group are simply skipped, never reordered.
    pub fn dietary_counts(&self) -> Vec<(DietaryHabits, usize)> {
        DietaryHabits::ORDERED
            .iter()
            .filter_map(|habit| {
                let count = self
                    .points
                    .iter()
                    .filter(|point| matches!(point, ViolinValue::Ordinal(h) if h == habit))
                    .count();
                (count > 0).then_some((*habit, count))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinChart {
    pub variable: &'static str,
    pub groups: Vec<ViolinGroup>,
}

pub fn violin(rows: &[&Record], variable: ViolinVariable) -> ViolinChart {
    let groups = [YesNo::Yes, YesNo::No]
        .into_iter()
        .map(|depression| ViolinGroup {
            depression,
            points: rows
                .iter()
                .filter(|record| record.depression == depression)
                .map(|record| variable.value_of(record))
                .collect(),
        })
        .collect();

    ViolinChart {
        variable: variable.column_name(),
        groups,
    }
}
