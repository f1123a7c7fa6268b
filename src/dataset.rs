use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Column header for the job-satisfaction field, which may be absent from the
/// backing file. The other headers are required and checked at load.
pub const JOB_SATISFACTION_COLUMN: &str = "Job Satisfaction";

const REQUIRED_COLUMNS: &[&str] = &[
    "Age",
    "Gender",
    "Depression",
    "Family History of Mental Illness",
    "Have you ever had suicidal thoughts ?",
    "Work Pressure",
    "Financial Stress",
    "Dietary Habits",
    "Sleep Duration",
    "Work Hours",
];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset contains no rows")]
    Empty,
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("no parseable values in the 'Age' column")]
    NoNumericAges,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, clap::ValueEnum,
)]
pub enum Gender {
    Male,
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum YesNo {
    Yes,
    No,
}

impl std::fmt::Display for YesNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YesNo::Yes => write!(f, "Yes"),
            YesNo::No => write!(f, "No"),
        }
    }
}

/// Dietary habit categories. The declaration order is the fixed ordinal
/// ordering (Healthy < Moderate < Unhealthy) used wherever these values are
/// sorted or listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum DietaryHabits {
    Healthy,
    Moderate,
    Unhealthy,
}

impl DietaryHabits {
    pub const ORDERED: [DietaryHabits; 3] = [
        DietaryHabits::Healthy,
        DietaryHabits::Moderate,
        DietaryHabits::Unhealthy,
    ];
}

impl std::fmt::Display for DietaryHabits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DietaryHabits::Healthy => write!(f, "Healthy"),
            DietaryHabits::Moderate => write!(f, "Moderate"),
            DietaryHabits::Unhealthy => write!(f, "Unhealthy"),
        }
    }
}

/// One survey respondent. Field names map to the literal CSV headers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Record {
    /// Coerced at load: non-numeric values become `None` and are excluded
    /// from age-range comparisons rather than raising.
    #[serde(rename = "Age", deserialize_with = "lenient_age")]
    pub age: Option<u32>,
    #[serde(rename = "Gender")]
    pub gender: Gender,
    #[serde(rename = "Depression")]
    pub depression: YesNo,
    #[serde(rename = "Family History of Mental Illness")]
    pub family_history: YesNo,
    #[serde(rename = "Have you ever had suicidal thoughts ?")]
    pub suicidal_thoughts: YesNo,
    #[serde(rename = "Job Satisfaction", default)]
    pub job_satisfaction: Option<u8>,
    #[serde(rename = "Work Pressure")]
    pub work_pressure: f64,
    #[serde(rename = "Financial Stress")]
    pub financial_stress: f64,
    #[serde(rename = "Dietary Habits")]
    pub dietary_habits: DietaryHabits,
    #[serde(rename = "Sleep Duration")]
    pub sleep_duration: f64,
    #[serde(rename = "Work Hours")]
    pub work_hours: f64,
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse::<u32>().ok())
}

/// Observed min/max age over rows with a parseable age, captured once at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeExtent {
    pub min: u32,
    pub max: u32,
}

/// The loaded survey table. Immutable after load; every downstream view reads
/// from it through shared references.
#[derive(Debug)]
pub struct Dataset {
    records: Vec<Record>,
    has_job_satisfaction: bool,
    age_extent: AgeExtent,
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Dataset, DatasetError> {
        let file = std::fs::File::open(path)?;
        let dataset = Dataset::from_reader(file)?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.records.len(),
            "loaded survey dataset"
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Dataset, DatasetError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header == *column) {
                return Err(DatasetError::MissingColumn(column));
            }
        }
        let has_job_satisfaction = headers
            .iter()
            .any(|header| header == JOB_SATISFACTION_COLUMN);

        let mut records = Vec::new();
        for result in csv_reader.deserialize::<Record>() {
            records.push(result?);
        }
        if records.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut ages = records.iter().filter_map(|record| record.age);
        let first = ages.next().ok_or(DatasetError::NoNumericAges)?;
        let (min, max) = ages.fold((first, first), |(lo, hi), age| {
            (lo.min(age), hi.max(age))
        });

        Ok(Dataset {
            records,
            has_job_satisfaction,
            age_extent: AgeExtent { min, max },
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn has_job_satisfaction(&self) -> bool {
        self.has_job_satisfaction
    }

    pub fn age_extent(&self) -> AgeExtent {
        self.age_extent
    }
}
