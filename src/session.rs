use std::collections::BTreeSet;

use crate::charts::{self, RadarChart, RadarVariable, ViolinChart, ViolinVariable};
use crate::dataset::{Dataset, Gender, Record};
use crate::filters::{FilterError, FilterKey, FilterState};
use crate::memo::Memo;
use crate::metrics::{self, MetricOutcome, Satisfaction};

#[derive(Debug)]
struct ViewCache {
    key: FilterKey,
    rows: Vec<usize>,
    version: u64,
}

/// One user session: the dataset, the filter state, and every memoized
/// derivation. Filter mutations invalidate the filtered view by changing its
/// key; the view's version only advances on genuine recomputation, and every
/// metric memo keys on that version, so a filter change propagates to each
/// dependent view exactly once and only when the view is actually read.
///
/// Events are serial (`&mut self` throughout); concurrent sessions each own
/// their state and share only the read-only dataset.
pub struct DashboardSession {
    dataset: Dataset,
    filter: FilterState,
    view: Option<ViewCache>,
    view_recomputes: u64,
    count: Memo<u64, usize>,
    percent: Memo<u64, MetricOutcome<f64>>,
    satisfaction: Memo<u64, MetricOutcome<Satisfaction>>,
    radar: Memo<(u64, RadarVariable), RadarChart>,
    violin: Memo<(u64, ViolinVariable), ViolinChart>,
}

impl DashboardSession {
    pub fn new(dataset: Dataset) -> DashboardSession {
        let filter = FilterState::new(dataset.age_extent());
        DashboardSession {
            dataset,
            filter,
            view: None,
            view_recomputes: 0,
            count: Memo::new(),
            percent: Memo::new(),
            satisfaction: Memo::new(),
            radar: Memo::new(),
            violin: Memo::new(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_age_range(&mut self, lo: u32, hi: u32) -> Result<(), FilterError> {
        self.filter.set_age_range(lo, hi)
    }

    pub fn set_genders(&mut self, genders: BTreeSet<Gender>) -> Result<(), FilterError> {
        self.filter.set_genders(genders)
    }

    pub fn reset(&mut self) {
        self.filter.reset();
    }

    /// The currently visible rows, in original dataset order.
    pub fn filtered_rows(&mut self) -> Vec<&Record> {
        self.refresh_view();
        let records = self.dataset.records();
        match &self.view {
            Some(cache) => cache.rows.iter().map(|&index| &records[index]).collect(),
            None => Vec::new(),
        }
    }

    pub fn depressed_count(&mut self) -> usize {
        let version = self.refresh_view();
        let dataset = &self.dataset;
        let view = &self.view;
        *self
            .count
            .get_or_compute(version, || metrics::depressed_count(&selected(dataset, view)))
    }

    pub fn depressed_percent(&mut self) -> MetricOutcome<f64> {
        let version = self.refresh_view();
        let dataset = &self.dataset;
        let view = &self.view;
        self.percent
            .get_or_compute(version, || {
                metrics::depressed_percent(&selected(dataset, view))
            })
            .clone()
    }

    pub fn avg_satisfaction(&mut self) -> MetricOutcome<Satisfaction> {
        let version = self.refresh_view();
        let dataset = &self.dataset;
        let view = &self.view;
        self.satisfaction
            .get_or_compute(version, || {
                metrics::avg_satisfaction(&selected(dataset, view), dataset.has_job_satisfaction())
            })
            .clone()
    }

    pub fn radar(&mut self, variable: RadarVariable) -> RadarChart {
        let version = self.refresh_view();
        let dataset = &self.dataset;
        let view = &self.view;
        self.radar
            .get_or_compute((version, variable), || {
                charts::radar(
                    &selected(dataset, view),
                    variable,
                    dataset.has_job_satisfaction(),
                )
            })
            .clone()
    }

    pub fn violin(&mut self, variable: ViolinVariable) -> ViolinChart {
        let version = self.refresh_view();
        let dataset = &self.dataset;
        let view = &self.view;
        self.violin
            .get_or_compute((version, variable), || {
                charts::violin(&selected(dataset, view), variable)
            })
            .clone()
    }

    /// Recompute the filtered view iff the filter key changed since the last
    /// read; returns the view's version for downstream memo keys.
    fn refresh_view(&mut self) -> u64 {
        let key = self.filter.key();
        let fresh = matches!(&self.view, Some(cache) if cache.key == key);
        if !fresh {
            let rows: Vec<usize> = self
                .dataset
                .records()
                .iter()
                .enumerate()
                .filter(|(_, record)| self.filter.matches(record.age, record.gender))
                .map(|(index, _)| index)
                .collect();
            self.view_recomputes += 1;
            tracing::debug!(
                age_min = key.0,
                age_max = key.1,
                genders = ?key.2,
                rows = rows.len(),
                version = self.view_recomputes,
                "recomputed filtered view"
            );
            self.view = Some(ViewCache {
                key,
                rows,
                version: self.view_recomputes,
            });
        }
        self.view.as_ref().map_or(0, |cache| cache.version)
    }
}

fn selected<'a>(dataset: &'a Dataset, view: &Option<ViewCache>) -> Vec<&'a Record> {
    let records = dataset.records();
    match view {
        Some(cache) => cache.rows.iter().map(|&index| &records[index]).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::YesNo;

    // Ten rows, ages 20..=65 in steps of 5, genders alternating starting with
    // Female, six depressed.
    const SCENARIO_CSV: &str = "\
Age,Gender,Depression,Family History of Mental Illness,Have you ever had suicidal thoughts ?,Job Satisfaction,Work Pressure,Financial Stress,Dietary Habits,Sleep Duration,Work Hours
20,Female,Yes,No,No,2,4.0,3.0,Unhealthy,6.0,10.0
25,Male,No,No,No,4,2.0,1.0,Healthy,7.5,8.0
30,Female,Yes,Yes,Yes,1,5.0,4.0,Unhealthy,5.5,11.0
35,Male,Yes,No,Yes,2,4.0,3.0,Moderate,6.5,9.5
40,Female,Yes,Yes,No,3,3.0,2.0,Moderate,7.0,9.0
45,Male,No,No,No,5,1.0,1.0,Healthy,8.0,7.5
50,Female,Yes,No,Yes,2,4.0,4.0,Unhealthy,6.0,10.5
55,Male,No,Yes,No,4,2.0,2.0,Moderate,7.5,8.0
60,Female,Yes,No,No,3,3.0,3.0,Moderate,7.0,8.5
65,Male,No,No,No,4,2.0,1.0,Healthy,8.0,7.0
";

    fn session() -> DashboardSession {
        let dataset = Dataset::from_reader(SCENARIO_CSV.as_bytes()).unwrap();
        DashboardSession::new(dataset)
    }

    #[test]
    fn default_view_is_whole_dataset_in_order() {
        let mut session = session();
        let ages: Vec<Option<u32>> = session.filtered_rows().iter().map(|r| r.age).collect();
        let expected: Vec<Option<u32>> = (20..=65).step_by(5).map(Some).collect();
        assert_eq!(ages, expected);
    }

    #[test]
    fn scenario_male_30_to_50() {
        let mut session = session();
        session.set_age_range(30, 50).unwrap();
        session
            .set_genders(BTreeSet::from([Gender::Male]))
            .unwrap();

        let rows = session.filtered_rows();
        let ages: Vec<Option<u32>> = rows.iter().map(|r| r.age).collect();
        assert_eq!(ages, vec![Some(35), Some(45)]);
        assert!(rows.iter().all(|r| r.gender == Gender::Male));

        assert_eq!(session.depressed_count(), 1);
        match session.depressed_percent() {
            MetricOutcome::Ready(percent) => assert!((percent - 50.0).abs() < 1e-9),
            other => panic!("expected a percentage, got {other:?}"),
        }
    }

    #[test]
    fn repeated_reads_hit_the_cache() {
        let mut session = session();
        let first = session.filtered_rows().len();
        session.depressed_count();
        session.depressed_count();
        let second = session.filtered_rows().len();

        assert_eq!(first, second);
        assert_eq!(session.view_recomputes, 1);
        assert_eq!(session.count.recomputes(), 1);
    }

    #[test]
    fn setting_the_same_range_does_not_invalidate() {
        let mut session = session();
        session.set_age_range(30, 50).unwrap();
        session.filtered_rows();
        session.set_age_range(30, 50).unwrap();
        session.filtered_rows();

        assert_eq!(session.view_recomputes, 1);
    }

    #[test]
    fn mutation_invalidates_all_metrics_once() {
        let mut session = session();
        session.depressed_count();
        session.depressed_percent();

        session.set_age_range(30, 50).unwrap();
        session.depressed_count();
        session.depressed_count();
        session.depressed_percent();

        assert_eq!(session.view_recomputes, 2);
        assert_eq!(session.count.recomputes(), 2);
        assert_eq!(session.percent.recomputes(), 2);
    }

    #[test]
    fn metrics_are_lazy() {
        let mut session = session();
        session.set_age_range(30, 50).unwrap();
        session.set_age_range(25, 55).unwrap();
        // Nothing observed the intermediate state, so nothing was computed.
        assert_eq!(session.view_recomputes, 0);
        assert_eq!(session.count.recomputes(), 0);
    }

    #[test]
    fn reset_restores_the_full_view() {
        let mut session = session();
        let initial = session.filter().key();

        session.set_age_range(30, 40).unwrap();
        session
            .set_genders(BTreeSet::from([Gender::Female]))
            .unwrap();
        assert_eq!(session.filtered_rows().len(), 2);

        session.reset();
        assert_eq!(session.filter().key(), initial);
        assert_eq!(session.filtered_rows().len(), 10);
    }

    #[test]
    fn empty_view_degrades_every_metric() {
        let mut session = session();
        // Age 30 is Female, so Male-only at [30, 30] selects nothing.
        session.set_age_range(30, 30).unwrap();
        session
            .set_genders(BTreeSet::from([Gender::Male]))
            .unwrap();

        assert!(session.filtered_rows().is_empty());
        assert_eq!(session.depressed_count(), 0);
        assert_eq!(session.depressed_percent(), MetricOutcome::NoData);
        assert_eq!(session.avg_satisfaction(), MetricOutcome::NoData);

        let radar = session.radar(RadarVariable::Depression);
        assert!(radar.yes.is_empty() && radar.no.is_empty());
        let violin = session.violin(ViolinVariable::WorkHours);
        assert!(violin.groups.iter().all(|group| group.points.is_empty()));
    }

    #[test]
    fn depressed_count_never_exceeds_view_size() {
        let mut session = session();
        for (lo, hi) in [(20, 65), (30, 50), (60, 65)] {
            session.set_age_range(lo, hi).unwrap();
            let size = session.filtered_rows().len();
            assert!(session.depressed_count() <= size);
        }
    }

    #[test]
    fn charts_memoize_per_variable() {
        let mut session = session();
        session.radar(RadarVariable::Depression);
        session.radar(RadarVariable::Depression);
        assert_eq!(session.radar.recomputes(), 1);

        session.radar(RadarVariable::FamilyHistory);
        assert_eq!(session.radar.recomputes(), 2);
    }

    #[test]
    fn radar_groups_follow_selected_variable() {
        let mut session = session();
        let chart = session.radar(RadarVariable::SuicidalThoughts);
        assert_eq!(chart.variable, "Have you ever had suicidal thoughts ?");
        assert!(!chart.yes.is_empty());
        assert!(!chart.no.is_empty());
    }

    #[test]
    fn satisfaction_card_reads_filtered_mean() {
        let mut session = session();
        session.set_age_range(30, 50).unwrap();
        session
            .set_genders(BTreeSet::from([Gender::Male]))
            .unwrap();

        // Rows 35 (satisfaction 2) and 45 (satisfaction 5): mean 3.5 rounds up.
        match session.avg_satisfaction() {
            MetricOutcome::Ready(satisfaction) => {
                assert!((satisfaction.mean - 3.5).abs() < 1e-9);
                assert_eq!(satisfaction.label, "Satisfied");
            }
            other => panic!("expected a satisfaction value, got {other:?}"),
        }
    }

    #[test]
    fn rows_with_missing_age_are_excluded() {
        let csv = "\
Age,Gender,Depression,Family History of Mental Illness,Have you ever had suicidal thoughts ?,Job Satisfaction,Work Pressure,Financial Stress,Dietary Habits,Sleep Duration,Work Hours
thirty,Male,Yes,No,No,2,4.0,3.0,Moderate,6.5,9.0
40,Male,No,No,No,4,2.0,1.0,Healthy,7.5,8.0
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let mut session = DashboardSession::new(dataset);

        let rows = session.filtered_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].age, Some(40));
        assert_eq!(rows[0].depression, YesNo::No);
    }
}
