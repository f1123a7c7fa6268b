use std::collections::BTreeSet;

use thiserror::Error;

use crate::dataset::{AgeExtent, Gender};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid age range: {lo} is greater than {hi}")]
    InvalidRange { lo: u32, hi: u32 },
    #[error("gender selection must not be empty")]
    EmptyGenders,
}

/// The memoization key for the filtered view: any two filter states with the
/// same key select the same rows.
pub type FilterKey = (u32, u32, BTreeSet<Gender>);

/// User-controlled filter parameters. Always consistent: `age_min <= age_max`,
/// both within the dataset extent, and at least one gender selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    extent: AgeExtent,
    age_min: u32,
    age_max: u32,
    genders: BTreeSet<Gender>,
}

impl FilterState {
    /// Initial state: the full age extent with both genders selected.
    pub fn new(extent: AgeExtent) -> FilterState {
        FilterState {
            extent,
            age_min: extent.min,
            age_max: extent.max,
            genders: BTreeSet::from([Gender::Male, Gender::Female]),
        }
    }

    pub fn age_range(&self) -> (u32, u32) {
        (self.age_min, self.age_max)
    }

    pub fn genders(&self) -> &BTreeSet<Gender> {
        &self.genders
    }

    pub fn key(&self) -> FilterKey {
        (self.age_min, self.age_max, self.genders.clone())
    }

    /// Set the age range. Out-of-extent bounds are clamped into the extent
    /// rather than rejected; a range that is still inverted after clamping
    /// fails with [`FilterError::InvalidRange`].
    pub fn set_age_range(&mut self, lo: u32, hi: u32) -> Result<(), FilterError> {
        let lo = lo.clamp(self.extent.min, self.extent.max);
        let hi = hi.clamp(self.extent.min, self.extent.max);
        if lo > hi {
            return Err(FilterError::InvalidRange { lo, hi });
        }
        self.age_min = lo;
        self.age_max = hi;
        Ok(())
    }

    /// Replace the gender selection. An empty set is rejected so the filter
    /// can never select nothing by construction.
    pub fn set_genders(&mut self, genders: BTreeSet<Gender>) -> Result<(), FilterError> {
        if genders.is_empty() {
            return Err(FilterError::EmptyGenders);
        }
        self.genders = genders;
        Ok(())
    }

    /// Restore the initial state captured at load time.
    pub fn reset(&mut self) {
        *self = FilterState::new(self.extent);
    }

    pub fn matches(&self, age: Option<u32>, gender: Gender) -> bool {
        let in_range = match age {
            Some(age) => self.age_min <= age && age <= self.age_max,
            None => false,
        };
        in_range && self.genders.contains(&gender)
    }
}
