//! Feasibility check: do the tasks fit in the selected study time?

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeasibilityError {
    #[error("at least one study day must be selected")]
    NoStudyDays,
}

/// Outcome of comparing required against available study hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feasibility {
    Pass {
        required: u64,
        available: u64,
    },
    /// Not enough time. `recommended_hours_per_day` is the smallest daily
    /// load that would fit the tasks into the same days.
    Fail {
        required: u64,
        available: u64,
        recommended_hours_per_day: u64,
    },
}

impl Feasibility {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass { .. })
    }

    pub fn required(&self) -> u64 {
        match self {
            Self::Pass { required, .. } | Self::Fail { required, .. } => *required,
        }
    }

    pub fn available(&self) -> u64 {
        match self {
            Self::Pass { available, .. } | Self::Fail { available, .. } => *available,
        }
    }
}

/// Compare `sum(expected_hours)` against `days_selected * hours_per_day`.
///
/// Zero study days is rejected up front; the recommendation divides by it.
pub fn check_feasibility<I>(
    expected_hours: I,
    days_selected: usize,
    hours_per_day: u32,
) -> Result<Feasibility, FeasibilityError>
where
    I: IntoIterator<Item = u32>,
{
    if days_selected == 0 {
        return Err(FeasibilityError::NoStudyDays);
    }

    let days = days_selected as u64;
    let required: u64 = expected_hours.into_iter().map(u64::from).sum();
    let available = days * u64::from(hours_per_day);

    if required > available {
        Ok(Feasibility::Fail {
            required,
            available,
            recommended_hours_per_day: required.div_ceil(days),
        })
    } else {
        Ok(Feasibility::Pass {
            required,
            available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fails_and_recommends_ceiling() {
        // 5 days x 2 hours = 10 available, 12 required.
        let result = check_feasibility([5, 4, 3], 5, 2).unwrap();
        assert_eq!(
            result,
            Feasibility::Fail {
                required: 12,
                available: 10,
                recommended_hours_per_day: 3,
            }
        );
        assert!(!result.is_pass());
    }

    #[test]
    fn exact_fit_passes() {
        let result = check_feasibility([6, 4], 5, 2).unwrap();
        assert_eq!(
            result,
            Feasibility::Pass {
                required: 10,
                available: 10,
            }
        );
        assert!(result.is_pass());
    }

    #[test]
    fn recommendation_without_remainder() {
        let result = check_feasibility([15], 3, 4).unwrap();
        assert!(matches!(
            result,
            Feasibility::Fail {
                recommended_hours_per_day: 5,
                ..
            }
        ));
    }

    #[test]
    fn zero_days_rejected() {
        assert_eq!(
            check_feasibility([1], 0, 8),
            Err(FeasibilityError::NoStudyDays)
        );
    }

    #[test]
    fn accessors_report_totals() {
        let result = check_feasibility(vec![1, 2], 1, 1).unwrap();
        assert_eq!(result.required(), 3);
        assert_eq!(result.available(), 1);
    }
}
