//! Recurring protected time windows.
//!
//! A system constraint blocks the same hour range on a weekly set of days
//! (lunch break, standing meetings). Protected slots are never assignable.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A recurring weekly block of protected hours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemConstraint {
    /// Human-readable name ("Lunch", "Standup")
    pub name: String,
    /// Weekday indices the block applies to (0 = Sunday .. 6 = Saturday)
    pub days: Vec<u8>,
    /// First protected hour (inclusive)
    pub start_hour: u32,
    /// First hour after the block (exclusive)
    pub end_hour: u32,
}

impl SystemConstraint {
    /// Create a new constraint.
    pub fn new(name: impl Into<String>, days: Vec<u8>, start_hour: u32, end_hour: u32) -> Self {
        Self {
            name: name.into(),
            days,
            start_hour,
            end_hour,
        }
    }

    /// Check the constraint invariants.
    ///
    /// Malformed constraints are rejected here, at load time; the membership
    /// test below assumes a validated window.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".to_string(),
                message: "constraint name must not be empty".to_string(),
            });
        }
        if self.start_hour >= self.end_hour {
            return Err(ValidationError::InvalidHourRange {
                start_hour: self.start_hour,
                end_hour: self.end_hour,
            });
        }
        if self.end_hour > 24 {
            return Err(ValidationError::InvalidValue {
                field: "end_hour".to_string(),
                message: format!("end_hour must be at most 24, got {}", self.end_hour),
            });
        }
        if let Some(day) = self.days.iter().find(|d| **d > 6) {
            return Err(ValidationError::InvalidValue {
                field: "days".to_string(),
                message: format!("weekday index must be in 0..=6, got {day}"),
            });
        }
        Ok(())
    }

    /// Whether the block covers the given weekday (0 = Sunday) and hour.
    pub fn applies_to(&self, weekday: u8, hour: u32) -> bool {
        self.days.contains(&weekday) && hour >= self.start_hour && hour < self.end_hour
    }
}

/// Whether any constraint protects the given date and hour.
///
/// Overlapping constraints form a simple union; there is no precedence.
pub fn is_protected(constraints: &[SystemConstraint], date: NaiveDate, hour: u32) -> bool {
    let weekday = date.weekday().num_days_from_sunday() as u8;
    constraints.iter().any(|c| c.applies_to(weekday, hour))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lunch() -> SystemConstraint {
        SystemConstraint::new("Lunch", vec![0, 1, 2, 3, 4, 5, 6], 13, 14)
    }

    #[test]
    fn valid_constraint_accepted() {
        assert!(lunch().validate().is_ok());
    }

    #[test]
    fn inverted_window_rejected() {
        let c = SystemConstraint::new("Broken", vec![1], 14, 13);
        assert!(matches!(
            c.validate(),
            Err(ValidationError::InvalidHourRange { start_hour: 14, end_hour: 13 })
        ));
        // Empty window is rejected too.
        let c = SystemConstraint::new("Empty", vec![1], 14, 14);
        assert!(c.validate().is_err());
    }

    #[test]
    fn out_of_range_fields_rejected() {
        assert!(SystemConstraint::new("Late", vec![1], 13, 25).validate().is_err());
        assert!(SystemConstraint::new("Day", vec![7], 13, 14).validate().is_err());
        assert!(SystemConstraint::new("  ", vec![1], 13, 14).validate().is_err());
    }

    #[test]
    fn membership_is_half_open() {
        let c = lunch();
        assert!(c.applies_to(1, 13));
        assert!(!c.applies_to(1, 14));
        assert!(!c.applies_to(1, 12));
    }

    #[test]
    fn weekday_filter() {
        let standup = SystemConstraint::new("Standup", vec![1, 2, 3, 4, 5], 9, 10);
        // 2026-08-03 is a Monday, 2026-08-02 a Sunday.
        let monday = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 8, 2).unwrap();
        assert!(is_protected(&[standup.clone()], monday, 9));
        assert!(!is_protected(&[standup], sunday, 9));
    }

    #[test]
    fn union_of_overlapping_constraints() {
        let a = SystemConstraint::new("A", vec![2], 10, 12);
        let b = SystemConstraint::new("B", vec![2], 11, 13);
        let tuesday = NaiveDate::from_ymd_opt(2026, 8, 4).unwrap();
        for hour in 10..13 {
            assert!(is_protected(&[a.clone(), b.clone()], tuesday, hour));
        }
        assert!(!is_protected(&[a, b], tuesday, 13));
    }
}
