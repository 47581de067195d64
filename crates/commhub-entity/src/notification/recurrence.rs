//! Recurrence policy enumerations and the calculator's rule view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Repetition policy of a recurring notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatPolicy {
    /// Every Monday through Friday.
    EveryWeekday,
    /// Every day.
    Daily,
    /// Every 7 days.
    Weekly,
    /// Every calendar month.
    Monthly,
    /// Every calendar year.
    Yearly,
    /// Custom interval driven by [`RepeatFrequency`] and `repeat_for`.
    Custom,
}

impl RepeatPolicy {
    /// Return the policy as a kebab-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EveryWeekday => "every-weekday",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for RepeatPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unit of a custom repetition interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatFrequency {
    /// Repeat every `repeat_for` days.
    Day,
    /// Repeat on selected weekdays, cycling every `repeat_for` weeks.
    Week,
    /// Repeat every `repeat_for` months.
    Month,
}

impl RepeatFrequency {
    /// Return the frequency as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for RepeatFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The recurrence fields of a notification, grouped for the calculator.
///
/// `week_selection` holds ascending weekday indices, 0 = Monday through
/// 6 = Sunday, and is only meaningful for `Custom`/`Week` rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    /// Repetition policy.
    pub policy: RepeatPolicy,
    /// Interval multiplier for custom policies.
    pub repeat_for: i32,
    /// Interval unit for custom policies.
    pub frequency: Option<RepeatFrequency>,
    /// Selected weekday indices for custom weekly rules.
    pub week_selection: Vec<u8>,
    /// Last date on which an occurrence may fire.
    pub end_date: DateTime<Utc>,
}
