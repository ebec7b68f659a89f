//! Activity labels.
//!
//! An [`Activity`] names what an agent is doing.  It is descriptive only:
//! planning decides *where* to go from the calendar and zone categories, and
//! then records the activity that matches the decision for display.

use std::fmt;

use nt_core::{DayPeriod, is_meal_time, is_sleep_time, is_work_hours};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Activity {
    Sleeping,
    Working,
    Eating,
    MorningRoutine,
    Socializing,
    Activities,
    Relaxing,
    Resting,
}

impl Activity {
    /// Default activity for a period when no clock rule applies.
    pub fn for_period(period: DayPeriod) -> Self {
        match period {
            DayPeriod::Dawn      => Activity::MorningRoutine,
            DayPeriod::Morning   => Activity::Socializing,
            DayPeriod::Afternoon => Activity::Activities,
            DayPeriod::Evening   => Activity::Relaxing,
            DayPeriod::Night     => Activity::Resting,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Activity::Sleeping       => "Sleeping",
            Activity::Working        => "Working",
            Activity::Eating         => "Eating",
            Activity::MorningRoutine => "Morning routine",
            Activity::Socializing    => "Socializing",
            Activity::Activities     => "Activities",
            Activity::Relaxing       => "Relaxing",
            Activity::Resting        => "Resting",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The activity an agent should be doing at `hour`.
///
/// Rules are checked in priority order: sleep, work, meal, then the period
/// default.
pub fn suggested_activity(hour: u32) -> Activity {
    if is_sleep_time(hour) {
        Activity::Sleeping
    } else if is_work_hours(hour) {
        Activity::Working
    } else if is_meal_time(hour) {
        Activity::Eating
    } else {
        Activity::for_period(DayPeriod::from_hour(hour))
    }
}
