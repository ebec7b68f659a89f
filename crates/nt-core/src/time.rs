//! Simulated calendar.
//!
//! # Design
//!
//! The canonical quantity is `total_secs`, the number of simulated seconds
//! elapsed since midnight of day 1.  Hour, minute, day and [`DayPeriod`] are
//! derived from it on every [`Calendar::advance`] and never written by
//! anything else:
//!
//!   hour   = (total_secs / 3600) % 24
//!   minute = (total_secs / 60) % 60
//!   day    = 1 + total_secs / 86400
//!
//! Real time is converted to simulated time by `time_scale` (simulated
//! seconds per real second).  Pausing short-circuits `advance` entirely.
//!
//! The hour-of-day predicates ([`is_sleep_time`], [`is_work_hours`],
//! [`is_meal_time`]) are free functions so callers can query any hour, not
//! only the current one.

use std::fmt;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_DAY: u64 = 86_400;

// ── Hour predicates ───────────────────────────────────────────────────────────

/// 22:00 – 06:00.
#[inline]
pub fn is_sleep_time(hour: u32) -> bool {
    hour >= 22 || hour < 6
}

/// 09:00 – 17:00.
#[inline]
pub fn is_work_hours(hour: u32) -> bool {
    (9..17).contains(&hour)
}

/// Breakfast 07–09, lunch 12–13, dinner 18–20.
#[inline]
pub fn is_meal_time(hour: u32) -> bool {
    (7..9).contains(&hour) || (12..13).contains(&hour) || (18..20).contains(&hour)
}

// ── DayPeriod ─────────────────────────────────────────────────────────────────

/// Coarse division of the day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DayPeriod {
    /// 05:00 – 08:00
    Dawn,
    /// 08:00 – 12:00
    Morning,
    /// 12:00 – 17:00
    Afternoon,
    /// 17:00 – 20:00
    Evening,
    /// 20:00 – 05:00
    Night,
}

impl DayPeriod {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=7 => DayPeriod::Dawn,
            8..=11 => DayPeriod::Morning,
            12..=16 => DayPeriod::Afternoon,
            17..=19 => DayPeriod::Evening,
            _ => DayPeriod::Night,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayPeriod::Dawn      => "Dawn",
            DayPeriod::Morning   => "Morning",
            DayPeriod::Afternoon => "Afternoon",
            DayPeriod::Evening   => "Evening",
            DayPeriod::Night     => "Night",
        }
    }
}

impl fmt::Display for DayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Calendar ──────────────────────────────────────────────────────────────────

/// Tracks simulated time and answers time-of-day questions.
#[derive(Clone, Debug)]
pub struct Calendar {
    total_secs: f64,
    hour:       u32,
    minute:     u32,
    day:        u64,
    period:     DayPeriod,
    time_scale: f32,
    paused:     bool,
}

impl Calendar {
    /// A calendar at 00:00 on day 1.
    pub fn new(time_scale: f32) -> Self {
        Self::starting_at(0, time_scale)
    }

    /// A calendar at `hour`:00 on day 1.  The offset is stored as elapsed
    /// seconds, so every derived field stays a function of `total_secs`.
    pub fn starting_at(hour: u32, time_scale: f32) -> Self {
        let mut cal = Self {
            total_secs: (hour % 24) as f64 * SECS_PER_HOUR as f64,
            hour:       0,
            minute:     0,
            day:        1,
            period:     DayPeriod::Night,
            time_scale,
            paused:     false,
        };
        cal.recompute();
        cal
    }

    /// Accumulate `real_dt × time_scale` simulated seconds.  No-op while paused.
    pub fn advance(&mut self, real_dt: f32) {
        if self.paused {
            return;
        }
        self.total_secs += real_dt as f64 * self.time_scale as f64;
        self.recompute();
    }

    fn recompute(&mut self) {
        let secs = self.total_secs.max(0.0) as u64;
        self.minute = ((secs / SECS_PER_MINUTE) % 60) as u32;
        self.hour = ((secs / SECS_PER_HOUR) % 24) as u32;
        self.day = 1 + secs / SECS_PER_DAY;
        self.period = DayPeriod::from_hour(self.hour);
    }

    // ── Getters ───────────────────────────────────────────────────────────

    #[inline]
    pub fn hour(&self) -> u32 {
        self.hour
    }

    #[inline]
    pub fn minute(&self) -> u32 {
        self.minute
    }

    #[inline]
    pub fn day(&self) -> u64 {
        self.day
    }

    #[inline]
    pub fn total_secs(&self) -> f64 {
        self.total_secs
    }

    #[inline]
    pub fn period(&self) -> DayPeriod {
        self.period
    }

    pub fn is_day(&self) -> bool {
        self.period != DayPeriod::Night
    }

    pub fn is_night(&self) -> bool {
        self.period == DayPeriod::Night
    }

    // ── Current-hour predicates ───────────────────────────────────────────

    pub fn is_sleep_time(&self) -> bool {
        is_sleep_time(self.hour)
    }

    pub fn is_work_hours(&self) -> bool {
        is_work_hours(self.hour)
    }

    pub fn is_meal_time(&self) -> bool {
        is_meal_time(self.hour)
    }

    // ── Rate control ──────────────────────────────────────────────────────

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day {} - {:02}:{:02}", self.day, self.hour, self.minute)
    }
}
