//! Wall-clock arithmetic and time specifications for scheduled updates.
//!
//! A schedule's first firing is described either as a 24-hour clock target
//! ("14:30", local time) or as a plain delay in seconds. Both forms have an
//! exact human-readable rendering ("at 14:30" / "in 90 seconds") that is
//! persisted to config and re-parsed on reload, so the two textual forms
//! must stay byte-for-byte stable.

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

use super::types::DAY_SECONDS;

/// Errors that can occur when parsing a time specification.
#[derive(Debug, Error)]
pub enum TimeSpecError {
    /// Not a valid 24-hour clock string.
    #[error("invalid time of day: {0}")]
    InvalidClock(String),

    /// Not a valid number of seconds.
    #[error("invalid delay: {0}")]
    InvalidDelay(String),

    /// Neither a clock string nor a numeric delay.
    #[error("unrecognized time specification: {0}")]
    Unrecognized(String),
}

/// When a scheduled update should first fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSpec {
    /// A 24-hour wall-clock target such as "14:30". An empty string means
    /// fire on the next poll.
    Clock(String),
    /// A fixed delay in seconds.
    Delay(u64),
}

impl TimeSpec {
    /// Parse user input: an "HH:MM" clock string, an empty string
    /// (immediate), or a bare number of seconds.
    pub fn parse(input: &str) -> Result<Self, TimeSpecError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(TimeSpec::Clock(String::new()));
        }
        if trimmed.contains(':') {
            parse_clock(trimmed)?;
            return Ok(TimeSpec::Clock(trimmed.to_string()));
        }
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            let seconds = trimmed
                .parse()
                .map_err(|_| TimeSpecError::InvalidDelay(trimmed.to_string()))?;
            return Ok(TimeSpec::Delay(seconds));
        }
        Err(TimeSpecError::Unrecognized(input.to_string()))
    }

    /// Parse the persisted human description ("at HH:MM" / "in N seconds").
    ///
    /// Reloading a schedule re-derives its delay from this string, so the
    /// accepted forms match exactly what [`TimeSpec::content`] produces.
    pub fn from_content(content: &str) -> Result<Self, TimeSpecError> {
        if let Some(rest) = content.strip_prefix("at ") {
            return Self::parse(rest);
        }
        if let Some(rest) = content.strip_prefix("in ") {
            let seconds = rest.strip_suffix(" seconds").unwrap_or(rest);
            return Self::parse(seconds);
        }
        Self::parse(content)
    }

    /// The human description in the persisted and displayed form.
    pub fn content(&self) -> String {
        match self {
            TimeSpec::Clock(target) => format!("at {}", target),
            TimeSpec::Delay(seconds) => format!("in {} seconds", seconds),
        }
    }

    /// Seconds until the first firing, given the current local wall-clock
    /// time. Clock targets were validated at parse time, so this cannot
    /// fail.
    pub fn delay_seconds(&self, now: NaiveTime) -> u64 {
        match self {
            TimeSpec::Clock(target) => seconds_until(target, now).unwrap_or(0),
            TimeSpec::Delay(seconds) => *seconds,
        }
    }
}

/// Seconds from `now` until the next occurrence of `target` ("HH:MM",
/// 24-hour). An empty target means now. Past targets wrap to the next day,
/// so the result is always in `0..86400`.
pub fn seconds_until(target: &str, now: NaiveTime) -> Result<u64, TimeSpecError> {
    if target.is_empty() {
        return Ok(0);
    }
    let (hour, minute) = parse_clock(target)?;
    let mut delta = (i64::from(hour) - i64::from(now.hour())) * 3600
        + (i64::from(minute) - i64::from(now.minute())) * 60
        - i64::from(now.second());
    if delta < 0 {
        delta += DAY_SECONDS as i64;
    }
    Ok(delta as u64)
}

fn parse_clock(target: &str) -> Result<(u32, u32), TimeSpecError> {
    let invalid = || TimeSpecError::InvalidClock(target.to_string());

    let mut parts = target.split(':');
    let hour: u32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    let minute: u32 = parts
        .next()
        .and_then(|p| p.parse().ok())
        .ok_or_else(invalid)?;
    if parts.next().is_some() || hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok((hour, minute))
}
