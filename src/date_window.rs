//! Selectable forecast dates: today up to a fixed number of days ahead

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::{Result, WindcastError};

/// Current wall-clock time in the forecast timezone
#[must_use]
pub fn local_now(timezone: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&timezone).naive_local()
}

/// Inclusive range of dates a user may pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    today: NaiveDate,
    last: NaiveDate,
}

impl DateWindow {
    #[must_use]
    pub fn new(today: NaiveDate, max_days_ahead: u32) -> Self {
        let last = today
            .checked_add_days(Days::new(u64::from(max_days_ahead)))
            .unwrap_or(NaiveDate::MAX);
        Self { today, last }
    }

    /// Window anchored on today's date in `timezone`
    #[must_use]
    pub fn starting_now(timezone: Tz, max_days_ahead: u32) -> Self {
        Self::new(local_now(timezone).date(), max_days_ahead)
    }

    /// Window anchored on the local date of an arbitrary instant
    #[must_use]
    pub fn at(instant: DateTime<Utc>, timezone: Tz, max_days_ahead: u32) -> Self {
        Self::new(instant.with_timezone(&timezone).date_naive(), max_days_ahead)
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    #[must_use]
    pub fn last(&self) -> NaiveDate {
        self.last
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.today..=self.last).contains(&date)
    }

    /// Validate a date against the window
    pub fn check(&self, date: NaiveDate) -> Result<NaiveDate> {
        if self.contains(date) {
            Ok(date)
        } else {
            Err(WindcastError::validation(format!(
                "Date {date} is outside the forecast window {} to {}",
                self.today, self.last
            )))
        }
    }

    /// Parse user input: `YYYY-MM-DD`, `DD/MM/YYYY`, `today` or `tomorrow`
    pub fn parse(&self, input: &str) -> Result<NaiveDate> {
        let input = input.trim();
        let date = match input.to_ascii_lowercase().as_str() {
            "" | "today" => self.today,
            "tomorrow" => self
                .today
                .succ_opt()
                .ok_or_else(|| WindcastError::validation("No date after today"))?,
            _ => NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
                .map_err(|_| {
                    WindcastError::validation(format!(
                        "Cannot parse '{input}' as a date (expected YYYY-MM-DD)"
                    ))
                })?,
        };
        self.check(date)
    }
}
