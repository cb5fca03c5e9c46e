//! Time source used by the loan workflow and catalog validation

use chrono::{DateTime, NaiveDate, Utc};

/// Provides the current instant. Services never call `Utc::now()` directly
/// so tests can pin the date.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
