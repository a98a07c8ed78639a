//! # Weekly Scheduler
//!
//! Runs the prediction pipeline at fixed weekday/time slots (by default
//! Monday 11:00 and Friday 15:00, KST). Each run requests a batch of the
//! configured size without a requester; failures are logged and the loop
//! carries on to the next slot.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, TimeZone, Utc, Weekday};
use lotto_generation::PredictionApi;
use lotto_telemetry::{log_batch_event, log_event};
use tokio::sync::watch;

use crate::config::{ConfigError, SchedulerConfig};

const SUBSYSTEM: &str = "scheduler";

/// One weekly firing time, in the scheduler's local offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSlot {
    weekday: Weekday,
    time: NaiveTime,
}

impl ScheduleSlot {
    pub fn new(weekday: Weekday, hour: u32, minute: u32) -> Option<Self> {
        Some(Self {
            weekday,
            time: NaiveTime::from_hms_opt(hour, minute, 0)?,
        })
    }

    /// Monday 11:00 and Friday 15:00
    pub fn defaults() -> Vec<Self> {
        [(Weekday::Mon, 11), (Weekday::Fri, 15)]
            .into_iter()
            .filter_map(|(day, hour)| Self::new(day, hour, 0))
            .collect()
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    /// First occurrence strictly after `now`, in `now`'s offset.
    pub fn next_after(&self, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        let offset = *now.offset();
        let today = now.date_naive();
        (0..=7u64)
            .filter_map(|days| today.checked_add_days(chrono::Days::new(days)))
            .filter(|date| date.weekday() == self.weekday)
            .filter_map(|date| offset.from_local_datetime(&date.and_time(self.time)).single())
            .find(|candidate| *candidate > now)
    }
}

impl fmt::Display for ScheduleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.weekday, self.time.format("%H:%M"))
    }
}

/// Parses `mon@11:00`.
impl FromStr for ScheduleSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, time) = s
            .trim()
            .split_once('@')
            .ok_or_else(|| format!("'{}' is not of the form <weekday>@<HH:MM>", s))?;
        let weekday = day
            .parse::<Weekday>()
            .map_err(|_| format!("'{}' is not a weekday", day))?;
        let time = NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|e| format!("'{}' is not a HH:MM time: {}", time, e))?;
        Ok(Self { weekday, time })
    }
}

/// Fires the pipeline at each slot until shut down.
pub struct WeeklyScheduler {
    api: Arc<dyn PredictionApi>,
    slots: Vec<ScheduleSlot>,
    offset: FixedOffset,
    batch_size: usize,
}

impl WeeklyScheduler {
    pub fn new(api: Arc<dyn PredictionApi>, config: &SchedulerConfig) -> Result<Self, ConfigError> {
        let offset = FixedOffset::east_opt(config.utc_offset_hours * 3600).ok_or_else(|| {
            ConfigError::Validation(format!(
                "UTC offset {} hours is out of range",
                config.utc_offset_hours
            ))
        })?;
        Ok(Self {
            api,
            slots: config.slots.clone(),
            offset,
            batch_size: config.batch_size,
        })
    }

    /// Earliest slot strictly after `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local = now.with_timezone(&self.offset);
        self.slots
            .iter()
            .filter_map(|slot| slot.next_after(local))
            .min()
            .map(|next| next.with_timezone(&Utc))
    }

    /// Run the pipeline once; `true` if a batch was generated.
    pub async fn run_once(&self) -> bool {
        match self.api.generate_predictions(self.batch_size, None).await {
            Ok(outcome) => {
                log_batch_event!(
                    info,
                    SUBSYSTEM,
                    "Scheduled batch generated",
                    outcome.batch,
                    target_draw = ?outcome.batch.target_draw,
                    notified = outcome.notified
                );
                true
            }
            Err(e) => {
                log_event!(error, SUBSYSTEM, "Scheduled batch failed", error = %e);
                false
            }
        }
    }

    /// Loop until `shutdown` flips.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let slots: Vec<String> = self.slots.iter().map(ToString::to_string).collect();
        log_event!(
            info,
            SUBSYSTEM,
            "Scheduler started",
            slots = ?slots,
            offset = %self.offset,
            batch_size = self.batch_size
        );

        // Never fire the same slot twice if the timer wakes slightly early.
        let mut cursor = Utc::now();
        loop {
            let now = Utc::now().max(cursor);
            let Some(next) = self.next_run_after(now) else {
                log_event!(warn, SUBSYSTEM, "No upcoming slot, scheduler stopping");
                return;
            };
            let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            log_event!(debug, SUBSYSTEM, "Next scheduled run", at = %next, wait_secs = wait.as_secs());

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    cursor = next;
                    self.run_once().await;
                }
                _ = shutdown.changed() => {
                    log_event!(info, SUBSYSTEM, "Shutdown signal received");
                    return;
                }
            }
        }
    }
}
