//! Typed schedules and the job runner.
//!
//! The process assembles an explicit registry of (schedule, job) pairs at
//! startup and hands it to [`Scheduler::run`]. Each entry runs on its own
//! task; a failing run is logged and the loop keeps going.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Days, NaiveTime, Utc, Weekday};
use sqlx::SqlitePool;

use crate::api::CrmApi;
use crate::config::CrmConfig;
use crate::jobs::{CleanupJob, HeartbeatJob, Job, LowStockJob, RemindersJob, ReportJob};
use crate::sink::FileSink;

/// When a job fires. All wall-clock variants are UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// A fixed interval from the previous completion.
    Every(Duration),
    /// Once a day at this time.
    Daily {
        /// Fire time within the day.
        at: NaiveTime,
    },
    /// Once a week on this weekday at this time.
    Weekly {
        /// Fire day within the week.
        weekday: Weekday,
        /// Fire time within the day.
        at: NaiveTime,
    },
}

impl Schedule {
    /// The first fire instant strictly after `after`.
    ///
    /// Saturates at the maximum representable instant instead of wrapping,
    /// so an absurd interval parks the job rather than panicking.
    #[must_use]
    pub fn next_after(&self, after: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Every(interval) => chrono::Duration::from_std(*interval)
                .ok()
                .and_then(|delta| after.checked_add_signed(delta))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            Self::Daily { at } => {
                let today = after.date_naive().and_time(*at).and_utc();
                if today > after {
                    today
                } else {
                    today
                        .checked_add_days(Days::new(1))
                        .unwrap_or(DateTime::<Utc>::MAX_UTC)
                }
            }
            Self::Weekly { weekday, at } => {
                let days_ahead = u64::from(
                    (weekday.num_days_from_monday() + 7 - after.weekday().num_days_from_monday())
                        % 7,
                );
                let candidate = after
                    .date_naive()
                    .checked_add_days(Days::new(days_ahead))
                    .map(|date| date.and_time(*at).and_utc());
                match candidate {
                    Some(instant) if instant > after => instant,
                    Some(instant) => instant
                        .checked_add_days(Days::new(7))
                        .unwrap_or(DateTime::<Utc>::MAX_UTC),
                    None => DateTime::<Utc>::MAX_UTC,
                }
            }
        }
    }
}

/// One registry entry pairing a job with its schedule.
pub struct ScheduledJob {
    /// When the job fires.
    pub schedule: Schedule,
    /// What runs at each fire.
    pub job: Arc<dyn Job>,
}

/// Runs every registered job on its own schedule until the process stops.
pub struct Scheduler {
    entries: Vec<ScheduledJob>,
}

impl Scheduler {
    /// Scheduler over an explicit registry.
    #[must_use]
    pub fn new(entries: Vec<ScheduledJob>) -> Self {
        Self { entries }
    }

    /// Spawn one task per entry and supervise them forever.
    pub async fn run(self) {
        let mut handles = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            handles.push(tokio::spawn(run_entry(entry)));
        }
        for handle in handles {
            // Entry loops never return, so a join here means a panic.
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "Scheduler task terminated");
            }
        }
    }
}

async fn run_entry(entry: ScheduledJob) {
    loop {
        // The next fire is computed from the previous completion instant;
        // ticks that pass while a run is in flight are skipped, not queued.
        let now = Utc::now();
        let next = entry.schedule.next_after(now);
        let wait = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        let started = Utc::now();
        tracing::info!(job = entry.job.name(), "Job started");
        match entry.job.run(started).await {
            Ok(()) => tracing::info!(job = entry.job.name(), "Job finished"),
            Err(err) => tracing::error!(job = entry.job.name(), error = %err, "Job failed"),
        }
    }
}

/// The standard registry: report Monday 06:00, cleanup Sunday 02:00,
/// heartbeat every 5 minutes, restock every 12 hours, reminders daily at
/// 08:00, each writing to its configured sink.
#[must_use]
pub fn default_registry(pool: &SqlitePool, config: &CrmConfig) -> Vec<ScheduledJob> {
    let api = CrmApi::new(pool.clone());
    vec![
        ScheduledJob {
            schedule: Schedule::Weekly {
                weekday: Weekday::Mon,
                at: hms(6, 0),
            },
            job: Arc::new(ReportJob::new(
                pool.clone(),
                Arc::new(FileSink::new(config.report_log.clone())),
            )),
        },
        ScheduledJob {
            schedule: Schedule::Weekly {
                weekday: Weekday::Sun,
                at: hms(2, 0),
            },
            job: Arc::new(CleanupJob::new(
                pool.clone(),
                Arc::new(FileSink::new(config.cleanup_log.clone())),
            )),
        },
        ScheduledJob {
            schedule: Schedule::Every(Duration::from_secs(5 * 60)),
            job: Arc::new(HeartbeatJob::new(
                api.clone(),
                Arc::new(FileSink::new(config.heartbeat_log.clone())),
            )),
        },
        ScheduledJob {
            schedule: Schedule::Every(Duration::from_secs(12 * 60 * 60)),
            job: Arc::new(LowStockJob::new(
                api,
                Arc::new(FileSink::new(config.low_stock_log.clone())),
            )),
        },
        ScheduledJob {
            schedule: Schedule::Daily { at: hms(8, 0) },
            job: Arc::new(RemindersJob::new(
                pool.clone(),
                Arc::new(FileSink::new(config.reminders_log.clone())),
            )),
        },
    ]
}

const fn hms(hour: u32, minute: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(time) => time,
        None => panic!("invalid schedule time"),
    }
}
