use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveTime, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::messages::MessageKind;
use crate::util::config::ScheduleConfig;

/// One `[[schedule.jobs]]` entry as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub message: MessageKind,
    /// Weekday names, e.g. `["mon", "fri"]`.
    pub days: Vec<String>,
    /// Local time of day, `HH:MM`.
    pub at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("utc_offset_minutes {0} is out of range")]
    InvalidOffset(i32),
    #[error("unknown weekday `{0}`")]
    InvalidDay(String),
    #[error("invalid time `{0}`, expected HH:MM")]
    InvalidTime(String),
    #[error("{0} job has no days")]
    NoDays(MessageKind),
}

#[derive(Debug, Clone)]
pub struct Job {
    pub kind: MessageKind,
    pub days: Vec<Weekday>,
    pub at: NaiveTime,
}

#[derive(Debug, Clone)]
pub struct Schedule {
    offset: FixedOffset,
    jobs: Vec<Job>,
}

impl Schedule {
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, ScheduleError> {
        let offset = FixedOffset::east_opt(config.utc_offset_minutes.saturating_mul(60))
            .ok_or(ScheduleError::InvalidOffset(config.utc_offset_minutes))?;

        let jobs = config
            .jobs
            .iter()
            .map(parse_job)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { offset, jobs })
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// The first instant strictly after `after` at which a job fires. When two
    /// jobs fire at the same instant the one listed first wins.
    pub fn next_run(&self, after: DateTime<Utc>) -> Option<(DateTime<Utc>, MessageKind)> {
        let local_today = after.with_timezone(&self.offset).date_naive();
        let mut best: Option<(DateTime<Utc>, MessageKind)> = None;

        for job in &self.jobs {
            for ahead in 0..=7 {
                let Some(date) = local_today.checked_add_days(Days::new(ahead)) else {
                    break;
                };
                if !job.days.contains(&date.weekday()) {
                    continue;
                }
                let Some(at) = self
                    .offset
                    .from_local_datetime(&date.and_time(job.at))
                    .single()
                else {
                    continue;
                };
                let at = at.with_timezone(&Utc);
                if at <= after {
                    continue;
                }
                if best.is_none_or(|(current, _)| at < current) {
                    best = Some((at, job.kind));
                }
                break;
            }
        }

        best
    }
}

fn parse_job(job: &JobConfig) -> Result<Job, ScheduleError> {
    if job.days.is_empty() {
        return Err(ScheduleError::NoDays(job.message));
    }
    let days = job
        .days
        .iter()
        .map(|d| {
            d.trim()
                .parse::<Weekday>()
                .map_err(|_| ScheduleError::InvalidDay(d.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let at = NaiveTime::parse_from_str(job.at.trim(), "%H:%M")
        .map_err(|_| ScheduleError::InvalidTime(job.at.clone()))?;

    Ok(Job {
        kind: job.message,
        days,
        at,
    })
}
