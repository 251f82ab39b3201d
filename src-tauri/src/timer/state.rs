use chrono::{Duration, NaiveDateTime, NaiveTime};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{TimeFormatError, TimerError};
use crate::records::Record;
use crate::timecode::{self, ZERO_TIMESTAMP};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    Stopped,
    Running,
    Paused,
}

impl Default for TimerStatus {
    fn default() -> Self {
        TimerStatus::Stopped
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub status: TimerStatus,
    /// Time accumulated from earlier running windows; combines with
    /// `run_started_at` to compute the true elapsed time.
    pub elapsed_ms: f64,
    pub run_started_at: Option<NaiveDateTime>,
    /// Wall-clock instant the elapsed time is added to for display.
    pub origin_time: Option<NaiveDateTime>,
    /// End of the last recorded slide; start of the next one.
    pub last_boundary: Option<String>,
    pub next_slide_number: u32,
    /// Last value published to the Start Time field. A start request with a
    /// different value is an edit and re-anchors the session.
    pub start_time_field: String,
    pub records: Vec<Record>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            status: TimerStatus::Stopped,
            elapsed_ms: 0.0,
            run_started_at: None,
            origin_time: None,
            last_boundary: None,
            next_slide_number: 1,
            start_time_field: ZERO_TIMESTAMP.to_string(),
            records: Vec::new(),
        }
    }
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn start_label(&self) -> &'static str {
        if self.elapsed_ms > 0.0 && !self.is_running() {
            "Resume"
        } else {
            "Start"
        }
    }

    pub fn current_elapsed_ms(&self, now: NaiveDateTime) -> f64 {
        match (self.status, self.run_started_at) {
            (TimerStatus::Running, Some(anchor)) => self.elapsed_ms + millis_between(anchor, now),
            _ => self.elapsed_ms,
        }
    }

    pub fn current_absolute_time(&self, now: NaiveDateTime) -> String {
        let elapsed = self.current_elapsed_ms(now);
        match self.origin_time {
            Some(origin) => timecode::format_time_of_day((origin + duration_from_ms(elapsed)).time()),
            None => timecode::format_duration(elapsed),
        }
    }

    /// Starts or resumes the timer.
    ///
    /// A malformed start time never fails the call: the session is anchored at
    /// midnight with zero elapsed time and the parse error is handed back as a
    /// warning for the caller to display.
    pub fn start(
        &mut self,
        start_time_input: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<Option<TimeFormatError>, TimerError> {
        if self.is_running() {
            return Err(TimerError::AlreadyRunning);
        }

        let mut warning = None;
        match start_time_input.map(str::trim) {
            Some(input) if input != self.start_time_field => {
                match timecode::parse_time_of_day(input) {
                    Ok(time) => {
                        let origin = anchor_at_or_before(now, time);
                        self.origin_time = Some(origin);
                        self.elapsed_ms = 0.0;
                        self.last_boundary = Some(timecode::format_time_of_day(origin.time()));
                        self.start_time_field = input.to_string();
                    }
                    Err(err) => {
                        warn!("Start time rejected, anchoring session at midnight: {err}");
                        self.origin_time = Some(midnight_of(now));
                        self.elapsed_ms = 0.0;
                        self.last_boundary = Some(ZERO_TIMESTAMP.to_string());
                        self.start_time_field = ZERO_TIMESTAMP.to_string();
                        warning = Some(err);
                    }
                }
            }
            _ => {
                if self.origin_time.is_none() {
                    let time = timecode::parse_time_of_day(&self.start_time_field)
                        .unwrap_or(NaiveTime::MIN);
                    self.origin_time = Some(anchor_at_or_before(now, time));
                }
            }
        }

        self.run_started_at = Some(now);
        self.status = TimerStatus::Running;
        Ok(warning)
    }

    pub fn pause(&mut self, now: NaiveDateTime) -> Result<(), TimerError> {
        if !self.is_running() {
            return Err(TimerError::NotRunning);
        }

        self.elapsed_ms = self.current_elapsed_ms(now);
        self.run_started_at = None;
        self.status = TimerStatus::Paused;
        self.start_time_field = self.current_absolute_time(now);
        Ok(())
    }

    /// Closes the current slide at the displayed time. Does not change the
    /// running state.
    pub fn record(
        &mut self,
        slide_number: Option<u32>,
        notes: impl Into<String>,
        now: NaiveDateTime,
    ) -> Record {
        let origin = *self.origin_time.get_or_insert_with(|| midnight_of(now));
        let end_time = self.current_absolute_time(now);
        let start_time = self
            .last_boundary
            .clone()
            .unwrap_or_else(|| timecode::format_time_of_day(origin.time()));
        let slide_number = slide_number.unwrap_or(self.next_slide_number);

        let record = Record::new(slide_number, start_time, end_time.clone(), notes);
        self.records.push(record.clone());
        self.last_boundary = Some(end_time);
        self.next_slide_number = slide_number.saturating_add(1);
        record
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replaces the session with previously saved records. The timer resumes
    /// from the last record's end time with no additional elapsed time.
    pub fn load(&mut self, records: Vec<Record>, now: NaiveDateTime) -> Result<(), TimerError> {
        if self.status != TimerStatus::Stopped {
            return Err(TimerError::SessionActive);
        }

        *self = Self::default();
        let Some(last) = records.last() else {
            return Ok(());
        };

        self.next_slide_number = records
            .iter()
            .map(|r| r.slide_number)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        self.last_boundary = Some(last.end_time.clone());

        match timecode::parse_time_of_day(&last.end_time) {
            Ok(time) => {
                self.origin_time = Some(anchor_at_or_before(now, time));
                self.start_time_field = timecode::format_time_of_day(time);
            }
            Err(err) => {
                warn!("Loaded records end with an unreadable time, timer origin cleared: {err}");
            }
        }

        self.records = records;
        Ok(())
    }

    pub fn update_record(&mut self, index: usize, record: Record) -> Result<(), TimerError> {
        let len = self.records.len();
        let slot = self
            .records
            .get_mut(index)
            .ok_or(TimerError::RecordIndex { index, len })?;
        *slot = record;
        Ok(())
    }

    pub fn insert_record(&mut self, index: usize, record: Record) -> Result<(), TimerError> {
        let len = self.records.len();
        if index > len {
            return Err(TimerError::RecordIndex { index, len });
        }
        self.records.insert(index, record);
        Ok(())
    }

    pub fn remove_record(&mut self, index: usize) -> Result<Record, TimerError> {
        let len = self.records.len();
        if index >= len {
            return Err(TimerError::RecordIndex { index, len });
        }
        Ok(self.records.remove(index))
    }

    pub fn replace_records(&mut self, records: Vec<Record>) {
        self.records = records;
    }
}

fn millis_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let delta = to - from;
    let millis = delta
        .num_microseconds()
        .map(|us| us as f64 / 1000.0)
        .unwrap_or_else(|| delta.num_milliseconds() as f64);
    millis.max(0.0)
}

fn duration_from_ms(ms: f64) -> Duration {
    Duration::microseconds((ms * 1000.0).round() as i64)
}

fn midnight_of(now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(NaiveTime::MIN)
}

/// Places `time` on `now`'s date, one day earlier if that would be in the
/// future (sessions that cross midnight).
fn anchor_at_or_before(now: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    let candidate = now.date().and_time(time);
    if candidate > now {
        candidate - Duration::days(1)
    } else {
        candidate
    }
}
