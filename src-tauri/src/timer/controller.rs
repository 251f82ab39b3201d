use std::sync::Arc;

use chrono::{FixedOffset, NaiveDateTime};
use log::info;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    clock::Clock,
    error::TimerError,
    library::Library,
    records::Record,
    storage::{lecture_prefix, snapshot_file_name, SnapshotZone},
    transcript::{build_transcript, Transcript},
};

use super::{TimerState, TimerStatus};

/// What the timer screen is currently working on.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub lecture: Option<String>,
    pub timer: TimerState,
    /// Key the records were opened from or last saved to.
    pub snapshot_key: Option<String>,
    /// UTC offset pinned when the timer leaves `Stopped`. Every reading of a
    /// session is taken in this offset so a DST change cannot shift elapsed time.
    pub offset: Option<FixedOffset>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub lecture: Option<String>,
    pub snapshot_key: Option<String>,
    pub display_time: String,
    pub elapsed_ms: f64,
    pub start_label: &'static str,
    pub can_record: bool,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StartOutcome {
    pub snapshot: TimerSnapshot,
    /// Set when the typed start time was rejected and midnight was used instead.
    pub warning: Option<String>,
}

#[derive(Clone)]
pub struct TimerController {
    session: Arc<Mutex<SessionContext>>,
    clock: Arc<dyn Clock>,
    library: Arc<Library>,
    zone: SnapshotZone,
}

impl TimerController {
    pub fn new(clock: Arc<dyn Clock>, library: Arc<Library>, zone: SnapshotZone) -> Self {
        Self {
            session: Arc::new(Mutex::new(SessionContext::default())),
            clock,
            library,
            zone,
        }
    }

    fn now_for(&self, session: &SessionContext) -> NaiveDateTime {
        let instant = self.clock.now();
        match session.offset {
            Some(offset) => instant.with_timezone(&offset).naive_local(),
            None => instant.naive_local(),
        }
    }

    fn snapshot_of(session: &SessionContext, now: NaiveDateTime) -> TimerSnapshot {
        TimerSnapshot {
            state: session.timer.clone(),
            lecture: session.lecture.clone(),
            snapshot_key: session.snapshot_key.clone(),
            display_time: session.timer.current_absolute_time(now),
            elapsed_ms: session.timer.current_elapsed_ms(now),
            start_label: session.timer.start_label(),
            can_record: session.lecture.is_some(),
        }
    }

    pub async fn get_snapshot(&self) -> TimerSnapshot {
        let session = self.session.lock().await;
        Self::snapshot_of(&session, self.now_for(&session))
    }

    /// Picks the catalogued lecture later saves go to. Not allowed while the
    /// timer runs.
    pub async fn select_lecture(&self, lecture: Option<String>) -> Result<TimerSnapshot, TimerError> {
        let mut session = self.session.lock().await;
        if session.timer.is_running() {
            return Err(TimerError::SessionActive);
        }

        let lecture = match lecture.as_deref().map(str::trim).filter(|name| !name.is_empty()) {
            Some(name) => Some(self.library.require_lecture(name).await?),
            None => None,
        };
        if session.lecture != lecture {
            session.snapshot_key = None;
        }
        session.lecture = lecture;
        Ok(Self::snapshot_of(&session, self.now_for(&session)))
    }

    pub async fn start_timer(&self, start_time: Option<String>) -> Result<StartOutcome, TimerError> {
        let mut session = self.session.lock().await;
        if session.timer.status == TimerStatus::Stopped {
            session.offset = Some(*self.clock.now().offset());
        }
        let now = self.now_for(&session);
        let warning = session.timer.start(start_time.as_deref(), now)?;

        info!(
            "Timer started at {} for {}",
            session.timer.current_absolute_time(now),
            session.lecture.as_deref().unwrap_or("no lecture")
        );

        Ok(StartOutcome {
            snapshot: Self::snapshot_of(&session, now),
            warning: warning.map(|err| err.to_string()),
        })
    }

    pub async fn pause_timer(&self) -> Result<TimerSnapshot, TimerError> {
        let mut session = self.session.lock().await;
        let now = self.now_for(&session);
        session.timer.pause(now)?;
        Ok(Self::snapshot_of(&session, now))
    }

    pub async fn reset_timer(&self) -> TimerSnapshot {
        let mut session = self.session.lock().await;
        session.timer.reset();
        session.snapshot_key = None;
        session.offset = None;
        info!("Timer reset");
        Self::snapshot_of(&session, self.now_for(&session))
    }

    /// Closes the current slide. Needs a selected lecture.
    pub async fn record_slide(
        &self,
        slide_number: Option<u32>,
        notes: String,
    ) -> Result<Record, TimerError> {
        let mut session = self.session.lock().await;
        if session.lecture.is_none() {
            return Err(TimerError::MissingTarget);
        }
        let now = self.now_for(&session);
        Ok(session.timer.record(slide_number, notes, now))
    }

    pub async fn update_record(&self, index: usize, record: Record) -> Result<TimerSnapshot, TimerError> {
        let mut session = self.session.lock().await;
        session.timer.update_record(index, record)?;
        Ok(Self::snapshot_of(&session, self.now_for(&session)))
    }

    pub async fn insert_record(&self, index: usize, record: Record) -> Result<TimerSnapshot, TimerError> {
        let mut session = self.session.lock().await;
        session.timer.insert_record(index, record)?;
        Ok(Self::snapshot_of(&session, self.now_for(&session)))
    }

    pub async fn remove_record(&self, index: usize) -> Result<TimerSnapshot, TimerError> {
        let mut session = self.session.lock().await;
        session.timer.remove_record(index)?;
        Ok(Self::snapshot_of(&session, self.now_for(&session)))
    }

    pub async fn replace_records(&self, records: Vec<Record>) -> TimerSnapshot {
        let mut session = self.session.lock().await;
        session.timer.replace_records(records);
        Self::snapshot_of(&session, self.now_for(&session))
    }

    /// Writes the current records under a fresh timestamped key. The lecture
    /// must still be in the catalogue.
    pub async fn save_session(&self) -> Result<String, TimerError> {
        let (lecture, records) = {
            let session = self.session.lock().await;
            let lecture = session.lecture.clone().ok_or(TimerError::MissingTarget)?;
            if session.timer.records.is_empty() {
                return Err(TimerError::NoRecords);
            }
            (lecture, session.timer.records.clone())
        };

        let lecture = self.library.require_lecture(&lecture).await?;
        let file_name = snapshot_file_name(self.zone.wall_time(self.clock.now()));
        let entry = self
            .library
            .save_snapshot(&lecture, &file_name, &records)
            .await?;

        self.session.lock().await.snapshot_key = Some(entry.key.clone());
        Ok(entry.key)
    }

    /// Opens a saved snapshot of the selected lecture. `None` starts a new
    /// session instead. A missing snapshot opens as an empty session.
    pub async fn open_snapshot(&self, file_name: Option<String>) -> Result<TimerSnapshot, TimerError> {
        let Some(file_name) = file_name else {
            return Ok(self.new_session().await);
        };

        let lecture = {
            let session = self.session.lock().await;
            if session.timer.status != TimerStatus::Stopped {
                return Err(TimerError::SessionActive);
            }
            session.lecture.clone().ok_or(TimerError::MissingTarget)?
        };

        let records = self.library.load_snapshot(&lecture, &file_name).await?;

        let mut session = self.session.lock().await;
        session.offset = None;
        let now = self.now_for(&session);
        session.timer.load(records, now)?;
        session.snapshot_key = Some(format!("{}{}", lecture_prefix(&lecture), file_name));
        Ok(Self::snapshot_of(&session, now))
    }

    pub async fn new_session(&self) -> TimerSnapshot {
        self.reset_timer().await
    }

    /// Joins the current records with an SRT document.
    pub async fn transcript(&self, srt: &str) -> Transcript {
        let session = self.session.lock().await;
        build_transcript(&session.timer.records, srt)
    }
}
