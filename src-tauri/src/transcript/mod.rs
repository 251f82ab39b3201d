//! Subtitle parsing and the slide/cue interval join.

#[cfg(feature = "gui")]
pub mod commands;
pub mod join;
pub mod srt;

use serde::{Deserialize, Serialize};

use crate::records::Record;

pub use join::{join, render, render_markdown, render_plain, TranscriptFormat, TranscriptRow};
pub use srt::{parse_srt, SkippedBlock, SrtDocument, SubtitleCue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub rows: Vec<TranscriptRow>,
    pub skipped: Vec<SkippedBlock>,
    pub cue_count: usize,
}

impl Transcript {
    pub fn render(&self, format: TranscriptFormat) -> String {
        render(&self.rows, format)
    }
}

pub fn build_transcript(records: &[Record], srt: &str) -> Transcript {
    let document = parse_srt(srt);
    Transcript {
        rows: join(records, &document.cues),
        cue_count: document.cues.len(),
        skipped: document.skipped,
    }
}
