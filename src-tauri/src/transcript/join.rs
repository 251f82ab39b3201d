use log::warn;
use serde::{Deserialize, Serialize};

use super::srt::SubtitleCue;
use crate::{records::Record, timecode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptRow {
    pub slide_number: u32,
    pub text: String,
}

/// Buckets every cue fully contained in a record's interval under that record.
///
/// Records keep their given order. Cues straddling a boundary belong to
/// neither neighbour, and records with no matching cue produce no row.
pub fn join(records: &[Record], cues: &[SubtitleCue]) -> Vec<TranscriptRow> {
    let mut rows = Vec::new();

    for record in records {
        let (start, end) = match (
            timecode::parse(&record.start_time),
            timecode::parse(&record.end_time),
        ) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(err), _) | (_, Err(err)) => {
                warn!(
                    "Skipping slide {} in transcript join: {err}",
                    record.slide_number
                );
                continue;
            }
        };

        let text = cues
            .iter()
            .filter(|cue| cue.start_time >= start && cue.end_time <= end)
            .map(|cue| cue.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        if !text.is_empty() {
            rows.push(TranscriptRow {
                slide_number: record.slide_number,
                text,
            });
        }
    }

    rows
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    #[default]
    Markdown,
    Plain,
}

pub fn render(rows: &[TranscriptRow], format: TranscriptFormat) -> String {
    match format {
        TranscriptFormat::Markdown => render_markdown(rows),
        TranscriptFormat::Plain => render_plain(rows),
    }
}

pub fn render_markdown(rows: &[TranscriptRow]) -> String {
    rows.iter()
        .map(|row| format!("### Slide {}\n\n{}\n", row.slide_number, row.text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_plain(rows: &[TranscriptRow]) -> String {
    rows.iter()
        .map(|row| format!("Slide {}: {}", row.slide_number, row.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(start: f64, end: f64, text: &str) -> SubtitleCue {
        SubtitleCue {
            index: "0".into(),
            start_time: start,
            end_time: end,
            text: text.into(),
        }
    }

    #[test]
    fn containment_is_inclusive_on_both_ends() {
        let cues = [cue(5.0, 8.0, "inside")];
        let wide = [Record::new(1, "00:00:00.000", "00:00:10.000", "")];
        let narrow = [Record::new(1, "00:00:00.000", "00:00:07.000", "")];
        let exact = [Record::new(1, "00:00:05.000", "00:00:08.000", "")];

        assert_eq!(join(&wide, &cues)[0].text, "inside");
        assert!(join(&narrow, &cues).is_empty());
        assert_eq!(join(&exact, &cues)[0].text, "inside");
    }

    #[test]
    fn straddling_cue_belongs_to_neither_slide() {
        let records = [
            Record::new(1, "00:00:00.000", "00:00:05.000", ""),
            Record::new(2, "00:00:05.000", "00:00:10.000", ""),
        ];
        let cues = [cue(1.0, 2.0, "a"), cue(4.0, 6.0, "edge"), cue(6.0, 7.0, "b")];

        let rows = join(&records, &cues);
        assert_eq!(
            rows,
            vec![
                TranscriptRow { slide_number: 1, text: "a".into() },
                TranscriptRow { slide_number: 2, text: "b".into() },
            ]
        );
    }

    #[test]
    fn keeps_record_order_and_cue_order() {
        let records = [
            Record::new(3, "00:00:10.000", "00:00:20.000", ""),
            Record::new(1, "00:00:00.000", "00:00:10.000", ""),
        ];
        let cues = [cue(1.0, 2.0, "one"), cue(3.0, 4.0, "two"), cue(11.0, 12.0, "three")];

        let rows = join(&records, &cues);
        assert_eq!(rows[0].slide_number, 3);
        assert_eq!(rows[1].text, "one two");
    }

    #[test]
    fn unparsable_record_is_skipped() {
        let records = [
            Record::new(1, "soon", "00:00:05.000", ""),
            Record::new(2, "00:00:05.000", "00:00:09.000", ""),
        ];
        let rows = join(&records, &[cue(1.0, 2.0, "lost"), cue(6.0, 7.0, "kept")]);
        assert_eq!(rows, vec![TranscriptRow { slide_number: 2, text: "kept".into() }]);
    }

    #[test]
    fn renders_slide_listing() {
        let rows = vec![
            TranscriptRow { slide_number: 1, text: "hello".into() },
            TranscriptRow { slide_number: 4, text: "world".into() },
        ];
        assert_eq!(render_plain(&rows), "Slide 1: hello\nSlide 4: world");
        assert_eq!(
            render_markdown(&rows),
            "### Slide 1\n\nhello\n\n### Slide 4\n\nworld\n"
        );
        assert_eq!(render_plain(&[]), "");
        assert_eq!(render(&rows, TranscriptFormat::Plain), render_plain(&rows));
        assert_eq!(render(&rows, TranscriptFormat::default()), render_markdown(&rows));
    }
}
