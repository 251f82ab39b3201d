use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::timecode;

static TIME_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{2}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{2}:\d{2}:\d{2}[,.]\d{3})")
        .expect("SRT time line pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleCue {
    /// Index line exactly as written in the file.
    pub index: String,
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedBlock {
    /// 1-based position of the block in the document.
    pub block_number: usize,
    pub index: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrtDocument {
    pub cues: Vec<SubtitleCue>,
    pub skipped: Vec<SkippedBlock>,
}

/// Parses an SRT document. Malformed blocks are skipped and reported, never fatal.
pub fn parse_srt(input: &str) -> SrtDocument {
    let normalized = input
        .strip_prefix('\u{feff}')
        .unwrap_or(input)
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let mut document = SrtDocument::default();
    for (position, block) in blocks(&normalized).into_iter().enumerate() {
        let block_number = position + 1;
        match parse_block(&block) {
            Ok(cue) => document.cues.push(cue),
            Err(reason) => {
                warn!("Skipping subtitle block {block_number}: {reason}");
                document.skipped.push(SkippedBlock {
                    block_number,
                    index: block.first().map(|line| line.trim().to_string()),
                    reason,
                });
            }
        }
    }
    document
}

fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_block(lines: &[&str]) -> Result<SubtitleCue, String> {
    if lines.len() < 3 {
        return Err(format!(
            "expected index, time and text lines, found {} line(s)",
            lines.len()
        ));
    }

    let captures = TIME_LINE
        .captures(lines[1])
        .ok_or_else(|| format!("malformed time line '{}'", lines[1].trim()))?;
    let start_time = timecode::parse(&captures[1]).map_err(|err| err.to_string())?;
    let end_time = timecode::parse(&captures[2]).map_err(|err| err.to_string())?;

    let text = lines[2..]
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(SubtitleCue {
        index: lines[0].trim().to_string(),
        start_time,
        end_time,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cues_and_flattens_text() {
        let doc = parse_srt(
            "1\n00:00:01,000 --> 00:00:04,500\nhello\nthere\n\n2\n00:00:05.000 --> 00:00:06.000\nworld\n",
        );
        assert!(doc.skipped.is_empty());
        assert_eq!(doc.cues.len(), 2);
        assert_eq!(doc.cues[0].index, "1");
        assert_eq!(doc.cues[0].start_time, 1.0);
        assert_eq!(doc.cues[0].end_time, 4.5);
        assert_eq!(doc.cues[0].text, "hello there");
        assert_eq!(doc.cues[1].text, "world");
    }

    #[test]
    fn tolerates_crlf_bom_and_extra_blank_lines() {
        let doc = parse_srt("\u{feff}7\r\n00:01:00,000 --> 00:01:02,000\r\nline\r\n\r\n\r\n\r\n8\r\n00:01:03,000 --> 00:01:04,000\r\nnext\r\n");
        assert_eq!(doc.cues.len(), 2);
        assert_eq!(doc.cues[0].index, "7");
        assert_eq!(doc.cues[1].start_time, 63.0);
    }

    #[test]
    fn malformed_time_line_is_skipped_and_reported() {
        let doc = parse_srt(
            "1\nbad --> line\noops\n\n2\n00:00:06,000 --> 00:00:11,000\nworld\n\n3\n00:00:12,000\n",
        );
        assert_eq!(doc.cues.len(), 1);
        assert_eq!(doc.cues[0].text, "world");

        assert_eq!(doc.skipped.len(), 2);
        assert_eq!(doc.skipped[0].block_number, 1);
        assert_eq!(doc.skipped[0].index.as_deref(), Some("1"));
        assert!(doc.skipped[0].reason.contains("bad --> line"));
        assert_eq!(doc.skipped[1].block_number, 3);
    }

    #[test]
    fn out_of_range_timestamp_is_skipped() {
        let doc = parse_srt("1\n00:00:61,000 --> 00:00:62,000\ntext\n");
        assert!(doc.cues.is_empty());
        assert_eq!(doc.skipped.len(), 1);
    }

    #[test]
    fn empty_input_has_no_cues() {
        assert_eq!(parse_srt(""), SrtDocument::default());
        assert_eq!(parse_srt("\n\n  \n"), SrtDocument::default());
    }
}
