//! Slide records and the persisted snapshot shape.
//!
//! A snapshot is a JSON array of `{slide_number, start_time, end_time, notes}`.
//! Older snapshots store `slide_number` as a string and tables exported from
//! the records editor use display column names; both are accepted on read.
//! Snapshots are always written with an integer `slide_number`.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    #[serde(alias = "Slide Number", deserialize_with = "slide_number_from_any")]
    pub slide_number: u32,
    #[serde(alias = "Start Time")]
    pub start_time: String,
    #[serde(alias = "End Time")]
    pub end_time: String,
    #[serde(alias = "Notes", default, deserialize_with = "notes_or_empty")]
    pub notes: String,
}

impl Record {
    pub fn new(
        slide_number: u32,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            slide_number,
            start_time: start_time.into(),
            end_time: end_time.into(),
            notes: notes.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SlideNumberRepr {
    Int(u64),
    Float(f64),
    Text(String),
}

fn slide_number_from_any<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match SlideNumberRepr::deserialize(deserializer)? {
        SlideNumberRepr::Int(n) => n,
        // The table editor hands back whole numbers as floats.
        SlideNumberRepr::Float(f) if f >= 0.0 && f.fract() == 0.0 => f as u64,
        SlideNumberRepr::Float(f) => {
            return Err(de::Error::custom(format!(
                "slide number {f} is not a whole number"
            )))
        }
        SlideNumberRepr::Text(text) => text.trim().parse::<u64>().map_err(|_| {
            de::Error::custom(format!("slide number '{text}' is not numeric"))
        })?,
    };

    u32::try_from(raw).map_err(|_| de::Error::custom(format!("slide number {raw} is too large")))
}

fn notes_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn decode_snapshot(value: Value) -> Result<Vec<Record>, serde_json::Error> {
    serde_json::from_value(value)
}

pub fn encode_snapshot(records: &[Record]) -> Result<Value, serde_json::Error> {
    serde_json::to_value(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_legacy_string_slide_numbers() {
        let value = json!([
            {"slide_number": "1", "start_time": "00:00:00.000", "end_time": "00:00:05.000", "notes": ""},
            {"slide_number": 2, "start_time": "00:00:05.000", "end_time": "00:00:12.000", "notes": "demo"}
        ]);

        let records = decode_snapshot(value).unwrap();
        assert_eq!(
            records,
            vec![
                Record::new(1, "00:00:00.000", "00:00:05.000", ""),
                Record::new(2, "00:00:05.000", "00:00:12.000", "demo"),
            ]
        );
    }

    #[test]
    fn decodes_editor_column_names_and_missing_notes() {
        let value = json!([
            {"Slide Number": 3.0, "Start Time": "00:01:00.000", "End Time": "00:02:00.000", "Notes": null},
            {"slide_number": " 4 ", "start_time": "00:02:00.000", "end_time": "00:03:00.000"}
        ]);

        let records = decode_snapshot(value).unwrap();
        assert_eq!(records[0], Record::new(3, "00:01:00.000", "00:02:00.000", ""));
        assert_eq!(records[1].slide_number, 4);
        assert_eq!(records[1].notes, "");
    }

    #[test]
    fn rejects_non_numeric_slide_numbers() {
        let value = json!([
            {"slide_number": "intro", "start_time": "00:00:00.000", "end_time": "00:00:01.000", "notes": ""}
        ]);
        assert!(decode_snapshot(value).is_err());

        let value = json!([
            {"slide_number": 1.5, "start_time": "00:00:00.000", "end_time": "00:00:01.000", "notes": ""}
        ]);
        assert!(decode_snapshot(value).is_err());
    }

    #[test]
    fn rejects_documents_that_are_not_record_lists() {
        assert!(decode_snapshot(json!({"slide_number": 1})).is_err());
        assert!(decode_snapshot(json!([{"slide_number": 1}])).is_err());
    }

    #[test]
    fn encodes_integer_slide_numbers() {
        let value = encode_snapshot(&[Record::new(7, "00:00:00.000", "00:00:01.000", "x")]).unwrap();
        assert_eq!(
            value,
            json!([{"slide_number": 7, "start_time": "00:00:00.000", "end_time": "00:00:01.000", "notes": "x"}])
        );
    }
}
