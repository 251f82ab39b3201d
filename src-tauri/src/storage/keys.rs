use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};

/// Key of the lecture catalogue document.
pub const LECTURES_KEY: &str = "__lectures__.json";

/// Zone used to stamp snapshot keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SnapshotZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl SnapshotZone {
    pub fn from_offset_minutes(minutes: Option<i32>) -> Self {
        minutes
            .and_then(|m| FixedOffset::east_opt(m.saturating_mul(60)))
            .map(SnapshotZone::Fixed)
            .unwrap_or_default()
    }

    pub fn wall_time(&self, instant: DateTime<FixedOffset>) -> NaiveDateTime {
        match self {
            SnapshotZone::Local => instant.with_timezone(&Local).naive_local(),
            SnapshotZone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }
}

pub fn lecture_prefix(lecture: &str) -> String {
    format!("{lecture}/")
}

pub fn snapshot_file_name(at: NaiveDateTime) -> String {
    format!("{}.json", at.format("%Y-%m-%d_%H%M%S"))
}

pub fn snapshot_key(lecture: &str, at: NaiveDateTime) -> String {
    format!("{}{}", lecture_prefix(lecture), snapshot_file_name(at))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_uses_date_and_24_hour_time() {
        let instant = DateTime::parse_from_rfc3339("2026-10-14T15:04:05+00:00").unwrap();
        let zone = SnapshotZone::from_offset_minutes(Some(540));
        let key = snapshot_key("Operating Systems", zone.wall_time(instant));
        assert_eq!(key, "Operating Systems/2026-10-15_000405.json");
    }

    #[test]
    fn out_of_range_offset_falls_back_to_local() {
        assert_eq!(SnapshotZone::from_offset_minutes(Some(100_000)), SnapshotZone::Local);
        assert_eq!(SnapshotZone::from_offset_minutes(None), SnapshotZone::Local);
    }
}
