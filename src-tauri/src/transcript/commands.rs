use tauri::State;

use crate::{
    records::Record,
    transcript::{build_transcript, Transcript, TranscriptFormat},
    AppState,
};

#[tauri::command]
pub fn join_transcript(records: Vec<Record>, srt: String) -> Result<Transcript, String> {
    Ok(build_transcript(&records, &srt))
}

/// Joins a saved snapshot with an SRT document and renders the "Slide N"
/// listing, markdown unless `format` says otherwise.
#[tauri::command]
pub async fn render_snapshot_transcript(
    state: State<'_, AppState>,
    lecture: String,
    file_name: String,
    srt: String,
    format: Option<TranscriptFormat>,
) -> Result<String, String> {
    let records = state
        .library
        .load_snapshot(&lecture, &file_name)
        .await
        .map_err(|e| e.to_string())?;
    Ok(build_transcript(&records, &srt).render(format.unwrap_or_default()))
}
