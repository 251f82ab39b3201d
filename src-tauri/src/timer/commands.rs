use tauri::State;

use crate::{
    records::Record,
    timer::{StartOutcome, TimerController, TimerSnapshot},
    transcript::Transcript,
};

use crate::AppState;

fn controller_from_state(state: &State<'_, AppState>) -> TimerController {
    state.timer.clone()
}

#[tauri::command]
pub async fn get_timer_state(state: State<'_, AppState>) -> Result<TimerSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.get_snapshot().await)
}

#[tauri::command]
pub async fn select_lecture(
    state: State<'_, AppState>,
    lecture: Option<String>,
) -> Result<TimerSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .select_lecture(lecture)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn start_timer(
    state: State<'_, AppState>,
    start_time: Option<String>,
) -> Result<StartOutcome, String> {
    let controller = controller_from_state(&state);
    controller
        .start_timer(start_time)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn pause_timer(state: State<'_, AppState>) -> Result<TimerSnapshot, String> {
    let controller = controller_from_state(&state);
    controller.pause_timer().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn reset_timer(state: State<'_, AppState>) -> Result<TimerSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.reset_timer().await)
}

#[tauri::command]
pub async fn record_slide(
    state: State<'_, AppState>,
    slide_number: Option<u32>,
    notes: Option<String>,
) -> Result<Record, String> {
    let controller = controller_from_state(&state);
    controller
        .record_slide(slide_number, notes.unwrap_or_default())
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn update_record(
    state: State<'_, AppState>,
    index: usize,
    record: Record,
) -> Result<TimerSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .update_record(index, record)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn insert_record(
    state: State<'_, AppState>,
    index: usize,
    record: Record,
) -> Result<TimerSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .insert_record(index, record)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn remove_record(state: State<'_, AppState>, index: usize) -> Result<TimerSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .remove_record(index)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn replace_records(
    state: State<'_, AppState>,
    records: Vec<Record>,
) -> Result<TimerSnapshot, String> {
    let controller = controller_from_state(&state);
    Ok(controller.replace_records(records).await)
}

#[tauri::command]
pub async fn save_session(state: State<'_, AppState>) -> Result<String, String> {
    let controller = controller_from_state(&state);
    controller.save_session().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn open_snapshot(
    state: State<'_, AppState>,
    file_name: Option<String>,
) -> Result<TimerSnapshot, String> {
    let controller = controller_from_state(&state);
    controller
        .open_snapshot(file_name)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn session_transcript(
    state: State<'_, AppState>,
    srt: String,
) -> Result<Transcript, String> {
    let controller = controller_from_state(&state);
    Ok(controller.transcript(&srt).await)
}
