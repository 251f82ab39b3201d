use tauri::State;

use crate::{
    library::SnapshotEntry,
    records::Record,
    settings::{StorageSettings, UserSettings},
    AppState,
};

#[tauri::command]
pub async fn list_lectures(state: State<'_, AppState>) -> Result<Vec<String>, String> {
    state.library.list_lectures().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn add_lecture(state: State<'_, AppState>, name: String) -> Result<String, String> {
    state.library.add_lecture(&name).await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn remove_lectures(state: State<'_, AppState>, names: Vec<String>) -> Result<(), String> {
    state
        .library
        .remove_lectures(&names)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn list_snapshots(
    state: State<'_, AppState>,
    lecture: String,
) -> Result<Vec<SnapshotEntry>, String> {
    state
        .library
        .list_snapshots(&lecture)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn load_snapshot(
    state: State<'_, AppState>,
    lecture: String,
    file_name: String,
) -> Result<Vec<Record>, String> {
    state
        .library
        .load_snapshot(&lecture, &file_name)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn save_snapshot(
    state: State<'_, AppState>,
    lecture: String,
    file_name: String,
    records: Vec<Record>,
) -> Result<SnapshotEntry, String> {
    state
        .library
        .save_snapshot(&lecture, &file_name, &records)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_snapshot(
    state: State<'_, AppState>,
    lecture: String,
    file_name: String,
) -> Result<(), String> {
    state
        .library
        .delete_snapshot(&lecture, &file_name)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn import_snapshot(
    state: State<'_, AppState>,
    lecture: String,
    file_name: String,
    contents: String,
) -> Result<SnapshotEntry, String> {
    state
        .library
        .import_snapshot(&lecture, &file_name, &contents)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn export_snapshot(
    state: State<'_, AppState>,
    lecture: String,
    file_name: String,
) -> Result<String, String> {
    state
        .library
        .export_snapshot(&lecture, &file_name)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_settings(state: State<'_, AppState>) -> Result<UserSettings, String> {
    Ok(state.settings.snapshot())
}

#[tauri::command]
pub fn reload_settings(state: State<'_, AppState>) -> Result<UserSettings, String> {
    state.settings.reload().map_err(|e| e.to_string())
}

/// Takes effect on next launch; the open storage backend is not swapped live.
#[tauri::command]
pub fn set_storage_settings(
    state: State<'_, AppState>,
    settings: StorageSettings,
) -> Result<(), String> {
    state
        .settings
        .update_storage(settings)
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn set_snapshot_offset(state: State<'_, AppState>, minutes: Option<i32>) -> Result<(), String> {
    state
        .settings
        .update_snapshot_offset(minutes)
        .map_err(|e| e.to_string())
}
