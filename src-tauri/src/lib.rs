pub mod clock;
pub mod error;
pub mod library;
pub mod logging;
pub mod records;
pub mod settings;
pub mod storage;
pub mod timecode;
pub mod timer;
pub mod transcript;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use log::info;

use clock::SystemClock;
use library::Library;
use settings::SettingsStore;
use storage::open_storage;
use timer::TimerController;

pub struct AppState {
    pub settings: SettingsStore,
    pub timer: TimerController,
    pub library: Arc<Library>,
}

impl AppState {
    /// Loads settings from `data_dir` and opens the configured storage backend.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let settings = SettingsStore::new(data_dir.join("settings.json"))?;
        let storage = open_storage(&settings.effective_storage(), data_dir)?;
        let library = Arc::new(Library::new(storage));
        let timer = TimerController::new(
            Arc::new(SystemClock),
            library.clone(),
            settings.snapshot_zone(),
        );

        info!("Data directory: {}", data_dir.display());

        Ok(Self {
            settings,
            timer,
            library,
        })
    }
}

#[cfg(feature = "gui")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use library::commands::{
        add_lecture, delete_snapshot, export_snapshot, get_settings, import_snapshot,
        list_lectures, list_snapshots, load_snapshot, reload_settings, remove_lectures,
        save_snapshot, set_snapshot_offset, set_storage_settings,
    };
    use tauri::Manager;
    use timer::commands::{
        get_timer_state, insert_record, open_snapshot, pause_timer, record_slide, remove_record,
        replace_records, reset_timer, save_session, select_lecture, session_transcript,
        start_timer, update_record,
    };
    use transcript::commands::{join_transcript, render_snapshot_transcript};

    logging::init();
    info!("SlideScribe starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                let data_dir = settings::resolve_data_dir(app_data_dir);

                app.manage(AppState::open(&data_dir)?);
                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            get_timer_state,
            select_lecture,
            start_timer,
            pause_timer,
            reset_timer,
            record_slide,
            update_record,
            insert_record,
            remove_record,
            replace_records,
            save_session,
            open_snapshot,
            session_transcript,
            join_transcript,
            render_snapshot_transcript,
            list_lectures,
            add_lecture,
            remove_lectures,
            list_snapshots,
            load_snapshot,
            save_snapshot,
            delete_snapshot,
            import_snapshot,
            export_snapshot,
            get_settings,
            reload_settings,
            set_storage_settings,
            set_snapshot_offset,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
