use boxnest::interaction::{Editor, Mode};
use boxnest::persistence::{self, FileKeyValueStore};
use boxnest::settings::{self, AppSettings};
use log::{info, warn};
use std::path::{Path, PathBuf};

mod render;
mod update;

pub struct DiagramApp {
    editor: Editor,
    kv: FileKeyValueStore,
    settings: AppSettings,
    settings_path: PathBuf,
    random_count: String,
    status: Option<String>,
}

impl DiagramApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings_path =
            settings::config_path().unwrap_or_else(|| PathBuf::from("settings.toml"));
        let settings = settings::load_settings(&settings_path)
            .or_else(|| settings::load_settings(Path::new("settings.json")))
            .unwrap_or_default();

        let kv = FileKeyValueStore::new(&settings.storage_dir);
        let state = persistence::load_diagram(&kv);
        let editor = Editor::new(state, settings.default_mode, settings.editor_config());
        info!(path:? = kv.dir(), rects = editor.state().len(); "Diagram ready");

        Self {
            editor,
            kv,
            random_count: settings.random_count.to_string(),
            settings,
            settings_path,
            status: None,
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.editor.mode() == mode {
            return;
        }
        self.editor.set_mode(mode);
        self.settings.default_mode = mode;
        if let Err(err) = settings::save_settings(&self.settings_path, &self.settings) {
            warn!(err:% = err; "Failed to persist settings");
        }
    }

    fn save(&mut self) {
        self.status = Some(match self.editor.save(&mut self.kv) {
            Ok(()) => format!("Saved {} rectangles", self.editor.state().len()),
            Err(err) => {
                warn!(err:% = err; "Save failed");
                format!("Save failed: {err}")
            }
        });
    }

    fn delete_selected(&mut self) {
        let removed = self.editor.delete_selected();
        if removed > 0 {
            self.status = Some(format!("Deleted {removed}"));
        }
    }

    fn add_random(&mut self) {
        let count = self
            .random_count
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(1);
        self.status = Some(match self.editor.add_random(count, &mut rand::rng()) {
            Ok(ids) => format!("Added {} rectangles", ids.len()),
            Err(err) => {
                warn!(err:% = err; "Bulk add rejected");
                format!("Add failed: {err}")
            }
        });
    }
}
