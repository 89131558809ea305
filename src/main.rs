//! Headless demo shell for the sync controller.
//!
//! Walks the full appointment lifecycle against the configured backend (or
//! the in-memory mock when none is configured) and prints the render model
//! after each step.

use std::sync::Arc;

use visitsync::config::{state_dir, Config};
use visitsync::controller::{Controller, Role};
use visitsync::mock::MockBackend;
use visitsync::remote::{BackendApi, RemoteClient};
use visitsync::storage::{FileStore, MemoryStore, NotesStore};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = Config::load();
    let api: Arc<dyn BackendApi> = match config.backend_url() {
        Some(url) => {
            log::info!("Using backend at {url}");
            Arc::new(RemoteClient::new(url))
        }
        None => {
            log::info!("No backend configured; using in-memory mock backend");
            Arc::new(MockBackend::new())
        }
    };

    let notes_store: Box<dyn NotesStore> = match state_dir() {
        Some(dir) => Box::new(FileStore::open(dir)),
        None => Box::new(MemoryStore::new()),
    };

    let controller = Arc::new(Controller::new(
        api,
        notes_store,
        config.poll_interval(),
        config.notes_debounce(),
    ));

    if let Some(restored) = controller.notes().load() {
        log::info!("Restored {} bytes of notes", restored.len());
    }

    if let Err(e) = controller.refresh().await {
        log::warn!("Initial refresh failed: {e}");
    }
    print_model("after initial refresh", &controller);

    if let Err(e) = controller.create_appointment("Dr. Demo", Some("Pat Demo")).await {
        log::warn!("Create appointment failed: {e}");
        return;
    }
    print_model("after create", &controller);

    if let Err(e) = controller.create_meeting().await {
        log::warn!("Create meeting failed: {e}");
        return;
    }
    controller.activate_view(Role::Joining);
    print_model("after meeting, joining view", &controller);

    controller.activate_view(Role::Scheduling);
    if let Err(e) = controller.delete_appointment().await {
        log::warn!("Delete failed: {e}");
    }
    print_model("after delete", &controller);
}

fn print_model(label: &str, controller: &Controller) {
    let model = controller.render();
    match serde_json::to_string_pretty(&model) {
        Ok(json) => println!("--- {label}\n{json}"),
        Err(e) => log::warn!("Could not serialize render model: {e}"),
    }
}
