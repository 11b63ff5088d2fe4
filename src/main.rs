mod app;

use app::MyApp;
use study_hub::database::open_store;
use study_hub::{Config, StudyService};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let store = match open_store(&config) {
        Ok(store) => store,
        Err(e) => {
            log::error!("failed to open {:?} store in {}: {}", config.storage, config.data_dir.display(), e);
            std::process::exit(1);
        }
    };
    let service = StudyService::new(store);

    match (service.materials(), service.flashcards(None)) {
        (Ok(materials), Ok(cards)) => {
            log::info!("loaded {} materials and {} flashcards", materials.len(), cards.len())
        }
        (Err(e), _) | (_, Err(e)) => log::warn!("could not read stored collections: {}", e),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([560.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "AI Study Hub",
        options,
        Box::new(|_cc| Ok(Box::new(MyApp::new(service, config)))),
    )
}
