use eframe::egui;

use taskorbit::config::ViewerConfig;

mod app;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from_env();
    log::info!(
        "Starting TaskOrbit (data dir {}, textures {}px)",
        config.data_dir.display(),
        config.texture_size
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title("TaskOrbit"),
        ..Default::default()
    };

    eframe::run_native(
        "TaskOrbit",
        options,
        Box::new(|_cc| Ok(Box::new(app::WorkspaceApp::new(config)))),
    )
}
