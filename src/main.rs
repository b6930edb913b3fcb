#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use planit::app::PlannerApp;
use planit::config::AppConfig;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = AppConfig::default_path();
    let config = AppConfig::load_or_default(&config_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("PlanIt"),
        ..Default::default()
    };

    eframe::run_native(
        "PlanIt",
        options,
        Box::new(|cc| Ok(Box::new(PlannerApp::new(cc, config, config_path)))),
    )
}
