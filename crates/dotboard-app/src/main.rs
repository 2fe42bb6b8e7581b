//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting Dotboard");

    if let Err(e) = dotboard_app::App::run() {
        log::error!("Dotboard exited with error: {e}");
        std::process::exit(1);
    }
}
