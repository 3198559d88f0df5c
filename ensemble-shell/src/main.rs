mod app;

fn main() {
    // Initialize the logger
    env_logger::init();
    log::info!("Starting ensemble console");

    app::app_main();
}
