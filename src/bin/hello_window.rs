use log::{error, LevelFilter};
use simple_logger::SimpleLogger;

use gl_tutorials::{app, Variant};

fn main() {
    if let Err(e) = SimpleLogger::new().with_level(LevelFilter::Info).init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if let Err(e) = app::run(Variant::HelloWindow) {
        error!("{:#}", e);
        std::process::exit(-1);
    }
}
