use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("rusty_slots", LevelFilter::Warn)
            .format_timestamp_millis()
            .parse_default_env();

        // Another logger may already be installed (tests, embedding binaries).
        let _ = builder.try_init();
    });
}
