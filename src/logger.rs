//! Log output for the report binary and tests

use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

/// Crate target whose records `initialize_logger` lets through at `Info`
const CRATE_TARGET: &str = "hesh";

/// Set once the backend has been installed
static INSTALLED: Once = Once::new();

/// Installs an `env_logger` backend behind the `log` facade.
///
/// The library itself only emits `debug!` on table growth and `trace!` on
/// tombstone reuse, so the default `Info` level keeps it quiet.
/// `RUST_LOG=hesh=debug` shows growth. Later calls do nothing.
pub fn initialize_logger() {
    INSTALLED.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .filter_module(CRATE_TARGET, LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        // a test harness or host binary may have installed its own logger
        let _ = builder.try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OpenAddressedMap;

    #[test]
    fn test_growth_logs_stay_below_default_level() {
        initialize_logger();
        initialize_logger();
        assert!(INSTALLED.is_completed());

        // growth is logged at debug, which the default filter for the crate drops
        let growth = log::Metadata::builder().level(log::Level::Debug).target(CRATE_TARGET).build();
        if std::env::var_os("RUST_LOG").is_none() && log::max_level() == LevelFilter::Info {
            assert!(!log::logger().enabled(&growth));
        }

        let mut map = OpenAddressedMap::with_capacity(1);
        map.insert(1_u8, 1_u8);
        map.insert(2, 2);
        assert_eq!(map.capacity(), 2);
    }
}
