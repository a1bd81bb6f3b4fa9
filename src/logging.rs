//! Logging setup and crate-internal log macros
//!
//! On Android every message is mirrored to the `log` facade so `android_logger`
//! routes it to logcat; elsewhere only `tracing` is used.

#[cfg(feature = "android")]
macro_rules! s_trace {
    ($($arg:tt)*) => {{
        tracing::trace!($($arg)*);
        log::trace!($($arg)*);
    }};
}
#[cfg(not(feature = "android"))]
macro_rules! s_trace {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*);
    };
}

#[cfg(feature = "android")]
macro_rules! s_debug {
    ($($arg:tt)*) => {{
        tracing::debug!($($arg)*);
        log::debug!($($arg)*);
    }};
}
#[cfg(not(feature = "android"))]
macro_rules! s_debug {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}

#[cfg(feature = "android")]
macro_rules! s_info {
    ($($arg:tt)*) => {{
        tracing::info!($($arg)*);
        log::info!($($arg)*);
    }};
}
#[cfg(not(feature = "android"))]
macro_rules! s_info {
    ($($arg:tt)*) => {
        tracing::info!($($arg)*);
    };
}

#[cfg(feature = "android")]
macro_rules! s_warn {
    ($($arg:tt)*) => {{
        tracing::warn!($($arg)*);
        log::warn!($($arg)*);
    }};
}
#[cfg(not(feature = "android"))]
macro_rules! s_warn {
    ($($arg:tt)*) => {
        tracing::warn!($($arg)*);
    };
}

#[cfg(feature = "android")]
#[allow(unused_macros)]
macro_rules! s_error {
    ($($arg:tt)*) => {{
        tracing::error!($($arg)*);
        log::error!($($arg)*);
    }};
}
#[cfg(not(feature = "android"))]
#[allow(unused_macros)]
macro_rules! s_error {
    ($($arg:tt)*) => {
        tracing::error!($($arg)*);
    };
}

use crate::config::BridgeConfig;
use once_cell::sync::OnceCell;

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install the log backends described by `config`.
///
/// Only the first call has an effect; later calls (and calls with logging
/// disabled) return without touching the global subscriber.
pub fn init_logging(config: &BridgeConfig) {
    if !config.enable_logging {
        return;
    }

    LOGGING.get_or_init(|| {
        let level = parse_log_level(config.log_level.as_deref());

        #[cfg(feature = "android")]
        android_logger::init_once(
            android_logger::Config::default()
                .with_max_level(level_filter(level))
                .with_tag(config.log_tag.clone()),
        );

        // Another subscriber may already be installed by the host; keep it.
        let _ = tracing_subscriber::fmt().with_max_level(level).try_init();

        s_info!("📝 Logging initialized at {} (tag {})", level, config.log_tag);
    });
}

pub fn parse_log_level(level: Option<&str>) -> tracing::Level {
    match level {
        Some("trace") => tracing::Level::TRACE,
        Some("debug") => tracing::Level::DEBUG,
        Some("info") => tracing::Level::INFO,
        Some("warn") => tracing::Level::WARN,
        Some("error") => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

#[cfg(feature = "android")]
fn level_filter(level: tracing::Level) -> log::LevelFilter {
    match level {
        tracing::Level::TRACE => log::LevelFilter::Trace,
        tracing::Level::DEBUG => log::LevelFilter::Debug,
        tracing::Level::INFO => log::LevelFilter::Info,
        tracing::Level::WARN => log::LevelFilter::Warn,
        _ => log::LevelFilter::Error,
    }
}
