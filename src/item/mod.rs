#[cfg(feature = "logger")]
/// An item writer that only logs what it receives.
pub mod logger;

#[cfg(feature = "csv")]
/// CSV item writer.
pub mod csv;

#[cfg(feature = "json")]
/// JSON item writer.
pub mod json;

/// Item reader over WordPress WXR exports.
pub mod wxr;
