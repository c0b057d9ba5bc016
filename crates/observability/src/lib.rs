//! Process-wide logging setup shared by the catalog binaries.

pub mod subscriber;

pub use subscriber::{LogFormat, init_with};

/// Initialize JSON logging filtered by `RUST_LOG` (default `info`).
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init() {
    init_with(LogFormat::Json, "info");
}
