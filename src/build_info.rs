//! Version details baked in by `build.rs`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `fitquest 0.1.0 (abc1234, 2024-05-01)`
pub fn version_line() -> String {
    format!("fitquest {} ({}, {})", VERSION, BUILD_COMMIT, BUILD_DATE)
}
