// Version information for the agent runtime crate

/// Version string for this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");

/// Build timestamp (if available)
pub const BUILD_TIMESTAMP: &str = env!("CARGO_PKG_VERSION");
