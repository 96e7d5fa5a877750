use serde::{Deserialize, Serialize};

/// Bundle metadata for the running app.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    pub bundle_id: Option<String>,
    pub version: String,
    pub build: String,
}

impl AppInfo {
    pub fn new(bundle_id: Option<&str>, version: impl Into<String>, build: impl Into<String>) -> Self {
        Self {
            bundle_id: bundle_id.map(str::to_owned),
            version: version.into(),
            build: build.into(),
        }
    }

    /// `"Version 1.4.0 (212)"`.
    pub fn current_version(&self) -> String {
        format!("Version {} ({})", self.version, self.build)
    }
}

/// [`AppInfo`] for the calling crate, read from Cargo at compile time.
/// The build number comes from `DRAPE_BUILD` if it was set when compiling.
#[macro_export]
macro_rules! app_info {
    () => {
        $crate::AppInfo::new(
            ::core::option_env!("CARGO_PKG_NAME"),
            ::core::env!("CARGO_PKG_VERSION"),
            ::core::option_env!("DRAPE_BUILD").unwrap_or("0"),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_line() {
        let info = AppInfo::new(Some("org.drape.demo"), "1.4.0", "212");
        assert_eq!(info.current_version(), "Version 1.4.0 (212)");
    }

    #[test]
    fn macro_reads_this_crate() {
        let info = crate::app_info!();
        assert_eq!(info.bundle_id.as_deref(), Some("drape-platform"));
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }
}
