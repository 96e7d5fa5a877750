//! Compile-time platform detection.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Platform {
    MacOS,
    Windows,
    Linux,
    Android,
    IOS,
    IPadOS,
    Web,
}

/// Form factor reported by the host, only consulted on iOS.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceIdiom {
    #[default]
    Phone,
    Pad,
}

/// Environment variable a design tool sets to `1` while rendering previews.
pub const PREVIEW_ENV: &str = "DRAPE_PREVIEW";

impl Platform {
    /// The platform this binary was built for. iOS builds report
    /// [`Platform::IOS`]; use [`Platform::current_with_idiom`] when the host
    /// knows it runs on a tablet.
    pub fn current() -> Platform {
        Self::current_with_idiom(DeviceIdiom::default())
    }

    pub fn current_with_idiom(idiom: DeviceIdiom) -> Platform {
        Self::from_target(std::env::consts::OS, cfg!(target_family = "wasm"), idiom)
    }

    fn from_target(os: &str, wasm: bool, idiom: DeviceIdiom) -> Platform {
        if wasm {
            return Platform::Web;
        }
        match (os, idiom) {
            ("macos", _) => Platform::MacOS,
            ("windows", _) => Platform::Windows,
            ("android", _) => Platform::Android,
            ("ios", DeviceIdiom::Pad) => Platform::IPadOS,
            ("ios", DeviceIdiom::Phone) => Platform::IOS,
            _ => Platform::Linux,
        }
    }

    pub fn is_apple(self) -> bool {
        matches!(self, Platform::MacOS | Platform::IOS | Platform::IPadOS)
    }

    pub fn is_mobile(self) -> bool {
        matches!(self, Platform::IOS | Platform::IPadOS | Platform::Android)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::MacOS => "macOS",
            Platform::Windows => "Windows",
            Platform::Linux => "Linux",
            Platform::Android => "Android",
            Platform::IOS => "iOS",
            Platform::IPadOS => "iPadOS",
            Platform::Web => "Web",
        })
    }
}

/// True while running inside a design-time preview.
pub fn is_preview_mode() -> bool {
    preview_flag(std::env::var(PREVIEW_ENV).ok().as_deref())
}

pub fn preview_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim() == "1")
}
