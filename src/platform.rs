//! Target platform and architecture identification.
//!
//! The build index keys its entries by a combined platform-architecture
//! string ("linux64", "windows32", "macosarm64", ...). The OS word and the
//! architecture suffix are joined by [`build_key`].

use std::fmt;
use std::str::FromStr;

/// Operating system the runtime files are installed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
}

impl Platform {
    /// Detect the platform the current process is running on.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    /// The OS word used in build index keys and archive file names.
    pub fn index_word(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::MacOs => "macosx",
        }
    }

    /// Whether the Apple archive layout (framework bundle) applies.
    pub fn is_apple(self) -> bool {
        matches!(self, Platform::MacOs)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.index_word())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "windows" | "win" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "macosx" | "macos" | "darwin" => Ok(Platform::MacOs),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

/// Processor architecture of the runtime build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    X64,
    X86,
    Arm64,
}

impl Architecture {
    /// Detect the architecture the current process is running on.
    pub fn current() -> Self {
        if cfg!(target_arch = "x86") {
            Architecture::X86
        } else if cfg!(target_arch = "aarch64") {
            Architecture::Arm64
        } else {
            Architecture::X64
        }
    }

    /// The suffix used in build index keys ("64", "32", "arm64").
    pub fn index_suffix(self) -> &'static str {
        match self {
            Architecture::X64 => "64",
            Architecture::X86 => "32",
            Architecture::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.index_suffix())
    }
}

impl FromStr for Architecture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" | "64" => Ok(Architecture::X64),
            "x86" | "i686" | "32" => Ok(Architecture::X86),
            "arm64" | "aarch64" => Ok(Architecture::Arm64),
            other => Err(format!("unknown architecture: {}", other)),
        }
    }
}

/// Combined platform-architecture key as used by the build index.
pub fn build_key(platform: Platform, arch: Architecture) -> String {
    format!("{}{}", platform.index_word(), arch.index_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_key_combines_os_and_arch() {
        assert_eq!(build_key(Platform::Linux, Architecture::X64), "linux64");
        assert_eq!(build_key(Platform::Windows, Architecture::X86), "windows32");
        assert_eq!(build_key(Platform::MacOs, Architecture::X64), "macosx64");
        assert_eq!(
            build_key(Platform::MacOs, Architecture::Arm64),
            "macosxarm64"
        );
        assert_eq!(
            build_key(Platform::Windows, Architecture::Arm64),
            "windowsarm64"
        );
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::MacOs);
        assert_eq!("Windows".parse::<Platform>().unwrap(), Platform::Windows);
        assert!("beos".parse::<Platform>().is_err());
    }

    #[test]
    fn test_architecture_from_str() {
        assert_eq!("x86_64".parse::<Architecture>().unwrap(), Architecture::X64);
        assert_eq!(
            "aarch64".parse::<Architecture>().unwrap(),
            Architecture::Arm64
        );
        assert!("mips".parse::<Architecture>().is_err());
    }

    #[test]
    fn test_current_returns_consistent_pair() {
        // Smoke check that detection produces a valid key on the host.
        let key = build_key(Platform::current(), Architecture::current());
        assert!(!key.is_empty());
    }
}
