use std::fmt;
use std::str::FromStr;

/// A CPU architecture a [`Platform`] disassembles as.
///
/// Only the two architectures the synthesis/scan core supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Aarch64,
}

impl Arch {
    /// The alignment `find` must honor while searching for a unique window
    /// during synthesis. 1 byte for x86-64 (arbitrary instruction starts),
    /// 4 bytes for AArch64 (fixed-width instructions).
    pub fn synthesis_step(self) -> usize {
        match self {
            Arch::X86_64 => 1,
            Arch::Aarch64 => 4,
        }
    }

    /// The alignment used when scanning a resolved pattern catalog against a
    /// new binary. Reflects typical function alignment, not instruction
    /// alignment: 16 bytes on x86-64, 4 bytes on AArch64.
    pub fn scan_step(self) -> usize {
        match self {
            Arch::X86_64 => 16,
            Arch::Aarch64 => 4,
        }
    }
}

/// One of the four binary platforms the synthesis/scan core can target.
///
/// Android variants exist in the catalog schema (see [`Binding`](crate::Binding))
/// but are never targetable here — there is no Android container reader or
/// disassembler backend in this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    MacIntel,
    MacArm,
    Ios,
}

impl Platform {
    /// The architecture this platform's binaries are disassembled as.
    pub fn arch(self) -> Arch {
        match self {
            Platform::Windows | Platform::MacIntel => Arch::X86_64,
            Platform::MacArm | Platform::Ios => Arch::Aarch64,
        }
    }

    /// Parses a CLI platform token (`win`, `imac`, `m1`, `ios`).
    ///
    /// `auto` is not handled here: auto-detection needs the binary's bytes
    /// and lives on the orchestrator (see `bromascan::resolve_platform`).
    pub fn parse_cli(token: &str) -> Result<Platform, PlatformParseError> {
        match token {
            "win" => Ok(Platform::Windows),
            "imac" => Ok(Platform::MacIntel),
            "m1" => Ok(Platform::MacArm),
            "ios" => Ok(Platform::Ios),
            other => Err(PlatformParseError(other.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    /// The platform's catalog-JSON spelling (`"platform"` field, §6).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Windows => "Windows",
            Platform::MacIntel => "iMac",
            Platform::MacArm => "M1",
            Platform::Ios => "iOS",
        })
    }
}

impl FromStr for Platform {
    type Err = PlatformParseError;

    /// Parses the catalog-JSON spelling of a platform (`"Windows"`, `"iMac"`,
    /// `"M1"`, `"iOS"`). Distinct from [`Platform::parse_cli`], whose tokens
    /// use different casing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Windows" => Ok(Platform::Windows),
            "iMac" => Ok(Platform::MacIntel),
            "M1" => Ok(Platform::MacArm),
            "iOS" => Ok(Platform::Ios),
            other => Err(PlatformParseError(other.to_string())),
        }
    }
}

/// The given token does not name a known platform.
#[derive(Debug, thiserror::Error)]
#[error("unknown platform: {0}")]
pub struct PlatformParseError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_round_trip() {
        for platform in [
            Platform::Windows,
            Platform::MacIntel,
            Platform::MacArm,
            Platform::Ios,
        ] {
            let text = platform.to_string();
            assert_eq!(text.parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn cli_tokens() {
        assert_eq!(Platform::parse_cli("win").unwrap(), Platform::Windows);
        assert_eq!(Platform::parse_cli("imac").unwrap(), Platform::MacIntel);
        assert_eq!(Platform::parse_cli("m1").unwrap(), Platform::MacArm);
        assert_eq!(Platform::parse_cli("ios").unwrap(), Platform::Ios);
        assert!(Platform::parse_cli("auto").is_err());
        assert!(Platform::parse_cli("android").is_err());
    }

    #[test]
    fn arch_steps() {
        assert_eq!(Platform::Windows.arch().synthesis_step(), 1);
        assert_eq!(Platform::Windows.arch().scan_step(), 16);
        assert_eq!(Platform::MacArm.arch().synthesis_step(), 4);
        assert_eq!(Platform::MacArm.arch().scan_step(), 4);
    }
}
