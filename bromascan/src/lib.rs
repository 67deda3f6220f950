//! The orchestrator facade (C9): resolves the target platform, loads the
//! binary's code section, and wires the synthesis (C5) or scan (C6) loop
//! across C7's worker pool and C8's catalog I/O.
//!
//! This module is part of the `bromascan` crate family. The `tools/*`
//! binaries are thin `clap`-driven wrappers around [`Generator`] and
//! [`Scanner`].

mod error;
mod generator;
mod scanner;

pub use error::OrchestratorError;
pub use generator::{GenerateSummary, Generator};
pub use scanner::{ScanSummary, Scanner};

use bromascan_common::Platform;

/// Resolves a CLI platform token to a [`Platform`], auto-detecting from the
/// binary's container magic when `token` is `"auto"` (§4.1, §4.9).
///
/// `auto` on a fat Mach-O resolves to [`Platform::MacArm`]: callers wanting
/// the Intel slice of a fat binary must pass `imac` explicitly. This
/// asymmetry is carried over from the original tool, not a bug.
pub fn resolve_platform(token: &str, binary: &[u8]) -> Result<Platform, OrchestratorError> {
    if token == "auto" {
        return Ok(bromascan_container::detect_platform(binary)?);
    }
    Platform::parse_cli(token).map_err(|_| OrchestratorError::UnknownPlatform(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_detects_pe() {
        let mut pe = vec![0u8; 64];
        pe[0..2].copy_from_slice(b"MZ");
        pe[0x3C..0x40].copy_from_slice(&64u32.to_le_bytes());
        pe.extend_from_slice(&0x0000_4550u32.to_le_bytes());
        assert_eq!(resolve_platform("auto", &pe).unwrap(), Platform::Windows);
    }

    #[test]
    fn explicit_token_skips_detection() {
        assert_eq!(resolve_platform("m1", &[]).unwrap(), Platform::MacArm);
    }

    #[test]
    fn unknown_token_is_an_error() {
        assert!(resolve_platform("android", &[]).is_err());
    }
}
