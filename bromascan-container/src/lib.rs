//! Binary container reading for `bromascan`: identifying PE64 / Mach-O64 /
//! fat Mach-O files and locating their executable code region.
//!
//! This module is part of the `bromascan` crate family.

mod error;
mod mach;
mod pe;

pub use error::ContainerError;
pub use mach::CpuKind;
pub use pe::VirtualSection;

use bromascan_common::Platform;

/// An immutable view over a binary's executable code, plus the signed
/// correction needed to translate between the catalog's address space and
/// byte offsets into the binary file (§3).
pub struct CodeSection<'a> {
    pub data: &'a [u8],
    pub base_correction: i64,
}

impl CodeSection<'_> {
    /// Converts a catalog address on this platform into a file offset
    /// within [`CodeSection::data`].
    pub fn to_file_offset(&self, catalog_offset: u64) -> i64 {
        catalog_offset as i64 - self.base_correction
    }

    /// Converts a file offset within [`CodeSection::data`] (as returned by a
    /// search hit) back into the catalog's address space.
    pub fn to_catalog_offset(&self, file_offset: usize) -> u64 {
        (file_offset as i64 + self.base_correction) as u64
    }
}

/// Locates the code section to synthesize/scan patterns against, and the
/// base correction to apply to catalog addresses, for `platform`.
///
/// This is the one piece of platform-dispatch logic both `genpat` and
/// `scanpat` need identically (§4.9): pick a container reader, then derive
/// the base correction the platform requires.
pub fn locate(platform: Platform, binary: &[u8]) -> Result<CodeSection<'_>, ContainerError> {
    match platform {
        Platform::MacArm => {
            let data = mach::segment(binary, CpuKind::Arm64)?;
            Ok(CodeSection {
                data,
                base_correction: 0,
            })
        }
        Platform::MacIntel => {
            let data = mach::segment(binary, CpuKind::X86_64)?;
            Ok(CodeSection {
                data,
                base_correction: 0,
            })
        }
        Platform::Windows => {
            let section = pe::text_section(binary)?;
            Ok(CodeSection {
                data: section.data,
                base_correction: section.virtual_address as i64,
            })
        }
        Platform::Ios => {
            let data = mach::segment(binary, CpuKind::Arm64)?;
            let segment_start = data.as_ptr() as usize - binary.as_ptr() as usize;
            Ok(CodeSection {
                data,
                base_correction: segment_start as i64,
            })
        }
    }
}

/// Auto-detects the platform of `binary` from its container magic alone
/// (§4.1).
///
/// A fat archive resolves to [`Platform::MacArm`]: callers wanting the Intel
/// slice of a fat binary must request [`Platform::MacIntel`] explicitly.
/// This asymmetry is deliberate (preserved from the original tool) and not
/// a bug.
pub fn detect_platform(binary: &[u8]) -> Result<Platform, ContainerError> {
    if pe::is_pe64(binary) {
        return Ok(Platform::Windows);
    }
    if mach::is_fat(binary) {
        return Ok(Platform::MacArm);
    }
    if mach::is_mach64(binary) {
        return Ok(Platform::Ios);
    }
    Err(ContainerError::Unsupported)
}

pub use mach::{is_fat, is_mach64};
pub use pe::is_pe64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_pe_then_fat_then_macho() {
        let mut pe = vec![0u8; 64];
        pe[0..2].copy_from_slice(b"MZ");
        pe[0x3C..0x40].copy_from_slice(&64u32.to_le_bytes());
        pe.extend_from_slice(&0x0000_4550u32.to_le_bytes());
        assert_eq!(detect_platform(&pe).unwrap(), Platform::Windows);

        let mut fat = vec![0u8; 8];
        fat[0..4].copy_from_slice(&0xBEBA_FECAu32.to_le_bytes());
        assert_eq!(detect_platform(&fat).unwrap(), Platform::MacArm);

        let mut macho = vec![0u8; 32];
        macho[0..4].copy_from_slice(&0xFEED_FACFu32.to_le_bytes());
        assert_eq!(detect_platform(&macho).unwrap(), Platform::Ios);

        assert!(detect_platform(&[0u8; 16]).is_err());
    }
}
