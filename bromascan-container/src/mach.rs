//! Mach-O 64-bit and fat-archive header walking: just enough to locate the
//! code-bearing region of one architecture slice.

use scroll::{Pread, BE, LE};

use crate::error::ContainerError;

const MH_MAGIC_64: u32 = 0xFEED_FACF;
const FAT_MAGIC: u32 = 0xBEBA_FECA;
const MACH_HEADER_64_SIZE: usize = 32;
const FAT_HEADER_SIZE: usize = 8;
const FAT_ARCH_SIZE: usize = 20;

/// The CPU kind to look up inside a fat Mach-O archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuKind {
    X86_64,
    Arm64,
}

impl CpuKind {
    fn cputype(self) -> u32 {
        match self {
            CpuKind::X86_64 => 0x0100_0007,
            CpuKind::Arm64 => 0x0100_000C,
        }
    }
}

/// True iff `bytes` opens with a 64-bit Mach-O header magic.
pub fn is_mach64(bytes: &[u8]) -> bool {
    bytes.len() >= MACH_HEADER_64_SIZE
        && bytes.pread_with::<u32>(0, LE).ok() == Some(MH_MAGIC_64)
}

/// True iff `bytes` opens with a fat-archive magic.
///
/// The magic is the byte-swapped big-endian `0xCAFEBABE`: fat archives store
/// their header fields big-endian regardless of host.
pub fn is_fat(bytes: &[u8]) -> bool {
    bytes.len() >= FAT_HEADER_SIZE && bytes.pread_with::<u32>(0, LE).ok() == Some(FAT_MAGIC)
}

/// Returns the bytes of the code-bearing region for `cpu`: everything past
/// the load commands of a thin 64-bit Mach-O, or the matching architecture
/// slice of a fat archive.
pub fn segment(bytes: &[u8], cpu: CpuKind) -> Result<&[u8], ContainerError> {
    if bytes.len() < 4 {
        return Err(ContainerError::TooSmall {
            expected: 4,
            actual: bytes.len(),
        });
    }

    if is_mach64(bytes) {
        let sizeofcmds: u32 = bytes.pread_with(20, LE)?;
        let offset = MACH_HEADER_64_SIZE
            .checked_add(sizeofcmds as usize)
            .ok_or(ContainerError::OutOfBounds)?;
        if offset > bytes.len() {
            return Err(ContainerError::OutOfBounds);
        }
        return Ok(&bytes[offset..]);
    }

    if is_fat(bytes) {
        let nfat_arch: u32 = bytes.pread_with(4, BE)?;
        let arches_size = nfat_arch as usize * FAT_ARCH_SIZE;
        match FAT_HEADER_SIZE.checked_add(arches_size) {
            Some(end) if end <= bytes.len() => {}
            _ => return Err(ContainerError::OutOfBounds),
        }

        for i in 0..nfat_arch as usize {
            let arch_offset = FAT_HEADER_SIZE + i * FAT_ARCH_SIZE;
            let cputype: u32 = bytes.pread_with(arch_offset, BE)?;
            if cputype != cpu.cputype() {
                continue;
            }

            let offset: u32 = bytes.pread_with(arch_offset + 8, BE)?;
            let size: u32 = bytes.pread_with(arch_offset + 12, BE)?;
            let start = offset as usize;
            let end = start.checked_add(size as usize).ok_or(ContainerError::OutOfBounds)?;
            if end > bytes.len() {
                return Err(ContainerError::OutOfBounds);
            }
            return Ok(&bytes[start..end]);
        }

        return Err(ContainerError::ArchNotFound);
    }

    Err(ContainerError::Unsupported)
}
