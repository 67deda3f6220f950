//! Minimal PE32+ header walking: just enough to locate `.text`.

use scroll::{Pread, LE};

use crate::error::ContainerError;

const DOS_HEADER_SIZE: usize = 64;
const E_LFANEW_OFFSET: usize = 0x3C;
const PE_SIGNATURE: u32 = 0x0000_4550; // "PE\0\0"
const COFF_HEADER_SIZE: usize = 20;
const SECTION_HEADER_SIZE: usize = 40;

/// The `.text` section of a PE64 image: its declared virtual address plus
/// the raw file bytes backing it.
pub struct VirtualSection<'a> {
    pub virtual_address: u32,
    pub data: &'a [u8],
}

/// True iff `bytes` starts with a DOS header whose `e_lfanew` points at a
/// valid `"PE\0\0"` signature within the buffer.
pub fn is_pe64(bytes: &[u8]) -> bool {
    read_pe_signature(bytes).is_ok()
}

fn read_pe_signature(bytes: &[u8]) -> Result<u32, ContainerError> {
    if bytes.len() < DOS_HEADER_SIZE {
        return Err(ContainerError::TooSmall {
            expected: DOS_HEADER_SIZE,
            actual: bytes.len(),
        });
    }
    let e_magic: u16 = bytes.pread_with(0, LE)?;
    if e_magic != 0x5A4D {
        return Err(ContainerError::BadMagic("MZ"));
    }
    let e_lfanew: u32 = bytes.pread_with(E_LFANEW_OFFSET, LE)?;
    let sig_offset = e_lfanew as usize;
    match sig_offset.checked_add(4) {
        Some(end) if end <= bytes.len() => {}
        _ => return Err(ContainerError::OutOfBounds),
    }
    let signature: u32 = bytes.pread_with(sig_offset, LE)?;
    if signature != PE_SIGNATURE {
        return Err(ContainerError::BadMagic("PE"));
    }
    Ok(e_lfanew)
}

/// Locates the first section whose name begins with `.text` and returns its
/// virtual address plus the raw bytes at `pointer_to_raw_data`.
pub fn text_section(bytes: &[u8]) -> Result<VirtualSection<'_>, ContainerError> {
    let e_lfanew = read_pe_signature(bytes)? as usize;
    let coff_offset = e_lfanew + 4;
    if coff_offset + COFF_HEADER_SIZE > bytes.len() {
        return Err(ContainerError::OutOfBounds);
    }

    let number_of_sections: u16 = bytes.pread_with(coff_offset + 2, LE)?;
    let size_of_optional_header: u16 = bytes.pread_with(coff_offset + 16, LE)?;

    let sections_offset = coff_offset + COFF_HEADER_SIZE + size_of_optional_header as usize;
    let sections_size = number_of_sections as usize * SECTION_HEADER_SIZE;
    match sections_offset.checked_add(sections_size) {
        Some(end) if end <= bytes.len() => {}
        _ => return Err(ContainerError::OutOfBounds),
    }

    for i in 0..number_of_sections as usize {
        let header_offset = sections_offset + i * SECTION_HEADER_SIZE;
        let name: &[u8] = &bytes[header_offset..header_offset + 8];
        if !name.starts_with(b".text") {
            continue;
        }

        let virtual_address: u32 = bytes.pread_with(header_offset + 12, LE)?;
        let size_of_raw_data: u32 = bytes.pread_with(header_offset + 16, LE)?;
        let pointer_to_raw_data: u32 = bytes.pread_with(header_offset + 20, LE)?;

        let start = pointer_to_raw_data as usize;
        let end = start
            .checked_add(size_of_raw_data as usize)
            .ok_or(ContainerError::OutOfBounds)?;
        if end > bytes.len() {
            return Err(ContainerError::OutOfBounds);
        }

        return Ok(VirtualSection {
            virtual_address,
            data: &bytes[start..end],
        });
    }

    Err(ContainerError::SectionNotFound(".text"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pe_with_text(text: &[u8]) -> Vec<u8> {
        let mut buf = vec![0u8; DOS_HEADER_SIZE];
        buf[0..2].copy_from_slice(b"MZ");
        let lfanew = DOS_HEADER_SIZE as u32;
        buf[E_LFANEW_OFFSET..E_LFANEW_OFFSET + 4].copy_from_slice(&lfanew.to_le_bytes());

        buf.extend_from_slice(&PE_SIGNATURE.to_le_bytes());

        // COFF header: machine, numberOfSections=1, timestamp, symtab ptr,
        // numSymbols, sizeOfOptionalHeader=0, characteristics
        let mut coff = vec![0u8; COFF_HEADER_SIZE];
        coff[2..4].copy_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&coff);

        // one section header
        let mut section = vec![0u8; SECTION_HEADER_SIZE];
        section[0..5].copy_from_slice(b".text");
        let pointer_to_raw_data = buf.len() as u32 + SECTION_HEADER_SIZE as u32;
        section[8..12].copy_from_slice(&(text.len() as u32).to_le_bytes()); // virtualSize
        section[12..16].copy_from_slice(&0x1000u32.to_le_bytes()); // virtualAddress
        section[16..20].copy_from_slice(&(text.len() as u32).to_le_bytes()); // sizeOfRawData
        section[20..24].copy_from_slice(&pointer_to_raw_data.to_le_bytes());
        buf.extend_from_slice(&section);

        buf.extend_from_slice(text);
        buf
    }

    #[test]
    fn detects_and_locates_text() {
        let bin = pe_with_text(&[0x90, 0x90, 0xC3]);
        assert!(is_pe64(&bin));
        let section = text_section(&bin).unwrap();
        assert_eq!(section.virtual_address, 0x1000);
        assert_eq!(section.data, &[0x90, 0x90, 0xC3]);
    }

    #[test]
    fn rejects_missing_mz() {
        let bin = vec![0u8; 128];
        assert!(!is_pe64(&bin));
        assert!(text_section(&bin).is_err());
    }

    #[test]
    fn rejects_truncated_buffer() {
        let bin = vec![b'M', b'Z'];
        assert!(!is_pe64(&bin));
    }

    #[test]
    fn rejects_out_of_bounds_lfanew() {
        let mut bin = vec![0u8; DOS_HEADER_SIZE];
        bin[0..2].copy_from_slice(b"MZ");
        bin[E_LFANEW_OFFSET..E_LFANEW_OFFSET + 4].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
        assert!(!is_pe64(&bin));
        assert!(matches!(text_section(&bin), Err(ContainerError::OutOfBounds)));
    }

    #[test]
    fn rejects_missing_text_section() {
        let mut bin = pe_with_text(&[0x90]);
        // rename the section so the `.text` prefix search fails
        let sections_offset = DOS_HEADER_SIZE + 4 + COFF_HEADER_SIZE;
        bin[sections_offset..sections_offset + 5].copy_from_slice(b".data");
        assert!(matches!(
            text_section(&bin),
            Err(ContainerError::SectionNotFound(".text"))
        ));
    }
}
