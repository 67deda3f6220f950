use bromascan_pattern::{GenerateError, Pattern, StepGenerator, Token};
use capstone::arch::arm64::{Arm64OperandType, Arm64Reg};
use capstone::arch::ArchDetail;
use capstone::prelude::*;

/// Disassembles fixed 32-bit AArch64 instructions and masks each one
/// according to the per-opcode rule table in §4.4.
///
/// Unknown instructions still advance the stream and still emit four fully
/// wildcarded tokens, so the uniqueness search window always grows in step
/// with file position even when the mask table has nothing to say.
pub struct Arm64Generator<'a> {
    data: &'a [u8],
    position: usize,
    capstone: Capstone,
}

impl<'a> Arm64Generator<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        let capstone = Capstone::new()
            .arm64()
            .mode(arch::arm64::ArchMode::Arm)
            .detail(true)
            .build()
            .expect("capstone AArch64 mode is always supported");
        Arm64Generator {
            data,
            position: 0,
            capstone,
        }
    }
}

impl StepGenerator for Arm64Generator<'_> {
    const ITER_SIZE: usize = 4;

    fn next_opcode(&mut self, tokens: &mut Pattern) -> Result<(), GenerateError> {
        if self.position + 4 > self.data.len() {
            return Err(GenerateError::NotFound);
        }

        let raw = &self.data[self.position..self.position + 4];
        let insns = self
            .capstone
            .disasm_count(raw, self.position as u64, 1)
            .map_err(|_| GenerateError::NotFound)?;
        let insn = insns.iter().next().ok_or(GenerateError::NotFound)?;

        let mask = self
            .capstone
            .insn_detail(&insn)
            .ok()
            .map(|detail| mask_for(insn.mnemonic().unwrap_or(""), &detail.arch_detail()))
            .unwrap_or(0);

        // The rule table's masks are promoted to whole-byte granularity
        // (§4.4, "Wildcard representation"): a byte whose mask is zero
        // becomes a full wildcard, any other byte is kept exact, even
        // where the mask only covers some of its bits.
        for (i, &byte) in raw.iter().enumerate() {
            let byte_mask = ((mask >> (i * 8)) & 0xFF) as u8;
            if byte_mask == 0 {
                tokens.push(Token::Wildcard);
            } else {
                tokens.push(Token::Byte(byte));
            }
        }

        self.position += 4;
        Ok(())
    }
}

fn operand_is_reg(detail: &ArchDetail, index: usize, reg: Arm64Reg) -> bool {
    let Some(arm64) = detail.arm64() else {
        return false;
    };
    arm64
        .operands()
        .nth(index)
        .map(|op| matches!(op.op_type, Arm64OperandType::Reg(id) if id.0 as u32 == reg as u32))
        .unwrap_or(false)
}

fn operand_is_mem_base(detail: &ArchDetail, index: usize, reg: Arm64Reg) -> bool {
    let Some(arm64) = detail.arm64() else {
        return false;
    };
    arm64
        .operands()
        .nth(index)
        .map(|op| matches!(op.op_type, Arm64OperandType::Mem(mem) if mem.base().0 as u32 == reg as u32))
        .unwrap_or(false)
}

fn operand_kind(detail: &ArchDetail, index: usize) -> Option<OperandKind> {
    let arm64 = detail.arm64()?;
    arm64.operands().nth(index).map(|op| match op.op_type {
        Arm64OperandType::Reg(_) => OperandKind::Reg,
        Arm64OperandType::Imm(_) => OperandKind::Imm,
        Arm64OperandType::Mem(_) => OperandKind::Mem,
        _ => OperandKind::Other,
    })
}

#[derive(PartialEq, Eq)]
enum OperandKind {
    Reg,
    Imm,
    Mem,
    Other,
}

fn regs_equal(detail: &ArchDetail, a: usize, b: usize) -> bool {
    let Some(arm64) = detail.arm64() else {
        return false;
    };
    let mut ops = arm64.operands();
    let first = ops.nth(a).map(|op| op.op_type);
    let mut ops = arm64.operands();
    let second = ops.nth(b).map(|op| op.op_type);
    matches!(
        (first, second),
        (Some(Arm64OperandType::Reg(r1)), Some(Arm64OperandType::Reg(r2))) if r1 == r2
    )
}

/// Selects the 32-bit keep-mask for one decoded instruction per the rule
/// table in §4.4. Aliases observe the same mask as their canonical
/// mnemonic because Capstone's `mnemonic()` already reflects alias
/// resolution (e.g. `mov` for an `orr`-encoded move).
fn mask_for(mnemonic: &str, detail: &ArchDetail) -> u32 {
    match mnemonic {
        "sub" => {
            if operand_is_reg(detail, 1, Arm64Reg::ARM64_REG_SP) {
                0xFFFF_FFFF
            } else if regs_equal(detail, 0, 1) {
                0xFFC0_03FF
            } else if !regs_equal(detail, 0, 1) && operand_kind(detail, 2) == Some(OperandKind::Reg) {
                0xFFFF_E3FF
            } else if operand_kind(detail, 2) == Some(OperandKind::Imm) {
                0xFFFF_03FF
            } else {
                0
            }
        }
        "add" => {
            if operand_is_reg(detail, 1, Arm64Reg::ARM64_REG_SP) {
                0xFFFF_FFFF
            } else if regs_equal(detail, 0, 1) {
                0xFFC0_03FF
            } else if !regs_equal(detail, 0, 1) && operand_kind(detail, 2) == Some(OperandKind::Reg) {
                0xFFFF_E3FF
            } else if operand_kind(detail, 2) == Some(OperandKind::Imm) {
                0xFFFF_03FF
            } else {
                0
            }
        }
        "mov" => {
            if operand_kind(detail, 0) == Some(OperandKind::Reg) && operand_kind(detail, 1) == Some(OperandKind::Reg) {
                0xFFFF_FFFF
            } else {
                0xFFE0_FC00
            }
        }
        "stp" => {
            if operand_is_mem_base(detail, 2, Arm64Reg::ARM64_REG_SP) {
                0xFFFF_FFFF
            } else {
                0xFFFF_8000
            }
        }
        "str" => {
            if operand_is_mem_base(detail, 1, Arm64Reg::ARM64_REG_SP) {
                0xFFFF_FFFF
            } else {
                0xFFC0_0000
            }
        }
        "ldr" => {
            if operand_is_mem_base(detail, 1, Arm64Reg::ARM64_REG_SP) {
                0xFFFF_FFFF
            } else {
                0xFF00_0000
            }
        }
        "strb" => 0xFFE0_FC00,
        "brk" => 0xFFFF_FFFF,
        "b" | "bl" => 0xFC00_0000,
        "cbz" | "cbnz" => 0xFF00_0000,
        "adrp" => 0x9F00_0000,
        "fmov" => {
            if operand_kind(detail, 0) == Some(OperandKind::Reg) && operand_kind(detail, 1) == Some(OperandKind::Reg) {
                0xFFFF_FFFF
            } else {
                0
            }
        }
        "ret" => 0xFFFF_FC1F,
        "ldp" => 0xFFC0_0000,
        "blr" | "br" => 0xFFFF_FC1F,
        "tbz" => 0xFFF8_001F,
        "stur" => 0xFFE0_0C00,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn b_instruction_wildcards_target() {
        // b #0xc ; encoding 0x14000003 little-endian
        let data = 0x14000003u32.to_le_bytes();
        let mut gen = Arm64Generator::new(&data);
        let mut tokens = Pattern::new();
        gen.next_opcode(&mut tokens).unwrap();
        assert_eq!(tokens.to_string(), "?? ?? ?? 14");
    }

    #[test]
    fn reg_to_reg_mov_is_kept_exact() {
        // mov x0, x1 -> orr x0, xzr, x1 : 0xAA0103E0
        let data = 0xAA0103E0u32.to_le_bytes();
        let mut gen = Arm64Generator::new(&data);
        let mut tokens = Pattern::new();
        gen.next_opcode(&mut tokens).unwrap();
        assert_eq!(tokens.to_string(), "e0 03 01 aa");
    }

    #[test]
    fn exhausted_stream_fails_cleanly() {
        let data = [0x00u8, 0x01];
        let mut gen = Arm64Generator::new(&data);
        let mut tokens = Pattern::new();
        assert_eq!(gen.next_opcode(&mut tokens), Err(GenerateError::NotFound));
    }

    #[test]
    fn token_count_is_multiple_of_four() {
        let data = 0x14000003u32.to_le_bytes();
        let mut gen = Arm64Generator::new(&data);
        let mut tokens = Pattern::new();
        gen.next_opcode(&mut tokens).unwrap();
        assert_eq!(tokens.len() % 4, 0);
    }
}
