use bromascan_pattern::{GenerateError, Pattern, StepGenerator, Token};
use iced_x86::{Code, Decoder, DecoderOptions, Instruction};

/// Disassembles x86-64 instructions one at a time, wildcarding only the
/// displacement bytes of each instruction (§4.3).
///
/// Immediates are left exact, matching the original tool's behavior: its
/// wildcard branch for `IMMEDIATE` segments exists in source but is
/// commented out, so stable immediates still over-specify the pattern.
pub struct X86Generator<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> X86Generator<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        X86Generator { data, position: 0 }
    }
}

impl StepGenerator for X86Generator<'_> {
    const ITER_SIZE: usize = 1;

    fn next_opcode(&mut self, tokens: &mut Pattern) -> Result<(), GenerateError> {
        if self.position >= self.data.len() {
            return Err(GenerateError::NotFound);
        }

        let remaining = &self.data[self.position..];
        let mut decoder = Decoder::new(64, remaining, DecoderOptions::NONE);
        decoder.set_ip(self.position as u64);

        let mut instr = Instruction::default();
        decoder.decode_out(&mut instr);

        if instr.is_invalid() || instr.code() == Code::Int3 {
            return Err(GenerateError::NotFound);
        }

        let length = instr.len();
        let bytes = &remaining[..length];
        let offsets = decoder.get_constant_offsets(&instr);

        let displacement_range = offsets
            .has_displacement()
            .then(|| offsets.displacement_offset()..offsets.displacement_offset() + offsets.displacement_size());

        for (i, &byte) in bytes.iter().enumerate() {
            let wildcard = displacement_range.as_ref().is_some_and(|r| r.contains(&i));
            tokens.push(if wildcard { Token::Wildcard } else { Token::Byte(byte) });
        }

        self.position += length;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `push rbp; mov rbp, rsp; call rel32; pop rbp; ret` — the shape used
    /// in the synthesis scenario S1.
    const PROLOGUE: [u8; 11] = [
        0x55, 0x48, 0x89, 0xE5, 0xE8, 0x11, 0x22, 0x33, 0x44, 0x5D, 0xC3,
    ];

    #[test]
    fn wildcards_call_displacement_only() {
        let mut gen = X86Generator::new(&PROLOGUE);
        let mut tokens = Pattern::new();
        for _ in 0..5 {
            gen.next_opcode(&mut tokens).unwrap();
        }
        assert_eq!(tokens.to_string(), "55 48 89 e5 e8 ?? ?? ?? ??");
    }

    #[test]
    fn stops_at_int3_padding() {
        let data = [0x90, 0xCC];
        let mut gen = X86Generator::new(&data);
        let mut tokens = Pattern::new();
        gen.next_opcode(&mut tokens).unwrap();
        assert_eq!(gen.next_opcode(&mut tokens), Err(GenerateError::NotFound));
    }

    #[test]
    fn exhausts_cleanly_at_end_of_buffer() {
        let data = [0x90];
        let mut gen = X86Generator::new(&data);
        let mut tokens = Pattern::new();
        gen.next_opcode(&mut tokens).unwrap();
        assert_eq!(gen.next_opcode(&mut tokens), Err(GenerateError::NotFound));
    }
}
