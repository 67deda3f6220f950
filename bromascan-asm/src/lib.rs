//! Architecture-specific [`bromascan_pattern::StepGenerator`] implementations:
//! x86-64 (§4.3) and AArch64 (§4.4).
//!
//! This module is part of the `bromascan` crate family.

mod aarch64;
mod x86;

pub use aarch64::Arm64Generator;
pub use x86::X86Generator;
