//! Masked byte-pattern model, synthesis loop and scanner for `bromascan`.
//!
//! This module is part of the `bromascan` crate family.

mod error;
mod scan;
mod synth;
mod token;

pub use error::GenerateError;
pub use scan::scan;
pub use synth::{synthesize, StepGenerator, DEFAULT_MAX_TOKENS};
pub use token::{find, Pattern, PatternParseError, Token};
