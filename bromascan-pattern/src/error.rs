/// Why pattern synthesis failed for one method (§7).
///
/// Always local to the method being processed: a worker records this and
/// moves on to the next method (§4.7, Failure semantics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    /// The pattern could not be grown to uniqueness before the step
    /// generator exhausted its input, or a scan found no hit.
    #[error("no unique match found")]
    NotFound,
    /// The pattern grew past the synthesis budget without becoming unique.
    #[error("pattern exceeded the token budget")]
    PatternTooLarge,
    /// The step generator could not decode the next instruction.
    #[error("could not decode instruction")]
    InvalidInstruction,
}
