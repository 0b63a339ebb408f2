use crate::cl::ClKind;

/// Reason a submission was rejected.
///
/// Every variant is terminal for the submission: the caller must discard the
/// (possibly partially written) output buffers and report the failure. Offsets
/// are byte offsets into the stream being validated when the check failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidateError {
    #[error("0x{at:08x}: packet {opcode} is not a recognized command")]
    InvalidOpcode { at: u32, opcode: u8 },

    #[error("0x{at:08x}: packet {opcode} ({name}) not allowed in {cl} list")]
    InvalidOpcodeForList {
        at: u32,
        opcode: u8,
        name: &'static str,
        cl: ClKind,
    },

    #[error("0x{at:08x}: need {need} bytes, only {have} remaining")]
    TruncatedStream { at: u32, need: u32, have: u32 },

    #[error("buffer handle index {index} out of range (bo count {count})")]
    HandleOutOfRange { index: u32, count: u32 },

    #[error("index buffer access end 0x{end:08x} exceeds buffer size 0x{size:08x}")]
    OutOfBounds { end: u32, size: u32 },

    #[error("index arithmetic overflow (max index 0x{max_index:08x})")]
    Overflow { max_index: u32 },

    #[error("shader state address 0x{addr:08x} misaligned")]
    Misaligned { addr: u32 },

    #[error("more shader state requests than the declared count {declared}")]
    TooManyShaderStates { declared: u32 },

    #[error("shader record address 0x{addr:08x} does not match expected offset 0x{expected:08x}")]
    ShaderRecOffsetMismatch { expected: u32, addr: u32 },

    #[error("failed to allocate validated output buffer")]
    InternalAllocationFailure,
}
