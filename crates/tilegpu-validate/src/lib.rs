//! Command-list validator for an IOMMU-less tile GPU.
//!
//! The device addresses system memory physically, with no translation unit in
//! between. A client that can submit command lists could therefore escalate
//! privilege by pointing the GPU at arbitrary memory (drawing to it as a
//! framebuffer, or reading it back as texture, uniform, or vertex data). This
//! crate is the sole boundary preventing that: it treats every submitted byte
//! as **untrusted**, whitelists packets by opcode and exact length, checks
//! every buffer-relative offset it understands, and rewrites those offsets
//! into absolute physical addresses while copying the stream into a trusted
//! output buffer.
//!
//! Validation runs in three stages over one [`ValidationContext`]:
//!
//! 1. the bin command list, 2. the render command list (both via
//!    [`validate_cl`]), accumulating the shader-state requests they make;
//! 3. the shader-record blob ([`validate_shader_recs`]), which checks those
//!    requests for offset consistency and relocates the buffer references
//!    each record embeds.
//!
//! [`validate_submission`] drives all three and fails the whole submission on
//! the first error; a partially copied output buffer must never be handed to
//! the hardware.
//!
//! Caller contract: every [`BufferObject`] passed in must stay pinned, with
//! its size and physical base unchanged, from before validation until the
//! hardware has finished executing the validated stream. The validator cannot
//! enforce this locally.
//!
//! Validation is synchronous and allocates only its output buffers; distinct
//! submissions may be validated concurrently since the only shared state is
//! the static opcode table.

mod bytes;
mod cl;
mod error;
mod exec;
mod shader_rec;
mod table;

pub use cl::{validate_cl, ClKind};
pub use error::ValidateError;
pub use exec::{
    validate_submission, BufferObject, ShaderStateKind, ShaderStateRequest, Submission,
    ValidatedSubmission, ValidationContext,
};
pub use shader_rec::validate_shader_recs;
pub use table::{lookup, CmdInfo, RelocKind};
