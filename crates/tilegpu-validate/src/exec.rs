//! Per-submission validation state and the top-level driver.

use crate::cl::{validate_cl, ClKind};
use crate::error::ValidateError;
use crate::shader_rec::validate_shader_recs;

/// A pinned GPU-addressable memory allocation, referenced by small integer
/// handle. Allocation, pinning, and physical-address assignment happen
/// outside this crate; the validator only reads these two fields and they
/// must stay valid until execution of the validated stream completes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BufferObject {
    /// Size of the allocation in bytes.
    pub size: u32,
    /// Absolute device-visible base address.
    pub paddr: u32,
}

/// The untrusted input: one submission's raw byte streams plus its declared
/// shader-state capacity. Borrowed for the duration of one validation call.
#[derive(Debug, Copy, Clone)]
pub struct Submission<'a> {
    pub bin_cl: &'a [u8],
    pub render_cl: &'a [u8],
    pub shader_rec: &'a [u8],
    /// Number of shader-state requests the client declared it will make.
    pub shader_state_count: u32,
}

/// Which shader-state variant a command-list packet requested.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStateKind {
    /// Multi-stage record; the low 3 bits of `addr` encode the
    /// vertex-attribute count.
    Gl,
    /// Single-stage record with a fixed layout; `addr` must be 16-byte
    /// aligned.
    Nv,
}

/// One shader-state request recorded during the command-list pass and
/// consumed, in order, by the shader-record pass. This list is the only
/// channel between the two passes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderStateRequest {
    pub kind: ShaderStateKind,
    /// Address field as submitted, before rebasing onto the shader-record
    /// region. Low bits carry variant-specific payload (see
    /// [`ShaderStateKind`]).
    pub addr: u32,
}

/// Mutable state for validating one submission. Constructed fresh per call;
/// nothing survives across submissions.
#[derive(Debug)]
pub struct ValidationContext<'a> {
    bos: &'a [BufferObject],
    /// Handle indices primed by the most recent BO-handles packet. Start out
    /// zero, like the slots of a submission that never primes them.
    scratch: [u32; 2],
    /// Physical base of the shader-record region within the submission's
    /// trusted scratch space (not a buffer object).
    shader_rec_paddr: u32,
    shader_states: Vec<ShaderStateRequest>,
    declared_shader_states: u32,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        bos: &'a [BufferObject],
        shader_rec_paddr: u32,
        declared_shader_states: u32,
    ) -> Self {
        Self {
            bos,
            scratch: [0; 2],
            shader_rec_paddr,
            shader_states: Vec::new(),
            declared_shader_states,
        }
    }

    pub fn bos(&self) -> &'a [BufferObject] {
        self.bos
    }

    pub fn shader_rec_paddr(&self) -> u32 {
        self.shader_rec_paddr
    }

    pub fn shader_states(&self) -> &[ShaderStateRequest] {
        &self.shader_states
    }

    /// Checks `index` against the submission's BO table.
    pub(crate) fn check_handle(&self, index: u32) -> Result<(), ValidateError> {
        if index as usize >= self.bos.len() {
            return Err(ValidateError::HandleOutOfRange {
                index,
                count: self.bos.len() as u32,
            });
        }
        Ok(())
    }

    /// Resolves a BO handle index to its buffer object.
    pub(crate) fn bo(&self, index: u32) -> Result<&'a BufferObject, ValidateError> {
        self.check_handle(index)?;
        Ok(&self.bos[index as usize])
    }

    /// Stores validated handle indices into the scratch slots.
    pub(crate) fn prime_scratch(&mut self, slots: [u32; 2]) {
        self.scratch = slots;
    }

    /// Resolves scratch slot `slot` to its buffer object. Fails only for a
    /// submission that references the slot without ever priming it while
    /// declaring zero buffer objects.
    pub(crate) fn scratch_bo(&self, slot: usize) -> Result<&'a BufferObject, ValidateError> {
        self.bo(self.scratch[slot])
    }

    /// Records one shader-state request, enforcing the declared capacity.
    pub(crate) fn push_shader_state(
        &mut self,
        request: ShaderStateRequest,
    ) -> Result<(), ValidateError> {
        if self.shader_states.len() as u32 >= self.declared_shader_states {
            return Err(ValidateError::TooManyShaderStates {
                declared: self.declared_shader_states,
            });
        }
        self.shader_states.push(request);
        Ok(())
    }
}

/// The trusted output of a successful validation, ready for the execution
/// backend. All buffer-relative offsets have been rewritten to absolute
/// physical addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub bin_cl: Vec<u8>,
    pub render_cl: Vec<u8>,
    pub shader_rec: Vec<u8>,
    /// The requests made by the command lists, in order, for the execution
    /// backend's bookkeeping.
    pub shader_states: Vec<ShaderStateRequest>,
}

/// Validates one whole submission: bin list, render list, then the
/// shader-record blob, all against `bos` and the shader-record region at
/// `shader_rec_paddr`.
///
/// Fails atomically: on any error the submission must be rejected and none of
/// the output handed to hardware.
pub fn validate_submission(
    submission: &Submission<'_>,
    bos: &[BufferObject],
    shader_rec_paddr: u32,
) -> Result<ValidatedSubmission, ValidateError> {
    let mut ctx = ValidationContext::new(bos, shader_rec_paddr, submission.shader_state_count);

    let bin_cl = validate_cl(&mut ctx, ClKind::Bin, submission.bin_cl)?;
    let render_cl = validate_cl(&mut ctx, ClKind::Render, submission.render_cl)?;
    let shader_rec = validate_shader_recs(&ctx, submission.shader_rec)?;

    Ok(ValidatedSubmission {
        bin_cl,
        render_cl,
        shader_rec,
        shader_states: ctx.shader_states,
    })
}
