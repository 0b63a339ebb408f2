//! Second-stage validation of the shader-record blob.
//!
//! The command-list pass records which shader states were requested and at
//! which addresses; this pass walks the blob in request order, checks that
//! each request's address is consistent with where its record actually lands
//! in the output region, resolves every buffer handle the record embeds, and
//! relocates the buffer-reference fields.
//!
//! Relocated references get no extent check beyond the handle-index range: a
//! reference is only known to point inside *a* buffer object the client
//! declared. Record bodies are opaque here; which programs are semantically
//! valid is not this crate's concern.

use tilegpu_protocol::shader_rec::{
    gl_attribute_count, gl_packet_size, GL_ATTR_BASE, GL_ATTR_STRIDE, GL_BO_OFFSETS,
    GL_MAX_ATTRIBUTES, HANDLE_SIZE, NV_BO_OFFSETS, NV_PACKET_SIZE,
};

use crate::bytes::{read_u32, write_u32};
use crate::error::ValidateError;
use crate::exec::{ShaderStateKind, ShaderStateRequest, ValidationContext};

/// Most handles any one record can carry (a GL record with the full
/// attribute array).
const MAX_REC_HANDLES: usize = GL_BO_OFFSETS.len() + GL_MAX_ATTRIBUTES;

/// Records are packed into the output region at 16-byte boundaries, which is
/// also what makes the request-address consistency check meaningful: the
/// aligned base of each request address must equal the record's output
/// offset.
const REC_ALIGN: usize = 16;

/// Validates the shader-record blob against the requests accumulated during
/// the command-list pass, returning the trusted output region contents.
pub fn validate_shader_recs(
    ctx: &ValidationContext<'_>,
    unvalidated: &[u8],
) -> Result<Vec<u8>, ValidateError> {
    let mut validated = Vec::new();
    validated
        .try_reserve_exact(unvalidated.len())
        .map_err(|_| ValidateError::InternalAllocationFailure)?;

    let mut src_offset = 0usize;
    for state in ctx.shader_states() {
        let consumed = validate_rec(
            ctx,
            state,
            &mut validated,
            &unvalidated[src_offset..],
            src_offset,
        )?;
        src_offset += consumed;
    }

    Ok(validated)
}

/// Validates a single record at the head of `unvalidated`, appending its
/// relocated body (padded to [`REC_ALIGN`]) to `validated`. Returns the
/// number of source bytes consumed.
fn validate_rec(
    ctx: &ValidationContext<'_>,
    state: &ShaderStateRequest,
    validated: &mut Vec<u8>,
    unvalidated: &[u8],
    src_offset: usize,
) -> Result<usize, ValidateError> {
    let dst_offset = validated.len();

    // A client that lies about where its own record lives would desync the
    // addresses already written into the command stream from the region
    // contents built here.
    if state.addr & !0xf != dst_offset as u32 {
        return Err(ValidateError::ShaderRecOffsetMismatch {
            expected: dst_offset as u32,
            addr: state.addr,
        });
    }

    let (bo_offsets, nr_attributes, packet_size): (&[usize], usize, usize) = match state.kind {
        ShaderStateKind::Nv => (&NV_BO_OFFSETS, 0, NV_PACKET_SIZE),
        ShaderStateKind::Gl => {
            let nr_attributes = gl_attribute_count(state.addr);
            (&GL_BO_OFFSETS, nr_attributes, gl_packet_size(nr_attributes))
        }
    };
    let nr_handles = bo_offsets.len() + nr_attributes;

    let needed = nr_handles * HANDLE_SIZE + packet_size;
    if needed > unvalidated.len() {
        return Err(ValidateError::TruncatedStream {
            at: src_offset as u32,
            need: needed as u32,
            have: unvalidated.len() as u32,
        });
    }

    let mut bo_paddr = [0u32; MAX_REC_HANDLES];
    for (i, paddr) in bo_paddr.iter_mut().enumerate().take(nr_handles) {
        let index = read_u32(unvalidated, i * HANDLE_SIZE);
        *paddr = ctx.bo(index)?.paddr;
    }

    let src_pkt = &unvalidated[nr_handles * HANDLE_SIZE..needed];
    validated.extend_from_slice(src_pkt);
    let dst_pkt = &mut validated[dst_offset..];

    for (i, &at) in bo_offsets.iter().enumerate() {
        // XXX: validate the offsets against the referenced buffers.
        write_u32(dst_pkt, at, read_u32(src_pkt, at).wrapping_add(bo_paddr[i]));
    }
    for i in 0..nr_attributes {
        let at = GL_ATTR_BASE + i * GL_ATTR_STRIDE;
        write_u32(
            dst_pkt,
            at,
            read_u32(src_pkt, at).wrapping_add(bo_paddr[bo_offsets.len() + i]),
        );
    }

    // Pad so the next record starts on an aligned boundary.
    let padded = packet_size.next_multiple_of(REC_ALIGN);
    validated.resize(dst_offset + padded, 0);

    Ok(needed)
}
