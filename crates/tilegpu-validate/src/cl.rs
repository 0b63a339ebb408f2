//! Single-pass scanner over one command list.
//!
//! Each step whitelists the opcode for the current list type, checks the
//! packet's exact length against the remaining input, copies the packet into
//! the trusted output arena, and applies the opcode's relocation. The
//! BO-handles pseudo-packet is consumed without being copied. A halt opcode
//! stops the scan; trailing bytes after it are intentionally ignored.

use core::fmt;

use tilegpu_protocol::{ops, TileBuffer};
use tracing::trace;

use crate::bytes::{read_u32, write_u32};
use crate::error::ValidateError;
use crate::exec::{ShaderStateKind, ShaderStateRequest, ValidationContext};
use crate::table::{lookup, RelocKind};

/// Which of the two command-list halves is being validated. The whitelist is
/// independent per list: an opcode may be legal in one, both, or neither.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClKind {
    Bin,
    Render,
}

impl fmt::Display for ClKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClKind::Bin => f.write_str("bin"),
            ClKind::Render => f.write_str("render"),
        }
    }
}

/// Validates one command list, returning the trusted copy with relocations
/// applied.
///
/// The input is untrusted; nothing is read from a packet before its whitelist
/// length has been checked against the remaining stream. The output never
/// exceeds the input in length (the BO-handles packets are elided).
pub fn validate_cl(
    ctx: &mut ValidationContext<'_>,
    kind: ClKind,
    unvalidated: &[u8],
) -> Result<Vec<u8>, ValidateError> {
    let mut validated = Vec::new();
    validated
        .try_reserve_exact(unvalidated.len())
        .map_err(|_| ValidateError::InternalAllocationFailure)?;

    let mut src_offset = 0usize;
    while src_offset < unvalidated.len() {
        let opcode = unvalidated[src_offset];
        let at = src_offset as u32;

        let info = lookup(opcode).ok_or(ValidateError::InvalidOpcode { at, opcode })?;

        let legal = match kind {
            ClKind::Bin => info.bin,
            ClKind::Render => info.render,
        };
        if !legal {
            return Err(ValidateError::InvalidOpcodeForList {
                at,
                opcode,
                name: info.name,
                cl: kind,
            });
        }

        let len = info.len as usize;
        let have = unvalidated.len() - src_offset;
        if len > have {
            return Err(ValidateError::TruncatedStream {
                at,
                need: info.len as u32,
                have: have as u32,
            });
        }

        trace!(at, opcode, name = info.name, len, "validating packet");

        let src_pkt = &unvalidated[src_offset..src_offset + len];
        if info.reloc == RelocKind::BoHandles {
            // Handle loading primes the next packet's relocation inputs and
            // produces no hardware-visible bytes.
            resolve_bo_handles(ctx, &src_pkt[1..])?;
        } else {
            let dst_offset = validated.len();
            validated.extend_from_slice(src_pkt);
            apply_reloc(ctx, info.reloc, &mut validated[dst_offset + 1..], &src_pkt[1..])?;
        }

        src_offset += len;

        // Hardware stops reading at halt; so do we.
        if opcode == ops::HALT {
            break;
        }
    }

    Ok(validated)
}

/// Validates the two handle indices of a BO-handles packet and stores them in
/// the context's scratch slots for whichever packet follows.
fn resolve_bo_handles(
    ctx: &mut ValidationContext<'_>,
    body: &[u8],
) -> Result<(), ValidateError> {
    let slots = [read_u32(body, 0), read_u32(body, 4)];
    for index in slots {
        ctx.check_handle(index)?;
    }
    ctx.prime_scratch(slots);
    Ok(())
}

/// Applies one packet's relocation. `validated` and `untrusted` are the
/// packet body (past the opcode byte); the whitelist guarantees both are
/// exactly as long as the opcode declares.
///
/// Base-add relocations deliberately perform no extent check on the resulting
/// address: a relocated offset is only known to land inside *a* declared
/// buffer object, not the intended sub-region. Strengthening this requires
/// per-packet knowledge of the access size, which only the indexed-primitive
/// packet provides today.
fn apply_reloc(
    ctx: &mut ValidationContext<'_>,
    reloc: RelocKind,
    validated: &mut [u8],
    untrusted: &[u8],
) -> Result<(), ValidateError> {
    match reloc {
        RelocKind::None => Ok(()),
        RelocKind::BranchToSublist => {
            // XXX: validate the address jumped to.
            let target = ctx.scratch_bo(0)?;
            relocate(validated, untrusted, 0, target.paddr);
            Ok(())
        }
        RelocKind::LoadstoreTileBufferGeneral => {
            if untrusted[0] & 0xf == TileBuffer::None as u8 {
                return Ok(());
            }
            // XXX: validate the address offset.
            let fbo = ctx.scratch_bo(0)?;
            relocate(validated, untrusted, 2, fbo.paddr);
            Ok(())
        }
        RelocKind::IndexedPrimList => validate_indexed_prim_list(ctx, validated, untrusted),
        RelocKind::GlShaderState => shader_state_request(ctx, validated, untrusted, ShaderStateKind::Gl),
        RelocKind::NvShaderState => shader_state_request(ctx, validated, untrusted, ShaderStateKind::Nv),
        RelocKind::TileBinningConfig => {
            let tile_allocation = ctx.scratch_bo(0)?;
            let tile_state = ctx.scratch_bo(1)?;
            // XXX: validate the offsets.
            relocate(validated, untrusted, 0, tile_allocation.paddr);
            relocate(validated, untrusted, 8, tile_state.paddr);
            Ok(())
        }
        RelocKind::TileRenderingConfig => {
            let fbo = ctx.scratch_bo(0)?;
            // XXX: validate the offset.
            relocate(validated, untrusted, 0, fbo.paddr);
            Ok(())
        }
        // Handled (and elided) by the walker before copying.
        RelocKind::BoHandles => Ok(()),
    }
}

/// Rewrites the buffer-relative u32 at `at` into an absolute address.
fn relocate(validated: &mut [u8], untrusted: &[u8], at: usize, paddr: u32) {
    write_u32(validated, at, read_u32(untrusted, at).wrapping_add(paddr));
}

/// Indexed primitive list: bounds-check the whole index fetch range against
/// the index buffer before relocating its address.
fn validate_indexed_prim_list(
    ctx: &mut ValidationContext<'_>,
    validated: &mut [u8],
    untrusted: &[u8],
) -> Result<(), ValidateError> {
    let max_index = read_u32(untrusted, 9);
    let index_size: u32 = if untrusted[0] >> 4 != 0 { 2 } else { 1 };

    // max_index + 1 indices are fetched; u32::MAX would wrap the count.
    if max_index == u32::MAX {
        return Err(ValidateError::Overflow { max_index });
    }
    let access_end = (max_index + 1)
        .checked_mul(index_size)
        .ok_or(ValidateError::Overflow { max_index })?;

    let ib = ctx.scratch_bo(0)?;
    if access_end > ib.size {
        return Err(ValidateError::OutOfBounds {
            end: access_end,
            size: ib.size,
        });
    }

    relocate(validated, untrusted, 5, ib.paddr);
    Ok(())
}

/// GL/NV shader state: record the request for the shader-record pass and
/// rebase the address onto the shader-record region.
fn shader_state_request(
    ctx: &mut ValidationContext<'_>,
    validated: &mut [u8],
    untrusted: &[u8],
    state_kind: ShaderStateKind,
) -> Result<(), ValidateError> {
    let addr = read_u32(untrusted, 0);

    if state_kind == ShaderStateKind::Nv && addr & 0xf != 0 {
        return Err(ValidateError::Misaligned { addr });
    }

    ctx.push_shader_state(ShaderStateRequest {
        kind: state_kind,
        addr,
    })?;

    write_u32(validated, 0, addr.wrapping_add(ctx.shader_rec_paddr()));
    Ok(())
}
