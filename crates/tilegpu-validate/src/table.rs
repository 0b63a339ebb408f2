//! Static whitelist of command packets.
//!
//! Every legal opcode is enumerated here with its per-list legality, its
//! exact wire length (including the opcode byte), and the relocation work it
//! needs. Any opcode without an entry is unconditionally rejected, which
//! covers all reserved and unused ranges. The table is plain `'static` data,
//! safe to consult from concurrent validations.

use tilegpu_protocol::ops;

/// Relocation/validation work attached to a whitelisted packet, dispatched by
/// `match` in the walker. Packet extents are already guaranteed by the
/// whitelist length before any handler runs, so handlers only check
/// cross-references into buffer objects.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RelocKind {
    /// Copy verbatim, nothing to rewrite.
    None,
    /// Add scratch BO 0's physical base to the u32 at body offset 0.
    BranchToSublist,
    /// Add scratch BO 0's physical base to the u32 at body offset 2, unless
    /// the packet targets no tile buffer.
    LoadstoreTileBufferGeneral,
    /// Bounds-check the index buffer extent, then add scratch BO 0's physical
    /// base to the u32 at body offset 5.
    IndexedPrimList,
    /// Record a GL shader-state request and rebase its address onto the
    /// shader-record region.
    GlShaderState,
    /// As [`RelocKind::GlShaderState`] for the single-stage variant, plus a
    /// 16-byte alignment check.
    NvShaderState,
    /// Add scratch BO 0/1 physical bases to the u32s at body offsets 0 and 8.
    TileBinningConfig,
    /// Add scratch BO 0's physical base to the u32 at body offset 0.
    TileRenderingConfig,
    /// Resolve the packet's handle indices into the scratch slots; the packet
    /// is consumed and never copied to the output stream.
    BoHandles,
}

/// Whitelist entry for one opcode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CmdInfo {
    /// Legal in the bin (tile binning) list.
    pub bin: bool,
    /// Legal in the render list.
    pub render: bool,
    /// Exact packet length in bytes, opcode byte included.
    pub len: u16,
    pub name: &'static str,
    pub reloc: RelocKind,
}

impl CmdInfo {
    const fn new(bin: bool, render: bool, len: u16, name: &'static str, reloc: RelocKind) -> Self {
        Self {
            bin,
            render,
            len,
            name,
            reloc,
        }
    }
}

/// Looks up the whitelist entry for `opcode`.
///
/// Total over the full u8 range; unknown values (including 255, one past the
/// highest assigned opcode) return `None` and are rejected by the walker.
pub fn lookup(opcode: u8) -> Option<CmdInfo> {
    use RelocKind as R;

    macro_rules! info {
        ($bin:expr, $render:expr, $len:expr, $name:expr, $reloc:expr) => {
            Some(CmdInfo::new($bin, $render, $len, $name, $reloc))
        };
    }

    match opcode {
        ops::HALT => info!(true, true, 1, "halt", R::None),
        ops::NOP => info!(true, true, 1, "nop", R::None),
        ops::FLUSH => info!(true, true, 1, "flush", R::None),
        ops::FLUSH_ALL_STATE => info!(true, false, 1, "flush all state", R::None),
        ops::START_TILE_BINNING => info!(true, false, 1, "start tile binning", R::None),
        ops::INCREMENT_SEMAPHORE => info!(true, false, 1, "increment semaphore", R::None),
        ops::WAIT_ON_SEMAPHORE => info!(true, true, 1, "wait on semaphore", R::None),

        ops::BRANCH_TO_SUBLIST => info!(true, true, 5, "branch to sublist", R::BranchToSublist),

        ops::STORE_MS_TILE_BUFFER => {
            info!(false, true, 1, "store MS resolved tile color buffer", R::None)
        }
        ops::STORE_MS_TILE_BUFFER_EOF => info!(
            false,
            true,
            1,
            "store MS resolved tile color buffer and EOF",
            R::None
        ),
        ops::STORE_TILE_BUFFER_GENERAL => info!(
            false,
            true,
            7,
            "store tile buffer general",
            R::LoadstoreTileBufferGeneral
        ),
        ops::LOAD_TILE_BUFFER_GENERAL => info!(
            false,
            true,
            7,
            "load tile buffer general",
            R::LoadstoreTileBufferGeneral
        ),

        ops::INDEXED_PRIM_LIST => {
            info!(true, true, 14, "indexed primitive list", R::IndexedPrimList)
        }
        // XXX: bounds check the vertex array against the bound buffers.
        ops::VERTEX_ARRAY_PRIMS => info!(true, true, 10, "vertex array primitives", R::None),

        ops::PRIMITIVE_LIST_FORMAT => info!(true, true, 2, "primitive list format", R::None),

        ops::GL_SHADER_STATE => info!(true, true, 5, "GL shader state", R::GlShaderState),
        ops::NV_SHADER_STATE => info!(true, true, 5, "NV shader state", R::NvShaderState),

        ops::CONFIGURATION_BITS => info!(true, true, 4, "configuration bits", R::None),
        ops::FLAT_SHADE_FLAGS => info!(true, true, 5, "flat shade flags", R::None),
        ops::POINT_SIZE => info!(true, true, 5, "point size", R::None),
        ops::LINE_WIDTH => info!(true, true, 5, "line width", R::None),
        ops::RHT_X_BOUNDARY => info!(true, true, 3, "RHT X boundary", R::None),
        ops::DEPTH_OFFSET => info!(true, true, 5, "depth offset", R::None),
        ops::CLIP_WINDOW => info!(true, true, 9, "clip window", R::None),
        ops::VIEWPORT_OFFSET => info!(true, true, 5, "viewport offset", R::None),
        ops::CLIPPER_XY_SCALING => info!(true, true, 9, "clipper XY scaling", R::None),
        ops::CLIPPER_Z_SCALE_AND_OFFSET => {
            info!(true, true, 9, "clipper Z scale and offset", R::None)
        }

        ops::TILE_BINNING_MODE_CONFIG => info!(
            true,
            false,
            16,
            "tile binning mode configuration",
            R::TileBinningConfig
        ),
        ops::TILE_RENDERING_MODE_CONFIG => info!(
            false,
            true,
            11,
            "tile rendering mode configuration",
            R::TileRenderingConfig
        ),
        ops::CLEAR_COLORS => info!(false, true, 14, "clear colors", R::None),
        ops::TILE_COORDINATES => info!(false, true, 3, "tile coordinates", R::None),

        ops::BO_HANDLES => info!(true, true, 9, "BO handles", R::BoHandles),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_opcodes_have_no_entry() {
        // Gaps inside the assigned ranges and both ends of the u8 range.
        for opcode in [2u8, 3, 9, 16, 26, 104, 116, 253, 255] {
            assert!(lookup(opcode).is_none(), "opcode {opcode}");
        }
    }

    #[test]
    fn boundary_one_past_highest_assigned_is_rejected() {
        assert!(lookup(ops::BO_HANDLES).is_some());
        assert!(lookup(ops::BO_HANDLES + 1).is_none());
    }

    #[test]
    fn every_entry_has_a_plausible_length() {
        let mut seen = 0;
        for opcode in 0..=u8::MAX {
            if let Some(info) = lookup(opcode) {
                assert!(info.len >= 1, "opcode {opcode}");
                assert!(info.bin || info.render, "opcode {opcode}");
                assert!(!info.name.is_empty(), "opcode {opcode}");
                seen += 1;
            }
        }
        assert_eq!(seen, 32);
    }
}
