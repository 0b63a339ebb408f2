//! Wire-format definitions for the tile-GPU command stream.
//!
//! The intent is to keep this as a simple byte-addressed stream so it can be
//! written from a guest/driver context with minimal packing overhead. Each
//! packet is one opcode byte followed by a fixed-length, opcode-determined
//! payload; all multi-byte fields are little-endian and unaligned.
//!
//! This crate only describes the stream. The trust boundary lives in
//! `tilegpu-validate`, which consumes streams written against these
//! definitions (or against nothing at all, in the adversarial case).

pub mod ops;
pub mod shader_rec;

mod writer;

pub use writer::{ClWriter, ShaderRecWriter};

use bitflags::bitflags;

/// Tile-buffer selected by the low nibble of the first payload byte of
/// [`ops::STORE_TILE_BUFFER_GENERAL`] / [`ops::LOAD_TILE_BUFFER_GENERAL`].
///
/// [`TileBuffer::None`] makes the packet a no-op: it carries no address and
/// the validator performs no relocation for it.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TileBuffer {
    None = 0,
    Color = 1,
    Zs = 2,
    Z = 3,
    VgMask = 4,
    Full = 5,
}

bitflags! {
    /// High bits of the first payload byte of the store/load tile buffer
    /// general packets.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct LoadStoreFlags: u8 {
        const DISABLE_SWAP = 1 << 4;
        const DISABLE_COLOR_CLEAR = 1 << 5;
        const DISABLE_ZS_CLEAR = 1 << 6;
        const DISABLE_VG_MASK_CLEAR = 1 << 7;
    }
}

/// Primitive mode in the low nibble of the first payload byte of the
/// primitive-list packets.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrimitiveMode {
    Points = 0,
    Lines = 1,
    LineLoop = 2,
    LineStrip = 3,
    Triangles = 4,
    TriangleStrip = 5,
    TriangleFan = 6,
}

/// Index width for the indexed primitive list packet, encoded in the high
/// nibble of its first payload byte (0 selects 8-bit indices).
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IndexType {
    U8 = 0,
    U16 = 1,
}

impl IndexType {
    /// Width in bytes of a single index of this type.
    pub fn width(self) -> u32 {
        match self {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
        }
    }
}
