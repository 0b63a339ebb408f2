//! Opcode byte values for the bin/render command lists.
//!
//! The set is deliberately sparse: every value not named here is reserved and
//! must be rejected by the validator. Packet lengths (including the opcode
//! byte itself) live in the validator's whitelist table next to the per-list
//! legality bits, since they are trust policy rather than encoding detail.

pub const HALT: u8 = 0;
pub const NOP: u8 = 1;
pub const FLUSH: u8 = 4;
pub const FLUSH_ALL_STATE: u8 = 5;
pub const START_TILE_BINNING: u8 = 6;
pub const INCREMENT_SEMAPHORE: u8 = 7;
pub const WAIT_ON_SEMAPHORE: u8 = 8;

pub const BRANCH_TO_SUBLIST: u8 = 17;

pub const STORE_MS_TILE_BUFFER: u8 = 24;
pub const STORE_MS_TILE_BUFFER_EOF: u8 = 25;
pub const STORE_TILE_BUFFER_GENERAL: u8 = 28;
pub const LOAD_TILE_BUFFER_GENERAL: u8 = 29;

pub const INDEXED_PRIM_LIST: u8 = 32;
pub const VERTEX_ARRAY_PRIMS: u8 = 33;

pub const PRIMITIVE_LIST_FORMAT: u8 = 56;

pub const GL_SHADER_STATE: u8 = 64;
pub const NV_SHADER_STATE: u8 = 65;

pub const CONFIGURATION_BITS: u8 = 96;
pub const FLAT_SHADE_FLAGS: u8 = 97;
pub const POINT_SIZE: u8 = 98;
pub const LINE_WIDTH: u8 = 99;
pub const RHT_X_BOUNDARY: u8 = 100;
pub const DEPTH_OFFSET: u8 = 101;
pub const CLIP_WINDOW: u8 = 102;
pub const VIEWPORT_OFFSET: u8 = 103;
pub const CLIPPER_XY_SCALING: u8 = 105;
pub const CLIPPER_Z_SCALE_AND_OFFSET: u8 = 106;

pub const TILE_BINNING_MODE_CONFIG: u8 = 112;
pub const TILE_RENDERING_MODE_CONFIG: u8 = 113;
pub const CLEAR_COLORS: u8 = 114;
pub const TILE_COORDINATES: u8 = 115;

/// Pseudo-packet carrying two buffer-object handle indices. Consumed by the
/// validator to prime relocation for the following packet; never emitted into
/// the hardware-visible stream.
pub const BO_HANDLES: u8 = 254;
