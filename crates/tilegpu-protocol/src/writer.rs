//! Append-style encoders for command lists and shader-record blobs.
//!
//! These produce exactly the byte layout the validator's whitelist table
//! expects, so driver code, tests, and fuzz harnesses all build streams the
//! same way. `raw_bytes` is the escape hatch for deliberately malformed
//! streams.

use crate::ops;
use crate::shader_rec::{
    gl_packet_size, GL_BO_OFFSETS, NV_BO_OFFSETS, NV_PACKET_SIZE,
};
use crate::{IndexType, LoadStoreFlags, PrimitiveMode, TileBuffer};

#[derive(Default)]
pub struct ClWriter {
    bytes: Vec<u8>,
}

impl ClWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Appends arbitrary bytes without any framing.
    pub fn raw_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Appends an opcode byte followed by `body`.
    pub fn packet(&mut self, opcode: u8, body: &[u8]) {
        self.bytes.push(opcode);
        self.bytes.extend_from_slice(body);
    }

    fn push_u16(&mut self, v: u16) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    fn push_u32(&mut self, v: u32) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    pub fn halt(&mut self) {
        self.bytes.push(ops::HALT);
    }

    pub fn nop(&mut self) {
        self.bytes.push(ops::NOP);
    }

    pub fn flush(&mut self) {
        self.bytes.push(ops::FLUSH);
    }

    pub fn flush_all_state(&mut self) {
        self.bytes.push(ops::FLUSH_ALL_STATE);
    }

    pub fn start_tile_binning(&mut self) {
        self.bytes.push(ops::START_TILE_BINNING);
    }

    pub fn increment_semaphore(&mut self) {
        self.bytes.push(ops::INCREMENT_SEMAPHORE);
    }

    pub fn wait_on_semaphore(&mut self) {
        self.bytes.push(ops::WAIT_ON_SEMAPHORE);
    }

    /// Branches to a sublist at `offset` within the buffer primed by the
    /// preceding [`bo_handles`](Self::bo_handles) packet.
    pub fn branch_to_sublist(&mut self, offset: u32) {
        self.bytes.push(ops::BRANCH_TO_SUBLIST);
        self.push_u32(offset);
    }

    pub fn store_ms_tile_buffer(&mut self) {
        self.bytes.push(ops::STORE_MS_TILE_BUFFER);
    }

    pub fn store_ms_tile_buffer_eof(&mut self) {
        self.bytes.push(ops::STORE_MS_TILE_BUFFER_EOF);
    }

    pub fn store_tile_buffer_general(
        &mut self,
        buffer: TileBuffer,
        flags: LoadStoreFlags,
        format: u8,
        offset: u32,
    ) {
        self.loadstore_general(ops::STORE_TILE_BUFFER_GENERAL, buffer, flags, format, offset);
    }

    pub fn load_tile_buffer_general(
        &mut self,
        buffer: TileBuffer,
        flags: LoadStoreFlags,
        format: u8,
        offset: u32,
    ) {
        self.loadstore_general(ops::LOAD_TILE_BUFFER_GENERAL, buffer, flags, format, offset);
    }

    fn loadstore_general(
        &mut self,
        opcode: u8,
        buffer: TileBuffer,
        flags: LoadStoreFlags,
        format: u8,
        offset: u32,
    ) {
        self.bytes.push(opcode);
        self.bytes.push(buffer as u8 | flags.bits());
        self.bytes.push(format);
        self.push_u32(offset);
    }

    pub fn indexed_prim_list(
        &mut self,
        mode: PrimitiveMode,
        index_type: IndexType,
        length: u32,
        offset: u32,
        max_index: u32,
    ) {
        self.bytes.push(ops::INDEXED_PRIM_LIST);
        self.bytes.push(mode as u8 | (index_type as u8) << 4);
        self.push_u32(length);
        self.push_u32(offset);
        self.push_u32(max_index);
    }

    pub fn vertex_array_prims(&mut self, mode: PrimitiveMode, length: u32, first: u32) {
        self.bytes.push(ops::VERTEX_ARRAY_PRIMS);
        self.bytes.push(mode as u8);
        self.push_u32(length);
        self.push_u32(first);
    }

    pub fn primitive_list_format(&mut self, format: u8) {
        self.bytes.push(ops::PRIMITIVE_LIST_FORMAT);
        self.bytes.push(format);
    }

    pub fn gl_shader_state(&mut self, addr: u32) {
        self.bytes.push(ops::GL_SHADER_STATE);
        self.push_u32(addr);
    }

    pub fn nv_shader_state(&mut self, addr: u32) {
        self.bytes.push(ops::NV_SHADER_STATE);
        self.push_u32(addr);
    }

    pub fn configuration_bits(&mut self, bits: [u8; 3]) {
        self.packet(ops::CONFIGURATION_BITS, &bits);
    }

    pub fn flat_shade_flags(&mut self, flags: u32) {
        self.bytes.push(ops::FLAT_SHADE_FLAGS);
        self.push_u32(flags);
    }

    pub fn point_size(&mut self, size: f32) {
        self.bytes.push(ops::POINT_SIZE);
        self.push_u32(size.to_bits());
    }

    pub fn line_width(&mut self, width: f32) {
        self.bytes.push(ops::LINE_WIDTH);
        self.push_u32(width.to_bits());
    }

    pub fn rht_x_boundary(&mut self, boundary: i16) {
        self.bytes.push(ops::RHT_X_BOUNDARY);
        self.push_u16(boundary as u16);
    }

    pub fn depth_offset(&mut self, factor: u16, units: u16) {
        self.bytes.push(ops::DEPTH_OFFSET);
        self.push_u16(factor);
        self.push_u16(units);
    }

    pub fn clip_window(&mut self, left: u16, bottom: u16, width: u16, height: u16) {
        self.bytes.push(ops::CLIP_WINDOW);
        self.push_u16(left);
        self.push_u16(bottom);
        self.push_u16(width);
        self.push_u16(height);
    }

    pub fn viewport_offset(&mut self, x: i16, y: i16) {
        self.bytes.push(ops::VIEWPORT_OFFSET);
        self.push_u16(x as u16);
        self.push_u16(y as u16);
    }

    pub fn clipper_xy_scaling(&mut self, x: f32, y: f32) {
        self.bytes.push(ops::CLIPPER_XY_SCALING);
        self.push_u32(x.to_bits());
        self.push_u32(y.to_bits());
    }

    pub fn clipper_z_scale_and_offset(&mut self, scale: f32, offset: f32) {
        self.bytes.push(ops::CLIPPER_Z_SCALE_AND_OFFSET);
        self.push_u32(scale.to_bits());
        self.push_u32(offset.to_bits());
    }

    /// Tile binning mode configuration. The tile-allocation and tile-state
    /// addresses are offsets into the buffers primed by the preceding
    /// [`bo_handles`](Self::bo_handles) packet (slots 0 and 1 respectively).
    pub fn tile_binning_mode_config(
        &mut self,
        alloc_offset: u32,
        alloc_size: u32,
        state_offset: u32,
        width_tiles: u8,
        height_tiles: u8,
        config: u8,
    ) {
        self.bytes.push(ops::TILE_BINNING_MODE_CONFIG);
        self.push_u32(alloc_offset);
        self.push_u32(alloc_size);
        self.push_u32(state_offset);
        self.bytes.push(width_tiles);
        self.bytes.push(height_tiles);
        self.bytes.push(config);
    }

    pub fn tile_rendering_mode_config(
        &mut self,
        fb_offset: u32,
        width: u16,
        height: u16,
        config: u16,
    ) {
        self.bytes.push(ops::TILE_RENDERING_MODE_CONFIG);
        self.push_u32(fb_offset);
        self.push_u16(width);
        self.push_u16(height);
        self.push_u16(config);
    }

    pub fn clear_colors(
        &mut self,
        colors: [u32; 2],
        clear_zs: u32,
        clear_vg_mask: u8,
        clear_stencil: u8,
    ) {
        self.bytes.push(ops::CLEAR_COLORS);
        self.push_u32(colors[0]);
        self.push_u32(colors[1]);
        // 24-bit Z/stencil clear value.
        self.bytes.extend_from_slice(&clear_zs.to_le_bytes()[..3]);
        self.bytes.push(clear_vg_mask);
        self.bytes.push(clear_stencil);
    }

    pub fn tile_coordinates(&mut self, x: u8, y: u8) {
        self.bytes.push(ops::TILE_COORDINATES);
        self.bytes.push(x);
        self.bytes.push(y);
    }

    /// Primes the relocation scratch slots with two buffer-object handle
    /// indices. The packet itself is consumed by validation and never reaches
    /// the hardware stream.
    pub fn bo_handles(&mut self, slot0: u32, slot1: u32) {
        self.bytes.push(ops::BO_HANDLES);
        self.push_u32(slot0);
        self.push_u32(slot1);
    }
}

#[derive(Default)]
pub struct ShaderRecWriter {
    bytes: Vec<u8>,
}

impl ShaderRecWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn raw_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Appends an NV record: three handle indices (code, uniforms, vertex
    /// buffer) followed by the fixed-size body.
    pub fn nv_record(&mut self, handles: [u32; NV_BO_OFFSETS.len()], body: &[u8; NV_PACKET_SIZE]) {
        for h in handles {
            self.bytes.extend_from_slice(&h.to_le_bytes());
        }
        self.bytes.extend_from_slice(body);
    }

    /// Appends a GL record: six fixed handle indices (code + uniforms for the
    /// three shader stages), one handle per vertex attribute, then the body.
    ///
    /// `body.len()` must equal [`gl_packet_size`] for the attribute count
    /// implied by `attr_handles.len()`.
    pub fn gl_record(
        &mut self,
        stage_handles: [u32; GL_BO_OFFSETS.len()],
        attr_handles: &[u32],
        body: &[u8],
    ) {
        debug_assert_eq!(body.len(), gl_packet_size(attr_handles.len()));
        for h in stage_handles {
            self.bytes.extend_from_slice(&h.to_le_bytes());
        }
        for h in attr_handles {
            self.bytes.extend_from_slice(&h.to_le_bytes());
        }
        self.bytes.extend_from_slice(body);
    }
}
