//! Layout of the variable-length shader records referenced by the GL/NV
//! shader-state packets.
//!
//! Each record in the blob is a list of 32-bit buffer-object handle indices
//! followed by the record body. The handle count and body size depend on the
//! record variant; for GL records the vertex-attribute count is recovered from
//! the low 3 bits of the shader-state packet's address field (0 decodes to 8).

/// Width in bytes of one handle index preceding a record body.
pub const HANDLE_SIZE: usize = 4;

/// Body offsets of the buffer-referencing fields of a GL record:
/// fragment/vertex/coordinate shader code and uniform addresses.
pub const GL_BO_OFFSETS: [usize; 6] = [4, 8, 16, 20, 28, 32];

/// Body offsets of the buffer-referencing fields of an NV record:
/// shader code, uniforms, and the single vertex buffer.
pub const NV_BO_OFFSETS: [usize; 3] = [4, 8, 12];

/// Fixed body size of an NV record.
pub const NV_PACKET_SIZE: usize = 16;

/// Body size of a GL record before its vertex-attribute array.
pub const GL_PACKET_BASE_SIZE: usize = 36;

/// Body offset of the first vertex-attribute entry of a GL record.
pub const GL_ATTR_BASE: usize = 36;

/// Stride between consecutive vertex-attribute entries; the relocated address
/// sits at the start of each entry.
pub const GL_ATTR_STRIDE: usize = 8;

/// Maximum vertex-attribute count a GL record can encode (low 3 bits of the
/// request address, with 0 meaning 8).
pub const GL_MAX_ATTRIBUTES: usize = 8;

/// Decodes the vertex-attribute count from a GL shader-state address field.
pub fn gl_attribute_count(addr: u32) -> usize {
    match (addr & 0x7) as usize {
        0 => GL_MAX_ATTRIBUTES,
        n => n,
    }
}

/// Body size of a GL record with `nr_attributes` vertex attributes.
pub fn gl_packet_size(nr_attributes: usize) -> usize {
    GL_PACKET_BASE_SIZE + nr_attributes * GL_ATTR_STRIDE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_count_zero_decodes_to_eight() {
        assert_eq!(gl_attribute_count(0x100), 8);
        assert_eq!(gl_attribute_count(0x103), 3);
        assert_eq!(gl_attribute_count(0x107), 7);
    }

    #[test]
    fn gl_offsets_stay_inside_base_body() {
        for o in GL_BO_OFFSETS {
            assert!(o + 4 <= GL_PACKET_BASE_SIZE);
        }
        for o in NV_BO_OFFSETS {
            assert!(o + 4 <= NV_PACKET_SIZE);
        }
    }
}
