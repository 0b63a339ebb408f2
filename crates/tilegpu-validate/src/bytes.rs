//! Little-endian field access within packet bodies whose extents the
//! whitelist table has already guaranteed.

pub(crate) fn read_u32(body: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([body[at], body[at + 1], body[at + 2], body[at + 3]])
}

pub(crate) fn write_u32(body: &mut [u8], at: usize, value: u32) {
    body[at..at + 4].copy_from_slice(&value.to_le_bytes());
}
