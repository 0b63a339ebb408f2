//! End-to-end submission validation: resolver, both walkers, and the
//! shader-record pass driven through `validate_submission`.

use pretty_assertions::assert_eq;
use tilegpu_protocol::shader_rec::NV_PACKET_SIZE;
use tilegpu_protocol::{
    ClWriter, IndexType, LoadStoreFlags, PrimitiveMode, ShaderRecWriter, TileBuffer,
};
use tilegpu_validate::{
    validate_submission, BufferObject, ShaderStateKind, Submission, ValidateError,
};

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

const IB: u32 = 0; // index buffer
const FB: u32 = 1; // framebuffer
const TILE_ALLOC: u32 = 2;
const TILE_STATE: u32 = 3;
const SHADER: u32 = 4;

fn bo_table() -> [BufferObject; 5] {
    [
        BufferObject {
            size: 0x100,
            paddr: 0x1000_0000,
        },
        BufferObject {
            size: 0x10_0000,
            paddr: 0x2000_0000,
        },
        BufferObject {
            size: 0x8000,
            paddr: 0x3000_0000,
        },
        BufferObject {
            size: 0x4000,
            paddr: 0x4000_0000,
        },
        BufferObject {
            size: 0x1000,
            paddr: 0x5000_0000,
        },
    ]
}

const SHADER_REC_PADDR: u32 = 0x0600_0000;

fn bin_list() -> Vec<u8> {
    let mut w = ClWriter::new();
    w.bo_handles(TILE_ALLOC, TILE_STATE);
    w.tile_binning_mode_config(0x100, 0x2000, 0x40, 10, 8, 0x04);
    w.start_tile_binning();
    w.nv_shader_state(0);
    w.bo_handles(IB, IB);
    w.indexed_prim_list(PrimitiveMode::Triangles, IndexType::U16, 36, 0x20, 0x7f);
    w.increment_semaphore();
    w.flush();
    w.finish()
}

fn render_list() -> Vec<u8> {
    let mut w = ClWriter::new();
    w.bo_handles(FB, FB);
    w.tile_rendering_mode_config(0, 640, 480, 0);
    w.wait_on_semaphore();
    w.tile_coordinates(0, 0);
    w.store_tile_buffer_general(TileBuffer::Color, LoadStoreFlags::empty(), 0, 0);
    w.store_ms_tile_buffer_eof();
    w.halt();
    w.finish()
}

fn shader_rec_blob() -> Vec<u8> {
    let mut body = [0u8; NV_PACKET_SIZE];
    body[4..8].copy_from_slice(&0x10u32.to_le_bytes());
    body[8..12].copy_from_slice(&0x20u32.to_le_bytes());
    body[12..16].copy_from_slice(&0x30u32.to_le_bytes());
    let mut rec = ShaderRecWriter::new();
    rec.nv_record([SHADER, SHADER, SHADER], &body);
    rec.finish()
}

#[test]
fn full_submission_round_trip() {
    let bos = bo_table();
    let bin = bin_list();
    let render = render_list();
    let blob = shader_rec_blob();

    let submission = Submission {
        bin_cl: &bin,
        render_cl: &render,
        shader_rec: &blob,
        shader_state_count: 1,
    };
    let out = validate_submission(&submission, &bos, SHADER_REC_PADDR).unwrap();

    // Two 9-byte handle packets elided from the bin list.
    assert_eq!(out.bin_cl.len(), bin.len() - 18);
    // Tile binning config relocations.
    assert_eq!(read_u32(&out.bin_cl, 1), 0x100 + 0x3000_0000);
    assert_eq!(read_u32(&out.bin_cl, 9), 0x40 + 0x4000_0000);
    // NV shader state rebased onto the shader-record region (offset 17 is the
    // packet's body after config + start-tile-binning).
    assert_eq!(read_u32(&out.bin_cl, 18), SHADER_REC_PADDR);
    // Indexed primitive list index buffer address.
    assert_eq!(read_u32(&out.bin_cl, 28), 0x20 + 0x1000_0000);

    // One handle packet elided from the render list.
    assert_eq!(out.render_cl.len(), render.len() - 9);
    assert_eq!(read_u32(&out.render_cl, 1), 0x2000_0000);
    // Store-general address at body offset 2 of the packet at offset 15.
    assert_eq!(read_u32(&out.render_cl, 18), 0x2000_0000);

    // Shader record relocated against the shader BO.
    assert_eq!(out.shader_rec.len(), NV_PACKET_SIZE);
    assert_eq!(read_u32(&out.shader_rec, 4), 0x5000_0010);
    assert_eq!(read_u32(&out.shader_rec, 8), 0x5000_0020);
    assert_eq!(read_u32(&out.shader_rec, 12), 0x5000_0030);

    assert_eq!(out.shader_states.len(), 1);
    assert_eq!(out.shader_states[0].kind, ShaderStateKind::Nv);
    assert_eq!(out.shader_states[0].addr, 0);
}

#[test]
fn failure_in_the_render_list_rejects_the_whole_submission() {
    let bos = bo_table();
    let bin = bin_list();
    // Bin-only opcode in the render list.
    let mut w = ClWriter::new();
    w.start_tile_binning();
    let render = w.finish();
    let blob = shader_rec_blob();

    let submission = Submission {
        bin_cl: &bin,
        render_cl: &render,
        shader_rec: &blob,
        shader_state_count: 1,
    };
    let err = validate_submission(&submission, &bos, SHADER_REC_PADDR).unwrap_err();
    assert!(matches!(err, ValidateError::InvalidOpcodeForList { .. }));
}

#[test]
fn failure_in_the_record_pass_rejects_the_whole_submission() {
    let bos = bo_table();
    let bin = bin_list();
    let render = render_list();

    let submission = Submission {
        bin_cl: &bin,
        render_cl: &render,
        shader_rec: &[], // request exists but the blob is empty
        shader_state_count: 1,
    };
    let err = validate_submission(&submission, &bos, SHADER_REC_PADDR).unwrap_err();
    assert_eq!(
        err,
        ValidateError::TruncatedStream {
            at: 0,
            need: 28,
            have: 0,
        }
    );
}

#[test]
fn empty_submission_validates_to_empty_outputs() {
    let submission = Submission {
        bin_cl: &[],
        render_cl: &[],
        shader_rec: &[],
        shader_state_count: 0,
    };
    let out = validate_submission(&submission, &[], 0).unwrap();
    assert!(out.bin_cl.is_empty());
    assert!(out.render_cl.is_empty());
    assert!(out.shader_rec.is_empty());
    assert!(out.shader_states.is_empty());
}
