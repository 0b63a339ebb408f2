#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tilegpu_protocol::ClWriter;
use tilegpu_validate::{validate_cl, validate_shader_recs, BufferObject, ClKind};

/// The record pass is driven by the requests the command-list pass recorded,
/// so synthesize a well-formed command list of shader-state packets and feed
/// the raw fuzzer bytes in as the record blob. This reaches the record
/// parser's deep paths (variant shapes, attribute counts, handle resolution)
/// much faster than mutating whole submissions.
const MAX_REQUESTS: usize = 16;

const MAX_BLOB_SIZE_BYTES: usize = 64 * 1024;

#[derive(Arbitrary, Debug)]
struct FuzzRecs<'a> {
    bos: Vec<(u32, u32)>,
    /// (use_nv_variant, address field) per request.
    requests: Vec<(bool, u32)>,
    blob: &'a [u8],
}

fuzz_target!(|input: FuzzRecs<'_>| {
    if input.blob.len() > MAX_BLOB_SIZE_BYTES {
        return;
    }

    let bos: Vec<BufferObject> = input
        .bos
        .iter()
        .take(8)
        .map(|&(size, paddr)| BufferObject { size, paddr })
        .collect();

    let mut w = ClWriter::new();
    for &(nv, addr) in input.requests.iter().take(MAX_REQUESTS) {
        if nv {
            // Keep the walker from rejecting the request before the record
            // pass gets a chance to look at the blob.
            w.nv_shader_state(addr & !0xf);
        } else {
            w.gl_shader_state(addr);
        }
    }

    let mut ctx = tilegpu_validate::ValidationContext::new(&bos, 0, MAX_REQUESTS as u32);
    if validate_cl(&mut ctx, ClKind::Bin, &w.finish()).is_err() {
        return;
    }

    // All outcomes are acceptable; the record pass must never panic and must
    // never read past the blob.
    let _ = validate_shader_recs(&ctx, input.blob);
});
