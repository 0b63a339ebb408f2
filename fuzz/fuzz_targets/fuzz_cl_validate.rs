#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tilegpu_validate::{validate_submission, BufferObject, Submission};

/// Max fuzz input size to keep iterations fast; the validator is a single
/// O(n) pass, so longer streams only repeat the same packet paths.
const MAX_INPUT_SIZE_BYTES: usize = 64 * 1024;

/// Handle indices are checked against the BO table, so a handful of BOs is
/// enough to reach both the in-range and out-of-range paths.
const MAX_BOS: usize = 8;

#[derive(Arbitrary, Debug)]
struct FuzzSubmission<'a> {
    bos: Vec<(u32, u32)>,
    shader_state_count: u8,
    shader_rec_paddr: u32,
    bin_cl: &'a [u8],
    render_cl: &'a [u8],
    shader_rec: &'a [u8],
}

fuzz_target!(|input: FuzzSubmission<'_>| {
    if input.bin_cl.len() + input.render_cl.len() + input.shader_rec.len() > MAX_INPUT_SIZE_BYTES {
        return;
    }

    let bos: Vec<BufferObject> = input
        .bos
        .iter()
        .take(MAX_BOS)
        .map(|&(size, paddr)| BufferObject { size, paddr })
        .collect();

    let submission = Submission {
        bin_cl: input.bin_cl,
        render_cl: input.render_cl,
        shader_rec: input.shader_rec,
        shader_state_count: input.shader_state_count as u32,
    };

    // All outcomes are acceptable; the validator must never panic and, on
    // success, must never emit more bytes than it consumed.
    if let Ok(out) = validate_submission(&submission, &bos, input.shader_rec_paddr) {
        assert!(out.bin_cl.len() <= input.bin_cl.len());
        assert!(out.render_cl.len() <= input.render_cl.len());
        assert!(out.shader_rec.len() <= input.shader_rec.len());
        assert!(out.shader_states.len() <= input.shader_state_count as usize);
    }
});
