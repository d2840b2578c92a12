//! Row-parallel variants of the two passes (feature `parallel`)
//!
//! Both passes split the image into rows. Gradient sums are combined with
//! an integer reduction and black counts are summed, so the results match
//! the sequential code exactly. Small images stay on the calling thread.

use rayon::prelude::*;

use crate::ApplyParams;
use crate::apply::{GlobalArray, apply_samples};
use crate::gradient::{SumsArray, accumulate};

/// Minimum number of samples before work is spread over threads.
const PARALLEL_THRESHOLD: usize = 1 << 16;

/// Merge the sums of two row ranges channel by channel.
fn combine(a: SumsArray, b: SumsArray) -> SumsArray {
    let mut out = a;
    for (o, s) in out.iter_mut().zip(b) {
        o.sum_g += s.sum_g;
        o.sum_gi += s.sum_gi;
    }
    out
}

pub(crate) fn accumulate_rows(
    image: &[u8],
    blur: &[u8],
    channels: usize,
    row_len: usize,
) -> SumsArray {
    if image.len() < PARALLEL_THRESHOLD {
        return accumulate(image, blur, channels);
    }
    image
        .par_chunks(row_len)
        .zip(blur.par_chunks(row_len))
        .map(|(row, blur_row)| accumulate(row, blur_row, channels))
        .reduce(SumsArray::default, combine)
}

pub(crate) fn apply_rows(
    image: &mut [u8],
    blur: &[u8],
    channels: usize,
    row_len: usize,
    global: &GlobalArray,
    params: &ApplyParams,
) -> usize {
    if image.len() < PARALLEL_THRESHOLD {
        return apply_samples(image, blur, channels, global, params);
    }
    image
        .par_chunks_mut(row_len)
        .zip(blur.par_chunks(row_len))
        .map(|(row, blur_row)| apply_samples(row, blur_row, channels, global, params))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize, seed: usize) -> Vec<u8> {
        (0..len).map(|i| ((i * 131 + seed * 17) % 251) as u8).collect()
    }

    #[test]
    fn test_combine_adds_channel_sums() {
        let a = accumulate(&[10, 20, 30, 40], &[20, 20, 0, 50], 2);
        let b = accumulate(&[200, 0], &[100, 50], 2);
        let both = accumulate(&[10, 20, 30, 40, 200, 0], &[20, 20, 0, 50, 100, 50], 2);
        assert_eq!(combine(a, b), both);
        assert_eq!(combine(a, SumsArray::default()), a);
    }

    #[test]
    fn test_parallel_sums_match_sequential() {
        let (w, h, ch) = (300, 300, 3);
        let image = pattern(w * h * ch, 1);
        let blur = pattern(w * h * ch, 7);
        let seq = accumulate(&image, &blur, ch);
        let par = accumulate_rows(&image, &blur, ch, w * ch);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_parallel_apply_matches_sequential() {
        let (w, h, ch) = (300, 300, 1);
        let blur = pattern(w * h * ch, 3);
        let global: GlobalArray = [120.0, 0.0, 0.0, 0.0];
        let params = ApplyParams::default();

        let mut seq = pattern(w * h * ch, 5);
        let mut par = seq.clone();
        let black_seq = apply_samples(&mut seq, &blur, ch, &global, &params);
        let black_par = apply_rows(&mut par, &blur, ch, w * ch, &global, &params);
        assert_eq!(black_seq, black_par);
        assert_eq!(seq, par);
    }
}
