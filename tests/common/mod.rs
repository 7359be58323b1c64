//! Common test utilities
#![allow(dead_code)]

use catdraw::prelude::*;
use std::sync::Arc;

/// Install a test logger once (honours RUST_LOG)
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Sampler with a private generator seeded with `seed`
pub fn seeded_sampler(seed: u64) -> CpuSampler {
    init_logging();
    CpuSampler::new(Arc::new(Generator::new(seed)))
}

/// Contiguous f32 weights wrapped as a runtime-typed tensor
pub fn probs_f32(data: &[f32], shape: &[usize]) -> FloatTensor {
    Tensor::from_slice(data, shape).unwrap().into()
}

/// Contiguous f64 weights wrapped as a runtime-typed tensor
pub fn probs_f64(data: &[f64], shape: &[usize]) -> FloatTensor {
    Tensor::from_slice(data, shape).unwrap().into()
}

/// Split a flat row-major result into rows of `width`
pub fn rows(data: &[i64], width: usize) -> Vec<Vec<i64>> {
    data.chunks(width).map(|c| c.to_vec()).collect()
}

/// Count occurrences of each category in `data`
pub fn histogram(data: &[i64], n_categories: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_categories];
    for &v in data {
        assert!(
            v >= 0 && (v as usize) < n_categories,
            "index {} out of range [0, {})",
            v,
            n_categories
        );
        counts[v as usize] += 1;
    }
    counts
}

/// Assert observed frequencies are within `atol` of the expected probabilities
pub fn assert_frequencies(counts: &[usize], expected: &[f64], atol: f64, msg: &str) {
    assert_eq!(counts.len(), expected.len(), "{}: length mismatch", msg);
    let total: usize = counts.iter().sum();
    for (i, (&c, &p)) in counts.iter().zip(expected.iter()).enumerate() {
        let freq = c as f64 / total as f64;
        assert!(
            (freq - p).abs() <= atol,
            "{}: category {} frequency {} vs expected {} (atol={})",
            msg,
            i,
            freq,
            p,
            atol
        );
    }
}
