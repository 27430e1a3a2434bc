use super::store::EmbeddingStore;

/// Sentence vector: component-wise mean of the embeddings of the known tokens in `text`.
///
/// `text` is expected to be normalized already; it is split on single spaces as-is.
/// Tokens missing from the store and tokens whose embedding is all zeros are both
/// skipped. When nothing is left the result is the zero vector of the store's dimension.
pub fn vectorize(text: &str, store: &EmbeddingStore) -> Vec<f32> {
    let dim = store.dim();
    let mut sum = vec![0.0f64; dim];
    let mut used = 0usize;

    for token in text.split(' ') {
        let Some(embedding) = store.lookup(token) else { continue };
        if is_zero(embedding) {
            continue;
        }
        for (acc, &v) in sum.iter_mut().zip(embedding) {
            *acc += f64::from(v);
        }
        used += 1;
    }

    if used == 0 {
        return vec![0.0; dim];
    }

    let n = used as f64;
    sum.into_iter().map(|s| (s / n) as f32).collect()
}

fn is_zero(v: &[f32]) -> bool {
    v.iter().all(|&x| x == 0.0)
}
