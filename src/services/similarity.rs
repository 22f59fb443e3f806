use crate::models::Embedding;

/// Cosine similarity in [-1, 1]
///
/// Returns exactly 0.0 when either vector has zero norm or the dimensions differ.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = norm_a * norm_b;
    if denom == 0.0 {
        return 0.0;
    }

    (dot / denom).clamp(-1.0, 1.0)
}

/// Component-wise mean of the given vectors
///
/// `None` when there is nothing to average or the vectors disagree on dimension.
pub fn centroid<'a, I>(vectors: I) -> Option<Embedding>
where
    I: IntoIterator<Item = &'a Embedding>,
{
    let mut vectors = vectors.into_iter();
    let mut sum = vectors.next()?.as_slice().to_vec();
    let mut count = 1usize;

    for vector in vectors {
        if vector.dimension() != sum.len() {
            return None;
        }
        for (acc, value) in sum.iter_mut().zip(vector.as_slice()) {
            *acc += value;
        }
        count += 1;
    }

    let n = count as f64;
    Some(Embedding::new(sum.into_iter().map(|v| v / n).collect()))
}
