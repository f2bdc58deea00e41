//! Loss and accuracy restricted to a subset of nodes.

use candle_core::{DType, Tensor, D};
use candle_nn::loss;

use crate::error::{Error, Result};

/// Loss and accuracy of one split at one point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitMetrics {
    pub loss: f32,
    pub accuracy: f32,
}

/// Gather the rows of `xs` named by `idx` (a `[M]` u32 tensor).
pub fn select_rows(xs: &Tensor, idx: &Tensor, split: &'static str) -> Result<Tensor> {
    if idx.elem_count() == 0 {
        return Err(Error::EmptySplit(split));
    }
    Ok(xs.index_select(idx, 0)?)
}

/// Mean cross-entropy of `logits` `[N, C]` against `labels` `[N]` over the subset `idx`.
///
/// Returns the scalar loss tensor so callers can backpropagate through it.
pub fn subset_loss(
    logits: &Tensor,
    labels: &Tensor,
    idx: &Tensor,
    split: &'static str,
) -> Result<Tensor> {
    let logits = select_rows(logits, idx, split)?;
    let labels = select_rows(labels, idx, split)?;
    Ok(loss::cross_entropy(&logits, &labels)?)
}

/// Fraction of nodes in `idx` whose argmax logit equals the label.
pub fn subset_accuracy(
    logits: &Tensor,
    labels: &Tensor,
    idx: &Tensor,
    split: &'static str,
) -> Result<f32> {
    let logits = select_rows(logits, idx, split)?;
    let labels = select_rows(labels, idx, split)?;
    let hits = logits
        .argmax(D::Minus1)?
        .eq(&labels)?
        .to_dtype(DType::F32)?
        .mean_all()?
        .to_scalar::<f32>()?;
    Ok(hits)
}

/// Loss and accuracy together, detached from the graph.
pub fn evaluate_split(
    logits: &Tensor,
    labels: &Tensor,
    idx: &Tensor,
    split: &'static str,
) -> Result<SplitMetrics> {
    let loss = subset_loss(logits, labels, idx, split)?
        .to_dtype(DType::F32)?
        .to_scalar::<f32>()?;
    let accuracy = subset_accuracy(logits, labels, idx, split)?;
    Ok(SplitMetrics { loss, accuracy })
}
