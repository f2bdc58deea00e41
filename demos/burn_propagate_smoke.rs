//! Minimal Burn propagation smoke example.
//!
//! Run:
//!   cargo run --example burn_propagate_smoke --features backend-burn

use burn::tensor::backend::Backend;
use burn::tensor::TensorData;
use burn_ndarray::NdArray;
use propago_sgcn::burn_propagate::{BurnEdges, BurnSGConv};
use propago_sgcn::{Graph, Normalization};

type B = NdArray<f32>;

fn main() -> propago_sgcn::Result<()> {
    let device = <B as Backend>::Device::default();
    let graph = Graph::undirected(3, &[(0, 1), (1, 2)])?.normalized(Normalization::Symmetric);

    let x = burn::tensor::Tensor::<B, 2>::from_data(
        TensorData::new(vec![1.0f32, 0.0, 0.0, 1.0, 1.0, 1.0], [3, 2]),
        &device,
    );
    let edges = BurnEdges::<B>::from_graph(&graph, &device);
    let y = BurnSGConv::new(2).forward(x, &edges);

    println!("propagated: {:?}", y.to_data().to_vec::<f32>());
    Ok(())
}
