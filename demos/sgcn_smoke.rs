//! Minimal SGCN smoke example: a few epochs on a 6-node graph.
//!
//! Run:
//!   cargo run --example sgcn_smoke

use candle_core::{Device, Tensor};
use propago_sgcn::{
    Dataset, Graph, Normalization, Result, SGCNConfig, Splits, TrainingConfig, TrainingContext,
};

fn main() -> Result<()> {
    let dev = Device::Cpu;

    let n = 6usize;
    let d = 4usize;

    let x = Tensor::randn(0f32, 0.1f32, (n, d), &dev)?;
    let labels = Tensor::new(&[0u32, 0, 0, 1, 1, 1], &dev)?;
    let graph = Graph::undirected(n, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3), (2, 3)])?;
    let splits = Splits {
        train: vec![0, 3],
        val: vec![1, 4],
        test: vec![2, 5],
    };
    let ds = Dataset::new(x, labels, graph, splits)?.normalized(Normalization::Symmetric);

    let config = TrainingConfig {
        epochs: 5,
        model: SGCNConfig {
            input_size: d,
            hidden_size: 8,
            class_num: 2,
            ..SGCNConfig::default()
        },
        ..TrainingConfig::default()
    };
    let mut ctx = TrainingContext::new(config, &ds, &dev)?;
    ctx.fit(|report| println!("{report}"))?;

    let logits = ctx.predict()?;
    let (yn, yd) = logits.dims2()?;
    println!("logits shape: [{yn}, {yd}]");
    Ok(())
}
