//! propago-sgcn: simplified graph convolution for node classification.
//!
//! Provides an edge-coordinate [`Graph`], the K-hop [`SGConv`] propagation rule, the
//! [`SGCNModel`] projection/propagation stack, and a [`TrainingContext`] that runs the
//! AdamW + cosine-annealing training loop, all on `candle` tensors.
//!
//! # Example
//!
//! ```rust,ignore
//! use candle_core::Device;
//! use propago_sgcn::{Dataset, Normalization, TrainingConfig, TrainingContext};
//!
//! let ds = Dataset::from_npz("data/graph.npz", &Device::Cpu)?.normalized(Normalization::Symmetric);
//! let mut ctx = TrainingContext::new(TrainingConfig::default(), &ds, &Device::Cpu)?;
//! ctx.fit(|report| println!("{report}"))?;
//! ctx.save_checkpoint("./saved/sgcn.safetensors")?;
//! ```

pub mod data;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod nn;
pub mod schedule;
pub mod train;

#[cfg(feature = "backend-burn")]
pub mod burn_propagate;

pub use data::{Dataset, Splits};
pub use error::{Error, Result};
pub use graph::{EdgeTensors, Graph, Normalization};
pub use metrics::SplitMetrics;
pub use nn::{Mode, SGConv, SGCNConfig, SGCNModel};
pub use schedule::CosineAnnealing;
pub use train::{EpochReport, FitSummary, TrainingConfig, TrainingContext};
