//! Train an SGCN node classifier on an `.npz` graph dataset.
//!
//! Run:
//!   cargo run --release --bin train-sgcn -- --data data/graph.npz --epochs 1000

use anyhow::Context;
use candle_core::Device;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use propago_sgcn::{Dataset, Normalization, SGCNConfig, TrainingConfig, TrainingContext};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NormArg {
    Sym,
    Row,
    #[value(name = "none")]
    Raw,
}

impl From<NormArg> for Normalization {
    fn from(n: NormArg) -> Self {
        match n {
            NormArg::Sym => Normalization::Symmetric,
            NormArg::Row => Normalization::Row,
            NormArg::Raw => Normalization::None,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "train-sgcn")]
#[command(about = "Train a simplified graph convolutional network for node classification")]
struct Args {
    /// Disables CUDA training.
    #[arg(long)]
    no_cuda: bool,

    /// Validate on the training forward pass instead of a separate eval pass after the update.
    #[arg(long)]
    fastmode: bool,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// CUDA device ordinal.
    #[arg(long, default_value_t = 0)]
    gpu: usize,

    /// Number of epochs to train.
    #[arg(long, default_value_t = 1000)]
    epochs: usize,

    /// Initial learning rate.
    #[arg(long, default_value_t = 0.02)]
    lr: f64,

    /// Weight decay.
    #[arg(long, default_value_t = 1e-4)]
    weight_decay: f64,

    /// Number of hidden units.
    #[arg(long, default_value_t = 64)]
    hidden: usize,

    /// Dropout rate (1 - keep probability).
    #[arg(long, default_value_t = 0.5)]
    dropout: f32,

    /// Propagation hops.
    #[arg(long, default_value_t = 2)]
    k: usize,

    /// Projection layers before propagation.
    #[arg(long, default_value_t = 2)]
    pre_proj: usize,

    /// Projection layers after propagation.
    #[arg(long, default_value_t = 2)]
    after_proj: usize,

    /// Output classes.
    #[arg(long, default_value_t = 18)]
    classes: usize,

    /// Adjacency normalization.
    #[arg(long, value_enum, default_value_t = NormArg::Sym)]
    normalize: NormArg,

    /// Dataset archive.
    #[arg(long, default_value = "data/graph.npz")]
    data: PathBuf,

    /// Where to write the trained parameters.
    #[arg(long, default_value = "./saved/sgcn.safetensors")]
    checkpoint: PathBuf,

    /// Report test-split metrics after training.
    #[arg(long)]
    test: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let device = if args.no_cuda {
        Device::Cpu
    } else {
        Device::cuda_if_available(args.gpu)?
    };
    info!(device = ?device, "selected device");

    let dataset = Dataset::from_npz(&args.data, &device)
        .with_context(|| format!("loading {}", args.data.display()))?
        .normalized(args.normalize.into());

    let config = TrainingConfig {
        epochs: args.epochs,
        lr: args.lr,
        weight_decay: args.weight_decay,
        seed: args.seed,
        fastmode: args.fastmode,
        eta_min: 0.0,
        model: SGCNConfig {
            k: args.k,
            input_size: dataset.num_features(),
            hidden_size: args.hidden,
            class_num: args.classes,
            pre_proj_num: args.pre_proj,
            after_proj_num: args.after_proj,
            dropout: args.dropout,
        },
    };

    let mut ctx = TrainingContext::new(config, &dataset, &device)?;

    let t_total = Instant::now();
    ctx.fit(|report| println!("{report}"))?;
    println!("Optimization Finished!");
    println!("Total time elapsed: {:.4}s", t_total.elapsed().as_secs_f64());

    if args.test {
        let m = ctx.evaluate_test()?;
        println!(
            "Test set results: loss= {:.4} accuracy= {:.4}",
            m.loss, m.accuracy
        );
    }

    ctx.save_checkpoint(&args.checkpoint)
        .with_context(|| format!("writing {}", args.checkpoint.display()))?;
    Ok(())
}
