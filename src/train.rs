//! Training loop: forward, loss, backward, optimizer step, schedule step, report.
//!
//! [`TrainingContext`] owns everything one run mutates (model, optimizer, schedule, dropout
//! generator) plus the device-resident data it reads, and is driven one epoch at a time.

use candle_core::{DType, Device, Tensor, Var};
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::graph::EdgeTensors;
use crate::metrics::{evaluate_split, subset_accuracy, subset_loss, SplitMetrics};
use crate::nn::{Mode, SGCNConfig, SGCNModel};
use crate::schedule::CosineAnnealing;

/// Hyper-parameters of one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub lr: f64,
    /// L2 coefficient: `0.5 * weight_decay * sum ||theta||^2` is added to the objective, so the
    /// gradient gains `weight_decay * theta` before the Adam moments see it.
    pub weight_decay: f64,
    pub seed: u64,
    /// Score validation on the training forward pass (dropout on, before the update) instead
    /// of a separate eval pass after the update.
    ///
    /// Defaults to `false`, i.e. the separate eval pass. Training scripts that reuse the
    /// training logits for validation correspond to `fastmode = true`.
    pub fastmode: bool,
    /// Floor of the cosine schedule.
    pub eta_min: f64,
    pub model: SGCNConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: 1000,
            lr: 0.02,
            weight_decay: 1e-4,
            seed: 42,
            fastmode: false,
            eta_min: 0.0,
            model: SGCNConfig::default(),
        }
    }
}

/// What one epoch produced.
#[derive(Debug, Clone, Copy)]
pub struct EpochReport {
    /// Zero-based.
    pub epoch: usize,
    pub train: SplitMetrics,
    /// `None` when the validation split is empty.
    pub val: Option<SplitMetrics>,
    /// Learning rate used for this epoch's update.
    pub lr: f64,
    pub elapsed: Duration,
}

impl fmt::Display for EpochReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Epoch: {:04} loss_train: {:.4} acc_train: {:.4}",
            self.epoch + 1,
            self.train.loss,
            self.train.accuracy
        )?;
        if let Some(val) = self.val {
            write!(f, " loss_val: {:.4} acc_val: {:.4}", val.loss, val.accuracy)?;
        }
        write!(f, " time: {:.4}s", self.elapsed.as_secs_f64())
    }
}

/// Outcome of [`TrainingContext::fit`].
#[derive(Debug, Clone, Copy)]
pub struct FitSummary {
    pub epochs: usize,
    pub total_time: Duration,
    /// Metrics of the last epoch run by this call; `None` if no epoch ran.
    pub final_train: Option<SplitMetrics>,
    pub final_val: Option<SplitMetrics>,
}

pub struct TrainingContext {
    config: TrainingConfig,
    model: SGCNModel,
    optimizer: AdamW,
    params: Vec<Var>,
    schedule: CosineAnnealing,
    features: Tensor,
    labels: Tensor,
    edges: EdgeTensors,
    idx_train: Tensor,
    idx_val: Option<Tensor>,
    idx_test: Option<Tensor>,
    rng: ChaCha8Rng,
    epoch: usize,
}

impl TrainingContext {
    /// Build model, optimizer and schedule for `dataset` (whose graph should already be
    /// normalized) and move the data to `device`.
    pub fn new(config: TrainingConfig, dataset: &Dataset, device: &Device) -> Result<Self> {
        config.model.validate()?;
        dataset.validate()?;
        if dataset.splits.train.is_empty() {
            return Err(Error::EmptySplit("train"));
        }
        if dataset.num_features() != config.model.input_size {
            return Err(Error::Shape(format!(
                "dataset has {} features, model expects {}",
                dataset.num_features(),
                config.model.input_size
            )));
        }
        let classes = dataset.num_classes()?;
        if classes > config.model.class_num {
            return Err(Error::Config(format!(
                "labels need {classes} classes, model has {}",
                config.model.class_num
            )));
        }

        let model = SGCNModel::new(&config.model, config.seed, device)?;
        let params = model.varmap().all_vars();
        // decay goes through the loss as an L2 term, not through AdamW's decoupled path
        let optimizer = AdamW::new(
            params.clone(),
            ParamsAdamW {
                lr: config.lr,
                weight_decay: 0.0,
                ..Default::default()
            },
        )?;
        let schedule = CosineAnnealing::new(config.lr, config.epochs, config.eta_min);

        // separate stream from the one that initialized the parameters
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        rng.set_stream(1);

        info!(
            nodes = dataset.num_nodes(),
            edges = dataset.graph.num_edges(),
            components = dataset.graph.connected_components(),
            parameters = model.num_parameters(),
            device = ?device,
            "training context ready"
        );

        Ok(Self {
            model,
            optimizer,
            params,
            schedule,
            features: dataset.features.to_device(device)?,
            labels: dataset.labels.to_device(device)?,
            edges: dataset.graph.to_tensors(device)?,
            idx_train: index_tensor(&dataset.splits.train, device)?,
            idx_val: optional_index_tensor(&dataset.splits.val, device)?,
            idx_test: optional_index_tensor(&dataset.splits.test, device)?,
            rng,
            epoch: 0,
            config,
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn model(&self) -> &SGCNModel {
        &self.model
    }

    /// Epochs completed so far.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn learning_rate(&self) -> f64 {
        self.optimizer.learning_rate()
    }

    /// Run one epoch and advance the schedule.
    pub fn train_epoch(&mut self) -> Result<EpochReport> {
        let start = Instant::now();
        let epoch = self.epoch;
        let lr = self.optimizer.learning_rate();

        let logits = self
            .model
            .forward(&self.features, &self.edges, Mode::Train, &mut self.rng)?;
        let loss = subset_loss(&logits, &self.labels, &self.idx_train, "train")?;
        let loss_train = loss.to_scalar::<f32>()?;
        if !loss_train.is_finite() {
            return Err(Error::NonFinite {
                what: "training loss",
                epoch,
            });
        }
        let acc_train = subset_accuracy(&logits, &self.labels, &self.idx_train, "train")?;

        if self.config.weight_decay > 0.0 {
            let objective = loss.add(&self.l2_penalty()?)?;
            self.optimizer.backward_step(&objective)?;
        } else {
            self.optimizer.backward_step(&loss)?;
        }

        let val = match &self.idx_val {
            Some(idx) if self.config.fastmode => {
                Some(evaluate_split(&logits, &self.labels, idx, "val")?)
            }
            Some(idx) => {
                let logits = self.model.forward_eval(&self.features, &self.edges)?;
                Some(evaluate_split(&logits, &self.labels, idx, "val")?)
            }
            None => None,
        };

        let next_lr = self.schedule.step();
        self.optimizer.set_learning_rate(next_lr);
        debug!(epoch, lr, next_lr, "schedule step");

        self.epoch += 1;
        Ok(EpochReport {
            epoch,
            train: SplitMetrics {
                loss: loss_train,
                accuracy: acc_train,
            },
            val,
            lr,
            elapsed: start.elapsed(),
        })
    }

    /// `0.5 * weight_decay * sum ||theta||^2` over every model parameter, as a scalar tensor.
    pub fn l2_penalty(&self) -> Result<Tensor> {
        let mut total = Tensor::zeros((), DType::F32, self.features.device())?;
        for var in &self.params {
            total = total.add(&var.as_tensor().sqr()?.sum_all()?)?;
        }
        Ok(total.affine(0.5 * self.config.weight_decay, 0.0)?)
    }

    /// Train for the remaining configured epochs, handing every report to `on_epoch`.
    pub fn fit<F>(&mut self, mut on_epoch: F) -> Result<FitSummary>
    where
        F: FnMut(&EpochReport),
    {
        let start = Instant::now();
        let mut last = None;
        while self.epoch < self.config.epochs {
            let report = self.train_epoch()?;
            on_epoch(&report);
            last = Some(report);
        }
        Ok(FitSummary {
            epochs: self.epoch,
            total_time: start.elapsed(),
            final_train: last.map(|r| r.train),
            final_val: last.and_then(|r| r.val),
        })
    }

    /// Test-split loss and accuracy from an eval-mode forward pass.
    pub fn evaluate_test(&self) -> Result<SplitMetrics> {
        let idx = self.idx_test.as_ref().ok_or(Error::EmptySplit("test"))?;
        let logits = self.model.forward_eval(&self.features, &self.edges)?;
        evaluate_split(&logits, &self.labels, idx, "test")
    }

    /// Eval-mode logits for every node.
    pub fn predict(&self) -> Result<Tensor> {
        self.model.forward_eval(&self.features, &self.edges)
    }

    /// Write parameters to `path` (safetensors) and the run's config next to it as JSON.
    pub fn save_checkpoint<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.model.save(path)?;
        let meta = std::fs::File::create(path.with_extension("json"))?;
        serde_json::to_writer_pretty(meta, &self.config)?;
        info!(path = %path.display(), "saved checkpoint");
        Ok(())
    }

    /// Replace the model parameters with a snapshot from [`TrainingContext::save_checkpoint`].
    pub fn load_checkpoint<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.model.load(path)
    }
}

/// Read the config JSON written by [`TrainingContext::save_checkpoint`].
pub fn load_checkpoint_config<P: AsRef<Path>>(path: P) -> Result<TrainingConfig> {
    let file = std::fs::File::open(path.as_ref().with_extension("json"))?;
    Ok(serde_json::from_reader(file)?)
}

fn index_tensor(ids: &[u32], device: &Device) -> Result<Tensor> {
    Ok(Tensor::from_slice(ids, ids.len(), device)?)
}

fn optional_index_tensor(ids: &[u32], device: &Device) -> Result<Option<Tensor>> {
    if ids.is_empty() {
        Ok(None)
    } else {
        index_tensor(ids, device).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Splits;
    use crate::graph::{Graph, Normalization};
    use std::collections::BTreeMap;

    fn ring_dataset() -> Dataset {
        let dev = Device::Cpu;
        let features = Tensor::new(&[[1f32, 0.0], [0.0, 1.0], [1.0, 0.0], [0.0, 1.0]], &dev).unwrap();
        let labels = Tensor::new(&[0u32, 1, 0, 1], &dev).unwrap();
        let graph = Graph::undirected(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        let splits = Splits {
            train: vec![0, 1],
            val: vec![2, 3],
            test: vec![2, 3],
        };
        Dataset::new(features, labels, graph, splits)
            .unwrap()
            .normalized(Normalization::Symmetric)
    }

    fn ring_config(epochs: usize) -> TrainingConfig {
        TrainingConfig {
            epochs,
            lr: 0.1,
            weight_decay: 0.0,
            seed: 42,
            fastmode: false,
            eta_min: 0.0,
            model: SGCNConfig {
                k: 2,
                input_size: 2,
                hidden_size: 8,
                class_num: 2,
                pre_proj_num: 1,
                after_proj_num: 1,
                dropout: 0.0,
            },
        }
    }

    /// Two communities of `per_class` nodes, each a ring, joined by one bridge edge.
    fn communities(per_class: u32) -> Dataset {
        let dev = Device::Cpu;
        let n = 2 * per_class;
        let mut edges = Vec::new();
        for c in 0..2 {
            let base = c * per_class;
            for i in 0..per_class {
                edges.push((base + i, base + (i + 1) % per_class));
            }
        }
        edges.push((0, per_class));

        let mut feats = Vec::new();
        let mut labels = Vec::new();
        for node in 0..n {
            let class = node / per_class;
            let jitter = (node % 5) as f32 * 0.05;
            if class == 0 {
                feats.extend_from_slice(&[1.0 + jitter, -0.5, 0.2]);
            } else {
                feats.extend_from_slice(&[-0.5, 1.0 - jitter, 0.2]);
            }
            labels.push(class);
        }
        let features = Tensor::from_vec(feats, (n as usize, 3), &dev).unwrap();
        let labels = Tensor::from_vec(labels, n as usize, &dev).unwrap();
        let graph = Graph::undirected(n as usize, &edges).unwrap();
        let train = (0..n).filter(|i| i % 2 == 0).collect();
        let val = (0..n).filter(|i| i % 2 == 1).collect();
        Dataset::new(features, labels, graph, Splits { train, val, test: vec![] })
            .unwrap()
            .normalized(Normalization::Symmetric)
    }

    fn parameters(ctx: &TrainingContext) -> BTreeMap<String, Vec<f32>> {
        let data = ctx.model().varmap().data().lock().unwrap();
        data.iter()
            .map(|(name, var)| {
                let values = var.as_tensor().flatten_all().unwrap().to_vec1::<f32>().unwrap();
                (name.clone(), values)
            })
            .collect()
    }

    #[test]
    fn ring_training_loss_decreases() {
        let ds = ring_dataset();
        let mut ctx = TrainingContext::new(ring_config(100), &ds, &Device::Cpu).unwrap();
        let mut reports = Vec::new();
        let summary = ctx.fit(|r| reports.push(*r)).unwrap();

        assert_eq!(summary.epochs, 100);
        assert_eq!(reports.len(), 100);
        let first = reports[0].train.loss;
        let last = reports[99].train.loss;
        assert!(last < first, "loss did not decrease: {first} -> {last}");
    }

    #[test]
    fn empty_training_split_is_rejected() {
        let mut ds = ring_dataset();
        ds.splits.train.clear();
        let err = TrainingContext::new(ring_config(10), &ds, &Device::Cpu).err().unwrap();
        assert!(matches!(err, Error::EmptySplit("train")));
    }

    #[test]
    fn input_size_mismatch_is_rejected() {
        let ds = ring_dataset();
        let mut cfg = ring_config(10);
        cfg.model.input_size = 5;
        let err = TrainingContext::new(cfg, &ds, &Device::Cpu).err().unwrap();
        assert!(matches!(err, Error::Shape(_)));
    }

    #[test]
    fn too_few_classes_is_rejected() {
        let ds = ring_dataset();
        let mut cfg = ring_config(10);
        cfg.model.class_num = 1;
        let err = TrainingContext::new(cfg, &ds, &Device::Cpu).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn same_seed_same_snapshot() {
        let ds = ring_dataset();
        let mut cfg = ring_config(20);
        cfg.model.dropout = 0.3;
        cfg.model.hidden_size = 6;

        let mut a = TrainingContext::new(cfg.clone(), &ds, &Device::Cpu).unwrap();
        let mut b = TrainingContext::new(cfg, &ds, &Device::Cpu).unwrap();
        a.fit(|_| {}).unwrap();
        b.fit(|_| {}).unwrap();
        assert_eq!(parameters(&a), parameters(&b));
    }

    #[test]
    fn schedule_drives_optimizer_rate() {
        let ds = ring_dataset();
        let mut ctx = TrainingContext::new(ring_config(4), &ds, &Device::Cpu).unwrap();
        let r0 = ctx.train_epoch().unwrap();
        assert!((r0.lr - 0.1).abs() < 1e-12);
        // after 2 of 4 steps the cosine is at its midpoint
        let _ = ctx.train_epoch().unwrap();
        assert!((ctx.learning_rate() - 0.05).abs() < 1e-9);
        ctx.fit(|_| {}).unwrap();
        assert!(ctx.learning_rate().abs() < 1e-12);
    }

    #[test]
    fn separable_communities_reach_high_accuracy() {
        let ds = communities(10);
        let cfg = TrainingConfig {
            epochs: 150,
            lr: 0.05,
            weight_decay: 0.0,
            seed: 7,
            fastmode: true,
            eta_min: 0.0,
            model: SGCNConfig {
                k: 2,
                input_size: 3,
                hidden_size: 16,
                class_num: 2,
                pre_proj_num: 2,
                after_proj_num: 2,
                dropout: 0.0,
            },
        };
        let mut ctx = TrainingContext::new(cfg, &ds, &Device::Cpu).unwrap();
        let mut accs = Vec::new();
        let summary = ctx.fit(|r| accs.push(r.train.accuracy)).unwrap();

        let final_train = summary.final_train.unwrap();
        assert!(final_train.accuracy >= accs[0]);
        assert!(final_train.accuracy >= 0.9, "acc={}", final_train.accuracy);
        let val = summary.final_val.unwrap();
        assert!((0.0..=1.0).contains(&val.accuracy));
        assert!(val.loss >= 0.0);
    }

    #[test]
    fn every_report_has_bounded_metrics() {
        let ds = ring_dataset();
        let mut cfg = ring_config(30);
        cfg.model.dropout = 0.5;
        let mut ctx = TrainingContext::new(cfg, &ds, &Device::Cpu).unwrap();
        ctx.fit(|r| {
            for m in std::iter::once(r.train).chain(r.val) {
                assert!(m.loss >= 0.0);
                assert!((0.0..=1.0).contains(&m.accuracy));
            }
        })
        .unwrap();
    }

    #[test]
    fn report_line_format() {
        let report = EpochReport {
            epoch: 6,
            train: SplitMetrics {
                loss: 0.5,
                accuracy: 0.25,
            },
            val: Some(SplitMetrics {
                loss: 1.0,
                accuracy: 0.75,
            }),
            lr: 0.02,
            elapsed: Duration::from_millis(12),
        };
        assert_eq!(
            report.to_string(),
            "Epoch: 0007 loss_train: 0.5000 acc_train: 0.2500 loss_val: 1.0000 acc_val: 0.7500 time: 0.0120s"
        );
    }

    #[test]
    fn checkpoint_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved").join("sgcn.safetensors");
        let ds = ring_dataset();

        let mut trained = TrainingContext::new(ring_config(10), &ds, &Device::Cpu).unwrap();
        trained.fit(|_| {}).unwrap();
        trained.save_checkpoint(&path).unwrap();

        let mut cfg = ring_config(10);
        cfg.seed = 1234;
        let mut restored = TrainingContext::new(cfg, &ds, &Device::Cpu).unwrap();
        restored.load_checkpoint(&path).unwrap();

        let a = trained.predict().unwrap().to_vec2::<f32>().unwrap();
        let b = restored.predict().unwrap().to_vec2::<f32>().unwrap();
        assert_eq!(a, b);
        assert_eq!(load_checkpoint_config(&path).unwrap(), ring_config(10));
    }

    #[test]
    fn dense_adjacency_evaluates_like_edge_list() {
        let dev = Device::Cpu;
        let sparse = ring_dataset();
        let adj = Tensor::new(
            &[
                [0f32, 1.0, 0.0, 1.0],
                [1.0, 0.0, 1.0, 0.0],
                [0.0, 1.0, 0.0, 1.0],
                [1.0, 0.0, 1.0, 0.0],
            ],
            &dev,
        )
        .unwrap();
        let dense = Dataset::new(
            sparse.features.clone(),
            sparse.labels.clone(),
            Graph::from_dense(&adj).unwrap(),
            sparse.splits.clone(),
        )
        .unwrap()
        .normalized(Normalization::Symmetric);

        let a = TrainingContext::new(ring_config(1), &sparse, &dev).unwrap();
        let b = TrainingContext::new(ring_config(1), &dense, &dev).unwrap();
        let ta = a.evaluate_test().unwrap();
        let tb = b.evaluate_test().unwrap();
        assert!((ta.loss - tb.loss).abs() < 1e-6);
        assert_eq!(ta.accuracy, tb.accuracy);
    }

    fn squared_norm(ctx: &TrainingContext) -> f32 {
        parameters(ctx).values().flatten().map(|v| v * v).sum()
    }

    #[test]
    fn zero_epochs_still_saves_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sgcn.safetensors");
        let ds = ring_dataset();
        let mut ctx = TrainingContext::new(ring_config(0), &ds, &Device::Cpu).unwrap();

        let mut calls = 0;
        let summary = ctx.fit(|_| calls += 1).unwrap();
        assert_eq!(calls, 0);
        assert_eq!(summary.epochs, 0);
        assert!(summary.final_train.is_none());
        assert!(summary.final_val.is_none());

        ctx.save_checkpoint(&path).unwrap();
        assert!(path.exists());
        assert_eq!(load_checkpoint_config(&path).unwrap().epochs, 0);
    }

    #[test]
    fn fastmode_scores_validation_on_training_pass() {
        let ds = ring_dataset();
        let mut cfg = ring_config(5);
        cfg.fastmode = true;
        cfg.model.dropout = 0.5;
        let mut ctx = TrainingContext::new(cfg, &ds, &Device::Cpu).unwrap();
        let idx_val = ctx.idx_val.clone().unwrap();

        // same dropout stream the epoch is about to draw from
        let mut rng = ctx.rng.clone();
        let logits = ctx
            .model
            .forward(&ctx.features, &ctx.edges, Mode::Train, &mut rng)
            .unwrap();
        let want = evaluate_split(&logits, &ctx.labels, &idx_val, "val").unwrap();

        let got = ctx.train_epoch().unwrap().val.unwrap();
        assert!((got.loss - want.loss).abs() < 1e-6, "{} vs {}", got.loss, want.loss);
        assert_eq!(got.accuracy, want.accuracy);

        // and not the dropout-free pass on the updated parameters
        let after = evaluate_split(&ctx.predict().unwrap(), &ctx.labels, &idx_val, "val").unwrap();
        assert!((got.loss - after.loss).abs() > 1e-6);
    }

    #[test]
    fn eval_pass_scores_validation_after_step() {
        let ds = ring_dataset();
        let mut cfg = ring_config(5);
        cfg.model.dropout = 0.5;
        let mut ctx = TrainingContext::new(cfg, &ds, &Device::Cpu).unwrap();
        let idx_val = ctx.idx_val.clone().unwrap();

        for _ in 0..3 {
            let got = ctx.train_epoch().unwrap().val.unwrap();
            let want = evaluate_split(&ctx.predict().unwrap(), &ctx.labels, &idx_val, "val").unwrap();
            assert!((got.loss - want.loss).abs() < 1e-6, "{} vs {}", got.loss, want.loss);
            assert_eq!(got.accuracy, want.accuracy);
        }
    }

    #[test]
    fn l2_penalty_is_half_decay_times_squared_norm() {
        let ds = ring_dataset();
        let mut cfg = ring_config(1);
        cfg.weight_decay = 0.01;
        let ctx = TrainingContext::new(cfg, &ds, &Device::Cpu).unwrap();

        let want = 0.5 * 0.01 * squared_norm(&ctx);
        let got = ctx.l2_penalty().unwrap().to_scalar::<f32>().unwrap();
        assert!(want > 0.0);
        assert!((got - want).abs() <= 1e-5 * want, "{got} vs {want}");
    }

    #[test]
    fn weight_decay_shrinks_parameters() {
        let ds = ring_dataset();
        let mut plain = TrainingContext::new(ring_config(50), &ds, &Device::Cpu).unwrap();
        let mut cfg = ring_config(50);
        cfg.weight_decay = 1.0;
        let mut decayed = TrainingContext::new(cfg, &ds, &Device::Cpu).unwrap();
        let start = squared_norm(&decayed);

        plain.fit(|_| {}).unwrap();
        let summary = decayed.fit(|_| {}).unwrap();

        assert!(summary.final_train.unwrap().loss.is_finite());
        assert!(squared_norm(&decayed) < squared_norm(&plain));
        assert!(squared_norm(&decayed) < start);
    }

    #[test]
    fn empty_test_split_is_an_error() {
        let mut ds = ring_dataset();
        ds.splits.test.clear();
        let ctx = TrainingContext::new(ring_config(1), &ds, &Device::Cpu).unwrap();
        assert!(matches!(ctx.evaluate_test(), Err(Error::EmptySplit("test"))));
        assert_eq!(ctx.predict().unwrap().dtype(), DType::F32);
    }
}
