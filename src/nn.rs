use candle_core::{DType, Device, Tensor, Var};
use candle_nn::{Linear, Module, VarMap};
use rand::distributions::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::graph::EdgeTensors;

/// Whether a forward pass is part of training (dropout on) or evaluation (dropout off).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Train,
    Eval,
}

/// Simplified graph convolution: `K` parameter-free propagation hops.
///
/// Hop `k` computes `h_k[dst] = sum_{src -> dst} w * h_{k-1}[src]`, i.e. `A_hat^K * H`
/// for the (already normalized) edge weights.
#[derive(Debug, Clone, Copy)]
pub struct SGConv {
    k: usize,
}

impl SGConv {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn forward(&self, x: &Tensor, edges: &EdgeTensors) -> Result<Tensor> {
        let n = x.dim(0)?;
        if n != edges.num_nodes {
            return Err(Error::Shape(format!(
                "features have {n} rows, graph has {} nodes",
                edges.num_nodes
            )));
        }
        let weight = edges.weight.to_dtype(x.dtype())?;
        let mut h = x.clone();
        for _ in 0..self.k {
            // gather -> scale -> scatter-add
            let messages = h.index_select(&edges.src, 0)?.broadcast_mul(&weight)?;
            h = h.zeros_like()?.index_add(&edges.dst, &messages, 0)?;
        }
        Ok(h)
    }
}

/// Shape of an [`SGCNModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SGCNConfig {
    /// Propagation hops.
    pub k: usize,
    pub input_size: usize,
    pub hidden_size: usize,
    pub class_num: usize,
    /// Linear + ReLU layers before propagation.
    pub pre_proj_num: usize,
    /// Linear layers after propagation; the last one emits logits.
    pub after_proj_num: usize,
    /// Drop probability applied after every hidden activation in [`Mode::Train`].
    pub dropout: f32,
}

impl Default for SGCNConfig {
    fn default() -> Self {
        Self {
            k: 2,
            input_size: 100,
            hidden_size: 64,
            class_num: 18,
            pre_proj_num: 2,
            after_proj_num: 2,
            dropout: 0.5,
        }
    }
}

impl SGCNConfig {
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("input_size", self.input_size),
            ("hidden_size", self.hidden_size),
            ("class_num", self.class_num),
            ("pre_proj_num", self.pre_proj_num),
            ("after_proj_num", self.after_proj_num),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, v)| *v == 0) {
            return Err(Error::Config(format!("{name} must be positive")));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(Error::Config(format!(
                "dropout must be in [0, 1), got {}",
                self.dropout
            )));
        }
        Ok(())
    }
}

/// Projection stack -> K-hop propagation -> projection stack.
pub struct SGCNModel {
    pre: Vec<Linear>,
    conv: SGConv,
    post: Vec<Linear>,
    dropout: f32,
    input_size: usize,
    varmap: VarMap,
}

impl SGCNModel {
    /// Build a model whose parameters are drawn from `U(-1/sqrt(fan_in), 1/sqrt(fan_in))`
    /// with a generator seeded by `seed`.
    pub fn new(config: &SGCNConfig, seed: u64, device: &Device) -> Result<Self> {
        config.validate()?;
        let varmap = VarMap::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut pre = Vec::with_capacity(config.pre_proj_num);
        for i in 0..config.pre_proj_num {
            let fan_in = if i == 0 { config.input_size } else { config.hidden_size };
            pre.push(seeded_linear(
                &varmap,
                &format!("pre.{i}"),
                fan_in,
                config.hidden_size,
                &mut rng,
                device,
            )?);
        }

        let mut post = Vec::with_capacity(config.after_proj_num);
        for i in 0..config.after_proj_num {
            let fan_out = if i + 1 == config.after_proj_num {
                config.class_num
            } else {
                config.hidden_size
            };
            post.push(seeded_linear(
                &varmap,
                &format!("post.{i}"),
                config.hidden_size,
                fan_out,
                &mut rng,
                device,
            )?);
        }

        Ok(Self {
            pre,
            conv: SGConv::new(config.k),
            post,
            dropout: config.dropout,
            input_size: config.input_size,
            varmap,
        })
    }

    /// Forward pass producing `[N, class_num]` logits.
    ///
    /// `rng` drives the dropout masks and is only consumed in [`Mode::Train`].
    pub fn forward(
        &self,
        x: &Tensor,
        edges: &EdgeTensors,
        mode: Mode,
        rng: &mut ChaCha8Rng,
    ) -> Result<Tensor> {
        match mode {
            Mode::Train => self.run(x, edges, Some(rng)),
            Mode::Eval => self.run(x, edges, None),
        }
    }

    /// [`Mode::Eval`] forward pass.
    pub fn forward_eval(&self, x: &Tensor, edges: &EdgeTensors) -> Result<Tensor> {
        self.run(x, edges, None)
    }

    fn run(
        &self,
        x: &Tensor,
        edges: &EdgeTensors,
        mut rng: Option<&mut ChaCha8Rng>,
    ) -> Result<Tensor> {
        let (_, d) = x.dims2()?;
        if d != self.input_size {
            return Err(Error::Shape(format!(
                "model expects {} input features, got {d}",
                self.input_size
            )));
        }

        let mut h = x.clone();
        for lin in &self.pre {
            h = lin.forward(&h)?.relu()?;
            if let Some(rng) = rng.as_deref_mut() {
                h = dropout(&h, self.dropout, rng)?;
            }
        }

        h = self.conv.forward(&h, edges)?;

        let last = self.post.len() - 1;
        for (i, lin) in self.post.iter().enumerate() {
            h = lin.forward(&h)?;
            if i < last {
                h = h.relu()?;
                if let Some(rng) = rng.as_deref_mut() {
                    h = dropout(&h, self.dropout, rng)?;
                }
            }
        }
        Ok(h)
    }

    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    pub fn num_parameters(&self) -> usize {
        self.varmap.all_vars().iter().map(|v| v.elem_count()).sum()
    }

    /// Write all parameters as safetensors.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.varmap.save(path)?;
        Ok(())
    }

    /// Overwrite all parameters from a safetensors snapshot written by [`SGCNModel::save`].
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.varmap.load(path)?;
        Ok(())
    }
}

fn seeded_linear(
    varmap: &VarMap,
    prefix: &str,
    fan_in: usize,
    fan_out: usize,
    rng: &mut ChaCha8Rng,
    device: &Device,
) -> Result<Linear> {
    let bound = (fan_in as f32).sqrt().recip();
    let dist = Uniform::new_inclusive(-bound, bound);
    let w: Vec<f32> = (0..fan_in * fan_out).map(|_| dist.sample(rng)).collect();
    let b: Vec<f32> = (0..fan_out).map(|_| dist.sample(rng)).collect();

    let w = register(varmap, format!("{prefix}.weight"), Tensor::from_vec(w, (fan_out, fan_in), device)?)?;
    let b = register(varmap, format!("{prefix}.bias"), Tensor::from_vec(b, fan_out, device)?)?;
    Ok(Linear::new(w, Some(b)))
}

fn register(varmap: &VarMap, name: String, init: Tensor) -> Result<Tensor> {
    let var = Var::from_tensor(&init.to_dtype(DType::F32)?)?;
    let tensor = var.as_tensor().clone();
    let mut data = varmap.data().lock().unwrap_or_else(|e| e.into_inner());
    data.insert(name, var);
    Ok(tensor)
}

/// Inverted dropout with an explicit generator.
fn dropout(xs: &Tensor, p: f32, rng: &mut ChaCha8Rng) -> Result<Tensor> {
    if p == 0.0 {
        return Ok(xs.clone());
    }
    let scale = 1.0 / (1.0 - p);
    let mask: Vec<f32> = (0..xs.elem_count())
        .map(|_| if rng.gen::<f32>() < p { 0.0 } else { scale })
        .collect();
    let mask = Tensor::from_vec(mask, xs.dims(), xs.device())?;
    Ok(xs.mul(&mask)?)
}
