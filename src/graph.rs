//! Edge-coordinate graphs.
//!
//! A [`Graph`] stores messages as parallel `src`/`dst`/`weight` vectors: an edge
//! `src -> dst` with weight `w` contributes `w * h[src]` to `h[dst]` during propagation.
//! This matches `A * H` for a dense adjacency where `A[dst][src] = w`.

use candle_core::{DType, Device, Tensor};

use crate::error::{Error, Result};

/// Sparse graph in edge-coordinate (COO) form.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    num_nodes: usize,
    src: Vec<u32>,
    dst: Vec<u32>,
    weight: Vec<f32>,
}

/// Graph connectivity placed on a device, ready for [`crate::nn::SGConv`].
#[derive(Debug, Clone)]
pub struct EdgeTensors {
    /// Source node ids, `[E]` u32.
    pub src: Tensor,
    /// Destination node ids, `[E]` u32.
    pub dst: Tensor,
    /// Edge weights, `[E, 1]` f32 so they broadcast over feature columns.
    pub weight: Tensor,
    pub num_nodes: usize,
}

impl Graph {
    pub fn new(num_nodes: usize, src: Vec<u32>, dst: Vec<u32>, weight: Vec<f32>) -> Result<Self> {
        if src.len() != dst.len() || src.len() != weight.len() {
            return Err(Error::Shape(format!(
                "edge arrays disagree: src={} dst={} weight={}",
                src.len(),
                dst.len(),
                weight.len()
            )));
        }
        for (edge, (&s, &d)) in src.iter().zip(dst.iter()).enumerate() {
            for node in [s, d] {
                if node as usize >= num_nodes {
                    return Err(Error::EdgeOutOfRange {
                        edge,
                        node,
                        num_nodes,
                    });
                }
            }
        }
        Ok(Self {
            num_nodes,
            src,
            dst,
            weight,
        })
    }

    /// Unweighted graph from `(src, dst)` pairs; every edge gets weight 1.
    pub fn from_edges(num_nodes: usize, edges: &[(u32, u32)]) -> Result<Self> {
        let (src, dst) = edges.iter().copied().unzip();
        Self::new(num_nodes, src, dst, vec![1.0; edges.len()])
    }

    /// Undirected graph: each `(a, b)` pair is stored in both directions.
    pub fn undirected(num_nodes: usize, edges: &[(u32, u32)]) -> Result<Self> {
        let both: Vec<(u32, u32)> = edges
            .iter()
            .flat_map(|&(a, b)| [(a, b), (b, a)])
            .collect();
        Self::from_edges(num_nodes, &both)
    }

    /// Convert a dense `[N, N]` adjacency into edge coordinates.
    ///
    /// Every non-zero `adj[i][j]` becomes the edge `j -> i` with that weight.
    pub fn from_dense(adj: &Tensor) -> Result<Self> {
        let (rows, cols) = adj.dims2()?;
        if rows != cols {
            return Err(Error::Shape(format!("adjacency must be square, got [{rows}, {cols}]")));
        }
        let dense = adj.to_dtype(DType::F32)?.to_vec2::<f32>()?;
        let mut src = Vec::new();
        let mut dst = Vec::new();
        let mut weight = Vec::new();
        for (i, row) in dense.iter().enumerate() {
            for (j, &w) in row.iter().enumerate() {
                if w != 0.0 {
                    src.push(j as u32);
                    dst.push(i as u32);
                    weight.push(w);
                }
            }
        }
        Self::new(rows, src, dst, weight)
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.src.len()
    }

    pub fn src(&self) -> &[u32] {
        &self.src
    }

    pub fn dst(&self) -> &[u32] {
        &self.dst
    }

    pub fn weight(&self) -> &[f32] {
        &self.weight
    }

    /// Weighted in-degree of every node (sum of incoming edge weights).
    pub fn degrees(&self) -> Vec<f32> {
        let mut deg = vec![0.0f32; self.num_nodes];
        for (&d, &w) in self.dst.iter().zip(self.weight.iter()) {
            deg[d as usize] += w;
        }
        deg
    }

    /// Add `i -> i` with weight `fill` for every node that has no self loop yet.
    #[must_use]
    pub fn with_self_loops(mut self, fill: f32) -> Self {
        let mut has_loop = vec![false; self.num_nodes];
        for (&s, &d) in self.src.iter().zip(self.dst.iter()) {
            if s == d {
                has_loop[s as usize] = true;
            }
        }
        for (node, looped) in has_loop.into_iter().enumerate() {
            if !looped {
                self.src.push(node as u32);
                self.dst.push(node as u32);
                self.weight.push(fill);
            }
        }
        self
    }

    /// Symmetric normalization `w / sqrt(deg_src * deg_dst)` (Kipf & Welling).
    ///
    /// Edges touching a zero-degree node get weight 0.
    #[must_use]
    pub fn gcn_normalized(mut self) -> Self {
        let inv_sqrt: Vec<f32> = self
            .degrees()
            .into_iter()
            .map(|d| if d > 0.0 { d.sqrt().recip() } else { 0.0 })
            .collect();
        for ((w, &s), &d) in self.weight.iter_mut().zip(self.src.iter()).zip(self.dst.iter()) {
            *w *= inv_sqrt[s as usize] * inv_sqrt[d as usize];
        }
        self
    }

    /// Row normalization `w / deg_dst`: every node averages its incoming messages.
    #[must_use]
    pub fn row_normalized(mut self) -> Self {
        let deg = self.degrees();
        for (w, &d) in self.weight.iter_mut().zip(self.dst.iter()) {
            let deg = deg[d as usize];
            *w = if deg > 0.0 { *w / deg } else { 0.0 };
        }
        self
    }

    /// Number of weakly connected components (edge direction ignored).
    pub fn connected_components(&self) -> usize {
        let mut parent: Vec<usize> = (0..self.num_nodes).collect();

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        let mut components = self.num_nodes;
        for (&s, &d) in self.src.iter().zip(self.dst.iter()) {
            let a = find(&mut parent, s as usize);
            let b = find(&mut parent, d as usize);
            if a != b {
                parent[a] = b;
                components -= 1;
            }
        }
        components
    }

    pub fn to_tensors(&self, device: &Device) -> Result<EdgeTensors> {
        let e = self.num_edges();
        Ok(EdgeTensors {
            src: Tensor::from_slice(&self.src, e, device)?,
            dst: Tensor::from_slice(&self.dst, e, device)?,
            weight: Tensor::from_slice(&self.weight, (e, 1), device)?,
            num_nodes: self.num_nodes,
        })
    }
}

/// How raw adjacency weights are rescaled before training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Self loops + `D^-1/2 A D^-1/2`.
    #[default]
    Symmetric,
    /// Self loops + `D^-1 A`.
    Row,
    /// Use the weights as given.
    None,
}

impl Graph {
    /// Apply a [`Normalization`] policy.
    #[must_use]
    pub fn normalized(self, norm: Normalization) -> Self {
        match norm {
            Normalization::Symmetric => self.with_self_loops(1.0).gcn_normalized(),
            Normalization::Row => self.with_self_loops(1.0).row_normalized(),
            Normalization::None => self,
        }
    }
}
