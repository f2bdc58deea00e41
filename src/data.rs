//! Node-classification datasets: features, labels, graph and index splits.

use candle_core::{DType, Device, Tensor};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::graph::{Graph, Normalization};

/// Ordered node-id subsets for training, validation and test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Splits {
    pub train: Vec<u32>,
    pub val: Vec<u32>,
    pub test: Vec<u32>,
}

impl Splits {
    fn named(&self) -> [(&'static str, &[u32]); 3] {
        [
            ("train", self.train.as_slice()),
            ("val", self.val.as_slice()),
            ("test", self.test.as_slice()),
        ]
    }
}

/// Everything a training run reads. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// `[N, D]` f32.
    pub features: Tensor,
    /// `[N]` u32 class ids.
    pub labels: Tensor,
    pub graph: Graph,
    pub splits: Splits,
}

impl Dataset {
    pub fn new(features: Tensor, labels: Tensor, graph: Graph, splits: Splits) -> Result<Self> {
        let ds = Self {
            features: features.to_dtype(DType::F32)?,
            labels: labels.to_dtype(DType::U32)?,
            graph,
            splits,
        };
        ds.validate()?;
        Ok(ds)
    }

    /// Load an `.npz` archive.
    ///
    /// Required arrays: `features`, `labels`, `idx_train`, `idx_val`, `idx_test`, and either a
    /// dense `adj` or an `edge_index` (`[2, E]`, row 0 = source) with optional `edge_weight`.
    pub fn from_npz<P: AsRef<Path>>(path: P, device: &Device) -> Result<Self> {
        let path = path.as_ref();
        let mut arrays: HashMap<String, Tensor> = Tensor::read_npz(path)?.into_iter().collect();
        let mut take = |name: &str| {
            arrays
                .remove(name)
                .ok_or_else(|| Error::MissingArray(name.to_string()))
        };

        let features = take("features")?;
        let labels = take("labels")?;
        let splits = Splits {
            train: index_vec(&take("idx_train")?)?,
            val: index_vec(&take("idx_val")?)?,
            test: index_vec(&take("idx_test")?)?,
        };

        let graph = match take("adj") {
            Ok(adj) => Graph::from_dense(&adj)?,
            Err(_) => {
                let edge_index = take("edge_index")?.to_dtype(DType::U32)?;
                let (rows, e) = edge_index.dims2()?;
                if rows != 2 {
                    return Err(Error::Shape(format!("edge_index must be [2, E], got [{rows}, {e}]")));
                }
                let ei = edge_index.to_vec2::<u32>()?;
                let weight = match take("edge_weight") {
                    Ok(w) => w.to_dtype(DType::F32)?.flatten_all()?.to_vec1::<f32>()?,
                    Err(_) => vec![1.0; e],
                };
                Graph::new(features.dim(0)?, ei[0].clone(), ei[1].clone(), weight)?
            }
        };

        let ds = Self::new(features.to_device(device)?, labels.to_device(device)?, graph, splits)?;
        info!(
            path = %path.display(),
            nodes = ds.num_nodes(),
            edges = ds.graph.num_edges(),
            features = ds.num_features(),
            "loaded dataset"
        );
        Ok(ds)
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.num_nodes()
    }

    pub fn num_features(&self) -> usize {
        self.features.dims().get(1).copied().unwrap_or(0)
    }

    /// Largest label + 1.
    pub fn num_classes(&self) -> Result<usize> {
        let max = self.labels.max(0)?.to_scalar::<u32>()?;
        Ok(max as usize + 1)
    }

    /// Replace the graph with a normalized copy.
    #[must_use]
    pub fn normalized(mut self, norm: Normalization) -> Self {
        self.graph = self.graph.normalized(norm);
        self
    }

    /// Check that features, labels and graph agree on `N` and that every split id is in range.
    ///
    /// Overlapping splits are logged, not rejected.
    pub fn validate(&self) -> Result<()> {
        let n = self.graph.num_nodes();
        let (rows, _) = self.features.dims2()?;
        let labels = self.labels.dims1()?;
        if rows != n || labels != n {
            return Err(Error::Shape(format!(
                "graph has {n} nodes, features {rows} rows, labels {labels} entries"
            )));
        }

        let mut seen: HashSet<u32> = HashSet::new();
        for (split, ids) in self.splits.named() {
            for &node in ids {
                if node as usize >= n {
                    return Err(Error::IndexOutOfRange {
                        split,
                        node,
                        num_nodes: n,
                    });
                }
            }
            let overlap = ids.iter().filter(|id| seen.contains(*id)).count();
            if overlap > 0 {
                warn!(split, overlap, "split shares nodes with an earlier split");
            }
            seen.extend(ids.iter().copied());
        }
        Ok(())
    }
}

fn index_vec(t: &Tensor) -> Result<Vec<u32>> {
    Ok(t.to_dtype(DType::U32)?.flatten_all()?.to_vec1::<u32>()?)
}
