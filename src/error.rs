//! Error types for propago-sgcn.

use thiserror::Error;

/// Everything that can go wrong while building a graph, loading data or training.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Candle(#[from] candle_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("shape mismatch: {0}")]
    Shape(String),

    #[error("edge {edge} references node {node}, graph has {num_nodes} nodes")]
    EdgeOutOfRange {
        edge: usize,
        node: u32,
        num_nodes: usize,
    },

    #[error("{split} split contains node {node}, graph has {num_nodes} nodes")]
    IndexOutOfRange {
        split: &'static str,
        node: u32,
        num_nodes: usize,
    },

    #[error("{0} split is empty")]
    EmptySplit(&'static str),

    #[error("non-finite {what} at epoch {epoch}")]
    NonFinite { what: &'static str, epoch: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("dataset is missing array `{0}`")]
    MissingArray(String),
}

pub type Result<T> = std::result::Result<T, Error>;
