use msm_core::errors::{ErrorInfo, MsmError};
use msm_core::{OperatorEntry, TransitionOperator};
use serde::{Deserialize, Serialize};

use crate::dense::DenseOperator;
use crate::sparse::SparseOperator;

/// Serializable description of a transition operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "kebab-case")]
pub enum OperatorSpec {
    /// Row-major dense matrix.
    Dense {
        /// One vector per row.
        rows: Vec<Vec<f64>>,
    },
    /// Coordinate entries of a sparse matrix.
    Sparse {
        /// Number of states.
        states: usize,
        /// Non-zero entries; duplicates are summed.
        entries: Vec<OperatorEntry>,
    },
}

impl OperatorSpec {
    /// Dense description of any operator.
    pub fn dense_from(op: &dyn TransitionOperator) -> Self {
        let dense = op.to_dense();
        let rows = dense
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        OperatorSpec::Dense { rows }
    }

    /// Sparse description of any operator.
    pub fn sparse_from(op: &dyn TransitionOperator) -> Self {
        OperatorSpec::Sparse {
            states: op.num_states(),
            entries: op.entries(),
        }
    }

    /// Instantiates the described operator with the matching backend.
    pub fn build(&self) -> Result<Box<dyn TransitionOperator>, MsmError> {
        match self {
            OperatorSpec::Dense { rows } => Ok(Box::new(DenseOperator::from_rows(rows)?)),
            OperatorSpec::Sparse { states, entries } => Ok(Box::new(
                SparseOperator::from_entries(*states, entries.iter().copied())?,
            )),
        }
    }
}

/// Serializes an operator description to a JSON string.
pub fn operator_to_json(spec: &OperatorSpec) -> Result<String, MsmError> {
    serde_json::to_string_pretty(spec)
        .map_err(|err| MsmError::Serde(ErrorInfo::new("serialize-json", err.to_string())))
}

/// Restores an operator description from a JSON string.
pub fn operator_from_json(json: &str) -> Result<OperatorSpec, MsmError> {
    serde_json::from_str(json)
        .map_err(|err| MsmError::Serde(ErrorInfo::new("deserialize-json", err.to_string())))
}

/// Serializes any operator to a compact binary representation using `bincode`.
pub fn operator_to_bytes(op: &dyn TransitionOperator) -> Result<Vec<u8>, MsmError> {
    let serializable = SerializableOperator {
        states: op.num_states() as u64,
        entries: op.entries(),
    };
    bincode::serialize(&serializable)
        .map_err(|err| MsmError::Serde(ErrorInfo::new("serialize-bytes", err.to_string())))
}

/// Restores an operator from its binary representation as a sparse operator.
pub fn operator_from_bytes(bytes: &[u8]) -> Result<SparseOperator, MsmError> {
    let serializable: SerializableOperator = bincode::deserialize(bytes)
        .map_err(|err| MsmError::Serde(ErrorInfo::new("deserialize-bytes", err.to_string())))?;
    let states = usize::try_from(serializable.states).map_err(|_| {
        MsmError::Serde(
            ErrorInfo::new("deserialize-bytes", "state count does not fit in usize")
                .with_context("states", serializable.states.to_string()),
        )
    })?;
    SparseOperator::from_entries(states, serializable.entries)
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializableOperator {
    states: u64,
    entries: Vec<OperatorEntry>,
}
