use msm_core::TransitionOperator;
use sha2::{Digest, Sha256};

/// Computes the canonical structural hash of an operator.
///
/// Dense and sparse storage of the same matrix hash identically because only
/// the state count and the row-major non-zero entries enter the digest.
pub fn canonical_operator_hash(op: &dyn TransitionOperator) -> String {
    let entries = op.entries();
    let mut hasher = Sha256::new();
    hasher.update((op.num_states() as u64).to_le_bytes());
    hasher.update((entries.len() as u64).to_le_bytes());
    for entry in &entries {
        hasher.update((entry.row as u64).to_le_bytes());
        hasher.update((entry.col as u64).to_le_bytes());
        hasher.update(entry.weight.to_bits().to_le_bytes());
    }

    let digest = hasher.finalize();
    digest
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<String>()
}
