//! Line consolidation.
//!
//! Purchase and sale lines that repeat the same (product, presentation) pair are
//! merged into one line before anything touches the ledger. The merged line
//! keeps the position of the first occurrence.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::InventoryError;

/// A line that can be merged with another line for the same key.
pub trait Consolidate {
    /// The (product, presentation) pair identifying the line.
    fn key(&self) -> (Uuid, Uuid);

    /// Folds `other` into `self`. Both lines share the same key.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` when the merged amounts leave their range.
    fn absorb(&mut self, other: Self) -> Result<(), InventoryError>;
}

/// Merges lines sharing a key, preserving first-appearance order.
///
/// # Errors
///
/// Returns the first `absorb` failure.
pub fn consolidate<T: Consolidate>(lines: Vec<T>) -> Result<Vec<T>, InventoryError> {
    let mut merged: Vec<T> = Vec::with_capacity(lines.len());
    let mut positions: HashMap<(Uuid, Uuid), usize> = HashMap::new();

    for line in lines {
        let key = line.key();
        if let Some(&pos) = positions.get(&key) {
            merged[pos].absorb(line)?;
        } else {
            positions.insert(key, merged.len());
            merged.push(line);
        }
    }

    Ok(merged)
}
