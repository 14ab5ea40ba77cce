//! # Chunk Planner
//!
//! Partitions a payload of `L` bytes across an ordered list of carrier
//! capacities with a greedy sequential fill: carrier `i` receives
//! `min(remaining, capacities[i])` bytes starting where carrier `i - 1` stopped.
//!
//! Decode never sees the plan. It relies on every carrier's length header and on
//! the carriers arriving in the same order, so for fixed inputs the plan must be
//! unique and reproducible.

use std::ops::Range;

use crate::error::{Result, StegError};

/// The half-open payload range `[byte_offset, byte_offset + byte_length)`
/// assigned to the carrier at `carrier_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkAssignment {
    pub carrier_index: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
}

impl ChunkAssignment {
    pub fn end(&self) -> usize {
        self.byte_offset + self.byte_length
    }

    /// Payload range to slice for this carrier.
    pub fn range(&self) -> Range<usize> {
        self.byte_offset..self.end()
    }
}

/// One assignment per carrier, in carrier order, partitioning `[0, L)` exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodingPlan {
    payload_len: usize,
    assignments: Vec<ChunkAssignment>,
}

impl EncodingPlan {
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    pub fn assignments(&self) -> &[ChunkAssignment] {
        &self.assignments
    }

    /// Number of carriers covered (equal to the number of capacities planned over).
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChunkAssignment> {
        self.assignments.iter()
    }
}

impl<'a> IntoIterator for &'a EncodingPlan {
    type Item = &'a ChunkAssignment;
    type IntoIter = std::slice::Iter<'a, ChunkAssignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}

/// Build the plan for a payload of `payload_len` bytes.
///
/// Every carrier gets an assignment, including trailing carriers that end up
/// with zero bytes once the payload is exhausted.
///
/// # Errors
/// [`StegError::Capacity`] when `sum(capacities) < payload_len`, which includes
/// an empty carrier list with a non-empty payload. No partial plan is returned.
pub fn plan(payload_len: usize, capacities: &[usize]) -> Result<EncodingPlan> {
    let available = capacities
        .iter()
        .fold(0usize, |total, &capacity| total.saturating_add(capacity));

    if available < payload_len {
        return Err(StegError::Capacity {
            required: payload_len,
            available,
        });
    }

    let assignments = capacities
        .iter()
        .enumerate()
        .scan(0usize, |offset, (carrier_index, &capacity)| {
            let byte_length = capacity.min(payload_len - *offset);
            let assignment = ChunkAssignment {
                carrier_index,
                byte_offset: *offset,
                byte_length,
            };
            *offset += byte_length;
            Some(assignment)
        })
        .collect();

    Ok(EncodingPlan {
        payload_len,
        assignments,
    })
}
