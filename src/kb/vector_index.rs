//! Flat in-memory vector index with exhaustive L2 search.
//!
//! Vectors are stored row-major in one contiguous buffer; an entry's
//! identity is its insertion position. Search cost is O(N * dim) per
//! query, which is fine at support-corpus scale.

use std::fs;
use std::path::Path;

use crate::core::errors::KbError;

#[derive(Debug)]
pub struct VectorIndex {
    dim: usize,
    data: Vec<f32>,
}

impl VectorIndex {
    pub fn new() -> Self {
        Self { dim: 0, data: Vec::new() }
    }

    pub fn len(&self) -> usize {
        if self.dim == 0 {
            0
        } else {
            self.data.len() / self.dim
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Append vectors in order. The first vector ever added fixes the
    /// index dimension; any later mismatch is corruption, not data.
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<(), KbError> {
        for vector in vectors {
            if vector.is_empty() {
                return Err(KbError::Corruption("empty embedding vector".to_string()));
            }
            if self.dim == 0 {
                self.dim = vector.len();
            } else if vector.len() != self.dim {
                return Err(KbError::Corruption(format!(
                    "embedding dimension mismatch: index is {}, vector is {}",
                    self.dim,
                    vector.len()
                )));
            }
            self.data.extend_from_slice(vector);
        }
        Ok(())
    }

    /// Up to `k` nearest entries as (position, squared L2 distance),
    /// ascending by distance. Squared distance preserves L2 ordering.
    /// An empty index yields an empty result; `k` past N clamps to N.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        if self.is_empty() || k == 0 {
            return Vec::new();
        }
        if query.len() != self.dim {
            tracing::warn!(
                query_dim = query.len(),
                index_dim = self.dim,
                "query dimension does not match index, returning no matches"
            );
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .enumerate()
            .map(|(pos, row)| {
                let dist = row
                    .iter()
                    .zip(query.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                (pos, dist)
            })
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k.min(self.len()));
        scored
    }

    /// Binary layout: `u32` dim, `u32` count, then count*dim little-endian
    /// `f32` values. Round-trips exactly, so a loaded index reproduces the
    /// same search ordering as the one that was saved.
    pub fn save(&self, path: &Path) -> Result<(), KbError> {
        let count = self.len() as u32;
        let mut buf = Vec::with_capacity(8 + self.data.len() * 4);
        buf.extend_from_slice(&(self.dim as u32).to_le_bytes());
        buf.extend_from_slice(&count.to_le_bytes());
        for value in &self.data {
            buf.extend_from_slice(&value.to_le_bytes());
        }
        fs::write(path, buf)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, KbError> {
        let bytes = fs::read(path)?;
        if bytes.len() < 8 {
            return Err(KbError::Corruption(format!(
                "{}: truncated index header",
                path.display()
            )));
        }

        let dim = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let count = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
        let payload = &bytes[8..];

        // Header fields come off disk; a corrupted pair of u32s can
        // overflow the expected-size arithmetic.
        let expected = count
            .checked_mul(dim)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                KbError::Corruption(format!(
                    "{}: implausible index header ({count} vectors of dim {dim})",
                    path.display()
                ))
            })?;

        if payload.len() != expected {
            return Err(KbError::Corruption(format!(
                "{}: expected {} vectors of dim {}, found {} payload bytes",
                path.display(),
                count,
                dim,
                payload.len()
            )));
        }

        let data = payload
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        Ok(Self { dim, data })
    }
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}
