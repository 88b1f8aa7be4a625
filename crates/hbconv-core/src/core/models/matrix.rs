use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Entity row {row} has {found} samples, expected {expected}")]
pub struct RaggedRowsError {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

/// A binary existence matrix, indexed `[time_sample][entity]`.
///
/// Values are stored row-major as `u8` (0 = absent, 1 = present), so the buffer can
/// be written out directly as a C-ordered `uint8` array of shape
/// `(n_samples, n_entities)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistenceMatrix {
    n_samples: usize,
    n_entities: usize,
    data: Vec<u8>,
}

impl ExistenceMatrix {
    /// Builds a matrix from per-entity traces (the orientation used by `.xpm` files),
    /// transposing them so that rows correspond to time samples.
    ///
    /// # Errors
    ///
    /// Returns [`RaggedRowsError`] if the traces do not all have the same length.
    pub fn from_entity_rows(rows: &[Vec<u8>]) -> Result<Self, RaggedRowsError> {
        let Some(first) = rows.first() else {
            return Ok(Self::default());
        };
        let n_samples = first.len();
        let n_entities = rows.len();

        if let Some((row, bad)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != n_samples)
        {
            return Err(RaggedRowsError {
                row,
                expected: n_samples,
                found: bad.len(),
            });
        }

        let mut data = vec![0u8; n_samples * n_entities];
        for (entity, trace) in rows.iter().enumerate() {
            for (sample, &value) in trace.iter().enumerate() {
                data[sample * n_entities + entity] = value;
            }
        }

        Ok(Self {
            n_samples,
            n_entities,
            data,
        })
    }

    /// Returns the per-entity traces, i.e. the transpose of the stored layout.
    pub fn to_entity_rows(&self) -> Vec<Vec<u8>> {
        (0..self.n_entities)
            .map(|entity| self.entity_trace(entity).collect())
            .collect()
    }

    /// `(n_samples, n_entities)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_samples, self.n_entities)
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_entities(&self) -> usize {
        self.n_entities
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, sample: usize, entity: usize) -> Option<u8> {
        if sample >= self.n_samples || entity >= self.n_entities {
            return None;
        }
        Some(self.data[sample * self.n_entities + entity])
    }

    /// All entity values at one time sample.
    pub fn sample(&self, sample: usize) -> Option<&[u8]> {
        if sample >= self.n_samples {
            return None;
        }
        let start = sample * self.n_entities;
        Some(&self.data[start..start + self.n_entities])
    }

    /// The time trace of one entity. Empty if `entity` is out of range.
    pub fn entity_trace(&self, entity: usize) -> impl Iterator<Item = u8> + '_ {
        let n_entities = self.n_entities;
        let valid = entity < n_entities;
        self.data
            .iter()
            .skip(entity)
            .step_by(n_entities.max(1))
            .take(if valid { self.n_samples } else { 0 })
            .copied()
    }

    /// The raw row-major buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Number of samples in which each entity is present.
    pub fn occupancy(&self) -> Vec<usize> {
        (0..self.n_entities)
            .map(|entity| self.entity_trace(entity).filter(|&v| v != 0).count())
            .collect()
    }
}
