//! Bounded, file-persisted weather history.
//!
//! The buffer keeps insertion order and evicts the oldest sample once
//! capacity is exceeded. Every mutation rewrites the backing JSON file
//! wholesale; there is a single logical writer, so no partial-write handling
//! is needed. Loads are tolerant: a missing file is an empty history,
//! malformed records are skipped, and records from before unit tagging load
//! as metric.

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};

use crate::types::{Sample, UnitSystem, WeatherError};

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl HistoryStore {
    /// Open a store backed by `path`, loading any persisted history.
    ///
    /// Never fails: unreadable or malformed state degrades to an empty
    /// buffer with a logged warning.
    pub fn open<P: AsRef<Path>>(path: P, capacity: usize) -> Self {
        let path = path.as_ref().to_path_buf();
        let samples = match std::fs::read_to_string(&path) {
            Ok(contents) => Self::decode(&contents, capacity),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => VecDeque::new(),
            Err(e) => {
                tracing::warn!("Failed to read history file {}: {}", path.display(), e);
                VecDeque::new()
            }
        };

        tracing::debug!(
            "Opened history store at {} with {} samples",
            path.display(),
            samples.len()
        );

        Self {
            path,
            capacity,
            samples,
        }
    }

    /// Decode a persisted JSON array, skipping records that do not parse.
    /// Records in excess of capacity are dropped oldest-first.
    fn decode(contents: &str, capacity: usize) -> VecDeque<Sample> {
        let records: Vec<serde_json::Value> = match serde_json::from_str(contents) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("History file is not a JSON array, starting empty: {}", e);
                return VecDeque::new();
            }
        };

        let mut samples = VecDeque::with_capacity(records.len().min(capacity));
        for record in records {
            match serde_json::from_value::<Sample>(record) {
                Ok(sample) => {
                    samples.push_back(sample);
                    if samples.len() > capacity {
                        samples.pop_front();
                    }
                }
                Err(e) => tracing::warn!("Skipping malformed history record: {}", e),
            }
        }
        samples
    }

    /// Append a sample, evicting the oldest past capacity, then persist.
    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        self.write_through();
    }

    /// Append a batch of samples (one refresh across cities), persisting once.
    pub fn extend<I: IntoIterator<Item = Sample>>(&mut self, batch: I) {
        let before = self.samples.len();
        self.samples.extend(batch);
        if self.samples.len() == before {
            return;
        }
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        self.write_through();
    }

    fn write_through(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!("Failed to persist history to {}: {}", self.path.display(), e);
        }
    }

    /// Write the whole buffer back to the backing file.
    pub fn persist(&self) -> Result<(), WeatherError> {
        let records: Vec<&Sample> = self.samples.iter().collect();
        let json =
            serde_json::to_string(&records).map_err(|e| WeatherError::Storage(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| WeatherError::Storage(e.to_string()))
    }

    /// All samples in insertion order.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// The last `n` samples in insertion order.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Sample> {
        self.samples.iter().skip(self.samples.len().saturating_sub(n))
    }

    /// Lazy replay of the whole history with every sample converted to
    /// `target`; samples already tagged `target` pass through unchanged.
    pub fn in_units(&self, target: UnitSystem) -> impl Iterator<Item = Sample> + '_ {
        self.samples.iter().map(move |s| s.in_units(target))
    }

    /// Most recent sample per city, ordered by city name.
    pub fn latest_by_city(&self) -> Vec<&Sample> {
        let mut latest: BTreeMap<&str, &Sample> = BTreeMap::new();
        for sample in &self.samples {
            latest.insert(sample.city.as_str(), sample);
        }
        latest.into_values().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
