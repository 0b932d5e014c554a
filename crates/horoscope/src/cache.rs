//! Bounded chart cache for the calling layer. The core pipeline never uses it.

use crate::chart::NatalChart;
use crate::error::ChartError;
use crate::time::BirthMoment;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

pub const DEFAULT_CAPACITY: usize = 64;

/// Hex SHA-256 of the JSON form of a birth moment, house system included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartKey(String);

impl ChartKey {
    pub fn for_moment(moment: &BirthMoment) -> Result<Self, serde_json::Error> {
        let bytes = serde_json::to_vec(moment)?;
        Ok(Self(hex::encode(Sha256::digest(&bytes))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChartKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct Entry {
    chart: Arc<NatalChart>,
    last_used: u64,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<ChartKey, Entry>,
    clock: u64,
}

/// Least-recently-used map of computed charts.
pub struct ChartCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl ChartCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave an entry half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &ChartKey) -> Option<Arc<NatalChart>> {
        let mut inner = self.lock();
        inner.clock += 1;
        let now = inner.clock;
        inner.entries.get_mut(key).map(|entry| {
            entry.last_used = now;
            Arc::clone(&entry.chart)
        })
    }

    pub fn insert(&self, key: ChartKey, chart: NatalChart) -> Arc<NatalChart> {
        let chart = Arc::new(chart);
        let mut inner = self.lock();
        inner.clock += 1;
        let now = inner.clock;

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.capacity {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                log::debug!("evicting chart {}", oldest);
                inner.entries.remove(&oldest);
            }
        }
        inner.entries.insert(
            key,
            Entry {
                chart: Arc::clone(&chart),
                last_used: now,
            },
        );
        chart
    }

    /// Cached chart for `moment`, or the result of `compute` stored under its key.
    ///
    /// The lock is not held while `compute` runs, so two concurrent misses for
    /// the same moment may both compute; the later insert wins.
    pub async fn get_or_compute<F, Fut>(
        &self,
        moment: &BirthMoment,
        compute: F,
    ) -> Result<Arc<NatalChart>, ChartError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<NatalChart, ChartError>>,
    {
        let key = match ChartKey::for_moment(moment) {
            Ok(key) => key,
            Err(e) => {
                log::warn!("birth moment not cacheable: {}", e);
                return compute().await.map(Arc::new);
            }
        };
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let chart = compute().await?;
        Ok(self.insert(key, chart))
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
    }
}

impl Default for ChartCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
