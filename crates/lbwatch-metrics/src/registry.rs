//! Gauge registry — latest value per (metric name, label set).
//!
//! A single `RwLock` guards all families. Writers replace whole entries
//! under the write lock, so a concurrent scrape sees either the old or the
//! new value of a series, never a mix.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// Static description of a gauge family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeDesc {
    pub name: &'static str,
    pub help: &'static str,
    /// Label names, in exposition order.
    pub labels: &'static [&'static str],
}

/// One gauge value produced by the translator.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: &'static str,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

impl MetricSample {
    pub fn new(name: &'static str, labels: Vec<(&'static str, String)>, value: f64) -> Self {
        Self { name, labels, value }
    }

    /// Value of the label `key`, if present.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Errors raised when registering or writing gauges.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RegistryError {
    #[error("metric {0} is not registered")]
    UnknownMetric(String),

    #[error("metric {name} expects labels {expected:?}, got {got:?}")]
    LabelMismatch {
        name: String,
        expected: Vec<&'static str>,
        got: Vec<&'static str>,
    },

    #[error("metric {0} is already registered with a different description")]
    Conflict(String),
}

/// Outcome of writing a batch of samples.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub written: usize,
    pub rejected: Vec<RegistryError>,
}

/// A single labeled series as seen by a reader.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

/// A gauge family and its current series.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeFamily {
    pub desc: GaugeDesc,
    pub series: Vec<Series>,
}

struct Family {
    desc: GaugeDesc,
    /// Label values (in `desc.labels` order) → last written value.
    series: BTreeMap<Vec<String>, f64>,
}

impl Family {
    fn set(&mut self, labels: Vec<(&'static str, String)>, value: f64) -> Result<(), RegistryError> {
        let keys_match = labels.len() == self.desc.labels.len()
            && labels
                .iter()
                .zip(self.desc.labels)
                .all(|((key, _), expected)| key == expected);
        if !keys_match {
            return Err(RegistryError::LabelMismatch {
                name: self.desc.name.to_string(),
                expected: self.desc.labels.to_vec(),
                got: labels.iter().map(|(k, _)| *k).collect(),
            });
        }

        let values = labels.into_iter().map(|(_, v)| v).collect();
        self.series.insert(values, value);
        Ok(())
    }
}

#[derive(Default)]
struct Inner {
    /// Families in registration order.
    families: Vec<Family>,
}

impl Inner {
    fn family_mut(&mut self, name: &str) -> Result<&mut Family, RegistryError> {
        self.families
            .iter_mut()
            .find(|f| f.desc.name == name)
            .ok_or_else(|| RegistryError::UnknownMetric(name.to_string()))
    }
}

/// Shared gauge registry.
///
/// Cheap to clone; all clones refer to the same storage.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<RwLock<Inner>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a gauge family.
    pub async fn register(&self, desc: GaugeDesc) -> Result<(), RegistryError> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.families.iter().find(|f| f.desc.name == desc.name) {
            if existing.desc == desc {
                return Ok(());
            }
            return Err(RegistryError::Conflict(desc.name.to_string()));
        }
        inner.families.push(Family {
            desc,
            series: BTreeMap::new(),
        });
        debug!(metric = desc.name, "gauge registered");
        Ok(())
    }

    /// Set the value of one series, replacing any previous value.
    pub async fn set(
        &self,
        name: &str,
        labels: Vec<(&'static str, String)>,
        value: f64,
    ) -> Result<(), RegistryError> {
        let mut inner = self.inner.write().await;
        inner.family_mut(name)?.set(labels, value)
    }

    /// Write a batch of samples. Invalid samples are skipped and reported.
    pub async fn apply(&self, samples: Vec<MetricSample>) -> ApplyReport {
        let mut report = ApplyReport::default();
        let mut inner = self.inner.write().await;
        for sample in samples {
            match inner
                .family_mut(sample.name)
                .and_then(|f| f.set(sample.labels, sample.value))
            {
                Ok(()) => report.written += 1,
                Err(e) => report.rejected.push(e),
            }
        }
        report
    }

    /// Copy out every family and its series.
    pub async fn snapshot(&self) -> Vec<GaugeFamily> {
        let inner = self.inner.read().await;
        inner
            .families
            .iter()
            .map(|f| GaugeFamily {
                desc: f.desc,
                series: f
                    .series
                    .iter()
                    .map(|(values, value)| Series {
                        labels: f.desc.labels.iter().copied().zip(values.iter().cloned()).collect(),
                        value: *value,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Flattened view of the registry, one sample per series.
    ///
    /// Introspection helper; the exposition path uses [`Registry::snapshot`].
    pub async fn samples(&self) -> Vec<MetricSample> {
        self.snapshot()
            .await
            .into_iter()
            .flat_map(|family| {
                let name = family.desc.name;
                family
                    .series
                    .into_iter()
                    .map(move |s| MetricSample::new(name, s.labels, s.value))
            })
            .collect()
    }

    /// Total number of stored series across all families. Logged by the
    /// refresh worker after each poll.
    pub async fn series_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.families.iter().map(|f| f.series.len()).sum()
    }
}
