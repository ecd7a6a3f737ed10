//! Categorical encoder for seed-type labels.
//!
//! The encoder is fit once during training over the labels actually observed
//! in the training data, and reused identically at inference. Codes are the
//! index of the label in the sorted, deduplicated label set, so for the usual
//! Hybrid/Local/Organic set the codes are 0/1/2.
//!
//! Inference must use an encoder fit on the same label set as training; an
//! unseen label is an error, never a silent default code.

use serde::{Deserialize, Serialize};

/// A fixed label → numeric-code mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedEncoder {
    /// Sorted, deduplicated labels. The code of a label is its index here.
    labels: Vec<String>,
}

impl SeedEncoder {
    /// Fit the encoder over observed labels (order and duplicates irrelevant).
    pub fn fit<I, S>(observed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels: Vec<String> = observed
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        labels.sort();
        labels.dedup();
        Self { labels }
    }

    /// Rebuild an encoder from a persisted label set.
    ///
    /// Returns `None` if the label set is not sorted-unique, which would make
    /// codes ambiguous relative to training.
    pub fn from_labels(labels: Vec<String>) -> Option<Self> {
        if labels.is_empty() {
            return None;
        }
        if labels.windows(2).any(|w| w[0] >= w[1]) {
            return None;
        }
        Some(Self { labels })
    }

    /// Encode a label to its numeric code.
    pub fn encode(&self, label: &str) -> Option<f64> {
        let label = label.trim();
        self.labels.iter().position(|l| l == label).map(|i| i as f64)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
