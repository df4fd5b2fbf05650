//! Per-epoch training record.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// 1-based epoch number.
    pub epoch: usize,
    pub accuracy: f32,
    pub mean_loss: f32,
}

/// Accuracy and mean loss for every completed epoch, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochRecord>,
}

impl TrainingHistory {
    pub fn push(&mut self, record: EpochRecord) {
        self.epochs.push(record);
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn last(&self) -> Option<&EpochRecord> {
        self.epochs.last()
    }

    pub fn best_accuracy(&self) -> Option<&EpochRecord> {
        self.epochs
            .iter()
            .max_by(|a, b| a.accuracy.total_cmp(&b.accuracy))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_and_last() {
        let mut history = TrainingHistory::default();
        assert!(history.best_accuracy().is_none());

        history.push(EpochRecord { epoch: 1, accuracy: 0.4, mean_loss: 1.3 });
        history.push(EpochRecord { epoch: 2, accuracy: 0.7, mean_loss: 0.9 });
        history.push(EpochRecord { epoch: 3, accuracy: 0.6, mean_loss: 0.8 });

        assert_eq!(history.best_accuracy().unwrap().epoch, 2);
        assert_eq!(history.last().unwrap().epoch, 3);
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = TrainingHistory::default();
        history.push(EpochRecord { epoch: 1, accuracy: 0.25, mean_loss: 1.5 });
        history.save(&path).unwrap();

        assert_eq!(TrainingHistory::load(&path).unwrap(), history);
    }
}
