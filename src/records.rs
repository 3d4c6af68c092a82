//! Completion times per level and formula
//!
//! Persisted as two parallel `||`-joined lists per level: formulas under
//! `s{level}` and times (ms) under `t{level}`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// Separator between list entries in storage
pub const DELIMITER: &str = "||";

/// Key/value storage the records live in (LocalStorage on the web)
pub trait RecordStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-process store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

/// One winning attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptEntry {
    /// `describe()` of the function that won
    pub formula: String,
    /// Wall time from play to door, in ms
    pub time_ms: u64,
}

/// All recorded wins for one level, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub entries: Vec<AttemptEntry>,
}

impl AttemptRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a win; a formula already on record is moved to the end with
    /// its new time
    pub fn record(&mut self, formula: &str, time_ms: u64) {
        self.entries.retain(|e| e.formula != formula);
        self.entries.push(AttemptEntry {
            formula: formula.to_string(),
            time_ms,
        });
    }

    /// Fastest win so far
    pub fn best(&self) -> Option<&AttemptEntry> {
        self.entries.iter().min_by_key(|e| e.time_ms)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(formulas, times)` joined with [`DELIMITER`]
    pub fn encode(&self) -> (String, String) {
        let formulas: Vec<&str> = self.entries.iter().map(|e| e.formula.as_str()).collect();
        let times: Vec<String> = self.entries.iter().map(|e| e.time_ms.to_string()).collect();
        (formulas.join(DELIMITER), times.join(DELIMITER))
    }

    pub fn decode(formulas: &str, times: &str) -> Result<Self, RecordError> {
        let formulas: Vec<&str> = formulas.split(DELIMITER).collect();
        let times: Vec<&str> = times.split(DELIMITER).collect();
        if formulas.len() != times.len() {
            return Err(RecordError::LengthMismatch {
                formulas: formulas.len(),
                times: times.len(),
            });
        }
        let entries = formulas
            .into_iter()
            .zip(times)
            .map(|(formula, time)| {
                let time_ms = time
                    .trim()
                    .parse()
                    .map_err(|_| RecordError::InvalidTime(time.to_string()))?;
                Ok(AttemptEntry {
                    formula: formula.to_string(),
                    time_ms,
                })
            })
            .collect::<Result<_, RecordError>>()?;
        Ok(Self { entries })
    }

    fn keys(level: u32) -> (String, String) {
        (format!("s{level}"), format!("t{level}"))
    }

    /// Load a level's record; missing keys mean no wins yet
    pub fn load(store: &dyn RecordStore, level: u32) -> Result<Self, RecordError> {
        let (s_key, t_key) = Self::keys(level);
        match (store.get(&s_key), store.get(&t_key)) {
            (Some(formulas), Some(times)) => Self::decode(&formulas, &times),
            _ => Ok(Self::new()),
        }
    }

    pub fn save(&self, store: &mut dyn RecordStore, level: u32) {
        let (s_key, t_key) = Self::keys(level);
        let (formulas, times) = self.encode();
        store.set(&s_key, &formulas);
        store.set(&t_key, &times);
        log::info!("Level {level} record saved ({} entries)", self.entries.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_formula_replaces_time() {
        let mut record = AttemptRecord::new();
        record.record("0.1(x-0)", 5000);
        record.record("0.2(x-0)", 4000);
        record.record("0.1(x-0)", 3000);

        assert_eq!(record.entries.len(), 2);
        assert_eq!(record.entries[0].formula, "0.2(x-0)");
        assert_eq!(record.entries[1], AttemptEntry {
            formula: "0.1(x-0)".to_string(),
            time_ms: 3000,
        });
        assert_eq!(record.best().map(|e| e.time_ms), Some(3000));
    }

    #[test]
    fn test_encode_layout() {
        let mut record = AttemptRecord::new();
        record.record("x^2+y^2", 1234);
        record.record("x+y", 99);
        assert_eq!(
            record.encode(),
            ("x^2+y^2||x+y".to_string(), "1234||99".to_string())
        );
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            AttemptRecord::decode("a||b", "1"),
            Err(RecordError::LengthMismatch { formulas: 2, times: 1 })
        );
        assert_eq!(
            AttemptRecord::decode("a", "soon"),
            Err(RecordError::InvalidTime("soon".to_string()))
        );
    }

    #[test]
    fn test_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(AttemptRecord::load(&store, 3).unwrap().is_empty());

        let mut record = AttemptRecord::new();
        record.record("d/dx[0.1(x-0)(x-5)]", 8000);
        record.save(&mut store, 3);

        assert_eq!(store.get("s3").as_deref(), Some("d/dx[0.1(x-0)(x-5)]"));
        assert_eq!(store.get("t3").as_deref(), Some("8000"));
        assert_eq!(AttemptRecord::load(&store, 3).unwrap(), record);
        assert!(AttemptRecord::load(&store, 4).unwrap().is_empty());
    }
}
