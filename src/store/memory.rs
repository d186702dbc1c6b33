use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use anyhow::{Result, bail};

use crate::store::ProgressStore;
use crate::store::schema::ProgressData;

/// In-process store. Records are kept serialized so loads go through the
/// same parse path as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `save` fail until switched back.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Store raw text under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: &str, raw: &str) {
        self.records
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.records.borrow().get(key).cloned()
    }

    /// Successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl ProgressStore for MemoryStore {
    fn load(&self, key: &str) -> Option<ProgressData> {
        let records = self.records.borrow();
        let raw = records.get(key)?;
        serde_json::from_str(raw).ok()
    }

    fn save(&self, key: &str, data: &ProgressData) -> Result<()> {
        if self.fail_writes.get() {
            bail!("storage unavailable");
        }
        let json = serde_json::to_string(data)?;
        self.records.borrow_mut().insert(key.to_string(), json);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
