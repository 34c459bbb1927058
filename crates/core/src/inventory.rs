use crate::EmperorDef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub emperor_slots: usize,
    pub emperors: Vec<EmperorDef>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    #[error("no emperor slots")]
    NoEmperorSlots,
    #[error("emperor {0} already owned")]
    DuplicateEmperor(String),
    #[error("invalid emperor index {0}")]
    InvalidEmperorIndex(usize),
}

impl Inventory {
    pub fn with_slots(emperor_slots: usize) -> Self {
        Self {
            emperor_slots,
            emperors: Vec::new(),
        }
    }

    pub fn add_emperor(&mut self, emperor: EmperorDef) -> Result<(), InventoryError> {
        if self.emperors.iter().any(|owned| owned.id == emperor.id) {
            return Err(InventoryError::DuplicateEmperor(emperor.id));
        }
        if self.emperors.len() >= self.emperor_slots {
            return Err(InventoryError::NoEmperorSlots);
        }
        self.emperors.push(emperor);
        Ok(())
    }

    pub fn remove_emperor(&mut self, index: usize) -> Result<EmperorDef, InventoryError> {
        if index >= self.emperors.len() {
            return Err(InventoryError::InvalidEmperorIndex(index));
        }
        Ok(self.emperors.remove(index))
    }
}
