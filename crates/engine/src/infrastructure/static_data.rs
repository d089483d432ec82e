//! JSON-backed monster balance data.

use std::collections::HashMap;
use std::path::Path;

use emberfall_domain::{MonsterDescriptor, MonsterTypeId};

use crate::infrastructure::ports::{StaticDataError, StaticDataPort};

/// Monster descriptors loaded once at startup and read-only afterwards.
#[derive(Debug, Default)]
pub struct JsonStaticData {
    monsters: HashMap<MonsterTypeId, MonsterDescriptor>,
}

impl JsonStaticData {
    /// Build from descriptors, validating each one and rejecting duplicate ids.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = MonsterDescriptor>,
    ) -> Result<Self, StaticDataError> {
        let mut monsters = HashMap::new();
        for descriptor in descriptors {
            descriptor.validate()?;
            if monsters.contains_key(&descriptor.type_id) {
                return Err(StaticDataError::Duplicate {
                    type_id: descriptor.type_id,
                });
            }
            monsters.insert(descriptor.type_id.clone(), descriptor);
        }
        Ok(Self { monsters })
    }

    /// Parse a JSON array of descriptors.
    pub fn from_json_str(json: &str) -> Result<Self, StaticDataError> {
        let descriptors: Vec<MonsterDescriptor> =
            serde_json::from_str(json).map_err(|e| StaticDataError::Parse(e.to_string()))?;
        Self::from_descriptors(descriptors)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StaticDataError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StaticDataError::Io(format!("{}: {}", path.display(), e)))?;
        let data = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            monsters = data.monsters.len(),
            "Loaded monster static data"
        );
        Ok(data)
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}

impl StaticDataPort for JsonStaticData {
    fn monster(&self, type_id: &MonsterTypeId) -> Result<MonsterDescriptor, StaticDataError> {
        self.monsters
            .get(type_id)
            .cloned()
            .ok_or_else(|| StaticDataError::not_found(type_id))
    }

    fn monster_types(&self) -> Vec<MonsterTypeId> {
        let mut types: Vec<_> = self.monsters.keys().cloned().collect();
        types.sort();
        types
    }
}
