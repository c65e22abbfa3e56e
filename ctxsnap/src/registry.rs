use std::collections::HashMap;

use crate::types::EntityDescriptor;

/// Entity descriptors known to a context, keyed by entity name.
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    descriptors: HashMap<String, EntityDescriptor>,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor, replacing any previous one with the same name.
    pub fn register(&mut self, descriptor: EntityDescriptor) {
        self.descriptors.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, entity_name: &str) -> Option<&EntityDescriptor> {
        self.descriptors.get(entity_name)
    }

    pub fn contains(&self, entity_name: &str) -> bool {
        self.descriptors.contains_key(entity_name)
    }

    /// Entity names in sorted order.
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn clear(&mut self) {
        self.descriptors.clear();
    }
}
