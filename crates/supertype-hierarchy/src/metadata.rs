use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{HierarchyError, Result};
use crate::node::OBJECT;

/// The structural facts about one class or interface that the hierarchy needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMetadata {
    pub class_name: String,
    pub super_name: Option<String>,
    pub interface_names: Vec<String>,
    pub is_interface: bool,
}

impl TypeMetadata {
    pub fn class(name: &str, super_name: &str, interfaces: &[&str]) -> Self {
        Self {
            class_name: name.to_owned(),
            super_name: Some(super_name.to_owned()),
            interface_names: interfaces.iter().map(|&i| i.to_owned()).collect(),
            is_interface: false,
        }
    }

    /// Interfaces carry `java/lang/Object` as their super class, as in class files.
    pub fn interface(name: &str, extends: &[&str]) -> Self {
        Self {
            class_name: name.to_owned(),
            super_name: Some(OBJECT.to_owned()),
            interface_names: extends.iter().map(|&i| i.to_owned()).collect(),
            is_interface: true,
        }
    }
}

/// Source of [`TypeMetadata`], keyed by internal name (`a/b/C`).
///
/// Implementations must be idempotent: the hierarchy re-reads a type whenever
/// its cached node has been dropped.
pub trait MetadataReader: Send + Sync {
    /// Cheap existence probe without side effects.
    fn has_type(&self, name: &str) -> bool;

    /// Fails with [`HierarchyError::NotFound`] when the type does not exist and
    /// [`HierarchyError::ReaderIo`] when it exists but cannot be read.
    fn read_metadata(&self, name: &str) -> Result<TypeMetadata>;
}

/// In-memory reader, e.g. for types synthesized in the current run that have
/// not been written anywhere yet. Types can be added after construction.
#[derive(Debug, Default)]
pub struct MetadataMap {
    types: RwLock<HashMap<String, TypeMetadata>>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a type, returning the previous metadata.
    pub fn insert(&self, metadata: TypeMetadata) -> Option<TypeMetadata> {
        self.types
            .write()
            .insert(metadata.class_name.clone(), metadata)
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl FromIterator<TypeMetadata> for MetadataMap {
    fn from_iter<I: IntoIterator<Item = TypeMetadata>>(iter: I) -> Self {
        let map = MetadataMap::new();
        for metadata in iter {
            map.insert(metadata);
        }
        map
    }
}

impl MetadataReader for MetadataMap {
    fn has_type(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    fn read_metadata(&self, name: &str) -> Result<TypeMetadata> {
        self.types
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| HierarchyError::not_found(name))
    }
}
