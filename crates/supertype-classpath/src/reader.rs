use supertype_classfile::ClassHeader;
use supertype_hierarchy::{HierarchyError, MetadataReader, Result, TypeMetadata};

use crate::{ClasspathError, ResourceLoader};

/// Reads [`TypeMetadata`] from `<name>.class` resources.
#[derive(Debug, Clone)]
pub struct ClassFileReader<L> {
    loader: L,
}

impl<L: ResourceLoader> ClassFileReader<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

fn resource_name(name: &str) -> String {
    format!("{name}.class")
}

impl<L: ResourceLoader> MetadataReader for ClassFileReader<L> {
    fn has_type(&self, name: &str) -> bool {
        self.loader.has_resource(&resource_name(name))
    }

    fn read_metadata(&self, name: &str) -> Result<TypeMetadata> {
        let bytes = match self.loader.read_resource(&resource_name(name)) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Err(HierarchyError::not_found(name)),
            Err(err) => return Err(HierarchyError::reader_io(name, err)),
        };
        let header = ClassHeader::parse(&bytes)
            .map_err(|err| HierarchyError::reader_io(name, ClasspathError::from(err)))?;

        tracing::trace!(
            target = "supertype.classpath",
            name,
            major_version = header.major_version,
            "parsed class header"
        );
        let is_interface = header.is_interface();
        Ok(TypeMetadata {
            class_name: header.this_class,
            super_name: header.super_class,
            interface_names: header.interfaces,
            is_interface,
        })
    }
}
