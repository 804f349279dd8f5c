//! Computes the most specific common super type of two classes, interfaces or
//! arrays from class metadata alone, without loading or linking anything.
//!
//! The entry point is [`ClassHierarchy`]. It asks a [`MetadataReader`] for the
//! `(name, super, interfaces, is_interface)` facts of each type on demand and
//! memoizes both the resulting [`TypeNode`] graph and every pairwise answer.
//!
//! ```
//! use std::sync::Arc;
//! use supertype_hierarchy::{ClassHierarchy, MetadataMap, TypeMetadata};
//!
//! let types = MetadataMap::new();
//! types.insert(TypeMetadata::interface("demo/Shape", &[]));
//! types.insert(TypeMetadata::class("demo/Circle", "java/lang/Object", &["demo/Shape"]));
//! types.insert(TypeMetadata::class("demo/Square", "java/lang/Object", &["demo/Shape"]));
//!
//! let hierarchy = ClassHierarchy::new(Arc::new(types));
//! assert_eq!(
//!     hierarchy.common_super_class("demo/Circle", "demo/Square").unwrap(),
//!     "demo/Shape"
//! );
//! ```

mod cache;
mod error;
mod flatten;
mod hierarchy;
mod metadata;
mod node;
mod special;
mod store;

pub use crate::cache::{LookupCache, PairKey};
pub use crate::error::{BoxError, HierarchyError, Result};
pub use crate::hierarchy::{ClassHierarchy, HierarchyCaches};
pub use crate::metadata::{MetadataMap, MetadataReader, TypeMetadata};
pub use crate::node::{NodeKind, TypeNode, TypeNodeRef, OBJECT};
pub use crate::special::SpecialInterfaceRegistry;
pub use crate::store::TypeNodeStore;

pub use supertype_classfile::{BaseType, FieldType};
pub use supertype_config::HierarchyConfig;
