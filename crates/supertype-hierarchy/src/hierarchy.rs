use std::fmt;
use std::sync::Arc;

use supertype_classfile::FieldType;
use supertype_config::HierarchyConfig;

use crate::cache::LookupCache;
use crate::error::{HierarchyError, Result};
use crate::metadata::MetadataReader;
use crate::node::{TypeNode, TypeNodeRef};
use crate::special::SpecialInterfaceRegistry;
use crate::store::TypeNodeStore;

/// The caches behind one or more [`ClassHierarchy`] facades.
///
/// Facades over different readers may share one instance as long as the
/// readers describe the same set of types.
#[derive(Debug)]
pub struct HierarchyCaches {
    lookups: LookupCache,
    nodes: TypeNodeStore,
}

impl HierarchyCaches {
    pub fn new(config: &HierarchyConfig) -> Self {
        let specials = SpecialInterfaceRegistry::from_config(&config.special_interfaces);
        Self::with_specials(config.cache.node_capacity, &specials)
    }

    pub fn with_specials(node_capacity: usize, specials: &SpecialInterfaceRegistry) -> Self {
        Self {
            lookups: LookupCache::new(),
            nodes: TypeNodeStore::new(node_capacity, specials),
        }
    }

    pub fn lookups(&self) -> &LookupCache {
        &self.lookups
    }

    pub fn nodes(&self) -> &TypeNodeStore {
        &self.nodes
    }
}

impl Default for HierarchyCaches {
    fn default() -> Self {
        Self::new(&HierarchyConfig::default())
    }
}

/// Answers subtype and common-supertype questions about JVM types by name.
///
/// Names are internal names (`java/util/List`), primitive codes (`I`) or
/// array descriptors (`[Ljava/util/List;`). Cloning is cheap and clones share
/// caches.
#[derive(Clone)]
pub struct ClassHierarchy {
    reader: Arc<dyn MetadataReader>,
    caches: Arc<HierarchyCaches>,
}

impl ClassHierarchy {
    pub fn new(reader: Arc<dyn MetadataReader>) -> Self {
        Self::with_caches(reader, Arc::new(HierarchyCaches::default()))
    }

    pub fn with_config(reader: Arc<dyn MetadataReader>, config: &HierarchyConfig) -> Self {
        Self::with_caches(reader, Arc::new(HierarchyCaches::new(config)))
    }

    pub fn with_caches(reader: Arc<dyn MetadataReader>, caches: Arc<HierarchyCaches>) -> Self {
        Self { reader, caches }
    }

    pub fn reader(&self) -> &Arc<dyn MetadataReader> {
        &self.reader
    }

    pub fn caches(&self) -> &Arc<HierarchyCaches> {
        &self.caches
    }

    /// A facade over `reader` that reuses this hierarchy's caches.
    pub fn share_with(&self, reader: Arc<dyn MetadataReader>) -> ClassHierarchy {
        if std::ptr::addr_eq(Arc::as_ptr(&self.reader), Arc::as_ptr(&reader)) {
            return self.clone();
        }
        Self::with_caches(reader, self.caches.clone())
    }

    /// Whether `sub` is `sup` or one of its subtypes.
    pub fn is_sub_class(&self, sub: &str, sup: &str) -> Result<bool> {
        Ok(self.common_super_class(sub, sup)? == sup)
    }

    /// Whether `sup` is `sub` or one of its supertypes.
    pub fn is_super_class(&self, sup: &str, sub: &str) -> Result<bool> {
        self.is_sub_class(sub, sup)
    }

    /// The most specific type both `first` and `second` are assignable to.
    ///
    /// Successful answers are memoized for the unordered pair; failures are
    /// not, so a retry after the missing type becomes readable succeeds.
    pub fn common_super_class(&self, first: &str, second: &str) -> Result<String> {
        if let Some(answer) = self.caches.lookups.get(first, second) {
            return Ok(answer.to_string());
        }
        tracing::debug!(
            target = "supertype.hierarchy",
            first,
            second,
            "common super class cache miss"
        );

        let first_node = self.type_node(first)?;
        let second_node = self.type_node(second)?;
        let answer = self.calculate_common_super_class(&first_node, &second_node)?;
        Ok(self.caches.lookups.insert(first, second, answer).to_string())
    }

    /// [`Self::common_super_class`] over typed descriptors.
    pub fn common_super_type(&self, first: &FieldType, second: &FieldType) -> Result<FieldType> {
        let answer = self.common_super_class(&first.internal_name(), &second.internal_name())?;
        FieldType::from_internal_name(&answer)
            .map_err(|_| HierarchyError::malformed(answer, "not a field type"))
    }

    /// The node for `name`, read through this facade's reader on a cache miss.
    pub fn type_node(&self, name: &str) -> Result<TypeNodeRef> {
        self.caches.nodes.node(name, self.reader.as_ref())
    }

    pub fn object_root(&self) -> TypeNodeRef {
        self.caches.nodes.object_root()
    }

    fn calculate_common_super_class(
        &self,
        first: &TypeNodeRef,
        second: &TypeNodeRef,
    ) -> Result<Arc<str>> {
        if first.is_subclass_of(second, self)? {
            return Ok(second.name_arc());
        }
        if second.is_subclass_of(first, self)? {
            return Ok(first.name_arc());
        }

        if let (Some(first_element), Some(second_element)) =
            (first.reference_element(), second.reference_element())
        {
            let element = self.common_super_class(first_element.name(), second_element.name())?;
            return Ok(Arc::from(array_of(&element)));
        }

        let first_ancestors = first.flatten_hierarchy(self)?;
        let second_ancestors = second.flatten_hierarchy(self)?;
        Ok(first_common(&first_ancestors, &second_ancestors)
            .map(TypeNode::name_arc)
            .unwrap_or_else(|| self.object_root().name_arc()))
    }
}

/// First entry of `first` (most specific first) that also occurs in `second`.
fn first_common<'a>(first: &'a [TypeNodeRef], second: &[TypeNodeRef]) -> Option<&'a TypeNode> {
    first
        .iter()
        .find(|candidate| second.iter().any(|other| other.name() == candidate.name()))
        .map(|node| node.as_ref())
}

/// Array descriptor with the given element, which is an internal name or an
/// array descriptor.
fn array_of(element: &str) -> String {
    if element.starts_with('[') {
        format!("[{element}")
    } else {
        format!("[L{element};")
    }
}

impl fmt::Debug for ClassHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassHierarchy")
            .field("cached_lookups", &self.caches.lookups.len())
            .field("retained_nodes", &self.caches.nodes.retained_len())
            .finish_non_exhaustive()
    }
}
