use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Weak};

use lru::LruCache;
use parking_lot::Mutex;
use supertype_classfile::BaseType;

use crate::error::{HierarchyError, Result};
use crate::metadata::MetadataReader;
use crate::node::{TypeNode, TypeNodeRef};
use crate::special::SpecialInterfaceRegistry;

const MIN_SWEEP_THRESHOLD: usize = 1_024;

/// Name → node table.
///
/// The root, the eight primitives and the special interfaces are pinned for
/// the lifetime of the store. Every other node is tracked weakly, so a lookup
/// returns the existing instance for as long as anything references it, and
/// kept alive by a bounded LRU of strong references. Once a node falls out of
/// the LRU and is no longer referenced it is dropped and rebuilt from the
/// metadata reader on the next lookup.
pub struct TypeNodeStore {
    object: TypeNodeRef,
    primitives: [TypeNodeRef; 8],
    pinned: HashMap<Arc<str>, TypeNodeRef>,
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    live: HashMap<Arc<str>, Weak<TypeNode>>,
    retained: Option<LruCache<Arc<str>, TypeNodeRef>>,
    sweep_threshold: usize,
}

impl StoreInner {
    fn retain(&mut self, node: &TypeNodeRef) {
        if let Some(retained) = self.retained.as_mut() {
            if retained.get(node.name()).is_none() {
                retained.put(node.name_arc(), node.clone());
            }
        }
    }

    fn sweep_if_needed(&mut self) {
        if self.live.len() < self.sweep_threshold {
            return;
        }
        let before = self.live.len();
        self.live.retain(|_, node| node.strong_count() > 0);
        self.sweep_threshold = (self.live.len() * 2).max(MIN_SWEEP_THRESHOLD);
        tracing::debug!(
            target = "supertype.hierarchy",
            dropped = before - self.live.len(),
            live = self.live.len(),
            "swept dead type node entries"
        );
    }
}

impl TypeNodeStore {
    /// `node_capacity` bounds the strongly retained nodes; `0` keeps none.
    pub fn new(node_capacity: usize, specials: &SpecialInterfaceRegistry) -> Self {
        let object = Arc::new(TypeNode::object_root());
        let primitives = BaseType::ALL.map(|base| Arc::new(TypeNode::primitive(base)));

        let mut pinned: HashMap<Arc<str>, TypeNodeRef> = HashMap::new();
        pinned.insert(object.name_arc(), object.clone());
        for primitive in &primitives {
            pinned.insert(primitive.name_arc(), primitive.clone());
        }
        for (name, interfaces) in specials.iter() {
            if pinned.contains_key(name) {
                tracing::warn!(
                    target = "supertype.hierarchy",
                    name,
                    "special interface would replace a pinned type; skipping"
                );
                continue;
            }
            let node = Arc::new(TypeNode::special_interface(name, interfaces.to_vec()));
            pinned.insert(node.name_arc(), node);
        }

        Self {
            object,
            primitives,
            pinned,
            inner: Mutex::new(StoreInner {
                live: HashMap::new(),
                retained: NonZeroUsize::new(node_capacity).map(LruCache::new),
                sweep_threshold: MIN_SWEEP_THRESHOLD,
            }),
        }
    }

    pub fn object_root(&self) -> TypeNodeRef {
        self.object.clone()
    }

    pub fn primitive(&self, base: BaseType) -> TypeNodeRef {
        self.primitives[base as usize].clone()
    }

    pub fn is_pinned(&self, name: &str) -> bool {
        self.pinned.contains_key(name)
    }

    /// The cached node for `name`, without consulting any reader.
    pub fn cached(&self, name: &str) -> Option<TypeNodeRef> {
        if let Some(node) = self.pinned.get(name) {
            return Some(node.clone());
        }
        let mut inner = self.inner.lock();
        let node = inner.live.get(name)?.upgrade()?;
        inner.retain(&node);
        Some(node)
    }

    /// Number of strongly retained (non-pinned) nodes.
    pub fn retained_len(&self) -> usize {
        self.inner
            .lock()
            .retained
            .as_ref()
            .map_or(0, |retained| retained.len())
    }

    /// Drops every strong reference the store holds to non-pinned nodes, as a
    /// memory-pressure hook. Nodes still referenced elsewhere stay shared.
    pub fn release_retained(&self) {
        let mut inner = self.inner.lock();
        if let Some(retained) = inner.retained.as_mut() {
            retained.clear();
        }
        inner.live.retain(|_, node| node.strong_count() > 0);
    }

    pub(crate) fn node(&self, name: &str, reader: &dyn MetadataReader) -> Result<TypeNodeRef> {
        if let Some(node) = self.cached(name) {
            return Ok(node);
        }
        let node = self.load(name, reader)?;
        Ok(self.insert(node))
    }

    /// Publishes a freshly built node. When another caller published the same
    /// name first, theirs wins and `node` is discarded.
    fn insert(&self, node: TypeNodeRef) -> TypeNodeRef {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.live.get(node.name()).and_then(Weak::upgrade) {
            return existing;
        }
        inner.live.insert(node.name_arc(), Arc::downgrade(&node));
        inner.retain(&node);
        inner.sweep_if_needed();
        node
    }

    fn load(&self, name: &str, reader: &dyn MetadataReader) -> Result<TypeNodeRef> {
        if name.is_empty() {
            return Err(HierarchyError::malformed(name, "empty type name"));
        }
        if let Some(element) = name.strip_prefix('[') {
            let element = self.element(name, element, reader)?;
            return Ok(Arc::new(TypeNode::array(name, element)));
        }

        tracing::debug!(target = "supertype.hierarchy", name, "reading type metadata");
        let metadata = reader.read_metadata(name)?;
        if metadata.class_name != name {
            tracing::warn!(
                target = "supertype.hierarchy",
                requested = name,
                found = %metadata.class_name,
                "metadata reader returned a different class name; keeping the requested one"
            );
        }
        Ok(Arc::new(TypeNode::class(
            name,
            metadata.super_name,
            metadata.interface_names,
            metadata.is_interface,
        )))
    }

    /// Resolves the element of array descriptor `descriptor`: a nested array,
    /// a primitive code or `L<name>;`.
    fn element(
        &self,
        descriptor: &str,
        element: &str,
        reader: &dyn MetadataReader,
    ) -> Result<TypeNodeRef> {
        let mut chars = element.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(HierarchyError::malformed(descriptor, "missing array element type")),
            (Some('['), _) => self.node(element, reader),
            (Some('L'), _) => {
                let name = element[1..].strip_suffix(';').ok_or_else(|| {
                    HierarchyError::malformed(descriptor, "unterminated object element type")
                })?;
                if name.is_empty() || name.contains(';') || name.starts_with('[') {
                    let reason = "invalid object element type";
                    return Err(HierarchyError::malformed(descriptor, reason));
                }
                self.node(name, reader)
            }
            (Some(code), None) => match BaseType::from_code(code) {
                Some(base) => Ok(self.primitive(base)),
                None => Err(HierarchyError::malformed(descriptor, "unknown element type")),
            },
            (Some(_), Some(_)) => {
                Err(HierarchyError::malformed(descriptor, "unknown element type"))
            }
        }
    }
}

impl fmt::Debug for TypeNodeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("TypeNodeStore")
            .field("pinned", &self.pinned.len())
            .field("live", &inner.live.len())
            .field(
                "retained",
                &inner.retained.as_ref().map_or(0, |retained| retained.len()),
            )
            .finish()
    }
}
