use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use supertype_classfile::BaseType;

use crate::error::{HierarchyError, Result};
use crate::hierarchy::ClassHierarchy;

/// Internal name of the universal root type.
pub const OBJECT: &str = "java/lang/Object";

pub type TypeNodeRef = Arc<TypeNode>;

static NO_INTERFACES: Lazy<Arc<[TypeNodeRef]>> = Lazy::new(|| Arc::from(Vec::new()));

/// One vertex of the type lattice.
///
/// Nodes compare equal by name. Class and interface nodes start out with their
/// super class and interfaces as bare names; each edge is resolved to a node
/// the first time it is needed and never again.
pub struct TypeNode {
    name: Arc<str>,
    kind: NodeKind,
}

pub enum NodeKind {
    /// `java/lang/Object`: no super class, no interfaces.
    ObjectRoot,
    Primitive(BaseType),
    /// Super class is always the root; nothing is read for the array itself.
    Array { element: TypeNodeRef },
    Class(ClassEdges),
    /// A pinned marker interface that contributes no strength when ranking.
    SpecialInterface(ClassEdges),
}

/// Lazily resolved super class and interface edges of a class or interface.
pub struct ClassEdges {
    is_interface: bool,
    state: Mutex<EdgeState>,
}

struct EdgeState {
    superclass: Edge<Arc<str>, Option<TypeNodeRef>>,
    interfaces: Edge<Box<[Arc<str>]>, Arc<[TypeNodeRef]>>,
}

enum Edge<P, R> {
    Pending(P),
    Resolved(R),
}

impl ClassEdges {
    fn new(is_interface: bool, super_name: Option<String>, interface_names: Vec<String>) -> Self {
        let superclass = match super_name {
            Some(name) => Edge::Pending(Arc::from(name)),
            None => Edge::Resolved(None),
        };
        let interfaces = if interface_names.is_empty() {
            Edge::Resolved(NO_INTERFACES.clone())
        } else {
            Edge::Pending(interface_names.into_iter().map(Arc::from).collect())
        };
        Self {
            is_interface,
            state: Mutex::new(EdgeState {
                superclass,
                interfaces,
            }),
        }
    }

    fn superclass(&self, owner: &str, hierarchy: &ClassHierarchy) -> Result<Option<TypeNodeRef>> {
        let mut state = self.state.lock();
        let resolved = match &state.superclass {
            Edge::Resolved(node) => return Ok(node.clone()),
            Edge::Pending(name) => hierarchy.type_node(name)?,
        };
        tracing::trace!(
            target = "supertype.hierarchy",
            owner,
            superclass = resolved.name(),
            "resolved superclass edge"
        );
        state.superclass = Edge::Resolved(Some(resolved.clone()));
        Ok(Some(resolved))
    }

    fn interfaces(&self, owner: &str, hierarchy: &ClassHierarchy) -> Result<Arc<[TypeNodeRef]>> {
        let mut state = self.state.lock();
        let resolved: Arc<[TypeNodeRef]> = match &state.interfaces {
            Edge::Resolved(nodes) => return Ok(nodes.clone()),
            Edge::Pending(names) => names
                .iter()
                .map(|name| hierarchy.type_node(name))
                .collect::<Result<Vec<_>>>()?
                .into(),
        };
        tracing::trace!(
            target = "supertype.hierarchy",
            owner,
            count = resolved.len(),
            "resolved interface edges"
        );
        state.interfaces = Edge::Resolved(resolved.clone());
        Ok(resolved)
    }

    /// Name-only checks that need no resolution.
    fn names_reach(&self, base: &TypeNode) -> bool {
        let state = self.state.lock();
        if base.is_interface() {
            matches!(
                &state.interfaces,
                Edge::Pending(names) if names.iter().any(|n| **n == *base.name)
            )
        } else {
            matches!(&state.superclass, Edge::Pending(name) if **name == *base.name)
        }
    }
}

impl TypeNode {
    pub(crate) fn object_root() -> Self {
        Self {
            name: Arc::from(OBJECT),
            kind: NodeKind::ObjectRoot,
        }
    }

    pub(crate) fn primitive(base: BaseType) -> Self {
        Self {
            name: Arc::from(base.as_str()),
            kind: NodeKind::Primitive(base),
        }
    }

    pub(crate) fn array(descriptor: &str, element: TypeNodeRef) -> Self {
        Self {
            name: Arc::from(descriptor),
            kind: NodeKind::Array { element },
        }
    }

    pub(crate) fn class(
        name: &str,
        super_name: Option<String>,
        interface_names: Vec<String>,
        is_interface: bool,
    ) -> Self {
        Self {
            name: Arc::from(name),
            kind: NodeKind::Class(ClassEdges::new(is_interface, super_name, interface_names)),
        }
    }

    pub(crate) fn special_interface(name: &str, interface_names: Vec<String>) -> Self {
        Self {
            name: Arc::from(name),
            kind: NodeKind::SpecialInterface(ClassEdges::new(true, None, interface_names)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> Arc<str> {
        self.name.clone()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_interface(&self) -> bool {
        match &self.kind {
            NodeKind::Class(edges) => edges.is_interface,
            NodeKind::SpecialInterface(_) => true,
            NodeKind::ObjectRoot | NodeKind::Primitive(_) | NodeKind::Array { .. } => false,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, NodeKind::Primitive(_))
    }

    pub fn element(&self) -> Option<&TypeNodeRef> {
        match &self.kind {
            NodeKind::Array { element } => Some(element),
            _ => None,
        }
    }

    /// The element of an array of references (objects or nested arrays).
    pub(crate) fn reference_element(&self) -> Option<&TypeNodeRef> {
        self.element().filter(|element| !element.is_primitive())
    }

    /// Whether the super class edge has been resolved (or never needed resolving).
    pub fn is_superclass_resolved(&self) -> bool {
        match &self.kind {
            NodeKind::Class(edges) | NodeKind::SpecialInterface(edges) => {
                matches!(edges.state.lock().superclass, Edge::Resolved(_))
            }
            _ => true,
        }
    }

    pub fn are_interfaces_resolved(&self) -> bool {
        match &self.kind {
            NodeKind::Class(edges) | NodeKind::SpecialInterface(edges) => {
                matches!(edges.state.lock().interfaces, Edge::Resolved(_))
            }
            _ => true,
        }
    }

    pub fn superclass(&self, hierarchy: &ClassHierarchy) -> Result<Option<TypeNodeRef>> {
        match &self.kind {
            NodeKind::ObjectRoot | NodeKind::Primitive(_) => Ok(None),
            NodeKind::Array { .. } => Ok(Some(hierarchy.object_root())),
            NodeKind::Class(edges) | NodeKind::SpecialInterface(edges) => {
                edges.superclass(&self.name, hierarchy)
            }
        }
    }

    pub fn interfaces(&self, hierarchy: &ClassHierarchy) -> Result<Arc<[TypeNodeRef]>> {
        match &self.kind {
            NodeKind::ObjectRoot | NodeKind::Primitive(_) | NodeKind::Array { .. } => {
                Ok(NO_INTERFACES.clone())
            }
            NodeKind::Class(edges) | NodeKind::SpecialInterface(edges) => {
                edges.interfaces(&self.name, hierarchy)
            }
        }
    }

    /// Whether `self` is `base` or extends/implements it, transitively.
    ///
    /// Unresolved edge names are compared before anything is resolved, so a
    /// direct subclass is recognized without reading `base`'s ancestors.
    /// Fails with [`HierarchyError::Cyclic`] when a type turns out to be its
    /// own ancestor.
    pub fn is_subclass_of(&self, base: &TypeNode, hierarchy: &ClassHierarchy) -> Result<bool> {
        self.reaches(base, hierarchy, &mut HashSet::new())
    }

    fn reaches(
        &self,
        base: &TypeNode,
        hierarchy: &ClassHierarchy,
        path: &mut HashSet<Arc<str>>,
    ) -> Result<bool> {
        if self.name == base.name {
            return Ok(true);
        }

        let edges = match &self.kind {
            NodeKind::ObjectRoot | NodeKind::Primitive(_) => return Ok(false),
            NodeKind::Array { element } => {
                return match &base.kind {
                    NodeKind::ObjectRoot => Ok(true),
                    NodeKind::Array {
                        element: base_element,
                    } => element.reaches(base_element, hierarchy, path),
                    _ => Ok(false),
                };
            }
            NodeKind::Class(edges) | NodeKind::SpecialInterface(edges) => edges,
        };

        if edges.names_reach(base) {
            return Ok(true);
        }

        if !path.insert(self.name.clone()) {
            return Err(HierarchyError::cyclic(self.name()));
        }
        let found = self.ancestors_reach(base, hierarchy, path)?;
        path.remove(&self.name);
        Ok(found)
    }

    fn ancestors_reach(
        &self,
        base: &TypeNode,
        hierarchy: &ClassHierarchy,
        path: &mut HashSet<Arc<str>>,
    ) -> Result<bool> {
        if let Some(superclass) = self.superclass(hierarchy)? {
            if superclass.reaches(base, hierarchy, path)? {
                return Ok(true);
            }
        }

        if base.is_interface() {
            for interface in self.interfaces(hierarchy)?.iter().rev() {
                if interface.reaches(base, hierarchy, path)? {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }
}

impl PartialEq for TypeNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeNode {}

impl std::hash::Hash for TypeNode {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            NodeKind::ObjectRoot => "object",
            NodeKind::Primitive(_) => "primitive",
            NodeKind::Array { .. } => "array",
            NodeKind::Class(edges) if edges.is_interface => "interface",
            NodeKind::Class(_) => "class",
            NodeKind::SpecialInterface(_) => "special-interface",
        };
        f.debug_struct("TypeNode")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}
