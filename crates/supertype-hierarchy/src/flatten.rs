use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{HierarchyError, Result};
use crate::hierarchy::ClassHierarchy;
use crate::node::{NodeKind, TypeNode, TypeNodeRef};

/// An interface reached while flattening, with its ranking keys.
#[derive(Debug)]
struct InterfaceEntry {
    node: TypeNodeRef,
    /// How many interface edges lead into this interface, transitively.
    strength: u32,
    /// Recursion depth of the first visit, relative to the flattened node.
    depth: u32,
}

/// Strongest first, then shallowest, then by name.
impl Ord for InterfaceEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .strength
            .cmp(&self.strength)
            .then_with(|| self.depth.cmp(&other.depth))
            .then_with(|| self.node.name().cmp(other.node.name()))
    }
}

impl PartialOrd for InterfaceEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for InterfaceEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for InterfaceEntry {}

#[derive(Default)]
struct Flattening {
    interfaces: Vec<InterfaceEntry>,
    visited: HashSet<Arc<str>>,
    /// Types on the current walk, from the flattened node down.
    path: HashSet<Arc<str>>,
}

impl TypeNode {
    /// Every ancestor of this node, most specific first: the class chain
    /// (closest first), then the ranked interfaces, then `java/lang/Object`.
    ///
    /// The root may appear twice; consumers take the first match.
    pub fn flatten_hierarchy(
        self: &Arc<Self>,
        hierarchy: &ClassHierarchy,
    ) -> Result<Vec<TypeNodeRef>> {
        match self.kind() {
            NodeKind::ObjectRoot | NodeKind::Primitive(_) => return Ok(vec![self.clone()]),
            NodeKind::Array { .. } => return Ok(vec![self.clone(), hierarchy.object_root()]),
            NodeKind::Class(_) | NodeKind::SpecialInterface(_) => {}
        }

        let mut classes = Vec::new();
        let mut flattening = Flattening::default();
        self.collect_ancestors(Some(&mut classes), &mut flattening, 0, hierarchy)?;
        flattening.interfaces.sort();

        let mut result = Vec::with_capacity(classes.len() + flattening.interfaces.len() + 1);
        result.extend(classes);
        result.extend(flattening.interfaces.into_iter().map(|entry| entry.node));
        result.push(hierarchy.object_root());
        Ok(result)
    }

    /// Post-order walk: the super class first, then interfaces from last to
    /// first, then `self`. An interface is recorded at its first completed
    /// visit only. Returns the strength contributed to the caller.
    fn collect_ancestors(
        self: &Arc<Self>,
        classes: Option<&mut Vec<TypeNodeRef>>,
        flattening: &mut Flattening,
        depth: u32,
        hierarchy: &ClassHierarchy,
    ) -> Result<u32> {
        let strength = match self.kind() {
            NodeKind::ObjectRoot | NodeKind::Primitive(_) | NodeKind::Array { .. } => return Ok(0),
            NodeKind::SpecialInterface(_) => 0,
            NodeKind::Class(_) => u32::from(self.is_interface()),
        };

        if !flattening.path.insert(self.name_arc()) {
            return Err(HierarchyError::cyclic(self.name()));
        }
        let strength = self.collect_edges(classes, flattening, strength, depth, hierarchy)?;
        flattening.path.remove(self.name());
        Ok(strength)
    }

    fn collect_edges(
        self: &Arc<Self>,
        mut classes: Option<&mut Vec<TypeNodeRef>>,
        flattening: &mut Flattening,
        mut strength: u32,
        depth: u32,
        hierarchy: &ClassHierarchy,
    ) -> Result<u32> {
        let is_interface = self.is_interface();
        if !is_interface {
            if let Some(classes) = classes.as_deref_mut() {
                classes.push(self.clone());
            }
        }

        if let Some(superclass) = self.superclass(hierarchy)? {
            superclass.collect_ancestors(classes, flattening, depth + 1, hierarchy)?;
        }

        for interface in self.interfaces(hierarchy)?.iter().rev() {
            let contributed = interface.collect_ancestors(None, flattening, depth + 1, hierarchy)?;
            strength = strength.saturating_add(contributed);
        }

        if !is_interface {
            return Ok(0);
        }
        if flattening.visited.insert(self.name_arc()) {
            flattening.interfaces.push(InterfaceEntry {
                node: self.clone(),
                strength,
                depth,
            });
        }
        Ok(strength)
    }
}
