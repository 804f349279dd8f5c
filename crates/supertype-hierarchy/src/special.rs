use supertype_classfile::BaseType;
use supertype_config::SpecialInterfaceConfig;

use crate::node::OBJECT;

/// Marker interfaces that tend to show up in otherwise unrelated hierarchies.
///
/// Without demotion, `Map` vs `Collection` implementations would meet at
/// `Serializable` or `Cloneable` instead of anything useful. Registered
/// interfaces are pinned in the node store, never read through the metadata
/// reader, and rank below every ordinary interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialInterfaceRegistry {
    entries: Vec<(String, Vec<String>)>,
}

impl SpecialInterfaceRegistry {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The JDK marker interfaces.
    pub fn jdk() -> Self {
        let mut registry = Self::empty();
        registry.register("java/io/Externalizable", ["java/io/Serializable"]);
        registry.register("java/io/Closeable", ["java/lang/AutoCloseable"]);
        registry.register("java/io/Serializable", [] as [&str; 0]);
        registry.register("java/lang/AutoCloseable", [] as [&str; 0]);
        registry.register("java/lang/Cloneable", [] as [&str; 0]);
        registry
    }

    /// The JDK set plus whatever the configuration adds. Entries naming the
    /// root or a primitive are skipped.
    pub fn from_config(extra: &[SpecialInterfaceConfig]) -> Self {
        let mut registry = Self::jdk();
        for special in extra {
            if is_builtin(&special.name) {
                tracing::warn!(
                    target = "supertype.hierarchy",
                    name = %special.name,
                    "ignoring special interface that names a built-in type"
                );
                continue;
            }
            registry.register(&special.name, special.interfaces.iter().map(String::as_str));
        }
        registry
    }

    /// Registers `name` with the interfaces it extends, replacing an earlier
    /// registration of the same name.
    pub fn register<'a>(&mut self, name: &str, interfaces: impl IntoIterator<Item = &'a str>) {
        let interfaces: Vec<String> = interfaces.into_iter().map(str::to_owned).collect();
        match self.entries.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, existing)) => *existing = interfaces,
            None => self.entries.push((name.to_owned(), interfaces)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, interfaces)| (name.as_str(), interfaces.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `java/lang/Object` or a primitive code.
pub(crate) fn is_builtin(name: &str) -> bool {
    if name == OBJECT {
        return true;
    }
    let mut chars = name.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(code), None) if BaseType::from_code(code).is_some()
    )
}

impl Default for SpecialInterfaceRegistry {
    fn default() -> Self {
        Self::jdk()
    }
}
