pub type Result<T> = std::result::Result<T, HierarchyError>;

/// Opaque transport error surfaced by a [`crate::MetadataReader`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures of a single hierarchy query.
///
/// None of these are retried internally and none are ever memoized, so the
/// same query can succeed later once the type becomes readable.
#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    #[error("type {name} not found")]
    NotFound { name: String },

    #[error("malformed type descriptor {descriptor:?}: {reason}")]
    MalformedDescriptor {
        descriptor: String,
        reason: &'static str,
    },

    #[error("type {name} is its own ancestor")]
    Cyclic { name: String },

    #[error("failed to read metadata for {name}: {source}")]
    ReaderIo {
        name: String,
        #[source]
        source: BoxError,
    },
}

impl HierarchyError {
    pub fn not_found(name: impl Into<String>) -> Self {
        HierarchyError::NotFound { name: name.into() }
    }

    pub fn reader_io(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
        HierarchyError::ReaderIo {
            name: name.into(),
            source: source.into(),
        }
    }

    pub(crate) fn cyclic(name: impl Into<String>) -> Self {
        HierarchyError::Cyclic { name: name.into() }
    }

    pub(crate) fn malformed(descriptor: impl Into<String>, reason: &'static str) -> Self {
        HierarchyError::MalformedDescriptor {
            descriptor: descriptor.into(),
            reason,
        }
    }

    /// The type name or descriptor the failure is about.
    pub fn type_name(&self) -> &str {
        match self {
            HierarchyError::NotFound { name }
            | HierarchyError::Cyclic { name }
            | HierarchyError::ReaderIo { name, .. } => name,
            HierarchyError::MalformedDescriptor { descriptor, .. } => descriptor,
        }
    }
}
