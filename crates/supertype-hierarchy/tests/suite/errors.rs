use std::error::Error as _;
use std::sync::Arc;

use supertype_hierarchy::{
    ClassHierarchy, HierarchyConfig, HierarchyError, MetadataMap, MetadataReader, NodeKind,
    Result, TypeMetadata,
};

use super::support::jdk_collections;

#[test]
fn unknown_type_fails_without_polluting_caches() {
    let types = Arc::new(jdk_collections());
    let hierarchy = ClassHierarchy::new(types.clone());

    let err = hierarchy
        .common_super_class("sample/Missing", "java/util/List")
        .unwrap_err();
    assert!(matches!(err, HierarchyError::NotFound { .. }), "{err}");
    assert_eq!(err.type_name(), "sample/Missing");
    assert!(hierarchy.caches().lookups().is_empty());
    assert!(hierarchy.caches().nodes().cached("sample/Missing").is_none());

    types.insert(TypeMetadata::class(
        "sample/Missing",
        "java/lang/Object",
        &["java/util/List"],
    ));
    assert_eq!(
        hierarchy
            .common_super_class("sample/Missing", "java/util/List")
            .unwrap(),
        "java/util/List"
    );
}

#[test]
fn missing_superclass_leaves_the_edge_pending() {
    let types = Arc::new(jdk_collections());
    types.insert(TypeMetadata::class("sample/Orphan", "sample/Gone", &[]));
    let hierarchy = ClassHierarchy::new(types.clone());

    let err = hierarchy
        .common_super_class("sample/Orphan", "java/util/List")
        .unwrap_err();
    assert_eq!(err.type_name(), "sample/Gone");

    let orphan = hierarchy.type_node("sample/Orphan").unwrap();
    assert!(!orphan.is_superclass_resolved());

    types.insert(TypeMetadata::class("sample/Gone", "java/lang/Object", &[]));
    assert_eq!(
        hierarchy
            .common_super_class("sample/Orphan", "java/util/List")
            .unwrap(),
        "java/lang/Object"
    );
    assert!(orphan.is_superclass_resolved());
}

#[test]
fn malformed_descriptors_name_the_offending_input() {
    let hierarchy = ClassHierarchy::new(Arc::new(MetadataMap::new()));
    for descriptor in ["[Q", "[", "[Ljava/lang/String", ""] {
        let err = hierarchy.common_super_class(descriptor, "I").unwrap_err();
        assert!(
            matches!(err, HierarchyError::MalformedDescriptor { .. }),
            "{descriptor:?}: {err}"
        );
        assert_eq!(err.type_name(), descriptor);
    }
}

struct BrokenReader;

impl MetadataReader for BrokenReader {
    fn has_type(&self, _name: &str) -> bool {
        true
    }

    fn read_metadata(&self, name: &str) -> Result<TypeMetadata> {
        Err(HierarchyError::reader_io(
            name,
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied"),
        ))
    }
}

#[test]
fn reader_failures_surface_with_their_source() {
    let hierarchy = ClassHierarchy::new(Arc::new(BrokenReader));
    let err = hierarchy
        .common_super_class("sample/A", "sample/B")
        .unwrap_err();

    assert!(matches!(err, HierarchyError::ReaderIo { .. }));
    assert_eq!(err.type_name(), "sample/A");
    assert!(err.to_string().contains("access denied"));
    assert!(err.source().is_some());
}

#[test]
fn cyclic_superclasses_fail_the_query() {
    let types = MetadataMap::new();
    types.insert(TypeMetadata::class("a/A", "a/B", &[]));
    types.insert(TypeMetadata::class("a/B", "a/A", &[]));
    types.insert(TypeMetadata::class("c/C", "java/lang/Object", &[]));
    let hierarchy = ClassHierarchy::new(Arc::new(types));

    let err = hierarchy.common_super_class("a/A", "c/C").unwrap_err();
    assert!(matches!(err, HierarchyError::Cyclic { .. }), "{err}");
    assert_eq!(err.type_name(), "a/A");
    assert!(hierarchy.caches().lookups().is_empty());
}

#[test]
fn cyclic_interfaces_fail_the_query() {
    let types = MetadataMap::new();
    types.insert(TypeMetadata::interface("a/I", &["a/J"]));
    types.insert(TypeMetadata::interface("a/J", &["a/I"]));
    types.insert(TypeMetadata::class("a/Impl", "java/lang/Object", &["a/I"]));
    types.insert(TypeMetadata::class("c/C", "java/lang/Object", &[]));
    let hierarchy = ClassHierarchy::new(Arc::new(types));

    let err = hierarchy.common_super_class("a/Impl", "c/C").unwrap_err();
    assert!(matches!(err, HierarchyError::Cyclic { ref name } if name == "a/I"), "{err}");
}

#[test]
fn configured_specials_cannot_replace_the_root() {
    let config = HierarchyConfig::from_toml_str(
        r#"
        [[special_interfaces]]
        name = "java/lang/Object"
        interfaces = ["a/M"]

        [[special_interfaces]]
        name = "a/M"
        interfaces = []
        "#,
    )
    .unwrap();
    let types = MetadataMap::new();
    types.insert(TypeMetadata::class("a/A", "java/lang/Object", &[]));
    types.insert(TypeMetadata::class("b/B", "java/lang/Object", &[]));
    let hierarchy = ClassHierarchy::with_config(Arc::new(types), &config);

    let object = hierarchy.type_node("java/lang/Object").unwrap();
    assert!(Arc::ptr_eq(&object, &hierarchy.object_root()));
    assert!(matches!(object.kind(), NodeKind::ObjectRoot));
    assert_eq!(
        hierarchy.common_super_class("a/A", "b/B").unwrap(),
        "java/lang/Object"
    );
}
