use std::sync::Arc;

use supertype_hierarchy::{ClassHierarchy, HierarchyConfig, MetadataMap, TypeMetadata};

use super::support::{jdk_collections, CountingReader};

#[test]
fn lookups_of_the_same_name_share_one_node() {
    let hierarchy = ClassHierarchy::new(Arc::new(jdk_collections()));
    let first = hierarchy.type_node("java/util/LinkedList").unwrap();
    let second = hierarchy.type_node("java/util/LinkedList").unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    let list = hierarchy.type_node("java/util/List").unwrap();
    let via_edge = first
        .interfaces(&hierarchy)
        .unwrap()
        .iter()
        .find(|node| node.name() == "java/util/List")
        .cloned()
        .unwrap();
    assert!(Arc::ptr_eq(&list, &via_edge));
}

#[test]
fn pairwise_answers_are_memoized_in_either_order() {
    let reader = Arc::new(CountingReader::new(jdk_collections()));
    let hierarchy = ClassHierarchy::new(reader.clone());

    hierarchy
        .common_super_class("java/util/LinkedList", "java/util/HashSet")
        .unwrap();
    let reads = reader.total_reads();
    assert!(reads > 0);

    assert_eq!(
        hierarchy
            .common_super_class("java/util/HashSet", "java/util/LinkedList")
            .unwrap(),
        "java/util/AbstractCollection"
    );
    assert_eq!(reader.total_reads(), reads);
    assert_eq!(hierarchy.caches().lookups().len(), 1);
}

#[test]
fn shared_caches_serve_other_readers() {
    let full = ClassHierarchy::new(Arc::new(jdk_collections()));
    let answer = full
        .common_super_class("java/util/ArrayDeque", "java/util/LinkedList")
        .unwrap();
    assert_eq!(answer, "java/util/AbstractCollection");
    let deque = full.type_node("java/util/Deque").unwrap();

    let empty = full.share_with(Arc::new(MetadataMap::new()));
    assert!(Arc::ptr_eq(full.caches(), empty.caches()));
    assert_eq!(
        empty
            .common_super_class("java/util/LinkedList", "java/util/ArrayDeque")
            .unwrap(),
        answer
    );
    assert!(Arc::ptr_eq(&deque, &empty.type_node("java/util/Deque").unwrap()));
}

#[test]
fn sharing_with_the_same_reader_keeps_the_facade() {
    let hierarchy = ClassHierarchy::new(Arc::new(jdk_collections()));
    let shared = hierarchy.share_with(hierarchy.reader().clone());
    assert!(Arc::ptr_eq(hierarchy.reader(), shared.reader()));
    assert!(Arc::ptr_eq(hierarchy.caches(), shared.caches()));
}

#[test]
fn rebinding_recovers_from_a_missing_type() {
    let partial = ClassHierarchy::new(Arc::new(MetadataMap::new()));
    assert!(partial
        .common_super_class("java/util/LinkedList", "java/util/List")
        .is_err());

    let complete = partial.share_with(Arc::new(jdk_collections()));
    assert_eq!(
        complete
            .common_super_class("java/util/LinkedList", "java/util/List")
            .unwrap(),
        "java/util/List"
    );
}

#[test]
fn unretained_nodes_are_rebuilt_after_release() {
    let config = HierarchyConfig::from_toml_str("[cache]\nnode_capacity = 0\n").unwrap();
    let reader = Arc::new(CountingReader::new(jdk_collections()));
    let hierarchy = ClassHierarchy::with_config(reader.clone(), &config);

    let node = hierarchy.type_node("java/util/HashSet").unwrap();
    drop(node);
    hierarchy.type_node("java/util/HashSet").unwrap();
    assert_eq!(reader.reads_of("java/util/HashSet"), 2);
}

#[test]
fn retained_nodes_survive_without_outside_references() {
    let reader = Arc::new(CountingReader::new(jdk_collections()));
    let hierarchy = ClassHierarchy::new(reader.clone());

    drop(hierarchy.type_node("java/util/HashSet").unwrap());
    hierarchy.type_node("java/util/HashSet").unwrap();
    assert_eq!(reader.reads_of("java/util/HashSet"), 1);

    hierarchy.caches().nodes().release_retained();
    hierarchy.type_node("java/util/HashSet").unwrap();
    assert_eq!(reader.reads_of("java/util/HashSet"), 2);
}

#[test]
fn configured_marker_interfaces_are_demoted_and_never_read() {
    let types = Arc::new(CountingReader::new(MetadataMap::new()));
    types
        .inner()
        .insert(TypeMetadata::interface("sample/Marker", &[]));
    types
        .inner()
        .insert(TypeMetadata::interface("sample/Shape", &[]));
    for name in ["sample/Circle", "sample/Square"] {
        types.inner().insert(TypeMetadata::class(
            name,
            "java/lang/Object",
            &["sample/Marker", "sample/Shape"],
        ));
    }

    let plain = ClassHierarchy::new(types.clone());
    assert_eq!(
        plain
            .common_super_class("sample/Circle", "sample/Square")
            .unwrap(),
        "sample/Marker"
    );

    let config = HierarchyConfig::from_toml_str(
        r#"
        [[special_interfaces]]
        name = "sample/Marker"
        interfaces = []
        "#,
    )
    .unwrap();
    let reads_before = types.reads_of("sample/Marker");
    let configured = ClassHierarchy::with_config(types.clone(), &config);
    assert_eq!(
        configured
            .common_super_class("sample/Circle", "sample/Square")
            .unwrap(),
        "sample/Shape"
    );
    assert_eq!(types.reads_of("sample/Marker"), reads_before);
}
