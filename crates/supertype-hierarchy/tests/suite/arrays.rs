use pretty_assertions::assert_eq;

use super::support::{hierarchy, jdk_collections};

const OBJECT: &str = "java/lang/Object";

#[test]
fn arrays_of_references_meet_at_array_of_common_element() {
    let hierarchy = hierarchy(jdk_collections());
    assert_eq!(
        hierarchy
            .common_super_class("[Ljava/util/LinkedList;", "[Ljava/util/HashSet;")
            .unwrap(),
        "[Ljava/util/AbstractCollection;"
    );
    assert_eq!(
        hierarchy
            .common_super_class("[Ljava/util/ArrayList;", "[Ljava/util/List;")
            .unwrap(),
        "[Ljava/util/List;"
    );
}

#[test]
fn nested_arrays() {
    let hierarchy = hierarchy(jdk_collections());
    assert_eq!(
        hierarchy.common_super_class("[[I", "[[J").unwrap(),
        "[Ljava/lang/Object;"
    );
    assert_eq!(
        hierarchy
            .common_super_class("[[Ljava/lang/Integer;", "[Ljava/lang/Object;")
            .unwrap(),
        "[Ljava/lang/Object;"
    );
    assert_eq!(
        hierarchy
            .common_super_class("[[Ljava/lang/Integer;", "[[Ljava/lang/Long;")
            .unwrap(),
        "[[Ljava/lang/Number;"
    );
}

#[test]
fn primitive_arrays_only_match_themselves() {
    let hierarchy = hierarchy(jdk_collections());
    assert_eq!(hierarchy.common_super_class("[I", "[I").unwrap(), "[I");
    assert_eq!(hierarchy.common_super_class("[I", "[J").unwrap(), OBJECT);
    assert_eq!(
        hierarchy
            .common_super_class("[I", "[Ljava/lang/Object;")
            .unwrap(),
        OBJECT
    );
}

#[test]
fn array_against_non_array_is_object() {
    let hierarchy = hierarchy(jdk_collections());
    assert_eq!(
        hierarchy
            .common_super_class("[Ljava/lang/String;", "java/util/List")
            .unwrap(),
        OBJECT
    );
    assert_eq!(
        hierarchy
            .common_super_class("java/lang/String", "[Ljava/lang/String;")
            .unwrap(),
        OBJECT
    );
    assert_eq!(
        hierarchy
            .common_super_class("[Ljava/lang/String;", OBJECT)
            .unwrap(),
        OBJECT
    );
}

#[test]
fn array_nodes_wrap_their_element() {
    let hierarchy = hierarchy(jdk_collections());
    let node = hierarchy.type_node("[Ljava/util/List;").unwrap();
    let element = node.element().unwrap();
    assert_eq!(element.name(), "java/util/List");

    let superclass = node.superclass(&hierarchy).unwrap().unwrap();
    assert_eq!(superclass.name(), OBJECT);
    assert!(node.interfaces(&hierarchy).unwrap().is_empty());
}
