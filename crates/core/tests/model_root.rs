use codemodel_core::model::{ClassKind, ClassRef, CodeModel, Method, Modifiers, TypeRef, TypeVar};
use codemodel_core::CodeModelError;
use rayon::prelude::*;

#[test]
fn test_external_references_are_interned() {
    let model = CodeModel::new();
    let refs: Vec<ClassRef> = (0..64)
        .into_par_iter()
        .map(|_| model.ref_class("java.util.concurrent.ConcurrentMap").unwrap())
        .collect();
    assert!(refs.windows(2).all(|w| ClassRef::ptr_eq(&w[0], &w[1])));
}

#[test]
fn test_defined_class_wins_over_external_reference() {
    let mut model = CodeModel::new();
    let id = model
        .define_class(Modifiers::PUBLIC, "demo.Widget", ClassKind::Class)
        .unwrap();
    let by_name = model.ref_class("demo.Widget").unwrap();
    assert_eq!(by_name.defined_id(), Some(id));
    assert_eq!(model.class_by_name("demo.Widget"), Some(id));
}

#[test]
fn test_duplicate_definitions_are_rejected() {
    let mut model = CodeModel::unified();
    model
        .define_class(Modifiers::PUBLIC, "demo.Widget", ClassKind::Class)
        .unwrap();
    assert!(matches!(
        model.define_class(Modifiers::PUBLIC, "demo.Widget", ClassKind::Class),
        Err(CodeModelError::ClassAlreadyExists(_))
    ));
    assert!(matches!(
        model.define_class(Modifiers::PUBLIC, "demo.WIDGET", ClassKind::Class),
        Err(CodeModelError::ClassAlreadyExists(_))
    ));

    let existing = model
        .get_or_define_class(Modifiers::PUBLIC, "demo.Widget", ClassKind::Class)
        .unwrap();
    let removed = model.remove_class(existing).unwrap();
    assert_eq!(removed.full_name(), "demo.Widget");
    assert!(model.class_by_name("demo.Widget").is_none());
    assert!(
        model
            .define_class(Modifiers::PUBLIC, "demo.Widget", ClassKind::Interface)
            .is_ok()
    );
}

#[test]
fn test_invalid_names_and_modifiers() {
    let mut model = CodeModel::new();
    assert!(matches!(
        model.define_class(Modifiers::PUBLIC, "demo.class", ClassKind::Class),
        Err(CodeModelError::InvalidIdentifier(_)) | Err(CodeModelError::InvalidQualifiedName(_))
    ));
    assert!(matches!(
        model.define_class(Modifiers::PRIVATE, "demo.Hidden", ClassKind::Class),
        Err(CodeModelError::IllegalModifiers { .. })
    ));
    assert!(matches!(
        model.define_class(Modifiers::FINAL, "demo.Api", ClassKind::Interface),
        Err(CodeModelError::IllegalModifiers { .. })
    ));
}

#[test]
fn test_method_lookup_by_erased_signature() {
    let mut model = CodeModel::new();
    let list = model.ref_type("java.util.List").unwrap();
    let string = model.ref_type("java.lang.String").unwrap();
    let id = model
        .define_class(Modifiers::PUBLIC, "demo.Service", ClassKind::Class)
        .unwrap();
    let class = model.class_mut(id).unwrap();

    let mut accept = Method::new(Modifiers::PUBLIC, TypeRef::void(), "accept").unwrap();
    accept
        .param(Modifiers::empty(), list.narrow([string.clone()]).unwrap(), "items")
        .unwrap();
    class.add_method(accept).unwrap();

    let mut overload = Method::new(Modifiers::PUBLIC, TypeRef::void(), "accept").unwrap();
    overload
        .param(Modifiers::empty(), string.clone(), "item")
        .unwrap();
    class.add_method(overload).unwrap();

    let mut clash = Method::new(Modifiers::PUBLIC, TypeRef::int(), "accept").unwrap();
    clash
        .param(Modifiers::empty(), list.clone(), "raw")
        .unwrap();
    assert!(matches!(
        class.add_method(clash),
        Err(CodeModelError::DuplicateMember { .. })
    ));

    assert!(class.method("accept", &[list.clone()]).is_some());
    assert!(class.method("accept", &[string.clone()]).is_some());
    assert!(class.method("accept", &[TypeRef::int()]).is_none());
    assert!(class.method("accept", &[]).is_none());
    assert_eq!(class.methods_named("accept").count(), 2);
}

#[test]
fn test_substitution_keeps_wildcard_direction() {
    let model = CodeModel::new();
    let list = model.ref_type("java.util.List").unwrap();
    let integer = model.ref_type("java.lang.Integer").unwrap();
    let t = TypeVar::new("T").unwrap();

    let consumer = list.narrow([t.as_type().wildcard_super().unwrap()]).unwrap();
    let bound = consumer.substitute_params(&[t], &[integer]);
    assert_eq!(bound.full_name(), "java.util.List<? super java.lang.Integer>");
}

#[test]
fn test_resources_reject_duplicates() {
    use codemodel_core::model::ResourceFile;

    let mut model = CodeModel::unified();
    let package = model.package("demo").unwrap();
    package
        .add_resource(ResourceFile::text("config.json", "{}"))
        .unwrap();
    assert!(
        package
            .add_resource(ResourceFile::text("CONFIG.json", "{}"))
            .is_err()
    );
    assert!(
        package
            .add_resource(ResourceFile::binary("nul", vec![0u8]))
            .is_err()
    );
}
