use codemodel_core::format::{render_annotation, render_statement, render_unit};
use codemodel_core::model::{
    AnnotationUse, AnnotationValue, AssignOp, ClassKind, CodeModel, Expr, Field, ForEach, Method,
    Modifiers, Statement, Try, TypeRef,
};
use codemodel_core::{ModelWriter, RenderConfig};
use codemodel_writer::MemoryCodeWriter;
use pretty_assertions::assert_eq;

fn config() -> RenderConfig {
    RenderConfig::default()
}

#[test]
fn test_for_each_declares_a_final_variable() {
    let model = CodeModel::new();
    let string = model.ref_type("java.lang.String").unwrap();
    let mut each = ForEach::new(string, "s", Expr::name("names").unwrap()).unwrap();
    let s = each.var();
    each.body().add(
        Expr::name("total")
            .unwrap()
            .assign_op(AssignOp::Add, s.expr().invoke("length").unwrap()),
    );

    assert_eq!(
        render_statement(&Statement::ForEach(each), &config()),
        "for (final java.lang.String s : names) {\n    total += s.length();\n}\n"
    );
}

#[test]
fn test_try_with_resources_catch_and_finally() {
    let model = CodeModel::new();
    let reader = model.ref_type("java.io.Reader").unwrap();
    let writer = model.ref_type("java.io.Writer").unwrap();
    let io = model.ref_type("java.io.IOException").unwrap();
    let runtime = model.ref_type("java.lang.RuntimeException").unwrap();

    let mut attempt = Try::new();
    let r = attempt
        .resource(reader, "r", Expr::call("open").unwrap())
        .unwrap();
    let w = attempt
        .resource(writer, "w", Expr::call("create").unwrap())
        .unwrap();
    attempt
        .body()
        .add(Expr::call("copy").unwrap().arg(r.expr()).arg(w.expr()));
    let catch = attempt.catch(io, "e").unwrap();
    catch.or(runtime);
    let e = catch.param();
    catch.body().add(e.expr().invoke("printStackTrace").unwrap());
    attempt.finally().add(Expr::call("done").unwrap());

    assert_eq!(
        render_statement(&Statement::Try(attempt), &config()),
        "try(final java.io.Reader r = open();
final java.io.Writer w = create()) {
    copy(r, w);
} catch (java.io.IOException | java.lang.RuntimeException e) {
    e.printStackTrace();
} finally {
    done();
}
"
    );
}

#[test]
fn test_annotation_value_forms() {
    let model = CodeModel::new();
    let suppress = model.ref_class("java.lang.SuppressWarnings").unwrap();

    let single = AnnotationUse::new(suppress.clone()).value("unchecked");
    assert_eq!(
        render_annotation(&single, &config()),
        "@java.lang.SuppressWarnings(\"unchecked\")"
    );

    let wrapped = AnnotationUse::new(suppress.clone())
        .value(AnnotationValue::array(["unchecked", "rawtypes"]));
    assert_eq!(
        render_annotation(&wrapped, &config()),
        "@java.lang.SuppressWarnings({\n    \"unchecked\",\n    \"rawtypes\"\n})"
    );

    let inline = RenderConfig {
        array_wrap_threshold: 4,
        ..RenderConfig::default()
    };
    assert_eq!(
        render_annotation(&wrapped, &inline),
        "@java.lang.SuppressWarnings({\"unchecked\", \"rawtypes\"})"
    );

    let retention = model.ref_type("java.lang.annotation.RetentionPolicy").unwrap();
    let named = AnnotationUse::new(model.ref_class("com.acme.Mapping").unwrap())
        .param("path", "/items")
        .unwrap()
        .param("policy", Expr::static_field(retention, "RUNTIME").unwrap())
        .unwrap();
    assert_eq!(
        render_annotation(&named, &config()),
        "@com.acme.Mapping(path = \"/items\", policy = java.lang.annotation.RetentionPolicy.RUNTIME)"
    );
}

#[test]
fn test_colliding_simple_names_are_all_qualified() {
    let mut model = CodeModel::new();
    let util_list = model.ref_type("java.util.List").unwrap();
    let awt_list = model.ref_type("java.awt.List").unwrap();
    let id = model
        .define_class(Modifiers::PUBLIC, "demo.Lists", ClassKind::Class)
        .unwrap();
    let class = model.class_mut(id).unwrap();
    class
        .add_field(Field::new(Modifiers::PRIVATE, util_list, "items").unwrap())
        .unwrap();
    class
        .add_field(Field::new(Modifiers::PRIVATE, awt_list, "widget").unwrap())
        .unwrap();

    assert_eq!(
        render_unit(&model, id, &config()).unwrap(),
        "package demo;

public class Lists {
    private java.util.List items;
    private java.awt.List widget;
}
"
    );
}

#[test]
fn test_package_class_shadows_java_lang() {
    let mut model = CodeModel::new();
    model
        .define_class(Modifiers::PUBLIC, "demo.Object", ClassKind::Class)
        .unwrap();
    let object = TypeRef::object();
    let id = model
        .define_class(Modifiers::PUBLIC, "demo.Holder", ClassKind::Class)
        .unwrap();
    model
        .class_mut(id)
        .unwrap()
        .add_field(Field::new(Modifiers::PRIVATE, object, "value").unwrap())
        .unwrap();

    let text = render_unit(&model, id, &config()).unwrap();
    assert!(text.contains("    private java.lang.Object value;\n"), "{text}");
}

#[test]
fn test_type_variable_shadows_import() {
    let mut model = CodeModel::new();
    let other_t = model.ref_type("com.other.T").unwrap();
    let id = model
        .define_class(Modifiers::PUBLIC, "demo.Box", ClassKind::Class)
        .unwrap();
    let class = model.class_mut(id).unwrap();
    let t = class.generify("T").unwrap();
    class
        .add_field(Field::new(Modifiers::PRIVATE, t.as_type(), "value").unwrap())
        .unwrap();
    class
        .add_field(Field::new(Modifiers::PRIVATE, other_t, "other").unwrap())
        .unwrap();

    assert_eq!(
        render_unit(&model, id, &config()).unwrap(),
        "package demo;

public class Box<T> {
    private T value;
    private com.other.T other;
}
"
    );
}

#[test]
fn test_nested_class_of_another_unit_imports_its_outer_class() {
    let mut model = CodeModel::new();
    let entry = model
        .ref_class("java.util.Map")
        .unwrap()
        .nested("Entry")
        .unwrap();
    let string = model.ref_type("java.lang.String").unwrap();
    let entry_type = TypeRef::class(entry)
        .narrow([string.clone(), string])
        .unwrap();
    let id = model
        .define_class(Modifiers::empty(), "demo.Pairs", ClassKind::Interface)
        .unwrap();
    model
        .class_mut(id)
        .unwrap()
        .add_method(Method::new(Modifiers::empty(), entry_type, "first").unwrap())
        .unwrap();

    assert_eq!(
        render_unit(&model, id, &config()).unwrap(),
        "package demo;

import java.util.Map;

interface Pairs {
    Map.Entry<String, String> first();
}
"
    );
}

#[test]
fn test_dont_import_keeps_full_name() {
    let mut model = CodeModel::new();
    model.dont_import("java.util.Date").unwrap();
    let date = model.ref_type("java.util.Date").unwrap();
    let list = model.ref_type("java.util.List").unwrap();
    let id = model
        .define_class(Modifiers::PUBLIC, "demo.Event", ClassKind::Class)
        .unwrap();
    let class = model.class_mut(id).unwrap();
    class
        .add_field(Field::new(Modifiers::PRIVATE, date, "at").unwrap())
        .unwrap();
    class
        .add_field(Field::new(Modifiers::PRIVATE, list, "tags").unwrap())
        .unwrap();

    assert_eq!(
        render_unit(&model, id, &config()).unwrap(),
        "package demo;

import java.util.List;

public class Event {
    private java.util.Date at;
    private List tags;
}
"
    );
}

#[test]
fn test_dont_import_covers_nested_classes() {
    let mut model = CodeModel::new();
    model.dont_import("java.util.Map.Entry").unwrap();
    let map = model.ref_type("java.util.Map").unwrap();
    let entry = TypeRef::class(
        model
            .ref_class("java.util.Map")
            .unwrap()
            .nested("Entry")
            .unwrap(),
    );
    let id = model
        .define_class(Modifiers::PUBLIC, "demo.Pairs", ClassKind::Interface)
        .unwrap();
    let class = model.class_mut(id).unwrap();
    class
        .add_method(Method::new(Modifiers::empty(), entry, "first").unwrap())
        .unwrap();
    class
        .add_method(Method::new(Modifiers::empty(), map, "all").unwrap())
        .unwrap();

    assert_eq!(
        render_unit(&model, id, &config()).unwrap(),
        "package demo;

import java.util.Map;

public interface Pairs {
    java.util.Map.Entry first();

    Map all();
}
"
    );

    let mut outer_only = CodeModel::new();
    outer_only.dont_import("java.util.Map").unwrap();
    let entry_type = TypeRef::class(
        outer_only
            .ref_class("java.util.Map")
            .unwrap()
            .nested("Entry")
            .unwrap(),
    );
    let id = outer_only
        .define_class(Modifiers::PUBLIC, "demo.Pairs", ClassKind::Interface)
        .unwrap();
    outer_only
        .class_mut(id)
        .unwrap()
        .add_method(Method::new(Modifiers::empty(), entry_type, "first").unwrap())
        .unwrap();
    let text = render_unit(&outer_only, id, &config()).unwrap();
    assert!(!text.contains("import"), "{text}");
    assert!(text.contains("    java.util.Map.Entry first();\n"), "{text}");
}

#[test]
fn test_nested_classes_render_inside_their_unit() {
    let mut model = CodeModel::new();
    let outer = model
        .define_class(Modifiers::PUBLIC, "demo.Tree", ClassKind::Class)
        .unwrap();
    let node = model
        .define_nested(outer, Modifiers::STATIC, "Node", ClassKind::Class)
        .unwrap();
    let node_type = model.class(node).unwrap().as_type();
    model
        .class_mut(outer)
        .unwrap()
        .add_field(Field::new(Modifiers::PRIVATE, node_type.clone(), "root").unwrap())
        .unwrap();
    model
        .class_mut(node)
        .unwrap()
        .add_field(Field::new(Modifiers::empty(), node_type, "next").unwrap())
        .unwrap();

    assert_eq!(
        render_unit(&model, outer, &config()).unwrap(),
        "package demo;

public class Tree {
    private Node root;

    static class Node {
        Node next;
    }
}
"
    );
}

#[test]
fn test_inner_member_class_hides_outer_one() {
    let mut model = CodeModel::new();
    let tree = model
        .define_class(Modifiers::PUBLIC, "demo.Tree", ClassKind::Class)
        .unwrap();
    let outer_leaf = model
        .define_nested(tree, Modifiers::STATIC, "Leaf", ClassKind::Class)
        .unwrap();
    let node = model
        .define_nested(tree, Modifiers::STATIC, "Node", ClassKind::Class)
        .unwrap();
    let inner_leaf = model
        .define_nested(node, Modifiers::STATIC, "Leaf", ClassKind::Class)
        .unwrap();
    let outer_leaf_type = model.class(outer_leaf).unwrap().as_type();
    let inner_leaf_type = model.class(inner_leaf).unwrap().as_type();
    let class = model.class_mut(node).unwrap();
    class
        .add_field(Field::new(Modifiers::empty(), outer_leaf_type.clone(), "outerLeaf").unwrap())
        .unwrap();
    class
        .add_field(Field::new(Modifiers::empty(), inner_leaf_type, "innerLeaf").unwrap())
        .unwrap();
    model
        .class_mut(tree)
        .unwrap()
        .add_field(Field::new(Modifiers::PRIVATE, outer_leaf_type, "first").unwrap())
        .unwrap();

    assert_eq!(
        render_unit(&model, tree, &config()).unwrap(),
        "package demo;

public class Tree {
    private Leaf first;

    static class Leaf {
    }

    static class Node {
        Tree.Leaf outerLeaf;
        Leaf innerLeaf;

        static class Leaf {
        }
    }
}
"
    );
}

#[test]
fn test_rendering_is_deterministic() {
    let mut model = CodeModel::new();
    for name in ["Alpha", "Beta", "Gamma", "Delta"] {
        let id = model
            .define_class(Modifiers::PUBLIC, &format!("demo.{name}"), ClassKind::Class)
            .unwrap();
        for fqn in ["java.util.Set", "java.util.Map", "java.io.File", "java.util.List"] {
            let ty = model.ref_type(fqn).unwrap();
            let field = fqn.rsplit('.').next().unwrap().to_lowercase();
            model
                .class_mut(id)
                .unwrap()
                .add_field(Field::new(Modifiers::PRIVATE, ty, &field).unwrap())
                .unwrap();
        }
    }

    let build = || {
        let mut out = MemoryCodeWriter::new();
        ModelWriter::new(&model, config()).build(&mut out).unwrap();
        out.into_files()
    };
    let first = build();
    assert_eq!(first, build());
    let alpha = String::from_utf8(first["demo/Alpha.java"].clone()).unwrap();
    assert!(alpha.starts_with(
        "package demo;\n\nimport java.io.File;\nimport java.util.List;\nimport java.util.Map;\nimport java.util.Set;\n\n"
    ));
}

#[test]
fn test_emit_imports_off() {
    let mut model = CodeModel::new();
    let list = model.ref_type("java.util.List").unwrap();
    let id = model
        .define_class(Modifiers::PUBLIC, "demo.Plain", ClassKind::Class)
        .unwrap();
    model
        .class_mut(id)
        .unwrap()
        .add_field(Field::new(Modifiers::PRIVATE, list, "items").unwrap())
        .unwrap();
    let config = RenderConfig {
        emit_imports: false,
        ..RenderConfig::default()
    };
    assert_eq!(
        render_unit(&model, id, &config).unwrap(),
        "package demo;\n\npublic class Plain {\n    private java.util.List items;\n}\n"
    );
}

#[test]
fn test_for_each_method_body_end_to_end() {
    let mut model = CodeModel::new();
    let list = model.ref_type("java.util.List").unwrap();
    let array_list = model.ref_type("java.util.ArrayList").unwrap();
    let integer = model.ref_type("java.lang.Integer").unwrap();
    let system = model.ref_type("java.lang.System").unwrap();
    let id = model
        .define_class(Modifiers::PUBLIC, "org.example.TestForEach", ClassKind::Class)
        .unwrap();

    let mut method = Method::new(
        Modifiers::PUBLIC | Modifiers::STATIC,
        TypeRef::void(),
        "foo",
    )
    .unwrap();
    let body = method.body();
    let alist = body
        .decl(
            Modifiers::FINAL,
            list.narrow([integer.clone()]).unwrap(),
            "alist",
            Some(Expr::new_instance(array_list.narrow_empty().unwrap()).unwrap().into()),
        )
        .unwrap();
    body.add(alist.expr().invoke("add").unwrap().arg(1));
    body.add(alist.expr().invoke("add").unwrap().arg(2));
    let mut each = ForEach::new(integer, "count", alist.expr()).unwrap();
    let count = each.var();
    each.body().add(
        Expr::static_field(system, "out")
            .unwrap()
            .invoke("println")
            .unwrap()
            .arg(count.expr()),
    );
    body.add(each);

    let block = codemodel_core::format::render_block(method.body(), &config());
    assert_eq!(
        block,
        "{
    final java.util.List<java.lang.Integer> alist = new java.util.ArrayList<>();
    alist.add(1);
    alist.add(2);
    for (final java.lang.Integer count : alist) {
        java.lang.System.out.println(count);
    }
}
"
    );

    model.class_mut(id).unwrap().add_method(method).unwrap();
    let unit = render_unit(&model, id, &config()).unwrap();
    assert!(unit.starts_with(
        "package org.example;\n\nimport java.util.ArrayList;\nimport java.util.List;\n\n"
    ));
    assert!(unit.contains("        final List<Integer> alist = new ArrayList<>();\n"));
    assert!(unit.contains("            System.out.println(count);\n"));
}

#[test]
fn test_chained_resources_share_one_clause() {
    let model = CodeModel::new();
    let output = model.ref_type("java.io.OutputStream").unwrap();
    let file_output = model.ref_type("java.io.FileOutputStream").unwrap();
    let buffered = model.ref_type("java.io.BufferedOutputStream").unwrap();

    let mut attempt = Try::new();
    let os = attempt
        .resource(
            output,
            "os",
            Expr::new_instance(file_output).unwrap().arg("out.bin"),
        )
        .unwrap();
    let bos = attempt
        .resource(
            buffered.clone(),
            "bos",
            Expr::new_instance(buffered).unwrap().arg(os.expr()),
        )
        .unwrap();
    attempt.body().add(bos.expr().invoke("write").unwrap().arg(1));

    assert_eq!(
        render_statement(&Statement::Try(attempt), &config()),
        "try(final java.io.OutputStream os = new java.io.FileOutputStream(\"out.bin\");
final java.io.BufferedOutputStream bos = new java.io.BufferedOutputStream(os)) {
    bos.write(1);
}
"
    );
}
