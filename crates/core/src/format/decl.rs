//! Class, member and unit-level declarations.

use super::Formatter;
use crate::error::Result;
use crate::model::{ClassKind, CodeModel, DefinedClass, EnumConstant, Field, Initializer, Method, Param};

impl Formatter<'_> {
    /// `package` statement and imports.
    pub(super) fn unit_header(&mut self, package: &str) {
        if !package.is_empty() {
            self.p("package ");
            self.p(package);
            self.p(";");
            self.nl();
            self.nl();
        }
        if !self.config.emit_imports {
            return;
        }
        let imports: Vec<String> = self.plan.imports().map(str::to_string).collect();
        for import in &imports {
            self.p("import ");
            self.p(import);
            self.p(";");
            self.nl();
        }
        if !imports.is_empty() {
            self.nl();
        }
    }

    pub(super) fn javadoc(&mut self, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        self.p("/**");
        self.nl();
        for line in lines.iter().flat_map(|l| l.split('\n')) {
            self.p(" *");
            if !line.is_empty() {
                self.p(" ");
                self.p(&line.replace("*/", "*&#47;"));
            }
            self.nl();
        }
        self.p(" */");
        self.nl();
    }

    fn annotations_on_lines(&mut self, annotations: &[crate::model::AnnotationUse]) {
        for annotation in annotations {
            self.annotation(annotation);
            self.nl();
        }
    }

    /// A class with its members and nested classes, ending with a newline.
    pub(super) fn declaration(&mut self, model: &CodeModel, class: &DefinedClass) -> Result<()> {
        self.javadoc(class.javadoc_lines());
        self.annotations_on_lines(class.annotations());
        self.mods(class.mods());
        self.p(class.kind().keyword());
        self.p(" ");
        self.p(class.name());
        self.type_params(class.type_params());
        if let Some(superclass) = class.superclass() {
            self.p(" extends ");
            self.ty(superclass);
        }
        if !class.interfaces().is_empty() {
            self.p(if class.kind() == ClassKind::Interface {
                " extends "
            } else {
                " implements "
            });
            self.comma_list(class.interfaces(), ", ", |f, ty| f.ty(ty));
        }
        self.p(" {");
        self.nl();
        self.indent();
        let members = class
            .nested()
            .iter()
            .map(|id| model.class(*id).map(|c| c.name().to_string()))
            .collect::<Result<Vec<_>>>()?;
        self.enclosing.push(members);
        self.class_body(model, class)?;
        self.enclosing.pop();
        self.outdent();
        self.p("}");
        self.nl();
        Ok(())
    }

    fn class_body(&mut self, model: &CodeModel, class: &DefinedClass) -> Result<()> {
        let mut first = true;
        let mut separate = |f: &mut Self| {
            if !std::mem::take(&mut first) {
                f.nl();
            }
        };

        let has_members = class.fields().next().is_some()
            || !class.initializers().is_empty()
            || !class.constructors().is_empty()
            || !class.methods().is_empty()
            || !class.nested().is_empty();
        if !class.enum_constants().is_empty() {
            separate(self);
            self.enum_constants(class.enum_constants(), has_members);
        } else if class.kind() == ClassKind::Enum && has_members {
            separate(self);
            self.p(";");
            self.nl();
        }

        if class.fields().next().is_some() {
            separate(self);
            for field in class.fields() {
                self.field(field);
            }
        }
        for initializer in class.initializers() {
            separate(self);
            self.initializer(initializer);
        }
        for constructor in class.constructors() {
            separate(self);
            self.method(constructor);
        }
        for method in class.methods() {
            separate(self);
            self.method(method);
        }
        for id in class.nested() {
            separate(self);
            let nested = model.class(*id)?;
            self.declaration(model, nested)?;
        }
        Ok(())
    }

    fn enum_constants(&mut self, constants: &[EnumConstant], has_members: bool) {
        for (index, constant) in constants.iter().enumerate() {
            self.javadoc(constant.javadoc_lines());
            self.annotations_on_lines(constant.annotations());
            self.p(constant.name());
            if !constant.args().is_empty() {
                self.p("(");
                self.comma_list(constant.args(), ", ", |f, arg| f.expr(arg));
                self.p(")");
            }
            if index + 1 < constants.len() {
                self.p(",");
            } else if has_members {
                self.p(";");
            }
            self.nl();
        }
    }

    fn field(&mut self, field: &Field) {
        self.javadoc(field.javadoc_lines());
        self.annotations_on_lines(field.annotations());
        self.mods(field.mods());
        self.ty(field.ty());
        self.p(" ");
        self.p(field.name());
        if let Some(init) = field.initializer() {
            self.p(" = ");
            self.expr(init);
        }
        self.p(";");
        self.nl();
    }

    fn initializer(&mut self, initializer: &Initializer) {
        if initializer.is_static {
            self.p("static ");
        }
        self.block(&initializer.body);
        self.nl();
    }

    fn method(&mut self, method: &Method) {
        self.javadoc(method.javadoc_lines());
        self.annotations_on_lines(method.annotations());
        self.mods(method.mods());
        if !method.type_params().is_empty() {
            self.type_params(method.type_params());
            self.p(" ");
        }
        if let Some(return_type) = method.return_type() {
            self.ty(return_type);
            self.p(" ");
        }
        self.p(method.name());
        self.p("(");
        self.comma_list(method.params(), ", ", |f, param| f.param(param, false));
        if let Some(varargs) = method.varargs_param() {
            if !method.params().is_empty() {
                self.p(", ");
            }
            self.param(varargs, true);
        }
        self.p(")");
        if let Some(default) = method.default_value() {
            self.p(" default ");
            self.annotation_value(default);
        }
        if !method.throws_list().is_empty() {
            self.p(" throws ");
            self.comma_list(method.throws_list(), ", ", |f, ty| f.ty(ty));
        }
        match method.body_block() {
            Some(body) => {
                self.p(" ");
                self.block(body);
            }
            None => self.p(";"),
        }
        self.nl();
    }

    fn param(&mut self, param: &Param, varargs: bool) {
        for annotation in param.annotations() {
            self.annotation(annotation);
            self.p(" ");
        }
        self.mods(param.mods());
        self.ty(param.ty());
        self.p(if varargs { "... " } else { " " });
        self.p(param.name());
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RenderConfig;
    use crate::format::render_unit;
    use crate::model::{
        AnnotationUse, ClassKind, CodeModel, Expr, Field, Method, Modifiers, TypeRef,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_class_with_members() {
        let mut model = CodeModel::new();
        let list = model.ref_type("java.util.List").unwrap();
        let string = model.ref_type("java.lang.String").unwrap();
        let id = model
            .define_class(Modifiers::PUBLIC, "org.example.Greeter", ClassKind::Class)
            .unwrap();
        let class = model.class_mut(id).unwrap();
        class.javadoc("Says hello.");
        let names = class
            .add_field(
                Field::new(
                    Modifiers::PRIVATE | Modifiers::FINAL,
                    list.narrow([string.clone()]).unwrap(),
                    "names",
                )
                .unwrap(),
            )
            .unwrap();

        let mut ctor = Method::constructor(Modifiers::PUBLIC).unwrap();
        let arg = ctor
            .param(Modifiers::empty(), list.narrow([string.clone()]).unwrap(), "names")
            .unwrap();
        ctor.body()
            .add(Expr::this().field("names").unwrap().assign(arg.expr()));
        class.add_constructor(ctor).unwrap();

        let mut greet = Method::new(Modifiers::PUBLIC, string.clone(), "greet").unwrap();
        greet
            .body()
            .ret(Expr::from("hello ").plus(names.expr().invoke("get").unwrap().arg(0)));
        class.add_method(greet).unwrap();

        let text = render_unit(&model, id, &RenderConfig::default()).unwrap();
        assert_eq!(
            text,
            "package org.example;

import java.util.List;

/**
 * Says hello.
 */
public class Greeter {
    private final List<String> names;

    public Greeter(List<String> names) {
        this.names = names;
    }

    public String greet() {
        return \"hello \" + names.get(0);
    }
}
"
        );
    }

    #[test]
    fn test_enum_and_annotation_type() {
        let mut model = CodeModel::new();
        let color = model
            .define_class(Modifiers::PUBLIC, "demo.Color", ClassKind::Enum)
            .unwrap();
        let class = model.class_mut(color).unwrap();
        class.enum_constant("RED").unwrap().arg(1);
        class.enum_constant("GREEN").unwrap().arg(2);
        class
            .add_field(Field::new(Modifiers::PRIVATE | Modifiers::FINAL, TypeRef::int(), "code").unwrap())
            .unwrap();
        let text = render_unit(&model, color, &RenderConfig::default()).unwrap();
        assert_eq!(
            text,
            "package demo;

public enum Color {
    RED(1),
    GREEN(2);

    private final int code;
}
"
        );

        let marker = model
            .define_class(Modifiers::PUBLIC, "demo.Marker", ClassKind::Annotation)
            .unwrap();
        let deprecated = AnnotationUse::new(model.ref_class("java.lang.Deprecated").unwrap());
        let string = model.ref_type("java.lang.String").unwrap();
        let class = model.class_mut(marker).unwrap();
        class.annotate(deprecated);
        class
            .add_method(Method::new(Modifiers::empty(), string, "value").unwrap())
            .unwrap()
            .declare_default("");
        let text = render_unit(&model, marker, &RenderConfig::default()).unwrap();
        assert_eq!(
            text,
            "package demo;

@Deprecated
public @interface Marker {
    String value() default \"\";
}
"
        );
    }

    #[test]
    fn test_imports_disabled_writes_full_names() {
        let mut model = CodeModel::new();
        let map = model.ref_type("java.util.Map").unwrap();
        let id = model
            .define_class(Modifiers::empty(), "demo.Holder", ClassKind::Interface)
            .unwrap();
        model
            .class_mut(id)
            .unwrap()
            .add_method(Method::new(Modifiers::empty(), map, "get").unwrap())
            .unwrap();
        let config = RenderConfig {
            emit_imports: false,
            ..RenderConfig::default()
        };
        let text = render_unit(&model, id, &config).unwrap();
        assert_eq!(
            text,
            "package demo;

interface Holder {
    java.util.Map get();
}
"
        );
    }

    #[test]
    fn test_javadoc_cannot_close_the_comment() {
        let mut model = CodeModel::new();
        let id = model
            .define_class(Modifiers::PUBLIC, "demo.Note", ClassKind::Class)
            .unwrap();
        model
            .class_mut(id)
            .unwrap()
            .javadoc("Ends with */ in the middle.");
        let text = render_unit(&model, id, &RenderConfig::default()).unwrap();
        assert_eq!(
            text,
            "package demo;

/**
 * Ends with *&#47; in the middle.
 */
public class Note {
}
"
        );
    }
}
