//! Types, expressions, statements and annotation uses.

use super::Formatter;
use super::literal::{char_literal, double_literal, float_literal, special_constant, string_literal};
use crate::model::{
    AnnotationUse, AnnotationValue, Block, Callee, ClassRef, Expr, ForInit, If, Invocation, Lambda,
    Literal, LocalVar, Modifiers, Statement, Try, TypeKind, TypeRef, TypeVar,
};

impl Formatter<'_> {
    pub(super) fn ty(&mut self, ty: &TypeRef) {
        match ty.kind() {
            TypeKind::Primitive(primitive) => self.p(primitive.keyword()),
            TypeKind::Class(class) => self.class(class),
            TypeKind::Parameterized { base, args } => {
                self.class(base);
                self.p("<");
                self.comma_list(args, ", ", |f, arg| f.ty(arg));
                self.p(">");
            }
            TypeKind::Array { element, dims } => {
                self.ty(element);
                for _ in 0..*dims {
                    self.p("[]");
                }
            }
            TypeKind::TypeVar(var) => self.p(var.name()),
            TypeKind::Wildcard { bound, mode } => {
                if ty.is_unbounded_wildcard() {
                    self.p("?");
                } else {
                    self.p(mode.tokens());
                    self.ty(bound);
                }
            }
        }
    }

    /// `<T extends A & B, U>`
    pub(super) fn type_params(&mut self, vars: &[TypeVar]) {
        if vars.is_empty() {
            return;
        }
        self.p("<");
        self.comma_list(vars, ", ", |f, var| {
            f.p(var.name());
            if !var.bounds().is_empty() {
                f.p(" extends ");
                f.comma_list(var.bounds(), " & ", |f, bound| f.ty(bound));
            }
        });
        self.p(">");
    }

    pub(super) fn mods(&mut self, mods: Modifiers) {
        for keyword in mods.keywords() {
            self.p(keyword);
            self.p(" ");
        }
    }

    fn literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Null => self.p("null"),
            Literal::Boolean(value) => self.p(if *value { "true" } else { "false" }),
            Literal::Int(value) => self.p(&value.to_string()),
            Literal::Long(value) => self.p(&format!("{value}L")),
            Literal::Float(value) => match special_constant(f64::from(*value)) {
                Some(constant) => self.wrapper_constant("Float", constant),
                None => self.p(&float_literal(*value)),
            },
            Literal::Double(value) => match special_constant(*value) {
                Some(constant) => self.wrapper_constant("Double", constant),
                None => self.p(&double_literal(*value)),
            },
            Literal::Char(value) => self.p(&char_literal(*value)),
            Literal::Str(value) => self.p(&string_literal(value)),
        }
    }

    fn wrapper_constant(&mut self, wrapper: &str, constant: &str) {
        self.class(&ClassRef::java_lang(wrapper));
        self.p(".");
        self.p(constant);
    }

    /// An expression in a position with its own delimiters.
    pub(super) fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(literal) => self.literal(literal),
            Expr::Name(name) => self.p(name),
            Expr::This => self.p("this"),
            Expr::Super => self.p("super"),
            Expr::Field { target, name } => {
                self.postfix_target(target);
                self.p(".");
                self.p(name);
            }
            Expr::StaticField { owner, name } => {
                self.ty(owner);
                self.p(".");
                self.p(name);
            }
            Expr::Invoke(invocation) => self.invocation(invocation),
            Expr::NewArray { element, dims, init } => {
                self.p("new ");
                self.ty(element);
                for dim in dims {
                    self.p("[");
                    self.expr(dim);
                    self.p("]");
                }
                if let Some(items) = init {
                    self.p("[] {");
                    self.comma_list(items, ", ", |f, item| f.expr(item));
                    self.p("}");
                }
            }
            Expr::Unary { op, operand } => {
                let wrap = operand.is_compound()
                    || matches!(**operand, Expr::Unary { .. })
                    || is_signed_literal(operand);
                if !op.is_postfix() {
                    self.p(op.token());
                }
                if wrap {
                    self.p("(");
                    self.expr(operand);
                    self.p(")");
                } else {
                    self.expr(operand);
                }
                if op.is_postfix() {
                    self.p(op.token());
                }
            }
            Expr::Binary { op, left, right } => {
                self.operand(left);
                self.p(" ");
                self.p(op.token());
                self.p(" ");
                self.operand(right);
            }
            Expr::Assign { op, target, value } => {
                self.operand(target);
                self.p(" ");
                self.p(op.token());
                self.p(" ");
                self.expr(value);
            }
            Expr::Cast { ty, expr } => {
                self.p("(");
                self.ty(ty);
                self.p(") ");
                self.operand(expr);
            }
            Expr::Conditional { cond, then, otherwise } => {
                self.operand(cond);
                self.p(" ? ");
                self.operand(then);
                self.p(" : ");
                self.operand(otherwise);
            }
            Expr::InstanceOf { expr, ty } => {
                self.operand(expr);
                self.p(" instanceof ");
                self.ty(ty);
            }
            Expr::Index { array, index } => {
                self.postfix_target(array);
                self.p("[");
                self.expr(index);
                self.p("]");
            }
            Expr::ClassLiteral(ty) => {
                self.ty(&ty.erasure());
                self.p(".class");
            }
            Expr::Lambda(lambda) => self.lambda(lambda),
        }
    }

    /// An expression nested in another expression.
    fn operand(&mut self, expr: &Expr) {
        if expr.is_compound() {
            self.p("(");
            self.expr(expr);
            self.p(")");
        } else {
            self.expr(expr);
        }
    }

    /// The target of a member access, call or index. Prefix operators and
    /// array creation bind looser than the postfix that follows them.
    fn postfix_target(&mut self, expr: &Expr) {
        if matches!(expr, Expr::Unary { .. } | Expr::NewArray { .. }) {
            self.p("(");
            self.expr(expr);
            self.p(")");
        } else {
            self.operand(expr);
        }
    }

    fn invocation(&mut self, invocation: &Invocation) {
        match invocation.callee() {
            Callee::Bare(name) => self.p(name),
            Callee::Method { target, name } => {
                self.postfix_target(target);
                self.p(".");
                self.type_args(invocation.type_args());
                self.p(name);
            }
            Callee::Static { owner, name } => {
                self.ty(owner);
                self.p(".");
                self.type_args(invocation.type_args());
                self.p(name);
            }
            Callee::New(ty) => {
                self.p("new ");
                self.ty(ty);
            }
            Callee::SuperConstructor => self.p("super"),
            Callee::ThisConstructor => self.p("this"),
        }
        self.p("(");
        self.comma_list(invocation.arguments(), ", ", |f, arg| f.expr(arg));
        self.p(")");
    }

    fn type_args(&mut self, args: &[TypeRef]) {
        if !args.is_empty() {
            self.p("<");
            self.comma_list(args, ", ", |f, arg| f.ty(arg));
            self.p(">");
        }
    }

    fn lambda(&mut self, lambda: &Lambda) {
        let params = lambda.params();
        let typed = params.first().is_some_and(|p| p.ty.is_some());
        match params {
            [single] if !typed => self.p(&single.name),
            _ => {
                self.p("(");
                self.comma_list(params, ", ", |f, param| {
                    if let Some(ty) = &param.ty {
                        f.ty(ty);
                        f.p(" ");
                    }
                    f.p(&param.name);
                });
                self.p(")");
            }
        }
        self.p(" -> ");
        match lambda.expr_body() {
            Some(body) => self.expr(body),
            None => self.block(lambda.block_body()),
        }
    }

    /// `{`, the statements one level deeper, then `}` without a newline.
    pub(super) fn block(&mut self, block: &Block) {
        self.p("{");
        self.nl();
        self.indent();
        self.statements(block.statements());
        self.outdent();
        self.p("}");
    }

    pub(super) fn statements(&mut self, statements: &[Statement]) {
        for statement in statements {
            self.statement(statement);
        }
    }

    fn local(&mut self, local: &LocalVar) {
        self.mods(local.mods());
        self.ty(local.ty());
        self.p(" ");
        self.p(local.name());
        if let Some(init) = local.init() {
            self.p(" = ");
            self.expr(init);
        }
    }

    /// One statement, ending with a newline.
    pub(super) fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Local(local) => {
                self.local(local);
                self.p(";");
            }
            Statement::Expr(expr) => {
                self.expr(expr);
                self.p(";");
            }
            Statement::Return(value) => {
                self.p("return");
                if let Some(value) = value {
                    self.p(" ");
                    self.expr(value);
                }
                self.p(";");
            }
            Statement::Throw(exception) => {
                self.p("throw ");
                self.expr(exception);
                self.p(";");
            }
            Statement::Break(label) => self.jump("break", label.as_deref()),
            Statement::Continue(label) => self.jump("continue", label.as_deref()),
            Statement::If(if_stmt) => self.if_chain(if_stmt),
            Statement::While(while_loop) => {
                self.p("while (");
                self.expr(while_loop.cond());
                self.p(") ");
                self.block(while_loop.block());
            }
            Statement::DoWhile(do_loop) => {
                self.p("do ");
                self.block(do_loop.block());
                self.p(" while (");
                self.expr(do_loop.cond());
                self.p(");");
            }
            Statement::For(for_loop) => {
                self.p("for (");
                match for_loop.init_clause() {
                    Some(ForInit::Locals(locals)) => {
                        for (index, local) in locals.iter().enumerate() {
                            if index == 0 {
                                self.local(local);
                            } else {
                                self.p(", ");
                                self.p(local.name());
                                if let Some(init) = local.init() {
                                    self.p(" = ");
                                    self.expr(init);
                                }
                            }
                        }
                    }
                    Some(ForInit::Exprs(exprs)) => self.comma_list(exprs, ", ", |f, e| f.expr(e)),
                    None => {}
                }
                self.p(";");
                if let Some(test) = for_loop.test_clause() {
                    self.p(" ");
                    self.expr(test);
                }
                self.p(";");
                if !for_loop.update_clause().is_empty() {
                    self.p(" ");
                    self.comma_list(for_loop.update_clause(), ", ", |f, e| f.expr(e));
                }
                self.p(") ");
                self.block(for_loop.block());
            }
            Statement::ForEach(for_each) => {
                self.p("for (");
                self.local(for_each.local());
                self.p(" : ");
                self.expr(for_each.collection());
                self.p(") ");
                self.block(for_each.block());
            }
            Statement::Try(try_stmt) => self.try_stmt(try_stmt),
            Statement::Switch(switch) => {
                self.p("switch (");
                self.expr(switch.selector());
                self.p(") {");
                self.nl();
                self.indent();
                for case in switch.cases() {
                    match case.label() {
                        Some(label) => {
                            self.p("case ");
                            self.expr(label);
                            self.p(":");
                        }
                        None => self.p("default:"),
                    }
                    self.nl();
                    self.indent();
                    self.statements(case.block().statements());
                    self.outdent();
                }
                self.outdent();
                self.p("}");
            }
            Statement::Block(block) => self.block(block),
            Statement::Labeled { label, body } => {
                self.p(label);
                self.p(": ");
                self.statement(body);
                return;
            }
            Statement::Comment(text) => {
                for line in text.split('\n') {
                    self.p("//");
                    if !line.is_empty() {
                        self.p(" ");
                        self.p(line);
                    }
                    self.nl();
                }
                return;
            }
        }
        self.nl();
    }

    fn jump(&mut self, keyword: &str, label: Option<&str>) {
        self.p(keyword);
        if let Some(label) = label {
            self.p(" ");
            self.p(label);
        }
        self.p(";");
    }

    /// `if` and its `else if` branches; an `else` holding nothing but another
    /// `if` is written as `else if` too.
    fn if_chain(&mut self, if_stmt: &If) {
        for (index, (cond, block)) in if_stmt.branches().iter().enumerate() {
            self.p(if index == 0 { "if (" } else { " else if (" });
            self.expr(cond);
            self.p(") ");
            self.block(block);
        }
        if let Some(otherwise) = if_stmt.else_block() {
            self.p(" else ");
            match otherwise.statements() {
                [Statement::If(nested)] => self.if_chain(nested),
                _ => self.block(otherwise),
            }
        }
    }

    fn try_stmt(&mut self, try_stmt: &Try) {
        self.p("try");
        let resources = try_stmt.resources();
        if !resources.is_empty() {
            self.p("(");
            for (index, resource) in resources.iter().enumerate() {
                if index > 0 {
                    self.p(";");
                    self.nl();
                }
                self.local(resource);
            }
            self.p(")");
        }
        self.p(" ");
        self.block(try_stmt.block());
        for catch in try_stmt.catches() {
            self.p(" catch (");
            self.comma_list(catch.types(), " | ", |f, ty| f.ty(ty));
            self.p(" ");
            self.p(catch.param_name());
            self.p(") ");
            self.block(catch.block());
        }
        if let Some(finally) = try_stmt.finally_block() {
            self.p(" finally ");
            self.block(finally);
        }
    }

    /// `@Type`, `@Type(value)` or `@Type(a = x, b = y)`.
    pub(super) fn annotation(&mut self, annotation: &AnnotationUse) {
        self.p("@");
        self.class(annotation.annotation());
        let params = annotation.params();
        if params.is_empty() {
            return;
        }
        self.p("(");
        if annotation.is_single_value() {
            if let Some(value) = params.values().next() {
                self.annotation_value(value);
            }
        } else {
            for (index, (name, value)) in params.iter().enumerate() {
                if index > 0 {
                    self.p(", ");
                }
                self.p(name);
                self.p(" = ");
                self.annotation_value(value);
            }
        }
        self.p(")");
    }

    pub(super) fn annotation_value(&mut self, value: &AnnotationValue) {
        match value {
            AnnotationValue::Expr(expr) => self.expr(expr),
            AnnotationValue::Annotation(annotation) => self.annotation(annotation),
            AnnotationValue::Array(items) if items.len() > self.config.array_wrap_threshold => {
                self.p("{");
                self.nl();
                self.indent();
                for (index, item) in items.iter().enumerate() {
                    self.annotation_value(item);
                    if index + 1 < items.len() {
                        self.p(",");
                    }
                    self.nl();
                }
                self.outdent();
                self.p("}");
            }
            AnnotationValue::Array(items) => {
                self.p("{");
                self.comma_list(items, ", ", |f, item| f.annotation_value(item));
                self.p("}");
            }
        }
    }
}

/// `-(-1)` rather than `--1`, which would read as a decrement.
fn is_signed_literal(expr: &Expr) -> bool {
    match expr {
        Expr::Literal(Literal::Int(v)) => *v < 0,
        Expr::Literal(Literal::Long(v)) => *v < 0,
        Expr::Literal(Literal::Float(v)) => v.is_sign_negative(),
        Expr::Literal(Literal::Double(v)) => v.is_sign_negative(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::config::RenderConfig;
    use crate::format::{render_expr, render_statement, render_type};
    use crate::model::{Block, Expr, If, Modifiers, Statement, TypeRef};
    use pretty_assertions::assert_eq;

    fn config() -> RenderConfig {
        RenderConfig::default()
    }

    fn name(n: &str) -> Expr {
        Expr::name(n).unwrap()
    }

    #[test]
    fn test_operator_parentheses() {
        let e = name("a").plus(name("b")).mul(name("c"));
        assert_eq!(render_expr(&e, &config()), "(a + b) * c");

        let assign = name("x").assign(name("a").plus(1));
        assert_eq!(render_expr(&assign, &config()), "x = a + 1");

        let negated = name("a").and(name("b")).not();
        assert_eq!(render_expr(&negated, &config()), "!(a && b)");

        let double_neg = Expr::from(1).neg().neg();
        assert_eq!(render_expr(&double_neg, &config()), "-(-1)");
        assert_eq!(render_expr(&Expr::from(-1).neg(), &config()), "-(-1)");

        let call_on_not = name("flag").not().invoke("toString").unwrap().into_expr();
        assert_eq!(render_expr(&call_on_not, &config()), "(!flag).toString()");

        let field_of_neg = name("x").neg().field("length").unwrap();
        assert_eq!(render_expr(&field_of_neg, &config()), "(-x).length");

        let cast_target = name("x").cast(TypeRef::long()).invoke("hashCode").unwrap();
        assert_eq!(
            render_expr(&cast_target.into_expr(), &config()),
            "((long) x).hashCode()"
        );
    }

    #[test]
    fn test_indexing_a_new_array() {
        let fresh = Expr::new_array(TypeRef::int(), 3).unwrap().index(0);
        assert_eq!(render_expr(&fresh, &config()), "(new int[3])[0]");

        let plain = name("values").index(name("i").plus(1));
        assert_eq!(render_expr(&plain, &config()), "values[i + 1]");
    }

    #[test]
    fn test_literals() {
        assert_eq!(render_expr(&Expr::from(5i64), &config()), "5L");
        assert_eq!(render_expr(&Expr::from(2.5f64), &config()), "2.5D");
        assert_eq!(
            render_expr(&Expr::from(f64::NAN), &config()),
            "java.lang.Double.NaN"
        );
        assert_eq!(
            render_expr(&Expr::from(f32::INFINITY), &config()),
            "java.lang.Float.POSITIVE_INFINITY"
        );
        assert_eq!(render_expr(&Expr::from("a\"b"), &config()), "\"a\\\"b\"");
    }

    #[test]
    fn test_detached_types_are_fully_qualified() {
        let map = TypeRef::parse("java.util.Map")
            .unwrap()
            .narrow([
                TypeRef::parse("java.lang.String").unwrap(),
                TypeRef::parse("java.lang.Number").unwrap().wildcard().unwrap(),
            ])
            .unwrap();
        assert_eq!(
            render_type(&map, &config()),
            "java.util.Map<java.lang.String, ? extends java.lang.Number>"
        );
    }

    #[test]
    fn test_else_if_chain() {
        let mut outer = If::new(name("a"));
        outer.then().ret(1);
        let mut nested = If::new(name("b"));
        nested.then().ret(2);
        nested.otherwise().ret(3);
        outer.otherwise().add(nested);

        let text = render_statement(&Statement::If(outer), &config());
        assert_eq!(
            text,
            "if (a) {\n    return 1;\n} else if (b) {\n    return 2;\n} else {\n    return 3;\n}\n"
        );
    }

    #[test]
    fn test_comment_and_labels() {
        let mut block = Block::new();
        block.comment("first\nsecond");
        block.brk(Some("outer")).unwrap();
        block
            .decl(Modifiers::empty(), TypeRef::int(), "i", Some(Expr::from(0)))
            .unwrap();
        let text: String = block
            .statements()
            .iter()
            .map(|s| render_statement(s, &config()))
            .collect();
        assert_eq!(text, "// first\n// second\nbreak outer;\nint i = 0;\n");
    }
}
