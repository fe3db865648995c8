//! Name resolution and source emission.
//!
//! One [`Formatter`] walks a compilation unit twice. The collecting pass
//! prints nothing and records every class the unit mentions; after the
//! [`ImportPlan`] is resolved, the printing pass walks the same tree again
//! and writes each class reference as a simple or fully qualified name.
//!
//! Fragments rendered without a unit (the `render_*` functions) write every
//! class fully qualified.

mod code;
mod decl;
pub mod imports;
pub mod literal;

pub use imports::ImportPlan;

use crate::config::RenderConfig;
use crate::error::{CodeModelError, Result};
use crate::model::{
    AnnotationUse, Block, ClassId, ClassRef, CodeModel, DefinedClass, Expr, Package, Statement,
    TypeRef,
};
use imports::{ReferencedClass, UnitScope};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Collecting,
    Printing,
}

pub(crate) struct Formatter<'a> {
    config: &'a RenderConfig,
    mode: Mode,
    scope: Option<UnitScope>,
    plan: ImportPlan,
    collected: BTreeMap<String, ReferencedClass>,
    out: String,
    level: usize,
    line_start: bool,
    /// Member class names of each class being declared, outermost first.
    enclosing: Vec<Vec<String>>,
}

impl<'a> Formatter<'a> {
    /// A formatter for fragments outside any unit.
    fn detached(config: &'a RenderConfig) -> Self {
        Self {
            config,
            mode: Mode::Printing,
            scope: None,
            plan: ImportPlan::default(),
            collected: BTreeMap::new(),
            out: String::new(),
            level: 0,
            line_start: true,
            enclosing: Vec::new(),
        }
    }

    fn for_unit(config: &'a RenderConfig, scope: UnitScope) -> Self {
        Self {
            mode: Mode::Collecting,
            scope: Some(scope),
            ..Self::detached(config)
        }
    }

    fn finish(self) -> String {
        self.out
    }

    fn printing(&self) -> bool {
        self.mode == Mode::Printing
    }

    /// Write text, indenting first if a new line has just started.
    fn p(&mut self, text: &str) {
        if !self.printing() || text.is_empty() {
            return;
        }
        if self.line_start {
            for _ in 0..self.level {
                self.out.push_str(&self.config.indent);
            }
            self.line_start = false;
        }
        self.out.push_str(text);
    }

    fn nl(&mut self) {
        if self.printing() {
            self.out.push_str(&self.config.newline);
            self.line_start = true;
        }
    }

    fn indent(&mut self) {
        self.level += 1;
    }

    fn outdent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    fn comma_list<T>(&mut self, items: &[T], separator: &str, mut each: impl FnMut(&mut Self, &T)) {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.p(separator);
            }
            each(self, item);
        }
    }

    /// Record or write a class reference.
    fn class(&mut self, class: &ClassRef) {
        match self.mode {
            Mode::Collecting => self.collect(class),
            Mode::Printing => {
                let name = self.resolve(class);
                self.p(&name);
            }
        }
    }

    fn collect(&mut self, class: &ClassRef) {
        let Some(scope) = &self.scope else {
            return;
        };
        let top_level = class.top_level_full_name();
        if top_level == scope.top_level || never_imported(scope, class) {
            return;
        }
        self.collected
            .entry(top_level)
            .or_insert_with(|| ReferencedClass {
                package: class.package().to_string(),
                simple_name: class.top_level_name().to_string(),
            });
    }

    fn resolve(&self, class: &ClassRef) -> String {
        let Some(scope) = &self.scope else {
            return class.full_name().to_string();
        };
        if !self.config.emit_imports {
            return class.full_name().to_string();
        }
        let nested = class.nested_path();
        let top_level = class.top_level_full_name();
        if top_level == scope.top_level {
            if nested.is_empty() {
                return class.name().to_string();
            }
            // A member class of an inner enclosing class hides the
            // top-level class's member of the same name.
            let hidden = self
                .enclosing
                .iter()
                .skip(1)
                .any(|members| members.iter().any(|m| m == nested[0]));
            return if hidden {
                format!("{}.{}", class.top_level_name(), nested.join("."))
            } else {
                nested.join(".")
            };
        }
        if never_imported(scope, class) {
            return class.full_name().to_string();
        }
        if self.plan.is_simple(&top_level) {
            let mut name = class.top_level_name().to_string();
            for segment in nested {
                name.push('.');
                name.push_str(segment);
            }
            return name;
        }
        class.full_name().to_string()
    }
}

/// Whether the class, or any class enclosing it, is marked as never imported.
fn never_imported(scope: &UnitScope, class: &ClassRef) -> bool {
    if scope.dont_import.is_empty() {
        return false;
    }
    let mut name = class.top_level_full_name();
    if scope.dont_import.contains(&name) {
        return true;
    }
    for segment in class.nested_path() {
        name.push('.');
        name.push_str(segment);
        if scope.dont_import.contains(&name) {
            return true;
        }
    }
    false
}

/// Render the compilation unit of the top-level class `id`.
pub fn render_unit(model: &CodeModel, id: ClassId, config: &RenderConfig) -> Result<String> {
    let class = model.class(id)?;
    if class.is_nested() {
        return Err(CodeModelError::InvalidType(format!(
            "{} is nested and has no compilation unit of its own",
            class.full_name()
        )));
    }
    let scope = unit_scope(model, class)?;
    let mut f = Formatter::for_unit(config, scope);

    f.declaration(model, class)?;
    if let Some(scope) = &f.scope {
        f.plan = ImportPlan::resolve(scope, &f.collected);
    }
    debug!(
        unit = %class.full_name(),
        referenced = f.collected.len(),
        imports = f.plan.imports().count(),
        "imports resolved"
    );

    f.mode = Mode::Printing;
    f.level = 0;
    f.unit_header(class.package());
    f.declaration(model, class)?;
    Ok(f.finish())
}

/// Render `package-info.java` for a package with annotations or javadoc.
pub fn render_package_info(package: &Package, config: &RenderConfig) -> String {
    let mut f = Formatter::detached(config);
    f.javadoc(package.javadoc_lines());
    for annotation in package.annotations() {
        f.annotation(annotation);
        f.nl();
    }
    f.p("package ");
    f.p(package.name());
    f.p(";");
    f.nl();
    f.finish()
}

fn unit_scope(model: &CodeModel, top: &DefinedClass) -> Result<UnitScope> {
    let mut scope = UnitScope {
        package: top.package().to_string(),
        top_level: top.full_name().to_string(),
        ..UnitScope::default()
    };
    let mut pending = vec![top.id()];
    while let Some(id) = pending.pop() {
        let class = model.class(id)?;
        scope.local_names.insert(class.name().to_string());
        let method_vars = class
            .methods()
            .iter()
            .chain(class.constructors())
            .flat_map(|m| m.type_params());
        for var in class.type_params().iter().chain(method_vars) {
            scope.type_vars.insert(var.name().to_string());
        }
        pending.extend(class.nested().iter().copied());
    }
    if let Some(package) = model.get_package(top.package()) {
        for id in package.classes() {
            let other = model.class(*id)?;
            if other.id() != top.id() {
                scope.package_classes.insert(other.name().to_string());
            }
        }
    }
    scope.dont_import = model.dont_imports().map(str::to_string).collect();
    Ok(scope)
}

pub fn render_type(ty: &TypeRef, config: &RenderConfig) -> String {
    let mut f = Formatter::detached(config);
    f.ty(ty);
    f.finish()
}

pub fn render_expr(expr: &Expr, config: &RenderConfig) -> String {
    let mut f = Formatter::detached(config);
    f.expr(expr);
    f.finish()
}

pub fn render_statement(statement: &Statement, config: &RenderConfig) -> String {
    let mut f = Formatter::detached(config);
    f.statement(statement);
    f.finish()
}

/// A block with its braces, followed by a newline.
pub fn render_block(block: &Block, config: &RenderConfig) -> String {
    let mut f = Formatter::detached(config);
    f.block(block);
    f.nl();
    f.finish()
}

pub fn render_annotation(annotation: &AnnotationUse, config: &RenderConfig) -> String {
    let mut f = Formatter::detached(config);
    f.annotation(annotation);
    f.finish()
}
