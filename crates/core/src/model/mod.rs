//! The declaration model and its root registry.
//!
//! Defined classes live in an arena owned by [`CodeModel`] and are addressed
//! by [`ClassId`] handles, so nested classes, self-referential generics and
//! the formatter all refer to a class without holding a borrow of it.

pub mod annotation;
pub mod class;
pub mod expr;
pub mod member;
pub mod mods;
pub mod package;
pub mod stmt;
pub mod types;

pub use annotation::{AnnotationUse, AnnotationValue};
pub use class::{DefinedClass, EnumConstant, Initializer};
pub use expr::{
    AssignOp, BinaryOp, Callee, Expr, Invocation, Lambda, LambdaParam, Literal, UnaryOp, Var,
};
pub use member::{Field, Method, Param};
pub use mods::{ModifierTarget, Modifiers};
pub use package::{Package, ResourceData, ResourceFile, Resources};
pub use stmt::{
    Block, Case, Catch, DoWhileLoop, ForEach, ForInit, ForLoop, If, LocalVar, Statement, Switch,
    Try, WhileLoop,
};
pub use types::{BoundMode, ClassKind, ClassRef, PrimitiveType, TypeKind, TypeRef, TypeVar};

use crate::error::{CodeModelError, Result, check_identifier};
use codemodel_api::fs::host_convention;
use codemodel_api::{FileSystemConvention, OutputDir, UnifiedFileSystem, naming};
use dashmap::DashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Handle of a class defined in a [`CodeModel`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ClassId(u32);

impl ClassId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Root of a generated program: packages, defined classes, external class
/// references and resource directories.
#[derive(Debug)]
pub struct CodeModel {
    packages: IndexMap<String, Package>,
    classes: Vec<Option<DefinedClass>>,
    registry: IndexMap<String, ClassId>,
    externals: DashMap<String, ClassRef>,
    dont_import: HashSet<String>,
    resource_dirs: IndexMap<String, Resources>,
    fs: Arc<dyn FileSystemConvention>,
}

impl Default for CodeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeModel {
    /// A model using the host platform's file naming rules.
    pub fn new() -> Self {
        Self::with_fs_convention(host_convention())
    }

    /// A model whose output is valid on every supported platform.
    pub fn unified() -> Self {
        Self::with_fs_convention(Arc::new(UnifiedFileSystem))
    }

    pub fn with_fs_convention(fs: Arc<dyn FileSystemConvention>) -> Self {
        Self {
            packages: IndexMap::new(),
            classes: Vec::new(),
            registry: IndexMap::new(),
            externals: DashMap::new(),
            dont_import: HashSet::new(),
            resource_dirs: IndexMap::new(),
            fs,
        }
    }

    pub fn fs_convention(&self) -> &dyn FileSystemConvention {
        self.fs.as_ref()
    }

    /// The package with this name, created on first request. The empty name
    /// is the default package.
    pub fn package(&mut self, name: &str) -> Result<&mut Package> {
        if !naming::is_qualified_name(name) {
            return Err(CodeModelError::InvalidQualifiedName(name.to_string()));
        }
        if !self.packages.contains_key(name) {
            let package = Package::new(name, self.fs.clone())?;
            self.packages.insert(name.to_string(), package);
        }
        self.packages
            .get_mut(name)
            .ok_or_else(|| CodeModelError::InvalidQualifiedName(name.to_string()))
    }

    pub fn get_package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Define a top-level class. Everything before the last `.` is the
    /// package. Fails if the name, or on case-insensitive file systems a name
    /// differing only in case, is already defined.
    pub fn define_class(&mut self, mods: Modifiers, fqn: &str, kind: ClassKind) -> Result<ClassId> {
        if fqn.is_empty() || !naming::is_qualified_name(fqn) {
            return Err(CodeModelError::InvalidQualifiedName(fqn.to_string()));
        }
        mods.validate(ModifierTarget::TopLevelClass)?;
        check_kind_modifiers(kind, mods)?;
        self.check_unique(fqn)?;

        let package_name = naming::qualifier(fqn);
        let name = naming::simple_name(fqn);
        self.package(package_name)?;

        let id = self.next_id();
        let class_ref = ClassRef::defined(id, package_name, Vec::new(), name, kind);
        self.classes.push(Some(DefinedClass::new(id, class_ref, mods, None)));
        self.registry.insert(fqn.to_string(), id);
        if let Some(package) = self.packages.get_mut(package_name) {
            package.push_class(id);
        }
        debug!(class = %fqn, kind = kind.keyword(), "class defined");
        Ok(id)
    }

    /// The class registered under `fqn`, defining it on first request.
    pub fn get_or_define_class(&mut self, mods: Modifiers, fqn: &str, kind: ClassKind) -> Result<ClassId> {
        match self.registry.get(fqn) {
            Some(id) => Ok(*id),
            None => self.define_class(mods, fqn, kind),
        }
    }

    /// Define a class nested in `outer`.
    pub fn define_nested(
        &mut self,
        outer: ClassId,
        mods: Modifiers,
        name: &str,
        kind: ClassKind,
    ) -> Result<ClassId> {
        check_identifier(name)?;
        mods.validate(ModifierTarget::NestedClass)?;
        check_kind_modifiers(kind, mods)?;

        let outer_class = self.class(outer)?;
        let outer_ref = outer_class.class_ref().clone();
        let fqn = format!("{}.{}", outer_ref.full_name(), name);
        let mut chain = outer_ref.enclosing().to_vec();
        chain.push(outer_ref.name().to_string());
        if chain.iter().any(|enclosing| enclosing == name) {
            return Err(CodeModelError::ClassAlreadyExists(format!(
                "{fqn} hides an enclosing class"
            )));
        }
        self.check_unique(&fqn)?;

        let id = self.next_id();
        let class_ref = ClassRef::defined(id, outer_ref.package(), chain, name, kind);
        self.classes
            .push(Some(DefinedClass::new(id, class_ref, mods, Some(outer))));
        self.registry.insert(fqn.clone(), id);
        self.class_mut(outer)?.push_nested(id);
        debug!(class = %fqn, kind = kind.keyword(), "nested class defined");
        Ok(id)
    }

    fn next_id(&self) -> ClassId {
        ClassId(self.classes.len() as u32)
    }

    fn check_unique(&self, fqn: &str) -> Result<()> {
        if self.registry.contains_key(fqn) {
            return Err(CodeModelError::ClassAlreadyExists(fqn.to_string()));
        }
        if !self.fs.is_case_sensitive()
            && let Some(existing) = self.registry.keys().find(|k| k.eq_ignore_ascii_case(fqn))
        {
            return Err(CodeModelError::ClassAlreadyExists(format!(
                "{fqn} differs from {existing} only in case"
            )));
        }
        Ok(())
    }

    pub fn class(&self, id: ClassId) -> Result<&DefinedClass> {
        self.classes
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(CodeModelError::UnknownClass(id.0))
    }

    pub fn class_mut(&mut self, id: ClassId) -> Result<&mut DefinedClass> {
        self.classes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(CodeModelError::UnknownClass(id.0))
    }

    pub fn class_by_name(&self, fqn: &str) -> Option<ClassId> {
        self.registry.get(fqn).copied()
    }

    /// Remove a class and everything nested in it, so the name can be
    /// defined again.
    pub fn remove_class(&mut self, id: ClassId) -> Result<DefinedClass> {
        let nested = self.class(id)?.nested().to_vec();
        for child in nested {
            self.remove_class(child)?;
        }
        let removed = self
            .classes
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(CodeModelError::UnknownClass(id.0))?;
        self.registry.shift_remove(removed.full_name());
        match removed.outer() {
            Some(outer) => self.class_mut(outer)?.remove_nested(id),
            None => {
                if let Some(package) = self.packages.get_mut(removed.package()) {
                    package.remove_class(id);
                }
            }
        }
        debug!(class = %removed.full_name(), "class removed");
        Ok(removed)
    }

    /// All live classes, top-level and nested, in definition order.
    pub fn classes(&self) -> impl Iterator<Item = &DefinedClass> {
        self.classes.iter().filter_map(Option::as_ref)
    }

    /// Top-level classes grouped by package, in definition order.
    pub fn top_level_classes(&self) -> impl Iterator<Item = &DefinedClass> {
        self.packages
            .values()
            .flat_map(|p| p.classes().iter())
            .filter_map(|id| self.class(*id).ok())
    }

    /// A reference to `fqn`: the defined class if there is one, otherwise an
    /// interned external reference. Safe to call from several threads; racing
    /// callers all receive the instance that was inserted first.
    pub fn ref_class(&self, fqn: &str) -> Result<ClassRef> {
        if let Some(id) = self.registry.get(fqn) {
            return Ok(self.class(*id)?.class_ref().clone());
        }
        let entry = self
            .externals
            .entry(fqn.to_string())
            .or_try_insert_with(|| ClassRef::external(fqn))?;
        Ok(entry.value().clone())
    }

    /// Shorthand for `TypeRef::class(self.ref_class(fqn)?)`.
    pub fn ref_type(&self, fqn: &str) -> Result<TypeRef> {
        Ok(TypeRef::class(self.ref_class(fqn)?))
    }

    /// Never import `fqn`; every reference to it is written fully qualified.
    pub fn dont_import(&mut self, fqn: &str) -> Result<&mut Self> {
        if !naming::is_qualified_name(fqn) || fqn.is_empty() {
            return Err(CodeModelError::InvalidQualifiedName(fqn.to_string()));
        }
        self.dont_import.insert(fqn.to_string());
        Ok(self)
    }

    pub fn is_dont_import(&self, fqn: &str) -> bool {
        self.dont_import.contains(fqn)
    }

    pub fn dont_imports(&self) -> impl Iterator<Item = &str> {
        self.dont_import.iter().map(String::as_str)
    }

    /// A plain resource directory that need not be a valid package name,
    /// such as `META-INF/services`.
    pub fn resource_dir(&mut self, path: &str) -> Result<&mut Resources> {
        let dir = OutputDir::resource(path, self.fs.as_ref())
            .map_err(|e| CodeModelError::InvalidResource(e.to_string()))?;
        let key = dir.relative_path().to_string();
        let fs = self.fs.clone();
        Ok(self
            .resource_dirs
            .entry(key)
            .or_insert_with(|| Resources::new(dir, fs)))
    }

    pub fn resource_dirs(&self) -> impl Iterator<Item = &Resources> {
        self.resource_dirs.values()
    }
}

fn check_kind_modifiers(kind: ClassKind, mods: Modifiers) -> Result<()> {
    let forbidden = match kind {
        ClassKind::Class => Modifiers::empty(),
        ClassKind::Interface | ClassKind::Annotation => Modifiers::FINAL | Modifiers::NON_SEALED,
        ClassKind::Enum => {
            Modifiers::ABSTRACT | Modifiers::FINAL | Modifiers::SEALED | Modifiers::NON_SEALED
        }
    };
    if mods.intersects(forbidden) {
        return Err(CodeModelError::IllegalModifiers {
            target: kind.keyword(),
            modifiers: mods.to_string(),
            reason: "modifier not allowed for this kind of type",
        });
    }
    Ok(())
}
