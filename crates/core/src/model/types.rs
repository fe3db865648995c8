//! The type model: every type a declaration can reference.
//!
//! A [`TypeRef`] is an immutable, cheaply clonable handle. Operations that
//! would change a type (narrowing, substitution, array creation) return a new
//! handle; when nothing changes they hand back the same allocation, which the
//! formatter relies on.

use crate::error::{CodeModelError, Result, check_identifier};
use crate::model::ClassId;
use codemodel_api::naming::{self, JAVA_LANG};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub const OBJECT: &str = "java.lang.Object";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveType {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 9] = [
        PrimitiveType::Void,
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Char,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Void => "void",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == keyword)
    }

    /// Fully qualified name of the wrapper class.
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveType::Void => "java.lang.Void",
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

impl ClassKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Annotation => "@interface",
        }
    }

    pub fn is_interface_like(self) -> bool {
        matches!(self, ClassKind::Interface | ClassKind::Annotation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundMode {
    Extends,
    Super,
}

impl BoundMode {
    pub fn tokens(self) -> &'static str {
        match self {
            BoundMode::Extends => "? extends ",
            BoundMode::Super => "? super ",
        }
    }
}

#[derive(Debug)]
struct ClassData {
    package: String,
    /// Enclosing classes, outermost first.
    enclosing: Vec<String>,
    name: String,
    full_name: String,
    kind: ClassKind,
    defined: Option<ClassId>,
}

/// A declared class: either an external reference or a class defined in a
/// [`CodeModel`](crate::model::CodeModel).
#[derive(Clone)]
pub struct ClassRef(Arc<ClassData>);

impl ClassRef {
    fn build(
        package: String,
        enclosing: Vec<String>,
        name: String,
        kind: ClassKind,
        defined: Option<ClassId>,
    ) -> Self {
        let mut full_name = String::new();
        for part in std::iter::once(&package)
            .filter(|p| !p.is_empty())
            .chain(enclosing.iter())
        {
            full_name.push_str(part);
            full_name.push('.');
        }
        full_name.push_str(&name);
        Self(Arc::new(ClassData {
            package,
            enclosing,
            name,
            full_name,
            kind,
            defined,
        }))
    }

    /// Reference a class that is not defined in the model, e.g.
    /// `java.util.Map.Entry`. See [`naming::parse_class_name`] for how the
    /// package and class parts are told apart.
    pub fn external(fqn: &str) -> Result<Self> {
        let path = naming::parse_class_name(fqn)
            .ok_or_else(|| CodeModelError::InvalidQualifiedName(fqn.to_string()))?;
        Ok(Self::build(
            path.package,
            path.enclosing.iter().map(|s| s.to_string()).collect(),
            path.name.to_string(),
            ClassKind::Class,
            None,
        ))
    }

    /// Reference a class with an explicit package; `name` may be a nested
    /// path such as `Outer.Inner`.
    pub fn external_in(package: &str, name: &str) -> Result<Self> {
        if !naming::is_qualified_name(package) {
            return Err(CodeModelError::InvalidQualifiedName(package.to_string()));
        }
        if name.is_empty() || !naming::is_qualified_name(name) {
            return Err(CodeModelError::InvalidQualifiedName(name.to_string()));
        }
        let mut parts: Vec<String> = name.split('.').map(str::to_string).collect();
        let simple = parts.pop().unwrap_or_default();
        Ok(Self::build(
            package.to_string(),
            parts,
            simple,
            ClassKind::Class,
            None,
        ))
    }

    pub(crate) fn defined(
        id: ClassId,
        package: &str,
        enclosing: Vec<String>,
        name: &str,
        kind: ClassKind,
    ) -> Self {
        Self::build(
            package.to_string(),
            enclosing,
            name.to_string(),
            kind,
            Some(id),
        )
    }

    /// A class of the implicitly visible `java.lang` package.
    pub(crate) fn java_lang(name: &str) -> Self {
        Self::build(
            JAVA_LANG.to_string(),
            Vec::new(),
            name.to_string(),
            ClassKind::Class,
            None,
        )
    }

    /// A class nested directly inside this one.
    pub fn nested(&self, name: &str) -> Result<Self> {
        check_identifier(name)?;
        let mut enclosing = self.0.enclosing.clone();
        enclosing.push(self.0.name.clone());
        Ok(Self::build(
            self.0.package.clone(),
            enclosing,
            name.to_string(),
            ClassKind::Class,
            None,
        ))
    }

    /// The same class seen with a different kind (interface, enum, ...).
    pub fn with_kind(&self, kind: ClassKind) -> Self {
        Self::build(
            self.0.package.clone(),
            self.0.enclosing.clone(),
            self.0.name.clone(),
            kind,
            self.0.defined,
        )
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn full_name(&self) -> &str {
        &self.0.full_name
    }

    pub fn package(&self) -> &str {
        &self.0.package
    }

    pub fn enclosing(&self) -> &[String] {
        &self.0.enclosing
    }

    pub fn kind(&self) -> ClassKind {
        self.0.kind
    }

    pub fn defined_id(&self) -> Option<ClassId> {
        self.0.defined
    }

    pub fn is_nested(&self) -> bool {
        !self.0.enclosing.is_empty()
    }

    pub fn is_java_lang(&self) -> bool {
        self.0.package == JAVA_LANG
    }

    pub fn is_object(&self) -> bool {
        self.0.full_name == OBJECT
    }

    /// Simple name of the outermost enclosing class (or of this class).
    pub fn top_level_name(&self) -> &str {
        self.0
            .enclosing
            .first()
            .map(String::as_str)
            .unwrap_or(&self.0.name)
    }

    pub fn top_level_full_name(&self) -> String {
        if self.0.package.is_empty() {
            self.top_level_name().to_string()
        } else {
            format!("{}.{}", self.0.package, self.top_level_name())
        }
    }

    /// Names below the top-level class: `["Entry"]` for `java.util.Map.Entry`,
    /// empty for a top-level class.
    pub fn nested_path(&self) -> Vec<&str> {
        if self.0.enclosing.is_empty() {
            return Vec::new();
        }
        self.0.enclosing[1..]
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.0.name.as_str()))
            .collect()
    }

    pub fn ptr_eq(a: &ClassRef, b: &ClassRef) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for ClassRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.full_name == other.0.full_name
    }
}

impl Eq for ClassRef {}

impl Hash for ClassRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.full_name.hash(state);
    }
}

impl fmt::Debug for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassRef({})", self.0.full_name)
    }
}

impl fmt::Display for ClassRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.full_name)
    }
}

#[derive(Debug)]
struct TypeVarData {
    name: String,
    bounds: Vec<TypeRef>,
}

/// A type variable declared by a generic class or method. Variables are
/// identified by name within their declaration; a bound may mention the
/// variable itself (`T extends Comparable<T>`) through an unbounded handle of
/// the same name.
#[derive(Clone)]
pub struct TypeVar(Arc<TypeVarData>);

impl TypeVar {
    pub fn new(name: &str) -> Result<Self> {
        Self::bounded(name, Vec::new())
    }

    pub fn bounded(name: &str, bounds: Vec<TypeRef>) -> Result<Self> {
        check_identifier(name)?;
        for bound in &bounds {
            let ok = matches!(
                bound.kind(),
                TypeKind::Class(_) | TypeKind::Parameterized { .. } | TypeKind::TypeVar(_)
            );
            if !ok {
                return Err(CodeModelError::InvalidType(format!(
                    "`{}` cannot bound type variable {name}",
                    bound.full_name()
                )));
            }
        }
        Ok(Self(Arc::new(TypeVarData {
            name: name.to_string(),
            bounds,
        })))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn bounds(&self) -> &[TypeRef] {
        &self.0.bounds
    }

    pub fn as_type(&self) -> TypeRef {
        TypeRef::new(TypeKind::TypeVar(self.clone()))
    }
}

impl PartialEq for TypeVar {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}

impl Eq for TypeVar {}

impl Hash for TypeVar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeVar({})", self.0.name)
    }
}

#[derive(Debug)]
pub enum TypeKind {
    Primitive(PrimitiveType),
    Class(ClassRef),
    /// A generic class narrowed with type arguments. No arguments means the
    /// diamond form `<>`.
    Parameterized {
        base: ClassRef,
        args: Vec<TypeRef>,
    },
    /// `element` is never itself an array.
    Array {
        element: TypeRef,
        dims: usize,
    },
    TypeVar(TypeVar),
    Wildcard {
        bound: TypeRef,
        mode: BoundMode,
    },
}

#[derive(Clone)]
pub struct TypeRef(Arc<TypeKind>);

impl TypeRef {
    fn new(kind: TypeKind) -> Self {
        Self(Arc::new(kind))
    }

    pub fn primitive(primitive: PrimitiveType) -> Self {
        Self::new(TypeKind::Primitive(primitive))
    }

    pub fn void() -> Self {
        Self::primitive(PrimitiveType::Void)
    }

    pub fn boolean() -> Self {
        Self::primitive(PrimitiveType::Boolean)
    }

    pub fn int() -> Self {
        Self::primitive(PrimitiveType::Int)
    }

    pub fn long() -> Self {
        Self::primitive(PrimitiveType::Long)
    }

    pub fn double() -> Self {
        Self::primitive(PrimitiveType::Double)
    }

    pub fn class(class: ClassRef) -> Self {
        Self::new(TypeKind::Class(class))
    }

    /// `java.lang.Object`, the top of the class hierarchy.
    pub fn object() -> Self {
        Self::class(ClassRef::java_lang("Object"))
    }

    /// `?`, i.e. `? extends java.lang.Object`.
    pub fn unbounded_wildcard() -> Self {
        Self::new(TypeKind::Wildcard {
            bound: Self::object(),
            mode: BoundMode::Extends,
        })
    }

    /// Parse a primitive keyword, a class name, or either followed by `[]`
    /// pairs. Generic arguments are not parsed; use [`TypeRef::narrow`].
    pub fn parse(name: &str) -> Result<Self> {
        let trimmed = name.trim();
        if let Some(element) = trimmed.strip_suffix("[]") {
            return Ok(Self::parse(element)?.array());
        }
        match PrimitiveType::from_keyword(trimmed) {
            Some(primitive) => Ok(Self::primitive(primitive)),
            None => Ok(Self::class(ClassRef::external(trimmed)?)),
        }
    }

    pub fn kind(&self) -> &TypeKind {
        &self.0
    }

    pub fn ptr_eq(a: &TypeRef, b: &TypeRef) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(*self.0, TypeKind::Primitive(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(*self.0, TypeKind::Primitive(PrimitiveType::Void))
    }

    pub fn is_reference(&self) -> bool {
        !self.is_primitive()
    }

    pub fn is_array(&self) -> bool {
        matches!(*self.0, TypeKind::Array { .. })
    }

    /// `?` exactly: an extends-wildcard bounded by `java.lang.Object`.
    pub fn is_unbounded_wildcard(&self) -> bool {
        match &*self.0 {
            TypeKind::Wildcard {
                bound,
                mode: BoundMode::Extends,
            } => matches!(bound.kind(), TypeKind::Class(c) if c.is_object()),
            _ => false,
        }
    }

    /// The class behind a class or parameterized type.
    pub fn as_class(&self) -> Option<&ClassRef> {
        match &*self.0 {
            TypeKind::Class(c) | TypeKind::Parameterized { base: c, .. } => Some(c),
            _ => None,
        }
    }

    pub fn type_args(&self) -> &[TypeRef] {
        match &*self.0 {
            TypeKind::Parameterized { args, .. } => args,
            _ => &[],
        }
    }

    /// Element type of an array with one dimension removed.
    pub fn component_type(&self) -> Option<TypeRef> {
        match &*self.0 {
            TypeKind::Array { element, dims: 1 } => Some(element.clone()),
            TypeKind::Array { element, dims } => Some(Self::new(TypeKind::Array {
                element: element.clone(),
                dims: dims - 1,
            })),
            _ => None,
        }
    }

    /// Short form used in declarations, e.g. `List<String>` or `? extends Foo`.
    pub fn name(&self) -> String {
        self.render(false)
    }

    /// Fully qualified form; the identity used for equality and imports.
    pub fn full_name(&self) -> String {
        self.render(true)
    }

    fn render(&self, full: bool) -> String {
        let class_name = |c: &ClassRef| {
            if full {
                c.full_name().to_string()
            } else {
                c.name().to_string()
            }
        };
        match &*self.0 {
            TypeKind::Primitive(p) => p.keyword().to_string(),
            TypeKind::Class(c) => class_name(c),
            TypeKind::Parameterized { base, args } => {
                let args: Vec<String> = args.iter().map(|a| a.render(full)).collect();
                format!("{}<{}>", class_name(base), args.join(", "))
            }
            TypeKind::Array { element, dims } => {
                format!("{}{}", element.render(full), "[]".repeat(*dims))
            }
            TypeKind::TypeVar(v) => v.name().to_string(),
            TypeKind::Wildcard { bound, mode } => {
                if self.is_unbounded_wildcard() {
                    "?".to_string()
                } else {
                    format!("{}{}", mode.tokens(), bound.render(full))
                }
            }
        }
    }

    /// The non-parameterized form, used to compare signatures.
    pub fn erasure(&self) -> TypeRef {
        match &*self.0 {
            TypeKind::Parameterized { base, .. } => Self::class(base.clone()),
            TypeKind::Array { element, dims } => {
                let erased = element.erasure();
                if Self::ptr_eq(&erased, element) {
                    self.clone()
                } else {
                    erased.array_of(*dims)
                }
            }
            TypeKind::TypeVar(v) => v
                .bounds()
                .first()
                .map(TypeRef::erasure)
                .unwrap_or_else(Self::object),
            TypeKind::Wildcard {
                bound,
                mode: BoundMode::Extends,
            } => bound.erasure(),
            TypeKind::Wildcard {
                mode: BoundMode::Super,
                ..
            } => Self::object(),
            TypeKind::Primitive(_) | TypeKind::Class(_) => self.clone(),
        }
    }

    /// Replace every occurrence of `vars[i]` with `bindings[i]`.
    ///
    /// Returns a clone of `self` (the same allocation) when no listed variable
    /// occurs.
    pub fn substitute_params(&self, vars: &[TypeVar], bindings: &[TypeRef]) -> TypeRef {
        match &*self.0 {
            TypeKind::TypeVar(v) => vars
                .iter()
                .position(|candidate| candidate == v)
                .and_then(|index| bindings.get(index))
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeKind::Parameterized { base, args } => {
                match substitute_all(args, vars, bindings) {
                    Some(args) => Self::new(TypeKind::Parameterized {
                        base: base.clone(),
                        args,
                    }),
                    None => self.clone(),
                }
            }
            TypeKind::Array { element, dims } => {
                let substituted = element.substitute_params(vars, bindings);
                if Self::ptr_eq(&substituted, element) {
                    self.clone()
                } else {
                    substituted.array_of(*dims)
                }
            }
            TypeKind::Wildcard { bound, mode } => {
                let substituted = bound.substitute_params(vars, bindings);
                if Self::ptr_eq(&substituted, bound) {
                    self.clone()
                } else {
                    Self::new(TypeKind::Wildcard {
                        bound: substituted,
                        mode: *mode,
                    })
                }
            }
            TypeKind::Primitive(_) | TypeKind::Class(_) => self.clone(),
        }
    }

    /// Bind type arguments to this generic class. Narrowing an already
    /// parameterized type appends the arguments.
    pub fn narrow<I, T>(&self, args: I) -> Result<TypeRef>
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeRef>,
    {
        let mut args: Vec<TypeRef> = args.into_iter().map(Into::into).collect();
        if let Some(primitive) = args.iter().find(|a| a.is_primitive()) {
            return Err(CodeModelError::InvalidType(format!(
                "primitive `{}` used as a type argument of {}",
                primitive.full_name(),
                self.full_name()
            )));
        }
        match &*self.0 {
            TypeKind::Class(base) => Ok(Self::new(TypeKind::Parameterized {
                base: base.clone(),
                args,
            })),
            TypeKind::Parameterized {
                base,
                args: existing,
            } => {
                let mut all = existing.clone();
                all.append(&mut args);
                Ok(Self::new(TypeKind::Parameterized {
                    base: base.clone(),
                    args: all,
                }))
            }
            _ => Err(CodeModelError::InvalidType(format!(
                "`{}` is not a generic class",
                self.full_name()
            ))),
        }
    }

    /// The diamond form, `ArrayList<>`.
    pub fn narrow_empty(&self) -> Result<TypeRef> {
        self.narrow(Vec::<TypeRef>::new())
    }

    /// One more array dimension.
    pub fn array(&self) -> TypeRef {
        self.array_of(1)
    }

    fn array_of(&self, extra: usize) -> TypeRef {
        match &*self.0 {
            TypeKind::Array { element, dims } => Self::new(TypeKind::Array {
                element: element.clone(),
                dims: dims + extra,
            }),
            _ => Self::new(TypeKind::Array {
                element: self.clone(),
                dims: extra,
            }),
        }
    }

    /// `? extends self`
    pub fn wildcard(&self) -> Result<TypeRef> {
        self.bounded_wildcard(BoundMode::Extends)
    }

    /// `? super self`
    pub fn wildcard_super(&self) -> Result<TypeRef> {
        self.bounded_wildcard(BoundMode::Super)
    }

    fn bounded_wildcard(&self, mode: BoundMode) -> Result<TypeRef> {
        if self.is_primitive() || matches!(*self.0, TypeKind::Wildcard { .. }) {
            return Err(CodeModelError::InvalidType(format!(
                "`{}` cannot bound a wildcard",
                self.full_name()
            )));
        }
        Ok(Self::new(TypeKind::Wildcard {
            bound: self.clone(),
            mode,
        }))
    }

    /// The wrapper class for a primitive; any other type unchanged.
    pub fn boxed(&self) -> TypeRef {
        match &*self.0 {
            TypeKind::Primitive(p) => {
                Self::class(ClassRef::java_lang(naming::simple_name(p.boxed_name())))
            }
            _ => self.clone(),
        }
    }

    /// The primitive for a wrapper class; any other type unchanged.
    pub fn unboxed(&self) -> TypeRef {
        match &*self.0 {
            TypeKind::Class(c) => PrimitiveType::ALL
                .into_iter()
                .find(|p| p.boxed_name() == c.full_name())
                .map(Self::primitive)
                .unwrap_or_else(|| self.clone()),
            _ => self.clone(),
        }
    }

    /// True when the type is `void` or an array of `void`.
    pub(crate) fn is_void_like(&self) -> bool {
        match &*self.0 {
            TypeKind::Array { element, .. } => element.is_void(),
            _ => self.is_void(),
        }
    }
}

fn substitute_all(items: &[TypeRef], vars: &[TypeVar], bindings: &[TypeRef]) -> Option<Vec<TypeRef>> {
    let mut out: Option<Vec<TypeRef>> = None;
    for (index, item) in items.iter().enumerate() {
        let next = item.substitute_params(vars, bindings);
        if out.is_none() && !TypeRef::ptr_eq(&next, item) {
            out = Some(items[..index].to_vec());
        }
        if let Some(substituted) = out.as_mut() {
            substituted.push(next);
        }
    }
    out
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        if Self::ptr_eq(self, other) {
            return true;
        }
        match (&*self.0, &*other.0) {
            (
                TypeKind::Parameterized { base: a, args: xs },
                TypeKind::Parameterized { base: b, args: ys },
            ) => a == b && xs == ys,
            (TypeKind::Parameterized { .. }, _) | (_, TypeKind::Parameterized { .. }) => false,
            _ => self.full_name() == other.full_name(),
        }
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.full_name().hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.full_name())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

impl From<ClassRef> for TypeRef {
    fn from(class: ClassRef) -> Self {
        Self::class(class)
    }
}

impl From<&ClassRef> for TypeRef {
    fn from(class: &ClassRef) -> Self {
        Self::class(class.clone())
    }
}

impl From<&TypeRef> for TypeRef {
    fn from(ty: &TypeRef) -> Self {
        ty.clone()
    }
}

impl From<TypeVar> for TypeRef {
    fn from(var: TypeVar) -> Self {
        var.as_type()
    }
}

impl From<&TypeVar> for TypeRef {
    fn from(var: &TypeVar) -> Self {
        var.as_type()
    }
}

impl From<PrimitiveType> for TypeRef {
    fn from(primitive: PrimitiveType) -> Self {
        Self::primitive(primitive)
    }
}
