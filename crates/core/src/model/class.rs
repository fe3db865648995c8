use crate::error::{CodeModelError, Result, check_identifier};
use crate::model::ClassId;
use crate::model::annotation::AnnotationUse;
use crate::model::expr::{Expr, Var};
use crate::model::member::{Field, Method};
use crate::model::mods::Modifiers;
use crate::model::stmt::Block;
use crate::model::types::{ClassKind, ClassRef, TypeKind, TypeRef, TypeVar};
use indexmap::IndexMap;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct EnumConstant {
    name: String,
    args: Vec<Expr>,
    annotations: Vec<AnnotationUse>,
    javadoc: Vec<String>,
}

impl EnumConstant {
    pub fn arg(&mut self, arg: impl Into<Expr>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    pub fn annotate(&mut self, annotation: AnnotationUse) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    pub fn javadoc(&mut self, line: &str) -> &mut Self {
        self.javadoc.push(line.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    pub fn annotations(&self) -> &[AnnotationUse] {
        &self.annotations
    }

    pub fn javadoc_lines(&self) -> &[String] {
        &self.javadoc
    }
}

#[derive(Debug, Clone)]
pub struct Initializer {
    pub is_static: bool,
    pub body: Block,
}

/// A class, interface, enum or annotation type defined in a model.
#[derive(Debug, Clone)]
pub struct DefinedClass {
    id: ClassId,
    class_ref: ClassRef,
    mods: Modifiers,
    outer: Option<ClassId>,
    extends: Option<TypeRef>,
    implements: Vec<TypeRef>,
    type_params: Vec<TypeVar>,
    annotations: Vec<AnnotationUse>,
    javadoc: Vec<String>,
    enum_constants: Vec<EnumConstant>,
    fields: IndexMap<String, Field>,
    constructors: Vec<Method>,
    methods: Vec<Method>,
    initializers: Vec<Initializer>,
    nested: Vec<ClassId>,
}

impl DefinedClass {
    pub(crate) fn new(id: ClassId, class_ref: ClassRef, mods: Modifiers, outer: Option<ClassId>) -> Self {
        Self {
            id,
            class_ref,
            mods,
            outer,
            extends: None,
            implements: Vec::new(),
            type_params: Vec::new(),
            annotations: Vec::new(),
            javadoc: Vec::new(),
            enum_constants: Vec::new(),
            fields: IndexMap::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
            initializers: Vec::new(),
            nested: Vec::new(),
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn class_ref(&self) -> &ClassRef {
        &self.class_ref
    }

    /// The raw type of this class.
    pub fn as_type(&self) -> TypeRef {
        TypeRef::class(self.class_ref.clone())
    }

    /// This class narrowed with its own type parameters, `Foo<T, U>`.
    pub fn self_type(&self) -> Result<TypeRef> {
        if self.type_params.is_empty() {
            return Ok(self.as_type());
        }
        self.as_type().narrow(self.type_params.iter())
    }

    pub fn name(&self) -> &str {
        self.class_ref.name()
    }

    pub fn full_name(&self) -> &str {
        self.class_ref.full_name()
    }

    pub fn package(&self) -> &str {
        self.class_ref.package()
    }

    pub fn kind(&self) -> ClassKind {
        self.class_ref.kind()
    }

    pub fn mods(&self) -> Modifiers {
        self.mods
    }

    pub fn outer(&self) -> Option<ClassId> {
        self.outer
    }

    pub fn is_nested(&self) -> bool {
        self.outer.is_some()
    }

    /// Set the superclass. Only classes have one; interfaces list their
    /// supertypes through [`DefinedClass::implements`].
    pub fn extends(&mut self, superclass: impl Into<TypeRef>) -> Result<&mut Self> {
        let superclass = superclass.into();
        if self.kind() != ClassKind::Class {
            return Err(CodeModelError::InvalidType(format!(
                "{} {} cannot extend a class",
                self.kind().keyword(),
                self.full_name()
            )));
        }
        check_supertype(&superclass)?;
        self.extends = Some(superclass);
        Ok(self)
    }

    /// Add an implemented interface (`extends` for interfaces).
    pub fn implements(&mut self, interface: impl Into<TypeRef>) -> Result<&mut Self> {
        let interface = interface.into();
        if self.kind() == ClassKind::Annotation {
            return Err(CodeModelError::InvalidType(format!(
                "annotation type {} cannot have supertypes",
                self.full_name()
            )));
        }
        check_supertype(&interface)?;
        if !self.implements.contains(&interface) {
            self.implements.push(interface);
        }
        Ok(self)
    }

    /// Declare a class type parameter.
    pub fn generify(&mut self, name: &str) -> Result<TypeVar> {
        self.generify_bounded(name, Vec::new())
    }

    pub fn generify_bounded(&mut self, name: &str, bounds: Vec<TypeRef>) -> Result<TypeVar> {
        if self.type_params.iter().any(|v| v.name() == name) {
            return Err(self.duplicate(format!("<{name}>")));
        }
        let var = TypeVar::bounded(name, bounds)?;
        self.type_params.push(var.clone());
        Ok(var)
    }

    pub fn annotate(&mut self, annotation: AnnotationUse) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    pub fn javadoc(&mut self, line: &str) -> &mut Self {
        self.javadoc.push(line.to_string());
        self
    }

    pub fn enum_constant(&mut self, name: &str) -> Result<&mut EnumConstant> {
        if self.kind() != ClassKind::Enum {
            return Err(CodeModelError::InvalidType(format!(
                "{} is not an enum",
                self.full_name()
            )));
        }
        check_identifier(name)?;
        if self.enum_constants.iter().any(|c| c.name == name) || self.fields.contains_key(name) {
            return Err(self.duplicate(name.to_string()));
        }
        self.enum_constants.push(EnumConstant {
            name: name.to_string(),
            args: Vec::new(),
            annotations: Vec::new(),
            javadoc: Vec::new(),
        });
        let last = self.enum_constants.len() - 1;
        Ok(&mut self.enum_constants[last])
    }

    /// Reference to an enum constant of this class, `Color.RED`.
    pub fn constant_ref(&self, name: &str) -> Option<Expr> {
        self.enum_constants
            .iter()
            .find(|c| c.name == name)
            .map(|c| Expr::StaticField {
                owner: self.as_type(),
                name: c.name.clone(),
            })
    }

    pub fn add_field(&mut self, field: Field) -> Result<Var> {
        if self.fields.contains_key(field.name())
            || self.enum_constants.iter().any(|c| c.name == field.name())
        {
            return Err(self.duplicate(field.name().to_string()));
        }
        let var = field.var();
        trace!(class = %self.full_name(), field = %field.name(), "field added");
        self.fields.insert(field.name().to_string(), field);
        Ok(var)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Field> {
        self.fields.shift_remove(name)
    }

    /// Add a method. Two methods with the same name and erased parameter
    /// types cannot coexist.
    pub fn add_method(&mut self, method: Method) -> Result<&mut Method> {
        if method.is_constructor() {
            return self.add_constructor(method);
        }
        let erased = method.erased_signature();
        if self
            .methods
            .iter()
            .any(|m| m.name() == method.name() && m.has_signature(&erased))
        {
            return Err(self.duplicate(method.signature_display()));
        }
        trace!(class = %self.full_name(), method = %method.signature_display(), "method added");
        self.methods.push(method);
        let last = self.methods.len() - 1;
        Ok(&mut self.methods[last])
    }

    pub fn add_constructor(&mut self, mut constructor: Method) -> Result<&mut Method> {
        if !constructor.is_constructor() {
            return Err(CodeModelError::InvalidType(format!(
                "method {} is not a constructor",
                constructor.name()
            )));
        }
        if self.kind().is_interface_like() {
            return Err(CodeModelError::InvalidType(format!(
                "{} {} cannot declare constructors",
                self.kind().keyword(),
                self.full_name()
            )));
        }
        constructor.set_constructor_name(self.class_ref.name());
        let erased = constructor.erased_signature();
        if self.constructors.iter().any(|c| c.has_signature(&erased)) {
            return Err(self.duplicate(constructor.signature_display()));
        }
        self.constructors.push(constructor);
        let last = self.constructors.len() - 1;
        Ok(&mut self.constructors[last])
    }

    /// The one method with this name and these erased parameter types.
    pub fn method(&self, name: &str, params: &[TypeRef]) -> Option<&Method> {
        let index = self.method_index(name, params)?;
        self.methods.get(index)
    }

    pub fn method_mut(&mut self, name: &str, params: &[TypeRef]) -> Option<&mut Method> {
        let index = self.method_index(name, params)?;
        self.methods.get_mut(index)
    }

    fn method_index(&self, name: &str, params: &[TypeRef]) -> Option<usize> {
        let mut matches = self
            .methods
            .iter()
            .enumerate()
            .filter(|(_, m)| m.name() == name && m.has_signature(params))
            .map(|(index, _)| index);
        let first = matches.next()?;
        // Exact match or nothing; several candidates are reported as absent.
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    pub fn constructor(&self, params: &[TypeRef]) -> Option<&Method> {
        let mut matches = self.constructors.iter().filter(|c| c.has_signature(params));
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Method> + 'a {
        self.methods.iter().filter(move |m| m.name() == name)
    }

    /// An instance initializer block, `{ ... }`.
    pub fn init(&mut self) -> &mut Block {
        self.push_initializer(false)
    }

    /// A static initializer block, `static { ... }`.
    pub fn static_init(&mut self) -> &mut Block {
        self.push_initializer(true)
    }

    fn push_initializer(&mut self, is_static: bool) -> &mut Block {
        self.initializers.push(Initializer {
            is_static,
            body: Block::new(),
        });
        let last = self.initializers.len() - 1;
        &mut self.initializers[last].body
    }

    pub(crate) fn push_nested(&mut self, id: ClassId) {
        self.nested.push(id);
    }

    pub(crate) fn remove_nested(&mut self, id: ClassId) {
        self.nested.retain(|n| *n != id);
    }

    pub fn superclass(&self) -> Option<&TypeRef> {
        self.extends.as_ref()
    }

    pub fn interfaces(&self) -> &[TypeRef] {
        &self.implements
    }

    pub fn type_params(&self) -> &[TypeVar] {
        &self.type_params
    }

    pub fn annotations(&self) -> &[AnnotationUse] {
        &self.annotations
    }

    pub fn javadoc_lines(&self) -> &[String] {
        &self.javadoc
    }

    pub fn enum_constants(&self) -> &[EnumConstant] {
        &self.enum_constants
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    pub fn constructors(&self) -> &[Method] {
        &self.constructors
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn initializers(&self) -> &[Initializer] {
        &self.initializers
    }

    pub fn nested(&self) -> &[ClassId] {
        &self.nested
    }

    fn duplicate(&self, member: String) -> CodeModelError {
        CodeModelError::DuplicateMember {
            owner: self.full_name().to_string(),
            member,
        }
    }
}

fn check_supertype(ty: &TypeRef) -> Result<()> {
    let problem = match ty.kind() {
        TypeKind::Class(_) => None,
        TypeKind::Parameterized { args, .. } if args.is_empty() => Some("uses the diamond"),
        TypeKind::Parameterized { args, .. } => args
            .iter()
            .any(|a| matches!(a.kind(), TypeKind::Wildcard { .. }))
            .then_some("has wildcard arguments"),
        _ => Some("is not a class"),
    };
    match problem {
        Some(problem) => Err(CodeModelError::InvalidType(format!(
            "supertype {} {problem}",
            ty.full_name()
        ))),
        None => Ok(()),
    }
}
