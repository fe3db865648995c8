//! Fields, methods and constructors.

use crate::error::{CodeModelError, Result, check_identifier};
use crate::model::annotation::{AnnotationUse, AnnotationValue};
use crate::model::expr::{Expr, Var};
use crate::model::mods::{ModifierTarget, Modifiers};
use crate::model::stmt::Block;
use crate::model::types::{TypeRef, TypeVar};

#[derive(Debug, Clone)]
pub struct Param {
    pub(crate) mods: Modifiers,
    pub(crate) ty: TypeRef,
    pub(crate) name: String,
    pub(crate) annotations: Vec<AnnotationUse>,
}

impl Param {
    pub fn mods(&self) -> Modifiers {
        self.mods
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn annotations(&self) -> &[AnnotationUse] {
        &self.annotations
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    mods: Modifiers,
    ty: TypeRef,
    name: String,
    init: Option<Expr>,
    annotations: Vec<AnnotationUse>,
    javadoc: Vec<String>,
}

impl Field {
    pub fn new(mods: Modifiers, ty: impl Into<TypeRef>, name: &str) -> Result<Self> {
        let ty = ty.into();
        check_identifier(name)?;
        mods.validate(ModifierTarget::Field)?;
        if ty.is_void_like() {
            return Err(CodeModelError::InvalidType(format!(
                "field {name} declared as {}",
                ty.full_name()
            )));
        }
        Ok(Self {
            mods,
            ty,
            name: name.to_string(),
            init: None,
            annotations: Vec::new(),
            javadoc: Vec::new(),
        })
    }

    pub fn init(mut self, value: impl Into<Expr>) -> Self {
        self.init = Some(value.into());
        self
    }

    pub fn annotate(mut self, annotation: AnnotationUse) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn javadoc(mut self, line: &str) -> Self {
        self.javadoc.push(line.to_string());
        self
    }

    pub fn mods(&self) -> Modifiers {
        self.mods
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initializer(&self) -> Option<&Expr> {
        self.init.as_ref()
    }

    pub fn annotations(&self) -> &[AnnotationUse] {
        &self.annotations
    }

    pub fn javadoc_lines(&self) -> &[String] {
        &self.javadoc
    }

    pub fn var(&self) -> Var {
        Var::new(&self.name, self.ty.clone())
    }
}

/// A method or, when it has no return type, a constructor.
#[derive(Debug, Clone)]
pub struct Method {
    mods: Modifiers,
    type_params: Vec<TypeVar>,
    return_type: Option<TypeRef>,
    name: String,
    params: Vec<Param>,
    varargs: Option<Param>,
    throws: Vec<TypeRef>,
    body: Option<Block>,
    annotations: Vec<AnnotationUse>,
    javadoc: Vec<String>,
    default_value: Option<AnnotationValue>,
}

impl Method {
    pub fn new(mods: Modifiers, return_type: impl Into<TypeRef>, name: &str) -> Result<Self> {
        check_identifier(name)?;
        mods.validate(ModifierTarget::Method)?;
        let return_type = return_type.into();
        if return_type.is_array() && return_type.is_void_like() {
            return Err(CodeModelError::InvalidType(format!(
                "method {name} returns an array of void"
            )));
        }
        Ok(Self::build(mods, Some(return_type), name))
    }

    /// A constructor; the name is taken from the class it is added to.
    pub fn constructor(mods: Modifiers) -> Result<Self> {
        mods.validate(ModifierTarget::Constructor)?;
        Ok(Self::build(mods, None, ""))
    }

    fn build(mods: Modifiers, return_type: Option<TypeRef>, name: &str) -> Self {
        Self {
            mods,
            type_params: Vec::new(),
            return_type,
            name: name.to_string(),
            params: Vec::new(),
            varargs: None,
            throws: Vec::new(),
            body: None,
            annotations: Vec::new(),
            javadoc: Vec::new(),
            default_value: None,
        }
    }

    /// Declare a method type parameter.
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

    pub fn param(&mut self, mods: Modifiers, ty: impl Into<TypeRef>, name: &str) -> Result<Var> {
        self.annotated_param(mods, ty, name, Vec::new())
    }

    pub fn annotated_param(
        &mut self,
        mods: Modifiers,
        ty: impl Into<TypeRef>,
        name: &str,
        annotations: Vec<AnnotationUse>,
    ) -> Result<Var> {
        if self.varargs.is_some() {
            return Err(CodeModelError::InvalidType(format!(
                "parameter {name} follows the varargs parameter"
            )));
        }
        let param = self.checked_param(mods, ty.into(), name, annotations)?;
        let var = Var::new(name, param.ty.clone());
        self.params.push(param);
        Ok(var)
    }

    /// The trailing `T... name` parameter; `element` is `T`.
    pub fn varargs(&mut self, element: impl Into<TypeRef>, name: &str) -> Result<Var> {
        if self.varargs.is_some() {
            return Err(self.duplicate("...".to_string()));
        }
        let param = self.checked_param(Modifiers::empty(), element.into(), name, Vec::new())?;
        let var = Var::new(name, param.ty.array());
        self.varargs = Some(param);
        Ok(var)
    }

    fn checked_param(
        &self,
        mods: Modifiers,
        ty: TypeRef,
        name: &str,
        annotations: Vec<AnnotationUse>,
    ) -> Result<Param> {
        check_identifier(name)?;
        mods.validate(ModifierTarget::Local)?;
        if ty.is_void_like() {
            return Err(CodeModelError::InvalidType(format!(
                "parameter {name} declared as {}",
                ty.full_name()
            )));
        }
        if self.all_params().any(|p| p.name == name) {
            return Err(self.duplicate(name.to_string()));
        }
        Ok(Param {
            mods,
            ty,
            name: name.to_string(),
            annotations,
        })
    }

    pub fn throws(&mut self, exception: impl Into<TypeRef>) -> &mut Self {
        let exception = exception.into();
        if !self.throws.contains(&exception) {
            self.throws.push(exception);
        }
        self
    }

    /// The body, created on first access. A method whose body was never
    /// requested is written without one (`;`).
    pub fn body(&mut self) -> &mut Block {
        self.body.get_or_insert_with(Block::new)
    }

    pub fn annotate(&mut self, annotation: AnnotationUse) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    pub fn javadoc(&mut self, line: &str) -> &mut Self {
        self.javadoc.push(line.to_string());
        self
    }

    /// Default value of an annotation type member.
    pub fn declare_default(&mut self, value: impl Into<AnnotationValue>) -> &mut Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn mods(&self) -> Modifiers {
        self.mods
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_constructor_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn return_type(&self) -> Option<&TypeRef> {
        self.return_type.as_ref()
    }

    pub fn type_params(&self) -> &[TypeVar] {
        &self.type_params
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn varargs_param(&self) -> Option<&Param> {
        self.varargs.as_ref()
    }

    fn all_params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().chain(self.varargs.iter())
    }

    pub fn throws_list(&self) -> &[TypeRef] {
        &self.throws
    }

    pub fn body_block(&self) -> Option<&Block> {
        self.body.as_ref()
    }

    pub fn annotations(&self) -> &[AnnotationUse] {
        &self.annotations
    }

    pub fn javadoc_lines(&self) -> &[String] {
        &self.javadoc
    }

    pub fn default_value(&self) -> Option<&AnnotationValue> {
        self.default_value.as_ref()
    }

    /// Erased parameter types, varargs as an array.
    pub fn erased_signature(&self) -> Vec<TypeRef> {
        self.params
            .iter()
            .map(|p| p.ty.erasure())
            .chain(self.varargs.iter().map(|p| p.ty.array().erasure()))
            .collect()
    }

    /// True when the erased parameter types equal the erasures of `types`.
    pub fn has_signature(&self, types: &[TypeRef]) -> bool {
        let own = self.erased_signature();
        own.len() == types.len() && own.iter().zip(types).all(|(a, b)| *a == b.erasure())
    }

    /// `name(A, B)` with erased full names, used in error messages and logs.
    pub fn signature_display(&self) -> String {
        let params: Vec<String> = self
            .erased_signature()
            .iter()
            .map(TypeRef::full_name)
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }

    fn duplicate(&self, member: String) -> CodeModelError {
        CodeModelError::DuplicateMember {
            owner: if self.is_constructor() {
                "constructor".to_string()
            } else {
                format!("method {}", self.name)
            },
            member,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::ClassRef;

    fn list_of(arg: TypeRef) -> TypeRef {
        TypeRef::class(ClassRef::external("java.util.List").unwrap())
            .narrow([arg])
            .unwrap()
    }

    #[test]
    fn test_params_are_validated() {
        let mut m = Method::new(Modifiers::PUBLIC, TypeRef::void(), "run").unwrap();
        m.param(Modifiers::FINAL, TypeRef::int(), "a").unwrap();
        assert!(m.param(Modifiers::empty(), TypeRef::int(), "a").is_err());
        assert!(m.param(Modifiers::empty(), TypeRef::void(), "b").is_err());
        assert!(m.param(Modifiers::empty(), TypeRef::int(), "new").is_err());
        m.varargs(TypeRef::int(), "rest").unwrap();
        assert!(m.param(Modifiers::empty(), TypeRef::int(), "c").is_err());
        assert!(m.varargs(TypeRef::int(), "more").is_err());
    }

    #[test]
    fn test_signature_matching_uses_erasure() {
        let mut m = Method::new(Modifiers::empty(), TypeRef::void(), "accept").unwrap();
        let t = m.generify("T").unwrap();
        m.param(Modifiers::empty(), list_of(t.as_type()), "items").unwrap();
        m.param(Modifiers::empty(), t.as_type(), "item").unwrap();

        let raw_list = TypeRef::parse("java.util.List").unwrap();
        assert!(m.has_signature(&[raw_list.clone(), TypeRef::object()]));
        assert!(m.has_signature(&[list_of(TypeRef::object()), TypeRef::object()]));
        assert!(!m.has_signature(&[raw_list]));
        assert_eq!(
            m.signature_display(),
            "accept(java.util.List, java.lang.Object)"
        );
    }

    #[test]
    fn test_constructor_modifiers() {
        assert!(Method::constructor(Modifiers::PUBLIC).is_ok());
        assert!(Method::constructor(Modifiers::STATIC).is_err());
        assert!(Method::constructor(Modifiers::PRIVATE).unwrap().is_constructor());
    }
}
