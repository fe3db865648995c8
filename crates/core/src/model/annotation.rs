use crate::error::{Result, check_identifier};
use crate::model::expr::Expr;
use crate::model::types::{ClassRef, TypeRef};
use indexmap::IndexMap;

/// The parameter written implicitly, `@A(x)` instead of `@A(value = x)`.
pub const VALUE: &str = "value";

#[derive(Debug, Clone)]
pub enum AnnotationValue {
    /// A constant expression: literal, enum constant or class literal.
    Expr(Expr),
    Array(Vec<AnnotationValue>),
    Annotation(AnnotationUse),
}

impl AnnotationValue {
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AnnotationValue>,
    {
        AnnotationValue::Array(items.into_iter().map(Into::into).collect())
    }
}

macro_rules! value_from_expr {
    ($($ty:ty),* $(,)?) => {
        $(impl From<$ty> for AnnotationValue {
            fn from(value: $ty) -> Self {
                AnnotationValue::Expr(value.into())
            }
        })*
    };
}

value_from_expr!(Expr, bool, i32, i64, f32, f64, char, &str, String);

impl From<AnnotationUse> for AnnotationValue {
    fn from(annotation: AnnotationUse) -> Self {
        AnnotationValue::Annotation(annotation)
    }
}

/// An annotation applied to a declaration.
#[derive(Debug, Clone)]
pub struct AnnotationUse {
    annotation: ClassRef,
    params: IndexMap<String, AnnotationValue>,
}

impl AnnotationUse {
    pub fn new(annotation: ClassRef) -> Self {
        Self {
            annotation,
            params: IndexMap::new(),
        }
    }

    /// Set a named parameter. Setting the same name again replaces the value.
    pub fn param(mut self, name: &str, value: impl Into<AnnotationValue>) -> Result<Self> {
        check_identifier(name)?;
        self.params.insert(name.to_string(), value.into());
        Ok(self)
    }

    /// Set the implicit `value` parameter.
    pub fn value(mut self, value: impl Into<AnnotationValue>) -> Self {
        self.params.insert(VALUE.to_string(), value.into());
        self
    }

    pub fn annotation(&self) -> &ClassRef {
        &self.annotation
    }

    pub fn annotation_type(&self) -> TypeRef {
        TypeRef::class(self.annotation.clone())
    }

    pub fn params(&self) -> &IndexMap<String, AnnotationValue> {
        &self.params
    }

    /// True when the parameter list is written as `(x)`.
    pub fn is_single_value(&self) -> bool {
        self.params.len() == 1 && self.params.contains_key(VALUE)
    }
}
