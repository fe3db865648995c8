//! Expressions used inside method bodies, initializers and annotations.

use crate::error::{CodeModelError, Result, check_identifier};
use crate::model::stmt::Block;
use crate::model::types::TypeRef;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    Complement,
    PreIncr,
    PreDecr,
    PostIncr,
    PostDecr,
}

impl UnaryOp {
    pub fn token(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::Complement => "~",
            UnaryOp::PreIncr | UnaryOp::PostIncr => "++",
            UnaryOp::PreDecr | UnaryOp::PostDecr => "--",
        }
    }

    pub fn is_postfix(self) -> bool {
        matches!(self, UnaryOp::PostIncr | UnaryOp::PostDecr)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    UShr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
}

impl BinaryOp {
    pub fn token(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl AssignOp {
    pub fn token(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
        }
    }
}

/// What an [`Invocation`] calls.
#[derive(Debug, Clone)]
pub enum Callee {
    /// `name(...)`
    Bare(String),
    /// `target.name(...)`
    Method { target: Box<Expr>, name: String },
    /// `Type.name(...)`
    Static { owner: TypeRef, name: String },
    /// `new Type(...)`
    New(TypeRef),
    /// `super(...)` inside a constructor.
    SuperConstructor,
    /// `this(...)` inside a constructor.
    ThisConstructor,
}

#[derive(Debug, Clone)]
pub struct Invocation {
    callee: Callee,
    type_args: Vec<TypeRef>,
    args: Vec<Expr>,
}

impl Invocation {
    fn new(callee: Callee) -> Self {
        Self {
            callee,
            type_args: Vec::new(),
            args: Vec::new(),
        }
    }

    pub fn super_constructor() -> Self {
        Self::new(Callee::SuperConstructor)
    }

    pub fn this_constructor() -> Self {
        Self::new(Callee::ThisConstructor)
    }

    pub fn arg(mut self, arg: impl Into<Expr>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, E>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Explicit type arguments, `target.<T>name(...)`.
    pub fn type_arg(mut self, ty: impl Into<TypeRef>) -> Self {
        self.type_args.push(ty.into());
        self
    }

    /// The invocation as an expression, to chain further calls on its result.
    pub fn into_expr(self) -> Expr {
        Expr::Invoke(self)
    }

    pub fn callee(&self) -> &Callee {
        &self.callee
    }

    pub fn type_args(&self) -> &[TypeRef] {
        &self.type_args
    }

    pub fn arguments(&self) -> &[Expr] {
        &self.args
    }
}

#[derive(Debug, Clone)]
pub struct LambdaParam {
    pub ty: Option<TypeRef>,
    pub name: String,
}

/// A lambda with either an expression or a block body.
#[derive(Debug, Clone)]
pub struct Lambda {
    params: Vec<LambdaParam>,
    expr_body: Option<Box<Expr>>,
    block: Block,
}

impl Lambda {
    pub fn new() -> Self {
        Self {
            params: Vec::new(),
            expr_body: None,
            block: Block::new(),
        }
    }

    /// An untyped parameter.
    pub fn param(&mut self, name: &str) -> Result<Var> {
        self.push_param(None, name)
    }

    /// A parameter with an explicit type. Java requires either all or none
    /// of the parameters to be typed.
    pub fn typed_param(&mut self, ty: impl Into<TypeRef>, name: &str) -> Result<Var> {
        let ty = ty.into();
        self.push_param(Some(ty), name)
    }

    fn push_param(&mut self, ty: Option<TypeRef>, name: &str) -> Result<Var> {
        check_identifier(name)?;
        if let Some(first) = self.params.first()
            && first.ty.is_some() != ty.is_some()
        {
            return Err(CodeModelError::InvalidType(format!(
                "lambda parameter {name} mixes typed and untyped parameters"
            )));
        }
        if self.params.iter().any(|p| p.name == name) {
            return Err(CodeModelError::DuplicateMember {
                owner: "lambda".to_string(),
                member: name.to_string(),
            });
        }
        let var = Var {
            name: name.to_string(),
            ty: ty.clone(),
        };
        self.params.push(LambdaParam {
            ty,
            name: name.to_string(),
        });
        Ok(var)
    }

    /// Use a single expression as the body.
    pub fn returns(mut self, body: impl Into<Expr>) -> Self {
        self.expr_body = Some(Box::new(body.into()));
        self
    }

    /// The block body. Drops an expression body set earlier.
    pub fn body(&mut self) -> &mut Block {
        self.expr_body = None;
        &mut self.block
    }

    pub fn params(&self) -> &[LambdaParam] {
        &self.params
    }

    pub fn expr_body(&self) -> Option<&Expr> {
        self.expr_body.as_deref()
    }

    pub fn block_body(&self) -> &Block {
        &self.block
    }
}

impl Default for Lambda {
    fn default() -> Self {
        Self::new()
    }
}

/// A named value in scope: local variable, parameter, field or resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Var {
    name: String,
    ty: Option<TypeRef>,
}

impl Var {
    pub(crate) fn new(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            ty: Some(ty),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type; `None` for untyped lambda parameters.
    pub fn ty(&self) -> Option<&TypeRef> {
        self.ty.as_ref()
    }

    pub fn expr(&self) -> Expr {
        Expr::Name(self.name.clone())
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    /// A local variable, parameter or unqualified field.
    Name(String),
    This,
    Super,
    Field {
        target: Box<Expr>,
        name: String,
    },
    StaticField {
        owner: TypeRef,
        name: String,
    },
    Invoke(Invocation),
    NewArray {
        element: TypeRef,
        dims: Vec<Expr>,
        init: Option<Vec<Expr>>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Cast {
        ty: TypeRef,
        expr: Box<Expr>,
    },
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    InstanceOf {
        expr: Box<Expr>,
        ty: TypeRef,
    },
    Index {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    ClassLiteral(TypeRef),
    Lambda(Box<Lambda>),
}

impl Expr {
    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn this() -> Self {
        Expr::This
    }

    pub fn super_ref() -> Self {
        Expr::Super
    }

    /// Reference a variable or field by name.
    pub fn name(name: &str) -> Result<Self> {
        check_identifier(name)?;
        Ok(Expr::Name(name.to_string()))
    }

    /// `self.name`
    pub fn field(self, name: &str) -> Result<Self> {
        check_identifier(name)?;
        Ok(Expr::Field {
            target: Box::new(self),
            name: name.to_string(),
        })
    }

    /// `Type.name`, also used for enum constants.
    pub fn static_field(owner: impl Into<TypeRef>, name: &str) -> Result<Self> {
        check_identifier(name)?;
        Ok(Expr::StaticField {
            owner: owner.into(),
            name: name.to_string(),
        })
    }

    /// `self.name(...)`
    pub fn invoke(self, name: &str) -> Result<Invocation> {
        check_identifier(name)?;
        Ok(Invocation::new(Callee::Method {
            target: Box::new(self),
            name: name.to_string(),
        }))
    }

    /// `name(...)` with no target.
    pub fn call(name: &str) -> Result<Invocation> {
        check_identifier(name)?;
        Ok(Invocation::new(Callee::Bare(name.to_string())))
    }

    /// `Type.name(...)`
    pub fn static_call(owner: impl Into<TypeRef>, name: &str) -> Result<Invocation> {
        check_identifier(name)?;
        Ok(Invocation::new(Callee::Static {
            owner: owner.into(),
            name: name.to_string(),
        }))
    }

    /// `new Type(...)`. Narrow the type with no arguments for the diamond.
    pub fn new_instance(ty: impl Into<TypeRef>) -> Result<Invocation> {
        let ty = ty.into();
        if ty.as_class().is_none() {
            return Err(CodeModelError::InvalidType(format!(
                "cannot instantiate {}",
                ty.full_name()
            )));
        }
        Ok(Invocation::new(Callee::New(ty)))
    }

    /// `new T[size]`
    pub fn new_array(element: impl Into<TypeRef>, size: impl Into<Expr>) -> Result<Self> {
        let element = checked_array_element(element.into())?;
        Ok(Expr::NewArray {
            element,
            dims: vec![size.into()],
            init: None,
        })
    }

    /// `new T[] {a, b, ...}`
    pub fn array_init<I, E>(element: impl Into<TypeRef>, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        let element = checked_array_element(element.into())?;
        Ok(Expr::NewArray {
            element,
            dims: Vec::new(),
            init: Some(items.into_iter().map(Into::into).collect()),
        })
    }

    pub fn class_literal(ty: impl Into<TypeRef>) -> Self {
        Expr::ClassLiteral(ty.into())
    }

    pub fn lambda(lambda: Lambda) -> Self {
        Expr::Lambda(Box::new(lambda))
    }

    pub fn cond(cond: impl Into<Expr>, then: impl Into<Expr>, otherwise: impl Into<Expr>) -> Self {
        Expr::Conditional {
            cond: Box::new(cond.into()),
            then: Box::new(then.into()),
            otherwise: Box::new(otherwise.into()),
        }
    }

    pub fn unary(self, op: UnaryOp) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(self),
        }
    }

    pub fn not(self) -> Self {
        self.unary(UnaryOp::Not)
    }

    pub fn neg(self) -> Self {
        self.unary(UnaryOp::Neg)
    }

    /// Postfix `++`.
    pub fn incr(self) -> Self {
        self.unary(UnaryOp::PostIncr)
    }

    /// Postfix `--`.
    pub fn decr(self) -> Self {
        self.unary(UnaryOp::PostDecr)
    }

    pub fn binary(self, op: BinaryOp, right: impl Into<Expr>) -> Self {
        Expr::Binary {
            op,
            left: Box::new(self),
            right: Box::new(right.into()),
        }
    }

    pub fn plus(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Add, right)
    }

    pub fn minus(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Sub, right)
    }

    pub fn mul(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Mul, right)
    }

    pub fn lt(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Lt, right)
    }

    pub fn gt(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Gt, right)
    }

    pub fn eq(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    pub fn ne(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Ne, right)
    }

    pub fn and(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::And, right)
    }

    pub fn or(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    pub fn assign(self, value: impl Into<Expr>) -> Self {
        self.assign_op(AssignOp::Assign, value)
    }

    pub fn assign_op(self, op: AssignOp, value: impl Into<Expr>) -> Self {
        Expr::Assign {
            op,
            target: Box::new(self),
            value: Box::new(value.into()),
        }
    }

    pub fn cast(self, ty: impl Into<TypeRef>) -> Self {
        Expr::Cast {
            ty: ty.into(),
            expr: Box::new(self),
        }
    }

    pub fn instance_of(self, ty: impl Into<TypeRef>) -> Self {
        Expr::InstanceOf {
            expr: Box::new(self),
            ty: ty.into(),
        }
    }

    pub fn index(self, index: impl Into<Expr>) -> Self {
        Expr::Index {
            array: Box::new(self),
            index: Box::new(index.into()),
        }
    }

    /// Expressions that need parentheses when used as an operand.
    pub(crate) fn is_compound(&self) -> bool {
        matches!(
            self,
            Expr::Binary { .. }
                | Expr::Assign { .. }
                | Expr::Cast { .. }
                | Expr::Conditional { .. }
                | Expr::InstanceOf { .. }
                | Expr::Lambda(_)
        )
    }
}

fn checked_array_element(element: TypeRef) -> Result<TypeRef> {
    if element.is_void_like() {
        return Err(CodeModelError::InvalidType("array of void".to_string()));
    }
    Ok(element)
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        Expr::Literal(literal)
    }
}

impl From<Invocation> for Expr {
    fn from(invocation: Invocation) -> Self {
        Expr::Invoke(invocation)
    }
}

impl From<&Var> for Expr {
    fn from(var: &Var) -> Self {
        var.expr()
    }
}

impl From<Var> for Expr {
    fn from(var: Var) -> Self {
        var.expr()
    }
}

impl From<Lambda> for Expr {
    fn from(lambda: Lambda) -> Self {
        Expr::lambda(lambda)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Literal(Literal::Boolean(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Literal(Literal::Int(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Literal(Literal::Long(value))
    }
}

impl From<f32> for Expr {
    fn from(value: f32) -> Self {
        Expr::Literal(Literal::Float(value))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Literal(Literal::Double(value))
    }
}

impl From<char> for Expr {
    fn from(value: char) -> Self {
        Expr::Literal(Literal::Char(value))
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Expr::Literal(Literal::Str(value.to_string()))
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Expr::Literal(Literal::Str(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_validate_names() {
        assert!(Expr::name("count").is_ok());
        assert!(Expr::name("class").is_err());
        assert!(Expr::this().field("1x").is_err());
        assert!(Expr::call("goto").is_err());
    }

    #[test]
    fn test_new_instance_requires_a_class() {
        assert!(Expr::new_instance(TypeRef::int()).is_err());
        assert!(Expr::new_array(TypeRef::void(), 3).is_err());
        assert!(Expr::new_array(TypeRef::int(), 3).is_ok());
    }

    #[test]
    fn test_lambda_params_must_agree_on_typing() {
        let mut lambda = Lambda::new();
        lambda.param("a").unwrap();
        assert!(lambda.typed_param(TypeRef::int(), "b").is_err());
        assert!(lambda.param("a").is_err());
    }

    #[test]
    fn test_compound_classification() {
        let sum = Expr::from(1).plus(2);
        assert!(sum.is_compound());
        assert!(!Expr::from(1).neg().is_compound());
        assert!(!Expr::call("f").map(Expr::from).unwrap().is_compound());
    }
}
