//! Statements and blocks.

use crate::error::{CodeModelError, Result, check_identifier};
use crate::model::expr::{Expr, Var};
use crate::model::mods::{ModifierTarget, Modifiers};
use crate::model::types::TypeRef;

/// A declared local variable, loop variable or resource.
#[derive(Debug, Clone)]
pub struct LocalVar {
    pub(crate) mods: Modifiers,
    pub(crate) ty: TypeRef,
    pub(crate) name: String,
    pub(crate) init: Option<Expr>,
}

impl LocalVar {
    pub(crate) fn new(mods: Modifiers, ty: TypeRef, name: &str, init: Option<Expr>) -> Result<Self> {
        check_identifier(name)?;
        mods.validate(ModifierTarget::Local)?;
        if ty.is_void_like() {
            return Err(CodeModelError::InvalidType(format!(
                "variable {name} declared as {}",
                ty.full_name()
            )));
        }
        Ok(Self {
            mods,
            ty,
            name: name.to_string(),
            init,
        })
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

    pub fn init(&self) -> Option<&Expr> {
        self.init.as_ref()
    }

    pub fn var(&self) -> Var {
        Var::new(&self.name, self.ty.clone())
    }
}

#[derive(Debug, Clone)]
pub enum Statement {
    Local(LocalVar),
    Expr(Expr),
    Return(Option<Expr>),
    Throw(Expr),
    Break(Option<String>),
    Continue(Option<String>),
    If(If),
    While(WhileLoop),
    DoWhile(DoWhileLoop),
    For(ForLoop),
    ForEach(ForEach),
    Try(Try),
    Switch(Switch),
    Block(Block),
    Labeled { label: String, body: Box<Statement> },
    Comment(String),
}

macro_rules! statement_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(impl From<$ty> for Statement {
            fn from(value: $ty) -> Self {
                Statement::$variant(value)
            }
        })*
    };
}

statement_from!(
    Expr(Expr),
    If(If),
    While(WhileLoop),
    DoWhile(DoWhileLoop),
    For(ForLoop),
    ForEach(ForEach),
    Try(Try),
    Switch(Switch),
    Block(Block),
);

impl From<crate::model::expr::Invocation> for Statement {
    fn from(invocation: crate::model::expr::Invocation) -> Self {
        Statement::Expr(Expr::Invoke(invocation))
    }
}

/// An ordered list of statements.
#[derive(Debug, Clone, Default)]
pub struct Block {
    statements: Vec<Statement>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn add(&mut self, statement: impl Into<Statement>) -> &mut Self {
        self.statements.push(statement.into());
        self
    }

    /// Declare a local variable.
    pub fn decl(
        &mut self,
        mods: Modifiers,
        ty: impl Into<TypeRef>,
        name: &str,
        init: Option<Expr>,
    ) -> Result<Var> {
        let local = LocalVar::new(mods, ty.into(), name, init)?;
        let var = local.var();
        self.statements.push(Statement::Local(local));
        Ok(var)
    }

    pub fn ret(&mut self, value: impl Into<Expr>) -> &mut Self {
        self.add(Statement::Return(Some(value.into())))
    }

    pub fn ret_void(&mut self) -> &mut Self {
        self.add(Statement::Return(None))
    }

    pub fn throw(&mut self, exception: impl Into<Expr>) -> &mut Self {
        self.add(Statement::Throw(exception.into()))
    }

    pub fn brk(&mut self, label: Option<&str>) -> Result<&mut Self> {
        let label = checked_label(label)?;
        Ok(self.add(Statement::Break(label)))
    }

    pub fn cont(&mut self, label: Option<&str>) -> Result<&mut Self> {
        let label = checked_label(label)?;
        Ok(self.add(Statement::Continue(label)))
    }

    pub fn labeled(&mut self, label: &str, statement: impl Into<Statement>) -> Result<&mut Self> {
        check_identifier(label)?;
        Ok(self.add(Statement::Labeled {
            label: label.to_string(),
            body: Box::new(statement.into()),
        }))
    }

    /// A `//` comment; embedded newlines start new comment lines.
    pub fn comment(&mut self, text: &str) -> &mut Self {
        self.add(Statement::Comment(text.to_string()))
    }
}

fn checked_label(label: Option<&str>) -> Result<Option<String>> {
    label
        .map(|l| check_identifier(l).map(|_| l.to_string()))
        .transpose()
}

/// `if` with optional `else if` branches and a final `else`.
#[derive(Debug, Clone)]
pub struct If {
    branches: Vec<(Expr, Block)>,
    otherwise: Option<Block>,
}

impl If {
    pub fn new(cond: impl Into<Expr>) -> Self {
        Self {
            branches: vec![(cond.into(), Block::new())],
            otherwise: None,
        }
    }

    pub fn then(&mut self) -> &mut Block {
        &mut self.branches[0].1
    }

    pub fn else_if(&mut self, cond: impl Into<Expr>) -> &mut Block {
        self.branches.push((cond.into(), Block::new()));
        let last = self.branches.len() - 1;
        &mut self.branches[last].1
    }

    pub fn otherwise(&mut self) -> &mut Block {
        self.otherwise.get_or_insert_with(Block::new)
    }

    pub fn branches(&self) -> &[(Expr, Block)] {
        &self.branches
    }

    pub fn else_block(&self) -> Option<&Block> {
        self.otherwise.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct WhileLoop {
    cond: Expr,
    body: Block,
}

impl WhileLoop {
    pub fn new(cond: impl Into<Expr>) -> Self {
        Self {
            cond: cond.into(),
            body: Block::new(),
        }
    }

    pub fn body(&mut self) -> &mut Block {
        &mut self.body
    }

    pub fn cond(&self) -> &Expr {
        &self.cond
    }

    pub fn block(&self) -> &Block {
        &self.body
    }
}

#[derive(Debug, Clone)]
pub struct DoWhileLoop {
    body: Block,
    cond: Expr,
}

impl DoWhileLoop {
    pub fn new(cond: impl Into<Expr>) -> Self {
        Self {
            body: Block::new(),
            cond: cond.into(),
        }
    }

    pub fn body(&mut self) -> &mut Block {
        &mut self.body
    }

    pub fn cond(&self) -> &Expr {
        &self.cond
    }

    pub fn block(&self) -> &Block {
        &self.body
    }
}

#[derive(Debug, Clone)]
pub enum ForInit {
    /// Declarations sharing one type, `int i = 0, j = 1`.
    Locals(Vec<LocalVar>),
    Exprs(Vec<Expr>),
}

/// The classic three-clause `for` loop.
#[derive(Debug, Clone, Default)]
pub struct ForLoop {
    init: Option<ForInit>,
    test: Option<Expr>,
    update: Vec<Expr>,
    body: Block,
}

impl ForLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a loop variable. All declared variables share one type.
    pub fn init_var(&mut self, ty: impl Into<TypeRef>, name: &str, value: impl Into<Expr>) -> Result<Var> {
        let local = LocalVar::new(Modifiers::empty(), ty.into(), name, Some(value.into()))?;
        let var = local.var();
        match &mut self.init {
            None => self.init = Some(ForInit::Locals(vec![local])),
            Some(ForInit::Locals(locals)) => {
                if locals.iter().any(|l| l.ty != local.ty) {
                    return Err(CodeModelError::InvalidType(format!(
                        "for-loop variable {name} must share the type of earlier variables"
                    )));
                }
                locals.push(local);
            }
            Some(ForInit::Exprs(_)) => {
                return Err(CodeModelError::InvalidType(
                    "for-loop init mixes declarations and expressions".to_string(),
                ));
            }
        }
        Ok(var)
    }

    /// An expression in the init clause, e.g. `i = 0` for an existing `i`.
    pub fn init_expr(&mut self, expr: impl Into<Expr>) -> Result<&mut Self> {
        match &mut self.init {
            None => self.init = Some(ForInit::Exprs(vec![expr.into()])),
            Some(ForInit::Exprs(exprs)) => exprs.push(expr.into()),
            Some(ForInit::Locals(_)) => {
                return Err(CodeModelError::InvalidType(
                    "for-loop init mixes declarations and expressions".to_string(),
                ));
            }
        }
        Ok(self)
    }

    pub fn test(&mut self, cond: impl Into<Expr>) -> &mut Self {
        self.test = Some(cond.into());
        self
    }

    pub fn update(&mut self, expr: impl Into<Expr>) -> &mut Self {
        self.update.push(expr.into());
        self
    }

    pub fn body(&mut self) -> &mut Block {
        &mut self.body
    }

    pub fn init_clause(&self) -> Option<&ForInit> {
        self.init.as_ref()
    }

    pub fn test_clause(&self) -> Option<&Expr> {
        self.test.as_ref()
    }

    pub fn update_clause(&self) -> &[Expr] {
        &self.update
    }

    pub fn block(&self) -> &Block {
        &self.body
    }
}

/// `for (final T name : collection) { ... }`
#[derive(Debug, Clone)]
pub struct ForEach {
    var: LocalVar,
    collection: Expr,
    body: Block,
}

impl ForEach {
    /// The loop variable is declared `final`.
    pub fn new(ty: impl Into<TypeRef>, name: &str, collection: impl Into<Expr>) -> Result<Self> {
        Ok(Self {
            var: LocalVar::new(Modifiers::FINAL, ty.into(), name, None)?,
            collection: collection.into(),
            body: Block::new(),
        })
    }

    pub fn var(&self) -> Var {
        self.var.var()
    }

    pub fn body(&mut self) -> &mut Block {
        &mut self.body
    }

    pub fn local(&self) -> &LocalVar {
        &self.var
    }

    pub fn collection(&self) -> &Expr {
        &self.collection
    }

    pub fn block(&self) -> &Block {
        &self.body
    }
}

#[derive(Debug, Clone)]
pub struct Catch {
    types: Vec<TypeRef>,
    param: String,
    body: Block,
}

impl Catch {
    /// Add an alternative for a multi-catch, `A | B e`.
    pub fn or(&mut self, exception: impl Into<TypeRef>) -> &mut Self {
        self.types.push(exception.into());
        self
    }

    pub fn param(&self) -> Var {
        let ty = match self.types.as_slice() {
            [single] => single.clone(),
            _ => TypeRef::class(crate::model::types::ClassRef::java_lang("Throwable")),
        };
        Var::new(&self.param, ty)
    }

    pub fn body(&mut self) -> &mut Block {
        &mut self.body
    }

    pub fn types(&self) -> &[TypeRef] {
        &self.types
    }

    pub fn param_name(&self) -> &str {
        &self.param
    }

    pub fn block(&self) -> &Block {
        &self.body
    }
}

/// `try` with optional resources, catch clauses and `finally`.
#[derive(Debug, Clone, Default)]
pub struct Try {
    resources: Vec<LocalVar>,
    body: Block,
    catches: Vec<Catch>,
    finally: Option<Block>,
}

impl Try {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a resource. Resources are `final` and closed in reverse order
    /// of declaration.
    pub fn resource(&mut self, ty: impl Into<TypeRef>, name: &str, init: impl Into<Expr>) -> Result<Var> {
        let ty = ty.into();
        if self.resources.iter().any(|r| r.name == name) {
            return Err(CodeModelError::DuplicateMember {
                owner: "try".to_string(),
                member: name.to_string(),
            });
        }
        let local = LocalVar::new(Modifiers::FINAL, ty, name, Some(init.into()))?;
        let var = local.var();
        self.resources.push(local);
        Ok(var)
    }

    pub fn body(&mut self) -> &mut Block {
        &mut self.body
    }

    pub fn catch(&mut self, exception: impl Into<TypeRef>, param: &str) -> Result<&mut Catch> {
        check_identifier(param)?;
        self.catches.push(Catch {
            types: vec![exception.into()],
            param: param.to_string(),
            body: Block::new(),
        });
        let last = self.catches.len() - 1;
        Ok(&mut self.catches[last])
    }

    pub fn finally(&mut self) -> &mut Block {
        self.finally.get_or_insert_with(Block::new)
    }

    pub fn resources(&self) -> &[LocalVar] {
        &self.resources
    }

    pub fn block(&self) -> &Block {
        &self.body
    }

    pub fn catches(&self) -> &[Catch] {
        &self.catches
    }

    pub fn finally_block(&self) -> Option<&Block> {
        self.finally.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct Case {
    /// `None` for `default`.
    label: Option<Expr>,
    body: Block,
}

impl Case {
    pub fn label(&self) -> Option<&Expr> {
        self.label.as_ref()
    }

    pub fn block(&self) -> &Block {
        &self.body
    }
}

#[derive(Debug, Clone)]
pub struct Switch {
    selector: Expr,
    cases: Vec<Case>,
}

impl Switch {
    pub fn new(selector: impl Into<Expr>) -> Self {
        Self {
            selector: selector.into(),
            cases: Vec::new(),
        }
    }

    pub fn case(&mut self, label: impl Into<Expr>) -> &mut Block {
        self.push_case(Some(label.into()))
    }

    pub fn default_case(&mut self) -> Result<&mut Block> {
        if self.cases.iter().any(|c| c.label.is_none()) {
            return Err(CodeModelError::DuplicateMember {
                owner: "switch".to_string(),
                member: "default".to_string(),
            });
        }
        Ok(self.push_case(None))
    }

    fn push_case(&mut self, label: Option<Expr>) -> &mut Block {
        self.cases.push(Case {
            label,
            body: Block::new(),
        });
        let last = self.cases.len() - 1;
        &mut self.cases[last].body
    }

    pub fn selector(&self) -> &Expr {
        &self.selector
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decl_rejects_void_and_bad_names() {
        let mut block = Block::new();
        assert!(block.decl(Modifiers::empty(), TypeRef::void(), "x", None).is_err());
        assert!(block.decl(Modifiers::empty(), TypeRef::int(), "int", None).is_err());
        assert!(block.decl(Modifiers::STATIC, TypeRef::int(), "x", None).is_err());
        let var = block.decl(Modifiers::FINAL, TypeRef::int(), "x", Some(Expr::from(1))).unwrap();
        assert_eq!(var.name(), "x");
        assert_eq!(block.statements().len(), 1);
    }

    #[test]
    fn test_for_loop_init_shares_one_type() {
        let mut fl = ForLoop::new();
        fl.init_var(TypeRef::int(), "i", 0).unwrap();
        fl.init_var(TypeRef::int(), "j", 1).unwrap();
        assert!(fl.init_var(TypeRef::long(), "k", 2i64).is_err());
        assert!(fl.init_expr(Expr::from(1)).is_err());
    }

    #[test]
    fn test_try_resources_keep_order_and_reject_duplicates() {
        let stream = TypeRef::parse("java.io.InputStream").unwrap();
        let mut t = Try::new();
        t.resource(stream.clone(), "a", Expr::null()).unwrap();
        t.resource(stream.clone(), "b", Expr::null()).unwrap();
        assert!(t.resource(stream, "a", Expr::null()).is_err());
        let names: Vec<&str> = t.resources().iter().map(LocalVar::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(t.resources().iter().all(|r| r.mods() == Modifiers::FINAL));
    }

    #[test]
    fn test_switch_allows_one_default() {
        let mut sw = Switch::new(Expr::name("x").unwrap());
        sw.case(1).brk(None).unwrap();
        sw.default_case().unwrap();
        assert!(sw.default_case().is_err());
    }
}
