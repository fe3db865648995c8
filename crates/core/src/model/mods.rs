use crate::error::{CodeModelError, Result};
use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Declaration modifiers. Iteration and rendering follow the canonical
    /// order of the constants below.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const ABSTRACT = 1 << 3;
        const DEFAULT = 1 << 4;
        const STATIC = 1 << 5;
        const FINAL = 1 << 6;
        const SEALED = 1 << 7;
        const NON_SEALED = 1 << 8;
        const TRANSIENT = 1 << 9;
        const VOLATILE = 1 << 10;
        const SYNCHRONIZED = 1 << 11;
        const NATIVE = 1 << 12;
        const STRICTFP = 1 << 13;
    }
}

/// What a modifier set is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierTarget {
    TopLevelClass,
    NestedClass,
    Method,
    Constructor,
    Field,
    /// Local variables and parameters.
    Local,
}

impl ModifierTarget {
    pub fn describe(self) -> &'static str {
        match self {
            ModifierTarget::TopLevelClass => "top-level class",
            ModifierTarget::NestedClass => "nested class",
            ModifierTarget::Method => "method",
            ModifierTarget::Constructor => "constructor",
            ModifierTarget::Field => "field",
            ModifierTarget::Local => "local variable",
        }
    }

    fn allowed(self) -> Modifiers {
        let access = Modifiers::PUBLIC | Modifiers::PROTECTED | Modifiers::PRIVATE;
        match self {
            ModifierTarget::TopLevelClass => {
                Modifiers::PUBLIC
                    | Modifiers::ABSTRACT
                    | Modifiers::FINAL
                    | Modifiers::SEALED
                    | Modifiers::NON_SEALED
                    | Modifiers::STRICTFP
            }
            ModifierTarget::NestedClass => {
                access
                    | Modifiers::ABSTRACT
                    | Modifiers::STATIC
                    | Modifiers::FINAL
                    | Modifiers::SEALED
                    | Modifiers::NON_SEALED
                    | Modifiers::STRICTFP
            }
            ModifierTarget::Method => {
                access
                    | Modifiers::ABSTRACT
                    | Modifiers::DEFAULT
                    | Modifiers::STATIC
                    | Modifiers::FINAL
                    | Modifiers::SYNCHRONIZED
                    | Modifiers::NATIVE
                    | Modifiers::STRICTFP
            }
            ModifierTarget::Constructor => access,
            ModifierTarget::Field => {
                access
                    | Modifiers::STATIC
                    | Modifiers::FINAL
                    | Modifiers::TRANSIENT
                    | Modifiers::VOLATILE
            }
            ModifierTarget::Local => Modifiers::FINAL,
        }
    }
}

impl Modifiers {
    pub fn keyword(self) -> Option<&'static str> {
        let keyword = match self {
            Modifiers::PUBLIC => "public",
            Modifiers::PROTECTED => "protected",
            Modifiers::PRIVATE => "private",
            Modifiers::ABSTRACT => "abstract",
            Modifiers::DEFAULT => "default",
            Modifiers::STATIC => "static",
            Modifiers::FINAL => "final",
            Modifiers::SEALED => "sealed",
            Modifiers::NON_SEALED => "non-sealed",
            Modifiers::TRANSIENT => "transient",
            Modifiers::VOLATILE => "volatile",
            Modifiers::SYNCHRONIZED => "synchronized",
            Modifiers::NATIVE => "native",
            Modifiers::STRICTFP => "strictfp",
            _ => return None,
        };
        Some(keyword)
    }

    /// Keywords in canonical order.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        self.iter().filter_map(Modifiers::keyword)
    }

    /// Check the set against what `target` may carry.
    pub fn validate(self, target: ModifierTarget) -> Result<()> {
        let fail = |reason: &'static str| {
            Err(CodeModelError::IllegalModifiers {
                target: target.describe(),
                modifiers: self.to_string(),
                reason,
            })
        };

        if !target.allowed().contains(self) {
            return fail("modifier not allowed here");
        }
        let access = self & (Modifiers::PUBLIC | Modifiers::PROTECTED | Modifiers::PRIVATE);
        if access.bits().count_ones() > 1 {
            return fail("conflicting access modifiers");
        }
        if self.contains(Modifiers::ABSTRACT | Modifiers::FINAL) {
            return fail("abstract and final are exclusive");
        }
        if self.contains(Modifiers::SEALED | Modifiers::NON_SEALED)
            || (self.contains(Modifiers::FINAL)
                && self.intersects(Modifiers::SEALED | Modifiers::NON_SEALED))
        {
            return fail("only one of final, sealed and non-sealed");
        }
        if self.contains(Modifiers::FINAL | Modifiers::VOLATILE) {
            return fail("a final field cannot be volatile");
        }
        if self.contains(Modifiers::ABSTRACT)
            && target == ModifierTarget::Method
            && self.intersects(
                Modifiers::PRIVATE
                    | Modifiers::STATIC
                    | Modifiers::SYNCHRONIZED
                    | Modifiers::NATIVE
                    | Modifiers::STRICTFP,
            )
        {
            return fail("abstract methods have no implementation modifiers");
        }
        if self.contains(Modifiers::DEFAULT)
            && self.intersects(Modifiers::STATIC | Modifiers::ABSTRACT | Modifiers::PRIVATE)
        {
            return fail("default methods cannot be static, abstract or private");
        }
        Ok(())
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, keyword) in self.keywords().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            f.write_str(keyword)?;
        }
        Ok(())
    }
}
