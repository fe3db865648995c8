//! Import planning for one compilation unit.
//!
//! The collecting pass records every top-level class the unit mentions
//! (nested classes of other units are recorded through their top-level
//! class). [`ImportPlan::resolve`] then decides, per class, between an
//! import, a bare simple name, or the fully qualified name.

use codemodel_api::naming::JAVA_LANG;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// A top-level class mentioned by the unit being rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReferencedClass {
    pub package: String,
    pub simple_name: String,
}

/// What the unit itself declares, which imported names must not shadow.
#[derive(Debug, Clone, Default)]
pub(crate) struct UnitScope {
    pub package: String,
    /// Full name of the unit's top-level class.
    pub top_level: String,
    /// Simple names of every class declared in the unit.
    pub local_names: HashSet<String>,
    /// Type variables declared anywhere in the unit.
    pub type_vars: HashSet<String>,
    /// Simple names of the other top-level classes defined in the unit's
    /// package.
    pub package_classes: HashSet<String>,
    /// Classes the model marks as never imported.
    pub dont_import: HashSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportPlan {
    imports: BTreeSet<String>,
    /// Top-level classes written by simple name, imported or not.
    simple: HashSet<String>,
}

impl ImportPlan {
    pub(crate) fn resolve(scope: &UnitScope, refs: &BTreeMap<String, ReferencedClass>) -> Self {
        let mut groups: BTreeMap<&str, Vec<(&str, &ReferencedClass)>> = BTreeMap::new();
        for (full_name, class) in refs {
            if scope.dont_import.contains(full_name.as_str()) {
                continue;
            }
            groups
                .entry(class.simple_name.as_str())
                .or_default()
                .push((full_name.as_str(), class));
        }

        let mut plan = ImportPlan::default();
        for (simple_name, members) in groups {
            let [(full_name, class)] = members.as_slice() else {
                let candidates: Vec<&str> = members.iter().map(|(name, _)| *name).collect();
                debug!(unit = %scope.top_level, simple_name, ?candidates, "name collision, qualifying all");
                continue;
            };
            if scope.local_names.contains(simple_name) || scope.type_vars.contains(simple_name) {
                debug!(unit = %scope.top_level, class = %full_name, "shadowed by a unit declaration");
                continue;
            }
            let implicit = class.package == scope.package || class.package.is_empty();
            if class.package == JAVA_LANG && scope.package_classes.contains(simple_name) {
                debug!(unit = %scope.top_level, class = %full_name, "shadowed by a package class");
                continue;
            }
            if !implicit && class.package != JAVA_LANG {
                plan.imports.insert(full_name.to_string());
            }
            plan.simple.insert(full_name.to_string());
        }
        plan
    }

    /// Import declarations in sorted order.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }

    pub fn is_simple(&self, top_level_full_name: &str) -> bool {
        self.simple.contains(top_level_full_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(names: &[&str]) -> BTreeMap<String, ReferencedClass> {
        names
            .iter()
            .map(|full| {
                let (package, simple) = full.rsplit_once('.').unwrap_or(("", full));
                (
                    full.to_string(),
                    ReferencedClass {
                        package: package.to_string(),
                        simple_name: simple.to_string(),
                    },
                )
            })
            .collect()
    }

    fn scope() -> UnitScope {
        UnitScope {
            package: "org.example".to_string(),
            top_level: "org.example.Unit".to_string(),
            local_names: ["Unit".to_string()].into(),
            ..UnitScope::default()
        }
    }

    #[test]
    fn test_single_names_are_imported() {
        let plan = ImportPlan::resolve(
            &scope(),
            &refs(&["java.util.List", "java.lang.String", "org.example.Helper"]),
        );
        assert_eq!(plan.imports().collect::<Vec<_>>(), vec!["java.util.List"]);
        assert!(plan.is_simple("java.lang.String"));
        assert!(plan.is_simple("org.example.Helper"));
    }

    #[test]
    fn test_collisions_qualify_every_member() {
        let plan = ImportPlan::resolve(
            &scope(),
            &refs(&["java.util.List", "java.awt.List", "java.lang.Object"]),
        );
        assert_eq!(plan.imports().count(), 0);
        assert!(!plan.is_simple("java.util.List"));
        assert!(!plan.is_simple("java.awt.List"));
        assert!(plan.is_simple("java.lang.Object"));
    }

    #[test]
    fn test_unit_declarations_shadow_imports() {
        let mut scope = scope();
        scope.type_vars.insert("T".to_string());
        scope.package_classes.insert("String".to_string());
        let plan = ImportPlan::resolve(
            &scope,
            &refs(&["com.other.Unit", "com.other.T", "java.lang.String"]),
        );
        assert_eq!(plan.imports().count(), 0);
        assert!(!plan.is_simple("com.other.Unit"));
        assert!(!plan.is_simple("com.other.T"));
        assert!(!plan.is_simple("java.lang.String"));
    }

    #[test]
    fn test_dont_import_is_excluded_from_collisions() {
        let mut scope = scope();
        scope.dont_import.insert("com.other.List".to_string());
        let plan = ImportPlan::resolve(&scope, &refs(&["java.util.List", "com.other.List"]));
        assert_eq!(plan.imports().collect::<Vec<_>>(), vec!["java.util.List"]);
        assert!(!plan.is_simple("com.other.List"));
    }
}
