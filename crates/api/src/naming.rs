//! Identifier and qualified-name validation for generated Java source.
//!
//! These are pure functions. The declaration model calls them to reject
//! illegal names when a node is constructed, so the formatter never has to.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use unicode_ident::{is_xid_continue, is_xid_start};

/// Separator between packages, and between a package and its classes.
pub const TYPE_SEPARATOR: char = '.';

/// The implicitly imported root package.
pub const JAVA_LANG: &str = "java.lang";

/// Words that can never be used as identifiers: the language keywords plus
/// the literal tokens `true`, `false` and `null`.
pub const RESERVED_KEYWORDS: [&str; 53] = [
    "abstract",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
    "true",
    "false",
    "null",
    "assert",
    "enum",
];

/// Reserved since Java 9 although it is lexically an identifier.
const RESTRICTED_IDENTIFIERS: [&str; 1] = ["_"];

static KEYWORD_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    RESERVED_KEYWORDS
        .iter()
        .chain(RESTRICTED_IDENTIFIERS.iter())
        .copied()
        .collect()
});

pub fn is_keyword(s: &str) -> bool {
    KEYWORD_SET.contains(s)
}

/// Currency symbols and connector punctuation are legal anywhere in a Java
/// identifier, on top of the Unicode XID classes.
fn is_java_extra(ch: char) -> bool {
    matches!(
        ch,
        '$' | '_'
            | '\u{00A2}'..='\u{00A5}'
            | '\u{058F}'
            | '\u{060B}'
            | '\u{09F2}'..='\u{09F3}'
            | '\u{0E3F}'
            | '\u{20A0}'..='\u{20C0}'
            | '\u{203F}'..='\u{2040}'
            | '\u{2054}'
            | '\u{FE33}'..='\u{FE34}'
            | '\u{FE4D}'..='\u{FE4F}'
            | '\u{FF04}'
            | '\u{FF3F}'
    )
}

pub fn is_identifier_start(ch: char) -> bool {
    is_java_extra(ch) || is_xid_start(ch)
}

pub fn is_identifier_part(ch: char) -> bool {
    is_java_extra(ch) || is_xid_continue(ch)
}

/// Checks if a given string is usable as a Java identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if is_keyword(s) {
        return false;
    }
    is_identifier_start(first) && chars.all(is_identifier_part)
}

/// Checks if the given string is a valid dotted name (package or fully
/// qualified class name). The empty string is valid and denotes the default
/// package; an empty segment anywhere else is not.
pub fn is_qualified_name(s: &str) -> bool {
    s.is_empty() || s.split(TYPE_SEPARATOR).all(is_identifier)
}

/// Last segment of a dotted name.
pub fn simple_name(qualified: &str) -> &str {
    qualified
        .rfind(TYPE_SEPARATOR)
        .map(|pos| &qualified[pos + 1..])
        .unwrap_or(qualified)
}

/// Everything before the last segment of a dotted name, or `""`.
pub fn qualifier(qualified: &str) -> &str {
    qualified
        .rfind(TYPE_SEPARATOR)
        .map(|pos| &qualified[..pos])
        .unwrap_or("")
}

/// A dotted class name split into its structural parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPath<'a> {
    pub package: String,
    /// Enclosing classes, outermost first.
    pub enclosing: Vec<&'a str>,
    pub name: &'a str,
}

/// Split a dotted class name into package, enclosing classes and simple name.
///
/// Heuristic: upper-case segment = class, lower-case segment = package. The
/// first segment starting with an upper-case letter begins the class path;
/// when there is none the last segment is taken as the class.
///
/// ```ignore
/// parse_class_name("java.util.Map.Entry") => package "java.util", enclosing ["Map"], name "Entry"
/// parse_class_name("org.example.foo")     => package "org.example", enclosing [], name "foo"
/// ```
///
/// Returns `None` if the input is not a non-empty qualified name.
pub fn parse_class_name(fqn: &str) -> Option<ClassPath<'_>> {
    if fqn.is_empty() || !is_qualified_name(fqn) {
        return None;
    }
    let parts: Vec<&str> = fqn.split(TYPE_SEPARATOR).collect();
    let class_start = parts
        .iter()
        .position(|p| p.chars().next().is_some_and(char::is_uppercase))
        .unwrap_or(parts.len() - 1);

    let (package, classes) = parts.split_at(class_start);
    let (name, enclosing) = classes.split_last()?;
    Some(ClassPath {
        package: package.join("."),
        enclosing: enclosing.to_vec(),
        name,
    })
}
