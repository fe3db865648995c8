use codemodel_api::naming::{self, RESERVED_KEYWORDS};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z_$][A-Za-z0-9_$]{0,8}"
}

proptest! {
    #[test]
    fn qualified_name_iff_every_segment_is_identifier(parts in prop::collection::vec(segment(), 1..5)) {
        let joined = parts.join(".");
        let all_valid = parts.iter().all(|p| naming::is_identifier(p));
        prop_assert_eq!(naming::is_qualified_name(&joined), all_valid);
    }

    #[test]
    fn keyword_segment_poisons_qualified_name(
        prefix in segment(),
        index in 0usize..RESERVED_KEYWORDS.len(),
    ) {
        prop_assume!(naming::is_identifier(&prefix));
        let name = format!("{}.{}", prefix, RESERVED_KEYWORDS[index]);
        prop_assert!(!naming::is_qualified_name(&name));
    }

    #[test]
    fn leading_digit_is_never_an_identifier(rest in "[A-Za-z0-9]{0,8}", digit in 0u8..10) {
        let candidate = format!("{digit}{rest}");
        prop_assert!(!naming::is_identifier(&candidate));
    }

    #[test]
    fn parsed_class_name_reassembles(parts in prop::collection::vec(segment(), 1..5)) {
        let joined = parts.join(".");
        prop_assume!(naming::is_qualified_name(&joined));
        let path = naming::parse_class_name(&joined).unwrap();
        let mut rebuilt: Vec<String> = Vec::new();
        if !path.package.is_empty() {
            rebuilt.push(path.package.clone());
        }
        rebuilt.extend(path.enclosing.iter().map(|s| s.to_string()));
        rebuilt.push(path.name.to_string());
        prop_assert_eq!(rebuilt.join("."), joined);
    }
}

#[test]
fn test_all_53_reserved_words_rejected() {
    assert_eq!(RESERVED_KEYWORDS.len(), 53);
    for word in RESERVED_KEYWORDS {
        assert!(!naming::is_identifier(word));
        assert!(naming::is_keyword(word));
    }
}
