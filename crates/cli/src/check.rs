use codemodel_api::naming::{is_identifier, is_keyword, is_qualified_name, parse_class_name};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct NameRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Package")]
    package: String,
}

fn classify(name: &str) -> &'static str {
    if is_keyword(name) {
        "keyword"
    } else if is_identifier(name) {
        "identifier"
    } else if is_qualified_name(name) && !name.is_empty() {
        "qualified name"
    } else {
        "invalid"
    }
}

pub fn run(names: &[String]) {
    let rows: Vec<NameRow> = names
        .iter()
        .map(|name| {
            let kind = classify(name);
            let package = match kind {
                "qualified name" => parse_class_name(name)
                    .map(|path| path.package)
                    .unwrap_or_default(),
                _ => String::new(),
            };
            NameRow {
                name: name.clone(),
                kind,
                package: if package.is_empty() { "-".to_string() } else { package },
            }
        })
        .collect();
    println!("{}", Table::new(rows));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("foo"), "identifier");
        assert_eq!(classify("class"), "keyword");
        assert_eq!(classify("java.util.List"), "qualified name");
        assert_eq!(classify("1abc"), "invalid");
        assert_eq!(classify(""), "invalid");
    }
}
