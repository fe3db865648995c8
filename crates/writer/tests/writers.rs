use codemodel_api::{CodeWriter, OutputDir, UnifiedFileSystem};
use codemodel_writer::{FileCodeWriter, PrologueCodeWriter, SingleStreamCodeWriter};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Write;
use tempfile::tempdir;

fn write_sample(writer: &mut dyn CodeWriter) {
    let dir = OutputDir::package("com.acme").unwrap();
    let mut sink = writer.open_text(&dir, "Widget.java").unwrap();
    sink.write_str("package com.acme;\n").unwrap();
    sink.close().unwrap();

    let services = OutputDir::resource("META-INF/services", &UnifiedFileSystem).unwrap();
    let mut sink = writer.open_binary(&services, "com.acme.Widget").unwrap();
    sink.write_all(b"com.acme.Widget\n").unwrap();
    sink.close().unwrap();
    writer.close().unwrap();
}

#[test]
fn test_file_tree_with_prologue() {
    let temp = tempdir().unwrap();
    let mut writer = PrologueCodeWriter::new(FileCodeWriter::new(temp.path()), "Generated");
    write_sample(&mut writer);

    assert_eq!(
        fs::read_to_string(temp.path().join("com/acme/Widget.java")).unwrap(),
        "// Generated\n\npackage com.acme;\n"
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("META-INF/services/com.acme.Widget")).unwrap(),
        "com.acme.Widget\n"
    );
    assert_eq!(writer.inner().written(), 2);
}

#[test]
fn test_single_stream_names_resource_directories() {
    let mut writer = SingleStreamCodeWriter::new(Vec::new());
    write_sample(&mut writer);
    let text = String::from_utf8(writer.into_inner()).unwrap();
    assert!(text.contains("-----------------------------------com.acme.Widget.java---"));
    assert!(text.contains("-----------------------------------META-INF/services/com.acme.Widget---"));
}
