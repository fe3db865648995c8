use codemodel_api::{BinarySink, CodeWriter, Encoding, OutputDir};
use std::io::{self, Write};

const RULE: &str = "-----------------------------------";

/// Writes every artifact to one stream, each preceded by a header line
/// naming it. Useful for dumping a model to the console.
#[derive(Debug)]
pub struct SingleStreamCodeWriter<W: Write> {
    out: W,
    encoding: Encoding,
}

impl<W: Write> SingleStreamCodeWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            encoding: Encoding::Utf8,
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn header_name(dir: &OutputDir, file_name: &str) -> String {
    match dir.package_name() {
        Some("") => file_name.to_string(),
        Some(package) => format!("{package}.{file_name}"),
        None => dir.file_path(file_name),
    }
}

impl<W: Write> CodeWriter for SingleStreamCodeWriter<W> {
    fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn open_binary<'a>(
        &'a mut self,
        dir: &OutputDir,
        file_name: &str,
    ) -> io::Result<Box<dyn BinarySink + 'a>> {
        writeln!(self.out, "{RULE}{}{RULE}", header_name(dir, file_name))?;
        Ok(Box::new(StreamSink { out: &mut self.out }))
    }

    fn close(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

struct StreamSink<'a, W: Write> {
    out: &'a mut W,
}

impl<W: Write> Write for StreamSink<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> BinarySink for StreamSink<'_, W> {
    fn close(self: Box<Self>) -> io::Result<()> {
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_headers_name_each_file() {
        let mut writer = SingleStreamCodeWriter::new(Vec::new());
        let dir = OutputDir::package("org.example").unwrap();
        let mut sink = writer.open_text(&dir, "Foo.java").unwrap();
        sink.write_str("class Foo {}\n").unwrap();
        sink.close().unwrap();
        let mut sink = writer.open_text(&OutputDir::root(), "Bar.java").unwrap();
        sink.write_str("class Bar {}\n").unwrap();
        sink.close().unwrap();
        writer.close().unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            text,
            "-----------------------------------org.example.Foo.java-----------------------------------\n\
             class Foo {}\n\
             -----------------------------------Bar.java-----------------------------------\n\
             class Bar {}\n"
        );
    }
}
