use codemodel_api::{BinarySink, CodeWriter, Encoding, OutputDir, TextSink};
use std::io;

/// Prepends a comment block to every text artifact written through the
/// wrapped writer. Binary artifacts pass through untouched.
#[derive(Debug)]
pub struct PrologueCodeWriter<W: CodeWriter> {
    inner: W,
    header: String,
}

impl<W: CodeWriter> PrologueCodeWriter<W> {
    /// Each line of `prologue` becomes a `//` comment line.
    pub fn new(inner: W, prologue: &str) -> Self {
        let mut header = String::new();
        for line in prologue.lines() {
            header.push_str("//");
            if !line.is_empty() {
                header.push(' ');
                header.push_str(line);
            }
            header.push('\n');
        }
        header.push('\n');
        Self { inner, header }
    }

    pub fn inner(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: CodeWriter> CodeWriter for PrologueCodeWriter<W> {
    fn encoding(&self) -> Encoding {
        self.inner.encoding()
    }

    fn open_binary<'a>(
        &'a mut self,
        dir: &OutputDir,
        file_name: &str,
    ) -> io::Result<Box<dyn BinarySink + 'a>> {
        self.inner.open_binary(dir, file_name)
    }

    fn open_text<'a>(&'a mut self, dir: &OutputDir, file_name: &str) -> io::Result<TextSink<'a>> {
        let mut sink = self.inner.open_text(dir, file_name)?;
        sink.write_str(&self.header)?;
        Ok(sink)
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCodeWriter;
    use std::io::Write;

    #[test]
    fn test_prologue_only_on_text() {
        let mut writer = PrologueCodeWriter::new(MemoryCodeWriter::new(), "Generated.\n\nDo not edit.");
        let mut sink = writer.open_text(&OutputDir::root(), "A.java").unwrap();
        sink.write_str("class A {}\n").unwrap();
        sink.close().unwrap();
        let mut sink = writer.open_binary(&OutputDir::root(), "a.bin").unwrap();
        sink.write_all(b"raw").unwrap();
        sink.close().unwrap();
        writer.close().unwrap();

        let inner = writer.into_inner();
        assert_eq!(
            inner.text("A.java"),
            Some("// Generated.\n//\n// Do not edit.\n\nclass A {}\n")
        );
        assert_eq!(inner.get("a.bin"), Some(b"raw".as_slice()));
        assert!(inner.is_closed());
    }
}
