use codemodel_api::{BinarySink, CodeWriter, Encoding, OutputDir};
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing::trace;

/// Keeps every artifact in memory, keyed by its `/`-separated path.
#[derive(Debug, Default)]
pub struct MemoryCodeWriter {
    files: BTreeMap<String, Vec<u8>>,
    encoding: Encoding,
    closed: bool,
}

impl MemoryCodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Content of `path` if it is valid UTF-8.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Source of the top-level class `full_name`, e.g. `org.example.Foo`.
    pub fn source_for_class(&self, full_name: &str) -> Option<&str> {
        self.text(&format!("{}.java", full_name.replace('.', "/")))
    }

    /// Sources of every `.java` file keyed by class name, the form an
    /// in-memory compiler takes as input.
    pub fn sources(&self) -> BTreeMap<String, &str> {
        self.files
            .iter()
            .filter_map(|(path, bytes)| {
                let class = path.strip_suffix(".java")?;
                let text = std::str::from_utf8(bytes).ok()?;
                Some((class.replace('/', "."), text))
            })
            .collect()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn into_files(self) -> BTreeMap<String, Vec<u8>> {
        self.files
    }
}

impl CodeWriter for MemoryCodeWriter {
    fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn open_binary<'a>(
        &'a mut self,
        dir: &OutputDir,
        file_name: &str,
    ) -> io::Result<Box<dyn BinarySink + 'a>> {
        let path = dir.file_path(file_name);
        trace!(path = %path, "opening in-memory file");
        Ok(Box::new(MemorySink {
            files: &mut self.files,
            path,
            buffer: Vec::new(),
        }))
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Buffers until closed; an unclosed sink leaves no file behind.
struct MemorySink<'a> {
    files: &'a mut BTreeMap<String, Vec<u8>>,
    path: String,
    buffer: Vec<u8>,
}

impl Write for MemorySink<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl BinarySink for MemorySink<'_> {
    fn close(self: Box<Self>) -> io::Result<()> {
        let MemorySink {
            files,
            path,
            buffer,
        } = *self;
        files.insert(path, buffer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_are_keyed_by_class_name() {
        let mut writer = MemoryCodeWriter::new();
        let dir = OutputDir::package("org.example").unwrap();
        let mut sink = writer.open_text(&dir, "Foo.java").unwrap();
        sink.write_str("class Foo {}").unwrap();
        sink.close().unwrap();
        let mut sink = writer.open_binary(&dir, "data.bin").unwrap();
        sink.write_all(&[1, 2]).unwrap();
        sink.close().unwrap();

        assert_eq!(writer.source_for_class("org.example.Foo"), Some("class Foo {}"));
        assert_eq!(writer.get("org/example/data.bin"), Some([1u8, 2].as_slice()));
        assert_eq!(
            writer.sources().into_iter().collect::<Vec<_>>(),
            vec![("org.example.Foo".to_string(), "class Foo {}")]
        );
    }

    #[test]
    fn test_unclosed_sink_writes_nothing() {
        let mut writer = MemoryCodeWriter::new();
        {
            let mut sink = writer.open_binary(&OutputDir::root(), "a.txt").unwrap();
            sink.write_all(b"lost").unwrap();
        }
        assert!(writer.is_empty());
    }

    #[test]
    fn test_latin1_escapes_outside_characters() {
        let mut writer = MemoryCodeWriter::new().with_encoding(Encoding::Latin1);
        let mut sink = writer.open_text(&OutputDir::root(), "A.java").unwrap();
        sink.write_str("é€").unwrap();
        sink.close().unwrap();
        assert_eq!(writer.get("A.java"), Some([0xE9u8, b'\\', b'u', b'2', b'0', b'a', b'c'].as_slice()));
    }
}
