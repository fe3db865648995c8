//! The sink contract the renderer writes through.
//!
//! A [`CodeWriter`] hands out one sink per artifact. Each sink mutably borrows
//! its writer, so at most one sink can be open at any time and it has to be
//! closed (or dropped) before the next one is opened.

use crate::encoding::Encoding;
use crate::output::OutputDir;
use std::io::{self, Write};

/// A byte destination for one artifact.
pub trait BinarySink: Write {
    /// Flush and release the destination. Errors here are real write errors.
    fn close(self: Box<Self>) -> io::Result<()>;
}

pub trait CodeWriter {
    /// Encoding applied to text sinks opened through [`CodeWriter::open_text`].
    fn encoding(&self) -> Encoding {
        Encoding::Utf8
    }

    /// Allocate storage for `file_name` inside `dir`.
    fn open_binary<'a>(
        &'a mut self,
        dir: &OutputDir,
        file_name: &str,
    ) -> io::Result<Box<dyn BinarySink + 'a>>;

    /// Allocate storage for a text artifact, encoded with [`Self::encoding`].
    fn open_text<'a>(&'a mut self, dir: &OutputDir, file_name: &str) -> io::Result<TextSink<'a>> {
        let encoding = self.encoding();
        let inner = self.open_binary(dir, file_name)?;
        Ok(TextSink::new(inner, encoding))
    }

    /// Called once at the end of a generation run.
    fn close(&mut self) -> io::Result<()>;
}

/// Text destination layered over a [`BinarySink`]. Characters the encoding
/// cannot represent, and control characters, are written as `\uXXXX`.
pub struct TextSink<'a> {
    inner: Box<dyn BinarySink + 'a>,
    encoding: Encoding,
}

impl<'a> TextSink<'a> {
    pub fn new(inner: Box<dyn BinarySink + 'a>, encoding: Encoding) -> Self {
        Self { inner, encoding }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.inner.write_all(&self.encoding.encode(text))
    }

    pub fn close(self) -> io::Result<()> {
        self.inner.close()
    }
}

impl std::fmt::Debug for TextSink<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSink")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}
