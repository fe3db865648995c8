use codemodel_api::{BinarySink, CodeWriter, Encoding, OutputDir};
use std::io::{self, Seek, Write};
use tracing::trace;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Writes every artifact as an entry of a zip archive. The archive is
/// finished when the writer is closed.
pub struct ZipCodeWriter<W: Write + Seek> {
    zip: Option<ZipWriter<W>>,
    finished: Option<W>,
    encoding: Encoding,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> ZipCodeWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            zip: Some(ZipWriter::new(out)),
            finished: None,
            encoding: Encoding::Utf8,
            options: SimpleFileOptions::default(),
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The underlying stream, once [`CodeWriter::close`] has finished the
    /// archive.
    pub fn into_inner(self) -> Option<W> {
        self.finished
    }
}

fn closed() -> io::Error {
    io::Error::other("zip archive already finished")
}

impl<W: Write + Seek> CodeWriter for ZipCodeWriter<W> {
    fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn open_binary<'a>(
        &'a mut self,
        dir: &OutputDir,
        file_name: &str,
    ) -> io::Result<Box<dyn BinarySink + 'a>> {
        let zip = self.zip.as_mut().ok_or_else(closed)?;
        let entry = dir.file_path(file_name);
        trace!(entry = %entry, "starting zip entry");
        zip.start_file(entry, self.options).map_err(io::Error::other)?;
        Ok(Box::new(EntrySink { zip }))
    }

    fn close(&mut self) -> io::Result<()> {
        let zip = self.zip.take().ok_or_else(closed)?;
        self.finished = Some(zip.finish().map_err(io::Error::other)?);
        Ok(())
    }
}

struct EntrySink<'a, W: Write + Seek> {
    zip: &'a mut ZipWriter<W>,
}

impl<W: Write + Seek> Write for EntrySink<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.zip.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.zip.flush()
    }
}

impl<W: Write + Seek> BinarySink for EntrySink<'_, W> {
    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}
