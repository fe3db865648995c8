use codemodel_api::{BinarySink, CodeWriter, Encoding, OutputDir};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Writes every artifact into a directory tree below `root`.
#[derive(Debug)]
pub struct FileCodeWriter {
    root: PathBuf,
    encoding: Encoding,
    read_only: bool,
    written: usize,
}

impl FileCodeWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            encoding: Encoding::Utf8,
            read_only: false,
            written: 0,
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Mark each file read-only once it is closed.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of files opened so far.
    pub fn written(&self) -> usize {
        self.written
    }

    fn target(&self, dir: &OutputDir, file_name: &str) -> io::Result<PathBuf> {
        if !self.root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", self.root.display()),
            ));
        }
        let mut path = self.root.clone();
        path.extend(dir.file_path(file_name).split('/'));
        Ok(path)
    }
}

impl CodeWriter for FileCodeWriter {
    fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn open_binary<'a>(
        &'a mut self,
        dir: &OutputDir,
        file_name: &str,
    ) -> io::Result<Box<dyn BinarySink + 'a>> {
        let path = self.target(dir, file_name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            let mut permissions = fs::metadata(&path)?.permissions();
            if permissions.readonly() {
                #[allow(clippy::permissions_set_readonly_false)]
                permissions.set_readonly(false);
                fs::set_permissions(&path, permissions)?;
            }
            fs::remove_file(&path)?;
        }
        trace!(path = %path.display(), "opening file");
        let file = File::create(&path)?;
        self.written += 1;
        Ok(Box::new(FileSink {
            out: BufWriter::new(file),
            path,
            read_only: self.read_only,
        }))
    }

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct FileSink {
    out: BufWriter<File>,
    path: PathBuf,
    read_only: bool,
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl BinarySink for FileSink {
    fn close(mut self: Box<Self>) -> io::Result<()> {
        self.out.flush()?;
        if self.read_only {
            let mut permissions = fs::metadata(&self.path)?.permissions();
            permissions.set_readonly(true);
            fs::set_permissions(&self.path, permissions)?;
        }
        Ok(())
    }
}
