use crate::error::{CodeModelError, Result};
use crate::model::ClassId;
use crate::model::annotation::AnnotationUse;
use codemodel_api::{FileSystemConvention, OutputDir};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceData {
    /// Written as UTF-8 bytes, without source escaping.
    Text(String),
    Binary(Vec<u8>),
}

/// A non-source file written next to generated sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    name: String,
    data: ResourceData,
}

impl ResourceFile {
    pub fn text(name: &str, content: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            data: ResourceData::Text(content.into()),
        }
    }

    pub fn binary(name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.to_string(),
            data: ResourceData::Binary(bytes.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ResourceData {
        &self.data
    }

    pub fn bytes(&self) -> &[u8] {
        match &self.data {
            ResourceData::Text(text) => text.as_bytes(),
            ResourceData::Binary(bytes) => bytes,
        }
    }
}

/// Resources of one output directory, checked against a filesystem
/// convention as they are added.
#[derive(Debug, Clone)]
pub struct Resources {
    dir: OutputDir,
    files: Vec<ResourceFile>,
    fs: Arc<dyn FileSystemConvention>,
}

impl Resources {
    pub(crate) fn new(dir: OutputDir, fs: Arc<dyn FileSystemConvention>) -> Self {
        Self {
            dir,
            files: Vec::new(),
            fs,
        }
    }

    pub fn add(&mut self, file: ResourceFile) -> Result<()> {
        if !self.fs.is_valid_file_name(file.name()) {
            return Err(CodeModelError::InvalidResource(format!(
                "{:?} is not a valid file name",
                file.name()
            )));
        }
        let clash = |existing: &ResourceFile| {
            if self.fs.is_case_sensitive() {
                existing.name == file.name
            } else {
                existing.name.eq_ignore_ascii_case(&file.name)
            }
        };
        if self.files.iter().any(clash) {
            return Err(CodeModelError::InvalidResource(format!(
                "{} already exists in {}",
                file.name(),
                self.dir
            )));
        }
        self.files.push(file);
        Ok(())
    }

    pub fn dir(&self) -> &OutputDir {
        &self.dir
    }

    pub fn files(&self) -> &[ResourceFile] {
        &self.files
    }

    pub fn get(&self, name: &str) -> Option<&ResourceFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Package {
    name: String,
    classes: Vec<ClassId>,
    resources: Resources,
    annotations: Vec<AnnotationUse>,
    javadoc: Vec<String>,
}

impl Package {
    pub(crate) fn new(name: &str, fs: Arc<dyn FileSystemConvention>) -> Result<Self> {
        let dir = OutputDir::package(name)
            .map_err(|_| CodeModelError::InvalidQualifiedName(name.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            classes: Vec::new(),
            resources: Resources::new(dir, fs),
            annotations: Vec::new(),
            javadoc: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        self.name.is_empty()
    }

    pub fn dir(&self) -> &OutputDir {
        self.resources.dir()
    }

    /// Top-level classes in definition order.
    pub fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    pub(crate) fn push_class(&mut self, id: ClassId) {
        self.classes.push(id);
    }

    pub(crate) fn remove_class(&mut self, id: ClassId) {
        self.classes.retain(|c| *c != id);
    }

    pub fn add_resource(&mut self, file: ResourceFile) -> Result<()> {
        self.resources.add(file)
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Package annotations go to `package-info.java`.
    pub fn annotate(&mut self, annotation: AnnotationUse) -> &mut Self {
        self.annotations.push(annotation);
        self
    }

    pub fn javadoc(&mut self, line: &str) -> &mut Self {
        self.javadoc.push(line.to_string());
        self
    }

    pub fn annotations(&self) -> &[AnnotationUse] {
        &self.annotations
    }

    pub fn javadoc_lines(&self) -> &[String] {
        &self.javadoc
    }

    pub fn has_package_info(&self) -> bool {
        !self.annotations.is_empty() || !self.javadoc.is_empty()
    }
}
