//! Render driver: every compilation unit, package-info and resource of a
//! model, written through [`CodeWriter`]s.

use crate::config::RenderConfig;
use crate::error::Result;
use crate::format::{render_package_info, render_unit};
use crate::model::{ClassId, CodeModel, Resources};
use codemodel_api::{CodeWriter, OutputDir};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;
use std::time::Instant;
use tracing::{info, trace};

pub const PACKAGE_INFO: &str = "package-info.java";

/// Source text of one compilation unit and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedUnit {
    pub dir: OutputDir,
    pub file_name: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub sources: usize,
    pub package_infos: usize,
    pub resources: usize,
}

pub struct ModelWriter<'m> {
    model: &'m CodeModel,
    config: RenderConfig,
}

impl<'m> ModelWriter<'m> {
    pub fn new(model: &'m CodeModel, config: RenderConfig) -> Self {
        Self { model, config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Text of the unit declaring the top-level class `id`.
    pub fn render_unit(&self, id: ClassId) -> Result<String> {
        render_unit(self.model, id, &self.config)
    }

    /// Every top-level class rendered in parallel, in definition order.
    pub fn render_all(&self) -> Result<Vec<RenderedUnit>> {
        let ids: Vec<ClassId> = self.model.top_level_classes().map(|c| c.id()).collect();
        ids.par_iter()
            .map(|id| {
                let class = self.model.class(*id)?;
                Ok(RenderedUnit {
                    dir: package_dir(class.package())?,
                    file_name: format!("{}.java", class.name()),
                    text: self.render_unit(*id)?,
                })
            })
            .collect()
    }

    /// Write sources and resources through one writer, then close it.
    pub fn build(&self, writer: &mut dyn CodeWriter) -> Result<BuildStats> {
        let started = Instant::now();
        let mut stats = self.write_sources(writer)?;
        stats.resources = self.write_resources(writer)?;
        writer.close()?;
        self.log_summary(&stats, started);
        Ok(stats)
    }

    /// Write sources and package-infos to `sources` and resources to
    /// `resources`, then close both.
    pub fn build_split(
        &self,
        sources: &mut dyn CodeWriter,
        resources: &mut dyn CodeWriter,
    ) -> Result<BuildStats> {
        let started = Instant::now();
        let mut stats = self.write_sources(sources)?;
        stats.resources = self.write_resources(resources)?;
        sources.close()?;
        resources.close()?;
        self.log_summary(&stats, started);
        Ok(stats)
    }

    fn write_sources(&self, writer: &mut dyn CodeWriter) -> Result<BuildStats> {
        let mut stats = BuildStats::default();
        for unit in self.render_all()? {
            trace!(dir = %unit.dir, file = %unit.file_name, "writing unit");
            let mut sink = writer.open_text(&unit.dir, &unit.file_name)?;
            sink.write_str(&unit.text)?;
            sink.close()?;
            stats.sources += 1;
        }
        for package in self.model.packages().filter(|p| p.has_package_info()) {
            let text = render_package_info(package, &self.config);
            let mut sink = writer.open_text(package.dir(), PACKAGE_INFO)?;
            sink.write_str(&text)?;
            sink.close()?;
            stats.package_infos += 1;
        }
        Ok(stats)
    }

    fn write_resources(&self, writer: &mut dyn CodeWriter) -> Result<usize> {
        let sets = self
            .model
            .packages()
            .map(|p| p.resources())
            .chain(self.model.resource_dirs());
        let mut written = 0;
        for resources in sets {
            written += write_resource_set(resources, writer)?;
        }
        Ok(written)
    }

    fn log_summary(&self, stats: &BuildStats, started: Instant) {
        info!(
            sources = stats.sources,
            package_infos = stats.package_infos,
            resources = stats.resources,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "code model written"
        );
    }
}

fn write_resource_set(resources: &Resources, writer: &mut dyn CodeWriter) -> Result<usize> {
    for file in resources.files() {
        trace!(dir = %resources.dir(), file = file.name(), "writing resource");
        let mut sink = writer.open_binary(resources.dir(), file.name())?;
        sink.write_all(file.bytes())?;
        sink.close()?;
    }
    Ok(resources.files().len())
}

fn package_dir(package: &str) -> Result<OutputDir> {
    if package.is_empty() {
        Ok(OutputDir::root())
    } else {
        Ok(OutputDir::package(package)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassKind, Modifiers, ResourceFile};
    use codemodel_writer::MemoryCodeWriter;

    #[test]
    fn test_build_writes_every_artifact() {
        let mut model = CodeModel::new();
        model
            .define_class(Modifiers::PUBLIC, "demo.A", ClassKind::Class)
            .unwrap();
        model
            .define_class(Modifiers::PUBLIC, "B", ClassKind::Interface)
            .unwrap();
        model.package("demo").unwrap().javadoc("Demo package.");
        model
            .resource_dir("META-INF/services")
            .unwrap()
            .add(ResourceFile::text("demo.Service", "demo.A\n"))
            .unwrap();

        let mut writer = MemoryCodeWriter::new();
        let stats = ModelWriter::new(&model, RenderConfig::default())
            .build(&mut writer)
            .unwrap();

        assert_eq!(
            stats,
            BuildStats {
                sources: 2,
                package_infos: 1,
                resources: 1
            }
        );
        assert!(writer.get("demo/A.java").is_some());
        assert!(writer.get("B.java").is_some());
        assert!(writer.get("demo/package-info.java").is_some());
        assert_eq!(
            writer.get("META-INF/services/demo.Service"),
            Some(b"demo.A\n".as_slice())
        );
    }

    #[test]
    fn test_nested_class_has_no_unit() {
        let mut model = CodeModel::new();
        let outer = model
            .define_class(Modifiers::PUBLIC, "demo.Outer", ClassKind::Class)
            .unwrap();
        let inner = model
            .define_nested(outer, Modifiers::STATIC, "Inner", ClassKind::Class)
            .unwrap();
        let writer = ModelWriter::new(&model, RenderConfig::default());
        assert!(writer.render_unit(inner).is_err());
        assert_eq!(writer.render_all().unwrap().len(), 1);
    }
}
