//! A sample model touching most of the declaration surface.

use codemodel_api::{CodeWriter, Encoding};
use codemodel_core::model::{
    AnnotationUse, AnnotationValue, AssignOp, ClassKind, CodeModel, Expr, Field, ForEach, Lambda,
    Method, Modifiers, ResourceFile, Try, TypeRef,
};
use codemodel_core::{BuildStats, ModelWriter, RenderConfig, Result};
use codemodel_writer::{FileCodeWriter, PrologueCodeWriter, SingleStreamCodeWriter, ZipCodeWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

pub enum Target {
    Stdout,
    Directory(PathBuf),
    Zip(PathBuf),
}

pub struct DemoOptions {
    pub target: Target,
    pub config: Option<PathBuf>,
    pub encoding: Encoding,
    pub prologue: Option<String>,
}

pub const PACKAGE: &str = "com.example.shapes";

struct Refs {
    string: TypeRef,
    list: TypeRef,
    array_list: TypeRef,
    map: TypeRef,
    math: TypeRef,
    files: TypeRef,
    path: TypeRef,
    reader: TypeRef,
    io_exception: TypeRef,
}

impl Refs {
    fn new(model: &CodeModel) -> Result<Self> {
        Ok(Self {
            string: model.ref_type("java.lang.String")?,
            list: model.ref_type("java.util.List")?,
            array_list: model.ref_type("java.util.ArrayList")?,
            map: model.ref_type("java.util.Map")?,
            math: model.ref_type("java.lang.Math")?,
            files: model.ref_type("java.nio.file.Files")?,
            path: model.ref_type("java.nio.file.Path")?,
            reader: model.ref_type("java.io.BufferedReader")?,
            io_exception: model.ref_type("java.io.IOException")?,
        })
    }
}

/// Build the sample model.
pub fn build_sample() -> Result<CodeModel> {
    let mut model = CodeModel::new();
    let refs = Refs::new(&model)?;
    let override_ann = AnnotationUse::new(model.ref_class("java.lang.Override")?);

    model
        .package(PACKAGE)?
        .javadoc("Shapes and a registry to keep them in.");

    let shape_id = model.define_class(
        Modifiers::PUBLIC,
        &format!("{PACKAGE}.Shape"),
        ClassKind::Interface,
    )?;
    let shape = model.class(shape_id)?.as_type();
    {
        let class = model.class_mut(shape_id)?;
        class.javadoc("Anything with an area.");
        class.add_method(Method::new(Modifiers::empty(), TypeRef::double(), "area")?)?;
        let mut name = Method::new(Modifiers::DEFAULT, refs.string.clone(), "name")?;
        name.body().ret(
            Expr::this()
                .invoke("getClass")?
                .into_expr()
                .invoke("getSimpleName")?,
        );
        class.add_method(name)?;
    }

    let color_id =
        model.define_class(Modifiers::PUBLIC, &format!("{PACKAGE}.Color"), ClassKind::Enum)?;
    {
        let class = model.class_mut(color_id)?;
        for (name, hex) in [("RED", "#f00"), ("GREEN", "#0f0"), ("BLUE", "#00f")] {
            class.enum_constant(name)?.arg(hex);
        }
        let hex = class.add_field(Field::new(
            Modifiers::PRIVATE | Modifiers::FINAL,
            refs.string.clone(),
            "hex",
        )?)?;
        let mut ctor = Method::constructor(Modifiers::empty())?;
        let param = ctor.param(Modifiers::empty(), refs.string.clone(), "hex")?;
        ctor.body()
            .add(Expr::this().field(hex.name())?.assign(param.expr()));
        class.add_constructor(ctor)?;
    }

    let circle_id = model.define_class(
        Modifiers::PUBLIC | Modifiers::FINAL,
        &format!("{PACKAGE}.Circle"),
        ClassKind::Class,
    )?;
    {
        let class = model.class_mut(circle_id)?;
        class.implements(shape.clone())?;
        let radius = class.add_field(Field::new(
            Modifiers::PRIVATE | Modifiers::FINAL,
            TypeRef::double(),
            "radius",
        )?)?;
        let mut ctor = Method::constructor(Modifiers::PUBLIC)?;
        let param = ctor.param(Modifiers::empty(), TypeRef::double(), "radius")?;
        ctor.body()
            .add(Expr::this().field("radius")?.assign(param.expr()));
        class.add_constructor(ctor)?;

        let mut area = Method::new(Modifiers::PUBLIC, TypeRef::double(), "area")?;
        area.annotate(override_ann.clone());
        area.body().ret(
            Expr::static_field(refs.math.clone(), "PI")?
                .mul(radius.expr())
                .mul(radius.expr()),
        );
        class.add_method(area)?;
    }

    let registry_id = model.define_class(
        Modifiers::PUBLIC,
        &format!("{PACKAGE}.Registry"),
        ClassKind::Class,
    )?;
    {
        let class = model.class_mut(registry_id)?;
        class.javadoc("Keeps shapes in insertion order.");
        let t = class.generify_bounded("T", vec![shape.clone()])?;
        let items = class.add_field(
            Field::new(
                Modifiers::PRIVATE | Modifiers::FINAL,
                refs.list.narrow([t.as_type()])?,
                "items",
            )?
            .init(Expr::new_instance(refs.array_list.narrow_empty()?)?),
        )?;

        let mut add = Method::new(Modifiers::PUBLIC, TypeRef::void(), "add")?;
        let item = add.param(Modifiers::FINAL, t.as_type(), "item")?;
        add.body().add(items.expr().invoke("add")?.arg(item.expr()));
        class.add_method(add)?;

        let mut total_area = Method::new(Modifiers::PUBLIC, TypeRef::double(), "totalArea")?;
        let body = total_area.body();
        let total = body.decl(
            Modifiers::empty(),
            TypeRef::double(),
            "total",
            Some(Expr::from(0.0)),
        )?;
        let mut each = ForEach::new(t.as_type(), "s", items.expr())?;
        let s = each.var();
        each.body()
            .add(total.expr().assign_op(AssignOp::Add, s.expr().invoke("area")?));
        body.add(each);
        body.ret(total.expr());
        class.add_method(total_area)?;

        let mut count = Method::new(Modifiers::PUBLIC, TypeRef::long(), "countNamed")?;
        let prefix = count.param(Modifiers::empty(), refs.string.clone(), "prefix")?;
        let mut filter = Lambda::new();
        let candidate = filter.param("shape")?;
        let filter = filter.returns(
            candidate
                .expr()
                .invoke("name")?
                .into_expr()
                .invoke("startsWith")?
                .arg(prefix.expr()),
        );
        count.body().ret(
            items
                .expr()
                .invoke("stream")?
                .into_expr()
                .invoke("filter")?
                .arg(Expr::lambda(filter))
                .into_expr()
                .invoke("count")?,
        );
        class.add_method(count)?;

        let mut first_line = Method::new(
            Modifiers::PUBLIC | Modifiers::STATIC,
            refs.string.clone(),
            "firstLine",
        )?;
        let path = first_line.param(Modifiers::empty(), refs.path.clone(), "path")?;
        first_line.throws(refs.io_exception.clone());
        let mut attempt = Try::new();
        let reader = attempt.resource(
            refs.reader.clone(),
            "reader",
            Expr::static_call(refs.files.clone(), "newBufferedReader")?.arg(path.expr()),
        )?;
        attempt.body().ret(reader.expr().invoke("readLine")?);
        first_line.body().add(attempt);
        class.add_method(first_line)?;
    }

    let entry_id = model.define_nested(
        registry_id,
        Modifiers::PUBLIC | Modifiers::STATIC,
        "Entry",
        ClassKind::Class,
    )?;
    let map_entry = model.ref_class("java.util.Map")?.nested("Entry")?;
    let suppress = AnnotationUse::new(model.ref_class("java.lang.SuppressWarnings")?)
        .value(AnnotationValue::array(["unchecked", "rawtypes"]));
    {
        let class = model.class_mut(entry_id)?;
        let mut of = Method::new(
            Modifiers::PUBLIC | Modifiers::STATIC,
            TypeRef::class(map_entry).narrow([refs.string.clone(), shape.clone()])?,
            "of",
        )?;
        of.annotate(suppress);
        let key = of.param(Modifiers::empty(), refs.string.clone(), "key")?;
        let value = of.param(Modifiers::empty(), shape.clone(), "value")?;
        of.body().ret(
            Expr::static_call(refs.map.clone(), "entry")?
                .arg(key.expr())
                .arg(value.expr()),
        );
        class.add_method(of)?;
    }

    model.resource_dir("META-INF/services")?.add(ResourceFile::text(
        &format!("{PACKAGE}.Shape"),
        format!("{PACKAGE}.Circle\n"),
    ))?;

    info!(classes = model.classes().count(), "sample model built");
    Ok(model)
}

pub fn run(options: DemoOptions) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = match &options.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };
    let model = build_sample()?;
    let writer = ModelWriter::new(&model, config);
    let prologue = options.prologue.as_deref();

    let stats = match options.target {
        Target::Stdout => {
            let out = SingleStreamCodeWriter::new(std::io::stdout().lock())
                .with_encoding(options.encoding);
            write_with(&writer, out, prologue)?;
            return Ok(());
        }
        Target::Directory(dir) => {
            std::fs::create_dir_all(&dir)?;
            let out = FileCodeWriter::new(dir).with_encoding(options.encoding);
            write_with(&writer, out, prologue)?
        }
        Target::Zip(file) => {
            let out = ZipCodeWriter::new(BufWriter::new(File::create(file)?))
                .with_encoding(options.encoding);
            write_with(&writer, out, prologue)?
        }
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn write_with<W: CodeWriter>(
    writer: &ModelWriter<'_>,
    mut out: W,
    prologue: Option<&str>,
) -> Result<BuildStats> {
    match prologue {
        Some(text) => writer.build(&mut PrologueCodeWriter::new(out, text)),
        None => writer.build(&mut out),
    }
}
