//! Declaration synthesis pipeline.
//!
//! Processing is strictly two-phase:
//!
//! 1. [`TypeIndex::build`] consumes every input file exactly once, producing
//!    the global, immutable type index.
//! 2. Files are synthesized one at a time, in input order, each under a
//!    freshly created [`symbol::ImportAllocator`] that is dropped before the
//!    next file begins.
//!
//! The pipeline is single-threaded: alias state is scoped to exactly one
//! file at a time, and the only shared structure (the index) is write-once
//! before any reader exists. There is no partial success; the first fatal
//! error aborts the whole run.

pub mod mapper;
mod message;
mod service;
pub mod symbol;

use crate::decl::{DeclarationUnit, ImportBinding};
use crate::error::Result;
use crate::index::TypeIndex;
use crate::options::Options;
use crate::synth::mapper::TypeMapper;
use crate::synth::symbol::{ImportAllocator, MESSAGE_RUNTIME_ALIAS, RPC_RUNTIME_ALIAS};
use prost_types::compiler::Version;
use prost_types::FileDescriptorProto;
use tracing::debug;

/// Generator identity stamped into every documentation header
pub const GENERATOR_NAME: &str = "protoc-gen-protots";

/// Module specifier for the message runtime import
const MESSAGE_RUNTIME_MODULE: &str = "google-protobuf";

/// Translates a full descriptor set into one declaration unit per file.
#[derive(Debug)]
pub struct Generator<'a> {
    files: &'a [FileDescriptorProto],
    index: TypeIndex,
    options: Options,
    compiler_version: String,
}

impl<'a> Generator<'a> {
    /// Indexes the full file set and prepares synthesis.
    ///
    /// Fails if two descriptors resolve to the same fully-qualified path;
    /// nothing is synthesized in that case.
    pub fn new(
        files: &'a [FileDescriptorProto],
        options: Options,
        compiler_version: Option<&Version>,
    ) -> Result<Self> {
        let index = TypeIndex::build(files)?;
        let compiler_version = compiler_version
            .map(|v| format!("{}.{}.{}", v.major(), v.minor(), v.patch()))
            .unwrap_or_else(|| "0.0.0".to_string());

        Ok(Self {
            files,
            index,
            options,
            compiler_version,
        })
    }

    /// Synthesizes every input file, in input order.
    ///
    /// Aborts on the first error; no partial unit list is ever returned.
    pub fn generate(&self) -> Result<Vec<DeclarationUnit>> {
        self.files
            .iter()
            .map(|file| self.synthesize_file(file))
            .collect()
    }

    fn synthesize_file(&self, file: &FileDescriptorProto) -> Result<DeclarationUnit> {
        debug!("synthesizing {}", file.name());

        // One allocator per file; seeding it from the declared dependency
        // list fixes both the alias numbering and the import order.
        let mut aliases = ImportAllocator::new();
        for dependency in &file.dependency {
            aliases.alias(dependency);
        }

        let mut mapper = TypeMapper::new(&self.index, &mut aliases, file);
        let mut declarations = Vec::new();

        for enum_type in &file.enum_type {
            declarations.push(message::synthesize_enum(enum_type));
        }
        for descriptor in &file.message_type {
            let scope = qualify(file.package(), descriptor.name());
            declarations.push(message::synthesize_message(&mut mapper, &scope, descriptor)?);
        }

        let has_types = !declarations.is_empty();

        for descriptor in &file.service {
            declarations.extend(service::synthesize_service(
                &mut mapper,
                file.package(),
                descriptor,
            )?);
        }

        let mut imports: Vec<ImportBinding> = aliases
            .bindings()
            .map(|(dependency, alias)| ImportBinding {
                alias: alias.as_str().to_string(),
                module: relative_module_path(file.name(), dependency),
            })
            .collect();
        if has_types {
            imports.push(ImportBinding {
                alias: MESSAGE_RUNTIME_ALIAS.to_string(),
                module: MESSAGE_RUNTIME_MODULE.to_string(),
            });
        }
        if !file.service.is_empty() {
            imports.push(ImportBinding {
                alias: RPC_RUNTIME_ALIAS.to_string(),
                module: self.options.grpc_package.clone(),
            });
        }

        let mut header = vec![
            format!("Generated by {}. DO NOT EDIT!", GENERATOR_NAME),
            format!("compiler version: {}", self.compiler_version),
            format!("source: {}", file.name()),
        ];
        if file.options.as_ref().is_some_and(|o| o.deprecated()) {
            header.push("@deprecated".to_string());
        }

        let namespace = if file.package().is_empty() {
            None
        } else {
            Some(file.package().split('.').map(str::to_string).collect())
        };

        Ok(DeclarationUnit {
            source: file.name().to_string(),
            name: replace_extension(file.name(), ".ts"),
            header,
            imports,
            namespace,
            declarations,
        })
    }
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", package, name)
    }
}

/// Replace the extension of a file name (everything after the last dot,
/// unless that dot belongs to a directory component).
pub(crate) fn replace_extension(filename: &str, extension: &str) -> String {
    match filename.rfind('.') {
        Some(idx) if !filename[idx..].contains('/') => {
            format!("{}{}", &filename[..idx], extension)
        }
        _ => format!("{}{}", filename, extension),
    }
}

/// Computes the module specifier importing `dependency` from the directory
/// of `from`, with the dependency's extension stripped.
///
/// Descriptor file names always use forward slashes, so this is pure string
/// work with no filesystem involvement.
fn relative_module_path(from: &str, dependency: &str) -> String {
    let target = replace_extension(dependency, "");
    let from_dir: Vec<&str> = match from.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let target_parts: Vec<&str> = target.split('/').collect();

    let mut common = 0;
    while common < from_dir.len()
        && common + 1 < target_parts.len()
        && from_dir[common] == target_parts[common]
    {
        common += 1;
    }

    let mut parts: Vec<&str> = vec![".."; from_dir.len() - common];
    parts.extend(&target_parts[common..]);
    format!("./{}", parts.join("/"))
}
