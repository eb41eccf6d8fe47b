//! Global type index over the full descriptor set.
//!
//! A field in file A may reference a type defined in file B regardless of
//! declaration or dependency order, so the index is built over **all** input
//! files before any per-file synthesis begins. Cross-file and forward
//! same-file references are resolved by fully-qualified path lookup, never by
//! structural linkage.
//!
//! ## Path format
//!
//! Every message and enum is keyed by its package-rooted absolute path with a
//! leading dot, matching the `type_name` spelling in field and method
//! descriptors: `.my.pkg.Outer.Inner`.

use crate::error::{Error, Result};
use prost_types::{DescriptorProto, EnumDescriptorProto, FileDescriptorProto};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Kind of an indexed type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// A message descriptor
    Message,
    /// An enum descriptor
    Enum,
}

/// Index entry describing where a type is defined.
///
/// Entries are created once during the indexing pass and are immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntry {
    /// Name of the file defining the type
    pub file: String,
    /// Package of the defining file (empty if the file declares none)
    pub package: String,
    /// Nesting path within the defining file, package-root-relative
    /// (e.g. `["Outer", "Inner"]`)
    pub path: Vec<String>,
    /// Whether the entry is a message or an enum
    pub kind: TypeKind,
}

impl TypeEntry {
    /// Returns true if the type is defined in the named file
    pub fn is_local_to(&self, file: &str) -> bool {
        self.file == file
    }

    /// Package plus nesting path segments, for qualification under an
    /// import alias
    pub fn qualified_segments(&self) -> Vec<String> {
        self.package
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .chain(self.path.iter().cloned())
            .collect()
    }
}

/// Mapping from fully-qualified type path to its defining descriptor.
#[derive(Debug, Default)]
pub struct TypeIndex {
    entries: BTreeMap<String, TypeEntry>,
}

impl TypeIndex {
    /// Builds the index by walking every file's top-level and nested
    /// message/enum descriptors.
    ///
    /// Fails with [`Error::DuplicateTypePath`] if two distinct descriptors
    /// resolve to the same fully-qualified path.
    pub fn build(files: &[FileDescriptorProto]) -> Result<Self> {
        let mut index = Self::default();

        for file in files {
            let root = if file.package().is_empty() {
                String::new()
            } else {
                format!(".{}", file.package())
            };

            for enum_type in &file.enum_type {
                index.insert_enum(file, &root, &[], enum_type)?;
            }
            for message in &file.message_type {
                index.insert_message(file, &root, &[], message)?;
            }
        }

        debug!("indexed {} types across {} files", index.len(), files.len());
        Ok(index)
    }

    /// Looks up a fully-qualified, leading-dot type path
    pub fn get(&self, path: &str) -> Option<&TypeEntry> {
        self.entries.get(path)
    }

    /// Number of indexed types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_message(
        &mut self,
        file: &FileDescriptorProto,
        prefix: &str,
        nesting: &[String],
        message: &DescriptorProto,
    ) -> Result<()> {
        let fq = format!("{}.{}", prefix, message.name());
        let mut path = nesting.to_vec();
        path.push(message.name().to_string());

        self.insert(
            fq.clone(),
            TypeEntry {
                file: file.name().to_string(),
                package: file.package().to_string(),
                path: path.clone(),
                kind: TypeKind::Message,
            },
        )?;

        for enum_type in &message.enum_type {
            self.insert_enum(file, &fq, &path, enum_type)?;
        }
        for nested in &message.nested_type {
            self.insert_message(file, &fq, &path, nested)?;
        }

        Ok(())
    }

    fn insert_enum(
        &mut self,
        file: &FileDescriptorProto,
        prefix: &str,
        nesting: &[String],
        enum_type: &EnumDescriptorProto,
    ) -> Result<()> {
        let fq = format!("{}.{}", prefix, enum_type.name());
        let mut path = nesting.to_vec();
        path.push(enum_type.name().to_string());

        self.insert(
            fq,
            TypeEntry {
                file: file.name().to_string(),
                package: file.package().to_string(),
                path,
                kind: TypeKind::Enum,
            },
        )
    }

    fn insert(&mut self, fq: String, entry: TypeEntry) -> Result<()> {
        trace!("indexing {} from {}", fq, entry.file);

        if let Some(existing) = self.entries.get(&fq) {
            return Err(Error::duplicate_type_path(fq, &existing.file, &entry.file));
        }
        self.entries.insert(fq, entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{enum_with_values, file, message};

    #[test]
    fn test_top_level_and_nested_paths() {
        let mut outer = message("Outer");
        outer.nested_type.push(message("Inner"));
        outer.enum_type.push(enum_with_values("Kind", &[("UNKNOWN", 0)]));

        let mut f = file("a.proto", "pkg", &[]);
        f.message_type.push(outer);

        let index = TypeIndex::build(&[f]).unwrap();
        assert_eq!(index.len(), 3);

        let inner = index.get(".pkg.Outer.Inner").unwrap();
        assert_eq!(inner.file, "a.proto");
        assert_eq!(inner.path, vec!["Outer".to_string(), "Inner".to_string()]);
        assert_eq!(inner.kind, TypeKind::Message);

        let kind = index.get(".pkg.Outer.Kind").unwrap();
        assert_eq!(kind.kind, TypeKind::Enum);
    }

    #[test]
    fn test_packageless_paths() {
        let mut f = file("a.proto", "", &[]);
        f.message_type.push(message("Foo"));

        let index = TypeIndex::build(&[f]).unwrap();
        assert!(index.get(".Foo").is_some());
        assert!(index.get(".pkg.Foo").is_none());
    }

    #[test]
    fn test_cross_file_lookup() {
        let mut a = file("a.proto", "pkg", &[]);
        a.message_type.push(message("Foo"));
        let mut b = file("b.proto", "pkg", &["a.proto"]);
        b.message_type.push(message("Bar"));

        let index = TypeIndex::build(&[a, b]).unwrap();
        assert!(index.get(".pkg.Foo").unwrap().is_local_to("a.proto"));
        assert!(index.get(".pkg.Bar").unwrap().is_local_to("b.proto"));
    }

    #[test]
    fn test_duplicate_path_is_fatal() {
        let mut a = file("a.proto", "pkg", &[]);
        a.message_type.push(message("Foo"));
        let mut b = file("b.proto", "pkg", &[]);
        b.message_type.push(message("Foo"));

        let err = TypeIndex::build(&[a, b]).unwrap_err();
        assert!(matches!(err, Error::DuplicateTypePath { .. }));
        assert!(err.to_string().contains(".pkg.Foo"));
    }

    #[test]
    fn test_qualified_segments() {
        let entry = TypeEntry {
            file: "a.proto".to_string(),
            package: "my.pkg".to_string(),
            path: vec!["Outer".to_string(), "Inner".to_string()],
            kind: TypeKind::Message,
        };
        assert_eq!(entry.qualified_segments(), vec!["my", "pkg", "Outer", "Inner"]);

        let bare = TypeEntry {
            file: "a.proto".to_string(),
            package: String::new(),
            path: vec!["Foo".to_string()],
            kind: TypeKind::Message,
        };
        assert_eq!(bare.qualified_segments(), vec!["Foo"]);
    }
}
