//! Field shape to target type mapping.
//!
//! The mapping is a pure function of a field's shape (scalar kind, reference
//! target, label, map-entry flag, oneof membership, proto3-optional flag):
//! two fields with identical shape always map identically, independent of
//! declaration order or surrounding message.
//!
//! ## Numeric widening
//!
//! All 32-bit integer kinds and both floating kinds map to `number`. The
//! 64-bit kinds map to `bigint`: `number` cannot represent the full 64-bit
//! range, and values above 2^53 would silently lose precision.

use crate::decl::{Scalar, TypeExpr};
use crate::error::{Error, Result};
use crate::index::TypeIndex;
use crate::synth::symbol::ImportAllocator;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto};

/// Maps field shapes to target type expressions for one file's synthesis.
///
/// Borrows the global [`TypeIndex`] read-only and the file's
/// [`ImportAllocator`] mutably: resolving a cross-file reference mints (or
/// reuses) the alias of the *referenced* type's defining file.
pub struct TypeMapper<'a> {
    index: &'a TypeIndex,
    aliases: &'a mut ImportAllocator,
    file: &'a FileDescriptorProto,
}

impl<'a> TypeMapper<'a> {
    /// Creates a mapper for one file's synthesis session
    pub fn new(
        index: &'a TypeIndex,
        aliases: &'a mut ImportAllocator,
        file: &'a FileDescriptorProto,
    ) -> Self {
        Self {
            index,
            aliases,
            file,
        }
    }

    /// Maps one field of `message` to its target type expression.
    ///
    /// `scope` is the fully-qualified name of the declaring message (without
    /// the leading dot), used to identify the field in errors.
    pub fn field_type(
        &mut self,
        scope: &str,
        message: &DescriptorProto,
        field: &FieldDescriptorProto,
    ) -> Result<TypeExpr> {
        let referrer = format!("{}.{}", scope, field.name());

        if let Some(entry) = find_map_entry(message, field) {
            let key = entry_field(entry, &referrer, 1, "key")?;
            let value = entry_field(entry, &referrer, 2, "value")?;
            let key_ty = self.base_type(&referrer, key)?;
            let value_ty = self.base_type(&referrer, value)?;
            return Ok(TypeExpr::Map(Box::new(key_ty), Box::new(value_ty)));
        }

        if field.label() == Label::Repeated {
            let element = self.base_type(&referrer, field)?;
            return Ok(TypeExpr::Array(Box::new(element)));
        }

        let base = self.base_type(&referrer, field)?;

        // Members of a real oneof carry their presence in the group's
        // discriminator, not in the member type.
        let in_real_oneof = field.oneof_index.is_some() && !field.proto3_optional();
        if in_real_oneof {
            return Ok(base);
        }

        // Singular message fields are always implicitly optional; scalars and
        // enums only when the schema opts into explicit presence.
        if field.r#type() == Type::Message || field.proto3_optional() {
            return Ok(TypeExpr::Optional(Box::new(base)));
        }

        Ok(base)
    }

    /// Resolves a fully-qualified type path into a reference expression,
    /// qualified by the defining file's import alias when the type lives in
    /// another file.
    pub fn reference(&mut self, referrer: &str, type_name: &str) -> Result<TypeExpr> {
        let entry = self
            .index
            .get(type_name)
            .ok_or_else(|| Error::unresolved_reference(referrer, type_name))?;

        if entry.is_local_to(self.file.name()) {
            Ok(TypeExpr::Local(entry.path.clone()))
        } else {
            let alias = self.aliases.alias(&entry.file);
            Ok(TypeExpr::Imported {
                alias: alias.as_str().to_string(),
                segments: entry.qualified_segments(),
            })
        }
    }

    fn base_type(&mut self, referrer: &str, field: &FieldDescriptorProto) -> Result<TypeExpr> {
        let scalar = match field.r#type() {
            Type::Message | Type::Enum => {
                return self.reference(referrer, field.type_name());
            }
            Type::Group => {
                return Err(Error::unsupported_shape(referrer, "group"));
            }
            Type::Double | Type::Float => Scalar::Number,
            Type::Int32 | Type::Uint32 | Type::Sint32 | Type::Fixed32 | Type::Sfixed32 => {
                Scalar::Number
            }
            Type::Int64 | Type::Uint64 | Type::Sint64 | Type::Fixed64 | Type::Sfixed64 => {
                Scalar::BigInt
            }
            Type::Bool => Scalar::Boolean,
            Type::String => Scalar::String,
            Type::Bytes => Scalar::Bytes,
        };
        Ok(TypeExpr::Scalar(scalar))
    }
}

/// Finds the synthetic map entry descriptor for a map field, if the field is
/// one.
///
/// Map entries are always direct nested types of the message declaring the
/// map field, so a scan of `nested_type` suffices.
fn find_map_entry<'m>(
    message: &'m DescriptorProto,
    field: &FieldDescriptorProto,
) -> Option<&'m DescriptorProto> {
    if field.label() != Label::Repeated || field.r#type() != Type::Message {
        return None;
    }

    let type_name = field.type_name();
    message.nested_type.iter().find(|nested| {
        let suffix = format!(".{}", nested.name());
        (type_name.ends_with(&suffix) || type_name == nested.name())
            && nested.options.as_ref().is_some_and(|o| o.map_entry())
    })
}

fn entry_field<'m>(
    entry: &'m DescriptorProto,
    referrer: &str,
    number: i32,
    role: &str,
) -> Result<&'m FieldDescriptorProto> {
    entry
        .field
        .iter()
        .find(|f| f.number() == number)
        .ok_or_else(|| {
            Error::malformed_descriptor(referrer, format!("map entry has no {} field", role))
        })
}
