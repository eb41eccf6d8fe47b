//! Message and enum declaration synthesis.
//!
//! Recursion order is fixed: nested enums, then nested messages, then the
//! message's own fields, all wrapped into one [`MessageDecl`] named after the
//! descriptor's local name. Synthetic map entry messages never surface as
//! declarations; their key/value types are folded into the map field's type
//! expression by the mapper.

use crate::decl::{Declaration, EnumDecl, EnumValueDecl, FieldDecl, MessageDecl, OneofDecl};
use crate::error::Result;
use crate::synth::mapper::TypeMapper;
use std::collections::HashMap;

use prost_types::{DescriptorProto, EnumDescriptorProto};

/// Recursively synthesizes a message descriptor and everything nested in it.
///
/// `scope` is the message's fully-qualified name without the leading dot
/// (e.g. `pkg.Outer.Inner`), used to identify fields in errors.
pub(crate) fn synthesize_message(
    mapper: &mut TypeMapper<'_>,
    scope: &str,
    message: &DescriptorProto,
) -> Result<Declaration> {
    let mut nested = Vec::new();

    for enum_type in &message.enum_type {
        nested.push(synthesize_enum(enum_type));
    }

    for nested_message in &message.nested_type {
        if nested_message.options.as_ref().is_some_and(|o| o.map_entry()) {
            continue;
        }
        let child_scope = format!("{}.{}", scope, nested_message.name());
        nested.push(synthesize_message(mapper, &child_scope, nested_message)?);
    }

    // Bucket real oneof members by group index; everything else is a plain
    // field. Synthetic oneofs (proto3 optional) are not groups.
    let mut members: HashMap<i32, Vec<FieldDecl>> = HashMap::new();
    let mut fields = Vec::new();

    for field in &message.field {
        let decl = FieldDecl {
            name: field.name().to_string(),
            number: field.number(),
            ty: mapper.field_type(scope, message, field)?,
            deprecated: field.options.as_ref().is_some_and(|o| o.deprecated()),
        };

        match field.oneof_index {
            Some(group) if !field.proto3_optional() => {
                members.entry(group).or_default().push(decl);
            }
            _ => fields.push(decl),
        }
    }

    let oneofs = message
        .oneof_decl
        .iter()
        .enumerate()
        .filter_map(|(i, oneof)| {
            let group_members = members.remove(&(i as i32))?;
            Some(OneofDecl {
                name: oneof.name().to_string(),
                type_name: to_pascal_case(oneof.name()),
                members: group_members,
            })
        })
        .collect();

    Ok(Declaration::Message(MessageDecl {
        name: message.name().to_string(),
        deprecated: message.options.as_ref().is_some_and(|o| o.deprecated()),
        nested,
        oneofs,
        fields,
    }))
}

/// Synthesizes an enum descriptor, preserving declared numeric values
/// verbatim. Duplicate values (aliases) are permitted per schema semantics.
pub(crate) fn synthesize_enum(enum_type: &EnumDescriptorProto) -> Declaration {
    Declaration::Enum(EnumDecl {
        name: enum_type.name().to_string(),
        deprecated: enum_type.options.as_ref().is_some_and(|o| o.deprecated()),
        values: enum_type
            .value
            .iter()
            .map(|value| EnumValueDecl {
                name: value.name().to_string(),
                number: value.number(),
                deprecated: value.options.as_ref().is_some_and(|o| o.deprecated()),
            })
            .collect(),
    })
}

/// Convert a snake_case name to PascalCase
fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}
