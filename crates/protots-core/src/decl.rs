//! Declaration tree produced by synthesis.
//!
//! Synthesis never writes text. Every message, enum, and service descriptor is
//! translated into the plain data structures in this module, and rendering to
//! source text happens in a separate pass (see [`crate::render`]). The tree is
//! target-language-shaped (TypeScript) but carries no formatting decisions, so
//! alternative renderers can consume it unchanged.

/// A built-in target-language scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    /// IEEE-754 double and all 32-bit integer kinds
    Number,
    /// 64-bit integer kinds; preserves full precision
    BigInt,
    /// Boolean
    Boolean,
    /// UTF-8 string
    String,
    /// Raw byte payloads
    Bytes,
}

impl Scalar {
    /// Returns the target-language spelling of the scalar
    pub fn as_str(&self) -> &'static str {
        match self {
            Scalar::Number => "number",
            Scalar::BigInt => "bigint",
            Scalar::Boolean => "boolean",
            Scalar::String => "string",
            Scalar::Bytes => "Uint8Array",
        }
    }
}

/// A target-language type expression, as produced by the type mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A built-in scalar type
    Scalar(Scalar),
    /// A reference to a type defined in the same file, as its
    /// package-root-relative path segments
    Local(Vec<String>),
    /// A reference to a type defined in another file, qualified by that
    /// file's import alias
    Imported {
        /// Alias bound to the defining file's import
        alias: String,
        /// Package plus nesting path segments below the alias
        segments: Vec<String>,
    },
    /// An explicitly absent-able value (`T | undefined`)
    Optional(Box<TypeExpr>),
    /// An ordered sequence (`T[]`)
    Array(Box<TypeExpr>),
    /// A mapping container (`Map<K, V>`)
    Map(Box<TypeExpr>, Box<TypeExpr>),
}

/// One field of a synthesized message (or one arm of a oneof group).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field name as declared in the schema
    pub name: String,
    /// Declared field number
    pub number: i32,
    /// Mapped target type
    pub ty: TypeExpr,
    /// Deprecation marker from the field options
    pub deprecated: bool,
}

/// A oneof group, synthesized as a tagged union over its member fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofDecl {
    /// Group name as declared in the schema
    pub name: String,
    /// Name of the synthesized union type (PascalCase of the group name)
    pub type_name: String,
    /// Member fields, each contributing one union arm
    pub members: Vec<FieldDecl>,
}

/// One value of a synthesized enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDecl {
    /// Value name
    pub name: String,
    /// Declared numeric value, preserved verbatim (aliases permitted)
    pub number: i32,
    /// Deprecation marker from the value options
    pub deprecated: bool,
}

/// A synthesized enum declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    /// Local (non-qualified) enum name
    pub name: String,
    /// Deprecation marker from the enum options
    pub deprecated: bool,
    /// Values in declaration order
    pub values: Vec<EnumValueDecl>,
}

/// A synthesized message declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDecl {
    /// Local (non-qualified) message name
    pub name: String,
    /// Deprecation marker from the message options
    pub deprecated: bool,
    /// Nested declarations: enums first, then messages, matching synthesis
    /// order (map entry messages are never included)
    pub nested: Vec<Declaration>,
    /// Real (non-synthetic) oneof groups
    pub oneofs: Vec<OneofDecl>,
    /// Fields outside any oneof group, in declaration order
    pub fields: Vec<FieldDecl>,
}

/// Cardinality of an RPC method, from its streaming flag pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodCardinality {
    /// One request, one response
    Unary,
    /// One request, a stream of responses
    ServerStreaming,
    /// A stream of requests, one response
    ClientStreaming,
    /// Independent request and response streams
    Bidi,
}

/// One RPC method of a synthesized service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    /// Method name as declared in the schema
    pub name: String,
    /// Full RPC path (`/<package>.<Service>/<Method>`)
    pub path: String,
    /// Mapped request type
    pub request: TypeExpr,
    /// Mapped response type
    pub response: TypeExpr,
    /// Whether the client sends a stream of requests
    pub client_streaming: bool,
    /// Whether the server sends a stream of responses
    pub server_streaming: bool,
}

impl MethodDecl {
    /// Returns the method's cardinality from its streaming flag pair
    pub fn cardinality(&self) -> MethodCardinality {
        match (self.client_streaming, self.server_streaming) {
            (false, false) => MethodCardinality::Unary,
            (false, true) => MethodCardinality::ServerStreaming,
            (true, false) => MethodCardinality::ClientStreaming,
            (true, true) => MethodCardinality::Bidi,
        }
    }
}

/// A synthesized service client declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDecl {
    /// Client type name (`<Service>Client`)
    pub name: String,
    /// Deprecation marker from the service options
    pub deprecated: bool,
    /// Methods in declaration order
    pub methods: Vec<MethodDecl>,
}

/// A synthesized unimplemented-server-skeleton declaration.
///
/// Every method body unconditionally signals "unimplemented"; implementers
/// override the methods they serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerDecl {
    /// Skeleton type name (`Unimplemented<Service>Service`)
    pub name: String,
    /// Deprecation marker from the service options
    pub deprecated: bool,
    /// Methods in declaration order
    pub methods: Vec<MethodDecl>,
}

/// One synthesized output declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    /// An enum declaration
    Enum(EnumDecl),
    /// A message declaration
    Message(MessageDecl),
    /// A service client declaration
    Client(ClientDecl),
    /// An unimplemented server skeleton declaration
    Server(ServerDecl),
}

/// An import binding in a declaration unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Identifier the module is bound to
    pub alias: String,
    /// Module specifier to import from
    pub module: String,
}

/// The complete synthesized output for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationUnit {
    /// Input file name the unit was synthesized from
    pub source: String,
    /// Output file name (input name with its extension replaced)
    pub name: String,
    /// Documentation header lines
    pub header: Vec<String>,
    /// Ordered import bindings (dependencies first, then runtime imports)
    pub imports: Vec<ImportBinding>,
    /// Namespace path mirroring the package, if the file declares one
    pub namespace: Option<Vec<String>>,
    /// Declarations in synthesis order
    pub declarations: Vec<Declaration>,
}
