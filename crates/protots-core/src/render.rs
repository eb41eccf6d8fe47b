//! Rendering of declaration units into TypeScript source text.
//!
//! The renderer is a deterministic, side-effect-free pretty-printer over the
//! declaration tree: same unit in, same text out, byte for byte. All
//! synthesis decisions (type mapping, aliasing, ordering) are made before
//! this module runs; nothing here consults descriptors or the type index.
//!
//! ## Output shape
//!
//! Messages render as an `export interface` merged with an `export namespace`
//! container holding the nested declarations and oneof union aliases. Enums
//! render as `export enum` with verbatim numeric values. Services render as a
//! client class extending the RPC runtime's `Client` plus an
//! `Unimplemented…Service` skeleton whose methods signal UNIMPLEMENTED.

use crate::decl::{
    ClientDecl, Declaration, DeclarationUnit, EnumDecl, FieldDecl, MessageDecl, MethodCardinality,
    MethodDecl, OneofDecl, ServerDecl, TypeExpr,
};
use crate::synth::symbol::RPC_RUNTIME_ALIAS;
use std::fmt::Write as FmtWrite;

/// Renders one declaration unit to TypeScript source text
pub fn render_unit(unit: &DeclarationUnit) -> String {
    let mut output = String::new();
    write_unit(unit, &mut output).expect("String write cannot fail");
    output
}

/// Writes one declaration unit to a formatter
pub fn write_unit(unit: &DeclarationUnit, w: &mut impl FmtWrite) -> std::fmt::Result {
    TsWriter::new(w).write_unit(unit)
}

struct TsWriter<'a, W: FmtWrite> {
    writer: &'a mut W,
    indent_level: usize,
}

impl<'a, W: FmtWrite> TsWriter<'a, W> {
    fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            indent_level: 0,
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    fn write_indent(&mut self) -> std::fmt::Result {
        for _ in 0..self.indent_level {
            write!(self.writer, "  ")?;
        }
        Ok(())
    }

    fn writeln(&mut self, s: &str) -> std::fmt::Result {
        self.write_indent()?;
        writeln!(self.writer, "{}", s)
    }

    fn write_unit(&mut self, unit: &DeclarationUnit) -> std::fmt::Result {
        writeln!(self.writer, "/**")?;
        for line in &unit.header {
            writeln!(self.writer, " * {}", line)?;
        }
        writeln!(self.writer, " */")?;

        for import in &unit.imports {
            writeln!(
                self.writer,
                "import * as {} from \"{}\";",
                import.alias, import.module
            )?;
        }

        match &unit.namespace {
            Some(segments) => {
                writeln!(self.writer, "export namespace {} {{", segments.join("."))?;
                self.indent();
                for declaration in &unit.declarations {
                    self.write_declaration(declaration)?;
                }
                self.dedent();
                writeln!(self.writer, "}}")?;
            }
            None => {
                for declaration in &unit.declarations {
                    self.write_declaration(declaration)?;
                }
            }
        }

        Ok(())
    }

    fn write_declaration(&mut self, declaration: &Declaration) -> std::fmt::Result {
        match declaration {
            Declaration::Enum(decl) => self.write_enum(decl),
            Declaration::Message(decl) => self.write_message(decl),
            Declaration::Client(decl) => self.write_client(decl),
            Declaration::Server(decl) => self.write_server(decl),
        }
    }

    fn write_deprecated(&mut self, deprecated: bool) -> std::fmt::Result {
        if deprecated {
            self.writeln("/** @deprecated */")?;
        }
        Ok(())
    }

    fn write_enum(&mut self, decl: &EnumDecl) -> std::fmt::Result {
        self.write_deprecated(decl.deprecated)?;
        self.writeln(&format!("export enum {} {{", decl.name))?;
        self.indent();

        for value in &decl.values {
            self.write_deprecated(value.deprecated)?;
            self.writeln(&format!("{} = {},", value.name, value.number))?;
        }

        self.dedent();
        self.writeln("}")
    }

    fn write_message(&mut self, decl: &MessageDecl) -> std::fmt::Result {
        // Container for nested declarations and oneof union aliases; merges
        // with the interface of the same name.
        if !decl.nested.is_empty() || !decl.oneofs.is_empty() {
            self.write_deprecated(decl.deprecated)?;
            self.writeln(&format!("export namespace {} {{", decl.name))?;
            self.indent();
            for nested in &decl.nested {
                self.write_declaration(nested)?;
            }
            for oneof in &decl.oneofs {
                self.write_oneof(oneof)?;
            }
            self.dedent();
            self.writeln("}")?;
        }

        self.write_deprecated(decl.deprecated)?;
        self.writeln(&format!("export interface {} {{", decl.name))?;
        self.indent();

        for field in &decl.fields {
            self.write_field(field)?;
        }
        for oneof in &decl.oneofs {
            self.writeln(&format!("{}: {}.{};", oneof.name, decl.name, oneof.type_name))?;
        }

        self.dedent();
        self.writeln("}")
    }

    fn write_field(&mut self, field: &FieldDecl) -> std::fmt::Result {
        self.write_deprecated(field.deprecated)?;
        match &field.ty {
            TypeExpr::Optional(inner) => {
                self.writeln(&format!("{}?: {} | undefined;", field.name, type_text(inner)))
            }
            ty => self.writeln(&format!("{}: {};", field.name, type_text(ty))),
        }
    }

    fn write_oneof(&mut self, oneof: &OneofDecl) -> std::fmt::Result {
        self.writeln(&format!("export type {} =", oneof.type_name))?;
        self.indent();
        for member in &oneof.members {
            self.writeln(&format!(
                "| {{ case: \"{}\"; value: {} }}",
                member.name,
                type_text(&member.ty)
            ))?;
        }
        self.writeln("| { case?: undefined };")?;
        self.dedent();
        Ok(())
    }

    fn write_client(&mut self, decl: &ClientDecl) -> std::fmt::Result {
        self.write_deprecated(decl.deprecated)?;
        self.writeln(&format!(
            "export class {} extends {}.Client {{",
            decl.name, RPC_RUNTIME_ALIAS
        ))?;
        self.indent();

        for method in &decl.methods {
            self.write_client_method(method)?;
        }

        self.dedent();
        self.writeln("}")
    }

    fn write_client_method(&mut self, method: &MethodDecl) -> std::fmt::Result {
        let request = type_text(&method.request);
        let response = type_text(&method.response);
        let callback = callback_text(&response);

        match method.cardinality() {
            MethodCardinality::Unary => {
                self.write_two_style_method(method, &request, &callback, &format!("Promise<{}>", response), "makeUnaryRequest")
            }
            MethodCardinality::ServerStreaming => self.write_two_style_method(
                method,
                &request,
                &callback,
                &format!("{}.ClientReadableStream<{}>", RPC_RUNTIME_ALIAS, response),
                "makeServerStreamRequest",
            ),
            MethodCardinality::ClientStreaming => {
                self.writeln(&format!(
                    "{}(callback: {}): {}.ClientWritableStream<{}> {{",
                    method.name, callback, RPC_RUNTIME_ALIAS, request
                ))?;
                self.indent();
                self.writeln(&format!(
                    "return this.makeClientStreamRequest(\"{}\", callback);",
                    method.path
                ))?;
                self.dedent();
                self.writeln("}")
            }
            MethodCardinality::Bidi => {
                self.writeln(&format!(
                    "{}(): {}.ClientDuplexStream<{}, {}> {{",
                    method.name, RPC_RUNTIME_ALIAS, request, response
                ))?;
                self.indent();
                self.writeln(&format!(
                    "return this.makeBidiStreamRequest(\"{}\");",
                    method.path
                ))?;
                self.dedent();
                self.writeln("}")
            }
        }
    }

    /// Asynchronous-result signature plus a callback-style overload, backed
    /// by one implementation signature accepting either convention.
    fn write_two_style_method(
        &mut self,
        method: &MethodDecl,
        request: &str,
        callback: &str,
        result: &str,
        runtime_call: &str,
    ) -> std::fmt::Result {
        self.writeln(&format!(
            "{}(request: {}): {};",
            method.name, request, result
        ))?;
        self.writeln(&format!(
            "{}(request: {}, callback: {}): void;",
            method.name, request, callback
        ))?;
        self.writeln(&format!(
            "{}(request: {}, callback?: {}): {} | void {{",
            method.name, request, callback, result
        ))?;
        self.indent();
        self.writeln(&format!(
            "return this.{}(\"{}\", request, callback);",
            runtime_call, method.path
        ))?;
        self.dedent();
        self.writeln("}")
    }

    fn write_server(&mut self, decl: &ServerDecl) -> std::fmt::Result {
        self.write_deprecated(decl.deprecated)?;
        self.writeln(&format!("export class {} {{", decl.name))?;
        self.indent();

        for method in &decl.methods {
            self.write_server_method(method)?;
        }

        self.dedent();
        self.writeln("}")
    }

    fn write_server_method(&mut self, method: &MethodDecl) -> std::fmt::Result {
        let request = type_text(&method.request);
        let response = type_text(&method.response);
        let grpc = RPC_RUNTIME_ALIAS;
        let unimplemented = format!(
            "{{ code: {}.status.UNIMPLEMENTED, details: \"{} is not implemented\" }} as {}.ServiceError",
            grpc, method.path, grpc
        );

        let (call_type, takes_callback) = match method.cardinality() {
            MethodCardinality::Unary => ("ServerUnaryCall", true),
            MethodCardinality::ServerStreaming => ("ServerWritableStream", false),
            MethodCardinality::ClientStreaming => ("ServerReadableStream", true),
            MethodCardinality::Bidi => ("ServerDuplexStream", false),
        };

        if takes_callback {
            self.writeln(&format!(
                "{}(call: {}.{}<{}, {}>, callback: {}.sendUnaryData<{}>): void {{",
                method.name, grpc, call_type, request, response, grpc, response
            ))?;
            self.indent();
            self.writeln(&format!("callback({}, null);", unimplemented))?;
        } else {
            self.writeln(&format!(
                "{}(call: {}.{}<{}, {}>): void {{",
                method.name, grpc, call_type, request, response
            ))?;
            self.indent();
            self.writeln(&format!("call.destroy({});", unimplemented))?;
        }
        self.dedent();
        self.writeln("}")
    }
}

/// Renders a type expression to its target-language spelling
fn type_text(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Scalar(scalar) => scalar.as_str().to_string(),
        TypeExpr::Local(segments) => segments.join("."),
        TypeExpr::Imported { alias, segments } => {
            format!("{}.{}", alias, segments.join("."))
        }
        TypeExpr::Optional(inner) => format!("{} | undefined", type_text(inner)),
        TypeExpr::Array(inner) => format!("{}[]", type_text(inner)),
        TypeExpr::Map(key, value) => {
            format!("Map<{}, {}>", type_text(key), type_text(value))
        }
    }
}

fn callback_text(response: &str) -> String {
    format!(
        "(error: {}.ServiceError | null, response?: {}) => void",
        RPC_RUNTIME_ALIAS, response
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{EnumValueDecl, ImportBinding, Scalar};
    use pretty_assertions::assert_eq;

    fn unit(declarations: Vec<Declaration>) -> DeclarationUnit {
        DeclarationUnit {
            source: "a.proto".to_string(),
            name: "a.ts".to_string(),
            header: vec!["source: a.proto".to_string()],
            imports: vec![],
            namespace: None,
            declarations,
        }
    }

    #[test]
    fn test_type_text() {
        assert_eq!(type_text(&TypeExpr::Scalar(Scalar::BigInt)), "bigint");
        assert_eq!(
            type_text(&TypeExpr::Local(vec!["Outer".into(), "Inner".into()])),
            "Outer.Inner"
        );
        assert_eq!(
            type_text(&TypeExpr::Imported {
                alias: "dep_1".into(),
                segments: vec!["pkg".into(), "Foo".into()],
            }),
            "dep_1.pkg.Foo"
        );
        assert_eq!(
            type_text(&TypeExpr::Array(Box::new(TypeExpr::Scalar(Scalar::Number)))),
            "number[]"
        );
        assert_eq!(
            type_text(&TypeExpr::Map(
                Box::new(TypeExpr::Scalar(Scalar::String)),
                Box::new(TypeExpr::Scalar(Scalar::BigInt)),
            )),
            "Map<string, bigint>"
        );
    }

    #[test]
    fn test_render_enum() {
        let rendered = render_unit(&unit(vec![Declaration::Enum(EnumDecl {
            name: "Role".to_string(),
            deprecated: false,
            values: vec![
                EnumValueDecl {
                    name: "UNKNOWN".to_string(),
                    number: 0,
                    deprecated: false,
                },
                EnumValueDecl {
                    name: "ADMIN".to_string(),
                    number: 1,
                    deprecated: true,
                },
            ],
        })]));

        let expected = "\
/**
 * source: a.proto
 */
export enum Role {
  UNKNOWN = 0,
  /** @deprecated */
  ADMIN = 1,
}
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_message_with_oneof() {
        let message = MessageDecl {
            name: "Event".to_string(),
            deprecated: false,
            nested: vec![],
            oneofs: vec![OneofDecl {
                name: "payload".to_string(),
                type_name: "Payload".to_string(),
                members: vec![
                    FieldDecl {
                        name: "text".to_string(),
                        number: 2,
                        ty: TypeExpr::Scalar(Scalar::String),
                        deprecated: false,
                    },
                    FieldDecl {
                        name: "data".to_string(),
                        number: 3,
                        ty: TypeExpr::Scalar(Scalar::Bytes),
                        deprecated: false,
                    },
                ],
            }],
            fields: vec![FieldDecl {
                name: "id".to_string(),
                number: 1,
                ty: TypeExpr::Scalar(Scalar::String),
                deprecated: false,
            }],
        };

        let rendered = render_unit(&unit(vec![Declaration::Message(message)]));
        let expected = "\
/**
 * source: a.proto
 */
export namespace Event {
  export type Payload =
    | { case: \"text\"; value: string }
    | { case: \"data\"; value: Uint8Array }
    | { case?: undefined };
}
export interface Event {
  id: string;
  payload: Event.Payload;
}
";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_optional_field() {
        let message = MessageDecl {
            name: "Baz".to_string(),
            deprecated: false,
            nested: vec![],
            oneofs: vec![],
            fields: vec![FieldDecl {
                name: "foo".to_string(),
                number: 1,
                ty: TypeExpr::Optional(Box::new(TypeExpr::Local(vec!["Foo".into()]))),
                deprecated: false,
            }],
        };

        let rendered = render_unit(&unit(vec![Declaration::Message(message)]));
        assert!(rendered.contains("foo?: Foo | undefined;"));
    }

    #[test]
    fn test_render_namespace_and_imports() {
        let mut u = unit(vec![Declaration::Message(MessageDecl {
            name: "Foo".to_string(),
            deprecated: false,
            nested: vec![],
            oneofs: vec![],
            fields: vec![],
        })]);
        u.imports = vec![
            ImportBinding {
                alias: "dep_1".to_string(),
                module: "./other".to_string(),
            },
            ImportBinding {
                alias: "pb".to_string(),
                module: "google-protobuf".to_string(),
            },
        ];
        u.namespace = Some(vec!["my".to_string(), "pkg".to_string()]);

        let rendered = render_unit(&u);
        let expected = "\
/**
 * source: a.proto
 */
import * as dep_1 from \"./other\";
import * as pb from \"google-protobuf\";
export namespace my.pkg {
  export interface Foo {
  }
}
";
        assert_eq!(rendered, expected);
    }

    fn unary_method() -> MethodDecl {
        MethodDecl {
            name: "Get".to_string(),
            path: "/pkg.Greeter/Get".to_string(),
            request: TypeExpr::Local(vec!["Req".into()]),
            response: TypeExpr::Local(vec!["Res".into()]),
            client_streaming: false,
            server_streaming: false,
        }
    }

    #[test]
    fn test_render_unary_client_has_both_calling_conventions() {
        let rendered = render_unit(&unit(vec![Declaration::Client(ClientDecl {
            name: "GreeterClient".to_string(),
            deprecated: false,
            methods: vec![unary_method()],
        })]));

        assert!(rendered.contains("export class GreeterClient extends grpc.Client {"));
        assert!(rendered.contains("Get(request: Req): Promise<Res>;"));
        assert!(rendered.contains(
            "Get(request: Req, callback: (error: grpc.ServiceError | null, response?: Res) => void): void;"
        ));
        assert!(rendered.contains("this.makeUnaryRequest(\"/pkg.Greeter/Get\", request, callback)"));
    }

    #[test]
    fn test_render_streaming_clients() {
        let mut watch = unary_method();
        watch.name = "Watch".to_string();
        watch.server_streaming = true;
        let mut upload = unary_method();
        upload.name = "Upload".to_string();
        upload.client_streaming = true;
        let mut chat = unary_method();
        chat.name = "Chat".to_string();
        chat.client_streaming = true;
        chat.server_streaming = true;

        let rendered = render_unit(&unit(vec![Declaration::Client(ClientDecl {
            name: "StreamClient".to_string(),
            deprecated: false,
            methods: vec![watch, upload, chat],
        })]));

        assert!(rendered.contains("Watch(request: Req): grpc.ClientReadableStream<Res>;"));
        assert!(rendered.contains("grpc.ClientWritableStream<Req>"));
        assert!(rendered.contains("Chat(): grpc.ClientDuplexStream<Req, Res>"));
    }

    #[test]
    fn test_render_server_skeleton_signals_unimplemented() {
        let rendered = render_unit(&unit(vec![Declaration::Server(ServerDecl {
            name: "UnimplementedGreeterService".to_string(),
            deprecated: false,
            methods: vec![unary_method()],
        })]));

        assert!(rendered.contains("export class UnimplementedGreeterService {"));
        assert!(rendered
            .contains("Get(call: grpc.ServerUnaryCall<Req, Res>, callback: grpc.sendUnaryData<Res>): void {"));
        assert!(rendered.contains("grpc.status.UNIMPLEMENTED"));
    }

    #[test]
    fn test_render_deprecated_marker() {
        let deprecated = MessageDecl {
            name: "Old".to_string(),
            deprecated: true,
            nested: vec![],
            oneofs: vec![],
            fields: vec![],
        };
        let current = MessageDecl {
            name: "New".to_string(),
            deprecated: false,
            nested: vec![],
            oneofs: vec![],
            fields: vec![],
        };

        let rendered = render_unit(&unit(vec![
            Declaration::Message(deprecated),
            Declaration::Message(current),
        ]));

        let expected = "\
/**
 * source: a.proto
 */
/** @deprecated */
export interface Old {
}
export interface New {
}
";
        assert_eq!(rendered, expected);
    }
}
