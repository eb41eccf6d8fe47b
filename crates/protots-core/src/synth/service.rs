//! Service client and server-skeleton synthesis.
//!
//! Every service descriptor yields two declarations: an unimplemented server
//! skeleton (to be subclassed by an implementer) and a typed client. Method
//! signature shape is selected later by the renderer from the
//! `(client_streaming, server_streaming)` pair; this module only resolves
//! request/response types and captures the cardinality. No transport logic is
//! synthesized; signatures close over the RPC runtime import.

use crate::decl::{ClientDecl, Declaration, MethodDecl, ServerDecl};
use crate::error::Result;
use crate::synth::mapper::TypeMapper;
use prost_types::ServiceDescriptorProto;

/// Synthesizes the server-skeleton and client declarations for one service.
///
/// `package` is the declaring file's package, used to build the full RPC
/// paths (`/<package>.<Service>/<Method>`).
pub(crate) fn synthesize_service(
    mapper: &mut TypeMapper<'_>,
    package: &str,
    service: &ServiceDescriptorProto,
) -> Result<Vec<Declaration>> {
    let qualified = if package.is_empty() {
        service.name().to_string()
    } else {
        format!("{}.{}", package, service.name())
    };

    let mut methods = Vec::with_capacity(service.method.len());
    for method in &service.method {
        let scope = format!("{}.{}", qualified, method.name());
        methods.push(MethodDecl {
            name: method.name().to_string(),
            path: format!("/{}/{}", qualified, method.name()),
            request: mapper.reference(&scope, method.input_type())?,
            response: mapper.reference(&scope, method.output_type())?,
            client_streaming: method.client_streaming(),
            server_streaming: method.server_streaming(),
        });
    }

    let deprecated = service.options.as_ref().is_some_and(|o| o.deprecated());

    Ok(vec![
        Declaration::Server(ServerDecl {
            name: format!("Unimplemented{}Service", service.name()),
            deprecated,
            methods: methods.clone(),
        }),
        Declaration::Client(ClientDecl {
            name: format!("{}Client", service.name()),
            deprecated,
            methods,
        }),
    ])
}
