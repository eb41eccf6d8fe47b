//! Generator options parsed from the request parameter string.
//!
//! protoc forwards everything after `--protots_opt=` (or the `opt` part of
//! `--plugin`) as a single free-form parameter string. Options are
//! comma-separated `key=value` pairs; unrecognized keys are ignored.

use tracing::debug;

/// Default module specifier for the RPC runtime import
pub const DEFAULT_GRPC_PACKAGE: &str = "@grpc/grpc-js";

/// Recognized generator options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Module specifier imported as the RPC runtime when a file declares
    /// at least one service
    pub grpc_package: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            grpc_package: DEFAULT_GRPC_PACKAGE.to_string(),
        }
    }
}

impl Options {
    /// Parses a request parameter string into options
    pub fn parse(parameter: &str) -> Self {
        let mut options = Self::default();

        for part in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('=') {
                Some(("grpc_package", value)) if !value.is_empty() => {
                    options.grpc_package = value.to_string();
                }
                _ => debug!("ignoring unrecognized parameter: {}", part),
            }
        }

        options
    }
}
