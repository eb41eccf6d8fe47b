//! Code generator request/response boundary.
//!
//! The process boundary is a single serialized `CodeGeneratorRequest` on the
//! input stream and a single serialized `CodeGeneratorResponse` on the output
//! stream. This module owns the decode → synthesize → render → encode chain.
//!
//! ## Failure policy
//!
//! A request that cannot be decoded aborts before any processing: there is
//! nothing well-formed to answer on. Every later failure is answered with a
//! response whose `error` field carries the message and whose file list is
//! empty, never a partial file list.

use crate::error::Result;
use crate::options::Options;
use crate::render;
use crate::synth::Generator;
use bytes::Buf;
use prost::Message;
use prost_types::compiler::{code_generator_response, CodeGeneratorRequest, CodeGeneratorResponse};
use tracing::{debug, error};

/// Feature bitmask advertised in every response.
///
/// Declaring proto3-optional support is required for protoc to hand such
/// files to the plugin at all.
pub const SUPPORTED_FEATURES: u64 = code_generator_response::Feature::Proto3Optional as u64;

/// Processes one serialized request into one serialized response.
///
/// Fails only if the request cannot be decoded or the response cannot be
/// encoded; synthesis failures are reported inside the response.
pub fn run(input: impl Buf) -> Result<Vec<u8>> {
    let request = CodeGeneratorRequest::decode(input)?;
    let response = respond(&request);

    let mut output = Vec::with_capacity(response.encoded_len());
    response.encode(&mut output)?;
    Ok(output)
}

/// Builds the response for a decoded request.
///
/// On success the response carries one rendered file per input file, in
/// input order.
pub fn respond(request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
    let mut response = CodeGeneratorResponse {
        supported_features: Some(SUPPORTED_FEATURES),
        ..Default::default()
    };

    match generate_files(request) {
        Ok(files) => {
            debug!("generated {} files", files.len());
            response.file = files;
        }
        Err(err) => {
            error!("generation failed: {}", err);
            response.error = Some(err.to_string());
        }
    }

    response
}

fn generate_files(request: &CodeGeneratorRequest) -> Result<Vec<code_generator_response::File>> {
    let options = Options::parse(request.parameter());
    let generator = Generator::new(
        &request.proto_file,
        options,
        request.compiler_version.as_ref(),
    )?;

    let units = generator.generate()?;
    Ok(units
        .iter()
        .map(|unit| code_generator_response::File {
            name: Some(unit.name.clone()),
            content: Some(render::render_unit(unit)),
            ..Default::default()
        })
        .collect())
}
