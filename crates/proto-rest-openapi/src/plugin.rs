//! `protoc` plugin and descriptor-set entry points.
//!
//! Both paths index every file they receive (so imported types resolve),
//! share one [`MethodOrdinals`] across all generated files, and skip files
//! that have no services or whose document fails to serialize.

use prost::Message as _;
use prost_types::compiler::{code_generator_response, CodeGeneratorResponse};
use proto_rest_core::plugin::CodeGeneratorRequest;

use crate::assemble::assemble_document;
use crate::binding::MethodOrdinals;
use crate::config::{GeneratorConfig, OutputFormat};
use crate::descriptor::{FileDescriptorProto, FileDescriptorSet};
use crate::error;
use crate::index::TypeIndex;

/// One generated artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Output path relative to the output root (`api/hello_openapi.yaml`).
    pub name: String,
    /// Serialized `OpenAPI` document.
    pub content: String,
}

/// Output path for a proto file: `foo/bar.proto` → `foo/bar_openapi.yaml`.
#[must_use]
pub fn output_file_name(proto_name: &str, format: OutputFormat) -> String {
    let stem = proto_name.strip_suffix(".proto").unwrap_or(proto_name);
    format!("{stem}_openapi.{}", format.extension())
}

/// Generate documents for the files named in `to_generate`.
///
/// `files` must contain those files and everything they import. Names not
/// present in `files` are ignored.
#[must_use]
pub fn generate_files(
    files: &[FileDescriptorProto],
    to_generate: &[String],
    config: &GeneratorConfig,
) -> Vec<GeneratedFile> {
    let index = TypeIndex::new(files);
    let mut ordinals = MethodOrdinals::new();
    let mut generated = Vec::new();

    for name in to_generate {
        let Some(file) = files.iter().find(|f| f.name.as_deref() == Some(name.as_str())) else {
            tracing::warn!(file = %name, "requested file not found in descriptors");
            continue;
        };

        let Some(doc) = assemble_document(file, &index, &mut ordinals, config) else {
            tracing::debug!(file = %name, "no services, nothing to generate");
            continue;
        };

        match doc.render(config.format) {
            Ok(content) => generated.push(GeneratedFile {
                name: output_file_name(name, config.format),
                content,
            }),
            Err(err) => {
                tracing::warn!(file = %name, error = %err, "failed to serialize document, skipping");
            }
        }
    }

    generated
}

/// Generate from a `protoc` plugin request.
///
/// # Errors
///
/// Returns an error if the request cannot be decoded or its parameter is
/// invalid.
pub fn generate_from_request(request_bytes: &[u8]) -> error::Result<Vec<GeneratedFile>> {
    let request = CodeGeneratorRequest::decode(request_bytes)?;
    let config = GeneratorConfig::from_parameter(request.parameter.as_deref().unwrap_or(""))?;
    Ok(generate_files(
        &request.proto_file,
        &request.file_to_generate,
        &config,
    ))
}

/// Generate from an encoded `FileDescriptorSet` (e.g., `buf build -o set.binpb`).
///
/// When `only` is empty every file in the set is considered.
///
/// # Errors
///
/// Returns an error if the descriptor bytes cannot be decoded.
pub fn generate_from_descriptor_set(
    descriptor_bytes: &[u8],
    only: &[String],
    config: &GeneratorConfig,
) -> error::Result<Vec<GeneratedFile>> {
    let fdset = FileDescriptorSet::decode(descriptor_bytes)?;
    let to_generate: Vec<String> = if only.is_empty() {
        fdset.file.iter().filter_map(|f| f.name.clone()).collect()
    } else {
        only.to_vec()
    };
    Ok(generate_files(&fdset.file, &to_generate, config))
}

/// Run one plugin invocation: request bytes in, response out.
///
/// Failures are reported through `CodeGeneratorResponse.error`, which protoc
/// prints and turns into a non-zero exit.
#[must_use]
pub fn run(request_bytes: &[u8]) -> CodeGeneratorResponse {
    let mut response = CodeGeneratorResponse {
        supported_features: Some(code_generator_response::Feature::Proto3Optional as u64),
        ..CodeGeneratorResponse::default()
    };

    match generate_from_request(request_bytes) {
        Ok(files) => {
            response.file = files
                .into_iter()
                .map(|f| code_generator_response::File {
                    name: Some(f.name),
                    content: Some(f.content),
                    ..code_generator_response::File::default()
                })
                .collect();
        }
        Err(err) => response.error = Some(err.to_string()),
    }

    response
}
