//! `protoc` plugin request, decoded with annotation-preserving descriptors.
//!
//! `prost_types::compiler::CodeGeneratorRequest` embeds the standard
//! descriptors, which lose `google.api.http`. This mirror keeps the fields
//! the generator reads and swaps in [`crate::descriptor`] types.

use crate::descriptor::FileDescriptorProto;

/// `google.protobuf.compiler.CodeGeneratorRequest`.
#[allow(clippy::all, clippy::pedantic, clippy::nursery)]
#[derive(Clone, PartialEq, prost::Message)]
pub struct CodeGeneratorRequest {
    /// Proto files named on the command line, relative to the import root.
    #[prost(string, repeated, tag = "1")]
    pub file_to_generate: Vec<String>,
    /// Raw plugin parameter (`--rest-openapi_opt=...`).
    #[prost(string, optional, tag = "2")]
    pub parameter: Option<String>,
    /// Every file in `file_to_generate` plus everything it imports, in
    /// topological order.
    #[prost(message, repeated, tag = "15")]
    pub proto_file: Vec<FileDescriptorProto>,
}
