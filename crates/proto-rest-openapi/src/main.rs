//! `protoc-gen-rest-openapi`: `protoc` plugin and standalone CLI.
//!
//! ```text
//! # As a protoc plugin (request on stdin, response on stdout)
//! protoc --plugin=protoc-gen-rest-openapi --rest-openapi_out=api/openapi \
//!   --rest-openapi_opt=format=yaml helloworld.proto
//!
//! # From a compiled descriptor set
//! buf build --as-file-descriptor-set -o target/descriptor.binpb
//! protoc-gen-rest-openapi --descriptor target/descriptor.binpb --out api/openapi
//! ```
//!
//! Logs go to stderr (filtered by `RUST_LOG`, default `warn`): stdout is
//! the plugin channel.

#![forbid(unsafe_code)]

use std::fs;
use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use prost::Message as _;
use proto_rest_openapi::GeneratorConfig;

/// `OpenAPI` 3.0 generator for protobuf services with `google.api.http` annotations.
///
/// Without arguments, runs as a `protoc` plugin.
#[derive(Parser)]
#[command(name = "protoc-gen-rest-openapi", version, about)]
struct Cli {
    /// Path to a compiled `FileDescriptorSet` (binary). Enables CLI mode.
    #[arg(short, long, requires = "out")]
    descriptor: Option<PathBuf>,

    /// Output directory for generated documents.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Path to a generator config YAML file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only generate for these proto files (as named in the descriptor set).
    #[arg(short, long = "file")]
    files: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match &cli.descriptor {
        Some(descriptor) => run_descriptor_set(&cli, descriptor),
        None => run_plugin(&cli),
    }
}

fn run_plugin(cli: &Cli) -> anyhow::Result<()> {
    if cli.out.is_some() || cli.config.is_some() || !cli.files.is_empty() {
        bail!("--out, --config and --file require --descriptor");
    }

    let mut request = Vec::new();
    std::io::stdin()
        .read_to_end(&mut request)
        .context("Failed to read CodeGeneratorRequest from stdin")?;

    let response = proto_rest_openapi::plugin::run(&request);
    if let Some(error) = &response.error {
        tracing::error!(%error, "generation failed");
    }

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&response.encode_to_vec())
        .context("Failed to write CodeGeneratorResponse to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn run_descriptor_set(cli: &Cli, descriptor: &Path) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading config");
            GeneratorConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };

    let descriptor_bytes = fs::read(descriptor)
        .with_context(|| format!("Failed to read descriptor: {}", descriptor.display()))?;

    let files =
        proto_rest_openapi::generate_from_descriptor_set(&descriptor_bytes, &cli.files, &config)
            .context("Failed to generate OpenAPI documents")?;

    let out_dir = cli.out.as_ref().context("--out is required with --descriptor")?;
    for file in &files {
        let path = out_dir.join(&file.name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir: {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Wrote {}", path.display());
    }

    if files.is_empty() {
        eprintln!("No files with services found; nothing written");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_plugin_mode() {
        let cli = Cli::try_parse_from(["protoc-gen-rest-openapi"]).unwrap();
        assert!(cli.descriptor.is_none());
        assert!(cli.files.is_empty());
    }

    #[test]
    fn descriptor_mode_arguments() {
        let cli = Cli::try_parse_from([
            "protoc-gen-rest-openapi",
            "--descriptor",
            "set.binpb",
            "--out",
            "gen",
            "--file",
            "a.proto",
            "--file",
            "b.proto",
        ])
        .unwrap();
        assert_eq!(cli.descriptor.unwrap(), PathBuf::from("set.binpb"));
        assert_eq!(cli.out.unwrap(), PathBuf::from("gen"));
        assert_eq!(cli.files, vec!["a.proto", "b.proto"]);
    }

    #[test]
    fn descriptor_requires_out() {
        let result = Cli::try_parse_from(["protoc-gen-rest-openapi", "--descriptor", "set.binpb"]);
        assert!(result.is_err());
    }

    #[test]
    fn descriptor_set_writes_files() {
        use proto_rest_core::descriptor::{
            FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto, ServiceDescriptorProto,
        };

        let dir = std::env::temp_dir().join("proto-rest-openapi-cli-test");
        fs::create_dir_all(&dir).unwrap();
        let set_path = dir.join("set.binpb");
        let set = FileDescriptorSet {
            file: vec![FileDescriptorProto {
                name: Some("api/echo.proto".to_string()),
                package: Some("echo".to_string()),
                service: vec![ServiceDescriptorProto {
                    name: Some("Echo".to_string()),
                    method: vec![MethodDescriptorProto {
                        name: Some("Say".to_string()),
                        input_type: Some(".echo.Msg".to_string()),
                        output_type: Some(".echo.Msg".to_string()),
                        ..MethodDescriptorProto::default()
                    }],
                }],
                ..FileDescriptorProto::default()
            }],
        };
        fs::write(&set_path, set.encode_to_vec()).unwrap();

        let out = dir.join("out");
        let cli = Cli {
            descriptor: Some(set_path.clone()),
            out: Some(out.clone()),
            config: None,
            files: vec![],
        };
        run_descriptor_set(&cli, &set_path).unwrap();

        let written = fs::read_to_string(out.join("api/echo_openapi.yaml")).unwrap();
        assert!(written.contains("/echo.Echo/Say"));

        fs::remove_dir_all(&dir).ok();
    }
}
