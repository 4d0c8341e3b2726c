//! Kind Schema CLI
//!
//! Command-line interface for normalizing and compiling kind schemas.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use kind_schema::{compile_kind, load_document, GroupVersionKind, KindSchemaError, Qualifier};

#[derive(Parser)]
#[command(name = "kind-schema")]
#[command(about = "Compile resource kind schemas into namespaced OpenAPI definitions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a schema document and add its Kind/KindList envelopes
    Compile {
        /// Schema document: CRD schema, OpenAPI document, or bare map
        schema: PathBuf,

        /// API group of the kind
        #[arg(long)]
        group: String,

        /// Version of the kind (e.g., v1)
        #[arg(long)]
        kind_version: String,

        /// Kind name (e.g., Foo)
        #[arg(long)]
        kind: String,

        /// Package prefix; the namespace becomes <prefix>.<version>
        /// (default: <group>/<version>)
        #[arg(long)]
        prefix: Option<String>,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the canonical map of named schemas for any accepted dialect
    Normalize {
        /// Schema document: CRD schema, OpenAPI document, or bare map
        schema: PathBuf,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            schema,
            group,
            kind_version,
            kind,
            prefix,
            output,
            pretty,
        } => {
            let qualifier = match prefix {
                Some(prefix) => Qualifier::for_version(&prefix, &kind_version),
                None => Qualifier::new(format!("{}/{}", group, kind_version)),
            };
            let gvk = GroupVersionKind::new(group, kind_version, kind);
            run_compile(&schema, &gvk, &qualifier, output, pretty)
        }
        Commands::Normalize { schema, pretty } => run_normalize(&schema, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_compile(
    schema: &std::path::Path,
    gvk: &GroupVersionKind,
    qualifier: &Qualifier,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let document = load_document(schema).map_err(report)?;
    let definitions = compile_kind(&document, gvk, qualifier).map_err(report)?;
    let json_output = render(&definitions, pretty)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn run_normalize(schema: &std::path::Path, pretty: bool) -> Result<(), u8> {
    let document = load_document(schema).map_err(report)?;
    println!("{}", render(document.raw(), pretty)?);
    Ok(())
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

fn report(e: KindSchemaError) -> u8 {
    eprintln!("Error: {}", e);
    e.exit_code() as u8
}
