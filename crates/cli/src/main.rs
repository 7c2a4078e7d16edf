use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use fieldmask_core::{resolve, FieldInfo, FieldOptions};
use fieldmask_schema::FieldMask;

/// Output format for the parse subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Paths,
}

/// Field selector parsing and JSON field masking.
#[derive(Parser)]
#[command(name = "fieldmask", version, about = "Field selector parsing and JSON field masking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve field selectors and print the merged field tree
    Parse {
        /// Field selectors, e.g. "seller.{id|name}"
        #[arg(required = true)]
        selectors: Vec<String>,
        /// Cap on the total number of distinct fields
        #[arg(long)]
        max_fields: Option<usize>,
        /// Cap on the selector nesting depth
        #[arg(long)]
        max_depth: Option<usize>,
        /// Cap on the length of one path segment, in characters
        #[arg(long)]
        max_component_length: Option<usize>,
        /// Allowed-field selector; may be repeated
        #[arg(long)]
        limit: Vec<String>,
        /// Output format (json or paths)
        #[arg(long, default_value = "json", value_enum)]
        format: OutputFormat,
    },

    /// Apply field selectors to a JSON document and print the result
    Mask {
        /// Path to the JSON document
        file: PathBuf,
        /// Field selector to keep; may be repeated
        #[arg(long, required = true)]
        select: Vec<String>,
    },

    /// Validate field selectors, optionally against an allow-list
    Check {
        /// Field selectors to validate
        #[arg(required = true)]
        selectors: Vec<String>,
        /// Allowed-field selector; may be repeated
        #[arg(long)]
        allow: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            selectors,
            max_fields,
            max_depth,
            max_component_length,
            limit,
            format,
        } => {
            cmd_parse(
                &selectors,
                max_fields,
                max_depth,
                max_component_length,
                limit,
                format,
            );
        }
        Commands::Mask { file, select } => {
            cmd_mask(&file, &select);
        }
        Commands::Check { selectors, allow } => {
            cmd_check(&selectors, allow);
        }
    }
}

fn cmd_parse(
    selectors: &[String],
    max_fields: Option<usize>,
    max_depth: Option<usize>,
    max_component_length: Option<usize>,
    limit: Vec<String>,
    format: OutputFormat,
) {
    let mut options = FieldOptions::default();
    if let Some(max) = max_fields {
        options = options.with_max_fields(max);
    }
    if let Some(depth) = max_depth {
        options = options.with_max_field_depth(depth);
    }
    if let Some(len) = max_component_length {
        options = options.with_max_field_component_length(len);
    }
    if !limit.is_empty() {
        options = options.with_limited_to_fields(limit);
    }

    match resolve(selectors, options) {
        Ok(infos) => match format {
            OutputFormat::Json => {
                let pretty = serde_json::to_string_pretty(&infos)
                    .unwrap_or_else(|e| format!("serialization error: {}", e));
                println!("{}", pretty);
            }
            OutputFormat::Paths => {
                for path in FieldInfo::flatten(&infos) {
                    println!("{}", path);
                }
            }
        },
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn cmd_mask(file: &Path, select: &[String]) {
    let doc_str = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error reading file '{}': {}", file.display(), e);
            process::exit(1);
        }
    };

    let doc: Value = match serde_json::from_str(&doc_str) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error parsing JSON in '{}': {}", file.display(), e);
            process::exit(1);
        }
    };

    let infos = match resolve(select, FieldOptions::default()) {
        Ok(infos) => infos,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let masked = FieldMask::from_field_infos(infos).apply(&doc);
    let pretty = serde_json::to_string_pretty(&masked)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}

fn cmd_check(selectors: &[String], allow: Vec<String>) {
    let mut options = FieldOptions::default();
    if !allow.is_empty() {
        options = options.with_limited_to_fields(allow);
    }

    match resolve(selectors, options) {
        Ok(infos) => {
            println!("ok: {} fields", FieldInfo::flatten(&infos).len());
        }
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}
