//! Schema Builder CLI
//!
//! Command-line interface for applying structural edits to JSON Schemas.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use schema_builder::{
    load_json, load_schema, CliError, FilterOptions, NoRefOptions, RefDetection, SchemaBuilder,
    Script, ScriptError, Selector,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-builder")]
#[command(about = "Apply structural edits to JSON Schema documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an edit script (JSON array of steps) over a schema
    Apply {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Edit script file
        #[arg(long, short)]
        script: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Keep only the selected properties
    Pick {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        #[command(flatten)]
        select: SelectArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Remove the selected properties
    Omit {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        #[command(flatten)]
        select: SelectArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Remove properties whose sub-schema contains a $ref
    NoRef {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Leave removed names in the required list
        #[arg(long)]
        keep_required: bool,

        /// Match only real $ref keys instead of any occurrence of the text
        #[arg(long)]
        structural: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Wrap the schema as the items of an array schema
    ToArray {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the projected type of a schema
    Type {
        /// Schema source: file path or URL (http:// or https://)
        schema: String,

        /// Edit script to run before projecting
        #[arg(long, short)]
        script: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SelectArgs {
    /// Comma-separated property names
    #[arg(
        long,
        value_delimiter = ',',
        conflicts_with = "pattern",
        required_unless_present = "pattern"
    )]
    props: Vec<String>,

    /// Regular expression matched against property names
    #[arg(long)]
    pattern: Option<String>,

    /// Leave removed names in the required list
    #[arg(long)]
    keep_required: bool,
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (stdout if not specified)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Fail unless the edited schema compiles as a JSON Schema
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Apply {
            schema,
            script,
            output,
        } => run_apply(&schema, &script, &output),
        Commands::Pick {
            schema,
            select,
            output,
        } => run_select(&schema, &select, &output, false),
        Commands::Omit {
            schema,
            select,
            output,
        } => run_select(&schema, &select, &output, true),
        Commands::NoRef {
            schema,
            keep_required,
            structural,
            output,
        } => run_no_ref(&schema, keep_required, structural, &output),
        Commands::ToArray { schema, output } => {
            load_builder(&schema).and_then(|builder| emit(&builder.to_array(), &output))
        }
        Commands::Type { schema, script } => run_type(&schema, script.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn load_builder(source: &str) -> Result<SchemaBuilder, CliError> {
    Ok(load_schema(source)?)
}

fn load_script(path: &Path) -> Result<Script, CliError> {
    let value = load_json(path)?;
    Ok(Script::from_value(value)?)
}

fn run_apply(source: &str, script: &Path, output: &OutputArgs) -> Result<(), CliError> {
    let script = load_script(script)?;
    let builder = script.apply(load_builder(source)?)?;
    emit(&builder, output)
}

fn run_select(
    source: &str,
    select: &SelectArgs,
    output: &OutputArgs,
    omit: bool,
) -> Result<(), CliError> {
    let selector = match &select.pattern {
        Some(pattern) => {
            Selector::pattern(pattern).map_err(|source| ScriptError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?
        }
        None => Selector::Names(select.props.clone()),
    };
    let options = FilterOptions::default().remove_required(!select.keep_required);

    let builder = load_builder(source)?;
    let builder = if omit {
        builder.omit(selector, options)
    } else {
        builder.pick(selector, options)
    };
    emit(&builder, output)
}

fn run_no_ref(
    source: &str,
    keep_required: bool,
    structural: bool,
    output: &OutputArgs,
) -> Result<(), CliError> {
    let detection = if structural {
        RefDetection::Structural
    } else {
        RefDetection::Substring
    };
    let options = NoRefOptions::default()
        .remove_required(!keep_required)
        .detection(detection);

    let builder = load_builder(source)?.no_ref(options);
    emit(&builder, output)
}

fn run_type(source: &str, script: Option<&Path>) -> Result<(), CliError> {
    let mut builder = load_builder(source)?;
    if let Some(path) = script {
        builder = load_script(path)?.apply(builder)?;
    }
    println!("{}", builder.type_shape());
    Ok(())
}

fn emit(builder: &SchemaBuilder, output: &OutputArgs) -> Result<(), CliError> {
    if output.check {
        builder.check()?;
    }

    let json_output = if output.pretty {
        serde_json::to_string_pretty(builder.schema())
    } else {
        serde_json::to_string(builder.schema())
    }
    .map_err(|source| CliError::Serialize { source })?;

    match &output.output {
        Some(path) => {
            std::fs::write(path, &json_output).map_err(|source| CliError::WriteError {
                path: path.clone(),
                source,
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}
