//! `validate-rulesets` — check every ruleset fragment against the project schema.
//!
//! ## Usage
//!
//! ```sh
//! # Validate ./rulesets/**/*.toml against ./schema.json
//! validate-rulesets
//!
//! # Validate another checkout
//! validate-rulesets --root ../cmc
//!
//! # Explicit schema and rulesets locations
//! validate-rulesets --schema schema.json --rulesets presets/
//!
//! # Print each parsed fragment as JSON instead of validating
//! validate-rulesets --dump
//!
//! # Debug logging (or set RUST_LOG)
//! validate-rulesets -v
//! ```
//!
//! Exits 0 when every fragment passes (or none were found), 1 otherwise.

use anyhow::{Context, Result};
use clap::Parser;
use ruleset_core::{parse, validate_document, Document, RulesetError, SchemaNode, Table, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "validate-rulesets",
    version,
    about = "Validate ruleset TOML fragments against the configuration JSON schema"
)]
struct Cli {
    /// Repository root; reported paths are relative to it
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Schema description (defaults to <root>/schema.json)
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Directory searched recursively for *.toml fragments (defaults to <root>/rulesets)
    #[arg(long)]
    rulesets: Option<PathBuf>,

    /// Value of the synthetic `project.name` merged into every fragment
    #[arg(long, default_value = "validation-test")]
    project_name: String,

    /// Print each parsed fragment as JSON instead of validating it
    #[arg(long)]
    dump: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let schema_path = cli
        .schema
        .clone()
        .unwrap_or_else(|| cli.root.join("schema.json"));
    let rulesets_dir = cli
        .rulesets
        .clone()
        .unwrap_or_else(|| cli.root.join("rulesets"));

    if !schema_path.is_file() {
        eprintln!("Error: {} not found", display_name(&schema_path));
        process::exit(1);
    }
    let schema = load_schema(&schema_path)?;

    let fragments = find_toml_files(&rulesets_dir)?;
    debug!(count = fragments.len(), dir = %rulesets_dir.display(), "discovered fragments");

    if fragments.is_empty() {
        println!(
            "No TOML files found in {}/",
            relative_to(&cli.root, &rulesets_dir).display()
        );
        return Ok(());
    }

    let failed = if cli.dump {
        dump_fragments(&cli.root, &fragments)?
    } else {
        println!(
            "Validating {} ruleset file(s) against {}\n",
            fragments.len(),
            display_name(&schema_path)
        );
        validate_fragments(&cli.root, &fragments, &schema, &cli.project_name)
    };

    println!();
    if failed {
        println!("Validation failed");
        process::exit(1);
    }
    if !cli.dump {
        println!("All rulesets valid");
    }

    Ok(())
}

/// Log to stderr so stdout carries only the report.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` is honoured, defaulting to `warn`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_schema(path: &Path) -> Result<SchemaNode> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema: {}", path.display()))?;
    let schema = SchemaNode::from_json_str(&text)
        .with_context(|| format!("Failed to load schema: {}", path.display()))?;
    debug!(path = %path.display(), "loaded schema");
    Ok(schema)
}

/// Recursively collect `*.toml` files under `dir`, sorted by path.
fn find_toml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_toml_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_toml_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read directory: {}", dir.display()))?;
        let path = entry.path();
        // Symlinked directories are not followed.
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to read file type: {}", path.display()))?;
        if file_type.is_dir() {
            collect_toml_files(&path, files)?;
        } else if entry.file_name().to_string_lossy().ends_with(".toml") {
            files.push(path);
        }
    }
    Ok(())
}

/// Validate each fragment, printing one status line plus details per failure.
/// Returns true if any fragment failed.
fn validate_fragments(
    root: &Path,
    fragments: &[PathBuf],
    schema: &SchemaNode,
    project_name: &str,
) -> bool {
    let mut has_errors = false;

    for path in fragments {
        let shown = relative_to(root, path);
        let problems = check_fragment(path, schema, project_name);

        if problems.is_empty() {
            println!("✓ {}", shown.display());
        } else {
            debug!(path = %shown.display(), problems = problems.len(), "fragment failed");
            println!("❌ {}", shown.display());
            for problem in &problems {
                println!("   {problem}");
            }
            has_errors = true;
        }
    }

    has_errors
}

/// Parse and validate one fragment. An empty result means it passed.
fn check_fragment(path: &Path, schema: &SchemaNode, project_name: &str) -> Vec<String> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return vec![format!("Read error: {e}")],
    };

    match parse(&text) {
        Ok(parsed) => {
            let document = with_project(parsed, project_name);
            validate_document(&document, schema)
                .iter()
                .map(ToString::to_string)
                .collect()
        }
        Err(e) => vec![parse_failure(&e)],
    }
}

/// Put a minimal `project` table in front of the fragment's own entries, so
/// fragments that only carry `[rulesets.*]` still look like a whole config.
/// A fragment that defines `project` itself wins.
fn with_project(parsed: Document, project_name: &str) -> Document {
    let mut project = Table::new();
    project.insert("name", Value::String(project_name.to_string()));

    let mut document = Table::new();
    document.insert("project", Value::Table(project));
    document.extend(parsed);
    document
}

fn parse_failure(err: &RulesetError) -> String {
    match err {
        RulesetError::Parse { line, reason } => format!("Parse error: line {line}: {reason}"),
        other => format!("Parse error: {other}"),
    }
}

/// Print each parsed fragment as pretty JSON. Returns true if any failed to
/// read or parse.
fn dump_fragments(root: &Path, fragments: &[PathBuf]) -> Result<bool> {
    let mut has_errors = false;

    for path in fragments {
        let shown = relative_to(root, path);
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                println!("❌ {}", shown.display());
                println!("   Read error: {e}");
                has_errors = true;
                continue;
            }
        };

        match parse(&text) {
            Ok(document) => {
                println!("# {}", shown.display());
                println!("{}", serde_json::to_string_pretty(&document)?);
            }
            Err(e) => {
                println!("❌ {}", shown.display());
                println!("   {}", parse_failure(&e));
                has_errors = true;
            }
        }
    }

    Ok(has_errors)
}

fn relative_to<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
