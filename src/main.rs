// Main entry point for the sqlutil CLI
// Parses named queries and renders row documents as CSV or JSON

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use sqlutil::{write_rows, MemoryRows, NamedQuery, OutputFormat};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// sqlutil - named parameter rewriting and result set formatting
#[derive(ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite a named query and print the result as JSON
    Parse {
        /// SQL statement with :name parameters
        query: String,
    },
    /// Render a rows document as CSV or JSON
    Render {
        /// Output format (csv or json)
        #[arg(short, long, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Rows document to read (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Interactive shell that rewrites named queries
    Shell,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Parse { query } => print_named_query(&query)?,
        Command::Render { format, input } => render(format, input)?,
        Command::Shell => shell()?,
    }

    Ok(())
}

/// Parse a named query and print it on stdout
fn print_named_query(query: &str) -> Result<()> {
    let parsed = NamedQuery::parse(query)?;
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

/// Render every result set of a rows document
/// Each result set is written on its own line
fn render(format: OutputFormat, input: Option<PathBuf>) -> Result<()> {
    let reader: Box<dyn Read> = match &input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut rows = MemoryRows::from_reader(reader).context("failed to read rows document")?;

    let mut stdout = io::stdout().lock();
    let sets = render_rows(format, &mut rows, &mut stdout)?;

    tracing::info!(result_sets = sets, %format, "rendered rows document");
    stdout.flush()?;
    Ok(())
}

/// Write every result set of rows to out, returning how many were written
fn render_rows<W: Write>(
    format: OutputFormat,
    rows: &mut MemoryRows<serde_json::Value>,
    out: &mut W,
) -> Result<usize> {
    if rows.result_set_count() == 0 {
        return Ok(0);
    }

    let mut buf = Vec::new();
    let mut set = 0;

    loop {
        buf.clear();
        buf = write_rows(format, buf, rows)
            .with_context(|| format!("failed to render result set {}", set))?;

        out.write_all(&buf)?;
        if format == OutputFormat::Json {
            out.write_all(b"\n")?;
        }

        set += 1;
        if !rows.next_result_set() {
            break;
        }
    }

    Ok(set)
}

/// Shell (read-eval-print loop) for rewriting named queries
fn shell() -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("sqlutil shell - type a query with :name parameters");
    println!("Type '.help' for help, '.exit' to quit");
    println!();

    loop {
        print!("sqlutil> ");
        stdout.flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            // EOF
            println!();
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('.') {
            match input {
                ".exit" | ".quit" => break,
                ".help" => print_help(),
                _ => {
                    println!("Unknown command: {}", input);
                    println!("Type '.help' for help");
                }
            }
            continue;
        }

        match NamedQuery::parse(input) {
            Ok(query) => {
                println!("{}", query.parsed());
                println!("params: [{}]", query.names().join(", "));
            }
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

fn print_help() {
    println!("Special Commands:");
    println!("  .help              Show this help message");
    println!("  .exit, .quit       Exit the shell");
    println!();
    println!("Queries:");
    println!("  select * from users where id = :id and name = :name");
    println!();
    println!("Notes:");
    println!("  - A parameter name runs until the next space");
    println!("  - Repeated names produce one placeholder each");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_document() {
        let mut rows = MemoryRows::from_json_str("[]").unwrap();
        let mut out = Vec::new();

        assert_eq!(render_rows(OutputFormat::Csv, &mut rows, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_render_every_result_set() {
        let mut rows = MemoryRows::from_json_str(
            r#"[{"columns":["a"],"rows":[[1]]},{"columns":["b"],"rows":[[true]]}]"#,
        )
        .unwrap();
        let mut out = Vec::new();

        assert_eq!(render_rows(OutputFormat::Json, &mut rows, &mut out).unwrap(), 2);
        assert_eq!(out, b"[{\"a\":1}]\n[{\"b\":true}]\n");
    }
}
