//! oxide-db CLI
//!
//! Runs SQL scripts against an embedded in-memory database and prints
//! result sets as CSV.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_db_core::ast::{Expr, Statement};
use oxide_db_engine::{Database, StatementOutcome};

/// An in-memory SQL engine with a small dialect.
#[derive(Parser)]
#[command(name = "oxide-db")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (plan diagrams, statement tracing).
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a SQL script file.
    Run {
        /// Path to the script.
        script: PathBuf,

        /// Print the Mermaid plan diagram for every SELECT.
        #[arg(long)]
        explain: bool,

        /// Export a table to a CSV file after the script (table=path,
        /// repeatable).
        #[arg(long = "export", value_name = "TABLE=PATH")]
        exports: Vec<String>,
    },

    /// Read statements from stdin, one `;`-terminated batch per line.
    Repl,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run {
            script,
            explain,
            exports,
        } => run_script(&script, explain, &exports),
        Commands::Repl => repl(),
    }
}

fn run_script(script: &PathBuf, explain: bool, exports: &[String]) -> anyhow::Result<()> {
    let sql = std::fs::read_to_string(script)
        .with_context(|| format!("reading {}", script.display()))?;

    let mut db = Database::new();
    let statements = oxide_db_core::Parser::new(&sql)
        .parse_program()
        .with_context(|| format!("parsing {}", script.display()))?;
    debug!(count = statements.len(), "parsed script");

    let stdout = io::stdout();
    for statement in &statements {
        if explain {
            if let Statement::Select(select) = statement {
                let expr = Expr::Select(Box::new(select.clone()));
                let plan = db.plan(&expr)?;
                println!("{}", plan.to_mermaid());
            }
        }
        if let StatementOutcome::Selected(result) = db.run(statement)? {
            result.write_csv(&mut stdout.lock())?;
        }
    }

    for export in exports {
        let (table, path) = export
            .split_once('=')
            .context("--export takes TABLE=PATH")?;
        db.export_table_to_path(table, path)
            .with_context(|| format!("exporting {table} to {path}"))?;
        debug!(table, path, "exported");
    }

    Ok(())
}

fn repl() -> anyhow::Result<()> {
    let mut db = Database::new();
    let stdin = io::stdin();
    let stdout = io::stdout();

    print!("> ");
    stdout.lock().flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            print!("> ");
            stdout.lock().flush()?;
            continue;
        }
        // Errors do not end the session; committed statements stay.
        match db.execute(&line) {
            Ok(outcomes) => {
                for outcome in outcomes {
                    match outcome {
                        StatementOutcome::Selected(result) => {
                            result.write_csv(&mut stdout.lock())?;
                        }
                        StatementOutcome::Deleted(n) => println!("deleted {n}"),
                        StatementOutcome::Created => println!("ok"),
                        StatementOutcome::Inserted => println!("ok"),
                        StatementOutcome::Dropped => println!("ok"),
                    }
                }
            }
            Err(e) => eprintln!("error: {e}"),
        }
        print!("> ");
        stdout.lock().flush()?;
    }

    Ok(())
}
