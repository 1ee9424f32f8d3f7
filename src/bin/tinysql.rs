//! tinysql — inspect how a SQL statement is tokenized and parsed
//!
//! # Usage
//!
//! ```bash
//! # Print tokens, CST and AST
//! tinysql "SELECT a, b FROM t WHERE a = 1;"
//!
//! # Only the AST, as JSON
//! tinysql "CREATE TABLE t (id INT);" --ast --format json
//!
//! # Interactive
//! tinysql repl
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use tinysql::grammar;
use tinysql::prelude::*;

#[derive(Parser)]
#[command(name = "tinysql")]
#[command(version)]
#[command(about = "Tokenize, parse and transform tiny SQL statements", long_about = None)]
#[command(after_help = "EXAMPLES:
    tinysql 'SELECT a, b FROM t WHERE a = 1;'
    tinysql 'CREATE TABLE users (id INT, name VARCHAR(255));' --ast
    tinysql explain \"INSERT INTO t (a, b) VALUES (1, 'x');\"")]
struct Cli {
    /// The SQL statement to analyze
    query: Option<String>,

    /// Print the token list
    #[arg(long)]
    tokens: bool,

    /// Print the concrete syntax tree
    #[arg(long)]
    cst: bool,

    /// Print the abstract syntax tree
    #[arg(long)]
    ast: bool,

    /// Output format (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Config file path
    #[arg(short, long, env = "TINYSQL_CONFIG")]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through every stage for one statement
    Explain {
        /// The SQL statement to explain
        query: String,
    },
    /// Interactive REPL mode
    Repl,
    /// Show the reserved keywords, data types and symbols
    Keywords,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    if !config.color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Some(Commands::Explain { query }) => explain_query(query),
        Some(Commands::Repl) => run_repl(&config),
        Some(Commands::Keywords) => show_keywords(),
        None => {
            if let Some(query) = &cli.query {
                if let Err(e) = run_query(query, &config) {
                    eprintln!("{} {}", "Error:".red().bold(), e);
                    std::process::exit(1);
                }
            } else {
                println!("{}", "tinysql — a tiny SQL front-end".cyan().bold());
                println!();
                println!("Usage: tinysql <QUERY> [OPTIONS]");
                println!();
                println!("Try: tinysql --help");
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file first, then command-line flags on top.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(format) = cli.format {
        config.format = format.into();
    }
    if cli.tokens || cli.cst || cli.ast {
        config.show_tokens = cli.tokens;
        config.show_cst = cli.cst;
        config.show_ast = cli.ast;
    }
    if cli.no_color {
        config.color = false;
    }

    Ok(config)
}

fn run_query(query: &str, config: &Config) -> Result<()> {
    tracing::debug!(query, "analyzing");
    let analysis = tinysql::analyze(query)?;
    print_analysis(&analysis, config)
}

fn print_analysis(analysis: &Analysis, config: &Config) -> Result<()> {
    match config.format {
        OutputFormat::Json => {
            let mut out = serde_json::Map::new();
            if config.show_tokens {
                out.insert("tokens".into(), serde_json::to_value(&analysis.tokens)?);
            }
            if config.show_cst {
                out.insert("cst".into(), serde_json::to_value(&analysis.cst)?);
            }
            if config.show_ast {
                out.insert("ast".into(), serde_json::to_value(&analysis.ast)?);
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            if config.show_tokens {
                println!("{}", "Tokens:".green().bold());
                for token in &analysis.tokens {
                    println!("  {}", token.yellow());
                }
            }
            if config.show_cst {
                println!("{}", "CST:".green().bold());
                print!("{}", render_tree(&analysis.cst, 1));
            }
            if config.show_ast {
                println!("{}", "AST:".green().bold());
                print!("{}", render_tree(&analysis.ast, 1));
            }
        }
    }
    Ok(())
}

/// Colored variant of the plain tree printer.
fn render_tree(node: &Node, depth: usize) -> String {
    let mut out = "  ".repeat(depth);

    match node.kind {
        Some(kind) if kind.is_statement() => {
            out.push_str(&format!("[{}]", kind).magenta().bold().to_string());
        }
        Some(kind) => {
            out.push_str(&format!("[{}]", kind).cyan().to_string());
            if !node.label.is_empty() {
                out.push(' ');
                out.push_str(&node.label.white().bold().to_string());
            }
        }
        None if grammar::is_non_terminal(&node.label) => {
            out.push_str(&node.label.dimmed().to_string());
        }
        None => out.push_str(&node.label.yellow().to_string()),
    }
    out.push('\n');

    for child in &node.children {
        out.push_str(&render_tree(child, depth + 1));
    }
    out
}

fn explain_query(query: &str) {
    println!("{}", "tinysql Query Explanation".cyan().bold());
    println!();
    println!("{} {}", "Query:".dimmed(), query.yellow());
    println!();

    match tinysql::analyze(query) {
        Ok(analysis) => {
            println!("{}", "1. Tokens".green().bold());
            let tokens: Vec<String> = analysis
                .tokens
                .iter()
                .map(|t| {
                    if grammar::is_keyword(t) {
                        t.cyan().to_string()
                    } else if grammar::is_symbol(t) {
                        t.dimmed().to_string()
                    } else {
                        t.white().to_string()
                    }
                })
                .collect();
            println!("  {}", tokens.join(" │ "));
            println!();

            println!(
                "{} {}",
                "2. Concrete syntax tree".green().bold(),
                format!("({} nodes)", analysis.cst.size()).dimmed()
            );
            print!("{}", render_tree(&analysis.cst, 1));
            println!();

            println!(
                "{} {}",
                "3. Abstract syntax tree".green().bold(),
                format!("({} nodes)", analysis.ast.size()).dimmed()
            );
            print!("{}", render_tree(&analysis.ast, 1));
        }
        Err(e) => {
            eprintln!("{} {}", "Parse Error:".red().bold(), e);
        }
    }
}

fn run_repl(config: &Config) {
    use rustyline::DefaultEditor;
    use rustyline::error::ReadlineError;

    println!("{}", "tinysql REPL — Interactive Mode".cyan().bold());
    println!("{}", "Type a statement to see its trees. Commands:".dimmed());
    println!("  {}  - Exit the REPL", ".exit".yellow());
    println!("  {}  - Show this help", ".help".yellow());
    println!("  {} - Clear screen", ".clear".yellow());
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("{} {}", "Failed to initialize REPL:".red(), e);
            return;
        }
    };

    let history_path = config.history_path();
    let _ = rl.load_history(&history_path);

    loop {
        let prompt = "tinysql> ".cyan().bold().to_string();
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match line {
                    ".exit" | ".quit" | "exit" | "quit" => {
                        println!("{}", "Goodbye!".green());
                        break;
                    }
                    ".help" | "help" => {
                        show_repl_help();
                        continue;
                    }
                    ".clear" | "clear" => {
                        print!("\x1B[2J\x1B[1;1H");
                        continue;
                    }
                    _ => {}
                }

                match tinysql::analyze(line) {
                    Ok(analysis) => {
                        if let Err(e) = print_analysis(&analysis, config) {
                            eprintln!("{} {}", "Error:".red().bold(), e);
                        }
                    }
                    Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red(), e);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);
}

fn show_repl_help() {
    println!("{}", "Statements:".white().bold());
    println!("  SELECT a, b FROM t [WHERE x = y];");
    println!("  INSERT INTO t (a, b) VALUES (1, 'x');");
    println!("  CREATE TABLE t (a INT, b VARCHAR(255));");
    println!("{}", "Commands:".white().bold());
    println!("  .exit  .help  .clear");
}

fn show_keywords() {
    println!("{}", "tinysql Reserved Words".cyan().bold());
    println!();

    println!("{}", "Keywords".white().bold());
    println!("{}", "─".repeat(60).dimmed());
    for row in grammar::KEYWORDS.chunks(6) {
        let cells: Vec<String> = row.iter().map(|k| format!("{:10}", k)).collect();
        println!("{}", cells.join(" ").cyan());
    }
    println!();

    println!("{}", "Data types (not reserved)".white().bold());
    println!("{}", "─".repeat(60).dimmed());
    for row in grammar::DATA_TYPES.chunks(6) {
        let cells: Vec<String> = row.iter().map(|t| format!("{:10}", t)).collect();
        println!("{}", cells.join(" ").green());
    }
    println!();

    println!("{}", "Symbols".white().bold());
    println!("{}", "─".repeat(60).dimmed());
    println!("{}", grammar::SYMBOLS.join("  ").yellow());
    println!();

    println!(
        "{} {}",
        "Comparison operators:".dimmed(),
        grammar::COMPARISON_OPERATORS.join(" ").white()
    );
}
