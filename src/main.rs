use clap::{Parser as ClapParser, Subcommand};
use mdx_lang::cli::{self, CheckMode, CheckOptions, CheckResult, CliError};
use mdx_lang::output::to_json_string;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "mdx")]
#[command(about = "mdx - A parser and syntax checker for MDX queries and expressions")]
#[command(version)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate MDX and optionally print its syntax tree
    Check {
        /// The MDX text (reads from stdin if not provided)
        query: Option<String>,

        /// Parse the text as a single expression
        #[arg(long, conflicts_with = "statement")]
        expression: bool,

        /// Parse the text as a statement
        #[arg(long)]
        statement: bool,

        /// Print the syntax tree as JSON
        #[arg(short, long)]
        json: bool,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Maximum nesting depth of brackets, calls, and sub-selects
        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'mdx docs' to list categories)
        category: String,
    },
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Check {
            query,
            expression,
            statement,
            json,
            pretty,
            max_depth,
        } => {
            let mode = if expression {
                CheckMode::Expression
            } else if statement {
                CheckMode::Statement
            } else {
                CheckMode::Auto
            };
            run_check(query, mode, json || pretty, pretty, max_depth)
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => match cli::get_doc_category(&category) {
            Ok(content) => {
                print!("{}", content);
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(
    query: Option<String>,
    mode: CheckMode,
    json: bool,
    pretty: bool,
    max_depth: Option<usize>,
) -> Result<(), CliError> {
    let query = match query {
        Some(s) => s,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            buffer
        }
        None => return Err(CliError::NoInput),
    };

    let options = CheckOptions {
        query,
        mode,
        json,
        max_depth,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Tree(tree) => println!("{}", to_json_string(&tree, pretty)),
    }
    Ok(())
}
