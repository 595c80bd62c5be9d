use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::{Color, ColoredString, Colorize};
use log::Level;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use jrewrite::ast::TreePrinter;
use jrewrite::parser::{parse_java, Lexer};
use jrewrite::{Config, Document, IntentionOutcome};

#[derive(Parser)]
#[command(name = "jrewrite")]
#[command(about = "Rewrite Java for-each loops into indexed for loops")]
#[command(version)]
struct Cli {
    /// Sets the log level
    #[arg(long, env = "JREWRITE_LOG", default_value = "warn", global = true)]
    log_level: log::LevelFilter,

    /// Spaces per indentation level
    #[arg(long, value_name = "N", global = true)]
    indent: Option<usize>,

    /// Base name of the loop counter
    #[arg(long, value_name = "NAME", global = true)]
    index_name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List for-each loops that can be rewritten
    List {
        /// Java files or directories
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },

    /// Rewrite for-each loops
    Apply {
        /// Java files or directories
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Only rewrite the loop whose header contains LINE:COL
        #[arg(long, value_name = "LINE:COL")]
        at: Option<String>,

        /// Write results back instead of printing them
        #[arg(short, long)]
        write: bool,
    },

    /// Parse a Java file and show the syntax tree
    Parse {
        /// Input Java file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Lexically analyze a Java file
    Lex {
        /// Input Java file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show token locations
        #[arg(short, long)]
        locations: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level)?;

    let mut config = Config::from_env()?;
    if let Some(indent) = cli.indent {
        config.indent_size = indent;
    }
    if let Some(name) = &cli.index_name {
        config.index_name = name.clone();
    }
    config.validate()?;

    match &cli.command {
        Commands::List { paths } => list_loops(paths, &config)?,
        Commands::Apply { paths, at, write } => {
            let position = at.as_deref().map(parse_position).transpose()?;
            apply_rewrites(paths, position, *write, &config)?;
        }
        Commands::Parse { input } => parse_file(input)?,
        Commands::Lex { input, locations } => lex_file(input, *locations)?,
    }

    Ok(())
}

fn init_logger(level: log::LevelFilter) -> Result<()> {
    fern::Dispatch::new()
        .format(move |out, message, record| {
            let level = record.level();
            let color = match level {
                Level::Error => Color::Red,
                Level::Warn => Color::Yellow,
                Level::Info => Color::Blue,
                Level::Debug => Color::Magenta,
                Level::Trace => Color::Green,
            };
            out.finish(format_args!(
                "{} {}",
                ColoredString::from((level.to_string().to_lowercase() + ":").as_str())
                    .color(color)
                    .to_string(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .context("failed to install logger")
}

fn parse_position(text: &str) -> Result<(usize, usize)> {
    let (line, column) = text
        .split_once(':')
        .ok_or_else(|| anyhow!("position must be LINE:COL, got '{}'", text))?;
    let line = line.trim().parse().with_context(|| format!("invalid line in '{}'", text))?;
    let column = column.trim().parse().with_context(|| format!("invalid column in '{}'", text))?;
    Ok((line, column))
}

/// Java files named directly or found under the given directories
fn java_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            bail!("{} does not exist", path.display());
        }
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.with_context(|| format!("failed to walk {}", path.display()))?;
            let is_java = entry.path().extension().map_or(false, |ext| ext == "java");
            if entry.file_type().is_file() && is_java {
                files.push(entry.into_path());
            }
        }
    }
    Ok(files)
}

fn open(path: &Path, config: &Config) -> Result<Document> {
    Document::open(path, config.clone()).with_context(|| format!("failed to load {}", path.display()))
}

fn list_loops(paths: &[PathBuf], config: &Config) -> Result<()> {
    for file in java_files(paths)? {
        let document = open(&file, config)?;
        for eligible in document.eligible_loops() {
            println!(
                "{}:{}:{}: for-each over {}",
                file.display(),
                eligible.location.line,
                eligible.location.column,
                eligible.kind.as_str()
            );
        }
    }
    Ok(())
}

fn apply_rewrites(paths: &[PathBuf], position: Option<(usize, usize)>, write: bool, config: &Config) -> Result<()> {
    let files = java_files(paths)?;
    if position.is_some() && files.len() != 1 {
        bail!("--at needs exactly one Java file, got {}", files.len());
    }

    for file in files {
        let mut document = open(&file, config)?;
        let outcomes = match position {
            Some((line, column)) => vec![document
                .rewrite_at(line, column)
                .with_context(|| format!("rewrite failed in {}", file.display()))?],
            None => document
                .rewrite_all()
                .with_context(|| format!("rewrite failed in {}", file.display()))?,
        };

        let rewritten = outcomes.iter().filter(|o| o.is_rewritten()).count();
        for outcome in &outcomes {
            if let IntentionOutcome::Skipped(reason) = outcome {
                log::warn!("{}: loop left unchanged ({})", file.display(), reason);
            }
        }

        if write {
            if rewritten > 0 {
                document.save()?;
            }
            println!("{}: {} loop(s) rewritten", file.display(), rewritten);
        } else {
            print!("{}", document.text());
        }
    }
    Ok(())
}

fn parse_file(input: &Path) -> Result<()> {
    let source = fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let tree = parse_java(&source)?;
    print!("{}", TreePrinter::new().print(&tree, tree.root()));
    Ok(())
}

fn lex_file(input: &Path, locations: bool) -> Result<()> {
    let source = fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    let lexer = Lexer::new(&source);
    let tokens = lexer.tokenize().map_err(|e| anyhow!("Lexical error: {}", e))?;

    for token in tokens {
        if locations {
            println!("{:?} at {}:{}", token.token_type(), token.location().line, token.location().column);
        } else {
            println!("{:?}: '{}'", token.token_type(), token.lexeme());
        }
    }

    Ok(())
}
