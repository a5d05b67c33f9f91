//! Stylepass CLI - design tokens and rem normalization for CSS files

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use stylepass::{
    insert_root_rule, root_custom_properties, BreakpointPrecedence, BreakpointTable, DesignTokenTable,
    FlattenedTokenTable, Pipeline, Printer, StyleSheet, TransformConfig, UnresolvedPolicy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stylepass")]
#[command(version)]
#[command(about = "Inject design tokens into CSS and convert px to rem", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite a style sheet
    Transform(TransformArgs),

    /// Print the flattened token table as JSON
    Flatten {
        /// Design token JSON file
        #[arg(long)]
        tokens: PathBuf,
    },
}

#[derive(Args)]
struct TransformArgs {
    /// Input CSS file, or `-` for stdin
    input: PathBuf,

    /// Design token JSON file
    #[arg(long)]
    tokens: Option<PathBuf>,

    /// Breakpoint JSON file
    #[arg(long)]
    breakpoints: Option<PathBuf>,

    /// Transform config JSON file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pixels per rem
    #[arg(long)]
    base: Option<f64>,

    /// Handling of unknown token keys
    #[arg(long, value_enum)]
    unresolved: Option<UnresolvedPolicy>,

    /// Which table wins inside media features
    #[arg(long, value_enum)]
    precedence: Option<BreakpointPrecedence>,

    /// Skip px to rem conversion
    #[arg(long)]
    no_normalize: bool,

    /// Skip token injection
    #[arg(long)]
    no_inject: bool,

    /// Add a `:root` rule declaring every token as a custom property, after
    /// any leading `@charset`/`@import` statements
    #[arg(long)]
    emit_root: bool,

    /// Print without optional whitespace
    #[arg(long)]
    minify: bool,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Transform(args) => transform(args),
        Commands::Flatten { tokens } => {
            let flat = load_tokens(&tokens)?;
            let json = serde_json::to_string_pretty(&flat)?;
            println!("{}", json);
            Ok(())
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn transform(args: TransformArgs) -> Result<()> {
    let config = build_config(&args)?;
    let tokens = match &args.tokens {
        Some(path) => load_tokens(path)?,
        None => FlattenedTokenTable::default(),
    };
    let breakpoints = match &args.breakpoints {
        Some(path) => BreakpointTable::from_json(&read_file(path)?)
            .with_context(|| format!("invalid breakpoints in {}", path.display()))?,
        None => BreakpointTable::new(),
    };

    let source = read_input(&args.input)?;
    let mut sheet = StyleSheet::parse(&source)
        .with_context(|| format!("failed to parse {}", args.input.display()))?;

    let pipeline = Pipeline::new(&config, &tokens, &breakpoints)?;
    let stats = pipeline.run(&mut sheet);
    tracing::info!(visited = stats.visited, replaced = stats.replaced, "transformed");

    if args.emit_root {
        insert_root_rule(&mut sheet, root_custom_properties(&tokens, &config));
    }

    let printer = if args.minify {
        Printer::minified()
    } else {
        Printer::pretty()
    };
    write_output(args.output.as_deref(), &printer.print(&sheet))
}

fn build_config(args: &TransformArgs) -> Result<TransformConfig> {
    let mut config = match &args.config {
        Some(path) => TransformConfig::from_json(&read_file(path)?)
            .with_context(|| format!("invalid config in {}", path.display()))?,
        None => TransformConfig::default(),
    };
    if let Some(base) = args.base {
        config = config.with_rem_base(base);
    }
    if let Some(unresolved) = args.unresolved {
        config = config.with_unresolved(unresolved);
    }
    if let Some(precedence) = args.precedence {
        config = config.with_precedence(precedence);
    }
    if args.no_normalize {
        config = config.with_normalize_lengths(false);
    }
    if args.no_inject {
        config = config.with_inject_tokens(false);
    }
    config.validate()?;
    Ok(config)
}

fn load_tokens(path: &Path) -> Result<FlattenedTokenTable> {
    let tokens = DesignTokenTable::from_json(&read_file(path)?)
        .with_context(|| format!("invalid design tokens in {}", path.display()))?;
    let flat = FlattenedTokenTable::flatten(&tokens)
        .with_context(|| format!("failed to flatten {}", path.display()))?;
    tracing::debug!(path = %path.display(), tokens = flat.len(), "loaded tokens");
    Ok(flat)
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        Ok(source)
    } else {
        read_file(path)
    }
}

fn write_output(path: Option<&Path>, css: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, css).with_context(|| format!("failed to write {}", path.display()))
        }
        None => io::stdout()
            .write_all(css.as_bytes())
            .context("failed to write stdout"),
    }
}
