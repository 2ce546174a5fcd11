//! howmuch-cli - Command-line unit conversions
//!
//! Usage:
//!   howmuch-cli "3 cubic metres"          # Single query
//!   echo "12 furlongs" | howmuch-cli      # Pipe mode
//!   howmuch-cli -f quantities.txt         # File mode
//!   howmuch-cli -i                        # Interactive REPL
//!   howmuch-cli --server                  # JSON-RPC over stdin/stdout

mod server;

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use howmuch_core::load::{load_catalog, TableSource};
use howmuch_core::{Answer, Catalog, Engine, Query};
use log::debug;

#[derive(Parser, Debug)]
#[command(name = "howmuch-cli")]
#[command(about = "Convert a quantity into other units and compare it with familiar things", long_about = None)]
struct Args {
    /// Quantity to convert, e.g. "2 km"
    text: Option<String>,

    /// Read quantities from file, one per line
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Interactive REPL mode
    #[arg(short, long)]
    interactive: bool,

    /// Show only the conversions (no titles or comparisons)
    #[arg(short, long)]
    quiet: bool,

    /// Print each answer as JSON
    #[arg(long, conflicts_with = "quiet")]
    json: bool,

    /// Serve JSON-RPC requests on stdin/stdout
    #[arg(long)]
    server: bool,

    /// Units table (path or http(s) URL)
    #[arg(long, env = "HOWMUCH_UNITS", value_name = "SOURCE", requires = "comparisons")]
    units: Option<TableSource>,

    /// Comparisons table (path or http(s) URL)
    #[arg(long, env = "HOWMUCH_COMPARISONS", value_name = "SOURCE", requires = "units")]
    comparisons: Option<TableSource>,

    /// Significant figures to show instead of those of the input
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=21))]
    figures: Option<u8>,

    /// Log catalog loading and lookups to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let engine = Engine::new(load(&args)?);
    let figures = args.figures.map(usize::from);
    let output = Output {
        quiet: args.quiet,
        json: args.json,
        figures,
    };

    if args.server {
        server::run_server(&engine)?;
    } else if let Some(text) = &args.text {
        output.print(&engine, text)?;
    } else if let Some(path) = &args.file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        for line in content.lines().filter(|line| !line.trim().is_empty()) {
            output.print(&engine, line)?;
        }
    } else if args.interactive {
        run_repl(&engine, &output)?;
    } else if !io::stdin().is_terminal() {
        // Pipe mode
        for line in io::stdin().lock().lines() {
            let line = line?;
            if !line.trim().is_empty() {
                output.print(&engine, &line)?;
            }
        }
    } else {
        eprintln!("Usage: howmuch-cli <quantity>");
        eprintln!("       howmuch-cli -f <file>");
        eprintln!("       howmuch-cli -i");
        eprintln!("       echo \"2 km\" | howmuch-cli");
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .target(env_logger::Target::Stderr)
        .init();
}

/// Built-in tables unless both sources are given
fn load(args: &Args) -> Result<Catalog> {
    match (&args.units, &args.comparisons) {
        (Some(units), Some(comparisons)) => {
            debug!("loading tables from {units} and {comparisons}");
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime
                .block_on(load_catalog(units, comparisons))
                .context("failed to load unit tables")
        }
        _ => Catalog::builtin().context("built-in unit tables are invalid"),
    }
}

struct Output {
    quiet: bool,
    json: bool,
    figures: Option<usize>,
}

impl Output {
    fn print(&self, engine: &Engine, text: &str) -> Result<()> {
        let query = engine.query_with_figures(text, self.figures);
        let mut stdout = io::stdout().lock();

        if self.json {
            writeln!(stdout, "{}", serde_json::to_string(&query)?)?;
            return Ok(());
        }

        match &query {
            Query::Incomplete => {
                if !self.quiet {
                    writeln!(stdout, "{text}: enter a number followed by a unit")?;
                }
            }
            Query::Unrecognized { input } => {
                writeln!(
                    stdout,
                    "Sorry, I don't recognise the unit {:?}",
                    input.unit_text
                )?;
            }
            Query::Answer(answer) if self.quiet => {
                for conversion in &answer.conversions {
                    writeln!(stdout, "{}", conversion.formatted)?;
                }
            }
            Query::Answer(answer) => write_answer(&mut stdout, answer)?,
        }
        Ok(())
    }
}

fn write_answer(out: &mut impl Write, answer: &Answer<'_>) -> io::Result<()> {
    writeln!(out, "{}", answer.interpretation)?;
    if !answer.unit.description.is_empty() {
        writeln!(out, "{}", answer.unit.description)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", answer.conversions_title())?;
    if answer.conversions.is_empty() {
        writeln!(out, "  (no other units of this kind)")?;
    }
    for conversion in &answer.conversions {
        // Pad formatted quantity to align unit names
        let width = 24usize.saturating_sub(conversion.formatted.chars().count());
        writeln!(
            out,
            "  {}{:width$}  {}",
            conversion.formatted, "", conversion.unit.name
        )?;
    }

    if !answer.comparisons.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", answer.comparisons_title())?;
        for comparison in &answer.comparisons {
            writeln!(out, "  {}", comparison.phrase)?;
            if !comparison.comparison.description.is_empty() {
                writeln!(out, "    {}", comparison.comparison.description)?;
            }
        }
    }
    writeln!(out)
}

fn run_repl(engine: &Engine, output: &Output) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("howmuch - how much is that, really?");
    println!("Type a quantity such as \"3 cubic metres\". Press Ctrl+D to exit.\n");

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            println!();
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "units" => {
                print_units(engine);
                continue;
            }
            "help" => {
                print_help();
                continue;
            }
            _ => {}
        }

        output.print(engine, line)?;
    }

    Ok(())
}

fn print_units(engine: &Engine) {
    let catalog = engine.catalog();
    for dimension in catalog.dimensions() {
        let names: Vec<&str> = catalog
            .dimension(dimension)
            .map(|unit| unit.symbol.as_str())
            .collect();
        println!("{dimension:>4}: {}", names.join(", "));
    }
}

fn print_help() {
    println!(
        r#"
Commands:
  help     Show this help
  units    List known units by dimension
  quit     Exit the REPL

Examples:
  2 km                 Distance
  3 cubic metres       Volume
  12 furlongs          Unit names can be spelled out
  1500 kilowatt hours  Energy
  0.5 ha               Area
"#
    );
}
