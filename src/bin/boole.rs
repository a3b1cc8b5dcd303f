#[macro_use]
extern crate tracing;

use anyhow::{bail, Context, Result};
use boole_engine::{
    audit::audit, shannon::print_tree, utils, Derived, Engine, MinimalForm, Polarity, Variable,
};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::{fs::File, io, io::BufWriter, path::PathBuf};

#[derive(Debug, Parser)]
#[clap(about = "Truth tables, normal forms and Shannon expansions of f(x,y,z)")]
struct Args {
    /// Expression, e.g. "x & !y -> z" or "x∧ȳ→z"
    #[clap(value_parser)]
    expression: Option<String>,

    /// Variable to expand by
    #[clap(short, long, default_value = "x")]
    shannon: String,

    /// Output format
    #[clap(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Output file (json only, stdout otherwise)
    #[clap(short, long, value_parser)]
    output: Option<PathBuf>,

    /// Print the full Shannon expansion tree
    #[clap(long)]
    tree: bool,

    /// Check every function of x, y, z instead of one expression
    #[clap(long)]
    audit: bool,

    /// Number of threads (for the audit)
    #[clap(short = 't', long)]
    num_threads: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn write_json<T: Serialize>(value: &T, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            let out = BufWriter::new(
                File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
            );
            serde_json::to_writer_pretty(out, value)?;
            info!("report written to {}", path.display());
        }
        None => {
            serde_json::to_writer_pretty(io::stdout().lock(), value)?;
            println!();
        }
    }
    Ok(())
}

fn print_derived(title: &str, derived: &Derived) {
    println!("{title}: {}", derived.expression);
    for step in &derived.steps {
        println!("    {step}");
    }
}

fn print_text(engine: &Engine, shannon: &str) {
    println!("f(x,y,z) = {}", engine.display());
    println!();

    let mut header = vec!["x y z".to_string()];
    header.extend(engine.labels().iter().cloned());
    header.push("f".to_string());
    println!("{}", header.join(" | "));
    for row in 0..8u8 {
        let inputs: Vec<String> = Variable::ALL
            .iter()
            .map(|v| (v.bit(row) as u8).to_string())
            .collect();
        let mut cells = vec![inputs.join(" ")];
        cells.extend(engine.columns().iter().map(|c| {
            let cell = (c.values[row as usize] as u8).to_string();
            format!("{cell:^width$}", width = c.label.chars().count())
        }));
        cells.push((engine.truth_vector()[row as usize] as u8).to_string());
        println!("{}", cells.join(" | "));
    }
    println!();

    println!("minterms: {:?}", engine.minterms());
    println!("maxterms: {:?}", engine.maxterms());
    println!("canonical DNF: {}", engine.canonical_dnf());
    println!("canonical CNF: {}", engine.canonical_cnf());

    print_derived("minimal DNF", &engine.derive(&MinimalForm(Polarity::Sop)));
    print_derived("minimal CNF", &engine.derive(&MinimalForm(Polarity::Pos)));
    print_derived("Shannon", &engine.shannon(shannon));
}

fn main() -> Result<()> {
    utils::init_tracing_subscriber("info")?;
    let args = Args::parse();
    debug!("args: {:#?}", args);
    utils::setup_rayon(args.num_threads)?;

    if args.audit {
        let report = audit();
        match args.format {
            Format::Json => write_json(&report, args.output.as_ref())?,
            Format::Text => {
                println!("functions: {}", report.functions);
                println!("redundant covers: {}", report.redundant_covers);
                for failure in &report.failures {
                    println!("FAIL {failure}");
                }
            }
        }
        if !report.is_ok() {
            bail!("audit failed for {} checks", report.failures.len());
        }
        return Ok(());
    }

    let expression = args
        .expression
        .as_deref()
        .context("an expression is required unless --audit is given")?;
    let engine: Engine = expression
        .parse()
        .with_context(|| format!("cannot read expression {expression:?}"))?;
    info!("expression: {}", engine.display());

    match args.format {
        Format::Json => write_json(&engine.report(&args.shannon), args.output.as_ref())?,
        Format::Text => print_text(&engine, &args.shannon),
    }

    if args.tree {
        print_tree(&engine.shannon_tree())?;
    }

    Ok(())
}
