//! Builds the genealogy sample graph and reports what was written.

use std::env;
use std::process::ExitCode;

use ontograph::genealogy::{self, KEYSPACE};
use ontograph::{Keyspace, KeyspaceConfig, ReportMode};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    keyspace: KeyspaceConfig,
    show_help: bool,
}

fn parse_args(args: &[String]) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "--strict" => config.keyspace = KeyspaceConfig::strict(),
            "--first-violation" => {
                config.keyspace = config.keyspace.with_report_mode(ReportMode::First);
            }
            other => return Err(format!("unknown option: {other}").into()),
        }
    }
    Ok(config)
}

fn run(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    let keyspace = Keyspace::with_config(KEYSPACE, config.keyspace);

    tracing::info!(keyspace = KEYSPACE, "writing ontology and samples");
    let (sample, summary) = genealogy::populate(&keyspace)?;

    let graph = keyspace.snapshot();
    let firstname = sample.ontology.resources.firstname;
    for name in ["Homer", "Marge", "Bart"] {
        let owner = graph
            .find_resource(firstname, &name.into())
            .map(|resource| graph.owner(resource))
            .transpose()?
            .flatten();
        if let Some(owner) = owner {
            tracing::info!(firstname = name, person = %owner, "resolved");
        }
    }

    println!(
        "Committed version {} of `{}`: {} types, {} entities, {} relations, {} resources",
        summary.version,
        keyspace.name(),
        summary.types,
        summary.entities,
        summary.relations,
        summary.resources,
    );
    println!("Done");
    Ok(())
}

fn print_help() {
    println!("genealogy {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Writes the genealogy ontology, a sample marriage, and a sample parentship,");
    println!("then commits them to an in-memory keyspace.");
    println!();
    println!("Options:");
    println!("  --strict           Stop at the first violation and reject stale commits");
    println!("  --first-violation  Report only the first violation");
    println!("  -h, --help         Show this help");
}
