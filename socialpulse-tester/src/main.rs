mod scenarios;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use scenarios::{SCENARIOS, ScenarioOutcome, run_scenario};

#[derive(Debug, Parser)]
#[command(name = "socialpulse-tester", version = "0.1.0")]
#[command(about = "Automated QA for the SocialPulse engagement engine - deterministic simulations")]
struct Args {
    /// Scenarios to run (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Simulated days per scenario run
    #[arg(long, default_value_t = 30)]
    days: u32,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn resolve_scenarios(arg: &str) -> Result<Vec<String>> {
    if arg == "all" {
        return Ok(SCENARIOS.iter().map(|s| (*s).to_string()).collect());
    }
    let requested = split_csv(arg);
    for name in &requested {
        if !SCENARIOS.contains(&name.as_str()) {
            bail!("unknown scenario `{name}` (try --list-scenarios)");
        }
    }
    Ok(requested)
}

fn resolve_seeds(arg: &str) -> Result<Vec<u64>> {
    split_csv(arg)
        .iter()
        .map(|s| s.parse::<u64>().with_context(|| format!("bad seed `{s}`")))
        .collect()
}

fn print_console(outcomes: &[ScenarioOutcome], verbose: bool) {
    for outcome in outcomes {
        let status = if outcome.passed() {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        println!(
            "{status} {} (seed {})",
            outcome.scenario.bold(),
            outcome.seed
        );
        for check in &outcome.checks {
            if check.passed && !verbose {
                continue;
            }
            let mark = if check.passed {
                "ok".green()
            } else {
                "failed".red()
            };
            println!("  {} {}: {}", mark, check.name, check.detail.dimmed());
        }
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    let summary = format!("{} runs, {} failed", outcomes.len(), failed);
    if failed == 0 {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red().bold());
    }
}

fn write_json(outcomes: &[ScenarioOutcome], output: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(outcomes)?;
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create report at {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            writeln!(writer, "{json}")?;
        }
        None => writeln!(stdout(), "{json}")?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if args.list_scenarios {
        for name in SCENARIOS {
            println!("{name}");
        }
        return Ok(());
    }

    let scenario_names = resolve_scenarios(&args.scenarios)?;
    let seeds = resolve_seeds(&args.seeds)?;

    let mut outcomes = Vec::new();
    for name in &scenario_names {
        for seed in &seeds {
            log::debug!("running {name} with seed {seed}");
            let outcome = run_scenario(name, *seed, args.days)
                .with_context(|| format!("scenario `{name}` vanished mid-run"))?;
            outcomes.push(outcome);
        }
    }

    match args.report.as_str() {
        "json" => write_json(&outcomes, args.output.as_ref())?,
        _ => print_console(&outcomes, args.verbose),
    }

    if outcomes.iter().any(|o| !o.passed()) {
        std::process::exit(1);
    }
    Ok(())
}
