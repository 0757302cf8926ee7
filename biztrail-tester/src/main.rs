mod logic;

use anyhow::{Context, Result};
use biztrail_game::{DefaultSeed, MetricsSeed, SeedSource, SimulationEngine, StaticCatalog};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::seeds::split_csv;
use logic::{
    GameplayStrategy, PlaythroughRecord, SimulationConfig, aggregate_records, resolve_seed_inputs,
    resolve_strategies, run_playthrough,
};

#[derive(Debug, Parser)]
#[command(name = "biztrail-tester", version)]
#[command(about = "Automated playthroughs of the Business Trail simulation under scripted strategies")]
struct Args {
    /// Strategies to run (comma-separated, or `all`)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Seeds to run (comma-separated; decimal or 0x-hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of playthroughs per strategy and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Stop a playthrough after this many months
    #[arg(long, default_value_t = logic::simulation::DEFAULT_MAX_MONTHS)]
    max_months: u32,

    /// Dashboard metric records (JSON array) used to seed each company
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    let strategies = resolve_strategies(&split_csv(&args.strategies))?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;

    if args.report == "console" {
        announce_banner();
    }

    let start_time = Instant::now();
    let records = if let Some(path) = args.metrics.as_ref() {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let engine = SimulationEngine::new(StaticCatalog, MetricsSeed::new(json));
        run_matrix(&engine, &args, &strategies, &seeds)?
    } else {
        let engine = SimulationEngine::new(StaticCatalog, DefaultSeed);
        run_matrix(&engine, &args, &strategies, &seeds)?
    };

    write_reports(&args, &records, start_time)
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in GameplayStrategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:15} - {}",
            strategy.label().to_lowercase(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "📈 Business Trail Automated Tester".bright_cyan().bold());
    println!("{}", "==================================".cyan());
}

fn run_matrix<S: SeedSource>(
    engine: &SimulationEngine<StaticCatalog, S>,
    args: &Args,
    strategies: &[GameplayStrategy],
    seeds: &[u64],
) -> Result<Vec<PlaythroughRecord>> {
    let mut records = Vec::with_capacity(strategies.len() * seeds.len() * args.iterations);
    for &strategy in strategies {
        for &seed in seeds {
            let config = SimulationConfig::new(strategy, seed).with_max_months(args.max_months);
            for iteration in 0..args.iterations {
                let record = run_playthrough(engine, config, iteration)?;
                log::info!(
                    "{strategy} seed {seed} #{iteration}: {} after {} months",
                    record.ending,
                    record.months_played
                );
                records.push(record);
            }
        }
    }
    Ok(records)
}

fn write_reports(args: &Args, records: &[PlaythroughRecord], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    let aggregates = aggregate_records(records);

    match args.report.as_str() {
        "json" => {
            logic::reports::generate_json_report(&mut output_target, records, &aggregates)?;
        }
        "markdown" => {
            if records.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Business Trail Playthrough Results\n\n_No playthroughs executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(
                    &mut output_target,
                    records,
                    &aggregates,
                )?;
            }
        }
        _ => {
            let duration = start_time.elapsed();
            if records.is_empty() {
                writeln!(&mut output_target, "No playthroughs executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    records,
                    &aggregates,
                    duration,
                    args.verbose,
                )?;
            }
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            strategies: "all".to_string(),
            list_strategies: false,
            seeds: "1337".to_string(),
            iterations: 1,
            max_months: 6,
            metrics: None,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    #[test]
    fn matrix_covers_every_combination() {
        let args = Args {
            iterations: 2,
            ..base_args()
        };
        let engine = SimulationEngine::new(StaticCatalog, DefaultSeed);
        let records = run_matrix(&engine, &args, &GameplayStrategy::ALL, &[1, 2]).unwrap();
        assert_eq!(records.len(), GameplayStrategy::ALL.len() * 2 * 2);
        assert!(records.iter().all(|r| r.months_played <= 6));
    }

    #[test]
    fn args_parse_with_defaults() {
        let args = Args::try_parse_from(["biztrail-tester", "--seeds", "7,8"]).unwrap();
        assert_eq!(args.strategies, "all");
        assert_eq!(args.iterations, 10);
        assert_eq!(args.report, "console");
        assert!(Args::try_parse_from(["biztrail-tester", "--report", "csv"]).is_err());
    }

    #[test]
    fn output_target_writes_file() {
        let path = std::env::temp_dir().join(format!(
            "biztrail-output-target-{}",
            std::process::id()
        ));
        let mut target = OutputTarget::new(Some(path.clone())).unwrap();
        writeln!(target, "hello").unwrap();
        target.flush_inner().unwrap();
        drop(target);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
        let _ = std::fs::remove_file(path);
    }
}
