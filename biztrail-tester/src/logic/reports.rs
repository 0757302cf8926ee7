use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::simulation::{PlaythroughEnding, PlaythroughRecord, StrategyAggregate};

#[derive(Serialize)]
struct JsonReport<'a> {
    aggregates: &'a [StrategyAggregate],
    records: &'a [PlaythroughRecord],
}

pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[PlaythroughRecord],
    aggregates: &[StrategyAggregate],
    total_duration: Duration,
    verbose: bool,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Playthrough Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "======================".cyan())?;
    writeln!(out, "Total playthroughs: {}", records.len())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for aggregate in aggregates {
        let rate = format!("{:.1}%", aggregate.survival_rate);
        let rate = if aggregate.survival_rate >= 50.0 {
            rate.green()
        } else {
            rate.red()
        };
        writeln!(out, "{}", aggregate.strategy.label().bold())?;
        writeln!(out, "   Runs: {}", aggregate.runs)?;
        writeln!(out, "   Survival rate: {rate}")?;
        writeln!(out, "   Mean months: {:.1}", aggregate.mean_months)?;
        writeln!(out, "   Mean final cash: ${:.2}", aggregate.mean_final_cash)?;
        writeln!(
            out,
            "   Endings: {} cash / {} customers / {} survived",
            aggregate.cash_endings.to_string().red(),
            aggregate.customer_endings.to_string().yellow(),
            aggregate.survived.to_string().green()
        )?;
        writeln!(out)?;
    }

    if verbose {
        writeln!(out, "{}", "🧾 Individual Runs".bright_yellow().bold())?;
        writeln!(out, "{}", "==================".yellow())?;
        for record in records {
            let status = if record.survived() {
                "✅".to_string()
            } else {
                format!("❌ {}", record.ending)
            };
            writeln!(
                out,
                "{status} [{} seed {} #{}] {} months, cash ${:.2}, customers {}",
                record.strategy,
                record.seed,
                record.iteration,
                record.months_played,
                record.final_cash,
                record.final_customers
            )?;
        }
    }
    Ok(())
}

pub fn generate_json_report(
    out: &mut dyn Write,
    records: &[PlaythroughRecord],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    let report = JsonReport {
        aggregates,
        records,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    records: &[PlaythroughRecord],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    writeln!(out, "# Business Trail Playthrough Results\n")?;
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total playthroughs**: {}\n", records.len())?;
    writeln!(
        out,
        "| Strategy | Runs | Survival | Mean months | Cash endings | Customer endings |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for aggregate in aggregates {
        writeln!(
            out,
            "| {} | {} | {:.1}% | {:.1} | {} | {} |",
            aggregate.strategy,
            aggregate.runs,
            aggregate.survival_rate,
            aggregate.mean_months,
            aggregate.cash_endings,
            aggregate.customer_endings
        )?;
    }

    writeln!(out, "\n## Runs\n")?;
    for record in records {
        writeln!(
            out,
            "- **{}** seed {} #{}: {} after {} months (cash ${:.2}, customers {})",
            record.strategy,
            record.seed,
            record.iteration,
            record.ending,
            record.months_played,
            record.final_cash,
            record.final_customers
        )?;
    }
    Ok(())
}
