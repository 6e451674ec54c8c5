use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use costmap_actions::{ActionLedger, ActionPlan, MergeGuard, OptimizeConfig, OptimizeReport};
use costmap_types::GridHandle;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let output = match cli.command {
        Command::Inspect(args) => cmd_inspect(args, &cli.format),
        Command::Filter(args) => cmd_filter(args, &cli.format),
        Command::Optimize(args) => cmd_optimize(args, &cli.format),
    }?;
    println!("{output}");
    Ok(())
}

fn cmd_inspect(args: InspectArgs, format: &OutputFormat) -> anyhow::Result<String> {
    let ledger = load_plan(&args.plan)?;
    render_ledger(&ledger, format)
}

fn cmd_filter(args: FilterArgs, format: &OutputFormat) -> anyhow::Result<String> {
    let ledger = load_plan(&args.plan)?;
    let mut matching = ActionLedger::new();
    ledger.copy_to_with_matching_dest(&mut matching, GridHandle::from_raw(args.grid));
    render_ledger(&matching, format)
}

fn cmd_optimize(args: OptimizeArgs, format: &OutputFormat) -> anyhow::Result<String> {
    let config = resolve_config(&args)?;
    let mut ledger = load_plan(&args.plan)?;
    let report = ledger.optimize_with(&config);

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "report": report,
                "plan": ActionPlan::from_ledger(&ledger),
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
        OutputFormat::Text => Ok(format!(
            "{}\n{}",
            render_report(&report, &config),
            render_ledger(&ledger, format)?
        )),
    }
}

fn load_plan(path: &Path) -> anyhow::Result<ActionLedger> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading plan {}", path.display()))?;
    let ledger = ActionPlan::from_json_str(&text)
        .and_then(|plan| plan.to_ledger())
        .with_context(|| format!("loading plan {}", path.display()))?;
    tracing::debug!(path = %path.display(), actions = ledger.len(), "plan loaded");
    Ok(ledger)
}

fn resolve_config(args: &OptimizeArgs) -> anyhow::Result<OptimizeConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            OptimizeConfig::from_toml_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => OptimizeConfig::default(),
    };
    if let Some(tolerance) = args.tolerance {
        config.tolerance = tolerance;
    }
    if args.protect_true_overwrite {
        config.guard = MergeGuard::ProtectTrueOverwrite;
    }
    Ok(config)
}

fn render_ledger(ledger: &ActionLedger, format: &OutputFormat) -> anyhow::Result<String> {
    if let OutputFormat::Json = format {
        return Ok(ActionPlan::from_ledger(ledger).to_json_pretty()?);
    }

    let mut lines = Vec::with_capacity(ledger.len() + 1);
    for (index, entry) in ledger.iter().enumerate() {
        let mut line = format!(
            "{:>4}  {:<14} {} {}",
            index,
            entry.kind.as_str().cyan(),
            entry.destination_grid.to_string().yellow(),
            entry.destination_region,
        );
        if let Some(source) = entry.source_grid {
            line.push_str(&format!(
                "  {} {} {}",
                "<-".dimmed(),
                source.to_string().yellow(),
                entry.source_region
            ));
        }
        lines.push(line);
    }
    lines.push(format!(
        "{} actions across {} grids",
        ledger.len().to_string().bold(),
        ledger.destination_grids().len().to_string().bold()
    ));
    Ok(lines.join("\n"))
}

fn render_report(report: &OptimizeReport, config: &OptimizeConfig) -> String {
    let guard = match config.guard {
        MergeGuard::InitiatorOnly => "initiator-only",
        MergeGuard::ProtectTrueOverwrite => "protect-true-overwrite",
    };
    format!(
        "{} Optimized {} -> {} actions (merged {}, tolerance {}, guard {})",
        "✓".green().bold(),
        report.before,
        report.after.to_string().bold(),
        report.merged(),
        report.tolerance,
        guard
    )
}
