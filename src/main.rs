mod cli;

use sportforged::config;
use sportforged::processor::{FileReport, Processor};
use sportforged_quality::{compare_quality, compute_quality_score, extract_quality, QualityScoreStore};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "sportforged=trace,sportforged_matcher=trace,sportforged_quality=trace,sportforged_common=debug".to_string()
        } else {
            "sportforged=debug,sportforged_matcher=info,sportforged_quality=info".to_string()
        }
    });

    // Logs go to stderr so JSON output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Match {
            sport,
            show,
            scores,
            trace,
            json,
            files,
        } => match_files(
            cli.config.as_deref(),
            &sport,
            show.as_deref(),
            scores.as_deref(),
            trace,
            json,
            &files,
        ),
        Commands::Quality {
            sport,
            prior,
            scores,
            destination,
            json,
            file,
        } => quality_file(
            cli.config.as_deref(),
            sport.as_deref(),
            prior,
            scores.as_deref(),
            destination.as_deref(),
            json,
            &file,
        ),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("sportforged {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_scores(path: &Path) -> Result<HashMap<String, i64>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scores file: {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scores file: {:?}", path))
}

fn match_files(
    config_path: Option<&Path>,
    sport_id: &str,
    show_override: Option<&Path>,
    scores_path: Option<&Path>,
    trace: bool,
    json: bool,
    files: &[PathBuf],
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let entry = config
        .sport(sport_id)
        .with_context(|| format!("Unknown sport '{}'", sport_id))?;
    if !entry.sport.enabled {
        anyhow::bail!("Sport '{}' is disabled", sport_id);
    }

    let show_path = show_override
        .or(entry.show.as_deref())
        .with_context(|| format!("Sport '{}' has no show file; pass --show", sport_id))?;
    let show = config::load_show(show_path)?;
    let matcher = config::compile_sport(&config, entry)?;

    let scores = match scores_path {
        Some(path) => load_scores(path)?,
        None => HashMap::new(),
    };

    tracing::info!(
        "Matching {} files for '{}' against {:?}",
        files.len(),
        entry.sport.display_name(),
        show_path
    );

    let processor = Processor::new(&matcher, &show, entry.quality_profile(&config.quality))
        .with_trace(trace)
        .with_scores(scores);
    let paths: Vec<String> = files
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let reports = processor.match_files(&paths);

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        print_report(report)?;
    }

    let matched = reports.iter().filter(|r| r.matched()).count();
    println!("\n{} of {} files matched", matched, reports.len());

    Ok(())
}

fn print_report(report: &FileReport) -> Result<()> {
    match &report.outcome {
        Some(outcome) => {
            println!(
                "✓ {} -> {} / {} [{}]",
                report.filename, outcome.season, outcome.episode, outcome.method
            );
            println!("    Quality: {} (score {})", report.quality, report.score.total);
            if let Some(ref decision) = report.decision {
                let verdict = if decision.should_replace() {
                    "replace"
                } else {
                    "keep existing"
                };
                println!("    Decision: {} ({})", verdict, decision.reason());
            }
        }
        None => println!("✗ {}", report.filename),
    }

    for diagnostic in &report.diagnostics {
        println!("    {}", diagnostic);
    }

    if let Some(ref trace) = report.trace {
        println!("{}", serde_json::to_string_pretty(trace)?);
    }

    Ok(())
}

fn quality_file(
    config_path: Option<&Path>,
    sport_id: Option<&str>,
    prior: Option<i64>,
    scores_path: Option<&Path>,
    destination: Option<&str>,
    json: bool,
    file: &Path,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let profile = match sport_id {
        Some(id) => config
            .sport(id)
            .with_context(|| format!("Unknown sport '{}'", id))?
            .quality_profile(&config.quality),
        None => config.quality.clone(),
    };

    let filename = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string_lossy().into_owned());

    let prior = match (prior, scores_path, destination) {
        (Some(prior), _, _) => Some(prior),
        (None, Some(path), Some(destination)) => load_scores(path)?.quality_score(destination),
        _ => None,
    };

    let info = extract_quality(&filename, None);
    let score = compute_quality_score(&info, &profile);
    let comparison = compare_quality(&info, prior, &profile);

    if json {
        let output = serde_json::json!({
            "filename": filename,
            "quality": info,
            "score": score,
            "comparison": comparison,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("File: {}", filename);
    println!("Quality: {}", info);
    if let Some(ref group) = info.release_group {
        println!("Release group: {}", group);
    }
    println!(
        "Score: {} (resolution {}, source {}, group {}, proper {}, repack {}, hdr {})",
        score.total,
        score.resolution_points,
        score.source_points,
        score.release_group_points,
        score.proper_bonus,
        score.repack_bonus,
        score.hdr_bonus
    );
    if !profile.enabled {
        println!("Quality scoring is disabled for this profile");
    }
    println!(
        "Upgrade: {} ({})",
        if comparison.should_upgrade { "yes" } else { "no" },
        comparison.reason
    );
    if comparison.cutoff_reached {
        println!("Cutoff reached");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using default locations");
            config::load_config_or_default(None)?
        }
    };

    println!("✓ Configuration is valid");
    println!("  Sports: {}", config.sports.len());
    println!("    Enabled: {}", config.enabled_sports().count());
    println!("  Pattern sets: {}", config.pattern_sets.len());
    println!("  Team alias tables: {}", config.team_aliases.len());
    println!("  Custom fragments: {}", config.fragments.len());
    println!("  Quality scoring enabled: {}", config.quality.enabled);

    for entry in config.enabled_sports() {
        let matcher = config::compile_sport(&config, entry)?;
        println!(
            "  ✓ {} ({} patterns)",
            entry.sport.display_name(),
            matcher.patterns().len()
        );
    }

    Ok(())
}
