//! CLI entry point for on-keys
//!
//! Provides command-line interface for parsing key specifications,
//! checking bindings files and simulating key sequences.

use clap::{Parser, Subcommand};
use colored::*;
use on_keys::config::BindingsFile;
use on_keys::core::parser::{parse_attribute, parse_combo_list};
use on_keys::core::{normalize::normalize_key, validate_attribute};
use on_keys::simulate::{parse_script, simulate};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "on-keys")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log binding activity (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a key specification or attribute key is parsed
    Parse {
        /// Key specification (`esc.ctrl-k`) or attribute key (`on-keys:esc__el`)
        spec: String,
    },

    /// Check a bindings file for conflicts and silent failures
    Check {
        /// Path to bindings file
        #[arg(short, long, default_value = "~/.config/on-keys/bindings.toml")]
        config: PathBuf,
    },

    /// Replay a key sequence against a bindings file
    Simulate {
        /// Path to bindings file
        #[arg(short, long, default_value = "~/.config/on-keys/bindings.toml")]
        config: PathBuf,

        /// Comma-separated presses, e.g. "0:ctrl-k,20:esc"
        #[arg(short, long)]
        events: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Parse { spec } => parse_spec(&spec)?,
        Commands::Check { config } => check_bindings(&config)?,
        Commands::Simulate { config, events } => simulate_events(&config, &events)?,
    }

    Ok(())
}

/// RUST_LOG wins; otherwise -v/-vv raise the level from warn
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "on_keys=debug",
        _ => "on_keys=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Expand tilde in path
fn expand(config_path: &Path) -> anyhow::Result<PathBuf> {
    let expanded_path = shellexpand::tilde(
        config_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid path encoding"))?,
    );
    Ok(PathBuf::from(expanded_path.as_ref()))
}

/// Print the parse of a key specification or attribute key
fn parse_spec(spec: &str) -> anyhow::Result<()> {
    let (key, mods) = if spec.contains("on-keys") {
        let attribute = parse_attribute(spec)?;
        let issues = validate_attribute(&attribute);
        (attribute.key, Some((attribute.mods, issues)))
    } else {
        (Some(spec.to_string()), None)
    };

    let combos = key.as_deref().map(parse_combo_list).unwrap_or_default();
    if combos.is_empty() {
        println!("{} {}", "→".cyan(), "matches any key".yellow());
    }
    for combo in &combos {
        if combo.is_keyless() {
            println!("{} {} {}", "✗".red(), combo.to_string().cyan(), "(no base key, never matches)".dimmed());
        } else {
            println!(
                "{} {} → key {:?} {}",
                "✓".green(),
                combo.to_string().cyan().bold(),
                normalize_key(&combo.key),
                format!("[{}]", combo.modifiers).dimmed(),
            );
        }
    }

    if let Some((mods, issues)) = mods {
        if !mods.is_empty() {
            println!("{} modifiers: {}", "→".cyan(), mods.to_string().magenta());
        }
        for issue in issues {
            println!("{} {}", "⚠".yellow(), issue);
        }
    }

    Ok(())
}

/// Check bindings file for conflicts and lint
fn check_bindings(config_path: &Path) -> anyhow::Result<()> {
    let path = expand(config_path)?;
    println!("{} Loading bindings: {}", "→".cyan(), path.display());

    let file = BindingsFile::load(&path)?;
    let bindings = file.parsed()?;
    let report = file.check()?;

    println!("{} Found {} bindings\n", "✓".green(), report.total);

    for (index, issue) in &report.issues {
        let action = bindings
            .get(*index)
            .map(|b| b.action.as_str())
            .unwrap_or_default();
        println!(
            "{} {} {}",
            "⚠".yellow(),
            format!("{}:", action).magenta(),
            issue
        );
    }
    if !report.issues.is_empty() {
        println!();
    }

    if report.conflicts.is_empty() {
        println!("{} {}", "✓".green().bold(), "No conflicts detected!".bold());
        return Ok(());
    }

    println!(
        "{} Found {} conflict{}:\n",
        "✗".red().bold(),
        report.conflicts.len(),
        if report.conflicts.len() == 1 { "" } else { "s" }
    );

    for (i, conflict) in report.conflicts.iter().enumerate() {
        println!(
            "{} {} {}",
            format!("Conflict {}", i + 1).yellow().bold(),
            conflict.combo.to_string().cyan(),
            format!("({})", conflict.trigger).dimmed()
        );

        for (idx, binding) in conflict.conflicting_bindings.iter().enumerate() {
            println!(
                "  {} {} → {}",
                format!("{}.", idx + 1).dimmed(),
                binding.combo,
                binding.action.green(),
            );
        }
        println!();
    }

    println!("{}", "⚠ These bindings will fire together at runtime!".yellow());
    std::process::exit(1);
}

/// Replay scripted presses and list the actions that fired
fn simulate_events(config_path: &Path, events: &str) -> anyhow::Result<()> {
    let path = expand(config_path)?;
    let file = BindingsFile::load(&path)?;
    let presses = parse_script(events)?;

    println!(
        "{} Replaying {} presses against {}\n",
        "→".cyan(),
        presses.len(),
        path.display()
    );

    let fired = simulate(&file, &presses)?;
    for entry in &fired {
        println!("{} {}", "•".green(), entry);
    }

    println!("\n{} {} actions fired", "✓".green(), fired.len());
    Ok(())
}
