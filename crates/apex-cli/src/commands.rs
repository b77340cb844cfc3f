use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use apex_merge::{MergeEngine, MergeSummary};
use apex_project::{
    check_inputs_exist, check_output_writable, resolve_inputs, resolve_output, ProjectConfig,
};
use colored::Colorize;
use tracing::{info, warn};

use crate::cli::*;

/// Settings shared by every command.
///
/// `cwd` anchors file arguments given on the command line; `root` locates the
/// project config and the merged manifest directory.
struct Context {
    cwd: PathBuf,
    root: PathBuf,
    config: ProjectConfig,
    format: OutputFormat,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    let root = match cli.project {
        Some(project) => cwd.join(project),
        None => cwd.clone(),
    };

    let loaded = ProjectConfig::discover(&root);
    let level = if cli.verbose {
        "debug"
    } else {
        loaded.as_ref().map(|c| c.logs.level.as_str()).unwrap_or("info")
    };
    init_tracing(level);

    let config = loaded.unwrap_or_else(|err| {
        warn!(error = %err, "using default config");
        ProjectConfig::default()
    });
    let ctx = Context {
        cwd,
        root,
        config,
        format: cli.format,
    };

    match cli.command {
        Command::Package(PackageCommand::Merge(args)) => cmd_merge(&ctx, args),
        Command::Package(PackageCommand::Show(args)) => cmd_show(&ctx, args),
        Command::Project(ProjectCommand::Config(_)) => cmd_config(&ctx),
    }
}

fn init_tracing(level: &str) {
    let parsed = log_level(level);
    tracing_subscriber::fmt()
        .with_max_level(parsed.unwrap_or(tracing::Level::INFO))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if parsed.is_none() {
        warn!(level, "unknown log level, using info");
    }
}

fn log_level(level: &str) -> Option<tracing::Level> {
    level.trim().parse().ok()
}

fn cmd_merge(ctx: &Context, args: MergeArgs) -> anyhow::Result<()> {
    let inputs = resolve_inputs(&args.files, &ctx.cwd)?;
    check_inputs_exist(&inputs)?;

    let merged_dir = ctx.root.join(&ctx.config.manifest.merged_path);
    let output = ctx
        .cwd
        .join(resolve_output(args.output.as_deref(), &merged_dir));
    if !args.dry_run {
        check_output_writable(&output, args.force)?;
    }

    let mut engine = MergeEngine::new(ctx.config.encode_options());
    engine.concat(&inputs)?;
    if !engine.has_entries() {
        warn!("merged manifest has no entries");
    }

    if !args.dry_run {
        write_output(&output, &engine.render())?;
        info!(path = %output.display(), "manifest written");
    }

    let summary = engine.summary();
    match ctx.format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "output": output,
                "written": !args.dry_run,
                "summary": summary,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            print_summary(&summary);
            if args.dry_run {
                println!("{} Dry run, {} not written", "!".yellow().bold(), output.display());
            } else {
                println!(
                    "{} Manifest saved at {}",
                    "✓".green().bold(),
                    output.display().to_string().bold()
                );
            }
        }
    }
    Ok(())
}

fn cmd_show(ctx: &Context, args: ShowArgs) -> anyhow::Result<()> {
    let path = ctx.cwd.join(&args.file);
    let mut engine = MergeEngine::new(ctx.config.encode_options());
    engine.load(&path)?;

    let summary = engine.summary();
    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print_summary(&summary),
    }
    Ok(())
}

fn cmd_config(ctx: &Context) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&ctx.config)?);
    Ok(())
}

fn write_output(path: &Path, xml: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, xml).with_context(|| format!("failed to write {}", path.display()))
}

fn print_summary(summary: &MergeSummary) {
    println!("{}", "Merged files".bold());
    for source in &summary.sources {
        println!("  {}", source.display());
    }

    if summary.is_empty() {
        println!("\nNo metadata types.");
        return;
    }

    println!();
    for category in &summary.categories {
        println!(
            "{} {}",
            category.name.cyan().bold(),
            format!("({})", category.count).dimmed()
        );
        for member in &category.members {
            println!("  {member}");
        }
    }
    println!(
        "\n{} types, {} members",
        summary.categories.len().to_string().bold(),
        summary.total_members().to_string().bold()
    );
}
