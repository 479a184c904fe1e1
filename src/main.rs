use clap::Parser;
use linguaflow::app::App;
use linguaflow::config::{AppConfig, ScreenCatalog};
use linguaflow::error::user_friendly_message;
use linguaflow::logging::{init_logging, LogConfig, LogTarget};
use linguaflow::rewrite::{RewriteReport, Rewriter, RuleSet};
use linguaflow::Result;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, Level};

mod cli;

use crate::cli::{CatalogArgs, Cli, Command, RewriteArgs};

fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error: {}", user_friendly_message(&error));
            std::process::exit(1);
        }
    };

    let command = cli.command.unwrap_or(Command::Run(CatalogArgs::default()));
    let base_level = Level::from_str(&config.log_level).unwrap_or(Level::INFO);
    let mut log_config = LogConfig::from_verbosity(base_level, cli.verbose);
    if matches!(command, Command::Run(_)) {
        match config.log_file_path() {
            Ok(path) => log_config = log_config.with_target(LogTarget::File(path)),
            Err(error) => {
                eprintln!("error: {}", user_friendly_message(&error));
                std::process::exit(1);
            }
        }
    }
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match command {
        Command::Run(args) => report(run_app(config, &args).map(|()| 0)),
        Command::Rewrite(args) => report(run_rewrite(&args).map(|report| {
            print_report(&report);
            i32::from(report.has_failures())
        })),
        Command::CheckCatalog(args) => report(check_catalog(&config, &args).map(|()| 0)),
    };
    std::process::exit(exit_code);
}

fn report(result: Result<i32>) -> i32 {
    result.unwrap_or_else(|error| {
        eprintln!("error: {}", user_friendly_message(&error));
        1
    })
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
}

fn resolve_catalog(config: &AppConfig, args: &CatalogArgs) -> Result<ScreenCatalog> {
    match &args.catalog {
        Some(path) => ScreenCatalog::load(path),
        None => config.load_catalog(),
    }
}

fn run_app(config: AppConfig, args: &CatalogArgs) -> Result<()> {
    let catalog = resolve_catalog(&config, args)?;
    let mut app = App::with_catalog(&config, catalog)?;
    app.init()?;
    let result = app.run();
    app.restore()?;
    result
}

fn run_rewrite(args: &RewriteArgs) -> Result<RewriteReport> {
    let rules = RuleSet::load(&args.rules)?;
    info!(rules = rules.rules().len(), root = %args.root.display(), "rewriting");
    Rewriter::new(args.root.clone(), rules)
        .with_dry_run(args.dry_run)
        .with_backup(args.backup)
        .with_progress(!args.no_progress)
        .run()
}

fn print_report(report: &RewriteReport) {
    let verb = if report.dry_run { "would rewrite" } else { "rewrote" };
    for path in &report.rewritten {
        println!("{} {}", verb, path.display());
    }
    for (path, reason) in &report.skipped {
        println!("skipped {}: {}", path.display(), reason);
    }
    for (path, reason) in &report.failed {
        eprintln!("failed {}: {}", path.display(), reason);
    }
    for (rule, count) in &report.applied {
        println!("  {}: {} file(s)", rule, count);
    }
    println!("{}", report.summary());
}

fn check_catalog(config: &AppConfig, args: &CatalogArgs) -> Result<()> {
    let catalog = resolve_catalog(config, args)?;
    catalog.validate(&catalog.registry())?;
    println!(
        "catalog ok: {} screen(s), starting at {}",
        catalog.screens.len(),
        catalog.initial
    );
    Ok(())
}
