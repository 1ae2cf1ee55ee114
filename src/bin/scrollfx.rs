use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scrollfx", version)]
struct Cli {
    /// Log filter (e.g. `debug`, `scrollfx=trace`); overrides `RUST_LOG`.
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a motion config file.
    Validate(ValidateArgs),
    /// Replay a scenario against an in-memory surface.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input motion config JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input scenario JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print one JSON object per frame instead of a summary line.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref());
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Run(args) => cmd_run(args),
    }
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(f) => EnvFilter::new(f),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    scrollfx::MotionConfig::from_path(&args.in_path)
        .with_context(|| format!("validate '{}'", args.in_path.display()))?;
    println!("ok");
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let scenario = scrollfx::Scenario::from_path(&args.in_path)
        .with_context(|| format!("load scenario '{}'", args.in_path.display()))?;
    let run = scenario.run().context("replay scenario")?;

    for frame in &run.frames {
        if args.json {
            println!("{}", serde_json::to_string(frame).context("encode frame report")?);
        } else {
            let nav = frame
                .nav
                .map_or_else(|| "-".to_string(), |n| format!("{:?}", n.state));
            println!(
                "t={:.0} offset={:.1} v={:.1} dir={:?} nav={} resets={} reveals={} nav_exec={} writes={} skipped={}",
                frame.at_ms,
                frame.sample.offset,
                frame.sample.velocity,
                frame.sample.direction,
                nav,
                frame.loop_resets.len(),
                frame.reveal_events.len(),
                frame.navigations.len(),
                frame.writes,
                frame.skipped_writes,
            );
        }
    }
    eprintln!(
        "{} frames, {} transition requests, {} routes, {} commanded scrolls",
        run.frames.len(),
        run.transition_requests.len(),
        run.routes.len(),
        run.commanded_scrolls.len()
    );
    Ok(())
}
