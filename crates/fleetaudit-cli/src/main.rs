//! fleetaudit - compliance audit of a tagged cloud VM fleet
//!
//! Exit codes: 0 all controls passed, 1 at least one control failed,
//! 2 configuration or setup error.

use clap::{Args, Parser, Subcommand};
use fleetaudit_cloud::DoClient;
use fleetaudit_common::{find_deployment_root, init_tracing, load_dotenv, RunConfig};
use fleetaudit_engine::{
    echo_report, prepare_run_dirs, select_controls, write_report, Orchestrator,
};
use fleetaudit_remote::SshRunner;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Parser)]
#[command(name = "fleetaudit", version, about = "Compliance audit of a tagged droplet fleet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered controls
    List,
    /// Run controls and write a JSON report
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Deployment root directory (default: auto-detect)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Tag scoping which droplets are audited (default: ENV_TAG or env:demo)
    #[arg(long)]
    env_tag: Option<String>,

    /// Comma-separated control ids (default: all)
    #[arg(long, value_delimiter = ',')]
    controls: Option<Vec<String>>,

    /// Dotenv file to load (default: <root>/.env)
    #[arg(long)]
    dotenv: Option<PathBuf>,

    /// Print the JSON report to stdout instead of the report path
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::List => list_controls(),
        Commands::Run(args) => run(args).await,
    }
}

fn list_controls() -> ExitCode {
    let mut controls = fleetaudit_controls::all();
    controls.sort_by(|a, b| a.id().cmp(b.id()));
    for c in &controls {
        println!("{}\t{}", c.id(), c.title());
    }
    ExitCode::SUCCESS
}

async fn run(args: RunArgs) -> ExitCode {
    let root = args.root.unwrap_or_else(find_deployment_root);
    let root = root.canonicalize().unwrap_or(root);

    let dotenv_path = args.dotenv.unwrap_or_else(|| root.join(".env"));
    load_dotenv(&dotenv_path);

    let cfg = match RunConfig::from_env(&root, args.env_tag.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::from(2);
        }
    };

    let controls = match select_controls(fleetaudit_controls::all(), args.controls.as_deref()) {
        Ok(controls) => controls,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    if let Err(e) = prepare_run_dirs(&cfg) {
        eprintln!("{e}");
        return ExitCode::from(2);
    }

    let inventory = match DoClient::new(&cfg.api_token) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to init API client: {e}");
            return ExitCode::from(2);
        }
    };
    let remote = SshRunner::new(&cfg);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received, finishing current control");
                cancel.cancel();
            }
        });
    }

    let orchestrator = Orchestrator::new(&cfg, &inventory, &remote);
    let report = orchestrator.run(&controls, &cancel).await;

    let report_path = match write_report(&cfg.report_dir, &report) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Failed to write report: {e}");
            return ExitCode::from(2);
        }
    };

    if args.json {
        if let Err(e) = echo_report(&report) {
            eprintln!("Failed to print report: {e}");
            return ExitCode::from(2);
        }
    } else {
        println!("\nReport: {}", report_path.display());
    }

    if report.summary.fail > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
