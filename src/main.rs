use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use vmfleet::auth::AccessToken;
use vmfleet::config::FleetConfig;
use vmfleet::fleet::{self, FleetProfile};
use vmfleet::gcp::GceClient;
use vmfleet::{OperationWaiter, Result};

#[derive(Parser, Debug)]
#[command(name = "vmfleet", version, about = "Reconcile a fixed fleet of compute instances toward running", long_about = None)]
struct Cli {
    /// Built-in fleet profile to reconcile
    #[arg(value_enum, required_unless_present = "profile_file")]
    profile: Option<ProfileName>,

    /// Load a profile from a JSON file instead of a built-in one
    #[arg(long, conflicts_with = "profile")]
    profile_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileName {
    Openmp,
    Mpi,
}

#[tokio::main]
async fn main() {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("vmfleet: {e}");
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config = FleetConfig::from_env();
    config.validate()?;

    let profile = match (cli.profile, &cli.profile_file) {
        (Some(ProfileName::Openmp), _) => FleetProfile::openmp(),
        (Some(ProfileName::Mpi), _) => FleetProfile::mpi(),
        (None, Some(path)) => FleetProfile::from_file(path)?,
        // clap guarantees one of the two is present
        (None, None) => unreachable!(),
    };
    let specs = profile.resolve()?;

    let token = AccessToken::load().await?;
    let client = GceClient::new(&config, token)?;
    let waiter = OperationWaiter::new()
        .interval(config.poll_interval())
        .timeout(config.poll_timeout());

    let reports = fleet::drive(&client, waiter, &specs).await;
    for report in &reports {
        match &report.final_status {
            Some(status) => println!("{} is {status}", report.name),
            None => println!("{} is UNKNOWN", report.name),
        }
    }
    Ok(if reports.iter().any(|r| r.failed()) {
        1
    } else {
        0
    })
}
