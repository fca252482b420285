use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use livewatch_core::Error;

mod context;
mod server;

use context::ServerContext;

#[derive(Parser, Debug, Clone)]
#[command(name = "livewatch")]
#[command(author, version, about = "Livewatch - tracks which Twitch broadcasters are live")]
pub struct Args {
    /// Address the webhook server binds to
    #[arg(long, env = "LIVEWATCH_SERVER_ADDR", default_value = "0.0.0.0:8080")]
    server_addr: String,

    /// Postgres connection URL.
    #[arg(long, env = "DATABASE_URL", default_value = "postgres://livewatch@localhost:5432/livewatch")]
    db_url: String,

    /// Twitch application client id
    #[arg(long, env = "TWITCH_CLIENT_ID")]
    twitch_client_id: Option<String>,

    /// Twitch application client secret
    #[arg(long, env = "TWITCH_CLIENT_SECRET", hide_env_values = true)]
    twitch_client_secret: Option<String>,

    /// Seconds between two status sweeps
    #[arg(long, env = "LIVEWATCH_SWEEP_PERIOD_SECS", default_value_t = 3 * 60 * 60)]
    sweep_period_secs: u64,

    /// Seconds to wait after startup before the first sweep
    #[arg(long, env = "LIVEWATCH_SWEEP_INITIAL_DELAY_SECS", default_value_t = 20)]
    sweep_initial_delay_secs: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run the webhook server and the periodic sweep (default)
    Serve,
    /// Start tracking broadcasters; they begin offline
    Track { ids: Vec<i64> },
    /// Stop tracking broadcasters
    Untrack { ids: Vec<i64> },
    /// Print tracked broadcasters and their status
    List,
    /// Run a single sweep now and print its report
    Sweep,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("livewatch=info,livewatch_core=info,livewatch_server=info"));
    fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();

    let command = args.command.clone().unwrap_or(Command::Serve);
    if let Err(e) = run(args, command).await {
        error!("livewatch error: {:?}", e);
        return Err(e.into());
    }
    Ok(())
}

async fn run(args: Args, command: Command) -> Result<(), Error> {
    match command {
        Command::Serve => server::run_server(args).await,
        Command::Track { ids } => {
            let ctx = ServerContext::connect(&args).await?;
            for id in ids {
                if ctx.track(id).await? {
                    info!("Now tracking broadcaster {}", id);
                } else {
                    info!("Broadcaster {} is already tracked", id);
                }
            }
            Ok(())
        }
        Command::Untrack { ids } => {
            let ctx = ServerContext::connect(&args).await?;
            for id in ids {
                if ctx.repo.remove(id).await? {
                    info!("Stopped tracking broadcaster {}", id);
                } else {
                    info!("Broadcaster {} was not tracked", id);
                }
            }
            Ok(())
        }
        Command::List => {
            let ctx = ServerContext::connect(&args).await?;
            for b in ctx.repo.list_all().await? {
                println!("{:>12}  {:<8}  {}", b.id, b.status, b.display_name);
            }
            Ok(())
        }
        Command::Sweep => {
            let ctx = ServerContext::connect(&args).await?;
            let report = ctx.reconciler()?.sweep().await?;
            println!(
                "tracked={} online={} offline={} written={} failed={}",
                report.tracked, report.online, report.offline, report.written, report.failed
            );
            Ok(())
        }
    }
}
