use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "movieshelf-server")]
#[command(about = "Movie watchlist server", long_about = None)]
struct Args {
    /// YAML config file. Without one, built-in defaults and the
    /// environment are used.
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_filter = if args.debug {
        "movieshelf=debug,tower_http=debug"
    } else {
        "movieshelf=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = movieshelf::run(args.config.as_deref(), args.debug).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
