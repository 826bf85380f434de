use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use movieshelf::api::AddMovieRequest;
use movieshelf::client::{
    load_dashboard, ApiClient, ClientError, ClientResult, Session, SessionStore,
};
use movieshelf::view::{render_dashboard, render_movie_card, StarRating};

#[derive(Parser)]
#[command(name = "movieshelf")]
#[command(about = "Command-line client for the movie watchlist server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    /// Where the logged-in identity is kept between runs.
    #[arg(short, long)]
    session: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Logout,
    Whoami,
    CreateWatchlist {
        #[arg(short, long)]
        name: String,
    },
    /// Shows every watchlist with its movies.
    Watchlists,
    AddMovie {
        /// Watchlist name or id.
        #[arg(short, long)]
        watchlist: String,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        genre: String,
        #[arg(short, long)]
        platform: String,
        /// Rating from 0 to 5.
        #[arg(short, long)]
        review: Option<i64>,
        #[arg(short, long)]
        description: Option<String>,
    },
    #[command(group(ArgGroup::new("target").required(true).args(["name", "id"])))]
    DeleteMovie {
        /// Watchlist name or id.
        #[arg(short, long)]
        watchlist: Option<String>,
        #[arg(short, long, requires = "watchlist")]
        name: Option<String>,
        #[arg(long)]
        id: Option<i64>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movieshelf=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let client = ApiClient::new(&cli.url);
    let store = SessionStore::new(cli.session.unwrap_or_else(SessionStore::default_path));

    match cli.command {
        Commands::Register { username, password } => {
            let user = client.register(&username, &password).await?;
            println!("Registered {} (id {})", user.username, user.id);
        }
        Commands::Login { username, password } => {
            let session = client.login(&username, &password).await?;
            store.save(&session)?;
            println!("Logged in as {}", session.username);
        }
        Commands::Logout => {
            store.clear()?;
            println!("Logged out");
        }
        Commands::Whoami => {
            let session = store.require()?;
            println!("{} (id {})", session.username, session.user_id);
        }
        command => {
            let mut session = store.require()?;
            let result = run_with_session(&client, &session, command).await;
            if store.record_outcome(&mut session, &result)? {
                eprintln!(
                    "Repeated authentication failures, the session was cleared. \
                     Please log in again."
                );
            }
            result?;
        }
    }

    Ok(())
}

async fn run_with_session(
    client: &ApiClient,
    session: &Session,
    command: Commands,
) -> ClientResult<()> {
    match command {
        Commands::CreateWatchlist { name } => {
            let watchlist = client.create_watchlist(session, &name).await?;
            println!("Created watchlist {} (#{})", watchlist.name, watchlist.id);
        }
        Commands::Watchlists => {
            let views = load_dashboard(client, session).await?;
            print!("{}", render_dashboard(session, &views));
        }
        Commands::AddMovie {
            watchlist,
            name,
            genre,
            platform,
            review,
            description,
        } => {
            let watchlist = client.resolve_watchlist(session, &watchlist).await?;
            let movie = client
                .add_movie(&AddMovieRequest {
                    watchlist_id: Some(watchlist.id.into()),
                    name: Some(name),
                    genre: Some(genre),
                    platform: Some(platform),
                    review,
                    description,
                })
                .await?;
            println!(
                "Added {} to {} ({})",
                movie.name,
                watchlist.name,
                StarRating::new(movie.review).render()
            );
            print!("{}", render_movie_card(&watchlist, &movie));
        }
        Commands::DeleteMovie { watchlist, name, id } => {
            let deleted = match (id, name, watchlist) {
                (Some(id), _, Some(watchlist)) => {
                    let watchlist = client.resolve_watchlist(session, &watchlist).await?;
                    client.delete_movie_in(&watchlist, id).await?
                }
                (Some(id), _, None) => client.delete_movie_by_id(id).await?,
                (None, Some(name), Some(watchlist)) => {
                    let watchlist = client.resolve_watchlist(session, &watchlist).await?;
                    client.delete_movie(watchlist.id, &name).await?
                }
                _ => {
                    return Err(ClientError::Usage(
                        "delete-movie needs --id, or --name with --watchlist".to_string(),
                    ))
                }
            };
            println!("Deleted {} (id {})", deleted.name, deleted.id);
        }
        Commands::Register { .. }
        | Commands::Login { .. }
        | Commands::Logout
        | Commands::Whoami => {}
    }

    Ok(())
}
