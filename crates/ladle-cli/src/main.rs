use anyhow::Result;
use clap::{Parser, Subcommand};
use ladle_application::CatalogUseCase;
use ladle_core::SessionController;
use ladle_infrastructure::FileTokenStore;
use ladle_interaction::HttpRecipeApi;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ladle")]
#[command(about = "Ladle - recipe catalog and session sync client", long_about = None)]
struct Cli {
    /// API origin; falls back to LADLE_API_URL, then localhost
    #[arg(long)]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the recipe catalog
    List,
    /// Show the recommended feed
    Recommended,
    /// Show a single recipe
    Show { id: u64 },
    /// Search the catalog
    Search { query: String },
    /// Store a session obtained out of band
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        access: String,
        #[arg(long)]
        refresh: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the search-history feed
    History,
    /// Show the recently-viewed feed
    Recent,
    /// Toggle a recipe's favorite membership
    Favorite { id: u64 },
    /// List the comments on a recipe
    Comments { id: u64 },
    /// Post a comment on a recipe
    Comment { id: u64, text: String },
    /// Create or update a recipe
    Save(commands::SaveArgs),
    /// Delete a recipe
    Delete { id: u64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let origin = cli
        .api
        .or_else(|| std::env::var("LADLE_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:8000".to_string());

    let api = Arc::new(HttpRecipeApi::new(&origin).with_placeholder_image("/default-image.jpg"));
    let navigator = Arc::new(commands::CliNavigator);
    let controller = Arc::new(SessionController::new(
        Arc::new(FileTokenStore::default_location()?),
        api.clone(),
        navigator.clone(),
    ));
    let usecase = CatalogUseCase::new(controller, api, navigator);
    usecase.bootstrap().await;

    match cli.command {
        Commands::List => commands::list(&usecase).await,
        Commands::Recommended => commands::recommended(&usecase).await,
        Commands::Show { id } => commands::show(&usecase, id).await,
        Commands::Search { query } => commands::search(&usecase, &query).await,
        Commands::Login {
            username,
            access,
            refresh,
        } => commands::login(&usecase, username, access, refresh).await,
        Commands::Logout => commands::logout(&usecase).await,
        Commands::History => commands::history(&usecase).await,
        Commands::Recent => commands::recent(&usecase).await,
        Commands::Favorite { id } => commands::favorite(&usecase, id).await,
        Commands::Comments { id } => commands::comments(&usecase, id).await,
        Commands::Comment { id, text } => commands::comment(&usecase, id, &text).await,
        Commands::Save(args) => commands::save(&usecase, args).await,
        Commands::Delete { id } => commands::delete(&usecase, id).await,
    }
}
