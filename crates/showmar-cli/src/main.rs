use clap::{ArgAction, Args, Parser, Subcommand};
use commands::{account, browse, clear, favorites, movie, reviews, theme, watchlist, App};
use showmar_config::PathManager;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "showmar")]
#[command(about = "Showmar - discover, favorite and review movies from your terminal")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to a file instead of stderr (rotated daily). Without PATH
    /// the file goes in the showmar log directory.
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse a catalog list with optional filters
    #[command(long_about = "List movies from a catalog category and narrow them down. All filters combine; with none given the list is shown as the catalog returned it.")]
    Browse(BrowseArgs),

    /// List catalog genres
    Genres,

    /// Show a movie's details and reviews
    Movie {
        /// Catalog movie id
        id: String,

        /// Toggle the movie in your favorites
        #[arg(long, action = ArgAction::SetTrue)]
        favorite: bool,

        /// Add the movie to your watchlist (requires login)
        #[arg(long, action = ArgAction::SetTrue)]
        watchlist: bool,
    },

    /// Favorites kept on this device
    Favorites {
        #[command(subcommand)]
        cmd: Option<FavoritesCommands>,
    },

    /// Movies sharing genres with your favorites
    Recommend {
        /// Catalog list to pick recommendations from
        #[arg(long, default_value = "popular")]
        category: String,
    },

    /// Your watchlist (requires login)
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },

    /// Read and write reviews
    Reviews {
        #[command(subcommand)]
        cmd: ReviewCommands,
    },

    /// Log in to the backend
    Login {
        #[arg(long)]
        email: Option<String>,
    },

    /// Create a backend account
    Register {
        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// Forget the stored login
    Logout,

    /// View or update your profile (requires login)
    Profile {
        #[command(subcommand)]
        cmd: Option<ProfileCommands>,
    },

    /// Light or dark display theme
    Theme {
        #[command(subcommand)]
        cmd: Option<ThemeCommands>,
    },

    /// Clear locally stored data
    #[command(long_about = "Clear data stored on this device. Use --favorites, --credentials or --theme to clear one kind of data, or --all to clear everything.")]
    Clear {
        /// Clear favorites, credentials and theme
        #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["favorites", "credentials", "theme"])]
        all: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        favorites: bool,

        /// Clear the stored login token
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,

        #[arg(long, action = ArgAction::SetTrue)]
        theme: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct BrowseArgs {
    /// popular, top-rated, now-playing or upcoming
    #[arg(long, default_value = "popular")]
    pub category: String,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Case-insensitive title substring
    #[arg(long)]
    pub title: Option<String>,

    /// Genre id or name
    #[arg(long)]
    pub genre: Option<String>,

    /// Release year (prefix of the release date)
    #[arg(long)]
    pub year: Option<String>,

    /// Minimum vote average
    #[arg(long, value_name = "RATING")]
    pub min_rating: Option<f64>,

    /// popular or latest
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Subcommand)]
pub enum FavoritesCommands {
    List,
    /// Add or remove a movie
    Toggle { id: String },
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    Show,
    Add { id: String },
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum ReviewCommands {
    /// List reviews for a movie
    List { movie: String },

    /// Write a review (prompts for missing fields)
    Add {
        movie: String,

        /// 1 to 10
        #[arg(long)]
        rating: Option<u8>,

        #[arg(long)]
        comment: Option<String>,
    },

    /// Edit one of your reviews
    Edit {
        movie: String,
        review: String,

        #[arg(long)]
        rating: Option<u8>,

        #[arg(long)]
        comment: Option<String>,
    },

    /// Delete one of your reviews
    Delete {
        movie: String,
        review: String,

        /// Skip the confirmation prompt
        #[arg(long, action = ArgAction::SetTrue)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Prompt for a new password
        #[arg(long, action = ArgAction::SetTrue)]
        password: bool,

        /// Image file to upload as the avatar
        #[arg(long, value_name = "PATH")]
        avatar: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ThemeCommands {
    Show,
    Toggle,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .map(|path| path.unwrap_or_else(|| PathManager::default().default_log_file()));
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::shared(cli.output, cli.quiet);
    let app = App::load(output)?;

    match cli.command {
        Commands::Browse(args) => browse::run_browse(&app, args).await,
        Commands::Genres => browse::run_genres(&app).await,
        Commands::Movie { id, favorite, watchlist } => movie::run_movie(&app, &id, favorite, watchlist).await,
        Commands::Favorites { cmd } => favorites::run_favorites(&app, cmd.unwrap_or(FavoritesCommands::List)).await,
        Commands::Recommend { category } => favorites::run_recommend(&app, &category).await,
        Commands::Watchlist { cmd } => watchlist::run_watchlist(&app, cmd.unwrap_or(WatchlistCommands::Show)).await,
        Commands::Reviews { cmd } => reviews::run_reviews(&app, cmd).await,
        Commands::Login { email } => account::run_login(&app, email).await,
        Commands::Register { username, email } => account::run_register(&app, username, email).await,
        Commands::Logout => account::run_logout(&app),
        Commands::Profile { cmd } => account::run_profile(&app, cmd.unwrap_or(ProfileCommands::Show)).await,
        Commands::Theme { cmd } => theme::run_theme(&app, cmd.unwrap_or(ThemeCommands::Show)),
        Commands::Clear { all, favorites, credentials, theme } => clear::run_clear(&app, all, favorites, credentials, theme),
    }
}
