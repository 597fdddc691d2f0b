use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use movie_reviews::config::DEFAULT_CONFIG_PATH;
use movie_reviews::{
    filter_reviews, validate_form, Config, FavoritesStore, JsonFileStorage, Review, ReviewClient,
    ReviewDraft, ReviewForm, ReviewId, SearchField,
};

#[derive(Parser)]
#[command(name = "movie-reviews")]
#[command(about = "Browse, edit and favorite movie reviews")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the review API base URL
    #[arg(long, env = "MOVIE_REVIEWS_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List reviews, optionally filtered
    List {
        /// Text to search for
        #[arg(long)]
        search: Option<String>,

        /// Field to search in (title, director, genre, year)
        #[arg(long, default_value_t = SearchField::Title)]
        by: SearchField,
    },

    /// Show a single review
    Show {
        /// Review ID
        id: ReviewId,
    },

    /// Create a review from a JSON file
    Create {
        /// Path to the review JSON
        #[arg(long)]
        file: PathBuf,
    },

    /// Replace a review with the contents of a JSON file
    Update {
        /// Review ID
        id: ReviewId,

        /// Path to the review JSON
        #[arg(long)]
        file: PathBuf,
    },

    /// Delete a review
    Delete {
        /// Review ID
        id: ReviewId,
    },

    /// Manage favorite reviews
    Favorites {
        #[command(subcommand)]
        action: FavoritesCommand,
    },
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// List favorites
    List,

    /// Fetch a review and add it to favorites
    Add {
        /// Review ID
        id: ReviewId,
    },

    /// Remove a review from favorites
    Remove {
        /// Review ID
        id: ReviewId,
    },

    /// Remove all favorites
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("movie_reviews=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    match cli.command {
        Commands::List { search, by } => {
            list_reviews(&config, search.as_deref(), by).await?;
        }
        Commands::Show { id } => {
            show_review(&config, &id).await?;
        }
        Commands::Create { file } => {
            create_review(&config, &file).await?;
        }
        Commands::Update { id, file } => {
            update_review(&config, &id, &file).await?;
        }
        Commands::Delete { id } => {
            let client = ReviewClient::new(&config.api)?;
            client.delete_review(&id).await?;
            println!("Deleted review {}", id);
        }
        Commands::Favorites { action } => {
            run_favorites(&config, action).await?;
        }
    }

    Ok(())
}

async fn list_reviews(config: &Config, search: Option<&str>, by: SearchField) -> Result<()> {
    let client = ReviewClient::new(&config.api)?;
    let reviews = client
        .list_reviews()
        .await
        .context("Failed to load reviews")?;

    let found = filter_reviews(&reviews, search.unwrap_or_default(), by);

    if found.is_empty() {
        println!("No movies found.");
        return Ok(());
    }

    for review in found {
        println!("  {}", review.summary_line());
    }

    Ok(())
}

async fn show_review(config: &Config, id: &ReviewId) -> Result<()> {
    let client = ReviewClient::new(&config.api)?;
    let review = client.get_review(id).await?;
    print_review(&review);
    Ok(())
}

async fn create_review(config: &Config, file: &Path) -> Result<()> {
    let draft = read_draft(file)?;
    let client = ReviewClient::new(&config.api)?;

    let review = client.create_review(&draft).await?;
    println!("Created review {}", review.id);

    Ok(())
}

async fn update_review(config: &Config, id: &ReviewId, file: &Path) -> Result<()> {
    let draft = read_draft(file)?;
    let client = ReviewClient::new(&config.api)?;

    let review = client.update_review(id, &draft).await?;
    println!("Updated review {}", review.id);

    Ok(())
}

/// Parse and validate a draft before anything goes over the network
fn read_draft(file: &Path) -> Result<ReviewDraft> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read review file: {}", file.display()))?;

    let form: ReviewForm = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse review file: {}", file.display()))?;

    Ok(validate_form(form)?)
}

async fn run_favorites(config: &Config, action: FavoritesCommand) -> Result<()> {
    let storage = JsonFileStorage::new(&config.storage.data_dir)?;
    let mut store = FavoritesStore::load(storage)?;

    match action {
        FavoritesCommand::List => {
            if store.is_empty() {
                println!("No favorites yet.");
                return Ok(());
            }

            println!("Favorites ({}):\n", store.len());
            for review in store.favorites() {
                println!("  {}", review.summary_line());
            }
        }
        FavoritesCommand::Add { id } => {
            if store.contains(&id) {
                println!("Review {} is already a favorite", id);
                return Ok(());
            }

            let client = ReviewClient::new(&config.api)?;
            let review = client.get_review(&id).await?;
            let title = review.title().to_string();
            store.add_to_favorites(review)?;
            println!("Added \"{}\" to favorites", title);
        }
        FavoritesCommand::Remove { id } => {
            if store.remove_favorite(&id)? {
                println!("Removed review {} from favorites", id);
            } else {
                println!("Review {} is not a favorite", id);
            }
        }
        FavoritesCommand::Clear => {
            store.clear_favorites()?;
            println!("Cleared favorites");
        }
    }

    info!(count = store.len(), "Favorites command complete");

    Ok(())
}

fn print_review(review: &Review) {
    let d = &review.details;
    println!("{} ({})", d.title, d.year);
    println!("  ID:       {}", review.id);
    println!("  Director: {}", d.director);
    println!("  Genre:    {}", d.genre.join(", "));
    println!("  Actors:   {}", d.actor.join(", "));
    println!("  Poster:   {}", d.poster_url);
    println!("  Rating:   {}/10", d.rating);
    println!("  Tags:     {}", d.tags.join(", "));
    println!();
    println!("{}", d.review_title);
    println!("{}", d.review_text);
}
