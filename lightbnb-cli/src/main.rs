//! lightbnb CLI entry point
//!
//! Thin command surface over the `lightbnb-db` store: schema setup, user
//! lookup and registration, reservation listings, and property search.
//! Results print as pretty JSON, one document per invocation.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lightbnb_db::{
    migrations, DatabaseConfig, NewProperty, NewUser, PasswordMode, PgStore, PropertyFilters,
    Store,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lightbnb",
    version,
    about = "Query and manage the LightBnB rental database"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the LightBnB tables and indexes (safe to rerun)
    Setup,
    /// Look up or register users
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// List a guest's completed reservations
    Reservations(ReservationsArgs),
    /// Search or add property listings
    Properties {
        #[command(subcommand)]
        command: PropertyCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Find a user by email or id
    Find(FindUserArgs),
    /// Register a user
    Add(AddUserArgs),
}

#[derive(Args)]
struct FindUserArgs {
    /// Exact email address to look up
    #[arg(long, required_unless_present = "id", conflicts_with = "id")]
    email: Option<String>,
    /// User id to look up
    #[arg(long)]
    id: Option<i32>,
}

#[derive(Args)]
struct AddUserArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    /// Store the password exactly as supplied instead of the fixed
    /// placeholder the legacy dataset expects
    #[arg(long)]
    store_supplied_password: bool,
}

#[derive(Args)]
struct ReservationsArgs {
    /// Guest user id
    #[arg(long)]
    guest: i32,
    /// Maximum rows to return
    #[arg(long, default_value_t = lightbnb_db::DEFAULT_LIMIT)]
    limit: i64,
}

#[derive(Subcommand)]
enum PropertyCommands {
    /// Search reviewed listings, cheapest first
    Search(SearchArgs),
    /// Add a listing
    Add(AddPropertyArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Match cities containing this text (case-insensitive)
    #[arg(long)]
    city: Option<String>,
    /// Only listings belonging to this owner
    #[arg(long)]
    owner: Option<i32>,
    /// Minimum nightly price, in whole currency units
    #[arg(long)]
    min_price: Option<i32>,
    /// Maximum nightly price, in whole currency units
    #[arg(long)]
    max_price: Option<i32>,
    /// Minimum average review rating
    #[arg(long)]
    min_rating: Option<i16>,
    /// Maximum rows to return
    #[arg(long, default_value_t = lightbnb_db::DEFAULT_LIMIT)]
    limit: i64,
}

#[derive(Args)]
struct AddPropertyArgs {
    /// Owner user id
    #[arg(long)]
    owner: i32,
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "")]
    thumbnail_url: String,
    #[arg(long, default_value = "")]
    cover_url: String,
    /// Nightly price in cents
    #[arg(long)]
    cost_per_night: Option<i32>,
    #[arg(long)]
    parking_spaces: Option<i32>,
    #[arg(long)]
    bathrooms: Option<i32>,
    #[arg(long)]
    bedrooms: Option<i32>,
    #[arg(long, default_value = "")]
    country: String,
    #[arg(long, default_value = "")]
    street: String,
    #[arg(long, default_value = "")]
    city: String,
    #[arg(long, default_value = "")]
    province: String,
    #[arg(long, default_value = "")]
    post_code: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Connect and wrap the pool in the production store.
///
/// `DATABASE_URL` wins when set; otherwise the `LIGHTBNB_*` variables (and
/// their development defaults) decide where to connect.
async fn open_store(passwords: PasswordMode) -> Result<PgStore> {
    dotenvy::dotenv().ok();

    let pool = if let Ok(url) = std::env::var("DATABASE_URL") {
        tracing::debug!("connecting using DATABASE_URL");
        lightbnb_db::create_pool(&url)
            .await
            .context("failed to connect using DATABASE_URL")?
    } else {
        let config = DatabaseConfig::from_env().context("failed to load database configuration")?;
        tracing::debug!(
            "connecting to {}:{}/{}",
            config.host,
            config.port,
            config.database
        );
        lightbnb_db::connect(&config)
            .await
            .with_context(|| format!("failed to connect to {}:{}", config.host, config.port))?
    };

    Ok(PgStore::with_password_mode(pool, passwords))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_setup() -> Result<()> {
    let store = open_store(PasswordMode::default()).await?;
    migrations::run(store.pool()).await?;
    println!("database ready");
    Ok(())
}

async fn run_user_find(args: FindUserArgs) -> Result<()> {
    let store = open_store(PasswordMode::default()).await?;
    let user = match (args.email.as_deref(), args.id) {
        (Some(email), _) => store.user_with_email(email).await?,
        (None, Some(id)) => store.user_with_id(id).await?,
        (None, None) => anyhow::bail!("one of --email or --id is required"),
    };

    match user {
        Some(user) => print_json(&user)?,
        None => println!("no matching user"),
    }
    Ok(())
}

async fn run_user_add(args: AddUserArgs) -> Result<()> {
    let passwords = if args.store_supplied_password {
        PasswordMode::Supplied
    } else {
        PasswordMode::FixedPlaceholder
    };
    let store = open_store(passwords).await?;

    match store
        .add_user(NewUser {
            name: args.name,
            email: args.email,
            password: args.password,
        })
        .await
    {
        Ok(user) => print_json(&user),
        Err(err) if err.is_duplicate() => anyhow::bail!("email already registered"),
        Err(err) => Err(err.into()),
    }
}

async fn run_reservations(args: ReservationsArgs) -> Result<()> {
    let store = open_store(PasswordMode::default()).await?;
    let stays = store
        .reservations_for_guest(args.guest, Some(args.limit))
        .await?;
    print_json(&stays)
}

async fn run_property_search(args: SearchArgs) -> Result<()> {
    let store = open_store(PasswordMode::default()).await?;
    let filters = PropertyFilters {
        city: args.city,
        owner_id: args.owner,
        minimum_price_per_night: args.min_price,
        maximum_price_per_night: args.max_price,
        minimum_rating: args.min_rating,
    };
    let listings = store.search_properties(&filters, Some(args.limit)).await?;
    print_json(&listings)
}

async fn run_property_add(args: AddPropertyArgs) -> Result<()> {
    let store = open_store(PasswordMode::default()).await?;
    let property = store
        .add_property(NewProperty {
            owner_id: args.owner,
            title: args.title,
            description: args.description,
            thumbnail_photo_url: args.thumbnail_url,
            cover_photo_url: args.cover_url,
            cost_per_night: args.cost_per_night,
            parking_spaces: args.parking_spaces,
            number_of_bathrooms: args.bathrooms,
            number_of_bedrooms: args.bedrooms,
            country: args.country,
            street: args.street,
            city: args.city,
            province: args.province,
            post_code: args.post_code,
        })
        .await?;
    print_json(&property)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Setup => run_setup().await,
        Commands::User { command } => match command {
            UserCommands::Find(args) => run_user_find(args).await,
            UserCommands::Add(args) => run_user_add(args).await,
        },
        Commands::Reservations(args) => run_reservations(args).await,
        Commands::Properties { command } => match command {
            PropertyCommands::Search(args) => run_property_search(args).await,
            PropertyCommands::Add(args) => run_property_add(args).await,
        },
    }
}
