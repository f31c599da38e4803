//! Tailink CLI
//!
//! Command-line front end for the Tailink views:
//! - Log in and out
//! - Register an account
//! - Add dogs and publish availability
//! - List the markers the map would show

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tailink::config::generate_default_config;
use tailink::{
    register_account, ApiClient, AppRoute, AssumeLoaded, AvailabilityInput, ClientError, Config,
    FileSessionStore, Gender, LoadedConfig, LoggingConfig, Marker, NewDog, Picture,
    ProfileDetails, Tailink, Transition,
};

#[derive(Parser)]
#[command(name = "tailink")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Coordinate dog walks from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides config and TAILINK_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: <config dir>/tailink/config.toml, then ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Create an account (account fields, then profile fields)
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// male, female, other or prefer_not_to_say
        #[arg(long)]
        gender: Gender,
        #[arg(long)]
        age: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        about_me: String,
        /// Profile picture file
        #[arg(long)]
        picture: Option<PathBuf>,
    },

    /// Manage your dogs
    Dogs {
        #[command(subcommand)]
        command: DogCommands,
    },

    /// Publish availability windows
    Availability {
        #[command(subcommand)]
        command: AvailabilityCommands,
    },

    /// List the markers the availability map shows
    Map {
        /// Fetch every dog photo and drop markers whose photo fails to load
        #[arg(long)]
        verify_photos: bool,
    },

    /// Forget the stored session token
    Logout,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum DogCommands {
    /// Add a dog to your profile
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        breed: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        about: String,
        /// Dog picture file
        #[arg(long)]
        picture: Option<PathBuf>,
    },

    /// List your dogs
    List,
}

#[derive(Subcommand)]
pub enum AvailabilityCommands {
    /// Show who you are and which dogs you can schedule
    Form,

    /// Offer a dog at a place for a time window
    Set {
        /// Dog name
        #[arg(long)]
        dog: String,
        /// Place name
        #[arg(long)]
        place: String,
        /// Start, local time (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        start: String,
        /// End, local time (YYYY-MM-DDTHH:MM)
        #[arg(long)]
        end: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => LoadedConfig {
            config: Config::load_with_env(path)?,
            source: Some(path.clone()),
            skipped: Vec::new(),
        },
        None => Config::load_default(),
    };
    let mut config = loaded.config;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging);

    for e in &loaded.skipped {
        tracing::warn!("Ignoring config file: {}", e);
    }
    match &loaded.source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::debug!("Using default config with environment overrides"),
    }

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing config to {:?}", path))?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let client = ApiClient::new(&config.api)?;
    let session = FileSessionStore::new(config.session.resolve_path());
    let app = Tailink::new(client, session);

    tracing::debug!("Using API at {}", app.client().base_url());

    if let Err((view, e)) = run(&app, &cli, &config).await {
        tracing::error!(error = %e, "{} failed", view);
        eprintln!("{}", e.alert(view));
        std::process::exit(1);
    }

    Ok(())
}

async fn run(
    app: &Tailink<FileSessionStore>,
    cli: &Cli,
    config: &Config,
) -> Result<(), (AppRoute, ClientError)> {
    match &cli.command {
        Commands::Login { username, password } => {
            let next = app
                .login(username, password)
                .await
                .map_err(|e| (AppRoute::Login, e))?;
            println!("Logged in as {}", username);
            report(next);
        }

        Commands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
            gender,
            age,
            city,
            about_me,
            picture,
        } => {
            let (draft, _) = register_account(username, email, password);
            let details = ProfileDetails {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                gender: *gender,
                age: age.clone(),
                city: city.clone(),
                about_me: about_me.clone(),
                picture: read_picture(picture.as_deref())
                    .map_err(|e| (AppRoute::RegisterDetails, e))?,
            };

            let next = app
                .complete_registration(Some(draft), details)
                .await
                .map_err(|e| (AppRoute::RegisterDetails, e))?;
            println!("Account {} created", username);
            report(next);
        }

        Commands::Dogs { command } => match command {
            DogCommands::Add {
                name,
                breed,
                age,
                about,
                picture,
            } => {
                let dog = NewDog {
                    name: name.clone(),
                    breed: breed.clone(),
                    age: age.clone(),
                    about: about.clone(),
                    picture: read_picture(picture.as_deref()).map_err(|e| (AppRoute::Dogs, e))?,
                };
                let next = app.add_dog(&dog).await.map_err(|e| (AppRoute::Dogs, e))?;
                report(next);
            }

            DogCommands::List => {
                let dogs = app.my_dogs().await.map_err(|e| (AppRoute::Dogs, e))?;
                match cli.format {
                    OutputFormat::Json => print_json(&dogs),
                    OutputFormat::Table => {
                        if dogs.is_empty() {
                            println!("No dogs yet.");
                            println!();
                            println!("Add your first dog with:");
                            println!(
                                "  tailink dogs add --name Rex --breed Beagle --age 3 \
                                 --about \"Loves the beach\""
                            );
                        } else {
                            println!("{:<20} {:<20} {:<5} {}", "Name", "Breed", "Age", "Picture");
                            println!("{}", "-".repeat(70));
                            for dog in dogs {
                                println!(
                                    "{:<20} {:<20} {:<5} {}",
                                    dog.name,
                                    dog.breed.unwrap_or_default(),
                                    dog.age.map(|a| a.to_string()).unwrap_or_default(),
                                    dog.picture.unwrap_or_default()
                                );
                            }
                        }
                    }
                }
            }
        },

        Commands::Availability { command } => {
            let form = app
                .load_availability_form()
                .await
                .map_err(|e| (AppRoute::SetAvailability, e))?;

            match command {
                AvailabilityCommands::Form => {
                    println!("Owner: {}", form.owner_username);
                    if form.dog_names.is_empty() {
                        println!("Dogs:  (none)");
                    } else {
                        println!("Dogs:  {}", form.dog_names.join(", "));
                    }
                }
                AvailabilityCommands::Set {
                    dog,
                    place,
                    start,
                    end,
                } => {
                    let input = AvailabilityInput {
                        dog: dog.clone(),
                        place: place.clone(),
                        start: start.clone(),
                        end: end.clone(),
                    };
                    let next = app
                        .set_availability(&form, &input)
                        .await
                        .map_err(|e| (AppRoute::SetAvailability, e))?;
                    report(next);
                }
            }
        }

        Commands::Map { verify_photos } => {
            let loaded = if *verify_photos {
                app.load_map(app.client()).await
            } else {
                app.load_map(&AssumeLoaded).await
            };
            let markers = loaded.map_err(|e| (AppRoute::Map, e))?;

            match cli.format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "style": config.map.style_url(),
                    "center": config.map.center,
                    "zoom": config.map.zoom,
                    "markers": markers,
                })),
                OutputFormat::Table => print_markers(&markers),
            }
        }

        Commands::Logout => {
            app.logout().map_err(|e| (AppRoute::Login, e))?;
            println!("Logged out");
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tailink={}", config.level)),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn read_picture(path: Option<&std::path::Path>) -> Result<Option<Picture>, ClientError> {
    path.map(|p| {
        Picture::from_path(p).map_err(|e| ClientError::File {
            path: p.to_path_buf(),
            error: e.to_string(),
        })
    })
    .transpose()
}

fn report(transition: Transition) {
    if let Some(notice) = transition.notice {
        println!("{}", notice);
    }
    if let Some(route) = transition.to {
        println!("Next: {}", route);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode output: {}", e),
    }
}

fn print_markers(markers: &[Marker]) {
    if markers.is_empty() {
        println!("No availability to show.");
        return;
    }

    println!(
        "{:<12} {:<12} {:<15} {:<17} {:<17} {:<15} {}",
        "Longitude", "Latitude", "Dog", "From", "To", "Owner", "Place"
    );
    println!("{}", "-".repeat(110));

    for marker in markers {
        println!(
            "{:<12.6} {:<12.6} {:<15} {:<17} {:<17} {:<15} {}",
            marker.position.lng,
            marker.position.lat,
            marker.dog,
            marker.popup.from,
            marker.popup.to,
            marker.popup.owner,
            marker.popup.place
        );
    }

    println!();
    println!("{} markers", markers.len());
}
