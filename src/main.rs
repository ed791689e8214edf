use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use dialoguer::Confirm;
use tracing::info;
use tracing_subscriber::EnvFilter;

use nexo_client::{
    render, App, Bucket, Config, ConsoleNotifier, EditForm, HttpStore, ItemId, ItemStatus,
    LibraryForm, ReviewForm, Section,
};

#[derive(Parser)]
#[command(name = "nexo")]
#[command(about = "Reviews and personal library for El Nexo Digital")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(long, default_value = ".nexo/config.yml")]
    config: PathBuf,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    yes: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Community reviews
    #[command(subcommand)]
    Reviews(ReviewCommand),

    /// Personal library
    #[command(subcommand)]
    Library(LibraryCommand),
}

#[derive(Subcommand)]
enum ReviewCommand {
    /// Render the community sections
    List {
        /// Only this section
        #[arg(long)]
        section: Option<Section>,
    },

    /// Show one review in full
    Show {
        /// Review id
        id: String,
    },

    /// Show every review of a title
    Title {
        /// Title to look up (case-insensitive)
        title: String,
    },

    /// Publish a review
    Add {
        /// Section the review belongs to
        #[arg(long)]
        section: Section,

        #[command(flatten)]
        form: ReviewArgs,
    },

    /// Delete a review
    Delete {
        /// Review id
        id: String,
    },
}

#[derive(Args)]
struct ReviewArgs {
    /// Game or media title
    #[arg(long, default_value = "")]
    name: String,

    /// Classification label, e.g. RPG
    #[arg(long)]
    category: Option<String>,

    /// Score from 1 to 5
    #[arg(long)]
    rating: Option<u8>,

    /// Review text
    #[arg(long, default_value = "")]
    body: String,

    /// Cover image URL
    #[arg(long, default_value = "")]
    image: String,
}

#[derive(Subcommand)]
enum LibraryCommand {
    /// Render the full library
    Show,

    /// Item count per category
    Stats,

    /// Add an item
    Add {
        #[arg(long)]
        bucket: Bucket,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "pendiente")]
        status: ItemStatus,

        /// Hours played (videogames only)
        #[arg(long)]
        hours: Option<u32>,
    },

    /// Edit an item
    Edit {
        #[arg(long)]
        bucket: Bucket,

        #[arg(long)]
        id: ItemId,

        #[arg(long)]
        name: String,

        #[arg(long)]
        status: ItemStatus,

        /// Hours played (videogames only)
        #[arg(long)]
        hours: Option<u32>,
    },

    /// Delete an item
    Delete {
        #[arg(long)]
        bucket: Bucket,

        #[arg(long)]
        id: ItemId,
    },
}

type Client = App<HttpStore, ConsoleNotifier>;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("nexo_client=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?.with_env_overrides();

    info!(base_url = %config.api.base_url, "Starting client");

    let store = HttpStore::new(config.api.base_url.clone());
    let mut app = App::new(store, ConsoleNotifier, config);
    app.bootstrap().await;

    match cli.command {
        Commands::Reviews(command) => run_reviews(&mut app, command, cli.yes).await?,
        Commands::Library(command) => run_library(&mut app, command, cli.yes).await,
    }

    Ok(())
}

async fn run_reviews(app: &mut Client, command: ReviewCommand, yes: bool) -> Result<()> {
    match command {
        ReviewCommand::List { section } => {
            let blocks = app.community_view();
            if blocks.is_empty() {
                println!("No hay reseñas de la comunidad.");
            }
            for (block_section, html) in blocks {
                if section.map_or(true, |s| s == *block_section) {
                    println!("<!-- {} -->\n{}", block_section, html);
                }
            }
        }
        ReviewCommand::Show { id } => {
            app.show_review(&id)?;
            print_modal(app);
        }
        ReviewCommand::Title { title } => {
            app.show_title_reviews(&title);
            print_modal(app);
        }
        ReviewCommand::Add { section, form } => {
            let mut form = ReviewForm {
                name: form.name,
                image_url: form.image,
                category: form.category,
                rating: form.rating,
                body: form.body,
            };
            app.submit_review(&mut form, section).await;
        }
        ReviewCommand::Delete { id } => {
            app.delete_review(&id, |prompt| confirm(prompt, yes)).await;
        }
    }

    Ok(())
}

async fn run_library(app: &mut Client, command: LibraryCommand, yes: bool) {
    match command {
        LibraryCommand::Show => {
            app.show_library();
            print_modal(app);
        }
        LibraryCommand::Stats => {
            for (bucket, count) in app.stats() {
                println!("{:<12} {}", bucket.title(), count);
            }
        }
        LibraryCommand::Add {
            bucket,
            name,
            status,
            hours,
        } => {
            app.show_add_form(bucket);
            app.add_library_item(LibraryForm {
                bucket,
                name,
                status,
                hours,
            })
            .await;
            println!("{}", render::library_stats(app.state().library()));
        }
        LibraryCommand::Edit {
            bucket,
            id,
            name,
            status,
            hours,
        } => {
            app.edit_library_item(bucket, id, EditForm { name, status, hours })
                .await;
            print_modal(app);
        }
        LibraryCommand::Delete { bucket, id } => {
            app.delete_library_item(bucket, id, |prompt| confirm(prompt, yes))
                .await;
            print_modal(app);
        }
    }
}

fn confirm(prompt: &str, yes: bool) -> bool {
    if yes {
        return true;
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}

fn print_modal(app: &Client) {
    if let Some(html) = app.modal().render() {
        println!("{}", html);
    }
}
