use std::path::PathBuf;

use anyhow::{Context, bail};
use app::App;
use clap::{Parser, Subcommand};
use db::models::project::ProjectFormData;
use dialoguer::Confirm;
use generation::GenerationClient;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "vibeshare", about = "Internal gallery of vibe-coded artifacts")]
struct Cli {
    /// Directory holding the persistent slots
    #[arg(long, global = true, env = "VIBESHARE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Establish the session under a name (no credential check)
    Login { name: String },
    /// Forget the stored session name
    Logout,
    /// Print the active session name
    Whoami,
    /// Browse the catalog
    List {
        /// Case-insensitive substring over title, description and author
        #[arg(long, default_value = "")]
        query: String,
        /// Exact-match tag filter
        #[arg(long)]
        tag: Option<String>,
    },
    /// Print the selectable tag chips
    Tags,
    /// Share a new artifact
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// The generation prompt the artifact was built from
        #[arg(long, default_value = "")]
        prompt: String,
        #[arg(long, default_value = "")]
        builder_url: String,
        #[arg(long, default_value = "")]
        repo_url: String,
        #[arg(long, default_value = "")]
        deploy_url: String,
        /// Ask the generation service to draft the description from the prompt
        #[arg(long)]
        describe: bool,
    },
    /// Delete an artifact by id
    Delete {
        id: Uuid,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.unwrap_or_else(db::default_data_dir);

    let mut app = App::new(&data_dir, GenerationClient::from_env());
    app.load().context("failed to read the local store")?;

    match cli.command {
        Command::Login { name } => {
            app.login(&name)?;
            println!("Logged in as {name}");
        }
        Command::Logout => {
            app.logout()?;
            println!("Logged out");
        }
        Command::Whoami => match app.user() {
            Some(name) => println!("{name}"),
            None => println!("Not logged in"),
        },
        Command::List { query, tag } => {
            let projects = app.filtered_projects(&query, tag.as_deref());
            if projects.is_empty() {
                println!("No artifacts found. Try adjusting the search or add a new project.");
            }
            for project in projects {
                println!("{}  {}  by {}", project.id, project.title, project.author);
                if !project.description.is_empty() {
                    println!("    {}", project.description);
                }
                if !project.tags.is_empty() {
                    println!("    tags: {}", project.tags.join(", "));
                }
            }
        }
        Command::Tags => {
            for tag in app.tag_choices() {
                println!("{tag}");
            }
        }
        Command::Add {
            title,
            description,
            prompt,
            builder_url,
            repo_url,
            deploy_url,
            describe,
        } => {
            let Some(author) = app.user().map(|u| u.to_string()) else {
                bail!("no active session, run `vibeshare login <name>` first");
            };

            app.open_create()?;

            let mut description = description;
            if describe && !prompt.is_empty() {
                let suggested = app.suggest_description(&prompt).await;
                if !suggested.is_empty() {
                    description = suggested;
                }
            }

            let form = ProjectFormData {
                title,
                description,
                prompt,
                builder_url,
                repo_url,
                deploy_url,
                author,
            };
            let project = app.submit_project(form).await?;
            println!("Shared {} ({})", project.title, project.id);
            println!("tags: {}", project.tags.join(", "));
        }
        Command::Delete { id, yes } => {
            let confirmed = yes
                || Confirm::new()
                    .with_prompt("Are you sure you want to delete this artifact?")
                    .default(false)
                    .interact()?;
            if confirmed {
                app.delete_project(id)?;
                println!("Deleted {id}");
            } else {
                println!("Aborted");
            }
        }
    }

    Ok(())
}
