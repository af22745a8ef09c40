use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use client_core::{
    load_client_settings, DraftField, HttpPostStore, PostFlowController, RefreshOutcome,
    SubmitOutcome,
};
use shared::domain::Post;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Read and write posts on a blog post service")]
struct Args {
    /// Base URL of the post service; overrides client.toml and environment.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every post, newest first.
    List,
    /// Create a post, then print the refreshed list.
    Create {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        #[arg(long, default_value = "")]
        author: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_client_settings()?;
    if let Some(server_url) = &args.server_url {
        settings = settings.with_server_url(server_url)?;
    }
    let store = Arc::new(HttpPostStore::new(&settings)?);
    let mut controller = PostFlowController::new(store);

    if let RefreshOutcome::Failed(err) = controller.start().await {
        eprintln!("Error fetching posts: {err}");
    }

    match args.command {
        Command::List => print_posts(controller.session().posts()),
        Command::Create {
            title,
            body,
            author,
        } => {
            controller.open_modal();
            controller.set_field(DraftField::Title, title);
            controller.set_field(DraftField::Body, body);
            controller.set_field(DraftField::Author, author);

            match controller.submit().await {
                SubmitOutcome::Created { refresh } => {
                    println!("Post created.");
                    if let RefreshOutcome::Failed(err) = refresh {
                        eprintln!("Error fetching posts: {err}");
                    }
                    print_posts(controller.session().posts());
                }
                SubmitOutcome::Invalid(err) => {
                    for field in &err.fields {
                        eprintln!("--{}: {}", field.field.key(), field.message);
                    }
                    bail!("post not submitted");
                }
                SubmitOutcome::Failed(err) => bail!("Error creating post: {err}"),
                SubmitOutcome::InFlight | SubmitOutcome::Discarded => {
                    bail!("post submission was interrupted")
                }
            }
        }
    }

    Ok(())
}

fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts yet.");
        return;
    }
    for post in posts {
        println!("{}", render_post(post));
    }
}

fn render_post(post: &Post) -> String {
    format!(
        "#{} {}\nBy {} on {}\n{}\n",
        post.id.0,
        post.title,
        post.author,
        post.timestamp
            .to_datetime()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S"),
        post.body
    )
}
