use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use server_api::{create_post, list_posts, ApiContext};
use shared::protocol::CreatePostRequest;
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/blog.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Seed {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long)]
        author: String,
    },
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = ApiContext {
        storage: Storage::new(&cli.database_url).await?,
    };

    match cli.command {
        Command::Seed {
            title,
            body,
            author,
        } => {
            let post = create_post(&ctx, &CreatePostRequest { title, body, author })
                .await
                .map_err(|err| anyhow!("{:?}: {}", err.code, err.message))?;
            println!("created post_id={} timestamp={}", post.id.0, post.timestamp.0);
        }
        Command::List => {
            let posts = list_posts(&ctx)
                .await
                .map_err(|err| anyhow!("{:?}: {}", err.code, err.message))?;
            for post in posts {
                println!(
                    "{}\t{}\t{}\t{}",
                    post.id.0, post.timestamp.0, post.author, post.title
                );
            }
        }
    }

    Ok(())
}
