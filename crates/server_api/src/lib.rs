use shared::{
    domain::Post,
    error::{ApiError, ErrorCode},
    protocol::CreatePostRequest,
};
use storage::Storage;
use tracing::info;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_posts(ctx: &ApiContext) -> Result<Vec<Post>, ApiError> {
    ctx.storage.list_posts().await.map_err(internal)
}

/// Validates and stores a post. Ids and timestamps are assigned here, never by callers.
pub async fn create_post(ctx: &ApiContext, req: &CreatePostRequest) -> Result<Post, ApiError> {
    ensure_present("Title", &req.title)?;
    ensure_present("Body", &req.body)?;
    ensure_present("Author", &req.author)?;

    let post = ctx
        .storage
        .insert_post(&req.title, &req.body, &req.author)
        .await
        .map_err(internal)?;
    info!(post_id = post.id.0, author = %post.author, "post created");
    Ok(post)
}

fn ensure_present(label: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("{label} is required"),
        ));
    }
    Ok(())
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}
