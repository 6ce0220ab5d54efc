//! Command handlers. Each drives one or more controllers and prints the
//! result; a controller failure becomes an `anyhow` error carrying the
//! message the controller stored.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use api::{Comment, ImageUpload, Post, PostUpdate};
use ui::{AppContext, FeedScope, LoginForm, NewPostForm, ProfileForm, SignUpForm};

use crate::args::Command;

fn failure(error: Option<String>) -> anyhow::Error {
    anyhow!(error.unwrap_or_else(|| "request failed".to_string()))
}

pub async fn run(command: Command, context: &AppContext) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let auth = context.auth();
            let user = auth
                .login(&LoginForm { email, password })
                .await
                .ok_or_else(|| failure(auth.state().error))?;
            println!("Signed in as {} ({})", user.display_name(), user.user_name);
        }
        Command::Register {
            email,
            full_name,
            user_name,
            password,
        } => {
            let auth = context.auth();
            let form = SignUpForm {
                email,
                full_name,
                user_name,
                password,
            };
            let user = auth
                .register(&form)
                .await
                .ok_or_else(|| failure(auth.state().error))?;
            println!("Welcome, {}", user.display_name());
        }
        Command::GoogleSignIn { credential } => {
            let auth = context.auth();
            let user = auth
                .google_sign_in(&credential)
                .await
                .ok_or_else(|| failure(auth.state().error))?;
            println!("Signed in as {}", user.display_name());
        }
        Command::Logout => {
            let auth = context.auth();
            if !auth.logout() {
                return Err(failure(auth.state().error));
            }
            println!("Signed out");
        }
        Command::Whoami => {
            let auth = context.auth();
            if auth.restore().is_none() {
                println!("Not signed in");
                return Ok(());
            }
            let user = auth
                .refresh_profile()
                .await
                .ok_or_else(|| failure(auth.state().error))?;
            println!("{} <{}> @{}", user.display_name(), user.email, user.user_name);
        }
        Command::Profile {
            full_name,
            user_name,
        } => {
            let auth = context.auth();
            let user = auth
                .update_profile(&ProfileForm {
                    full_name,
                    user_name,
                })
                .await
                .ok_or_else(|| failure(auth.state().error))?;
            println!("Profile saved: {} @{}", user.full_name, user.user_name);
        }
        Command::Feed {
            mine,
            author,
            pages,
        } => {
            let scope = if mine {
                let id = context
                    .session()
                    .user_id()
                    .context("--mine needs a signed-in user")?;
                FeedScope::Author(id)
            } else {
                author.map_or(FeedScope::All, FeedScope::Author)
            };
            feed(context, scope, pages).await?;
        }
        Command::Show { id } => {
            let feed = context.feed();
            let post = feed
                .fetch_post(&id)
                .await
                .ok_or_else(|| failure(feed.snapshot().error))?;
            let me = context.session().user_id();
            println!("{}", format_post(&post, me.as_deref()));
            if !post.content.is_empty() {
                println!("\n{}", post.content);
            }
        }
        Command::Like { id } => {
            let feed = context.feed();
            feed.fetch_post(&id)
                .await
                .ok_or_else(|| failure(feed.snapshot().error))?;
            if !feed.toggle_like(&id).await {
                return Err(failure(feed.snapshot().error));
            }
            if let Some(post) = feed.snapshot().selected {
                let me = context.session().user_id();
                println!("{}", format_post(&post, me.as_deref()));
            }
        }
        Command::Post {
            title,
            content,
            image,
        } => {
            let image = image.as_deref().map(read_image).transpose()?;
            let feed = context.feed();
            let post = feed
                .create_post(&NewPostForm {
                    title,
                    content,
                    image,
                })
                .await
                .ok_or_else(|| failure(feed.snapshot().error))?;
            println!("Published {}", post.id);
        }
        Command::Edit { id, title, content } => {
            let update = PostUpdate::text(title, content);
            if update.is_empty() {
                bail!("nothing to change: pass --title and/or --content");
            }
            let feed = context.feed();
            let post = feed
                .update_post(&id, &update)
                .await
                .ok_or_else(|| failure(feed.snapshot().error))?;
            println!("Updated {}", post.id);
        }
        Command::Image { id, path } => {
            let feed = context.feed();
            let post = match path {
                Some(path) => feed.set_image(&id, read_image(&path)?).await,
                None => feed.clear_image(&id).await,
            }
            .ok_or_else(|| failure(feed.snapshot().error))?;
            match post.image_url {
                Some(url) => println!("Image of {} is now {}", post.id, url),
                None => println!("Removed image from {}", post.id),
            }
        }
        Command::Delete { id } => {
            let feed = context.feed();
            if !feed.delete_post(&id).await {
                return Err(failure(feed.snapshot().error));
            }
            println!("Deleted {id}");
        }
        Command::Comments { post_id, pages } => {
            let thread = context.comments(&post_id);
            if !thread.load_first_page().await {
                return Err(failure(thread.snapshot().error));
            }
            for _ in 1..pages {
                if !thread.load_next_page().await {
                    break;
                }
            }
            let snapshot = thread.snapshot();
            if let Some(error) = snapshot.error {
                tracing::warn!("Stopped early: {}", error);
            }
            for comment in &snapshot.comments {
                println!("{}", format_comment(comment));
            }
            println!("({} of {} comments)", snapshot.comments.len(), snapshot.total);
        }
        Command::Comment { post_id, content } => {
            let thread = context.comments(&post_id);
            let comment = thread
                .add_comment(&content)
                .await
                .ok_or_else(|| failure(thread.snapshot().error))?;
            println!("Commented {}", comment.id);
        }
        Command::EditComment {
            post_id,
            id,
            content,
        } => {
            let thread = context.comments(&post_id);
            if !thread.load_first_page().await {
                return Err(failure(thread.snapshot().error));
            }
            while !thread.begin_edit(&id) {
                if !thread.load_next_page().await {
                    bail!("comment {id} not found on post {post_id}");
                }
            }
            if !thread.save_edit(&id, &content).await {
                return Err(failure(thread.snapshot().error));
            }
            println!("Updated comment {id}");
        }
        Command::DeleteComment { post_id, id } => {
            let thread = context.comments(&post_id);
            if !thread.delete_comment(&id).await {
                return Err(failure(thread.snapshot().error));
            }
            println!("Deleted comment {id}");
        }
        Command::Config => {
            print!("{}", context.config().to_toml()?);
        }
    }
    Ok(())
}

async fn feed(context: &AppContext, scope: FeedScope, pages: u32) -> Result<()> {
    let feed = context.feed();
    if !feed.set_scope(scope).await {
        return Err(failure(feed.snapshot().error));
    }
    for _ in 1..pages {
        if !feed.load_next_page().await {
            break;
        }
    }

    let snapshot = feed.snapshot();
    if let Some(error) = &snapshot.error {
        tracing::warn!("Stopped early: {}", error);
    }
    let me = context.session().user_id();
    for post in &snapshot.posts {
        println!("{}", format_post(post, me.as_deref()));
    }
    println!(
        "({} of {} posts{})",
        snapshot.posts.len(),
        snapshot.total,
        if snapshot.has_more { ", more available" } else { "" }
    );
    Ok(())
}

fn read_image(path: &Path) -> Result<ImageUpload> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let content_type = mime_guess::from_path(path).first_or_octet_stream();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(ImageUpload::new(file_name, content_type.essence_str(), bytes)?)
}

/// One-line summary: id, title, author and counters. A `*` marks posts the
/// viewer likes.
pub fn format_post(post: &Post, viewer: Option<&str>) -> String {
    let liked = viewer.is_some_and(|id| post.is_liked_by(id));
    let author = post.author_name.as_deref().unwrap_or(&post.author_id);
    format!(
        "[{}] {} by {} ({}{} likes, {} comments{})",
        post.id,
        post.title,
        author,
        if liked { "*" } else { "" },
        post.like_count(),
        post.comments_count,
        if post.image_url.is_some() { ", image" } else { "" }
    )
}

pub fn format_comment(comment: &Comment) -> String {
    let author = comment.author_name.as_deref().unwrap_or(&comment.author_id);
    format!("[{}] {}: {}", comment.id, author, comment.content)
}
