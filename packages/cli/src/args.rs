use std::path::PathBuf;

pub use clap::Parser;
use clap::Subcommand;

#[derive(Parser, Debug)]
#[command(name = "postwall", version, about = "Terminal client for a Postwall server", long_about = None)]
pub struct Cli {
    /// Settings file; defaults to ./postwall.toml when present
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep a separate session per profile name
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        user_name: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in with an identity-provider credential
    GoogleSignIn {
        #[arg(long)]
        credential: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Change full name and username
    Profile {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        user_name: String,
    },
    /// List posts
    Feed {
        /// Only posts by the signed-in user
        #[arg(long, conflicts_with = "author")]
        mine: bool,
        /// Only posts by this user id
        #[arg(long)]
        author: Option<String>,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show one post
    Show { id: String },
    /// Like or unlike a post
    Like { id: String },
    /// Publish a post
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        /// JPEG, PNG, GIF or WebP file to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Edit a post's title and/or content
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Replace or remove a post's image
    Image {
        id: String,
        /// New image; omit to remove the current one
        path: Option<PathBuf>,
    },
    /// Delete a post
    Delete { id: String },
    /// List a post's comments
    Comments {
        post_id: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Comment on a post
    Comment { post_id: String, content: String },
    /// Change a comment's text
    EditComment {
        post_id: String,
        id: String,
        content: String,
    },
    /// Delete a comment
    DeleteComment { post_id: String, id: String },
    /// Print the effective settings as TOML
    Config,
}
