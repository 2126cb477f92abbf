use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use playlist_toolbox::{
    cli,
    config::{self, Config},
    error,
    types::{CreatePlaylistRequest, PlaylistItemsQuery},
    utils,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API and print the authorization code
    Auth(AuthOptions),

    /// Read, create and fill playlists
    Playlist(PlaylistOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct AuthOptions {
    /// Space separated scopes to request (defaults to SPOTIFY_AUTH_SCOPE)
    #[clap(long)]
    scope: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    #[command(subcommand)]
    command: PlaylistSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistSubcommand {
    /// Show a playlist as JSON
    Show {
        playlist_id: String,
        #[clap(long)]
        market: Option<String>,
        /// Field filter, e.g. "name,owner(display_name)"
        #[clap(long)]
        fields: Option<String>,
    },

    /// List the items of a playlist
    Items {
        playlist_id: String,
        #[clap(long)]
        market: Option<String>,
        #[clap(long)]
        fields: Option<String>,
        #[clap(long)]
        limit: Option<u32>,
        #[clap(long)]
        offset: Option<u32>,
        /// Print the raw response instead of a table
        #[clap(long)]
        json: bool,
    },

    /// Create a playlist for a user
    Create {
        user_id: String,
        name: String,
        #[clap(long)]
        description: Option<String>,
        /// Create a private playlist
        #[clap(long)]
        private: bool,
        /// Create a collaborative playlist (requires --private)
        #[clap(long)]
        collaborative: bool,
    },

    /// Add items to a playlist
    Add {
        playlist_id: String,
        /// Comma separated track or episode URIs
        #[clap(long)]
        uris: String,
        /// Zero-based insert position (appends when omitted)
        #[clap(long)]
        position: Option<u32>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    config::load_env();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    match cli.command {
        Command::Auth(opt) => cli::auth(&config, opt.scope).await,
        Command::Playlist(opt) => match opt.command {
            PlaylistSubcommand::Show {
                playlist_id,
                market,
                fields,
            } => cli::show_playlist(&config, playlist_id, market, fields).await,
            PlaylistSubcommand::Items {
                playlist_id,
                market,
                fields,
                limit,
                offset,
                json,
            } => {
                let query = PlaylistItemsQuery {
                    market,
                    fields,
                    limit,
                    offset,
                };
                cli::list_playlist_items(&config, playlist_id, query, json).await
            }
            PlaylistSubcommand::Create {
                user_id,
                name,
                description,
                private,
                collaborative,
            } => {
                let request = CreatePlaylistRequest {
                    description,
                    public: !private,
                    collaborative,
                    ..CreatePlaylistRequest::new(name)
                };
                cli::create_playlist(&config, user_id, request).await
            }
            PlaylistSubcommand::Add {
                playlist_id,
                uris,
                position,
            } => cli::add_playlist_items(&config, playlist_id, utils::parse_uris(&uris), position).await,
        },
        Command::Completions(_) => {}
    }
}
