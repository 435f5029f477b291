mod api;
mod app;
mod config;
mod input;
mod library;
mod player;
mod storage;
mod tui;
mod view;

use anyhow::Context;
use api::client::HarmonyClient;
use api::models::Song;
use clap::{Parser, Subcommand};
use storage::Storage;

#[derive(Debug, Parser)]
#[command(name = "harmony", version, about = "Terminal client for a Harmony music server")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Override the server base URL from the config.
    #[arg(long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive TUI (default).
    Tui,
    /// Print the song catalog to stdout (headless).
    Songs,
    /// Search the remote catalog and print results (headless).
    Search { query: String },
    /// Sign in and store the session token.
    Login { username: String },
    /// Create an account.
    Register { username: String },
    /// Drop the stored session.
    Logout,
    /// Show who the stored session belongs to.
    Whoami,
    /// Upload audio files.
    Upload { files: Vec<std::path::PathBuf> },
    /// Delete an owned upload by id.
    Delete { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref()).context("load config")?;
    if let Some(server) = cli.server {
        cfg.server.base_url = server;
    }
    let cfg_path = match cli.config.clone() {
        Some(p) => p,
        None => config::default_config_path().context("default config path")?,
    };

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            let mut terminal = tui::TerminalGuard::enter(cfg.input.mouse).context("init terminal")?;
            let mut app = app::App::new(cfg, cfg_path)?;
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Songs => {
            let client = make_client(&cfg)?;
            let songs = client.songs().await?;
            print_songs(&songs);
        }
        Command::Search { query } => {
            let client = make_client(&cfg)?;
            let songs = client.search(&query).await?;
            print_songs(&songs);
        }
        Command::Login { username } => {
            let password = read_password()?;
            let client = HarmonyClient::new(&cfg.server.base_url, None)?;
            let (username, token) = client.login(&username, &password).await?;
            let storage = open_storage(&cfg)?;
            storage.save_session(&token, &username, unix_now())?;
            println!("Signed in as {username}.");
        }
        Command::Register { username } => {
            let password = read_password()?;
            let client = HarmonyClient::new(&cfg.server.base_url, None)?;
            client.register(&username, &password).await?;
            println!("Registered {username}. Run `harmony login {username}` to sign in.");
        }
        Command::Logout => {
            let client = make_client(&cfg)?;
            if let Err(e) = client.logout().await {
                tracing::debug!("logout request failed: {e:#}");
            }
            open_storage(&cfg)?.clear_session()?;
            println!("Signed out.");
        }
        Command::Whoami => {
            let client = make_client(&cfg)?;
            match client.me().await? {
                Some(user) => println!("{} (id {})", user.username, user.user_id),
                None => println!("Not signed in."),
            }
        }
        Command::Upload { files } => {
            anyhow::ensure!(!files.is_empty(), "no files given");
            let client = make_client(&cfg)?;
            let mut failures = 0usize;
            for path in files {
                match client.upload(&path).await {
                    Ok(song) => println!("uploaded {} as {}", path.display(), song.id),
                    Err(e) => {
                        failures += 1;
                        eprintln!("failed {}: {e:#}", path.display());
                    }
                }
            }
            anyhow::ensure!(failures == 0, "{failures} upload(s) failed");
        }
        Command::Delete { id } => {
            let client = make_client(&cfg)?;
            client.delete(&id).await?;
            println!("deleted {id}");
        }
    }

    Ok(())
}

fn open_storage(cfg: &config::Config) -> anyhow::Result<Storage> {
    Storage::open(&cfg.paths.data_dir.join("client.sqlite3"))
}

/// Client carrying the stored session token, when there is one.
fn make_client(cfg: &config::Config) -> anyhow::Result<HarmonyClient> {
    let session = open_storage(cfg)?.load_session()?;
    HarmonyClient::new(
        &cfg.server.base_url,
        session.as_ref().map(|(token, _)| token.as_str()),
    )
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn unix_now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

fn print_songs(songs: &[Song]) {
    for (i, s) in songs.iter().enumerate() {
        let liked = if s.is_liked { " ♥" } else { "" };
        let duration = s
            .duration
            .map(|d| format!("  {}:{:02}", d / 60, d % 60))
            .unwrap_or_default();
        println!(
            "{:02}. {} — {}  [{}]{}{}  (id={})",
            i + 1,
            s.title,
            s.artist,
            s.album_or_origin(),
            duration,
            liked,
            s.id
        );
    }
}
