use mrdj::adapters::ReqwestHttpClient;
use mrdj::app::{ChatApp, UiUpdate};
use mrdj::cli::{parse_args, version_string, ChatOptions, CliCommand, USAGE};
use mrdj::cli_output::{format_message, format_playlist, Palette};
use mrdj::config::ClientConfig;
use mrdj::markdown::BlockCache;
use mrdj::models::{ChatMessage, MessageId, MessageKind};
use mrdj::storage::{self, ThemePreference};

use color_eyre::{eyre::WrapErr, Result};
use std::collections::HashMap;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let options = match parse_args(std::env::args())? {
        CliCommand::Version => {
            println!("{}", version_string());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Chat(options) => options,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("mrdj=info".parse()?),
        )
        .init();

    run_chat(options).await
}

async fn run_chat(options: ChatOptions) -> Result<()> {
    let theme = resolve_theme(options.theme);
    let mut config = ClientConfig::from_env().wrap_err("Invalid configuration")?;
    if options.ultrathink {
        config = config.with_ultrathink(true);
    }
    info!(
        "Mr. DJ client starting (api: {}, ultrathink: {})",
        config.api_url, config.ultrathink
    );

    let (tx, rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(print_updates(rx, Palette::for_theme(theme)));
    let mut app = ChatApp::new(ReqwestHttpClient::new(), config).with_update_sender(tx);

    match app.client().health_check(app.session()).await {
        Ok(true) => {}
        Ok(false) => warn!("Backend health check did not pass"),
        Err(e) => warn!("Backend unreachable: {}", e),
    }
    if app.session().access_token().is_some() {
        match app.client().fetch_user(app.session()).await {
            Ok(user) => info!("Signed in as {}", user.label()),
            Err(e) => warn!("Could not load the signed-in user: {}", e),
        }
    }

    match options.message {
        Some(message) => {
            app.send_message(&message).await?;
        }
        None => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                match line.trim() {
                    "" => continue,
                    "/quit" | "/exit" => break,
                    "/reset" => app.reset_conversation()?,
                    text => {
                        if let Err(e) = app.send_message(text).await {
                            eprintln!("{} {}.", e.user_message(), e.recovery_hint());
                        }
                    }
                }
            }
        }
    }

    app.wait_for_playlist_refresh().await;
    // Dropping the app closes the update channel and lets the printer finish
    drop(app);
    printer.await.wrap_err("Output task failed")?;
    Ok(())
}

/// Use and remember an explicit theme, otherwise the stored one.
fn resolve_theme(requested: Option<ThemePreference>) -> ThemePreference {
    match requested {
        Some(theme) => {
            if let Err(e) = storage::save_theme(theme) {
                warn!("Could not save theme preference: {}", e);
            }
            theme
        }
        None => storage::load_theme().unwrap_or_else(|e| {
            warn!("Could not load theme preference: {}", e);
            ThemePreference::default()
        }),
    }
}

/// Print conversation updates as they arrive.
///
/// Tool panels are printed once and afterwards only their changed activity
/// lines, so the transcript reads top to bottom.
async fn print_updates(mut rx: mpsc::UnboundedReceiver<UiUpdate>, palette: Palette) {
    let mut cache = BlockCache::new();
    let mut seen: HashMap<MessageId, ChatMessage> = HashMap::new();

    while let Some(update) = rx.recv().await {
        match update {
            UiUpdate::MessageAdded(message) => {
                println!("{}", format_message(&message, &mut cache, &palette));
                seen.insert(message.id, message);
            }
            UiUpdate::MessageUpdated(message) => {
                let previous = seen.get(&message.id);
                match (&message.kind, previous.map(|p| &p.kind)) {
                    (MessageKind::ToolPanel(panel), Some(MessageKind::ToolPanel(old))) => {
                        for (i, activity) in panel.activities().iter().enumerate() {
                            if old.activities().get(i) != Some(activity) {
                                println!("      {} ({:?})", activity.label, activity.status);
                            }
                        }
                    }
                    _ => println!("{}", format_message(&message, &mut cache, &palette)),
                }
                seen.insert(message.id, message);
            }
            UiUpdate::PlaylistUpdated(playlist) => println!("{}", format_playlist(&playlist)),
            UiUpdate::ConversationCleared => {
                seen.clear();
                println!("-- new conversation --");
            }
            UiUpdate::LoadingChanged(false) => println!(),
            UiUpdate::LoadingChanged(true) => {}
        }
    }
}
