// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! atelier-studio: terminal front end for the avatar editor.
//!
//! Reads commands from stdin, applies them to one avatar session and prints
//! replies plus toasts. Saves and thumbnail captures run on a worker thread
//! and are polled on a fixed interval.

mod app;
mod command;
mod worker;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use atelier_app_core::config::ConfigService;
use atelier_app_core::config_port::ConfigPort;
use atelier_app_core::prefs::StudioPrefs;
use atelier_config_fs::FsConfigStore;
use atelier_editor::avatar::Avatar;
use atelier_editor::{make_record_id, Editor, Session};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{Reply, Studio};
use crate::command::CommandError;
use crate::worker::{record_key, ChannelPersistence};

/// How long to wait for in-flight jobs on exit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(author, version, about = "Atelier avatar studio")]
struct Args {
    /// Directory holding prefs and saved avatars (defaults to the user config dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// Owner label; each owner has one avatar, reopened under the same id
    #[arg(long, default_value = "local")]
    owner: String,
    /// Milliseconds between background job polls
    #[arg(long, default_value_t = 100)]
    pump_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let store = match &args.config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    }
    .context("open config store")?;
    info!(dir = %store.base().display(), "config store ready");
    let config = ConfigService::new(store.clone());

    // Persist defaults once if absent
    let prefs = config.load_prefs().unwrap_or_else(|| {
        let prefs = StudioPrefs::default();
        config.save_prefs(&prefs);
        prefs
    });

    let id = make_record_id(&args.owner);
    let initial = match config.load::<Avatar>(&record_key(&id)) {
        Ok(Some(avatar)) => avatar,
        Ok(None) => Avatar::default(),
        Err(err) => {
            warn!(%err, "saved avatar unreadable; starting fresh");
            Avatar::default()
        }
    };

    let port = ChannelPersistence::<Avatar>::spawn(ConfigService::new(store));
    let mut studio = Studio::new(Session::new(Editor::open(id, initial), port, &prefs));

    let mut out = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(args.pump_ms.max(10)));
    write_line(
        &mut out,
        &format!("avatar {} ready; type `help`", id.short()),
    )
    .await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match command::parse(&line) {
                    Ok(cmd) => match studio.execute(cmd, Instant::now()) {
                        Ok(Reply::Text(text)) => write_line(&mut out, &text).await?,
                        Ok(Reply::Silent) => {}
                        Ok(Reply::Quit) => break,
                        Err(err) => write_line(&mut out, &format!("error: {err:#}")).await?,
                    },
                    Err(CommandError::Empty) => {}
                    Err(err) => write_line(&mut out, &format!("error: {err}")).await?,
                }
                for toast in studio.fresh_toasts(Instant::now()) {
                    write_line(&mut out, &toast).await?;
                }
            }
            _ = ticker.tick() => {
                for toast in studio.tick(Instant::now()) {
                    write_line(&mut out, &toast).await?;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let deadline = Instant::now() + SHUTDOWN_GRACE;
    while studio.session().pending_jobs() > 0 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(20)).await;
        for toast in studio.tick(Instant::now()) {
            write_line(&mut out, &toast).await?;
        }
    }
    if studio.session().pending_jobs() > 0 {
        warn!(
            pending = studio.session().pending_jobs(),
            "exiting with unfinished jobs"
        );
    }
    Ok(())
}

async fn write_line(out: &mut Stdout, text: &str) -> Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await?;
    Ok(())
}
