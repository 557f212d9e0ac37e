//! livescroll-news — live-scrolling news headlines and search for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌─────────────┐ watch / mpsc ┌──────────┐  PollMsg   ┌──────────┐  draw()  ┌──────────┐
//! │ NewsSession │ ───────────► │ poll.rs  │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │  (runtime)  │              │ (tasks)  │  (channel) │ (state)  │          │ (render) │
//! └─────────────┘              └──────────┘            └──────────┘          └──────────┘
//!        ▲                                               │     ▲
//!        └──────────────── Command ──────────────────────┘     │ handle_key_event()
//!                                                         ┌──────────┐
//!                                                         │ input.rs │
//!                                                         └──────────┘
//! ```
//!
//! * **`poll`** — forwards session states and list updates to the UI thread.
//! * **`app`** — owns all UI state (tabs, lists, scroll position, query).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`main`** — wires everything together: load config, start logging and
//!   the runtime, set up the terminal, and run the event loop.
//!
//! Fetching, paging and diffing live in the `livescroll_news` library.

mod app;
mod input;
mod poll;
mod ui;

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use livescroll_news::config::Config;
use livescroll_news::connectivity::{ConnectivityGate, SysfsMonitor};
use livescroll_news::favorites::InMemoryFavorites;
use livescroll_news::source::NewsApiClient;
use livescroll_news::{logging, NewsSession};

use app::{App, Command};

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

/// Hand queued user commands to the session.
fn run_commands(session: &NewsSession, commands: Vec<Command>) {
    for command in commands {
        match command {
            Command::Request(channel, args) => {
                tracing::debug!(?channel, %args, "request");
                session.spawn_request(channel, &args);
            }
            Command::Favourite(article) => {
                session.add_to_favourites(article);
            }
            Command::Unfavourite(article) => {
                session.delete_favourite(article);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    install_panic_hook();

    // -- configuration and logging -------------------------------------------
    let config = Config::load().context("failed to load config")?;
    logging::init(Path::new(&config.log_path)).context("failed to open log file")?;
    tracing::info!(base_url = %config.base_url, country = %config.country, "starting");

    // -- runtime -------------------------------------------------------------
    // The UI loop stays on this thread; entering the runtime lets it spawn.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    let _enter = runtime.enter();

    // -- session -------------------------------------------------------------
    let client = NewsApiClient::new(&config).context("failed to build HTTP client")?;
    let session = NewsSession::new(
        Arc::new(client),
        ConnectivityGate::new(Arc::new(SysfsMonitor::new())),
        Arc::new(InMemoryFavorites::new()),
    );

    let (mut app, lists) = App::new(&config.country, config.page_size, session.cancel_token());
    // Subscribe before the first request so its result is not missed.
    let rx = poll::spawn(&session, lists);
    session.load_headlines(&config.country);

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Drain any messages from the poller.
    //   2. Send queued commands to the session.
    //   3. Render the UI.
    //   4. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(msg) = rx.try_recv() {
            app.handle(msg);
        }

        run_commands(&session, app.take_commands());

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    session.shutdown();
    tracing::info!("exiting");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
