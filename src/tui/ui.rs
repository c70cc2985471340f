use anyhow::Result;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::app::{DemoApp, DemoHost};
use super::keys::KeyTranslator;
use super::overlay::TerminalIndicator;
use super::render::render_demo;
use crate::app::Config;
use crate::constants::UI_POLL_INTERVAL_MS;
use crate::directory::{Directory, InMemoryDirectory};
use crate::history::HistoryPersistence;
use crate::switcher::{Host, Propagation, Signal, Switcher};
use crate::utils::SwitchError;

/// Run the interactive demo until the user quits
pub fn run_demo(
    config: Config,
    directory: Arc<InMemoryDirectory>,
    persistence: Arc<dyn HistoryPersistence>,
) -> Result<()> {
    if !crossterm::tty::IsTty::is_tty(&io::stdout()) {
        return Err(SwitchError::Terminal(
            "the demo requires an interactive terminal".to_string(),
        )
        .into());
    }

    // Start on the first eligible conversation, like a client restoring its last view
    let initial = directory
        .list()
        .into_iter()
        .find(|c| directory.is_eligible(c))
        .map(|c| c.id);
    let host = Arc::new(DemoHost::new(initial));
    let indicator = Arc::new(TerminalIndicator::new());

    let mut switcher = Switcher::new(
        config,
        Host {
            directory: directory.clone(),
            active: host.clone(),
            navigator: host.clone(),
            renderer: indicator.clone(),
            persistence,
        },
    );
    switcher.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let reports_release = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
    if reports_release {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
            )
        )?;
    } else {
        warn!("Terminal cannot report key releases, using fallback gesture end");
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = DemoApp::new(directory, host, reports_release);
    let res = run_loop(&mut terminal, &mut app, &mut switcher, &indicator, reports_release);

    switcher.stop();

    // Restore terminal
    if reports_release {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut DemoApp,
    switcher: &mut Switcher,
    indicator: &TerminalIndicator,
    reports_release: bool,
) -> Result<()> {
    let mut translator = KeyTranslator::new(reports_release);

    while app.running {
        terminal.draw(|f| render_demo(f, app, switcher, indicator))?;

        if event::poll(Duration::from_millis(UI_POLL_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                handle_key(key, app, switcher, &mut translator);
            }
        }

        // Feed back switches the host announced, then run the heartbeat
        for signal in app.host.drain_signals() {
            switcher.handle(signal);
        }
        if switcher.expire_stale(Instant::now()) {
            app.set_status("Gesture timed out");
        }
        if !switcher.session().is_active() {
            translator.reset();
        }
    }

    Ok(())
}

fn handle_key(
    key: KeyEvent,
    app: &mut DemoApp,
    switcher: &mut Switcher,
    translator: &mut KeyTranslator,
) {
    let mut propagation = Propagation::Continue;
    for signal in translator.translate(&key) {
        debug!("Key {:?} -> {:?}", key.code, signal);
        let ended = signal == Signal::GestureEnd;
        if switcher.handle(signal).is_stop() {
            propagation = Propagation::Stop;
        }
        if ended {
            app.set_status("Switched");
        }
    }

    if propagation.is_stop() || key.kind == KeyEventKind::Release {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('x') => {
            switcher.clear_history();
            app.set_status("Recent conversations cleared");
        }
        _ => {}
    }
}
