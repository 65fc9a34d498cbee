mod api;
mod app;
mod components;
mod config;
mod error;
mod events;
mod models;
mod storage;
mod theme_client;
mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*};
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use api::GeminiClient;
use app::{App, View};
use events::{AppEvent, Command};
use storage::AssetExporter;
use theme_client::ThemeRequestClient;

/// What the event loop needs to carry out commands.
struct Services {
    client: ThemeRequestClient,
    exporter: Arc<AssetExporter>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

fn init_logging() -> Result<()> {
    let log_path = config::get_log_path()?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    // stdout belongs to the terminal UI
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    // Everything that can fail at startup happens before the terminal is taken over
    let config = config::load_config()?;
    let api_key = config::resolve_api_key(std::env::var(config::API_KEY_ENV).ok(), &config)?;
    let provider = GeminiClient::from_config(&config, api_key)?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let services = Services {
        client: ThemeRequestClient::new(Arc::new(provider)),
        exporter: Arc::new(AssetExporter::from_config(config.export_dir.as_deref())),
        event_tx,
    };
    tracing::info!(
        text_model = %config.text_model,
        image_model = %config.image_model,
        export_dir = %services.exporter.export_dir().display(),
        "starting themeforge"
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let res = run_app(&mut terminal, &mut app, &services, &mut event_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("{err:?}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Runs a command off the UI loop; its outcome comes back as an [`AppEvent`].
fn dispatch(command: Command, services: &Services) {
    let tx = services.event_tx.clone();

    match command {
        Command::GenerateTheme { request, topic } => {
            let client = services.client.clone();
            tokio::spawn(async move {
                let result = client.request_theme_text(&topic).await;
                let _ = tx.send(AppEvent::ThemeGenerated { request, result });
            });
        }
        Command::FetchAsset {
            request,
            category,
            topic,
        } => {
            let client = services.client.clone();
            tokio::spawn(async move {
                let result = client.request_asset_image(&topic, category).await;
                let _ = tx.send(AppEvent::AssetGenerated {
                    request,
                    category,
                    result,
                });
            });
        }
        Command::ExportAsset {
            category,
            topic,
            data_uri,
        } => {
            let exporter = Arc::clone(&services.exporter);
            tokio::task::spawn_blocking(move || {
                let result = exporter
                    .export(category, &topic, &data_uri)
                    .map_err(|err| format!("{err:#}"));
                if let Err(err) = &result {
                    tracing::error!(%category, %err, "asset export failed");
                }
                let _ = tx.send(AppEvent::AssetExported(result));
            });
        }
    }
}

/// Esc closes the innermost thing first: help, notice, pending exit, then the results screen.
fn handle_escape(app: &mut App) {
    if app.show_help {
        app.show_help = false;
    } else if app.notice.is_some() {
        app.dismiss_notice();
    } else if app.exit_pending {
        app.exit_pending = false;
    } else if matches!(app.view, View::Results(_)) {
        app.back();
    }
}

fn handle_input_keys(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Vec<Command> {
    match key {
        KeyCode::Enter if modifiers.contains(KeyModifiers::ALT) => {
            if let Some(form) = app.form_mut() {
                form.newline();
            }
        }
        KeyCode::Enter => return app.submit().into_iter().collect(),
        KeyCode::Tab => {
            if let Some(form) = app.form_mut() {
                form.cycle_suggestion();
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.form_mut() {
                form.backspace();
            }
        }
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(form) = app.form_mut() {
                form.push_char(c);
            }
        }
        _ => {}
    }
    Vec::new()
}

fn handle_results_keys(app: &mut App, key: KeyCode) -> Vec<Command> {
    let command = match key {
        KeyCode::Char('r') => app.refetch_selected(),
        KeyCode::Char('d') => app.download_selected(),
        _ => {
            if let Some(view) = app.results_mut() {
                match key {
                    KeyCode::Right | KeyCode::Tab => view.select_next(),
                    KeyCode::Left | KeyCode::BackTab => view.select_prev(),
                    KeyCode::Up => view.scroll_up(1),
                    KeyCode::Down => view.scroll_down(1),
                    KeyCode::PageUp => view.scroll_up(10),
                    KeyCode::PageDown => view.scroll_down(10),
                    _ => {}
                }
            }
            None
        }
    };
    command.into_iter().collect()
}

fn handle_keyboard_input(app: &mut App, key: KeyCode, modifiers: KeyModifiers) -> Vec<Command> {
    match key {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            if app.exit_pending {
                app.quit();
            } else {
                app.exit_pending = true;
            }
            return Vec::new();
        }
        KeyCode::Esc => {
            handle_escape(app);
            return Vec::new();
        }
        _ if app.exit_pending => {
            // Any other key cancels pending exit
            app.exit_pending = false;
            return Vec::new();
        }
        KeyCode::Char('q') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
            return Vec::new();
        }
        KeyCode::Char('h') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.toggle_help();
            return Vec::new();
        }
        _ if app.show_help => return Vec::new(),
        _ => {}
    }

    match app.view {
        View::Input { .. } => handle_input_keys(app, key, modifiers),
        View::Results(_) => handle_results_keys(app, key),
    }
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    services: &Services,
    event_rx: &mut mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Drain finished requests before looking at the keyboard
        while let Ok(app_event) = event_rx.try_recv() {
            for command in app.handle_event(app_event) {
                dispatch(command, services);
            }
        }

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    for command in handle_keyboard_input(app, key.code, key.modifiers) {
                        dispatch(command, services);
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ContentPart, ImageResponse, InlineData, MockAiProvider};
    use crate::events::RequestIds;
    use crate::models::{sample_theme, AssetCategory};
    use tempfile::TempDir;

    fn services_with(
        provider: MockAiProvider,
        export_dir: &std::path::Path,
    ) -> (Services, mpsc::UnboundedReceiver<AppEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let services = Services {
            client: ThemeRequestClient::new(Arc::new(provider)),
            exporter: Arc::new(AssetExporter::new(export_dir.to_path_buf())),
            event_tx,
        };
        (services, event_rx)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_keyboard_input(app, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    fn results_app() -> App {
        let mut app = App::new();
        type_text(&mut app, "Beach Wedding");
        let commands = handle_keyboard_input(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        let Some(Command::GenerateTheme { request, .. }) = commands.into_iter().next() else {
            panic!("expected generate command");
        };
        app.handle_event(AppEvent::ThemeGenerated {
            request,
            result: Ok(sample_theme()),
        });
        app
    }

    #[test]
    fn test_typing_and_submit() {
        let mut app = App::new();
        type_text(&mut app, "Beach Wedding");
        let commands = handle_keyboard_input(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        assert!(matches!(
            commands.as_slice(),
            [Command::GenerateTheme { topic, .. }] if topic == "Beach Wedding"
        ));
        // Enter again while loading does nothing
        assert!(handle_keyboard_input(&mut app, KeyCode::Enter, KeyModifiers::NONE).is_empty());
    }

    #[test]
    fn test_alt_enter_inserts_newline() {
        let mut app = App::new();
        type_text(&mut app, "a");
        let commands = handle_keyboard_input(&mut app, KeyCode::Enter, KeyModifiers::ALT);
        assert!(commands.is_empty());
        assert_eq!(app.form_mut().unwrap().input, "a\n");
    }

    #[test]
    fn test_tab_fills_suggestion_without_submitting() {
        let mut app = App::new();
        let commands = handle_keyboard_input(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert!(commands.is_empty());
        assert!(!app.is_loading());
        assert_eq!(app.form_mut().unwrap().input, "Neon Party");
    }

    #[test]
    fn test_ctrl_c_twice_quits() {
        let mut app = App::new();
        handle_keyboard_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.exit_pending);
        assert!(!app.should_quit);
        handle_keyboard_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_escape_priority() {
        let mut app = results_app();
        app.notice = Some("oops".to_string());
        app.show_help = true;

        handle_keyboard_input(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(!app.show_help);
        assert!(matches!(app.view, View::Results(_)));

        handle_keyboard_input(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.notice.is_none());
        assert!(matches!(app.view, View::Results(_)));

        handle_keyboard_input(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(app.view, View::Input { .. }));
    }

    #[test]
    fn test_results_keys() {
        let mut app = results_app();
        handle_keyboard_input(&mut app, KeyCode::Right, KeyModifiers::NONE);
        assert_eq!(app.results_view().unwrap().selected(), 1);

        // Panels are still loading: nothing to regenerate or save yet
        assert!(handle_keyboard_input(&mut app, KeyCode::Char('r'), KeyModifiers::NONE).is_empty());
        assert!(handle_keyboard_input(&mut app, KeyCode::Char('d'), KeyModifiers::NONE).is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_fetch_asset_reports_back() {
        let temp_dir = TempDir::new().unwrap();
        let mut provider = MockAiProvider::new();
        provider.expect_generate_image().times(1).returning(|_, _| {
            Ok(ImageResponse {
                parts: vec![ContentPart {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: "image/png".to_string(),
                        data: "aGVsbG8=".to_string(),
                    }),
                }],
            })
        });
        let (services, mut event_rx) = services_with(provider, temp_dir.path());

        let mut ids = RequestIds::default();
        ids.next();
        let request = ids.next();
        dispatch(
            Command::FetchAsset {
                request,
                category: AssetCategory::Shirt,
                topic: "Beach Wedding".to_string(),
            },
            &services,
        );

        match event_rx.recv().await {
            Some(AppEvent::AssetGenerated {
                request: got,
                category,
                result,
            }) => {
                assert_eq!(got, request);
                assert_eq!(category, AssetCategory::Shirt);
                assert_eq!(result.unwrap(), "data:image/png;base64,aGVsbG8=");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dispatch_export_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let (services, mut event_rx) = services_with(MockAiProvider::new(), temp_dir.path());

        dispatch(
            Command::ExportAsset {
                category: AssetCategory::Flag,
                topic: "Beach Wedding".to_string(),
                data_uri: "data:image/png;base64,aGVsbG8=".to_string(),
            },
            &services,
        );

        match event_rx.recv().await {
            Some(AppEvent::AssetExported(Ok(path))) => {
                assert_eq!(path, temp_dir.path().join("Flag-Beach-Wedding.png"));
                assert_eq!(std::fs::read(path).unwrap(), b"hello");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
