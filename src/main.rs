// ============================================================================
// LazyFx - Convertisseur de devises dans le terminal
// ============================================================================
// Programme TUI : choix d'une devise source et cible, saisie d'un montant,
// affichage du résultat avec le dernier taux de open.er-api.com
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Async dans sync : runtime tokio dédié pour les appels API
// 4. watch channel : l'UI lit l'état publié par le Converter
// ============================================================================

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use lazyfx::api::OpenErClient;
use lazyfx::app::{App, Focus};
use lazyfx::config::Config;
use lazyfx::converter::{Converter, ConverterState};
use lazyfx::ui::{events::EventHandler, render, Event};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Filtre : RUST_LOG si défini, sinon `log_filter` de la config
/// (par défaut "lazyfx=debug,info").
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/lazyfx/logs/lazyfx.log.*
///
/// # Contrôler le niveau de log
/// RUST_LOG=lazyfx=trace cargo run
/// ```
fn init_logging(config: &Config) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = config.log_dir();

    // Crée le répertoire s'il n'existe pas
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazyfx.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true) // Inclut le module (ex: lazyfx::api::open_er)
                .with_thread_ids(true) // Les requêtes tournent sur les threads tokio
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // La config passe avant le logging : elle dit où écrire les logs
    let (config, config_path) = Config::load()?;

    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(config_path = ?config_path, api = %config.api_base_url, "LazyFx starting up");

    // CONCEPT RUST : Runtime tokio possédé par main()
    // - main() reste synchrone (boucle TUI)
    // - Le Converter lance ses requêtes sur ce runtime via un Handle
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;

    let client = OpenErClient::from_config(&config)?;
    let initial = ConverterState::new(config.default_from.clone(), config.default_to.clone());
    let converter = Converter::with_state(Arc::new(client), runtime.handle().clone(), initial);

    // Premier chargement de la liste des devises, en arrière-plan
    converter.initialize();

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let mut app = App::new();
    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &converter, &events);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    // Les requêtes encore en vol sont abandonnées
    runtime.shutdown_background();

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   1. Lire l'état publié par le Converter
//   2. Dessiner l'interface
//   3. Traiter l'événement (clavier ou tick)
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    converter: &Converter,
    events: &EventHandler,
) -> Result<()> {
    let mut state_rx: watch::Receiver<ConverterState> = converter.subscribe();

    while app.is_running() {
        // CONCEPT : clone de l'état
        // - borrow_and_update() tient un verrou de lecture
        // - On clone pour le relâcher avant de dessiner
        let state = state_rx.borrow_and_update().clone();

        terminal.draw(|frame| render(frame, app, &state))?;

        match events.next() {
            Ok(event) => handle_event(app, converter, &state, event),
            Err(e) => warn!(error = %e, "Failed to read terminal event"),
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement : met à jour l'UI et appelle le Converter
///
/// Les JoinHandle des requêtes ne sont pas attendus : la boucle continue
/// et le nouvel état apparaît au prochain dessin.
fn handle_event(app: &mut App, converter: &Converter, state: &ConverterState, event: Event) {
    use lazyfx::ui::events::{
        get_char_from_event, is_amount_char_event, is_back_tab_event, is_backspace_event,
        is_down_event, is_enter_event, is_escape_event, is_interrupt_event, is_quit_event,
        is_switch_event, is_tab_event, is_up_event,
    };

    match event {
        // Ctrl-C : sortie immédiate, quel que soit l'écran
        Event::Key(_) if is_interrupt_event(&event) => {
            info!("User interrupted");
            app.quit();
        }

        // ========================================
        // Currency Picker
        // ========================================
        Event::Key(_) if app.is_picking() && is_escape_event(&event) => {
            debug!("User closed currency picker");
            app.close_picker();
        }
        Event::Key(_) if app.is_picking() && is_up_event(&event) => app.picker_up(),
        Event::Key(_) if app.is_picking() && is_down_event(&event) => {
            app.picker_down(state.currencies.len());
        }
        Event::Key(_) if app.is_picking() && is_enter_event(&event) => {
            if let Some(code) = app.submit_picker(&state.currencies) {
                info!(field = app.focus.label(), %code, "User picked currency");
                match app.focus {
                    Focus::From => {
                        converter.set_from_currency(code);
                    }
                    Focus::To => {
                        converter.set_to_currency(code);
                    }
                    Focus::Amount => {}
                }
            }
        }
        Event::Key(_) if app.is_picking() => {}

        // ========================================
        // Formulaire (écran principal)
        // ========================================
        Event::Key(_) if app.is_on_converter() && is_tab_event(&event) => {
            app.cancel_quit();
            app.focus_next();
        }
        Event::Key(_) if app.is_on_converter() && is_back_tab_event(&event) => {
            app.cancel_quit();
            app.focus_previous();
        }

        // Saisie du montant : le texte est stocké tel quel
        Event::Key(_) if app.is_editing_amount() && is_backspace_event(&event) => {
            let mut amount = state.amount_text.clone();
            amount.pop();
            converter.set_amount(amount);
        }
        Event::Key(_) if app.is_editing_amount() && is_amount_char_event(&event) => {
            if let Some(c) = get_char_from_event(&event) {
                let mut amount = state.amount_text.clone();
                amount.push(c);
                converter.set_amount(amount);
            }
        }

        // 'q' : quit two-step (hors saisie du montant)
        Event::Key(_) if is_quit_event(&event) && !app.is_editing_amount() => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // 's' : inverser les devises
        Event::Key(_) if app.is_on_converter() && is_switch_event(&event) && !app.is_editing_amount() => {
            app.cancel_quit();
            info!(from = %state.from_currency, to = %state.to_currency, "User switched currencies");
            converter.switch_currencies();
        }

        // Enter sur From / To : ouvre la liste
        Event::Key(_) if app.is_on_converter() && is_enter_event(&event) && !app.is_editing_amount() => {
            app.cancel_quit();
            let current = match app.focus {
                Focus::From => &state.from_currency,
                _ => &state.to_currency,
            };
            app.open_picker(&state.currencies, current);
            if !app.is_picking() {
                debug!("Currency list empty, picker not opened");
            }
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation si active
            app.cancel_quit();
        }

        Event::Tick => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    terminal.show_cursor()?;

    Ok(())
}
