// ============================================================================
// Converter View - Rendu de l'écran de conversion
// ============================================================================
// Dessine le formulaire (From / Amount / To), le résultat, le ratio et
// l'heure de mise à jour. En mode CurrencyPicker, la zone centrale affiche
// la liste des devises à la place du formulaire.
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. List + ListState : liste scrollable avec sélection
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, Focus, Screen};
use crate::converter::ConverterState;

/// Dessine l'interface complète
///
/// # Arguments
/// * `frame` - Surface de dessin ratatui
/// * `app` - État de l'UI (focus, écran)
/// * `state` - Données du convertisseur
pub fn render(frame: &mut Frame, app: &App, state: &ConverterState) {
    let chunks = create_layout(frame.size());

    render_header(frame, state, chunks[0]);

    match app.current_screen {
        Screen::Converter => render_form(frame, app, state, chunks[1]),
        Screen::CurrencyPicker => render_picker(frame, app, state, chunks[1]),
    }

    render_footer(frame, app, chunks[2]);
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(3), // Footer : 3 lignes
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header
// ============================================================================

/// Titre + indicateur de chargement
fn render_header(frame: &mut Frame, state: &ConverterState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" LazyFx ")
        .title_alignment(Alignment::Center);

    let status = if state.is_loading() {
        Span::styled("⏳ Chargement des taux...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            "Currency Converter",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    };

    let paragraph = Paragraph::new(Line::from(status))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Formulaire
// ============================================================================

/// Style d'un champ selon qu'il a le focus ou non
fn field_style(app: &App, field: Focus) -> Style {
    if app.focus == field {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().fg(Color::White)
    }
}

/// Dessine le formulaire de conversion et le résultat
fn render_form(frame: &mut Frame, app: &App, state: &ConverterState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 💱 Conversion ");

    let label = Style::default().fg(Color::Cyan);

    // Curseur seulement quand on édite le montant
    let cursor = if app.is_editing_amount() { "█" } else { "" };

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("From:    ", label),
            Span::styled(format!(" {} ▾ ", state.from_currency), field_style(app, Focus::From)),
        ]),
        Line::from(vec![
            Span::styled("Amount:  ", label),
            Span::styled(format!(" {}{} ", state.amount_text, cursor), field_style(app, Focus::Amount)),
        ]),
        Line::from(Span::styled("         ⇅ [s] Switch", Style::default().fg(Color::DarkGray))),
        Line::from(vec![
            Span::styled("To:      ", label),
            Span::styled(format!(" {} ▾ ", state.to_currency), field_style(app, Focus::To)),
        ]),
        Line::from(""),
        // Deux chiffres après la virgule
        Line::from(Span::styled(
            format!("Result: {}{:.2}", state.to_currency.symbol(), state.result()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "1 {} = {:.2} {}",
            state.from_currency, state.ratio, state.to_currency
        )),
        Line::from(Span::styled(last_updated_label(state), Style::default().fg(Color::Gray))),
    ];

    // Liste vide : on prévient l'utilisateur plutôt qu'afficher un picker vide
    if !state.has_currencies() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "No currencies available",
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

/// Texte "Last Updated" (yyyy-MM-dd HH:mm)
fn last_updated_label(state: &ConverterState) -> String {
    match state.last_updated {
        Some(at) => format!("Last Updated: {}", at.format("%Y-%m-%d %H:%M")),
        None => "Last Updated: -".to_string(),
    }
}

// ============================================================================
// Currency Picker
// ============================================================================

/// Dessine la liste des devises pour le champ en cours
///
/// CONCEPT RATATUI : render_stateful_widget
/// - ListState garde l'index sélectionné ET l'offset de scroll
/// - Ratatui fait défiler la liste pour garder la sélection visible
fn render_picker(frame: &mut Frame, app: &App, state: &ConverterState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(" {} currency ", app.focus.label()));

    let items: Vec<ListItem> = state
        .currencies
        .iter()
        .map(|code| ListItem::new(format!(" {:<5} {}", code, code.symbol().trim_end())))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::REVERSED),
        )
        .highlight_symbol("> ");

    let mut list_state = ListState::default().with_selected(Some(app.picker_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

// ============================================================================
// Footer : Instructions
// ============================================================================

/// Dessine le footer avec les raccourcis clavier
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled("⚠  Appuyez sur ", key),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(" à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠", key),
        ])
    } else if app.is_picking() {
        Line::from(vec![
            Span::styled("[↑↓ / j k]", key),
            Span::raw(" Navigate  "),
            Span::styled("[Enter]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Select  "),
            Span::styled("[ESC]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" Cancel"),
        ])
    } else if app.is_editing_amount() {
        Line::from(vec![
            Span::styled("[Tab]", key),
            Span::raw(" Next field  "),
            Span::styled("[Backspace]", key),
            Span::raw(" Delete  "),
            Span::styled("[Ctrl-C]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit"),
        ])
    } else {
        Line::from(vec![
            Span::styled("[q]", key),
            Span::raw(" Quit  "),
            Span::styled("[Tab]", key),
            Span::raw(" Next field  "),
            Span::styled("[Enter]", key),
            Span::raw(" Pick currency  "),
            Span::styled("[s]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Switch"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::models::CurrencyCode;

    /// Dessine dans un terminal virtuel et retourne le texte affiché
    fn draw(app: &App, state: &ConverterState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        terminal.draw(|frame| render(frame, app, state)).unwrap();

        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_empty_list_shows_notice() {
        let text = draw(&App::new(), &ConverterState::default());
        assert!(text.contains("No currencies available"));
        assert!(text.contains("1 USD = 1.00 EUR"));
    }

    #[test]
    fn test_result_line() {
        let mut state = ConverterState::default();
        state.currencies = vec![CurrencyCode::from("EUR"), CurrencyCode::from("USD")];
        state.amount_text = "10".to_string();
        state.ratio = 2.0;

        let text = draw(&App::new(), &state);
        assert!(text.contains("Result: €20.00"));
        assert!(text.contains("1 USD = 2.00 EUR"));
        assert!(!text.contains("No currencies available"));
    }

    #[test]
    fn test_picker_lists_currencies() {
        let mut state = ConverterState::default();
        state.currencies = vec![CurrencyCode::from("EUR"), CurrencyCode::from("JPY"), CurrencyCode::from("USD")];

        let mut app = App::new();
        app.focus = Focus::To;
        app.open_picker(&state.currencies, &state.to_currency);

        let text = draw(&app, &state);
        assert!(text.contains("JPY"));
        assert!(text.contains("To currency"));
    }
}
