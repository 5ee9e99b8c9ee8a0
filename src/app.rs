// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état de l'interface TUI (pas les données de conversion)
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état de l'UI dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
//
// PATTERN : séparation UI / données
// - App : quel champ a le focus, quel écran est affiché, confirmation de quit
// - ConverterState (crate::converter) : devises, montant, ratio
// - Le rendu lit les deux, seul le Converter parle au réseau
// ============================================================================

use crate::models::CurrencyCode;

// ============================================================================
// Enums : Screen et Focus
// ============================================================================
// CONCEPT RUST : Enums pour state machines
// - Un seul écran actif à la fois
// - Le compilateur force à gérer tous les cas (exhaustivité)
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : formulaire de conversion
    Converter,

    /// Liste déroulante des devises pour le champ From ou To
    CurrencyPicker,
}

/// Champ actif du formulaire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    From,
    Amount,
    To,
}

impl Focus {
    /// Champ suivant (Tab) : From -> Amount -> To -> From
    pub fn next(self) -> Self {
        match self {
            Focus::From => Focus::Amount,
            Focus::Amount => Focus::To,
            Focus::To => Focus::From,
        }
    }

    /// Champ précédent (Shift-Tab)
    pub fn previous(self) -> Self {
        match self {
            Focus::From => Focus::To,
            Focus::Amount => Focus::From,
            Focus::To => Focus::Amount,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Focus::From => "From",
            Focus::Amount => "Amount",
            Focus::To => "To",
        }
    }
}

/// État de l'interface
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Champ qui reçoit les touches
    pub focus: Focus,

    /// Index surligné dans la liste des devises (écran CurrencyPicker)
    pub picker_index: usize,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// CONCEPT : Two-step quit pour éviter les sorties accidentelles
    /// - Première pression de 'q' : confirm_quit = true
    /// - Deuxième pression de 'q' : running = false (quit réel)
    /// - N'importe quelle autre touche : confirm_quit = false (annulation)
    pub confirm_quit: bool,
}

impl App {
    /// Crée l'état initial : formulaire, focus sur le montant
    pub fn new() -> Self {
        Self {
            running: true,
            current_screen: Screen::Converter,
            focus: Focus::Amount,
            picker_index: 0,
            confirm_quit: false,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Le champ montant a-t-il le focus (les touches y sont tapées) ?
    pub fn is_editing_amount(&self) -> bool {
        self.current_screen == Screen::Converter && self.focus == Focus::Amount
    }

    pub fn is_on_converter(&self) -> bool {
        self.current_screen == Screen::Converter
    }

    pub fn is_picking(&self) -> bool {
        self.current_screen == Screen::CurrencyPicker
    }

    // ========================================================================
    // Currency Picker
    // ========================================================================

    /// Ouvre la liste des devises, curseur sur la devise actuelle
    ///
    /// Ne fait rien si la liste est vide ou si le focus est sur le montant.
    /// CONCEPT RUST : Iterator::position
    /// - Retourne Some(index) du premier élément qui match
    pub fn open_picker(&mut self, currencies: &[CurrencyCode], current: &CurrencyCode) {
        if currencies.is_empty() || self.focus == Focus::Amount {
            return;
        }
        self.picker_index = currencies.iter().position(|c| c == current).unwrap_or(0);
        self.current_screen = Screen::CurrencyPicker;
    }

    /// Ferme la liste sans rien sélectionner
    pub fn close_picker(&mut self) {
        self.current_screen = Screen::Converter;
    }

    /// Remonte dans la liste
    ///
    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() : ne descend pas en dessous de 0
    pub fn picker_up(&mut self) {
        self.picker_index = self.picker_index.saturating_sub(1);
    }

    /// Descend dans la liste, sans dépasser le dernier élément
    pub fn picker_down(&mut self, len: usize) {
        let max_index = len.saturating_sub(1);
        self.picker_index = (self.picker_index + 1).min(max_index);
    }

    /// Valide la sélection : retourne la devise choisie et revient au formulaire
    pub fn submit_picker(&mut self, currencies: &[CurrencyCode]) -> Option<CurrencyCode> {
        self.current_screen = Screen::Converter;
        currencies.get(self.picker_index).cloned()
    }

    // ========================================================================
    // Quit Confirmation
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn currencies() -> Vec<CurrencyCode> {
        ["EUR", "JPY", "USD"].into_iter().map(CurrencyCode::from).collect()
    }

    #[test]
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert!(app.is_editing_amount());
        assert!(!app.is_awaiting_quit_confirmation());
    }

    #[test]
    fn test_focus_cycle() {
        let mut app = App::new();
        app.focus_next();
        assert_eq!(app.focus, Focus::To);
        app.focus_next();
        assert_eq!(app.focus, Focus::From);
        app.focus_previous();
        assert_eq!(app.focus, Focus::To);
    }

    #[test]
    fn test_picker_starts_on_current_currency() {
        let mut app = App::new();
        app.focus = Focus::To;
        app.open_picker(&currencies(), &CurrencyCode::from("USD"));

        assert!(app.is_picking());
        assert_eq!(app.picker_index, 2);
    }

    #[test]
    fn test_picker_not_opened_without_currencies() {
        let mut app = App::new();
        app.focus = Focus::From;
        app.open_picker(&[], &CurrencyCode::from("USD"));
        assert!(app.is_on_converter());
    }

    #[test]
    fn test_picker_navigation_and_submit() {
        let list = currencies();
        let mut app = App::new();
        app.focus = Focus::From;
        app.open_picker(&list, &CurrencyCode::from("EUR"));

        app.picker_up();
        assert_eq!(app.picker_index, 0);

        app.picker_down(list.len());
        app.picker_down(list.len());
        app.picker_down(list.len());
        assert_eq!(app.picker_index, 2);

        let picked = app.submit_picker(&list);
        assert_eq!(picked, Some(CurrencyCode::from("USD")));
        assert!(app.is_on_converter());
    }

    #[test]
    fn test_two_step_quit() {
        let mut app = App::new();
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }
}
