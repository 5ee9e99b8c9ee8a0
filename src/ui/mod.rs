// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;         // Gestion des événements clavier
pub mod converter_view; // Rendu de l'écran de conversion

// Re-exports pour simplifier les imports
pub use converter_view::render;
pub use events::{Event, EventHandler};
