// ============================================================================
// LazyFx - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Client de l'API de taux de change
pub mod app;       // État de l'interface
pub mod config;    // Fichier de configuration
pub mod converter; // État du convertisseur + rafraîchissements
pub mod models;    // Structures de données
pub mod ui;        // Interface utilisateur
