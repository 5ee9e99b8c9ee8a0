// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod currency;      // Code devise + symboles
pub mod rate_snapshot; // Réponse "latest rates" de l'API
pub mod conversion;    // Montant texte × ratio

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lazyfx::models::currency::CurrencyCode;
// On peut faire : use lazyfx::models::CurrencyCode;
pub use conversion::{convert_amount, parse_amount};
pub use currency::CurrencyCode;
pub use rate_snapshot::RateSnapshot;
