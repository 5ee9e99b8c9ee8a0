// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client de l'API de taux de change et le trait
// RateProvider qui permet au convertisseur de ne pas dépendre du HTTP.
//
// CONCEPT RUST : Trait object + injection
// - Le convertisseur reçoit un Arc<dyn RateProvider>
// - En production : OpenErClient (HTTP)
// - En test : un faux provider en mémoire
// ============================================================================

pub mod error;   // Taxonomie d'erreurs (Network / Http / Parse)
pub mod open_er; // Client HTTP open.er-api.com

use async_trait::async_trait;

use crate::models::CurrencyCode;

// Re-export des éléments principaux
pub use error::RateError;
pub use open_er::OpenErClient;

/// Source de taux de change
///
/// Les deux méthodes ne remontent jamais d'erreur : tout échec (réseau,
/// HTTP, JSON) est loggé par l'implémentation puis rendu comme `None`.
///
/// CONCEPT RUST : #[async_trait]
/// - Les méthodes async dans un trait utilisé en `dyn` ont besoin de Box<Future>
/// - La macro fait cette transformation pour nous
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Liste des devises disponibles (ordre non garanti)
    async fn fetch_currency_list(&self) -> Option<Vec<CurrencyCode>>;

    /// Combien de `to` pour 1 `from`
    async fn fetch_ratio(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<f64>;
}
