// ============================================================================
// Erreurs du client de taux
// ============================================================================
// CONCEPT RUST : thiserror
// - #[derive(Error)] génère l'implémentation de std::error::Error
// - #[error("...")] définit le message Display de chaque variant
// - #[source] chaîne l'erreur sous-jacente (reqwest) pour les logs
//
// Ces erreurs ne sortent jamais de RateProvider : elles sont loggées puis
// converties en None. Garder les trois variants permet de savoir dans les
// logs si c'est le réseau, le serveur ou le JSON qui a échoué.
// ============================================================================

use reqwest::StatusCode;
use thiserror::Error;

/// Échec d'une requête vers l'API de taux
#[derive(Debug, Error)]
pub enum RateError {
    /// Connexion impossible, timeout, lecture du body interrompue
    #[error("Erreur réseau : {0}")]
    Network(#[source] reqwest::Error),

    /// Statut HTTP hors 2xx
    #[error("L'API a retourné une erreur : HTTP {status}")]
    Http { status: StatusCode },

    /// JSON invalide ou champ attendu manquant
    #[error("Réponse invalide : {0}")]
    Parse(String),
}

impl RateError {
    /// Nom court du variant, utilisé comme champ structuré dans les logs
    pub fn kind(&self) -> &'static str {
        match self {
            RateError::Network(_) => "network",
            RateError::Http { .. } => "http",
            RateError::Parse(_) => "parse",
        }
    }
}

impl From<serde_json::Error> for RateError {
    fn from(err: serde_json::Error) -> Self {
        RateError::Parse(err.to_string())
    }
}
