// ============================================================================
// API Client : open.er-api.com
// ============================================================================
// Récupère les taux de change "latest" depuis https://open.er-api.com/v6
//
// Une seule route est utilisée : GET /latest/{BASE}
// Réponse : { "result": "success", "rates": { "EUR": 0.92, ... }, ... }
//
// Les deux opérations (liste des devises, ratio d'une paire) ont la même
// forme : GET -> statut -> JSON -> sous-objet "rates". Elles passent donc
// toutes les deux par latest(), puis extraient soit les clés, soit un champ.
// ============================================================================

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::value::RawValue;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{RateError, RateProvider};
use crate::config::Config;
use crate::models::{CurrencyCode, RateSnapshot};

/// URL de base par défaut de l'API
pub const DEFAULT_BASE_URL: &str = "https://open.er-api.com/v6";

/// Timeout par défaut d'une requête (évite un spinner bloqué indéfiniment)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Structures pour parser la réponse JSON
// ============================================================================
// Seuls les champs utiles sont déclarés : serde ignore le reste
// (time_last_update_utc, provider, documentation, ...)
// ============================================================================

#[derive(Debug, Deserialize)]
struct LatestResponse {
    /// "success" ou "error"
    result: Option<String>,

    /// Présent quand result == "error" (ex: "unsupported-code")
    #[serde(rename = "error-type")]
    error_type: Option<String>,

    /// Valeurs gardées brutes : une entrée invalide (null, "abc", 1e400)
    /// ne doit pas faire échouer tout le document
    rates: Option<HashMap<CurrencyCode, Box<RawValue>>>,
}

// ============================================================================
// Client
// ============================================================================

/// Client HTTP de l'API open.er-api.com
///
/// CONCEPT RUST : réutiliser reqwest::Client
/// - Le Client garde un pool de connexions
/// - On le construit une seule fois, puis on le clone/partage
#[derive(Debug, Clone)]
pub struct OpenErClient {
    http: reqwest::Client,
    base_url: String,

    /// Devise de base utilisée pour lister les devises
    /// (n'importe laquelle convient : la liste ne dépend pas de la base)
    list_base: CurrencyCode,
}

impl OpenErClient {
    /// Client avec la base USD pour la liste et le timeout par défaut
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_options(base_url, CurrencyCode::from("USD"), DEFAULT_TIMEOUT)
    }

    /// Client entièrement paramétré
    pub fn with_options(
        base_url: impl Into<String>,
        list_base: CurrencyCode,
        timeout: Duration,
    ) -> Result<Self> {
        debug!(?timeout, "Creating HTTP client");
        let http = reqwest::Client::builder()
            .user_agent(concat!("lazyfx/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            list_base,
        })
    }

    /// Client construit depuis la configuration de l'application
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_options(
            config.api_base_url.clone(),
            config.list_base_currency.clone(),
            config.request_timeout(),
        )
    }

    /// Construit l'URL "latest" pour une devise de base
    fn latest_url(&self, base: &CurrencyCode) -> String {
        build_latest_url(&self.base_url, base)
    }

    /// Récupère le snapshot des taux pour une devise de base
    ///
    /// C'est l'unique endroit qui fait du HTTP. Les erreurs sont typées
    /// (Network / Http / Parse) pour que les appelants puissent les logger.
    ///
    /// CONCEPT RUST : map_err + ?
    /// - reqwest::Error est converti en RateError::Network
    /// - ? propage immédiatement l'erreur convertie
    #[instrument(skip(self, base), fields(base = %base))]
    pub async fn latest(&self, base: &CurrencyCode) -> Result<RateSnapshot, RateError> {
        let url = self.latest_url(base);
        debug!(url = %url, "Sending HTTP request to exchange-rate API");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(RateError::Network)?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        // Vérifie que la réponse est un succès HTTP (200-299)
        if !status.is_success() {
            return Err(RateError::Http { status });
        }

        // On lit le body en texte puis on parse nous-mêmes :
        // une coupure pendant la lecture reste une erreur réseau,
        // un JSON invalide devient une erreur de parsing
        let body = response.text().await.map_err(RateError::Network)?;

        let snapshot = parse_latest_body(base, &body)?;
        debug!(rates = snapshot.len(), "Parsed rate snapshot");
        Ok(snapshot)
    }

    async fn currency_list(&self) -> Result<Vec<CurrencyCode>, RateError> {
        let snapshot = self.latest(&self.list_base).await?;
        if snapshot.is_empty() {
            return Err(RateError::Parse("aucune devise dans \"rates\"".to_string()));
        }
        Ok(snapshot.currencies())
    }

    async fn ratio(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64, RateError> {
        let snapshot = self.latest(from).await?;
        let ratio = snapshot
            .ratio(to)
            .ok_or_else(|| RateError::Parse(format!("pas de taux numérique pour {} dans \"rates\"", to)))?;

        // Un ratio nul ou négatif ne peut pas servir à convertir
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(RateError::Parse(format!("ratio invalide pour {} : {}", to, ratio)));
        }
        Ok(ratio)
    }
}

// ============================================================================
// RateProvider : frontière où les erreurs deviennent None
// ============================================================================

#[async_trait]
impl RateProvider for OpenErClient {
    async fn fetch_currency_list(&self) -> Option<Vec<CurrencyCode>> {
        match self.currency_list().await {
            Ok(currencies) => {
                info!(count = currencies.len(), "Fetched currency list");
                Some(currencies)
            }
            Err(e) => {
                log_failure("fetch_currency_list", &e);
                None
            }
        }
    }

    async fn fetch_ratio(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<f64> {
        match self.ratio(from, to).await {
            Ok(ratio) => {
                info!(%from, %to, ratio, "Fetched currency ratio");
                Some(ratio)
            }
            Err(e) => {
                log_failure("fetch_ratio", &e);
                None
            }
        }
    }
}

/// Log une erreur avec son type (network / http / parse)
fn log_failure(operation: &str, err: &RateError) {
    match err {
        RateError::Http { status } => {
            error!(operation, kind = err.kind(), status = %status, "Exchange-rate API returned error status");
        }
        RateError::Network(source) => {
            error!(operation, kind = err.kind(), timeout = source.is_timeout(), error = %err, "Network error");
        }
        RateError::Parse(_) => {
            warn!(operation, kind = err.kind(), error = %err, "Invalid exchange-rate response");
        }
    }
}

// ============================================================================
// Fonctions utilitaires (pures, testables sans réseau)
// ============================================================================

/// Construit l'URL de l'endpoint "latest"
///
/// Tolère un slash final dans l'URL de base.
fn build_latest_url(base_url: &str, base: &CurrencyCode) -> String {
    format!("{}/latest/{}", base_url.trim_end_matches('/'), base)
}

/// Parse le body JSON d'une réponse "latest"
fn parse_latest_body(base: &CurrencyCode, body: &str) -> Result<RateSnapshot, RateError> {
    let response: LatestResponse = serde_json::from_str(body)?;

    if response.result.as_deref() == Some("error") {
        let error_type = response.error_type.as_deref().unwrap_or("unknown");
        return Err(RateError::Parse(format!("l'API a refusé la requête ({})", error_type)));
    }

    let raw_rates = response
        .rates
        .ok_or_else(|| RateError::Parse("champ \"rates\" manquant".to_string()))?;

    // Chaque taux est converti séparément : un échec donne None pour
    // cette devise seulement
    let rates: HashMap<CurrencyCode, Option<f64>> = raw_rates
        .into_iter()
        .map(|(code, raw)| {
            let value = serde_json::from_str::<f64>(raw.get()).ok();
            if value.is_none() {
                debug!(%code, raw = raw.get(), "Ignoring non-numeric rate");
            }
            (code, value)
        })
        .collect();

    Ok(RateSnapshot::new(base.clone(), rates))
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_latest_url() {
        let usd = CurrencyCode::from("USD");
        assert_eq!(
            build_latest_url("https://open.er-api.com/v6", &usd),
            "https://open.er-api.com/v6/latest/USD"
        );
        assert_eq!(
            build_latest_url("http://localhost:8080/", &usd),
            "http://localhost:8080/latest/USD"
        );
    }

    #[test]
    fn test_parse_success_body() {
        let body = r#"{
            "result": "success",
            "base_code": "USD",
            "time_last_update_unix": 1700000000,
            "rates": { "USD": 1, "EUR": 0.92, "JPY": 151.3 }
        }"#;

        let snapshot = parse_latest_body(&CurrencyCode::from("USD"), body).unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.ratio(&CurrencyCode::from("JPY")), Some(151.3));
        assert_eq!(snapshot.ratio(&CurrencyCode::from("USD")), Some(1.0));
    }

    #[test]
    fn test_parse_keeps_keys_of_unusable_rates() {
        let body = r#"{
            "result": "success",
            "rates": { "USD": 1, "EUR": 0.92, "XDR": null, "ABC": "1.5", "BIG": 1e400 }
        }"#;

        let snapshot = parse_latest_body(&CurrencyCode::from("USD"), body).unwrap();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot.ratio(&CurrencyCode::from("EUR")), Some(0.92));
        assert_eq!(snapshot.ratio(&CurrencyCode::from("XDR")), None);
        assert_eq!(snapshot.ratio(&CurrencyCode::from("ABC")), None);
        assert_eq!(snapshot.ratio(&CurrencyCode::from("BIG")), None);
    }

    #[test]
    fn test_parse_missing_rates() {
        let err = parse_latest_body(&CurrencyCode::from("USD"), r#"{"result":"success"}"#).unwrap_err();
        assert!(matches!(err, RateError::Parse(_)));
    }

    #[test]
    fn test_parse_provider_error_envelope() {
        let body = r#"{"result":"error","error-type":"unsupported-code"}"#;
        let err = parse_latest_body(&CurrencyCode::from("XXX"), body).unwrap_err();
        assert!(err.to_string().contains("unsupported-code"));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_latest_body(&CurrencyCode::from("USD"), "<html>down</html>").unwrap_err();
        assert_eq!(err.kind(), "parse");
    }
}
