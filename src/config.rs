// ============================================================================
// Configuration
// ============================================================================
// Fichier TOML optionnel :
// - $LAZYFX_CONFIG si défini
// - sinon ~/.config/lazyfx/config.toml (Linux), équivalent macOS/Windows
//
// Fichier absent => valeurs par défaut. Chaque champ est optionnel grâce à
// #[serde(default)] : on peut ne surcharger que ce qui nous intéresse.
//
// Exemple :
// ```toml
// default_from = "EUR"
// default_to = "JPY"
// request_timeout_secs = 5
// ```
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::api::open_er::DEFAULT_BASE_URL;
use crate::models::CurrencyCode;

/// Variable d'environnement pour forcer le chemin du fichier de config
pub const CONFIG_ENV_VAR: &str = "LAZYFX_CONFIG";

/// Configuration de l'application
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL de base de l'API (sans le "/latest/...")
    pub api_base_url: String,

    /// Devise de base utilisée pour récupérer la liste des devises
    pub list_base_currency: CurrencyCode,

    /// Devise source au démarrage
    pub default_from: CurrencyCode,

    /// Devise cible au démarrage
    pub default_to: CurrencyCode,

    /// Timeout d'une requête HTTP, en secondes
    pub request_timeout_secs: u64,

    /// Filtre tracing utilisé si RUST_LOG n'est pas défini
    pub log_filter: String,

    /// Répertoire des logs (None = répertoire de données de l'utilisateur)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            list_base_currency: CurrencyCode::from("USD"),
            default_from: CurrencyCode::from("USD"),
            default_to: CurrencyCode::from("EUR"),
            request_timeout_secs: 10,
            log_filter: "lazyfx=debug,info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Charge la configuration depuis l'emplacement par défaut
    ///
    /// Retourne aussi le chemin consulté, pour le logger une fois
    /// le logging initialisé.
    pub fn load() -> Result<(Self, Option<PathBuf>)> {
        match default_config_path() {
            Some(path) => {
                let config = Self::load_from(&path)?;
                Ok((config, Some(path)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    /// Charge la configuration depuis un fichier précis
    ///
    /// CONCEPT RUST : ErrorKind::NotFound
    /// - Un fichier absent n'est pas une erreur : on prend les défauts
    /// - Toute autre erreur (permissions, TOML invalide) remonte avec contexte
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Échec de la lecture de la configuration {}", path.display())
                })
            }
        };

        Self::from_toml_str(&content)
            .with_context(|| format!("Configuration invalide : {}", path.display()))
    }

    /// Parse une configuration TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Échec du parsing TOML")?;
        if config.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs doit être supérieur à 0");
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Répertoire des logs effectif
    ///
    /// - Linux : ~/.local/share/lazyfx/logs
    /// - macOS : ~/Library/Application Support/lazyfx/logs
    /// - Windows : C:\Users\<user>\AppData\Local\lazyfx\logs
    /// - Sinon : ./logs
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join("lazyfx").join("logs"))
                .unwrap_or_else(|| PathBuf::from("./logs"))
        })
    }
}

/// Chemin du fichier de config : variable d'environnement, puis dossier de config
fn default_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("lazyfx").join("config.toml"))
}

// ============================================================================
// Tests
// ============================================================================
