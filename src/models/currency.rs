// ============================================================================
// Structure : CurrencyCode
// ============================================================================
// Représente un code devise ISO 4217 (ex: "USD", "EUR", "JPY")
//
// CONCEPTS RUST :
// 1. Newtype pattern : envelopper un String dans une struct dédiée
//    - Le compilateur empêche de confondre un code devise avec un autre String
//    - Aucun coût à l'exécution (même représentation mémoire)
// 2. #[serde(transparent)] : sérialisé exactement comme le String interne
//    - Permet d'utiliser CurrencyCode comme clé de HashMap dans le JSON
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

/// Code devise (ex: "USD")
///
/// Aucune validation : un code inconnu échoue simplement lors du lookup
/// dans les taux renvoyés par l'API.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Crée un code devise à partir de n'importe quoi convertible en String
    ///
    /// CONCEPT RUST : impl Into<String>
    /// - Accepte &str, String, Cow<str>...
    /// - L'appelant n'a pas besoin d'écrire .to_string()
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Retourne le code sous forme de &str
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Symbole de la devise pour l'affichage (ex: "$", "€")
    ///
    /// Table volontairement courte : pour une devise absente,
    /// on affiche le code lui-même suivi d'un espace ("CHF 12.00").
    pub fn symbol(&self) -> String {
        match symbol_for(&self.0) {
            Some(symbol) => symbol.to_string(),
            None => format!("{} ", self.0),
        }
    }
}

/// Table des symboles connus
fn symbol_for(code: &str) -> Option<&'static str> {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "CN¥",
        "INR" => "₹",
        "KRW" => "₩",
        "RUB" => "₽",
        "TRY" => "₺",
        "ILS" => "₪",
        "NGN" => "₦",
        "UAH" => "₴",
        "VND" => "₫",
        "PHP" => "₱",
        "THB" => "฿",
        "BRL" => "R$",
        "CAD" => "CA$",
        "AUD" => "A$",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "MXN" => "MX$",
        "ZAR" => "R",
        "PLN" => "zł",
        _ => return None,
    };
    Some(symbol)
}

// ============================================================================
// Conversions et affichage
// ============================================================================

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Tests
// ============================================================================
