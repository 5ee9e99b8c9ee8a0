// ============================================================================
// Structure : RateSnapshot
// ============================================================================
// Une réponse de l'API de taux : une devise de base + les multiplicateurs
// vers toutes les autres devises.
//
// Le snapshot n'est jamais mis en cache : il est construit pour une requête,
// on en extrait la seule valeur utile (liste de codes ou un ratio), puis il
// est jeté.
//
// Une entrée de "rates" peut être inutilisable (null, texte, nombre hors
// limites) : elle est gardée avec la valeur None. La clé compte toujours
// dans la liste des devises, seul son ratio est indisponible.
// ============================================================================

use std::collections::HashMap;

use crate::models::CurrencyCode;

/// Taux relatifs à une devise de base, à un instant donné
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    /// Devise de base de la requête (ex: "USD" pour /latest/USD)
    pub base: CurrencyCode,

    /// 1 unité de `base` = `rates[code]` unités de `code`
    /// (None : valeur non numérique dans la réponse)
    pub rates: HashMap<CurrencyCode, Option<f64>>,
}

impl RateSnapshot {
    pub fn new(base: CurrencyCode, rates: HashMap<CurrencyCode, Option<f64>>) -> Self {
        Self { base, rates }
    }

    /// Codes disponibles dans ce snapshot (ordre non garanti)
    ///
    /// CONCEPT RUST : Iterator + cloned()
    /// - .keys() itère sur des &CurrencyCode
    /// - .cloned() produit des CurrencyCode owned
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        self.rates.keys().cloned().collect()
    }

    /// Ratio base -> `to`, None si la devise est absente ou sans valeur numérique
    ///
    /// CONCEPT RUST : Option<Option<T>>::flatten()
    /// - get() renvoie None si la clé manque
    /// - la valeur stockée est elle-même None si le taux est inutilisable
    pub fn ratio(&self, to: &CurrencyCode) -> Option<f64> {
        self.rates.get(to).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
