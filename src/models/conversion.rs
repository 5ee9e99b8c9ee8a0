// ============================================================================
// Conversion d'un montant saisi
// ============================================================================
// Le montant est un texte brut tapé par l'utilisateur. Règle d'affichage :
// - texte numérique : résultat = montant × ratio
// - texte non numérique (vide, "abc", ...) : résultat = ratio
//   (comme si l'utilisateur avait saisi 1, jamais de NaN ni d'écran vide)
// ============================================================================

/// Parse le montant saisi, None si le texte n'est pas un nombre
///
/// Les espaces autour sont ignorés ("  10 " -> 10.0).
pub fn parse_amount(amount_text: &str) -> Option<f64> {
    amount_text.trim().parse::<f64>().ok()
}

/// Calcule le résultat affiché pour un montant texte et un ratio
pub fn convert_amount(amount_text: &str, ratio: f64) -> f64 {
    match parse_amount(amount_text) {
        Some(amount) => amount * ratio,
        None => ratio,
    }
}
