// ============================================================================
// Convertisseur : état observable + règles de rafraîchissement
// ============================================================================
// Le Converter possède l'état affiché par l'UI (devises, montant, ratio) et
// décide quand il faut rappeler l'API :
// - initialize()          -> liste des devises
// - set_from_currency()   -> ratio
// - set_to_currency()     -> ratio
// - switch_currencies()   -> ratio
// - set_amount()          -> rien (pas de réseau)
//
// CONCEPTS RUST :
// 1. tokio::sync::watch : "valeur courante + notification de changement"
//    - Un seul Sender, autant de Receiver que d'observateurs
//    - borrow() lit la valeur courante sans attendre
// 2. Arc<dyn RateProvider> : le client est injecté (HTTP en prod, faux en test)
// 3. JoinHandle : chaque appel réseau est une tâche tokio explicite
//
// Règle "fail soft" : un échec réseau ne touche jamais l'état. La dernière
// valeur valide (liste ou ratio) reste affichée.
// ============================================================================

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::RateProvider;
use crate::models::{convert_amount, CurrencyCode};

// ============================================================================
// Structure : ConverterState
// ============================================================================

/// Tout ce que l'écran affiche
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterState {
    /// Devises disponibles, triées (vide tant que rien n'a été récupéré)
    pub currencies: Vec<CurrencyCode>,

    /// Devise source
    pub from_currency: CurrencyCode,

    /// Devise cible
    pub to_currency: CurrencyCode,

    /// Montant tel que saisi (pas forcément un nombre)
    pub amount_text: String,

    /// Dernier ratio from -> to récupéré avec succès
    pub ratio: f64,

    /// Requêtes lancées et pas encore terminées
    pub pending_requests: usize,

    /// Heure locale du dernier fetch réussi
    pub last_updated: Option<DateTime<Local>>,
}

impl ConverterState {
    /// État initial d'une session
    pub fn new(from_currency: CurrencyCode, to_currency: CurrencyCode) -> Self {
        Self {
            currencies: Vec::new(),
            from_currency,
            to_currency,
            amount_text: String::new(),
            ratio: 1.0,
            pending_requests: 0,
            last_updated: None,
        }
    }

    /// Montant converti
    ///
    /// Un montant non numérique donne le ratio lui-même (montant = 1).
    pub fn result(&self) -> f64 {
        convert_amount(&self.amount_text, self.ratio)
    }

    pub fn has_currencies(&self) -> bool {
        !self.currencies.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_requests > 0
    }
}

impl Default for ConverterState {
    /// USD -> EUR, montant vide, ratio 1.0
    fn default() -> Self {
        Self::new(CurrencyCode::from("USD"), CurrencyCode::from("EUR"))
    }
}

// ============================================================================
// Structure : Converter
// ============================================================================

/// View-model du convertisseur
///
/// CONCEPT RUST : Clone bon marché
/// - Tous les champs sont des Arc / Handle
/// - Cloner un Converter partage le même état et le même client
#[derive(Clone)]
pub struct Converter {
    provider: Arc<dyn RateProvider>,
    state: Arc<watch::Sender<ConverterState>>,
    runtime: Handle,
}

impl Converter {
    /// Crée un convertisseur avec l'état par défaut (USD -> EUR)
    ///
    /// `runtime` : runtime tokio sur lequel les requêtes sont lancées.
    /// L'UI tourne dans un thread synchrone, d'où le Handle explicite.
    pub fn new(provider: Arc<dyn RateProvider>, runtime: Handle) -> Self {
        Self::with_state(provider, runtime, ConverterState::default())
    }

    /// Crée un convertisseur à partir d'un état initial donné
    pub fn with_state(provider: Arc<dyn RateProvider>, runtime: Handle, initial: ConverterState) -> Self {
        // Le Receiver initial n'est pas gardé : send_modify fonctionne
        // même sans observateur, et subscribe() en crée d'autres
        let (state, _) = watch::channel(initial);
        Self {
            provider,
            state: Arc::new(state),
            runtime,
        }
    }

    /// Nouvel observateur de l'état
    pub fn subscribe(&self) -> watch::Receiver<ConverterState> {
        self.state.subscribe()
    }

    /// Copie de l'état courant
    pub fn snapshot(&self) -> ConverterState {
        self.state.borrow().clone()
    }

    // ========================================================================
    // Opérations
    // ========================================================================

    /// Récupère la liste des devises
    ///
    /// Succès : la liste triée remplace la précédente.
    /// Échec (ou liste vide) : la liste actuelle est conservée.
    pub fn initialize(&self) -> JoinHandle<()> {
        info!("Fetching currency list");
        let pending = self.begin_request();

        let provider = Arc::clone(&self.provider);
        let state = Arc::clone(&self.state);

        self.runtime.spawn(async move {
            let fetched = provider.fetch_currency_list().await;

            state.send_modify(|s| {
                match fetched {
                    Some(mut currencies) if !currencies.is_empty() => {
                        currencies.sort();
                        currencies.dedup();
                        debug!(count = currencies.len(), "Storing currency list");
                        s.currencies = currencies;
                        s.last_updated = Some(Local::now());
                    }
                    Some(_) => warn!("Provider returned an empty currency list, keeping previous one"),
                    None => warn!(kept = s.currencies.len(), "Currency list unavailable, keeping previous one"),
                }
            });
            drop(pending);
        })
    }

    /// Change la devise source puis rafraîchit le ratio
    pub fn set_from_currency(&self, code: CurrencyCode) -> JoinHandle<()> {
        debug!(%code, "Setting from currency");
        self.state.send_modify(|s| s.from_currency = code);
        self.refresh_ratio()
    }

    /// Change la devise cible puis rafraîchit le ratio
    pub fn set_to_currency(&self, code: CurrencyCode) -> JoinHandle<()> {
        debug!(%code, "Setting to currency");
        self.state.send_modify(|s| s.to_currency = code);
        self.refresh_ratio()
    }

    /// Inverse source et cible puis rafraîchit le ratio
    ///
    /// CONCEPT RUST : std::mem::swap
    /// - Échange deux valeurs via deux &mut, sans clone
    /// - Fait dans un seul send_modify : aucun observateur ne voit
    ///   un état à moitié échangé
    pub fn switch_currencies(&self) -> JoinHandle<()> {
        self.state.send_modify(|s| std::mem::swap(&mut s.from_currency, &mut s.to_currency));
        debug!("Switched currencies");
        self.refresh_ratio()
    }

    /// Enregistre le montant saisi tel quel
    ///
    /// Pas de réseau, pas de validation. Le même texte deux fois de suite
    /// ne notifie pas les observateurs.
    pub fn set_amount(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_if_modified(|s| {
            if s.amount_text == text {
                false
            } else {
                s.amount_text = text;
                true
            }
        });
    }

    // ========================================================================
    // Helpers privés
    // ========================================================================

    /// Lance le fetch du ratio pour la paire courante
    ///
    /// La paire est lue au moment de l'appel. Si plusieurs fetchs sont en
    /// vol, le dernier à se terminer écrit le ratio.
    fn refresh_ratio(&self) -> JoinHandle<()> {
        let (from, to) = {
            let s = self.state.borrow();
            (s.from_currency.clone(), s.to_currency.clone())
        };
        info!(%from, %to, "Fetching currency ratio");
        let pending = self.begin_request();

        let provider = Arc::clone(&self.provider);
        let state = Arc::clone(&self.state);

        self.runtime.spawn(async move {
            let fetched = provider.fetch_ratio(&from, &to).await;

            state.send_modify(|s| {
                match fetched {
                    Some(ratio) => {
                        debug!(%from, %to, ratio, "Storing currency ratio");
                        s.ratio = ratio;
                        s.last_updated = Some(Local::now());
                    }
                    None => warn!(%from, %to, kept = s.ratio, "Ratio unavailable, keeping previous one"),
                }
            });
            drop(pending);
        })
    }

    /// Compte une requête en vol ; le guard est déplacé dans la tâche
    fn begin_request(&self) -> PendingGuard {
        PendingGuard::new(Arc::clone(&self.state))
    }
}

// ============================================================================
// Compteur de requêtes en vol
// ============================================================================

/// Incrémente `pending_requests` à la création, le décrémente au drop
///
/// CONCEPT RUST : RAII / Drop
/// - drop() s'exécute aussi quand la tâche panique ou est annulée
///   (JoinHandle::abort, arrêt du runtime)
/// - le compteur ne peut donc pas rester bloqué au-dessus de zéro
struct PendingGuard {
    state: Arc<watch::Sender<ConverterState>>,
}

impl PendingGuard {
    fn new(state: Arc<watch::Sender<ConverterState>>) -> Self {
        state.send_modify(|s| s.pending_requests += 1);
        Self { state }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.state
            .send_modify(|s| s.pending_requests = s.pending_requests.saturating_sub(1));
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
