//! Keyword intent classification.
//!
//! Intents are checked in a fixed order and the first one whose multilingual keyword set occurs
//! in the lower-cased text wins. The order is part of the contract: "price of my order" is an order.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Order,
    Pricing,
    Feature,
    Integration,
    Demo,
    Greeting,
    /// Catch-all; always matches.
    Default,
}

impl Intent {
    /// Classification order. `Default` is last and never fails to match.
    pub const ORDERED: [Intent; 7] = [
        Intent::Order,
        Intent::Pricing,
        Intent::Feature,
        Intent::Integration,
        Intent::Demo,
        Intent::Greeting,
        Intent::Default,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Intent::Order => "order",
            Intent::Pricing => "pricing",
            Intent::Feature => "feature",
            Intent::Integration => "integration",
            Intent::Demo => "demo",
            Intent::Greeting => "greeting",
            Intent::Default => "default",
        }
    }

    /// Keywords (any language) that select this intent. Empty for `Default`.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Intent::Order => &["order", "purchase", "pedido", "commande", "ordem"],
            Intent::Pricing => &[
                "price", "precio", "preço", "prix", "cost", "pricing", "plan", "tarif", "custo",
            ],
            Intent::Feature => &[
                "feature",
                "característica",
                "recurso",
                "fonctionnalité",
                "what can",
                "capabilities",
                "funcionalidad",
                "funcionalidade",
            ],
            Intent::Integration => &[
                "integrate", "integrar", "intégrer", "api", "connect", "conectar", "connexion",
            ],
            Intent::Demo => &[
                "demo", "trial", "test", "try", "prueba", "teste", "essai", "probar", "experimentar",
            ],
            Intent::Greeting => &[
                "hello", "hi", "hey", "hola", "olá", "bonjour", "salut", "oi", "buenos", "buenas",
            ],
            Intent::Default => &[],
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Classifies `text` into exactly one [`Intent`]. Total: unmatched input is `Default`.
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();
    Intent::ORDERED
        .iter()
        .copied()
        .find(|intent| intent.keywords().iter().any(|k| lower.contains(k)))
        .unwrap_or(Intent::Default)
}
