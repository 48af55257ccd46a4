//! Lexical language detection.
//!
//! Each language accumulates points from its lexicon (whole-word hits weigh 2, bare substring hits 1),
//! from orthographic markers and from a couple of idioms that single-word scoring gets wrong.

use std::sync::LazyLock;

use helvia_core::Language;
use regex::Regex;
use serde::Serialize;

const WHOLE_WORD_WEIGHT: u32 = 2;
const SUBSTRING_WEIGHT: u32 = 1;

/// Spanish cues. Carries no English greetings so that "hi"/"hey" stay English.
const SPANISH_WORDS: &[&str] = &[
    "hola", "holi", "buenos", "buenas", "días", "día", "tardes", "noches",
    "gracias", "muchas gracias", "por favor", "ayuda", "necesito", "necesito ayuda",
    "pedido", "precio", "precios", "información", "cómo", "qué", "cuándo", "dónde", "quién",
    "español", "española", "hablas español", "habla español",
    "no sé", "no se", "que hacer", "qué hacer", "que hago", "qué hago",
    "puedes", "puedo", "quiero", "me gustaría", "dame", "déjame",
    "si", "sí", "no", "también", "más", "menos", "muy", "mucho", "poco",
    "empresa", "negocio", "servicio", "producto", "cliente", "clientes",
];

const PORTUGUESE_WORDS: &[&str] = &[
    "olá", "oi", "opa", "e aí", "tudo bem", "tudo bom",
    "obrigado", "obrigada", "valeu", "por favor", "ajuda", "preciso", "preciso ajuda",
    "pedido", "preço", "preços", "informação", "como", "quando", "onde", "quem",
    "português", "portuguesa", "fala português",
    "não sei", "o que fazer", "o que faço",
    "pode", "posso", "quero", "gostaria", "me dê", "deixa",
    "sim", "não", "também", "mais", "menos", "muito", "pouco",
    "empresa", "negócio", "serviço", "produto", "cliente", "clientes",
];

const FRENCH_WORDS: &[&str] = &[
    "bonjour", "bonsoir", "salut", "coucou", "allo",
    "merci", "merci beaucoup", "s'il vous plaît", "s'il te plaît", "aide", "besoin", "j'ai besoin",
    "commande", "prix", "information", "comment", "quand", "où", "qui",
    "français", "française", "parlez français", "parle français",
    "je ne sais pas", "que faire", "que dois-je faire",
    "pouvez", "peux", "je veux", "je voudrais", "donnez-moi", "laissez",
    "oui", "non", "aussi", "plus", "moins", "très", "beaucoup", "peu",
    "entreprise", "affaires", "service", "produit", "client", "clients",
];

const ENGLISH_WORDS: &[&str] = &[
    "hello", "hi", "hey", "thanks", "thank you", "please", "help", "need", "i need",
    "order", "price", "pricing", "information", "how", "what", "when", "where", "who",
    "english", "speak english", "do you speak english",
    "i don't know", "what to do", "what should i do",
    "can you", "can i", "i want", "i would like", "give me", "let me",
    "yes", "no", "also", "more", "less", "very", "much", "little",
    "company", "business", "service", "product", "customer", "customers",
];

/// Lexicon for a language. Kept as an exhaustive match so a new [`Language`] cannot compile without one.
pub fn lexicon(language: Language) -> &'static [&'static str] {
    match language {
        Language::Es => SPANISH_WORDS,
        Language::En => ENGLISH_WORDS,
        Language::Pt => PORTUGUESE_WORDS,
        Language::Fr => FRENCH_WORDS,
    }
}

/// A set of needles of which any one present awards `weight` once.
struct Marker {
    language: Language,
    needles: &'static [&'static str],
    weight: u32,
}

const MARKERS: &[Marker] = &[
    Marker { language: Language::Es, needles: &["ñ", "¿", "¡"], weight: 3 },
    Marker { language: Language::Es, needles: &["qué", "cómo", "dónde"], weight: 2 },
    Marker { language: Language::Pt, needles: &["ã", "õ", "ç"], weight: 3 },
    Marker { language: Language::Pt, needles: &["não", "você", "vocês"], weight: 2 },
    Marker { language: Language::Fr, needles: &["é", "è", "ê", "à", "ç"], weight: 3 },
    Marker { language: Language::Fr, needles: &["vous", "nous", "je "], weight: 2 },
];

struct LexiconEntry {
    word: &'static str,
    whole_word: Regex,
}

fn whole_word_pattern(word: &str) -> Regex {
    Regex::new(&format!(r"\b{}\b", regex::escape(word)))
        .expect("escaped lexicon entry is a valid pattern")
}

static LEXICONS: LazyLock<Vec<(Language, Vec<LexiconEntry>)>> = LazyLock::new(|| {
    Language::ALL
        .iter()
        .map(|&language| {
            let entries = lexicon(language)
                .iter()
                .map(|&word| LexiconEntry {
                    word,
                    whole_word: whole_word_pattern(word),
                })
                .collect();
            (language, entries)
        })
        .collect()
});

static IDIOMS: LazyLock<Vec<(Language, Regex, u32)>> = LazyLock::new(|| {
    [
        (Language::Es, r"\bno\s+s[eé]\b", 3),
        (Language::Es, r"\bqu[eé]\s+hacer\b", 3),
    ]
    .into_iter()
    .map(|(language, pattern, weight)| {
        (
            language,
            Regex::new(pattern).expect("idiom pattern is valid"),
            weight,
        )
    })
    .collect()
});

/// Accumulated score per language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LanguageScores {
    scores: [u32; 4],
}

impl LanguageScores {
    pub fn get(&self, language: Language) -> u32 {
        self.scores[language.priority()]
    }

    fn add(&mut self, language: Language, points: u32) {
        self.scores[language.priority()] += points;
    }

    /// Highest score across all languages.
    pub fn best(&self) -> u32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }

    /// Languages sharing the highest non-zero score, in priority order.
    pub fn leaders(&self) -> Vec<Language> {
        let best = self.best();
        if best == 0 {
            return Vec::new();
        }
        Language::ALL
            .iter()
            .copied()
            .filter(|&l| self.get(l) == best)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Language, u32)> + '_ {
        Language::ALL.iter().map(move |&l| (l, self.get(l)))
    }
}

/// Scores `text` against every language without deciding a winner.
pub fn score(text: &str) -> LanguageScores {
    let normalized = text.trim().to_lowercase();
    let mut scores = LanguageScores::default();
    if normalized.is_empty() {
        return scores;
    }

    for (language, entries) in LEXICONS.iter() {
        for entry in entries {
            if entry.whole_word.is_match(&normalized) {
                scores.add(*language, WHOLE_WORD_WEIGHT);
            } else if normalized.contains(entry.word) {
                scores.add(*language, SUBSTRING_WEIGHT);
            }
        }
    }

    for marker in MARKERS {
        if marker.needles.iter().any(|n| normalized.contains(n)) {
            scores.add(marker.language, marker.weight);
        }
    }

    for (language, pattern, weight) in IDIOMS.iter() {
        if pattern.is_match(&normalized) {
            scores.add(*language, *weight);
        }
    }

    scores
}

/// Detects the language of `text`, returning `fallback` when no cue fires.
///
/// Ties keep `fallback` when it is one of the leaders; otherwise the first leader in
/// [`Language::ALL`] order (es > pt > fr > en) wins.
pub fn detect(text: &str, fallback: Language) -> Language {
    detect_with_scores(text, fallback).0
}

/// Same as [`detect`] but also returns the per-language scores that produced the decision.
pub fn detect_with_scores(text: &str, fallback: Language) -> (Language, LanguageScores) {
    let scores = score(text);
    let leaders = scores.leaders();
    let detected = if leaders.contains(&fallback) {
        fallback
    } else {
        leaders.first().copied().unwrap_or(fallback)
    };
    (detected, scores)
}
