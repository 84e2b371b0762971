//! Part-of-speech tagging.
//!
//! [`PosTagger`] is the capability the feature extractor consumes.
//! [`LexiconTagger`] is the built-in implementation: a deterministic tagger
//! over the Penn Treebank tag set, driven by a closed-class lexicon, a list
//! of common verbs and suffix rules. Only tag prefixes (`VB`, `NN`, `CD`)
//! reach the classifier.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// A tagger that splits text into tokens and labels each one.
pub trait PosTagger: Send + Sync {
    /// Tokenize `text` and return `(token, tag)` pairs in order.
    fn tag(&self, text: &str) -> Result<Vec<(String, String)>>;
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?x)
              \d+(?:[.,:/]\d+)*%?      # numbers, section numbers, dates
            | \w+(?:[-'’]\w+)*         # words with inner hyphens or apostrophes
            | \.\.\.                   # ellipsis
            | [^\w\s]                  # any other symbol
            ",
        )
        .expect("token pattern is valid")
    })
}

/// Split text into word and punctuation tokens.
///
/// Text is NFKC-normalized first so ligature glyphs become plain letters.
/// Control characters other than whitespace are rejected.
pub fn word_tokenize(text: &str) -> Result<Vec<String>> {
    let normalized: String = text.nfkc().collect();

    if let Some(c) = normalized
        .chars()
        .find(|c| c.is_control() && !c.is_whitespace())
    {
        return Err(Error::FeatureExtraction(format!(
            "unsupported character U+{:04X} in {:?}",
            c as u32, text
        )));
    }

    Ok(token_pattern()
        .find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect())
}

#[rustfmt::skip]
const CLOSED_CLASS: &[(&str, &str)] = &[
    ("the", "DT"), ("a", "DT"), ("an", "DT"), ("this", "DT"), ("that", "DT"),
    ("these", "DT"), ("those", "DT"), ("each", "DT"), ("every", "DT"), ("all", "DT"),
    ("some", "DT"), ("no", "DT"), ("any", "DT"), ("another", "DT"), ("either", "DT"),
    ("neither", "DT"), ("both", "DT"),
    ("of", "IN"), ("in", "IN"), ("on", "IN"), ("at", "IN"), ("by", "IN"), ("for", "IN"),
    ("with", "IN"), ("from", "IN"), ("into", "IN"), ("onto", "IN"), ("about", "IN"),
    ("above", "IN"), ("across", "IN"), ("after", "IN"), ("against", "IN"), ("along", "IN"),
    ("among", "IN"), ("around", "IN"), ("before", "IN"), ("behind", "IN"), ("below", "IN"),
    ("beside", "IN"), ("between", "IN"), ("beyond", "IN"), ("during", "IN"), ("except", "IN"),
    ("inside", "IN"), ("near", "IN"), ("outside", "IN"), ("over", "IN"), ("since", "IN"),
    ("through", "IN"), ("throughout", "IN"), ("toward", "IN"), ("towards", "IN"),
    ("under", "IN"), ("until", "IN"), ("upon", "IN"), ("via", "IN"), ("within", "IN"),
    ("without", "IN"), ("per", "IN"), ("than", "IN"), ("as", "IN"), ("if", "IN"),
    ("because", "IN"), ("although", "IN"), ("though", "IN"), ("while", "IN"),
    ("whereas", "IN"), ("unless", "IN"), ("whether", "IN"),
    ("to", "TO"),
    ("and", "CC"), ("or", "CC"), ("but", "CC"), ("nor", "CC"), ("yet", "CC"), ("plus", "CC"),
    ("i", "PRP"), ("you", "PRP"), ("he", "PRP"), ("she", "PRP"), ("it", "PRP"), ("we", "PRP"),
    ("they", "PRP"), ("me", "PRP"), ("him", "PRP"), ("us", "PRP"), ("them", "PRP"),
    ("itself", "PRP"), ("themselves", "PRP"),
    ("my", "PRP$"), ("your", "PRP$"), ("his", "PRP$"), ("her", "PRP$"), ("its", "PRP$"),
    ("our", "PRP$"), ("their", "PRP$"),
    ("will", "MD"), ("would", "MD"), ("can", "MD"), ("could", "MD"), ("shall", "MD"),
    ("should", "MD"), ("may", "MD"), ("might", "MD"), ("must", "MD"),
    ("which", "WDT"), ("what", "WP"), ("who", "WP"), ("whom", "WP"), ("whose", "WP$"),
    ("how", "WRB"), ("why", "WRB"), ("where", "WRB"), ("when", "WRB"),
    ("not", "RB"), ("very", "RB"), ("also", "RB"), ("only", "RB"), ("just", "RB"),
    ("then", "RB"), ("here", "RB"), ("now", "RB"), ("often", "RB"), ("always", "RB"),
    ("never", "RB"), ("already", "RB"), ("still", "RB"), ("too", "RB"), ("again", "RB"),
    ("however", "RB"), ("therefore", "RB"), ("thus", "RB"),
    ("there", "EX"),
    ("be", "VB"), ("is", "VBZ"), ("are", "VBP"), ("am", "VBP"), ("was", "VBD"),
    ("were", "VBD"), ("been", "VBN"), ("being", "VBG"),
    ("has", "VBZ"), ("have", "VBP"), ("had", "VBD"), ("having", "VBG"),
    ("does", "VBZ"), ("do", "VBP"), ("did", "VBD"), ("done", "VBN"), ("doing", "VBG"),
    ("made", "VBD"), ("took", "VBD"), ("taken", "VBN"), ("gave", "VBD"), ("given", "VBN"),
    ("found", "VBD"), ("got", "VBD"), ("went", "VBD"), ("gone", "VBN"), ("became", "VBD"),
    ("began", "VBD"), ("begun", "VBN"), ("built", "VBN"), ("held", "VBD"), ("kept", "VBD"),
    ("led", "VBD"), ("met", "VBD"), ("paid", "VBD"), ("said", "VBD"), ("sent", "VBD"),
    ("shown", "VBN"), ("seen", "VBN"), ("saw", "VBD"), ("written", "VBN"), ("wrote", "VBD"),
    ("known", "VBN"), ("knew", "VBD"), ("chosen", "VBN"), ("driven", "VBN"),
    ("zero", "CD"), ("one", "CD"), ("two", "CD"), ("three", "CD"), ("four", "CD"),
    ("five", "CD"), ("six", "CD"), ("seven", "CD"), ("eight", "CD"), ("nine", "CD"),
    ("ten", "CD"), ("eleven", "CD"), ("twelve", "CD"), ("twenty", "CD"), ("thirty", "CD"),
    ("forty", "CD"), ("fifty", "CD"), ("hundred", "CD"), ("thousand", "CD"),
    ("million", "CD"), ("billion", "CD"),
];

#[rustfmt::skip]
const BASE_VERBS: &[&str] = &[
    "use", "make", "provide", "include", "develop", "create", "build", "apply", "identify",
    "support", "ensure", "review", "submit", "manage", "design", "implement", "evaluate",
    "define", "describe", "explain", "improve", "increase", "reduce", "require", "understand",
    "achieve", "allow", "assess", "complete", "consider", "contact", "deliver", "establish",
    "follow", "help", "learn", "maintain", "meet", "need", "plan", "prepare", "present",
    "produce", "receive", "remove", "report", "see", "select", "start", "take", "test",
    "update", "write", "read", "run", "get", "give", "go", "know", "find", "keep", "let",
    "call", "work", "seek", "want", "become", "begin", "show", "list", "add", "check",
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "able", "ible", "ful", "ous", "ive", "ical", "ic", "less", "ish", "al",
];

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ance", "ence", "ship", "ism", "ist", "er", "or",
];

/// Lexicon and suffix-rule tagger producing Penn Treebank tags.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    lexicon: HashMap<&'static str, &'static str>,
    base_verbs: HashSet<&'static str>,
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconTagger {
    pub fn new() -> Self {
        Self {
            lexicon: CLOSED_CLASS.iter().copied().collect(),
            base_verbs: BASE_VERBS.iter().copied().collect(),
        }
    }

    fn tag_token(&self, token: &str, prev: Option<&str>) -> &'static str {
        if let Some(tag) = punctuation_tag(token) {
            return tag;
        }
        if token.starts_with(|c: char| c.is_ascii_digit()) {
            return "CD";
        }

        let lower = token.to_lowercase();
        if let Some(tag) = self.lexicon.get(lower.as_str()).copied() {
            return tag;
        }
        if self.base_verbs.contains(lower.as_str()) {
            return base_verb_tag(prev);
        }
        let third_person = [lower.strip_suffix("es"), lower.strip_suffix('s')]
            .into_iter()
            .flatten()
            .any(|stem| self.base_verbs.contains(stem));
        if third_person {
            return if follows_nominal_modifier(prev) { "NNS" } else { "VBZ" };
        }

        let chars = lower.chars().count();
        if chars > 5 && lower.ends_with("ing") {
            return "VBG";
        }
        if chars > 4 && lower.ends_with("ed") {
            return match prev {
                Some(p) if p.starts_with("VB") || p == "DT" => "VBN",
                _ => "VBD",
            };
        }

        let capitalized = token.starts_with(char::is_uppercase);
        let acronym = chars > 1 && token.chars().all(|c| !c.is_lowercase());
        if acronym || (capitalized && prev.is_some()) {
            return if is_plural(&lower) && !acronym { "NNPS" } else { "NNP" };
        }

        if lower.ends_with("ly") && chars > 4 {
            return "RB";
        }
        if lower.ends_with("ize") || lower.ends_with("ise") || lower.ends_with("ify") {
            return base_verb_tag(prev);
        }
        if ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) && chars > 4 {
            return "JJ";
        }
        if is_plural(&lower) {
            return "NNS";
        }
        if NOUN_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            return "NN";
        }
        if capitalized {
            return "NNP";
        }
        "NN"
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Result<Vec<(String, String)>> {
        let tokens = word_tokenize(text)?;
        let mut tagged: Vec<(String, String)> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let prev = tagged.last().map(|(_, tag)| tag.as_str());
            let tag = self.tag_token(&token, prev);
            tagged.push((token, tag.to_string()));
        }
        Ok(tagged)
    }
}

fn punctuation_tag(token: &str) -> Option<&'static str> {
    if token.chars().any(char::is_alphanumeric) {
        return None;
    }
    Some(match token {
        "." | "!" | "?" => ".",
        "," => ",",
        ":" | ";" | "..." | "-" | "–" | "—" => ":",
        "(" | "[" | "{" => "(",
        ")" | "]" | "}" => ")",
        "\"" | "“" | "'" | "‘" => "``",
        "”" | "’" => "''",
        "$" | "€" | "£" => "$",
        "#" => "#",
        _ => "SYM",
    })
}

fn base_verb_tag(prev: Option<&str>) -> &'static str {
    match prev {
        Some("MD") | Some("TO") | None => "VB",
        Some(p) if follows_nominal_modifier(Some(p)) => "NN",
        Some("PRP") | Some("NNS") => "VBP",
        _ => "VB",
    }
}

/// Determiners, possessives and adjectives are followed by nouns, not verbs.
fn follows_nominal_modifier(prev: Option<&str>) -> bool {
    matches!(prev, Some("DT") | Some("PRP$") | Some("JJ") | Some("CD"))
}

fn is_plural(lower: &str) -> bool {
    lower.chars().count() > 3
        && lower.ends_with('s')
        && !lower.ends_with("ss")
        && !lower.ends_with("us")
        && !lower.ends_with("is")
}
