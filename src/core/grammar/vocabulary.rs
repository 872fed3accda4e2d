//! Known Vocabulary
//!
//! The static key and oracle-tag sets the card-search backend accepts.
//! Anything outside these sets is rewritten or dropped by the validator.

use std::collections::HashSet;

use once_cell::sync::Lazy;

// ============================================================================
// Constants - Search Keys
// ============================================================================

/// Grammar keys accepted by the backend, including their aliases.
pub const SEARCH_KEYS: &[&str] = &[
    // Colors
    "c", "color", "id", "identity", "ci",
    // Types and text
    "t", "type", "o", "oracle", "fo", "fulloracle", "kw", "keyword", "name",
    // Mana
    "m", "mana", "mv", "cmc", "manavalue", "devotion", "produces",
    // Stats
    "pow", "power", "tou", "toughness", "loy", "loyalty",
    // Printings
    "e", "s", "set", "edition", "cn", "number", "b", "block", "st", "r", "rarity",
    "in", "new", "prints", "sets", "papersets", "lang", "language", "game",
    // Legality
    "f", "format", "legal", "banned", "restricted",
    // Prices
    "usd", "eur", "tix",
    // Art and frame
    "a", "artist", "ft", "flavor", "wm", "watermark", "frame", "border", "stamp", "art", "atag",
    "arttag",
    // Dates
    "year", "date",
    // Predicates
    "is", "not", "has",
    // Oracle tags
    "otag", "oracletag", "function",
    // Display
    "order", "direction", "unique", "prefer", "include",
];

/// Keys whose values are oracle-tag identifiers.
pub const TAG_KEYS: &[&str] = &["otag", "oracletag", "function"];

// ============================================================================
// Constants - Oracle Tags
// ============================================================================

/// Oracle tags known to exist in the backend's tag registry.
pub const ORACLE_TAGS: &[&str] = &[
    // Removal
    "removal", "creature-removal", "artifact-removal", "enchantment-removal",
    "planeswalker-removal", "land-removal", "exile-removal", "edict", "fight", "bite",
    "board-wipe", "sweeper", "mass-bounce", "bounce", "tapper", "pinger", "burn",
    "land-destruction", "mass-land-destruction", "graveyard-hate",
    // Interaction
    "counterspell", "soft-counterspell", "protection", "hexproof-granter", "indestructible-granter",
    "fog", "theft", "copy-spell", "redirect",
    // Mana
    "ramp", "mana-rock", "mana-dork", "land-ramp", "ritual", "cost-reducer", "mana-doubler",
    "treasure-maker", "extra-land-drop",
    // Cards
    "draw", "card-advantage", "cantrip", "wheel", "looting", "rummaging", "impulse-draw",
    "scry", "surveil", "card-selection", "tutor", "land-tutor", "creature-tutor",
    "artifact-tutor", "enchantment-tutor",
    // Graveyard
    "reanimation", "recursion", "mill", "self-mill", "discard", "discard-outlet",
    // Bodies and tokens
    "token-generator", "token-doubler", "clone", "anthem", "lord", "pump", "evasion",
    "haste-granter", "untapper", "flicker", "etb-trigger", "death-trigger",
    "sacrifice-outlet", "counters-matter", "counter-doubler", "proliferate",
    // Life
    "lifegain", "lifegain-payoff", "drain", "life-loss",
    // Turns and tempo
    "extra-turn", "extra-combat", "tax", "stax", "pillowfort", "group-hug",
    // Spells and synergies
    "cast-trigger", "spellslinger-payoff", "landfall", "enchantress", "artifact-synergy",
    "equipment-synergy", "alt-win", "win-condition",
];

// ============================================================================
// Lookup Sets
// ============================================================================

static KEY_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| SEARCH_KEYS.iter().copied().collect());

static TAG_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| ORACLE_TAGS.iter().copied().collect());

/// Is `key` (any case) an accepted grammar key?
pub fn is_known_key(key: &str) -> bool {
    KEY_SET.contains(key.to_ascii_lowercase().as_str())
}

/// Is `tag` (any case) a registered oracle tag?
pub fn is_known_tag(tag: &str) -> bool {
    TAG_SET.contains(tag.to_ascii_lowercase().as_str())
}

/// Does `key` carry an oracle-tag value?
pub fn is_tag_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    TAG_KEYS.contains(&key.as_str())
}

/// The registered oracle tags as an owned set, for callers that need a
/// mutable registry seeded with the defaults.
pub fn default_tag_registry() -> HashSet<String> {
    ORACLE_TAGS.iter().map(|t| t.to_string()).collect()
}
