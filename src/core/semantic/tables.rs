//! Mapping Tables
//!
//! Frozen pattern tables consulted by the resolver, in resolution order:
//! slang phrases, tag-first concepts, archetypes, "cards like X" profiles,
//! keyword abilities, then plain card attributes (colors, types, cost).
//!
//! Patterns run against lowercase, accent-stripped, single-spaced text.

// ============================================================================
// Types
// ============================================================================

/// Exact jargon phrase.
#[derive(Debug, Clone, Copy)]
pub struct SlangEntry {
    pub phrase: &'static str,
    pub fragment: &'static str,
    pub concept: &'static str,
}

/// A functional concept that prefers an oracle tag and falls back to an
/// oracle-text heuristic when the tag is not registered.
#[derive(Debug, Clone, Copy)]
pub struct ConceptPattern {
    pub pattern: &'static str,
    pub tag: &'static str,
    pub fallback: &'static str,
}

/// A deck strategy mapped to a compound query.
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeEntry {
    pub name: &'static str,
    pub pattern: &'static str,
    pub fragment: &'static str,
}

/// A well-known card and the query for cards that do the same job.
#[derive(Debug, Clone, Copy)]
pub struct CardProfile {
    pub name: &'static str,
    pub fragment: &'static str,
    /// Concept this card stands for; suppressed if already emitted
    pub concept: &'static str,
}

/// A keyword ability and the phrasings that name it.
#[derive(Debug, Clone, Copy)]
pub struct KeywordEntry {
    pub pattern: &'static str,
    pub keyword: &'static str,
}

// ============================================================================
// Constants - Slang
// ============================================================================

pub const SLANG: &[SlangEntry] = &[
    // Formats
    SlangEntry { phrase: "commander legal", fragment: "f:commander", concept: "format" },
    SlangEntry { phrase: "edh legal", fragment: "f:commander", concept: "format" },
    SlangEntry { phrase: "cedh", fragment: "f:commander", concept: "format" },
    SlangEntry { phrase: "edh", fragment: "f:commander", concept: "format" },
    SlangEntry { phrase: "pauper legal", fragment: "f:pauper", concept: "format" },
    SlangEntry { phrase: "modern legal", fragment: "f:modern", concept: "format" },
    SlangEntry { phrase: "standard legal", fragment: "f:standard", concept: "format" },
    SlangEntry { phrase: "pioneer legal", fragment: "f:pioneer", concept: "format" },
    SlangEntry { phrase: "legacy legal", fragment: "f:legacy", concept: "format" },
    SlangEntry { phrase: "vintage legal", fragment: "f:vintage", concept: "format" },
    SlangEntry { phrase: "for pauper", fragment: "f:pauper", concept: "format" },
    SlangEntry { phrase: "for modern", fragment: "f:modern", concept: "format" },
    SlangEntry { phrase: "for standard", fragment: "f:standard", concept: "format" },
    SlangEntry { phrase: "for commander", fragment: "f:commander", concept: "format" },
    // Price
    SlangEntry { phrase: "budget", fragment: "usd<=1", concept: "price" },
    SlangEntry { phrase: "under a dollar", fragment: "usd<1", concept: "price" },
    SlangEntry { phrase: "bulk", fragment: "usd<=0.5", concept: "price" },
    // Triggers and text shorthands
    SlangEntry { phrase: "etb", fragment: "o:\"enters the battlefield\"", concept: "etb" },
    SlangEntry { phrase: "enter the battlefield", fragment: "o:\"enters the battlefield\"", concept: "etb" },
    SlangEntry { phrase: "enters the battlefield", fragment: "o:\"enters the battlefield\"", concept: "etb" },
    SlangEntry { phrase: "ltb", fragment: "o:\"leaves the battlefield\"", concept: "ltb" },
    SlangEntry { phrase: "cast trigger", fragment: "o:\"whenever you cast\"", concept: "cast-trigger" },
    // Card predicates
    SlangEntry { phrase: "reserved list", fragment: "is:reserved", concept: "reserved" },
    SlangEntry { phrase: "fetch lands", fragment: "is:fetchland", concept: "land-cycle" },
    SlangEntry { phrase: "fetchlands", fragment: "is:fetchland", concept: "land-cycle" },
    SlangEntry { phrase: "shock lands", fragment: "is:shockland", concept: "land-cycle" },
    SlangEntry { phrase: "shocklands", fragment: "is:shockland", concept: "land-cycle" },
    SlangEntry { phrase: "dual lands", fragment: "is:dual", concept: "land-cycle" },
    SlangEntry { phrase: "bounce lands", fragment: "is:bounceland", concept: "land-cycle" },
    SlangEntry { phrase: "french vanilla", fragment: "is:frenchvanilla", concept: "vanilla" },
    SlangEntry { phrase: "vanilla creatures", fragment: "is:vanilla", concept: "vanilla" },
    SlangEntry { phrase: "commanders", fragment: "is:commander", concept: "commander" },
    SlangEntry { phrase: "mdfc", fragment: "is:mdfc", concept: "layout" },
    SlangEntry { phrase: "dfc", fragment: "is:dfc", concept: "layout" },
    SlangEntry { phrase: "pw", fragment: "t:planeswalker", concept: "type-planeswalker" },
];

// ============================================================================
// Constants - Tag-First Concepts
// ============================================================================

/// Ordered; earlier patterns win overlapping text.
pub const CONCEPTS: &[ConceptPattern] = &[
    ConceptPattern {
        pattern: r"\b(?:board ?wipes?|wraths?|mass removal|destroy all creatures)\b",
        tag: "board-wipe",
        fallback: "o:\"destroy all\"",
    },
    ConceptPattern {
        pattern: r"\bsweepers?\b",
        tag: "sweeper",
        fallback: "o:\"damage to each creature\"",
    },
    ConceptPattern {
        pattern: r"\b(?:counter ?spells?|counter magic|counter target spell)\b",
        tag: "counterspell",
        fallback: "o:\"counter target spell\"",
    },
    ConceptPattern {
        pattern: r"\bmana rocks?\b",
        tag: "mana-rock",
        fallback: "t:artifact o:\"{T}: Add\"",
    },
    ConceptPattern {
        pattern: r"\bmana (?:dorks?|elves|creatures)\b",
        tag: "mana-dork",
        fallback: "t:creature o:\"{T}: Add\"",
    },
    ConceptPattern {
        pattern: r"\b(?:land ramp|mana ramp|ramp)\b",
        tag: "ramp",
        fallback: "o:\"search your library for a basic land\"",
    },
    ConceptPattern {
        pattern: r"\b(?:card draw|card advantage|draws? (?:a |extra |more |additional )?cards?|drawing cards)\b",
        tag: "draw",
        fallback: "o:\"draw a card\"",
    },
    ConceptPattern {
        pattern: r"\bcantrips?\b",
        tag: "cantrip",
        fallback: "o:\"draw a card\" mv<=2",
    },
    ConceptPattern {
        pattern: r"\b(?:looting|loot effects?|rummage|rummaging)\b",
        tag: "looting",
        fallback: "o:\"draw\" o:\"discard\"",
    },
    ConceptPattern {
        pattern: r"\bwheels?\b",
        tag: "wheel",
        fallback: "o:\"each player discards their hand\"",
    },
    ConceptPattern {
        pattern: r"\b(?:spot removal|creature removal|kill spells?|removal)\b",
        tag: "removal",
        fallback: "o:\"destroy target\"",
    },
    ConceptPattern {
        pattern: r"\b(?:tutors?|search (?:your|my) library)\b",
        tag: "tutor",
        fallback: "o:\"search your library\"",
    },
    ConceptPattern {
        pattern: r"\b(?:life ?gain|gain(?:s|ing)? life)\b",
        tag: "lifegain",
        fallback: "o:\"gain\" o:\"life\"",
    },
    ConceptPattern {
        pattern: r"\b(?:token (?:makers?|generators?|generation)|makes? tokens|create tokens)\b",
        tag: "token-generator",
        fallback: "o:\"create\" o:\"token\"",
    },
    ConceptPattern {
        pattern: r"\b(?:reanimat(?:e|ion)|return creatures? from (?:the |your )?graveyard)\b",
        tag: "reanimation",
        fallback: "o:\"from your graveyard to the battlefield\"",
    },
    ConceptPattern {
        pattern: r"\b(?:flicker|blink)(?:s|ing)?\b",
        tag: "flicker",
        fallback: "o:\"exile\" o:\"return\" o:\"to the battlefield\"",
    },
    ConceptPattern {
        pattern: r"\b(?:sac(?:rifice)? outlets?|free sac(?:rifice)?)\b",
        tag: "sacrifice-outlet",
        fallback: "o:\"sacrifice a creature:\"",
    },
    ConceptPattern {
        pattern: r"\bdeath triggers?\b",
        tag: "death-trigger",
        fallback: "o:\"dies\"",
    },
    ConceptPattern {
        pattern: r"\bgraveyard hate\b",
        tag: "graveyard-hate",
        fallback: "o:\"exile\" o:\"graveyard\"",
    },
    ConceptPattern {
        pattern: r"\bself[- ]mill\b",
        tag: "self-mill",
        fallback: "o:\"mill\"",
    },
    ConceptPattern {
        pattern: r"\bmill(?:s|ing)?\b",
        tag: "mill",
        fallback: "o:\"mill\"",
    },
    ConceptPattern {
        pattern: r"\b(?:hand disruption|discard)\b",
        tag: "discard",
        fallback: "o:\"discards\"",
    },
    ConceptPattern {
        pattern: r"\bextra turns?\b",
        tag: "extra-turn",
        fallback: "o:\"extra turn\"",
    },
    ConceptPattern {
        pattern: r"\bextra combats?\b",
        tag: "extra-combat",
        fallback: "o:\"additional combat phase\"",
    },
    ConceptPattern {
        pattern: r"\b(?:burn|deals? damage to any target)\b",
        tag: "burn",
        fallback: "o:\"damage to any target\"",
    },
    ConceptPattern {
        pattern: r"\banthems?\b",
        tag: "anthem",
        fallback: "o:\"creatures you control get +\"",
    },
    ConceptPattern {
        pattern: r"\bclones?\b",
        tag: "clone",
        fallback: "o:\"copy of\"",
    },
    ConceptPattern {
        pattern: r"\bproliferate\b",
        tag: "proliferate",
        fallback: "o:\"proliferate\"",
    },
    ConceptPattern {
        pattern: r"\bfogs?\b",
        tag: "fog",
        fallback: "o:\"prevent all combat damage\"",
    },
    ConceptPattern {
        pattern: r"\b(?:steal|theft|gain control)\b",
        tag: "theft",
        fallback: "o:\"gain control of\"",
    },
    ConceptPattern {
        pattern: r"\b(?:bounce|return to hand)\b",
        tag: "bounce",
        fallback: "o:\"return target\" o:\"to its owner's hand\"",
    },
    ConceptPattern {
        pattern: r"\b(?:treasure makers?|makes? treasures?)\b",
        tag: "treasure-maker",
        fallback: "o:\"treasure token\"",
    },
    ConceptPattern {
        pattern: r"\bcost reduc(?:ers?|tion)\b",
        tag: "cost-reducer",
        fallback: "o:\"costs\" o:\"less to cast\"",
    },
    ConceptPattern {
        pattern: r"\b(?:win cons?|win conditions?|alt(?:ernate)? wins?)\b",
        tag: "win-condition",
        fallback: "o:\"you win the game\"",
    },
];

// ============================================================================
// Constants - Archetypes
// ============================================================================

pub const ARCHETYPES: &[ArchetypeEntry] = &[
    ArchetypeEntry {
        name: "aristocrats",
        pattern: r"\baristocrats?\b",
        fragment: "(otag:sacrifice-outlet OR o:\"whenever another creature you control dies\")",
    },
    ArchetypeEntry {
        name: "spellslinger",
        pattern: r"\b(?:spell ?slingers?|spells matter)\b",
        fragment: "(otag:spellslinger-payoff OR o:\"whenever you cast an instant or sorcery\")",
    },
    ArchetypeEntry {
        name: "voltron",
        pattern: r"\bvoltron\b",
        fragment: "(t:equipment OR (t:aura o:\"enchanted creature gets\"))",
    },
    ArchetypeEntry {
        name: "go-wide",
        pattern: r"\b(?:go(?:ing)? wide|tokens? (?:deck|strategy|theme))\b",
        fragment: "(otag:token-generator OR otag:anthem)",
    },
    ArchetypeEntry {
        name: "reanimator",
        pattern: r"\breanimator\b",
        fragment: "(otag:reanimation OR otag:self-mill)",
    },
    ArchetypeEntry {
        name: "storm",
        pattern: r"\bstorm (?:deck|strategy|payoffs?)\b",
        fragment: "(kw:storm OR otag:ritual OR otag:cost-reducer)",
    },
    ArchetypeEntry {
        name: "lands-matter",
        pattern: r"\b(?:lands matter|landfall (?:deck|payoffs?))\b",
        fragment: "(otag:landfall OR otag:extra-land-drop)",
    },
    ArchetypeEntry {
        name: "counters",
        pattern: r"\b(?:\+1/\+1 )?counters (?:matter|deck|theme)\b",
        fragment: "(otag:counters-matter OR otag:proliferate)",
    },
    ArchetypeEntry {
        name: "group-hug",
        pattern: r"\bgroup hug\b",
        fragment: "otag:group-hug",
    },
    ArchetypeEntry {
        name: "pillowfort",
        pattern: r"\bpillow ?fort\b",
        fragment: "(otag:pillowfort OR o:\"can't attack you\")",
    },
    ArchetypeEntry {
        name: "stax",
        pattern: r"\bstax\b",
        fragment: "(otag:stax OR otag:tax)",
    },
    ArchetypeEntry {
        name: "enchantress",
        pattern: r"\b(?:enchantress|enchantments matter)\b",
        fragment: "(otag:enchantress OR o:\"whenever you cast an enchantment\")",
    },
    ArchetypeEntry {
        name: "artifacts",
        pattern: r"\bartifacts? (?:matter|deck|synergy)\b",
        fragment: "otag:artifact-synergy",
    },
    ArchetypeEntry {
        name: "lifegain",
        pattern: r"\bsoul sisters\b",
        fragment: "otag:lifegain-payoff",
    },
];

// ============================================================================
// Constants - Cards Like X
// ============================================================================

/// Phrases that introduce a reference card.
pub const LIKE_TRIGGER: &str =
    r"\b(?:cards? (?:like|similar to)|similar to|alternatives? (?:to|for)|replacements? for|like)\s+";

/// Minimum Jaro-Winkler similarity for a misspelled card name.
pub const CARD_NAME_SIMILARITY: f64 = 0.92;

/// Longest card name, in words, the resolver tries after a trigger.
pub const MAX_CARD_NAME_WORDS: usize = 5;

pub const CARDS_LIKE: &[CardProfile] = &[
    CardProfile { name: "sol ring", fragment: "otag:mana-rock mv<=2 -!\"Sol Ring\"", concept: "mana-rock" },
    CardProfile { name: "arcane signet", fragment: "otag:mana-rock mv<=2 -!\"Arcane Signet\"", concept: "mana-rock" },
    CardProfile { name: "llanowar elves", fragment: "otag:mana-dork mv<=1 -!\"Llanowar Elves\"", concept: "mana-dork" },
    CardProfile { name: "birds of paradise", fragment: "otag:mana-dork mv<=1 -!\"Birds of Paradise\"", concept: "mana-dork" },
    CardProfile { name: "cultivate", fragment: "otag:land-ramp t:sorcery -!\"Cultivate\"", concept: "ramp" },
    CardProfile { name: "rampant growth", fragment: "otag:land-ramp mv<=2 -!\"Rampant Growth\"", concept: "ramp" },
    CardProfile { name: "lightning bolt", fragment: "otag:burn t:instant mv<=1 -!\"Lightning Bolt\"", concept: "burn" },
    CardProfile { name: "counterspell", fragment: "otag:counterspell mv<=2 -!\"Counterspell\"", concept: "counterspell" },
    CardProfile { name: "swords to plowshares", fragment: "otag:exile-removal t:instant mv<=1 -!\"Swords to Plowshares\"", concept: "removal" },
    CardProfile { name: "path to exile", fragment: "otag:exile-removal t:instant mv<=1 -!\"Path to Exile\"", concept: "removal" },
    CardProfile { name: "doom blade", fragment: "otag:creature-removal t:instant mv<=2 -!\"Doom Blade\"", concept: "removal" },
    CardProfile { name: "beast within", fragment: "otag:removal t:instant -!\"Beast Within\"", concept: "removal" },
    CardProfile { name: "wrath of god", fragment: "otag:board-wipe -!\"Wrath of God\"", concept: "board-wipe" },
    CardProfile { name: "cyclonic rift", fragment: "otag:mass-bounce -!\"Cyclonic Rift\"", concept: "bounce" },
    CardProfile { name: "demonic tutor", fragment: "otag:tutor mv<=2 -!\"Demonic Tutor\"", concept: "tutor" },
    CardProfile { name: "vampiric tutor", fragment: "otag:tutor t:instant -!\"Vampiric Tutor\"", concept: "tutor" },
    CardProfile { name: "rhystic study", fragment: "otag:draw t:enchantment -!\"Rhystic Study\"", concept: "draw" },
    CardProfile { name: "phyrexian arena", fragment: "otag:draw t:enchantment -!\"Phyrexian Arena\"", concept: "draw" },
    CardProfile { name: "brainstorm", fragment: "otag:card-selection t:instant mv<=1 -!\"Brainstorm\"", concept: "draw" },
    CardProfile { name: "ponder", fragment: "otag:cantrip mv<=1 -!\"Ponder\"", concept: "cantrip" },
    CardProfile { name: "skullclamp", fragment: "t:equipment otag:draw -!\"Skullclamp\"", concept: "draw" },
    CardProfile { name: "reanimate", fragment: "otag:reanimation mv<=2 -!\"Reanimate\"", concept: "reanimation" },
    CardProfile { name: "animate dead", fragment: "otag:reanimation t:enchantment -!\"Animate Dead\"", concept: "reanimation" },
    CardProfile { name: "ephemerate", fragment: "otag:flicker t:instant -!\"Ephemerate\"", concept: "flicker" },
    CardProfile { name: "viscera seer", fragment: "otag:sacrifice-outlet t:creature -!\"Viscera Seer\"", concept: "sacrifice-outlet" },
    CardProfile { name: "blood artist", fragment: "otag:death-trigger otag:drain -!\"Blood Artist\"", concept: "death-trigger" },
    CardProfile { name: "doubling season", fragment: "(otag:token-doubler OR otag:counter-doubler) -!\"Doubling Season\"", concept: "token-doubler" },
    CardProfile { name: "anointed procession", fragment: "otag:token-doubler -!\"Anointed Procession\"", concept: "token-doubler" },
    CardProfile { name: "smothering tithe", fragment: "otag:treasure-maker -!\"Smothering Tithe\"", concept: "treasure-maker" },
    CardProfile { name: "lightning greaves", fragment: "(otag:haste-granter OR otag:hexproof-granter) t:equipment -!\"Lightning Greaves\"", concept: "protection" },
    CardProfile { name: "heroic intervention", fragment: "otag:indestructible-granter t:instant -!\"Heroic Intervention\"", concept: "protection" },
    CardProfile { name: "craterhoof behemoth", fragment: "otag:pump t:creature mv>=6 -!\"Craterhoof Behemoth\"", concept: "win-condition" },
    CardProfile { name: "thassa's oracle", fragment: "otag:alt-win -!\"Thassa's Oracle\"", concept: "win-condition" },
    CardProfile { name: "sensei's divining top", fragment: "otag:card-selection t:artifact -!\"Sensei's Divining Top\"", concept: "card-selection" },
    CardProfile { name: "lim-dul's vault", fragment: "otag:tutor otag:card-selection -!\"Lim-Dûl's Vault\"", concept: "tutor" },
];

// ============================================================================
// Constants - Keyword Abilities
// ============================================================================

pub const KEYWORDS: &[KeywordEntry] = &[
    KeywordEntry { pattern: r"\b(?:flying|fliers|flyers)\b", keyword: "flying" },
    KeywordEntry { pattern: r"\bfirst strike\b", keyword: "first strike" },
    KeywordEntry { pattern: r"\bdouble strike\b", keyword: "double strike" },
    KeywordEntry { pattern: r"\bdeathtouch\b", keyword: "deathtouch" },
    KeywordEntry { pattern: r"\blifelink\b", keyword: "lifelink" },
    KeywordEntry { pattern: r"\btrample\b", keyword: "trample" },
    KeywordEntry { pattern: r"\b(?:haste|hasty)\b", keyword: "haste" },
    KeywordEntry { pattern: r"\bvigilance\b", keyword: "vigilance" },
    KeywordEntry { pattern: r"\breach\b", keyword: "reach" },
    KeywordEntry { pattern: r"\bmenace\b", keyword: "menace" },
    KeywordEntry { pattern: r"\bhexproof\b", keyword: "hexproof" },
    KeywordEntry { pattern: r"\bshroud\b", keyword: "shroud" },
    KeywordEntry { pattern: r"\bindestructible\b", keyword: "indestructible" },
    KeywordEntry { pattern: r"\bflash\b", keyword: "flash" },
    KeywordEntry { pattern: r"\bdefenders?\b", keyword: "defender" },
    KeywordEntry { pattern: r"\bward\b", keyword: "ward" },
    KeywordEntry { pattern: r"\bprowess\b", keyword: "prowess" },
    KeywordEntry { pattern: r"\bcascade\b", keyword: "cascade" },
    KeywordEntry { pattern: r"\bconvoke\b", keyword: "convoke" },
    KeywordEntry { pattern: r"\bcycling\b", keyword: "cycling" },
    KeywordEntry { pattern: r"\bflashback\b", keyword: "flashback" },
    KeywordEntry { pattern: r"\bstorm\b", keyword: "storm" },
    KeywordEntry { pattern: r"\binfect\b", keyword: "infect" },
    KeywordEntry { pattern: r"\bannihilator\b", keyword: "annihilator" },
    KeywordEntry { pattern: r"\bundying\b", keyword: "undying" },
    KeywordEntry { pattern: r"\bpersist\b", keyword: "persist" },
    KeywordEntry { pattern: r"\bdelve\b", keyword: "delve" },
    KeywordEntry { pattern: r"\bkicker\b", keyword: "kicker" },
    KeywordEntry { pattern: r"\bmorph\b", keyword: "morph" },
    KeywordEntry { pattern: r"\bninjutsu\b", keyword: "ninjutsu" },
    KeywordEntry { pattern: r"\baffinity\b", keyword: "affinity" },
    KeywordEntry { pattern: r"\bexalted\b", keyword: "exalted" },
    KeywordEntry { pattern: r"\bevolve\b", keyword: "evolve" },
    KeywordEntry { pattern: r"\bmentor\b", keyword: "mentor" },
    KeywordEntry { pattern: r"\bpartner\b", keyword: "partner" },
    KeywordEntry { pattern: r"\bchangeling\b", keyword: "changeling" },
    KeywordEntry { pattern: r"\bcrew\b", keyword: "crew" },
    KeywordEntry { pattern: r"\bescape\b", keyword: "escape" },
    KeywordEntry { pattern: r"\bforetell\b", keyword: "foretell" },
    KeywordEntry { pattern: r"\bmutate\b", keyword: "mutate" },
    KeywordEntry { pattern: r"\bsuspend\b", keyword: "suspend" },
    KeywordEntry { pattern: r"\bmadness\b", keyword: "madness" },
    KeywordEntry { pattern: r"\bdredge\b", keyword: "dredge" },
];

// ============================================================================
// Constants - Card Attributes
// ============================================================================

/// `mono <color>` phrases map to an exact color match.
pub const MONO_COLORS: &[(&str, &str)] = &[
    ("white", "w"),
    ("blue", "u"),
    ("black", "b"),
    ("red", "r"),
    ("green", "g"),
];

/// Guild, shard and wedge names map to a color identity bound.
pub const COLOR_GROUPS: &[&str] = &[
    "azorius", "dimir", "rakdos", "gruul", "selesnya", "orzhov", "izzet", "golgari", "boros",
    "simic", "esper", "grixis", "jund", "naya", "bant", "abzan", "jeskai", "sultai", "mardu",
    "temur",
];

/// Creature types recognized in singular and plural form.
pub const CREATURE_TYPES: &[(&str, &str)] = &[
    ("elf", "elf"),
    ("elves", "elf"),
    ("goblin", "goblin"),
    ("goblins", "goblin"),
    ("dragon", "dragon"),
    ("dragons", "dragon"),
    ("zombie", "zombie"),
    ("zombies", "zombie"),
    ("vampire", "vampire"),
    ("vampires", "vampire"),
    ("angel", "angel"),
    ("angels", "angel"),
    ("demon", "demon"),
    ("demons", "demon"),
    ("merfolk", "merfolk"),
    ("wizard", "wizard"),
    ("wizards", "wizard"),
    ("knight", "knight"),
    ("knights", "knight"),
    ("soldier", "soldier"),
    ("soldiers", "soldier"),
    ("sliver", "sliver"),
    ("slivers", "sliver"),
    ("dinosaur", "dinosaur"),
    ("dinosaurs", "dinosaur"),
    ("spirit", "spirit"),
    ("spirits", "spirit"),
    ("human", "human"),
    ("humans", "human"),
    ("beast", "beast"),
    ("beasts", "beast"),
    ("elemental", "elemental"),
    ("elementals", "elemental"),
    ("faerie", "faerie"),
    ("faeries", "faerie"),
    ("pirate", "pirate"),
    ("pirates", "pirate"),
    ("cat", "cat"),
    ("cats", "cat"),
];

/// Mana-value phrasings, tried in order. `{n}` is the captured number.
pub const MANA_VALUE_PATTERNS: &[(&str, &str)] = &[
    (r"\b(\d+) (?:mana|cmc|mv|mana value) or (?:less|fewer|lower|under)\b", "mv<={n}"),
    (r"\b(?:under|less than|below|fewer than) (\d+) (?:mana|cmc|mv)\b", "mv<{n}"),
    (r"\b(\d+) (?:mana|cmc|mv|mana value) or (?:more|greater|higher)\b", "mv>={n}"),
    (r"\b(?:over|more than|above) (\d+) (?:mana|cmc|mv)\b", "mv>{n}"),
    (r"\b(?:cmc|mv|mana value) (?:of )?(\d+)\b", "mv={n}"),
    (r"\b(\d+)(?: mana|-drops?| drops?| cmc)\b", "mv={n}"),
    (r"\b(?:cheap|low cost|low curve)\b", "mv<=3"),
    (r"\b(?:expensive|high cost)\b", "mv>=5"),
];

/// Words left over after matching that carry no meaning on their own.
pub const REMAINDER_STOP_WORDS: &[&str] = &[
    "deck", "decks", "spells", "spell", "effects", "effect", "stuff", "things", "good", "best",
    "like", "similar", "but", "also", "can", "could", "would", "please", "what", "whats",
    "there", "any", "it", "its", "them", "they", "you", "your", "from", "by", "at", "as", "be",
    "do", "does", "play", "playing", "run", "running", "use", "using", "other", "more",
];
