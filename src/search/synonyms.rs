//! Related-term table for semantic matching
//!
//! Maps a canonical term ("fasteners") to the words that stand for it in
//! item data ("screw", "bolt", "nail"). Lookups go both ways: a canonical
//! term expands to its related terms and a related term expands back to
//! its canonical term. Related terms are not expanded to their siblings,
//! so "screw" does not find "nail".

use crate::algorithms::normalize::normalize_text;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use smallvec::SmallVec;
use std::sync::Arc;

type Expansions = SmallVec<[String; 8]>;

/// Built-in building-supply vocabulary
const BUILTIN: &[(&str, &[&str])] = &[
    ("fasteners", &["screw", "bolt", "nail", "nut", "washer", "rivet", "anchor", "staple", "clip"]),
    ("hardware", &["hinge", "bracket", "latch", "handle", "hook", "screw", "bolt"]),
    ("lumber", &["wood", "board", "plank", "stud", "joist", "beam", "plywood", "timber"]),
    ("decking", &["deck", "board", "plank", "joist", "railing", "baluster"]),
    ("adhesive", &["glue", "epoxy", "caulk", "sealant", "cement"]),
    ("paint", &["primer", "stain", "varnish", "finish", "lacquer", "coating"]),
    ("tools", &["hammer", "drill", "saw", "wrench", "driver", "level", "brush", "chisel"]),
    ("electrical", &["wire", "cable", "outlet", "switch", "breaker", "conduit"]),
    ("plumbing", &["pipe", "valve", "fitting", "faucet", "coupling", "elbow"]),
    ("roofing", &["shingle", "flashing", "underlayment", "gutter", "drip edge"]),
    ("concrete", &["cement", "mortar", "grout", "rebar", "footing"]),
    ("insulation", &["batt", "foam", "fiberglass", "weatherstrip"]),
];

static BUILTIN_TABLE: Lazy<Arc<SynonymTable>> = Lazy::new(|| {
    let mut table = SynonymTable::new();
    for (canonical, related) in BUILTIN {
        table.insert(canonical, related.iter().copied());
    }
    Arc::new(table)
});

/// Bidirectional related-term lookup
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    expansions: AHashMap<String, Expansions>,
}

impl SynonymTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide built-in table, built on first use
    pub fn builtin() -> Arc<SynonymTable> {
        Arc::clone(&BUILTIN_TABLE)
    }

    /// Built-in table plus extra entries
    pub fn with_extra<'a, I, R>(extra: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, R)>,
        R: IntoIterator<Item = &'a str>,
    {
        let mut table = SynonymTable::clone(&BUILTIN_TABLE);
        for (canonical, related) in extra {
            table.insert(canonical, related);
        }
        table
    }

    /// Add related terms under a canonical term. Terms are normalized;
    /// empty terms and self-references are skipped.
    pub fn insert<'a, R>(&mut self, canonical: &str, related: R)
    where
        R: IntoIterator<Item = &'a str>,
    {
        let canonical = normalize_text(canonical);
        if canonical.is_empty() {
            return;
        }
        for term in related {
            let term = normalize_text(term);
            if term.is_empty() || term == canonical {
                continue;
            }
            push_unique(self.expansions.entry(canonical.clone()).or_default(), &term);
            push_unique(self.expansions.entry(term).or_default(), &canonical);
        }
    }

    /// Terms related to an already-normalized token
    pub fn expand(&self, token: &str) -> &[String] {
        self.expansions
            .get(token)
            .map(|e| e.as_slice())
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.expansions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expansions.is_empty()
    }
}

fn push_unique(list: &mut Expansions, term: &str) {
    if !list.iter().any(|t| t == term) {
        list.push(term.to_string());
    }
}
