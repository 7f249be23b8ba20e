//! Substring-only pre-filter.
//!
//! Every check here is a length test, an id lookup, or an Aho-Corasick scan,
//! so most irrelevant items never reach regex scoring.

use std::fmt;

use aho_corasick::AhoCorasick;

use lead_core::traits::ExclusionList;
use lead_core::types::ContentItem;

use crate::patterns::{PatternLibrary, ScoringProfile};

/// Why an item was dropped before scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TooShort { len: usize, min: usize },
    Deleted,
    Excluded,
    Irrelevant,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len, min } => write!(f, "text too short ({len} < {min} chars)"),
            Self::Deleted => f.write_str("deleted or removed post"),
            Self::Excluded => f.write_str("already saved"),
            Self::Irrelevant => f.write_str("no relevant vocabulary"),
        }
    }
}

/// Pre-filter built for one profile.
#[derive(Debug, Clone)]
pub struct PreFilter {
    min_text_length: usize,
    vocabulary: Option<AhoCorasick>,
    business_terms: Option<AhoCorasick>,
}

impl PreFilter {
    pub fn new(min_text_length: usize, vocabulary: &[String], business_terms: &[String]) -> Self {
        Self {
            min_text_length,
            vocabulary: build_automaton(vocabulary),
            business_terms: build_automaton(business_terms),
        }
    }

    pub fn for_profile(min_text_length: usize, library: &PatternLibrary, profile: &ScoringProfile) -> Self {
        Self::new(min_text_length, &profile.vocabulary, &library.business_terms)
    }

    /// Checks run in order: length, deletion, exclusion, relevance.
    pub fn check(
        &self,
        item: &ContentItem,
        text: &str,
        exclusions: &dyn ExclusionList,
    ) -> Result<(), Rejection> {
        let len = text.chars().count();
        if len < self.min_text_length {
            return Err(Rejection::TooShort {
                len,
                min: self.min_text_length,
            });
        }
        if item.is_deleted() {
            return Err(Rejection::Deleted);
        }
        if exclusions.is_excluded(&item.id) {
            return Err(Rejection::Excluded);
        }
        if !self.is_relevant(text) {
            return Err(Rejection::Irrelevant);
        }
        Ok(())
    }

    /// Any overlap with the profile vocabulary or the generic business terms.
    pub fn is_relevant(&self, text: &str) -> bool {
        let hits = |ac: &Option<AhoCorasick>| ac.as_ref().is_some_and(|ac| ac.is_match(text));
        hits(&self.vocabulary) || hits(&self.business_terms)
    }
}

fn build_automaton(terms: &[String]) -> Option<AhoCorasick> {
    if terms.is_empty() {
        return None;
    }
    match AhoCorasick::new(terms) {
        Ok(ac) => Some(ac),
        Err(e) => {
            tracing::warn!(error = %e, "could not build term automaton; terms ignored");
            None
        }
    }
}
