//! Compiled pattern library types.
//!
//! Everything here has already passed load-time validation, so scoring code
//! can rely on every referenced dimension existing and every regex compiling.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use lead_core::types::FxHashSet;

/// How a rule finds occurrences in normalized (lowercased) text.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Lowercased substring.
    Literal(String),
    /// Case-insensitive regular expression.
    Regex(Regex),
}

impl Matcher {
    pub fn literal(text: &str) -> Self {
        Self::Literal(text.to_lowercase())
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map(Self::Regex)
    }

    /// Number of non-overlapping matches.
    pub fn count(&self, text: &str) -> usize {
        match self {
            Self::Literal(lit) if lit.is_empty() => 0,
            Self::Literal(lit) => text.matches(lit.as_str()).count(),
            Self::Regex(re) => re.find_iter(text).count(),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Literal(lit) => !lit.is_empty() && text.contains(lit.as_str()),
            Self::Regex(re) => re.is_match(text),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(lit) => lit,
            Self::Regex(re) => re.as_str(),
        }
    }
}

/// A weighted matcher inside a pattern set.
#[derive(Debug, Clone)]
pub struct Rule {
    pub label: String,
    pub matcher: Matcher,
    /// May be negative.
    pub weight: f64,
}

impl Rule {
    pub fn literal(label: impl Into<String>, text: &str, weight: f64) -> Self {
        Self {
            label: label.into(),
            matcher: Matcher::literal(text),
            weight,
        }
    }

    pub fn regex(label: impl Into<String>, pattern: &str, weight: f64) -> Result<Self, regex::Error> {
        Ok(Self {
            label: label.into(),
            matcher: Matcher::regex(pattern)?,
            weight,
        })
    }
}

/// Whether a dimension adds to the weighted sum or subtracts after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
    #[default]
    Positive,
    /// Raw sum is applied unweighted and never clamped.
    Penalty,
}

/// Ordered rules scoring one dimension.
#[derive(Debug, Clone)]
pub struct PatternSet {
    pub name: String,
    pub kind: DimensionKind,
    pub cap: Option<f64>,
    pub rules: Vec<Rule>,
}

impl PatternSet {
    pub fn new(name: impl Into<String>, kind: DimensionKind, cap: Option<f64>) -> Self {
        Self {
            name: name.into(),
            kind,
            cap,
            rules: Vec::new(),
        }
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn is_penalty(&self) -> bool {
        self.kind == DimensionKind::Penalty
    }
}

/// Context signals that scale the weighted base.
#[derive(Debug, Clone)]
pub struct ContextRules {
    /// Lowercased community names.
    pub high_value_communities: FxHashSet<String>,
    pub community_multiplier: f64,
    pub professional_terms: Vec<String>,
    /// Distinct professional terms required before the multiplier applies.
    pub professional_min_hits: usize,
    pub professional_multiplier: f64,
}

impl Default for ContextRules {
    fn default() -> Self {
        Self {
            high_value_communities: FxHashSet::default(),
            community_multiplier: 1.0,
            professional_terms: Vec::new(),
            professional_min_hits: 1,
            professional_multiplier: 1.0,
        }
    }
}

/// Where a flat boost gets its raw value.
#[derive(Debug, Clone)]
pub enum BoostSource {
    /// Points per distinct term present in the text.
    Terms(Vec<(String, f64)>),
    /// Scaled score of another dimension.
    Dimension { name: String, scale: f64 },
    /// Scaled engagement quality of the item.
    Engagement { scale: f64 },
    /// Scaled semantic relevance. Only applies with semantic analysis enabled.
    Semantic { scale: f64 },
}

/// A flat additive boost with its own cap.
#[derive(Debug, Clone)]
pub struct BoostRule {
    pub name: String,
    pub cap: f64,
    pub source: BoostSource,
}

/// Weights, caps, and thresholds for one service type.
#[derive(Debug, Clone)]
pub struct ScoringProfile {
    pub name: String,
    pub description: String,
    /// Positive dimensions, each with a weight.
    pub dimensions: Vec<String>,
    pub weights: BTreeMap<String, f64>,
    pub penalty_dimensions: Vec<String>,
    pub qualification_threshold: f64,
    /// Core relevance vocabulary for the pre-filter.
    pub vocabulary: Vec<String>,
    /// Words that select this profile from a service description.
    pub service_keywords: Vec<String>,
    pub context: ContextRules,
    pub boosts: Vec<BoostRule>,
}

impl ScoringProfile {
    pub fn weight(&self, dimension: &str) -> f64 {
        self.weights.get(dimension).copied().unwrap_or(0.0)
    }

    /// Every dimension this profile scores, positive first.
    pub fn all_dimensions(&self) -> impl Iterator<Item = &str> {
        self.dimensions
            .iter()
            .chain(self.penalty_dimensions.iter())
            .map(String::as_str)
    }
}

/// Advisor / content-creator detection settings.
#[derive(Debug, Clone)]
pub struct AdvisorRules {
    pub text_patterns: Vec<Matcher>,
    pub title_patterns: Vec<Matcher>,
    pub min_indicators: usize,
    /// More question comments than this add `question_bonus` indicators.
    pub question_comment_threshold: usize,
    pub question_bonus: usize,
    /// Fixed score given to filtered items.
    pub filtered_score: f64,
}

impl Default for AdvisorRules {
    fn default() -> Self {
        Self {
            text_patterns: Vec::new(),
            title_patterns: Vec::new(),
            min_indicators: 2,
            question_comment_threshold: 3,
            question_bonus: 2,
            filtered_score: 3.0,
        }
    }
}

/// Term lists for the semantic relevance boost.
#[derive(Debug, Clone)]
pub struct SemanticRules {
    pub service_terms: Vec<String>,
    pub need_terms: Vec<String>,
    pub service_points: f64,
    pub need_points: f64,
    pub title_points: f64,
    pub cap: f64,
}

impl Default for SemanticRules {
    fn default() -> Self {
        Self {
            service_terms: Vec::new(),
            need_terms: Vec::new(),
            service_points: 5.0,
            need_points: 4.0,
            title_points: 3.0,
            cap: 25.0,
        }
    }
}

/// Validated, read-only collection of pattern sets and profiles.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    pub version: Option<String>,
    pub sets: BTreeMap<String, PatternSet>,
    pub profiles: BTreeMap<String, ScoringProfile>,
    pub default_profile: String,
    /// Generic business terms that keep an item past the relevance pre-filter.
    pub business_terms: Vec<String>,
    pub advisor: AdvisorRules,
    pub semantic: SemanticRules,
}

impl PatternLibrary {
    pub fn set(&self, name: &str) -> Option<&PatternSet> {
        self.sets.get(name)
    }

    pub fn profile(&self, name: &str) -> Option<&ScoringProfile> {
        self.profiles.get(name)
    }

    pub fn default_profile(&self) -> Option<&ScoringProfile> {
        self.profiles.get(&self.default_profile)
    }

    /// Picks the profile for a free-text service description.
    ///
    /// An exact profile name wins; otherwise the profile with the most
    /// service keyword hits (10 points each, ties to the first by name);
    /// no hits at all falls back to the default profile.
    pub fn select_profile(&self, service: &str) -> Option<&ScoringProfile> {
        let wanted = service.trim().to_lowercase();
        if let Some(profile) = self.profiles.get(&wanted) {
            return Some(profile);
        }

        let mut best: Option<(&ScoringProfile, u32)> = None;
        for profile in self.profiles.values() {
            let points = profile
                .service_keywords
                .iter()
                .filter(|k| wanted.contains(k.as_str()))
                .count() as u32
                * 10;
            if points == 0 {
                continue;
            }
            match best {
                Some((_, top)) if top >= points => {}
                _ => best = Some((profile, points)),
            }
        }
        best.map(|(p, _)| p).or_else(|| self.default_profile())
    }
}
