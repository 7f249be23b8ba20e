//! Declarative TOML pattern libraries, user-extensible without recompiling.
//!
//! Loading is fail-fast: a regex that does not compile, a rule without a
//! matcher, or a profile that disagrees with the library's dimensions is an
//! error at load, never a silent zero at scoring time.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use lead_core::config::LeadConfig;
use lead_core::constants::{DEFAULT_PROFILE, DEFAULT_QUALIFICATION_THRESHOLD};
use lead_core::errors::{PatternError, PipelineError, ProfileError};
use lead_core::types::FxHashSet;

use super::types::{
    AdvisorRules, BoostRule, BoostSource, ContextRules, DimensionKind, Matcher, PatternLibrary,
    PatternSet, Rule, ScoringProfile, SemanticRules,
};

/// Sample library compiled into the binary.
pub const DEFAULT_LIBRARY_TOML: &str = include_str!("default_library.toml");

/// Allowed drift of a profile's positive weights from 1.0 before a warning.
const WEIGHT_SUM_TOLERANCE: f64 = 0.05;

/// A TOML-defined rule. Exactly one of `literal` or `regex` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDef {
    pub label: Option<String>,
    pub literal: Option<String>,
    pub regex: Option<String>,
    pub weight: f64,
    #[serde(default)]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionDef {
    pub name: String,
    #[serde(default)]
    pub kind: DimensionKind,
    pub cap: Option<f64>,
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

/// An advisor indicator: a plain phrase or a regex.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorDef {
    Phrase(String),
    Regex { regex: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorDef {
    #[serde(default)]
    pub text_patterns: Vec<IndicatorDef>,
    #[serde(default)]
    pub title_patterns: Vec<IndicatorDef>,
    #[serde(default = "default_min_indicators")]
    pub min_indicators: usize,
    #[serde(default = "default_question_threshold")]
    pub question_comment_threshold: usize,
    #[serde(default = "default_question_bonus")]
    pub question_bonus: usize,
    #[serde(default = "default_filtered_score")]
    pub filtered_score: f64,
}

impl Default for AdvisorDef {
    fn default() -> Self {
        Self {
            text_patterns: Vec::new(),
            title_patterns: Vec::new(),
            min_indicators: default_min_indicators(),
            question_comment_threshold: default_question_threshold(),
            question_bonus: default_question_bonus(),
            filtered_score: default_filtered_score(),
        }
    }
}

fn default_min_indicators() -> usize {
    2
}

fn default_question_threshold() -> usize {
    3
}

fn default_question_bonus() -> usize {
    2
}

fn default_filtered_score() -> f64 {
    3.0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrefilterDef {
    #[serde(default)]
    pub business_terms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticDef {
    #[serde(default)]
    pub service_terms: Vec<String>,
    #[serde(default)]
    pub need_terms: Vec<String>,
    #[serde(default = "default_service_points")]
    pub service_points: f64,
    #[serde(default = "default_need_points")]
    pub need_points: f64,
    #[serde(default = "default_title_points")]
    pub title_points: f64,
    #[serde(default = "default_semantic_cap")]
    pub cap: f64,
}

impl Default for SemanticDef {
    fn default() -> Self {
        Self {
            service_terms: Vec::new(),
            need_terms: Vec::new(),
            service_points: default_service_points(),
            need_points: default_need_points(),
            title_points: default_title_points(),
            cap: default_semantic_cap(),
        }
    }
}

fn default_service_points() -> f64 {
    5.0
}

fn default_need_points() -> f64 {
    4.0
}

fn default_title_points() -> f64 {
    3.0
}

fn default_semantic_cap() -> f64 {
    25.0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextDef {
    #[serde(default)]
    pub high_value_communities: Vec<String>,
    pub community_multiplier: Option<f64>,
    #[serde(default)]
    pub professional_terms: Vec<String>,
    pub professional_min_hits: Option<usize>,
    pub professional_multiplier: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostKind {
    Terms,
    Dimension,
    Engagement,
    Semantic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostTermDef {
    pub term: String,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostDef {
    pub name: String,
    pub kind: BoostKind,
    pub cap: f64,
    #[serde(default)]
    pub terms: Vec<BoostTermDef>,
    pub dimension: Option<String>,
    pub scale: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub penalty_dimensions: Vec<String>,
    pub qualification_threshold: Option<f64>,
    #[serde(default)]
    pub vocabulary: Vec<String>,
    #[serde(default)]
    pub service_keywords: Vec<String>,
    #[serde(default)]
    pub context: ContextDef,
    #[serde(default)]
    pub boosts: Vec<BoostDef>,
}

/// A whole library file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryFile {
    pub version: Option<String>,
    pub default_profile: Option<String>,
    #[serde(default)]
    pub prefilter: PrefilterDef,
    #[serde(default)]
    pub advisor: AdvisorDef,
    #[serde(default)]
    pub semantic: SemanticDef,
    #[serde(default)]
    pub dimensions: Vec<DimensionDef>,
    #[serde(default)]
    pub profiles: Vec<ProfileDef>,
}

/// Loader for TOML pattern libraries.
pub struct LibraryLoader;

impl LibraryLoader {
    /// Load and validate a library from a TOML string.
    pub fn load_from_str(toml_str: &str) -> Result<PatternLibrary, PipelineError> {
        let file: LibraryFile =
            toml::from_str(toml_str).map_err(|e| PatternError::Parse(e.to_string()))?;
        Self::compile(file)
    }

    /// Load and validate a library from a file path.
    pub fn load_from_file(path: &Path) -> Result<PatternLibrary, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| PatternError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::load_from_str(&content)
    }

    /// The embedded sample library.
    pub fn load_default() -> Result<PatternLibrary, PipelineError> {
        Self::load_from_str(DEFAULT_LIBRARY_TOML)
    }

    /// Load the library named by `config.patterns`, falling back to the
    /// embedded sample, and apply the configured default profile.
    pub fn load_for_config(config: &LeadConfig) -> Result<PatternLibrary, PipelineError> {
        let mut library = match config.patterns.library_path.as_deref() {
            Some(path) => Self::load_from_file(Path::new(path))?,
            None => Self::load_default()?,
        };
        if let Some(ref name) = config.patterns.default_profile {
            if !library.profiles.contains_key(name) {
                return Err(ProfileError::MissingDefault(name.clone()).into());
            }
            library.default_profile = name.clone();
        }
        Ok(library)
    }

    /// Compile and validate a parsed library file.
    pub fn compile(file: LibraryFile) -> Result<PatternLibrary, PipelineError> {
        let mut sets = BTreeMap::new();
        for def in file.dimensions {
            let set = compile_set(def)?;
            if sets.contains_key(&set.name) {
                return Err(PatternError::DuplicateSet(set.name).into());
            }
            sets.insert(set.name.clone(), set);
        }

        let mut profiles = BTreeMap::new();
        for def in file.profiles {
            let profile = compile_profile(def, &sets)?;
            if profiles.contains_key(&profile.name) {
                return Err(ProfileError::Duplicate(profile.name).into());
            }
            profiles.insert(profile.name.clone(), profile);
        }

        let default_profile = file
            .default_profile
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        if !profiles.contains_key(&default_profile) {
            return Err(ProfileError::MissingDefault(default_profile).into());
        }

        let library = PatternLibrary {
            version: file.version,
            sets,
            profiles,
            default_profile,
            business_terms: lowercase_all(file.prefilter.business_terms),
            advisor: compile_advisor(file.advisor)?,
            semantic: compile_semantic(file.semantic)?,
        };

        tracing::info!(
            pattern_set_count = library.sets.len(),
            profile_count = library.profiles.len(),
            version = library.version.as_deref().unwrap_or("unversioned"),
            "pattern library loaded"
        );
        Ok(library)
    }
}

fn compile_set(def: DimensionDef) -> Result<PatternSet, PatternError> {
    if let Some(cap) = def.cap {
        if !cap.is_finite() || cap < 0.0 {
            return Err(PatternError::InvalidCap { set: def.name, cap });
        }
        if def.kind == DimensionKind::Penalty {
            tracing::warn!(set = %def.name, "cap on a penalty set is ignored");
        }
    }

    let mut set = PatternSet::new(def.name, def.kind, def.cap);
    for (index, rule) in def.rules.into_iter().enumerate() {
        if rule.enabled == Some(false) {
            continue;
        }
        set.rules.push(compile_rule(&set.name, index, rule)?);
    }
    Ok(set)
}

fn compile_rule(set: &str, index: usize, def: RuleDef) -> Result<Rule, PatternError> {
    let label = def
        .label
        .clone()
        .or_else(|| def.literal.clone())
        .unwrap_or_else(|| format!("rule_{index}"));

    if !def.weight.is_finite() {
        return Err(PatternError::InvalidRule {
            set: set.to_string(),
            rule: label,
            message: "weight must be a finite number".to_string(),
        });
    }

    let matcher = match (def.literal, def.regex) {
        (Some(lit), None) => {
            if lit.trim().is_empty() {
                return Err(PatternError::InvalidRule {
                    set: set.to_string(),
                    rule: label,
                    message: "literal must not be empty".to_string(),
                });
            }
            Matcher::literal(&lit)
        }
        (None, Some(pattern)) => compile_regex(set, &label, &pattern)?,
        _ => {
            return Err(PatternError::InvalidRule {
                set: set.to_string(),
                rule: label,
                message: "exactly one of `literal` or `regex` is required".to_string(),
            })
        }
    };

    Ok(Rule {
        label,
        matcher,
        weight: def.weight,
    })
}

fn compile_regex(set: &str, label: &str, pattern: &str) -> Result<Matcher, PatternError> {
    let matcher = Matcher::regex(pattern).map_err(|e| PatternError::Compilation {
        set: set.to_string(),
        rule: label.to_string(),
        message: e.to_string(),
    })?;
    // A pattern that matches "" would count a hit at every position.
    if matcher.is_match("") {
        return Err(PatternError::EmptyMatch {
            set: set.to_string(),
            rule: label.to_string(),
        });
    }
    Ok(matcher)
}

fn compile_indicators(set: &str, defs: Vec<IndicatorDef>) -> Result<Vec<Matcher>, PatternError> {
    defs.into_iter()
        .map(|def| match def {
            IndicatorDef::Phrase(phrase) if phrase.trim().is_empty() => {
                Err(PatternError::InvalidRule {
                    set: set.to_string(),
                    rule: "<empty>".to_string(),
                    message: "indicator phrase must not be empty".to_string(),
                })
            }
            IndicatorDef::Phrase(phrase) => Ok(Matcher::literal(&phrase)),
            IndicatorDef::Regex { regex } => compile_regex(set, &regex, &regex),
        })
        .collect()
}

fn compile_advisor(def: AdvisorDef) -> Result<AdvisorRules, PatternError> {
    if !def.filtered_score.is_finite() || !(0.0..=100.0).contains(&def.filtered_score) {
        return Err(PatternError::InvalidRule {
            set: "advisor".to_string(),
            rule: "filtered_score".to_string(),
            message: "must be within [0, 100]".to_string(),
        });
    }
    Ok(AdvisorRules {
        text_patterns: compile_indicators("advisor.text", def.text_patterns)?,
        title_patterns: compile_indicators("advisor.title", def.title_patterns)?,
        min_indicators: def.min_indicators.max(1),
        question_comment_threshold: def.question_comment_threshold,
        question_bonus: def.question_bonus,
        filtered_score: def.filtered_score,
    })
}

fn compile_semantic(def: SemanticDef) -> Result<SemanticRules, PatternError> {
    for (field, value) in [
        ("service_points", def.service_points),
        ("need_points", def.need_points),
        ("title_points", def.title_points),
        ("cap", def.cap),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(PatternError::InvalidRule {
                set: "semantic".to_string(),
                rule: field.to_string(),
                message: "must be a finite, non-negative number".to_string(),
            });
        }
    }
    Ok(SemanticRules {
        service_terms: lowercase_all(def.service_terms),
        need_terms: lowercase_all(def.need_terms),
        service_points: def.service_points,
        need_points: def.need_points,
        title_points: def.title_points,
        cap: def.cap,
    })
}

fn compile_profile(
    def: ProfileDef,
    sets: &BTreeMap<String, PatternSet>,
) -> Result<ScoringProfile, ProfileError> {
    let name = def.name;
    let invalid = |field: &str, message: String| ProfileError::InvalidValue {
        profile: name.clone(),
        field: field.to_string(),
        message,
    };

    for dimension in &def.dimensions {
        let set = sets.get(dimension).ok_or_else(|| ProfileError::UnknownDimension {
            profile: name.clone(),
            dimension: dimension.clone(),
        })?;
        if set.is_penalty() {
            return Err(invalid(
                "dimensions",
                format!("penalty set '{dimension}' belongs in penalty_dimensions"),
            ));
        }
        if !def.weights.contains_key(dimension) {
            return Err(ProfileError::MissingWeight {
                profile: name.clone(),
                dimension: dimension.clone(),
            });
        }
    }

    for (dimension, weight) in &def.weights {
        if !def.dimensions.contains(dimension) {
            return Err(ProfileError::UnknownDimension {
                profile: name.clone(),
                dimension: dimension.clone(),
            });
        }
        if !weight.is_finite() || *weight < 0.0 {
            return Err(invalid(
                "weights",
                format!("weight for '{dimension}' must be a finite, non-negative number"),
            ));
        }
    }

    let weight_sum: f64 = def.weights.values().sum();
    if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        tracing::warn!(profile = %name, weight_sum, "profile weights do not sum to 1.0");
    }

    for dimension in &def.penalty_dimensions {
        let set = sets.get(dimension).ok_or_else(|| ProfileError::UnknownDimension {
            profile: name.clone(),
            dimension: dimension.clone(),
        })?;
        if !set.is_penalty() {
            return Err(ProfileError::NotAPenalty {
                profile: name.clone(),
                dimension: dimension.clone(),
            });
        }
    }

    let qualification_threshold = def
        .qualification_threshold
        .unwrap_or(DEFAULT_QUALIFICATION_THRESHOLD);
    if !qualification_threshold.is_finite() || !(0.0..=100.0).contains(&qualification_threshold) {
        return Err(invalid(
            "qualification_threshold",
            "must be within [0, 100]".to_string(),
        ));
    }

    let context = compile_context(def.context).map_err(|message| invalid("context", message))?;

    let mut boosts = Vec::with_capacity(def.boosts.len());
    for boost in def.boosts {
        boosts.push(compile_boost(&name, boost, sets)?);
    }

    Ok(ScoringProfile {
        name: name.clone(),
        description: def.description,
        dimensions: def.dimensions,
        weights: def.weights,
        penalty_dimensions: def.penalty_dimensions,
        qualification_threshold,
        vocabulary: lowercase_all(def.vocabulary),
        service_keywords: lowercase_all(def.service_keywords),
        context,
        boosts,
    })
}

fn compile_context(def: ContextDef) -> Result<ContextRules, String> {
    let community_multiplier = def.community_multiplier.unwrap_or(1.0);
    let professional_multiplier = def.professional_multiplier.unwrap_or(1.0);
    for (field, value) in [
        ("community_multiplier", community_multiplier),
        ("professional_multiplier", professional_multiplier),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(format!("{field} must be a finite, positive number"));
        }
    }
    Ok(ContextRules {
        high_value_communities: def
            .high_value_communities
            .into_iter()
            .map(|c| c.trim().trim_start_matches("r/").to_lowercase())
            .collect::<FxHashSet<_>>(),
        community_multiplier,
        professional_terms: lowercase_all(def.professional_terms),
        professional_min_hits: def.professional_min_hits.unwrap_or(1).max(1),
        professional_multiplier,
    })
}

fn compile_boost(
    profile: &str,
    def: BoostDef,
    sets: &BTreeMap<String, PatternSet>,
) -> Result<BoostRule, ProfileError> {
    let invalid = |message: String| ProfileError::InvalidValue {
        profile: profile.to_string(),
        field: format!("boosts.{}", def.name),
        message,
    };

    if !def.cap.is_finite() || def.cap < 0.0 {
        return Err(invalid("cap must be a finite, non-negative number".to_string()));
    }
    let scale = def.scale.unwrap_or(1.0);
    if !scale.is_finite() {
        return Err(invalid("scale must be a finite number".to_string()));
    }

    let source = match def.kind {
        BoostKind::Terms => {
            if def.terms.is_empty() {
                return Err(invalid("terms boost needs at least one term".to_string()));
            }
            let mut terms = Vec::with_capacity(def.terms.len());
            for t in &def.terms {
                if t.term.trim().is_empty() || !t.points.is_finite() {
                    return Err(invalid(format!("bad term entry '{}'", t.term)));
                }
                terms.push((t.term.to_lowercase(), t.points));
            }
            BoostSource::Terms(terms)
        }
        BoostKind::Dimension => {
            let dimension = def
                .dimension
                .clone()
                .ok_or_else(|| invalid("dimension boost needs `dimension`".to_string()))?;
            if !sets.contains_key(&dimension) {
                return Err(ProfileError::UnknownDimension {
                    profile: profile.to_string(),
                    dimension,
                });
            }
            BoostSource::Dimension {
                name: dimension,
                scale,
            }
        }
        BoostKind::Engagement => BoostSource::Engagement { scale },
        BoostKind::Semantic => BoostSource::Semantic { scale },
    };

    Ok(BoostRule {
        name: def.name.clone(),
        cap: def.cap,
        source,
    })
}

fn lowercase_all(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
default_profile = "basic"

[[dimensions]]
name = "urgency"
cap = 50.0
rules = [{ literal = "asap", weight = 10.0 }]

[[dimensions]]
name = "negative"
kind = "penalty"
rules = [{ regex = '\bfree\b', weight = -10.0 }]

[[profiles]]
name = "basic"
dimensions = ["urgency"]
penalty_dimensions = ["negative"]
weights = { urgency = 1.0 }
"#;

    #[test]
    fn minimal_library_loads() {
        let lib = LibraryLoader::load_from_str(MINIMAL).unwrap();
        assert_eq!(lib.sets.len(), 2);
        assert!(lib.set("negative").unwrap().is_penalty());
        let profile = lib.profile("basic").unwrap();
        assert_eq!(profile.qualification_threshold, 70.0);
        assert_eq!(profile.all_dimensions().collect::<Vec<_>>(), vec!["urgency", "negative"]);
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let toml = MINIMAL.replace(
            r#"rules = [{ literal = "asap", weight = 10.0 }]"#,
            r#"rules = [{ literal = "asap", weight = 10.0 }, { regex = "(", weight = 1.0, enabled = false }]"#,
        );
        let lib = LibraryLoader::load_from_str(&toml).unwrap();
        assert_eq!(lib.set("urgency").unwrap().rules.len(), 1);
    }

    #[test]
    fn rule_label_defaults_to_literal() {
        let lib = LibraryLoader::load_from_str(MINIMAL).unwrap();
        assert_eq!(lib.set("urgency").unwrap().rules[0].label, "asap");
        assert_eq!(lib.set("negative").unwrap().rules[0].label, "rule_0");
    }

    #[test]
    fn embedded_default_library_is_valid() {
        let lib = LibraryLoader::load_default().unwrap();
        assert_eq!(lib.default_profile, "general");
        assert!(lib.default_profile().is_some());
        assert!(!lib.advisor.text_patterns.is_empty());
        assert!(!lib.business_terms.is_empty());
    }
}
