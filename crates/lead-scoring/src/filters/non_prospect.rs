//! Advisor / content-creator detection.
//!
//! People sharing their own expertise ("here's how I…", AMAs, tutorials)
//! use the same buying vocabulary as buyers but are not prospects.

use crate::patterns::AdvisorRules;

#[derive(Debug, Clone, Copy)]
pub struct NonProspectDetector<'a> {
    rules: &'a AdvisorRules,
}

impl<'a> NonProspectDetector<'a> {
    pub fn new(rules: &'a AdvisorRules) -> Self {
        Self { rules }
    }

    /// Advisor patterns present in the text, title indicators present in
    /// the title, plus the question bonus when many comments ask questions.
    pub fn indicator_count(&self, text: &str, title: &str, comment_question_count: usize) -> usize {
        let text_hits = self
            .rules
            .text_patterns
            .iter()
            .filter(|m| m.is_match(text))
            .count();
        let title_hits = self
            .rules
            .title_patterns
            .iter()
            .filter(|m| m.is_match(title))
            .count();
        let question_bonus = if comment_question_count > self.rules.question_comment_threshold {
            self.rules.question_bonus
        } else {
            0
        };
        text_hits + title_hits + question_bonus
    }

    pub fn is_non_prospect(&self, text: &str, title: &str, comment_question_count: usize) -> bool {
        self.indicator_count(text, title, comment_question_count) >= self.rules.min_indicators
    }

    /// Score given to filtered items.
    pub fn filtered_score(&self) -> f64 {
        self.rules.filtered_score
    }
}
