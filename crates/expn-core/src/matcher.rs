//! Knowledge-base matcher
//!
//! Decides whether a free-text question is close enough to one of the
//! canonical questions to answer it from the knowledge base. Matching is a
//! pure function of the query, the knowledge base and the policy; a miss is
//! a normal outcome (`None`), never an error.
//!
//! Two policies are supported:
//!
//! - `Containment` (default): every query token must appear among the
//!   canonical question's tokens. "save groceries" matches
//!   "how to save on groceries"; "save electricity" does not.
//! - `FuzzyRatio`: normalized Levenshtein similarity between the lower-cased
//!   query and the lower-cased canonical question. The best score must be
//!   strictly greater than [`FUZZY_THRESHOLD`].
//!
//! A query with no word tokens never matches under either policy. When
//! several entries qualify, the first one in knowledge-base order wins.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::knowledge::{tokenize, KnowledgeBase, KnowledgeEntry};

/// Minimum (exclusive) similarity for the fuzzy-ratio policy
pub const FUZZY_THRESHOLD: f64 = 0.5;

/// How queries are compared against canonical questions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Query tokens must be a subset of the question's tokens
    #[default]
    Containment,
    /// Edit-similarity ratio must exceed the threshold
    FuzzyRatio,
}

impl MatchPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Containment => "containment",
            Self::FuzzyRatio => "fuzzy_ratio",
        }
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "containment" => Ok(Self::Containment),
            "fuzzy_ratio" | "fuzzy" => Ok(Self::FuzzyRatio),
            other => Err(format!(
                "Unknown match policy: {} (expected containment or fuzzy_ratio)",
                other
            )),
        }
    }
}

/// A successful lookup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KnowledgeMatch<'a> {
    /// Canonical question that matched
    pub question: &'a str,
    /// Canned answer for that question
    pub answer: &'a str,
    /// 1.0 for containment, the similarity ratio for fuzzy matching
    pub score: f64,
}

/// Matches queries against a knowledge base with a fixed policy
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'kb> {
    knowledge: &'kb KnowledgeBase,
    policy: MatchPolicy,
}

impl<'kb> Matcher<'kb> {
    pub fn new(knowledge: &'kb KnowledgeBase, policy: MatchPolicy) -> Self {
        Self { knowledge, policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Canned answer for the query, if any entry matches
    pub fn answer(&self, query: &str) -> Option<&'kb str> {
        self.find(query).map(|m| m.answer)
    }

    /// Best match for the query with the question and score that produced it
    pub fn find(&self, query: &str) -> Option<KnowledgeMatch<'kb>> {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            debug!("Query has no words, skipping knowledge base");
            return None;
        }

        let found = match self.policy {
            MatchPolicy::Containment => self.find_containment(&tokens),
            MatchPolicy::FuzzyRatio => self.find_fuzzy(&query.to_lowercase()),
        };

        match &found {
            Some(m) => debug!(
                policy = %self.policy,
                question = m.question,
                score = m.score,
                "Knowledge base match"
            ),
            None => debug!(policy = %self.policy, "No knowledge base match"),
        }

        found
    }

    fn find_containment(&self, tokens: &[String]) -> Option<KnowledgeMatch<'kb>> {
        self.knowledge
            .entries()
            .iter()
            .find(|entry| tokens.iter().all(|t| entry.tokens().contains(t)))
            .map(|entry| to_match(entry, 1.0))
    }

    fn find_fuzzy(&self, lowered_query: &str) -> Option<KnowledgeMatch<'kb>> {
        let mut best: Option<(&'kb KnowledgeEntry, f64)> = None;

        for entry in self.knowledge.entries() {
            let score = similarity(lowered_query, entry.lowered());
            // Strict comparison keeps the earliest entry on ties
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((entry, score));
            }
        }

        best.filter(|(_, score)| *score > FUZZY_THRESHOLD)
            .map(|(entry, score)| to_match(entry, score))
    }
}

fn to_match(entry: &KnowledgeEntry, score: f64) -> KnowledgeMatch<'_> {
    KnowledgeMatch {
        question: &entry.question,
        answer: &entry.answer,
        score,
    }
}

/// Normalized edit similarity in [0.0, 1.0]
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROCERIES: &str = "Try meal planning, bulk buying, and using discount coupons.";
    const ELECTRICITY: &str = "Use energy-efficient appliances, unplug devices, and optimize usage.";

    fn kb() -> KnowledgeBase {
        KnowledgeBase::embedded().unwrap()
    }

    #[test]
    fn test_empty_query_never_matches() {
        let kb = kb();
        for policy in [MatchPolicy::Containment, MatchPolicy::FuzzyRatio] {
            let matcher = Matcher::new(&kb, policy);
            assert_eq!(matcher.answer(""), None);
            assert_eq!(matcher.answer("   "), None);
            assert_eq!(matcher.answer("?!"), None);
        }
    }

    #[test]
    fn test_exact_question_returns_its_answer() {
        let kb = kb();
        for policy in [MatchPolicy::Containment, MatchPolicy::FuzzyRatio] {
            let matcher = Matcher::new(&kb, policy);
            for entry in kb.entries() {
                assert_eq!(
                    matcher.answer(&entry.question),
                    Some(entry.answer.as_str()),
                    "policy {} question {}",
                    policy,
                    entry.question
                );
            }
        }
    }

    #[test]
    fn test_containment_token_subset() {
        let kb = kb();
        let matcher = Matcher::new(&kb, MatchPolicy::Containment);

        assert_eq!(matcher.answer("save groceries"), Some(GROCERIES));
        assert_eq!(matcher.answer("Save on GROCERIES?"), Some(GROCERIES));
        assert_eq!(matcher.answer("reduce electricity"), Some(ELECTRICITY));
    }

    #[test]
    fn test_containment_rejects_missing_token() {
        let kb = kb();
        let matcher = Matcher::new(&kb, MatchPolicy::Containment);

        // "electricity" is not a token of the groceries question, and "save"
        // is not a token of the electricity question
        assert_eq!(matcher.answer("save electricity"), None);
        assert_eq!(matcher.answer("how to save on groceries and rent"), None);
        assert_eq!(matcher.answer("what is a mutual fund"), None);
    }

    #[test]
    fn test_containment_is_token_not_substring() {
        let kb = kb();
        let matcher = Matcher::new(&kb, MatchPolicy::Containment);

        // "grocer" is a substring of "groceries" but not a token
        assert_eq!(matcher.answer("grocer"), None);
    }

    #[test]
    fn test_containment_tie_break_is_first_entry() {
        let kb = kb();
        let matcher = Matcher::new(&kb, MatchPolicy::Containment);

        // "how to" appears in groceries, electricity and transportation
        let first = matcher.find("how to").unwrap();
        assert_eq!(first.question, "how to save on groceries");
        for _ in 0..10 {
            assert_eq!(matcher.find("how to"), Some(first.clone()));
        }

        // "reduce" appears in electricity before transportation
        assert_eq!(matcher.answer("reduce"), Some(ELECTRICITY));
    }

    #[test]
    fn test_tie_break_follows_knowledge_order() {
        let kb = KnowledgeBase::from_pairs([
            ("how to cut food costs", "first"),
            ("how to cut rent costs", "second"),
        ])
        .unwrap();
        let matcher = Matcher::new(&kb, MatchPolicy::Containment);
        assert_eq!(matcher.answer("cut costs"), Some("first"));

        let reversed = KnowledgeBase::from_pairs([
            ("how to cut rent costs", "second"),
            ("how to cut food costs", "first"),
        ])
        .unwrap();
        let matcher = Matcher::new(&reversed, MatchPolicy::Containment);
        assert_eq!(matcher.answer("cut costs"), Some("second"));
    }

    #[test]
    fn test_matching_is_idempotent() {
        let kb = kb();
        for policy in [MatchPolicy::Containment, MatchPolicy::FuzzyRatio] {
            let matcher = Matcher::new(&kb, policy);
            let first = matcher.answer("how do i save on groceries");
            let second = matcher.answer("how do i save on groceries");
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_fuzzy_exact_string_scores_one() {
        let kb = kb();
        let matcher = Matcher::new(&kb, MatchPolicy::FuzzyRatio);

        let found = matcher.find("How to save on groceries").unwrap();
        assert_eq!(found.score, 1.0);
        assert_eq!(found.answer, GROCERIES);
    }

    #[test]
    fn test_fuzzy_near_miss_matches() {
        let kb = kb();
        let matcher = Matcher::new(&kb, MatchPolicy::FuzzyRatio);

        assert_eq!(matcher.answer("how to reduce electric bill"), Some(ELECTRICITY));
        // Containment would reject this: "electric" is not a token
        let containment = Matcher::new(&kb, MatchPolicy::Containment);
        assert_eq!(containment.answer("how to reduce electric bill"), None);
    }

    #[test]
    fn test_fuzzy_no_shared_characters_is_no_match() {
        let kb = kb();
        let matcher = Matcher::new(&kb, MatchPolicy::FuzzyRatio);

        assert_eq!(matcher.answer("zzzz"), None);
        assert_eq!(matcher.answer("xyz 123"), None);
    }

    #[test]
    fn test_fuzzy_threshold_is_exclusive() {
        let kb = KnowledgeBase::from_pairs([("abcd", "canned")]).unwrap();
        let matcher = Matcher::new(&kb, MatchPolicy::FuzzyRatio);

        // Two of four characters differ: exactly 0.5
        assert_eq!(similarity("abxy", "abcd"), 0.5);
        assert_eq!(matcher.answer("abxy"), None);

        // One of four differs: 0.75
        assert_eq!(similarity("abcx", "abcd"), 0.75);
        assert_eq!(matcher.answer("abcx"), Some("canned"));
    }

    #[test]
    fn test_fuzzy_tie_break_is_first_entry() {
        let kb = KnowledgeBase::from_pairs([("abcd", "first"), ("abce", "second")]).unwrap();
        let matcher = Matcher::new(&kb, MatchPolicy::FuzzyRatio);

        // "abcf" is one edit from both
        let found = matcher.find("abcf").unwrap();
        assert_eq!(found.score, 0.75);
        assert_eq!(found.answer, "first");
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "containment".parse::<MatchPolicy>(),
            Ok(MatchPolicy::Containment)
        );
        assert_eq!(
            "fuzzy-ratio".parse::<MatchPolicy>(),
            Ok(MatchPolicy::FuzzyRatio)
        );
        assert_eq!(
            "FUZZY_RATIO".parse::<MatchPolicy>(),
            Ok(MatchPolicy::FuzzyRatio)
        );
        assert!("exact".parse::<MatchPolicy>().is_err());
        assert_eq!(MatchPolicy::default(), MatchPolicy::Containment);
    }
}
