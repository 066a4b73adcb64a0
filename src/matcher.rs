//! Fuzzy token matching.
//!
//! Similarity is the normalized Levenshtein ratio `1 - distance / max_len`
//! computed over normalized strings, so it is symmetric and equals `1.0`
//! exactly when the normalized strings are identical.
//!
//! ```
//! use unalto::matcher::{match_tokens, MatchOptions};
//!
//! let results = match_tokens(["heart", "hearts", "hearth"], "heart", &MatchOptions::new());
//! assert_eq!(results[0].token, "heart");
//! assert_eq!(results[0].ratio, 1.0);
//! ```

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// How tokens and queries are folded before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// NFKC, then lowercase
    #[default]
    Lowercase,
    /// As `Lowercase`, keeping letters only
    Alphabetic,
    /// As `Lowercase`, keeping letters and digits only
    Alphanumeric,
}

impl Normalization {
    /// Fold a string for comparison.
    pub fn apply(self, text: &str) -> String {
        let folded = text.nfkc().collect::<String>().to_lowercase();
        match self {
            Normalization::Lowercase => folded,
            Normalization::Alphabetic => folded.chars().filter(|c| c.is_alphabetic()).collect(),
            Normalization::Alphanumeric => {
                folded.chars().filter(|c| c.is_alphanumeric()).collect()
            }
        }
    }
}

/// Options for ranking tokens against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Minimum ratio for a token to be reported
    pub threshold: f64,

    /// Keep only the best N results, applied after sorting
    pub limit: Option<usize>,

    /// String folding applied to both sides
    pub normalization: Normalization,
}

impl MatchOptions {
    /// Create match options with defaults (report everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum ratio.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Keep only the best `limit` results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the normalization.
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            limit: None,
            normalization: Normalization::Lowercase,
        }
    }
}

/// A token ranked against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMatch {
    /// The token as it appears in the input
    pub token: String,

    /// Similarity in `[0.0, 1.0]`
    pub ratio: f64,

    /// Position of the token in the input sequence
    pub position: usize,
}

/// A query prepared for repeated scoring.
#[derive(Debug, Clone)]
pub struct Matcher {
    query: String,
    options: MatchOptions,
}

impl Matcher {
    /// Prepare a query.
    pub fn new(query: &str, options: &MatchOptions) -> Self {
        Self {
            query: options.normalization.apply(query),
            options: options.clone(),
        }
    }

    /// The options this matcher was built with.
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Ratio of a token against the query, if it reaches the threshold.
    pub fn score(&self, token: &str) -> Option<f64> {
        let token = self.options.normalization.apply(token);
        // An empty query only ever matches empty tokens.
        let ratio = if self.query.is_empty() {
            if token.is_empty() {
                1.0
            } else {
                return None;
            }
        } else {
            strsim::normalized_levenshtein(&self.query, &token)
        };
        (ratio >= self.options.threshold).then_some(ratio)
    }

    /// Rank a token sequence.
    pub fn match_tokens<I, S>(&self, tokens: I) -> Vec<TokenMatch>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut results: Vec<TokenMatch> = tokens
            .into_iter()
            .enumerate()
            .filter_map(|(position, token)| {
                let token = token.as_ref();
                self.score(token).map(|ratio| TokenMatch {
                    token: token.to_string(),
                    ratio,
                    position,
                })
            })
            .collect();
        rank(&mut results, |m| m.ratio, self.options.limit);
        results
    }
}

/// Rank `tokens` against `query`: ratio descending, ties by position.
pub fn match_tokens<I, S>(tokens: I, query: &str, options: &MatchOptions) -> Vec<TokenMatch>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Matcher::new(query, options).match_tokens(tokens)
}

/// Similarity of two strings under the default normalization.
pub fn ratio(a: &str, b: &str) -> f64 {
    ratio_with(a, b, Normalization::default())
}

/// Similarity of two strings under a given normalization.
pub fn ratio_with(a: &str, b: &str, normalization: Normalization) -> f64 {
    strsim::normalized_levenshtein(&normalization.apply(a), &normalization.apply(b))
}

/// Sort results by descending ratio and truncate to `limit`.
///
/// The sort is stable, so results already in source order keep that order
/// among equal ratios.
pub(crate) fn rank<T>(results: &mut Vec<T>, ratio: impl Fn(&T) -> f64, limit: Option<usize>) {
    results.sort_by(|a, b| ratio(b).total_cmp(&ratio(a)));
    if let Some(limit) = limit {
        results.truncate(limit);
    }
}
