use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::domain::{Factor, FactorScores};

/// Complete rubric: factor weights, scoring tables, label thresholds and confidence bands.
///
/// `Default` carries the production rubric. Alternative profiles can be loaded from JSON;
/// any section left out of the document keeps its default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub weights: ScoringWeights,
    pub rules: ScoringRules,
    pub labels: LabelRules,
    pub confidence: ConfidenceBands,
}

impl RankingConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file).map_err(|err| err.with_path(path))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProfileError> {
        let config: RankingConfig =
            serde_json::from_reader(reader).map_err(|source| ProfileError::Format {
                path: None,
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        let weights = &self.weights;
        if weights
            .as_array()
            .iter()
            .any(|weight| !weight.is_finite() || *weight < 0.0)
        {
            return Err(ProfileError::NegativeWeight);
        }

        let sum = weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ProfileError::WeightSum { sum });
        }

        Ok(())
    }
}

/// Error raised while loading a ranking profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to read ranking profile {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid ranking profile{}: {source}", describe_path(.path))]
    Format {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    #[error("factor weights must be finite and non-negative")]
    NegativeWeight,
    #[error("factor weights must sum to 1.0 (got {sum:.4})")]
    WeightSum { sum: f64 },
}

fn describe_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" {}", path.display()))
        .unwrap_or_default()
}

impl ProfileError {
    fn with_path(self, path: &Path) -> Self {
        match self {
            ProfileError::Format { source, .. } => ProfileError::Format {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        }
    }
}

/// Fixed contribution of each factor to the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub budget: f64,
    pub reputation: f64,
    pub technical: f64,
    pub quality: f64,
    pub timeline: f64,
    pub communication: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            budget: 0.25,
            reputation: 0.20,
            technical: 0.20,
            quality: 0.15,
            timeline: 0.10,
            communication: 0.10,
        }
    }
}

impl ScoringWeights {
    fn as_array(&self) -> [f64; 6] {
        [
            self.budget,
            self.reputation,
            self.technical,
            self.quality,
            self.timeline,
            self.communication,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Weighted sum of the factor scores, before clamping.
    pub fn weighted(&self, scores: &FactorScores) -> f64 {
        scores.budget * self.budget
            + scores.reputation * self.reputation
            + scores.technical * self.technical
            + scores.quality * self.quality
            + scores.timeline * self.timeline
            + scores.communication * self.communication
    }
}

/// A keyword and the points it contributes when found in the scanned text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordWeight {
    pub keyword: String,
    pub weight: f64,
}

/// Ordered keyword table. Matching is substring containment against lowercased text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordTable {
    pub entries: Vec<KeywordWeight>,
}

impl KeywordTable {
    /// Table where every keyword carries the same weight.
    pub fn uniform(keywords: &[&str], weight: f64) -> Self {
        Self {
            entries: keywords
                .iter()
                .map(|keyword| KeywordWeight {
                    keyword: (*keyword).to_string(),
                    weight,
                })
                .collect(),
        }
    }

    pub fn matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a KeywordWeight> + 'a {
        self.entries
            .iter()
            .filter(move |entry| text.contains(entry.keyword.as_str()))
    }

    /// Sum of the weights of every entry found in `text`; each entry counts once.
    pub fn score(&self, text: &str) -> f64 {
        self.matches(text).map(|entry| entry.weight).sum()
    }
}

/// Ordered alternative: the first tier with a token present in the text wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTier {
    pub tokens: Vec<String>,
    pub score: f64,
}

impl TokenTier {
    fn new(tokens: &[&str], score: f64) -> Self {
        Self {
            tokens: terms(tokens),
            score,
        }
    }
}

/// Per-factor scoring tables used by the heuristic scorer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub budget: BudgetRules,
    pub reputation: ReputationRules,
    pub technical: TechnicalRules,
    pub quality: QualityRules,
    pub timeline: TimelineRules,
    pub communication: CommunicationRules,
}

/// Inclusive band of budget position (0 = minimum, 1 = maximum).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetBand {
    pub lower: f64,
    pub upper: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetRules {
    /// Used when a budget is unparsable or the solicitation range is empty.
    pub neutral: f64,
    pub at_or_below_minimum: f64,
    pub over_maximum: f64,
    /// Checked in order; bands overlap so the most favorable must come first.
    pub bands: Vec<BudgetBand>,
    pub outside_bands: f64,
}

impl Default for BudgetRules {
    fn default() -> Self {
        Self {
            neutral: 50.0,
            at_or_below_minimum: 20.0,
            over_maximum: 10.0,
            bands: vec![
                BudgetBand {
                    lower: 0.70,
                    upper: 0.90,
                    score: 95.0,
                },
                BudgetBand {
                    lower: 0.50,
                    upper: 0.95,
                    score: 85.0,
                },
                BudgetBand {
                    lower: 0.30,
                    upper: 0.99,
                    score: 75.0,
                },
            ],
            outside_bands: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationRules {
    pub base: f64,
    pub entity_suffixes: Vec<String>,
    pub entity_bonus: f64,
    /// Tenure tiers only apply when the experience text mentions this marker.
    pub tenure_marker: String,
    pub tenure_tiers: Vec<TokenTier>,
    pub portfolio_terms: Vec<String>,
    pub portfolio_bonus: f64,
}

impl Default for ReputationRules {
    fn default() -> Self {
        Self {
            base: 50.0,
            entity_suffixes: terms(&["inc", "ltd", "corp", "llc"]),
            entity_bonus: 15.0,
            tenure_marker: "years".to_string(),
            tenure_tiers: vec![
                TokenTier::new(&["10", "ten"], 25.0),
                TokenTier::new(&["5", "five"], 15.0),
                TokenTier::new(&["3", "three"], 10.0),
            ],
            portfolio_terms: terms(&["project", "client", "delivered"]),
            portfolio_bonus: 10.0,
        }
    }
}

/// Keyword table that applies when the solicitation category mentions any of the terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub category_terms: Vec<String>,
    pub keywords: KeywordTable,
}

impl CategoryRule {
    pub fn applies_to(&self, category: &str) -> bool {
        contains_any(category, &self.category_terms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicalRules {
    pub base: f64,
    /// Evaluated independently; several rules may apply to one category.
    pub category_rules: Vec<CategoryRule>,
    pub qualifications: KeywordTable,
}

impl Default for TechnicalRules {
    fn default() -> Self {
        Self {
            base: 50.0,
            category_rules: vec![
                CategoryRule {
                    name: "technology".to_string(),
                    category_terms: terms(&["it", "technology", "consulting"]),
                    keywords: KeywordTable::uniform(
                        &[
                            "software",
                            "development",
                            "programming",
                            "database",
                            "api",
                            "cloud",
                            "mobile",
                            "web",
                            "system",
                            "application",
                            "technical",
                            "coding",
                            "algorithm",
                            "architecture",
                        ],
                        3.0,
                    ),
                },
                CategoryRule {
                    name: "procurement".to_string(),
                    category_terms: terms(&["procurement"]),
                    keywords: KeywordTable::uniform(
                        &[
                            "supplier",
                            "vendor",
                            "logistics",
                            "supply",
                            "procurement",
                            "sourcing",
                            "contract",
                            "negotiation",
                        ],
                        3.0,
                    ),
                },
            ],
            qualifications: KeywordTable::uniform(
                &[
                    "certified",
                    "certification",
                    "degree",
                    "qualification",
                    "trained",
                    "expert",
                    "specialist",
                    "professional",
                ],
                5.0,
            ),
        }
    }
}

/// Bonus awarded when the description is strictly longer than `min_chars` characters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthBand {
    pub min_chars: usize,
    pub bonus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityRules {
    pub base: f64,
    /// Scaled by the share of required fields that are filled in.
    pub completeness_weight: f64,
    /// Checked longest first; only one band applies.
    pub length_bands: Vec<LengthBand>,
    pub vocabulary: KeywordTable,
}

impl Default for QualityRules {
    fn default() -> Self {
        Self {
            base: 50.0,
            completeness_weight: 30.0,
            length_bands: vec![
                LengthBand {
                    min_chars: 500,
                    bonus: 15.0,
                },
                LengthBand {
                    min_chars: 200,
                    bonus: 10.0,
                },
                LengthBand {
                    min_chars: 50,
                    bonus: 5.0,
                },
            ],
            vocabulary: KeywordTable::uniform(
                &[
                    "deliver",
                    "ensure",
                    "experience",
                    "professional",
                    "quality",
                    "commitment",
                    "expertise",
                    "solution",
                ],
                2.0,
            ),
        }
    }
}

/// Tiers that overwrite the timeline base score when the unit word is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineUnit {
    pub unit: String,
    pub tiers: Vec<TokenTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineRules {
    pub base: f64,
    /// Mutually exclusive; the first unit found in the timeline text is used.
    pub units: Vec<TimelineUnit>,
    pub buffer_terms: Vec<String>,
    pub buffer_bonus: f64,
}

impl Default for TimelineRules {
    fn default() -> Self {
        Self {
            base: 70.0,
            units: vec![
                TimelineUnit {
                    unit: "week".to_string(),
                    tiers: vec![
                        TokenTier::new(&["1", "one"], 60.0),
                        TokenTier::new(&["2", "two"], 75.0),
                        TokenTier::new(&["3", "three", "4", "four"], 90.0),
                    ],
                },
                TimelineUnit {
                    unit: "month".to_string(),
                    tiers: vec![
                        TokenTier::new(&["1", "one"], 85.0),
                        TokenTier::new(&["2", "two", "3", "three"], 90.0),
                        TokenTier::new(&["6", "six"], 70.0),
                    ],
                },
            ],
            buffer_terms: terms(&["buffer", "contingency", "flexible"]),
            buffer_bonus: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunicationRules {
    pub base: f64,
    pub phone_bonus: f64,
    pub email_bonus: f64,
    pub courtesy: KeywordTable,
}

impl Default for CommunicationRules {
    fn default() -> Self {
        Self {
            base: 70.0,
            phone_bonus: 10.0,
            email_bonus: 10.0,
            courtesy: KeywordTable::uniform(
                &[
                    "please",
                    "thank you",
                    "look forward",
                    "pleased to",
                    "happy to",
                ],
                3.0,
            ),
        }
    }
}

/// Human readable label per factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorLabels {
    pub budget: String,
    pub reputation: String,
    pub technical: String,
    pub quality: String,
    pub timeline: String,
    pub communication: String,
}

impl FactorLabels {
    pub fn get(&self, factor: Factor) -> &str {
        match factor {
            Factor::Budget => &self.budget,
            Factor::Reputation => &self.reputation,
            Factor::Technical => &self.technical,
            Factor::Quality => &self.quality,
            Factor::Timeline => &self.timeline,
            Factor::Communication => &self.communication,
        }
    }
}

/// Thresholds and wording for strength/concern annotations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelRules {
    /// Factor scores at or above this value are strengths.
    pub strength_threshold: f64,
    /// Factor scores at or below this value are concerns.
    pub concern_threshold: f64,
    pub strengths: FactorLabels,
    pub concerns: FactorLabels,
    pub fallback_strength: String,
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            strength_threshold: 80.0,
            concern_threshold: 40.0,
            strengths: FactorLabels {
                budget: "Competitive pricing".to_string(),
                reputation: "Strong track record".to_string(),
                technical: "Technical expertise".to_string(),
                quality: "Comprehensive proposal".to_string(),
                timeline: "Realistic timeline".to_string(),
                communication: "Professional communication".to_string(),
            },
            concerns: FactorLabels {
                budget: "Budget concerns".to_string(),
                reputation: "Limited experience shown".to_string(),
                technical: "Technical capability unclear".to_string(),
                quality: "Incomplete proposal".to_string(),
                timeline: "Timeline may be unrealistic".to_string(),
                communication: "Communication issues".to_string(),
            },
            fallback_strength: "Meets basic requirements".to_string(),
        }
    }
}

/// Minimum overall score (inclusive) for each confidence tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceBands {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        Self {
            high: 85.0,
            medium: 70.0,
            low: 55.0,
        }
    }
}

pub(crate) fn contains_any(text: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| text.contains(needle.as_str()))
}

fn terms(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
