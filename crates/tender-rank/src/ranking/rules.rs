use super::config::{
    contains_any, BudgetRules, CommunicationRules, QualityRules, ReputationRules, ScoringRules,
    TechnicalRules, TimelineRules, TokenTier,
};
use super::domain::{FactorScores, Proposal, Solicitation};

pub(crate) const SCORE_CEILING: f64 = 100.0;

pub(crate) fn score_proposal(
    proposal: &Proposal,
    solicitation: &Solicitation,
    rules: &ScoringRules,
) -> FactorScores {
    FactorScores {
        budget: budget_score(proposal, solicitation, &rules.budget),
        reputation: reputation_score(proposal, &rules.reputation),
        technical: technical_score(proposal, solicitation, &rules.technical),
        quality: quality_score(proposal, &rules.quality),
        timeline: timeline_score(proposal, &rules.timeline),
        communication: communication_score(proposal, &rules.communication),
    }
}

/// Parse a loosely formatted amount such as `"$ 65,000.00"`.
///
/// Currency symbols, thousands separators and whitespace are dropped. Non-finite values
/// (`"inf"`, `"NaN"`) are rejected so they fall through to the neutral score.
pub(crate) fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| *ch != '$' && *ch != ',' && !ch.is_whitespace())
        .collect();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub(crate) fn budget_score(
    proposal: &Proposal,
    solicitation: &Solicitation,
    rules: &BudgetRules,
) -> f64 {
    let (Some(proposed), Some(minimum), Some(maximum)) = (
        parse_amount(&proposal.proposed_budget),
        parse_amount(&solicitation.minimum_budget),
        parse_amount(&solicitation.maximum_budget),
    ) else {
        return rules.neutral;
    };

    if maximum <= minimum {
        return rules.neutral;
    }
    if proposed <= minimum {
        return rules.at_or_below_minimum;
    }
    if proposed > maximum {
        return rules.over_maximum;
    }

    let position = (proposed - minimum) / (maximum - minimum);
    rules
        .bands
        .iter()
        .find(|band| position >= band.lower && position <= band.upper)
        .map(|band| band.score)
        .unwrap_or(rules.outside_bands)
}

pub(crate) fn reputation_score(proposal: &Proposal, rules: &ReputationRules) -> f64 {
    let mut score = rules.base;

    let company = proposal.company_name.to_lowercase();
    if contains_any(&company, &rules.entity_suffixes) {
        score += rules.entity_bonus;
    }

    let experience = proposal.experience.to_lowercase();
    if experience.contains(rules.tenure_marker.as_str()) {
        if let Some(bonus) = first_tier(&experience, &rules.tenure_tiers) {
            score += bonus;
        }
    }

    if contains_any(&experience, &rules.portfolio_terms) {
        score += rules.portfolio_bonus;
    }

    score.min(SCORE_CEILING)
}

pub(crate) fn technical_score(
    proposal: &Proposal,
    solicitation: &Solicitation,
    rules: &TechnicalRules,
) -> f64 {
    let category = solicitation.category.to_lowercase();
    let combined = format!("{} {}", proposal.experience, proposal.description).to_lowercase();

    let category_points: f64 = rules
        .category_rules
        .iter()
        .filter(|rule| rule.applies_to(&category))
        .map(|rule| rule.keywords.score(&combined))
        .sum();

    let score = rules.base + category_points + rules.qualifications.score(&combined);
    score.min(SCORE_CEILING)
}

pub(crate) fn quality_score(proposal: &Proposal, rules: &QualityRules) -> f64 {
    let required = [
        &proposal.title,
        &proposal.proposed_budget,
        &proposal.timeline,
        &proposal.description,
        &proposal.company_name,
        &proposal.contact_person,
        &proposal.email,
    ];
    let completed = required
        .iter()
        .filter(|field| !field.trim().is_empty())
        .count();
    let completeness = completed as f64 / required.len() as f64 * rules.completeness_weight;

    let length = proposal.description.chars().count();
    let length_bonus = rules
        .length_bands
        .iter()
        .find(|band| length > band.min_chars)
        .map(|band| band.bonus)
        .unwrap_or(0.0);

    let description = proposal.description.to_lowercase();
    let score = rules.base + completeness + length_bonus + rules.vocabulary.score(&description);
    score.min(SCORE_CEILING)
}

pub(crate) fn timeline_score(proposal: &Proposal, rules: &TimelineRules) -> f64 {
    let timeline = proposal.timeline.to_lowercase();

    let mut score = rules
        .units
        .iter()
        .find(|unit| timeline.contains(unit.unit.as_str()))
        .and_then(|unit| first_tier(&timeline, &unit.tiers))
        .unwrap_or(rules.base);

    if contains_any(&timeline, &rules.buffer_terms) {
        score += rules.buffer_bonus;
    }

    score.min(SCORE_CEILING)
}

pub(crate) fn communication_score(proposal: &Proposal, rules: &CommunicationRules) -> f64 {
    let mut score = rules.base;

    if !proposal.phone.is_empty() {
        score += rules.phone_bonus;
    }
    if proposal.email.contains('@') && proposal.email.contains('.') {
        score += rules.email_bonus;
    }

    score += rules.courtesy.score(&proposal.description.to_lowercase());
    score.min(SCORE_CEILING)
}

fn first_tier(text: &str, tiers: &[TokenTier]) -> Option<f64> {
    tiers
        .iter()
        .find(|tier| contains_any(text, &tier.tokens))
        .map(|tier| tier.score)
}
