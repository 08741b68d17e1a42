//! Question type registry.
//!
//! The six question kinds form a closed tagged union. Each carries its own
//! strongly-typed configuration and response shape; parsing and
//! cross-validation go through exhaustive matches so a new kind cannot be
//! added without handling every site.

use pulse_common::{AppError, AppResult};
use pulse_db::entities::question::QuestionType;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;

/// Binary question configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BinaryConfig {
    pub option_a: String,
    pub option_b: String,
}

/// Multi-choice question configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MultiChoiceConfig {
    pub options: Vec<String>,
    pub max_selections: usize,
}

/// Rating-scale question configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RatingScaleConfig {
    pub min: i32,
    pub max: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

/// Text-response question configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextResponseConfig {
    pub max_length: usize,
    #[serde(default)]
    pub multiline: bool,
}

/// A single item to be ranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RankingItem {
    pub id: String,
    pub label: String,
}

/// Ranking question configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RankingConfig {
    pub items: Vec<RankingItem>,
}

/// One side of an A/B test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AbVariant {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A/B test question configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AbTestConfig {
    pub option_a: AbVariant,
    pub option_b: AbVariant,
}

/// Parsed, validated question configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionConfig {
    Binary(BinaryConfig),
    MultiChoice(MultiChoiceConfig),
    RatingScale(RatingScaleConfig),
    TextResponse(TextResponseConfig),
    Ranking(RankingConfig),
    AbTest(AbTestConfig),
}

/// A binary answer: side A or side B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryChoice {
    A,
    B,
}

/// An A/B test answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbChoice {
    VariantA,
    VariantB,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BinaryAnswer {
    pub selected_option: BinaryChoice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MultiChoiceAnswer {
    pub selected_options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RatingAnswer {
    pub rating: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TextAnswer {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RankingAnswer {
    pub ranking: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AbAnswer {
    pub selected_option: AbChoice,
}

/// Parsed response payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePayload {
    Binary(BinaryAnswer),
    MultiChoice(MultiChoiceAnswer),
    RatingScale(RatingAnswer),
    TextResponse(TextAnswer),
    Ranking(RankingAnswer),
    AbTest(AbAnswer),
}

fn parse<T: DeserializeOwned>(kind: &str, tag: QuestionType, data: &JsonValue) -> AppResult<T> {
    serde_json::from_value(data.clone()).map_err(|e| {
        AppError::Validation(format!("invalid {} {kind}: {e}", tag.as_tag()))
    })
}

impl QuestionConfig {
    /// Parse and structurally validate a stored configuration blob.
    pub fn from_parts(tag: QuestionType, data: &JsonValue) -> AppResult<Self> {
        let config = match tag {
            QuestionType::Binary => Self::Binary(parse("question config", tag, data)?),
            QuestionType::MultiChoice => Self::MultiChoice(parse("question config", tag, data)?),
            QuestionType::RatingScale => Self::RatingScale(parse("question config", tag, data)?),
            QuestionType::TextResponse => Self::TextResponse(parse("question config", tag, data)?),
            QuestionType::Ranking => Self::Ranking(parse("question config", tag, data)?),
            QuestionType::AbTest => Self::AbTest(parse("question config", tag, data)?),
        };
        config.check()?;
        Ok(config)
    }

    /// The type tag this configuration belongs to.
    #[must_use]
    pub const fn question_type(&self) -> QuestionType {
        match self {
            Self::Binary(_) => QuestionType::Binary,
            Self::MultiChoice(_) => QuestionType::MultiChoice,
            Self::RatingScale(_) => QuestionType::RatingScale,
            Self::TextResponse(_) => QuestionType::TextResponse,
            Self::Ranking(_) => QuestionType::Ranking,
            Self::AbTest(_) => QuestionType::AbTest,
        }
    }

    /// Serialize back to the storage representation.
    pub fn to_json(&self) -> AppResult<JsonValue> {
        let value = match self {
            Self::Binary(c) => serde_json::to_value(c),
            Self::MultiChoice(c) => serde_json::to_value(c),
            Self::RatingScale(c) => serde_json::to_value(c),
            Self::TextResponse(c) => serde_json::to_value(c),
            Self::Ranking(c) => serde_json::to_value(c),
            Self::AbTest(c) => serde_json::to_value(c),
        };
        value.map_err(|e| AppError::Internal(format!("question config serialization: {e}")))
    }

    fn check(&self) -> AppResult<()> {
        match self {
            Self::Binary(c) => {
                if c.option_a.trim().is_empty() || c.option_b.trim().is_empty() {
                    return Err(AppError::Validation(
                        "binary options must not be empty".to_string(),
                    ));
                }
            }
            Self::MultiChoice(c) => {
                if c.options.len() < 2 {
                    return Err(AppError::Validation(
                        "multi-choice requires at least 2 options".to_string(),
                    ));
                }
                if c.max_selections == 0 || c.max_selections > c.options.len() {
                    return Err(AppError::Validation(format!(
                        "maxSelections must be between 1 and {}",
                        c.options.len()
                    )));
                }
                let unique: HashSet<&str> = c.options.iter().map(String::as_str).collect();
                if unique.len() != c.options.len() {
                    return Err(AppError::Validation(
                        "multi-choice options must be unique".to_string(),
                    ));
                }
            }
            Self::RatingScale(c) => {
                if c.min >= c.max {
                    return Err(AppError::Validation(
                        "rating scale requires min < max".to_string(),
                    ));
                }
            }
            Self::TextResponse(c) => {
                if c.max_length == 0 {
                    return Err(AppError::Validation(
                        "maxLength must be at least 1".to_string(),
                    ));
                }
            }
            Self::Ranking(c) => {
                if c.items.len() < 2 {
                    return Err(AppError::Validation(
                        "ranking requires at least 2 items".to_string(),
                    ));
                }
                let unique: HashSet<&str> = c.items.iter().map(|i| i.id.as_str()).collect();
                if unique.len() != c.items.len() {
                    return Err(AppError::Validation(
                        "ranking item ids must be unique".to_string(),
                    ));
                }
            }
            Self::AbTest(c) => {
                if c.option_a.id == c.option_b.id {
                    return Err(AppError::Validation(
                        "ab-test variants must have distinct ids".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Cross-check a parsed response against this configuration.
    ///
    /// A response is atomically valid or rejected; every rejection names
    /// the violated constraint.
    pub fn validate_response(&self, payload: &ResponsePayload) -> AppResult<()> {
        match (self, payload) {
            (Self::Binary(_), ResponsePayload::Binary(_)) => Ok(()),
            (Self::MultiChoice(config), ResponsePayload::MultiChoice(answer)) => {
                if answer.selected_options.is_empty() {
                    return Err(AppError::Validation(
                        "selectedOptions must not be empty".to_string(),
                    ));
                }
                if answer.selected_options.len() > config.max_selections {
                    return Err(AppError::Validation(format!(
                        "at most {} selections allowed, got {}",
                        config.max_selections,
                        answer.selected_options.len()
                    )));
                }
                let mut seen = HashSet::new();
                for option in &answer.selected_options {
                    if !config.options.contains(option) {
                        return Err(AppError::Validation(format!(
                            "selected option {option:?} is not among the configured options"
                        )));
                    }
                    if !seen.insert(option.as_str()) {
                        return Err(AppError::Validation(format!(
                            "option {option:?} selected more than once"
                        )));
                    }
                }
                Ok(())
            }
            (Self::RatingScale(config), ResponsePayload::RatingScale(answer)) => {
                // Bounds are inclusive on both ends.
                if answer.rating < config.min || answer.rating > config.max {
                    return Err(AppError::Validation(format!(
                        "rating {} is outside the allowed range {}..={}",
                        answer.rating, config.min, config.max
                    )));
                }
                Ok(())
            }
            (Self::TextResponse(config), ResponsePayload::TextResponse(answer)) => {
                let length = answer.text.chars().count();
                if length > config.max_length {
                    return Err(AppError::Validation(format!(
                        "text length {length} exceeds maxLength {}",
                        config.max_length
                    )));
                }
                if !config.multiline && answer.text.contains('\n') {
                    return Err(AppError::Validation(
                        "text must be a single line for this question".to_string(),
                    ));
                }
                Ok(())
            }
            (Self::Ranking(config), ResponsePayload::Ranking(answer)) => {
                if answer.ranking.len() != config.items.len() {
                    return Err(AppError::Validation(format!(
                        "ranking must contain exactly {} entries, got {}",
                        config.items.len(),
                        answer.ranking.len()
                    )));
                }
                let expected: HashSet<&str> = config.items.iter().map(|i| i.id.as_str()).collect();
                let mut seen = HashSet::new();
                for id in &answer.ranking {
                    if !expected.contains(id.as_str()) {
                        return Err(AppError::Validation(format!(
                            "ranking entry {id:?} is not a configured item id"
                        )));
                    }
                    if !seen.insert(id.as_str()) {
                        return Err(AppError::Validation(format!(
                            "ranking entry {id:?} appears more than once"
                        )));
                    }
                }
                Ok(())
            }
            (Self::AbTest(_), ResponsePayload::AbTest(_)) => Ok(()),
            (config, payload) => Err(AppError::Validation(format!(
                "response shape {} does not match question type {}",
                payload.question_type().as_tag(),
                config.question_type().as_tag()
            ))),
        }
    }
}

impl ResponsePayload {
    /// Parse a submitted payload blob against a question's type tag.
    pub fn from_parts(tag: QuestionType, data: &JsonValue) -> AppResult<Self> {
        Ok(match tag {
            QuestionType::Binary => Self::Binary(parse("response", tag, data)?),
            QuestionType::MultiChoice => Self::MultiChoice(parse("response", tag, data)?),
            QuestionType::RatingScale => Self::RatingScale(parse("response", tag, data)?),
            QuestionType::TextResponse => Self::TextResponse(parse("response", tag, data)?),
            QuestionType::Ranking => Self::Ranking(parse("response", tag, data)?),
            QuestionType::AbTest => Self::AbTest(parse("response", tag, data)?),
        })
    }

    /// The type tag this payload belongs to.
    #[must_use]
    pub const fn question_type(&self) -> QuestionType {
        match self {
            Self::Binary(_) => QuestionType::Binary,
            Self::MultiChoice(_) => QuestionType::MultiChoice,
            Self::RatingScale(_) => QuestionType::RatingScale,
            Self::TextResponse(_) => QuestionType::TextResponse,
            Self::Ranking(_) => QuestionType::Ranking,
            Self::AbTest(_) => QuestionType::AbTest,
        }
    }

    /// Serialize back to the storage representation.
    pub fn to_json(&self) -> AppResult<JsonValue> {
        let value = match self {
            Self::Binary(a) => serde_json::to_value(a),
            Self::MultiChoice(a) => serde_json::to_value(a),
            Self::RatingScale(a) => serde_json::to_value(a),
            Self::TextResponse(a) => serde_json::to_value(a),
            Self::Ranking(a) => serde_json::to_value(a),
            Self::AbTest(a) => serde_json::to_value(a),
        };
        value.map_err(|e| AppError::Internal(format!("response serialization: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rating_config(min: i32, max: i32) -> QuestionConfig {
        QuestionConfig::from_parts(
            QuestionType::RatingScale,
            &json!({"min": min, "max": max}),
        )
        .unwrap()
    }

    fn ranking_config() -> QuestionConfig {
        QuestionConfig::from_parts(
            QuestionType::Ranking,
            &json!({"items": [
                {"id": "a", "label": "Alpha"},
                {"id": "b", "label": "Beta"},
                {"id": "c", "label": "Gamma"},
            ]}),
        )
        .unwrap()
    }

    #[test]
    fn test_binary_roundtrip() {
        let config = QuestionConfig::from_parts(
            QuestionType::Binary,
            &json!({"optionA": "Tabs", "optionB": "Spaces"}),
        )
        .unwrap();
        let payload =
            ResponsePayload::from_parts(QuestionType::Binary, &json!({"selectedOption": "A"}))
                .unwrap();
        config.validate_response(&payload).unwrap();
    }

    #[test]
    fn test_binary_missing_field_names_it() {
        let err = ResponsePayload::from_parts(QuestionType::Binary, &json!({})).unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("selectedOption"), "{msg}"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_binary_invalid_option_rejected() {
        let err = ResponsePayload::from_parts(QuestionType::Binary, &json!({"selectedOption": "C"}))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_multi_choice_respects_max_selections() {
        let config = QuestionConfig::from_parts(
            QuestionType::MultiChoice,
            &json!({"options": ["x", "y", "z"], "maxSelections": 2}),
        )
        .unwrap();

        let ok = ResponsePayload::from_parts(
            QuestionType::MultiChoice,
            &json!({"selectedOptions": ["x", "z"]}),
        )
        .unwrap();
        config.validate_response(&ok).unwrap();

        let too_many = ResponsePayload::from_parts(
            QuestionType::MultiChoice,
            &json!({"selectedOptions": ["x", "y", "z"]}),
        )
        .unwrap();
        assert!(config.validate_response(&too_many).is_err());

        let foreign = ResponsePayload::from_parts(
            QuestionType::MultiChoice,
            &json!({"selectedOptions": ["nope"]}),
        )
        .unwrap();
        assert!(config.validate_response(&foreign).is_err());

        let duplicate = ResponsePayload::from_parts(
            QuestionType::MultiChoice,
            &json!({"selectedOptions": ["x", "x"]}),
        )
        .unwrap();
        assert!(config.validate_response(&duplicate).is_err());
    }

    #[test]
    fn test_rating_bounds_inclusive() {
        let config = rating_config(1, 5);
        for rating in [1, 3, 5] {
            let payload =
                ResponsePayload::from_parts(QuestionType::RatingScale, &json!({"rating": rating}))
                    .unwrap();
            config.validate_response(&payload).unwrap();
        }
        for rating in [0, 6] {
            let payload =
                ResponsePayload::from_parts(QuestionType::RatingScale, &json!({"rating": rating}))
                    .unwrap();
            let err = config.validate_response(&payload).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[test]
    fn test_rating_config_requires_min_below_max() {
        let err = QuestionConfig::from_parts(QuestionType::RatingScale, &json!({"min": 5, "max": 5}))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_text_length_cap() {
        let config = QuestionConfig::from_parts(
            QuestionType::TextResponse,
            &json!({"maxLength": 5}),
        )
        .unwrap();
        let ok = ResponsePayload::from_parts(QuestionType::TextResponse, &json!({"text": "hello"}))
            .unwrap();
        config.validate_response(&ok).unwrap();

        let long =
            ResponsePayload::from_parts(QuestionType::TextResponse, &json!({"text": "hello!"}))
                .unwrap();
        assert!(config.validate_response(&long).is_err());
    }

    #[test]
    fn test_single_line_text_rejects_newlines() {
        let config = QuestionConfig::from_parts(
            QuestionType::TextResponse,
            &json!({"maxLength": 100, "multiline": false}),
        )
        .unwrap();
        let payload =
            ResponsePayload::from_parts(QuestionType::TextResponse, &json!({"text": "a\nb"}))
                .unwrap();
        assert!(config.validate_response(&payload).is_err());
    }

    #[test]
    fn test_ranking_permutation_accepted() {
        let config = ranking_config();
        let payload = ResponsePayload::from_parts(
            QuestionType::Ranking,
            &json!({"ranking": ["c", "a", "b"]}),
        )
        .unwrap();
        config.validate_response(&payload).unwrap();
    }

    #[test]
    fn test_ranking_rejects_non_permutations() {
        let config = ranking_config();

        // Wrong length
        let short =
            ResponsePayload::from_parts(QuestionType::Ranking, &json!({"ranking": ["a", "b"]}))
                .unwrap();
        assert!(config.validate_response(&short).is_err());

        // Duplicate entry
        let duplicate = ResponsePayload::from_parts(
            QuestionType::Ranking,
            &json!({"ranking": ["a", "a", "b"]}),
        )
        .unwrap();
        assert!(config.validate_response(&duplicate).is_err());

        // Foreign ID
        let foreign = ResponsePayload::from_parts(
            QuestionType::Ranking,
            &json!({"ranking": ["a", "b", "z"]}),
        )
        .unwrap();
        assert!(config.validate_response(&foreign).is_err());
    }

    #[test]
    fn test_ab_test_choices() {
        let config = QuestionConfig::from_parts(
            QuestionType::AbTest,
            &json!({
                "optionA": {"id": "hero-1", "label": "Hero layout"},
                "optionB": {"id": "hero-2", "label": "Split layout", "description": "50/50"},
            }),
        )
        .unwrap();
        let payload = ResponsePayload::from_parts(
            QuestionType::AbTest,
            &json!({"selectedOption": "variant_a"}),
        )
        .unwrap();
        config.validate_response(&payload).unwrap();

        let err = ResponsePayload::from_parts(
            QuestionType::AbTest,
            &json!({"selectedOption": "variant_c"}),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_mismatched_payload_type_rejected() {
        let config = rating_config(1, 5);
        let payload =
            ResponsePayload::from_parts(QuestionType::TextResponse, &json!({"text": "hi"}))
                .unwrap();
        let err = config.validate_response(&payload).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert!(msg.contains("text-response"), "{msg}");
                assert!(msg.contains("rating-scale"), "{msg}");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_config_roundtrips_to_json() {
        let config = ranking_config();
        let json = config.to_json().unwrap();
        let reparsed = QuestionConfig::from_parts(QuestionType::Ranking, &json).unwrap();
        assert_eq!(config, reparsed);
    }
}
