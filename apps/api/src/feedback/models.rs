//! Feedback contracts — the two records the model produces, field-for-field
//! the shape of the structured-output payload. Records are immutable after
//! receipt; nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::llm_client::schema::SchemaError;

/// Category tag for a translation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MistakeKind {
    Grammar,
    Vocabulary,
    Collocation,
    Logic,
    Style,
}

/// The three mandated renderings of one source sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationVariants {
    pub standard: String,
    pub natural: String,
    /// Band 7.5+ quality rendering.
    pub advanced: String,
}

/// One identified issue in the user's translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CritiqueEntry {
    #[serde(rename = "type")]
    pub kind: MistakeKind,
    pub issue: String,
    pub suggestion: String,
}

/// Full feedback for one translation submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationFeedback {
    pub translations: TranslationVariants,
    /// May be empty — signals no issues found.
    pub critique: Vec<CritiqueEntry>,
    pub estimated_band: f64,
}

/// Score and reasoning for one of the four official writing criteria.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriterionScore {
    pub score: f64,
    pub justification: String,
}

/// The four fixed IELTS writing assessment dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaBreakdown {
    pub task_response: CriterionScore,
    pub coherence: CriterionScore,
    pub lexical: CriterionScore,
    pub grammar: CriterionScore,
}

/// Classification of one sentence of the essay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentenceKind {
    Strong,
    Weak,
}

/// Per-sentence assessment. `improved` is intended to accompany `weak`
/// classifications only; this is a convention of the prompt, not enforced
/// structurally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceAssessment {
    pub original: String,
    #[serde(rename = "type")]
    pub kind: SentenceKind,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improved: Option<String>,
}

/// A lexical substitution suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyUpgrade {
    pub old: String,
    pub improved: String,
    pub context: String,
}

/// A sentence-structure suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureUpgrade {
    pub original: String,
    pub improved: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upgrades {
    pub vocabulary: Vec<VocabularyUpgrade>,
    pub structures: Vec<StructureUpgrade>,
}

/// Rewrite of one selected key paragraph (never the whole essay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevisedParagraph {
    pub original: String,
    pub revised: String,
}

/// Full feedback for one essay submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingFeedback {
    pub overall_band: f64,
    pub criteria: CriteriaBreakdown,
    pub sentence_level: Vec<SentenceAssessment>,
    pub upgrades: Upgrades,
    pub revised_paragraphs: Vec<RevisedParagraph>,
}

/// IELTS bands are 0–9; anything outside is a model fault, not a grade.
fn check_band(band: f64, path: &str) -> Result<(), SchemaError> {
    if !band.is_finite() || !(0.0..=9.0).contains(&band) {
        return Err(SchemaError::Constraint {
            path: path.to_string(),
            message: format!("band {band} outside the 0-9 display range"),
        });
    }
    Ok(())
}

fn check_non_empty(text: &str, path: &str) -> Result<(), SchemaError> {
    if text.trim().is_empty() {
        return Err(SchemaError::Constraint {
            path: path.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}

impl TranslationFeedback {
    /// Domain checks the response schema cannot express: all three variants
    /// present and non-empty, band in display range. A record failing here
    /// is never rendered.
    pub fn validate(&self) -> Result<(), SchemaError> {
        check_non_empty(&self.translations.standard, "translations.standard")?;
        check_non_empty(&self.translations.natural, "translations.natural")?;
        check_non_empty(&self.translations.advanced, "translations.advanced")?;
        check_band(self.estimated_band, "estimatedBand")
    }
}

impl WritingFeedback {
    pub fn validate(&self) -> Result<(), SchemaError> {
        check_band(self.overall_band, "overallBand")?;
        for (criterion, path) in [
            (&self.criteria.task_response, "criteria.taskResponse"),
            (&self.criteria.coherence, "criteria.coherence"),
            (&self.criteria.lexical, "criteria.lexical"),
            (&self.criteria.grammar, "criteria.grammar"),
        ] {
            check_band(criterion.score, &format!("{path}.score"))?;
            check_non_empty(&criterion.justification, &format!("{path}.justification"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSLATION_FIXTURE: &str = r#"{
        "translations": {
            "standard": "The government should invest more money in the public transportation system.",
            "natural": "The government should put more funding into public transport.",
            "advanced": "Governments ought to channel greater investment into public transit infrastructure so as to curb environmental degradation."
        },
        "critique": [
            {
                "type": "Collocation",
                "issue": "'put more money on' is not a natural collocation",
                "suggestion": "Use 'invest more money in' or 'put more funding into'."
            },
            {
                "type": "Grammar",
                "issue": "Missing article before 'Government'",
                "suggestion": "Write 'The government'."
            }
        ],
        "estimatedBand": 5.5
    }"#;

    const WRITING_FIXTURE: &str = r#"{
        "overallBand": 6.5,
        "criteria": {
            "taskResponse": {"score": 6.0, "justification": "Addresses both views but the opinion is underdeveloped."},
            "coherence": {"score": 7.0, "justification": "Clear progression; some mechanical linking devices."},
            "lexical": {"score": 6.5, "justification": "Adequate range with occasional imprecision."},
            "grammar": {"score": 6.5, "justification": "Mix of structures; article errors recur."}
        },
        "sentenceLevel": [
            {
                "original": "Some people think the environment is for government.",
                "type": "weak",
                "explanation": "Vague and grammatically incomplete.",
                "improved": "Some argue that environmental protection is primarily the government's responsibility."
            },
            {
                "original": "Individual action, however small, compounds into collective change.",
                "type": "strong",
                "explanation": "Precise and rhythmically controlled."
            }
        ],
        "upgrades": {
            "vocabulary": [
                {"old": "very important", "improved": "paramount", "context": "describing the role of policy"}
            ],
            "structures": [
                {"original": "It is good to recycle.", "improved": "Recycling, though modest in scale, remains a meaningful habit."}
            ]
        },
        "revisedParagraphs": [
            {"original": "In conclusion, both is responsible.", "revised": "In conclusion, responsibility is shared: individuals set norms while governments set rules."}
        ]
    }"#;

    #[test]
    fn test_translation_fixture_deserializes_and_validates() {
        let feedback: TranslationFeedback = serde_json::from_str(TRANSLATION_FIXTURE).unwrap();
        assert_eq!(feedback.critique.len(), 2);
        assert_eq!(feedback.critique[0].kind, MistakeKind::Collocation);
        assert!((feedback.estimated_band - 5.5).abs() < f64::EPSILON);
        assert!(feedback.validate().is_ok());
    }

    #[test]
    fn test_translation_with_empty_critique_is_valid() {
        let json = r#"{
            "translations": {"standard": "a", "natural": "b", "advanced": "c"},
            "critique": [],
            "estimatedBand": 8.0
        }"#;
        let feedback: TranslationFeedback = serde_json::from_str(json).unwrap();
        assert!(feedback.critique.is_empty());
        assert!(feedback.validate().is_ok());
    }

    #[test]
    fn test_translation_missing_variant_fails_deserialization() {
        let json = r#"{
            "translations": {"standard": "a", "natural": "b"},
            "critique": [],
            "estimatedBand": 8.0
        }"#;
        assert!(serde_json::from_str::<TranslationFeedback>(json).is_err());
    }

    #[test]
    fn test_translation_unknown_mistake_kind_fails_deserialization() {
        let json = r#"{
            "translations": {"standard": "a", "natural": "b", "advanced": "c"},
            "critique": [{"type": "Spelling", "issue": "x", "suggestion": "y"}],
            "estimatedBand": 8.0
        }"#;
        assert!(serde_json::from_str::<TranslationFeedback>(json).is_err());
    }

    #[test]
    fn test_translation_blank_variant_fails_validation() {
        let json = r#"{
            "translations": {"standard": "a", "natural": "  ", "advanced": "c"},
            "critique": [],
            "estimatedBand": 8.0
        }"#;
        let feedback: TranslationFeedback = serde_json::from_str(json).unwrap();
        let err = feedback.validate().unwrap_err();
        assert!(matches!(err, SchemaError::Constraint { ref path, .. } if path == "translations.natural"));
    }

    #[test]
    fn test_translation_band_outside_range_fails_validation() {
        let json = r#"{
            "translations": {"standard": "a", "natural": "b", "advanced": "c"},
            "critique": [],
            "estimatedBand": 9.5
        }"#;
        let feedback: TranslationFeedback = serde_json::from_str(json).unwrap();
        assert!(feedback.validate().is_err());
    }

    #[test]
    fn test_writing_fixture_deserializes_and_validates() {
        let feedback: WritingFeedback = serde_json::from_str(WRITING_FIXTURE).unwrap();
        assert!((feedback.overall_band - 6.5).abs() < f64::EPSILON);
        assert!((feedback.criteria.task_response.score - 6.0).abs() < f64::EPSILON);
        assert_eq!(feedback.sentence_level.len(), 2);
        assert_eq!(feedback.sentence_level[0].kind, SentenceKind::Weak);
        assert!(feedback.sentence_level[0].improved.is_some());
        assert_eq!(feedback.sentence_level[1].kind, SentenceKind::Strong);
        assert!(feedback.sentence_level[1].improved.is_none());
        assert_eq!(feedback.upgrades.vocabulary.len(), 1);
        assert_eq!(feedback.revised_paragraphs.len(), 1);
        assert!(feedback.validate().is_ok());
    }

    #[test]
    fn test_writing_missing_criterion_fails_deserialization() {
        let json = r#"{
            "overallBand": 6.0,
            "criteria": {
                "taskResponse": {"score": 6.0, "justification": "ok"},
                "coherence": {"score": 6.0, "justification": "ok"},
                "lexical": {"score": 6.0, "justification": "ok"}
            },
            "sentenceLevel": [],
            "upgrades": {"vocabulary": [], "structures": []},
            "revisedParagraphs": []
        }"#;
        assert!(serde_json::from_str::<WritingFeedback>(json).is_err());
    }

    #[test]
    fn test_writing_blank_justification_fails_validation() {
        let json = r#"{
            "overallBand": 6.0,
            "criteria": {
                "taskResponse": {"score": 6.0, "justification": "ok"},
                "coherence": {"score": 6.0, "justification": ""},
                "lexical": {"score": 6.0, "justification": "ok"},
                "grammar": {"score": 6.0, "justification": "ok"}
            },
            "sentenceLevel": [],
            "upgrades": {"vocabulary": [], "structures": []},
            "revisedParagraphs": []
        }"#;
        let feedback: WritingFeedback = serde_json::from_str(json).unwrap();
        let err = feedback.validate().unwrap_err();
        assert!(
            matches!(err, SchemaError::Constraint { ref path, .. } if path == "criteria.coherence.justification")
        );
    }

    #[test]
    fn test_sentence_kind_wire_form_is_lowercase() {
        assert_eq!(serde_json::to_string(&SentenceKind::Weak).unwrap(), "\"weak\"");
        let kind: SentenceKind = serde_json::from_str("\"strong\"").unwrap();
        assert_eq!(kind, SentenceKind::Strong);
    }

    #[test]
    fn test_mistake_kind_wire_form_is_capitalized() {
        assert_eq!(
            serde_json::to_string(&MistakeKind::Collocation).unwrap(),
            "\"Collocation\""
        );
    }
}
