//! Response schema descriptors binding each evaluation call.
//!
//! The descriptor returned here is serialized into the request's
//! `responseSchema` and then reused to validate the payload that comes back,
//! before it is deserialized into the types in [`super::models`].

use crate::llm_client::schema::Schema;

/// Descriptor for [`super::models::TranslationFeedback`].
pub fn translation_feedback_schema() -> Schema {
    Schema::object(vec![
        (
            "translations",
            Schema::object(vec![
                ("standard", Schema::string()),
                ("natural", Schema::string()),
                ("advanced", Schema::string()),
            ]),
        ),
        (
            "critique",
            Schema::array(Schema::object(vec![
                (
                    "type",
                    Schema::string_enum(vec![
                        "Grammar",
                        "Vocabulary",
                        "Collocation",
                        "Logic",
                        "Style",
                    ]),
                ),
                ("issue", Schema::string()),
                ("suggestion", Schema::string()),
            ])),
        ),
        ("estimatedBand", Schema::number()),
    ])
}

/// Descriptor for [`super::models::WritingFeedback`].
pub fn writing_feedback_schema() -> Schema {
    let criterion = || {
        Schema::object(vec![
            ("score", Schema::number()),
            ("justification", Schema::string()),
        ])
    };

    Schema::object(vec![
        ("overallBand", Schema::number()),
        (
            "criteria",
            Schema::object(vec![
                ("taskResponse", criterion()),
                ("coherence", criterion()),
                ("lexical", criterion()),
                ("grammar", criterion()),
            ]),
        ),
        (
            "sentenceLevel",
            Schema::array(
                Schema::object(vec![
                    ("original", Schema::string()),
                    ("type", Schema::string_enum(vec!["strong", "weak"])),
                    ("explanation", Schema::string()),
                    ("improved", Schema::string()),
                ])
                // `improved` accompanies weak sentences only
                .required(vec!["original", "type", "explanation"]),
            ),
        ),
        (
            "upgrades",
            Schema::object(vec![
                (
                    "vocabulary",
                    Schema::array(Schema::object(vec![
                        ("old", Schema::string()),
                        ("improved", Schema::string()),
                        ("context", Schema::string()),
                    ])),
                ),
                (
                    "structures",
                    Schema::array(Schema::object(vec![
                        ("original", Schema::string()),
                        ("improved", Schema::string()),
                    ])),
                ),
            ]),
        ),
        (
            "revisedParagraphs",
            Schema::array(Schema::object(vec![
                ("original", Schema::string()),
                ("revised", Schema::string()),
            ])),
        ),
    ])
}
