//! Fixed practice content served to the client. In-memory only — the sample
//! set is part of the product, not user-configurable, and nothing here is
//! persisted or sourced externally.

use axum::Json;
use serde::Serialize;

/// Chinese practice sentences for translation mode, cycled by index.
pub const SAMPLE_SENTENCES: &[&str] = &[
    "随着科技的快速发展，人们的沟通方式发生了巨大的变化。",
    "政府应该投入更多资金在公共交通系统上，以减少环境污染。",
    "虽然远程学习变得越来越流行，但它不能完全取代传统的课堂教学。",
    "在竞争激烈的现代社会，掌握多门语言是一个巨大的优势。",
    "有些专家认为，过度使用社交媒体会导致青少年出现心理健康问题。",
];

/// An essay prompt as presented in writing mode.
#[derive(Debug, Clone, Serialize)]
pub struct EssayPrompt {
    pub title: &'static str,
    pub content: &'static str,
}

/// Two Task 2 discussion prompts and one Task 1 data-description prompt.
pub const SAMPLE_PROMPTS: &[EssayPrompt] = &[
    EssayPrompt {
        title: "Task 2: Global Warming",
        content: "Some people believe that it is the responsibility of individuals to save the \
                  environment, while others believe that the government and big companies should \
                  take the main responsibility. Discuss both views and give your opinion.",
    },
    EssayPrompt {
        title: "Task 2: Urbanization",
        content: "The rapid growth of cities has led to several problems. What are the main \
                  problems associated with urbanization? What solutions can you suggest?",
    },
    EssayPrompt {
        title: "Task 1: Academic (Describing Data)",
        content: "The graph below shows the changes in the number of international students \
                  attending universities in a particular country from 2005 to 2015. Summarize the \
                  information by selecting and reporting the main features, and make comparisons \
                  where relevant.",
    },
];

/// GET /api/v1/samples/sentences
pub async fn handle_sample_sentences() -> Json<&'static [&'static str]> {
    Json(SAMPLE_SENTENCES)
}

/// GET /api/v1/samples/prompts
pub async fn handle_sample_prompts() -> Json<&'static [EssayPrompt]> {
    Json(SAMPLE_PROMPTS)
}
