use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Problem difficulty as delivered by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Basic,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Basic => "Basic",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty selector for the projected view: wildcard or exact match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DifficultyFilter {
    #[default]
    All,
    Only(Difficulty),
}

impl DifficultyFilter {
    pub fn matches(&self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::All => true,
            DifficultyFilter::Only(d) => *d == difficulty,
        }
    }
}

/// Upstream problem ids arrive as either a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProblemRef {
    Text(String),
    Number(i64),
}

/// The underlying problem referenced by a sheet question. Its identity is
/// distinct from the identity of the `SheetQuestion` that embeds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDetails {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "id")]
    pub problem_ref: ProblemRef,
    pub platform: String,
    pub slug: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub problem_url: String,
    pub topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

/// One entry of the flat question collection. Array position is the
/// authoritative order for questions sharing the same (topic, sub_topic)
/// scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetQuestion {
    #[serde(rename = "_id")]
    pub id: String,
    pub sheet_id: String,
    pub question_id: QuestionDetails,
    pub topic: String,
    pub title: String,
    pub sub_topic: Option<String>,
    pub resource: Option<String>,
    pub is_public: bool,
    pub is_solved: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Declared orderings. `topic_order` and the per-topic lists in
/// `sub_topic_order` are display ordering hints; `question_order` is carried
/// from the upstream payload but array position of the question collection
/// is what actually orders questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetConfig {
    pub topic_order: Vec<String>,
    #[serde(default)]
    pub sub_topic_order: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub question_order: Vec<String>,
}

/// The root aggregate. Metadata fields are passive; the orderings in
/// `config` are what the repository maintains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub config: SheetConfig,
    pub visibility: String,
    pub followers: u64,
    pub tag: Vec<String>,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub code: i64,
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    pub sheet: Sheet,
    pub questions: Vec<SheetQuestion>,
}

/// JSON envelope returned by the remote endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetEnvelope {
    pub status: ApiStatus,
    #[serde(default)]
    pub data: Option<SheetData>,
}

/// Owned deep copy of the canonical state, handed to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSnapshot {
    pub sheet: Sheet,
    pub questions: Vec<SheetQuestion>,
}

/// Intent to create a question.
#[derive(Debug, Clone)]
pub struct CreateQuestionPayload {
    pub topic: String,
    pub sub_topic: Option<String>,
    pub title: String,
    pub difficulty: Difficulty,
    pub platform: String,
    pub problem_url: String,
    pub resource: Option<String>,
}

/// Intent to partially update a question. Outer `None` means "leave the
/// field unchanged"; for `sub_topic` and `resource`, `Some(None)` clears
/// the field and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default)]
pub struct UpdateQuestionPayload {
    pub id: String,
    pub title: Option<String>,
    pub topic: Option<String>,
    pub sub_topic: Option<Option<String>>,
    pub resource: Option<Option<String>>,
}

/// Projected sub-topic node. `questions` is the filtered list for display,
/// `all_questions` the unfiltered list for counts; never confuse the two.
#[derive(Debug, Clone, Serialize)]
pub struct SubTopicGroup {
    pub name: String,
    pub questions: Vec<SheetQuestion>,
    pub all_questions: Vec<SheetQuestion>,
}

/// Projected topic node. `questions`/`all_questions` hold the questions
/// sitting directly under the topic (no sub-topic).
#[derive(Debug, Clone, Serialize)]
pub struct TopicGroup {
    pub name: String,
    pub sub_topics: Vec<SubTopicGroup>,
    pub questions: Vec<SheetQuestion>,
    pub all_questions: Vec<SheetQuestion>,
}

/// Filter state applied by the view projector.
#[derive(Debug, Clone, Default)]
pub struct SheetFilters {
    pub search_query: String,
    pub difficulty: DifficultyFilter,
}

/// Per-topic solved tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopicTally {
    pub total: usize,
    pub solved: usize,
}

/// Aggregate stats over the whole question collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetStats {
    pub total_questions: usize,
    pub solved_questions: usize,
    pub progress_percent: u8,
    pub topic_stats: HashMap<String, TopicTally>,
}
