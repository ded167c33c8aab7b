use std::collections::HashMap;

use chrono::Utc;

use crate::core::SheetSource;
use crate::domain::model::{
    CreateQuestionPayload, ProblemRef, QuestionDetails, Sheet, SheetConfig, SheetData,
    SheetQuestion, SheetSnapshot, UpdateQuestionPayload,
};
use crate::utils::error::{Result, SheetError};
use crate::utils::id::generate_id;

/// How the canonical dataset came to be. `Offline` marks the synthesized
/// empty fallback so callers can tell it apart from a genuinely empty
/// remote sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    NotLoaded,
    Remote,
    Offline,
}

/// Sole writable owner of the canonical Sheet and question collection.
///
/// Every mutation is atomic from the caller's perspective and every value
/// handed out is an owned deep copy; callers can never alias canonical
/// state. Only `load` suspends; all other operations are synchronous and
/// in-memory.
pub struct SheetRepository<S: SheetSource> {
    source: S,
    sheet: Option<Sheet>,
    questions: Vec<SheetQuestion>,
    status: LoadStatus,
}

impl<S: SheetSource> SheetRepository<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            sheet: None,
            questions: Vec::new(),
            status: LoadStatus::NotLoaded,
        }
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_initialized(&self) -> bool {
        self.status != LoadStatus::NotLoaded
    }

    /// Fetch the dataset once. Subsequent calls return deep-copy snapshots
    /// of the cached state without refetching. A failed fetch degrades to a
    /// synthesized empty sheet instead of propagating, so the UI never
    /// blocks on the network.
    pub async fn load(&mut self) -> SheetSnapshot {
        if self.is_initialized() {
            return self.snapshot_unchecked();
        }

        match self.source.fetch_sheet().await {
            Ok(SheetData {
                mut sheet,
                questions,
            }) => {
                backfill_sub_topic_orders(&mut sheet.config, &questions);
                tracing::info!(
                    "Loaded sheet \"{}\" with {} topics and {} questions",
                    sheet.name,
                    sheet.config.topic_order.len(),
                    questions.len()
                );
                self.sheet = Some(sheet);
                self.questions = questions;
                self.status = LoadStatus::Remote;
            }
            Err(e) => {
                tracing::warn!("Sheet fetch failed, using empty dataset: {}", e);
                self.sheet = Some(synthesize_empty_sheet());
                self.questions = Vec::new();
                self.status = LoadStatus::Offline;
            }
        }

        self.snapshot_unchecked()
    }

    pub fn snapshot(&self) -> Result<SheetSnapshot> {
        self.sheet
            .as_ref()
            .map(|sheet| SheetSnapshot {
                sheet: sheet.clone(),
                questions: self.questions.clone(),
            })
            .ok_or(SheetError::Uninitialized)
    }

    pub fn sheet(&self) -> Result<Sheet> {
        self.sheet.clone().ok_or(SheetError::Uninitialized)
    }

    pub fn questions(&self) -> Result<Vec<SheetQuestion>> {
        self.sheet
            .as_ref()
            .map(|_| self.questions.clone())
            .ok_or(SheetError::Uninitialized)
    }

    /// Borrow canonical state for in-crate projection. External callers go
    /// through the cloning accessors above.
    pub(crate) fn borrow_state(&self) -> Option<(&Sheet, &[SheetQuestion])> {
        self.sheet
            .as_ref()
            .map(|sheet| (sheet, self.questions.as_slice()))
    }

    fn snapshot_unchecked(&self) -> SheetSnapshot {
        SheetSnapshot {
            sheet: self.sheet.clone().unwrap_or_else(synthesize_empty_sheet),
            questions: self.questions.clone(),
        }
    }

    fn sheet_mut(&mut self) -> Result<&mut Sheet> {
        self.sheet.as_mut().ok_or(SheetError::Uninitialized)
    }

    // ─── Topic operations ───

    pub fn add_topic(&mut self, name: &str) -> Result<Sheet> {
        let sheet = self.sheet_mut()?;
        if sheet.config.topic_order.iter().any(|t| t == name) {
            return Err(SheetError::DuplicateTopic {
                name: name.to_string(),
            });
        }
        sheet.config.topic_order.push(name.to_string());
        sheet
            .config
            .sub_topic_order
            .insert(name.to_string(), Vec::new());
        sheet.updated_at = Utc::now().to_rfc3339();
        tracing::debug!("Added topic \"{}\"", name);
        Ok(sheet.clone())
    }

    /// Replaces the name in place (position preserved), re-keys the
    /// sub-topic order, and rescopes every question under the old name.
    pub fn rename_topic(&mut self, old_name: &str, new_name: &str) -> Result<Sheet> {
        let sheet = self.sheet.as_mut().ok_or(SheetError::Uninitialized)?;
        let idx = sheet
            .config
            .topic_order
            .iter()
            .position(|t| t == old_name)
            .ok_or_else(|| SheetError::TopicNotFound {
                name: old_name.to_string(),
            })?;
        if old_name != new_name && sheet.config.topic_order.iter().any(|t| t == new_name) {
            return Err(SheetError::DuplicateTopic {
                name: new_name.to_string(),
            });
        }

        sheet.config.topic_order[idx] = new_name.to_string();
        if let Some(subs) = sheet.config.sub_topic_order.remove(old_name) {
            sheet.config.sub_topic_order.insert(new_name.to_string(), subs);
        }
        for q in self.questions.iter_mut().filter(|q| q.topic == old_name) {
            q.topic = new_name.to_string();
        }
        sheet.updated_at = Utc::now().to_rfc3339();
        tracing::debug!("Renamed topic \"{}\" -> \"{}\"", old_name, new_name);
        Ok(sheet.clone())
    }

    /// Idempotent: removing an absent topic is a no-op for the orderings,
    /// and the cascade delete runs against whatever matches.
    pub fn delete_topic(&mut self, name: &str) -> Result<Sheet> {
        let sheet = self.sheet.as_mut().ok_or(SheetError::Uninitialized)?;
        sheet.config.topic_order.retain(|t| t != name);
        sheet.config.sub_topic_order.remove(name);
        let before = self.questions.len();
        self.questions.retain(|q| q.topic != name);
        sheet.updated_at = Utc::now().to_rfc3339();
        tracing::debug!(
            "Deleted topic \"{}\" ({} questions cascaded)",
            name,
            before - self.questions.len()
        );
        Ok(sheet.clone())
    }

    /// Wholesale replacement. The caller's sequence is trusted; no
    /// permutation check.
    pub fn reorder_topics(&mut self, new_order: Vec<String>) -> Result<Sheet> {
        let sheet = self.sheet_mut()?;
        sheet.config.topic_order = new_order;
        sheet.updated_at = Utc::now().to_rfc3339();
        Ok(sheet.clone())
    }

    // ─── Sub-topic operations ───

    /// A topic with no declared order list gets one created on the fly.
    pub fn add_sub_topic(&mut self, topic: &str, name: &str) -> Result<Sheet> {
        let sheet = self.sheet_mut()?;
        let subs = sheet
            .config
            .sub_topic_order
            .entry(topic.to_string())
            .or_default();
        if subs.iter().any(|s| s == name) {
            return Err(SheetError::DuplicateSubTopic {
                topic: topic.to_string(),
                name: name.to_string(),
            });
        }
        subs.push(name.to_string());
        sheet.updated_at = Utc::now().to_rfc3339();
        tracing::debug!("Added sub-topic \"{}\" under \"{}\"", name, topic);
        Ok(sheet.clone())
    }

    pub fn rename_sub_topic(&mut self, topic: &str, old_name: &str, new_name: &str) -> Result<Sheet> {
        let sheet = self.sheet.as_mut().ok_or(SheetError::Uninitialized)?;
        let subs = sheet
            .config
            .sub_topic_order
            .get_mut(topic)
            .ok_or_else(|| SheetError::SubTopicNotFound {
                topic: topic.to_string(),
                name: old_name.to_string(),
            })?;
        let idx = subs
            .iter()
            .position(|s| s == old_name)
            .ok_or_else(|| SheetError::SubTopicNotFound {
                topic: topic.to_string(),
                name: old_name.to_string(),
            })?;
        if old_name != new_name && subs.iter().any(|s| s == new_name) {
            return Err(SheetError::DuplicateSubTopic {
                topic: topic.to_string(),
                name: new_name.to_string(),
            });
        }

        subs[idx] = new_name.to_string();
        for q in self
            .questions
            .iter_mut()
            .filter(|q| q.topic == topic && q.sub_topic.as_deref() == Some(old_name))
        {
            q.sub_topic = Some(new_name.to_string());
        }
        sheet.updated_at = Utc::now().to_rfc3339();
        tracing::debug!(
            "Renamed sub-topic \"{}\" -> \"{}\" under \"{}\"",
            old_name,
            new_name,
            topic
        );
        Ok(sheet.clone())
    }

    pub fn delete_sub_topic(&mut self, topic: &str, name: &str) -> Result<Sheet> {
        let sheet = self.sheet.as_mut().ok_or(SheetError::Uninitialized)?;
        if let Some(subs) = sheet.config.sub_topic_order.get_mut(topic) {
            subs.retain(|s| s != name);
        }
        self.questions
            .retain(|q| !(q.topic == topic && q.sub_topic.as_deref() == Some(name)));
        sheet.updated_at = Utc::now().to_rfc3339();
        tracing::debug!("Deleted sub-topic \"{}\" under \"{}\"", name, topic);
        Ok(sheet.clone())
    }

    pub fn reorder_sub_topics(&mut self, topic: &str, new_order: Vec<String>) -> Result<Sheet> {
        let sheet = self.sheet_mut()?;
        sheet
            .config
            .sub_topic_order
            .insert(topic.to_string(), new_order);
        sheet.updated_at = Utc::now().to_rfc3339();
        Ok(sheet.clone())
    }

    // ─── Question operations ───

    /// New questions land at the end of the flat collection; no in-scope
    /// position is promised beyond "last overall".
    pub fn add_question(&mut self, payload: CreateQuestionPayload) -> Result<SheetQuestion> {
        let sheet_id = self
            .sheet
            .as_ref()
            .map(|s| s.id.clone())
            .ok_or(SheetError::Uninitialized)?;
        let now = Utc::now().to_rfc3339();

        let question = SheetQuestion {
            id: generate_id(),
            sheet_id,
            question_id: QuestionDetails {
                id: generate_id(),
                problem_ref: ProblemRef::Text(generate_id()),
                platform: payload.platform,
                slug: derive_slug(&payload.title),
                name: payload.title.clone(),
                difficulty: payload.difficulty,
                problem_url: payload.problem_url,
                topics: vec![payload.topic.clone()],
                description: None,
                company_tags: None,
                verified: None,
            },
            topic: payload.topic,
            title: payload.title,
            sub_topic: payload.sub_topic,
            resource: payload.resource,
            is_public: true,
            is_solved: false,
            created_at: now.clone(),
            updated_at: now,
        };

        tracing::debug!("Added question \"{}\" (id={})", question.title, question.id);
        self.questions.push(question.clone());
        Ok(question)
    }

    /// Partial update: `None` fields stay untouched; a title change keeps
    /// the nested problem name in sync.
    pub fn update_question(&mut self, payload: UpdateQuestionPayload) -> Result<SheetQuestion> {
        if self.sheet.is_none() {
            return Err(SheetError::Uninitialized);
        }
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == payload.id)
            .ok_or_else(|| SheetError::QuestionNotFound {
                id: payload.id.clone(),
            })?;

        if let Some(title) = payload.title {
            question.question_id.name = title.clone();
            question.title = title;
        }
        if let Some(topic) = payload.topic {
            question.topic = topic;
        }
        if let Some(sub_topic) = payload.sub_topic {
            question.sub_topic = sub_topic;
        }
        if let Some(resource) = payload.resource {
            question.resource = resource;
        }
        question.updated_at = Utc::now().to_rfc3339();

        Ok(question.clone())
    }

    pub fn delete_question(&mut self, question_id: &str) -> Result<()> {
        if self.sheet.is_none() {
            return Err(SheetError::Uninitialized);
        }
        self.questions.retain(|q| q.id != question_id);
        Ok(())
    }

    pub fn toggle_solved(&mut self, question_id: &str) -> Result<SheetQuestion> {
        if self.sheet.is_none() {
            return Err(SheetError::Uninitialized);
        }
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or_else(|| SheetError::QuestionNotFound {
                id: question_id.to_string(),
            })?;
        question.is_solved = !question.is_solved;
        question.updated_at = Utc::now().to_rfc3339();
        Ok(question.clone())
    }

    /// Reorder the questions of one (topic, sub_topic) scope without
    /// disturbing any other scope.
    ///
    /// The flat collection is partitioned into in-scope and out-of-scope
    /// runs, the caller's ids are resolved against the original collection
    /// (unresolved ids dropped silently), and the resolved block is spliced
    /// back in where the first in-scope element originally sat relative to
    /// the out-of-scope elements. If nothing matches the scope, the block
    /// lands at the end.
    pub fn reorder_questions(
        &mut self,
        topic: &str,
        sub_topic: Option<&str>,
        ordered_ids: &[String],
    ) -> Result<()> {
        if self.sheet.is_none() {
            return Err(SheetError::Uninitialized);
        }

        let in_scope = |q: &SheetQuestion| {
            q.topic == topic
                && match sub_topic {
                    None => q.sub_topic.is_none(),
                    Some(s) => q.sub_topic.as_deref() == Some(s),
                }
        };

        let resolved: Vec<SheetQuestion> = ordered_ids
            .iter()
            .filter_map(|id| self.questions.iter().find(|q| &q.id == id))
            .cloned()
            .collect();
        if resolved.len() < ordered_ids.len() {
            tracing::debug!(
                "Dropped {} unresolved ids from reorder request",
                ordered_ids.len() - resolved.len()
            );
        }

        let first_match = self.questions.iter().position(|q| in_scope(q));
        let mut rebuilt: Vec<SheetQuestion> = self
            .questions
            .iter()
            .filter(|q| !in_scope(q))
            .cloned()
            .collect();

        match first_match {
            None => rebuilt.extend(resolved),
            Some(first_idx) => {
                // Out-of-scope elements that preceded the first in-scope one
                // mark where the scope block re-enters.
                let insert_at = self.questions[..first_idx]
                    .iter()
                    .filter(|q| !in_scope(q))
                    .count();
                rebuilt.splice(insert_at..insert_at, resolved);
            }
        }

        self.questions = rebuilt;
        Ok(())
    }
}

/// Repair datasets that declare topics without sub-topic ordering metadata:
/// a missing entry becomes the distinct sub-topics observed among that
/// topic's questions, in first-seen order.
fn backfill_sub_topic_orders(config: &mut SheetConfig, questions: &[SheetQuestion]) {
    let missing: Vec<String> = config
        .topic_order
        .iter()
        .filter(|t| !config.sub_topic_order.contains_key(*t))
        .cloned()
        .collect();

    for topic in missing {
        let mut subs: Vec<String> = Vec::new();
        for q in questions.iter().filter(|q| q.topic == topic) {
            if let Some(st) = &q.sub_topic {
                if !subs.contains(st) {
                    subs.push(st.clone());
                }
            }
        }
        config.sub_topic_order.insert(topic, subs);
    }
}

fn synthesize_empty_sheet() -> Sheet {
    let now = Utc::now().to_rfc3339();
    Sheet {
        id: generate_id(),
        name: "My Question Sheet".to_string(),
        description: "A custom question sheet".to_string(),
        config: SheetConfig {
            topic_order: Vec::new(),
            sub_topic_order: HashMap::new(),
            question_order: Vec::new(),
        },
        visibility: "public".to_string(),
        followers: 0,
        tag: Vec::new(),
        slug: "my-question-sheet".to_string(),
        banner: None,
        created_at: now.clone(),
        updated_at: now,
    }
}

fn derive_slug(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
