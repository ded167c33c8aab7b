use crate::core::repository::{LoadStatus, SheetRepository};
use crate::core::{projector, SheetSource};
use crate::domain::model::{
    CreateQuestionPayload, DifficultyFilter, Sheet, SheetFilters, SheetQuestion, SheetSnapshot,
    SheetStats, TopicGroup, UpdateQuestionPayload,
};
use crate::utils::error::Result;

/// Caller-facing facade over the repository and projector.
///
/// Holds the filter state and an observable last-error slot. Structural
/// operations (add/rename/delete/update) record failures and propagate
/// them; best-effort operations (moves, reorders, toggle) record failures
/// and swallow them so a stale drag intent never crashes the UI.
pub struct SheetStore<S: SheetSource> {
    repository: SheetRepository<S>,
    filters: SheetFilters,
    last_error: Option<String>,
}

impl<S: SheetSource> SheetStore<S> {
    pub fn new(source: S) -> Self {
        Self {
            repository: SheetRepository::new(source),
            filters: SheetFilters::default(),
            last_error: None,
        }
    }

    /// Fetch-once initialization. Never fails: a fetch problem degrades to
    /// the empty dataset with `LoadStatus::Offline`.
    pub async fn initialize(&mut self) -> SheetSnapshot {
        self.last_error = None;
        self.repository.load().await
    }

    pub fn status(&self) -> LoadStatus {
        self.repository.status()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ─── Reads ───

    pub fn snapshot(&self) -> Result<SheetSnapshot> {
        self.repository.snapshot()
    }

    pub fn sheet(&self) -> Result<Sheet> {
        self.repository.sheet()
    }

    pub fn questions(&self) -> Result<Vec<SheetQuestion>> {
        self.repository.questions()
    }

    /// Current projection; empty before initialization.
    pub fn topic_groups(&self) -> Vec<TopicGroup> {
        match self.repository.borrow_state() {
            Some((sheet, questions)) => projector::topic_groups(sheet, questions, &self.filters),
            None => Vec::new(),
        }
    }

    pub fn stats(&self) -> SheetStats {
        match self.repository.borrow_state() {
            Some((_, questions)) => projector::stats(questions),
            None => SheetStats::default(),
        }
    }

    // ─── Filters ───

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filters.search_query = query.into();
    }

    pub fn set_difficulty_filter(&mut self, filter: DifficultyFilter) {
        self.filters.difficulty = filter;
    }

    pub fn filters(&self) -> &SheetFilters {
        &self.filters
    }

    // ─── Topic operations ───

    pub fn add_topic(&mut self, name: &str) -> Result<Sheet> {
        let result = self.repository.add_topic(name);
        self.record(result)
    }

    pub fn rename_topic(&mut self, old_name: &str, new_name: &str) -> Result<Sheet> {
        let result = self.repository.rename_topic(old_name, new_name);
        self.record(result)
    }

    pub fn delete_topic(&mut self, name: &str) -> Result<Sheet> {
        let result = self.repository.delete_topic(name);
        self.record(result)
    }

    /// Move the topic at `old_index` to `new_index`. Out-of-range intents
    /// are dropped (stale drag state).
    pub fn move_topic(&mut self, old_index: usize, new_index: usize) {
        let result = (|| {
            let sheet = self.repository.sheet()?;
            let mut order = sheet.config.topic_order;
            if old_index >= order.len() {
                return Ok(());
            }
            let name = order.remove(old_index);
            order.insert(new_index.min(order.len()), name);
            self.repository.reorder_topics(order)?;
            Ok(())
        })();
        self.record_best_effort(result);
    }

    pub fn reorder_topics(&mut self, new_order: Vec<String>) {
        let result = self.repository.reorder_topics(new_order).map(|_| ());
        self.record_best_effort(result);
    }

    // ─── Sub-topic operations ───

    pub fn add_sub_topic(&mut self, topic: &str, name: &str) -> Result<Sheet> {
        let result = self.repository.add_sub_topic(topic, name);
        self.record(result)
    }

    pub fn rename_sub_topic(&mut self, topic: &str, old_name: &str, new_name: &str) -> Result<Sheet> {
        let result = self.repository.rename_sub_topic(topic, old_name, new_name);
        self.record(result)
    }

    pub fn delete_sub_topic(&mut self, topic: &str, name: &str) -> Result<Sheet> {
        let result = self.repository.delete_sub_topic(topic, name);
        self.record(result)
    }

    /// Positional move within a topic's displayed sub-topic list (declared
    /// order plus synthesized undeclared names, the same list the
    /// projection shows).
    pub fn move_sub_topic(&mut self, topic: &str, old_index: usize, new_index: usize) {
        let result = (|| {
            let snapshot = self.repository.snapshot()?;
            let mut names =
                projector::sub_topic_names(&snapshot.sheet, &snapshot.questions, topic);
            if old_index >= names.len() {
                return Ok(());
            }
            let name = names.remove(old_index);
            names.insert(new_index.min(names.len()), name);
            self.repository.reorder_sub_topics(topic, names)?;
            Ok(())
        })();
        self.record_best_effort(result);
    }

    pub fn reorder_sub_topics(&mut self, topic: &str, new_order: Vec<String>) {
        let result = self.repository.reorder_sub_topics(topic, new_order).map(|_| ());
        self.record_best_effort(result);
    }

    // ─── Question operations ───

    pub fn add_question(&mut self, payload: CreateQuestionPayload) -> Result<SheetQuestion> {
        let result = self.repository.add_question(payload);
        self.record(result)
    }

    pub fn update_question(&mut self, payload: UpdateQuestionPayload) -> Result<SheetQuestion> {
        let result = self.repository.update_question(payload);
        self.record(result)
    }

    pub fn delete_question(&mut self, question_id: &str) -> Result<()> {
        let result = self.repository.delete_question(question_id);
        self.record(result)
    }

    pub fn toggle_solved(&mut self, question_id: &str) {
        let result = self.repository.toggle_solved(question_id).map(|_| ());
        self.record_best_effort(result);
    }

    /// Positional move within one (topic, sub_topic) scope, resolved
    /// against the scope's current member list in collection order.
    pub fn move_question(
        &mut self,
        topic: &str,
        sub_topic: Option<&str>,
        old_index: usize,
        new_index: usize,
    ) {
        let result = (|| {
            let questions = self.repository.questions()?;
            let mut ids: Vec<String> = questions
                .iter()
                .filter(|q| {
                    q.topic == topic
                        && match sub_topic {
                            None => q.sub_topic.is_none(),
                            Some(s) => q.sub_topic.as_deref() == Some(s),
                        }
                })
                .map(|q| q.id.clone())
                .collect();
            if old_index >= ids.len() {
                return Ok(());
            }
            let id = ids.remove(old_index);
            ids.insert(new_index.min(ids.len()), id);
            self.repository.reorder_questions(topic, sub_topic, &ids)?;
            Ok(())
        })();
        self.record_best_effort(result);
    }

    pub fn reorder_questions(&mut self, topic: &str, sub_topic: Option<&str>, ids: &[String]) {
        let result = self.repository.reorder_questions(topic, sub_topic, ids);
        self.record_best_effort(result);
    }

    // ─── Error bookkeeping ───

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.last_error = Some(e.to_string());
        }
        result
    }

    fn record_best_effort(&mut self, result: Result<()>) {
        if let Err(e) = result {
            tracing::warn!("Best-effort operation failed: {}", e);
            self.last_error = Some(e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        Difficulty, ProblemRef, QuestionDetails, SheetConfig, SheetData,
    };
    use crate::utils::error::SheetError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FixtureSource {
        data: SheetData,
    }

    #[async_trait]
    impl SheetSource for FixtureSource {
        async fn fetch_sheet(&self) -> Result<SheetData> {
            Ok(self.data.clone())
        }
    }

    fn make_question(id: &str, topic: &str, sub_topic: Option<&str>) -> SheetQuestion {
        SheetQuestion {
            id: id.to_string(),
            sheet_id: "sheet1".to_string(),
            question_id: QuestionDetails {
                id: format!("details-{id}"),
                problem_ref: ProblemRef::Number(1),
                platform: "leetcode".to_string(),
                slug: format!("problem-{id}"),
                name: format!("Problem {id}"),
                difficulty: Difficulty::Easy,
                problem_url: format!("https://leetcode.com/problems/{id}"),
                topics: vec![topic.to_string()],
                description: None,
                company_tags: None,
                verified: None,
            },
            topic: topic.to_string(),
            title: format!("Problem {id}"),
            sub_topic: sub_topic.map(|s| s.to_string()),
            resource: None,
            is_public: true,
            is_solved: false,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    async fn loaded_store(
        topics: &[&str],
        questions: Vec<SheetQuestion>,
    ) -> SheetStore<FixtureSource> {
        let sheet = Sheet {
            id: "sheet1".to_string(),
            name: "Fixture Sheet".to_string(),
            description: "fixture".to_string(),
            config: SheetConfig {
                topic_order: topics.iter().map(|t| t.to_string()).collect(),
                sub_topic_order: HashMap::new(),
                question_order: Vec::new(),
            },
            visibility: "public".to_string(),
            followers: 0,
            tag: Vec::new(),
            slug: "fixture-sheet".to_string(),
            banner: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        };
        let mut store = SheetStore::new(FixtureSource {
            data: SheetData { sheet, questions },
        });
        store.initialize().await;
        store
    }

    #[tokio::test]
    async fn test_projection_is_empty_before_initialize() {
        let store = SheetStore::new(FixtureSource {
            data: SheetData {
                sheet: Sheet {
                    id: "s".to_string(),
                    name: String::new(),
                    description: String::new(),
                    config: SheetConfig {
                        topic_order: Vec::new(),
                        sub_topic_order: HashMap::new(),
                        question_order: Vec::new(),
                    },
                    visibility: "public".to_string(),
                    followers: 0,
                    tag: Vec::new(),
                    slug: String::new(),
                    banner: None,
                    created_at: String::new(),
                    updated_at: String::new(),
                },
                questions: Vec::new(),
            },
        });

        assert!(store.topic_groups().is_empty());
        assert_eq!(store.stats(), SheetStats::default());
        assert!(matches!(store.snapshot(), Err(SheetError::Uninitialized)));
    }

    #[tokio::test]
    async fn test_move_topic_by_index() {
        let mut store = loaded_store(&["Arrays", "Trees", "Graphs"], vec![]).await;

        store.move_topic(0, 2);

        let sheet = store.sheet().unwrap();
        assert_eq!(sheet.config.topic_order, vec!["Trees", "Graphs", "Arrays"]);
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn test_move_topic_out_of_range_is_dropped() {
        let mut store = loaded_store(&["Arrays"], vec![]).await;

        store.move_topic(5, 0);

        let sheet = store.sheet().unwrap();
        assert_eq!(sheet.config.topic_order, vec!["Arrays"]);
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn test_move_sub_topic_resolves_displayed_union() {
        let mut store = loaded_store(
            &["Trees"],
            vec![
                make_question("q1", "Trees", Some("Easy")),
                make_question("q2", "Trees", Some("BST")),
            ],
        )
        .await;

        // Load backfilled ["Easy", "BST"]. A question under an undeclared
        // "Tries" shows up last in the displayed union; moving it by index
        // resolves against that union, so the result declares all three.
        store
            .add_question(CreateQuestionPayload {
                topic: "Trees".to_string(),
                sub_topic: Some("Tries".to_string()),
                title: "Implement Trie".to_string(),
                difficulty: Difficulty::Medium,
                platform: "leetcode".to_string(),
                problem_url: "https://leetcode.com/problems/implement-trie".to_string(),
                resource: None,
            })
            .unwrap();
        store.move_sub_topic("Trees", 2, 0);

        let sheet = store.sheet().unwrap();
        assert_eq!(
            sheet.config.sub_topic_order["Trees"],
            vec!["Tries", "Easy", "BST"]
        );
    }

    #[tokio::test]
    async fn test_move_question_within_scope() {
        let mut store = loaded_store(
            &["Arrays", "Trees"],
            vec![
                make_question("x", "Trees", None),
                make_question("a", "Arrays", Some("Easy")),
                make_question("b", "Arrays", Some("Easy")),
                make_question("c", "Arrays", Some("Easy")),
            ],
        )
        .await;

        // Scope member list is [a, b, c]; move c to the front.
        store.move_question("Arrays", Some("Easy"), 2, 0);

        let questions = store.questions().unwrap();
        let ids: Vec<&str> = questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_structural_error_is_recorded_and_propagated() {
        let mut store = loaded_store(&["Arrays"], vec![]).await;

        let result = store.add_topic("Arrays");

        assert!(matches!(result, Err(SheetError::DuplicateTopic { .. })));
        assert_eq!(
            store.last_error(),
            Some("Topic \"Arrays\" already exists")
        );
    }

    #[tokio::test]
    async fn test_best_effort_error_is_recorded_but_swallowed() {
        let mut store = loaded_store(&["Arrays"], vec![]).await;

        store.toggle_solved("missing");

        assert_eq!(store.last_error(), Some("Question \"missing\" not found"));
        // The store is still usable.
        assert!(store.add_topic("Trees").is_ok());
    }

    #[tokio::test]
    async fn test_initialize_clears_last_error() {
        let mut store = loaded_store(&["Arrays"], vec![]).await;
        store.toggle_solved("missing");
        assert!(store.last_error().is_some());

        store.initialize().await;

        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn test_filters_flow_into_projection() {
        let mut store = loaded_store(
            &["Arrays"],
            vec![
                make_question("q1", "Arrays", Some("Easy")),
                make_question("q2", "Arrays", Some("Easy")),
            ],
        )
        .await;

        store.set_search_query("problem q1");
        let groups = store.topic_groups();
        assert_eq!(groups[0].sub_topics[0].questions.len(), 1);
        assert_eq!(groups[0].sub_topics[0].all_questions.len(), 2);

        store.set_search_query("");
        store.set_difficulty_filter(DifficultyFilter::Only(Difficulty::Hard));
        let groups = store.topic_groups();
        assert!(groups[0].sub_topics[0].questions.is_empty());
        assert_eq!(groups[0].sub_topics[0].all_questions.len(), 2);
    }
}
