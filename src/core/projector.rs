//! Read-only derivation of the nested display tree and aggregate stats.
//!
//! Everything here is a pure function over borrowed canonical state; the
//! only allocations are the view nodes themselves.

use std::collections::HashMap;

use crate::domain::model::{
    Sheet, SheetFilters, SheetQuestion, SheetStats, SubTopicGroup, TopicGroup, TopicTally,
};

/// Build one `TopicGroup` per `topic_order` entry.
///
/// The sub-topic list of a group is the declared order unioned with any
/// sub-topic observed among the topic's questions but absent from the
/// declared order: declared names first, then undeclared names in
/// first-observed order. The flat collection is the source of truth for a
/// sub-topic's existence; the declared order is only a display hint and can
/// drift after partial updates.
pub fn topic_groups(
    sheet: &Sheet,
    questions: &[SheetQuestion],
    filters: &SheetFilters,
) -> Vec<TopicGroup> {
    sheet
        .config
        .topic_order
        .iter()
        .map(|topic_name| {
            let topic_questions: Vec<&SheetQuestion> =
                questions.iter().filter(|q| &q.topic == topic_name).collect();

            let names = sub_topic_names_for(sheet, &topic_questions, topic_name);

            let sub_topics = names
                .iter()
                .map(|name| {
                    let all_questions: Vec<SheetQuestion> = topic_questions
                        .iter()
                        .filter(|q| q.sub_topic.as_deref() == Some(name.as_str()))
                        .map(|q| (*q).clone())
                        .collect();
                    let filtered = all_questions
                        .iter()
                        .filter(|q| matches_filters(q, filters))
                        .cloned()
                        .collect();
                    SubTopicGroup {
                        name: name.clone(),
                        questions: filtered,
                        all_questions,
                    }
                })
                .collect();

            let all_direct: Vec<SheetQuestion> = topic_questions
                .iter()
                .filter(|q| q.sub_topic.is_none())
                .map(|q| (*q).clone())
                .collect();
            let filtered_direct = all_direct
                .iter()
                .filter(|q| matches_filters(q, filters))
                .cloned()
                .collect();

            TopicGroup {
                name: topic_name.clone(),
                sub_topics,
                questions: filtered_direct,
                all_questions: all_direct,
            }
        })
        .collect()
}

/// The sub-topic names a topic currently displays, declared-first. Also
/// the member list positional move intents resolve against.
pub fn sub_topic_names(sheet: &Sheet, questions: &[SheetQuestion], topic: &str) -> Vec<String> {
    let topic_questions: Vec<&SheetQuestion> =
        questions.iter().filter(|q| q.topic == topic).collect();
    sub_topic_names_for(sheet, &topic_questions, topic)
}

fn sub_topic_names_for(
    sheet: &Sheet,
    topic_questions: &[&SheetQuestion],
    topic: &str,
) -> Vec<String> {
    let mut names = sheet
        .config
        .sub_topic_order
        .get(topic)
        .cloned()
        .unwrap_or_default();
    for q in topic_questions {
        if let Some(st) = &q.sub_topic {
            if !names.contains(st) {
                names.push(st.clone());
            }
        }
    }
    names
}

fn matches_filters(question: &SheetQuestion, filters: &SheetFilters) -> bool {
    matches_search(question, &filters.search_query)
        && filters.difficulty.matches(question.question_id.difficulty)
}

fn matches_search(question: &SheetQuestion, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    question.title.to_lowercase().contains(&needle)
        || question.question_id.name.to_lowercase().contains(&needle)
        || question.topic.to_lowercase().contains(&needle)
        || question
            .sub_topic
            .as_ref()
            .is_some_and(|st| st.to_lowercase().contains(&needle))
}

pub fn stats(questions: &[SheetQuestion]) -> SheetStats {
    let total_questions = questions.len();
    let solved_questions = questions.iter().filter(|q| q.is_solved).count();

    let mut topic_stats: HashMap<String, TopicTally> = HashMap::new();
    for q in questions {
        let tally = topic_stats.entry(q.topic.clone()).or_default();
        tally.total += 1;
        if q.is_solved {
            tally.solved += 1;
        }
    }

    SheetStats {
        total_questions,
        solved_questions,
        progress_percent: progress_percent(solved_questions, total_questions),
        topic_stats,
    }
}

/// Integer percentage, rounded; 0 for an empty collection.
pub fn progress_percent(solved: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((solved as f64 / total as f64) * 100.0).round() as u8
}
