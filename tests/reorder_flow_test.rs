use httpmock::prelude::*;
use qsheet::{CliConfig, HttpSheetSource, SheetStore};

fn question_json(id: &str, topic: &str, sub_topic: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "sheetId": "sheet1",
        "questionId": {
            "_id": format!("details-{id}"),
            "id": 7,
            "platform": "leetcode",
            "slug": format!("problem-{id}"),
            "name": format!("Problem {id}"),
            "difficulty": "Medium",
            "problemUrl": format!("https://leetcode.com/problems/{id}"),
            "topics": [topic]
        },
        "topic": topic,
        "title": format!("Problem {id}"),
        "subTopic": sub_topic,
        "resource": null,
        "isPublic": true,
        "isSolved": false,
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    })
}

fn envelope() -> serde_json::Value {
    serde_json::json!({
        "status": {"code": 200, "success": true, "message": "ok", "error": null},
        "data": {
            "sheet": {
                "_id": "sheet1",
                "name": "SDE Sheet",
                "description": "",
                "config": {
                    "topicOrder": ["Arrays", "Trees"],
                    "subTopicOrder": {"Arrays": ["Easy"]},
                    "questionOrder": []
                },
                "visibility": "public",
                "followers": 0,
                "tag": [],
                "slug": "sde-sheet",
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            },
            "questions": [
                question_json("x", "Trees", None),
                question_json("a", "Arrays", Some("Easy")),
                question_json("b", "Arrays", Some("Easy")),
                question_json("c", "Arrays", Some("Easy")),
            ]
        }
    })
}

async fn loaded_store() -> (MockServer, SheetStore<HttpSheetSource<CliConfig>>) {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/get-sheet-by-slug/sde-sheet");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(envelope());
    });

    let config = CliConfig {
        api_endpoint: server.url(""),
        sheet_slug: "sde-sheet".to_string(),
        verbose: false,
    };
    let mut store = SheetStore::new(HttpSheetSource::new(config));
    store.initialize().await;
    (server, store)
}

fn question_ids(store: &SheetStore<HttpSheetSource<CliConfig>>) -> Vec<String> {
    store
        .questions()
        .unwrap()
        .into_iter()
        .map(|q| q.id)
        .collect()
}

#[tokio::test]
async fn test_scoped_reorder_keeps_out_of_scope_order() {
    let (_server, mut store) = loaded_store().await;

    store.reorder_questions(
        "Arrays",
        Some("Easy"),
        &["c".to_string(), "a".to_string(), "b".to_string()],
    );

    assert_eq!(question_ids(&store), vec!["x", "c", "a", "b"]);
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn test_scoped_reorder_drops_stale_ids() {
    let (_server, mut store) = loaded_store().await;

    store.reorder_questions(
        "Arrays",
        Some("Easy"),
        &[
            "b".to_string(),
            "deleted-on-another-screen".to_string(),
            "c".to_string(),
            "a".to_string(),
        ],
    );

    assert_eq!(question_ids(&store), vec!["x", "b", "c", "a"]);
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn test_move_question_intent_resolves_scope_members() {
    let (_server, mut store) = loaded_store().await;

    // Scope members are [a, b, c]; drag the last one to the top.
    store.move_question("Arrays", Some("Easy"), 2, 0);

    assert_eq!(question_ids(&store), vec!["x", "c", "a", "b"]);
}

#[tokio::test]
async fn test_move_topic_and_sub_topic_intents() {
    let (_server, mut store) = loaded_store().await;

    store.move_topic(1, 0);
    let sheet = store.sheet().unwrap();
    assert_eq!(sheet.config.topic_order, vec!["Trees", "Arrays"]);

    // Trees' sub-topic list is backfilled as empty (no sub-topics observed),
    // so an out-of-range move is dropped without error.
    store.move_sub_topic("Trees", 3, 0);
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn test_reorder_survives_rename_cascade() {
    let (_server, mut store) = loaded_store().await;

    store.reorder_questions(
        "Arrays",
        Some("Easy"),
        &["c".to_string(), "b".to_string(), "a".to_string()],
    );
    store.rename_sub_topic("Arrays", "Easy", "Warmup").unwrap();

    // The rename rescopes the questions without disturbing their order.
    assert_eq!(question_ids(&store), vec!["x", "c", "b", "a"]);
    let questions = store.questions().unwrap();
    assert!(questions
        .iter()
        .filter(|q| q.topic == "Arrays")
        .all(|q| q.sub_topic.as_deref() == Some("Warmup")));
}
