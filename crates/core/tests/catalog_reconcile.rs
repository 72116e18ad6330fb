//! Reconciliation against a real SQLite database.

#![allow(clippy::unwrap_used)]

use ballot_common::AppError;
use ballot_core::{
    Catalog, CatalogEntry, CatalogOption, DEFAULT_CATALOG, ParticipantService, QuestionService,
    ReconcileService, VotingService,
};
use ballot_db::{
    entities::{QuestionOption, Vote, VotingConfig},
    repositories::QuestionWithOptions,
    test_utils::TestDatabase,
};
use sea_orm::{EntityTrait, PaginatorTrait};

const fn opt(order_key: i32, text: &'static str) -> CatalogOption {
    CatalogOption { order_key, text }
}

const V1: &Catalog = &[
    CatalogEntry {
        order_key: 1,
        text: "Where should we go?",
        options: &[opt(1, "Beach Town"), opt(2, "Redwood Hike")],
    },
    CatalogEntry {
        order_key: 2,
        text: "What should we eat?",
        options: &[opt(1, "Tacos"), opt(2, "Sushi"), opt(3, "Pizza")],
    },
];

// Same keys as V1, reworded
const V1_REWORDED: &Catalog = &[
    CatalogEntry {
        order_key: 1,
        text: "Where should we celebrate?",
        options: &[opt(1, "Beach Town"), opt(2, "Redwood Forest Hike")],
    },
    CatalogEntry {
        order_key: 2,
        text: "What should we eat?",
        options: &[opt(1, "Tacos"), opt(2, "Sushi"), opt(3, "Pizza")],
    },
];

// V1 without question 2
const V1_TRIMMED: &Catalog = &[CatalogEntry {
    order_key: 1,
    text: "Where should we go?",
    options: &[opt(1, "Beach Town"), opt(2, "Redwood Hike")],
}];

const V1_FEWER_OPTIONS: &Catalog = &[
    CatalogEntry {
        order_key: 1,
        text: "Where should we go?",
        options: &[opt(1, "Beach Town"), opt(2, "Redwood Hike")],
    },
    CatalogEntry {
        order_key: 2,
        text: "What should we eat?",
        options: &[opt(1, "Tacos"), opt(2, "Sushi")],
    },
];

fn by_key(questions: &[QuestionWithOptions], order_key: i32) -> &QuestionWithOptions {
    questions
        .iter()
        .find(|q| q.question.order_key == order_key)
        .unwrap()
}

#[tokio::test]
async fn test_default_catalog_seeds_empty_database() {
    let db = TestDatabase::new().await.unwrap();
    let service = ReconcileService::new(db.connection());

    let report = service.reconcile(DEFAULT_CATALOG).await.unwrap();

    assert_eq!(report.questions_created, 6);
    assert_eq!(report.options_created, 22);
    assert!(report.config_created);
    assert_eq!(report.total_mutations(), 29);

    let questions = QuestionService::new(db.connection()).list_active().await.unwrap();
    let keys: Vec<i32> = questions.iter().map(|q| q.question.order_key).collect();
    assert_eq!(keys, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(questions[0].options[1].text, "Redwood Hike");
}

#[tokio::test]
async fn test_second_run_is_a_no_op() {
    let db = TestDatabase::new().await.unwrap();
    let service = ReconcileService::new(db.connection());
    let questions = QuestionService::new(db.connection());

    service.reconcile(DEFAULT_CATALOG).await.unwrap();
    let before = questions.list_active().await.unwrap();

    let report = service.reconcile(DEFAULT_CATALOG).await.unwrap();
    assert_eq!(report.total_mutations(), 0);
    assert!(!report.config_created);

    let after = questions.list_active().await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_reworded_catalog_keeps_ids_and_votes() {
    let db = TestDatabase::new().await.unwrap();
    let service = ReconcileService::new(db.connection());
    let questions = QuestionService::new(db.connection());
    let voting = VotingService::new(db.connection());

    service.reconcile(V1).await.unwrap();
    let before = questions.list_active().await.unwrap();
    let q1 = by_key(&before, 1);

    let alice = ParticipantService::new(db.connection())
        .register("Alice")
        .await
        .unwrap();
    voting
        .submit_vote(&alice.id, &q1.question.id, &q1.options[1].id)
        .await
        .unwrap();

    let report = service.reconcile(V1_REWORDED).await.unwrap();
    assert_eq!(report.questions_updated, 1);
    assert_eq!(report.options_updated, 1);
    assert_eq!(report.total_mutations(), 2);

    let after = questions.list_active().await.unwrap();
    let q1_after = by_key(&after, 1);
    assert_eq!(q1_after.question.id, q1.question.id);
    assert_eq!(q1_after.question.text, "Where should we celebrate?");
    assert_eq!(q1_after.options[1].id, q1.options[1].id);
    assert_eq!(q1_after.options[1].text, "Redwood Forest Hike");

    let votes = voting.votes_for(&alice.id).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].option_id, q1.options[1].id);
}

#[tokio::test]
async fn test_removed_question_cascades() {
    let db = TestDatabase::new().await.unwrap();
    let conn = db.connection();
    let service = ReconcileService::new(db.connection());
    let questions = QuestionService::new(db.connection());
    let voting = VotingService::new(db.connection());

    service.reconcile(V1).await.unwrap();
    let listed = questions.list_active().await.unwrap();
    let (q1, q2) = (by_key(&listed, 1), by_key(&listed, 2));

    let alice = ParticipantService::new(db.connection())
        .register("Alice")
        .await
        .unwrap();
    voting
        .submit_vote(&alice.id, &q1.question.id, &q1.options[0].id)
        .await
        .unwrap();
    voting
        .submit_vote(&alice.id, &q2.question.id, &q2.options[2].id)
        .await
        .unwrap();

    let report = service.reconcile(V1_TRIMMED).await.unwrap();
    assert_eq!(report.questions_deleted, 1);
    assert_eq!(report.total_mutations(), 1);

    let err = questions.get(&q2.question.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(QuestionOption::find().count(conn.as_ref()).await.unwrap(), 2);

    let votes = voting.votes_for(&alice.id).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].question_id, q1.question.id);
    assert_eq!(Vote::find().count(conn.as_ref()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_removed_option_cascades_to_its_votes() {
    let db = TestDatabase::new().await.unwrap();
    let service = ReconcileService::new(db.connection());
    let questions = QuestionService::new(db.connection());
    let voting = VotingService::new(db.connection());
    let participants = ParticipantService::new(db.connection());

    service.reconcile(V1).await.unwrap();
    let listed = questions.list_active().await.unwrap();
    let q2 = by_key(&listed, 2);

    let alice = participants.register("Alice").await.unwrap();
    let bob = participants.register("Bob").await.unwrap();
    voting
        .submit_vote(&alice.id, &q2.question.id, &q2.options[2].id)
        .await
        .unwrap();
    voting
        .submit_vote(&bob.id, &q2.question.id, &q2.options[0].id)
        .await
        .unwrap();

    let report = service.reconcile(V1_FEWER_OPTIONS).await.unwrap();
    assert_eq!(report.options_deleted, 1);
    assert_eq!(report.total_mutations(), 1);

    assert!(voting.votes_for(&alice.id).await.unwrap().is_empty());
    assert_eq!(voting.votes_for(&bob.id).await.unwrap().len(), 1);

    let q2_after = questions.get(&q2.question.id).await.unwrap();
    assert_eq!(q2_after.options.len(), 2);
}

#[tokio::test]
async fn test_invalid_catalog_writes_nothing() {
    const DUPLICATE_KEYS: &Catalog = &[
        CatalogEntry {
            order_key: 1,
            text: "First?",
            options: &[opt(1, "A")],
        },
        CatalogEntry {
            order_key: 1,
            text: "Again?",
            options: &[opt(1, "B")],
        },
    ];

    let db = TestDatabase::new().await.unwrap();
    let conn = db.connection();
    let service = ReconcileService::new(db.connection());

    let err = service.reconcile(DUPLICATE_KEYS).await.unwrap_err();
    assert!(matches!(err, AppError::Reconciliation(_)));

    let questions = QuestionService::new(db.connection()).list_active().await.unwrap();
    assert!(questions.is_empty());
    assert!(VotingConfig::find().one(conn.as_ref()).await.unwrap().is_none());
}
