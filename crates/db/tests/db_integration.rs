//! Database integration tests.
//!
//! These run against a migrated SQLite file, so the schema's unique indexes and
//! cascading foreign keys are exercised for real.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ballot_common::AppError;
use ballot_db::{
    entities::{
        Participant, QuestionOption, Vote, message, participant, question, question_option, vote,
    },
    repositories::{
        MessageRepository, ParticipantRepository, QuestionOptionRepository, QuestionRepository,
        VoteRepository, VotingConfigRepository,
    },
    test_utils::TestDatabase,
};
use chrono::Utc;
use sea_orm::{EntityTrait, PaginatorTrait, Set};

async fn seed_participant(db: &TestDatabase, id: &str) -> participant::Model {
    ParticipantRepository::new()
        .create(
            db.conn.as_ref(),
            participant::ActiveModel {
                id: Set(id.to_string()),
                name: Set(format!("Participant {id}")),
                created_at: Set(Utc::now().into()),
            },
        )
        .await
        .unwrap()
}

async fn seed_question(db: &TestDatabase, id: &str, order_key: i32, options: &[&str]) {
    QuestionRepository::new()
        .create(
            db.conn.as_ref(),
            question::ActiveModel {
                id: Set(id.to_string()),
                text: Set(format!("Question {order_key}")),
                order_key: Set(order_key),
                is_active: Set(true),
            },
        )
        .await
        .unwrap();

    for (i, option_id) in options.iter().enumerate() {
        QuestionOptionRepository::new()
            .create(
                db.conn.as_ref(),
                question_option::ActiveModel {
                    id: Set((*option_id).to_string()),
                    question_id: Set(id.to_string()),
                    text: Set(format!("Option {option_id}")),
                    order_key: Set(i as i32 + 1),
                },
            )
            .await
            .unwrap();
    }
}

fn new_vote(
    id: &str,
    participant_id: &str,
    question_id: &str,
    option_id: &str,
) -> vote::ActiveModel {
    vote::ActiveModel {
        id: Set(id.to_string()),
        participant_id: Set(participant_id.to_string()),
        question_id: Set(question_id.to_string()),
        option_id: Set(option_id.to_string()),
        created_at: Set(Utc::now().into()),
    }
}

#[tokio::test]
async fn test_second_vote_for_same_question_is_a_conflict() {
    let db = TestDatabase::new().await.expect("Failed to create database");
    seed_participant(&db, "p1").await;
    seed_question(&db, "q1", 1, &["o1", "o2"]).await;

    let repo = VoteRepository::new();
    repo.create(db.conn.as_ref(), new_vote("v1", "p1", "q1", "o1"))
        .await
        .unwrap();
    let second = repo
        .create(db.conn.as_ref(), new_vote("v2", "p1", "q1", "o2"))
        .await;

    assert!(matches!(second, Err(AppError::Conflict(_))), "{second:?}");
}

#[tokio::test]
async fn test_duplicate_option_order_key_is_a_conflict() {
    let db = TestDatabase::new().await.expect("Failed to create database");
    seed_question(&db, "q1", 1, &["o1"]).await;

    let duplicate = QuestionOptionRepository::new()
        .create(
            db.conn.as_ref(),
            question_option::ActiveModel {
                id: Set("o2".to_string()),
                question_id: Set("q1".to_string()),
                text: Set("Same key".to_string()),
                order_key: Set(1),
            },
        )
        .await;

    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_deleting_question_cascades_to_options_and_votes() {
    let db = TestDatabase::new().await.expect("Failed to create database");
    seed_participant(&db, "p1").await;
    seed_question(&db, "q1", 1, &["o1", "o2"]).await;
    seed_question(&db, "q2", 2, &["o3"]).await;

    let votes = VoteRepository::new();
    votes
        .create(db.conn.as_ref(), new_vote("v1", "p1", "q1", "o1"))
        .await
        .unwrap();
    votes
        .create(db.conn.as_ref(), new_vote("v2", "p1", "q2", "o3"))
        .await
        .unwrap();

    QuestionRepository::new()
        .delete(db.conn.as_ref(), "q1")
        .await
        .unwrap();

    assert_eq!(QuestionOption::find().count(db.conn.as_ref()).await.unwrap(), 1);
    let remaining = Vote::find().all(db.conn.as_ref()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].question_id, "q2");
}

#[tokio::test]
async fn test_deleting_participant_cascades_to_votes_and_message() {
    let db = TestDatabase::new().await.expect("Failed to create database");
    seed_participant(&db, "p1").await;
    seed_question(&db, "q1", 1, &["o1"]).await;

    VoteRepository::new()
        .create(db.conn.as_ref(), new_vote("v1", "p1", "q1", "o1"))
        .await
        .unwrap();
    MessageRepository::new()
        .create(
            db.conn.as_ref(),
            message::ActiveModel {
                id: Set("m1".to_string()),
                participant_id: Set("p1".to_string()),
                text: Set("Cheers".to_string()),
                created_at: Set(Utc::now().into()),
            },
        )
        .await
        .unwrap();

    let removed = ParticipantRepository::new()
        .delete(db.conn.as_ref(), "p1")
        .await
        .unwrap();

    assert!(removed);
    assert_eq!(Participant::find().count(db.conn.as_ref()).await.unwrap(), 0);
    assert_eq!(Vote::find().count(db.conn.as_ref()).await.unwrap(), 0);
    assert!(
        MessageRepository::new()
            .find_by_participant(db.conn.as_ref(), "p1")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_count_by_option_includes_zero_vote_options() {
    let db = TestDatabase::new().await.expect("Failed to create database");
    seed_participant(&db, "p1").await;
    seed_participant(&db, "p2").await;
    seed_question(&db, "q1", 1, &["a", "b", "c"]).await;

    let votes = VoteRepository::new();
    votes
        .create(db.conn.as_ref(), new_vote("v1", "p1", "q1", "a"))
        .await
        .unwrap();
    votes
        .create(db.conn.as_ref(), new_vote("v2", "p2", "q1", "a"))
        .await
        .unwrap();

    let counts = votes.count_by_option(db.conn.as_ref(), "q1").await.unwrap();

    let pairs: Vec<(&str, i64)> = counts
        .iter()
        .map(|c| (c.option_id.as_str(), c.vote_count))
        .collect();
    assert_eq!(pairs, vec![("a", 2), ("b", 0), ("c", 0)]);
}

#[tokio::test]
async fn test_voting_config_singleton() {
    let db = TestDatabase::new().await.expect("Failed to create database");
    let repo = VotingConfigRepository::new();

    assert!(repo.find(db.conn.as_ref()).await.unwrap().is_none());

    let first = repo.get_or_create(db.conn.as_ref()).await.unwrap();
    let second = repo.get_or_create(db.conn.as_ref()).await.unwrap();
    assert_eq!(first, second);
    assert!(!first.is_closed);
    assert!(first.end_time.is_none());

    let duplicate = repo.create_default(db.conn.as_ref()).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}
