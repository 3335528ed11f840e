mod common;

use engine::{EngineError, NewGoalCmd, UpdateGoalCmd};

use common::{at, date, engine_with_db, register};

fn new_goal(user_id: i32, target_amount: f64) -> NewGoalCmd {
    NewGoalCmd {
        user_id,
        title: "Emergency fund".to_string(),
        target_amount,
        deadline: Some(date(2025, 1, 1)),
        now: at(2024, 3, 5),
    }
}

#[tokio::test]
async fn contributions_accumulate() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let goal = engine.create_goal(new_goal(alice.id, 1000.0)).await.unwrap();
    assert_eq!(goal.saved_amount, 0.0);
    assert_eq!(goal.progress(), 0.0);

    engine.contribute(alice.id, goal.id, 100.0).await.unwrap();
    let goal = engine.contribute(alice.id, goal.id, 233.33).await.unwrap();
    assert!((goal.saved_amount - 333.33).abs() < 1e-9);
    assert_eq!(goal.progress(), 33.33);

    let listed = engine.list_goals(alice.id).await.unwrap();
    assert_eq!(listed, vec![goal]);
}

#[tokio::test]
async fn contribution_must_be_positive() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let goal = engine.create_goal(new_goal(alice.id, 1000.0)).await.unwrap();

    let err = engine.contribute(alice.id, goal.id, 0.0).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("Amount must be positive".to_string())
    );
    assert_eq!(engine.list_goals(alice.id).await.unwrap()[0].saved_amount, 0.0);
}

#[tokio::test]
async fn create_validates_title_and_target() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;

    let err = engine
        .create_goal(NewGoalCmd {
            title: " ".to_string(),
            ..new_goal(alice.id, 10.0)
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("Name and target amount are required".to_string())
    );

    let err = engine.create_goal(new_goal(alice.id, -5.0)).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("Target amount must be positive".to_string())
    );
}

#[tokio::test]
async fn update_keeps_missing_fields() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let goal = engine.create_goal(new_goal(alice.id, 1000.0)).await.unwrap();

    let updated = engine
        .update_goal(UpdateGoalCmd {
            user_id: alice.id,
            goal_id: goal.id,
            target_amount: Some(2000.0),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.title, "Emergency fund");
    assert_eq!(updated.target_amount, 2000.0);
    assert_eq!(updated.deadline, Some(date(2025, 1, 1)));
}

#[tokio::test]
async fn foreign_goals_read_as_missing() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let bob = register(&engine, "Bob", "bob@example.com").await;
    let goal = engine.create_goal(new_goal(alice.id, 1000.0)).await.unwrap();

    let missing = EngineError::KeyNotFound("Goal".to_string());
    assert_eq!(engine.contribute(bob.id, goal.id, 10.0).await.unwrap_err(), missing);
    assert_eq!(engine.delete_goal(bob.id, goal.id).await.unwrap_err(), missing);
    assert!(engine.list_goals(bob.id).await.unwrap().is_empty());

    engine.delete_goal(alice.id, goal.id).await.unwrap();
    assert!(engine.list_goals(alice.id).await.unwrap().is_empty());
}
