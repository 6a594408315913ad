// Runs against the database named by DATABASE_URL; skipped when it is unset.

use std::collections::BTreeSet;

use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, Row};

use metis_api::config::DatabaseConfig;
use metis_api::database::models::{AnswerPost, Exercise, Post, Reaction, User};
use metis_api::database::{
    AnswerPostRepository, DatabaseError, DatabaseManager, PgStore, PostRepository, UserRepository,
};
use metis_api::metis::resolve_course;

async fn pg_store() -> Result<Option<(PgStore, PgPool)>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping PostgreSQL store tests");
        return Ok(None);
    };

    let config = DatabaseConfig {
        url: Some(url),
        max_connections: 2,
        connection_timeout: 10,
    };
    let pool = DatabaseManager::connect(&config).await?;
    let store = PgStore::new(pool.clone());
    store.migrate().await?;
    Ok(Some((store, pool)))
}

/// Ids of rows created directly in SQL for one test run
struct Seeded {
    stamp: i64,
    course_id: i64,
    user: User,
    exercise_id: i64,
}

async fn seed(pool: &PgPool) -> Result<Seeded> {
    let stamp = Utc::now().timestamp_micros();

    let course_id: i64 = sqlx::query(
        "INSERT INTO course (title, posts_enabled, student_group_name) VALUES ($1, TRUE, $2) RETURNING id",
    )
    .bind(format!("Operating Systems {}", stamp))
    .bind(format!("os-students-{}", stamp))
    .fetch_one(pool)
    .await?
    .try_get("id")?;

    let login = format!("pg_student_{}", stamp);
    let user_id: i64 = sqlx::query("INSERT INTO jhi_user (login, name) VALUES ($1, 'Pat Postgres') RETURNING id")
        .bind(&login)
        .fetch_one(pool)
        .await?
        .try_get("id")?;
    sqlx::query("INSERT INTO user_groups (user_id, group_name) VALUES ($1, $2)")
        .bind(user_id)
        .bind(format!("os-students-{}", stamp))
        .execute(pool)
        .await?;

    let exam_id: i64 = sqlx::query("INSERT INTO exam (course_id) VALUES ($1) RETURNING id")
        .bind(course_id)
        .fetch_one(pool)
        .await?
        .try_get("id")?;
    let group_id: i64 = sqlx::query("INSERT INTO exercise_group (exam_id) VALUES ($1) RETURNING id")
        .bind(exam_id)
        .fetch_one(pool)
        .await?
        .try_get("id")?;
    let exercise_id: i64 = sqlx::query(
        "INSERT INTO exercise (title, exercise_group_id, example_solution, grading_instructions) \
         VALUES ('Scheduling', $1, 'round robin', 'check fairness') RETURNING id",
    )
    .bind(group_id)
    .fetch_one(pool)
    .await?
    .try_get("id")?;
    sqlx::query("INSERT INTO grading_criterion (exercise_id, title) VALUES ($1, 'Correctness')")
        .bind(exercise_id)
        .execute(pool)
        .await?;

    Ok(Seeded {
        stamp,
        course_id,
        user: User::new(user_id, login),
        exercise_id,
    })
}

async fn save_exam_post(store: &PgStore, seeded: &Seeded) -> Result<Post> {
    let post = Post {
        content: Some("Is preemption required?".into()),
        author: Some(seeded.user.clone()),
        exercise: Some(Exercise::new(seeded.exercise_id, "Scheduling")),
        tags: BTreeSet::from(["scheduling".to_string()]),
        reactions: vec![Reaction {
            id: seeded.stamp,
            emoji_id: "rocket".into(),
            user: Some(seeded.user.clone()),
            creation_date: None,
        }],
        ..Default::default()
    };
    Ok(store.save_post(post).await?)
}

fn answer_to(post_id: i64, author: &User, content: &str) -> AnswerPost {
    AnswerPost {
        content: Some(content.into()),
        author: Some(author.clone()),
        creation_date: Some(Utc::now()),
        post: Some(Post::with_id(post_id)),
        ..Default::default()
    }
}

#[tokio::test]
async fn exam_post_loads_its_full_aggregate() -> Result<()> {
    let Some((store, pool)) = pg_store().await? else {
        return Ok(());
    };
    let seeded = seed(&pool).await?;

    let saved = save_exam_post(&store, &seeded).await?;
    let post = store.find_post(saved.id.expect("post id")).await?;

    // Exam exercises reach their course through group and exam
    assert_eq!(resolve_course(&post).map(|c| c.id), Some(seeded.course_id));
    let exercise = post.exercise.as_ref().expect("exercise");
    assert_eq!(exercise.grading_criteria, vec!["Correctness".to_string()]);
    assert_eq!(exercise.example_solution.as_deref(), Some("round robin"));
    assert!(post.tags.contains("scheduling"));
    assert_eq!(post.reactions.len(), 1);
    assert_eq!(
        post.reactions[0].user.as_ref().map(|u| u.login.as_str()),
        Some(seeded.user.login.as_str())
    );

    let user = store.find_user(seeded.user.id).await?;
    assert!(user.groups.contains(&format!("os-students-{}", seeded.stamp)));
    Ok(())
}

#[tokio::test]
async fn answer_lifecycle_round_trips() -> Result<()> {
    let Some((store, pool)) = pg_store().await? else {
        return Ok(());
    };
    let seeded = seed(&pool).await?;
    let post_id = save_exam_post(&store, &seeded).await?.id.expect("post id");

    let created = store
        .save_answer_post(answer_to(post_id, &seeded.user, "Not for this exercise"))
        .await?;
    let id = created.id.expect("answer id");
    assert_eq!(created.post.as_ref().and_then(|p| p.id), Some(post_id));
    assert!(!created.tutor_approved);

    let mut edited = store.find_answer_post(id).await?;
    edited.content = Some("Preemption is optional".into());
    edited.tutor_approved = true;
    let updated = store.save_answer_post(edited.clone()).await?;
    assert_eq!(updated.content.as_deref(), Some("Preemption is optional"));
    assert!(updated.tutor_approved);

    store.delete_answer_post(id).await?;
    assert!(matches!(store.find_answer_post(id).await, Err(DatabaseError::NotFound(_))));
    // Saving a deleted answer must not bring it back
    assert!(matches!(store.save_answer_post(edited).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(store.delete_answer_post(id).await, Err(DatabaseError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn deleting_post_removes_answers_and_reactions() -> Result<()> {
    let Some((store, pool)) = pg_store().await? else {
        return Ok(());
    };
    let seeded = seed(&pool).await?;
    let post_id = save_exam_post(&store, &seeded).await?.id.expect("post id");
    let answer = store
        .save_answer_post(answer_to(post_id, &seeded.user, "Soon gone"))
        .await?;

    store.delete_post(post_id).await?;

    assert!(matches!(store.find_post(post_id).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(
        store.find_answer_post(answer.id.expect("answer id")).await,
        Err(DatabaseError::NotFound(_))
    ));
    let reactions: i64 = sqlx::query("SELECT COUNT(*) AS n FROM reaction WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(&pool)
        .await?
        .try_get("n")?;
    assert_eq!(reactions, 0);
    assert!(matches!(store.delete_post(post_id).await, Err(DatabaseError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn unknown_ids_are_not_found() -> Result<()> {
    let Some((store, _pool)) = pg_store().await? else {
        return Ok(());
    };

    assert!(matches!(store.find_user(-1).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(store.find_post(-1).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(store.find_answer_post(-1).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(store.save_post(Post::with_id(-1)).await, Err(DatabaseError::NotFound(_))));
    Ok(())
}
