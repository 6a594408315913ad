//! Demo data for development runs against the in-memory store.
//!
//! The integration tests drive the HTTP API against exactly this data, so
//! the ids below are part of its contract.

use crate::database::manager::DatabaseError;
use crate::database::memory::MemoryStore;
use crate::database::models::user::ADMIN_AUTHORITY;
use crate::database::models::{AnswerPost, Course, CourseWideContext, Exercise, Lecture, Post, User};

pub const SE_COURSE_ID: i64 = 5;
pub const DS_COURSE_ID: i64 = 7;
pub const ARCHIVED_COURSE_ID: i64 = 9;

pub const STUDENT_ID: i64 = 1;
pub const OTHER_STUDENT_ID: i64 = 2;
pub const TUTOR_ID: i64 = 3;
pub const INSTRUCTOR_ID: i64 = 4;
pub const ADMIN_ID: i64 = 5;
pub const DS_STUDENT_ID: i64 = 6;

pub const EXERCISE_ID: i64 = 20;
pub const LECTURE_ID: i64 = 30;

pub const EXERCISE_POST_ID: i64 = 100;
pub const LECTURE_POST_ID: i64 = 101;
pub const COURSE_WIDE_POST_ID: i64 = 102;
pub const DS_POST_ID: i64 = 103;
pub const ORPHAN_POST_ID: i64 = 104;
pub const ARCHIVED_POST_ID: i64 = 105;

pub const ORPHAN_ANSWER_ID: i64 = 200;
pub const DS_ANSWER_ID: i64 = 201;

fn course(id: i64, title: &str, prefix: &str, posts_enabled: bool) -> Course {
    Course {
        id,
        title: Some(title.to_string()),
        posts_enabled,
        student_group_name: Some(format!("{}-students", prefix)),
        teaching_assistant_group_name: Some(format!("{}-tutors", prefix)),
        editor_group_name: Some(format!("{}-editors", prefix)),
        instructor_group_name: Some(format!("{}-instructors", prefix)),
    }
}

fn user(id: i64, login: &str, name: &str, groups: &[&str]) -> User {
    let mut user = User::new(id, login);
    user.name = Some(name.to_string());
    groups.iter().fold(user, |u, g| u.with_group(*g))
}

/// Login names by user id, for issuing demo tokens
pub fn demo_login(user_id: i64) -> Option<&'static str> {
    match user_id {
        STUDENT_ID => Some("student1"),
        OTHER_STUDENT_ID => Some("student2"),
        TUTOR_ID => Some("tutor1"),
        INSTRUCTOR_ID => Some("instructor1"),
        ADMIN_ID => Some("admin"),
        DS_STUDENT_ID => Some("ds_student"),
        _ => None,
    }
}

pub async fn seed_demo_data(store: &MemoryStore) -> Result<(), DatabaseError> {
    let se = store.insert_course(course(SE_COURSE_ID, "Software Engineering", "se", true)).await;
    let ds = store.insert_course(course(DS_COURSE_ID, "Data Structures", "ds", true)).await;
    let archived = store
        .insert_course(course(ARCHIVED_COURSE_ID, "Archived Seminar", "arch", false))
        .await;

    store.insert_user(user(STUDENT_ID, "student1", "Sam Student", &["se-students"])).await;
    let asker = store
        .insert_user(user(OTHER_STUDENT_ID, "student2", "Alex Asker", &["se-students"]))
        .await;
    store.insert_user(user(TUTOR_ID, "tutor1", "Tess Tutor", &["se-tutors"])).await;
    store
        .insert_user(user(INSTRUCTOR_ID, "instructor1", "Ira Instructor", &["se-instructors"]))
        .await;
    store
        .insert_user(user(ADMIN_ID, "admin", "Ada Admin", &[]).with_authority(ADMIN_AUTHORITY))
        .await;
    let ds_student = store
        .insert_user(user(DS_STUDENT_ID, "ds_student", "Dana Dev", &["ds-students", "arch-students"]))
        .await;

    let mut exercise = Exercise::new(EXERCISE_ID, "Design Patterns");
    exercise.course = Some(se.clone());
    exercise.problem_statement = Some("Implement the observer pattern".to_string());
    exercise.example_solution = Some("trait Observer { fn notify(&self); }".to_string());
    exercise.grading_instructions = Some("Deduct points for missing unsubscribe".to_string());
    exercise.grading_criteria = vec!["Correctness".to_string(), "Style".to_string()];

    let lecture = Lecture {
        id: LECTURE_ID,
        title: Some("Architecture".to_string()),
        course: Some(se.clone()),
    };

    let posts = [
        Post {
            id: Some(EXERCISE_POST_ID),
            title: Some("Observer vs. callbacks".to_string()),
            content: Some("When should I prefer an observer?".to_string()),
            author: Some(asker.clone()),
            visible_for_students: Some(true),
            exercise: Some(exercise),
            ..Default::default()
        },
        Post {
            id: Some(LECTURE_POST_ID),
            title: Some("Slides".to_string()),
            content: Some("Will the slides be uploaded?".to_string()),
            author: Some(asker.clone()),
            visible_for_students: Some(true),
            lecture: Some(lecture),
            ..Default::default()
        },
        Post {
            id: Some(COURSE_WIDE_POST_ID),
            title: Some("Login problems".to_string()),
            content: Some("I cannot log in to the lab machines".to_string()),
            author: Some(asker.clone()),
            course: Some(se),
            course_wide_context: Some(CourseWideContext::TechSupport),
            ..Default::default()
        },
        Post {
            id: Some(DS_POST_ID),
            content: Some("Is a heap a tree?".to_string()),
            author: Some(ds_student.clone()),
            course: Some(ds),
            ..Default::default()
        },
        Post {
            id: Some(ORPHAN_POST_ID),
            content: Some("Left over from a deleted course".to_string()),
            ..Default::default()
        },
        Post {
            id: Some(ARCHIVED_POST_ID),
            content: Some("Old seminar question".to_string()),
            course: Some(archived),
            ..Default::default()
        },
    ];
    for post in posts {
        store.insert_post(post).await;
    }

    store
        .insert_answer_post(AnswerPost {
            id: Some(ORPHAN_ANSWER_ID),
            content: Some("Nobody will see this".to_string()),
            author: Some(user(STUDENT_ID, "student1", "Sam Student", &["se-students"])),
            post: Some(Post::with_id(ORPHAN_POST_ID)),
            ..Default::default()
        })
        .await?;
    store
        .insert_answer_post(AnswerPost {
            id: Some(DS_ANSWER_ID),
            content: Some("Yes, a complete binary tree".to_string()),
            author: Some(ds_student),
            post: Some(Post::with_id(DS_POST_ID)),
            ..Default::default()
        })
        .await?;

    Ok(())
}
