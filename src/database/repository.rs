use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{AnswerPost, Course, Post, User};

/// Lookup of authenticated principals with their groups and authorities
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<User, DatabaseError>;
}

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn find_course(&self, id: i64) -> Result<Course, DatabaseError>;
}

/// Posts are loaded as full aggregates: lecture, exercise and course
/// references, reactions, tags and answers.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_post(&self, id: i64) -> Result<Post, DatabaseError>;

    /// Inserts when the post has no id, otherwise updates (`NotFound` if the
    /// row is gone). Answers are not written through the post.
    async fn save_post(&self, post: Post) -> Result<Post, DatabaseError>;

    /// Removes the post together with its reactions and answers
    async fn delete_post(&self, id: i64) -> Result<(), DatabaseError>;
}

/// Answer posts are loaded with their author and a reference to the parent
/// post (without the parent's answers).
#[async_trait]
pub trait AnswerPostRepository: Send + Sync {
    async fn find_answer_post(&self, id: i64) -> Result<AnswerPost, DatabaseError>;

    /// Inserts when the answer has no id, otherwise updates (`NotFound` if the
    /// row is gone). The parent post
    /// must already be stored.
    async fn save_answer_post(&self, answer_post: AnswerPost) -> Result<AnswerPost, DatabaseError>;

    /// Removes only the answer; the parent post is untouched
    async fn delete_answer_post(&self, id: i64) -> Result<(), DatabaseError>;
}

/// Everything the discussion service needs from persistence
#[async_trait]
pub trait MetisStore: UserRepository + CourseRepository + PostRepository + AnswerPostRepository {
    async fn health_check(&self) -> Result<(), DatabaseError>;

    fn backend_name(&self) -> &'static str;
}

/// Strips the parent's answers so a reply never embeds its siblings
pub fn parent_reference(mut post: Post) -> Post {
    post.answers.clear();
    post
}

/// The id of the stored post an answer refers to
pub fn parent_post_id(answer_post: &AnswerPost) -> Result<i64, DatabaseError> {
    answer_post
        .post
        .as_ref()
        .and_then(|post| post.id)
        .ok_or_else(|| DatabaseError::QueryError("answer post must reference a stored post".to_string()))
}
