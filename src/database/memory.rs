use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::models::{AnswerPost, Course, Post, User};
use crate::database::repository::{
    parent_post_id, parent_reference, AnswerPostRepository, CourseRepository, MetisStore,
    PostRepository, UserRepository,
};

#[derive(Debug, Clone)]
struct StoredAnswer {
    answer: AnswerPost,
    post_id: i64,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<i64, User>,
    courses: HashMap<i64, Course>,
    posts: HashMap<i64, Post>,
    answers: HashMap<i64, StoredAnswer>,
    next_id: i64,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn bump_past(&mut self, id: i64) {
        self.next_id = self.next_id.max(id);
    }

    fn answers_of(&self, post_id: i64) -> Vec<AnswerPost> {
        let mut answers: Vec<AnswerPost> = self
            .answers
            .values()
            .filter(|stored| stored.post_id == post_id)
            .map(|stored| stored.answer.clone())
            .collect();
        answers.sort_by_key(|a| a.id);
        answers
    }

    fn store_answer(&mut self, mut answer_post: AnswerPost, id: i64, post_id: i64) -> Result<AnswerPost, DatabaseError> {
        if !self.posts.contains_key(&post_id) {
            return Err(DatabaseError::not_found("Post", post_id));
        }
        answer_post.id = Some(id);
        answer_post.post = None;

        let stored = StoredAnswer { answer: answer_post, post_id };
        let saved = self.load_answer(&stored);
        self.answers.insert(id, stored);
        Ok(saved)
    }

    fn load_answer(&self, stored: &StoredAnswer) -> AnswerPost {
        let mut answer = stored.answer.clone();
        answer.post = self.posts.get(&stored.post_id).cloned().map(parent_reference);
        answer
    }
}

/// Process-local store used for development runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) -> User {
        let mut tables = self.tables.write().await;
        tables.bump_past(user.id);
        tables.users.insert(user.id, user.clone());
        user
    }

    pub async fn insert_course(&self, course: Course) -> Course {
        let mut tables = self.tables.write().await;
        tables.bump_past(course.id);
        tables.courses.insert(course.id, course.clone());
        course
    }

    /// Stores a post as given, keeping its id when it has one
    pub async fn insert_post(&self, mut post: Post) -> Post {
        let mut tables = self.tables.write().await;
        let id = match post.id {
            Some(id) => {
                tables.bump_past(id);
                id
            }
            None => tables.allocate_id(),
        };
        post.id = Some(id);
        post.answers.clear();
        tables.posts.insert(id, post.clone());
        post
    }

    /// Stores an answer as given, keeping its id when it has one. The parent
    /// post must already be stored.
    pub async fn insert_answer_post(&self, answer_post: AnswerPost) -> Result<AnswerPost, DatabaseError> {
        let post_id = parent_post_id(&answer_post)?;
        let mut tables = self.tables.write().await;
        let id = match answer_post.id {
            Some(id) => {
                tables.bump_past(id);
                id
            }
            None => tables.allocate_id(),
        };
        tables.store_answer(answer_post, id, post_id)
    }

    pub async fn answer_count(&self) -> usize {
        self.tables.read().await.answers.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user(&self, id: i64) -> Result<User, DatabaseError> {
        self.tables
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::not_found("User", id))
    }
}

#[async_trait]
impl CourseRepository for MemoryStore {
    async fn find_course(&self, id: i64) -> Result<Course, DatabaseError> {
        self.tables
            .read()
            .await
            .courses
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::not_found("Course", id))
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn find_post(&self, id: i64) -> Result<Post, DatabaseError> {
        let tables = self.tables.read().await;
        let mut post = tables
            .posts
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::not_found("Post", id))?;
        post.answers = tables.answers_of(id);
        Ok(post)
    }

    async fn save_post(&self, mut post: Post) -> Result<Post, DatabaseError> {
        let mut tables = self.tables.write().await;
        let id = match post.id {
            Some(id) if tables.posts.contains_key(&id) => id,
            Some(id) => return Err(DatabaseError::not_found("Post", id)),
            None => tables.allocate_id(),
        };
        post.id = Some(id);
        post.answers.clear();
        tables.posts.insert(id, post.clone());
        post.answers = tables.answers_of(id);
        Ok(post)
    }

    async fn delete_post(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(DatabaseError::not_found("Post", id));
        }
        tables.answers.retain(|_, stored| stored.post_id != id);
        debug!("Deleted post {} with its answers", id);
        Ok(())
    }
}

#[async_trait]
impl AnswerPostRepository for MemoryStore {
    async fn find_answer_post(&self, id: i64) -> Result<AnswerPost, DatabaseError> {
        let tables = self.tables.read().await;
        let stored = tables
            .answers
            .get(&id)
            .ok_or_else(|| DatabaseError::not_found("AnswerPost", id))?;
        Ok(tables.load_answer(stored))
    }

    async fn save_answer_post(&self, answer_post: AnswerPost) -> Result<AnswerPost, DatabaseError> {
        let post_id = parent_post_id(&answer_post)?;
        let mut tables = self.tables.write().await;
        let id = match answer_post.id {
            Some(id) if tables.answers.contains_key(&id) => id,
            Some(id) => return Err(DatabaseError::not_found("AnswerPost", id)),
            None => tables.allocate_id(),
        };
        tables.store_answer(answer_post, id, post_id)
    }

    async fn delete_answer_post(&self, id: i64) -> Result<(), DatabaseError> {
        self.tables
            .write()
            .await
            .answers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DatabaseError::not_found("AnswerPost", id))
    }
}

#[async_trait]
impl MetisStore for MemoryStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
