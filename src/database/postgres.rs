use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::BTreeSet;
use tracing::debug;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    AnswerPost, Course, CourseWideContext, Exam, Exercise, ExerciseGroup, Lecture, Post, Reaction, User,
};
use crate::database::repository::{
    parent_post_id, parent_reference, AnswerPostRepository, CourseRepository, MetisStore,
    PostRepository, UserRepository,
};

const COURSE_COLUMNS: &str = "id, title, posts_enabled, student_group_name, \
    teaching_assistant_group_name, editor_group_name, instructor_group_name";

const POST_COLUMNS: &str = "id, content, creation_date, author_id, title, visible_for_students, \
    votes, exercise_id, lecture_id, course_id, course_wide_context";

const ANSWER_COLUMNS: &str = "id, content, creation_date, author_id, tutor_approved, post_id";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    fn course_from_row(row: &PgRow) -> Result<Course, sqlx::Error> {
        Ok(Course {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            posts_enabled: row.try_get("posts_enabled")?,
            student_group_name: row.try_get("student_group_name")?,
            teaching_assistant_group_name: row.try_get("teaching_assistant_group_name")?,
            editor_group_name: row.try_get("editor_group_name")?,
            instructor_group_name: row.try_get("instructor_group_name")?,
        })
    }

    async fn load_course(&self, id: i64) -> Result<Course, DatabaseError> {
        let sql = format!("SELECT {} FROM course WHERE id = $1", COURSE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Course", id))?;
        Ok(Self::course_from_row(&row)?)
    }

    async fn load_optional_course(&self, id: Option<i64>) -> Result<Option<Course>, DatabaseError> {
        match id {
            Some(id) => Ok(Some(self.load_course(id).await?)),
            None => Ok(None),
        }
    }

    async fn load_user(&self, id: i64) -> Result<User, DatabaseError> {
        let row = sqlx::query("SELECT id, login, name FROM jhi_user WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("User", id))?;

        let groups: Vec<String> = sqlx::query("SELECT group_name FROM user_groups WHERE user_id = $1")
            .bind(id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|r| r.try_get("group_name"))
            .collect::<Result<_, _>>()?;

        let authorities: Vec<String> =
            sqlx::query("SELECT authority_name FROM user_authority WHERE user_id = $1")
                .bind(id)
                .fetch_all(&self.pool)
                .await?
                .iter()
                .map(|r| r.try_get("authority_name"))
                .collect::<Result<_, _>>()?;

        Ok(User {
            id: row.try_get("id")?,
            login: row.try_get("login")?,
            name: row.try_get("name")?,
            groups: groups.into_iter().collect(),
            authorities: authorities.into_iter().collect(),
        })
    }

    async fn load_optional_user(&self, id: Option<i64>) -> Result<Option<User>, DatabaseError> {
        match id {
            Some(id) => Ok(Some(self.load_user(id).await?)),
            None => Ok(None),
        }
    }

    async fn load_lecture(&self, id: i64) -> Result<Lecture, DatabaseError> {
        let row = sqlx::query("SELECT id, title, course_id FROM lecture WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Lecture", id))?;

        Ok(Lecture {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            course: self.load_optional_course(row.try_get("course_id")?).await?,
        })
    }

    async fn load_exercise_group(&self, id: i64) -> Result<ExerciseGroup, DatabaseError> {
        let row = sqlx::query(
            "SELECT eg.id AS group_id, ex.id AS exam_id, ex.course_id AS exam_course_id \
             FROM exercise_group eg LEFT JOIN exam ex ON ex.id = eg.exam_id WHERE eg.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("ExerciseGroup", id))?;

        let exam = match row.try_get::<Option<i64>, _>("exam_id")? {
            Some(exam_id) => Some(Exam {
                id: exam_id,
                course: self.load_optional_course(row.try_get("exam_course_id")?).await?,
            }),
            None => None,
        };

        Ok(ExerciseGroup {
            id: row.try_get("group_id")?,
            exam,
        })
    }

    async fn load_exercise(&self, id: i64) -> Result<Exercise, DatabaseError> {
        let row = sqlx::query(
            "SELECT id, title, problem_statement, course_id, exercise_group_id, \
             example_solution, grading_instructions FROM exercise WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Exercise", id))?;

        let grading_criteria: Vec<String> =
            sqlx::query("SELECT title FROM grading_criterion WHERE exercise_id = $1 ORDER BY id")
                .bind(id)
                .fetch_all(&self.pool)
                .await?
                .iter()
                .map(|r| r.try_get("title"))
                .collect::<Result<_, _>>()?;

        let exercise_group = match row.try_get::<Option<i64>, _>("exercise_group_id")? {
            Some(group_id) => Some(self.load_exercise_group(group_id).await?),
            None => None,
        };

        Ok(Exercise {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            problem_statement: row.try_get("problem_statement")?,
            course: self.load_optional_course(row.try_get("course_id")?).await?,
            exercise_group,
            example_solution: row.try_get("example_solution")?,
            grading_instructions: row.try_get("grading_instructions")?,
            grading_criteria,
        })
    }

    /// Post row with its references, tags and reactions but without answers
    async fn load_post_reference(&self, id: i64) -> Result<Post, DatabaseError> {
        let sql = format!("SELECT {} FROM post WHERE id = $1", POST_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Post", id))?;

        let exercise = match row.try_get::<Option<i64>, _>("exercise_id")? {
            Some(exercise_id) => Some(self.load_exercise(exercise_id).await?),
            None => None,
        };
        let lecture = match row.try_get::<Option<i64>, _>("lecture_id")? {
            Some(lecture_id) => Some(self.load_lecture(lecture_id).await?),
            None => None,
        };
        let course_wide_context = row
            .try_get::<Option<String>, _>("course_wide_context")?
            .as_deref()
            .and_then(CourseWideContext::parse);

        let tags: BTreeSet<String> = sqlx::query("SELECT tag FROM post_tag WHERE post_id = $1")
            .bind(id)
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|r| r.try_get("tag"))
            .collect::<Result<_, _>>()?;

        Ok(Post {
            id: Some(row.try_get("id")?),
            content: row.try_get("content")?,
            creation_date: row.try_get("creation_date")?,
            author: self.load_optional_user(row.try_get("author_id")?).await?,
            title: row.try_get("title")?,
            visible_for_students: row.try_get("visible_for_students")?,
            votes: row.try_get("votes")?,
            reactions: self.load_reactions(id).await?,
            answers: Vec::new(),
            tags,
            exercise,
            lecture,
            course: self.load_optional_course(row.try_get("course_id")?).await?,
            course_wide_context,
        })
    }

    async fn load_reactions(&self, post_id: i64) -> Result<Vec<Reaction>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT id, emoji_id, user_id, creation_date FROM reaction WHERE post_id = $1 ORDER BY id",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        let mut reactions = Vec::with_capacity(rows.len());
        for row in rows {
            reactions.push(Reaction {
                id: row.try_get("id")?,
                emoji_id: row.try_get("emoji_id")?,
                user: self.load_optional_user(row.try_get("user_id")?).await?,
                creation_date: row.try_get("creation_date")?,
            });
        }
        Ok(reactions)
    }

    async fn answer_from_row(&self, row: &PgRow) -> Result<AnswerPost, DatabaseError> {
        Ok(AnswerPost {
            id: Some(row.try_get("id")?),
            content: row.try_get("content")?,
            creation_date: row.try_get("creation_date")?,
            author: self.load_optional_user(row.try_get("author_id")?).await?,
            tutor_approved: row.try_get("tutor_approved")?,
            post: None,
        })
    }

    async fn load_answers(&self, post_id: i64) -> Result<Vec<AnswerPost>, DatabaseError> {
        let sql = format!("SELECT {} FROM answer_post WHERE post_id = $1 ORDER BY id", ANSWER_COLUMNS);
        let rows = sqlx::query(&sql).bind(post_id).fetch_all(&self.pool).await?;

        let mut answers = Vec::with_capacity(rows.len());
        for row in &rows {
            answers.push(self.answer_from_row(row).await?);
        }
        Ok(answers)
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_user(&self, id: i64) -> Result<User, DatabaseError> {
        self.load_user(id).await
    }
}

#[async_trait]
impl CourseRepository for PgStore {
    async fn find_course(&self, id: i64) -> Result<Course, DatabaseError> {
        self.load_course(id).await
    }
}

#[async_trait]
impl PostRepository for PgStore {
    async fn find_post(&self, id: i64) -> Result<Post, DatabaseError> {
        let mut post = self.load_post_reference(id).await?;
        post.answers = self.load_answers(id).await?;
        Ok(post)
    }

    async fn save_post(&self, post: Post) -> Result<Post, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let author_id = post.author.as_ref().map(|u| u.id);
        let exercise_id = post.exercise.as_ref().map(|e| e.id);
        let lecture_id = post.lecture.as_ref().map(|l| l.id);
        let course_id = post.course.as_ref().map(|c| c.id);
        let context = post.course_wide_context.map(|c| c.as_str());

        let id: i64 = match post.id {
            None => {
                sqlx::query(
                    "INSERT INTO post (content, creation_date, author_id, title, visible_for_students, \
                     votes, exercise_id, lecture_id, course_id, course_wide_context) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING id",
                )
                .bind(&post.content)
                .bind(post.creation_date)
                .bind(author_id)
                .bind(&post.title)
                .bind(post.visible_for_students)
                .bind(post.votes)
                .bind(exercise_id)
                .bind(lecture_id)
                .bind(course_id)
                .bind(context)
                .fetch_one(&mut *tx)
                .await?
                .try_get("id")?
            }
            Some(id) => {
                let result = sqlx::query(
                    "UPDATE post SET content = $1, creation_date = $2, author_id = $3, title = $4, \
                     visible_for_students = $5, votes = $6, exercise_id = $7, lecture_id = $8, \
                     course_id = $9, course_wide_context = $10 WHERE id = $11",
                )
                .bind(&post.content)
                .bind(post.creation_date)
                .bind(author_id)
                .bind(&post.title)
                .bind(post.visible_for_students)
                .bind(post.votes)
                .bind(exercise_id)
                .bind(lecture_id)
                .bind(course_id)
                .bind(context)
                .bind(id)
                .execute(&mut *tx)
                .await?;
                if result.rows_affected() == 0 {
                    return Err(DatabaseError::not_found("Post", id));
                }
                id
            }
        };

        sqlx::query("DELETE FROM post_tag WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for tag in &post.tags {
            sqlx::query("INSERT INTO post_tag (post_id, tag) VALUES ($1, $2)")
                .bind(id)
                .bind(tag)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM reaction WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for reaction in &post.reactions {
            sqlx::query(
                "INSERT INTO reaction (id, emoji_id, user_id, post_id, creation_date) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(reaction.id)
            .bind(&reaction.emoji_id)
            .bind(reaction.user.as_ref().map(|u| u.id))
            .bind(id)
            .bind(reaction.creation_date)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        self.find_post(id).await
    }

    async fn delete_post(&self, id: i64) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        for table in ["answer_post", "reaction", "post_tag"] {
            let sql = format!("DELETE FROM {} WHERE post_id = $1", table);
            sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
        }
        let result = sqlx::query("DELETE FROM post WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Post", id));
        }

        tx.commit().await?;
        debug!("Deleted post {} with its answers", id);
        Ok(())
    }
}

#[async_trait]
impl AnswerPostRepository for PgStore {
    async fn find_answer_post(&self, id: i64) -> Result<AnswerPost, DatabaseError> {
        let sql = format!("SELECT {} FROM answer_post WHERE id = $1", ANSWER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("AnswerPost", id))?;

        let mut answer = self.answer_from_row(&row).await?;
        let post_id: i64 = row.try_get("post_id")?;
        answer.post = Some(parent_reference(self.load_post_reference(post_id).await?));
        Ok(answer)
    }

    async fn save_answer_post(&self, answer_post: AnswerPost) -> Result<AnswerPost, DatabaseError> {
        let post_id = parent_post_id(&answer_post)?;
        let author_id = answer_post.author.as_ref().map(|u| u.id);
        let creation_date: Option<DateTime<Utc>> = answer_post.creation_date;

        let id: i64 = match answer_post.id {
            None => sqlx::query(
                "INSERT INTO answer_post (content, creation_date, author_id, tutor_approved, post_id) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING id",
            )
            .bind(&answer_post.content)
            .bind(creation_date)
            .bind(author_id)
            .bind(answer_post.tutor_approved)
            .bind(post_id)
            .fetch_one(&self.pool)
            .await?
            .try_get("id")?,
            Some(id) => {
                let result = sqlx::query(
                    "UPDATE answer_post SET content = $1, creation_date = $2, author_id = $3, \
                     tutor_approved = $4, post_id = $5 WHERE id = $6",
                )
                .bind(&answer_post.content)
                .bind(creation_date)
                .bind(author_id)
                .bind(answer_post.tutor_approved)
                .bind(post_id)
                .bind(id)
                .execute(&self.pool)
                .await?;
                if result.rows_affected() == 0 {
                    return Err(DatabaseError::not_found("AnswerPost", id));
                }
                id
            }
        };

        self.find_answer_post(id).await
    }

    async fn delete_answer_post(&self, id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM answer_post WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("AnswerPost", id));
        }
        Ok(())
    }
}

#[async_trait]
impl MetisStore for PgStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
