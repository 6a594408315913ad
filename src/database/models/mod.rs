pub mod answer_post;
pub mod course;
pub mod exercise;
pub mod lecture;
pub mod post;
pub mod user;

pub use answer_post::AnswerPost;
pub use course::Course;
pub use exercise::{Exam, Exercise, ExerciseGroup};
pub use lecture::Lecture;
pub use post::{CourseWideContext, Post, Reaction};
pub use user::User;
