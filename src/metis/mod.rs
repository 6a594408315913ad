pub mod answer_post_service;
pub mod authorization;
pub mod course_context;
pub mod error;

pub use answer_post_service::AnswerPostService;
pub use authorization::{AuthorizationCheckService, Role};
pub use course_context::{resolve_answer_course, resolve_course, PostContext};
pub use error::{MetisError, MetisResult};
