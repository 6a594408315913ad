// handlers/mod.rs - HTTP handlers
//
// Public:    /, /health
// Protected: /api/courses/:course_id/answer-posts/* (bearer JWT, user loaded per request)

pub mod answer_posts;
pub mod system;
