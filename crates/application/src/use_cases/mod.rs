pub mod forward_query;
pub mod static_answer;

pub use forward_query::ForwardQueryUseCase;
pub use static_answer::StaticAnswerUseCase;
