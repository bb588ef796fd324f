pub mod questions_llm;

pub use questions_llm::OpenAiQuestionsAdapter;
