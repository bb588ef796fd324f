pub mod domain;
pub mod ports;

pub use domain::{NotesRequest, QAPair, QuestionsResponse};
pub use ports::{PortError, PortResult, QuestionGenerationService};
