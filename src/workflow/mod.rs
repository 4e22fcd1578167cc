pub mod classifier;
pub mod responder;
pub mod ticket;
pub mod vocabulary;

pub use classifier::Classifier;
pub use responder::{Responder, ResponsePolicy, ResponseTables};
pub use ticket::TicketProcessor;
pub use vocabulary::Vocabulary;
