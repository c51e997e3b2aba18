// Resume relevance scoring core.
// Lexical matching + semantic similarity -> blended score, verdict, feedback.
// Collaborators (embedding model, language model) are injected, never global.

pub mod combiner;
pub mod criteria;
pub mod error;
pub mod feedback;
pub mod handlers;
pub mod lexical;
pub mod prompts;
pub mod semantic;

#[cfg(test)]
pub mod testing;
