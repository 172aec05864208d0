//! Adapters for the two external collaborators: the content fetcher and the
//! judgment oracle (an LLM), plus the outbound network gate both consult.

pub mod fetch;
pub mod llm;
pub mod network;
