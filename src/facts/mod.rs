pub mod filter;
pub mod model;
pub mod normalizer;
pub mod pipeline;

#[cfg(test)]
mod tests;

pub use filter::accept;
pub use model::{FactRecord, RawPost, RetainedFields};
pub use normalizer::normalize;
pub use pipeline::{fetch_facts, run};
