pub mod assemble;
pub mod extract;
pub mod llm;
pub mod normalize;
pub mod patterns;
pub mod processor;
pub mod rag;
pub mod textsource;
pub mod validate;
