//! Wire types: public endpoint bodies and upstream chat completion payloads

mod openai;
mod tools;

pub use openai::*;
pub use tools::*;
