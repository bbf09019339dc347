pub mod codegen;
pub mod error;
pub mod generators;
pub mod glang;
pub mod items;
pub mod language;
pub mod parser;

pub use codegen::{define_ast, generate};
pub use error::{Error, Result};
