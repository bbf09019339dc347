pub mod cpp;
pub mod rust;

pub use cpp::CppGenerator;
pub use rust::RustGenerator;
