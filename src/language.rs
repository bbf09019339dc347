use crate::error::Result;
use crate::items::AstDefinition;

/// A rendered output file, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file_name: String,
    pub contents: String,
}

pub trait Language {
    fn lang_id(&self) -> &'static str;

    /// Names that cannot be used for the base type, node types or fields:
    /// target keywords and names the generated output already declares.
    fn reserved_names(&self) -> &'static [&'static str] {
        &[]
    }

    fn generate(&self, ast: &AstDefinition) -> Result<Vec<GeneratedFile>>;
}
