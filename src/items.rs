#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    // Verbatim target-language type, may contain spaces and template syntax
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub class_name: String,
    pub fields: Vec<Field>,
}

/// A base type together with its derived node types, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstDefinition {
    pub base_name: String,
    pub types: Vec<TypeSpec>,
}

impl AstDefinition {
    /// Stem shared by every file generated for this definition, e.g. `expr`.
    pub fn file_stem(&self) -> String {
        self.base_name.to_lowercase()
    }

    /// Name of the visitor method dispatching to `spec`, bound as `%visit%`.
    pub fn visit_method(&self, spec: &TypeSpec) -> String {
        format!("visit{}{}", spec.class_name, self.base_name)
    }
}
