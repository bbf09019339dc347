use crate::error::Result;
use crate::glang::{render_ast, Template, MEMBERS_SECTION};
use crate::items::AstDefinition;
use crate::language::{GeneratedFile, Language};

static CPP_TEMPLATE: &str = include_str!("cpp.gx");

pub const DEFAULT_NAMESPACE: &str = "Lox";

// C++20 keywords and alternative tokens, then the names the header itself
// declares or pulls in
const RESERVED_NAMES: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
    "Visitor", "Token", "T", "accept", "std",
];

/// Emits `<base>.hpp` holding the whole hierarchy and its `Visitor`, plus an
/// empty `<base>.cpp` companion unit.
pub struct CppGenerator {
    namespace: String,
}

impl CppGenerator {
    pub fn new() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn render_header(&self, ast: &AstDefinition) -> Result<String> {
        let template = Template::compile(CPP_TEMPLATE, &[MEMBERS_SECTION])?;
        let guard = format!("{}_HPP", ast.base_name.to_uppercase());

        render_ast(
            &template,
            ast,
            &[("guard", guard.as_str()), ("namespace", self.namespace.as_str())],
        )
    }
}

impl Default for CppGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Language for CppGenerator {
    fn lang_id(&self) -> &'static str {
        "cpp"
    }

    fn reserved_names(&self) -> &'static [&'static str] {
        RESERVED_NAMES
    }

    fn generate(&self, ast: &AstDefinition) -> Result<Vec<GeneratedFile>> {
        let stem = ast.file_stem();

        Ok(vec![
            GeneratedFile {
                file_name: format!("{}.hpp", stem),
                contents: self.render_header(ast)?,
            },
            GeneratedFile {
                file_name: format!("{}.cpp", stem),
                contents: String::new(),
            },
        ])
    }
}
