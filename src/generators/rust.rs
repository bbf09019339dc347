use crate::error::Result;
use crate::glang::{render_ast, Template, MEMBERS_SECTION};
use crate::items::AstDefinition;
use crate::language::{GeneratedFile, Language};

static RUST_TEMPLATE: &str = include_str!("rust.gx");

// Strict and reserved keywords; raw identifiers are not emitted
const RESERVED_NAMES: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "gen",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Emits `<base>.rs`: one struct per node type and a closed `<base>` enum
/// over all of them, so consumers match exhaustively instead of implementing
/// a visitor.
#[derive(Debug, Default)]
pub struct RustGenerator;

impl RustGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Language for RustGenerator {
    fn lang_id(&self) -> &'static str {
        "rs"
    }

    fn reserved_names(&self) -> &'static [&'static str] {
        RESERVED_NAMES
    }

    fn generate(&self, ast: &AstDefinition) -> Result<Vec<GeneratedFile>> {
        let template = Template::compile(RUST_TEMPLATE, &[MEMBERS_SECTION])?;

        Ok(vec![GeneratedFile {
            file_name: format!("{}.rs", ast.file_stem()),
            contents: render_ast(&template, ast, &[])?,
        }])
    }
}
