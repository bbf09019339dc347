//! Section based template language used by the built-in generators.
//!
//! A template is a list of sections delimited by `#:name` / `#:end/name`
//! lines. A section body is a span: plain text where `%var%` expands a
//! variable of the current [`Scope`]. List variables accept options after a
//! slash, `%fields/,+%` joins the items with `,` on separate lines and emits
//! a trailing `,`, while `%params/,-%` keeps them on one line. Span-list
//! sections hold several named spans written as `name { body }`.

pub mod emit;
pub mod expander;
pub mod scope;
pub mod template;

use std::fmt::Write as _;

use crate::error::Result;
use crate::items::AstDefinition;

pub use emit::{render_span, Document};
pub use expander::{Expander, FieldsExpander, NodesExpander};
pub use scope::Scope;
pub use template::{compile_span, Template, TemplateSpan};

/// The span-list section every AST template uses for per-field and per-node spans.
pub const MEMBERS_SECTION: &str = "members";

fn globals_scope<'a, W: std::fmt::Write>(
    ast: &'a AstDefinition,
    param: &'a str,
    globals: &[(&'static str, &'a str)],
) -> Scope<'a, W> {
    globals.iter().fold(
        Scope::new()
            .add_text("base", &ast.base_name)
            .add_text("param", param),
        |scope, &(name, text)| scope.add_text(name, text),
    )
}

/// Renders `ast` through the `header`, `class`, `visitor` and optional
/// `footer` sections of `template`. Classes and `%nodes%` follow the order
/// of `ast.types`; both see `%visit%`, the node's dispatch method name.
pub fn render_ast(
    template: &Template<'_>,
    ast: &AstDefinition,
    globals: &[(&'static str, &str)],
) -> Result<String> {
    let param = ast.base_name.to_lowercase();
    let mut doc = Document::new();

    render_span(
        template.span("header")?,
        &mut doc,
        globals_scope(ast, &param, globals),
        0,
        template,
    )?;
    doc.write_str("\n\n")?;

    for spec in ast.types.iter() {
        let visit = ast.visit_method(spec);
        let scope = globals_scope(ast, &param, globals)
            .add_text("name", &spec.class_name)
            .add_text("visit", &visit)
            .add_expander("params", FieldsExpander::new(spec.fields.iter(), "members.param"))
            .add_expander("inits", FieldsExpander::new(spec.fields.iter(), "members.init"))
            .add_expander("fields", FieldsExpander::new(spec.fields.iter(), "members.field"));

        render_span(template.span("class")?, &mut doc, scope, 0, template)?;
        doc.write_str("\n\n")?;
    }

    let scope = globals_scope(ast, &param, globals).add_expander(
        "nodes",
        NodesExpander::new(ast, "members.node", &param),
    );
    render_span(template.span("visitor")?, &mut doc, scope, 0, template)?;

    if let Some(footer) = template.get("footer") {
        doc.write_str("\n\n")?;
        render_span(footer, &mut doc, globals_scope(ast, &param, globals), 0, template)?;
    }

    doc.write_str("\n")?;

    Ok(doc.finish())
}
