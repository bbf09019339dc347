use std::fmt::Write;

use crate::error::Result;
use crate::items::AstDefinition;

use crate::glang::emit::{delimited, render_span};
use crate::glang::expander::Expander;
use crate::glang::scope::Scope;
use crate::glang::template::{ExpandOptions, Template};

/// Renders `span` once per node type, in specification order, with `%name%`
/// bound to the class name and `%visit%` to its dispatch method, next to the
/// definition-wide `%base%` and `%param%`.
pub struct NodesExpander<'a> {
    ast: &'a AstDefinition,
    span: &'static str,
    param: &'a str,
}

impl<'a> NodesExpander<'a> {
    pub fn new(ast: &'a AstDefinition, span: &'static str, param: &'a str) -> Self {
        Self { ast, span, param }
    }
}

impl<'a, W: Write> Expander<W> for NodesExpander<'a> {
    fn expand(
        &mut self,
        dest: &mut W,
        indent: u16,
        opts: &ExpandOptions,
        template: &Template<'_>,
    ) -> Result<()> {
        let span = template.span(self.span)?;
        let (ast, param) = (self.ast, self.param);

        delimited(dest, ast.types.iter(), opts, indent, |spec, dest| {
            let visit = ast.visit_method(spec);

            render_span(
                span,
                dest,
                Scope::new()
                    .add_text("name", &spec.class_name)
                    .add_text("visit", &visit)
                    .add_text("base", &ast.base_name)
                    .add_text("param", param),
                indent,
                template,
            )
        })
    }
}
