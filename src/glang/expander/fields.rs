use std::fmt::Write;
use std::marker::PhantomData;

use crate::error::Result;
use crate::items::Field;

use crate::glang::emit::{delimited, render_span};
use crate::glang::expander::Expander;
use crate::glang::scope::Scope;
use crate::glang::template::{ExpandOptions, Template};

/// Renders `span` once per field with `%ty%` and `%name%` in scope.
pub struct FieldsExpander<'a, F> {
    fields: F,
    span: &'static str,
    _phantom: PhantomData<&'a ()>,
}

impl<'a, F> FieldsExpander<'a, F> {
    pub fn new(fields: F, span: &'static str) -> Self {
        Self {
            fields,
            span,
            _phantom: PhantomData,
        }
    }
}

impl<'a, F, W> Expander<W> for FieldsExpander<'a, F>
where
    W: Write,
    F: Iterator<Item = &'a Field> + Clone,
{
    fn expand(
        &mut self,
        dest: &mut W,
        indent: u16,
        opts: &ExpandOptions,
        template: &Template<'_>,
    ) -> Result<()> {
        let span = template.span(self.span)?;

        delimited(dest, self.fields.clone(), opts, indent, |field, dest| {
            render_span(
                span,
                dest,
                Scope::new()
                    .add_text("ty", &field.ty)
                    .add_text("name", &field.name),
                indent,
                template,
            )
        })
    }
}
