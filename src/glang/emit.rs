use std::fmt::{self, Write};

use super::scope::Scope;
use super::template::{ExpandOptions, Instruction, Template, TemplateSpan};
use crate::error::Result;

/// Append-only output buffer of a single generation run.
#[derive(Debug, Default)]
pub struct Document {
    buf: String,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

impl Write for Document {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}

pub struct SpanWriter<'a, W> {
    inner: &'a mut W,
}

impl<'a, W: Write> SpanWriter<'a, W> {
    pub fn new(dest: &'a mut W) -> Self {
        Self { inner: dest }
    }

    pub fn write_char(&mut self, c: char) -> fmt::Result {
        self.inner.write_char(c)
    }

    pub fn write_str(&mut self, s: &str) -> fmt::Result {
        self.inner.write_str(s)
    }

    pub fn do_indent(&mut self, size: u16) -> fmt::Result {
        for _ in 0..size {
            self.inner.write_char(' ')?;
        }

        Ok(())
    }
}

impl<'a, W> std::ops::Deref for SpanWriter<'a, W> {
    type Target = W;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl<'a, W> std::ops::DerefMut for SpanWriter<'a, W> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.inner
    }
}

/// Renders each item with `func`, separating consecutive items as requested
/// by `opts`. Items after the first start on a new line indented by `indent`
/// unless the expansion is inline.
pub fn delimited<I, F, W>(
    dest: &mut W,
    items: impl Iterator<Item = I>,
    opts: &ExpandOptions,
    indent: u16,
    mut func: F,
) -> Result<()>
where
    W: Write,
    F: FnMut(I, &mut W) -> Result<()>,
{
    let mut writer = SpanWriter::new(dest);
    let mut is_tail = false;

    for item in items {
        if is_tail {
            if let Some(delim) = opts.delimiter {
                writer.write_char(delim)?;
            }
            if opts.inline {
                writer.write_char(' ')?;
            } else {
                writer.write_char('\n')?;
                writer.do_indent(indent)?;
            }
        } else {
            is_tail = true;
        }

        func(item, &mut *writer)?;
    }

    if let (true, Some(delim)) = (opts.trailing, opts.delimiter) {
        writer.write_char(delim)?;
    }

    Ok(())
}

pub fn render_span<W: Write>(
    span: &TemplateSpan<'_>,
    dest: &mut W,
    mut scope: Scope<'_, W>,
    indent: u16,
    template: &Template<'_>,
) -> Result<()> {
    let mut writer = SpanWriter::new(dest);

    let mut current_line_indent = 0;

    for (i, inst) in span.instructions.iter().enumerate() {
        match inst {
            Instruction::Newline => {
                writer.write_char('\n')?;
                current_line_indent = 0;

                // blank lines carry no indentation
                if !matches!(span.instructions.get(i + 1), None | Some(Instruction::Newline)) {
                    writer.do_indent(indent)?;
                }
            }
            Instruction::Indent(size) => {
                current_line_indent = *size;
                writer.do_indent(*size)?;
            }
            Instruction::Literal(val) => {
                writer.write_str(val)?;
            }
            Instruction::Expand { var, opts } => {
                let expander = scope.get_expander(var)?;
                expander.expand(&mut *writer, indent + current_line_indent, opts, template)?;
            }
        }
    }

    Ok(())
}
