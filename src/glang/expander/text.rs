use super::Expander;
use std::fmt::Write;

use crate::error::Result;
use crate::glang::template::{ExpandOptions, Template};

pub struct TextExpander<'a>(/* text: */ pub &'a str);

impl<'a, W: Write> Expander<W> for TextExpander<'a> {
    fn expand(
        &mut self,
        dest: &mut W,
        _indent: u16,
        _opts: &ExpandOptions,
        _template: &Template<'_>,
    ) -> Result<()> {
        dest.write_str(self.0)?;
        Ok(())
    }
}
