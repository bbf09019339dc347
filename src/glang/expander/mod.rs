use super::template::{ExpandOptions, Template};
use crate::error::Result;

pub mod fields;
pub mod nodes;
pub mod text;

pub use fields::FieldsExpander;
pub use nodes::NodesExpander;
pub use text::TextExpander;

pub trait Expander<W> {
    fn expand(
        &mut self,
        dest: &mut W,
        indent: u16,
        opts: &ExpandOptions,
        template: &Template<'_>,
    ) -> Result<()>;
}
