use super::expander::{Expander, TextExpander};
use crate::error::{Error, Result};

use std::collections::HashMap;
use std::fmt::Write;

pub struct Scope<'a, W> {
    entries: HashMap<&'static str, Box<dyn Expander<W> + 'a>>,
}

impl<'a, W: Write> Scope<'a, W> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn add_text(self, name: &'static str, text: &'a str) -> Self {
        self.add_expander(name, TextExpander(text))
    }

    pub fn add_expander<E: Expander<W> + 'a>(mut self, name: &'static str, expander: E) -> Self {
        self.entries.insert(name, Box::new(expander));
        self
    }

    pub fn get_expander(&mut self, name: &str) -> Result<&mut (dyn Expander<W> + 'a)> {
        self.entries
            .get_mut(name)
            .map(|expander| expander.as_mut())
            .ok_or_else(|| Error::Template(format!("unknown variable %{}%", name)))
    }
}

impl<'a, W: Write> Default for Scope<'a, W> {
    fn default() -> Self {
        Self::new()
    }
}
