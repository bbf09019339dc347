use std::collections::HashMap;

use crate::error::{Error, Result};

// Lines starting with this open (`#:name`) or close (`#:end/name`) a section
const SECTION_MARKER: &str = "#:";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandOptions {
    // The delimiter between items emitted from this (multi) variable
    pub delimiter: Option<char>,
    // Should the delimiter be emitted after the last item ?
    pub trailing: bool,
    // Items share one line, separated by the delimiter and a space
    pub inline: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction<'t> {
    Newline,

    Indent(u16),

    Literal(&'t str),

    Expand { var: &'t str, opts: ExpandOptions },
}

#[derive(Clone, Debug, Default)]
pub struct TemplateSpan<'t> {
    pub instructions: Vec<Instruction<'t>>,
}

pub fn compile_span(content: &str) -> Result<TemplateSpan<'_>> {
    let mut instructions = vec![];

    #[derive(Clone, Copy, Debug)]
    enum State {
        Indenting,
        Literal,
        Variable,
    }

    for (line_index, line) in content.lines().enumerate() {
        if line_index != 0 {
            instructions.push(Instruction::Newline);
        }

        let mut indent: u16 = 0;
        let mut start = 0;
        let mut state = State::Indenting;

        for (index, c) in line.char_indices() {
            match (state, c) {
                (State::Indenting, ' ' | '\t') => {
                    indent += 1;
                }
                (State::Indenting, c) => {
                    if indent > 0 {
                        instructions.push(Instruction::Indent(indent));
                    }
                    // NOTE: the opening % is not part of start
                    (state, start) = if c == '%' {
                        (State::Variable, index + 1)
                    } else {
                        (State::Literal, index)
                    };
                }

                (State::Literal, '%') => {
                    if index > start {
                        instructions.push(Instruction::Literal(&line[start..index]));
                    }
                    state = State::Variable;
                    start = index + 1;
                }
                (State::Literal, _) => (),

                (State::Variable, '%') => {
                    let (var, opts) = parse_expansion(&line[start..index])?;
                    instructions.push(Instruction::Expand { var, opts });

                    state = State::Literal;
                    start = index + 1;
                }
                (State::Variable, _) => (),
            }
        }

        match state {
            State::Literal => {
                if start < line.len() {
                    instructions.push(Instruction::Literal(&line[start..]));
                }
            }
            // whitespace-only lines render empty
            State::Indenting => (),
            State::Variable => {
                return Err(Error::Template(format!(
                    "unterminated `%` expansion in {:?}",
                    line
                )));
            }
        }
    }

    Ok(TemplateSpan { instructions })
}

/// Splits `name/<delimiter><flags>` into the variable and its options.
fn parse_expansion(body: &str) -> Result<(&str, ExpandOptions)> {
    let (var, opts) = match body.split_once('/') {
        None => (body, ExpandOptions::default()),
        Some((var, raw_opts)) => {
            let mut chars = raw_opts.chars();
            let delimiter = chars.next().ok_or_else(|| {
                Error::Template(format!("missing delimiter in `%{}%`", body))
            })?;

            let mut opts = ExpandOptions {
                delimiter: Some(delimiter),
                ..ExpandOptions::default()
            };

            for flag in chars {
                match flag {
                    '+' => opts.trailing = true,
                    '-' => opts.inline = true,
                    _ => {
                        return Err(Error::Template(format!(
                            "unknown flag `{}` in `%{}%`",
                            flag, body
                        )))
                    }
                }
            }

            (var, opts)
        }
    };

    if var.is_empty() || !var.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::Template(format!("invalid variable name in `%{}%`", body)));
    }

    Ok((var, opts))
}

/* ==================================== */

fn compile_template_sections(source: &str) -> Result<Vec<(&str, &str)>> {
    let mut sections = vec![];

    let mut current_section: Option<&str> = None;
    let mut start = 0;
    let mut current = 0;

    for line in source.split_inclusive('\n') {
        let current_new = current + line.len();

        if let Some(marker) = line.trim().strip_prefix(SECTION_MARKER) {
            match (marker.strip_prefix("end/"), current_section) {
                (None, None) => {
                    if sections.iter().any(|&(name, _)| name == marker) {
                        return Err(Error::Template(format!("duplicate section `{}`", marker)));
                    }
                    current_section = Some(marker);
                    start = current_new;
                }
                (None, Some(open)) => {
                    return Err(Error::Template(format!(
                        "section `{}` opened inside section `{}`",
                        marker, open
                    )));
                }
                (Some(name), Some(open)) if name == open => {
                    sections.push((open, &source[start..current]));
                    current_section = None;
                }
                (Some(name), _) => {
                    return Err(Error::Template(format!(
                        "unexpected end of section `{}`",
                        name
                    )));
                }
            }
        }

        current = current_new;
    }

    if let Some(open) = current_section {
        return Err(Error::Template(format!("section `{}` is never closed", open)));
    }

    Ok(sections)
}

/// Parses a list of `name { body }` spans
fn stream_parse_spans<'t, F>(mut source: &'t str, mut receiver: F) -> Result<()>
where
    F: FnMut(&'t str, TemplateSpan<'t>),
{
    loop {
        source = source.trim();

        if source.is_empty() {
            break;
        }

        let name_end = source
            .find(|c: char| c.is_whitespace() || c == '{')
            .unwrap_or(source.len());
        let (name, rem) = source.split_at(name_end);

        let rem = rem
            .trim_start()
            .strip_prefix('{')
            .ok_or_else(|| Error::Template(format!("expected `{{` after span `{}`", name)))?;

        // at this point rem is something like this
        // ..target string..}..extra string...

        let mut brackets_open = 1;
        let mut end_index = None;

        for (i, c) in rem.char_indices() {
            if c == '}' {
                brackets_open -= 1;
                if brackets_open == 0 {
                    end_index = Some(i);
                    break;
                }
            } else if c == '{' {
                brackets_open += 1;
            }
        }

        let end_index =
            end_index.ok_or_else(|| Error::Template(format!("span `{}` is never closed", name)))?;
        let (body, rem) = rem.split_at(end_index);

        receiver(name, compile_span(body.trim())?);

        // Remove the closing bracket of the parsed body
        source = &rem[1..];
    }

    Ok(())
}

/* ==================================== */

/// Compiled spans of a template, keyed by section name. Spans of a span-list
/// section are keyed `section.name`.
#[derive(Debug, Clone, Default)]
pub struct Template<'t> {
    spans: HashMap<String, TemplateSpan<'t>>,
}

impl<'t> Template<'t> {
    pub fn compile(source: &'t str, span_lists: &[&str]) -> Result<Self> {
        let mut spans = HashMap::new();

        for (section, body) in compile_template_sections(source)? {
            if span_lists.contains(&section) {
                stream_parse_spans(body, |name, span| {
                    spans.insert(format!("{}.{}", section, name), span);
                })?;
            } else {
                spans.insert(section.to_string(), compile_span(body)?);
            }
        }

        Ok(Self { spans })
    }

    pub fn get(&self, name: &str) -> Option<&TemplateSpan<'t>> {
        self.spans.get(name)
    }

    pub fn span(&self, name: &str) -> Result<&TemplateSpan<'t>> {
        self.get(name)
            .ok_or_else(|| Error::Template(format!("template has no span `{}`", name)))
    }
}
