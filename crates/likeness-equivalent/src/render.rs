//! Rendering of operands into failure messages.

use std::fmt::{self, Write as _};

use likeness_value::{is_null, Value};

/// Turns values into the text captured by an
/// [`EquivalenceFailure`](crate::EquivalenceFailure).
pub trait Render: Send + Sync {
    /// `None` and null values are both rendered as an absent value.
    fn render(&self, value: Option<&dyn Value>) -> String;

    /// Renders a whole collection, optionally marking the element at `focus`.
    fn render_sequence(&self, items: &[&dyn Value], focus: Option<usize>) -> String {
        let rendered: Vec<String> = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let item = self.render(Some(*item));
                if focus == Some(index) {
                    format!("<{item}>")
                } else {
                    item
                }
            })
            .collect();
        format!("[{}]", rendered.join(", "))
    }
}

/// Renders values through their `Debug` output, cut off after
/// [`DebugRender::LIMIT`] bytes.
///
/// The cut-off also ends formatting early, so self-referencing values with a
/// derived `Debug` still render.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugRender;

impl DebugRender {
    pub const LIMIT: usize = 256;
}

impl Render for DebugRender {
    fn render(&self, value: Option<&dyn Value>) -> String {
        match value {
            Some(value) if !is_null(value) => {
                let mut out = Bounded {
                    text: String::new(),
                    limit: Self::LIMIT,
                };
                if write!(out, "{value:?}").is_err() {
                    out.text.push_str("...");
                }
                out.text
            }
            _ => "null".to_owned(),
        }
    }
}

/// Writer that refuses input past `limit` bytes.
struct Bounded {
    text: String,
    limit: usize,
}

impl fmt::Write for Bounded {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.limit - self.text.len();
        if s.len() <= room {
            self.text.push_str(s);
            return Ok(());
        }
        let mut end = room;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        self.text.push_str(&s[..end]);
        Err(fmt::Error)
    }
}
