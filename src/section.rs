//! Content sections (the caller-facing input model) and rendered blocks
//! (the per-page output unit).

/// Marker appended to a record that had to be hard-cut to make progress.
pub(crate) const TRUNCATION_MARKER: &str = "… (truncated)";

/// One named, ordered group of records to lay out across pages.
///
/// The formatter is applied exactly once per record at construction; the
/// layout algorithm then works on the rendered strings. This is equivalent to
/// lazy formatting because formatters are required to be pure, and it keeps
/// the halving retries in the builder from re-running caller code.
#[derive(Debug, Clone)]
pub struct ContentSection {
    name: String,
    rendered: Vec<String>,
    empty_message: String,
    inline: bool,
    max_items: Option<usize>,
}

impl ContentSection {
    /// Build a section from domain records and a pure formatter.
    pub fn new<T>(
        name: impl Into<String>,
        records: &[T],
        formatter: impl Fn(&T) -> String,
        empty_message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rendered: records.iter().map(formatter).collect(),
            empty_message: empty_message.into(),
            inline: false,
            max_items: None,
        }
    }

    /// Mark the section's blocks as inline fields.
    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    /// Cap how many records this section may display in total.
    ///
    /// Continuation markers count remaining records against the capped total.
    pub fn max_items(mut self, cap: usize) -> Self {
        self.max_items = Some(cap);
        self
    }

    /// Section name, used as the block name on every page it touches.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Message rendered when the section has no records at all.
    pub fn empty_message(&self) -> &str {
        &self.empty_message
    }

    pub(crate) fn is_inline(&self) -> bool {
        self.inline
    }

    /// Number of records the layout will actually consume (cap applied).
    pub(crate) fn effective_len(&self) -> usize {
        match self.max_items {
            Some(cap) => self.rendered.len().min(cap),
            None => self.rendered.len(),
        }
    }

    /// Rendered text of a single record, by cursor position.
    pub(crate) fn record_text(&self, index: usize) -> &str {
        &self.rendered[index]
    }

    /// Render a run of `count` records starting at `start`, newline-joined,
    /// with a continuation marker when records remain past the run.
    pub(crate) fn render_run(&self, start: usize, count: usize) -> String {
        let end = (start + count).min(self.effective_len());
        let mut body = self.rendered[start..end].join("\n");

        let remaining = self.effective_len() - end;
        if remaining > 0 {
            body.push_str(&continuation_marker(remaining));
        }

        body
    }
}

/// Continuation marker noting how many records of a section remain unshown.
pub(crate) fn continuation_marker(remaining: usize) -> String {
    format!("\n… and {remaining} more")
}

/// One rendered unit committed to a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Section name this block came from.
    pub name: String,
    /// Rendered body, counted in full against the page budget.
    pub body: String,
    /// Whether the block renders as an inline field.
    pub inline: bool,
}
