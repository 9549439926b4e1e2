use indexmap::IndexSet;

/// Tracks state during module emission: indentation and collected imports.
#[derive(Debug, Clone)]
pub struct EmitContext {
    /// Current indentation level
    indent_level: usize,
    /// Characters per indent (e.g., 2 spaces)
    indent_width: usize,
    /// Whether to use tabs
    use_tabs: bool,
    /// Collected import paths (deduped, insertion-ordered)
    imports: IndexSet<String>,
}

/// Indentation style configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    Spaces(usize),
    Tabs,
}

impl EmitContext {
    pub fn new(style: IndentStyle) -> Self {
        let (use_tabs, indent_width) = match style {
            IndentStyle::Spaces(n) => (false, n),
            IndentStyle::Tabs => (true, 1),
        };
        Self {
            indent_level: 0,
            indent_width,
            use_tabs,
            imports: IndexSet::new(),
        }
    }

    /// Get the current indentation string.
    pub fn indent(&self) -> String {
        let unit = if self.use_tabs { "\t" } else { " " };
        unit.repeat(self.indent_level * self.indent_width)
    }

    /// `text` at the current indentation. Every line of multi-line text is
    /// shifted, keeping its relative nesting; empty lines stay empty.
    pub fn line(&self, text: impl AsRef<str>) -> String {
        let indent = self.indent();
        text.as_ref()
            .split('\n')
            .map(|l| {
                if l.is_empty() {
                    String::new()
                } else {
                    format!("{indent}{l}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Increase indentation by one level.
    pub fn push_indent(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease indentation by one level.
    pub fn pop_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Add an import path to the collection (deduped).
    pub fn add_import(&mut self, path: impl Into<String>) {
        self.imports.insert(path.into());
    }

    /// Drain and return all collected imports.
    pub fn take_imports(&mut self) -> IndexSet<String> {
        std::mem::take(&mut self.imports)
    }
}
