/// How values are compared against a field's allowed-value list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueMatching {
    /// Exact, case-sensitive comparison.
    Strict,
    /// Trimmed, case-insensitive comparison. Accepts the casing users
    /// actually type while the declared list stays canonical.
    #[default]
    Lenient,
}

/// Tunables for a [`DraftEditor`](crate::DraftEditor).
#[derive(Debug, Clone)]
pub struct EditorOptions {
    /// Comparison mode for allowed-value checks.
    pub value_matching: ValueMatching,
    /// Canonicalize numeric text (`"3"`) to a number on integer and decimal
    /// fields when building a commit payload. Draft values themselves are
    /// never rewritten.
    pub coerce_numeric_text: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            value_matching: ValueMatching::default(),
            coerce_numeric_text: true,
        }
    }
}

impl EditorOptions {
    pub fn with_value_matching(mut self, mode: ValueMatching) -> Self {
        self.value_matching = mode;
        self
    }

    pub fn with_coerce_numeric_text(mut self, enabled: bool) -> Self {
        self.coerce_numeric_text = enabled;
        self
    }
}
