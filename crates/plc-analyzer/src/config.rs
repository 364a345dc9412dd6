//! Analyzer configuration.

/// Knobs for rules the language leaves to the implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Only binary expressions may be parenthesized.
    pub strict_groups: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            strict_groups: true,
        }
    }
}
