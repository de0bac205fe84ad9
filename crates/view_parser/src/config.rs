/// Configuration for [`Parser`](crate::Parser).
#[derive(Clone, Debug)]
pub struct ParserConfig {
    /// Label prefixed to diagnostics (`templates/list.stache:12: ...`).
    pub filename: Option<String>,
    /// Emit `log::warn!` diagnostics for recoverable markup problems. Never changes
    /// the event stream.
    pub warnings: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            filename: None,
            warnings: true,
        }
    }
}

impl ParserConfig {
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn quiet(mut self) -> Self {
        self.warnings = false;
        self
    }
}

/// Warning sink bound to one parse.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Diagnostics<'c> {
    filename: Option<&'c str>,
    enabled: bool,
}

impl<'c> Diagnostics<'c> {
    pub(crate) fn new(config: &'c ParserConfig) -> Self {
        Self {
            filename: config.filename.as_deref(),
            enabled: config.warnings,
        }
    }

    pub(crate) fn disabled() -> Self {
        Self {
            filename: None,
            enabled: false,
        }
    }

    pub(crate) fn warn(&self, line: usize, message: std::fmt::Arguments<'_>) {
        if !self.enabled {
            return;
        }
        match self.filename {
            Some(filename) => log::warn!(target: "view_parser", "{filename}:{line}: {message}"),
            None => log::warn!(target: "view_parser", "{line}: {message}"),
        }
    }
}
