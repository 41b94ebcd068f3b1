//! Console output helpers: owo-colors stylesheet plus TTY-aware context.

use console::Term;
use owo_colors::{OwoColorize as _, Style};

/// Centralized stylesheet for CLI output colors.
#[derive(Default, Clone)]
pub struct Styles {
    /// Success messages (green)
    pub success: Style,
    /// Error messages (red)
    pub error: Style,
    /// Info/progress lines (default foreground)
    pub info: Style,
    /// Dimmed/secondary text
    pub dim: Style,
}

impl Styles {
    /// Apply colors to the stylesheet.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.error = Style::new().red();
        self.dim = Style::new().dimmed();
    }
}

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Print a progress/info line. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.style(self.styles.info));
        }
    }

    /// Print a success message. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg.style(self.styles.success));
        }
    }

    /// Print an error message to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", msg.style(self.styles.error));
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
