use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for terminal output. Every field is a no-op style when color is off.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub info: Style,
    pub dim: Style,
    /// Negative amounts (refunds, credits)
    pub credit: Style,
}

impl Theme {
    pub fn new(color: bool) -> Self {
        let pick = |style: Style| if color { style } else { Style::new() };
        Self {
            header: pick(Style::new().cyan().bold()),
            success: pick(Style::new().green().bold()),
            error: pick(Style::new().red().bold()),
            info: pick(Style::new().magenta()),
            dim: pick(Style::new().dimmed()),
            credit: pick(Style::new().green()),
        }
    }
}

/// Process-wide theme; color follows console's stdout detection
/// (`NO_COLOR`, `CLICOLOR_FORCE`, tty).
pub fn theme() -> &'static Theme {
    THEME.get_or_init(|| Theme::new(console::colors_enabled()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_colorless_theme_leaves_text_alone() {
        let theme = Theme::new(false);
        assert_eq!("-4.00".style(theme.credit).to_string(), "-4.00");
        assert_eq!("Expenses".style(theme.header).to_string(), "Expenses");
    }

    #[test]
    fn test_colored_theme_adds_escapes() {
        let theme = Theme::new(true);
        let rendered = "failed".style(theme.error).to_string();
        assert!(rendered.contains("\u{1b}["));
        assert!(rendered.contains("failed"));
    }
}
