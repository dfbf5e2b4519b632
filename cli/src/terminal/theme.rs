use colored::Color;

/// Colours used by the reporters. Passed in at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub handle: Color,
    pub success: Color,
    pub failure: Color,
    pub ambiguous: Color,
    pub accent: Color,
    pub separator: Color,
    pub text: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            handle: Color::BrightCyan,
            success: Color::BrightGreen,
            failure: Color::BrightRed,
            ambiguous: Color::BrightYellow,
            accent: Color::BrightMagenta,
            separator: Color::BrightBlack,
            text: Color::White,
        }
    }
}
