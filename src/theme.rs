//! Button colour names and their CSS classes.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    Neutral,
    Primary,
    Secondary,
    Accent,
    Ghost,
    Link,
}

impl Colour {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Accent => "accent",
            Self::Ghost => "ghost",
            Self::Link => "link",
        }
    }

    /// Class applied to a button of this colour.
    #[must_use]
    pub const fn button_class(self) -> &'static str {
        match self {
            Self::Neutral => "btn-neutral",
            Self::Primary => "btn-primary",
            Self::Secondary => "btn-secondary",
            Self::Accent => "btn-accent",
            Self::Ghost => "btn-ghost",
            Self::Link => "btn-link",
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;
