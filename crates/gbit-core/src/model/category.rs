use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::ErrorCode;

/// The four fixed goal categories.
///
/// Serialized with their display names (`"Learning"`, `"Book"`, ...) so the
/// persisted document stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Learning,
    Book,
    Money,
    General,
}

impl Category {
    /// Every category, in chart order.
    pub const ALL: [Self; 4] = [Self::Learning, Self::Book, Self::Money, Self::General];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Learning => "Learning",
            Self::Book => "Book",
            Self::Money => "Money",
            Self::General => "General",
        }
    }

    /// Unit assigned to new goals of this category when no override is configured.
    #[must_use]
    pub const fn default_unit(self) -> Option<&'static str> {
        match self {
            Self::Learning => Some("lessons"),
            Self::Book => Some("chapters"),
            Self::Money => Some("INR"),
            Self::General => None,
        }
    }

    /// Palette token used by front ends for badges and chart bars.
    #[must_use]
    pub const fn color(self) -> CategoryColor {
        match self {
            Self::Learning => CategoryColor {
                token: "blue",
                hex: "#60A5FA",
            },
            Self::Book => CategoryColor {
                token: "yellow",
                hex: "#FCD34D",
            },
            Self::Money => CategoryColor {
                token: "green",
                hex: "#34D399",
            },
            Self::General => CategoryColor {
                token: "accent",
                hex: "#F472B6",
            },
        }
    }

    /// Whether a logged entry needs an explicit numeric value.
    ///
    /// Money goals always count amounts, even without a target.
    #[must_use]
    pub const fn always_numeric(self) -> bool {
        matches!(self, Self::Money)
    }
}

/// Display color for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryColor {
    pub token: &'static str,
    pub hex: &'static str,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a category from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid category: '{got}' (expected learning, book, money, or general)")]
pub struct ParseCategoryError {
    pub got: String,
}

impl ParseCategoryError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::InvalidCategory
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learning" => Ok(Self::Learning),
            "book" => Ok(Self::Book),
            "money" => Ok(Self::Money),
            "general" => Ok(Self::General),
            _ => Err(ParseCategoryError { got: s.to_string() }),
        }
    }
}
