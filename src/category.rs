use std::{fmt, str::FromStr};
use thiserror::Error;

/// The fixed set of spending categories an expense can be filed under
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Category {
    Food,
    Transport,
    Utilities,
    Entertainment,
    Other,
}

#[derive(Error, Debug, Eq, PartialEq)]
pub enum CategoryError {
    #[error("unknown category '{0}'")]
    Unknown(String),
}

impl Category {
    /// Every category, in the order a picker should offer them
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Utilities,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn name(&self) -> &'static str {
        match *self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        Category::ALL
            .iter()
            .find(|c| c.name() == name)
            .copied()
            .ok_or_else(|| CategoryError::Unknown(name.into()))
    }
}
