use std::fmt;

/// The closed set of literary categories a post may carry.
///
/// The wire and storage representation is the upper-case literal; anything
/// outside this list is not a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Conto,
    Cronica,
    Poesia,
    Ensaio,
    Resenha,
}

impl Tag {
    pub const ALL: [Tag; 5] = [
        Tag::Conto,
        Tag::Cronica,
        Tag::Poesia,
        Tag::Ensaio,
        Tag::Resenha,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Conto => "CONTO",
            Tag::Cronica => "CRONICA",
            Tag::Poesia => "POESIA",
            Tag::Ensaio => "ENSAIO",
            Tag::Resenha => "RESENHA",
        }
    }

    /// Maps a wire value back to a tag. Values outside the enumeration yield
    /// `None` and are silently dropped by the validation gate.
    pub fn from_api(value: &str) -> Option<Tag> {
        Tag::ALL.iter().copied().find(|tag| tag.as_str() == value)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_round_trip() {
        for tag in Tag::ALL.iter() {
            assert_eq!(Tag::from_api(tag.as_str()), Some(*tag));
        }
    }

    #[test]
    fn unknown_values_are_rejected() {
        let tests = vec!["INVALID_TAG", "conto", "Poesia", "", "ROMANCE"];
        for value in tests {
            assert_eq!(Tag::from_api(value), None, "{:?} is not a tag", value);
        }
    }
}
