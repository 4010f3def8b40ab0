use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors produced when parsing a content identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CidError {
    /// The input was empty.
    #[error("cid is empty")]
    Empty,

    /// The input is shorter than any valid encoded identifier.
    #[error("cid too short: {0} characters")]
    TooShort(usize),

    /// The input does not carry the lowercase-base32 multibase prefix.
    #[error("cid must start with the multibase prefix 'b'")]
    BadPrefix,

    /// The input contains a character outside the base32 alphabet.
    #[error("cid contains invalid character {0:?}")]
    BadCharacter(char),
}

/// A content identifier: the content-derived hash naming a blob's bytes.
///
/// Held in its canonical lowercase-base32 text form (multibase prefix `b`,
/// alphabet `a-z2-7`). The derived `Ord` is the lexicographic order of that
/// text, which is the order enumeration cursors are defined over.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cid(String);

/// Conservative lower bound on the encoded length; the shortest hash in use
/// encodes well above this.
const MIN_ENCODED_LEN: usize = 24;

fn is_base32_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '2'..='7')
}

impl Cid {
    /// Parse a content identifier from its canonical text form.
    pub fn parse(input: &str) -> Result<Self, CidError> {
        if input.is_empty() {
            return Err(CidError::Empty);
        }
        if !input.starts_with('b') {
            return Err(CidError::BadPrefix);
        }
        if input.len() < MIN_ENCODED_LEN {
            return Err(CidError::TooShort(input.len()));
        }
        if let Some(bad) = input.chars().find(|c| !is_base32_char(*c)) {
            return Err(CidError::BadCharacter(bad));
        }
        Ok(Self(input.to_owned()))
    }

    /// The canonical text form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning its canonical text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Cid {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Cid {
    type Error = CidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Cid> for String {
    fn from(cid: Cid) -> Self {
        cid.0
    }
}

impl AsRef<str> for Cid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid() {
        let text = "bafkreibvx5vjzn3rrvhlkk5uhhhnwbbmg3brdksqvzzf4oq7lqxuwmelky";
        let cid = Cid::parse(text).unwrap();
        assert_eq!(cid.as_str(), text);
        assert_eq!(cid.to_string(), text);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Cid::parse(""), Err(CidError::Empty));
    }

    #[test]
    fn rejects_wrong_prefix() {
        assert_eq!(
            Cid::parse("zafkreibvx5vjzn3rrvhlkk5uhhhnwbbmg3brdksqvzzf4oq7lq"),
            Err(CidError::BadPrefix)
        );
    }

    #[test]
    fn rejects_short_input() {
        assert_eq!(Cid::parse("bafkrei"), Err(CidError::TooShort(7)));
    }

    #[test]
    fn rejects_invalid_characters() {
        // '1' and uppercase are outside the lowercase base32 alphabet.
        assert_eq!(
            Cid::parse("bafkrei1vx5vjzn3rrvhlkk5uhhhnwbbmg3brdksq"),
            Err(CidError::BadCharacter('1'))
        );
        assert_eq!(
            Cid::parse("bafkreiBvx5vjzn3rrvhlkk5uhhhnwbbmg3brdksq"),
            Err(CidError::BadCharacter('B'))
        );
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = Cid::parse("bafkreiaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
        let b = Cid::parse("bafkreibbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb").unwrap();
        assert!(a < b);
        assert!(a.as_str() < b.as_str());
    }
}
