use std::{collections::BTreeMap, fmt};

use serde::{Serialize, Serializer};

use super::dlid::DataElement;

/// Three uppercase ASCII letters identifying a data element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementTag([u8; 3]);

impl ElementTag {
    pub fn new(value: impl AsRef<[u8]>) -> Option<Self> {
        let tag: [u8; 3] = value.as_ref().try_into().ok()?;
        if tag.iter().all(u8::is_ascii_uppercase) {
            Some(Self(tag))
        } else {
            None
        }
    }

    pub(crate) fn from_static(id: &'static [u8; 3]) -> Self {
        Self(*id)
    }

    pub fn as_str(&self) -> &str {
        unsafe {
            // SAFETY: tags only ever hold uppercase ASCII letters.
            std::str::from_utf8_unchecked(&self.0)
        }
    }
}

impl fmt::Display for ElementTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ElementTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Tag to value mapping extracted from a payload.
///
/// A tag seen more than once keeps all of its values, joined by a space in
/// order of appearance.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ElementMap(BTreeMap<ElementTag, String>);

impl ElementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `text` for elements.
    ///
    /// Three consecutive uppercase letters start an element whose value runs
    /// to the end of the line. The cursor then resumes at the line break, so
    /// uppercase runs inside a value never start a new element.
    pub fn scan(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut map = Self::new();
        let mut cursor = 0;

        while cursor + 3 <= bytes.len() {
            match ElementTag::new(&bytes[cursor..cursor + 3]) {
                Some(tag) => {
                    let start = cursor + 3;
                    let end = bytes[start..]
                        .iter()
                        .position(|&b| b == b'\n' || b == b'\r')
                        .map_or(bytes.len(), |i| start + i);

                    map.push(tag, text[start..end].trim());
                    cursor = end;
                }
                None => cursor += 1,
            }
        }

        map
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Value of the element with the given tag, if any.
    ///
    /// Returns `None` for anything that is not a valid tag.
    pub fn get(&self, tag: impl AsRef<[u8]>) -> Option<&str> {
        let tag = ElementTag::new(tag)?;
        self.0.get(&tag).map(String::as_str)
    }

    pub fn get_element(&self, element: DataElement) -> Option<&str> {
        self.0.get(&element.tag()).map(String::as_str)
    }

    /// First non-empty value among `elements`, in order.
    pub fn first_of(&self, elements: &[DataElement]) -> Option<&str> {
        elements
            .iter()
            .filter_map(|e| self.get_element(*e))
            .find(|v| !v.is_empty())
    }

    /// Inserts `value`, appending it to any previous non-empty value.
    pub fn push(&mut self, tag: ElementTag, value: &str) {
        match self.0.get_mut(&tag) {
            Some(existing) if !existing.is_empty() => {
                let joined = format!("{existing} {value}");
                *existing = joined.trim().to_owned();
            }
            Some(existing) => *existing = value.to_owned(),
            None => {
                self.0.insert(tag, value.to_owned());
            }
        }
    }

    /// Elements in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementTag, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}
