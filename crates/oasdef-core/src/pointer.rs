use std::fmt;

use serde::{Serialize, Serializer};

/// A JSON pointer into the document being validated, rendered as a URI
/// fragment (`#/paths/~1pets/get`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pointer(Vec<String>);

impl Pointer {
    pub fn root() -> Self {
        Pointer(Vec::new())
    }

    /// A new pointer with `segment` appended. `~` and `/` are escaped.
    pub fn join(&self, segment: impl AsRef<str>) -> Self {
        let mut next = self.clone();
        next.push(segment);
        next
    }

    pub fn push(&mut self, segment: impl AsRef<str>) -> &mut Self {
        let segment = segment.as_ref();
        if segment.contains(['~', '/']) {
            self.0.push(segment.replace('~', "~0").replace('/', "~1"));
        } else {
            self.0.push(segment.to_owned());
        }
        self
    }

    pub fn index(&self, i: usize) -> Self {
        self.join(i.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The unescaped final segment.
    pub fn last(&self) -> Option<String> {
        self.0.last().map(|s| unescape(s))
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for Pointer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_as_hash() {
        assert_eq!(Pointer::root().to_string(), "#");
        assert!(Pointer::root().is_root());
    }

    #[test]
    fn test_escapes_path_keys() {
        let p = Pointer::root().join("paths").join("/pets/{petId}").join("get");
        assert_eq!(p.to_string(), "#/paths/~1pets~1{petId}/get");
        assert_eq!(p.depth(), 3);
    }

    #[test]
    fn test_tilde_escaped_before_slash() {
        let p = Pointer::root().join("a~/b");
        assert_eq!(p.to_string(), "#/a~0~1b");
        assert_eq!(p.last().as_deref(), Some("a~/b"));
    }

    #[test]
    fn test_index_segments() {
        let p = Pointer::root().join("tags").index(2).join("name");
        assert_eq!(p.to_string(), "#/tags/2/name");
    }

    #[test]
    fn test_serializes_as_string() {
        let p = Pointer::root().join("info");
        assert_eq!(serde_json::to_value(&p).unwrap(), "#/info");
    }
}
