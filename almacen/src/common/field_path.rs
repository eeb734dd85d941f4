use crate::common::{FIELD_SEPARATOR, ROUTE_SEPARATOR};
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt::Display;

type SegmentVec = SmallVec<[String; 4]>;

/// A dot-separated address of a possibly nested field inside a document.
///
/// A path always holds at least one segment. The last segment names the
/// *target* field, the preceding ones name the chain of nested documents
/// leading to its *parent*. Segments are opaque field names: an empty
/// segment (as in `"a..b"`) addresses a field literally named `""`.
///
/// # Example
///
/// ```rust
/// use almacen::common::FieldPath;
///
/// let path = FieldPath::new("x.y.z");
/// assert_eq!(path.target(), "z");
/// assert_eq!(path.parents(), &["x".to_string(), "y".to_string()]);
///
/// let routed = FieldPath::from_route("/x/y/z/");
/// assert_eq!(routed, path);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: SegmentVec,
}

impl FieldPath {
    /// Parses a `.`-separated field path.
    pub fn new(path: &str) -> FieldPath {
        FieldPath {
            segments: path.split(FIELD_SEPARATOR).map(str::to_string).collect(),
        }
    }

    /// Parses a field path as it arrives in a route: leading and trailing
    /// `/` are stripped and the remaining `/` become `.`.
    pub fn from_route(raw: &str) -> FieldPath {
        let trimmed = raw.trim_matches('/');
        FieldPath::new(&trimmed.replace(ROUTE_SEPARATOR, FIELD_SEPARATOR))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `true` if the target is not a direct field of the root document.
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    /// The last segment, naming the field the path points at.
    pub fn target(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// All segments but the last, naming the nested documents to walk.
    pub fn parents(&self) -> &[String] {
        let count = self.segments.len().saturating_sub(1);
        &self.segments[..count]
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.iter().join(FIELD_SEPARATOR))
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        FieldPath::new(path)
    }
}

impl From<&String> for FieldPath {
    fn from(path: &String) -> Self {
        FieldPath::new(path)
    }
}
