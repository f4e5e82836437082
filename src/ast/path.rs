use std::fmt;

/// A segment in a field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Object field access by name
    ///
    /// # Examples
    /// - `name` -> `Field("name")`
    /// - `user.email` -> `[Field("user"), Field("email")]`
    Field(String),

    /// Array element access by index
    ///
    /// # Example
    /// - `items[0]` -> `[Field("items"), Index(0)]`
    Index(usize),

    /// The any-element quantifier `[*]`.
    ///
    /// Expands to every element of the array at this point in the path; a
    /// comparison over such a path holds if at least one expansion satisfies
    /// it.
    AnyElement,
}

/// A dotted, bracket-aware navigation path through a record.
///
/// Resolution is null-safe: a missing key, an out-of-range index, or an
/// access into a scalar yields null rather than an error, so
/// `a.b.c = 1` against a record lacking `a.b` is simply false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    pub segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        FieldPath { segments }
    }

    /// Whether this path contains the `[*]` quantifier anywhere.
    pub fn has_any_element(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, PathSegment::AnyElement))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => {
                    if !first {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(n) => write!(f, "[{}]", n)?,
                PathSegment::AnyElement => write!(f, "[*]")?,
            }
            first = false;
        }
        Ok(())
    }
}
