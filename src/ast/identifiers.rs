/// Whether an identifier segment was written in brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quoting {
    /// Written as `[name]`
    Quoted,
    /// Written as a bare word
    Unquoted,
}

/// A plain name segment.
///
/// # Examples
/// ```text
/// Measures        // unquoted
/// [Unit Sales]    // quoted, name "Unit Sales"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameObjectIdentifier {
    pub name: String,
    pub quoting: Quoting,
}

impl NameObjectIdentifier {
    pub fn new(name: impl Into<String>, quoting: Quoting) -> Self {
        NameObjectIdentifier {
            name: name.into(),
            quoting,
        }
    }

    pub fn quoted(name: impl Into<String>) -> Self {
        Self::new(name, Quoting::Quoted)
    }

    pub fn unquoted(name: impl Into<String>) -> Self {
        Self::new(name, Quoting::Unquoted)
    }
}

/// One or more consecutive `&`-prefixed key parts, written without a dot
/// between them.
///
/// # Examples
/// ```text
/// &[1]
/// &foo&[1]&bar
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyObjectIdentifier {
    pub parts: Vec<NameObjectIdentifier>,
}

/// One segment of a compound identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectIdentifier {
    Name(NameObjectIdentifier),
    Key(KeyObjectIdentifier),
}

/// Dot-separated chain of identifier segments. Never empty.
///
/// # Examples
/// ```text
/// [Measures].[Unit Sales]
/// [Time].&[2024]&[Q1]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundId {
    segments: Vec<ObjectIdentifier>,
}

impl CompoundId {
    pub fn new(first: ObjectIdentifier) -> Self {
        CompoundId {
            segments: vec![first],
        }
    }

    pub fn segments(&self) -> &[ObjectIdentifier] {
        &self.segments
    }

    /// Adds a trailing segment.
    pub fn append(mut self, segment: ObjectIdentifier) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The single name segment, if this identifier has exactly one.
    pub fn as_single_name(&self) -> Option<&NameObjectIdentifier> {
        match self.segments.as_slice() {
            [ObjectIdentifier::Name(name)] => Some(name),
            _ => None,
        }
    }
}

impl From<NameObjectIdentifier> for CompoundId {
    fn from(name: NameObjectIdentifier) -> Self {
        CompoundId::new(ObjectIdentifier::Name(name))
    }
}

/// Name of a cube in the subcube position of a `SELECT`. Always a single
/// segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CubeNameIdentifier {
    pub name: String,
    pub quoting: Quoting,
}
