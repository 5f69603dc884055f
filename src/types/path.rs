use std::fmt;

use serde::Serialize;

/// Location of a node inside a condition tree: the child indices taken
/// through each nested `rules` array, starting from the root.
///
/// Paths address validation issues, trace events, and editing operations,
/// and render the way the editors display them: `rules[0].rules[2]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// The root of the tree (an empty index list).
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// A new path extended by one child index.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of `rules` hops from the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for NodePath {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("root");
        }
        for (hop, index) in self.0.iter().enumerate() {
            if hop > 0 {
                f.write_str(".")?;
            }
            write!(f, "rules[{index}]")?;
        }
        Ok(())
    }
}
