use std::fmt::{Display, Formatter};

/// Operator tag of a [`Node`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BoolOp {
    /// A leaf, no children.
    Var,
    /// Conjunction of the children. Zero children encodes a constant.
    And,
    /// Parity of the children.
    Xor,
    /// If-then-else over exactly three children.
    Ite,
    /// No definition yet.
    Invalid,
}

impl Display for BoolOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BoolOp::Var => "v",
            BoolOp::And => "&",
            BoolOp::Xor => "^",
            BoolOp::Ite => "?",
            BoolOp::Invalid => "",
        };
        write!(f, "{}", s)
    }
}

/// One definition of a Boolean value: `sign ^ op(children)`.
///
/// Children are not stored inline. They live contiguously in the
/// [`LitArena`][crate::arena::LitArena] at `offset..offset + size`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    pub sign: bool,
    pub op: BoolOp,
    pub size: u32,
    pub offset: u32,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            sign: false,
            op: BoolOp::Invalid,
            size: 0,
            offset: u32::MAX,
        }
    }
}

impl Node {
    pub const fn new(sign: bool, op: BoolOp, size: u32, offset: u32) -> Self {
        Self {
            sign,
            op,
            size,
            offset,
        }
    }

    /// The leaf definition.
    pub const fn leaf() -> Self {
        Self::new(false, BoolOp::Var, 0, 0)
    }

    pub fn is_valid(&self) -> bool {
        self.op != BoolOp::Invalid
    }
    pub fn is_var(&self) -> bool {
        self.op == BoolOp::Var
    }
    pub fn is_and(&self) -> bool {
        self.op == BoolOp::And
    }
    pub fn is_xor(&self) -> bool {
        self.op == BoolOp::Xor
    }
    pub fn is_ite(&self) -> bool {
        self.op == BoolOp::Ite
    }
    pub fn is_const(&self) -> bool {
        self.is_and() && self.size == 0
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.size as usize
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Arena range holding the children.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset as usize;
        start..start + self.size as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_invalid() {
        let n = Node::default();
        assert!(!n.is_valid());
        assert!(!n.is_const());
    }

    #[test]
    fn test_const_node() {
        let n = Node::new(true, BoolOp::And, 0, 7);
        assert!(n.is_const());
        assert!(n.is_empty());
        assert_eq!(n.range(), 7..7);
    }

    #[test]
    fn test_range() {
        let n = Node::new(false, BoolOp::Ite, 3, 4);
        assert!(n.is_ite());
        assert_eq!(n.len(), 3);
        assert_eq!(n.range(), 4..7);
    }
}
