/// Index of a node in its [ResolutionTree].
pub(crate) type NodeId = usize;

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum Piece {
    Text(String),
    /// A parenthesised group. It is rolled and replaced by its result.
    SubRoll(NodeId),
    /// A define. It is replaced by its own resolved text.
    Define { name: String, node: NodeId },
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub(crate) struct ResolutionNode {
    pub depth: usize,
    pub pieces: Vec<Piece>,
}

/// Every node of one resolution. Children are pushed before their parent.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResolutionTree {
    nodes: Vec<ResolutionNode>,
}

impl ResolutionTree {
    pub fn push(&mut self, node: ResolutionNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> &ResolutionNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
