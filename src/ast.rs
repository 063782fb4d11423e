/// Parsed pattern tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Literal(char),
    Dot,
    Star(Box<Node>),
    Concat(Box<Node>, Box<Node>),
    Alternation(Box<Node>, Box<Node>),
    Group { index: usize, node: Box<Node> },
}

impl Node {
    pub fn star(node: Node) -> Self {
        Node::Star(Box::new(node))
    }

    pub fn concat(left: Node, right: Node) -> Self {
        Node::Concat(Box::new(left), Box::new(right))
    }

    pub fn alternation(left: Node, right: Node) -> Self {
        Node::Alternation(Box::new(left), Box::new(right))
    }

    pub fn group(index: usize, node: Node) -> Self {
        Node::Group {
            index,
            node: Box::new(node),
        }
    }
}

// Long patterns build trees as deep as the pattern is long, so children
// are dropped from an explicit stack instead of recursively.
impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(mut node) = stack.pop() {
            node.take_children(&mut stack);
        }
    }
}

impl Node {
    fn take_children(&mut self, out: &mut Vec<Node>) {
        match self {
            Node::Literal(_) | Node::Dot => {}
            Node::Star(node) | Node::Group { node, .. } => {
                out.push(std::mem::replace(&mut **node, Node::Dot));
            }
            Node::Concat(left, right) | Node::Alternation(left, right) => {
                out.push(std::mem::replace(&mut **left, Node::Dot));
                out.push(std::mem::replace(&mut **right, Node::Dot));
            }
        }
    }
}
