//! Chain-of-responsibility container shared by the input and game-event
//! pipelines.
//!
//! A chain owns its handlers in a vector. Each node links to its successor by
//! index, and links are only ever appended at the tail, so every successor
//! index is strictly greater than its node's own index. Traversal therefore
//! always terminates at the node with no successor.

/// What a handler decided to do with an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// The event was consumed; stop here.
    Stop,
    /// Pass the event on to the successor, if any.
    Next,
}

/// Result of running an event through a whole chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The handler at this index consumed the event.
    Consumed(usize),
    /// Every handler forwarded the event.
    Exhausted,
}

/// One link of a chain, handling events of type `E` against context `C`.
pub trait Handler<E, C> {
    fn handle(&self, event: &E, ctx: &mut C) -> Flow;
}

#[derive(Clone, Debug)]
struct Node<H> {
    handler: H,
    next: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Chain<H> {
    nodes: Vec<Node<H>>,
}

impl<H> Chain<H> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append `handler` as the new tail.
    pub fn push(&mut self, handler: H) {
        let idx = self.nodes.len();
        if let Some(tail) = self.nodes.last_mut() {
            tail.next = Some(idx);
        }
        self.nodes.push(Node { handler, next: None });
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn handler(&self, idx: usize) -> Option<&H> {
        self.nodes.get(idx).map(|n| &n.handler)
    }

    pub fn successor(&self, idx: usize) -> Option<usize> {
        self.nodes.get(idx).and_then(|n| n.next)
    }

    /// Handlers in traversal order, starting at the head.
    pub fn iter(&self) -> impl Iterator<Item = &H> {
        let mut cursor = if self.nodes.is_empty() { None } else { Some(0) };
        std::iter::from_fn(move || {
            let idx = cursor?;
            let node = &self.nodes[idx];
            cursor = node.next;
            Some(&node.handler)
        })
    }

    /// Run `event` from the head until a handler stops it or the chain ends.
    pub fn dispatch<E, C>(&self, event: &E, ctx: &mut C) -> Dispatch
    where
        H: Handler<E, C>,
    {
        let mut cursor = if self.nodes.is_empty() { None } else { Some(0) };
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            if node.handler.handle(event, ctx) == Flow::Stop {
                return Dispatch::Consumed(idx);
            }
            cursor = node.next;
        }
        Dispatch::Exhausted
    }
}

impl<H> Default for Chain<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> FromIterator<H> for Chain<H> {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        let mut chain = Chain::new();
        for handler in iter {
            chain.push(handler);
        }
        chain
    }
}
