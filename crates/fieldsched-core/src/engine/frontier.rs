use super::config::SearchStrategy;
use crate::core::models::schedule::ScheduleState;
use slotmap::{SlotMap, new_key_type};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

new_key_type! {
    pub struct NodeId;
}

/// An open node of the search tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub state: ScheduleState,
    pub bound: u64,
    pub depth: usize,
}

// Best-first key: lowest bound, then deepest, then oldest.
type BestFirstKey = Reverse<(u64, Reverse<usize>, u64, NodeId)>;

#[derive(Debug)]
enum Order {
    Fifo(VecDeque<NodeId>),
    Lifo(Vec<NodeId>),
    BestFirst(BinaryHeap<BestFirstKey>),
}

/// Open nodes stored in an arena and ordered by handle.
#[derive(Debug)]
pub struct Frontier {
    nodes: SlotMap<NodeId, Node>,
    order: Order,
    next_seq: u64,
}

impl Frontier {
    pub fn new(strategy: SearchStrategy) -> Self {
        let order = match strategy {
            SearchStrategy::BranchAndBound => Order::BestFirst(BinaryHeap::new()),
            SearchStrategy::BreadthFirst => Order::Fifo(VecDeque::new()),
            SearchStrategy::DepthFirst => Order::Lifo(Vec::new()),
        };
        Self {
            nodes: SlotMap::with_key(),
            order,
            next_seq: 0,
        }
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        let key = (node.bound, Reverse(node.depth));
        let id = self.nodes.insert(node);
        let seq = self.next_seq;
        self.next_seq += 1;
        match &mut self.order {
            Order::Fifo(queue) => queue.push_back(id),
            Order::Lifo(stack) => stack.push(id),
            Order::BestFirst(heap) => heap.push(Reverse((key.0, key.1, seq, id))),
        }
        id
    }

    /// Pushes siblings so that they are popped in the order given.
    pub fn extend(&mut self, siblings: Vec<Node>) {
        if matches!(self.order, Order::Lifo(_)) {
            siblings.into_iter().rev().for_each(|node| {
                self.push(node);
            });
        } else {
            siblings.into_iter().for_each(|node| {
                self.push(node);
            });
        }
    }

    pub fn pop(&mut self) -> Option<Node> {
        loop {
            let id = match &mut self.order {
                Order::Fifo(queue) => queue.pop_front(),
                Order::Lifo(stack) => stack.pop(),
                Order::BestFirst(heap) => heap.pop().map(|Reverse((_, _, _, id))| id),
            }?;
            if let Some(node) = self.nodes.remove(id) {
                return Some(node);
            }
        }
    }

    /// Pops up to `limit` nodes in frontier order.
    pub fn pop_batch(&mut self, limit: usize) -> Vec<Node> {
        let mut batch = Vec::with_capacity(limit.min(self.len()));
        while batch.len() < limit {
            match self.pop() {
                Some(node) => batch.push(node),
                None => break,
            }
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(bound: u64, depth: usize) -> Node {
        Node {
            state: ScheduleState::default(),
            bound,
            depth,
        }
    }

    fn drain(frontier: &mut Frontier) -> Vec<(u64, usize)> {
        std::iter::from_fn(|| frontier.pop())
            .map(|n| (n.bound, n.depth))
            .collect()
    }

    #[test]
    fn breadth_first_pops_in_insertion_order() {
        let mut frontier = Frontier::new(SearchStrategy::BreadthFirst);
        frontier.extend(vec![node(3, 1), node(1, 1), node(2, 2)]);
        assert_eq!(drain(&mut frontier), vec![(3, 1), (1, 1), (2, 2)]);
    }

    #[test]
    fn depth_first_pops_siblings_in_given_order_and_newest_first() {
        let mut frontier = Frontier::new(SearchStrategy::DepthFirst);
        frontier.extend(vec![node(0, 1), node(1, 1)]);
        frontier.extend(vec![node(2, 2), node(3, 2)]);
        assert_eq!(drain(&mut frontier), vec![(2, 2), (3, 2), (0, 1), (1, 1)]);
    }

    #[test]
    fn best_first_orders_by_bound_then_depth_then_age() {
        let mut frontier = Frontier::new(SearchStrategy::BranchAndBound);
        frontier.push(node(5, 1));
        frontier.push(node(2, 1));
        frontier.push(node(2, 3));
        frontier.push(node(2, 1));
        frontier.push(node(0, 0));
        assert_eq!(frontier.len(), 5);
        assert_eq!(
            drain(&mut frontier),
            vec![(0, 0), (2, 3), (2, 1), (2, 1), (5, 1)]
        );
        assert!(frontier.is_empty());
    }

    #[test]
    fn pop_batch_stops_at_limit_or_exhaustion() {
        let mut frontier = Frontier::new(SearchStrategy::BreadthFirst);
        frontier.extend((0..5).map(|i| node(i, 0)).collect());
        assert_eq!(frontier.pop_batch(3).len(), 3);
        assert_eq!(frontier.pop_batch(3).len(), 2);
        assert!(frontier.pop_batch(3).is_empty());
    }
}
