use super::tasks::soft_constraints::CostReport;
use crate::core::models::ids::{ItemId, SlotId};
use crate::core::models::schedule::ScheduleState;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// A complete schedule together with its evaluation.
#[derive(Debug, Clone)]
pub struct Solution {
    pub cost: CostReport,
    pub schedule: ScheduleState,
    signature: Vec<(ItemId, SlotId)>,
}

impl Solution {
    pub fn new(cost: CostReport, schedule: ScheduleState) -> Self {
        let signature = schedule.signature();
        Self {
            cost,
            schedule,
            signature,
        }
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.cost.total
    }
}

// Ordered by cost, then by the canonical signature, so equal-cost solutions
// rank the same way in every run. Smaller is better.
impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Solution {}

impl PartialOrd for Solution {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Solution {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total
            .cmp(&other.cost.total)
            .then_with(|| self.signature.cmp(&other.signature))
    }
}

/// Keeps the best `capacity` solutions seen so far.
#[derive(Debug)]
pub struct SolutionPool {
    heap: BinaryHeap<Solution>, // Max-heap: the top is the worst retained solution
    capacity: usize,
}

impl SolutionPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity + 1),
            capacity: capacity.max(1),
        }
    }

    /// Offers a solution, returning whether it was retained.
    pub fn offer(&mut self, solution: Solution) -> bool {
        if self.heap.len() < self.capacity {
            self.heap.push(solution);
            return true;
        }
        match self.heap.peek() {
            Some(worst) if solution < *worst => {
                self.heap.pop();
                self.heap.push(solution);
                true
            }
            _ => false,
        }
    }

    /// The cost a new solution must not exceed to be retained; `u64::MAX`
    /// until the pool is full.
    pub fn bound(&self) -> u64 {
        if self.heap.len() < self.capacity {
            u64::MAX
        } else {
            self.heap.peek().map_or(u64::MAX, Solution::total)
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn best_cost(&self) -> Option<u64> {
        self.heap.iter().map(Solution::total).min()
    }

    /// The retained solutions, best first.
    pub fn into_sorted_vec(self) -> Vec<Solution> {
        self.heap.into_sorted_vec()
    }
}

/// A [`SolutionPool`] shared between search workers.
///
/// Insertion is serialized; the pruning bound is mirrored in an atomic that
/// only ever decreases, so readers never see a looser bound than one already
/// published.
#[derive(Debug)]
pub struct SharedSolutionPool {
    pool: Mutex<SolutionPool>,
    bound: AtomicU64,
}

impl SharedSolutionPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            pool: Mutex::new(SolutionPool::new(capacity)),
            bound: AtomicU64::new(u64::MAX),
        }
    }

    pub fn offer(&self, solution: Solution) -> bool {
        let total = solution.total();
        let mut pool = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        let retained = pool.offer(solution);
        if retained {
            let bound = pool.bound();
            let previous = self.bound.fetch_min(bound, AtomicOrdering::AcqRel);
            if bound < previous {
                debug!(cost = total, bound, "Pruning bound tightened.");
            }
        }
        retained
    }

    #[inline]
    pub fn bound(&self) -> u64 {
        self.bound.load(AtomicOrdering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn best_cost(&self) -> Option<u64> {
        self.pool
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .best_cost()
    }

    pub fn into_inner(self) -> SolutionPool {
        self.pool.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::ProblemBuilder;
    use crate::core::models::problem::Problem;
    use crate::core::models::slot::{Day, Kind};
    use crate::engine::tasks::soft_constraints::PenaltyBreakdown;

    struct Fixture {
        problem: Problem,
        slots: [SlotId; 2],
        item: ItemId,
    }

    fn fixture() -> Fixture {
        let mut b = ProblemBuilder::new();
        let s0 = b
            .add_slot(Kind::Game, Day::Monday, "9:00".parse().unwrap(), 1, 0)
            .unwrap();
        let s1 = b
            .add_slot(Kind::Game, Day::Tuesday, "9:00".parse().unwrap(), 1, 0)
            .unwrap();
        let item = b.add_game("CMSA U10 DIV 01").unwrap();
        Fixture {
            problem: b.build(),
            slots: [s0, s1],
            item,
        }
    }

    fn solution(f: &Fixture, total: u64, slot: usize) -> Solution {
        let cost = CostReport {
            raw: PenaltyBreakdown::default(),
            weighted: PenaltyBreakdown::default(),
            total,
        };
        let schedule = ScheduleState::empty(&f.problem).with_placement(f.item, f.slots[slot]);
        Solution::new(cost, schedule)
    }

    #[test]
    fn pool_keeps_the_best_solutions_and_reports_bound() {
        let f = fixture();
        let mut pool = SolutionPool::new(2);
        assert_eq!(pool.bound(), u64::MAX);

        assert!(pool.offer(solution(&f, 30, 0)));
        assert_eq!(pool.bound(), u64::MAX);
        assert!(pool.offer(solution(&f, 10, 0)));
        assert_eq!(pool.bound(), 30);
        assert!(!pool.offer(solution(&f, 40, 0)));
        assert!(pool.offer(solution(&f, 20, 0)));
        assert_eq!(pool.bound(), 20);
        assert_eq!(pool.best_cost(), Some(10));

        let totals: Vec<u64> = pool.into_sorted_vec().iter().map(Solution::total).collect();
        assert_eq!(totals, vec![10, 20]);
    }

    #[test]
    fn equal_costs_are_ranked_by_signature_regardless_of_arrival() {
        let f = fixture();
        let mut forward = SolutionPool::new(1);
        forward.offer(solution(&f, 5, 0));
        forward.offer(solution(&f, 5, 1));

        let mut backward = SolutionPool::new(1);
        backward.offer(solution(&f, 5, 1));
        backward.offer(solution(&f, 5, 0));

        let a = forward.into_sorted_vec();
        let b = backward.into_sorted_vec();
        assert_eq!(a[0].schedule.signature(), b[0].schedule.signature());
    }

    #[test]
    fn shared_pool_bound_only_tightens() {
        let f = fixture();
        let shared = SharedSolutionPool::new(1);
        assert_eq!(shared.bound(), u64::MAX);
        assert!(shared.offer(solution(&f, 8, 0)));
        assert_eq!(shared.bound(), 8);
        assert!(!shared.offer(solution(&f, 9, 0)));
        assert_eq!(shared.bound(), 8);
        assert!(shared.offer(solution(&f, 3, 1)));
        assert_eq!(shared.bound(), 3);
        assert_eq!(shared.best_cost(), Some(3));
        assert_eq!(shared.into_inner().len(), 1);
    }
}
