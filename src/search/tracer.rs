//! Search instrumentation hook. Production search runs against
//! [`NullTracer`], a zero-cost no-op; an analysis tool can swap in an
//! implementation that records the full search tree instead.

use crate::types::Move;

/// Observer called at well-defined points during the search tree walk.
/// Every method has a default no-op body so callers only implement the
/// ones they care about.
pub trait SearchTracer {
    /// Called once before the first `go` of a new search.
    fn new_search(&mut self) {}

    /// Called when a new root move begins its own subtree.
    fn new_tree(&mut self, _root_move: Move) {}

    /// Descends into a child node reached by `m`.
    fn push_node(&mut self, _m: Move, _depth: u32, _alpha: i32, _beta: i32) {}

    /// Moves to the next sibling at the same depth without descending.
    fn push_sibling(&mut self, _m: Move) {}

    /// Attaches a named value (eval, score, bound kind, ...) to the
    /// current node.
    fn set(&mut self, _name: &str, _value: i32) {}

    /// Returns from the current node with its final score.
    fn pop_node(&mut self, _score: i32) {}

    /// Closes out the subtree started by the matching `new_tree`.
    fn finish_tree(&mut self) {}

    /// Called once after the search fully stops.
    fn finish_search(&mut self) {}
}

/// Default tracer: every hook is a no-op, compiled away entirely.
#[derive(Clone, Copy, Default)]
pub struct NullTracer;

impl SearchTracer for NullTracer {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_tracer_accepts_every_hook_without_panicking() {
        let mut tracer = NullTracer;
        tracer.new_search();
        tracer.new_tree(Move::null());
        tracer.push_node(Move::null(), 4, -100, 100);
        tracer.push_sibling(Move::null());
        tracer.set("eval", 37);
        tracer.pop_node(37);
        tracer.finish_tree();
        tracer.finish_search();
    }
}
