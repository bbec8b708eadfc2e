//! Node type definitions for the alpha-beta search algorithm.

/// Non-PV node type.
///
/// Only the value and the best move of a node are kept; the principal
/// variation below it is not tracked.
pub struct NonPV;

/// PV (principal variation) node type.
///
/// Every node threads the full line of best moves for both sides back to its
/// parent. More expensive per node; used for the opening analysis.
pub struct PV;

/// Trait for compile-time node type specialization.
pub trait NodeType {
    /// Whether nodes track the principal variation below them.
    const PV_NODE: bool;
}

impl NodeType for NonPV {
    const PV_NODE: bool = false;
}

impl NodeType for PV {
    const PV_NODE: bool = true;
}
