//! Pruning: drop every node from which no final node can be reached.

use crate::{BehavioralSpace, NodeIndex, SpaceArc, SpaceError, SpaceResult};

/// Remove the nodes (and their arcs) that cannot reach a final node, then
/// renumber the survivors in exploration order.
///
/// Fails with [`SpaceError::Empty`] if the space has no arcs to begin with
/// or none survive.
pub fn prune(space: BehavioralSpace) -> SpaceResult<BehavioralSpace> {
    if space.nodes.is_empty() || space.arcs.is_empty() {
        return Err(SpaceError::Empty { when: "before" });
    }

    let keep = co_reachable(&space);

    let mut renumber: Vec<Option<NodeIndex>> = vec![None; space.nodes.len()];
    let mut next = 0;
    for (old, slot) in renumber.iter_mut().enumerate() {
        if keep[old] {
            *slot = Some(next);
            next += 1;
        }
    }

    let nodes_before = space.nodes.len();
    let arcs_before = space.arcs.len();

    let nodes: Vec<_> = space
        .nodes
        .into_iter()
        .zip(&keep)
        .filter_map(|(node, &k)| k.then_some(node))
        .collect();
    let arcs: Vec<SpaceArc> = space
        .arcs
        .into_iter()
        .filter_map(|a| {
            let from = renumber[a.from]?;
            let to = renumber[a.to]?;
            Some(SpaceArc { from, to, ..a })
        })
        .collect();

    tracing::info!(
        pruned_nodes = nodes_before - nodes.len(),
        pruned_arcs  = arcs_before - arcs.len(),
        nodes        = nodes.len(),
        arcs         = arcs.len(),
        "behavioral space pruned",
    );

    if nodes.is_empty() || arcs.is_empty() {
        return Err(SpaceError::Empty { when: "after" });
    }
    Ok(BehavioralSpace { nodes, arcs, observation: space.observation })
}

/// Nodes from which some final node is reachable (finals included).
fn co_reachable(space: &BehavioralSpace) -> Vec<bool> {
    let mut incoming: Vec<Vec<NodeIndex>> = vec![Vec::new(); space.nodes.len()];
    for arc in &space.arcs {
        incoming[arc.to].push(arc.from);
    }

    let mut keep = vec![false; space.nodes.len()];
    let mut stack: Vec<NodeIndex> = Vec::new();
    for (i, node) in space.nodes.iter().enumerate() {
        if node.is_final {
            keep[i] = true;
            stack.push(i);
        }
    }
    while let Some(n) = stack.pop() {
        for &pred in &incoming[n] {
            if !keep[pred] {
                keep[pred] = true;
                stack.push(pred);
            }
        }
    }
    keep
}
