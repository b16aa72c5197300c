//! Cleanup pass run after every edit.

use crate::options::LayoutOptions;
use crate::state::LayoutState;
use crate::util::Outcome;
use crate::xcoord::XCoord;
use pedigree_graph::PedigreeGraph;

/// Pulls every childhub under its relationship, and every only child under its childhub, as far as
/// the neighbours allow. Repeats until nothing moves.
///
/// Childhubs with several children are left where insertion put them. Coordinates are not
/// normalized so vertices that did not need to move keep their x.
pub fn improve_positioning(
    g: &PedigreeGraph,
    state: &mut LayoutState,
    options: &LayoutOptions,
) -> Outcome {
    let mut xc = XCoord::new(
        g,
        &state.ranks,
        &state.order,
        &mut state.positions,
        options,
    );

    let mut outcome = Outcome::IterationLimitExceeded {
        limit: options.max_improve_iterations,
    };
    for iteration in 1..=options.max_improve_iterations {
        let mut improved = false;
        for rel in g.relationships_iter() {
            let Some(childhub) = g.relationship_childhub(rel) else {
                continue;
            };
            let rel_x = xc.x(rel);
            if xc.x(childhub) != rel_x {
                improved |= xc.move_node_as_close_to_x_as_possible(childhub, rel_x);
            }

            if let [child] = g.out_edges(childhub) {
                let childhub_x = xc.x(childhub);
                if xc.x(*child) != childhub_x {
                    improved |= xc.move_node_as_close_to_x_as_possible(*child, childhub_x);
                }
            }
        }
        if !improved {
            outcome = Outcome::Converged {
                iterations: iteration,
            };
            break;
        }
    }

    for rel in g.relationships_iter() {
        let Some(childhub) = g.relationship_childhub(rel) else {
            continue;
        };
        if xc.x(childhub) != xc.x(rel) {
            tracing::warn!(relationship = %rel, childhub = %childhub, "childhub is not below its relationship");
        } else if let [child] = g.out_edges(childhub) {
            if xc.x(*child) != xc.x(childhub) {
                tracing::warn!(childhub = %childhub, child = %child, "only child is not below its childhub");
            }
        }
    }

    outcome
}
