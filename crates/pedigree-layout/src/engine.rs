//! The incremental layout engine.
//!
//! Every edit follows the same steps: checkpoint the state, insert the new vertices one at a time
//! (slot choice, then shift propagation), validate the graph and the layering, run the cleanup
//! pass, rebuild the auxiliary structures and diff against the checkpoint.

use crate::change_set::{self, ChangeSet, Checkpoint};
use crate::error::{Error, Precondition, Result};
use crate::heuristics;
use crate::options::LayoutOptions;
use crate::relayout;
use crate::snapshot::Snapshot;
use crate::state::LayoutState;
use crate::vertical;
use pedigree_graph::{Gender, GraphOptions, PedigreeGraph, Properties, VertexId, VertexKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A pedigree together with its layout.
#[derive(Debug, Clone)]
pub struct PositionedGraph {
    graph: PedigreeGraph,
    state: LayoutState,
    options: LayoutOptions,
}

impl PositionedGraph {
    /// Lays out `graph` from scratch.
    pub fn new(graph: PedigreeGraph, options: LayoutOptions) -> Result<Self> {
        let mut pg = Self {
            graph,
            state: LayoutState::default(),
            options,
        };
        pg.layout_from_scratch()?;
        Ok(pg)
    }

    /// Restores a layout without recomputing ranks, order or positions.
    pub fn from_snapshot(
        snapshot: Snapshot,
        graph_options: GraphOptions,
        options: LayoutOptions,
    ) -> Result<Self> {
        let (graph, state) = snapshot.restore(graph_options, &options)?;
        Ok(Self {
            graph,
            state,
            options,
        })
    }

    pub fn graph(&self) -> &PedigreeGraph {
        &self.graph
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.graph, &self.state)
    }

    pub fn to_json(&self) -> Result<String> {
        self.to_snapshot().to_json()
    }

    /// Replaces the whole pedigree with a serialized one. Reports every previous person and
    /// relationship as removed and every restored one as new. On error nothing changes.
    pub fn load_json(&mut self, text: &str) -> Result<ChangeSet> {
        let snapshot = Snapshot::from_json(text)?;
        let (graph, state) = snapshot.restore(self.graph.options(), &self.options)?;
        let removed = change_set::all_nodes(&self.graph);
        self.graph = graph;
        self.state = state;

        let changes = ChangeSet {
            new: change_set::all_nodes(&self.graph),
            removed,
            ..Default::default()
        }
        .normalized();
        tracing::debug!(
            new = changes.new.len(),
            removed = changes.removed.len(),
            "restored snapshot"
        );
        Ok(changes)
    }

    // ---------------------------------------------------------------------------------------
    // Edits

    /// Adds a child below `target`, which is a childhub or a relationship that has one.
    pub fn add_new_child(&mut self, target: VertexId, properties: Properties) -> Result<ChangeSet> {
        let childhub = self.resolve_childhub(target)?;
        let relationship = self.owning_relationship(childhub)?;
        let before = Checkpoint::capture(&self.state);

        let rank = self.state.rank_of(childhub) + 1;
        let index =
            heuristics::find_best_insert_position(&self.graph, &self.state, rank, childhub, false);
        let child = self.graph.insert_vertex(
            "",
            VertexKind::Person,
            properties,
            None,
            &[childhub],
            &[],
        )?;
        self.place(child, Some(rank), index, childhub)?;

        let mut moved = self.finish(&before)?;
        moved.push(relationship);

        let changes = ChangeSet {
            new: vec![child],
            moved,
            animate: self.graph.in_edges(relationship).to_vec(),
            ..Default::default()
        }
        .normalized();
        tracing::debug!(childhub = %childhub, child = %child, moved = changes.moved.len(), "added child");
        Ok(changes)
    }

    /// Adds a childhub, a relationship and two parents (male and female) above `person`.
    pub fn add_new_parents(&mut self, person: VertexId) -> Result<ChangeSet> {
        self.require_kind(person, VertexKind::Person, "person")?;
        if !self.graph.in_edges(person).is_empty() {
            return Err(Precondition::AlreadyHasParents(person).into());
        }
        let before = Checkpoint::capture(&self.state);

        heuristics::swap_before_parents_to_bring_to_side_if_possible(
            &self.graph,
            &mut self.state,
            person,
        );

        let childhub_rank = self.state.rank_of(person).checked_sub(1);
        let childhub_index = self.insert_position_above(childhub_rank, person);
        let childhub = self.graph.insert_vertex(
            "",
            VertexKind::Childhub,
            Properties::new(),
            None,
            &[],
            &[person],
        )?;
        self.place(childhub, childhub_rank, childhub_index, person)?;

        // Ranks may have shifted when the childhub opened a new top rank.
        let rel_rank = self.state.rank_of(childhub).checked_sub(1);
        let rel_index = self.insert_position_above(rel_rank, childhub);
        let relationship = self.graph.insert_vertex(
            "",
            VertexKind::Relationship,
            Properties::new(),
            None,
            &[],
            &[childhub],
        )?;
        self.place(relationship, rel_rank, rel_index, childhub)?;

        let parents_rank = self.state.rank_of(relationship);
        let rel_index = self.state.order.position_of(relationship);
        let father = self.graph.insert_vertex(
            "",
            VertexKind::Person,
            gender_properties(Gender::Male),
            None,
            &[],
            &[relationship],
        )?;
        self.place(father, Some(parents_rank), rel_index + 1, relationship)?;
        let mother = self.graph.insert_vertex(
            "",
            VertexKind::Person,
            gender_properties(Gender::Female),
            None,
            &[],
            &[relationship],
        )?;
        self.place(mother, Some(parents_rank), rel_index, relationship)?;

        let moved = self.finish(&before)?;

        // Animating more than one partner gets confusing.
        let partners = self.graph.partners(person);
        let animate = if partners.len() == 1 {
            vec![partners[0], person]
        } else {
            vec![person]
        };
        let changes = ChangeSet {
            new: vec![relationship, father, mother],
            moved,
            highlight: vec![person],
            animate,
            ..Default::default()
        }
        .normalized();
        tracing::debug!(person = %person, relationship = %relationship, moved = changes.moved.len(), "added parents");
        Ok(changes)
    }

    /// Adds a partner for `person` (of the opposite gender when known) and their first child.
    pub fn add_new_relationship(
        &mut self,
        person: VertexId,
        child_properties: Properties,
        prefer_left: bool,
    ) -> Result<ChangeSet> {
        self.require_kind(person, VertexKind::Person, "person")?;
        let before = Checkpoint::capture(&self.state);

        let partner_properties = match self.graph.gender(person) {
            Gender::Unknown => Properties::new(),
            known => gender_properties(known.opposite()),
        };

        heuristics::swap_partner_to_bring_to_side_if_possible(&self.graph, &mut self.state, person);

        let rank = self.state.rank_of(person);
        // Read after the swap, which may have moved the person.
        let person_order = self.state.order.position_of(person);
        let index =
            heuristics::find_best_insert_position(&self.graph, &self.state, rank, person, prefer_left);
        let relationship = self.graph.insert_vertex(
            "",
            VertexKind::Relationship,
            Properties::new(),
            None,
            &[person],
            &[],
        )?;
        self.place(relationship, Some(rank), index, person)?;

        let partner_index = if index > person_order { index + 1 } else { index };
        let partner = self.graph.insert_vertex(
            "",
            VertexKind::Person,
            partner_properties,
            None,
            &[],
            &[relationship],
        )?;
        self.place(partner, Some(rank), partner_index, relationship)?;

        let childhub_rank = rank + 1;
        let childhub_index = heuristics::find_best_insert_position(
            &self.graph,
            &self.state,
            childhub_rank,
            relationship,
            false,
        );
        let childhub = self.graph.insert_vertex(
            "",
            VertexKind::Childhub,
            Properties::new(),
            None,
            &[relationship],
            &[],
        )?;
        self.place(childhub, Some(childhub_rank), childhub_index, relationship)?;

        let child_rank = childhub_rank + 1;
        let child_index =
            heuristics::find_best_insert_position(&self.graph, &self.state, child_rank, childhub, false);
        let child = self.graph.insert_vertex(
            "",
            VertexKind::Person,
            child_properties,
            None,
            &[childhub],
            &[],
        )?;
        self.place(child, Some(child_rank), child_index, childhub)?;

        let moved = self.finish(&before)?;
        let changes = ChangeSet {
            new: vec![relationship, partner, child],
            moved,
            highlight: vec![person],
            ..Default::default()
        }
        .normalized();
        tracing::debug!(person = %person, relationship = %relationship, partner = %partner, child = %child, "added relationship");
        Ok(changes)
    }

    /// Makes the existing parentless person `child` a child of `parent` (a relationship or its
    /// childhub). Falls back to a full relayout unless the child already sits right below the
    /// childhub.
    pub fn assign_parent(&mut self, parent: VertexId, child: VertexId) -> Result<ChangeSet> {
        self.require_kind(child, VertexKind::Person, "person")?;
        let childhub = self.resolve_childhub(parent)?;
        let relationship = self.owning_relationship(childhub)?;
        if !self.graph.in_edges(child).is_empty() {
            return Err(Precondition::ChildHasParents(child).into());
        }
        if self.state.ancestors.is_ancestor(child, relationship) {
            return Err(Precondition::WouldCreateCycle {
                parent: relationship,
                child,
            }
            .into());
        }
        // Partners share a rank, so some parentless persons still cannot go below this childhub.
        if !self.can_rank_with_edge(childhub, child) {
            return Err(Precondition::NoValidRanking {
                parent: relationship,
                child,
            }
            .into());
        }

        let saved = (self.graph.clone(), self.state.clone());
        let result = self.attach_child(childhub, child, relationship);
        if let Err(err) = &result {
            tracing::warn!(childhub = %childhub, child = %child, error = %err, "assign parent failed, restoring");
            (self.graph, self.state) = saved;
        }
        result
    }

    /// Recomputes x-coordinates for the current ranks and order. Reports everything as moved.
    pub fn reposition_all(&mut self) -> Result<ChangeSet> {
        self.graph.validate()?;
        self.state.check_consistency(&self.graph)?;
        let anchor_rank = self.state.ranks.get(VertexId::new(0)).copied();
        let rank_y_before = self.state.rank_y.clone();

        self.state.positions =
            relayout::position(&self.graph, &self.state.ranks, &self.state.order, &self.options);
        heuristics::improve_positioning(&self.graph, &mut self.state, &self.options)
            .into_result("improve positioning")?;
        self.state.recompute_auxiliary(
            &self.graph,
            &self.options,
            anchor_rank.map(|r| (r, rank_y_before.as_slice())),
        );

        let changes = ChangeSet {
            moved: change_set::all_nodes(&self.graph),
            ..Default::default()
        }
        .normalized();
        tracing::debug!(moved = changes.moved.len(), "repositioned");
        Ok(changes)
    }

    /// Discards the layout and computes it again from the graph alone. Persons whose rank
    /// changed are highlighted.
    pub fn redraw_all(&mut self, animate: Vec<VertexId>) -> Result<ChangeSet> {
        let ranks_before = self.state.ranks.clone();
        self.layout_from_scratch()?;

        let highlight = self
            .graph
            .persons()
            .filter(|&v| ranks_before.get(v) != Some(&self.state.rank_of(v)))
            .collect();
        let changes = ChangeSet {
            moved: change_set::all_nodes(&self.graph),
            highlight,
            animate,
            ..Default::default()
        }
        .normalized();
        tracing::debug!(moved = changes.moved.len(), highlight = changes.highlight.len(), "redrew");
        Ok(changes)
    }

    // ---------------------------------------------------------------------------------------
    // Queries

    pub fn is_valid_id(&self, v: VertexId) -> bool {
        self.graph.contains(v)
    }

    /// Drawing position of `v`. Childhubs are drawn on the lane of their child line.
    pub fn position(&self, v: VertexId) -> Option<Point> {
        if !self.graph.contains(v) {
            return None;
        }
        let rank = self.state.rank_of(v);
        let y = if self.graph.is_childhub(v) {
            vertical::node_y(
                &self.state.rank_y,
                rank,
                self.state.vertical.child_edge_level(v),
                &self.options,
            )
        } else {
            self.state.rank_y.get(rank).copied().unwrap_or(0.0)
        };
        Some(Point {
            x: self.state.x(v),
            y,
        })
    }

    pub fn relationship_childhub_position(&self, rel: VertexId) -> Option<Point> {
        self.position(self.graph.relationship_childhub(rel)?)
    }

    pub fn relationship_children(&self, rel: VertexId) -> Vec<VertexId> {
        if self.graph.is_relationship(rel) {
            self.graph.children(rel).to_vec()
        } else {
            Vec::new()
        }
    }

    pub fn parent_relationship(&self, person: VertexId) -> Option<VertexId> {
        self.graph.producing_relationship(person)
    }

    /// Parentless persons that could become children of `v` without creating a cycle. For a
    /// relationship or childhub, persons that would leave no valid ranking are left out too.
    pub fn possible_children_of(&self, v: VertexId) -> Vec<VertexId> {
        let childhub = self.resolve_childhub(v).ok();
        self.graph
            .persons()
            .filter(|&u| u != v && self.graph.in_edges(u).is_empty())
            .filter(|&u| !self.state.ancestors.is_ancestor(u, v))
            .filter(|&u| childhub.is_none_or(|hub| self.can_rank_with_edge(hub, u)))
            .collect()
    }

    /// Persons and relationships that do not descend from `v`.
    pub fn possible_parents_of(&self, v: VertexId) -> Vec<VertexId> {
        self.graph
            .vertex_ids()
            .filter(|&u| u != v && (self.graph.is_person(u) || self.graph.is_relationship(u)))
            .filter(|&u| !self.state.ancestors.is_ancestor(v, u))
            .collect()
    }

    pub fn persons_of_genders(&self, genders: &[Gender]) -> Vec<VertexId> {
        self.graph
            .persons()
            .filter(|&v| genders.contains(&self.graph.gender(v)))
            .collect()
    }

    pub fn is_consanguineous(&self, rel: VertexId) -> bool {
        self.state.ancestors.is_consanguineous(rel)
    }

    // ---------------------------------------------------------------------------------------
    // Internals

    fn attach_child(
        &mut self,
        childhub: VertexId,
        child: VertexId,
        relationship: VertexId,
    ) -> Result<ChangeSet> {
        let before = Checkpoint::capture(&self.state);
        self.graph.add_edge(childhub, child)?;

        if self.state.rank_of(childhub) + 1 != self.state.rank_of(child) {
            tracing::debug!(childhub = %childhub, child = %child, "ranks not adjacent, redrawing");
            return self.redraw_all(vec![child]);
        }

        let mut moved = self.finish(&before)?;
        moved.push(relationship);
        let changes = ChangeSet {
            moved,
            animate: vec![child],
            ..Default::default()
        }
        .normalized();
        tracing::debug!(childhub = %childhub, child = %child, "assigned parent");
        Ok(changes)
    }

    /// Dry run of the generational ranking with the extra edge `childhub -> child`.
    fn can_rank_with_edge(&self, childhub: VertexId, child: VertexId) -> bool {
        let mut trial = self.graph.clone();
        if trial.add_edge(childhub, child).is_err() {
            return false;
        }
        relayout::assign_ranks(&trial).1.is_converged()
    }

    fn layout_from_scratch(&mut self) -> Result<()> {
        self.graph.validate()?;
        self.state = relayout::relayout(&self.graph, &self.options)?;
        self.state.check_consistency(&self.graph)?;
        heuristics::improve_positioning(&self.graph, &mut self.state, &self.options)
            .into_result("improve positioning")?;
        self.state.recompute_auxiliary(&self.graph, &self.options, None);
        Ok(())
    }

    /// Slot for a vertex above `connected`; `None` stands for a rank above the current top.
    fn insert_position_above(&self, rank: Option<usize>, connected: VertexId) -> usize {
        match rank {
            Some(rank) => heuristics::find_best_insert_position(
                &self.graph,
                &self.state,
                rank,
                connected,
                false,
            ),
            None => 0,
        }
    }

    /// Registers `v` at `(rank, index)` and propagates the shifts it causes. `None` opens a new
    /// rank above everything.
    fn place(
        &mut self,
        v: VertexId,
        rank: Option<usize>,
        index: usize,
        connected: VertexId,
    ) -> Result<()> {
        let rank = match rank {
            Some(rank) => rank,
            None => {
                self.state.insert_rank(0);
                0
            }
        };
        self.state.register_vertex(v, rank, index);
        heuristics::update_positions_after_node_insert(
            &self.graph,
            &mut self.state,
            &self.options,
            v,
            connected,
        )
        .into_result("shift propagation")?;
        Ok(())
    }

    /// Validation, cleanup and auxiliary rebuild shared by every incremental edit.
    fn finish(&mut self, before: &Checkpoint) -> Result<Vec<VertexId>> {
        self.graph.validate()?;
        self.state.check_consistency(&self.graph)?;
        heuristics::improve_positioning(&self.graph, &mut self.state, &self.options)
            .into_result("improve positioning")?;
        let anchor = before.rank_of(VertexId::new(0));
        self.state.recompute_auxiliary(
            &self.graph,
            &self.options,
            anchor.map(|r| (r, before.rank_y.as_slice())),
        );
        Ok(change_set::find_moved_nodes(&self.graph, before, &self.state))
    }

    fn require_kind(&self, v: VertexId, kind: VertexKind, expected: &'static str) -> Result<()> {
        match self.graph.kind(v) {
            None => Err(Precondition::UnknownVertex(v).into()),
            Some(actual) if actual != kind => Err(Precondition::WrongKind {
                vertex: v,
                actual,
                expected,
            }
            .into()),
            Some(_) => Ok(()),
        }
    }

    fn resolve_childhub(&self, v: VertexId) -> Result<VertexId> {
        let expected = "childhub or relationship with a childhub";
        match self.graph.kind(v) {
            None => Err(Precondition::UnknownVertex(v).into()),
            Some(VertexKind::Childhub) => Ok(v),
            Some(VertexKind::Relationship) => self.graph.relationship_childhub(v).ok_or_else(|| {
                Precondition::WrongKind {
                    vertex: v,
                    actual: VertexKind::Relationship,
                    expected,
                }
                .into()
            }),
            Some(actual) => Err(Precondition::WrongKind {
                vertex: v,
                actual,
                expected,
            }
            .into()),
        }
    }

    fn owning_relationship(&self, childhub: VertexId) -> Result<VertexId> {
        self.graph.in_edges(childhub).first().copied().ok_or_else(|| {
            Error::from(pedigree_graph::Error::InEdgeCount {
                vertex: childhub,
                kind: VertexKind::Childhub,
                count: 0,
                expected: "exactly 1",
            })
        })
    }
}

/// Strict gender filter parsing: `M`, `F` or `U` (any case) and their long forms.
pub fn parse_gender_filter(raw: &str) -> Result<Gender> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "m" | "male" => Ok(Gender::Male),
        "f" | "female" => Ok(Gender::Female),
        "u" | "unknown" => Ok(Gender::Unknown),
        _ => Err(Precondition::InvalidGender(raw.to_string()).into()),
    }
}

fn gender_properties(gender: Gender) -> Properties {
    let mut prop = Properties::new();
    prop.insert(
        "gender".to_string(),
        serde_json::Value::String(gender.as_str().to_string()),
    );
    prop
}
