use hashbrown::HashSet;

use crate::{
    triangulation::Triangles,
    types::{EdgeId, VertexId},
};

/// Defines debug recording of the subdivision
#[derive(Debug, Clone)]
pub enum PhaseRecord {
    /// Records all the phases
    All,
    /// Records the steps during the specified phase
    In(Phase),
    /// Records the steps during the specified phases
    InAny(HashSet<Phase>),
}

/// Defines debug recording of the subdivision.
///
/// A step is an insertion that modified the subdivision: step 0 is its initialization, step `n` the `n`-th new vertex.
#[derive(Debug, Clone)]
pub enum StepsRecord {
    /// Records all the steps
    All,
    /// Records all the steps after the specified one (inclusive)
    From(usize),
    /// Records all the steps until the specified one (inclusive)
    Until(usize),
    /// Records all the steps between the specified ones (inclusive)
    Between(usize, usize),
}

#[derive(Debug, Clone)]
pub struct DebugConfiguration {
    pub phase_record: PhaseRecord,
    pub steps_record: StepsRecord,
}
impl Default for DebugConfiguration {
    fn default() -> Self {
        Self {
            phase_record: PhaseRecord::All,
            steps_record: StepsRecord::All,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DebugSnapshot {
    pub step: usize,
    pub phase: Phase,
    /// Edges created or modified during this phase
    pub changed_edges: Vec<EdgeId>,
    /// Vertices of all the triangles of the subdivision, in a counter-clockwise order
    pub triangles: Vec<[VertexId; 3]>,
}

#[derive(Debug, Clone)]
pub struct DebugContext {
    pub config: DebugConfiguration,
    pub snapshots: Vec<DebugSnapshot>,
    pub current_step: usize,
}

impl DebugContext {
    pub(crate) fn new(config: DebugConfiguration) -> Self {
        Self {
            config,
            snapshots: Vec::new(),
            current_step: 0,
        }
    }

    pub(crate) fn advance_step(&mut self) {
        self.current_step += 1;
    }

    fn should_record(&self, phase: Phase) -> bool {
        let record = match &self.config.phase_record {
            PhaseRecord::All => true,
            PhaseRecord::InAny(phases) => phases.contains(&phase),
            PhaseRecord::In(rec_phase) => phase == *rec_phase,
        };
        record
            && match self.config.steps_record {
                StepsRecord::All => true,
                StepsRecord::From(from) => self.current_step >= from,
                StepsRecord::Until(to) => self.current_step <= to,
                StepsRecord::Between(from, to) => {
                    self.current_step >= from && self.current_step <= to
                }
            }
    }

    pub(crate) fn push_snapshot(
        &mut self,
        phase: Phase,
        triangles: Triangles<'_>,
        changed_edges: &[EdgeId],
    ) {
        if !self.should_record(phase) {
            return;
        }
        self.snapshots.push(DebugSnapshot {
            step: self.current_step,
            phase,
            changed_edges: changed_edges.to_vec(),
            triangles: triangles
                .map(|triangle| triangle.vertices.map(|vertex| vertex.id()))
                .collect(),
        });
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    Initialization,
    SplitTriangle(VertexId),
    SplitEdge(VertexId),
    FlipEdge,
    InsertionDone(VertexId),
}
