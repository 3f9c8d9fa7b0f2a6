//! Exact solver: min-cost flow
//!
//! The assignment problem is a transportation network:
//!
//! ```text
//! source --(required_staff, 0)--> slot --(1, rate)--> employee --(max_hours, 0)--> sink
//! ```
//!
//! with a slot -> employee arc only where the employee is eligible. The
//! constraint matrix is totally unimodular, so the integral min-cost flow of
//! value `total_demand` is an optimal assignment, and a maximum flow below
//! `total_demand` proves infeasibility.
//!
//! Flow is augmented along successive shortest paths (Dijkstra with node
//! potentials). All arc costs start non-negative, so zero potentials are a
//! valid start.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::debug;

use super::{ShiftSolver, Solution, SolveOutcome};
use crate::limits::{SearchBudget, SolveLimits};
use crate::model::ShiftModel;
use crate::precheck::INFEASIBLE;
use crate::variables::VarIndex;
use crate::SolverError;

const UNREACHED: i64 = i64::MAX;

/// Uncovered slots named in an infeasibility reason
const MAX_REPORTED_SHORTFALLS: usize = 3;

#[derive(Clone, Debug)]
struct Edge {
    to: usize,
    /// Position of the paired reverse arc in `graph[to]`
    rev: usize,
    cap: i64,
    cost: i64,
}

/// (node, position in adjacency list)
type ArcRef = (usize, usize);

#[derive(Debug)]
struct FlowNetwork {
    graph: Vec<Vec<Edge>>,
}

impl FlowNetwork {
    fn new(nodes: usize) -> Self {
        Self {
            graph: vec![Vec::new(); nodes],
        }
    }

    fn node_count(&self) -> usize {
        self.graph.len()
    }

    fn add_arc(&mut self, from: usize, to: usize, cap: i64, cost: i64) -> ArcRef {
        let fwd = self.graph[from].len();
        let rev = self.graph[to].len();
        self.graph[from].push(Edge { to, rev, cap, cost });
        self.graph[to].push(Edge {
            to: from,
            rev: fwd,
            cap: 0,
            cost: -cost,
        });
        (from, fwd)
    }

    fn residual(&self, (node, idx): ArcRef) -> i64 {
        self.graph[node][idx].cap
    }

    /// Dijkstra on reduced costs. Fills `dist` and `prev`; returns whether
    /// `sink` is reachable.
    fn shortest_path(
        &self,
        source: usize,
        sink: usize,
        potential: &[i64],
        dist: &mut [i64],
        prev: &mut [Option<ArcRef>],
    ) -> bool {
        dist.fill(UNREACHED);
        prev.fill(None);
        dist[source] = 0;

        let mut heap = BinaryHeap::new();
        heap.push(Reverse((0_i64, source)));

        while let Some(Reverse((d, u))) = heap.pop() {
            if d > dist[u] {
                continue;
            }
            for (i, arc) in self.graph[u].iter().enumerate() {
                if arc.cap <= 0 {
                    continue;
                }
                let next = d + arc.cost + potential[u] - potential[arc.to];
                if next < dist[arc.to] {
                    dist[arc.to] = next;
                    prev[arc.to] = Some((u, i));
                    heap.push(Reverse((next, arc.to)));
                }
            }
        }

        dist[sink] != UNREACHED
    }

    /// Push as much as possible (up to `limit`) along the `prev` path
    fn augment(&mut self, sink: usize, prev: &[Option<ArcRef>], limit: i64) -> i64 {
        let mut push = limit;
        let mut v = sink;
        while let Some((u, i)) = prev[v] {
            push = push.min(self.graph[u][i].cap);
            v = u;
        }

        let mut v = sink;
        while let Some((u, i)) = prev[v] {
            let rev = self.graph[u][i].rev;
            self.graph[u][i].cap -= push;
            self.graph[v][rev].cap += push;
            v = u;
        }
        push
    }
}

/// Exact solver based on successive-shortest-path min-cost flow
#[derive(Clone, Copy, Debug, Default)]
pub struct FlowSolver;

impl FlowSolver {
    pub fn new() -> Self {
        Self
    }
}

impl ShiftSolver for FlowSolver {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn solve(&self, model: &ShiftModel, limits: &SolveLimits) -> Result<SolveOutcome, SolverError> {
        let budget = SearchBudget::start(limits);
        let slots = model.slot_count();
        let employees = model.employee_count();

        let source = 0;
        let slot_node = |s: usize| 1 + s;
        let employee_node = |e: usize| 1 + slots + e;
        let sink = 1 + slots + employees;

        let mut net = FlowNetwork::new(sink + 1);
        let slot_arcs: Vec<ArcRef> = (0..slots)
            .map(|s| net.add_arc(source, slot_node(s), i64::from(model.required(s)), 0))
            .collect();

        let mut var_arcs: Vec<(VarIndex, ArcRef)> = Vec::new();
        for s in 0..slots {
            for e in model.eligible_employees(s) {
                let var = model.variables.index_of(e, s);
                let arc = net.add_arc(slot_node(s), employee_node(e), 1, model.cost(var));
                var_arcs.push((var, arc));
            }
        }

        for e in 0..employees {
            net.add_arc(employee_node(e), sink, i64::from(model.hour_cap(e)), 0);
        }

        let demand = i64::try_from(model.total_demand())
            .map_err(|_| SolverError::Overflow("total demand exceeds i64".to_string()))?;

        let n = net.node_count();
        let mut potential = vec![0_i64; n];
        let mut dist = vec![UNREACHED; n];
        let mut prev = vec![None; n];
        let mut flow = 0_i64;
        let mut augmentations = 0_u64;

        while flow < demand {
            budget.check()?;
            if !net.shortest_path(source, sink, &potential, &mut dist, &mut prev) {
                break;
            }
            for (p, &d) in potential.iter_mut().zip(dist.iter()) {
                if d != UNREACHED {
                    *p += d;
                }
            }
            flow += net.augment(sink, &prev, demand - flow);
            augmentations += 1;
        }

        debug!(
            augmentations,
            flow,
            demand,
            arcs = var_arcs.len(),
            elapsed_ms = budget.elapsed().as_millis() as u64,
            "min-cost flow finished"
        );

        if flow < demand {
            let shortfalls: Vec<String> = slot_arcs
                .iter()
                .enumerate()
                .filter(|(_, &arc)| net.residual(arc) > 0)
                .take(MAX_REPORTED_SHORTFALLS)
                .map(|(s, &arc)| format!("{} short by {}", model.slot(s).label(), net.residual(arc)))
                .collect();
            return Ok(SolveOutcome::Infeasible {
                reason: format!(
                    "{}: only {} of {} required staff-hours can be covered within availability and weekly hour caps ({})",
                    INFEASIBLE,
                    flow,
                    demand,
                    shortfalls.join(", ")
                ),
            });
        }

        let mut assignment = model.empty_assignment();
        for &(var, arc) in &var_arcs {
            if net.residual(arc) == 0 {
                assignment.set(var, true);
            }
        }
        let objective_value = model.objective.value(&assignment);

        Ok(SolveOutcome::Optimal(Solution {
            assignment,
            objective_value,
            lower_bound: objective_value,
        }))
    }
}
