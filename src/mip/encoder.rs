//! Mixed-integer program encoder for the knight's tour problem

use crate::board::{Board, Cell};
use crate::search::{Backtracker, MoveOrder};
use anyhow::Result;
use good_lp::{
    constraint, microlp, variable, Constraint, Expression, ProblemVariables, ResolutionError,
    Solution, SolverModel, Variable, WithInitialSolution,
};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Models the tour as a path through the move graph.
///
/// Binary edge variables carry one unit of flow out of the start cell and
/// into every other cell. Integer position variables with big-M ordering
/// constraints force `pos_j = pos_i + 1` along every chosen edge, which
/// rules out disconnected cycles.
///
/// Before branching, a node-limited Warnsdorff search looks for a tour to
/// hand the solver as its initial incumbent. The solver checks the hint
/// against every constraint; without one it searches on its own.
pub struct MipEncoder {
    board: Board,
    graph: Vec<Vec<usize>>,
    warm_start: bool,
    last_solve_time: Duration,
    last_warm_start: bool,
}

/// Warnsdorff nodes the warm start may expand per board cell
const WARM_START_NODES_PER_CELL: u64 = 16;

/// A directed move `from -> to` and its selection variable
#[derive(Debug, Clone, Copy)]
struct Edge {
    from: usize,
    to: usize,
    var: Variable,
}

impl MipEncoder {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            graph: board.move_graph(),
            warm_start: true,
            last_solve_time: Duration::ZERO,
            last_warm_start: false,
        }
    }

    /// Solve by branch and bound alone
    pub fn without_warm_start(mut self) -> Self {
        self.warm_start = false;
        self
    }

    /// Build and solve the model; `Ok(None)` when it is infeasible
    pub fn solve(&mut self, start: Cell) -> Result<Option<Vec<Cell>>> {
        self.last_warm_start = false;
        if !self.board.in_bounds(start) {
            anyhow::bail!("Start cell {} outside {} board", start, self.board);
        }
        if self.board.total_cells() == 1 {
            return Ok(Some(vec![start]));
        }

        let source = self.board.to_index(start);
        if let Some(reason) = self.presolve(source) {
            debug!(%reason, "integer program infeasible before solving");
            return Ok(None);
        }

        let total = self.board.total_cells();
        let big_m = total as f64;
        let mut vars = ProblemVariables::new();

        let mut edges = Vec::new();
        for (from, successors) in self.graph.iter().enumerate() {
            for &to in successors {
                let var = vars.add(variable().binary());
                edges.push(Edge { from, to, var });
            }
        }
        let positions: Vec<Variable> = (0..total)
            .map(|_| vars.add(variable().integer().min(0).max((total - 1) as f64)))
            .collect();

        let mut constraints = self.flow_constraints(source, &edges);
        constraints.push(constraint!(positions[source] == 0));
        for edge in edges.iter().filter(|edge| edge.to != source) {
            let (pos_i, pos_j, e) = (positions[edge.from], positions[edge.to], edge.var);
            constraints.push(constraint!(pos_j - pos_i + big_m * e <= 1.0 + big_m));
            constraints.push(constraint!(pos_j - pos_i - big_m * e >= 1.0 - big_m));
        }

        info!(
            board = %self.board,
            edges = edges.len(),
            constraints = constraints.len(),
            "encoded knight's tour as integer program"
        );

        // any feasible point is a tour, the objective is constant
        let mut model = vars.minimise(positions[source]).using(microlp);
        for c in constraints {
            model = model.with(c);
        }
        if let Some(tour) = self.warm_start_tour(start) {
            debug!(cells = tour.len(), "seeding integer program with a heuristic tour");
            model = model.with_initial_solution(self.hint_values(&tour, &edges, &positions));
            self.last_warm_start = true;
        }

        let start_time = Instant::now();
        let outcome = model.solve();
        self.last_solve_time = start_time.elapsed();

        let solution = match outcome {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => {
                debug!("integer program is infeasible");
                return Ok(None);
            }
            Err(err) => anyhow::bail!("MIP solver failed: {}", err),
        };

        let values: Vec<f64> = positions.iter().map(|&p| solution.value(p)).collect();
        self.decode_tour(&values).map(Some)
    }

    /// Start: no incoming, one outgoing. Others: one incoming, at most one outgoing.
    fn flow_constraints(&self, source: usize, edges: &[Edge]) -> Vec<Constraint> {
        let total = self.board.total_cells();
        let mut incoming: Vec<Vec<Variable>> = vec![Vec::new(); total];
        let mut outgoing: Vec<Vec<Variable>> = vec![Vec::new(); total];
        for edge in edges {
            outgoing[edge.from].push(edge.var);
            incoming[edge.to].push(edge.var);
        }

        let mut constraints = Vec::with_capacity(2 * total);
        for cell in 0..total {
            let ins: Expression = incoming[cell].iter().copied().sum();
            let outs: Expression = outgoing[cell].iter().copied().sum();
            if cell == source {
                constraints.push(constraint!(ins == 0));
                constraints.push(constraint!(outs == 1));
            } else {
                constraints.push(constraint!(ins == 1));
                if !outgoing[cell].is_empty() {
                    constraints.push(constraint!(outs <= 1));
                }
            }
        }
        constraints
    }

    fn warm_start_tour(&self, start: Cell) -> Option<Vec<Cell>> {
        if !self.warm_start {
            return None;
        }
        let limit = WARM_START_NODES_PER_CELL * self.board.total_cells() as u64;
        Backtracker::new(self.board, MoveOrder::Warnsdorff)
            .with_node_limit(limit)
            .search(vec![start])
    }

    /// Variable values that describe `tour`: chosen edges at 1, positions by step
    fn hint_values(&self, tour: &[Cell], edges: &[Edge], positions: &[Variable]) -> Vec<(Variable, f64)> {
        let total = self.board.total_cells();
        let mut step = vec![0usize; total];
        let mut successor = vec![None; total];
        for (index, cell) in tour.iter().enumerate() {
            step[self.board.to_index(*cell)] = index;
        }
        for pair in tour.windows(2) {
            successor[self.board.to_index(pair[0])] = Some(self.board.to_index(pair[1]));
        }

        let edge_values = edges.iter().map(|edge| {
            let chosen = successor[edge.from] == Some(edge.to);
            (edge.var, if chosen { 1.0 } else { 0.0 })
        });
        let position_values = positions
            .iter()
            .enumerate()
            .map(|(cell, &var)| (var, step[cell] as f64));
        edge_values.chain(position_values).collect()
    }

    /// Structural infeasibility that needs no solver: a start with no way
    /// out or another cell with no way in
    fn presolve(&self, source: usize) -> Option<String> {
        if self.graph[source].is_empty() {
            return Some(format!("start {} has no moves", self.board.from_index(source)));
        }
        // the move graph is symmetric, so in-degree equals out-degree
        (0..self.graph.len())
            .find(|&cell| cell != source && self.graph[cell].is_empty())
            .map(|cell| format!("cell {} is unreachable", self.board.from_index(cell)))
    }

    /// Order cells by their solved position
    fn decode_tour(&self, values: &[f64]) -> Result<Vec<Cell>> {
        let mut order: Vec<(usize, usize)> = values
            .iter()
            .enumerate()
            .map(|(cell, value)| (value.round().max(0.0) as usize, cell))
            .collect();
        order.sort_unstable();

        if let Some(step) = order.iter().enumerate().position(|(step, &(pos, _))| pos != step) {
            anyhow::bail!("Solved positions are not a permutation (gap at step {})", step);
        }

        Ok(order
            .into_iter()
            .map(|(_, cell)| self.board.from_index(cell))
            .collect())
    }

    pub fn statistics(&self) -> ModelStatistics {
        let total = self.board.total_cells();
        let edge_count: usize = self.graph.iter().map(Vec::len).sum();
        ModelStatistics {
            board_width: self.board.width(),
            board_height: self.board.height(),
            binary_variables: edge_count,
            integer_variables: total,
            // two flow rows per cell, the start pin, two big-M rows per edge
            // not entering the start; the upper bound assumes every edge counts
            max_constraints: 2 * total + 1 + 2 * edge_count,
            solve_time: self.last_solve_time,
            warm_started: self.last_warm_start,
        }
    }
}

/// Size of the integer program for a board
#[derive(Debug, Clone)]
pub struct ModelStatistics {
    pub board_width: usize,
    pub board_height: usize,
    pub binary_variables: usize,
    pub integer_variables: usize,
    pub max_constraints: usize,
    pub solve_time: Duration,
    /// Whether the last solve started from a heuristic tour
    pub warm_started: bool,
}

impl std::fmt::Display for ModelStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Integer Program Statistics:")?;
        writeln!(f, "  Board: {}x{}", self.board_width, self.board_height)?;
        writeln!(f, "  Edge variables (binary): {}", self.binary_variables)?;
        writeln!(f, "  Position variables (integer): {}", self.integer_variables)?;
        writeln!(f, "  Constraints (at most): {}", self.max_constraints)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        if self.warm_started {
            writeln!(f, "  Warm start: heuristic tour")?;
        }
        Ok(())
    }
}
