//! Operad specifications and per-operad execution state.
//!
//! An operad describes how multiple computation steps compose: the ordered
//! step list, the dependency graph gating their execution, and the deadline.
//! The specification is immutable once created; `validate()` runs at
//! creation time and rejects malformed shapes all-or-nothing, so no
//! execution state is ever built on a broken graph.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::Architecture;
use crate::error::{CoordinationError, CoordinationResult};
use crate::receipt::ReceiptId;

/// Unique identifier for an initiated operad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperadId(pub uuid::Uuid);

impl OperadId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for OperadId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OperadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The composition topology an operad declares.
///
/// Descriptive metadata for consumers of the event stream; the executable
/// semantics live entirely in the `dependencies` adjacency list, which can
/// express any of these shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompositionType {
    Sequential,
    Parallel,
    Hierarchical,
    Pipeline,
    Tree,
    Dag,
}

/// Requirements for a single step of an operad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    pub required_architecture: Architecture,
    /// Minimum quality score the verifier must report.
    pub quality_threshold: u32,
    /// Maximum cost the verifier may report.
    pub cost_budget: u64,
}

/// The immutable description of a multi-step, multi-agent workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperadSpecification {
    pub composition_type: CompositionType,
    pub steps: Vec<StepSpec>,
    /// `dependencies[i]` lists the step indices that must complete before
    /// step `i` may be submitted. Must describe an acyclic graph.
    pub dependencies: Vec<Vec<usize>>,
    pub deadline: DateTime<Utc>,
    /// Optional commitment the final output is expected to match.
    pub expected_final_output_commitment: Option<String>,
}

impl OperadSpecification {
    /// Check the specification's shape. All violations are
    /// `MalformedSpecification`; a spec that fails here must never produce
    /// any state.
    ///
    /// Checks, in order: non-empty step list, dependency list length,
    /// index range, self-dependency, and acyclicity (Kahn's algorithm).
    /// A cyclic graph would leave the operad permanently stuck — no step
    /// could ever satisfy its prerequisites — so it is rejected here
    /// rather than discovered later as silent lack of progress.
    pub fn validate(&self) -> CoordinationResult<()> {
        if self.steps.is_empty() {
            return Err(CoordinationError::MalformedSpecification {
                reason: "operad has no steps".to_string(),
            });
        }

        if self.dependencies.len() != self.steps.len() {
            return Err(CoordinationError::MalformedSpecification {
                reason: format!(
                    "dependency list length {} does not match step count {}",
                    self.dependencies.len(),
                    self.steps.len()
                ),
            });
        }

        for (step, deps) in self.dependencies.iter().enumerate() {
            for &dep in deps {
                if dep >= self.steps.len() {
                    return Err(CoordinationError::MalformedSpecification {
                        reason: format!(
                            "step {} depends on non-existent step {}",
                            step, dep
                        ),
                    });
                }
                if dep == step {
                    return Err(CoordinationError::MalformedSpecification {
                        reason: format!("step {} depends on itself", step),
                    });
                }
            }
        }

        // Kahn's algorithm: repeatedly remove steps with no unresolved
        // prerequisites. If any step survives, the graph has a cycle.
        let n = self.steps.len();
        let mut indegree: Vec<usize> = self.dependencies.iter().map(|d| d.len()).collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (step, deps) in self.dependencies.iter().enumerate() {
            for &dep in deps {
                dependents[dep].push(step);
            }
        }

        let mut ready: VecDeque<usize> = (0..n).filter(|&s| indegree[s] == 0).collect();
        let mut resolved = 0usize;
        while let Some(step) = ready.pop_front() {
            resolved += 1;
            for &next in &dependents[step] {
                indegree[next] -= 1;
                if indegree[next] == 0 {
                    ready.push_back(next);
                }
            }
        }

        if resolved != n {
            return Err(CoordinationError::MalformedSpecification {
                reason: "dependency graph contains a cycle".to_string(),
            });
        }

        Ok(())
    }
}

/// Lifecycle of an operad execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperadStatus {
    /// Created, no step submitted yet.
    Initiated,
    /// At least one step completed.
    InProgress,
    /// Every step completed; `final_receipt` is set. Terminal.
    Completed,
}

/// Mutable execution state for one operad.
///
/// Owned exclusively by the orchestrator: mutated exactly once per
/// successful step submission, and `final_receipt` is computed exactly once,
/// when `completed_count` reaches the step count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionState {
    pub operad_id: OperadId,
    pub spec: OperadSpecification,
    /// Receipt id per step, set when the step completes.
    pub step_receipts: Vec<Option<ReceiptId>>,
    pub step_completed: Vec<bool>,
    pub completed_count: usize,
    pub status: OperadStatus,
    /// Deterministic hash over all step receipts plus aggregate metrics.
    pub final_receipt: Option<String>,
    pub total_cost: u64,
    pub total_quality: u64,
}

impl ExecutionState {
    /// Fresh state for a just-validated specification.
    pub fn new(operad_id: OperadId, spec: OperadSpecification) -> Self {
        let n = spec.steps.len();
        Self {
            operad_id,
            spec,
            step_receipts: vec![None; n],
            step_completed: vec![false; n],
            completed_count: 0,
            status: OperadStatus::Initiated,
            final_receipt: None,
            total_cost: 0,
            total_quality: 0,
        }
    }
}
