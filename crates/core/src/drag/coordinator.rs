//! Drag session state machine
//!
//! Pointer events go in, store mutations come out. A session starts when a
//! pointer pressed on a task card travels further than the activation
//! distance, and ends on release or cancel.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::BoardState;
use crate::error::Error;
use crate::Result;

/// Default activation distance in logical pixels
pub const DEFAULT_ACTIVATION_DISTANCE: f64 = 8.0;

/// A pointer position in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The droppable surface under the pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum DropTarget {
    Column(String),
    Task(String),
}

/// Pointer input delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed on a task card
    Down { task_id: String, position: Point },
    /// Pointer moved; `over` is the surface beneath it, if any
    Move {
        position: Point,
        over: Option<DropTarget>,
    },
    /// Pointer released
    Up { over: Option<DropTarget> },
    /// Gesture aborted by the host (escape key, lost capture)
    Cancel,
}

/// Drag recognition settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragConfig {
    /// Distance the pointer must exceed before a press becomes a drag
    pub activation_distance: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            activation_distance: DEFAULT_ACTIVATION_DISTANCE,
        }
    }
}

/// Where the coordinator is in a gesture
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pressed on a card, threshold not yet exceeded
    Pending { task_id: String, origin: Point },
    Dragging {
        task_id: String,
        over: Option<DropTarget>,
    },
}

/// What handling one pointer event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing changed
    Ignored,
    /// Press recorded, waiting for the activation distance
    Pending,
    /// Drag recognized
    Started { task_id: String },
    /// Task moved into a column (live hover or drop)
    Moved {
        task_id: String,
        column_id: String,
        index: usize,
    },
    /// Column order replaced after a same-column drop
    Reordered { column_id: String, task_ids: Vec<String> },
    /// Released without a further mutation
    Dropped { task_id: String },
    /// Session aborted
    Cancelled { task_id: String },
}

impl DragOutcome {
    /// Whether the store was mutated
    pub fn changed_store(&self) -> bool {
        matches!(self, Self::Moved { .. } | Self::Reordered { .. })
    }
}

/// Move one element of a sequence to a new position
///
/// The element at `from` is removed and reinserted at `to` (clamped to the
/// end). Out-of-range `from` leaves the sequence unchanged.
pub fn array_move<T>(mut items: Vec<T>, from: usize, to: usize) -> Vec<T> {
    if from >= items.len() {
        return items;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    items
}

/// Translates pointer gestures over task cards into store mutations
#[derive(Debug, Clone, Default)]
pub struct DragCoordinator {
    config: DragConfig,
    phase: DragPhase,
}

impl DragCoordinator {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            phase: DragPhase::Idle,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Id of the dragged task, once the drag has been recognized
    pub fn active_task(&self) -> Option<&str> {
        match &self.phase {
            DragPhase::Dragging { task_id, .. } => Some(task_id),
            _ => None,
        }
    }

    /// Drop any session in progress without touching the store
    pub fn reset(&mut self) {
        if let Some(task_id) = self.active_task() {
            debug!("Drag session for task {} reset", task_id);
        }
        self.phase = DragPhase::Idle;
    }

    /// Handle one pointer event against the store
    ///
    /// A store error ends the session: the coordinator is back to idle when
    /// this returns `Err`.
    pub fn handle(&mut self, state: &mut BoardState, event: PointerEvent) -> Result<DragOutcome> {
        let result = match event {
            PointerEvent::Down { task_id, position } => self.on_down(state, task_id, position),
            PointerEvent::Move { position, over } => self.on_move(state, position, over),
            PointerEvent::Up { over } => self.on_up(state, over),
            PointerEvent::Cancel => Ok(self.on_cancel()),
        };
        if result.is_err() {
            self.phase = DragPhase::Idle;
        }
        result
    }

    fn on_down(
        &mut self,
        state: &BoardState,
        task_id: String,
        position: Point,
    ) -> Result<DragOutcome> {
        if let DragPhase::Dragging { task_id: active, .. } = &self.phase {
            warn!(
                "Ignoring press on task {} while task {} is being dragged",
                task_id, active
            );
            return Ok(DragOutcome::Ignored);
        }
        if state.task(&task_id).is_none() {
            return Err(Error::TaskNotFound(task_id));
        }
        self.phase = DragPhase::Pending {
            task_id,
            origin: position,
        };
        Ok(DragOutcome::Pending)
    }

    fn on_move(
        &mut self,
        state: &mut BoardState,
        position: Point,
        over: Option<DropTarget>,
    ) -> Result<DragOutcome> {
        match &self.phase {
            DragPhase::Idle => Ok(DragOutcome::Ignored),
            DragPhase::Pending { task_id, origin } => {
                if origin.distance_to(position) <= self.config.activation_distance {
                    return Ok(DragOutcome::Ignored);
                }
                let task_id = task_id.clone();
                debug!("Drag started for task {}", task_id);
                self.phase = DragPhase::Dragging {
                    task_id: task_id.clone(),
                    over: None,
                };
                match self.on_hover(state, over)? {
                    DragOutcome::Ignored => Ok(DragOutcome::Started { task_id }),
                    outcome => Ok(outcome),
                }
            }
            DragPhase::Dragging { .. } => self.on_hover(state, over),
        }
    }

    /// React to the surface under the pointer changing
    ///
    /// Hovering a column the task is not in moves it there immediately, at
    /// the top. Hovering a task is resolved on drop.
    fn on_hover(
        &mut self,
        state: &mut BoardState,
        over: Option<DropTarget>,
    ) -> Result<DragOutcome> {
        let DragPhase::Dragging {
            task_id,
            over: current,
        } = &mut self.phase
        else {
            return Ok(DragOutcome::Ignored);
        };
        if *current == over {
            return Ok(DragOutcome::Ignored);
        }
        *current = over.clone();
        let task_id = task_id.clone();

        let Some(DropTarget::Column(column_id)) = over else {
            return Ok(DragOutcome::Ignored);
        };
        move_into_column(state, task_id, column_id)
    }

    fn on_up(&mut self, state: &mut BoardState, over: Option<DropTarget>) -> Result<DragOutcome> {
        let task_id = match std::mem::take(&mut self.phase) {
            DragPhase::Dragging { task_id, .. } => task_id,
            DragPhase::Idle | DragPhase::Pending { .. } => return Ok(DragOutcome::Ignored),
        };
        debug!("Drag ended for task {} over {:?}", task_id, over);

        match over {
            None => Ok(DragOutcome::Dropped { task_id }),
            Some(DropTarget::Column(column_id)) => move_into_column(state, task_id, column_id),
            Some(DropTarget::Task(target_id)) => drop_on_task(state, task_id, target_id),
        }
    }

    fn on_cancel(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.phase) {
            DragPhase::Dragging { task_id, .. } => {
                debug!("Drag cancelled for task {}", task_id);
                DragOutcome::Cancelled { task_id }
            }
            _ => DragOutcome::Ignored,
        }
    }
}

fn current_column(state: &BoardState, task_id: &str) -> Result<String> {
    state
        .task(task_id)
        .map(|task| task.column_id.clone())
        .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
}

/// Move the task to the top of a column unless it already lives there
fn move_into_column(
    state: &mut BoardState,
    task_id: String,
    column_id: String,
) -> Result<DragOutcome> {
    if current_column(state, &task_id)? == column_id {
        return Ok(DragOutcome::Ignored);
    }
    let index = state.move_task(&task_id, &column_id, 0)?;
    Ok(DragOutcome::Moved {
        task_id,
        column_id,
        index,
    })
}

/// Resolve a release over another task card
fn drop_on_task(state: &mut BoardState, task_id: String, target_id: String) -> Result<DragOutcome> {
    if task_id == target_id {
        return Ok(DragOutcome::Dropped { task_id });
    }
    let source_column = current_column(state, &task_id)?;
    let target_column = current_column(state, &target_id)?;
    let column = state
        .column(&target_column)
        .ok_or_else(|| Error::ColumnNotFound(target_column.clone()))?;
    let new_index = column
        .position_of(&target_id)
        .ok_or_else(|| Error::TaskNotFound(target_id.clone()))?;

    if source_column != target_column {
        let index = state.move_task(&task_id, &target_column, new_index)?;
        return Ok(DragOutcome::Moved {
            task_id,
            column_id: target_column,
            index,
        });
    }

    let old_index = column
        .position_of(&task_id)
        .ok_or_else(|| Error::TaskNotFound(task_id.clone()))?;
    if old_index == new_index {
        return Ok(DragOutcome::Dropped { task_id });
    }
    let task_ids = array_move(column.task_ids.clone(), old_index, new_index);
    state.reorder_tasks(&target_column, task_ids.clone())?;
    Ok(DragOutcome::Reordered {
        column_id: target_column,
        task_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::NewTask;

    struct Fixture {
        state: BoardState,
        c1: String,
        c2: String,
        c3: String,
        tasks: Vec<String>,
    }

    /// c1 = [t1, t2, t3], c2 = [t4], c3 = []
    fn fixture() -> Fixture {
        let mut state = BoardState::new();
        let board = state.create_board("Drag", "u1").unwrap();
        let c1 = state.create_column(&board, "To Do").unwrap();
        let c2 = state.create_column(&board, "Doing").unwrap();
        let c3 = state.create_column(&board, "Done").unwrap();
        let mut tasks = Vec::new();
        for title in ["t1", "t2", "t3"] {
            tasks.push(state.create_task(&c1, NewTask::new(title)).unwrap());
        }
        tasks.push(state.create_task(&c2, NewTask::new("t4")).unwrap());
        Fixture {
            state,
            c1,
            c2,
            c3,
            tasks,
        }
    }

    fn order(state: &BoardState, column: &str) -> Vec<String> {
        state.column(column).unwrap().task_ids.clone()
    }

    fn start(drag: &mut DragCoordinator, state: &mut BoardState, task: &str) {
        drag.handle(
            state,
            PointerEvent::Down {
                task_id: task.to_string(),
                position: Point::new(0.0, 0.0),
            },
        )
        .unwrap();
        let outcome = drag
            .handle(
                state,
                PointerEvent::Move {
                    position: Point::new(20.0, 0.0),
                    over: None,
                },
            )
            .unwrap();
        assert_eq!(
            outcome,
            DragOutcome::Started {
                task_id: task.to_string()
            }
        );
    }

    fn hover(drag: &mut DragCoordinator, state: &mut BoardState, over: DropTarget) -> DragOutcome {
        drag.handle(
            state,
            PointerEvent::Move {
                position: Point::new(40.0, 40.0),
                over: Some(over),
            },
        )
        .unwrap()
    }

    fn release(
        drag: &mut DragCoordinator,
        state: &mut BoardState,
        over: Option<DropTarget>,
    ) -> DragOutcome {
        drag.handle(state, PointerEvent::Up { over }).unwrap()
    }

    #[test]
    fn test_array_move() {
        assert_eq!(array_move(vec![1, 2, 3], 0, 2), vec![2, 3, 1]);
        assert_eq!(array_move(vec![1, 2, 3], 2, 0), vec![3, 1, 2]);
        assert_eq!(array_move(vec![1, 2, 3], 1, 1), vec![1, 2, 3]);
        assert_eq!(array_move(vec![1, 2, 3], 0, 10), vec![2, 3, 1]);
        assert_eq!(array_move(vec![1, 2, 3], 5, 0), vec![1, 2, 3]);
    }

    #[test]
    fn test_point_distance() {
        assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
    }

    #[test]
    fn test_drop_target_wire_format() {
        let value = serde_json::to_value(DropTarget::Column("c1".to_string())).unwrap();
        assert_eq!(value, serde_json::json!({"kind": "column", "id": "c1"}));
    }

    #[test]
    fn test_press_without_travel_is_not_a_drag() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let t1 = f.tasks[0].clone();

        let outcome = drag
            .handle(
                &mut f.state,
                PointerEvent::Down {
                    task_id: t1.clone(),
                    position: Point::new(10.0, 10.0),
                },
            )
            .unwrap();
        assert_eq!(outcome, DragOutcome::Pending);

        // exactly at the threshold does not activate
        let outcome = drag
            .handle(
                &mut f.state,
                PointerEvent::Move {
                    position: Point::new(18.0, 10.0),
                    over: Some(DropTarget::Column(f.c2.clone())),
                },
            )
            .unwrap();
        assert_eq!(outcome, DragOutcome::Ignored);
        assert!(!drag.is_dragging());

        let outcome = release(&mut drag, &mut f.state, Some(DropTarget::Task(f.tasks[2].clone())));
        assert_eq!(outcome, DragOutcome::Ignored);
        assert_eq!(order(&f.state, &f.c1), f.tasks[..3].to_vec());
        assert_eq!(drag.phase(), &DragPhase::Idle);
    }

    #[test]
    fn test_activation_distance_is_configurable() {
        let mut f = fixture();
        let mut drag = DragCoordinator::new(DragConfig {
            activation_distance: 2.0,
        });
        drag.handle(
            &mut f.state,
            PointerEvent::Down {
                task_id: f.tasks[0].clone(),
                position: Point::new(0.0, 0.0),
            },
        )
        .unwrap();
        let outcome = drag
            .handle(
                &mut f.state,
                PointerEvent::Move {
                    position: Point::new(2.0, 2.0),
                    over: None,
                },
            )
            .unwrap();
        assert!(matches!(outcome, DragOutcome::Started { .. }));
        assert_eq!(drag.active_task(), Some(f.tasks[0].as_str()));
    }

    #[test]
    fn test_same_column_reorder_on_drop() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let (t1, t2, t3) = (f.tasks[0].clone(), f.tasks[1].clone(), f.tasks[2].clone());

        start(&mut drag, &mut f.state, &t1);
        assert_eq!(
            hover(&mut drag, &mut f.state, DropTarget::Task(t3.clone())),
            DragOutcome::Ignored
        );
        let outcome = release(&mut drag, &mut f.state, Some(DropTarget::Task(t3.clone())));

        let expected = vec![t2, t3, t1];
        assert_eq!(
            outcome,
            DragOutcome::Reordered {
                column_id: f.c1.clone(),
                task_ids: expected.clone()
            }
        );
        assert_eq!(order(&f.state, &f.c1), expected);
        assert_eq!(drag.phase(), &DragPhase::Idle);
        f.state.check_invariants().unwrap();
    }

    #[test]
    fn test_cross_column_drop_on_task() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let (t1, t4) = (f.tasks[0].clone(), f.tasks[3].clone());

        start(&mut drag, &mut f.state, &t1);
        hover(&mut drag, &mut f.state, DropTarget::Task(t4.clone()));
        // hovering a task alone does not move anything
        assert_eq!(f.state.task(&t1).unwrap().column_id, f.c1);

        let outcome = release(&mut drag, &mut f.state, Some(DropTarget::Task(t4.clone())));
        assert_eq!(
            outcome,
            DragOutcome::Moved {
                task_id: t1.clone(),
                column_id: f.c2.clone(),
                index: 0
            }
        );
        assert_eq!(order(&f.state, &f.c1), f.tasks[1..3].to_vec());
        assert_eq!(order(&f.state, &f.c2), vec![t1.clone(), t4]);
        assert_eq!(f.state.task(&t1).unwrap().column_id, f.c2);
        f.state.check_invariants().unwrap();
    }

    #[test]
    fn test_hovering_column_moves_task_live() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let t2 = f.tasks[1].clone();

        start(&mut drag, &mut f.state, &t2);
        let outcome = hover(&mut drag, &mut f.state, DropTarget::Column(f.c2.clone()));
        assert_eq!(
            outcome,
            DragOutcome::Moved {
                task_id: t2.clone(),
                column_id: f.c2.clone(),
                index: 0
            }
        );
        assert_eq!(order(&f.state, &f.c2)[0], t2);
        assert!(drag.is_dragging());

        // same target again is not a new hover
        assert_eq!(
            hover(&mut drag, &mut f.state, DropTarget::Column(f.c2.clone())),
            DragOutcome::Ignored
        );

        // released over nothing: the live move stays
        let outcome = release(&mut drag, &mut f.state, None);
        assert_eq!(outcome, DragOutcome::Dropped { task_id: t2.clone() });
        assert_eq!(f.state.task(&t2).unwrap().column_id, f.c2);
    }

    #[test]
    fn test_hovering_own_column_is_a_no_op() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let t3 = f.tasks[2].clone();
        start(&mut drag, &mut f.state, &t3);
        assert_eq!(
            hover(&mut drag, &mut f.state, DropTarget::Column(f.c1.clone())),
            DragOutcome::Ignored
        );
        assert_eq!(order(&f.state, &f.c1), f.tasks[..3].to_vec());
    }

    #[test]
    fn test_round_trip_across_columns_commits_each_hop() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let t3 = f.tasks[2].clone();
        let commits = std::sync::Arc::new(std::sync::Mutex::new(0));
        let counter = std::sync::Arc::clone(&commits);
        f.state.subscribe(Box::new(move |_: &crate::board::BoardSnapshot| {
            *counter.lock().unwrap() += 1;
        }));

        start(&mut drag, &mut f.state, &t3);
        for column in [f.c2.clone(), f.c3.clone(), f.c1.clone()] {
            let outcome = hover(&mut drag, &mut f.state, DropTarget::Column(column));
            assert!(outcome.changed_store());
        }
        release(&mut drag, &mut f.state, None);

        assert_eq!(*commits.lock().unwrap(), 3);
        // back home, but at the top of the column
        assert_eq!(
            order(&f.state, &f.c1),
            vec![t3, f.tasks[0].clone(), f.tasks[1].clone()]
        );
        f.state.check_invariants().unwrap();
    }

    #[test]
    fn test_live_move_then_drop_on_task_reorders_in_new_column() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let (t1, t4) = (f.tasks[0].clone(), f.tasks[3].clone());

        start(&mut drag, &mut f.state, &t1);
        hover(&mut drag, &mut f.state, DropTarget::Column(f.c2.clone()));
        assert_eq!(order(&f.state, &f.c2), vec![t1.clone(), t4.clone()]);

        let outcome = release(&mut drag, &mut f.state, Some(DropTarget::Task(t4.clone())));
        assert!(matches!(outcome, DragOutcome::Reordered { .. }));
        assert_eq!(order(&f.state, &f.c2), vec![t4, t1]);
    }

    #[test]
    fn test_drop_on_empty_column() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let t1 = f.tasks[0].clone();

        start(&mut drag, &mut f.state, &t1);
        let outcome = release(&mut drag, &mut f.state, Some(DropTarget::Column(f.c3.clone())));
        assert_eq!(
            outcome,
            DragOutcome::Moved {
                task_id: t1.clone(),
                column_id: f.c3.clone(),
                index: 0
            }
        );
        assert_eq!(order(&f.state, &f.c3), vec![t1]);
    }

    #[test]
    fn test_drop_on_itself() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let t2 = f.tasks[1].clone();
        start(&mut drag, &mut f.state, &t2);
        let outcome = release(&mut drag, &mut f.state, Some(DropTarget::Task(t2.clone())));
        assert_eq!(outcome, DragOutcome::Dropped { task_id: t2 });
        assert_eq!(order(&f.state, &f.c1), f.tasks[..3].to_vec());
    }

    #[test]
    fn test_cancel_keeps_live_moves() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let t1 = f.tasks[0].clone();
        start(&mut drag, &mut f.state, &t1);
        hover(&mut drag, &mut f.state, DropTarget::Column(f.c3.clone()));

        let outcome = drag.handle(&mut f.state, PointerEvent::Cancel).unwrap();
        assert_eq!(outcome, DragOutcome::Cancelled { task_id: t1.clone() });
        assert_eq!(drag.phase(), &DragPhase::Idle);
        assert_eq!(f.state.task(&t1).unwrap().column_id, f.c3);
        assert_eq!(
            drag.handle(&mut f.state, PointerEvent::Cancel).unwrap(),
            DragOutcome::Ignored
        );
    }

    #[test]
    fn test_press_during_drag_is_ignored() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let t1 = f.tasks[0].clone();
        let t2 = f.tasks[1].clone();
        start(&mut drag, &mut f.state, &t1);

        let outcome = drag
            .handle(
                &mut f.state,
                PointerEvent::Down {
                    task_id: t2,
                    position: Point::new(5.0, 5.0),
                },
            )
            .unwrap();
        assert_eq!(outcome, DragOutcome::Ignored);
        assert_eq!(drag.active_task(), Some(t1.as_str()));

        hover(&mut drag, &mut f.state, DropTarget::Column(f.c3.clone()));
        assert_eq!(order(&f.state, &f.c3), vec![t1]);
    }

    #[test]
    fn test_reset_ends_session() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let t1 = f.tasks[0].clone();
        start(&mut drag, &mut f.state, &t1);
        drag.reset();
        assert_eq!(drag.phase(), &DragPhase::Idle);
        assert_eq!(release(&mut drag, &mut f.state, None), DragOutcome::Ignored);
    }

    #[test]
    fn test_events_while_idle_are_ignored() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let before = f.state.snapshot().clone();
        assert_eq!(
            hover(&mut drag, &mut f.state, DropTarget::Column(f.c2.clone())),
            DragOutcome::Ignored
        );
        assert_eq!(release(&mut drag, &mut f.state, None), DragOutcome::Ignored);
        assert_eq!(f.state.snapshot(), &before);
    }

    #[test]
    fn test_press_on_unknown_task_fails() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let err = drag
            .handle(
                &mut f.state,
                PointerEvent::Down {
                    task_id: "ghost".to_string(),
                    position: Point::default(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(_)));
        assert_eq!(drag.phase(), &DragPhase::Idle);
    }

    #[test]
    fn test_dragged_task_deleted_mid_gesture_resets_session() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let t1 = f.tasks[0].clone();
        start(&mut drag, &mut f.state, &t1);
        f.state.delete_task(&t1).unwrap();

        let err = drag
            .handle(
                &mut f.state,
                PointerEvent::Move {
                    position: Point::new(50.0, 50.0),
                    over: Some(DropTarget::Column(f.c2.clone())),
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::TaskNotFound(_)));
        assert_eq!(drag.phase(), &DragPhase::Idle);
        f.state.check_invariants().unwrap();
    }

    #[test]
    fn test_drop_on_stale_target_fails_cleanly() {
        let mut f = fixture();
        let mut drag = DragCoordinator::default();
        let t1 = f.tasks[0].clone();
        start(&mut drag, &mut f.state, &t1);
        let before = f.state.snapshot().clone();

        let err = drag
            .handle(
                &mut f.state,
                PointerEvent::Up {
                    over: Some(DropTarget::Task("gone".to_string())),
                },
            )
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(f.state.snapshot(), &before);
        assert_eq!(drag.phase(), &DragPhase::Idle);
    }
}
