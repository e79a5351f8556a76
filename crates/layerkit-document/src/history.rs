//! Undo/redo history.
//!
//! Linear snapshot history: `past` holds the states before each recorded
//! action, `current` the state after the latest one, `future` the states
//! undone since. Restoring a state replaces the document wholesale; no inverse
//! operations are computed. Snapshots of [`crate::Document`] share unchanged
//! pages, so each entry costs roughly the pages its action touched.

use std::collections::VecDeque;
use std::fmt;

use crate::error::{DocumentError, DocumentResult};

/// Kind of a recorded action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    LayerAdded,
    LayersRemoved,
    LayerMoved,
    PropsChanged,
    LockChanged,
    LayersDuplicated,
    LayersPasted,
    PageAdded,
    PageRemoved,
    PageMoved,
    PageChanged,
    /// Several changes committed together
    Batch,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionType::LayerAdded => "Add Layer",
            ActionType::LayersRemoved => "Remove Layers",
            ActionType::LayerMoved => "Move Layer",
            ActionType::PropsChanged => "Change Properties",
            ActionType::LockChanged => "Change Lock",
            ActionType::LayersDuplicated => "Duplicate Layers",
            ActionType::LayersPasted => "Paste Layers",
            ActionType::PageAdded => "Add Page",
            ActionType::PageRemoved => "Remove Page",
            ActionType::PageMoved => "Move Page",
            ActionType::PageChanged => "Change Page",
            ActionType::Batch => "Batch",
        };
        f.write_str(name)
    }
}

/// A recorded action: what it was and a human readable label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryAction {
    pub action_type: ActionType,
    pub description: String,
}

impl HistoryAction {
    pub fn simple(action_type: ActionType, description: impl Into<String>) -> Self {
        Self {
            action_type,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<S> {
    action: HistoryAction,
    snapshot: S,
}

/// Snapshot history over states of type `S`.
#[derive(Debug, Clone)]
pub struct HistoryManager<S> {
    past: VecDeque<Entry<S>>,
    current: S,
    future: Vec<Entry<S>>,
    max_depth: Option<usize>,
    enabled: bool,
}

impl<S: Clone> HistoryManager<S> {
    /// Unbounded history starting at `initial`.
    pub fn new(initial: S) -> Self {
        Self::with_max_depth(initial, None)
    }

    /// History keeping at most `max_depth` undoable entries. Once the cap is
    /// reached the oldest entry is dropped on every new record.
    pub fn with_max_depth(initial: S, max_depth: Option<usize>) -> Self {
        Self {
            past: VecDeque::new(),
            current: initial,
            future: Vec::new(),
            max_depth,
            enabled: true,
        }
    }

    /// The state after the latest recorded, undone or redone action.
    pub fn current(&self) -> &S {
        &self.current
    }

    /// Records `snapshot` as the new current state and discards redo history.
    ///
    /// Callers skip recording when nothing changed. While disabled the state
    /// is replaced without creating an undo entry.
    pub fn record(&mut self, action: HistoryAction, snapshot: S) {
        let previous = std::mem::replace(&mut self.current, snapshot);
        self.future.clear();
        if !self.enabled {
            return;
        }
        self.past.push_back(Entry {
            action,
            snapshot: previous,
        });
        if let Some(max) = self.max_depth {
            self.trim_to_depth(max);
        }
    }

    /// Steps back one entry and returns the restored state.
    pub fn undo(&mut self) -> DocumentResult<&S> {
        let entry = self.past.pop_back().ok_or(DocumentError::NothingToUndo)?;
        let undone = std::mem::replace(&mut self.current, entry.snapshot);
        self.future.push(Entry {
            action: entry.action,
            snapshot: undone,
        });
        Ok(&self.current)
    }

    /// Steps forward one entry and returns the restored state.
    pub fn redo(&mut self) -> DocumentResult<&S> {
        let entry = self.future.pop().ok_or(DocumentError::NothingToRedo)?;
        let previous = std::mem::replace(&mut self.current, entry.snapshot);
        self.past.push_back(Entry {
            action: entry.action,
            snapshot: previous,
        });
        Ok(&self.current)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Label of the action `undo` would revert
    pub fn undo_description(&self) -> Option<String> {
        self.past.back().map(|e| e.action.description.clone())
    }

    /// Label of the action `redo` would reapply
    pub fn redo_description(&self) -> Option<String> {
        self.future.last().map(|e| e.action.description.clone())
    }

    /// Recorded actions, oldest first
    pub fn full_history(&self) -> Vec<&HistoryAction> {
        self.past.iter().map(|e| &e.action).collect()
    }

    /// Drops undo and redo entries, keeping the current state.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Starts over from `state` with empty stacks.
    pub fn reset(&mut self, state: S) {
        self.clear();
        self.current = state;
    }

    /// Drops the oldest entries until at most `depth` remain.
    pub fn trim_to_depth(&mut self, depth: usize) {
        while self.past.len() > depth {
            self.past.pop_front();
        }
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
