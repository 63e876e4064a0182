//! Optimistic mutation: apply a state change locally before the remote
//! authority confirms it, then reconcile on the response.

use std::sync::Arc;

use api::{GameApi, ProjectApi};
use eduplay_core::model::{GameSummary, Project};

use crate::error::MutationError;

//
// ─── OPTIMISTIC CELL ───────────────────────────────────────────────────────────
//

/// How a pending mutation was reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Remote confirmed; the speculative state stands.
    Committed,
    /// Remote rejected; the pre-mutation snapshot was restored.
    RolledBack,
    /// A newer mutation had already begun on the cell, so this resolution
    /// was a no-op.
    Superseded,
}

/// Handle for one in-flight mutation: the snapshot it replaced and the
/// generation that identifies it.
#[derive(Debug)]
pub struct MutationTicket<T> {
    snapshot: T,
    generation: u64,
}

/// A value subject to optimistic edits, one cell per entity field group.
///
/// [`begin`](Self::begin) snapshots the value and applies the speculative
/// transform synchronously, so the caller's view changes before any network
/// round-trip. Each mutation bumps a generation counter; resolving with a
/// stale ticket is a no-op, which is what keeps a late-arriving response for
/// an earlier toggle from clobbering the effect of a later one.
#[derive(Debug, Clone)]
pub struct OptimisticCell<T: Clone> {
    value: T,
    generation: u64,
}

impl<T: Clone> OptimisticCell<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            generation: 0,
        }
    }

    /// The currently displayed value, speculative edits included.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Snapshot the value, apply `transform` to it, and return the ticket
    /// the eventual response must present.
    pub fn begin(&mut self, transform: impl FnOnce(&mut T)) -> MutationTicket<T> {
        let snapshot = self.value.clone();
        transform(&mut self.value);
        self.generation += 1;
        MutationTicket {
            snapshot,
            generation: self.generation,
        }
    }

    /// Keep the speculative state after remote confirmation.
    pub fn commit(&mut self, ticket: MutationTicket<T>) -> Resolution {
        if ticket.generation != self.generation {
            return Resolution::Superseded;
        }
        Resolution::Committed
    }

    /// Commit and merge authoritative fields from the response.
    pub fn commit_with(
        &mut self,
        ticket: MutationTicket<T>,
        merge: impl FnOnce(&mut T),
    ) -> Resolution {
        if ticket.generation != self.generation {
            return Resolution::Superseded;
        }
        merge(&mut self.value);
        Resolution::Committed
    }

    /// Restore the exact pre-mutation snapshot after remote rejection.
    ///
    /// This is a snapshot restore, not an inverse transform: if another
    /// toggle began in the meantime the ticket is stale and nothing happens.
    pub fn rollback(&mut self, ticket: MutationTicket<T>) -> Resolution {
        if ticket.generation != self.generation {
            return Resolution::Superseded;
        }
        self.value = ticket.snapshot;
        Resolution::RolledBack
    }
}

//
// ─── GAME ACTIONS ──────────────────────────────────────────────────────────────
//

/// Like and publish toggles (and project deletion) over the remote
/// authority. Toggles are optimistic; deletion is not.
#[derive(Clone)]
pub struct GameActionService {
    games: Arc<dyn GameApi>,
    projects: Arc<dyn ProjectApi>,
}

impl GameActionService {
    #[must_use]
    pub fn new(games: Arc<dyn GameApi>, projects: Arc<dyn ProjectApi>) -> Self {
        Self { games, projects }
    }

    /// Toggle the liked state of a game.
    ///
    /// The liked flag and count change before the request is sent; a
    /// rejection restores the snapshot and surfaces the error for user
    /// notification.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Remote` when the server rejects the toggle.
    pub async fn toggle_like(
        &self,
        game: &mut OptimisticCell<GameSummary>,
    ) -> Result<Resolution, MutationError> {
        let id = game.value().id;
        let desired = !game.value().is_liked;
        let ticket = game.begin(|g| g.set_liked(desired));

        match self.games.set_liked(id, desired).await {
            Ok(()) => Ok(game.commit(ticket)),
            Err(error) => {
                game.rollback(ticket);
                Err(error.into())
            }
        }
    }

    /// Toggle the published state of a project, optimistically.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Remote` when the server rejects the change.
    pub async fn toggle_publish(
        &self,
        project: &mut OptimisticCell<Project>,
    ) -> Result<Resolution, MutationError> {
        let id = project.value().id;
        let slug = project.value().template_slug.clone();
        let desired = !project.value().is_published;
        let ticket = project.begin(|p| p.set_published(desired));

        match self.projects.set_published(&slug, id, desired).await {
            Ok(()) => Ok(project.commit(ticket)),
            Err(error) => {
                project.rollback(ticket);
                Err(error.into())
            }
        }
    }

    /// Delete a project. Not optimistic: the caller removes the entry only
    /// after this returns Ok.
    ///
    /// # Errors
    ///
    /// Returns `MutationError::Remote` when deletion fails.
    pub async fn delete_project(&self, project: &Project) -> Result<(), MutationError> {
        self.projects
            .delete_project(&project.template_slug, project.id)
            .await?;
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
