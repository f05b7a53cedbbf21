//! Settings forms with explicit save and discard

use crate::backend::{Backend, LoadGuard};
use crate::error::Result;
use crate::settings::{AllAgentSettings, AppSettings, DraftState};
use async_trait::async_trait;

/// A settings document that can be edited in a [`SettingsPanel`]
#[async_trait]
pub trait EditableSettings:
    Clone + PartialEq + Default + std::fmt::Debug + Send + Sync + 'static
{
    /// Label used in log messages
    const KIND: &'static str;

    async fn load_from(backend: &dyn Backend) -> Result<Self>;

    async fn save_to(&self, backend: &dyn Backend) -> Result<()>;

    /// Coerce values back into their accepted sets before saving
    fn normalize(&mut self) {}

    /// Set one field by dotted key
    fn set_field(&mut self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
impl EditableSettings for AppSettings {
    const KIND: &'static str = "application";

    async fn load_from(backend: &dyn Backend) -> Result<Self> {
        backend.load_app_settings().await
    }

    async fn save_to(&self, backend: &dyn Backend) -> Result<()> {
        backend.save_app_settings(self).await
    }

    fn normalize(&mut self) {
        AppSettings::normalize(self);
    }

    fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        AppSettings::set_field(self, key, value)
    }
}

#[async_trait]
impl EditableSettings for AllAgentSettings {
    const KIND: &'static str = "agent";

    async fn load_from(backend: &dyn Backend) -> Result<Self> {
        backend.load_agent_settings().await
    }

    async fn save_to(&self, backend: &dyn Backend) -> Result<()> {
        backend.save_agent_settings(self).await
    }

    fn set_field(&mut self, key: &str, value: &str) -> Result<()> {
        AllAgentSettings::set_field(self, key, value)
    }
}

/// Settings being edited
///
/// Edits only touch the draft. Saving persists the normalized draft, reads
/// the stored value back and makes it the committed snapshot.
#[derive(Debug)]
pub struct SettingsPanel<T> {
    state: DraftState<T>,
    guard: LoadGuard,
}

/// Panel over [`AppSettings`]
pub type AppSettingsPanel = SettingsPanel<AppSettings>;

/// Panel over [`AllAgentSettings`]
pub type AgentSettingsPanel = SettingsPanel<AllAgentSettings>;

impl<T: EditableSettings> Default for SettingsPanel<T> {
    fn default() -> Self {
        Self {
            state: DraftState::default(),
            guard: LoadGuard::default(),
        }
    }
}

impl<T: EditableSettings> SettingsPanel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the stored settings into both halves of the form
    ///
    /// A failed load falls back to defaults, which suits read-only display.
    /// Returns whether the result was applied.
    pub async fn load(&mut self, backend: &dyn Backend) -> bool {
        let ticket = self.guard.begin();

        let settings = match T::load_from(backend).await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(kind = T::KIND, error = %e, "Failed to load settings, using defaults");
                T::default()
            }
        };

        self.apply(ticket, settings)
    }

    /// Load like [`SettingsPanel::load`], but return load failures
    ///
    /// Use this before editing, so a save never writes defaults over a file
    /// that could not be read.
    pub async fn try_load(&mut self, backend: &dyn Backend) -> Result<bool> {
        let ticket = self.guard.begin();
        let settings = T::load_from(backend).await?;
        Ok(self.apply(ticket, settings))
    }

    fn apply(&mut self, ticket: crate::backend::LoadTicket, settings: T) -> bool {
        if !self.guard.is_current(&ticket) {
            tracing::debug!(
                kind = T::KIND,
                generation = ticket.generation(),
                "Discarding stale settings load"
            );
            return false;
        }

        self.state.replace(settings);
        true
    }

    pub fn draft(&self) -> &T {
        self.state.draft()
    }

    pub fn committed(&self) -> &T {
        self.state.committed()
    }

    pub fn edit(&mut self, edit: impl FnOnce(&mut T)) {
        self.state.update(edit);
    }

    /// Set one draft field by key; the draft is untouched on error
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut edited = self.state.draft().clone();
        edited.set_field(key, value)?;
        *self.state.draft_mut() = edited;
        Ok(())
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.state.is_dirty()
    }

    pub fn discard(&mut self) {
        self.state.discard();
    }

    /// Persist the draft
    ///
    /// # Errors
    ///
    /// A failed save is returned to the caller and leaves the draft dirty.
    pub async fn save(&mut self, backend: &dyn Backend) -> Result<()> {
        self.state.update(T::normalize);
        self.state.draft().save_to(backend).await?;

        match T::load_from(backend).await {
            Ok(stored) => self.state.replace(stored),
            Err(e) => {
                tracing::warn!(kind = T::KIND, error = %e, "Saved settings could not be re-read");
                self.state.mark_saved();
            }
        }

        tracing::info!(kind = T::KIND, "Settings saved");
        Ok(())
    }

    /// Invalidate loads still in flight
    pub fn teardown(&mut self) {
        self.guard.teardown();
    }
}
