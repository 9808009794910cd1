//! Dashboard session — the caller's state behind one lock.
//!
//! Holds configuration, flags and unlocked achievements between
//! recomputes. A single Mutex serialises every mutation and every
//! recompute, so flag merges never interleave across threads.

use crate::{
    clock::Clock,
    command::DashboardCommand,
    config::{AnalyticsConfig, ConfigPatch},
    engine::DashboardAssembler,
    error::{AnalyticsError, AnalyticsResult},
    record::SimulationRecord,
    snapshot::DashboardSnapshot,
    state::DashboardState,
};
use std::sync::{Mutex, MutexGuard};

struct SessionInner {
    config: AnalyticsConfig,
    state:  DashboardState,
}

pub struct DashboardSession {
    assembler: DashboardAssembler,
    clock:     Box<dyn Clock>,
    inner:     Mutex<SessionInner>,
}

impl DashboardSession {
    pub fn new(config: AnalyticsConfig, clock: Box<dyn Clock>) -> AnalyticsResult<Self> {
        Self::restore(config, DashboardState::default(), clock)
    }

    /// Resume with state the caller persisted from an earlier session.
    pub fn restore(
        config: AnalyticsConfig,
        state: DashboardState,
        clock: Box<dyn Clock>,
    ) -> AnalyticsResult<Self> {
        config.validate()?;
        Ok(Self {
            assembler: DashboardAssembler::new(),
            clock,
            inner: Mutex::new(SessionInner { config, state }),
        })
    }

    fn lock(&self) -> AnalyticsResult<MutexGuard<'_, SessionInner>> {
        self.inner.lock().map_err(|_| AnalyticsError::StatePoisoned)
    }

    pub fn recompute(&self, history: Option<&[SimulationRecord]>) -> AnalyticsResult<DashboardSnapshot> {
        let mut inner = self.lock()?;
        let SessionInner { config, state } = &mut *inner;
        Ok(self.assembler.recompute(history, config, state, self.clock.as_ref()))
    }

    pub fn mark_suggestion_viewed(&self, id: &str) -> AnalyticsResult<()> {
        self.lock()?.state.flags.mark_suggestion_viewed(id);
        Ok(())
    }

    pub fn mark_suggestion_applied(&self, id: &str) -> AnalyticsResult<()> {
        self.lock()?.state.flags.mark_suggestion_applied(id);
        Ok(())
    }

    pub fn mark_alert_viewed(&self, id: &str) -> AnalyticsResult<()> {
        self.lock()?.state.flags.mark_alert_viewed(id);
        Ok(())
    }

    pub fn dismiss_alert(&self, id: &str) -> AnalyticsResult<()> {
        self.lock()?.state.flags.dismiss_alert(id);
        Ok(())
    }

    pub fn update_configuration(&self, patch: ConfigPatch) -> AnalyticsResult<()> {
        self.lock()?.config.apply(patch)
    }

    pub fn apply(&self, command: DashboardCommand) -> AnalyticsResult<()> {
        match command {
            DashboardCommand::MarkSuggestionViewed { id }  => self.mark_suggestion_viewed(&id),
            DashboardCommand::MarkSuggestionApplied { id } => self.mark_suggestion_applied(&id),
            DashboardCommand::MarkAlertViewed { id }       => self.mark_alert_viewed(&id),
            DashboardCommand::DismissAlert { id }          => self.dismiss_alert(&id),
            DashboardCommand::UpdateConfiguration { patch } => self.update_configuration(patch),
        }
    }

    pub fn config(&self) -> AnalyticsResult<AnalyticsConfig> {
        Ok(self.lock()?.config.clone())
    }

    /// Copy of the caller state, for persisting between runs.
    pub fn state(&self) -> AnalyticsResult<DashboardState> {
        Ok(self.lock()?.state.clone())
    }
}
