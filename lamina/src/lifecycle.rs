//! Lifecycle phase broadcasting.
//!
//! The bootstrap progresses through a fixed, totally ordered phase
//! sequence: `starting → environment-prepared → context-prepared →
//! context-loaded → started → running`, with an alternate terminal
//! `failed` reachable from any point after `starting`. Each phase is
//! broadcast synchronously, in listener-registration order, by the
//! [`LifecycleDispatcher`]. The dispatcher is an explicit value owning
//! its listener list; adding a listener is an explicit call, and
//! listeners added after earlier phases see no replay.

use std::fmt;

use log::{debug, log_enabled, warn};

use crate::bootstrap::BootstrapContext;
use crate::env::Environment;
use crate::error::{Error, Result};

/// The fixed lifecycle phases, in broadcast order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// The pipeline is about to start; nothing is built yet.
    Starting,
    /// The environment holds the merged configuration view.
    EnvironmentPrepared,
    /// The context exists with its selected contributors.
    ContextPrepared,
    /// The context is fully loaded; late listeners may be added.
    ContextLoaded,
    /// The pipeline completed its construction work.
    Started,
    /// The application is running.
    Running,
    /// The pipeline aborted; terminal.
    Failed,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Starting => "starting",
            Self::EnvironmentPrepared => "environment-prepared",
            Self::ContextPrepared => "context-prepared",
            Self::ContextLoaded => "context-loaded",
            Self::Started => "started",
            Self::Running => "running",
            Self::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// A listener notified at each lifecycle phase.
///
/// All methods default to no-ops; implementors override the phases
/// they care about. An error returned from any phase other than
/// `failed` aborts the pipeline.
pub trait LifecycleListener {
    /// Called before any work happens.
    fn starting(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once the merged configuration view is committed.
    ///
    /// Listeners may mutate the environment here.
    fn environment_prepared(&mut self, environment: &mut Environment) -> Result<()> {
        let _ = environment;
        Ok(())
    }

    /// Called once the context with its contributors exists.
    fn context_prepared(&mut self, context: &mut BootstrapContext) -> Result<()> {
        let _ = context;
        Ok(())
    }

    /// Called once the context is fully loaded.
    fn context_loaded(&mut self, context: &mut BootstrapContext) -> Result<()> {
        let _ = context;
        Ok(())
    }

    /// Called once the pipeline has finished its construction work.
    fn started(&mut self, context: &BootstrapContext) -> Result<()> {
        let _ = context;
        Ok(())
    }

    /// Called when the application is running.
    fn running(&mut self, context: &BootstrapContext) -> Result<()> {
        let _ = context;
        Ok(())
    }

    /// Called when the pipeline aborts.
    ///
    /// `context` is absent if the failure happened before the context
    /// was built; `error` carries the triggering failure.
    fn failed(&mut self, context: Option<&BootstrapContext>, error: Option<&Error>) -> Result<()> {
        let _ = (context, error);
        Ok(())
    }
}

/// Broadcasts lifecycle phases to registered listeners.
///
/// # Examples
///
/// ```
/// use lamina::lifecycle::{LifecycleDispatcher, LifecycleListener};
///
/// struct Silent;
/// impl LifecycleListener for Silent {}
///
/// let mut dispatcher = LifecycleDispatcher::new();
/// dispatcher.add_listener(Box::new(Silent));
/// dispatcher.starting().unwrap();
/// ```
#[derive(Default)]
pub struct LifecycleDispatcher {
    listeners: Vec<Box<dyn LifecycleListener>>,
}

impl LifecycleDispatcher {
    /// Creates a dispatcher with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    ///
    /// Listeners registered after a phase has been broadcast do not
    /// see that phase replayed.
    pub fn add_listener(&mut self, listener: Box<dyn LifecycleListener>) {
        self.listeners.push(listener);
    }

    /// Returns the number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Broadcasts the `starting` phase.
    ///
    /// # Errors
    ///
    /// Propagates the first listener error.
    pub fn starting(&mut self) -> Result<()> {
        for listener in &mut self.listeners {
            listener.starting()?;
        }
        Ok(())
    }

    /// Broadcasts the `environment-prepared` phase.
    ///
    /// # Errors
    ///
    /// Propagates the first listener error.
    pub fn environment_prepared(&mut self, environment: &mut Environment) -> Result<()> {
        for listener in &mut self.listeners {
            listener.environment_prepared(environment)?;
        }
        Ok(())
    }

    /// Broadcasts the `context-prepared` phase.
    ///
    /// # Errors
    ///
    /// Propagates the first listener error.
    pub fn context_prepared(&mut self, context: &mut BootstrapContext) -> Result<()> {
        for listener in &mut self.listeners {
            listener.context_prepared(context)?;
        }
        Ok(())
    }

    /// Broadcasts the `context-loaded` phase.
    ///
    /// # Errors
    ///
    /// Propagates the first listener error.
    pub fn context_loaded(&mut self, context: &mut BootstrapContext) -> Result<()> {
        for listener in &mut self.listeners {
            listener.context_loaded(context)?;
        }
        Ok(())
    }

    /// Broadcasts the `started` phase.
    ///
    /// # Errors
    ///
    /// Propagates the first listener error.
    pub fn started(&mut self, context: &BootstrapContext) -> Result<()> {
        for listener in &mut self.listeners {
            listener.started(context)?;
        }
        Ok(())
    }

    /// Broadcasts the `running` phase.
    ///
    /// # Errors
    ///
    /// Propagates the first listener error.
    pub fn running(&mut self, context: &BootstrapContext) -> Result<()> {
        for listener in &mut self.listeners {
            listener.running(context)?;
        }
        Ok(())
    }

    /// Broadcasts the terminal `failed` phase.
    ///
    /// Delivery is attempted for every listener even if one of them
    /// errors: each listener invocation is isolated, with failures
    /// logged rather than propagated.
    ///
    /// # Errors
    ///
    /// Only when `error` is `None` is a listener failure re-raised
    /// immediately (fail-fast when there is no primary cause to
    /// protect).
    pub fn failed(
        &mut self,
        context: Option<&BootstrapContext>,
        error: Option<&Error>,
    ) -> Result<()> {
        for listener in &mut self.listeners {
            if let Err(listener_error) = listener.failed(context, error) {
                if error.is_none() {
                    return Err(listener_error);
                }
                if log_enabled!(log::Level::Debug) {
                    debug!("error handling failed phase: {listener_error}");
                } else {
                    warn!("error handling failed phase ({listener_error})");
                }
            }
        }
        Ok(())
    }
}
