//! Runs update checks on behalf of the host's triggers

use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::catalog::cache::TransientStore;
use crate::config::FETCH_TIMEOUT_MS;
use crate::theme::enumerator::ThemeEnumerator;
use crate::updater::listing::UpdateListing;
use crate::updater::resolver::UpdateResolver;

/// What caused a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// An administrative page was loaded
    AdminPageLoad,
    /// Recurring background tick
    Background,
    /// Command-line invocation
    CommandLine,
    /// Any other request; never checks
    Frontend,
}

impl Trigger {
    pub fn should_check(&self) -> bool {
        !matches!(self, Trigger::Frontend)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::AdminPageLoad => "admin",
            Trigger::Background => "background",
            Trigger::CommandLine => "cli",
            Trigger::Frontend => "frontend",
        }
    }
}

impl std::str::FromStr for Trigger {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Trigger::AdminPageLoad),
            "background" => Ok(Trigger::Background),
            "cli" => Ok(Trigger::CommandLine),
            "frontend" => Ok(Trigger::Frontend),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Error)]
#[error("Environment setup failed: {0}")]
pub struct SetupError(pub String);

/// Host preparation required before a background check can run
#[cfg_attr(test, automock)]
pub trait EnvironmentSetup: Send + Sync {
    fn prepare(&self) -> Result<(), SetupError>;
}

/// Setup for hosts that need no preparation
#[derive(Debug, Default)]
pub struct NoopSetup;

impl EnvironmentSetup for NoopSetup {
    fn prepare(&self) -> Result<(), SetupError> {
        Ok(())
    }
}

/// Owns the resolver and decides whether, and how long, a check may run
pub struct UpdateScheduler<S: TransientStore> {
    resolver: UpdateResolver<S>,
    enumerator: Arc<dyn ThemeEnumerator>,
    setup: Arc<dyn EnvironmentSetup>,
    timeout: Duration,
}

impl<S: TransientStore> UpdateScheduler<S> {
    pub fn new(resolver: UpdateResolver<S>, enumerator: Arc<dyn ThemeEnumerator>) -> Self {
        Self {
            resolver,
            enumerator,
            setup: Arc::new(NoopSetup),
            timeout: Duration::from_millis(FETCH_TIMEOUT_MS),
        }
    }

    pub fn with_setup(mut self, setup: Arc<dyn EnvironmentSetup>) -> Self {
        self.setup = setup;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one check for `trigger`, returning the updated listing
    ///
    /// Any failure before or during the check returns `listing` as it came in.
    pub async fn run(&self, trigger: Trigger, listing: UpdateListing) -> UpdateListing {
        if !trigger.should_check() {
            debug!("Trigger {} does not check for updates", trigger.as_str());
            return listing;
        }

        if trigger == Trigger::Background {
            if let Err(e) = self.setup.prepare() {
                error!("Skipping background update check: {}", e);
                return listing;
            }
        }

        let installed = match self.enumerator.installed_themes() {
            Ok(installed) => installed,
            Err(e) => {
                error!("Failed to enumerate installed themes: {}", e);
                return listing;
            }
        };

        info!(
            "Checking {} installed themes for updates ({})",
            installed.len(),
            trigger.as_str()
        );

        let original = listing.clone();
        match tokio::time::timeout(self.timeout, self.resolver.resolve(listing, &installed)).await
        {
            Ok(updated) => updated,
            Err(_) => {
                warn!(
                    "Update check timed out after {}ms, leaving listing unchanged",
                    self.timeout.as_millis()
                );
                original
            }
        }
    }
}
