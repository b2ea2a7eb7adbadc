//! Reconciliation of DNS A records against the current external IP.
//!
//! One linear pass per invocation: resolve, compare against the cached
//! IP, and on a change notify, persist and rewrite every configured
//! subdomain whose A record lags behind. There is no state machine
//! beyond "changed vs. unchanged" and no recovery beyond surfacing the
//! first error.

use thiserror::Error;

use crate::dns::{DirectAdminClient, DnsError};
use crate::notify::Notifier;
use crate::resolver::{ExternalIpResolver, ResolveError};
use crate::state::{StateError, StateStore};
use crate::transport::HttpClient;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

/// Terminal state of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The external IP matches the cached IP; nothing was touched.
    Unchanged,
    /// The external IP changed (or no cache existed).
    Updated {
        /// The newly observed external IP.
        ip: String,
        /// Subdomains whose A record was rewritten (empty when DNS
        /// already agreed with the new IP).
        rewritten: Vec<String>,
    },
}

/// Error type for a reconciliation run.
///
/// Notification failures are deliberately absent: the notifier is an
/// advisory side channel and must not block the DNS update.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The external IP could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The cached IP could not be read or written.
    #[error(transparent)]
    State(#[from] StateError),

    /// A DNS control operation failed.
    #[error(transparent)]
    Dns(#[from] DnsError),

    /// A configured subdomain has no A record in the zone.
    ///
    /// Every managed subdomain must already exist; a missing one means
    /// the configuration and the zone disagree and needs an operator.
    #[error("Could not find current ip for subdomain: {name}")]
    UnknownSubdomain {
        /// The subdomain missing from the zone.
        name: String,
    },
}

/// Drives one reconciliation pass.
///
/// Generic over the transport, the state store and the notifier so the
/// whole flow can be exercised with scripted mocks.
#[derive(Debug)]
pub struct Reconciler<H, S, N> {
    resolver: ExternalIpResolver<H>,
    dns: DirectAdminClient<H>,
    store: S,
    notifier: N,
    subdomains: Vec<String>,
    dry_run: bool,
}

impl<H, S, N> Reconciler<H, S, N> {
    /// Creates a reconciler managing `subdomains` in configured order.
    #[must_use]
    pub fn new(
        resolver: ExternalIpResolver<H>,
        dns: DirectAdminClient<H>,
        store: S,
        notifier: N,
        subdomains: Vec<String>,
    ) -> Self {
        Self {
            resolver,
            dns,
            store,
            notifier,
            subdomains,
            dry_run: false,
        }
    }

    /// Enables dry-run mode: resolve and list, but log intended
    /// notifications, cache writes and record rewrites instead of
    /// performing them.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl<H, S, N> Reconciler<H, S, N>
where
    H: HttpClient,
    S: StateStore,
    N: Notifier,
{
    /// Checks the external IP and updates DNS entries as needed.
    ///
    /// # Errors
    ///
    /// Surfaces the first resolve, state or DNS failure; see
    /// [`ReconcileError`]. The delete/re-add pair per subdomain is not
    /// transactional; a failure between the two leaves that subdomain
    /// without an A record until the next run.
    pub async fn check_and_update(&self) -> Result<Outcome, ReconcileError> {
        let external = self.resolver.current_ip().await?;
        tracing::info!("Current external IP address: {external}");

        let stored = self.store.load()?.unwrap_or_default();

        if external == stored {
            tracing::info!("IP address has not changed");
            return Ok(Outcome::Unchanged);
        }

        self.send_notification(&stored, &external).await;

        if self.dry_run {
            tracing::info!("Dry-run: would cache external IP {external}");
        } else {
            self.store.save(&external)?;
        }

        let snapshot = self.dns.list_records().await?;
        let mut rewritten = Vec::new();

        for name in &self.subdomains {
            let current = snapshot
                .ip_of(name)
                .ok_or_else(|| ReconcileError::UnknownSubdomain { name: name.clone() })?;
            tracing::info!("Current IP of {name} in DNS: {current}");

            if current == external {
                tracing::info!("{name}: IP is already up to date");
                continue;
            }

            if self.dry_run {
                tracing::info!("Dry-run: would rewrite A record for {name} to {external}");
            } else {
                tracing::info!("Rewriting A record for {name}");
                self.dns.delete_record(name).await?;
                self.dns.add_record(name, &external).await?;
            }
            rewritten.push(name.clone());
        }

        Ok(Outcome::Updated {
            ip: external,
            rewritten,
        })
    }

    /// Fires the change notification, swallowing failures.
    async fn send_notification(&self, old_ip: &str, new_ip: &str) {
        if self.dry_run {
            tracing::info!("Dry-run: would notify change {old_ip} -> {new_ip}");
            return;
        }

        if let Err(e) = self.notifier.notify(old_ip, new_ip).await {
            tracing::warn!("Change notification failed, continuing: {e}");
        }
    }
}
