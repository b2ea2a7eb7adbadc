//! Application execution logic.
//!
//! Wires the transport, resolver, DNS control client, state store and
//! configured notifier together and drives one reconciliation pass.

use std::path::PathBuf;

use thiserror::Error;

use da_ddns::config::{NotifierSettings, Settings};
use da_ddns::dns::{DirectAdminClient, DnsError};
use da_ddns::notify::{ConfiguredNotifier, HttpNotifier, MqttNotifier};
use da_ddns::reconcile::{Outcome, ReconcileError, Reconciler};
use da_ddns::resolver::ExternalIpResolver;
use da_ddns::state::FileStateStore;
use da_ddns::transport::ReqwestClient;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The DNS control client could not be constructed from the settings.
    #[error("Failed to set up DNS control client: {0}")]
    DnsSetup(#[source] DnsError),

    /// The reconciliation pass failed.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}

/// Runs one reconciliation pass with the given settings.
///
/// # Errors
///
/// Returns [`RunError`] when the DNS endpoint cannot be constructed or
/// the pass itself fails; see [`ReconcileError`] for the failure modes.
pub async fn execute(
    settings: Settings,
    state_file: PathBuf,
    dry_run: bool,
) -> Result<(), RunError> {
    // One transport handle, cloned into every HTTP-speaking component.
    let client = ReqwestClient::new();

    let resolver = ExternalIpResolver::new(client.clone());
    let dns = DirectAdminClient::new(
        client.clone(),
        &settings.host,
        settings.port,
        &settings.user,
        &settings.password,
        &settings.domain,
    )
    .map_err(RunError::DnsSetup)?;

    let store = FileStateStore::new(state_file);
    tracing::debug!("State file: {}", store.path().display());

    let notifier: ConfiguredNotifier<ReqwestClient> = match &settings.notifier {
        NotifierSettings::Http { url } => {
            ConfiguredNotifier::Http(HttpNotifier::new(client, url.clone()))
        }
        NotifierSettings::Mqtt { host, port, topic } => {
            ConfiguredNotifier::Mqtt(MqttNotifier::new(host.clone(), *port, topic.clone()))
        }
        NotifierSettings::Disabled => ConfiguredNotifier::Disabled,
    };

    if dry_run {
        tracing::info!("Dry-run mode enabled - changes will be logged but not performed");
    }

    let reconciler = Reconciler::new(resolver, dns, store, notifier, settings.sub_domains)
        .with_dry_run(dry_run);

    match reconciler.check_and_update().await? {
        Outcome::Unchanged => {
            tracing::info!("No update needed, exiting");
        }
        Outcome::Updated { ip, rewritten } => {
            if rewritten.is_empty() {
                tracing::info!("External IP {ip} cached; DNS records were already current");
            } else {
                tracing::info!("DNS records updated to {ip}: {}", rewritten.join(", "));
            }
        }
    }

    Ok(())
}
