// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Watch/queue controller loop.
//!
//! One event-source task feeds changed ingresses into an unbounded queue and a
//! fixed pool of workers competes for it. Each dequeued ingress is reconciled
//! once; failures are logged and the item is dropped. The next watch event or
//! periodic resync brings it back.
//!
//! # Lifecycle
//!
//! 1. [`initialize`] validates the options and selects the hosted zone
//! 2. [`run`] starts the event source and the workers
//! 3. Setting the shutdown signal stops the event source; workers drain the
//!    queue and [`run`] returns once the last one has exited

use crate::context::Context;
use crate::dnsprovider::DnsProvider;
use crate::errors::IngressDnsError;
use crate::federation::FederationClient;
use crate::ingress::FederatedIngress;
use crate::metrics;
use crate::options::Options;
use crate::reconcilers::{reconcile_ingress, retrieve_or_create_dns_zone};
use crate::resolver::EndpointResolver;
use futures::StreamExt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Receiving half of the work queue, shared by every worker.
type SharedQueue = Arc<Mutex<mpsc::UnboundedReceiver<FederatedIngress>>>;

/// What happened to one dequeued ingress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// No local load balancer endpoint; nothing was sent to the provider
    Skipped,
    /// Every cluster was reconciled
    Reconciled,
    /// At least one cluster failed; the item was dropped
    Failed,
}

/// Validate the options and select the hosted zone every record goes into.
///
/// # Errors
///
/// Returns [`IngressDnsError::Config`] for invalid options,
/// [`IngressDnsError::Unsupported`] if the provider cannot enumerate zones, and
/// [`IngressDnsError::ZoneResolution`] if the zone can be neither found nor
/// created. All of these are fatal.
pub async fn initialize(
    options: &Options,
    provider: &dyn DnsProvider,
    federation: Arc<dyn FederationClient>,
    resolver: Arc<dyn EndpointResolver>,
) -> Result<Context, IngressDnsError> {
    let settings = options.validate()?;

    let zones = provider.zones().ok_or(IngressDnsError::Unsupported {
        capability: "zone enumeration",
    })?;
    let zone = retrieve_or_create_dns_zone(&settings.domain, zones.as_ref()).await?;

    info!(
        zone = %zone.name(),
        domain = %settings.domain,
        federation = %settings.federation_name,
        "Hosted zone selected"
    );

    Ok(Context {
        zone,
        federation,
        resolver,
        settings,
    })
}

/// Process one dequeued ingress.
///
/// Ingresses without a local load balancer endpoint are skipped without any
/// provider call. Errors are logged and counted, never propagated: fatal ones
/// (configuration, missing provider capability) at error level, per-object ones
/// at warn level.
pub async fn process_item(ctx: &Context, ingress: &FederatedIngress) -> ItemOutcome {
    if !ingress.wants_dns_records() {
        debug!(ingress = %ingress, "No local load balancer endpoint, skipping");
        metrics::record_skipped();
        return ItemOutcome::Skipped;
    }

    let start = Instant::now();
    match reconcile_ingress(ctx, ingress).await {
        Ok(()) => {
            metrics::record_reconciliation_success(start.elapsed());
            debug!(ingress = %ingress, "Reconciled DNS records");
            ItemOutcome::Reconciled
        }
        Err(e) => {
            metrics::record_reconciliation_error(e.status_reason(), start.elapsed());
            if e.is_fatal() {
                error!(ingress = %ingress, reason = e.status_reason(), "Dropping ingress: {e}");
            } else {
                warn!(ingress = %ingress, reason = e.status_reason(), "Dropping ingress until next event: {e}");
            }
            ItemOutcome::Failed
        }
    }
}

/// Run the event source and `workers` workers until `shutdown` turns true.
///
/// `resync` re-lists every ingress at that interval; `None` disables it.
/// Returns after the queue has been drained.
pub async fn run(
    ctx: Arc<Context>,
    workers: usize,
    resync: Option<Duration>,
    shutdown: watch::Receiver<bool>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let queue: SharedQueue = Arc::new(Mutex::new(rx));

    let source = tokio::spawn(run_event_source(
        ctx.federation.clone(),
        tx,
        resync,
        shutdown,
    ));

    info!(workers, "Starting ingress DNS workers");
    let handles: Vec<_> = (0..workers.max(1))
        .map(|id| tokio::spawn(run_worker(id, ctx.clone(), queue.clone())))
        .collect();

    for result in futures::future::join_all(handles).await {
        if let Err(e) = result {
            error!("Worker task failed: {e}");
        }
    }
    if let Err(e) = source.await {
        error!("Event source task failed: {e}");
    }

    info!("Ingress DNS controller stopped");
}

async fn run_worker(id: usize, ctx: Arc<Context>, queue: SharedQueue) {
    debug!(worker = id, "Worker started");
    loop {
        let item = queue.lock().await.recv().await;
        let Some(ingress) = item else {
            break;
        };
        process_item(&ctx, &ingress).await;
    }
    debug!(worker = id, "Worker exiting, queue closed");
}

/// Feed watch events and periodic re-lists into the queue.
///
/// Dropping `queue` on return closes the channel, which lets the workers drain
/// and stop.
async fn run_event_source(
    federation: Arc<dyn FederationClient>,
    queue: mpsc::UnboundedSender<FederatedIngress>,
    resync: Option<Duration>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut events = federation.watch_ingresses();
    let mut ticker = resync.map(|period| {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    while !*shutdown.borrow() {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            event = events.next() => match event {
                Some(Ok(ingress)) => {
                    debug!(ingress = %ingress, deleted = ingress.deleted, "Enqueueing ingress");
                    if queue.send(ingress).is_err() {
                        break;
                    }
                }
                Some(Err(e)) => warn!("Ingress watch error: {e}"),
                None => {
                    warn!("Ingress watch stream ended");
                    break;
                }
            },
            () = next_tick(ticker.as_mut()) => {
                match federation.list_ingresses().await {
                    Ok(ingresses) => {
                        debug!(count = ingresses.len(), "Resync enqueueing every ingress");
                        for ingress in ingresses {
                            if queue.send(ingress).is_err() {
                                return;
                            }
                        }
                    }
                    Err(e) => warn!("Resync failed to list ingresses: {e}"),
                }
            }
        }
    }

    info!("Ingress event source stopped");
}

async fn next_tick(ticker: Option<&mut tokio::time::Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
