//! Async drive loops connecting feed subscriptions to the controllers
//!
//! The loops end when every subscription has ended. Wrap them in
//! `futures::future::abortable` to tear a page down; dropping the loop drops
//! its subscriptions.

use crate::clock::Clock;
use crate::dashboard::Dashboard;
use crate::simulator::Simulator;
use crate::views::{DashboardView, SimulatorView};
use clinker_data::{FeedEvent, Subscription};
use futures::stream::{self, StreamExt};
use std::cell::RefCell;
use std::rc::Rc;

/// Which dashboard subscription an event came from
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardUpdate {
    Live(FeedEvent),
    Alerts(FeedEvent),
}

/// Drain the live-data and alert subscriptions into the dashboard
pub async fn run_dashboard<V: DashboardView, C: Clock>(
    dashboard: Rc<RefCell<Dashboard<V, C>>>,
    live: Subscription,
    alerts: Subscription,
) {
    log::info!("Dashboard listening on {} and {}", live.path(), alerts.path());
    let mut updates = stream::select(
        live.map(DashboardUpdate::Live),
        alerts.map(DashboardUpdate::Alerts),
    );

    while let Some(update) = updates.next().await {
        let mut dashboard = dashboard.borrow_mut();
        match update {
            DashboardUpdate::Live(FeedEvent::Snapshot(value)) => {
                dashboard.apply_live_snapshot(value.as_ref());
            }
            DashboardUpdate::Alerts(FeedEvent::Snapshot(value)) => {
                dashboard.apply_alerts(value.as_ref());
            }
            DashboardUpdate::Live(FeedEvent::Error(e)) => {
                log::error!("live_data error: {e}");
            }
            DashboardUpdate::Alerts(FeedEvent::Error(e)) => {
                log::error!("alerts error: {e}");
            }
        }
    }
    log::info!("Dashboard subscriptions ended");
}

/// Mirror one raw feed path into the simulator
pub async fn run_simulator_mirror<V: SimulatorView, C: Clock>(
    simulator: Rc<RefCell<Simulator<V, C>>>,
    mut raw: Subscription,
) {
    log::info!("Simulator mirroring {}", raw.path());
    while let Some(event) = raw.next().await {
        match event {
            FeedEvent::Snapshot(value) => simulator.borrow_mut().apply_raw(value.as_ref()),
            FeedEvent::Error(e) => log::error!("{} error: {e}", raw.path()),
        }
    }
    log::info!("Simulator mirror ended");
}
