use std::collections::HashSet;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::frames::probe_frame::ETHERTYPE;
use crate::link::{FrameChannel, LinkLayer};
use crate::responder::{Responder, ResponderStats};

/// Starts one responder per interface and waits for all of them to stop.
pub struct Supervisor<C> {
    responders: Vec<Responder<C>>,
}

impl<C: FrameChannel> Supervisor<C> {
    /// Acquires every interface's address and channel before anything is started.
    ///
    /// The first failing interface aborts the whole setup; channels already opened are dropped.
    pub fn setup<L>(link: &L, names: &[String], cancel: &CancellationToken) -> Result<Self, Error>
    where
        L: LinkLayer<Channel = C>,
    {
        if names.is_empty() {
            return Err(Error::Config("no interface specified".to_string()));
        }

        let mut seen = HashSet::new();
        let mut responders = Vec::with_capacity(names.len());
        for name in names {
            if !seen.insert(name.as_str()) {
                return Err(Error::Config(format!("interface '{name}' given more than once")));
            }

            let interface = link.resolve_interface(name)?;
            let local_mac = link.local_mac(&interface)?;
            let channel = link.open_channel(&interface, ETHERTYPE)?;
            tracing::debug!("{name}: index {}, mac {local_mac}", interface.index);

            responders.push(Responder::new(
                interface.name,
                local_mac,
                channel,
                cancel.clone(),
            ));
        }

        Ok(Self { responders })
    }

    pub fn interfaces(&self) -> impl Iterator<Item = &str> {
        self.responders.iter().map(Responder::name)
    }

    /// Runs every responder concurrently until cancellation, then joins them all.
    pub async fn run(self) -> Vec<(String, ResponderStats)> {
        let mut workers = JoinSet::new();
        for responder in self.responders {
            let name = responder.name().to_string();
            tracing::info!("spawning responder for {name}");
            workers.spawn(async move { (name, responder.run().await) });
        }

        let mut stopped = Vec::with_capacity(workers.len());
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((name, stats)) => {
                    tracing::info!("responder for {name} joined");
                    stopped.push((name, stats));
                }
                Err(err) => tracing::error!("responder task failed: {err}"),
            }
        }
        stopped
    }
}
