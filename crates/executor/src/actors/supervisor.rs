use std::{collections::HashMap, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant},
};
use tracing::{error, warn};
use uuid::Uuid;

use common::actors::{Actor, ActorType, ControlMessage};

type ActorFactory = Box<dyn Fn() -> Box<dyn Actor> + Send + Sync>;

/// Restarts registered actors when their heartbeat goes silent.
pub struct Supervisor {
    actor_factories: HashMap<ActorType, ActorFactory>,
    instances: HashMap<Uuid, ActorType>,
    pulses: HashMap<ActorType, Instant>,
    handles: HashMap<ActorType, JoinHandle<()>>,
    heartbeats: HashMap<ActorType, JoinHandle<()>>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            actor_factories: HashMap::new(),
            instances: HashMap::new(),
            pulses: HashMap::new(),
            handles: HashMap::new(),
            heartbeats: HashMap::new(),
        }
    }

    pub fn register_actor(&mut self, actor_type: ActorType, factory: ActorFactory) {
        self.actor_factories.insert(actor_type, factory);
    }

    pub async fn start(&mut self) {
        let mut check_interval = time::interval(Duration::from_secs(1));
        let timeout_duration = Duration::from_secs(3);

        let (supervisor_tx, mut supervisor_rx) = mpsc::channel::<ControlMessage>(512);

        let actors: Vec<ActorType> = self.actor_factories.keys().copied().collect();
        for actor in actors {
            self.spawn_actor(actor, supervisor_tx.clone());
        }

        loop {
            tokio::select! {
                Some(msg) = supervisor_rx.recv() => {
                    match msg {
                        ControlMessage::Heartbeat(id) => {
                            if let Some(&actor_type) = self.instances.get(&id) {
                                self.pulses.insert(actor_type, Instant::now());
                            }
                        }
                        ControlMessage::Shutdown(id) => {
                            if let Some(&actor_type) = self.instances.get(&id) {
                                warn!("{:?} is shutting down gracefully.", actor_type);
                                self.retire_instance(actor_type);
                            }
                        }
                        ControlMessage::Error(id, error_msg) => {
                            if let Some(&actor_type) = self.instances.get(&id) {
                                error!("Actor {:?} reported error: {}", actor_type, error_msg);
                                self.pulses.insert(actor_type, Instant::now());
                            }
                        }
                    }
                }

                _ = check_interval.tick() => {
                    let dead_timeout = Instant::now() - timeout_duration;
                    let mut dead_actors = Vec::new();

                    for (&actor_type, &pulse) in self.pulses.iter() {
                        if pulse < dead_timeout {
                            warn!("{:?} is unresponsive!", actor_type);
                            dead_actors.push(actor_type);
                        }
                    }

                    for actor_type in dead_actors {
                        self.spawn_actor(actor_type, supervisor_tx.clone());
                    }
                }
            }
        }
    }

    fn spawn_actor(&mut self, actor_type: ActorType, tx: mpsc::Sender<ControlMessage>) {
        self.retire_instance(actor_type);

        let mut new_actor = self.actor_factories[&actor_type]();
        let id = new_actor.id();
        let heartbeat = new_actor.spawn_heartbeat(tx.clone());

        let handle = tokio::spawn(async move {
            if let Err(e) = new_actor.run(tx).await {
                error!("Actor {:?} crashed: {}", actor_type, e);
            }
        });

        self.instances.insert(id, actor_type);
        self.handles.insert(actor_type, handle);
        self.heartbeats.insert(actor_type, heartbeat);
        self.pulses.insert(actor_type, Instant::now());
    }

    /// Drops all bookkeeping for the current instance of `actor_type`.
    /// The old heartbeat is aborted so a stale UUID can never refresh
    /// the pulse of a replacement instance.
    fn retire_instance(&mut self, actor_type: ActorType) {
        self.instances.retain(|_, kind| *kind != actor_type);
        self.pulses.remove(&actor_type);
        if let Some(handle) = self.handles.remove(&actor_type) {
            handle.abort();
        }
        if let Some(heartbeat) = self.heartbeats.remove(&actor_type) {
            heartbeat.abort();
        }
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}
