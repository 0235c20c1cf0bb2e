use serde::{Deserialize, Serialize};

use crate::core::Bird;

use super::controller::BoxedController;

/// Stable identifier of an agent within its cohort.
///
/// The id is the position of the agent's controller in the list the cohort was
/// spawned from, and it never changes while the generation runs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("#{_0}")]
pub struct AgentId(usize);

impl AgentId {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One agent: body, controller and fitness record, owned together.
#[derive(Debug)]
pub struct Agent {
    id: AgentId,
    bird: Bird,
    controller: BoxedController,
    fitness: f32,
    alive: bool,
}

impl Agent {
    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    #[must_use]
    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    #[must_use]
    pub fn fitness(&self) -> f32 {
        self.fitness
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn bird_mut(&mut self) -> &mut Bird {
        &mut self.bird
    }

    pub(crate) fn controller(&self) -> &BoxedController {
        &self.controller
    }

    pub(crate) fn reward(&mut self, amount: f32) {
        debug_assert!(self.alive, "fitness of {} is frozen", self.id);
        self.fitness += amount;
    }

    /// Kills the agent, subtracting `penalty` from its fitness one last time.
    pub(crate) fn eliminate(&mut self, penalty: f32) {
        debug_assert!(self.alive, "{} eliminated twice", self.id);
        self.fitness -= penalty;
        self.alive = false;
    }
}

/// Arena of every agent spawned for a generation.
///
/// Agents are never removed from the arena, so an [`AgentId`] indexes the same
/// body, controller and fitness record for the whole generation. Eliminations
/// during a tick only clear the agent's alive flag; [`Cohort::compact`] then drops
/// the dead ids from the live list once the tick is over.
///
/// # Example
///
/// ```
/// use flappy_engine::{Bird, BoxedController, Cohort, Idle};
///
/// let controllers: Vec<BoxedController> = vec![Box::new(Idle), Box::new(Idle)];
/// let cohort = Cohort::spawn(controllers, &Bird::new(200.0, 300.0, 34.0, 24.0));
///
/// assert_eq!(cohort.len(), 2);
/// assert_eq!(cohort.live_count(), 2);
/// assert_eq!(cohort.fitness_values(), vec![0.0, 0.0]);
/// ```
#[derive(Debug)]
pub struct Cohort {
    agents: Vec<Agent>,
    live: Vec<AgentId>,
}

impl Cohort {
    /// Spawns one agent per controller, every agent a copy of `template`.
    #[must_use]
    pub fn spawn(controllers: Vec<BoxedController>, template: &Bird) -> Self {
        let agents: Vec<Agent> = controllers
            .into_iter()
            .enumerate()
            .map(|(index, controller)| Agent {
                id: AgentId(index),
                bird: template.clone(),
                controller,
                fitness: 0.0,
                alive: true,
            })
            .collect();
        let live = agents.iter().map(Agent::id).collect();
        Self { agents, live }
    }

    /// Number of agents spawned, alive or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of agents in the live list.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_extinct(&self) -> bool {
        self.live.is_empty()
    }

    #[must_use]
    pub fn live_ids(&self) -> &[AgentId] {
        &self.live
    }

    #[must_use]
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.0)
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Iterates over the agents that are still alive, in id order.
    pub fn live_agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.live
            .iter()
            .map(|id| &self.agents[id.0])
            .filter(|agent| agent.alive)
    }

    /// The living agent furthest along the x axis, lowest id first on ties.
    #[must_use]
    pub fn lead(&self) -> Option<&Agent> {
        lead_of(&self.live, &self.agents)
    }

    /// Fitness of every spawned agent, indexed by [`AgentId`].
    #[must_use]
    pub fn fitness_values(&self) -> Vec<f32> {
        self.agents.iter().map(Agent::fitness).collect()
    }

    /// Splits the cohort into the live list and mutable access to the arena.
    pub(crate) fn split_mut(&mut self) -> (&[AgentId], &mut [Agent]) {
        (&self.live, &mut self.agents)
    }

    /// Drops eliminated agents from the live list.
    pub(crate) fn compact(&mut self) {
        let agents = &self.agents;
        self.live.retain(|id| agents[id.0].alive);
    }
}

pub(crate) fn lead_of<'a>(live: &[AgentId], agents: &'a [Agent]) -> Option<&'a Agent> {
    let mut lead: Option<&'a Agent> = None;
    for agent in live.iter().map(|id| &agents[id.0]).filter(|a| a.alive) {
        let left = agent.bird.hitbox().left();
        if lead.is_none_or(|lead| left > lead.bird.hitbox().left()) {
            lead = Some(agent);
        }
    }
    lead
}
