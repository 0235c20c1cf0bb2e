use rand::Rng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, StepError,
    core::{Bird, CollisionMask, Ground, PixelRect, Pipe},
};

use super::{
    cohort::{self, AgentId, Cohort},
    config::SimConfig,
    controller::{BoxedController, Sensors},
    seed::ObstacleSeed,
    snapshot::{AgentSnapshot, FrameSnapshot, ObstacleSnapshot},
};

/// Ticks each wing animation frame is shown for.
const WING_FRAME_TICKS: u64 = 5;
/// Number of wing animation frames.
const WING_FRAME_COUNT: u64 = 3;

/// Lifecycle state of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum SimState {
    /// At least one agent is alive.
    Running,
    /// Every agent has been eliminated (or a controller failed). Final.
    Terminal,
}

/// Why an agent was removed from the live set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum EliminationCause {
    #[display("hit a pipe")]
    Obstacle,
    #[display("hit the ground")]
    Ground,
    #[display("flew above the field")]
    Ceiling,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Elimination {
    pub agent: AgentId,
    pub cause: EliminationCause,
    /// Final, frozen fitness of the agent.
    pub fitness: f32,
}

/// Outcome of a single [`Simulation::step`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Number of ticks applied so far, including this one.
    pub tick: u64,
    pub score: u32,
    /// Agents still alive after the tick.
    pub alive: usize,
    /// Whether a pipe was passed (and the score incremented) during this tick.
    pub passed: bool,
    pub eliminations: Vec<Elimination>,
    pub state: SimState,
}

/// Step engine advancing a cohort through the obstacle course one tick at a time.
///
/// # Tick Algorithm
///
/// Each call to [`Simulation::step`] performs, in order:
///
/// 1. **Supply** - Spawn a pipe if there is none, or if the newest one has scrolled
///    `pipe_spacing` into the field
/// 2. **Track** - Pick the pipe agents sense: the first one, or the second once the
///    lead agent is past the first one's trailing edge. With no agent left the
///    simulation becomes [`SimState::Terminal`] without applying the tick
/// 3. **Agents** - For every living agent: survival reward, gravity, sensing,
///    controller query, flap/latch update
/// 4. **Pipes** - For every pipe: scroll, pixel-exact collision against every living
///    agent (penalty and elimination on hit), pass detection against the lead agent
/// 5. **Retire** - Drop pipes that scrolled past the leading edge
/// 6. **Bounds** - Eliminate agents touching the ground plane or above the field
/// 7. **Ground** - Scroll the ground tiles
/// 8. **Compact** - Drop dead agents from the live list and report
///
/// Score increases by at most one per tick, however many pipes or agents trigger
/// it, and the pass bonus goes to every agent alive at that point.
///
/// # Example
///
/// ```
/// use flappy_engine::{BoxedController, Idle, ObstacleSeed, SimConfig, Simulation};
///
/// let controllers: Vec<BoxedController> = vec![Box::new(Idle)];
/// let seed = ObstacleSeed::from_bytes([7; 16]);
/// let mut sim = Simulation::new(SimConfig::default(), seed, controllers).unwrap();
///
/// while sim.state().is_running() {
///     sim.step().unwrap();
/// }
/// // An idle bird drops from y=300 onto the ground in 27 ticks.
/// assert_eq!(sim.tick(), 27);
/// ```
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    seed: ObstacleSeed,
    rng: Pcg32,
    bird_mask: CollisionMask,
    top_pipe_mask: CollisionMask,
    bottom_pipe_mask: CollisionMask,
    cohort: Cohort,
    pipes: Vec<Pipe>,
    ground: Ground,
    score: u32,
    tick: u64,
    state: SimState,
}

impl Simulation {
    /// Spawns one agent per controller at the configured start position.
    pub fn new(
        config: SimConfig,
        seed: ObstacleSeed,
        controllers: Vec<BoxedController>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let bird_mask = config.bird_mask();
        let bottom_pipe_mask = config.pipe_mask();
        let top_pipe_mask = bottom_pipe_mask.flipped_vertical();
        #[expect(clippy::cast_precision_loss)]
        let template = Bird::new(
            config.spawn_x,
            config.spawn_y,
            config.bird_width as f32,
            config.bird_height as f32,
        );
        Ok(Self {
            cohort: Cohort::spawn(controllers, &template),
            ground: Ground::new(config.ground_y(), config.ground_tile_width),
            rng: seed.rng(),
            seed,
            bird_mask,
            top_pipe_mask,
            bottom_pipe_mask,
            pipes: Vec::new(),
            score: 0,
            tick: 0,
            state: SimState::Running,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> ObstacleSeed {
        self.seed
    }

    #[must_use]
    pub fn cohort(&self) -> &Cohort {
        &self.cohort
    }

    #[must_use]
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    #[must_use]
    pub fn ground(&self) -> &Ground {
        &self.ground
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn state(&self) -> SimState {
        self.state
    }

    /// Applies one tick.
    ///
    /// A controller error aborts the tick halfway and leaves the simulation
    /// terminal; its state should not be used for fitness afterwards.
    pub fn step(&mut self) -> Result<StepReport, StepError> {
        if self.state.is_terminal() {
            return Err(StepError::AlreadyTerminated);
        }

        self.ensure_pipe_supply();
        let Some(tracked) = self.tracked_pipe_index() else {
            self.state = SimState::Terminal;
            return Ok(self.report(false, Vec::new()));
        };

        self.tick += 1;
        if let Err(e) = self.update_agents(tracked) {
            self.state = SimState::Terminal;
            return Err(e);
        }

        let mut eliminations = Vec::new();
        let passed = self.update_pipes(&mut eliminations);
        self.pipes.retain(|pipe| !pipe.is_off_screen());
        self.check_bounds(&mut eliminations);
        self.ground.advance(self.config.scroll_speed);

        self.cohort.compact();
        if self.cohort.is_extinct() {
            self.state = SimState::Terminal;
        }
        Ok(self.report(passed, eliminations))
    }

    /// Captures everything a renderer needs to draw the current frame.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        #[expect(clippy::cast_possible_truncation)]
        let wing_frame = ((self.tick / WING_FRAME_TICKS) % WING_FRAME_COUNT) as u8;
        FrameSnapshot {
            tick: self.tick,
            score: self.score,
            alive: self.cohort.live_count(),
            agents: self
                .cohort
                .live_agents()
                .map(|agent| AgentSnapshot {
                    id: agent.id(),
                    hitbox: agent.bird().hitbox(),
                    velocity: agent.bird().velocity(),
                    wing_frame,
                })
                .collect(),
            obstacles: self
                .pipes
                .iter()
                .map(|pipe| ObstacleSnapshot {
                    top: pipe.top_segment(),
                    bottom: pipe.bottom_segment(),
                    passed: pipe.is_passed(),
                })
                .collect(),
            ground: self.ground.clone(),
        }
    }

    fn report(&self, passed: bool, eliminations: Vec<Elimination>) -> StepReport {
        StepReport {
            tick: self.tick,
            score: self.score,
            alive: self.cohort.live_count(),
            passed,
            eliminations,
            state: self.state,
        }
    }

    fn ensure_pipe_supply(&mut self) {
        if self.pipes.is_empty() {
            self.spawn_pipe();
        }
        let threshold = self.config.spawn_edge() - self.config.pipe_spacing;
        if self.pipes.last().is_some_and(|pipe| pipe.x() < threshold) {
            self.spawn_pipe();
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn spawn_pipe(&mut self) {
        let config = &self.config;
        let gap_top = self
            .rng
            .random_range(config.gap_top_min..=config.gap_top_max);
        self.pipes.push(Pipe::new(
            config.spawn_edge(),
            gap_top as f32,
            config.pipe_gap,
            config.pipe_width as f32,
            config.pipe_height as f32,
        ));
    }

    fn tracked_pipe_index(&self) -> Option<usize> {
        let lead = self.cohort.lead()?;
        let past_first = self
            .pipes
            .first()
            .is_some_and(|pipe| lead.bird().hitbox().left() > pipe.right());
        Some(if past_first && self.pipes.len() > 1 {
            1
        } else {
            0
        })
    }

    fn update_agents(&mut self, tracked: usize) -> Result<(), StepError> {
        let config = &self.config;
        let pipe = &self.pipes[tracked];
        let (live, agents) = self.cohort.split_mut();
        for id in live {
            let agent = &mut agents[id.index()];
            agent.reward(config.survival_reward);
            agent
                .bird_mut()
                .apply_gravity(config.gravity, config.max_fall_speed);

            let sensors = Sensors::measure(agent.bird(), pipe);
            let output = agent
                .controller()
                .activate(&sensors)
                .map_err(|source| StepError::Controller { agent: *id, source })?;
            if !output.is_finite() {
                return Err(StepError::MalformedOutput { agent: *id, output });
            }

            let bird = agent.bird_mut();
            if output > 0.0 {
                if !bird.is_flapping() {
                    bird.flap(config.flap_impulse);
                }
            } else {
                bird.release();
            }
        }
        Ok(())
    }

    fn update_pipes(&mut self, eliminations: &mut Vec<Elimination>) -> bool {
        let config = &self.config;
        let (live, agents) = self.cohort.split_mut();
        let mut passed = false;
        for pipe in &mut self.pipes {
            pipe.advance(config.scroll_speed);

            let top = pipe.top_segment().to_pixel();
            let bottom = pipe.bottom_segment().to_pixel();
            for id in live {
                let agent = &mut agents[id.index()];
                if !agent.is_alive() {
                    continue;
                }
                let hitbox = agent.bird().hitbox().to_pixel();
                let hit = masks_collide(&hitbox, &self.bird_mask, &top, &self.top_pipe_mask)
                    || masks_collide(&hitbox, &self.bird_mask, &bottom, &self.bottom_pipe_mask);
                if hit {
                    agent.eliminate(config.collision_penalty);
                    eliminations.push(Elimination {
                        agent: *id,
                        cause: EliminationCause::Obstacle,
                        fitness: agent.fitness(),
                    });
                }
            }

            if let Some(lead) = cohort::lead_of(live, agents)
                && pipe.try_pass(lead.bird().hitbox().left())
            {
                passed = true;
            }
        }

        if passed {
            self.score += 1;
            for id in live {
                let agent = &mut agents[id.index()];
                if agent.is_alive() {
                    agent.reward(config.pass_bonus);
                }
            }
        }
        passed
    }

    fn check_bounds(&mut self, eliminations: &mut Vec<Elimination>) {
        let ground_y = self.config.ground_y();
        let (live, agents) = self.cohort.split_mut();
        for id in live {
            let agent = &mut agents[id.index()];
            if !agent.is_alive() {
                continue;
            }
            let hitbox = agent.bird().hitbox();
            let cause = if hitbox.bottom() >= ground_y {
                EliminationCause::Ground
            } else if hitbox.top() < 0.0 {
                EliminationCause::Ceiling
            } else {
                continue;
            };
            agent.eliminate(0.0);
            eliminations.push(Elimination {
                agent: *id,
                cause,
                fitness: agent.fitness(),
            });
        }
    }
}

/// Bounding-box rejection followed by the pixel-exact mask test.
fn masks_collide(
    bird: &PixelRect,
    bird_mask: &CollisionMask,
    segment: &PixelRect,
    segment_mask: &CollisionMask,
) -> bool {
    bird.intersects(segment)
        && bird_mask
            .overlap(segment_mask, bird.offset_to(segment))
            .is_some()
}
