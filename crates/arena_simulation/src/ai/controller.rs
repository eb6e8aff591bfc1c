//! Combat AI controller, one per AI-controlled fighter.
//!
//! FSM: Idle → Chase → Attack → {Attack (combo) | Block | Retreat | Chase}
//!      Block → Attack | Chase (timed release)
//!      Retreat → Idle
//!
//! Tick order:
//! 1. due timed tasks (block release, delayed block entry)
//! 2. reactive block check (every tick, independent of the decision cadence)
//! 3. decision timer; once it reaches `decision_interval` it resets to zero
//!    and the current state's think function runs
//!
//! Nothing in here fails: a lost target forces Idle, a missing sensor or
//! attack signal just skips that branch.

use crate::ai::capabilities::{AgentContext, AgentId, RandomSource, TargetRegistry};
use crate::ai::config::AgentConfig;
use crate::ai::state::AIState;
use crate::ai::timers::{TaskKind, TaskQueue};
use crate::components::Facing;
use crate::logger::{self, LogLevel};

/// Idle → Chase chance per decision while the target is in range
const CHASE_CHANCE: f32 = 0.8;
/// Dodge chance per Chase/Retreat decision
const DODGE_CHANCE: f32 = 0.25;
/// Chase gives up beyond detection_range + this
const LOSE_INTEREST_MARGIN: f32 = 2.0;
/// Chase → Attack within ideal_attack_range + this
const ATTACK_ENTER_MARGIN: f32 = 0.1;
/// Attack → Chase beyond ideal_attack_range + this
const ATTACK_LEAVE_MARGIN: f32 = 0.5;
/// After a non-combo swing: draw < this → Block
const FOLLOW_UP_BLOCK: f32 = 0.3;
/// After a non-combo swing: draw < this → Retreat (else Chase)
const FOLLOW_UP_RETREAT: f32 = 0.5;
/// Shield hold time range (seconds)
const BLOCK_HOLD_MIN: f32 = 0.4;
const BLOCK_HOLD_MAX: f32 = 0.8;
/// Retreat ends beyond detection_range × this
const RETREAT_RANGE_FACTOR: f32 = 0.6;
/// Retreat ends when a draw exceeds this
const RETREAT_GIVE_UP: f32 = 0.7;
/// Reactive block only within ideal_attack_range × this
const REACTIVE_BLOCK_RANGE_FACTOR: f32 = 1.5;
/// Per-tick stand-in for "target is attacking" when no signal is wired
const ATTACK_GUESS_CHANCE: f32 = 0.08;

#[derive(Debug)]
pub struct CombatAiController<R: RandomSource> {
    id: AgentId,
    config: AgentConfig,
    rng: R,
    state: AIState,
    target: Option<AgentId>,
    target_acquired: bool,
    decision_timer: f32,
    action_cooldown_timer: f32,
    is_blocking: bool,
    tasks: TaskQueue,
}

impl<R: RandomSource> CombatAiController<R> {
    /// Builds a controller in Idle. The config is clamped on the way in.
    pub fn new(id: AgentId, config: AgentConfig, rng: R) -> Self {
        Self {
            id,
            config: config.sanitized(),
            rng,
            state: AIState::Idle,
            target: None,
            target_acquired: false,
            decision_timer: 0.0,
            action_cooldown_timer: 0.0,
            is_blocking: false,
            tasks: TaskQueue::new(),
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn state(&self) -> AIState {
        self.state
    }

    pub fn target(&self) -> Option<AgentId> {
        self.target
    }

    pub fn is_blocking(&self) -> bool {
        self.is_blocking
    }

    pub fn decision_timer(&self) -> f32 {
        self.decision_timer
    }

    pub fn action_cooldown_timer(&self) -> f32 {
        self.action_cooldown_timer
    }

    pub fn pending_tasks(&self) -> &TaskQueue {
        &self.tasks
    }

    /// One-shot opponent lookup. Later calls keep the first result, so a
    /// target is never re-acquired mid-fight.
    pub fn acquire_target(&mut self, registry: &dyn TargetRegistry) -> Option<AgentId> {
        if self.target_acquired {
            return self.target;
        }
        self.target_acquired = true;
        self.target = registry.find_opponent(self.id);
        match self.target {
            Some(target) => logger::log(&format!("AI {:?}: tracking {:?}", self.id, target)),
            None => logger::log_warning(&format!(
                "AI {:?}: no opponent found, staying Idle",
                self.id
            )),
        }
        self.transition_to(AIState::Idle);
        self.target
    }

    /// Drops every pending timed task (death, removal).
    pub fn cancel_pending(&mut self) {
        if !self.tasks.is_empty() {
            logger::log(&format!(
                "AI {:?}: discarding {} pending task(s)",
                self.id,
                self.tasks.len()
            ));
        }
        self.tasks.cancel_all();
    }

    /// Back to a fresh Idle (respawn). The target is kept.
    pub fn reset(&mut self) {
        self.tasks.cancel_all();
        self.state = AIState::Idle;
        self.decision_timer = 0.0;
        self.action_cooldown_timer = 0.0;
        self.is_blocking = false;
    }

    /// Advances the controller by `delta` seconds.
    ///
    /// Must be called every host tick regardless of the decision cadence.
    pub fn tick(&mut self, delta: f32, ctx: &mut AgentContext<'_>) {
        if !ctx.health.is_alive(self.id) {
            self.cancel_pending();
            return;
        }
        if !delta.is_finite() || delta < 0.0 {
            logger::log_warning(&format!("AI {:?}: ignoring bad tick delta {}", self.id, delta));
            return;
        }

        for task in self.tasks.advance(delta) {
            self.run_task(task, ctx);
        }

        self.update_block_logic(ctx);

        self.decision_timer += delta;
        self.action_cooldown_timer = (self.action_cooldown_timer - delta).max(0.0);

        if self.decision_timer >= self.config.decision_interval {
            self.decision_timer = 0.0;
            self.decide_next_action(ctx);
        }
    }

    // ========================================================================
    // Decisions
    // ========================================================================

    fn decide_next_action(&mut self, ctx: &mut AgentContext<'_>) {
        let Some(target) = self.live_target(ctx) else {
            if self.state != AIState::Idle {
                logger::log(&format!("AI {:?}: target lost", self.id));
            }
            self.transition_to(AIState::Idle);
            return;
        };

        match self.state {
            AIState::Idle => self.think_idle(target, ctx),
            AIState::Chase => self.think_chase(target, ctx),
            AIState::Attack => self.think_attack(target, ctx),
            AIState::Block => self.think_block(ctx),
            AIState::Retreat => self.think_retreat(target, ctx),
        }
    }

    fn think_idle(&mut self, target: AgentId, ctx: &mut AgentContext<'_>) {
        let distance = self.distance_to(target, ctx);
        if distance < self.config.detection_range {
            self.face_target(target, ctx);
            if self.rng.value() < CHASE_CHANCE {
                self.transition_to(AIState::Chase);
            }
        }
    }

    fn think_chase(&mut self, target: AgentId, ctx: &mut AgentContext<'_>) {
        let distance = self.distance_to(target, ctx);
        self.face_target(target, ctx);

        if distance > self.config.detection_range + LOSE_INTEREST_MARGIN {
            self.transition_to(AIState::Idle);
            return;
        }
        if distance <= self.config.ideal_attack_range + ATTACK_ENTER_MARGIN {
            self.transition_to(AIState::Attack);
            return;
        }

        if let Some(direction) = ctx.spatial.direction(self.id, target) {
            ctx.sink.move_horizontal(direction);
        }
        if self.rng.value() < DODGE_CHANCE {
            self.dodge(ctx);
        }
    }

    fn think_attack(&mut self, target: AgentId, ctx: &mut AgentContext<'_>) {
        let distance = self.distance_to(target, ctx);
        self.face_target(target, ctx);

        if distance > self.config.ideal_attack_range + ATTACK_LEAVE_MARGIN {
            self.transition_to(AIState::Chase);
            return;
        }
        if self.action_cooldown_timer > 0.0 {
            return;
        }

        ctx.sink.attack();
        self.action_cooldown_timer = self.config.action_cooldown;

        if self.rng.value() < self.config.random_aggression {
            // combo: stay in Attack
            return;
        }
        let follow_up = self.rng.value();
        if follow_up < FOLLOW_UP_BLOCK {
            self.transition_to(AIState::Block);
        } else if follow_up < FOLLOW_UP_RETREAT {
            self.transition_to(AIState::Retreat);
        } else {
            self.transition_to(AIState::Chase);
        }
    }

    /// Raises the shield unless a release is already pending, in which case
    /// the current block just keeps holding.
    fn think_block(&mut self, ctx: &mut AgentContext<'_>) {
        if self.tasks.is_pending(TaskKind::BlockRelease) {
            return;
        }
        if !self.is_blocking {
            self.is_blocking = true;
            ctx.sink.block(true);
        }
        let hold = self.rng.range(BLOCK_HOLD_MIN, BLOCK_HOLD_MAX);
        self.tasks.replace(TaskKind::BlockRelease, hold);
        if logger::enabled(LogLevel::Debug) {
            logger::log(&format!("AI {:?}: blocking for {:.2}s", self.id, hold));
        }
    }

    fn think_retreat(&mut self, target: AgentId, ctx: &mut AgentContext<'_>) {
        let distance = self.distance_to(target, ctx);
        self.face_target(target, ctx);

        if let Some(direction) = ctx.spatial.direction(self.id, target) {
            ctx.sink.move_horizontal(-direction);
        }
        if self.rng.value() < DODGE_CHANCE {
            self.dodge(ctx);
        }

        if distance > self.config.detection_range * RETREAT_RANGE_FACTOR
            || self.rng.value() > RETREAT_GIVE_UP
        {
            self.transition_to(AIState::Idle);
        }
    }

    // ========================================================================
    // Timed tasks & reactive block
    // ========================================================================

    fn run_task(&mut self, task: TaskKind, ctx: &mut AgentContext<'_>) {
        match task {
            TaskKind::BlockRelease => {
                self.is_blocking = false;
                ctx.sink.block(false);

                let distance = self.distance_to_target(ctx);
                if distance <= self.config.ideal_attack_range {
                    self.transition_to(AIState::Attack);
                } else {
                    self.transition_to(AIState::Chase);
                }
            }
            TaskKind::BlockEntry => {
                if !self.is_blocking && self.state != AIState::Block {
                    self.transition_to(AIState::Block);
                }
            }
        }
    }

    /// Reacts to an incoming swing by scheduling a Block after the reaction
    /// delay.
    fn update_block_logic(&mut self, ctx: &mut AgentContext<'_>) {
        if self.state == AIState::Block || self.is_blocking {
            return;
        }
        let Some(target) = self.live_target(ctx) else {
            return;
        };
        if self.distance_to(target, ctx)
            > self.config.ideal_attack_range * REACTIVE_BLOCK_RANGE_FACTOR
        {
            return;
        }

        let target_is_attacking = match ctx.attack_signal {
            Some(signal) => signal.is_attacking(target),
            None => self.rng.value() < ATTACK_GUESS_CHANCE,
        };

        if target_is_attacking && self.rng.value() < self.config.block_chance {
            self.tasks
                .schedule(TaskKind::BlockEntry, self.config.block_reaction_time);
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// The tracked target, if it still exists and is alive.
    fn live_target(&self, ctx: &AgentContext<'_>) -> Option<AgentId> {
        let target = self.target?;
        if ctx.health.is_alive(target) && ctx.spatial.position(target).is_some() {
            Some(target)
        } else {
            None
        }
    }

    fn distance_to(&self, target: AgentId, ctx: &AgentContext<'_>) -> f32 {
        ctx.spatial.distance(self.id, target).unwrap_or(f32::MAX)
    }

    fn distance_to_target(&self, ctx: &AgentContext<'_>) -> f32 {
        match self.live_target(ctx) {
            Some(target) => self.distance_to(target, ctx),
            None => f32::MAX,
        }
    }

    fn face_target(&mut self, target: AgentId, ctx: &mut AgentContext<'_>) {
        let Some(direction) = ctx.spatial.direction(self.id, target) else {
            return;
        };
        let facing = Facing::from_sign(direction);
        ctx.sink.face(facing);
        if let Some(sensor) = ctx.sink.melee_sensor() {
            sensor.set_orientation(facing.sign());
        }
    }

    fn dodge(&mut self, ctx: &mut AgentContext<'_>) {
        if self.rng.value() < self.config.roll_instead_of_jump_chance {
            ctx.sink.roll();
        } else {
            ctx.sink.jump();
        }
    }

    fn transition_to(&mut self, next: AIState) {
        if self.state != next && logger::enabled(LogLevel::Debug) {
            logger::log(&format!("AI {:?}: {:?} → {:?}", self.id, self.state, next));
        }
        self.state = next;
    }
}
