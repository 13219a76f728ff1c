use poker_house::systems::render::build_draw_list;
use poker_house::{
    EngineContext, FixedTimestep, Game, GameConfig, GameEvent, InputEvent, InputQueue, InputState,
    RenderBuffer, RenderContext,
};

/// Generic session runner that wires up the simulation loop.
///
/// Owns the game, its context, the pending input and the draw list. A window
/// layer (or a script) pushes input and calls [`SessionRunner::tick`] once per
/// rendered frame.
pub struct SessionRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    input_state: InputState,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
    /// Events of every step run by the last tick.
    frame_events: Vec<GameEvent>,
}

impl<G: Game> SessionRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let render_buffer = RenderBuffer::with_capacity(config.max_instances);

        Self {
            game,
            ctx: EngineContext::new(&config),
            input: InputQueue::new(),
            input_state: InputState::new(),
            render_buffer,
            timestep,
            config,
            initialized: false,
            frame_events: Vec::new(),
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        if self.initialized {
            log::warn!("session already initialized");
            return;
        }
        self.game.init(&mut self.ctx);
        self.initialized = true;
        log::info!(
            "session initialized: {} entities, {} bodies",
            self.ctx.scene.len(),
            self.ctx.physics.body_count()
        );
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: as many fixed steps as the accumulated time allows,
    /// then rebuild the draw list. Returns the number of steps run.
    ///
    /// Queued input is folded into the first step of the frame; a frame too
    /// short to run a step keeps its input for the next one.
    pub fn tick(&mut self, frame_dt: f32) -> u32 {
        if !self.initialized {
            return 0;
        }
        self.frame_events.clear();

        let steps = self.timestep.accumulate(frame_dt);
        let dt = self.timestep.dt();
        let mut pending = if steps > 0 { self.input.drain() } else { Vec::new() };

        for _ in 0..steps {
            self.ctx.clear_frame_data();
            self.input_state.begin_step(&pending);
            pending.clear();

            self.ctx.step_physics(dt);
            self.ctx.update_entities(dt);
            self.game.update(&mut self.ctx, &self.input_state);
            self.ctx.flush_despawns();

            self.frame_events.extend_from_slice(&self.ctx.events);
        }

        build_draw_list(&self.ctx.scene, &mut self.render_buffer);
        {
            let mut render_ctx = RenderContext {
                scene: &self.ctx.scene,
                render_buffer: &mut self.render_buffer,
            };
            self.game.render(&mut render_ctx);
        }
        steps
    }

    /// Gameplay events from every step of the last tick, in order.
    pub fn events(&self) -> &[GameEvent] {
        &self.frame_events
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poker_house::input::queue::Key;
    use poker_house::PokerHouse;

    fn runner() -> SessionRunner<PokerHouse> {
        let mut runner = SessionRunner::new(PokerHouse::default());
        runner.init();
        runner
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut runner = SessionRunner::new(PokerHouse::default());
        assert_eq!(runner.tick(1.0 / 60.0), 0);
        assert!(runner.context().scene.is_empty());
    }

    #[test]
    fn tick_runs_fixed_steps_and_draws() {
        let mut runner = runner();
        assert_eq!(runner.tick(1.0 / 30.0 + 1e-4), 2);
        assert!(runner.instance_count() > 0);
    }

    #[test]
    fn short_frames_keep_their_input() {
        let mut runner = runner();
        runner.push_input(InputEvent::KeyDown { key: Key::Forward });
        assert_eq!(runner.tick(0.001), 0);
        let start = runner.game().player().unwrap().position(runner.context()).unwrap();
        for _ in 0..30 {
            runner.tick(1.0 / 60.0);
        }
        let end = runner.game().player().unwrap().position(runner.context()).unwrap();
        assert!(end.z < start.z - 0.5, "player should walk forward: {} -> {}", start.z, end.z);
    }
}
