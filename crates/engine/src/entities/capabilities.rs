//! Capability table of an entity node.
//!
//! Each node carries one [`Capabilities`] table built from its template's
//! declared [`CapabilitySpec`]s when the node is instantiated. A node holds at
//! most one capability of each kind, except open-window buttons.
//!
//! Capabilities start unwired; the factory injects services and balance values
//! before the graph is frozen.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Weak};

use emberfall_domain::{
    CapabilitySpec, LootValueRange, MonsterTypeId, ProgressRole, SceneName, SpawnerId, Vec3,
    WindowId,
};

use super::graph::{EntityHandle, ParentRef, TargetRef};
use crate::infrastructure::ports::{
    GameStateMachine, InputMode, InputPort, RandomPort, StateMachineError, WindowPort,
    WorldDataHandle,
};
use crate::use_cases::factory::{EntityFactory, FactoryError};

/// Errors raised when a wired capability acts.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("{0} capability was never wired")]
    NotWired(&'static str),
    #[error("Entity factory is no longer alive")]
    FactoryDropped,
    #[error("Factory error: {0}")]
    Factory(#[from] FactoryError),
    #[error("State machine error: {0}")]
    StateMachine(#[from] StateMachineError),
}

// =============================================================================
// Capability Table
// =============================================================================

#[derive(Debug, Default)]
pub struct Capabilities {
    pub health: Option<Health>,
    pub actor_ui: Option<ActorUi>,
    pub hero_move: Option<HeroMove>,
    pub hero_attack: Option<HeroAttack>,
    pub attack: Option<Attack>,
    pub move_to_target: Option<MoveToTarget>,
    pub rotate_to_target: Option<RotateToTarget>,
    pub loot_spawner: Option<LootSpawner>,
    pub spawn_point: Option<SpawnPoint>,
    pub loot_piece: Option<LootPiece>,
    pub loot_counter: Option<LootCounter>,
    pub open_window_buttons: Vec<OpenWindowButton>,
    pub level_transfer: Option<LevelTransferTrigger>,
    pub progress: Option<ProgressRole>,
}

impl Capabilities {
    /// Build the table for a node at `anchor` from its declared capabilities.
    pub fn from_specs(
        specs: &[CapabilitySpec],
        progress: Option<ProgressRole>,
        anchor: ParentRef,
    ) -> Self {
        let mut table = Self {
            progress,
            ..Self::default()
        };
        for spec in specs {
            match spec {
                CapabilitySpec::Health { max } => table.health = Some(Health::new(*max)),
                CapabilitySpec::ActorUi => table.actor_ui = Some(ActorUi::default()),
                CapabilitySpec::HeroMove => table.hero_move = Some(HeroMove::default()),
                CapabilitySpec::HeroAttack => table.hero_attack = Some(HeroAttack::default()),
                CapabilitySpec::Attack => table.attack = Some(Attack::default()),
                CapabilitySpec::MoveToTarget => {
                    table.move_to_target = Some(MoveToTarget::default())
                }
                CapabilitySpec::RotateToTarget => {
                    table.rotate_to_target = Some(RotateToTarget::default())
                }
                CapabilitySpec::LootSpawner => table.loot_spawner = Some(LootSpawner::default()),
                CapabilitySpec::SpawnPoint => table.spawn_point = Some(SpawnPoint::new(anchor)),
                CapabilitySpec::LootPiece => table.loot_piece = Some(LootPiece::default()),
                CapabilitySpec::LootCounter => table.loot_counter = Some(LootCounter::default()),
                CapabilitySpec::OpenWindowButton { window } => table
                    .open_window_buttons
                    .push(OpenWindowButton::new(*window)),
                CapabilitySpec::LevelTransferTrigger { transfer_to } => {
                    table.level_transfer = Some(LevelTransferTrigger::new(transfer_to.clone()))
                }
            }
        }
        table
    }
}

// =============================================================================
// Combat
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Set both current and maximum to `hit_points`.
    pub fn reset(&mut self, hit_points: f32) {
        self.current = hit_points;
        self.max = hit_points;
    }
}

/// Health bar over an actor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorUi {
    shown: Option<Health>,
}

impl ActorUi {
    pub fn bind(&mut self, health: &Health) {
        self.shown = Some(*health);
    }

    pub fn shown(&self) -> Option<Health> {
        self.shown
    }
}

#[derive(Debug, Clone, Default)]
pub struct Attack {
    target: Option<TargetRef>,
    pub damage: f32,
    pub cleavage: f32,
    pub effective_distance: f32,
}

impl Attack {
    pub fn construct(&mut self, target: TargetRef) {
        self.target = Some(target);
    }

    pub fn target(&self) -> Option<&TargetRef> {
        self.target.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MoveToTarget {
    target: Option<TargetRef>,
    speed: f32,
}

impl MoveToTarget {
    pub fn construct(&mut self, target: TargetRef, speed: f32) {
        self.target = Some(target);
        self.speed = speed;
    }

    pub fn target(&self) -> Option<&TargetRef> {
        self.target.as_ref()
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }
}

#[derive(Debug, Clone, Default)]
pub struct RotateToTarget {
    target: Option<TargetRef>,
}

impl RotateToTarget {
    pub fn construct(&mut self, target: TargetRef) {
        self.target = Some(target);
    }

    pub fn target(&self) -> Option<&TargetRef> {
        self.target.as_ref()
    }
}

// =============================================================================
// Hero Input
// =============================================================================

#[derive(Clone, Default)]
pub struct HeroMove {
    input: Option<Arc<dyn InputPort>>,
}

impl HeroMove {
    pub fn construct(&mut self, input: Arc<dyn InputPort>) {
        self.input = Some(input);
    }

    /// Current movement request, or `None` when unwired or idle.
    pub fn movement(&self) -> Option<Vec3> {
        let axis = self.input.as_ref()?.axis();
        (axis != Vec3::ZERO).then_some(axis)
    }

    pub fn input_mode(&self) -> Option<InputMode> {
        self.input.as_ref().map(|input| input.mode())
    }
}

impl fmt::Debug for HeroMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeroMove")
            .field("wired", &self.input.is_some())
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct HeroAttack {
    input: Option<Arc<dyn InputPort>>,
}

impl HeroAttack {
    pub fn construct(&mut self, input: Arc<dyn InputPort>) {
        self.input = Some(input);
    }

    pub fn wants_attack(&self) -> bool {
        self.input
            .as_ref()
            .is_some_and(|input| input.is_attack_pressed())
    }

    pub fn is_wired(&self) -> bool {
        self.input.is_some()
    }
}

impl fmt::Debug for HeroAttack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeroAttack")
            .field("wired", &self.input.is_some())
            .finish()
    }
}

// =============================================================================
// Loot
// =============================================================================

/// Drops loot when its monster dies.
#[derive(Default)]
pub struct LootSpawner {
    factory: Option<Weak<dyn EntityFactory>>,
    random: Option<Arc<dyn RandomPort>>,
    value: Option<LootValueRange>,
}

impl LootSpawner {
    pub fn construct(&mut self, factory: Weak<dyn EntityFactory>, random: Arc<dyn RandomPort>) {
        self.factory = Some(factory);
        self.random = Some(random);
    }

    pub fn set_loot_value(&mut self, range: LootValueRange) {
        self.value = Some(range);
    }

    pub fn loot_value(&self) -> Option<LootValueRange> {
        self.value
    }

    pub fn is_wired(&self) -> bool {
        self.factory.is_some() && self.random.is_some()
    }

    /// Create a loot piece through the factory and give it a rolled value.
    pub async fn spawn_loot(&self) -> Result<EntityHandle, CapabilityError> {
        let factory = self
            .factory
            .as_ref()
            .ok_or(CapabilityError::NotWired("loot_spawner"))?
            .upgrade()
            .ok_or(CapabilityError::FactoryDropped)?;
        let random = self
            .random
            .as_ref()
            .ok_or(CapabilityError::NotWired("loot_spawner"))?;
        let range = self.value.ok_or(CapabilityError::NotWired("loot_spawner"))?;

        let loot = factory.create_loot().await?;
        let value = random.gen_range(range.min(), range.max());
        if let Some(piece) = loot.first(|c| c.loot_piece.as_ref()) {
            piece.set_value(value);
        }
        tracing::debug!(entity_id = %loot.id(), value, "Spawned loot");
        Ok(loot)
    }
}

impl fmt::Debug for LootSpawner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LootSpawner")
            .field("wired", &self.is_wired())
            .field("value", &self.value)
            .finish()
    }
}

/// A collectible loot piece.
#[derive(Default)]
pub struct LootPiece {
    world_data: Option<WorldDataHandle>,
    value: AtomicI32,
    picked_up: AtomicBool,
}

impl LootPiece {
    pub fn construct(&mut self, world_data: WorldDataHandle) {
        self.world_data = Some(world_data);
    }

    pub fn set_value(&self, value: i32) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn value(&self) -> i32 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn is_picked_up(&self) -> bool {
        self.picked_up.load(Ordering::Acquire)
    }

    /// Add this piece's value to the collected loot. Returns `false` if it was
    /// already picked up.
    pub async fn pick_up(&self) -> Result<bool, CapabilityError> {
        let world_data = self
            .world_data
            .as_ref()
            .ok_or(CapabilityError::NotWired("loot_piece"))?;
        if self.picked_up.swap(true, Ordering::AcqRel) {
            return Ok(false);
        }
        world_data.write().await.loot.collect(self.value());
        Ok(true)
    }
}

impl fmt::Debug for LootPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LootPiece")
            .field("wired", &self.world_data.is_some())
            .field("value", &self.value())
            .field("picked_up", &self.is_picked_up())
            .finish()
    }
}

/// HUD counter showing collected loot.
#[derive(Default)]
pub struct LootCounter {
    world_data: Option<WorldDataHandle>,
}

impl LootCounter {
    pub fn construct(&mut self, world_data: WorldDataHandle) {
        self.world_data = Some(world_data);
    }

    pub async fn count(&self) -> Result<i32, CapabilityError> {
        let world_data = self
            .world_data
            .as_ref()
            .ok_or(CapabilityError::NotWired("loot_counter"))?;
        Ok(world_data.read().await.loot.collected)
    }
}

impl fmt::Debug for LootCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LootCounter")
            .field("wired", &self.world_data.is_some())
            .finish()
    }
}

// =============================================================================
// Level Objects
// =============================================================================

/// Spawns a monster of its configured type on request.
pub struct SpawnPoint {
    anchor: ParentRef,
    id: Option<SpawnerId>,
    monster_type: Option<MonsterTypeId>,
    factory: Option<Weak<dyn EntityFactory>>,
}

impl SpawnPoint {
    pub fn new(anchor: ParentRef) -> Self {
        Self {
            anchor,
            id: None,
            monster_type: None,
            factory: None,
        }
    }

    pub fn construct(&mut self, factory: Weak<dyn EntityFactory>) {
        self.factory = Some(factory);
    }

    pub fn set_id(&mut self, id: SpawnerId) {
        self.id = Some(id);
    }

    pub fn set_monster_type(&mut self, monster_type: MonsterTypeId) {
        self.monster_type = Some(monster_type);
    }

    pub fn id(&self) -> Option<&SpawnerId> {
        self.id.as_ref()
    }

    pub fn monster_type(&self) -> Option<&MonsterTypeId> {
        self.monster_type.as_ref()
    }

    pub fn anchor(&self) -> ParentRef {
        self.anchor
    }

    /// Ask the factory for a monster parented to this spawn point.
    pub async fn spawn(&self) -> Result<EntityHandle, CapabilityError> {
        let monster_type = self
            .monster_type
            .as_ref()
            .ok_or(CapabilityError::NotWired("spawn_point"))?;
        let factory = self
            .factory
            .as_ref()
            .ok_or(CapabilityError::NotWired("spawn_point"))?
            .upgrade()
            .ok_or(CapabilityError::FactoryDropped)?;
        let monster = factory.create_monster(monster_type, self.anchor).await?;
        Ok(monster)
    }
}

impl fmt::Debug for SpawnPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnPoint")
            .field("anchor", &self.anchor)
            .field("id", &self.id)
            .field("monster_type", &self.monster_type)
            .field("wired", &self.factory.is_some())
            .finish()
    }
}

pub struct OpenWindowButton {
    window: WindowId,
    windows: Option<Arc<dyn WindowPort>>,
}

impl OpenWindowButton {
    pub fn new(window: WindowId) -> Self {
        Self {
            window,
            windows: None,
        }
    }

    pub fn init(&mut self, windows: Arc<dyn WindowPort>) {
        self.windows = Some(windows);
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn is_wired(&self) -> bool {
        self.windows.is_some()
    }

    pub fn click(&self) -> Result<(), CapabilityError> {
        let windows = self
            .windows
            .as_ref()
            .ok_or(CapabilityError::NotWired("open_window_button"))?;
        windows.open(self.window);
        Ok(())
    }
}

impl fmt::Debug for OpenWindowButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWindowButton")
            .field("window", &self.window)
            .field("wired", &self.is_wired())
            .finish()
    }
}

/// Requests a level change the first time the hero enters it.
pub struct LevelTransferTrigger {
    transfer_to: SceneName,
    state_machine: Option<Arc<dyn GameStateMachine>>,
    triggered: AtomicBool,
}

impl LevelTransferTrigger {
    pub fn new(transfer_to: SceneName) -> Self {
        Self {
            transfer_to,
            state_machine: None,
            triggered: AtomicBool::new(false),
        }
    }

    pub fn construct(&mut self, state_machine: Arc<dyn GameStateMachine>) {
        self.state_machine = Some(state_machine);
    }

    pub fn transfer_to(&self) -> &SceneName {
        &self.transfer_to
    }

    pub fn is_wired(&self) -> bool {
        self.state_machine.is_some()
    }

    /// Returns `true` if this call requested the transition.
    pub fn trigger(&self) -> Result<bool, CapabilityError> {
        let state_machine = self
            .state_machine
            .as_ref()
            .ok_or(CapabilityError::NotWired("level_transfer_trigger"))?;
        if self.triggered.swap(true, Ordering::AcqRel) {
            return Ok(false);
        }
        state_machine.enter_level(&self.transfer_to)?;
        Ok(true)
    }
}

impl fmt::Debug for LevelTransferTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelTransferTrigger")
            .field("transfer_to", &self.transfer_to)
            .field("wired", &self.is_wired())
            .field("triggered", &self.triggered.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockGameStateMachine, MockWindowPort};
    use emberfall_domain::{EntityId, WorldData};
    use tokio::sync::RwLock;

    fn anchor() -> ParentRef {
        ParentRef::new(EntityId::new(), Vec3::new(3.0, 0.0, 1.0))
    }

    #[test]
    fn table_is_built_from_specs() {
        let specs = vec![
            CapabilitySpec::Health { max: 5.0 },
            CapabilitySpec::Attack,
            CapabilitySpec::OpenWindowButton {
                window: WindowId::Shop,
            },
            CapabilitySpec::OpenWindowButton {
                window: WindowId::Settings,
            },
        ];
        let table = Capabilities::from_specs(&specs, Some(ProgressRole::Writer), anchor());
        assert_eq!(table.health, Some(Health::new(5.0)));
        assert!(table.attack.is_some());
        assert!(table.move_to_target.is_none());
        assert_eq!(table.open_window_buttons.len(), 2);
        assert_eq!(table.progress, Some(ProgressRole::Writer));
    }

    #[test]
    fn spawn_point_remembers_anchor() {
        let at = anchor();
        let table = Capabilities::from_specs(&[CapabilitySpec::SpawnPoint], None, at);
        assert_eq!(table.spawn_point.map(|s| s.anchor()), Some(at));
    }

    #[test]
    fn health_reset_sets_both_values() {
        let mut health = Health::new(1.0);
        health.current = 0.5;
        health.reset(10.0);
        assert_eq!(health, Health { current: 10.0, max: 10.0 });
    }

    #[tokio::test]
    async fn loot_piece_collects_once() {
        let world_data = Arc::new(RwLock::new(WorldData::default()));
        let mut piece = LootPiece::default();
        piece.construct(world_data.clone());
        piece.set_value(4);

        assert!(piece.pick_up().await.unwrap());
        assert!(!piece.pick_up().await.unwrap());
        assert_eq!(world_data.read().await.loot.collected, 4);
    }

    #[tokio::test]
    async fn unwired_loot_piece_errors() {
        let piece = LootPiece::default();
        assert!(matches!(
            piece.pick_up().await,
            Err(CapabilityError::NotWired("loot_piece"))
        ));
    }

    #[tokio::test]
    async fn loot_counter_reads_world_data() {
        let world_data = Arc::new(RwLock::new(WorldData::default()));
        world_data.write().await.loot.collect(9);
        let mut counter = LootCounter::default();
        counter.construct(world_data);
        assert_eq!(counter.count().await.unwrap(), 9);
    }

    #[test]
    fn button_opens_its_window() {
        let mut windows = MockWindowPort::new();
        windows
            .expect_open()
            .withf(|w| *w == WindowId::Shop)
            .times(1)
            .return_const(());

        let mut button = OpenWindowButton::new(WindowId::Shop);
        assert!(button.click().is_err());
        button.init(Arc::new(windows));
        button.click().unwrap();
    }

    #[test]
    fn level_transfer_fires_once() {
        let mut state_machine = MockGameStateMachine::new();
        state_machine
            .expect_enter_level()
            .withf(|scene| scene.as_str() == "Dungeon")
            .times(1)
            .returning(|_| Ok(()));

        let mut trigger = LevelTransferTrigger::new(SceneName::new("Dungeon").unwrap());
        trigger.construct(Arc::new(state_machine));
        assert!(trigger.trigger().unwrap());
        assert!(!trigger.trigger().unwrap());
    }

    #[test]
    fn level_transfer_surfaces_closed_state_machine() {
        let mut state_machine = MockGameStateMachine::new();
        state_machine
            .expect_enter_level()
            .returning(|_| Err(StateMachineError::Closed));

        let mut trigger = LevelTransferTrigger::new(SceneName::new("Dungeon").unwrap());
        trigger.construct(Arc::new(state_machine));
        assert!(matches!(
            trigger.trigger(),
            Err(CapabilityError::StateMachine(StateMachineError::Closed))
        ));
    }

    #[tokio::test]
    async fn loot_spawner_reports_dropped_factory() {
        let factory: Arc<dyn EntityFactory> =
            Arc::new(crate::use_cases::factory::MockEntityFactory::new());
        let weak = Arc::downgrade(&factory);
        drop(factory);

        let mut spawner = LootSpawner::default();
        spawner.construct(weak, Arc::new(crate::infrastructure::random::FixedRandom(1)));
        spawner.set_loot_value(LootValueRange::new(1, 2).unwrap());
        assert!(matches!(
            spawner.spawn_loot().await,
            Err(CapabilityError::FactoryDropped)
        ));
    }
}
