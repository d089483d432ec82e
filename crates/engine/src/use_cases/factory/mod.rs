//! Entity factory use case.
//!
//! One creation operation per entity category. Each operation loads a
//! template through the [`AssetSource`], instantiates it, wires its
//! capabilities to the runtime services and registers its progress
//! participants. Registration happens only after wiring succeeded, so a
//! failed creation never touches the [`ProgressRegistry`].
//!
//! A creation remembers the registry generation it started in. If a
//! [`EntityFactory::cleanup`] completes while the template is loading, the
//! result is discarded with [`FactoryError::Invalidated`].

mod error;
mod wiring;


use std::sync::{Arc, Weak};

use async_trait::async_trait;
use emberfall_domain::{
    AssetAddress, DomainError, MonsterTypeId, SpawnerId, Transform, Vec3,
};
use futures_util::future;
use tokio::sync::RwLock;

use crate::entities::{Entity, EntityHandle, EntityNode, ParentRef, TargetRef};
use crate::infrastructure::ports::{
    AssetSource, GameStateMachine, InputPort, ProgressPort, RandomPort, StaticDataPort,
    WindowPort,
};
use crate::stores::ProgressRegistry;

pub use error::FactoryError;

/// Runtime services injected into created entities.
#[derive(Clone)]
pub struct FactoryServices {
    pub assets: Arc<dyn AssetSource>,
    pub static_data: Arc<dyn StaticDataPort>,
    pub random: Arc<dyn RandomPort>,
    pub input: Arc<dyn InputPort>,
    pub windows: Arc<dyn WindowPort>,
    pub progress: Arc<dyn ProgressPort>,
    pub state_machine: Arc<dyn GameStateMachine>,
}

/// Template addresses of the fixed entity categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetAddresses {
    pub hero: AssetAddress,
    pub hud: AssetAddress,
    pub loot: AssetAddress,
    pub spawner: AssetAddress,
    pub level_transfer_trigger: AssetAddress,
}

impl AssetAddresses {
    pub const HERO: &'static str = "hero";
    pub const HUD: &'static str = "hud";
    pub const LOOT: &'static str = "loot";
    pub const SPAWNER: &'static str = "spawner";
    pub const LEVEL_TRANSFER_TRIGGER: &'static str = "level_transfer_trigger";

    /// The standard key set.
    pub fn standard() -> Result<Self, DomainError> {
        Ok(Self {
            hero: AssetAddress::new(Self::HERO)?,
            hud: AssetAddress::new(Self::HUD)?,
            loot: AssetAddress::new(Self::LOOT)?,
            spawner: AssetAddress::new(Self::SPAWNER)?,
            level_transfer_trigger: AssetAddress::new(Self::LEVEL_TRANSFER_TRIGGER)?,
        })
    }
}

/// Creation operations available to the orchestrator and to entities that
/// spawn other entities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityFactory: Send + Sync {
    /// Pre-load the loot and spawner templates.
    async fn warm_up(&self) -> Result<(), FactoryError>;

    async fn create_hero(&self, at: Vec3) -> Result<EntityHandle, FactoryError>;

    async fn create_hud(&self) -> Result<EntityHandle, FactoryError>;

    async fn create_loot(&self) -> Result<EntityHandle, FactoryError>;

    /// Create a monster of `type_id` as a child of `parent`, at its position.
    async fn create_monster(
        &self,
        type_id: &MonsterTypeId,
        parent: ParentRef,
    ) -> Result<EntityHandle, FactoryError>;

    async fn create_spawner(
        &self,
        id: SpawnerId,
        at: Vec3,
        monster_type: MonsterTypeId,
    ) -> Result<EntityHandle, FactoryError>;

    async fn create_level_transfer(&self, at: Vec3) -> Result<EntityHandle, FactoryError>;

    /// Forget the hero, empty the progress registry and release cached
    /// templates. Safe to call repeatedly.
    async fn cleanup(&self);
}

/// The entity factory of a level session.
pub struct GameFactory {
    services: FactoryServices,
    addresses: AssetAddresses,
    registry: Arc<ProgressRegistry>,
    hero: RwLock<Option<TargetRef>>,
    self_ref: Weak<GameFactory>,
}

impl GameFactory {
    pub fn new(
        services: FactoryServices,
        addresses: AssetAddresses,
        registry: Arc<ProgressRegistry>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            services,
            addresses,
            registry,
            hero: RwLock::new(None),
            self_ref: self_ref.clone(),
        })
    }

    pub fn registry(&self) -> &Arc<ProgressRegistry> {
        &self.registry
    }

    pub fn addresses(&self) -> &AssetAddresses {
        &self.addresses
    }

    /// The hero of the current level, if one was created and is still alive.
    pub async fn hero(&self) -> Option<EntityHandle> {
        self.hero.read().await.as_ref().and_then(TargetRef::upgrade)
    }

    fn back_ref(&self) -> Weak<dyn EntityFactory> {
        self.self_ref.clone()
    }

    /// Instantiate a root entity, remembering the generation it started in.
    async fn instantiate(
        &self,
        address: &AssetAddress,
        at: Option<Vec3>,
    ) -> Result<(EntityNode, u64), FactoryError> {
        let generation = self.registry.generation().await;
        let node = self
            .services
            .assets
            .instantiate(address, at)
            .await
            .map_err(|e| {
                tracing::warn!(address = %address, error = %e, "Failed to instantiate template");
                e
            })?;
        Ok((node, generation))
    }

    /// Freeze a wired graph and register its progress participants.
    async fn finish(
        &self,
        address: &AssetAddress,
        node: EntityNode,
        generation: u64,
    ) -> Result<EntityHandle, FactoryError> {
        let entity = Arc::new(Entity::new(address.clone(), node));
        if let Err(stale) = self.registry.register(&entity, generation).await {
            tracing::warn!(
                address = %address,
                expected = stale.expected,
                current = stale.current,
                "Discarding entity created across a cleanup"
            );
            return Err(FactoryError::Invalidated {
                address: address.clone(),
            });
        }

        tracing::info!(entity_id = %entity.id(), address = %address, "Created entity");
        Ok(entity)
    }
}

#[async_trait]
impl EntityFactory for GameFactory {
    async fn warm_up(&self) -> Result<(), FactoryError> {
        let assets = &self.services.assets;
        // Both loads run to completion even if one fails.
        let (loot, spawner) = future::join(
            assets.load(&self.addresses.loot),
            assets.load(&self.addresses.spawner),
        )
        .await;
        loot?;
        spawner?;
        tracing::debug!("Warmed up loot and spawner templates");
        Ok(())
    }

    async fn create_hero(&self, at: Vec3) -> Result<EntityHandle, FactoryError> {
        let address = &self.addresses.hero;
        let (mut node, generation) = self.instantiate(address, Some(at)).await?;

        let input = &self.services.input;
        wiring::require_mut(&mut node, address, "hero_attack", |c| c.hero_attack.as_mut())?
            .construct(input.clone());
        wiring::require_mut(&mut node, address, "hero_move", |c| c.hero_move.as_mut())?
            .construct(input.clone());

        let hero = self.finish(address, node, generation).await?;

        let mut current = self.hero.write().await;
        if self.registry.generation().await != generation {
            return Err(FactoryError::Invalidated {
                address: address.clone(),
            });
        }
        *current = Some(TargetRef::new(&hero));
        Ok(hero)
    }

    async fn create_hud(&self) -> Result<EntityHandle, FactoryError> {
        let address = &self.addresses.hud;
        let (mut node, generation) = self.instantiate(address, None).await?;

        wiring::require_mut(&mut node, address, "loot_counter", |c| c.loot_counter.as_mut())?
            .construct(self.services.progress.world_data());

        let windows = &self.services.windows;
        let buttons = wiring::broadcast(
            &mut node,
            |c| &mut c.open_window_buttons[..],
            |button| button.init(windows.clone()),
        );
        tracing::debug!(address = %address, buttons, "Wired window buttons");

        self.finish(address, node, generation).await
    }

    async fn create_loot(&self) -> Result<EntityHandle, FactoryError> {
        let address = &self.addresses.loot;
        let (mut node, generation) = self.instantiate(address, None).await?;

        wiring::require_mut(&mut node, address, "loot_piece", |c| c.loot_piece.as_mut())?
            .construct(self.services.progress.world_data());

        self.finish(address, node, generation).await
    }

    async fn create_monster(
        &self,
        type_id: &MonsterTypeId,
        parent: ParentRef,
    ) -> Result<EntityHandle, FactoryError> {
        let descriptor = self.services.static_data.monster(type_id).map_err(|e| {
            tracing::warn!(type_id = %type_id, error = %e, "Monster lookup failed");
            e
        })?;

        // Read before the hero so a cleanup in between is caught at registration.
        let generation = self.registry.generation().await;
        let hero = self
            .hero
            .read()
            .await
            .clone()
            .filter(|hero| hero.upgrade().is_some())
            .ok_or(FactoryError::HeroNotSpawned)?;

        let address = &descriptor.template;
        let template = self.services.assets.load(address).await.map_err(|e| {
            tracing::warn!(type_id = %type_id, address = %address, error = %e, "Failed to load monster template");
            e
        })?;
        let mut node =
            EntityNode::instantiate(&template, Transform::at(parent.position), Some(parent.id));

        let root = node.capabilities_mut();
        let health = root
            .health
            .as_mut()
            .ok_or_else(|| FactoryError::missing(address, "health"))?;
        health.reset(descriptor.hit_points);
        let health = *health;
        if let Some(actor_ui) = root.actor_ui.as_mut() {
            actor_ui.bind(&health);
        }

        let attack = root
            .attack
            .as_mut()
            .ok_or_else(|| FactoryError::missing(address, "attack"))?;
        attack.construct(hero.clone());
        attack.damage = descriptor.damage;
        attack.cleavage = descriptor.attack_cleavage;
        attack.effective_distance = descriptor.effective_distance;

        if let Some(move_to) = root.move_to_target.as_mut() {
            move_to.construct(hero.clone(), descriptor.move_speed);
        }
        if let Some(rotate_to) = root.rotate_to_target.as_mut() {
            rotate_to.construct(hero);
        }

        if let Some(loot_spawner) = wiring::first_mut(&mut node, |c| c.loot_spawner.as_mut()) {
            loot_spawner.construct(self.back_ref(), self.services.random.clone());
            loot_spawner.set_loot_value(descriptor.loot);
        }

        let monster = self.finish(address, node, generation).await?;
        tracing::debug!(
            entity_id = %monster.id(),
            type_id = %type_id,
            parent_id = %parent.id,
            "Spawned monster"
        );
        Ok(monster)
    }

    async fn create_spawner(
        &self,
        id: SpawnerId,
        at: Vec3,
        monster_type: MonsterTypeId,
    ) -> Result<EntityHandle, FactoryError> {
        let address = &self.addresses.spawner;
        let (mut node, generation) = self.instantiate(address, Some(at)).await?;

        let spawn_point =
            wiring::require_mut(&mut node, address, "spawn_point", |c| c.spawn_point.as_mut())?;
        spawn_point.construct(self.back_ref());
        spawn_point.set_monster_type(monster_type);
        spawn_point.set_id(id);

        self.finish(address, node, generation).await
    }

    async fn create_level_transfer(&self, at: Vec3) -> Result<EntityHandle, FactoryError> {
        let address = &self.addresses.level_transfer_trigger;
        let (mut node, generation) = self.instantiate(address, Some(at)).await?;

        wiring::require_mut(&mut node, address, "level_transfer", |c| {
            c.level_transfer.as_mut()
        })?
        .construct(self.services.state_machine.clone());

        self.finish(address, node, generation).await
    }

    async fn cleanup(&self) {
        {
            // Held across the generation bump so no hero of the new
            // generation can be set and then erased.
            let mut hero = self.hero.write().await;
            self.registry.cleanup().await;
            hero.take();
        }
        self.services.assets.cleanup().await;
        tracing::info!("Entity factory cleaned up");
    }
}
