use glam::Vec3;
use log::{debug, warn};
use rapier3d::dynamics::{
    CCDSolver, ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet,
    RigidBody, RigidBodyHandle, RigidBodySet,
};
use rapier3d::geometry::{Collider, ColliderSet, DefaultBroadPhase, NarrowPhase};
use rapier3d::pipeline::PhysicsPipeline;

use crate::{
    config::WorldConfig,
    core::{
        mesh::VboMesh,
        object::{CollisionObject, ObjectKind},
    },
    utils::{
        allocator::{Arena, ObjectId},
        convert::{from_physics_vector, to_physics_vector},
        logging::ScopedTimer,
    },
};

/// Simulation world owning the engine state and every registered object.
///
/// Objects never reference the world; they are addressed through the
/// [`ObjectId`] handed out by [`DynamicsWorld::add`].
pub struct DynamicsWorld {
    config: WorldConfig,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    objects: Arena<CollisionObject>,
    time_accumulated: f64,
    elapsed: f64,
}

impl Default for DynamicsWorld {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl DynamicsWorld {
    pub fn new(config: WorldConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.time_step as f32;

        Self {
            config,
            integration_parameters,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            objects: Arena::new(),
            time_accumulated: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.config.gravity = gravity;
    }

    /// Simulated seconds advanced by the engine so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Inserts the object's body and collider and registers the object.
    ///
    /// Objects whose body is already in a world are registered as they are.
    pub fn add(&mut self, mut object: CollisionObject) -> ObjectId {
        let bodies = &mut self.bodies;
        let colliders = &mut self.colliders;
        object.insert_body(|desc| {
            let (body, collider) = desc.into_parts();
            let handle = bodies.insert(body);
            colliders.insert_with_parent(collider, handle, bodies);
            handle
        });

        // Mirror the inserted pose so the cache is valid before the first step.
        object.update(0.0, &self.bodies);
        let kind = object.kind();
        let id = self.objects.insert(object);
        debug!("added {kind:?} object {id:?}");
        id
    }

    /// Registers an object around a body the caller inserted through
    /// [`body_set_mut`](Self::body_set_mut). `collider`, when given, is
    /// attached to that body. Removing the object keeps the body and its
    /// colliders.
    pub fn attach(
        &mut self,
        handle: RigidBodyHandle,
        collider: Option<Collider>,
        vbo_mesh: VboMesh,
        kind: ObjectKind,
    ) -> ObjectId {
        if let Some(collider) = collider {
            self.colliders
                .insert_with_parent(collider, handle, &mut self.bodies);
        }
        let mut object = CollisionObject::attached(kind, handle, vbo_mesh);
        object.update(0.0, &self.bodies);
        self.objects.insert(object)
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// The engine runs whole fixed steps out of an accumulator, then every
    /// object is updated with `dt`. When `remove_expired` is set, objects
    /// whose age reached their lifespan are removed; their ids are returned.
    /// A non-finite `dt` still ages objects but never reaches the engine.
    pub fn step(&mut self, dt: f64) -> Vec<ObjectId> {
        let _timer = ScopedTimer::new("world::step");
        if dt.is_finite() {
            self.time_accumulated += dt;
        } else {
            warn!("ignoring non-finite step {dt} for the engine");
        }

        let time_step = self.config.time_step;
        let mut substeps = 0;
        while self.time_accumulated >= time_step && time_step > 0.0 {
            if substeps == self.config.max_substeps {
                warn!(
                    "dropping {:.4}s of simulation after {} substeps",
                    self.time_accumulated, substeps
                );
                self.time_accumulated = 0.0;
                break;
            }
            self.time_accumulated -= time_step;
            self.step_engine(time_step);
            substeps += 1;
        }

        {
            let _timer = ScopedTimer::new("world::update_objects");
            for (_, object) in self.objects.iter_mut() {
                object.update(dt, &self.bodies);
            }
        }

        if !self.config.remove_expired {
            return Vec::new();
        }
        let expired: Vec<ObjectId> = self
            .objects
            .iter()
            .filter(|(_, object)| object.is_expired())
            .map(|(id, _)| id)
            .collect();
        for id in &expired {
            self.remove(*id);
        }
        expired
    }

    fn step_engine(&mut self, time_step: f64) {
        self.integration_parameters.dt = time_step as f32;
        let gravity = to_physics_vector(self.config.gravity);
        self.pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
        self.elapsed += time_step;
    }

    /// Unregisters the object. A body the object owns is removed from the
    /// simulation together with its colliders.
    pub fn remove(&mut self, id: ObjectId) -> Option<CollisionObject> {
        let object = self.objects.remove(id)?;
        if let Some(handle) = object.body_handle().filter(|_| object.owns_body()) {
            self.bodies.remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
        debug!(
            "removed {:?} object {id:?} at age {:.3}s",
            object.kind(),
            object.age()
        );
        Some(object)
    }

    /// Removes every object, and the bodies they own.
    pub fn clear(&mut self) {
        for id in self.objects.ids() {
            self.remove(id);
        }
    }

    pub fn object(&self, id: ObjectId) -> Option<&CollisionObject> {
        self.objects.get(id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut CollisionObject> {
        self.objects.get_mut(id)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &CollisionObject)> + '_ {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.get(id).is_some()
    }

    pub fn rigid_body(&self, id: ObjectId) -> Option<&RigidBody> {
        let handle = self.objects.get(id)?.body_handle()?;
        self.bodies.get(handle)
    }

    pub fn rigid_body_mut(&mut self, id: ObjectId) -> Option<&mut RigidBody> {
        let handle = self.objects.get(id)?.body_handle()?;
        self.bodies.get_mut(handle)
    }

    /// Linear velocity of an object's body, in glam terms.
    pub fn linear_velocity(&self, id: ObjectId) -> Option<Vec3> {
        self.rigid_body(id)
            .map(|body| from_physics_vector(body.linvel()))
    }

    pub fn body_set(&self) -> &RigidBodySet {
        &self.bodies
    }

    pub fn body_set_mut(&mut self) -> &mut RigidBodySet {
        &mut self.bodies
    }

    pub fn collider_set(&self) -> &ColliderSet {
        &self.colliders
    }
}
