pub mod collision;
pub mod controls;
pub mod physics;
pub mod race;
pub mod rigid_body;
pub mod spatial;

pub use collision::{CollisionComponent, CollisionContact, CollisionEvent};
pub use controls::PilotInput;
pub use physics::PhysicsComponent;
pub use race::{GateEvent, GateEventKind, GatePassageEvent, RaceProgress, RaceStatus};
pub use rigid_body::RigidBodyState;
pub use spatial::{PreviousPosition, SpatialComponent};
