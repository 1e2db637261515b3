//! Runner simulation
//!
//! All gameplay logic lives here:
//! - One owned `Simulation`, advanced by `tick` once per frame
//! - Seeded RNG only
//! - Deferred effects run off the simulation clock, never wall time
//! - No rendering or platform dependencies

pub mod abilities;
pub mod echo;
pub mod meter;
pub mod particles;
pub mod player;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod timers;
pub mod weather;

pub use echo::{Echo, EchoPathPoint, EchoPlayer, EchoRecorder};
pub use meter::{Ability, ResourceMeter};
pub use particles::{Particle, ParticleSystem};
pub use player::{PlayerBody, Stance};
pub use rng::{RandomSource, SimRng};
pub use snapshot::{Snapshot, SnapshotRing};
pub use state::{GamePhase, Simulation};
pub use terrain::{Collapse, Segment, TerrainStream};
pub use tick::{TickInput, sanitize_dt, tick};
pub use timers::{DeferredEffect, TimerQueue};
pub use weather::{Weather, WeatherController, WeatherModifiers};
