//! Run & Collapse - a side-scrolling runner on collapsing terrain
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (terrain, player, abilities, weather)
//! - `tuning`: Data-driven game balance
//! - `view`: Read-only frame output for renderers and the HUD

pub mod sim;
pub mod tuning;
pub mod view;

pub use sim::{Simulation, TickInput};
pub use tuning::Tuning;
pub use view::{Hud, WorldView};

/// Fixed simulation constants
pub mod consts {
    /// Longest frame a single tick integrates (seconds)
    pub const MAX_FRAME_DT: f64 = 0.05;
    /// Nominal frame rate the history depths are sized for
    pub const FRAME_RATE: f64 = 60.0;

    /// Rewind history depth (~2s at 60 Hz)
    pub const SNAPSHOT_CAPACITY: usize = 120;
    /// Echo path length (~1.5s at 60 Hz)
    pub const ECHO_CAPACITY: usize = 90;
}
