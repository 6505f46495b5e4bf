//! Platform layer
//!
//! Native scheduling of the simulation:
//! - Frame clock (fixed interval tick thread)
//! - Flap input from other threads
//! - Immediate cancellation on teardown

pub mod driver;

pub use driver::FrameDriver;
