//! Sample sources for signal-window analysis.
//!
//! Everything here produces or persists a [`SampleWindow`]: a complete,
//! immutable, finite sequence of samples with its sample rate and channel
//! descriptor.
//!
//! - [`wfdb`]: decode prerecorded WFDB records (header + format-16 data file)
//! - [`capture`]: finite acquisition from a [`CaptureDevice`](capture::CaptureDevice)
//! - [`synthetic`]: seeded signal generators usable as capture devices
//! - [`text`]: tab-separated text export and import of captured windows

pub use self::window::{Channel, SampleWindow, SignalError};

pub mod capture;
pub mod synthetic;
pub mod text;
pub mod wfdb;
mod window;
