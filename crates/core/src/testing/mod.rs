//! Testing utilities and mock implementations.
//!
//! Mock encoder and probe allow full engine runs against real temp
//! directories without ffmpeg installed.

mod mock_encoder;
mod mock_probe;

pub use mock_encoder::MockEncoder;
pub use mock_probe::MockProbe;
