pub mod clock;
pub mod color;
pub mod constants;
pub mod displacement;
pub mod error;
pub mod feedback;
pub mod indent;
pub mod mesh;
pub mod projection;
pub mod scene;
pub mod synth;
pub mod tracker;

pub use clock::SceneClock;
pub use error::FeedbackError;
pub use feedback::*;
pub use indent::*;
pub use projection::*;
pub use scene::*;
pub use tracker::*;
