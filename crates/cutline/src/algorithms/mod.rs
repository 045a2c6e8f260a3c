pub mod sampling;
pub mod background;
pub mod morphology;
pub mod extraction;
pub mod simplification;
pub mod holes;

pub use sampling::*;
pub use background::*;
pub use morphology::*;
pub use extraction::*;
pub use simplification::*;
pub use holes::*;
