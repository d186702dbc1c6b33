pub mod error;
pub mod level;
pub mod response;
pub mod result;

pub use error::SessionError;
pub use level::{Advance, LevelSession, SessionState, Verdict};
pub use response::{BuildResponse, ChoiceResponse, Response, Segment, SimulationResponse};
pub use result::{LevelResult, QuestionOutcome};
