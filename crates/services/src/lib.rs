#![forbid(unsafe_code)]

pub mod error;
pub mod events;
pub mod picker;
pub mod quiz_loop;

pub use quiz_core::time::Clock;

pub use error::QuizLoadError;
pub use events::SessionEvents;
pub use picker::UniformPicker;
pub use quiz_loop::{QuizLoopService, SessionAnswerResult};
