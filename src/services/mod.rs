//! Request services.
//!
//! Each service turns a [`StudyInput`] into a prompt, asks the
//! [`TextGenerator`] for a reply, and interprets the reply:
//! - [`ExplainService`]: explanation and step-by-step solution
//! - [`MindMapService`]: mind-map tree
//!
//! Both share [`ServiceCore`].

mod explain;
mod input;
mod mind_map;

pub use explain::*;
pub use input::*;
pub use mind_map::*;

use std::sync::Arc;

use crate::gemini::TextGenerator;
use crate::interpreter::ResponseInterpreter;

/// Infrastructure shared by all services.
///
/// Holds the generator used for upstream calls and the interpreter used on
/// its replies. Cloning is cheap; the generator sits behind an [`Arc`].
#[derive(Clone)]
pub struct ServiceCore {
    generator: Arc<dyn TextGenerator>,
    interpreter: ResponseInterpreter,
}

impl ServiceCore {
    /// Create a new service core around a generator.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            interpreter: ResponseInterpreter::new(),
        }
    }

    /// Get the text generator.
    #[inline]
    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    /// Get the reply interpreter.
    #[inline]
    pub fn interpreter(&self) -> &ResponseInterpreter {
        &self.interpreter
    }
}
