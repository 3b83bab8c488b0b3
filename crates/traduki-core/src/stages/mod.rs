//! Pipeline stages.
//!
//! Each stage is a total transformation over [`ConversionState`]: capability
//! output that cannot be interpreted is absorbed as a tagged degraded result
//! so one provider's formatting drift never aborts an otherwise completable
//! conversion. Only a raised [`CapabilityError`] escapes to the engine.

mod extract;
mod generate;
mod parse;
mod validate;

pub use extract::ExtractIntent;
pub use generate::Generate;
pub use parse::Parse;
pub use validate::Validate;

use async_trait::async_trait;

use crate::capability::IntentService;
use crate::error::CapabilityError;
use crate::state::ConversionState;

/// A single pipeline stage.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stage name used in logs and failure messages.
    fn name(&self) -> &'static str;

    /// Run the stage, updating `state` in place.
    async fn run(
        &self,
        state: &mut ConversionState,
        service: &dyn IntentService,
    ) -> Result<(), CapabilityError>;
}
