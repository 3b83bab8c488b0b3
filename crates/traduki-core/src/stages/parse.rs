//! Structural parse stage.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::Stage;
use crate::capability::IntentService;
use crate::error::CapabilityError;
use crate::state::ConversionState;

/// First stage: ask the capability for a structural analysis of the source.
///
/// Writes `parsed_structure` and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parse;

#[async_trait]
impl Stage for Parse {
    fn name(&self) -> &'static str {
        "parse"
    }

    async fn run(
        &self,
        state: &mut ConversionState,
        service: &dyn IntentService,
    ) -> Result<(), CapabilityError> {
        let payload = service
            .structural_parse(&state.source_code, &state.source_language)
            .await?;

        state.parsed_structure = match payload {
            Value::Object(map) => {
                debug!(keys = map.len(), "structural parse decoded");
                Value::Object(map)
            }
            other => {
                warn!("structural parse returned a non-object payload, keeping raw analysis");
                json!({ "raw_analysis": other, "degraded": true })
            }
        };

        Ok(())
    }
}
