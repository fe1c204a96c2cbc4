use log::debug;
use uuid::Uuid;

use super::control::HypervisorControl;
use super::types::VmHandle;
use crate::error_handling::types::HypervisorError;

/// One way of turning a user-supplied identifier into a [`VmHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    ByName,
    ByUuid,
}

/// Name first, then UUID.
pub const DEFAULT_STRATEGIES: &[ResolutionStrategy] =
    &[ResolutionStrategy::ByName, ResolutionStrategy::ByUuid];

/// Tries each strategy in order and returns the first match.
///
/// Only when every strategy failed is [`HypervisorError::NotFound`] returned,
/// listing why each one did.
pub async fn resolve_machine(
    hypervisor: &dyn HypervisorControl,
    identifier: &str,
    strategies: &[ResolutionStrategy],
) -> Result<VmHandle, HypervisorError> {
    let mut failures = Vec::new();

    for strategy in strategies {
        let attempt = match strategy {
            ResolutionStrategy::ByName => hypervisor.find_by_name(identifier).await,
            ResolutionStrategy::ByUuid => match parse_machine_uuid(identifier) {
                Some(id) => hypervisor.find_by_uuid(&id.to_string()).await,
                None => Err(HypervisorError::NotFound(format!(
                    "{} is not a UUID",
                    identifier
                ))),
            },
        };

        match attempt {
            Ok(vm) => {
                debug!("Resolved {} via {:?} to {}", identifier, strategy, vm);
                return Ok(vm);
            }
            Err(e) => {
                debug!("Lookup of {} via {:?} failed: {}", identifier, strategy, e);
                failures.push(format!("{:?}: {}", strategy, e));
            }
        }
    }

    Err(HypervisorError::NotFound(format!(
        "{} [{}]",
        identifier,
        failures.join("; ")
    )))
}

/// Accepts plain and brace-wrapped UUIDs.
fn parse_machine_uuid(identifier: &str) -> Option<Uuid> {
    let trimmed = identifier
        .trim()
        .trim_start_matches('{')
        .trim_end_matches('}');
    Uuid::parse_str(trimmed).ok()
}
