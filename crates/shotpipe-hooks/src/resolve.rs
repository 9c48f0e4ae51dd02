//! Procedural template-name resolution
//!
//! Template names in the configuration depend on the execution context:
//! entity type, host engine and the configured template key are composed
//! into the concrete name at call time.

use tracing::debug;

use crate::folders::EntityRef;

/// Compose the concrete template name for a context
///
/// `engine` is the host engine identifier in its `tk-maya` style; the
/// `tk-` prefix does not participate in template names. Without an
/// entity, only project-level keys resolve; everything else yields an
/// empty name.
pub fn resolve_template_name(
    entity: Option<&EntityRef>,
    engine: &str,
    template_key: &str,
) -> String {
    let engine = engine.strip_prefix("tk-").unwrap_or(engine);
    let name = match entity {
        Some(entity) => {
            let entity_type = entity.kind.to_lowercase();
            if template_key.contains("area") {
                format!("{}_{}_{}", entity_type, template_key, engine)
            } else {
                format!("{}_{}_{}", engine, entity_type, template_key)
            }
        }
        None if template_key.contains("project") => format!("{}_{}", engine, template_key),
        None => String::new(),
    };
    debug!(template_key, engine, name = %name, "resolved template name");
    name
}
