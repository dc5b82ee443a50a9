//! The `settings.custom_variables` block.

use da_expr::{resolve_let_chain, Bindings, LetChain};
use tracing::debug;

use crate::schema::Settings;
use crate::{ProjectError, ProjectResult};

/// Resolve the custom variables, in order, into named constants.
pub fn resolve_custom_variables(settings: &Settings) -> ProjectResult<LetChain> {
    let Some(src) = settings.custom_variables.as_deref() else {
        return Ok(LetChain::default());
    };
    let chain = resolve_let_chain(src, &Bindings::new()).map_err(ProjectError::Variables)?;
    debug!(count = chain.values.len(), "custom variables resolved");
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(src: &str) -> Settings {
        Settings {
            custom_variables: Some(src.to_string()),
        }
    }

    #[test]
    fn later_variables_see_earlier_ones() {
        let chain = resolve_custom_variables(&settings("w = 2 * pi\nhalf = w / 2;")).unwrap();
        assert_eq!(chain.get("half"), Some(std::f64::consts::PI));
        assert_eq!(chain.values.len(), 2);
    }

    #[test]
    fn missing_block_is_empty() {
        let chain = resolve_custom_variables(&Settings::default()).unwrap();
        assert!(chain.values.is_empty());
    }

    #[test]
    fn unresolved_variable_is_reported() {
        let err = resolve_custom_variables(&settings("a = 1; b = a + c")).unwrap_err();
        assert!(matches!(err, ProjectError::Variables(_)));
        assert!(err.to_string().contains('c'));
    }
}
