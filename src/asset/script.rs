//! Bootstrap script rendering.
//!
//! The setup script template carries URL placeholders that are substituted
//! with presigned URLs at provision time. Substitution is a global literal
//! string replace - not a template language. Placeholders absent from the
//! template are silently ignored, and a placeholder left unresolved in the
//! output passes through undetected; the template is trusted build-time
//! material.

use crate::asset::Result;
use crate::resources::Resources;

/// Render a template resource, applying each `(placeholder, value)` pair
/// as a global literal replacement.
///
/// The placeholders are disjoint strings, so the order of application does
/// not matter.
pub fn render(
    resources: &Resources,
    template_resource: &str,
    substitutions: &[(&str, &str)],
) -> Result<String> {
    let mut rendered = resources.read_to_string(template_resource)?;
    for (placeholder, value) in substitutions {
        rendered = rendered.replace(placeholder, value);
    }
    Ok(rendered)
}
