//! Declared-parameter extraction from XSLT template text.
//!
//! Extraction is a pure text scan; it never invokes the engine and is re-run
//! on every transform request so edits to the template are always picked up.
use regex::Regex;

/// Scan template text for `<xsl:param name="...">` declarations.
///
/// Returns the declared names in encounter order, duplicates preserved. An
/// optional `select` default attribute is recognized but not returned;
/// default resolution is the engine's responsibility. A template with no
/// declarations yields an empty sequence.
pub fn extract_template_params(template: &str) -> Vec<String> {
    let pattern = Regex::new(r#"<xsl:param\s+name="([^"]+)"(?:\s+select="([^"]*)")?"#)
        .expect("regex for xsl:param declarations");
    pattern
        .captures_iter(template)
        .map(|capture| capture[1].to_string())
        .collect()
}
