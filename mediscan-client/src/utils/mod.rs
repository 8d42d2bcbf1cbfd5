pub mod token;
pub mod validation;

/// Substitute `:name` placeholders in an endpoint template.
///
/// Values are percent-encoded so emails and ids cannot break the path.
pub fn resolve_path(template: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |path, (name, value)| {
            path.replace(&format!(":{}", name), &urlencoding::encode(value))
        })
}
