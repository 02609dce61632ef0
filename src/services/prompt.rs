//! Prompt template for the recommendation request.

const RECOMMENDATIONS_TEMPLATE: &str = include_str!("../../prompts/recommendations.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// Values are inserted verbatim; substituted text is not rescanned.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        let key = &rest[start + 2..start + 2 + len];
        result.push_str(&rest[..start]);
        match vars.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => result.push_str(value),
            None => result.push_str(&rest[start..start + len + 4]),
        }
        rest = &rest[start + len + 4..];
    }

    result.push_str(rest);
    result
}

/// Builds the instruction text for a trip to `city`
pub fn recommendation_prompt(city: &str, profile: &str) -> String {
    render(
        RECOMMENDATIONS_TEMPLATE,
        &[("city", city), ("profile", profile)],
    )
}
