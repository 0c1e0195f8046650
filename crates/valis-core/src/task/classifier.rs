//! Keyword-based request classification.

use super::model::TaskType;

/// Keyword groups checked in order; the first group with a hit wins.
const KEYWORD_RULES: &[(&[&str], TaskType)] = &[
    (&["website", "landing"], TaskType::WebsiteCreation),
    (&["app", "application"], TaskType::ApplicationDevelopment),
    (&["presentation", "slides"], TaskType::PresentationCreation),
    (&["api", "backend"], TaskType::ApiDevelopment),
];

/// Classifies free text by case-insensitive substring matching.
///
/// Text matching no keyword falls through to `GeneralAssistance`.
pub fn classify(text: &str) -> TaskType {
    let lower = text.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, task_type)| *task_type)
        .unwrap_or(TaskType::GeneralAssistance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_keyword_group() {
        assert_eq!(classify("Build me a website"), TaskType::WebsiteCreation);
        assert_eq!(classify("I need a LANDING page"), TaskType::WebsiteCreation);
        assert_eq!(classify("Make a mobile app"), TaskType::ApplicationDevelopment);
        assert_eq!(classify("Design a presentation for slides"), TaskType::PresentationCreation);
        assert_eq!(classify("Slides for Monday"), TaskType::PresentationCreation);
        assert_eq!(classify("Set up a Backend service"), TaskType::ApiDevelopment);
        assert_eq!(classify("REST API for orders"), TaskType::ApiDevelopment);
    }

    #[test]
    fn test_unmatched_text_is_general_assistance() {
        assert_eq!(classify("What's the weather like?"), TaskType::GeneralAssistance);
        assert_eq!(classify("hello"), TaskType::GeneralAssistance);
    }

    #[test]
    fn test_first_group_wins() {
        // "website" beats "app" and "api"
        assert_eq!(classify("Website with an API and an app"), TaskType::WebsiteCreation);
        // "application" contains "app", both land in the same group
        assert_eq!(classify("An application with a backend"), TaskType::ApplicationDevelopment);
        // substring matching: "happy" contains "app"
        assert_eq!(classify("Make me happy"), TaskType::ApplicationDevelopment);
        // "rapid" contains "api"
        assert_eq!(classify("A rapid prototype"), TaskType::ApiDevelopment);
    }
}
