//! Built-in documents.

use crate::model::document::Document;
use crate::schema::validator::validate;

/// Fixed, schema-valid showcase document loaded with the `demo` flag.
pub const DEMO_DOCUMENT: &str = r#"{
    "settings": {
        "background": "hsla(30, 30%, 90%, 1)"
    },
    "containers": [
        {
            "title": "news",
            "bookmarks": [
                { "title": "ars", "url": "https://arstechnica.com/" },
                { "title": "/r/news", "url": "https://www.reddit.com/r/news" }
            ]
        },
        {
            "title": "social",
            "bookmarks": [
                { "title": "reddit", "url": "https://www.reddit.com/" },
                { "title": "linkedin", "url": "https://www.linkedin.com/" }
            ]
        },
        {
            "title": "dev",
            "bookmarks": [
                { "title": "github", "url": "https://github.com/" },
                { "title": "gist", "url": "https://gist.github.com/" },
                { "title": "mdn", "url": "https://developer.mozilla.org/en-US/" },
                { "spacer": "true", "flexible": false },
                { "title": "/r/webdev", "url": "https://www.reddit.com/r/webdev" },
                { "title": "/r/programming", "url": "https://www.reddit.com/r/programming" }
            ]
        },
        {
            "title": "entertainment",
            "bookmarks": [
                { "title": "twitch", "url": "https://twitch.tv/" },
                { "title": "youtube", "url": "https://www.youtube.com/" }
            ]
        }
    ]
}"#;

/// Decodes [`DEMO_DOCUMENT`].
///
/// # Panics
/// Panics if the fixture no longer passes validation. That is a build
/// defect, never a user-facing condition.
pub fn demo_document() -> Document {
    validate(DEMO_DOCUMENT)
        .unwrap_or_else(|err| panic!("built-in demo document is invalid: {err}"))
}

#[cfg(test)]
mod tests {
    use super::demo_document;

    #[test]
    fn demo_document_validates() {
        let document = demo_document();
        let titles: Vec<&str> = document
            .containers
            .iter()
            .map(|container| container.title.as_str())
            .collect();
        assert_eq!(titles, ["news", "social", "dev", "entertainment"]);
        assert!(document.containers[2].items[3].as_spacer().is_some());
    }
}
