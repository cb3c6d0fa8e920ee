use serde_json::json;
use startpage_core::{validate, Document, Item, SchemaError};

fn check(value: serde_json::Value) -> Result<Document, SchemaError> {
    validate(&value.to_string())
}

#[test]
fn non_json_input_is_invalid_json() {
    for input in ["{", "not json", "{\"settings\":}", "[1,2,"] {
        let err = validate(input).unwrap_err();
        assert!(
            matches!(err, SchemaError::InvalidJson { .. }),
            "unexpected error for {input:?}: {err}"
        );
    }
}

#[test]
fn checks_follow_the_fixed_order() {
    assert_eq!(check(json!({})).unwrap_err(), SchemaError::MissingSettings);
    assert_eq!(
        check(json!({"settings": {}})).unwrap_err(),
        SchemaError::MissingBackground
    );
    assert_eq!(
        check(json!({"settings": {"background": "red"}})).unwrap_err(),
        SchemaError::MissingContainers
    );
    assert_eq!(
        check(json!({"settings": {"background": "red"}, "containers": {}})).unwrap_err(),
        SchemaError::MissingContainers
    );
}

#[test]
fn missing_containers_is_reported_with_valid_settings() {
    let err = check(json!({"settings": {"background": "blue", "font": "serif"}})).unwrap_err();
    assert_eq!(err, SchemaError::MissingContainers);
}

#[test]
fn container_violations_name_the_container() {
    let base = |containers: serde_json::Value| {
        check(json!({"settings": {"background": "red"}, "containers": containers}))
    };

    assert_eq!(
        base(json!([{"title": "ok", "bookmarks": []}, "nope"])).unwrap_err(),
        SchemaError::InvalidContainer { container: 1 }
    );
    assert_eq!(
        base(json!([{"bookmarks": []}])).unwrap_err(),
        SchemaError::MissingTitle { container: 0 }
    );
    assert_eq!(
        base(json!([{"title": "t"}])).unwrap_err(),
        SchemaError::MissingBookmarksArray { container: 0 }
    );
    assert_eq!(
        base(json!([{"title": "t", "bookmarks": "none"}])).unwrap_err(),
        SchemaError::MissingBookmarksArray { container: 0 }
    );
    assert_eq!(
        base(json!([{"title": 3, "bookmarks": []}])).unwrap_err(),
        SchemaError::InvalidType {
            field: "containers[0].title".to_string(),
            expected: "string",
        }
    );
}

#[test]
fn item_violations_name_container_and_item() {
    let items = |bookmarks: serde_json::Value| {
        check(json!({
            "settings": {"background": "red"},
            "containers": [{"title": "t", "bookmarks": bookmarks}]
        }))
    };

    assert_eq!(
        items(json!([{"url": "https://example.com"}])).unwrap_err(),
        SchemaError::InvalidItem {
            container: 0,
            item: 0
        }
    );
    assert_eq!(
        items(json!([{"title": "a", "url": "b"}, {"title": "c"}])).unwrap_err(),
        SchemaError::MissingUrl {
            container: 0,
            item: 1
        }
    );
    assert_eq!(
        items(json!([{"spacer": true}])).unwrap_err(),
        SchemaError::MissingFlexible {
            container: 0,
            item: 0
        }
    );
    assert_eq!(
        items(json!([{"spacer": true, "flexible": "yes"}])).unwrap_err(),
        SchemaError::InvalidType {
            field: "containers[0].bookmarks[0].flexible".to_string(),
            expected: "boolean",
        }
    );
}

#[test]
fn first_bad_container_wins() {
    let err = check(json!({
        "settings": {"background": "red"},
        "containers": [
            {"title": "a", "bookmarks": [{"title": "x"}]},
            {"bookmarks": []}
        ]
    }))
    .unwrap_err();
    assert_eq!(
        err,
        SchemaError::MissingUrl {
            container: 0,
            item: 0
        }
    );
}

#[test]
fn accepted_document_keeps_order_and_unknown_keys() {
    let document = check(json!({
        "settings": {"background": "red", "font": "serif"},
        "containers": [{
            "title": "dev",
            "collapsed": true,
            "bookmarks": [
                {"title": "github", "url": "https://github.com/", "icon": "gh.png"},
                {"spacer": true, "flexible": true},
                {"title": "mdn", "url": "https://developer.mozilla.org/"}
            ]
        }],
        "version": 2
    }))
    .unwrap();

    assert_eq!(document.settings.extra()["font"], "serif");
    assert_eq!(document.extra()["version"], 2);

    let container = &document.containers[0];
    assert_eq!(container.extra()["collapsed"], true);
    let kinds: Vec<&str> = container
        .items
        .iter()
        .map(|item| match item {
            Item::Bookmark(bookmark) => bookmark.title.as_str(),
            Item::Spacer(_) => "<spacer>",
        })
        .collect();
    assert_eq!(kinds, ["github", "<spacer>", "mdn"]);
    assert_eq!(
        container.items[0].as_bookmark().unwrap().extra()["icon"],
        "gh.png"
    );
}

#[test]
fn bare_container_array_is_not_the_canonical_shape() {
    let err = validate(r#"[{"title":"news","bookmarks":[]}]"#).unwrap_err();
    assert_eq!(err, SchemaError::RootNotObject);
}

#[test]
fn error_messages_are_user_readable() {
    assert_eq!(
        SchemaError::MissingUrl {
            container: 0,
            item: 3
        }
        .to_string(),
        "bookmark 3 in container 0 has no \"url\" property"
    );
    assert_eq!(
        SchemaError::MissingSettings.to_string(),
        "settings property missing or contains invalid data"
    );
}

#[test]
fn unknown_keys_never_shadow_model_keys_on_write() {
    let document = check(json!({
        "settings": {"background": "red"},
        "containers": [{
            "title": "mixed",
            "bookmarks": [{"title": "a", "url": "b", "spacer": true, "flexible": false}]
        }]
    }))
    .unwrap();

    let bookmark = document.containers[0].items[0].as_bookmark().unwrap();
    let extra_keys: Vec<&str> = bookmark.extra().keys().map(String::as_str).collect();
    assert_eq!(extra_keys, ["flexible", "spacer"]);

    let text = serde_json::to_string(&document).unwrap();
    assert_eq!(text.matches("\"title\"").count(), 2);
    assert_eq!(text.matches("\"url\"").count(), 1);
    assert_eq!(text.matches("\"spacer\"").count(), 1);
    assert_eq!(validate(&text).unwrap(), document);
}
