use pulse_core::{normalize_feed, AnalysisConfig, ConfigError, FeedNormalizer, NodeKind};
use serde_json::json;

fn collect_ids(node: &pulse_core::Node, out: &mut Vec<String>) {
    out.push(node.id.clone());
    for child in &node.children {
        collect_ids(child, out);
    }
}

#[test]
fn mixes_labeled_and_simple_schemes_per_item() {
    let tree = normalize_feed(&json!([
        {
            "label_title": "Markets",
            "label_summary": "Rates held.",
            "read": ["alice"],
            "children": [
                { "label_title": "Fed", "relevancy_port1": 80, "relevancy_port2": 71, "urgency": 7 },
                { "title": "Oil", "summary": "Crude slides", "source": "apnews.com", "date": "2024-05-01" }
            ]
        },
        { "title": "Weather", "summary": "Rain" }
    ]));

    let root = tree.root();
    assert_eq!(root.kind, NodeKind::Group);
    assert_eq!(root.name, "News Collection");
    assert_eq!(root.children.len(), 2);

    let markets = tree.get("News Collection/Markets").expect("markets group");
    assert_eq!(markets.kind, NodeKind::Group);
    assert_eq!(markets.description.as_deref(), Some("Rates held."));
    assert!(markets.read_by.is_empty(), "read list moves to the summary");

    let summary = markets.summary_child().expect("synthesized summary");
    assert_eq!(summary.id, "News Collection/Markets/@summary");
    assert_eq!(summary.name, "Summary: Markets");
    assert_eq!(summary.value, 100.0);
    assert!(summary.is_read_by("alice"));

    let fed = tree.get("News Collection/Markets/Fed").expect("labeled article");
    assert_eq!(fed.relevancy, Some(76.0));
    assert_eq!(fed.urgency, Some(7.0));
    assert_eq!(fed.value, 76.0);

    let oil = tree.get("News Collection/Markets/Oil").expect("simple article");
    assert_eq!(oil.description.as_deref(), Some("Crude slides"));
    assert_eq!(oil.source.as_deref(), Some("apnews.com"));
    assert_eq!(oil.published.as_deref(), Some("2024-05-01"));
    assert_eq!(oil.relevancy, None);
    assert_eq!(oil.value, 50.0);
}

#[test]
fn group_without_summary_keeps_its_own_read_mark() {
    let tree = normalize_feed(&json!([
        { "title": "Tech", "readBy": ["bob", "bob", " "], "children": [{ "title": "Chips" }] }
    ]));
    let tech = tree.get("News Collection/Tech").expect("tech group");
    assert!(tech.summary_child().is_none());
    assert_eq!(tech.read_by.len(), 1);
    assert!(tech.is_read_by("bob"));
}

#[test]
fn malformed_children_degrade_to_articles() {
    let tree = normalize_feed(&json!([
        { "title": "Empty", "children": [] },
        { "title": "Odd", "children": "not a list" },
        { "title": "Null", "children": null }
    ]));
    assert!(tree
        .root()
        .children
        .iter()
        .all(|node| node.kind == NodeKind::Article));
}

#[test]
fn placeholders_fill_missing_titles_and_summaries() {
    let tree = normalize_feed(&json!([
        { "children": [{}, { "summary": 42 }] },
        "not a record"
    ]));
    let group = &tree.root().children[0];
    assert_eq!(group.name, "Group 1");
    assert_eq!(group.id, "News Collection/@0");
    assert_eq!(group.children[0].name, "Article 1");
    assert_eq!(group.children[1].name, "Article 2");
    assert_eq!(
        group.children[1].description.as_deref(),
        Some("No summary available")
    );
    assert_eq!(tree.root().children[1].name, "Article 2");
}

#[test]
fn unusable_scores_become_neutral_and_null_is_absent() {
    let tree = normalize_feed(&json!([
        { "title": "A", "relevancy_port1": "n/a", "relevancy_port2": 71, "relevancy_port3": null }
    ]));
    let article = tree.get("News Collection/A").expect("article");
    assert_eq!(article.relevancy_scores.len(), 2);
    assert_eq!(article.relevancy_scores.get("port1"), Some(&50.0));
    // (50 + 71) / 2 = 60.5 rounds away from zero
    assert_eq!(article.relevancy, Some(61.0));
}

#[test]
fn duplicate_sibling_titles_get_occurrence_suffixes() {
    let tree = normalize_feed(&json!([
        { "title": "Markets" },
        { "title": "Markets" },
        { "title": "Markets@2" }
    ]));
    let ids: Vec<&str> = tree
        .root()
        .children
        .iter()
        .map(|node| node.id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "News Collection/Markets",
            "News Collection/Markets@2",
            "News Collection/Markets%402"
        ]
    );
}

#[test]
fn renormalizing_unchanged_input_yields_identical_ids() {
    let raw = json!([
        { "title": "World", "label_summary": "Digest", "children": [
            { "title": "Asia", "children": [{ "title": "Tokyo" }, { "title": "Tokyo" }] },
            {}
        ]}
    ]);
    let mut first = Vec::new();
    let mut second = Vec::new();
    collect_ids(normalize_feed(&raw).root(), &mut first);
    collect_ids(normalize_feed(&raw).root(), &mut second);
    assert_eq!(first, second);
    assert_eq!(first.len(), 7);
}

#[test]
fn non_sequence_feed_yields_empty_root() {
    for raw in [json!({"title": "x"}), json!(null), json!("feed")] {
        let tree = normalize_feed(&raw);
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().kind, NodeKind::Group);
    }
}

#[test]
fn custom_label_and_separator_shape_ids() {
    let config = AnalysisConfig {
        collection_label: "Desk".to_string(),
        id_separator: "::".to_string(),
        ..AnalysisConfig::default()
    };
    let tree = FeedNormalizer::new(&config)
        .expect("valid config")
        .normalize(&json!([
            { "title": "US::EU", "children": [{ "title": "Trade" }] }
        ]));
    assert!(tree.contains("Desk::US%3A%3AEU::Trade"));
}

#[test]
fn normalizer_refuses_unvalidated_separator() {
    let config = AnalysisConfig {
        id_separator: String::new(),
        ..AnalysisConfig::default()
    };
    let err = FeedNormalizer::new(&config).expect_err("blank separator is rejected");
    assert_eq!(err, ConfigError::BlankIdSeparator);
}
