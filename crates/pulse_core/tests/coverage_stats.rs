use pulse_core::analysis::stats::compute_stats_in_tree;
use pulse_core::{compute_stats, coverage_by_group, normalize_feed, ReadScope};
use serde_json::json;

fn scenario_feed() -> serde_json::Value {
    json!([
        {
            "title": "G",
            "label_summary": "Digest",
            "children": [
                { "title": "A1", "read": ["alice"] },
                { "title": "A2" }
            ]
        }
    ])
}

#[test]
fn scenario_group_counts_summary_as_an_article() {
    let tree = normalize_feed(&scenario_feed());
    let group = tree.get("News Collection/G").expect("group G");
    let stats = compute_stats(group, &ReadScope::user("alice"));

    assert_eq!(stats.total_articles, 3);
    assert_eq!(stats.read_articles, 1);
    assert_eq!(stats.unread_articles, 2);
    assert_eq!((stats.read_percentage * 10.0).round() / 10.0, 33.3);
    assert_eq!(stats.total_groups, 1);
    assert_eq!(stats.read_groups, 0);
    assert_eq!(stats.group_read_percentage, 0.0);
}

#[test]
fn empty_feed_has_zeroed_statistics() {
    let tree = normalize_feed(&json!([]));
    let stats = compute_stats(tree.root(), &ReadScope::Any);
    assert_eq!(stats.total_articles, 0);
    assert_eq!(stats.read_percentage, 0.0);
    // the root itself is the only group, and it is degenerate
    assert_eq!(stats.total_groups, 1);
    assert_eq!(stats.read_groups, 0);
}

#[test]
fn cascade_marks_count_toward_statistics() {
    let tree = normalize_feed(&json!([
        { "title": "G", "read": ["alice"], "children": [
            { "title": "Sub", "children": [{ "title": "x" }, { "title": "y" }] },
            { "title": "z" }
        ]}
    ]));
    let stats = compute_stats(tree.root(), &ReadScope::user("alice"));
    assert_eq!(stats.total_articles, 3);
    assert_eq!(stats.read_articles, 3);
    assert_eq!(stats.read_groups, 3);
    assert_eq!(stats.read_percentage, 100.0);

    let sub = compute_stats_in_tree(&tree, "News Collection/G/Sub", &ReadScope::user("alice"))
        .expect("sub group exists");
    assert_eq!(sub.read_articles, 2);

    let detached = compute_stats(
        tree.get("News Collection/G/Sub").expect("sub group"),
        &ReadScope::user("alice"),
    );
    assert_eq!(detached.read_articles, 0, "no ancestor marks without the tree");
}

#[test]
fn coverage_by_group_lists_groups_in_visitation_order() {
    let tree = normalize_feed(&json!([
        { "title": "B", "children": [{ "title": "b1", "read": ["alice"] }] },
        { "title": "A", "children": [
            { "title": "A1", "children": [{ "title": "a" }] }
        ]}
    ]));
    let ids: Vec<&str> = coverage_by_group(&tree, &ReadScope::user("alice"))
        .into_iter()
        .map(|(group, _)| group.id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "News Collection",
            "News Collection/B",
            "News Collection/A",
            "News Collection/A/A1"
        ]
    );
}
