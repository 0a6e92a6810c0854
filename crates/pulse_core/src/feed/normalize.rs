//! Raw feed to canonical tree normalization.
//!
//! # Responsibility
//! - Turn one raw feed sequence into a `Group` root with groups, summaries
//!   and articles.
//! - Derive ids from the ancestor title chain.
//!
//! # Invariants
//! - A raw record with a non-empty `children` array becomes a `Group`;
//!   anything else becomes an `Article`.
//! - A group with `label_summary` gets exactly one synthesized `Summary`
//!   child that owns the raw read list; otherwise the read list marks the
//!   group itself.
//! - Re-normalizing unchanged input yields identical ids node-for-node.
//! - Ids are unique within one snapshot; a collision is re-suffixed rather
//!   than dropping the feed.

use crate::config::{AnalysisConfig, ConfigError};
use crate::feed::raw::RawItem;
use crate::model::node::{average_relevancy, Node, NodeKind};
use crate::model::tree::FeedTree;
use log::{debug, error, info, warn};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

const SUMMARY_SEGMENT: &str = "@summary";
const SUMMARY_NAME_PREFIX: &str = "Summary: ";
const MISSING_SUMMARY_TEXT: &str = "No summary available";

/// Normalizes a raw feed with default configuration.
pub fn normalize_feed(raw: &Value) -> FeedTree {
    FeedNormalizer::validated(&AnalysisConfig::default()).normalize(raw)
}

/// Stateless raw feed normalizer bound to one configuration.
#[derive(Debug, Clone, Copy)]
pub struct FeedNormalizer<'c> {
    config: &'c AnalysisConfig,
}

impl<'c> FeedNormalizer<'c> {
    /// Binds a normalizer to `config` after validating it.
    pub fn new(config: &'c AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Binds to a config the caller already validated.
    pub(crate) fn validated(config: &'c AnalysisConfig) -> Self {
        Self { config }
    }

    /// Builds one snapshot from a raw feed value.
    ///
    /// A value that is not a JSON array yields an empty root group.
    pub fn normalize(&self, raw: &Value) -> FeedTree {
        let root = self.normalize_root(raw);
        let (groups, leaves) = count_kinds(&root);
        match FeedTree::new(root) {
            Ok(tree) => {
                info!(
                    "event=feed_normalized module=feed status=ok nodes={} groups={} leaves={}",
                    tree.len(),
                    groups,
                    leaves
                );
                tree
            }
            Err(err) => {
                error!(
                    "event=feed_normalized module=feed status=error reason={}",
                    err
                );
                self.empty_tree()
            }
        }
    }

    /// Builds the root node without indexing it.
    pub fn normalize_root(&self, raw: &Value) -> Node {
        let mut root = self.empty_root();
        let Some(items) = raw.as_array() else {
            warn!("event=feed_normalized module=feed status=degraded reason=not_a_sequence");
            return root;
        };
        root.children = self.build_children(items, &root.id);

        let renamed = resuffix_duplicate_ids(&mut root, &mut HashSet::new());
        if renamed > 0 {
            warn!(
                "event=feed_ids_resuffixed module=feed status=degraded renamed={renamed}"
            );
        }
        root
    }

    fn empty_root(&self) -> Node {
        let label = self.config.collection_label.trim();
        Node::group(self.escape_segment(label), label)
    }

    fn empty_tree(&self) -> FeedTree {
        let root = self.empty_root();
        FeedTree::empty(root.id, root.name)
    }

    fn build_children(&self, items: &[Value], parent_id: &str) -> Vec<Node> {
        let mut seen = HashMap::<String, usize>::new();
        items
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let item = RawItem::new(value);
                if !item.is_record() {
                    debug!(
                        "event=feed_item_degraded module=feed reason=not_a_record index={index}"
                    );
                }
                let segment = self.child_segment(item.title(), index, &mut seen);
                let id = self.join_id(parent_id, &segment);
                match item.children() {
                    Some(children) => self.build_group(item, children, id, index),
                    None => self.build_article(item, id, index),
                }
            })
            .collect()
    }

    fn build_group(
        &self,
        item: RawItem<'_>,
        children: &[Value],
        id: String,
        index: usize,
    ) -> Node {
        let name = item
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Group {}", index + 1));
        let mut group = Node::group(id, name);
        group.description = item.summary_text().map(str::to_string);
        self.apply_metadata(&mut group, item);

        match item.label_summary() {
            Some(digest) => {
                let mut summary = Node::summary(
                    self.join_id(&group.id, SUMMARY_SEGMENT),
                    format!("{SUMMARY_NAME_PREFIX}{}", group.name),
                );
                summary.description = Some(digest.to_string());
                summary.value = self.config.summary_weight;
                summary.read_by = item.readers();
                group.children.push(summary);
            }
            None => group.read_by = item.readers(),
        }

        let content = self.build_children(children, &group.id);
        group.children.extend(content);
        group
    }

    fn build_article(&self, item: RawItem<'_>, id: String, index: usize) -> Node {
        let name = item
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Article {}", index + 1));
        let mut article = Node::new(id, name, NodeKind::Article);
        article.description = Some(
            item.summary_text()
                .unwrap_or(MISSING_SUMMARY_TEXT)
                .to_string(),
        );
        article.read_by = item.readers();
        self.apply_metadata(&mut article, item);
        article.value = item
            .value()
            .or(article.relevancy)
            .unwrap_or(self.config.neutral_relevancy);
        article
    }

    fn apply_metadata(&self, node: &mut Node, item: RawItem<'_>) {
        node.urgency = item.urgency();
        node.relevancy_scores = item.relevancy_scores(self.config.neutral_relevancy);
        node.relevancy = average_relevancy(&node.relevancy_scores);
        node.source = item.source().map(str::to_string);
        node.published = item.published().map(str::to_string);
        node.category = item.category().map(str::to_string);
    }

    fn child_segment(
        &self,
        title: Option<&str>,
        index: usize,
        seen: &mut HashMap<String, usize>,
    ) -> String {
        let Some(title) = title else {
            return format!("@{index}");
        };
        let escaped = self.escape_segment(title);
        let occurrence = seen.entry(escaped.clone()).or_insert(0);
        *occurrence += 1;
        if *occurrence == 1 {
            escaped
        } else {
            format!("{escaped}@{occurrence}")
        }
    }

    fn join_id(&self, parent_id: &str, segment: &str) -> String {
        format!("{parent_id}{}{segment}", self.config.id_separator)
    }

    /// Escapes `%`, `@` and the separator so joined ids stay unambiguous.
    fn escape_segment(&self, title: &str) -> String {
        let escaped = title.replace('%', "%25").replace('@', "%40");
        let encoded_separator: String = self
            .config
            .id_separator
            .bytes()
            .map(|byte| format!("%{byte:02X}"))
            .collect();
        escaped.replace(self.config.id_separator.as_str(), &encoded_separator)
    }
}

/// Gives every id already seen earlier in pre-order the first free `@<n>`
/// suffix. Returns how many nodes were renamed.
fn resuffix_duplicate_ids(node: &mut Node, seen: &mut HashSet<String>) -> usize {
    let mut renamed = 0;
    if !seen.insert(node.id.clone()) {
        let mut occurrence = 2;
        let unique = loop {
            let candidate = format!("{}@{occurrence}", node.id);
            if seen.insert(candidate.clone()) {
                break candidate;
            }
            occurrence += 1;
        };
        node.id = unique;
        renamed += 1;
    }
    for child in &mut node.children {
        renamed += resuffix_duplicate_ids(child, seen);
    }
    renamed
}

fn count_kinds(node: &Node) -> (usize, usize) {
    let own = if node.is_group() { (1, 0) } else { (0, 1) };
    node.children
        .iter()
        .map(count_kinds)
        .fold(own, |(groups, leaves), (g, l)| (groups + g, leaves + l))
}

#[cfg(test)]
mod tests {
    use super::FeedNormalizer;
    use crate::config::{AnalysisConfig, ConfigError};
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn escape_segment_encodes_reserved_characters() {
        let config = AnalysisConfig::default();
        let normalizer = FeedNormalizer::new(&config).unwrap();
        assert_eq!(normalizer.escape_segment("EU/US"), "EU%2FUS");
        assert_eq!(normalizer.escape_segment("50% @ dawn"), "50%25 %40 dawn");
    }

    #[test]
    fn multi_char_separator_is_fully_encoded() {
        let config = AnalysisConfig {
            id_separator: "::".to_string(),
            ..AnalysisConfig::default()
        };
        let normalizer = FeedNormalizer::new(&config).unwrap();
        assert_eq!(normalizer.escape_segment("a::b"), "a%3A%3Ab");
    }

    #[test]
    fn untitled_items_fall_back_to_index_segments() {
        let config = AnalysisConfig::default();
        let root = FeedNormalizer::new(&config)
            .unwrap()
            .normalize_root(&json!([{}, {"title": "T"}]));
        assert_eq!(root.children[0].id, "News Collection/@0");
        assert_eq!(root.children[0].name, "Article 1");
        assert_eq!(root.children[1].id, "News Collection/T");
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = AnalysisConfig {
            id_separator: String::new(),
            ..AnalysisConfig::default()
        };
        assert_eq!(
            FeedNormalizer::new(&config).unwrap_err(),
            ConfigError::BlankIdSeparator
        );
    }

    #[test]
    fn colliding_ids_are_resuffixed_instead_of_dropping_the_feed() {
        // without a separator `ab` and `a` -> `b` join to the same id
        let config = AnalysisConfig {
            id_separator: String::new(),
            ..AnalysisConfig::default()
        };
        let tree = FeedNormalizer::validated(&config).normalize(&json!([
            { "title": "ab" },
            { "title": "a", "children": [{ "title": "b" }] }
        ]));

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.root().children.len(), 2);
        let nested = &tree.root().children[1].children[0];
        assert_eq!(nested.name, "b");
        assert_eq!(nested.id, "News Collectionab@2");

        let ids: HashSet<&str> = tree
            .leaves()
            .into_iter()
            .map(|leaf| leaf.id.as_str())
            .collect();
        assert_eq!(ids.len(), 2);
    }
}
