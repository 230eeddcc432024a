// Navigation resolver: turns the per-subject navigation payload into the
// unit/topic tree the session browses. The tree is rebuilt from scratch
// every time a subject is selected and lives only in memory.

use crate::api::{ApiClient, NavigationResponse};
use anyhow::Result;

/// Unit/topic tree for one subject, in the order the server lists units.
#[derive(Debug, Clone, Default)]
pub struct NavigationTree {
    units: Vec<Unit>,
}

#[derive(Debug, Clone)]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub topics: Vec<Topic>,
}

#[derive(Debug, Clone)]
pub struct Topic {
    pub id: String,
    pub name: String,
}

impl NavigationTree {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: &str) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }
}

/// Fetch and build the navigation tree for `slug`. Transport and parse
/// failures come back as `Err`; the session prints them and carries on with
/// an empty tree.
pub fn resolve(api: &ApiClient, slug: &str) -> Result<NavigationTree> {
    let response = api.fetch_navigation(slug)?;
    Ok(build_tree(response))
}

/// Build the tree from the raw payload. Units without an id are dropped.
/// A resource becomes a topic only if it has a title and at least one topic
/// id; only the first id is kept, so resources spanning several topics are
/// represented by their first one.
pub(crate) fn build_tree(response: NavigationResponse) -> NavigationTree {
    let mut units = Vec::new();
    let subject = response.subject.unwrap_or_default();

    for unit in subject.units {
        let id = match unit.id {
            Some(id) if !id.is_empty() => id,
            _ => continue,
        };
        let mut topics = Vec::new();
        for resource in unit.resources {
            let title = match resource.title {
                Some(t) if !t.is_empty() => t,
                _ => continue,
            };
            if let Some(topic_id) = resource.topic_ids.into_iter().next() {
                topics.push(Topic {
                    id: topic_id,
                    name: title,
                });
            }
        }
        units.push(Unit {
            id,
            name: unit.name.unwrap_or_default(),
            topics,
        });
    }

    NavigationTree { units }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> NavigationResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn builds_units_and_topics_in_server_order() {
        let tree = build_tree(response(json!({
            "getNavigationSubject": {
                "units": [
                    {"id": "u2", "name": "Unit Two", "resources": [
                        {"title": "Limits", "topicIds": ["t1"]},
                        {"title": "Derivatives", "topicIds": ["t2", "t3"]}
                    ]},
                    {"id": "u1", "name": "Unit One", "resources": []}
                ]
            }
        })));

        let units = tree.units();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].id, "u2");
        assert_eq!(units[0].name, "Unit Two");
        assert_eq!(units[1].id, "u1");

        let topics = &tree.unit("u2").unwrap().topics;
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].name, "Limits");
        // Only the first topic id of a multi-topic resource is kept.
        assert_eq!(topics[1].id, "t2");
    }

    #[test]
    fn skips_units_without_an_id() {
        let tree = build_tree(response(json!({
            "getNavigationSubject": {
                "units": [
                    {"name": "no id"},
                    {"id": "", "name": "empty id"},
                    {"id": "u1", "name": "kept"}
                ]
            }
        })));
        assert_eq!(tree.units().len(), 1);
        assert_eq!(tree.units()[0].id, "u1");
    }

    #[test]
    fn skips_resources_missing_title_or_topic_ids() {
        let tree = build_tree(response(json!({
            "getNavigationSubject": {
                "units": [{"id": "u1", "name": "Unit", "resources": [
                    {"topicIds": ["t1"]},
                    {"title": "No topics", "topicIds": []},
                    {"title": "Kept", "topicIds": ["t2"]}
                ]}]
            }
        })));
        let topics = &tree.unit("u1").unwrap().topics;
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].id, "t2");
    }

    #[test]
    fn missing_subject_yields_empty_tree() {
        let tree = build_tree(response(json!({"getNavigationSubject": null})));
        assert!(tree.is_empty());
    }
}
