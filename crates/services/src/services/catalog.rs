//! Catalog filtering: derives the visible subset of the project list from a
//! free-text query and an optional active tag. Pure functions, relative
//! order preserved.

use db::models::project::Project;

/// Display cap for the selectable tag chips. Never applied to the filter
/// check itself.
pub const MAX_TAG_CHOICES: usize = 8;

/// A project is included iff the query matches (case-insensitive substring
/// against title, description or author; empty query matches everything)
/// AND the active tag, when set, appears exactly in its tags.
pub fn filter_projects(
    projects: &[Project],
    query: &str,
    active_tag: Option<&str>,
) -> Vec<Project> {
    let lower_query = query.to_lowercase();
    projects
        .iter()
        .filter(|project| {
            let matches_search = project.title.to_lowercase().contains(&lower_query)
                || project.description.to_lowercase().contains(&lower_query)
                || project.author.to_lowercase().contains(&lower_query);

            let matches_tag = match active_tag {
                Some(tag) => project.tags.iter().any(|t| t == tag),
                None => true,
            };

            matches_search && matches_tag
        })
        .cloned()
        .collect()
}

/// Distinct tags across the full (unfiltered) list, in iteration order,
/// capped at the first [`MAX_TAG_CHOICES`] distinct.
pub fn available_tags(projects: &[Project]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for project in projects {
        for tag in &project.tags {
            if tags.len() == MAX_TAG_CHOICES {
                return tags;
            }
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::store::fixture_projects;
    use uuid::Uuid;

    fn tagged(title: &str, author: &str, tags: &[&str]) -> Project {
        Project {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            prompt: String::new(),
            builder_url: String::new(),
            repo_url: String::new(),
            deploy_url: String::new(),
            author: author.to_string(),
            created_at: db::models::project::now_millis(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn empty_query_and_no_tag_is_identity() {
        let projects = fixture_projects();
        assert_eq!(filter_projects(&projects, "", None), projects);
    }

    #[test]
    fn query_match_is_case_insensitive() {
        let projects = fixture_projects();
        let filtered = filter_projects(&projects, "DaSh", None);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Inventory Dashboard");
    }

    #[test]
    fn author_field_is_searched() {
        let projects = fixture_projects();
        let filtered = filter_projects(&projects, "david", None);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].author, "David Park");
    }

    #[test]
    fn active_tag_requires_exact_match() {
        let projects = fixture_projects();
        let filtered = filter_projects(&projects, "", Some("React"));
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].tags.iter().any(|t| t == "React"));

        // Tag matching is case-sensitive, unlike the text query.
        assert!(filter_projects(&projects, "", Some("react")).is_empty());
    }

    #[test]
    fn query_and_tag_combine_with_and() {
        let projects = fixture_projects();
        assert!(filter_projects(&projects, "Summarizer", Some("React")).is_empty());
        assert_eq!(
            filter_projects(&projects, "Inventory", Some("React")).len(),
            1
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let projects = fixture_projects();
        let once = filter_projects(&projects, "a", Some("AI"));
        let twice = filter_projects(&once, "a", Some("AI"));
        assert_eq!(once, twice);
    }

    #[test]
    fn tag_choices_are_distinct_in_order_and_capped() {
        let projects = vec![
            tagged("a", "x", &["One", "Two", "One"]),
            tagged("b", "x", &["Three", "Two", "Four", "Five"]),
            tagged("c", "x", &["Six", "Seven", "Eight", "Nine", "Ten"]),
        ];
        let tags = available_tags(&projects);
        assert_eq!(
            tags,
            vec!["One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight"]
        );
        assert_eq!(tags.len(), MAX_TAG_CHOICES);
    }
}
