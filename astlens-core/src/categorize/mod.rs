//! Cluster categorization
//!
//! Categories are decided by a [`Categorizer`]. The stock
//! [`MarkerCategorizer`] checks filename markers first and falls back to the
//! imported modules recorded by the pattern extractor. Rules are evaluated in
//! order and the first match wins.

use crate::pattern::{find_record, PatternRecord, PatternType};
use serde::{Deserialize, Serialize};

/// Fixed set of cluster labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClusterCategory {
    #[serde(rename = "API Controllers")]
    ApiControllers,
    #[serde(rename = "Services")]
    Services,
    #[serde(rename = "Data Repositories")]
    DataRepositories,
    #[serde(rename = "Data Models/Entities")]
    DataModels,
    #[serde(rename = "Utilities")]
    Utilities,
    #[serde(rename = "Database Migrations")]
    DatabaseMigrations,
    #[serde(rename = "Database Access Layer")]
    DatabaseAccessLayer,
    #[serde(rename = "GraphQL Components")]
    GraphQlComponents,
    #[serde(rename = "Messaging Components")]
    MessagingComponents,
    #[serde(rename = "Unspecified Components")]
    Unspecified,
}

impl ClusterCategory {
    pub const ALL: [Self; 10] = [
        Self::ApiControllers,
        Self::Services,
        Self::DataRepositories,
        Self::DataModels,
        Self::Utilities,
        Self::DatabaseMigrations,
        Self::DatabaseAccessLayer,
        Self::GraphQlComponents,
        Self::MessagingComponents,
        Self::Unspecified,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::ApiControllers => "API Controllers",
            Self::Services => "Services",
            Self::DataRepositories => "Data Repositories",
            Self::DataModels => "Data Models/Entities",
            Self::Utilities => "Utilities",
            Self::DatabaseMigrations => "Database Migrations",
            Self::DatabaseAccessLayer => "Database Access Layer",
            Self::GraphQlComponents => "GraphQL Components",
            Self::MessagingComponents => "Messaging Components",
            Self::Unspecified => "Unspecified Components",
        }
    }
}

impl std::fmt::Display for ClusterCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ClusterCategory {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::Parse(format!("Unknown cluster category: '{s}'")))
    }
}

/// Policy deciding a cluster's category
pub trait Categorizer: Send + Sync {
    fn categorize(&self, file_ids: &[String], patterns: &[PatternRecord]) -> ClusterCategory;
}

/// Filename rule: any file whose name starts with one of `prefixes` (when
/// given) and contains one of `markers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenameRule {
    pub category: ClusterCategory,
    pub markers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefixes: Vec<String>,
}

impl FilenameRule {
    fn new(category: ClusterCategory, markers: &[&str]) -> Self {
        Self {
            category,
            markers: markers.iter().map(ToString::to_string).collect(),
            prefixes: Vec::new(),
        }
    }

    fn with_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.prefixes = prefixes.iter().map(ToString::to_string).collect();
        self
    }

    pub fn matches(&self, file_id: &str) -> bool {
        let prefixed = self.prefixes.is_empty()
            || self.prefixes.iter().any(|prefix| file_id.starts_with(prefix.as_str()));
        prefixed && self.markers.iter().any(|marker| file_id.contains(marker.as_str()))
    }
}

/// Import rule: any of `modules` among the cluster's top imported modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRule {
    pub category: ClusterCategory,
    pub modules: Vec<String>,
}

impl ImportRule {
    fn new(category: ClusterCategory, modules: &[&str]) -> Self {
        Self {
            category,
            modules: modules.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Ordered marker lists used by [`MarkerCategorizer`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryRules {
    pub filename_rules: Vec<FilenameRule>,
    pub import_rules: Vec<ImportRule>,
    pub fallback: ClusterCategory,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            filename_rules: vec![
                FilenameRule::new(ClusterCategory::ApiControllers, &[".controller."]),
                FilenameRule::new(ClusterCategory::Services, &[".service."]),
                FilenameRule::new(ClusterCategory::DataRepositories, &[".repository."]),
                FilenameRule::new(ClusterCategory::DataModels, &[".entity.", ".model."]),
                FilenameRule::new(ClusterCategory::Utilities, &[".util.", ".helper."]),
                // Timestamp-prefixed migration files, e.g. 1690000000000-AddUsers.ts
                FilenameRule::new(ClusterCategory::DatabaseMigrations, &[".ts"]).with_prefixes(&["1", "2"]),
            ],
            import_rules: vec![
                ImportRule::new(
                    ClusterCategory::DatabaseAccessLayer,
                    &["typeorm", "sequelize", "mongoose", "prisma", "knex"],
                ),
                ImportRule::new(
                    ClusterCategory::GraphQlComponents,
                    &["graphql", "apollo", "type-graphql"],
                ),
                ImportRule::new(
                    ClusterCategory::MessagingComponents,
                    &["kafka", "rabbitmq", "amqp", "redis"],
                ),
            ],
            fallback: ClusterCategory::Unspecified,
        }
    }
}

/// Filename markers first, then imported modules, then the fallback
#[derive(Debug, Clone, Default)]
pub struct MarkerCategorizer {
    rules: CategoryRules,
}

impl MarkerCategorizer {
    pub const fn new(rules: CategoryRules) -> Self {
        Self { rules }
    }

    pub const fn rules(&self) -> &CategoryRules {
        &self.rules
    }
}

impl Categorizer for MarkerCategorizer {
    fn categorize(&self, file_ids: &[String], patterns: &[PatternRecord]) -> ClusterCategory {
        if let Some(rule) = self
            .rules
            .filename_rules
            .iter()
            .find(|rule| file_ids.iter().any(|id| rule.matches(id)))
        {
            return rule.category;
        }

        if let Some(imports) = find_record(patterns, PatternType::ImportModules) {
            if let Some(rule) = self
                .rules
                .import_rules
                .iter()
                .find(|rule| rule.modules.iter().any(|module| imports.contains_label(module)))
            {
                return rule.category;
            }
        }

        self.rules.fallback
    }
}

/// Categorize with the default rules
pub fn categorize(file_ids: &[String], patterns: &[PatternRecord]) -> ClusterCategory {
    MarkerCategorizer::default().categorize(file_ids, patterns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn imports(modules: &[&str]) -> Vec<PatternRecord> {
        vec![PatternRecord {
            pattern_type: PatternType::ImportModules,
            data: modules.iter().map(|m| ((*m).to_string(), 1)).collect(),
        }]
    }

    #[test]
    fn test_controller_beats_service() {
        let files = ids(&["x.service.ts", "x.controller.ts"]);
        assert_eq!(categorize(&files, &[]), ClusterCategory::ApiControllers);
    }

    #[test]
    fn test_filename_ladder() {
        let cases = [
            ("user.service.ts", ClusterCategory::Services),
            ("user.repository.ts", ClusterCategory::DataRepositories),
            ("user.entity.ts", ClusterCategory::DataModels),
            ("user.model.ts", ClusterCategory::DataModels),
            ("date.util.ts", ClusterCategory::Utilities),
            ("date.helper.js", ClusterCategory::Utilities),
            ("1690000000000-AddUsers.ts", ClusterCategory::DatabaseMigrations),
            ("2024-init.ts", ClusterCategory::DatabaseMigrations),
        ];
        for (file, expected) in cases {
            assert_eq!(categorize(&ids(&[file]), &[]), expected, "{file}");
        }
    }

    #[test]
    fn test_migration_needs_numeric_prefix() {
        assert_eq!(categorize(&ids(&["3-init.ts"]), &[]), ClusterCategory::Unspecified);
        assert_eq!(categorize(&ids(&["index.ts"]), &[]), ClusterCategory::Unspecified);
    }

    #[test]
    fn test_import_fallbacks() {
        let files = ids(&["index.ts"]);
        assert_eq!(
            categorize(&files, &imports(&["express", "mongoose"])),
            ClusterCategory::DatabaseAccessLayer
        );
        assert_eq!(
            categorize(&files, &imports(&["redis", "graphql"])),
            ClusterCategory::GraphQlComponents
        );
        assert_eq!(categorize(&files, &imports(&["amqp"])), ClusterCategory::MessagingComponents);
        assert_eq!(
            categorize(&files, &imports(&["@prisma/client"])),
            ClusterCategory::Unspecified
        );
    }

    #[test]
    fn test_filename_rules_precede_imports() {
        assert_eq!(
            categorize(&ids(&["a.helper.ts"]), &imports(&["typeorm"])),
            ClusterCategory::Utilities
        );
    }

    #[test]
    fn test_custom_rules() {
        let rules = CategoryRules {
            filename_rules: vec![FilenameRule::new(ClusterCategory::Services, &["Svc"])],
            import_rules: vec![],
            fallback: ClusterCategory::Utilities,
        };
        let categorizer = MarkerCategorizer::new(rules);

        assert_eq!(categorizer.categorize(&ids(&["UserSvc.ts"]), &[]), ClusterCategory::Services);
        assert_eq!(
            categorizer.categorize(&ids(&["user.controller.ts"]), &imports(&["typeorm"])),
            ClusterCategory::Utilities
        );
    }

    #[test]
    fn test_labels_round_trip() {
        for category in ClusterCategory::ALL {
            assert_eq!(category.label().parse::<ClusterCategory>().unwrap(), category);
        }
        assert!("Widgets".parse::<ClusterCategory>().is_err());
    }

    #[test]
    fn test_rules_deserialize_from_partial_json() -> crate::Result<()> {
        let rules: CategoryRules = serde_json::from_str(
            r#"{"import_rules": [{"category": "Messaging Components", "modules": ["nats"]}]}"#,
        )?;
        assert_eq!(rules.filename_rules.len(), 6);
        assert_eq!(
            MarkerCategorizer::new(rules).categorize(&ids(&["main.ts"]), &imports(&["nats"])),
            ClusterCategory::MessagingComponents
        );
        Ok(())
    }
}
