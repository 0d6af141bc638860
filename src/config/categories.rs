//
//  deployer-client
//  config/categories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Category lookup for deploy target types.
//!
//! Target option operations only accept the canonical types `ssh`, `gae`, `aws`
//! and `for`. Anything else (a provider name shown in the UI, for instance) is
//! resolved through a [`CategoryResolver`].

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::api::resources::TargetType;

/// Maps a free-form target type reference to a canonical [`TargetType`].
pub trait CategoryResolver: Send + Sync {
    /// Returns the canonical type for `reference`, or `None` when unknown.
    fn ref_to_category(&self, reference: &str) -> Option<TargetType>;
}

/// Resolver backed by a fixed table, matched case-insensitively.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use deployer_client::api::resources::TargetType;
/// use deployer_client::config::{CategoryResolver, StaticCategories};
///
/// let mut table = BTreeMap::new();
/// table.insert("Amazon EC2".to_string(), "aws".to_string());
///
/// let categories = StaticCategories::from_table(&table);
/// assert_eq!(categories.ref_to_category("amazon ec2"), Some(TargetType::Aws));
/// assert_eq!(categories.ref_to_category("Heroku"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCategories {
    entries: HashMap<String, TargetType>,
}

impl StaticCategories {
    /// Builds the resolver, skipping (and logging) entries whose target is not a
    /// canonical type.
    pub fn from_table(table: &BTreeMap<String, String>) -> Self {
        let entries = table
            .iter()
            .filter_map(|(reference, category)| match category.parse::<TargetType>() {
                Ok(target_type) => Some((reference.trim().to_lowercase(), target_type)),
                Err(_) => {
                    warn!(reference, category, "ignoring category with unknown target type");
                    None
                }
            })
            .collect();
        Self { entries }
    }
}

impl CategoryResolver for StaticCategories {
    fn ref_to_category(&self, reference: &str) -> Option<TargetType> {
        self.entries.get(&reference.trim().to_lowercase()).copied()
    }
}
