//! Deployment catalog: which applications and variants exist, and where
//! each variant keeps its files.
//!
//! These maps are immutable value objects constructed once at process
//! start and passed explicitly into the codec front-ends and the
//! reconciliation engine — never ambient global state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::{AppId, VariantId};

/// Map from application id to display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCatalog {
    apps: BTreeMap<u8, String>,
}

impl AppCatalog {
    /// Build a catalog from (id, name) pairs.
    pub fn new(entries: impl IntoIterator<Item = (AppId, String)>) -> Self {
        Self {
            apps: entries
                .into_iter()
                .map(|(id, name)| (id.get(), name))
                .collect(),
        }
    }

    /// Display name for an application id.
    pub fn name(&self, id: AppId) -> Result<&str, TypeError> {
        self.apps
            .get(&id.get())
            .map(String::as_str)
            .ok_or(TypeError::UnknownApp { id: id.get() })
    }

    /// Number of known applications.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Returns `true` if no applications are registered.
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

/// One variant of a stored asset: its id digit, display name, and the
/// storage location holding its files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSpec {
    /// The digit encoded into tokens for this variant.
    pub id: VariantId,
    /// Operator-facing name, e.g. "master".
    pub name: String,
    /// Storage location identifier passed to the file store.
    pub location: String,
}

impl VariantSpec {
    /// Build a variant spec.
    pub fn new(id: VariantId, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            location: location.into(),
        }
    }
}

/// Ordered set of variants known to the deployment.
///
/// The first entry is the primary variant: the one repair actions re-link
/// from unassigned files (secondary variants are regenerated from it by
/// external processing, not re-linked).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCatalog {
    variants: Vec<VariantSpec>,
}

impl VariantCatalog {
    /// Build a catalog, rejecting duplicate variant ids.
    pub fn new(variants: Vec<VariantSpec>) -> Result<Self, TypeError> {
        let mut seen = BTreeMap::new();
        for spec in &variants {
            if seen.insert(spec.id.get(), ()).is_some() {
                return Err(TypeError::DuplicateVariant { id: spec.id.get() });
            }
        }
        Ok(Self { variants })
    }

    /// Look up a variant by id.
    pub fn spec(&self, id: VariantId) -> Result<&VariantSpec, TypeError> {
        self.variants
            .iter()
            .find(|spec| spec.id == id)
            .ok_or(TypeError::UnknownVariant { id: id.get() })
    }

    /// Look up a variant by operator-facing name.
    pub fn by_name(&self, name: &str) -> Result<&VariantSpec, TypeError> {
        self.variants
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| TypeError::UnknownVariantName {
                name: name.to_string(),
            })
    }

    /// The primary variant (first catalog entry).
    pub fn primary(&self) -> Option<&VariantSpec> {
        self.variants.first()
    }

    /// Iterate variants in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &VariantSpec> {
        self.variants.iter()
    }

    /// Number of variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Returns `true` if the catalog has no variants.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

/// Complete deployment catalog: applications plus variants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Known applications.
    pub apps: AppCatalog,
    /// Known variants, primary first.
    pub variants: VariantCatalog,
}

impl Catalog {
    /// The stock deployment map: one application, master plus thumbnail.
    pub fn standard() -> Self {
        let apps = AppCatalog::new([(
            AppId::new(1).expect("1 is a valid app id"),
            "users".to_string(),
        )]);
        let variants = VariantCatalog::new(vec![
            VariantSpec::new(
                VariantId::new(0).expect("0 is a valid variant id"),
                "master",
                "master",
            ),
            VariantSpec::new(
                VariantId::new(1).expect("1 is a valid variant id"),
                "thumbnail",
                "thumbnail",
            ),
        ])
        .expect("stock variant ids are distinct");
        Self { apps, variants }
    }
}
