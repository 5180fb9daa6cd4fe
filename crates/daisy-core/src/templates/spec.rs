//! Template variants and the spec consumed by the fetcher

use crate::error::ScaffoldError;

/// A fully resolved template reference: where to fetch from and which
/// branch or tag to take. Both fields are non-empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    pub origin: String,
    pub ref_name: String,
}

/// Top-level template choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFamily {
    /// Framework starters shared across teams
    Common,
    /// Daisy project layouts
    ProjectSpecific,
}

impl TemplateFamily {
    pub fn variants(&self) -> &'static [TemplateVariant] {
        match self {
            TemplateFamily::Common => COMMON_VARIANTS,
            TemplateFamily::ProjectSpecific => PROJECT_VARIANTS,
        }
    }
}

/// One leaf of the template choice tree
#[derive(Debug, Clone, Copy)]
pub struct TemplateVariant {
    pub key: &'static str,
    pub label: &'static str,
    pub origin: &'static str,
    pub ref_name: &'static str,
}

pub const COMMON_VARIANTS: &[TemplateVariant] = &[
    TemplateVariant {
        key: "vue",
        label: "Vue single-page app",
        origin: "https://github.com/daasfe/template-vue",
        ref_name: "master",
    },
    TemplateVariant {
        key: "react",
        label: "React single-page app",
        origin: "https://github.com/daasfe/template-react",
        ref_name: "master",
    },
];

pub const PROJECT_VARIANTS: &[TemplateVariant] = &[
    TemplateVariant {
        key: "console",
        label: "Console (server + client)",
        origin: "https://github.com/daasfe/mndb",
        ref_name: "template",
    },
    TemplateVariant {
        key: "admin",
        label: "Admin dashboard",
        origin: "https://github.com/daasfe/mndb-admin",
        ref_name: "template",
    },
];

/// Leaf used when running with --silent and no explicit origin
pub const DEFAULT_VARIANT: &TemplateVariant = &PROJECT_VARIANTS[0];

impl TemplateSpec {
    /// Build the spec from an explicit origin, bypassing the choice tree.
    /// An explicit ref wins; otherwise the conventional default applies.
    pub fn from_origin(origin: &str, ref_override: Option<&str>) -> Self {
        Self {
            origin: origin.to_string(),
            ref_name: ref_override.unwrap_or("master").to_string(),
        }
    }

    /// Build the spec from a chosen variant, applying the ref override.
    ///
    /// An unmapped leaf (empty origin or ref) is a defect in the variant
    /// tables and fails loudly rather than producing an empty spec.
    pub fn from_variant(
        variant: &TemplateVariant,
        ref_override: Option<&str>,
    ) -> Result<Self, ScaffoldError> {
        let ref_name = ref_override.unwrap_or(variant.ref_name);
        if variant.origin.is_empty() || ref_name.is_empty() {
            return Err(ScaffoldError::Defect {
                choice: variant.key.to_string(),
            });
        }
        Ok(Self {
            origin: variant.origin.to_string(),
            ref_name: ref_name.to_string(),
        })
    }
}
