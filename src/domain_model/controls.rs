use serde::{Deserialize, Serialize};

/// Set of controls an account may access.
///
/// `Default` is the empty view returned for requests without a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessedControls {
    pub account: String,
    pub name: String,
    pub modules: Vec<ModuleView>,
    pub elements: Vec<ElementView>,
    pub resources: Vec<ResourceView>,
    pub orgs: Vec<OrgView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleView {
    pub id: String,
    pub code: String,
    pub name: String,
    pub url: String,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementView {
    pub id: String,
    pub module_id: String,
    pub dom_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceView {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgView {
    pub id: String,
    pub name: String,
}
