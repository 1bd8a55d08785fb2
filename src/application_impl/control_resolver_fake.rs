use crate::application_port::*;
use crate::domain_model::*;

/// Grants every account the home module and nothing else.
#[derive(Debug)]
pub struct FakeControlResolver;

impl FakeControlResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ControlResolver for FakeControlResolver {
    async fn accessed_controls(&self, account: &str) -> Result<AccessedControls, AuthError> {
        Ok(AccessedControls {
            account: account.to_string(),
            name: account.to_string(),
            modules: vec![ModuleView {
                id: "home".to_string(),
                code: "Home".to_string(),
                name: "Home".to_string(),
                url: "/home/index".to_string(),
                parent_id: None,
            }],
            elements: vec![ElementView {
                id: "home-refresh".to_string(),
                module_id: "home".to_string(),
                dom_id: "btnRefresh".to_string(),
                name: "Refresh".to_string(),
            }],
            resources: Vec::new(),
            orgs: Vec::new(),
        })
    }
}
