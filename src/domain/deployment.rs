use crate::errors::NewRelicError;

/// A deployment marker to record against an application.
///
/// Either `application_id` or `application_name` must be set; the id wins
/// when both are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentNotice {
    pub application_id: Option<String>,
    pub application_name: Option<String>,
    pub description: Option<String>,
    pub revision: Option<String>,
    pub changelog: Option<String>,
    pub user: Option<String>,
}

impl DeploymentNotice {
    pub fn for_application_id(application_id: impl Into<String>) -> Self {
        Self {
            application_id: Some(application_id.into()),
            ..Self::default()
        }
    }

    pub fn for_application_name(application_name: impl Into<String>) -> Self {
        Self {
            application_name: Some(application_name.into()),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    pub fn changelog(mut self, changelog: impl Into<String>) -> Self {
        self.changelog = Some(changelog.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub(crate) fn form_pairs(&self) -> Result<Vec<(String, String)>, NewRelicError> {
        let mut pairs = Vec::new();

        if let Some(id) = &self.application_id {
            pairs.push(("deployment[application_id]".to_string(), id.clone()));
        } else if let Some(name) = &self.application_name {
            pairs.push(("deployment[app_name]".to_string(), name.clone()));
        } else {
            return Err(NewRelicError::invalid_parameter(
                "must specify either application_id or application_name",
            ));
        }

        let optional = [
            ("deployment[description]", &self.description),
            ("deployment[revision]", &self.revision),
            ("deployment[changelog]", &self.changelog),
            ("deployment[user]", &self.user),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push((key.to_string(), value.clone()));
            }
        }

        Ok(pairs)
    }
}
