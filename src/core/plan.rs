use crate::core::resource::AddressConfigurationWebhook;
use crate::core::resource_data::ResourceData;
use crate::domain::ports::AddressConfigurationApi;
use crate::domain::schema::{Attributes, Schema};
use crate::utils::error::Result;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Plan {
    NoOp,
    Create,
    Update { changed: Vec<&'static str> },
    /// ForceNew 欄位變更：先刪除再建立
    Replace { forced_by: Vec<&'static str> },
    Delete,
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::NoOp => write!(f, "no changes"),
            Plan::Create => write!(f, "create"),
            Plan::Update { changed } => write!(f, "update in-place ({})", changed.join(", ")),
            Plan::Replace { forced_by } => {
                write!(f, "destroy and then create replacement ({})", forced_by.join(", "))
            }
            Plan::Delete => write!(f, "destroy"),
        }
    }
}

/// 比較狀態與設定 (已套用預設值) 決定要執行的動作
pub fn plan(schema: &Schema, state: Option<&ResourceData>, desired: &Attributes) -> Plan {
    let Some(state) = state.filter(|s| s.exists()) else {
        return Plan::Create;
    };

    let forced_by = schema.force_new_changes(&state.values, desired);
    if !forced_by.is_empty() {
        return Plan::Replace { forced_by };
    }

    let changed = schema.changed_attributes(&state.values, desired);
    if changed.is_empty() {
        Plan::NoOp
    } else {
        Plan::Update { changed }
    }
}

pub fn plan_destroy(state: Option<&ResourceData>) -> Plan {
    match state {
        Some(s) if s.exists() => Plan::Delete,
        _ => Plan::NoOp,
    }
}

/// 執行計畫，回傳新的狀態；資源已刪除時回傳 `None`
pub async fn apply<A: AddressConfigurationApi>(
    resource: &AddressConfigurationWebhook<A>,
    plan: &Plan,
    state: Option<ResourceData>,
    desired: &Attributes,
) -> Result<Option<ResourceData>> {
    tracing::info!("🚀 Applying plan: {}", plan);

    let result = match plan {
        Plan::NoOp => state,
        Plan::Create => {
            let mut d = ResourceData::new(desired.clone());
            resource.create(&mut d).await?;
            Some(d)
        }
        Plan::Update { .. } => {
            let prior = state.unwrap_or_default();
            let mut d = ResourceData::with_prior(prior.id.clone(), prior.values, desired.clone());
            resource.update(&mut d).await?;
            Some(d)
        }
        Plan::Replace { .. } => {
            if let Some(mut old) = state {
                resource.delete(&mut old).await?;
            }
            let mut d = ResourceData::new(desired.clone());
            resource.create(&mut d).await?;
            Some(d)
        }
        Plan::Delete => {
            if let Some(mut old) = state {
                resource.delete(&mut old).await?;
            }
            None
        }
    };

    Ok(result.filter(ResourceData::exists))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::ADDRESS_CONFIGURATION_WEBHOOK;
    use serde_json::json;

    fn config() -> Attributes {
        let mut config = Attributes::new();
        config.insert("address".to_string(), json!("+15017122661"));
        config.insert("type".to_string(), json!("sms"));
        config.insert("enabled".to_string(), json!(true));
        config.insert("webhook_filters".to_string(), json!(["onMessageAdded"]));
        config.insert("webhook_method".to_string(), json!("POST"));
        config.insert("webhook_url".to_string(), json!("https://example.com/hook"));
        config
    }

    fn state() -> ResourceData {
        let mut values = config();
        values.insert("sid".to_string(), json!("IG1"));
        values.insert("integration_type".to_string(), json!("webhook"));
        values.insert("date_created".to_string(), json!("2021-03-01T12:00:00Z"));
        ResourceData::with_prior("IG1", Attributes::new(), values)
    }

    #[test]
    fn test_plan_create_without_state() {
        let schema = &ADDRESS_CONFIGURATION_WEBHOOK;
        assert_eq!(plan(schema, None, &config()), Plan::Create);

        let removed = ResourceData::default();
        assert_eq!(plan(schema, Some(&removed), &config()), Plan::Create);
    }

    #[test]
    fn test_plan_ignores_computed_attributes() {
        let schema = &ADDRESS_CONFIGURATION_WEBHOOK;
        assert_eq!(plan(schema, Some(&state()), &config()), Plan::NoOp);
    }

    #[test]
    fn test_plan_update_and_replace() {
        let schema = &ADDRESS_CONFIGURATION_WEBHOOK;

        let mut desired = config();
        desired.insert("webhook_url".to_string(), json!("https://example.com/other"));
        assert_eq!(
            plan(schema, Some(&state()), &desired),
            Plan::Update {
                changed: vec!["webhook_url"]
            }
        );

        desired.insert("address".to_string(), json!("+15017122662"));
        assert_eq!(
            plan(schema, Some(&state()), &desired),
            Plan::Replace {
                forced_by: vec!["address"]
            }
        );
    }

    #[test]
    fn test_plan_destroy() {
        assert_eq!(plan_destroy(Some(&state())), Plan::Delete);
        assert_eq!(plan_destroy(None), Plan::NoOp);
    }
}
