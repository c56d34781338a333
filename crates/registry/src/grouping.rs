//! 模型分组
//!
//! 已注册的模型按标签值分组，每组部署为一个服务；组内所有模型的
//! 路由都指向该服务的 scoring URI。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{RegistryError, RoutingTable};

/// 记录模型类型的标签
pub const MODEL_TYPE_TAG: &str = "ModelType";

/// 路由表本身也作为模型注册，使用该类型标记，分组时跳过
pub const ROUTING_MODEL_TYPE: &str = "_deployment_";

/// 部署服务名前缀
pub const SERVICE_PREFIX: &str = "manymodels-";

/// 已注册模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredModel {
    pub name: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl RegisteredModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn is_routing_model(&self) -> bool {
        self.tags.get(MODEL_TYPE_TAG).map(String::as_str) == Some(ROUTING_MODEL_TYPE)
    }
}

/// 组名 → 组内模型
pub type ModelGroups = BTreeMap<String, Vec<RegisteredModel>>;

/// 按标签分组
///
/// 组名为各分组标签值以 `/` 连接；未指定分组标签（或为空）时每个模型单独成组。
pub fn group_models(
    models: &[RegisteredModel],
    grouping_tags: Option<&[String]>,
) -> Result<ModelGroups, RegistryError> {
    let grouping_tags = grouping_tags.filter(|tags| !tags.is_empty());
    let mut groups = ModelGroups::new();

    for model in models {
        if model.is_routing_model() {
            debug!(model = %model.name, "Skipping routing model");
            continue;
        }

        let group_name = match grouping_tags {
            Some(tags) => tags
                .iter()
                .map(|tag| {
                    model
                        .tags
                        .get(tag)
                        .map(String::as_str)
                        .ok_or_else(|| RegistryError::MissingTag {
                            model: model.name.clone(),
                            tag: tag.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?
                .join("/"),
            None => model.name.clone(),
        };

        groups.entry(group_name).or_default().push(model.clone());
    }

    Ok(groups)
}

/// 组对应的服务名
pub fn service_name(group: &str) -> String {
    format!("{SERVICE_PREFIX}{group}").to_lowercase()
}

/// 部署计划：服务名 → 组内模型名
pub fn deployment_plan(groups: &ModelGroups) -> BTreeMap<String, Vec<String>> {
    groups
        .iter()
        .map(|(group, models)| {
            (
                service_name(group),
                models.iter().map(|m| m.name.clone()).collect(),
            )
        })
        .collect()
}

/// 根据各服务的 scoring URI 生成路由表
pub fn routing_table_from_groups(
    groups: &ModelGroups,
    scoring_uris: &BTreeMap<String, String>,
) -> Result<RoutingTable, RegistryError> {
    let mut entries = Vec::new();

    for (group, models) in groups {
        let service = service_name(group);
        let uri = scoring_uris
            .get(&service)
            .ok_or_else(|| RegistryError::MissingDeployment {
                group: group.clone(),
                service: service.clone(),
            })?;

        entries.extend(models.iter().map(|m| (m.name.clone(), uri.clone())));
    }

    Ok(RoutingTable::from_entries(entries))
}
