//! manymodels-registry - 模型注册信息
//!
//! 模型键、路由表制品以及按标签分组部署的规则。

mod error;
pub mod grouping;
pub mod key;
pub mod table;

pub use error::RegistryError;
pub use grouping::{
    ModelGroups, RegisteredModel, deployment_plan, group_models, routing_table_from_groups,
    service_name,
};
pub use key::{KEY_DELIMITER, compose_key, validate_key_part};
pub use table::RoutingTable;
