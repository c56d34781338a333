//! 模型键
//!
//! 每个序列模型以 `{model_type}_{store}_{brand}` 命名，路由表以此为键。

use crate::RegistryError;

/// 模型键各段之间的分隔符
pub const KEY_DELIMITER: char = '_';

/// 组合模型键，不做任何转义
pub fn compose_key(model_type: &str, store: &str, brand: &str) -> String {
    format!("{model_type}{KEY_DELIMITER}{store}{KEY_DELIMITER}{brand}")
}

/// 校验模型键的单个组成部分
///
/// 含有分隔符的值会使模型键产生歧义（`lr_a_b_c` 无法还原），因此直接拒绝。
pub fn validate_key_part(field: &'static str, value: &str) -> Result<(), RegistryError> {
    if value.is_empty() {
        return Err(RegistryError::InvalidKeyPart {
            field,
            value: value.to_string(),
            reason: "must not be empty",
        });
    }

    if value.contains(KEY_DELIMITER) {
        return Err(RegistryError::InvalidKeyPart {
            field,
            value: value.to_string(),
            reason: "must not contain '_'",
        });
    }

    Ok(())
}
