use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// satisfaction/confiance 的评分上限（闭区间 0..=5）
pub const RATING_MAX: u8 = 5;

/// 交易点评，按ticket与交易一对零或一关联。
///
/// 权威副本在远端；本地副本在下一次对账前仅作参考。
/// date/status/printer/created_at/updated_at 由服务端维护，
/// 本端只透传，乐观更新时原样保留。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub satisfaction: u8,
    #[serde(default)]
    pub confiance: u8,
    #[serde(default)]
    pub attente: String,
    #[serde(default)]
    pub date: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub printer: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

fn default_status() -> String {
    "unread".to_string()
}

impl Default for Comment {
    fn default() -> Self {
        Comment {
            text: String::new(),
            satisfaction: 0,
            confiance: 0,
            attente: String::new(),
            date: String::new(),
            status: default_status(),
            printer: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

/// 编辑会话中的草稿：只含用户可编辑的四个字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentDraft {
    pub text: String,
    pub satisfaction: u8,
    pub confiance: u8,
    pub attente: String,
}

impl CommentDraft {
    pub fn from_comment(comment: &Comment) -> Self {
        CommentDraft {
            text: comment.text.clone(),
            satisfaction: comment.satisfaction,
            confiance: comment.confiance,
            attente: comment.attente.clone(),
        }
    }

    /// 与服务端一致的本地校验：text/attente至少一个非空，评分0-5。
    /// 校验失败不会发起远端调用
    pub fn validate(&self) -> Result<(), AppError> {
        if self.text.trim().is_empty() && self.attente.trim().is_empty() {
            return Err(AppError::Validation(
                "text 或 attente 至少填写一项".to_string(),
            ));
        }
        if self.satisfaction > RATING_MAX || self.confiance > RATING_MAX {
            return Err(AppError::Validation(format!(
                "confiance 与 satisfaction 必须在 0-{} 之间",
                RATING_MAX
            )));
        }
        Ok(())
    }

    pub fn to_payload(&self, ticket: i64) -> CommentPayload {
        CommentPayload {
            id: ticket,
            text: self.text.trim().to_string(),
            satisfaction: self.satisfaction,
            confiance: self.confiance,
            attente: self.attente.trim().to_string(),
        }
    }

    /// 以草稿覆盖缓存副本的可编辑字段，其余字段（服务端维护的）原样保留。
    /// 对同一份已保存草稿重复应用得到相同结果
    pub fn apply_to(&self, cached: Option<&Comment>) -> Comment {
        let mut merged = cached.cloned().unwrap_or_default();
        merged.text = self.text.trim().to_string();
        merged.satisfaction = self.satisfaction;
        merged.confiance = self.confiance;
        merged.attente = self.attente.trim().to_string();
        merged
    }
}

/// 点评写请求的报文体（create与update共用）
#[derive(Debug, Clone, Serialize)]
pub struct CommentPayload {
    pub id: i64,
    pub text: String,
    pub satisfaction: u8,
    pub confiance: u8,
    pub attente: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_text_or_attente() {
        let draft = CommentDraft {
            text: "".to_string(),
            attente: "".to_string(),
            confiance: 3,
            satisfaction: 2,
        };
        assert!(draft.validate().is_err());

        // attente单独填写即可通过
        let draft = CommentDraft {
            text: "".to_string(),
            attente: "follow up".to_string(),
            confiance: 0,
            satisfaction: 0,
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_validate_rating_bounds() {
        let draft = CommentDraft {
            text: "ok".to_string(),
            attente: "".to_string(),
            confiance: 6,
            satisfaction: 0,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_apply_preserves_server_fields() {
        let cached = Comment {
            text: "ancien".to_string(),
            date: "2025.07.03 17:11".to_string(),
            status: "read".to_string(),
            printer: "bridge-01".to_string(),
            ..Comment::default()
        };
        let draft = CommentDraft {
            text: "nouveau".to_string(),
            satisfaction: 4,
            confiance: 3,
            attente: "cassure".to_string(),
        };
        let merged = draft.apply_to(Some(&cached));
        assert_eq!(merged.text, "nouveau");
        assert_eq!(merged.date, "2025.07.03 17:11");
        assert_eq!(merged.status, "read");
        assert_eq!(merged.printer, "bridge-01");
        // 幂等：同一草稿再次应用结果不变
        assert_eq!(draft.apply_to(Some(&merged)), merged);
    }
}
