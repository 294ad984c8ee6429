//! Request and response types that are not domain entities

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// One page of a listing.
///
/// Paged endpoints answer `{data, totalPages}`; some answer a bare array,
/// which reads as a single page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total_pages: u32,
}

impl<T: DeserializeOwned> Page<T> {
    pub fn from_value(value: Value) -> Result<Self> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Paged {
            #[serde(default)]
            data: Option<Value>,
            #[serde(default)]
            total_pages: Option<u32>,
        }

        match value {
            Value::Array(_) => Ok(Page {
                data: serde_json::from_value(value)?,
                total_pages: 1,
            }),
            Value::Null => Ok(Page {
                data: Vec::new(),
                total_pages: 0,
            }),
            other => {
                let paged: Paged = serde_json::from_value(other)?;
                let data = match paged.data {
                    Some(Value::Null) | None => Vec::new(),
                    Some(data) => serde_json::from_value(data)?,
                };
                Ok(Page {
                    total_pages: paged.total_pages.unwrap_or(1),
                    data,
                })
            }
        }
    }
}

/// Paging parameters (`pageNumber` is one-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub page_number: u32,
    pub page_size: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListParams {
    pub fn page(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: page_number.max(1),
            page_size: page_size.max(1),
        }
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("pageNumber", self.page_number.to_string()),
            ("pageSize", self.page_size.to_string()),
        ]
    }
}

#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForgotPassword {
    pub email: String,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPassword {
    pub user_id: String,
    pub token: String,
    pub new_password: String,
}

impl std::fmt::Debug for ResetPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetPassword")
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .field("new_password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnblockRequest<'a> {
    pub user_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_shapes() {
        let page: Page<i32> = Page::from_value(json!({"data": [1, 2], "totalPages": 3})).unwrap();
        assert_eq!(page.data, vec![1, 2]);
        assert_eq!(page.total_pages, 3);

        let page: Page<i32> = Page::from_value(json!([4, 5, 6])).unwrap();
        assert_eq!((page.data.len(), page.total_pages), (3, 1));

        let page: Page<i32> = Page::from_value(json!({"data": null})).unwrap();
        assert!(page.data.is_empty());

        let page: Page<i32> = Page::from_value(Value::Null).unwrap();
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_list_params_clamp() {
        let params = ListParams::page(0, 0);
        assert_eq!(params, ListParams { page_number: 1, page_size: 1 });
        assert_eq!(
            ListParams::default().query(),
            vec![("pageNumber", "1".to_string()), ("pageSize", "25".to_string())]
        );
    }

    #[test]
    fn test_reset_password_payload() {
        let body = ResetPassword {
            user_id: "u-1".into(),
            token: "tok".into(),
            new_password: "secret1".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"userId": "u-1", "token": "tok", "newPassword": "secret1"})
        );
        assert!(!format!("{body:?}").contains("secret1"));
    }
}
