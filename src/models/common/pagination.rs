use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::serde_ext::value_as_i64;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

// 列表查询参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    /// 空字符串表示不过滤
    pub search: String,
}

impl ListQuery {
    pub fn new(page: u32, page_size: u32, search: impl Into<String>) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            search: search.into(),
        }
    }

    /// 转换为请求参数 `page`、`limit`、`search`
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("limit", self.page_size.to_string()),
            ("search", self.search.clone()),
        ]
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search: String::new(),
        }
    }
}

// 服务端列表响应：{ data: [...], pagination: { currentPage, totalXxx } }
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Option::default")]
    pub data: Option<Vec<T>>,
    #[serde(default)]
    pub pagination: Option<Map<String, Value>>,
}

// 一页数据
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl<T> ListResponse<T> {
    /// 转换为分页结果
    ///
    /// 分页信息缺失时：当前页取请求页，总数取本页条数。
    pub fn into_page(self, query: &ListQuery, total_key: &str) -> Page<T> {
        let data = self.data.unwrap_or_default();
        let pagination = self.pagination.unwrap_or_default();

        let current_page = pagination
            .get("currentPage")
            .and_then(value_as_i64)
            .filter(|page| *page > 0)
            .map(|page| page as u32)
            .unwrap_or(query.page);
        let total = pagination
            .get(total_key)
            .and_then(value_as_i64)
            .filter(|total| *total >= 0)
            .map(|total| total as u64)
            .unwrap_or(data.len() as u64);

        Page {
            data,
            current_page,
            page_size: query.page_size,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_page_uses_resource_total_key() {
        let response: ListResponse<Value> = serde_json::from_value(json!({
            "data": [{"id": 1}, {"id": 2}],
            "pagination": {"currentPage": 3, "totalCourses": "42", "totalPages": 5}
        }))
        .unwrap();

        let page = response.into_page(&ListQuery::new(3, 10, ""), "totalCourses");
        assert_eq!(page.current_page, 3);
        assert_eq!(page.total, 42);
        assert_eq!(page.data.len(), 2);
    }

    #[test]
    fn test_into_page_without_pagination_falls_back_to_data_length() {
        let response: ListResponse<Value> =
            serde_json::from_value(json!({"data": [{"id": 1}, {"id": 2}, {"id": 3}]})).unwrap();

        let page = response.into_page(&ListQuery::new(2, 25, "x"), "totalInstructors");
        assert_eq!(page.current_page, 2);
        assert_eq!(page.page_size, 25);
        assert_eq!(page.total, 3);
    }

    #[test]
    fn test_into_page_without_data() {
        let response: ListResponse<Value> = serde_json::from_value(json!({})).unwrap();
        let page = response.into_page(&ListQuery::default(), "totalStudents");
        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_list_query_params() {
        let query = ListQuery::new(0, 0, "CS101");
        assert_eq!(
            query.to_params(),
            vec![
                ("page", "1".to_string()),
                ("limit", "1".to_string()),
                ("search", "CS101".to_string()),
            ]
        );
    }
}
