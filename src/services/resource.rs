//! 通用资源客户端
//!
//! 三类资源共用同一套 REST 约定：
//! `GET /{r}`、`GET /{r}/{id}`、`POST /{r}`、`PUT /{r}/{id}`、`DELETE /{r}/{id}`。

use async_trait::async_trait;
use reqwest::Method;
use std::marker::PhantomData;
use tracing::{debug, info};

use super::ApiClient;
use crate::errors::Result;
use crate::models::{Entity, ListQuery, ListResponse, Page};

/// 资源访问接口，视图只依赖这个 trait
#[async_trait]
pub trait ResourceGateway<E: Entity>: Send + Sync {
    async fn list(&self, query: &ListQuery) -> Result<Page<E>>;
    async fn get_by_id(&self, id: i64) -> Result<E>;
    /// 成功但响应中没有记录时返回 `None`
    async fn create(&self, payload: &E::Payload) -> Result<Option<E>>;
    async fn update(&self, id: i64, payload: &E::Payload) -> Result<Option<E>>;
    async fn delete_by_id(&self, id: i64) -> Result<()>;
}

pub struct ResourceClient<E> {
    api: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> ResourceClient<E> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            _entity: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub(crate) fn collection_path() -> String {
        format!("/{}", E::RESOURCE)
    }

    pub(crate) fn item_path(id: i64) -> String {
        format!("/{}/{}", E::RESOURCE, id)
    }
}

impl<E> Clone for ResourceClient<E> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: Entity> ResourceGateway<E> for ResourceClient<E> {
    async fn list(&self, query: &ListQuery) -> Result<Page<E>> {
        let body = self
            .api
            .request_json::<()>(
                Method::GET,
                &Self::collection_path(),
                &query.to_params(),
                None,
            )
            .await?;
        let response: ListResponse<E> = serde_json::from_value(body)?;
        let page = response.into_page(query, E::TOTAL_KEY);
        debug!(
            "Fetched {} {} (page {}, total {})",
            page.data.len(),
            E::plural(),
            page.current_page,
            page.total
        );
        Ok(page)
    }

    async fn get_by_id(&self, id: i64) -> Result<E> {
        self.api.get(&Self::item_path(id)).await
    }

    async fn create(&self, payload: &E::Payload) -> Result<Option<E>> {
        let created: Option<E> = self
            .api
            .request_optional_data(Method::POST, &Self::collection_path(), &[], Some(payload))
            .await?;
        match &created {
            Some(record) => info!("{} {} created", E::SINGULAR, record.id()),
            None => info!("{} created", E::SINGULAR),
        }
        Ok(created)
    }

    async fn update(&self, id: i64, payload: &E::Payload) -> Result<Option<E>> {
        let updated = self
            .api
            .request_optional_data(Method::PUT, &Self::item_path(id), &[], Some(payload))
            .await?;
        info!("{} {} updated", E::SINGULAR, id);
        Ok(updated)
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        self.api.delete(&Self::item_path(id)).await?;
        info!("{} {} deleted", E::SINGULAR, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConsoleError;
    use crate::models::courses::{Course, CoursePayload};
    use crate::models::students::{Student, StudentPayload};
    use crate::session::SessionState;
    use chrono::NaiveDate;
    use mockito::Matcher;
    use std::sync::Arc;

    fn client<E: Entity>(url: String) -> ResourceClient<E> {
        let api = ApiClient::new(url, Arc::new(SessionState::default())).unwrap();
        ResourceClient::new(api)
    }

    #[tokio::test]
    async fn test_list_sends_search_and_paging_params() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/courses")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("limit".into(), "10".into()),
                Matcher::UrlEncoded("search".into(), "CS101".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":[{"course_id":1,"course_name":"Intro","course_code":"CS101",
                "credits":"3","max_capacity":30}],
                "pagination":{"currentPage":1,"totalCourses":1}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let courses = client::<Course>(server.url());
        let page = courses
            .list(&ListQuery::new(1, 10, "CS101"))
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].course_code, "CS101");
        assert_eq!(page.data[0].credits, 3);
    }

    #[tokio::test]
    async fn test_create_returns_server_record() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("POST", "/courses")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "course_code": "CS201",
                "start_date": "2030-01-10",
                "end_date": "2030-05-10"
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success":true,"data":{"course_id":9,"course_name":"Data Structures",
                "course_code":"CS201","credits":4,"max_capacity":40,"instructor_id":5}}"#,
            )
            .create_async()
            .await;

        let payload = CoursePayload {
            course_name: "Data Structures".to_string(),
            course_code: "CS201".to_string(),
            description: None,
            credits: 4,
            max_capacity: 40,
            start_date: NaiveDate::from_ymd_opt(2030, 1, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2030, 5, 10).unwrap(),
        };
        let created = client::<Course>(server.url())
            .create(&payload)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.course_id, 9);
        assert_eq!(created.instructor_id, Some(5));
    }

    #[tokio::test]
    async fn test_create_accepted_without_record() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("POST", "/students")
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"message":"Student created successfully"}"#)
            .expect(1)
            .create_async()
            .await;

        let payload = StudentPayload {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@uni.edu".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2004, 12, 10).unwrap(),
            phone: None,
            address: None,
        };
        let created = client::<Student>(server.url())
            .create(&payload)
            .await
            .unwrap();
        assert_eq!(created, None);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_conflict_keeps_server_message() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("DELETE", "/students/3")
            .with_status(409)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":false,"error":"Student has active enrollments"}"#)
            .create_async()
            .await;

        let err = client::<Student>(server.url())
            .delete_by_id(3)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ConsoleError::conflict("Student has active enrollments")
        );
    }

    #[tokio::test]
    async fn test_get_missing_record() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/students/404")
            .with_status(404)
            .with_body(r#"{"success":false,"error":"Student not found"}"#)
            .create_async()
            .await;

        let err = client::<Student>(server.url())
            .get_by_id(404)
            .await
            .unwrap_err();
        assert_eq!(err, ConsoleError::not_found("Student not found"));
    }
}
