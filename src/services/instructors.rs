use reqwest::Method;
use serde_json::Value;

use super::ResourceClient;
use crate::errors::Result;
use crate::models::instructors::{Instructor, InstructorPayload};

impl ResourceClient<Instructor> {
    // 讲师开设的课程
    pub async fn courses(&self, instructor_id: i64) -> Result<Value> {
        self.api()
            .get(&format!("/instructors/{instructor_id}/courses"))
            .await
    }

    // 讲师课程下的学生
    pub async fn students(&self, instructor_id: i64) -> Result<Value> {
        self.api()
            .get(&format!("/instructors/{instructor_id}/students"))
            .await
    }

    // 以下接口需要登录
    pub async fn my_courses(&self) -> Result<Value> {
        self.api().get("/instructors/my-courses").await
    }

    pub async fn analytics(&self) -> Result<Value> {
        self.api().get("/instructors/analytics").await
    }

    /// 更新当前讲师的资料
    pub async fn update_profile(&self, payload: &InstructorPayload) -> Result<Instructor> {
        self.api()
            .request_data(Method::PUT, "/instructors/profile", &[], Some(payload))
            .await
    }
}
