use serde_json::Value;

use super::ResourceClient;
use crate::errors::Result;
use crate::models::courses::Course;

impl ResourceClient<Course> {
    // 课程的选课学生
    pub async fn enrollments(&self, course_id: i64) -> Result<Value> {
        self.api()
            .get(&format!("/courses/{course_id}/enrollments"))
            .await
    }

    // 剩余名额
    pub async fn available_spots(&self, course_id: i64) -> Result<Value> {
        self.api()
            .get(&format!("/courses/{course_id}/available-spots"))
            .await
    }
}
