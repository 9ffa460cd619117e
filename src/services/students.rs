use serde_json::Value;

use super::ResourceClient;
use crate::errors::Result;
use crate::models::students::Student;

impl ResourceClient<Student> {
    // 学生的选课记录
    pub async fn enrollments(&self, student_id: i64) -> Result<Value> {
        self.api()
            .get(&format!("/students/{student_id}/enrollments"))
            .await
    }
}
