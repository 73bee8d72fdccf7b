pub mod create;
pub mod delete;
pub mod list;
pub mod my_courses;
pub mod self_enroll;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::enrollments::requests::{CreateEnrollmentRequest, SelfEnrollRequest};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 选课明细列表（管理员）
    pub async fn list_enrollments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_enrollments(self, request).await
    }

    // 管理员创建选课记录
    pub async fn create_enrollment(
        &self,
        request: &HttpRequest,
        enrollment: CreateEnrollmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_enrollment(self, request, enrollment).await
    }

    // 管理员删除选课记录
    pub async fn delete_enrollment(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_enrollment(self, request, enrollment_id).await
    }

    // 学生自助选课（课程目录页）
    pub async fn self_enroll(
        &self,
        request: &HttpRequest,
        payload: SelfEnrollRequest,
    ) -> ActixResult<HttpResponse> {
        self_enroll::self_enroll(self, request, payload).await
    }

    // 学生已选课程列表
    pub async fn my_courses(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        my_courses::my_courses(self, request).await
    }
}
