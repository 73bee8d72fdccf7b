pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::semesters::requests::CreateSemesterRequest;
use crate::storage::Storage;

pub struct SemesterService {
    storage: Option<Arc<dyn Storage>>,
}

impl SemesterService {
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

    // 学期列表，可选只看激活学期
    pub async fn list_semesters(
        &self,
        request: &HttpRequest,
        active_only: bool,
    ) -> ActixResult<HttpResponse> {
        list::list_semesters(self, request, active_only).await
    }

    pub async fn create_semester(
        &self,
        request: &HttpRequest,
        semester: CreateSemesterRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_semester(self, request, semester).await
    }
}
