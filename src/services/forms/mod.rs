pub mod analytics;
pub mod completed;
pub mod create;
pub mod delete;
pub mod detail;
pub mod export;
pub mod list;
pub mod pending;
pub mod roster;
pub mod submit;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::forms::requests::{
    CreateFormRequest, FormListParams, StudentFormsParams, SubmitResponseRequest,
    UpdateFormRequest,
};
use crate::storage::Storage;

pub struct FormService {
    storage: Option<Arc<dyn Storage>>,
}

impl FormService {
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

    pub async fn create_form(
        &self,
        request: &HttpRequest,
        created_by: i64,
        req: CreateFormRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_form(self, request, created_by, req).await
    }

    pub async fn update_form(
        &self,
        request: &HttpRequest,
        form_id: i64,
        req: UpdateFormRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        update::update_form(self, request, form_id, req, user_id).await
    }

    pub async fn delete_form(
        &self,
        request: &HttpRequest,
        form_id: i64,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_form(self, request, form_id, user_id).await
    }

    pub async fn list_forms(
        &self,
        request: &HttpRequest,
        query: FormListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_forms(self, request, query).await
    }

    pub async fn get_form(&self, request: &HttpRequest, form_id: i64) -> ActixResult<HttpResponse> {
        detail::get_form(self, request, form_id).await
    }

    pub async fn list_pending_forms(
        &self,
        request: &HttpRequest,
        query: StudentFormsParams,
    ) -> ActixResult<HttpResponse> {
        pending::list_pending_forms(self, request, query).await
    }

    pub async fn list_completed_forms(
        &self,
        request: &HttpRequest,
        query: StudentFormsParams,
    ) -> ActixResult<HttpResponse> {
        completed::list_completed_forms(self, request, query).await
    }

    pub async fn submit_response(
        &self,
        request: &HttpRequest,
        form_id: i64,
        submitter_id: i64,
        req: SubmitResponseRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_response(self, request, form_id, submitter_id, req).await
    }

    pub async fn get_form_analytics(
        &self,
        request: &HttpRequest,
        form_id: i64,
    ) -> ActixResult<HttpResponse> {
        analytics::get_form_analytics(self, request, form_id).await
    }

    pub async fn export_form_responses(
        &self,
        request: &HttpRequest,
        form_id: i64,
    ) -> ActixResult<HttpResponse> {
        export::export_form_responses(self, request, form_id).await
    }
}
