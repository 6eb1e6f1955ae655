//! 表单回复导出服务
//!
//! 把一个表单的全部回复导出为 CSV：一行一份回复，列按字段定义顺序，
//! 多选答案用分号连接。导出是统计之上的展示层，依赖同样的有序数据。

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::FormService;
use crate::middlewares::RequireJWT;
use crate::models::forms::entities::{AnswerValue, Form, FormResponse};
use crate::models::students::entities::Student;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn export_form_responses(
    service: &FormService,
    request: &HttpRequest,
    form_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match RequireJWT::extract_user_claims(request) {
        Some(u) => u,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    // 获取表单
    let form = match storage.get_form_by_id(form_id).await {
        Ok(Some(f)) => f,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FormNotFound,
                "表单不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询表单失败: {e}"),
                )),
            );
        }
    };

    // 权限检查：只有表单创建者或管理员才能导出
    if user.role != UserRole::Admin && form.created_by != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只能导出自己创建的表单",
        )));
    }

    // 全部回复（按提交顺序）
    let responses = match storage.list_responses_for_form(form_id).await {
        Ok(r) => r,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询表单回复失败: {e}"),
                )),
            );
        }
    };

    // 学生信息，用于姓名和学号列
    let student_ids: Vec<i64> = responses.iter().map(|r| r.student_id).collect();
    let students = match storage.get_students_by_ids(&student_ids).await {
        Ok(s) => s,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询学生失败: {e}"),
                )),
            );
        }
    };
    let student_map: HashMap<i64, Student> = students.into_iter().map(|s| (s.id, s)).collect();

    let csv_bytes = match render_responses_csv(&form, &student_map, &responses) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("CSV rendering failed for form {}: {}", form_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("生成 CSV 失败: {e}"),
                )),
            );
        }
    };

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"form_{form_id}_responses.csv\""),
        ))
        .body(csv_bytes))
}

/// 把回复集合渲染为 CSV 字节
///
/// 表头：学号、姓名、提交时间 + 字段 label（按定义顺序）。
/// 行按回复的提交顺序；未作答的字段留空；多选答案以 ";" 连接。
pub(crate) fn render_responses_csv(
    form: &Form,
    student_map: &HashMap<i64, Student>,
    responses: &[FormResponse],
) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(vec![]);

    // 表头
    let mut header = vec![
        "roll_number".to_string(),
        "student".to_string(),
        "submitted_at".to_string(),
    ];
    for field in &form.fields {
        header.push(field.label.clone());
    }
    writer.write_record(&header)?;

    for response in responses {
        let (roll, name) = match student_map.get(&response.student_id) {
            Some(s) => (s.roll_number.to_string(), s.name.clone()),
            None => (String::new(), format!("#{}", response.student_id)),
        };

        let mut record = vec![roll, name, response.created_at.to_rfc3339()];
        for field in &form.fields {
            let cell = response
                .answers
                .iter()
                .find(|a| a.field == field.label)
                .map(|a| match &a.value {
                    AnswerValue::One(s) => s.clone(),
                    AnswerValue::Many(vs) => vs.join(";"),
                })
                .unwrap_or_default();
            record.push(cell);
        }
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forms::entities::{
        FieldType, FormAnswer, FormAssignment, FormField,
    };

    fn ts(secs: i64) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_csv_layout_and_multi_value_join() {
        let form = Form {
            id: 1,
            title: "兴趣调查".to_string(),
            description: None,
            fields: vec![
                FormField {
                    label: "兴趣".to_string(),
                    field_type: FieldType::Checkbox,
                    required: true,
                    options: vec!["音乐".to_string(), "体育".to_string()],
                },
                FormField {
                    label: "备注".to_string(),
                    field_type: FieldType::Text,
                    required: false,
                    options: vec![],
                },
            ],
            assigned_to: FormAssignment::Students {
                student_ids: vec![7],
            },
            created_by: 10,
            created_at: ts(0),
            updated_at: ts(0),
        };

        let mut student_map = HashMap::new();
        student_map.insert(
            7,
            Student {
                id: 7,
                name: "张三".to_string(),
                roll_number: 12,
                standard: 5,
                division: "A".to_string(),
                parent_id: Some(70),
                created_at: ts(0),
                updated_at: ts(0),
            },
        );

        let responses = vec![FormResponse {
            id: 1,
            form_id: 1,
            student_id: 7,
            parent_id: Some(70),
            answers: vec![FormAnswer {
                field: "兴趣".to_string(),
                value: AnswerValue::Many(vec!["音乐".to_string(), "体育".to_string()]),
            }],
            created_at: ts(60),
        }];

        let bytes = render_responses_csv(&form, &student_map, &responses).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("roll_number,student,submitted_at,"));
        assert!(lines[0].ends_with("兴趣,备注"));
        assert!(lines[1].contains("12,张三"));
        assert!(lines[1].contains("音乐;体育"));
        // 未作答的字段留空
        assert!(lines[1].ends_with(','));
    }
}
