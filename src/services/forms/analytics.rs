use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FormService, roster};
use crate::middlewares::RequireJWT;
use crate::models::forms::analytics_responses::{
    FieldStats, FormAnalyticsResponse, OptionStat, ResponseStatus, StudentStatusEntry,
};
use crate::models::forms::entities::{AnswerValue, Form, FormResponse};
use crate::models::students::entities::Student;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_form_analytics(
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

    // 权限检查：只有表单创建者或管理员才能查看统计
    if user.role != UserRole::Admin && form.created_by != user.id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只能查看自己创建的表单统计",
        )));
    }

    // 解析当前应答名单（班级指派按当前花名册）
    let students = match roster::resolve_roster(&storage, &form).await {
        Ok(s) => s,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("解析应答名单失败: {e}"),
                )),
            );
        }
    };

    // 全部回复，按提交顺序
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

    let analytics = compute_analytics(&form, &students, &responses);

    Ok(HttpResponse::Ok().json(ApiResponse::success(analytics, "查询成功")))
}

/// 保留一位小数
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 在一条回复中查找某字段的答案
fn find_answer<'a>(response: &'a FormResponse, label: &str) -> Option<&'a AnswerValue> {
    response
        .answers
        .iter()
        .find(|a| a.field == label)
        .map(|a| &a.value)
}

/// 由表单定义、应答名单和回复集合计算统计结果
///
/// 输入顺序决定输出顺序：名单按学号、姓名排，回复按提交顺序排，
/// 字段按定义顺序、选项按声明顺序输出，同样的存储数据两次计算结果相同。
/// 回复中不属于当前定义的答案被忽略（定义是统计的唯一事实来源）。
pub(crate) fn compute_analytics(
    form: &Form,
    students: &[Student],
    responses: &[FormResponse],
) -> FormAnalyticsResponse {
    let total_assigned = students.len() as i64;
    let response_count = responses.len() as i64;

    // 回复率：应答人数为 0 时直接为 0，不做除法
    let response_rate = if total_assigned > 0 {
        round1(response_count as f64 / total_assigned as f64 * 100.0)
    } else {
        0.0
    };

    let responded_ids: HashSet<i64> = responses.iter().map(|r| r.student_id).collect();

    let student_status: Vec<StudentStatusEntry> = students
        .iter()
        .map(|s| StudentStatusEntry {
            student_id: s.id,
            name: s.name.clone(),
            roll_number: s.roll_number,
            status: if responded_ids.contains(&s.id) {
                ResponseStatus::Responded
            } else {
                ResponseStatus::NotResponded
            },
        })
        .collect();

    let field_stats: Vec<FieldStats> = form
        .fields
        .iter()
        .map(|field| {
            if field.field_type.is_choice() {
                // 选项类：按声明顺序对每个选项计数
                let option_stats: Vec<OptionStat> = field
                    .options
                    .iter()
                    .map(|option| {
                        let count = responses
                            .iter()
                            .filter(|r| match find_answer(r, &field.label) {
                                Some(AnswerValue::One(s)) => s == option,
                                Some(AnswerValue::Many(vs)) => vs.contains(option),
                                None => false,
                            })
                            .count() as i64;
                        let percentage = if response_count > 0 {
                            round1(count as f64 / response_count as f64 * 100.0)
                        } else {
                            0.0
                        };
                        OptionStat {
                            option: option.clone(),
                            count,
                            percentage,
                        }
                    })
                    .collect();

                FieldStats {
                    label: field.label.clone(),
                    field_type: field.field_type,
                    option_stats: Some(option_stats),
                    values: None,
                }
            } else {
                // 自由文本：按提交顺序罗列原始值
                let values: Vec<String> = responses
                    .iter()
                    .filter_map(|r| match find_answer(r, &field.label) {
                        Some(AnswerValue::One(s)) => Some(s.clone()),
                        _ => None,
                    })
                    .collect();

                FieldStats {
                    label: field.label.clone(),
                    field_type: field.field_type,
                    option_stats: None,
                    values: Some(values),
                }
            }
        })
        .collect();

    FormAnalyticsResponse {
        form_id: form.id,
        total_assigned,
        responses: response_count,
        response_rate,
        student_status,
        field_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forms::entities::{FieldType, FormAnswer, FormAssignment, FormField};

    fn ts(secs: i64) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn student(id: i64, roll: i32, name: &str) -> Student {
        Student {
            id,
            name: name.to_string(),
            roll_number: roll,
            standard: 5,
            division: "A".to_string(),
            parent_id: Some(100 + id),
            created_at: ts(0),
            updated_at: ts(0),
        }
    }

    fn lunch_form() -> Form {
        Form {
            id: 1,
            title: "午餐调查".to_string(),
            description: None,
            fields: vec![FormField {
                label: "Lunch".to_string(),
                field_type: FieldType::Radio,
                required: true,
                options: vec!["Veg".to_string(), "Non-Veg".to_string()],
            }],
            assigned_to: FormAssignment::Class {
                standard: 5,
                division: "A".to_string(),
            },
            created_by: 10,
            created_at: ts(0),
            updated_at: ts(0),
        }
    }

    fn response(id: i64, student_id: i64, answers: Vec<FormAnswer>, at: i64) -> FormResponse {
        FormResponse {
            id,
            form_id: 1,
            student_id,
            parent_id: Some(100 + student_id),
            answers,
            created_at: ts(at),
        }
    }

    fn one(field: &str, value: &str) -> FormAnswer {
        FormAnswer {
            field: field.to_string(),
            value: AnswerValue::One(value.to_string()),
        }
    }

    fn many(field: &str, values: &[&str]) -> FormAnswer {
        FormAnswer {
            field: field.to_string(),
            value: AnswerValue::Many(values.iter().map(|s| s.to_string()).collect()),
        }
    }

    #[test]
    fn test_radio_counts_and_rate() {
        // 两人应答，一人提交 Veg：回复率 50.0，Veg 100.0 / Non-Veg 0.0
        let form = lunch_form();
        let students = vec![student(1, 1, "张三"), student(2, 2, "李四")];
        let responses = vec![response(1, 1, vec![one("Lunch", "Veg")], 10)];

        let analytics = compute_analytics(&form, &students, &responses);

        assert_eq!(analytics.total_assigned, 2);
        assert_eq!(analytics.responses, 1);
        assert_eq!(analytics.response_rate, 50.0);

        let stats = analytics.field_stats[0].option_stats.as_ref().unwrap();
        assert_eq!(stats[0].option, "Veg");
        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[0].percentage, 100.0);
        assert_eq!(stats[1].option, "Non-Veg");
        assert_eq!(stats[1].count, 0);
        assert_eq!(stats[1].percentage, 0.0);

        assert_eq!(analytics.student_status[0].status, ResponseStatus::Responded);
        assert_eq!(
            analytics.student_status[1].status,
            ResponseStatus::NotResponded
        );
    }

    #[test]
    fn test_empty_roster_no_division_by_zero() {
        let form = lunch_form();
        let analytics = compute_analytics(&form, &[], &[]);
        assert_eq!(analytics.total_assigned, 0);
        assert_eq!(analytics.response_rate, 0.0);
        let stats = analytics.field_stats[0].option_stats.as_ref().unwrap();
        assert!(stats.iter().all(|s| s.count == 0 && s.percentage == 0.0));
    }

    #[test]
    fn test_single_choice_counts_conserve_responses() {
        // 单选字段：各选项计数之和等于作答该字段的回复数
        let form = lunch_form();
        let students = vec![
            student(1, 1, "甲"),
            student(2, 2, "乙"),
            student(3, 3, "丙"),
        ];
        let responses = vec![
            response(1, 1, vec![one("Lunch", "Veg")], 10),
            response(2, 2, vec![one("Lunch", "Non-Veg")], 20),
            response(3, 3, vec![one("Lunch", "Veg")], 30),
        ];

        let analytics = compute_analytics(&form, &students, &responses);
        let stats = analytics.field_stats[0].option_stats.as_ref().unwrap();
        let total: i64 = stats.iter().map(|s| s.count).sum();
        assert_eq!(total, analytics.responses);
        assert_eq!(stats[0].percentage, 66.7);
        assert_eq!(stats[1].percentage, 33.3);
    }

    #[test]
    fn test_checkbox_counts_per_option() {
        // 多选字段：选项计数之和可以超过回复数，单个选项不超过回复数
        let mut form = lunch_form();
        form.fields = vec![FormField {
            label: "兴趣".to_string(),
            field_type: FieldType::Checkbox,
            required: false,
            options: vec!["音乐".to_string(), "体育".to_string(), "绘画".to_string()],
        }];
        let students = vec![student(1, 1, "甲"), student(2, 2, "乙")];
        let responses = vec![
            response(1, 1, vec![many("兴趣", &["音乐", "体育"])], 10),
            response(2, 2, vec![many("兴趣", &["音乐"])], 20),
        ];

        let analytics = compute_analytics(&form, &students, &responses);
        let stats = analytics.field_stats[0].option_stats.as_ref().unwrap();
        assert_eq!(stats[0].count, 2); // 音乐
        assert_eq!(stats[1].count, 1); // 体育
        assert_eq!(stats[2].count, 0); // 绘画
        assert_eq!(stats[0].percentage, 100.0);
        assert!(stats.iter().all(|s| s.count <= analytics.responses));
    }

    #[test]
    fn test_free_text_values_in_submission_order() {
        let mut form = lunch_form();
        form.fields = vec![FormField {
            label: "备注".to_string(),
            field_type: FieldType::Text,
            required: false,
            options: vec![],
        }];
        let students = vec![student(1, 1, "甲"), student(2, 2, "乙")];
        let responses = vec![
            response(1, 2, vec![one("备注", "先到")], 10),
            response(2, 1, vec![one("备注", "后到")], 20),
        ];

        let analytics = compute_analytics(&form, &students, &responses);
        assert_eq!(
            analytics.field_stats[0].values.as_ref().unwrap(),
            &vec!["先到".to_string(), "后到".to_string()]
        );
    }

    #[test]
    fn test_answers_outside_schema_ignored() {
        // 回复中残留的、不在当前定义里的答案不参与统计
        let form = lunch_form();
        let students = vec![student(1, 1, "甲")];
        let responses = vec![response(
            1,
            1,
            vec![one("Lunch", "Veg"), one("已删除字段", "x")],
            10,
        )];

        let analytics = compute_analytics(&form, &students, &responses);
        assert_eq!(analytics.field_stats.len(), 1);
        assert_eq!(analytics.field_stats[0].label, "Lunch");
    }

    #[test]
    fn test_deterministic_output() {
        let form = lunch_form();
        let students = vec![student(1, 1, "甲"), student(2, 2, "乙")];
        let responses = vec![response(1, 1, vec![one("Lunch", "Veg")], 10)];

        let first = serde_json::to_string(&compute_analytics(&form, &students, &responses)).unwrap();
        let second =
            serde_json::to_string(&compute_analytics(&form, &students, &responses)).unwrap();
        assert_eq!(first, second);
    }
}
