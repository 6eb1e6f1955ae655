use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 字段类型
// 决定答案的形态：text/email 为自由文本，select/radio 为单选，checkbox 为多选集合
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub enum FieldType {
    Text,
    Email,
    Select,
    Radio,
    Checkbox,
}

impl FieldType {
    pub const TEXT: &'static str = "text";
    pub const EMAIL: &'static str = "email";
    pub const SELECT: &'static str = "select";
    pub const RADIO: &'static str = "radio";
    pub const CHECKBOX: &'static str = "checkbox";

    /// 是否为选项类字段（需要声明 options）
    pub fn is_choice(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio | FieldType::Checkbox)
    }

    /// 是否为多选字段（答案为选项集合）
    pub fn is_multi(&self) -> bool {
        matches!(self, FieldType::Checkbox)
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            FieldType::TEXT => Ok(FieldType::Text),
            FieldType::EMAIL => Ok(FieldType::Email),
            FieldType::SELECT => Ok(FieldType::Select),
            FieldType::RADIO => Ok(FieldType::Radio),
            FieldType::CHECKBOX => Ok(FieldType::Checkbox),
            _ => Err(serde::de::Error::custom(format!(
                "无效的字段类型: '{s}'. 支持的类型: text, email, select, radio, checkbox"
            ))),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Text => write!(f, "{}", FieldType::TEXT),
            FieldType::Email => write!(f, "{}", FieldType::EMAIL),
            FieldType::Select => write!(f, "{}", FieldType::SELECT),
            FieldType::Radio => write!(f, "{}", FieldType::RADIO),
            FieldType::Checkbox => write!(f, "{}", FieldType::CHECKBOX),
        }
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(FieldType::Text),
            "email" => Ok(FieldType::Email),
            "select" => Ok(FieldType::Select),
            "radio" => Ok(FieldType::Radio),
            "checkbox" => Ok(FieldType::Checkbox),
            _ => Err(format!("Invalid field type: {s}")),
        }
    }
}

// 表单字段定义
// label 在表单内唯一，同时作为答案的键和统计的对齐键
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct FormField {
    pub label: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    // 选项类字段的声明选项，顺序即渲染顺序和统计输出顺序
    #[serde(default)]
    pub options: Vec<String>,
}

// 表单指派目标
//
// Class 指派在每次解析花名册时重新查询当前班级成员（动态成员）；
// Students 指派是创建时固定的学生快照，之后的转班不影响名单。
// 这个不对称是有意为之的，两种用途并存：长期班级表单和一次性定向表单。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub enum FormAssignment {
    Class { standard: i32, division: String },
    Students { student_ids: Vec<i64> },
}

// 表单实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct Form {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    // 有序字段列表，顺序对渲染和统计输出有意义
    pub fields: Vec<FormField>,
    pub assigned_to: FormAssignment,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 答案值
// 在校验阶段按字段声明类型解析一次：单选/文本为 One，多选为 Many
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub enum AnswerValue {
    One(String),
    Many(Vec<String>),
}

// 单条答案，field 对应字段 label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct FormAnswer {
    pub field: String,
    pub value: AnswerValue,
}

// 表单回复实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct FormResponse {
    pub id: i64,
    pub form_id: i64,
    pub student_id: i64,
    pub parent_id: Option<i64>,
    pub answers: Vec<FormAnswer>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 字段级校验错误，一次提交收集全部错误后整体返回
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

/// 校验表单定义，返回所有违反的约束（而非只报第一个）
///
/// 返回空列表表示定义合法。
pub fn validate_definition(
    title: &str,
    fields: &[FormField],
    assigned_to: &FormAssignment,
) -> Vec<String> {
    let mut errors = Vec::new();

    if title.trim().is_empty() {
        errors.push("表单标题不能为空".to_string());
    }

    if fields.is_empty() {
        errors.push("表单至少需要一个字段".to_string());
    }

    let mut seen_labels = std::collections::HashSet::new();
    for field in fields {
        let label = field.label.trim();
        if label.is_empty() {
            errors.push("字段标签不能为空".to_string());
            continue;
        }
        if !seen_labels.insert(label) {
            errors.push(format!("字段标签重复: {label}"));
        }

        if field.field_type.is_choice() {
            if field.options.is_empty() {
                errors.push(format!("字段 '{label}' 是选项类字段，至少需要一个选项"));
            } else {
                if field.options.iter().any(|o| o.trim().is_empty()) {
                    errors.push(format!("字段 '{label}' 含有空选项"));
                }
                let mut seen_options = std::collections::HashSet::new();
                for option in &field.options {
                    if !seen_options.insert(option.as_str()) {
                        errors.push(format!("字段 '{label}' 选项重复: {option}"));
                    }
                }
            }
        }
    }

    match assigned_to {
        FormAssignment::Class { standard, division } => {
            if *standard < 1 {
                errors.push(format!("无效的年级: {standard}"));
            }
            if division.trim().is_empty() {
                errors.push("分班不能为空".to_string());
            }
        }
        FormAssignment::Students { student_ids } => {
            if student_ids.is_empty() {
                errors.push("定向指派至少需要一名学生".to_string());
            }
        }
    }

    errors
}

/// 按表单字段定义校验并规范化一次提交的答案
///
/// 成功时返回按字段定义顺序排列的规范化答案列表：
/// - 未在定义中的答案被忽略（定义是统计的唯一事实来源）
/// - checkbox 答案去重并按声明选项顺序排列
/// - 非必填且为空的字段不出现在结果中
///
/// 失败时返回所有字段错误（而非只报第一个），供 UI 一次性标出全部问题。
pub fn validate_answers(
    fields: &[FormField],
    answers: &[FormAnswer],
) -> Result<Vec<FormAnswer>, Vec<FieldError>> {
    let mut errors: Vec<FieldError> = Vec::new();
    let mut normalized: Vec<FormAnswer> = Vec::new();

    for field in fields {
        let submitted = answers.iter().find(|a| a.field == field.label);

        // 空值视为未作答
        let value = match submitted {
            Some(answer) => match &answer.value {
                AnswerValue::One(s) if s.trim().is_empty() => None,
                AnswerValue::Many(vs) if vs.is_empty() => None,
                other => Some(other),
            },
            None => None,
        };

        let Some(value) = value else {
            if field.required {
                errors.push(FieldError {
                    field: field.label.clone(),
                    reason: "必填字段未作答".to_string(),
                });
            }
            continue;
        };

        match field.field_type {
            FieldType::Text => match value {
                AnswerValue::One(s) => normalized.push(FormAnswer {
                    field: field.label.clone(),
                    value: AnswerValue::One(s.clone()),
                }),
                AnswerValue::Many(_) => errors.push(FieldError {
                    field: field.label.clone(),
                    reason: "应为单个文本值".to_string(),
                }),
            },
            FieldType::Email => match value {
                AnswerValue::One(s) => {
                    if crate::utils::validate::validate_email(s).is_ok() {
                        normalized.push(FormAnswer {
                            field: field.label.clone(),
                            value: AnswerValue::One(s.clone()),
                        });
                    } else {
                        errors.push(FieldError {
                            field: field.label.clone(),
                            reason: "邮箱格式不正确".to_string(),
                        });
                    }
                }
                AnswerValue::Many(_) => errors.push(FieldError {
                    field: field.label.clone(),
                    reason: "应为单个邮箱地址".to_string(),
                }),
            },
            FieldType::Select | FieldType::Radio => match value {
                AnswerValue::One(s) => {
                    if field.options.iter().any(|o| o == s) {
                        normalized.push(FormAnswer {
                            field: field.label.clone(),
                            value: AnswerValue::One(s.clone()),
                        });
                    } else {
                        errors.push(FieldError {
                            field: field.label.clone(),
                            reason: format!("'{s}' 不在声明的选项中"),
                        });
                    }
                }
                AnswerValue::Many(_) => errors.push(FieldError {
                    field: field.label.clone(),
                    reason: "应为单个选项".to_string(),
                }),
            },
            FieldType::Checkbox => match value {
                AnswerValue::Many(vs) => {
                    let unknown: Vec<&String> = vs
                        .iter()
                        .filter(|v| !field.options.iter().any(|o| &o == v))
                        .collect();
                    if unknown.is_empty() {
                        // 集合语义：去重并按声明选项顺序排列
                        let selected: std::collections::HashSet<&str> =
                            vs.iter().map(|s| s.as_str()).collect();
                        let values: Vec<String> = field
                            .options
                            .iter()
                            .filter(|o| selected.contains(o.as_str()))
                            .cloned()
                            .collect();
                        normalized.push(FormAnswer {
                            field: field.label.clone(),
                            value: AnswerValue::Many(values),
                        });
                    } else {
                        errors.push(FieldError {
                            field: field.label.clone(),
                            reason: format!(
                                "含有未声明的选项: {}",
                                unknown
                                    .iter()
                                    .map(|s| s.as_str())
                                    .collect::<Vec<_>>()
                                    .join(", ")
                            ),
                        });
                    }
                }
                AnswerValue::One(_) => errors.push(FieldError {
                    field: field.label.clone(),
                    reason: "应为选项列表".to_string(),
                }),
            },
        }
    }

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_field(label: &str, required: bool) -> FormField {
        FormField {
            label: label.to_string(),
            field_type: FieldType::Text,
            required,
            options: vec![],
        }
    }

    fn choice_field(label: &str, field_type: FieldType, options: &[&str]) -> FormField {
        FormField {
            label: label.to_string(),
            field_type,
            required: true,
            options: options.iter().map(|s| s.to_string()).collect(),
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
    fn test_valid_definition_passes() {
        let fields = vec![
            choice_field("午餐", FieldType::Radio, &["荤", "素"]),
            text_field("备注", false),
        ];
        let assigned = FormAssignment::Class {
            standard: 5,
            division: "A".to_string(),
        };
        assert!(validate_definition("午餐调查", &fields, &assigned).is_empty());
    }

    #[test]
    fn test_definition_collects_all_violations() {
        // 空标题 + 标签重复 + 选项类字段无选项 + 空学生列表，应一次性全部报出
        let fields = vec![
            choice_field("口味", FieldType::Select, &[]),
            text_field("口味", true),
        ];
        let assigned = FormAssignment::Students {
            student_ids: vec![],
        };
        let errors = validate_definition("", &fields, &assigned);
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_definition_rejects_duplicate_options() {
        let fields = vec![choice_field("午餐", FieldType::Radio, &["荤", "荤"])];
        let assigned = FormAssignment::Class {
            standard: 5,
            division: "A".to_string(),
        };
        let errors = validate_definition("午餐调查", &fields, &assigned);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("选项重复"));
    }

    #[test]
    fn test_answers_collects_all_field_errors() {
        // 两个必填字段未作答 + 一个邮箱格式错误，应返回 3 条字段错误
        let fields = vec![
            text_field("姓名", true),
            text_field("地址", true),
            FormField {
                label: "联系邮箱".to_string(),
                field_type: FieldType::Email,
                required: true,
                options: vec![],
            },
        ];
        let answers = vec![one("联系邮箱", "not-an-email")];
        let errors = validate_answers(&fields, &answers).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.field == "姓名"));
        assert!(errors.iter().any(|e| e.field == "地址"));
        assert!(
            errors
                .iter()
                .any(|e| e.field == "联系邮箱" && e.reason.contains("邮箱"))
        );
    }

    #[test]
    fn test_answers_unknown_labels_ignored() {
        let fields = vec![text_field("备注", false)];
        let answers = vec![one("备注", "无"), one("已删除的字段", "x")];
        let normalized = validate_answers(&fields, &answers).unwrap();
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].field, "备注");
    }

    #[test]
    fn test_radio_rejects_unknown_option() {
        let fields = vec![choice_field("午餐", FieldType::Radio, &["荤", "素"])];
        let answers = vec![one("午餐", "半荤")];
        let errors = validate_answers(&fields, &answers).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "午餐");
    }

    #[test]
    fn test_checkbox_subset_and_normalization() {
        let fields = vec![choice_field(
            "兴趣",
            FieldType::Checkbox,
            &["音乐", "体育", "绘画"],
        )];

        // 子集合法，去重并按声明顺序排列
        let answers = vec![many("兴趣", &["绘画", "音乐", "绘画"])];
        let normalized = validate_answers(&fields, &answers).unwrap();
        assert_eq!(
            normalized[0].value,
            AnswerValue::Many(vec!["音乐".to_string(), "绘画".to_string()])
        );

        // 非子集报错
        let answers = vec![many("兴趣", &["音乐", "编程"])];
        let errors = validate_answers(&fields, &answers).unwrap_err();
        assert!(errors[0].reason.contains("编程"));
    }

    #[test]
    fn test_checkbox_rejects_scalar_value() {
        let fields = vec![choice_field("兴趣", FieldType::Checkbox, &["音乐", "体育"])];
        let answers = vec![one("兴趣", "音乐")];
        assert!(validate_answers(&fields, &answers).is_err());
    }

    #[test]
    fn test_optional_empty_answer_skipped() {
        let fields = vec![text_field("备注", false)];
        let answers = vec![one("备注", "  ")];
        let normalized = validate_answers(&fields, &answers).unwrap();
        assert!(normalized.is_empty());
    }

    #[test]
    fn test_required_empty_checkbox_rejected() {
        let fields = vec![choice_field("兴趣", FieldType::Checkbox, &["音乐"])];
        let answers = vec![many("兴趣", &[])];
        let errors = validate_answers(&fields, &answers).unwrap_err();
        assert_eq!(errors[0].reason, "必填字段未作答");
    }

    #[test]
    fn test_assignment_serde_shape() {
        let class = FormAssignment::Class {
            standard: 5,
            division: "A".to_string(),
        };
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["type"], "class");
        assert_eq!(json["standard"], 5);

        let specific: FormAssignment =
            serde_json::from_value(serde_json::json!({"type": "students", "student_ids": [1, 2]}))
                .unwrap();
        assert_eq!(
            specific,
            FormAssignment::Students {
                student_ids: vec![1, 2]
            }
        );
    }

    #[test]
    fn test_answer_value_serde_shape() {
        let v: AnswerValue = serde_json::from_str("\"素\"").unwrap();
        assert_eq!(v, AnswerValue::One("素".to_string()));

        let v: AnswerValue = serde_json::from_str("[\"音乐\",\"体育\"]").unwrap();
        assert_eq!(
            v,
            AnswerValue::Many(vec!["音乐".to_string(), "体育".to_string()])
        );
    }
}
