//! 预导入模块，方便使用

pub use super::form_responses::{
    ActiveModel as FormResponseActiveModel, Entity as FormResponses, Model as FormResponseModel,
};
pub use super::form_targets::{
    ActiveModel as FormTargetActiveModel, Entity as FormTargets, Model as FormTargetModel,
};
pub use super::forms::{ActiveModel as FormActiveModel, Entity as Forms, Model as FormModel};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
