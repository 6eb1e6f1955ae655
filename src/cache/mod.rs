//! 缓存层
//!
//! 通过插件注册表支持多种缓存后端（Moka 内存缓存 / Redis），
//! 后端在编译期通过 ctor 自注册，启动时按配置选择。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明并自注册一个缓存后端插件
///
/// 用法：`declare_object_cache_plugin!("moka", MokaCacheWrapper);`
/// 要求类型提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ident) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_object_cache_ $ty:snake>]() {
                use std::sync::Arc;
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    Arc::new(|| {
                        Box::pin(async {
                            let cache = $ty::new().map_err(|e| {
                                $crate::errors::FormSystemError::cache_connection(e)
                            })?;
                            Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                        })
                    }),
                );
            }
        }
    };
}
