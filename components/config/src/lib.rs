#![allow(clippy::identity_op)]

pub extern crate paste;
pub extern crate serde;
pub extern crate tracing;

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::Notify;

pub mod util;

/// Declares a configuration section with per-field defaults and optional environment overrides.
///
/// ```ignore
/// config::section! {
///     pub struct Invites {
///         pub expiry_days: u32 = 7 => "DAYOF_INVITE_EXPIRY_DAYS" | config::util::parse[7u32],
///     }
/// }
/// ```
#[macro_export]
macro_rules! section {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {$(
            $(#[$field_meta:meta])*
            $field_vis:vis $field_name:ident : $field_ty:ty = $field_default:expr
                $(=> $field_env:literal
                    $(| $func:path
                        $([  $($param:expr),* ])?
                    )?
                )?
        ),*$(,)?}

        $(impl Extra { $($extra:tt)+ })?
    ) => { $crate::paste::paste! {
        #[derive(Debug, Clone, $crate::serde::Deserialize)]
        $(#[$meta])*
        #[serde(deny_unknown_fields)]
        $vis struct $name {$(
            $(#[$field_meta])*
            $(
                #[doc = ""]
                #[doc = "**Overridden by the `" $field_env "` environment variable.**"]
            )?
            $field_vis $field_name: $field_ty,
        )*}

        impl Default for $name {
            #[inline]
            fn default() -> Self {
                $name {$(
                    $field_name: $field_default,
                )*}
            }
        }

        impl $crate::ConfigExtra for $name {
            $($($extra)+)?
        }

        impl $crate::Configuration for $name {
            fn configure(&mut self) {
                $($(
                    if let Ok(value) = std::env::var($field_env) {
                        $crate::tracing::debug!("Applying environment overwrite for {}.{}=>{}", stringify!($name), stringify!($field_name), $field_env);
                        self.$field_name = ($($func(&value $( $(,$param)* )? ),)? value , ).0.into();
                    }
                )?)*

                $crate::ConfigExtra::configure(self);
            }
        }
    }};
}

/// Declares the root configuration object out of sections.
#[macro_export]
macro_rules! config {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {$(
            $(#[$field_meta:meta])*
            $field:ident: $field_ty:ty
        ),*$(,)?}
    ) => {
        $(#[$meta])*
        #[derive(Default, Debug, Clone, $crate::serde::Deserialize)]
        #[serde(deny_unknown_fields, default)]
        pub struct $name {
            $($(#[$field_meta])* pub $field: $field_ty,)*
        }

        impl $crate::Configuration for $name {
            fn configure(&mut self) {
                $($crate::Configuration::configure(&mut self.$field);)*
            }
        }
    };
}

/// Post-processing hook run after environment overrides, see `impl Extra` in [`section!`]
pub trait ConfigExtra: Configuration {
    fn configure(&mut self) {}
}

pub trait Configuration: serde::de::DeserializeOwned {
    /// Applies any environmental overrides and adjustments
    fn configure(&mut self);
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("TOML Parse Error: {0}")]
    TomlDeError(#[from] toml::de::Error),

    #[error("JSON Error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Reads a configuration file, TOML unless the extension says `.json`,
/// then applies environment overrides on top.
pub async fn load<C: Configuration>(path: impl AsRef<Path>) -> Result<C, ConfigError> {
    let path = path.as_ref();

    let file = tokio::fs::read_to_string(path).await?;

    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let mut config: C = if is_json { serde_json::from_str(&file)? } else { toml::from_str(&file)? };

    config.configure();

    Ok(config)
}

/// Live configuration, swappable at runtime
pub struct Config<C> {
    value: ArcSwap<C>,

    /// Triggered when the config is replaced
    pub config_change: Notify,
}

impl<C> Config<C> {
    pub fn new(value: C) -> Self {
        Config {
            value: ArcSwap::from_pointee(value),
            config_change: Notify::new(),
        }
    }

    #[inline]
    pub fn load(&self) -> arc_swap::Guard<Arc<C>> {
        self.value.load()
    }

    pub fn set(&self, value: C) {
        self.value.store(Arc::new(value));
        self.config_change.notify_waiters();
    }
}

pub trait HasConfig<C> {
    fn raw(&self) -> &Config<C>;

    #[inline]
    fn config(&self) -> arc_swap::Guard<Arc<C>> {
        self.raw().load()
    }
}
