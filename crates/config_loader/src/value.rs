//! Typed configuration values
//!
//! A key stores either one scalar [`ConfigValue`] or an ordered group of
//! strings. Retrieval matches on the stored tag; there is no implicit
//! conversion between kinds.

use std::fmt;

use contracts::{Quatf, Vec3f};

/// Kind tag of stored content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    Bool,
    Int,
    Float,
    Double,
    String,
    Vec3,
    Quat,
    Group,
}

impl ConfigKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Vec3 => "vec3",
            Self::Quat => "quaternion",
            Self::Group => "string group",
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar value
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Double(f64),
    String(String),
    Vec3(Vec3f),
    Quat(Quatf),
}

impl ConfigValue {
    pub fn kind(&self) -> ConfigKind {
        match self {
            Self::Bool(_) => ConfigKind::Bool,
            Self::Int(_) => ConfigKind::Int,
            Self::Float(_) => ConfigKind::Float,
            Self::Double(_) => ConfigKind::Double,
            Self::String(_) => ConfigKind::String,
            Self::Vec3(_) => ConfigKind::Vec3,
            Self::Quat(_) => ConfigKind::Quat,
        }
    }
}

// Human-readable form; the persisted form lives in `format`.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Vec3(v) => write!(f, "{} {} {}", v.x, v.y, v.z),
            Self::Quat(q) => write!(f, "{} {} {} {}", q.i, q.j, q.k, q.w),
        }
    }
}

/// Content stored under one key
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEntry {
    Scalar(ConfigValue),
    Group(Vec<String>),
}

impl ConfigEntry {
    pub fn kind(&self) -> ConfigKind {
        match self {
            Self::Scalar(value) => value.kind(),
            Self::Group(_) => ConfigKind::Group,
        }
    }
}

/// Rust types that can be stored as a scalar
pub trait ConfigType: Sized {
    const KIND: ConfigKind;

    fn into_value(self) -> ConfigValue;

    /// `None` when the value holds another kind
    fn from_value(value: &ConfigValue) -> Option<Self>;
}

macro_rules! impl_config_type {
    ($ty:ty, $variant:ident) => {
        impl ConfigType for $ty {
            const KIND: ConfigKind = ConfigKind::$variant;

            fn into_value(self) -> ConfigValue {
                ConfigValue::$variant(self)
            }

            fn from_value(value: &ConfigValue) -> Option<Self> {
                match value {
                    ConfigValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }

        impl From<$ty> for ConfigValue {
            fn from(value: $ty) -> Self {
                ConfigValue::$variant(value)
            }
        }
    };
}

impl_config_type!(bool, Bool);
impl_config_type!(i32, Int);
impl_config_type!(f32, Float);
impl_config_type!(f64, Double);
impl_config_type!(String, String);
impl_config_type!(Vec3f, Vec3);
impl_config_type!(Quatf, Quat);

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}
