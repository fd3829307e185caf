/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 节点属性值（AttrValue）
 */

use crate::tensor::{DataType, Tensor, TensorShape};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点属性值，序列化为`{"s": ...}`、`{"i": ...}`这样的单键对象
///
/// JSON 中非有限的浮点数写为`"NaN"`、`"Infinity"`、`"-Infinity"`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrValue {
    S(String),
    I(i64),
    F(#[serde(with = "crate::tensor::float_serde::scalar")] f32),
    B(bool),
    Type(DataType),
    Shape(TensorShape),
    Tensor(Tensor),
}

/// 属性的种类（用于算子定义中声明属性类型）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrKind {
    String,
    Int,
    Float,
    Bool,
    Type,
    Shape,
    Tensor,
}

impl AttrKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Type => "type",
            Self::Shape => "shape",
            Self::Tensor => "tensor",
        }
    }
}

impl AttrValue {
    pub const fn kind(&self) -> AttrKind {
        match self {
            Self::S(_) => AttrKind::String,
            Self::I(_) => AttrKind::Int,
            Self::F(_) => AttrKind::Float,
            Self::B(_) => AttrKind::Bool,
            Self::Type(_) => AttrKind::Type,
            Self::Shape(_) => AttrKind::Shape,
            Self::Tensor(_) => AttrKind::Tensor,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::I(i) => Some(*i),
            _ => None,
        }
    }

    pub const fn as_float(&self) -> Option<f32> {
        match self {
            Self::F(f) => Some(*f),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::B(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn as_type(&self) -> Option<DataType> {
        match self {
            Self::Type(t) => Some(*t),
            _ => None,
        }
    }

    pub const fn as_shape(&self) -> Option<&TensorShape> {
        match self {
            Self::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub const fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Self::Tensor(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S(s) => write!(f, "{s:?}"),
            Self::I(i) => write!(f, "{i}"),
            Self::F(x) => write!(f, "{x:?}"),
            Self::B(b) => write!(f, "{b}"),
            Self::Type(t) => write!(f, "{t}"),
            Self::Shape(s) => write!(f, "{s}"),
            Self::Tensor(t) => write!(f, "<{} 张量 {}>", t.dtype(), t.tensor_shape()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::S(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::S(s)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        Self::I(i)
    }
}

impl From<i32> for AttrValue {
    fn from(i: i32) -> Self {
        Self::I(i64::from(i))
    }
}

impl From<f32> for AttrValue {
    fn from(f: f32) -> Self {
        Self::F(f)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::B(b)
    }
}

impl From<DataType> for AttrValue {
    fn from(t: DataType) -> Self {
        Self::Type(t)
    }
}

impl From<TensorShape> for AttrValue {
    fn from(s: TensorShape) -> Self {
        Self::Shape(s)
    }
}

impl From<&TensorShape> for AttrValue {
    fn from(s: &TensorShape) -> Self {
        Self::Shape(s.clone())
    }
}

impl From<Tensor> for AttrValue {
    fn from(t: Tensor) -> Self {
        Self::Tensor(t)
    }
}

impl From<&Tensor> for AttrValue {
    fn from(t: &Tensor) -> Self {
        Self::Tensor(t.clone())
    }
}
