/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : 元素类型（DataType）注册表，以及边/输出槽位上声明的类型（SlotType）
 */

use crate::errors::TensorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 张量的元素类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Float,
    Double,
    Int32,
    UInt8,
    Int16,
    Int8,
    String,
    Complex64,
    Int64,
    Bool,
    QInt8,
    QUInt8,
    QInt32,
    BFloat16,
}

impl DataType {
    pub const ALL: [Self; 14] = [
        Self::Float,
        Self::Double,
        Self::Int32,
        Self::UInt8,
        Self::Int16,
        Self::Int8,
        Self::String,
        Self::Complex64,
        Self::Int64,
        Self::Bool,
        Self::QInt8,
        Self::QUInt8,
        Self::QInt32,
        Self::BFloat16,
    ];

    /// 类型的规范名称（即`from_str`能解析的名称）
    pub const fn name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Double => "double",
            Self::Int32 => "int32",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::Int8 => "int8",
            Self::String => "string",
            Self::Complex64 => "complex64",
            Self::Int64 => "int64",
            Self::Bool => "bool",
            Self::QInt8 => "qint8",
            Self::QUInt8 => "quint8",
            Self::QInt32 => "qint32",
            Self::BFloat16 => "bfloat16",
        }
    }

    pub const fn is_quantized(self) -> bool {
        matches!(self, Self::QInt8 | Self::QUInt8 | Self::QInt32)
    }

    pub const fn is_complex(self) -> bool {
        matches!(self, Self::Complex64)
    }

    /// 可参与算术运算的类型（除string、bool外的所有类型）
    pub const fn is_numeric(self) -> bool {
        !matches!(self, Self::String | Self::Bool)
    }

    /// 可比较大小的实数类型（数值类型中去掉复数和量化类型）
    pub const fn is_real_number(self) -> bool {
        self.is_numeric() && !self.is_complex() && !self.is_quantized()
    }

    /// 该类型的非引用槽位类型
    pub const fn as_slot_type(self) -> SlotType {
        SlotType::value(self)
    }

    /// 该类型的引用槽位类型（如`Variable`的输出）
    pub const fn as_ref_type(self) -> SlotType {
        SlotType::reference(self)
    }
}

impl FromStr for DataType {
    type Err = TensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|dtype| dtype.name() == s)
            .ok_or_else(|| TensorError::UnknownDataType(s.to_string()))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 输出槽位或输入边上声明的类型：元素类型 + 是否为引用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotType {
    pub dtype: DataType,
    pub is_ref: bool,
}

impl SlotType {
    pub const fn value(dtype: DataType) -> Self {
        Self {
            dtype,
            is_ref: false,
        }
    }

    pub const fn reference(dtype: DataType) -> Self {
        Self {
            dtype,
            is_ref: true,
        }
    }

    /// 去掉引用后的类型
    pub const fn base(self) -> Self {
        Self::value(self.dtype)
    }
}

impl From<DataType> for SlotType {
    fn from(dtype: DataType) -> Self {
        Self::value(dtype)
    }
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ref {
            write!(f, "{}_ref", self.dtype)
        } else {
            write!(f, "{}", self.dtype)
        }
    }
}
