/*
 * @Author       : 老董
 * @Date         : 2026-10-18
 * @Description  : 浮点数的序列化辅助（用于`#[serde(with = ...)]`）
 *
 * serde_json 会把 NaN、±inf 写成`null`且无法读回，这里在人类可读格式（JSON）中
 * 把它们写为字符串`"NaN"`、`"Infinity"`、`"-Infinity"`；二进制格式（bincode）照常写出。
 */

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

const NAN: &str = "NaN";
const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

pub(crate) trait JsonFloat: Copy + Serialize + de::DeserializeOwned {
    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;
}

impl JsonFloat for f32 {
    fn from_f64(value: f64) -> Self {
        value as f32
    }

    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl JsonFloat for f64 {
    fn from_f64(value: f64) -> Self {
        value
    }

    fn to_f64(self) -> f64 {
        self
    }
}

fn non_finite_name(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some(NAN)
    } else if value == f64::INFINITY {
        Some(INFINITY)
    } else if value == f64::NEG_INFINITY {
        Some(NEG_INFINITY)
    } else {
        None
    }
}

/// 单个浮点数
struct Repr<T>(T);

impl<T: JsonFloat> Serialize for Repr<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match non_finite_name(self.0.to_f64()) {
            Some(name) if serializer.is_human_readable() => serializer.serialize_str(name),
            _ => self.0.serialize(serializer),
        }
    }
}

impl<'de, T: JsonFloat> Deserialize<'de> for Repr<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            deserializer
                .deserialize_any(ReprVisitor(PhantomData))
                .map(Repr)
        } else {
            T::deserialize(deserializer).map(Repr)
        }
    }
}

struct ReprVisitor<T>(PhantomData<T>);

impl<T: JsonFloat> Visitor<'_> for ReprVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "浮点数或字符串\"{NAN}\"、\"{INFINITY}\"、\"{NEG_INFINITY}\"")
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<T, E> {
        Ok(T::from_f64(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<T, E> {
        Ok(T::from_f64(value as f64))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<T, E> {
        Ok(T::from_f64(value as f64))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<T, E> {
        let parsed = match value {
            NAN => f64::NAN,
            INFINITY => f64::INFINITY,
            NEG_INFINITY => f64::NEG_INFINITY,
            _ => return Err(E::invalid_value(de::Unexpected::Str(value), &self)),
        };
        Ok(T::from_f64(parsed))
    }
}

/// 标量字段：`#[serde(with = "crate::tensor::float_serde::scalar")]`
pub(crate) mod scalar {
    use super::{JsonFloat, Repr};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(crate) fn serialize<T: JsonFloat, S: Serializer>(
        value: &T,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        Repr(*value).serialize(serializer)
    }

    pub(crate) fn deserialize<'de, T: JsonFloat, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<T, D::Error> {
        Repr::deserialize(deserializer).map(|repr| repr.0)
    }
}

/// 浮点数组字段，字段布局与 ndarray 自带的序列化一致：`{"v": 1, "dim": [...], "data": [...]}`
pub(crate) mod array {
    use super::{JsonFloat, Repr};
    use ndarray::{ArrayD, IxDyn};
    use serde::ser::SerializeStruct;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const ARRAY_FORMAT_VERSION: u8 = 1;

    pub(crate) fn serialize<T: JsonFloat, S: Serializer>(
        array: &ArrayD<T>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let data: Vec<Repr<T>> = array.iter().copied().map(Repr).collect();
        let mut state = serializer.serialize_struct("Array", 3)?;
        state.serialize_field("v", &ARRAY_FORMAT_VERSION)?;
        state.serialize_field("dim", array.shape())?;
        state.serialize_field("data", &data)?;
        state.end()
    }

    pub(crate) fn deserialize<'de, T: JsonFloat, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<ArrayD<T>, D::Error> {
        #[derive(Deserialize)]
        #[serde(bound(deserialize = "T: JsonFloat"))]
        struct ArrayHelper<T> {
            v: u8,
            dim: Vec<usize>,
            data: Vec<Repr<T>>,
        }

        let helper = ArrayHelper::<T>::deserialize(deserializer)?;
        if helper.v != ARRAY_FORMAT_VERSION {
            return Err(de::Error::custom(format!("未知的数组格式版本{}", helper.v)));
        }
        let data = helper.data.into_iter().map(|repr| repr.0).collect();
        ArrayD::from_shape_vec(IxDyn(&helper.dim), data).map_err(de::Error::custom)
    }
}
