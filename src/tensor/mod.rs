use ndarray::{ArrayD, IxDyn};
use rand::distributions::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

mod dtype;
pub(crate) mod float_serde;
mod print;
mod shape;

pub use dtype::{DataType, SlotType};
pub use shape::TensorShape;


/// 张量的底层数据，按元素类型区分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorData {
    Float(#[serde(with = "float_serde::array")] ArrayD<f32>),
    Double(#[serde(with = "float_serde::array")] ArrayD<f64>),
    Int32(ArrayD<i32>),
    Int64(ArrayD<i64>),
    UInt8(ArrayD<u8>),
    Bool(ArrayD<bool>),
    String(ArrayD<String>),
}

/// 对`TensorData`的每个变体执行同一段代码
macro_rules! match_tensor_data {
    ($data:expr, $array:ident => $body:expr) => {
        match $data {
            TensorData::Float($array) => $body,
            TensorData::Double($array) => $body,
            TensorData::Int32($array) => $body,
            TensorData::Int64($array) => $body,
            TensorData::UInt8($array) => $body,
            TensorData::Bool($array) => $body,
            TensorData::String($array) => $body,
        }
    };
}
pub(crate) use match_tensor_data;

/// 可以作为张量元素的rust类型
pub trait TensorElement: Clone + Sized {
    const DTYPE: DataType;
    fn wrap(array: ArrayD<Self>) -> TensorData;
    fn unwrap_ref(data: &TensorData) -> Option<&ArrayD<Self>>;
}

macro_rules! impl_tensor_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl TensorElement for $ty {
                const DTYPE: DataType = DataType::$variant;

                fn wrap(array: ArrayD<Self>) -> TensorData {
                    TensorData::$variant(array)
                }

                fn unwrap_ref(data: &TensorData) -> Option<&ArrayD<Self>> {
                    match data {
                        TensorData::$variant(array) => Some(array),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_tensor_element! {
    f32 => Float,
    f64 => Double,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    bool => Bool,
    String => String,
}

/// 定义张量的结构体。其可以是标量、向量、矩阵或更高维度的数组。
/// 在本库中张量只作为`Const`节点的属性值（立即数）使用，不参与任何运算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    data: TensorData,
}

impl Tensor {
    /// 创建一个float张量，若为标量，`shape`可以是[]、[1]、[1,1]、[1,1,1]...
    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]；
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等（`shape`为`[]`时乘积为1），否则会panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        Self::from_vec(data.to_vec(), shape)
    }

    /// 同`new`，但适用于任意元素类型
    pub fn from_vec<T: TensorElement>(data: Vec<T>, shape: &[usize]) -> Self {
        match Self::try_from_vec(data, shape) {
            Ok(tensor) => tensor,
            Err(e) => panic!("{}", e),
        }
    }

    /// 同`from_vec`，但数据长度与形状不符时返回错误而非panic
    pub fn try_from_vec<T: TensorElement>(data: Vec<T>, shape: &[usize]) -> Result<Self, TensorError> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(TensorError::DataShapeMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
                expected,
            });
        }
        let array = ArrayD::from_shape_vec(IxDyn(shape), data).map_err(|_| TensorError::UnKnown)?;
        Ok(Self {
            data: T::wrap(array),
        })
    }

    /// 创建一个形状为`[]`的标量张量
    pub fn scalar<T: TensorElement>(value: T) -> Self {
        Self {
            data: T::wrap(ArrayD::from_elem(IxDyn(&[]), value)),
        }
    }

    /// 创建一个随机float张量，其值在[min, max]的闭区间。
    /// `min`须≤`max`，否则会panic。
    pub fn new_random(min: f32, max: f32, shape: &[usize]) -> Self {
        assert!(
            min <= max,
            "{}",
            TensorError::InvalidRange {
                min: min.to_string(),
                max: max.to_string(),
            }
        );
        let mut rng = rand::thread_rng();
        let data = (0..shape.iter().product::<usize>())
            .map(|_| Uniform::from(min..=max).sample(&mut rng))
            .collect::<Vec<_>>();
        Self::new(&data, shape)
    }

    pub fn dtype(&self) -> DataType {
        match &self.data {
            TensorData::Float(_) => DataType::Float,
            TensorData::Double(_) => DataType::Double,
            TensorData::Int32(_) => DataType::Int32,
            TensorData::Int64(_) => DataType::Int64,
            TensorData::UInt8(_) => DataType::UInt8,
            TensorData::Bool(_) => DataType::Bool,
            TensorData::String(_) => DataType::String,
        }
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    /// 以具体元素类型借出底层数组，类型不符时返回`None`
    pub fn as_array<T: TensorElement>(&self) -> Option<&ArrayD<T>> {
        T::unwrap_ref(&self.data)
    }

    /// 按行优先顺序拷贝出所有元素
    pub fn to_vec<T: TensorElement>(&self) -> Result<Vec<T>, TensorError> {
        self.as_array::<T>()
            .map(|array| array.iter().cloned().collect())
            .ok_or_else(|| TensorError::ElementTypeMismatch {
                expected: T::DTYPE.to_string(),
                got: self.dtype().to_string(),
            })
    }
}
