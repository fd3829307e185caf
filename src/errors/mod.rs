use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 随机张量的取值范围
    #[error("min须≤max，实际min={min}、max={max}")]
    InvalidRange { min: String, max: String },
    // 数据长度与形状不符
    #[error("数据长度为{data_len}，与形状{shape:?}所需的元素个数{expected}不一致")]
    DataShapeMismatch {
        data_len: usize,
        shape: Vec<usize>,
        expected: usize,
    },
    #[error("张量元素类型不一致：预期{expected}，实际为{got}")]
    ElementTypeMismatch { expected: String, got: String },

    #[error("无法识别的元素类型：`{0}`")]
    UnknownDataType(String),

    #[error("张量：未知错误")]
    UnKnown,
}
