/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : Graph 模块的错误类型
 */

use super::NodeId;
use crate::tensor::{DataType, SlotType};
use thiserror::Error;

/// Graph 操作错误类型
///
/// 节点注册失败时图保持原样，调用方可直接断言错误而无需担心图被部分修改。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("节点{0}不存在")]
    NodeNotFound(NodeId),
    #[error("图中不存在名为`{0}`的节点")]
    NodeNameNotFound(String),
    #[error("{0}")]
    DuplicateNodeName(String),
    #[error("算子`{0}`未注册")]
    OpNotRegistered(String),
    #[error("无法识别的元素类型：`{0}`")]
    UnknownDataType(String),
    #[error("节点`{node}`（{op}）的输入数量不匹配：预期{expected}个，实际{got}个")]
    InputCountMismatch {
        node: String,
        op: String,
        expected: usize,
        got: usize,
    },
    #[error("节点`{node}`的输出槽位{slot}不存在（共{num_outputs}个输出）")]
    InvalidOutputSlot {
        node: String,
        slot: usize,
        num_outputs: usize,
    },
    #[error("节点`{node}`的第{index}个输入类型不匹配：预期{expected}，实际为{got}")]
    TypeMismatch {
        node: String,
        index: usize,
        expected: SlotType,
        got: SlotType,
    },
    #[error("节点`{node}`的属性`{attr}`取值不一致：{first}与{second}")]
    InconsistentAttr {
        node: String,
        attr: String,
        first: String,
        second: String,
    },
    #[error("节点`{node}`缺少属性`{attr}`")]
    MissingAttr { node: String, attr: String },
    #[error("节点`{node}`的属性`{attr}`未在算子`{op}`中声明")]
    UnknownAttr {
        node: String,
        op: String,
        attr: String,
    },
    #[error("节点`{node}`的属性`{attr}`应为{expected}类型，实际为{got}类型")]
    AttrKindMismatch {
        node: String,
        attr: String,
        expected: &'static str,
        got: &'static str,
    },
    #[error("节点`{node}`的属性`{attr}`不允许取类型{dtype}")]
    DisallowedType {
        node: String,
        attr: String,
        dtype: DataType,
    },
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    InvalidOperation(String),
    #[error("{0}")]
    SerializationError(String),
}
