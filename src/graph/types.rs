/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : Graph 模块的类型定义：节点ID、边的起点（NodeOut）、节点上记录的输入
 */

use crate::tensor::SlotType;
use std::fmt;

/// 节点在图中的索引（图拥有所有节点，NodeId 只是非占有的句柄）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 构建节点时指定的一条数据输入边的起点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOut {
    /// 图中已存在的节点的某个输出槽位，类型从图中读取
    Node { id: NodeId, index: usize },
    /// 只按名称引用的节点（可能尚未创建，如循环的回边），类型由调用方声明
    Named {
        name: String,
        index: usize,
        dtype: SlotType,
    },
}

impl NodeOut {
    pub const fn new(id: NodeId, index: usize) -> Self {
        Self::Node { id, index }
    }

    pub fn named(name: &str, index: usize, dtype: impl Into<SlotType>) -> Self {
        Self::Named {
            name: name.to_string(),
            index,
            dtype: dtype.into(),
        }
    }

    pub const fn index(&self) -> usize {
        match self {
            Self::Node { index, .. } | Self::Named { index, .. } => *index,
        }
    }
}

impl From<NodeId> for NodeOut {
    fn from(id: NodeId) -> Self {
        Self::new(id, 0)
    }
}

/// 数据输入的来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Node(NodeId),
    /// 尚未连接的输入，只记录了名称（可通过`Graph::add_edge`补上）
    Pending(String),
}

/// 注册后节点上记录的一条数据输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInput {
    pub source: InputSource,
    pub slot: usize,
    pub dtype: SlotType,
}

impl NodeInput {
    pub const fn is_pending(&self) -> bool {
        matches!(self.source, InputSource::Pending(_))
    }

    pub const fn node_id(&self) -> Option<NodeId> {
        match self.source {
            InputSource::Node(id) => Some(id),
            InputSource::Pending(_) => None,
        }
    }
}
