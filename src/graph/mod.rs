/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : Graph 模块：数据流图的节点注册、类型检查、导出与重建
 *
 * 公开 API：
 * - `Graph`: 节点的arena，负责校验与注册
 * - `NodeBuilder`: 以链式调用描述待注册的节点
 * - `OpRegistry`: 各算子的参数与属性定义
 * - `GraphDef`: 可序列化的图描述
 * - `GraphError`: 错误类型
 */

mod attr;
mod descriptor;
mod error;
mod inner;
mod node;
mod node_builder;
mod op_registry;
mod types;

pub use attr::{AttrKind, AttrValue};
pub use descriptor::{GraphDef, InputRef, NodeDef};
pub use error::GraphError;
pub use inner::Graph;
pub use node::Node;
pub use node_builder::{NodeBuilder, NodeSpec};
pub use op_registry::{AllowedTypes, ArgDef, ArgType, AttrDef, AttrValidator, OpDef, OpRegistry};
pub use types::{InputSource, NodeId, NodeInput, NodeOut};

#[cfg(test)]
mod tests;
