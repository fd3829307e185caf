/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : Graph 计算图的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 创建、访问器、名称分配
 * - node_builders.rs: 节点注册（校验 + 原子写入）、补连回边
 * - describe.rs: 导出 GraphDef
 * - model_io.rs: 从 GraphDef 重建图、读写 JSON 文件
 * - visualization.rs: DOT 可视化
 */

mod core;
mod describe;
mod model_io;
mod node_builders;
mod visualization;

use super::node::Node;
use super::types::NodeId;
use std::collections::HashMap;

/// 计算图：节点的arena，节点句柄`NodeId`即节点在`nodes`中的下标
///
/// 图只会追加节点，节点一经注册不再删除；调用方通过`&mut Graph`独占地修改它。
#[derive(Debug)]
pub struct Graph {
    pub(in crate::graph) name: String,
    pub(in crate::graph) nodes: Vec<Node>,
    pub(in crate::graph) name_index: HashMap<String, NodeId>,
    /// 正向边：producer_id -> consumer_ids（包含控制边）
    pub(in crate::graph) forward_edges: HashMap<NodeId, Vec<NodeId>>,
    /// `new_name`使用的计数器
    pub(in crate::graph) name_counter: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
