/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : Graph 核心操作：创建、访问器、名称分配
 */

use super::super::error::GraphError;
use super::super::node::Node;
use super::super::types::NodeId;
use super::Graph;
use std::collections::HashMap;

impl Graph {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: Vec::new(),
            name_index: HashMap::new(),
            forward_edges: HashMap::new(),
            name_counter: 0,
        }
    }

    // ========== 基础访问器 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 按注册顺序返回所有节点ID
    pub fn nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len()).map(NodeId).collect()
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.nodes.get(id.0).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::graph) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, GraphError> {
        self.nodes.get_mut(id.0).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(name).copied()
    }

    pub fn node_by_name(&self, name: &str) -> Result<&Node, GraphError> {
        let id = self
            .node_id(name)
            .ok_or_else(|| GraphError::NodeNameNotFound(name.to_string()))?;
        self.node(id)
    }

    pub fn get_node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.node(id)?.name())
    }

    /// 节点的所有上游节点（数据边在前，控制边在后；未连接的输入不计入）
    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        let node = self.node(id)?;
        let mut parents: Vec<NodeId> = node.inputs().iter().filter_map(|input| input.node_id()).collect();
        parents.extend_from_slice(node.control_inputs());
        Ok(parents)
    }

    /// 节点的所有下游节点（按连接的先后顺序）
    pub fn get_node_children(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        // 先检查节点是否存在
        let _ = self.node(id)?;
        Ok(self.forward_edges.get(&id).cloned().unwrap_or_default())
    }

    // ========== 名称生成 ==========

    /// 生成一个图内唯一的节点名，形如`{prefix}/_{k}`
    pub fn new_name(&mut self, prefix: &str) -> String {
        loop {
            let name = format!("{prefix}/_{}", self.name_counter);
            self.name_counter += 1;
            if !self.name_index.contains_key(&name) {
                tracing::trace!(graph = %self.name, %name, "分配节点名");
                return name;
            }
        }
    }

    /// 节点名（包括按名称引用的输入）不能为空、不能以`^`开头、不能含`:`，
    /// 否则导出的 GraphDef 输入项`"^name"`、`"name:k"`会被误读
    pub(in crate::graph) fn check_node_name(name: &str) -> Result<(), GraphError> {
        if name.is_empty() {
            return Err(GraphError::InvalidArgument("节点名称不能为空".to_string()));
        }
        if name.starts_with('^') || name.contains(':') {
            return Err(GraphError::InvalidArgument(format!(
                "节点名称`{name}`不合法：不能以`^`开头，也不能含`:`"
            )));
        }
        Ok(())
    }

    pub(in crate::graph) fn check_duplicate_node_name(&self, name: &str) -> Result<(), GraphError> {
        if self.name_index.contains_key(name) {
            return Err(GraphError::DuplicateNodeName(format!(
                "节点{}在图{}中重复",
                name,
                self.name()
            )));
        }
        Ok(())
    }
}
