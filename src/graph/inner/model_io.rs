/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : Graph 从 GraphDef 重建，以及 GraphDef 的 JSON 文件读写
 *
 * 与 describe.rs 的区别：
 * - describe.rs：Graph -> GraphDef（只读）
 * - model_io.rs：GraphDef -> Graph（重建）+ 文件 I/O
 */

use super::super::attr::AttrValue;
use super::super::descriptor::{GraphDef, InputRef, NodeDef};
use super::super::error::GraphError;
use super::super::node_builder::NodeBuilder;
use super::super::types::{NodeId, NodeOut};
use super::Graph;
use crate::tensor::SlotType;
use std::collections::HashSet;
use std::path::Path;

/// 允许在部分数据输入尚未就绪时先行导入的算子（未就绪的输入以名称占位，全部导入后再补连）
const BACK_EDGE_OPS: &[&str] = &["Merge"];

/// 待补连的边：(src名称, src输出槽位, dst, dst输入下标)
type DeferredEdge<'a> = (&'a str, usize, NodeId, usize);

impl Graph {
    /// 依据 GraphDef 重建一个等价的图
    ///
    /// 节点按依赖顺序导入。`Merge`只需控制输入就绪，尚未导入的数据输入先以名称占位（类型取自属性`T`），
    /// 全部节点导入后再补连：同名节点的输出类型可作为该输入时通过`add_edge`连接，
    /// 否则（类型不相容、槽位不存在、或 GraphDef 中没有该节点）保持未连接并记一条`warn`。
    /// 非`Merge`节点引用了不存在的节点、或存在不经过`Merge`的环时返回`InvalidOperation`。
    /// 对重建的图再调用`to_graph_def()`，得到的描述与输入相同。
    pub fn from_graph_def(graph_def: &GraphDef) -> Result<Self, GraphError> {
        let mut graph = Self::with_name(&graph_def.name);
        let defined: HashSet<&str> = graph_def.node.iter().map(|n| n.name.as_str()).collect();
        let mut imported = vec![false; graph_def.node.len()];
        let mut remaining = graph_def.node.len();
        let mut deferred_edges: Vec<DeferredEdge<'_>> = Vec::new();

        while remaining > 0 {
            let mut progressed = false;
            for (i, node_def) in graph_def.node.iter().enumerate() {
                if imported[i] || !graph.is_ready_for_import(node_def, &defined)? {
                    continue;
                }
                graph.import_node(node_def, &defined, &mut deferred_edges)?;
                imported[i] = true;
                remaining -= 1;
                progressed = true;
            }
            if !progressed {
                let stuck: Vec<&str> = graph_def
                    .node
                    .iter()
                    .zip(&imported)
                    .filter(|(_, done)| !**done)
                    .map(|(n, _)| n.name.as_str())
                    .collect();
                return Err(GraphError::InvalidOperation(format!(
                    "无法导入节点{stuck:?}：输入之间存在环"
                )));
            }
        }

        for (src, src_slot, dst, dst_input) in deferred_edges {
            graph.wire_deferred_edge(src, src_slot, dst, dst_input)?;
        }
        tracing::debug!(graph = %graph.name, nodes = graph.nodes_count(), "从GraphDef重建图");
        Ok(graph)
    }

    /// 非回边算子须等所有输入就绪；`Merge`只需控制输入就绪
    fn is_ready_for_import(&self, node_def: &NodeDef, defined: &HashSet<&str>) -> Result<bool, GraphError> {
        let allows_back_edge = BACK_EDGE_OPS.contains(&node_def.op.as_str());
        for input in node_def.input_refs() {
            if allows_back_edge && matches!(input, InputRef::Data { .. }) {
                continue;
            }
            let name = input.name();
            if self.node_id(name).is_some() {
                continue;
            }
            if !defined.contains(name) {
                return Err(GraphError::InvalidOperation(format!(
                    "节点`{}`的输入`{name}`在GraphDef中不存在",
                    node_def.name
                )));
            }
            return Ok(false);
        }
        Ok(true)
    }

    fn import_node<'a>(
        &mut self,
        node_def: &'a NodeDef,
        defined: &HashSet<&str>,
        deferred_edges: &mut Vec<DeferredEdge<'a>>,
    ) -> Result<NodeId, GraphError> {
        let mut builder = NodeBuilder::new(node_def.name.as_str(), &node_def.op);
        let mut pending = Vec::new();
        let mut data_index = 0;
        for input in node_def.input_refs() {
            match input {
                InputRef::Control { name } => {
                    let id = self
                        .node_id(name)
                        .ok_or_else(|| GraphError::NodeNameNotFound(name.to_string()))?;
                    builder = builder.control_input(id);
                }
                InputRef::Data { name, slot } => {
                    let out = match self.node_id(name) {
                        Some(id) => NodeOut::new(id, slot),
                        None => {
                            if defined.contains(name) {
                                pending.push((name, slot, data_index));
                            } else {
                                tracing::warn!(node = %node_def.name, input = name, "输入在GraphDef中不存在，保持未连接");
                            }
                            NodeOut::named(name, slot, Self::pending_input_type(node_def)?)
                        }
                    };
                    builder = builder.input(out);
                    data_index += 1;
                }
            }
        }
        for (key, value) in &node_def.attr {
            builder = builder.attr(key, value.clone());
        }

        let id = builder.finalize(self)?;
        deferred_edges.extend(
            pending
                .into_iter()
                .map(|(name, slot, index)| (name, slot, id, index)),
        );
        Ok(id)
    }

    /// 补连一条占位输入；类型不相容或槽位不存在时保持未连接
    fn wire_deferred_edge(
        &mut self,
        src: &str,
        src_slot: usize,
        dst: NodeId,
        dst_input: usize,
    ) -> Result<(), GraphError> {
        let src_id = self
            .node_id(src)
            .ok_or_else(|| GraphError::NodeNameNotFound(src.to_string()))?;
        let got = self.node(src_id)?.output_type(src_slot).ok();
        let expected = self.node(dst)?.input(dst_input).map(|input| input.dtype);
        match (got, expected) {
            (Some(got), Some(expected)) if Self::is_assignable(got, expected) => {
                self.add_edge(src_id, src_slot, dst, dst_input)
            }
            _ => {
                tracing::warn!(
                    node = %self.get_node_name(dst)?,
                    input = src,
                    slot = src_slot,
                    ?got,
                    ?expected,
                    "占位输入与同名节点的输出不相容，保持未连接"
                );
                Ok(())
            }
        }
    }

    /// 占位输入的类型取自节点的`T`属性
    fn pending_input_type(node_def: &NodeDef) -> Result<SlotType, GraphError> {
        node_def
            .attr
            .get("T")
            .and_then(AttrValue::as_type)
            .map(SlotType::value)
            .ok_or_else(|| {
                GraphError::InvalidOperation(format!(
                    "节点`{}`存在未就绪的输入，但缺少属性T，无法确定其类型",
                    node_def.name
                ))
            })
    }

    // ========== 文件 I/O ==========

    /// 把图的描述保存为 JSON 文件
    ///
    /// # 示例
    /// ```ignore
    /// graph.save_graph_def("fragments/loop.json")?;
    /// let restored = Graph::load_graph_def("fragments/loop.json")?;
    /// ```
    pub fn save_graph_def<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        let json = self
            .to_graph_def()?
            .to_json()
            .map_err(|e| GraphError::SerializationError(format!("序列化图描述失败: {e}")))?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| GraphError::SerializationError(format!("写入 JSON 文件失败: {e}")))?;
        Ok(())
    }

    /// 从 JSON 文件读取图的描述并重建图
    pub fn load_graph_def<P: AsRef<Path>>(path: P) -> Result<Self, GraphError> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GraphError::SerializationError(format!("读取 JSON 文件失败: {e}")))?;
        let graph_def = GraphDef::from_json(&json)
            .map_err(|e| GraphError::SerializationError(format!("解析图描述失败: {e}")))?;
        Self::from_graph_def(&graph_def)
    }
}
