/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : Graph 导出为 GraphDef
 */

use super::super::descriptor::{GraphDef, NodeDef};
use super::super::error::GraphError;
use super::super::types::{InputSource, NodeInput};
use super::Graph;

impl Graph {
    /// 导出图的描述符（只含结构，不含任何运行时信息）
    ///
    /// # 示例
    /// ```ignore
    /// let graph_def = graph.to_graph_def()?;
    /// println!("{}", graph_def.to_json().unwrap());
    /// ```
    pub fn to_graph_def(&self) -> Result<GraphDef, GraphError> {
        let mut graph_def = GraphDef::new(&self.name);
        for node in &self.nodes {
            let mut node_def = NodeDef::new(node.name(), node.op());
            for input in node.inputs() {
                node_def.input.push(self.format_input(input)?);
            }
            for &control in node.control_inputs() {
                node_def.input.push(format!("^{}", self.get_node_name(control)?));
            }
            node_def.attr = node.attrs().clone();
            graph_def.add_node(node_def);
        }
        tracing::debug!(graph = %self.name, nodes = graph_def.node.len(), "导出GraphDef");
        Ok(graph_def)
    }

    fn format_input(&self, input: &NodeInput) -> Result<String, GraphError> {
        let name = match &input.source {
            InputSource::Node(id) => self.get_node_name(*id)?,
            InputSource::Pending(name) => name.as_str(),
        };
        Ok(if input.slot == 0 {
            name.to_string()
        } else {
            format!("{}:{}", name, input.slot)
        })
    }
}
